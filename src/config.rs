use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// How bearer tokens are verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSettings {
    /// HS256 tokens signed with a shared secret.
    SharedSecret(String),
    /// ES256 tokens verified against a Supabase project's JWKS.
    Supabase { project_ref: String, anon_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub run_migrations: bool,
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "RUN_MIGRATIONS",
                    value: other.to_string(),
                });
            }
        };

        let auth = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => AuthSettings::SharedSecret(secret),
            _ => {
                let supabase_url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing(
                    "JWT_SECRET or SUPABASE_URL",
                ))?;
                let project_ref = supabase_url
                    .strip_prefix("https://")
                    .and_then(|s| s.strip_suffix(".supabase.co"))
                    .ok_or_else(|| ConfigError::Invalid {
                        name: "SUPABASE_URL",
                        value: supabase_url.clone(),
                    })?
                    .to_string();
                let anon_key =
                    lookup("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
                AuthSettings::Supabase {
                    project_ref,
                    anon_key,
                }
            }
        };

        Ok(Self {
            database_url,
            port,
            run_migrations,
            auth,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn shared_secret_config_with_defaults() {
        let cfg = config(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(cfg.run_migrations);
        assert_eq!(cfg.auth, AuthSettings::SharedSecret("s3cret".into()));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn supabase_url_is_reduced_to_project_ref() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://db"),
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("PORT", "9000"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert!(!cfg.run_migrations);
        assert_eq!(
            cfg.auth,
            AuthSettings::Supabase {
                project_ref: "abcd".into(),
                anon_key: "anon".into()
            }
        );
    }

    #[test]
    fn missing_and_malformed_values_are_reported() {
        assert_eq!(
            config(&[("JWT_SECRET", "s")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
        assert_eq!(
            config(&[("DATABASE_URL", "x"), ("JWT_SECRET", "s"), ("PORT", "http")]),
            Err(ConfigError::Invalid {
                name: "PORT",
                value: "http".into()
            })
        );
        assert!(matches!(
            config(&[("DATABASE_URL", "x"), ("SUPABASE_URL", "http://nope")]),
            Err(ConfigError::Invalid { name: "SUPABASE_URL", .. })
        ));
    }
}
