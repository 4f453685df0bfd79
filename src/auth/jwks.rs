use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::Claims;

const JWKS_URL_TEMPLATE: &str = "https://{}.supabase.co/auth/v1/.well-known/jwks.json";
const KEY_TTL: Duration = Duration::from_secs(3600);

/// The subset of a JSON Web Key Set we read.
#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// An elliptic-curve public key as published in the JWKS document.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    alg: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

#[derive(Clone)]
struct EcKey {
    x: String,
    y: String,
    algorithm: Algorithm,
}

impl TryFrom<Jwk> for EcKey {
    type Error = String;

    fn try_from(jwk: Jwk) -> Result<Self, Self::Error> {
        Ok(Self {
            x: jwk.x.ok_or("Missing 'x' in JWK")?,
            y: jwk.y.ok_or("Missing 'y' in JWK")?,
            algorithm: parse_algorithm(jwk.alg.as_deref()),
        })
    }
}

/// Signing keys of the identity provider, fetched on demand and cached by `kid`.
#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, EcKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        let keys = Arc::new(
            Cache::builder()
                .time_to_live(KEY_TTL)
                .max_capacity(10)
                .build(),
        );

        Self {
            keys,
            jwks_url: JWKS_URL_TEMPLATE.replace("{}", project_ref),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, String> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn key_for(&self, kid: &str) -> Result<EcKey, String> {
        if let Some(cached) = self.keys.get(kid).await {
            return Ok(cached);
        }

        let jwk = self
            .fetch_jwks()
            .await?
            .keys
            .into_iter()
            .find(|k| k.kid.as_deref() == Some(kid))
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;
        let key = EcKey::try_from(jwk)?;

        self.keys.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}

/// Keys without an `alg` (or with one we don't know) are treated as ES256.
fn parse_algorithm(alg: Option<&str>) -> Algorithm {
    match alg {
        Some("ES384") => Algorithm::ES384,
        _ => Algorithm::ES256,
    }
}
