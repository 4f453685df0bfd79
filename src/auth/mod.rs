pub mod authorization;
pub mod jwks;
pub mod jwt;
pub mod middleware;

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwks::JwksCache;
use crate::config::AuthSettings;
use crate::models::users::Roles;

/// The authenticated caller, passed explicitly into every core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Roles,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Roles) -> Self {
        Self { user_id, role }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Roles::Staff
    }

    pub fn is_caregiver(&self) -> bool {
        self.role == Roles::Caregiver
    }

    pub fn is_pet_owner(&self) -> bool {
        self.role == Roles::PetOwner
    }
}

/// Verifies bearer tokens issued by the external identity provider.
#[derive(Clone)]
pub enum TokenVerifier {
    /// HS256 with a shared secret.
    Secret(jwt::JwtSecret),
    /// ES256 keys fetched from the provider's JWKS endpoint.
    Jwks(Arc<JwksCache>),
}

impl TokenVerifier {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        match settings {
            AuthSettings::SharedSecret(secret) => {
                TokenVerifier::Secret(jwt::JwtSecret(secret.clone()))
            }
            AuthSettings::Supabase {
                project_ref,
                anon_key,
            } => TokenVerifier::Jwks(Arc::new(JwksCache::new(project_ref, anon_key))),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<jwt::Claims, String> {
        match self {
            TokenVerifier::Secret(secret) => jwt::validate_token(token, &secret.0),
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
        }
    }
}
