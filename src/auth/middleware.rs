use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::{Identity, TokenVerifier};
use crate::db::users::find_or_create_from_auth;
use crate::errors::ApiError;
use crate::models::users::{self, CreateUserFromAuth, Roles};

fn unauthorized(msg: impl Into<String>) -> ApiError {
    ApiError::Unauthorized(msg.into())
}

/// The caller behind a verified bearer token.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn identity(&self) -> Identity {
        Identity::new(self.0.id, self.0.role)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| unauthorized("Missing Authorization header"))?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized("Authorization header must be: Bearer <token>"))?;

            // 2. Verify it with whichever verifier the app was configured with.
            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("Token verifier not configured")
            })?;

            let claims = verifier.verify(token).await.map_err(|e| {
                tracing::debug!("Rejected bearer token: {e}");
                unauthorized(format!("Invalid token: {e}"))
            })?;

            let user_id = claims.user_id().map_err(unauthorized)?;

            let email = claims
                .user_email()
                .ok_or_else(|| unauthorized("No email in token claims"))?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            // 3. Find the account, provisioning it as a pet owner on first sight.
            let user = find_or_create_from_auth(
                db.get_ref(),
                CreateUserFromAuth {
                    id: user_id,
                    email,
                    display_name: claims.display_name(),
                    role: Roles::PetOwner,
                },
            )
            .await
            .map_err(|e| match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    unauthorized("Email is already bound to another account")
                }
                _ => ApiError::Database(e),
            })?;

            Ok(AuthenticatedUser(user))
        })
    }
}
