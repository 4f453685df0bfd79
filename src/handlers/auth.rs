use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::users::{CompleteProfile, UserResponse};
use crate::workflow::users as user_flow;

/// GET /api/auth/me — return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/complete-profile — set username, role and profile fields after first login.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CompleteProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = user_flow::complete_profile(db.get_ref(), user.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}
