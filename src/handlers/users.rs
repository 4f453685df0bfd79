use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::PaginationQuery;
use crate::models::users::UpdateUser;
use crate::workflow::users as user_flow;

/// GET /api/users — staff get every user (`?page=1&limit=20`), others get themselves.
pub async fn get_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let users = user_flow::list_users(db.get_ref(), &user.identity(), &query).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id}
pub async fn get_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let found = user_flow::get_user(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// PUT|PATCH /api/users/{id} — self or staff.
pub async fn update_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    let updated = user_flow::update_user(
        db.get_ref(),
        &user.identity(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/users/{id} — accounts are never removed.
pub async fn delete_user(_user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
