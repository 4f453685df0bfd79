use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::messages::CreateMessage;
use crate::workflow::messages as message_flow;

/// POST /api/messages — the sender is always the caller.
pub async fn create_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateMessage>,
) -> Result<HttpResponse, ApiError> {
    let message =
        message_flow::send_message(db.get_ref(), &user.identity(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(message))
}

/// GET /api/messages — sent and received, newest first.
pub async fn get_messages(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let messages = message_flow::list_messages(db.get_ref(), &user.identity()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// GET /api/messages/{id}
pub async fn get_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let message =
        message_flow::get_message(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

/// POST /api/messages/{id}/read — recipient only.
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let message =
        message_flow::mark_read(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

/// GET /api/messages/unread-count
pub async fn unread_count(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let count = message_flow::unread_count(db.get_ref(), &user.identity()).await?;
    Ok(HttpResponse::Ok().json(count))
}

/// PUT|PATCH|DELETE /api/messages/{id} — messages are immutable once sent.
pub async fn method_not_allowed(_user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
