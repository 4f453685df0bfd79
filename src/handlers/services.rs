use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::workflow::services as service_flow;

/// GET /api/services
pub async fn get_services(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let services = service_flow::list_services(db.get_ref(), &user.identity()).await?;
    Ok(HttpResponse::Ok().json(services))
}

/// GET /api/services/{id}
pub async fn get_service(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let service =
        service_flow::get_service(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(service))
}
