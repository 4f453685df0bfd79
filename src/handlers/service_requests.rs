use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::service_requests::{
    CreateServiceRequest, ServiceRequestListQuery, UpdateServiceRequest,
};
use crate::workflow::requests as request_flow;

/// POST /api/service-requests — pet owners post a new request.
pub async fn create_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let created =
        request_flow::create_request(db.get_ref(), &user.identity(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/service-requests
///
/// Query params: `is_active`, `location`, `pet_breed`, `pet_type`,
/// `start_date`, `end_date`, `search`, `ordering`.
pub async fn get_requests(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ServiceRequestListQuery>,
) -> Result<HttpResponse, ApiError> {
    let requests = request_flow::list_requests(db.get_ref(), &user.identity(), &query).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// GET /api/service-requests/{id}
pub async fn get_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let request =
        request_flow::get_request(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// PUT|PATCH /api/service-requests/{id} — partial update; `is_active: false` withdraws.
pub async fn update_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let updated = request_flow::update_request(
        db.get_ref(),
        &user.identity(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/service-requests/{id}
pub async fn delete_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    request_flow::delete_request(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
