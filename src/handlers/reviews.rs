use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::reviews::{CreateReview, UpdateReview};
use crate::workflow::reviews as review_flow;

/// POST /api/reviews — a participant reviews the other side of a service.
pub async fn create_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, ApiError> {
    let review =
        review_flow::create_review(db.get_ref(), &user.identity(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /api/reviews — reviews the caller wrote or received.
pub async fn get_reviews(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let reviews = review_flow::list_reviews(db.get_ref(), &user.identity()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// GET /api/reviews/{id}
pub async fn get_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let review = review_flow::get_review(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// PUT|PATCH /api/reviews/{id} — reviewer only.
pub async fn update_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReview>,
) -> Result<HttpResponse, ApiError> {
    let review = review_flow::update_review(
        db.get_ref(),
        &user.identity(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /api/reviews/{id} — reviewer only.
pub async fn delete_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    review_flow::delete_review(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
