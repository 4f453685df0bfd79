use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::service_offers::{
    CreateServiceOffer, OfferListQuery, UpdateOfferStatus, UpdateServiceOffer,
};
use crate::workflow::offers::{self as offer_flow, OfferOutcome, OfferSubmission};

/// POST /api/service-offers — caregivers offer on an active request.
///
/// Re-offering after a rejection reopens the existing offer and answers 200
/// instead of 201.
pub async fn create_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateServiceOffer>,
) -> Result<HttpResponse, ApiError> {
    match offer_flow::create_offer(db.get_ref(), &user.identity(), body.into_inner()).await? {
        OfferSubmission::Created(offer) => Ok(HttpResponse::Created().json(offer)),
        OfferSubmission::Resubmitted(offer) => Ok(HttpResponse::Ok().json(offer)),
    }
}

/// GET /api/service-offers — optional `service_request` and `status` filters.
pub async fn get_offers(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<OfferListQuery>,
) -> Result<HttpResponse, ApiError> {
    let offers = offer_flow::list_offers(db.get_ref(), &user.identity(), &query).await?;
    Ok(HttpResponse::Ok().json(offers))
}

/// GET /api/service-offers/{id}
pub async fn get_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let offer = offer_flow::get_offer(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(offer))
}

/// PUT|PATCH /api/service-offers/{id} — the caregiver edits price or message.
pub async fn update_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateServiceOffer>,
) -> Result<HttpResponse, ApiError> {
    let offer = offer_flow::update_offer(
        db.get_ref(),
        &user.identity(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(offer))
}

/// PUT /api/service-offers/{id}/status — the request owner accepts or rejects.
///
/// Body: `{ "status": "accepted" }` answers 201 with the new service,
/// `{ "status": "rejected" }` answers 200 with the offer.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOfferStatus>,
) -> Result<HttpResponse, ApiError> {
    let outcome = offer_flow::decide_offer(
        db.get_ref(),
        &user.identity(),
        path.into_inner(),
        body.status,
    )
    .await?;

    match outcome {
        OfferOutcome::Accepted(service) => Ok(HttpResponse::Created().json(service)),
        OfferOutcome::Rejected(offer) => Ok(HttpResponse::Ok().json(offer)),
    }
}

/// DELETE /api/service-offers/{id}
pub async fn delete_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    offer_flow::delete_offer(db.get_ref(), &user.identity(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
