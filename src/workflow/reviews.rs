use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::reviews as review_db;
use crate::db::services as service_db;
use crate::errors::ApiError;
use crate::models::reviews::{self, CreateReview, ReviewResponse, UpdateReview};

const RESOURCE: &str = "Review";
const DUPLICATE_REVIEW: &str = "You have already reviewed this service";

async fn to_responses(
    db: &DatabaseConnection,
    reviews: Vec<reviews::Model>,
) -> Result<Vec<ReviewResponse>, ApiError> {
    let users = super::user_lookup(
        db,
        reviews.iter().flat_map(|r| [r.reviewer_id, r.reviewee_id]),
    )
    .await?;

    Ok(reviews
        .into_iter()
        .map(|r| {
            let reviewer = super::username_of(&users, r.reviewer_id);
            let reviewee = super::username_of(&users, r.reviewee_id);
            ReviewResponse::new(r, reviewer, reviewee)
        })
        .collect())
}

async fn to_response(
    db: &DatabaseConnection,
    review: reviews::Model,
) -> Result<ReviewResponse, ApiError> {
    let id = review.id;
    to_responses(db, vec![review])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

async fn load_review(db: &DatabaseConnection, id: Uuid) -> Result<reviews::Model, ApiError> {
    review_db::get_review_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

/// Review the other participant of a service.
///
/// Participation is checked before the payload, so outsiders always get 403.
pub async fn create_review(
    db: &DatabaseConnection,
    identity: &Identity,
    input: CreateReview,
) -> Result<ReviewResponse, ApiError> {
    let service = service_db::get_service_by_id(db, input.service).await?;
    let reviewee = match service {
        Some(service) => service_db::get_parties(db, &service)
            .await?
            .counterpart_of(identity.user_id),
        None => None,
    };
    let Some(reviewee) = reviewee else {
        tracing::warn!(user_id = %identity.user_id, service_id = %input.service, "Review refused for non-participant");
        return Err(ApiError::forbidden(
            "You can only review services you took part in",
        ));
    };

    input.validate()?;
    if input.reviewee.is_some_and(|supplied| supplied != reviewee) {
        return Err(ApiError::validation(
            "reviewee must be the other participant of the service",
        ));
    }
    if review_db::review_exists(db, input.service, identity.user_id).await? {
        return Err(ApiError::validation(DUPLICATE_REVIEW));
    }

    let review = review_db::insert_review(
        db,
        input.service,
        identity.user_id,
        reviewee,
        input.rating,
        input.comment,
    )
    .await
    .map_err(|e| ApiError::from_db_conflict(e, DUPLICATE_REVIEW))?;
    tracing::info!(review_id = %review.id, service_id = %review.service_id, "Review created");

    to_response(db, review).await
}

/// Reviews the caller wrote or received.
pub async fn list_reviews(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<ReviewResponse>, ApiError> {
    let reviews = review_db::list_reviews_for_user(db, identity.user_id).await?;
    to_responses(db, reviews).await
}

pub async fn get_review(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<ReviewResponse, ApiError> {
    let review = load_review(db, id).await?;
    authorization::review(identity, &review).require_visible(RESOURCE, id)?;

    to_response(db, review).await
}

pub async fn update_review(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: UpdateReview,
) -> Result<ReviewResponse, ApiError> {
    let review = load_review(db, id).await?;
    authorization::review(identity, &review).require_mutable(RESOURCE, id)?;
    input.validate()?;

    let review = review_db::update_review(db, review, input).await?;
    tracing::info!(review_id = %id, "Review updated");

    to_response(db, review).await
}

pub async fn delete_review(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<(), ApiError> {
    let review = load_review(db, id).await?;
    authorization::review(identity, &review).require_mutable(RESOURCE, id)?;

    review_db::delete_review(db, id).await?;
    tracing::info!(review_id = %id, "Review deleted");

    Ok(())
}
