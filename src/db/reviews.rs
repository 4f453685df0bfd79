use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, UpdateReview};

/// Insert a review. `(service_id, reviewer_id)` is unique.
pub async fn insert_review<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    reviewer_id: Uuid,
    reviewee_id: Uuid,
    rating: i32,
    comment: String,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_id: Set(service_id),
        reviewer_id: Set(reviewer_id),
        reviewee_id: Set(reviewee_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

/// Fetch a single review by ID.
pub async fn get_review_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find_by_id(id).one(db).await
}

/// Whether `reviewer_id` already reviewed `service_id`.
pub async fn review_exists<C: ConnectionTrait>(
    db: &C,
    service_id: Uuid,
    reviewer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = reviews::Entity::find()
        .filter(reviews::Column::ServiceId.eq(service_id))
        .filter(reviews::Column::ReviewerId.eq(reviewer_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Reviews written by or about `user_id`, newest first.
pub async fn list_reviews_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(
            Condition::any()
                .add(reviews::Column::ReviewerId.eq(user_id))
                .add(reviews::Column::RevieweeId.eq(user_id)),
        )
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_desc(reviews::Column::Id)
        .all(db)
        .await
}

/// Apply a partial update to rating and comment.
pub async fn update_review<C: ConnectionTrait>(
    db: &C,
    review: reviews::Model,
    input: UpdateReview,
) -> Result<reviews::Model, DbErr> {
    let mut active: reviews::ActiveModel = review.into();

    if let Some(rating) = input.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = input.comment {
        active.comment = Set(comment);
    }

    active.update(db).await
}

/// Delete a review by ID.
pub async fn delete_review<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    reviews::Entity::delete_by_id(id).exec(db).await
}
