use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `reviews` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReviewerId",
        to = "super::users::Column::Id"
    )]
    Reviewer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RevieweeId",
        to = "super::users::Column::Id"
    )]
    Reviewee,
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/reviews`. The reviewer is always the caller; the
/// reviewee may be omitted and is derived from the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    pub service: Uuid,
    pub reviewee: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub service: Uuid,
    pub reviewer: Uuid,
    pub reviewer_username: Option<String>,
    pub reviewee: Uuid,
    pub reviewee_username: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTimeUtc,
}

impl ReviewResponse {
    pub fn new(
        m: Model,
        reviewer_username: Option<String>,
        reviewee_username: Option<String>,
    ) -> Self {
        Self {
            id: m.id,
            service: m.service_id,
            reviewer: m.reviewer_id,
            reviewer_username,
            reviewee: m.reviewee_id,
            reviewee_username,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32) -> CreateReview {
        CreateReview {
            service: Uuid::new_v4(),
            reviewee: None,
            rating,
            comment: "Great service!".to_string(),
        }
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        assert!(review(1).validate().is_ok());
        assert!(review(5).validate().is_ok());
        assert!(review(0).validate().is_err());
        assert!(review(6).validate().is_err());
    }

    #[test]
    fn partial_update_validates_only_present_fields() {
        assert!(UpdateReview::default().validate().is_ok());
        let bad = UpdateReview {
            rating: Some(9),
            comment: None,
        };
        assert!(bad.validate().is_err());
    }
}
