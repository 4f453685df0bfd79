use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `service_requests` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub pet_type: String,
    pub pet_breed: String,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_offers::Entity")]
    Offers,
    #[sea_orm(has_one = "super::services::Entity")]
    Service,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::service_offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[validate(length(min = 1, max = 50, message = "pet_type must be 1-50 characters"))]
    pub pet_type: String,
    #[validate(length(min = 1, max = 50, message = "pet_breed must be 1-50 characters"))]
    pub pet_breed: String,
    #[validate(length(min = 1, max = 100, message = "location must be 1-100 characters"))]
    pub location: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

/// Partial update; PUT and PATCH both apply only the fields that are present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    #[validate(length(min = 1, max = 50, message = "pet_type must be 1-50 characters"))]
    pub pet_type: Option<String>,
    #[validate(length(min = 1, max = 50, message = "pet_breed must be 1-50 characters"))]
    pub pet_breed: Option<String>,
    #[validate(length(min = 1, max = 100, message = "location must be 1-100 characters"))]
    pub location: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters accepted by `GET /api/service-requests`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRequestListQuery {
    pub is_active: Option<bool>,
    /// Case-insensitive substring match.
    pub location: Option<String>,
    /// Case-insensitive substring match.
    pub pet_breed: Option<String>,
    /// Case-insensitive exact match.
    pub pet_type: Option<String>,
    /// Requests starting on or after this date.
    pub start_date: Option<chrono::NaiveDate>,
    /// Requests ending on or before this date.
    pub end_date: Option<chrono::NaiveDate>,
    /// Free text matched against pet_type, pet_breed, location and description.
    pub search: Option<String>,
    /// One of `start_date`, `end_date`, `created_at`, `location`, optionally
    /// prefixed with `-` for descending order.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    StartDate,
    EndDate,
    CreatedAt,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: OrderField,
    pub descending: bool,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            field: OrderField::CreatedAt,
            descending: true,
        }
    }
}

impl Ordering {
    /// Parse an `ordering` query value. Unknown fields yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "start_date" => OrderField::StartDate,
            "end_date" => OrderField::EndDate,
            "created_at" => OrderField::CreatedAt,
            "location" => OrderField::Location,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    pub fn column(&self) -> Column {
        match self.field {
            OrderField::StartDate => Column::StartDate,
            OrderField::EndDate => Column::EndDate,
            OrderField::CreatedAt => Column::CreatedAt,
            OrderField::Location => Column::Location,
        }
    }
}

/// Service request as returned by the API, with offer counters.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub owner_display_name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub pet_type: String,
    pub pet_breed: String,
    pub location: String,
    pub description: String,
    pub is_active: bool,
    pub pending_offers_count: u64,
    pub total_offers_count: u64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ServiceRequestResponse {
    pub fn new(m: Model, owner_display_name: String, counts: OfferCounts) -> Self {
        Self {
            id: m.id,
            owner: m.owner_id,
            owner_display_name,
            start_date: m.start_date,
            end_date: m.end_date,
            pet_type: m.pet_type,
            pet_breed: m.pet_breed,
            location: m.location,
            description: m.description,
            is_active: m.is_active,
            pending_offers_count: counts.pending,
            total_offers_count: counts.total,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Offer counters for a single request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferCounts {
    pub pending: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parses_known_fields_and_direction() {
        assert_eq!(
            Ordering::parse("start_date"),
            Some(Ordering {
                field: OrderField::StartDate,
                descending: false
            })
        );
        assert_eq!(
            Ordering::parse("-location"),
            Some(Ordering {
                field: OrderField::Location,
                descending: true
            })
        );
        assert_eq!(Ordering::parse("price"), None);
        assert_eq!(Ordering::parse("--created_at"), None);
    }

    #[test]
    fn default_ordering_is_newest_first() {
        let ordering = Ordering::default();
        assert_eq!(ordering.field, OrderField::CreatedAt);
        assert!(ordering.descending);
    }
}
