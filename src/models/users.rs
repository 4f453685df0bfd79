use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "petowner")]
    PetOwner,
    #[sea_orm(string_value = "caregiver")]
    Caregiver,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub role: Roles,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub city: String,
    pub district: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub phone_number: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_requests::Entity")]
    ServiceRequests,
    #[sea_orm(has_many = "super::service_offers::Entity")]
    ServiceOffers,
}

impl Related<super::service_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequests.def()
    }
}

impl Related<super::service_offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceOffers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name shown to other users: display name, then username, then the
    /// local part of the email address.
    pub fn public_name(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Roles,
}

/// Used by the `POST /api/auth/complete-profile` endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompleteProfile {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,
    pub role: Option<Roles>,
    #[validate(length(max = 150))]
    pub display_name: Option<String>,
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
}

/// Used for `PUT/PATCH /api/users/{id}` by the user themselves or staff.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub display_name: Option<String>,
    pub role: Option<Roles>,
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub district: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub role: Roles,
    pub bio: String,
    pub city: String,
    pub district: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub phone_number: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            display_name: m.public_name(),
            id: m.id,
            email: m.email,
            username: m.username,
            role: m.role,
            bio: m.bio,
            city: m.city,
            district: m.district,
            birth_date: m.birth_date,
            phone_number: m.phone_number,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
