use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `messages` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/messages`. The sender is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessage {
    pub recipient: Uuid,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// Response DTO for messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender: Uuid,
    pub sender_username: Option<String>,
    pub recipient: Uuid,
    pub recipient_username: Option<String>,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub is_read: bool,
}

impl MessageResponse {
    pub fn new(
        m: Model,
        sender_username: Option<String>,
        recipient_username: Option<String>,
    ) -> Self {
        Self {
            id: m.id,
            sender: m.sender_id,
            sender_username,
            recipient: m.recipient_id,
            recipient_username,
            content: m.content,
            timestamp: m.created_at,
            is_read: m.is_read,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCount {
    pub unread: u64,
}
