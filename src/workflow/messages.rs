use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::messages as message_db;
use crate::db::users as user_db;
use crate::errors::ApiError;
use crate::models::messages::{self, CreateMessage, MessageResponse, UnreadCount};

const RESOURCE: &str = "Message";

async fn to_responses(
    db: &DatabaseConnection,
    messages: Vec<messages::Model>,
) -> Result<Vec<MessageResponse>, ApiError> {
    let users = super::user_lookup(
        db,
        messages.iter().flat_map(|m| [m.sender_id, m.recipient_id]),
    )
    .await?;

    Ok(messages
        .into_iter()
        .map(|m| {
            let sender = super::username_of(&users, m.sender_id);
            let recipient = super::username_of(&users, m.recipient_id);
            MessageResponse::new(m, sender, recipient)
        })
        .collect())
}

async fn to_response(
    db: &DatabaseConnection,
    message: messages::Model,
) -> Result<MessageResponse, ApiError> {
    let id = message.id;
    to_responses(db, vec![message])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

async fn load_message(db: &DatabaseConnection, id: Uuid) -> Result<messages::Model, ApiError> {
    message_db::get_message_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

/// Send a message from the caller to an existing user.
pub async fn send_message(
    db: &DatabaseConnection,
    identity: &Identity,
    input: CreateMessage,
) -> Result<MessageResponse, ApiError> {
    input.validate()?;

    if user_db::get_user_by_id(db, input.recipient).await?.is_none() {
        return Err(ApiError::validation(format!(
            "Recipient {} does not exist",
            input.recipient
        )));
    }

    let message =
        message_db::insert_message(db, identity.user_id, input.recipient, input.content).await?;
    tracing::info!(message_id = %message.id, sender_id = %identity.user_id, "Message sent");

    to_response(db, message).await
}

/// Messages the caller sent or received, newest first.
pub async fn list_messages(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<MessageResponse>, ApiError> {
    let messages = message_db::list_messages_for_user(db, identity.user_id).await?;
    to_responses(db, messages).await
}

pub async fn get_message(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<MessageResponse, ApiError> {
    let message = load_message(db, id).await?;
    authorization::message(identity, &message).require_visible(RESOURCE, id)?;

    to_response(db, message).await
}

/// Mark a received message as read. Repeating the call is harmless.
pub async fn mark_read(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<MessageResponse, ApiError> {
    let mut message = load_message(db, id).await?;
    authorization::message(identity, &message).require_mutable(RESOURCE, id)?;

    if message_db::mark_message_as_read(db, id).await? > 0 {
        tracing::debug!(message_id = %id, "Message marked as read");
    }
    message.is_read = true;

    to_response(db, message).await
}

pub async fn unread_count(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<UnreadCount, ApiError> {
    let unread = message_db::count_unread_for_user(db, identity.user_id).await?;
    Ok(UnreadCount { unread })
}
