use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::messages;

/// Insert a new, unread message.
pub async fn insert_message<C: ConnectionTrait>(
    db: &C,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: String,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(sender_id),
        recipient_id: Set(recipient_id),
        content: Set(content),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_message.insert(db).await
}

/// Fetch a single message by ID.
pub async fn get_message_by_id<C: ConnectionTrait>(
    db: &C,
    message_id: Uuid,
) -> Result<Option<messages::Model>, DbErr> {
    messages::Entity::find_by_id(message_id).one(db).await
}

/// Messages sent or received by `user_id`, newest first.
pub async fn list_messages_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(
            Condition::any()
                .add(messages::Column::SenderId.eq(user_id))
                .add(messages::Column::RecipientId.eq(user_id)),
        )
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .all(db)
        .await
}

/// Mark a single message as read. Already-read messages are left untouched.
pub async fn mark_message_as_read<C: ConnectionTrait>(
    db: &C,
    message_id: Uuid,
) -> Result<u64, DbErr> {
    let result = messages::Entity::update_many()
        .col_expr(messages::Column::IsRead, Expr::value(true))
        .filter(messages::Column::Id.eq(message_id))
        .filter(messages::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Count unread messages addressed to `user_id`.
pub async fn count_unread_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<u64, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::RecipientId.eq(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .count(db)
        .await
}
