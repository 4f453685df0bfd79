use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::users::{self, CompleteProfile, CreateUserFromAuth, Roles, UpdateUser};

/// Find the user behind a verified token, creating the row on first login.
pub async fn find_or_create_from_auth<C: ConnectionTrait>(
    db: &C,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        username: Set(None),
        display_name: Set(input.display_name),
        role: Set(input.role),
        bio: Set(String::new()),
        city: Set(String::new()),
        district: Set(String::new()),
        birth_date: Set(None),
        phone_number: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch one page of users, oldest accounts first.
pub async fn get_users_paginated<C: ConnectionTrait>(
    db: &C,
    page: u64,
    limit: u64,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::CreatedAt)
        .order_by_asc(users::Column::Id)
        .offset(page.saturating_sub(1) * limit)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch many users at once, keyed by ID.
pub async fn get_users_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, users::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

/// Apply self-service profile completion.
pub async fn complete_profile<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    input: CompleteProfile,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();

    if let Some(username) = input.username {
        active.username = Set(Some(username));
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(city) = input.city {
        active.city = Set(city);
    }
    if let Some(district) = input.district {
        active.district = Set(district);
    }
    if let Some(birth_date) = input.birth_date {
        active.birth_date = Set(Some(birth_date));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(phone_number);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Update an existing user.
pub async fn update_user<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    input: UpdateUser,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();

    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(username) = input.username {
        active.username = Set(Some(username));
    }
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(city) = input.city {
        active.city = Set(city);
    }
    if let Some(district) = input.district {
        active.district = Set(district);
    }
    if let Some(birth_date) = input.birth_date {
        active.birth_date = Set(Some(birth_date));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(phone_number);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Insert a user with a fixed role. Used by seeding and tests; regular
/// accounts come from [`find_or_create_from_auth`].
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    email: &str,
    username: &str,
    role: Roles,
) -> Result<users::Model, DbErr> {
    let user = users::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        username: Set(Some(username.to_string())),
        display_name: Set(None),
        role: Set(role),
        bio: Set(String::new()),
        city: Set(String::new()),
        district: Set(String::new()),
        birth_date: Set(None),
        phone_number: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    user.insert(db).await
}
