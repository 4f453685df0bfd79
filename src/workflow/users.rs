use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::users as user_db;
use crate::errors::ApiError;
use crate::models::PaginationQuery;
use crate::models::users::{self, CompleteProfile, Roles, UpdateUser, UserResponse};

const RESOURCE: &str = "User";
const TAKEN: &str = "Email or username is already taken";

/// Self-service onboarding: pick a username, a marketplace role and fill in
/// the profile.
pub async fn complete_profile(
    db: &DatabaseConnection,
    user: users::Model,
    input: CompleteProfile,
) -> Result<UserResponse, ApiError> {
    input.validate()?;
    if matches!(input.role, Some(Roles::Staff)) {
        return Err(ApiError::validation(
            "Role must be either petowner or caregiver",
        ));
    }

    let user_id = user.id;
    let user = user_db::complete_profile(db, user, input)
        .await
        .map_err(|e| ApiError::from_db_conflict(e, TAKEN))?;
    tracing::info!(user_id = %user_id, role = ?user.role, "Profile completed");

    Ok(user.into())
}

/// Staff page through every account; everybody else only sees themselves.
pub async fn list_users(
    db: &DatabaseConnection,
    identity: &Identity,
    pagination: &PaginationQuery,
) -> Result<Vec<UserResponse>, ApiError> {
    let users = if identity.is_staff() {
        user_db::get_users_paginated(db, pagination.page(), pagination.limit()).await?
    } else {
        user_db::get_user_by_id(db, identity.user_id)
            .await?
            .into_iter()
            .collect()
    };

    Ok(users.into_iter().map(UserResponse::from).collect())
}

pub async fn get_user(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<UserResponse, ApiError> {
    authorization::user(identity, id).require_visible(RESOURCE, id)?;

    let user = user_db::get_user_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;

    Ok(user.into())
}

/// Update a profile. Only staff may hand out the staff role.
pub async fn update_user(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: UpdateUser,
) -> Result<UserResponse, ApiError> {
    authorization::user(identity, id).require_mutable(RESOURCE, id)?;
    input.validate()?;

    if input.role == Some(Roles::Staff) && !identity.is_staff() {
        tracing::warn!(user_id = %identity.user_id, "Non staff user tried to assign the staff role");
        return Err(ApiError::forbidden("Only staff can assign the staff role"));
    }

    let user = user_db::get_user_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;

    let user = user_db::update_user(db, user, input)
        .await
        .map_err(|e| ApiError::from_db_conflict(e, TAKEN))?;
    tracing::info!(user_id = %id, "User updated");

    Ok(user.into())
}
