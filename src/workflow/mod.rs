//! Core operations. Every function takes the caller's [`Identity`] explicitly,
//! applies the authorization policy, and returns API-ready responses.
//!
//! [`Identity`]: crate::auth::Identity

pub mod messages;
pub mod offers;
pub mod requests;
pub mod reviews;
pub mod services;
pub mod users;

use sea_orm::{ConnectionTrait, DbErr};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::users as user_db;
use crate::models::users as user_models;

/// Load the users behind `ids` so responses can be decorated with names.
async fn user_lookup<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, user_models::Model>, DbErr> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    user_db::get_users_by_ids(db, ids).await
}

fn username_of(lookup: &HashMap<Uuid, user_models::Model>, id: Uuid) -> Option<String> {
    lookup.get(&id).and_then(|u| u.username.clone())
}
