//! Shared fixtures: a migrated temp-file SQLite database and seeded users.
#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tempfile::NamedTempFile;
use uuid::Uuid;

use petcare_backend::auth::Identity;
use petcare_backend::db::users as user_db;
use petcare_backend::models::service_requests::CreateServiceRequest;
use petcare_backend::models::users::Roles;

pub struct TestDb {
    pub db: DatabaseConnection,
    // Keeps the file alive for as long as the connection is in use.
    _file: NamedTempFile,
}

pub async fn create_test_db() -> TestDb {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let db = sea_orm::Database::connect(format!(
        "sqlite:{}?mode=rwc",
        file.path().to_str().unwrap().replace('\\', "/")
    ))
    .await
    .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    TestDb { db, _file: file }
}

/// Insert a user with `role` and return its identity.
pub async fn seed_user(db: &DatabaseConnection, username: &str, role: Roles) -> Identity {
    let id = Uuid::new_v4();
    user_db::insert_user(db, id, &format!("{username}@example.com"), username, role)
        .await
        .expect("Failed to seed user");
    Identity::new(id, role)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The dog-sitting request used throughout the scenarios.
pub fn dog_request() -> CreateServiceRequest {
    CreateServiceRequest {
        start_date: date(2024, 8, 1),
        end_date: date(2024, 8, 5),
        pet_type: "Dog".to_string(),
        pet_breed: "Labrador".to_string(),
        location: "New York".to_string(),
        description: "Need someone to walk and feed my dog".to_string(),
    }
}
