pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_service_requests_table;
mod m20250301_000003_create_service_offers_table;
mod m20250301_000004_create_services_table;
mod m20250301_000005_create_reviews_table;
mod m20250301_000006_create_messages_table;
mod m20250305_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_service_requests_table::Migration),
            Box::new(m20250301_000003_create_service_offers_table::Migration),
            Box::new(m20250301_000004_create_services_table::Migration),
            Box::new(m20250301_000005_create_reviews_table::Migration),
            Box::new(m20250301_000006_create_messages_table::Migration),
            Box::new(m20250305_000001_add_indexes::Migration),
        ]
    }
}
