use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `service_offers` table and its columns.
#[derive(DeriveIden)]
enum ServiceOffers {
    Table,
    Id,
    ServiceRequestId,
    CaregiverId,
    Price,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOffers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOffers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceOffers::ServiceRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceOffers::CaregiverId).uuid().not_null())
                    .col(ColumnDef::new(ServiceOffers::Price).double().not_null())
                    .col(
                        ColumnDef::new(ServiceOffers::Message)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOffers::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ServiceOffers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceOffers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_offers_service_request_id")
                            .from(ServiceOffers::Table, ServiceOffers::ServiceRequestId)
                            .to(ServiceRequests::Table, ServiceRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_offers_caregiver_id")
                            .from(ServiceOffers::Table, ServiceOffers::CaregiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One offer per caregiver per request; concurrent duplicates fail here.
        manager
            .create_index(
                Index::create()
                    .name("idx_service_offers_request_caregiver_unique")
                    .table(ServiceOffers::Table)
                    .col(ServiceOffers::ServiceRequestId)
                    .col(ServiceOffers::CaregiverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceOffers::Table).to_owned())
            .await
    }
}
