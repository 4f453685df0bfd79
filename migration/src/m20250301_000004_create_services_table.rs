use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `services` table and its columns.
#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    ServiceRequestId,
    AcceptedOfferId,
    DateAccepted,
    HasHappened,
}

#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ServiceOffers {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    // Both links are one-to-one: a request and an offer form at most one service.
                    .col(
                        ColumnDef::new(Services::ServiceRequestId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Services::AcceptedOfferId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Services::DateAccepted)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::HasHappened)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_service_request_id")
                            .from(Services::Table, Services::ServiceRequestId)
                            .to(ServiceRequests::Table, ServiceRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_accepted_offer_id")
                            .from(Services::Table, Services::AcceptedOfferId)
                            .to(ServiceOffers::Table, ServiceOffers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}
