use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `service_requests` table and its columns.
#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    Id,
    OwnerId,
    StartDate,
    EndDate,
    PetType,
    PetBreed,
    Location,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
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
                    .table(ServiceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceRequests::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(ServiceRequests::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(ServiceRequests::PetType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::PetBreed)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::Location)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(ServiceRequests::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_requests_owner_id")
                            .from(ServiceRequests::Table, ServiceRequests::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRequests::Table).to_owned())
            .await
    }
}
