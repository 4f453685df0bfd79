use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ServiceRequests {
    Table,
    OwnerId,
    IsActive,
}

#[derive(DeriveIden)]
enum ServiceOffers {
    Table,
    CaregiverId,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    RevieweeId,
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    SenderId,
    RecipientId,
    IsRead,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on service_requests.owner_id for the owner-scoped listing
        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_owner_id")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index on service_requests.is_active for the is_active filter
        manager
            .create_index(
                Index::create()
                    .name("idx_service_requests_is_active")
                    .table(ServiceRequests::Table)
                    .col(ServiceRequests::IsActive)
                    .to_owned(),
            )
            .await?;

        // Index on service_offers.caregiver_id for the caregiver-scoped listing
        manager
            .create_index(
                Index::create()
                    .name("idx_service_offers_caregiver_id")
                    .table(ServiceOffers::Table)
                    .col(ServiceOffers::CaregiverId)
                    .to_owned(),
            )
            .await?;

        // Index on reviews.reviewee_id for "reviews about me"
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_reviewee_id")
                    .table(Reviews::Table)
                    .col(Reviews::RevieweeId)
                    .to_owned(),
            )
            .await?;

        // Index on messages.sender_id for the outbox
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_sender_id")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .to_owned(),
            )
            .await?;

        // Index on (recipient_id, is_read) for the inbox and unread counters
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_recipient_is_read")
                    .table(Messages::Table)
                    .col(Messages::RecipientId)
                    .col(Messages::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_requests_owner_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_requests_is_active").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_offers_caregiver_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_reviewee_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_messages_sender_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_messages_recipient_is_read").to_owned())
            .await?;

        Ok(())
    }
}
