use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::service_offers;
use crate::models::service_requests;
use crate::models::services::{self, ServiceParties};

/// Insert the service formed by accepting `accepted_offer_id` on
/// `service_request_id`. Both columns are unique, so a second acceptance on
/// the same request fails here with a unique violation.
pub async fn insert_service<C: ConnectionTrait>(
    db: &C,
    service_request_id: Uuid,
    accepted_offer_id: Uuid,
) -> Result<services::Model, DbErr> {
    let new_service = services::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_request_id: Set(service_request_id),
        accepted_offer_id: Set(accepted_offer_id),
        date_accepted: Set(chrono::Utc::now()),
        has_happened: Set(false),
    };

    new_service.insert(db).await
}

/// Fetch a single service by ID.
pub async fn get_service_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<services::Model>, DbErr> {
    services::Entity::find_by_id(id).one(db).await
}

/// Resolve the pet owner and caregiver of one service.
pub async fn get_parties<C: ConnectionTrait>(
    db: &C,
    service: &services::Model,
) -> Result<ServiceParties, DbErr> {
    let mut parties = get_parties_for_services(db, std::slice::from_ref(service)).await?;
    parties
        .remove(&service.id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("Parties of service {}", service.id)))
}

/// Resolve the participants of many services in two queries, keyed by service ID.
pub async fn get_parties_for_services<C: ConnectionTrait>(
    db: &C,
    services: &[services::Model],
) -> Result<HashMap<Uuid, ServiceParties>, DbErr> {
    if services.is_empty() {
        return Ok(HashMap::new());
    }

    let request_ids: Vec<Uuid> = services.iter().map(|s| s.service_request_id).collect();
    let offer_ids: Vec<Uuid> = services.iter().map(|s| s.accepted_offer_id).collect();

    let owners: HashMap<Uuid, Uuid> = service_requests::Entity::find()
        .filter(service_requests::Column::Id.is_in(request_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.owner_id))
        .collect();

    let caregivers: HashMap<Uuid, Uuid> = service_offers::Entity::find()
        .filter(service_offers::Column::Id.is_in(offer_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|o| (o.id, o.caregiver_id))
        .collect();

    let mut parties = HashMap::new();
    for service in services {
        if let (Some(&pet_owner), Some(&caregiver)) = (
            owners.get(&service.service_request_id),
            caregivers.get(&service.accepted_offer_id),
        ) {
            parties.insert(
                service.id,
                ServiceParties {
                    pet_owner,
                    caregiver,
                },
            );
        }
    }

    Ok(parties)
}

/// List services, newest first. With `participant`, only services where that
/// user is the pet owner or the caregiver.
pub async fn list_services<C: ConnectionTrait>(
    db: &C,
    participant: Option<Uuid>,
) -> Result<Vec<services::Model>, DbErr> {
    let mut select = services::Entity::find();

    if let Some(user_id) = participant {
        select = select
            .inner_join(service_requests::Entity)
            .inner_join(service_offers::Entity)
            .filter(
                Condition::any()
                    .add(service_requests::Column::OwnerId.eq(user_id))
                    .add(service_offers::Column::CaregiverId.eq(user_id)),
            );
    }

    select
        .order_by_desc(services::Column::DateAccepted)
        .order_by_desc(services::Column::Id)
        .all(db)
        .await
}
