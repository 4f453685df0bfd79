use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::services as service_db;
use crate::errors::ApiError;
use crate::models::services::ServiceResponse;

const RESOURCE: &str = "Service";

/// Services the caller took part in; staff see every service.
pub async fn list_services(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<ServiceResponse>, ApiError> {
    let participant = (!identity.is_staff()).then_some(identity.user_id);

    let services = service_db::list_services(db, participant).await?;
    let mut parties = service_db::get_parties_for_services(db, &services).await?;

    Ok(services
        .into_iter()
        .filter_map(|s| parties.remove(&s.id).map(|p| ServiceResponse::new(s, p)))
        .collect())
}

pub async fn get_service(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<ServiceResponse, ApiError> {
    let service = service_db::get_service_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;
    let parties = service_db::get_parties(db, &service).await?;
    authorization::service(identity, &parties).require_visible(RESOURCE, id)?;

    Ok(ServiceResponse::new(service, parties))
}
