use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::service_offers as offer_db;
use crate::db::service_requests as request_db;
use crate::errors::ApiError;
use crate::models::service_requests::{
    self, CreateServiceRequest, Ordering, ServiceRequestListQuery, ServiceRequestResponse,
    UpdateServiceRequest,
};

const RESOURCE: &str = "Service request";

fn check_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), ApiError> {
    if start_date > end_date {
        return Err(ApiError::validation(
            "start_date must be on or before end_date",
        ));
    }
    Ok(())
}

/// Attach owner names and offer counters to a batch of requests.
async fn to_responses(
    db: &DatabaseConnection,
    requests: Vec<service_requests::Model>,
) -> Result<Vec<ServiceRequestResponse>, ApiError> {
    let owners = super::user_lookup(db, requests.iter().map(|r| r.owner_id)).await?;
    let counts = request_db::offer_counts(db, requests.iter().map(|r| r.id).collect()).await?;

    Ok(requests
        .into_iter()
        .map(|r| {
            let owner_name = owners
                .get(&r.owner_id)
                .map(|u| u.public_name())
                .unwrap_or_default();
            let counts = counts.get(&r.id).copied().unwrap_or_default();
            ServiceRequestResponse::new(r, owner_name, counts)
        })
        .collect())
}

async fn to_response(
    db: &DatabaseConnection,
    request: service_requests::Model,
) -> Result<ServiceRequestResponse, ApiError> {
    let id = request.id;
    to_responses(db, vec![request])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

/// Post a new request. Only pet owners may do this; the owner is always the caller.
pub async fn create_request(
    db: &DatabaseConnection,
    identity: &Identity,
    input: CreateServiceRequest,
) -> Result<ServiceRequestResponse, ApiError> {
    if !identity.is_pet_owner() {
        tracing::warn!(user_id = %identity.user_id, "Non pet owner tried to create a service request");
        return Err(ApiError::forbidden(
            "Only pet owners can create service requests",
        ));
    }
    input.validate()?;
    check_dates(input.start_date, input.end_date)?;

    let request = request_db::insert_request(db, input, identity.user_id).await?;
    tracing::info!(request_id = %request.id, owner_id = %identity.user_id, "Service request created");

    to_response(db, request).await
}

/// Requests visible to the caller: everything for staff and caregivers, only
/// their own for everyone else.
pub async fn list_requests(
    db: &DatabaseConnection,
    identity: &Identity,
    query: &ServiceRequestListQuery,
) -> Result<Vec<ServiceRequestResponse>, ApiError> {
    let owner = if identity.is_staff() || identity.is_caregiver() {
        None
    } else {
        Some(identity.user_id)
    };
    // Unknown ordering fields fall back to the default rather than failing.
    let ordering = query
        .ordering
        .as_deref()
        .and_then(Ordering::parse)
        .unwrap_or_default();

    let requests = request_db::list_requests(db, owner, query, ordering).await?;
    to_responses(db, requests).await
}

pub async fn get_request(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<ServiceRequestResponse, ApiError> {
    let request = request_db::get_request_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;
    authorization::service_request(identity, &request).require_visible(RESOURCE, id)?;

    to_response(db, request).await
}

/// Partial update. Setting `is_active = false` withdraws the request and
/// closes all of its open offers in the same transaction.
pub async fn update_request(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: UpdateServiceRequest,
) -> Result<ServiceRequestResponse, ApiError> {
    input.validate()?;

    let txn = db.begin().await?;

    let request = request_db::get_request_by_id(&txn, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;
    authorization::service_request(identity, &request).require_mutable(RESOURCE, id)?;

    check_dates(
        input.start_date.unwrap_or(request.start_date),
        input.end_date.unwrap_or(request.end_date),
    )?;

    let withdraw = match input.is_active {
        Some(true) if !request.is_active => {
            return Err(ApiError::validation(
                "An inactive service request cannot be reactivated",
            ));
        }
        Some(false) => request.is_active,
        _ => false,
    };

    let mut request = request_db::update_request(&txn, request, input).await?;

    if withdraw && request_db::deactivate_request(&txn, id).await? == 1 {
        let closed = offer_db::close_offers_for_request(&txn, id, None).await?;
        request.is_active = false;
        tracing::info!(request_id = %id, closed_offers = closed, "Service request withdrawn");
    }

    txn.commit().await?;

    to_response(db, request).await
}

pub async fn delete_request(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<(), ApiError> {
    let request = request_db::get_request_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;
    authorization::service_request(identity, &request).require_mutable(RESOURCE, id)?;

    request_db::delete_request(db, id).await?;
    tracing::info!(request_id = %id, "Service request deleted");

    Ok(())
}
