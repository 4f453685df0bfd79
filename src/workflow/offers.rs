use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Identity;
use crate::auth::authorization;
use crate::db::service_offers::{self as offer_db, OfferScope};
use crate::db::service_requests as request_db;
use crate::db::services as service_db;
use crate::errors::ApiError;
use crate::models::service_offers::{
    self, CreateServiceOffer, OfferDecision, OfferEvent, OfferListQuery, OfferStatus,
    ServiceOfferResponse, UpdateServiceOffer,
};
use crate::models::service_requests;
use crate::models::services::{ServiceParties, ServiceResponse};

const RESOURCE: &str = "Service offer";
const DUPLICATE_OFFER: &str = "You have already made an offer on this service request";

/// Result of submitting an offer: a fresh row, or a rejected offer reopened.
#[derive(Debug, Clone)]
pub enum OfferSubmission {
    Created(ServiceOfferResponse),
    Resubmitted(ServiceOfferResponse),
}

/// Result of the request owner deciding on an offer.
#[derive(Debug, Clone)]
pub enum OfferOutcome {
    Accepted(ServiceResponse),
    Rejected(ServiceOfferResponse),
}

async fn to_responses(
    db: &DatabaseConnection,
    offers: Vec<service_offers::Model>,
) -> Result<Vec<ServiceOfferResponse>, ApiError> {
    let caregivers = super::user_lookup(db, offers.iter().map(|o| o.caregiver_id)).await?;

    Ok(offers
        .into_iter()
        .map(|o| {
            let username = super::username_of(&caregivers, o.caregiver_id);
            ServiceOfferResponse::new(o, username)
        })
        .collect())
}

async fn to_response(
    db: &DatabaseConnection,
    offer: service_offers::Model,
) -> Result<ServiceOfferResponse, ApiError> {
    let id = offer.id;
    to_responses(db, vec![offer])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))
}

/// Load an offer together with the request it was made on.
async fn load_offer<C: sea_orm::ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<(service_offers::Model, service_requests::Model), ApiError> {
    let offer = offer_db::get_offer_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;
    let request = request_db::get_request_by_id(db, offer.service_request_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;

    Ok((offer, request))
}

/// Submit an offer on an active request. A caregiver whose earlier offer was
/// rejected gets that same row back, updated and pending again.
pub async fn create_offer(
    db: &DatabaseConnection,
    identity: &Identity,
    input: CreateServiceOffer,
) -> Result<OfferSubmission, ApiError> {
    if !identity.is_caregiver() {
        tracing::warn!(user_id = %identity.user_id, "Non caregiver tried to create a service offer");
        return Err(ApiError::forbidden("Only caregivers can create service offers"));
    }
    input.validate()?;

    let txn = db.begin().await?;

    let request_id = input.service_request;
    let request = request_db::get_request_by_id(&txn, request_id)
        .await?
        .ok_or_else(|| {
            ApiError::validation(format!("Service request {request_id} does not exist"))
        })?;
    if !request.is_active {
        return Err(ApiError::validation(
            "This service request is no longer accepting offers",
        ));
    }

    let existing =
        offer_db::find_offer_for_request_and_caregiver(&txn, request_id, identity.user_id).await?;

    let (offer, resubmitted) = match existing {
        Some(offer) if offer.status == OfferStatus::Rejected => {
            let status = offer.status.transition(OfferEvent::Resubmit)?;
            let offer = offer_db::update_offer(
                &txn,
                offer,
                Some(input.price),
                Some(input.message),
                status,
            )
            .await?;
            tracing::info!(offer_id = %offer.id, request_id = %request_id, "Rejected offer resubmitted");
            (offer, true)
        }
        Some(_) => {
            tracing::warn!(request_id = %request_id, caregiver_id = %identity.user_id, "Duplicate offer refused");
            return Err(ApiError::validation(DUPLICATE_OFFER));
        }
        None => {
            let offer = offer_db::insert_offer(&txn, input, identity.user_id)
                .await
                .map_err(|e| ApiError::from_db_conflict(e, DUPLICATE_OFFER))?;
            tracing::info!(offer_id = %offer.id, request_id = %request_id, "Service offer created");
            (offer, false)
        }
    };

    txn.commit().await?;

    let response = to_response(db, offer).await?;
    Ok(if resubmitted {
        OfferSubmission::Resubmitted(response)
    } else {
        OfferSubmission::Created(response)
    })
}

/// Offers visible to the caller: all for staff, their own for caregivers,
/// and offers on their requests for everyone else.
pub async fn list_offers(
    db: &DatabaseConnection,
    identity: &Identity,
    query: &OfferListQuery,
) -> Result<Vec<ServiceOfferResponse>, ApiError> {
    let scope = if identity.is_staff() {
        OfferScope::All
    } else if identity.is_caregiver() {
        OfferScope::Caregiver(identity.user_id)
    } else {
        OfferScope::RequestOwner(identity.user_id)
    };

    let offers = offer_db::list_offers(db, scope, query).await?;
    to_responses(db, offers).await
}

pub async fn get_offer(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<ServiceOfferResponse, ApiError> {
    let (offer, request) = load_offer(db, id).await?;
    authorization::service_offer(identity, &offer, request.owner_id)
        .require_visible(RESOURCE, id)?;

    to_response(db, offer).await
}

/// Edit price or message. Any successful edit puts the offer back to pending.
pub async fn update_offer(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    input: UpdateServiceOffer,
) -> Result<ServiceOfferResponse, ApiError> {
    input.validate()?;

    let txn = db.begin().await?;

    let (offer, request) = load_offer(&txn, id).await?;
    authorization::service_offer(identity, &offer, request.owner_id)
        .require_mutable(RESOURCE, id)?;

    if !offer.status.is_editable() {
        return Err(ApiError::validation(format!(
            "An offer that is {} cannot be edited",
            offer.status
        )));
    }

    if !request.is_active {
        let closed = offer.status.transition(OfferEvent::RequestClosed)?;
        offer_db::set_offer_status_if(&txn, id, offer.status, closed).await?;
        txn.commit().await?;
        tracing::warn!(offer_id = %id, "Offer edited after its request closed; offer closed");
        return Err(ApiError::validation(
            "This service request is no longer active",
        ));
    }

    let status = offer.status.transition(OfferEvent::Resubmit)?;
    let offer = offer_db::update_offer(&txn, offer, input.price, input.message, status).await?;

    txn.commit().await?;
    tracing::info!(offer_id = %id, "Service offer updated");

    to_response(db, offer).await
}

/// Accept or reject a pending offer.
///
/// Accepting is all-or-nothing: the offer becomes accepted, the request
/// inactive, every other open offer on it request_inactive, and exactly one
/// service is created. Any failure rolls the whole unit back.
pub async fn decide_offer(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
    decision: OfferDecision,
) -> Result<OfferOutcome, ApiError> {
    let txn = db.begin().await?;

    let (offer, request) = load_offer(&txn, id).await?;
    authorization::offer_decision(identity, &offer, request.owner_id)
        .require_mutable(RESOURCE, id)?;

    match decision {
        OfferDecision::Accepted => {
            let accepted = offer.status.transition(OfferEvent::Accept)?;
            if !request.is_active {
                return Err(ApiError::validation(
                    "This service request is no longer active",
                ));
            }

            // Conditional writes: a concurrent decision leaves zero rows changed.
            if offer_db::set_offer_status_if(&txn, id, offer.status, accepted).await? != 1 {
                return Err(ApiError::validation("The offer is no longer pending"));
            }
            if request_db::deactivate_request(&txn, request.id).await? != 1 {
                return Err(ApiError::validation(
                    "This service request is no longer active",
                ));
            }
            let closed = offer_db::close_offers_for_request(&txn, request.id, Some(id)).await?;
            let service = service_db::insert_service(&txn, request.id, id)
                .await
                .map_err(|e| {
                    ApiError::from_db_conflict(e, "This service request already has a service")
                })?;

            txn.commit().await?;
            tracing::info!(
                offer_id = %id,
                request_id = %request.id,
                service_id = %service.id,
                closed_offers = closed,
                "Service offer accepted"
            );

            let parties = ServiceParties {
                pet_owner: request.owner_id,
                caregiver: offer.caregiver_id,
            };
            Ok(OfferOutcome::Accepted(ServiceResponse::new(service, parties)))
        }
        OfferDecision::Rejected => {
            let rejected = offer.status.transition(OfferEvent::Reject)?;
            if offer_db::set_offer_status_if(&txn, id, offer.status, rejected).await? != 1 {
                return Err(ApiError::validation("The offer is no longer pending"));
            }
            let offer = offer_db::get_offer_by_id(&txn, id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("{RESOURCE} {id} not found")))?;

            txn.commit().await?;
            tracing::info!(offer_id = %id, request_id = %request.id, "Service offer rejected");

            Ok(OfferOutcome::Rejected(to_response(db, offer).await?))
        }
    }
}

pub async fn delete_offer(
    db: &DatabaseConnection,
    identity: &Identity,
    id: Uuid,
) -> Result<(), ApiError> {
    let (offer, request) = load_offer(db, id).await?;
    authorization::service_offer(identity, &offer, request.owner_id)
        .require_mutable(RESOURCE, id)?;

    // The service hangs off the accepted offer.
    if offer.status == OfferStatus::Accepted {
        return Err(ApiError::validation("An accepted offer cannot be deleted"));
    }

    offer_db::delete_offer(db, id).await?;
    tracing::info!(offer_id = %id, "Service offer deleted");

    Ok(())
}
