use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Offer status stored as a lowercase string in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "request_inactive")]
    RequestInactive,
}

/// Something that happens to an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferEvent {
    /// The caregiver edits the offer or re-offers after a rejection.
    Resubmit,
    /// The request owner picks this offer.
    Accept,
    /// The request owner turns this offer down.
    Reject,
    /// The parent request stopped accepting offers.
    RequestClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {event} to an offer that is {from}")]
pub struct TransitionError {
    pub from: OfferStatus,
    pub event: OfferEvent,
}

impl OfferStatus {
    /// The single transition table for offers.
    ///
    /// ```text
    /// pending          --Accept-->        accepted
    /// pending          --Reject-->        rejected
    /// pending|rejected --Resubmit-->      pending
    /// any but accepted --RequestClosed--> request_inactive
    /// ```
    ///
    /// `accepted` and `request_inactive` are terminal for every other event.
    pub fn transition(self, event: OfferEvent) -> Result<OfferStatus, TransitionError> {
        use OfferEvent::*;
        use OfferStatus::*;

        match (self, event) {
            (Pending, Accept) => Ok(Accepted),
            (Pending, Reject) => Ok(Rejected),
            (Pending | Rejected, Resubmit) => Ok(Pending),
            (Pending | Rejected | RequestInactive, RequestClosed) => Ok(RequestInactive),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    /// Statuses in which the caregiver may still edit the offer.
    pub fn is_editable(self) -> bool {
        matches!(self, OfferStatus::Pending | OfferStatus::Rejected)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::RequestInactive => "request_inactive",
        };
        f.write_str(s)
    }
}

impl fmt::Display for OfferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferEvent::Resubmit => "resubmit",
            OfferEvent::Accept => "accept",
            OfferEvent::Reject => "reject",
            OfferEvent::RequestClosed => "request_closed",
        };
        f.write_str(s)
    }
}

/// SeaORM entity for the `service_offers` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub caregiver_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub message: String,
    pub status: OfferStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_requests::Entity",
        from = "Column::ServiceRequestId",
        to = "super::service_requests::Column::Id"
    )]
    ServiceRequest,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CaregiverId",
        to = "super::users::Column::Id"
    )]
    Caregiver,
    #[sea_orm(has_one = "super::services::Entity")]
    Service,
}

impl Related<super::service_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequest.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Caregiver.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceOffer {
    pub service_request: Uuid,
    #[validate(
        range(min = 0.01, max = 9999.99, message = "price must be between 0.01 and 9999.99"),
        custom = "two_decimal_places"
    )]
    pub price: f64,
    #[validate(length(min = 1, max = 500, message = "message must be 1-500 characters"))]
    pub message: String,
}

/// Partial update of an offer's terms. Status is never client-writable here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateServiceOffer {
    #[validate(
        range(min = 0.01, max = 9999.99, message = "price must be between 0.01 and 9999.99"),
        custom = "two_decimal_places"
    )]
    pub price: Option<f64>,
    #[validate(length(min = 1, max = 500, message = "message must be 1-500 characters"))]
    pub message: Option<String>,
}

/// Prices are stored as money: at most two digits after the decimal point.
fn two_decimal_places(price: f64) -> Result<(), ValidationError> {
    let cents = price * 100.0;
    if (cents.round() - cents).abs() < 1e-6 {
        Ok(())
    } else {
        let mut err = ValidationError::new("decimal_places");
        err.message = Some("price must have at most 2 decimal places".into());
        Err(err)
    }
}

/// The decisions a request owner can take on an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferDecision {
    Accepted,
    Rejected,
}

/// Body of `PUT /api/service-offers/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOfferStatus {
    pub status: OfferDecision,
}

/// Query parameters accepted by `GET /api/service-offers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferListQuery {
    pub service_request: Option<Uuid>,
    pub status: Option<OfferStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceOfferResponse {
    pub id: Uuid,
    pub service_request: Uuid,
    pub caregiver: Uuid,
    pub caregiver_username: Option<String>,
    pub price: f64,
    pub message: String,
    pub status: OfferStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ServiceOfferResponse {
    pub fn new(m: Model, caregiver_username: Option<String>) -> Self {
        Self {
            id: m.id,
            service_request: m.service_request_id,
            caregiver: m.caregiver_id,
            caregiver_username,
            price: m.price,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OfferEvent::*;
    use super::OfferStatus::*;
    use super::*;

    #[test]
    fn pending_offer_can_be_accepted_rejected_or_resubmitted() {
        assert_eq!(Pending.transition(Accept), Ok(Accepted));
        assert_eq!(Pending.transition(Reject), Ok(Rejected));
        assert_eq!(Pending.transition(Resubmit), Ok(Pending));
    }

    #[test]
    fn rejected_offer_returns_to_pending_on_resubmit() {
        assert_eq!(Rejected.transition(Resubmit), Ok(Pending));
        assert!(Rejected.transition(Accept).is_err());
        assert!(Rejected.transition(Reject).is_err());
    }

    #[test]
    fn closing_the_request_forces_request_inactive() {
        assert_eq!(Pending.transition(RequestClosed), Ok(RequestInactive));
        assert_eq!(Rejected.transition(RequestClosed), Ok(RequestInactive));
        assert_eq!(RequestInactive.transition(RequestClosed), Ok(RequestInactive));
    }

    #[test]
    fn accepted_and_request_inactive_are_terminal() {
        for event in [Resubmit, Accept, Reject, RequestClosed] {
            assert_eq!(
                Accepted.transition(event),
                Err(TransitionError {
                    from: Accepted,
                    event
                })
            );
        }
        for event in [Resubmit, Accept, Reject] {
            assert!(RequestInactive.transition(event).is_err());
        }
    }

    #[test]
    fn only_pending_and_rejected_are_editable() {
        assert!(Pending.is_editable());
        assert!(Rejected.is_editable());
        assert!(!Accepted.is_editable());
        assert!(!RequestInactive.is_editable());
    }

    #[test]
    fn transition_error_names_state_and_event() {
        let err = Accepted.transition(Reject).unwrap_err();
        assert_eq!(err.to_string(), "cannot apply reject to an offer that is accepted");
    }

    #[test]
    fn price_allows_at_most_two_decimal_places() {
        let offer = |price: f64| CreateServiceOffer {
            service_request: Uuid::new_v4(),
            price,
            message: "I can help".into(),
        };

        assert!(offer(49.99).validate().is_ok());
        assert!(offer(50.0).validate().is_ok());
        assert!(offer(0.1).validate().is_ok());
        assert!(offer(49.999).validate().is_err());

        let edit = UpdateServiceOffer {
            price: Some(12.345),
            message: None,
        };
        assert!(edit.validate().is_err());
        assert!(UpdateServiceOffer::default().validate().is_ok());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&RequestInactive).unwrap(),
            "\"request_inactive\""
        );
    }
}
