//! Per-resource authorization policy.
//!
//! Each policy maps the caller and the facts about one row to a
//! [`Capability`]. The same rule holds for every resource: a row the caller
//! cannot see answers 404, a row they can see but not change answers 403.

use uuid::Uuid;

use crate::auth::Identity;
use crate::errors::ApiError;
use crate::models::services::ServiceParties;
use crate::models::{messages, reviews, service_offers, service_requests};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    None,
    Visible,
    Mutable,
}

impl Capability {
    pub fn require_visible(self, what: &str, id: Uuid) -> Result<(), ApiError> {
        match self {
            Capability::None => Err(ApiError::not_found(format!("{what} {id} not found"))),
            Capability::Visible | Capability::Mutable => Ok(()),
        }
    }

    pub fn require_mutable(self, what: &str, id: Uuid) -> Result<(), ApiError> {
        match self {
            Capability::None => Err(ApiError::not_found(format!("{what} {id} not found"))),
            Capability::Visible => Err(ApiError::forbidden(format!(
                "You do not have permission to modify {what} {id}"
            ))),
            Capability::Mutable => Ok(()),
        }
    }
}

/// Staff and the owner may change a request; caregivers browse all of them;
/// other pet owners never see it.
pub fn service_request(identity: &Identity, request: &service_requests::Model) -> Capability {
    if identity.is_staff() || request.owner_id == identity.user_id {
        Capability::Mutable
    } else if identity.is_caregiver() {
        Capability::Visible
    } else {
        Capability::None
    }
}

/// Staff and the bidding caregiver may change an offer; the owner of the
/// request it targets may read it.
pub fn service_offer(
    identity: &Identity,
    offer: &service_offers::Model,
    request_owner_id: Uuid,
) -> Capability {
    if identity.is_staff() || offer.caregiver_id == identity.user_id {
        Capability::Mutable
    } else if request_owner_id == identity.user_id {
        Capability::Visible
    } else {
        Capability::None
    }
}

/// Services are derived rows; nobody edits them through the API.
/// Accepting or rejecting an offer belongs to the request owner, not to the
/// caregiver who made it.
pub fn offer_decision(
    identity: &Identity,
    offer: &service_offers::Model,
    request_owner_id: Uuid,
) -> Capability {
    if identity.is_staff() || request_owner_id == identity.user_id {
        Capability::Mutable
    } else if offer.caregiver_id == identity.user_id {
        Capability::Visible
    } else {
        Capability::None
    }
}

pub fn service(identity: &Identity, parties: &ServiceParties) -> Capability {
    if identity.is_staff() || parties.is_user_involved(identity.user_id) {
        Capability::Visible
    } else {
        Capability::None
    }
}

pub fn review(identity: &Identity, review: &reviews::Model) -> Capability {
    if review.reviewer_id == identity.user_id {
        Capability::Mutable
    } else if review.reviewee_id == identity.user_id {
        Capability::Visible
    } else {
        Capability::None
    }
}

/// The only mutation on a message is the recipient marking it read.
pub fn message(identity: &Identity, message: &messages::Model) -> Capability {
    if message.recipient_id == identity.user_id {
        Capability::Mutable
    } else if message.sender_id == identity.user_id {
        Capability::Visible
    } else {
        Capability::None
    }
}

pub fn user(identity: &Identity, user_id: Uuid) -> Capability {
    if identity.is_staff() || identity.user_id == user_id {
        Capability::Mutable
    } else {
        Capability::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::service_offers::OfferStatus;
    use crate::models::users::Roles;
    use chrono::{NaiveDate, Utc};

    fn who(role: Roles) -> Identity {
        Identity::new(Uuid::new_v4(), role)
    }

    fn request_owned_by(owner_id: Uuid) -> service_requests::Model {
        service_requests::Model {
            id: Uuid::new_v4(),
            owner_id,
            start_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            pet_type: "Dog".into(),
            pet_breed: "Labrador".into(),
            location: "New York".into(),
            description: "Need dog sitting".into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn offer_by(caregiver_id: Uuid) -> service_offers::Model {
        service_offers::Model {
            id: Uuid::new_v4(),
            service_request_id: Uuid::new_v4(),
            caregiver_id,
            price: 50.0,
            message: "I can take care of your dog".into(),
            status: OfferStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn request_policy() {
        let owner = who(Roles::PetOwner);
        let request = request_owned_by(owner.user_id);

        assert_eq!(service_request(&owner, &request), Capability::Mutable);
        assert_eq!(service_request(&who(Roles::Staff), &request), Capability::Mutable);
        assert_eq!(service_request(&who(Roles::Caregiver), &request), Capability::Visible);
        assert_eq!(service_request(&who(Roles::PetOwner), &request), Capability::None);
    }

    #[test]
    fn offer_policy() {
        let caregiver = who(Roles::Caregiver);
        let owner = who(Roles::PetOwner);
        let offer = offer_by(caregiver.user_id);

        assert_eq!(service_offer(&caregiver, &offer, owner.user_id), Capability::Mutable);
        assert_eq!(service_offer(&who(Roles::Staff), &offer, owner.user_id), Capability::Mutable);
        assert_eq!(service_offer(&owner, &offer, owner.user_id), Capability::Visible);
        assert_eq!(service_offer(&who(Roles::Caregiver), &offer, owner.user_id), Capability::None);
    }

    #[test]
    fn only_the_request_owner_decides_on_an_offer() {
        let caregiver = who(Roles::Caregiver);
        let owner = who(Roles::PetOwner);
        let offer = offer_by(caregiver.user_id);

        assert_eq!(offer_decision(&owner, &offer, owner.user_id), Capability::Mutable);
        assert_eq!(offer_decision(&who(Roles::Staff), &offer, owner.user_id), Capability::Mutable);
        assert_eq!(offer_decision(&caregiver, &offer, owner.user_id), Capability::Visible);
        assert_eq!(offer_decision(&who(Roles::PetOwner), &offer, owner.user_id), Capability::None);
    }

    #[test]
    fn service_policy_is_read_only() {
        let parties = ServiceParties {
            pet_owner: Uuid::new_v4(),
            caregiver: Uuid::new_v4(),
        };
        let owner = Identity::new(parties.pet_owner, Roles::PetOwner);

        assert_eq!(service(&owner, &parties), Capability::Visible);
        assert_eq!(service(&who(Roles::Staff), &parties), Capability::Visible);
        assert_eq!(service(&who(Roles::Caregiver), &parties), Capability::None);
    }

    #[test]
    fn hidden_rows_are_404_and_read_only_rows_are_403() {
        let id = Uuid::new_v4();

        let hidden = Capability::None.require_mutable("Review", id).unwrap_err();
        assert!(matches!(hidden, ApiError::NotFound(_)));

        let read_only = Capability::Visible.require_mutable("Review", id).unwrap_err();
        assert!(matches!(read_only, ApiError::Forbidden(_)));

        assert!(Capability::Visible.require_visible("Review", id).is_ok());
        assert!(Capability::Mutable.require_mutable("Review", id).is_ok());
    }
}
