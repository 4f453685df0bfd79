use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `services` table.
///
/// A service is the accepted pairing of one request with one of its offers.
/// Rows are only written by offer acceptance and never updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub service_request_id: Uuid,
    #[sea_orm(unique)]
    pub accepted_offer_id: Uuid,
    pub date_accepted: DateTimeUtc,
    pub has_happened: bool,
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
        belongs_to = "super::service_offers::Entity",
        from = "Column::AcceptedOfferId",
        to = "super::service_offers::Column::Id"
    )]
    AcceptedOffer,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::service_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequest.def()
    }
}

impl Related<super::service_offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcceptedOffer.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The two participants of a service, read through its request and offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceParties {
    pub pet_owner: Uuid,
    pub caregiver: Uuid,
}

impl ServiceParties {
    pub fn is_user_involved(&self, user_id: Uuid) -> bool {
        user_id == self.pet_owner || user_id == self.caregiver
    }

    /// The participant on the other side from `user_id`, if `user_id` is one.
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.pet_owner {
            Some(self.caregiver)
        } else if user_id == self.caregiver {
            Some(self.pet_owner)
        } else {
            None
        }
    }
}

// ── DTOs ──

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub service_request: Uuid,
    pub accepted_offer: Uuid,
    pub pet_owner: Uuid,
    pub caregiver: Uuid,
    pub date_accepted: DateTimeUtc,
    pub has_happened: bool,
}

impl ServiceResponse {
    pub fn new(m: Model, parties: ServiceParties) -> Self {
        Self {
            id: m.id,
            service_request: m.service_request_id,
            accepted_offer: m.accepted_offer_id,
            pet_owner: parties.pet_owner,
            caregiver: parties.caregiver,
            date_accepted: m.date_accepted,
            has_happened: m.has_happened,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterpart_is_the_other_participant() {
        let parties = ServiceParties {
            pet_owner: Uuid::new_v4(),
            caregiver: Uuid::new_v4(),
        };

        assert_eq!(parties.counterpart_of(parties.pet_owner), Some(parties.caregiver));
        assert_eq!(parties.counterpart_of(parties.caregiver), Some(parties.pet_owner));
        assert_eq!(parties.counterpart_of(Uuid::new_v4()), None);
        assert!(parties.is_user_involved(parties.caregiver));
        assert!(!parties.is_user_involved(Uuid::new_v4()));
    }
}
