use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::service_offers::{self, CreateServiceOffer, OfferListQuery, OfferStatus};
use crate::models::service_requests;

/// Whose offers a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferScope {
    All,
    /// Offers submitted by this caregiver.
    Caregiver(Uuid),
    /// Offers made against requests owned by this user.
    RequestOwner(Uuid),
}

/// Insert a new pending offer.
pub async fn insert_offer<C: ConnectionTrait>(
    db: &C,
    input: CreateServiceOffer,
    caregiver_id: Uuid,
) -> Result<service_offers::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_offer = service_offers::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_request_id: Set(input.service_request),
        caregiver_id: Set(caregiver_id),
        price: Set(input.price),
        message: Set(input.message),
        status: Set(OfferStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_offer.insert(db).await
}

/// Fetch a single offer by ID.
pub async fn get_offer_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<service_offers::Model>, DbErr> {
    service_offers::Entity::find_by_id(id).one(db).await
}

/// Find the offer a caregiver already made on a request, if any.
pub async fn find_offer_for_request_and_caregiver<C: ConnectionTrait>(
    db: &C,
    service_request_id: Uuid,
    caregiver_id: Uuid,
) -> Result<Option<service_offers::Model>, DbErr> {
    service_offers::Entity::find()
        .filter(service_offers::Column::ServiceRequestId.eq(service_request_id))
        .filter(service_offers::Column::CaregiverId.eq(caregiver_id))
        .one(db)
        .await
}

/// List offers within `scope`, newest first.
pub async fn list_offers<C: ConnectionTrait>(
    db: &C,
    scope: OfferScope,
    query: &OfferListQuery,
) -> Result<Vec<service_offers::Model>, DbErr> {
    let mut select = service_offers::Entity::find();

    match scope {
        OfferScope::All => {}
        OfferScope::Caregiver(caregiver_id) => {
            select = select.filter(service_offers::Column::CaregiverId.eq(caregiver_id));
        }
        OfferScope::RequestOwner(owner_id) => {
            select = select
                .inner_join(service_requests::Entity)
                .filter(service_requests::Column::OwnerId.eq(owner_id));
        }
    }

    if let Some(service_request_id) = query.service_request {
        select = select.filter(service_offers::Column::ServiceRequestId.eq(service_request_id));
    }
    if let Some(status) = query.status {
        select = select.filter(service_offers::Column::Status.eq(status));
    }

    select
        .order_by_desc(service_offers::Column::CreatedAt)
        .order_by_desc(service_offers::Column::Id)
        .all(db)
        .await
}

/// Overwrite price/message (when given) and set the resulting status.
pub async fn update_offer<C: ConnectionTrait>(
    db: &C,
    offer: service_offers::Model,
    price: Option<f64>,
    message: Option<String>,
    status: OfferStatus,
) -> Result<service_offers::Model, DbErr> {
    let mut active: service_offers::ActiveModel = offer.into();

    if let Some(price) = price {
        active.price = Set(price);
    }
    if let Some(message) = message {
        active.message = Set(message);
    }
    active.status = Set(status);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Move an offer from `from` to `to` only if it is still in `from`.
/// Returns the number of rows changed; `0` means someone else got there first.
pub async fn set_offer_status_if<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: OfferStatus,
    to: OfferStatus,
) -> Result<u64, DbErr> {
    let result = service_offers::Entity::update_many()
        .col_expr(service_offers::Column::Status, Expr::value(to))
        .col_expr(
            service_offers::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(service_offers::Column::Id.eq(id))
        .filter(service_offers::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Close every still-open offer on a request, optionally sparing one
/// (the accepted offer).
pub async fn close_offers_for_request<C: ConnectionTrait>(
    db: &C,
    service_request_id: Uuid,
    except: Option<Uuid>,
) -> Result<u64, DbErr> {
    let mut update = service_offers::Entity::update_many()
        .col_expr(
            service_offers::Column::Status,
            Expr::value(OfferStatus::RequestInactive),
        )
        .col_expr(
            service_offers::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(service_offers::Column::ServiceRequestId.eq(service_request_id))
        .filter(
            service_offers::Column::Status.is_in([OfferStatus::Pending, OfferStatus::Rejected]),
        );

    if let Some(except) = except {
        update = update.filter(service_offers::Column::Id.ne(except));
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected)
}

/// Delete an offer by ID.
pub async fn delete_offer<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    service_offers::Entity::delete_by_id(id).exec(db).await
}
