use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr};
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::service_offers::{self, OfferStatus};
use crate::models::service_requests::{
    self, CreateServiceRequest, OfferCounts, Ordering, ServiceRequestListQuery,
    UpdateServiceRequest,
};

/// Insert a new, active service request owned by `owner_id`.
pub async fn insert_request<C: ConnectionTrait>(
    db: &C,
    input: CreateServiceRequest,
    owner_id: Uuid,
) -> Result<service_requests::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_request = service_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        pet_type: Set(input.pet_type),
        pet_breed: Set(input.pet_breed),
        location: Set(input.location),
        description: Set(input.description),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_request.insert(db).await
}

/// Fetch a single service request by ID.
pub async fn get_request_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<service_requests::Model>, DbErr> {
    service_requests::Entity::find_by_id(id).one(db).await
}

fn lower_col(column: service_requests::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((service_requests::Entity, column))))
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn icontains(column: service_requests::Column, needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Condition::all().add(lower_col(column).like(LikeExpr::new(pattern).escape('\\')))
}

fn iexact(column: service_requests::Column, value: &str) -> Condition {
    Condition::all().add(lower_col(column).eq(value.to_lowercase()))
}

/// List service requests, optionally restricted to one owner, with the
/// filters, search and ordering of `query` applied.
pub async fn list_requests<C: ConnectionTrait>(
    db: &C,
    owner_id: Option<Uuid>,
    query: &ServiceRequestListQuery,
    ordering: Ordering,
) -> Result<Vec<service_requests::Model>, DbErr> {
    let mut condition = Condition::all();

    if let Some(owner_id) = owner_id {
        condition = condition.add(service_requests::Column::OwnerId.eq(owner_id));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(service_requests::Column::IsActive.eq(is_active));
    }
    if let Some(location) = query.location.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(icontains(service_requests::Column::Location, location));
    }
    if let Some(pet_breed) = query.pet_breed.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(icontains(service_requests::Column::PetBreed, pet_breed));
    }
    if let Some(pet_type) = query.pet_type.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(iexact(service_requests::Column::PetType, pet_type));
    }
    if let Some(start_date) = query.start_date {
        condition = condition.add(service_requests::Column::StartDate.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        condition = condition.add(service_requests::Column::EndDate.lte(end_date));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        // Every search term has to match at least one of the searchable columns.
        for term in search.split_whitespace() {
            condition = condition.add(
                Condition::any()
                    .add(icontains(service_requests::Column::PetType, term))
                    .add(icontains(service_requests::Column::PetBreed, term))
                    .add(icontains(service_requests::Column::Location, term))
                    .add(icontains(service_requests::Column::Description, term)),
            );
        }
    }

    let order = if ordering.descending {
        Order::Desc
    } else {
        Order::Asc
    };

    service_requests::Entity::find()
        .filter(condition)
        .order_by(ordering.column(), order.clone())
        .order_by(service_requests::Column::Id, order)
        .all(db)
        .await
}

/// Apply a partial update to the descriptive fields of a request.
/// `is_active` is handled separately by [`deactivate_request`].
pub async fn update_request<C: ConnectionTrait>(
    db: &C,
    request: service_requests::Model,
    input: UpdateServiceRequest,
) -> Result<service_requests::Model, DbErr> {
    let mut active: service_requests::ActiveModel = request.into();

    if let Some(start_date) = input.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = input.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(pet_type) = input.pet_type {
        active.pet_type = Set(pet_type);
    }
    if let Some(pet_breed) = input.pet_breed {
        active.pet_breed = Set(pet_breed);
    }
    if let Some(location) = input.location {
        active.location = Set(location);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Flip an active request to inactive. Returns the number of rows changed,
/// so a concurrent deactivation shows up as `0`.
pub async fn deactivate_request<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let result = service_requests::Entity::update_many()
        .col_expr(service_requests::Column::IsActive, Expr::value(false))
        .col_expr(
            service_requests::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(service_requests::Column::Id.eq(id))
        .filter(service_requests::Column::IsActive.eq(true))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete a service request by ID (offers cascade).
pub async fn delete_request<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    service_requests::Entity::delete_by_id(id).exec(db).await
}

/// Pending and total offer counts for many requests in one query.
pub async fn offer_counts<C: ConnectionTrait>(
    db: &C,
    request_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, OfferCounts>, DbErr> {
    if request_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let offers = service_offers::Entity::find()
        .filter(service_offers::Column::ServiceRequestId.is_in(request_ids))
        .all(db)
        .await?;

    let mut counts: HashMap<Uuid, OfferCounts> = HashMap::new();
    for offer in offers {
        let entry = counts.entry(offer.service_request_id).or_default();
        entry.total += 1;
        if offer.status == OfferStatus::Pending {
            entry.pending += 1;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("new york"), "new york");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
