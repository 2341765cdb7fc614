//! Event management API endpoints.
//!
//! Provides CRUD operations for events:
//! - POST /events - Create a new event (admin)
//! - GET /events - List events, newest first
//! - GET /events/:id - Get the full event document
//! - PUT /events/:id - Update an event (admin, version-checked)
//! - DELETE /events/:id - Delete an event (admin)

use crate::error::AppError;
use crate::extractors::AdminKey;
use crate::metrics;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use clubhub_core::types::{
    Coupon, CouponDiscount, Event, EventId, Money, PaymentConfig, RegistrationType, SubEvent,
    SubEventId,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A sub-event to configure on an event. Ids are assigned server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEventSpec {
    /// Sub-event title
    pub title: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Price per registration, in smallest currency units
    pub price: u64,
}

/// A coupon to configure on an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSpec {
    /// Code participants type in
    pub code: String,
    /// Discount applied when the coupon is accepted
    pub discount: CouponDiscount,
    /// Start of the validity window
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Redemption cap; 0 means unlimited
    #[serde(default)]
    pub max_uses: u32,
}

/// Request to create a new event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event title
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Venue name
    #[serde(default)]
    pub venue: String,
    /// When the event starts
    pub starts_at: DateTime<Utc>,
    /// When the event ends
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Maximum confirmed registrations; 0 means unlimited
    #[serde(default)]
    pub capacity: u32,
    /// How participants sign up
    pub registration_type: RegistrationType,
    /// Minimum team size (team events)
    #[serde(default)]
    pub min_team_size: u32,
    /// Maximum team size (team events); 0 means unlimited
    #[serde(default)]
    pub max_team_size: u32,
    /// Price per registration, in smallest currency units; 0 makes the event free
    #[serde(default)]
    pub price: u64,
    /// Payment channels shown to participants
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Discount codes
    #[serde(default)]
    pub coupons: Vec<CouponSpec>,
    /// Individually priced sub-events
    #[serde(default)]
    pub sub_events: Vec<SubEventSpec>,
    /// Whether registrations open immediately (default: true)
    #[serde(default = "default_open")]
    pub registration_open: bool,
}

const fn default_open() -> bool {
    true
}

/// Request to update an event.
///
/// `version` must match the stored document; a stale version loses the
/// write with a conflict. Omitted fields are left unchanged. Sub-events are
/// fixed at creation because registrations reference them by id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// Version of the document this update was based on
    pub version: u64,
    /// Updated title
    pub title: Option<String>,
    /// Updated description
    pub description: Option<String>,
    /// Updated venue
    pub venue: Option<String>,
    /// Updated start time
    pub starts_at: Option<DateTime<Utc>>,
    /// Updated end time
    pub ends_at: Option<DateTime<Utc>>,
    /// Updated capacity
    pub capacity: Option<u32>,
    /// Updated registration type
    pub registration_type: Option<RegistrationType>,
    /// Updated minimum team size
    pub min_team_size: Option<u32>,
    /// Updated maximum team size
    pub max_team_size: Option<u32>,
    /// Updated price, in smallest currency units
    pub price: Option<u64>,
    /// Updated payment channels
    pub payment: Option<PaymentConfig>,
    /// Replacement coupon list; redemption counts carry over by code
    pub coupons: Option<Vec<CouponSpec>>,
    /// Open or close registration
    pub registration_open: Option<bool>,
}

/// Materialize coupon specs, carrying redemption counts over from any prior
/// coupon with the same code.
fn build_coupons(specs: Vec<CouponSpec>, prior: &[Coupon]) -> Vec<Coupon> {
    specs
        .into_iter()
        .map(|spec| {
            let needle = spec.code.trim().to_lowercase();
            let used_count = prior
                .iter()
                .find(|c| c.code.trim().to_lowercase() == needle)
                .map_or(0, |c| c.used_count);
            Coupon {
                code: spec.code,
                discount: spec.discount,
                valid_from: spec.valid_from,
                valid_until: spec.valid_until,
                max_uses: spec.max_uses,
                used_count,
            }
        })
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new event.
///
/// Requires the admin bearer key. Returns the stored document, including the
/// server-assigned event and sub-event ids.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events \
///   -H "Authorization: Bearer <admin_key>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "title": "Robo Rally 2026",
///     "venue": "Main Auditorium",
///     "startsAt": "2026-03-14T09:00:00Z",
///     "capacity": 60,
///     "registrationType": "team",
///     "minTeamSize": 2,
///     "maxTeamSize": 4,
///     "price": 250
///   }'
/// ```
pub async fn create_event(
    _admin: AdminKey,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::bad_request("Event title is required"));
    }

    let now = state.clock.now();
    let event = Event {
        id: EventId::new(),
        version: 1,
        title: request.title,
        description: request.description,
        venue: request.venue,
        starts_at: request.starts_at,
        ends_at: request.ends_at,
        capacity: request.capacity,
        registration_type: request.registration_type,
        min_team_size: request.min_team_size,
        max_team_size: request.max_team_size,
        price: Money::from_units(request.price),
        payment: request.payment,
        coupons: build_coupons(request.coupons, &[]),
        sub_events: request
            .sub_events
            .into_iter()
            .map(|spec| SubEvent {
                id: SubEventId::new(),
                title: spec.title,
                description: spec.description,
                price: Money::from_units(spec.price),
            })
            .collect(),
        registration_open: request.registration_open,
        registrations: Vec::new(),
        waitlist: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    state.events.insert_event(&event).await?;
    metrics::record_event_created();
    info!(event_id = %event.id, title = %event.title, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Get the full event document by id.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn get_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .events
        .fetch_event(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(event))
}

/// List all events, newest first.
///
/// Public endpoint - no authentication required.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events
/// ```
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.events.list_events().await?;
    Ok(Json(events))
}

/// Update an event.
///
/// Requires the admin bearer key. The request's `version` participates in
/// the write's version check, so an edit based on a stale read is rejected
/// with a conflict instead of clobbering newer state.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <admin_key>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "version": 3,
///     "title": "Robo Rally 2026 (Rescheduled)",
///     "registrationOpen": false
///   }'
/// ```
pub async fn update_event(
    _admin: AdminKey,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let mut event = state
        .events
        .fetch_event(EventId::from_uuid(event_id))
        .await?;

    event.version = request.version;
    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(AppError::bad_request("Event title is required"));
        }
        event.title = title;
    }
    if let Some(description) = request.description {
        event.description = description;
    }
    if let Some(venue) = request.venue {
        event.venue = venue;
    }
    if let Some(starts_at) = request.starts_at {
        event.starts_at = starts_at;
    }
    if let Some(ends_at) = request.ends_at {
        event.ends_at = Some(ends_at);
    }
    if let Some(capacity) = request.capacity {
        event.capacity = capacity;
    }
    if let Some(registration_type) = request.registration_type {
        event.registration_type = registration_type;
    }
    if let Some(min_team_size) = request.min_team_size {
        event.min_team_size = min_team_size;
    }
    if let Some(max_team_size) = request.max_team_size {
        event.max_team_size = max_team_size;
    }
    if let Some(price) = request.price {
        event.price = Money::from_units(price);
    }
    if let Some(payment) = request.payment {
        event.payment = payment;
    }
    if let Some(specs) = request.coupons {
        let prior = std::mem::take(&mut event.coupons);
        event.coupons = build_coupons(specs, &prior);
    }
    if let Some(open) = request.registration_open {
        event.registration_open = open;
    }

    event.updated_at = state.clock.now();
    state.events.update_event(&mut event).await?;
    info!(event_id = %event.id, version = event.version, "Event updated");

    Ok(Json(event))
}

/// Delete an event.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000 \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn delete_event(
    _admin: AdminKey,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = EventId::from_uuid(event_id);
    state.events.delete_event(id).await?;
    info!(event_id = %id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(code: &str, max_uses: u32) -> CouponSpec {
        CouponSpec {
            code: code.to_string(),
            discount: CouponDiscount::Percent(10),
            valid_from: None,
            valid_until: None,
            max_uses,
        }
    }

    #[test]
    fn coupon_counts_carry_over_by_code() {
        let prior = build_coupons(vec![spec("CLUB10", 5)], &[]);
        assert_eq!(prior[0].used_count, 0);

        let mut used = prior;
        used[0].used_count = 3;

        let rebuilt = build_coupons(vec![spec("club10", 10), spec("NEW", 0)], &used);
        assert_eq!(rebuilt[0].used_count, 3);
        assert_eq!(rebuilt[0].max_uses, 10);
        assert_eq!(rebuilt[1].used_count, 0);
    }
}
