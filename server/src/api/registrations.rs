//! Registration API endpoints.
//!
//! - POST /events/:id/register - Sign up for an event
//! - POST /events/:id/register-multiple - Sign up for a bundle of sub-events
//! - DELETE /events/:id/registrations/:registration_id - Cancel a
//!   registration, promoting the oldest waitlist entry (admin)

use crate::app::{NewRegistration, RegistrationService};
use crate::error::AppError;
use crate::extractors::AdminKey;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clubhub_core::pricing::Quote;
use clubhub_core::registration::Placement;
use clubhub_core::types::{Event, EventId, Member, RegistrationId, SubEventId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register for an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Team name (team events)
    #[serde(default)]
    pub team_name: Option<String>,
    /// Country the team registers from
    #[serde(default)]
    pub country: Option<String>,
    /// Participants; the first entry is the primary contact
    pub members: Vec<Member>,
    /// Organizer-asserted flag that payment was already collected
    #[serde(default)]
    pub paid: bool,
    /// External payment reference, when one exists up front
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Coupon code to redeem
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Response after a registration attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Human-readable outcome
    pub message: String,
    /// `success` for a confirmed spot, `waitlist` for the overflow queue
    pub status: &'static str,
    /// Id of the new registration
    pub registration_id: RegistrationId,
    /// The updated event document
    pub event: Event,
}

/// Request to register for a selection of sub-events in one signup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMultipleRequest {
    /// Sub-event ids the signup covers
    pub selected_sub_events: Vec<Uuid>,
    /// Team name (team events)
    #[serde(default)]
    pub team_name: Option<String>,
    /// Country the team registers from
    #[serde(default)]
    pub country: Option<String>,
    /// Participants; the first entry is the primary contact
    pub members: Vec<Member>,
    /// Organizer-asserted flag that payment was already collected
    #[serde(default)]
    pub paid: bool,
    /// External payment reference, when one exists up front
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Coupon code to redeem
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Response after a multi-sub-event registration attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMultipleResponse {
    /// Human-readable outcome
    pub message: String,
    /// `success` for a confirmed spot, `waitlist` for the overflow queue
    pub status: &'static str,
    /// Id of the new registration
    pub registration_id: RegistrationId,
    /// Group id stamped on the signup
    pub multi_event_group_id: Option<Uuid>,
    /// Price breakdown behind the amount due
    pub pricing: Quote,
    /// The updated event document
    pub event: Event,
}

/// Response after cancelling a registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    /// Human-readable outcome
    pub message: String,
    /// Registration promoted off the waitlist, when a spot freed up
    pub promoted_registration_id: Option<RegistrationId>,
}

fn service(state: &AppState) -> RegistrationService {
    RegistrationService::new(state.events.clone(), state.notify.clone(), state.clock.clone())
}

fn placement_summary(placement: Placement) -> (&'static str, String) {
    match placement {
        Placement::Confirmed { .. } => ("success", "Registration confirmed".to_string()),
        Placement::Waitlisted { position } => (
            "waitlist",
            format!(
                "Event is full; added to the waitlist at position {}",
                position + 1
            ),
        ),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Register for an event.
///
/// Public endpoint. A full event sends the signup to the waitlist; a free
/// event marks it paid and verified immediately.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/register \
///   -H "Content-Type: application/json" \
///   -d '{
///     "teamName": "Null Pointers",
///     "members": [
///       {"name": "Asha Iyer", "email": "asha@club.dev", "idNumber": "CB21-042"},
///       {"name": "Ravi Menon"}
///     ],
///     "couponCode": "EARLYBIRD"
///   }'
/// ```
pub async fn register(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let outcome = service(&state)
        .register(
            EventId::from_uuid(event_id),
            NewRegistration {
                team_name: request.team_name,
                country: request.country,
                members: request.members,
                coupon_code: request.coupon_code,
                paid: request.paid,
                payment_id: request.payment_id,
            },
        )
        .await?;

    let (status, message) = placement_summary(outcome.placement);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message,
            status,
            registration_id: outcome.registration_id,
            event: outcome.event,
        }),
    ))
}

/// Register for a selection of sub-events in one signup.
///
/// Public endpoint. The selection is priced as a bundle: the multi-event
/// tier discount applies to the subtotal and any coupon applies on top.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/register-multiple \
///   -H "Content-Type: application/json" \
///   -d '{
///     "selectedSubEvents": [
///       "9f1c7c4e-8a30-4a6c-9a75-0e6f4f6f2d11",
///       "3d2b1a09-54cb-4f4d-8291-2c3a6df0b7aa"
///     ],
///     "members": [{"name": "Asha Iyer", "email": "asha@club.dev"}]
///   }'
/// ```
pub async fn register_multiple(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<RegisterMultipleRequest>,
) -> Result<(StatusCode, Json<RegisterMultipleResponse>), AppError> {
    let selected: Vec<SubEventId> = request
        .selected_sub_events
        .into_iter()
        .map(SubEventId::from_uuid)
        .collect();

    let outcome = service(&state)
        .register_multiple(
            EventId::from_uuid(event_id),
            NewRegistration {
                team_name: request.team_name,
                country: request.country,
                members: request.members,
                coupon_code: request.coupon_code,
                paid: request.paid,
                payment_id: request.payment_id,
            },
            selected,
        )
        .await?;

    let (status, message) = placement_summary(outcome.placement);
    Ok((
        StatusCode::CREATED,
        Json(RegisterMultipleResponse {
            message,
            status,
            registration_id: outcome.registration_id,
            multi_event_group_id: outcome.multi_event_group_id,
            pricing: outcome.quote,
            event: outcome.event,
        }),
    ))
}

/// Cancel a registration.
///
/// Requires the admin bearer key. Removing a confirmed registration promotes
/// the oldest waitlist entry into the freed spot and notifies it.
///
/// # Example
///
/// ```bash
/// curl -X DELETE \
///   http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/registrations/7f000001-0000-4000-8000-000000000001 \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn cancel_registration(
    _admin: AdminKey,
    Path((event_id, registration_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<Json<CancelResponse>, AppError> {
    let outcome = service(&state)
        .cancel(
            EventId::from_uuid(event_id),
            RegistrationId::from_uuid(registration_id),
        )
        .await?;

    Ok(Json(CancelResponse {
        message: "Registration cancelled".to_string(),
        promoted_registration_id: outcome.promoted_registration_id,
    }))
}
