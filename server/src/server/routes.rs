//! Router configuration for the ClubHub server.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{directory, events, payments, registrations};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks
/// - Event management (admin writes, public reads)
/// - Registration endpoints
/// - Payment proof and verification endpoints
/// - Sponsor and club team directory
///
/// Admin endpoints are guarded by the [`crate::extractors::AdminKey`]
/// extractor rather than a separate router layer.
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
///
/// # Returns
///
/// Configured Axum router ready to serve requests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Event management
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Registration
        .route("/events/:id/register", post(registrations::register))
        .route(
            "/events/:id/register-multiple",
            post(registrations::register_multiple),
        )
        .route(
            "/events/:id/registrations/:registration_id",
            delete(registrations::cancel_registration),
        )
        // Payment workflow
        .route(
            "/events/:id/submit-payment-proof",
            post(payments::submit_payment_proof),
        )
        .route(
            "/events/:id/verify-payment/:registration_id",
            post(payments::verify_payment),
        )
        .route(
            "/events/:id/reset-payment/:registration_id",
            post(payments::reset_payment),
        )
        .route(
            "/events/:id/pending-payments",
            get(payments::pending_payments),
        )
        .route("/events/:id/payment-logs", get(payments::payment_logs))
        // Directory
        .route(
            "/sponsors",
            get(directory::list_sponsors).post(directory::create_sponsor),
        )
        .route("/sponsors/:id", delete(directory::delete_sponsor))
        .route(
            "/team-members",
            get(directory::list_team_members).post(directory::create_team_member),
        )
        .route("/team-members/:id", delete(directory::delete_team_member))
        .layer(TraceLayer::new_for_http())
        // The public endpoints are called from the club site in a browser
        .layer(CorsLayer::permissive())
        .with_state(state)
}
