//! Business metrics for the ClubHub server.
//!
//! This module provides Prometheus metrics for tracking business operations:
//! - Registrations (confirmed, waitlisted, cancelled, promoted)
//! - Payments (submitted, verified, rejected, reset, revenue)
//! - Notifications (dispatched by kind)
//! - Events (created)
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `clubhub_registrations_total{status}` - Total registrations by placement
//! - `clubhub_payment_actions_total{action}` - Total payment workflow actions
//! - `clubhub_payment_revenue_units_total` - Total verified revenue in currency units
//! - `clubhub_notifications_total{kind, outcome}` - Notifications by kind and outcome
//! - `clubhub_events_created_total` - Total events created

use metrics::describe_counter;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_business_metrics() {
    // Registration metrics
    describe_counter!(
        "clubhub_registrations_total",
        "Total number of registrations by placement (confirmed, waitlisted, cancelled, promoted)"
    );

    // Payment metrics
    describe_counter!(
        "clubhub_payment_actions_total",
        "Total number of payment workflow actions (submitted, verified, rejected, reset)"
    );
    describe_counter!(
        "clubhub_payment_revenue_units_total",
        "Total revenue from verified payments in whole currency units"
    );

    // Notification metrics
    describe_counter!(
        "clubhub_notifications_total",
        "Total number of dispatched notifications by kind and outcome"
    );

    // Event metrics
    describe_counter!(
        "clubhub_events_created_total",
        "Total number of events created"
    );

    tracing::info!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a registration placement.
///
/// # Arguments
///
/// * `status` - Where the registration landed ("confirmed" or "waitlisted")
pub fn record_registration(status: &'static str) {
    metrics::counter!("clubhub_registrations_total", "status" => status).increment(1);
    tracing::debug!(status, "Recorded registration metric");
}

/// Record a registration cancellation.
pub fn record_registration_cancelled() {
    metrics::counter!("clubhub_registrations_total", "status" => "cancelled").increment(1);
    tracing::debug!("Recorded registration_cancelled metric");
}

/// Record a waitlist promotion.
pub fn record_waitlist_promotion() {
    metrics::counter!("clubhub_registrations_total", "status" => "promoted").increment(1);
    tracing::debug!("Recorded waitlist_promotion metric");
}

/// Record a payment workflow action.
///
/// # Arguments
///
/// * `action` - The workflow action ("submitted", "verified", "rejected", "reset")
pub fn record_payment_action(action: &'static str) {
    metrics::counter!("clubhub_payment_actions_total", "action" => action).increment(1);
    tracing::debug!(action, "Recorded payment_action metric");
}

/// Record revenue from a verified payment.
///
/// # Arguments
///
/// * `amount_units` - Verified amount in whole currency units
pub fn record_payment_verified_revenue(amount_units: u64) {
    metrics::counter!("clubhub_payment_revenue_units_total").increment(amount_units);
    tracing::debug!(amount_units, "Recorded payment revenue metric");
}

/// Record a dispatched notification.
///
/// # Arguments
///
/// * `kind` - Notification kind (e.g. "registration_confirmed")
/// * `outcome` - "delivered" or "failed"
pub fn record_notification(kind: &'static str, outcome: &'static str) {
    metrics::counter!("clubhub_notifications_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
    tracing::debug!(kind, outcome, "Recorded notification metric");
}

/// Record an event created.
pub fn record_event_created() {
    metrics::counter!("clubhub_events_created_total").increment(1);
    tracing::debug!("Recorded event_created metric");
}
