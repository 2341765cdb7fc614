//! Notification delivery for the HTTP layer.
//!
//! Providers implement the core [`Notifier`] trait; the [`Dispatcher`] wraps
//! one and hands every message to a background task. Delivery is best-effort:
//! failures are logged and counted, never surfaced to the request that
//! triggered them.

mod console;
mod webhook;

pub use console::ConsoleNotifier;
pub use webhook::WebhookNotifier;

use crate::metrics;
use clubhub_core::notify::{Notification, Notifier};
use std::sync::Arc;
use tracing::warn;

/// Fire-and-forget notification dispatch.
///
/// Cloned into the shared app state. [`Dispatcher::dispatch`] spawns the
/// send, so handlers return without waiting on the delivery channel.
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    /// Wrap a delivery provider.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Send one notification in the background.
    pub fn dispatch(&self, notification: Notification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let kind = notification.kind();
            match notifier.send(notification).await {
                Ok(()) => metrics::record_notification(kind, "delivered"),
                Err(error) => {
                    warn!(kind, %error, "Notification delivery failed");
                    metrics::record_notification(kind, "failed");
                }
            }
        });
    }
}

/// One-line human-readable body for a notification.
///
/// Shared by the console and webhook providers so both channels say the
/// same thing.
pub(crate) fn render_message(notification: &Notification) -> String {
    match notification {
        Notification::RegistrationConfirmed {
            event_title,
            team_name,
            amount_due,
            ..
        } => match team_name {
            Some(team) => format!(
                "Your registration for {event_title} is confirmed (team {team}). Amount due: {amount_due}"
            ),
            None => format!(
                "Your registration for {event_title} is confirmed. Amount due: {amount_due}"
            ),
        },
        Notification::WaitlistJoined {
            event_title,
            position,
            ..
        } => format!(
            "{event_title} is currently full; you are number {} on the waitlist",
            position + 1
        ),
        Notification::WaitlistPromoted { event_title, .. } => {
            format!("A spot opened up in {event_title}; your registration is now confirmed")
        }
        Notification::ProofSubmitted {
            event_title,
            utr,
            amount,
            ..
        } => format!(
            "We received your payment proof for {event_title} (ref {utr}, amount {amount}). It is awaiting verification"
        ),
        Notification::ProofAwaitingReview {
            event_title,
            submitter,
            utr,
            amount,
        } => format!(
            "{submitter} submitted payment proof for {event_title} (ref {utr}, amount {amount})"
        ),
        Notification::PaymentVerified { event_title, .. } => {
            format!("Your payment for {event_title} has been verified")
        }
        Notification::PaymentRejected {
            event_title,
            reason,
            ..
        } => match reason {
            Some(reason) => {
                format!("Your payment for {event_title} was rejected: {reason}")
            }
            None => format!("Your payment for {event_title} was rejected"),
        },
    }
}
