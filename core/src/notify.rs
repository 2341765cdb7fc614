//! Notification dispatch seam.
//!
//! Services describe what happened with a [`Notification`] and hand it to a
//! [`Notifier`]. Delivery is best-effort: callers spawn the send, log
//! failures, and never retry or fail the request over it.

use crate::error::Result;
use crate::types::Money;
use async_trait::async_trait;

/// A message to a participant or organizer.
///
/// Variants carry everything a template needs; providers decide how to
/// render and where to deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A registration was confirmed.
    RegistrationConfirmed {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
        /// Team name, when one was given
        team_name: Option<String>,
        /// Amount the registration owes
        amount_due: Money,
    },
    /// The event was full; the signup landed on the waitlist.
    WaitlistJoined {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
        /// Zero-based position on the waitlist
        position: usize,
    },
    /// A spot opened up and a waitlisted signup was promoted.
    WaitlistPromoted {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
    },
    /// The participant's payment proof was received.
    ProofSubmitted {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
        /// Transaction reference on the proof
        utr: String,
        /// Amount recorded on the proof
        amount: Money,
    },
    /// A proof is waiting for admin review (organizer copy).
    ProofAwaitingReview {
        /// Event title
        event_title: String,
        /// Primary contact of the submitting registration
        submitter: String,
        /// Transaction reference on the proof
        utr: String,
        /// Amount recorded on the proof
        amount: Money,
    },
    /// The payment was verified.
    PaymentVerified {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
    },
    /// The payment was rejected.
    PaymentRejected {
        /// Recipient email (primary contact)
        to: String,
        /// Event title
        event_title: String,
        /// Reason shown to the participant
        reason: Option<String>,
    },
}

impl Notification {
    /// Short name used in logs and metrics labels
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RegistrationConfirmed { .. } => "registration_confirmed",
            Self::WaitlistJoined { .. } => "waitlist_joined",
            Self::WaitlistPromoted { .. } => "waitlist_promoted",
            Self::ProofSubmitted { .. } => "proof_submitted",
            Self::ProofAwaitingReview { .. } => "proof_awaiting_review",
            Self::PaymentVerified { .. } => "payment_verified",
            Self::PaymentRejected { .. } => "payment_rejected",
        }
    }

    /// Recipient address, when the message targets a participant
    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        match self {
            Self::RegistrationConfirmed { to, .. }
            | Self::WaitlistJoined { to, .. }
            | Self::WaitlistPromoted { to, .. }
            | Self::ProofSubmitted { to, .. }
            | Self::PaymentVerified { to, .. }
            | Self::PaymentRejected { to, .. } => Some(to),
            Self::ProofAwaitingReview { .. } => None,
        }
    }
}

/// Notification delivery.
///
/// This trait abstracts over delivery channels (console output in
/// development, an HTTP webhook in production, a recorder in tests).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotificationFailed` when the channel rejects the
    /// message; callers log and move on.
    async fn send(&self, notification: Notification) -> Result<()>;
}
