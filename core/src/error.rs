//! Error types for event registration and payment operations.

use crate::types::{EventId, SponsorId, SubEventId, TeamMemberId};
use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Error taxonomy for the event platform.
///
/// Variants are grouped by how callers should treat them: bad input,
/// conflicting state, missing resources, or system failures. The HTTP layer
/// maps each group to a status code via the classifier methods below.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// Registration is closed on this event.
    #[error("Registration is closed for this event")]
    RegistrationClosed,

    /// A registration was submitted without any members.
    #[error("At least one member is required")]
    EmptyMemberList,

    /// The primary (first) member is missing required contact details.
    #[error("Primary member is invalid: {reason}")]
    InvalidPrimaryMember {
        /// What was missing or malformed
        reason: String,
    },

    /// Member count is outside the event's team size bounds.
    #[error("Team size {actual} is outside the allowed range {min}-{max}")]
    TeamSizeOutOfBounds {
        /// Minimum allowed members
        min: u32,
        /// Maximum allowed members
        max: u32,
        /// Members actually submitted
        actual: u32,
    },

    /// A coupon code was rejected.
    #[error("Coupon rejected: {reason}")]
    InvalidCoupon {
        /// Why the coupon was not accepted
        reason: String,
    },

    /// A multi-event registration selected no sub-events.
    #[error("At least one sub-event must be selected")]
    NoSubEventsSelected,

    /// Payment proof was submitted without a screenshot.
    #[error("A payment screenshot is required")]
    ScreenshotRequired,

    /// Payment proof was submitted without a transaction reference.
    #[error("A UTR / transaction reference is required")]
    UtrRequired,

    /// The verification request carried an unrecognized action.
    #[error("Unknown verification action: {action}")]
    UnknownAction {
        /// The action string received
        action: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Conflict Errors
    // ═══════════════════════════════════════════════════════════

    /// A member email is already present on this event.
    #[error("A member with email {email} is already registered for this event")]
    DuplicateEmail {
        /// The conflicting email (normalized)
        email: String,
    },

    /// A member id number is already present on this event.
    #[error("A member with id number {id_number} is already registered for this event")]
    DuplicateIdNumber {
        /// The conflicting id number
        id_number: String,
    },

    /// Proof was submitted while an earlier proof is still under review.
    #[error("A payment proof is already pending verification")]
    ProofPending,

    /// The payment was already verified; nothing further to do.
    #[error("Payment is already verified; no action needed")]
    AlreadyVerified,

    /// The UTR matches another registration's proof on the same event.
    #[error("UTR {utr} was already used by another registration")]
    DuplicateUtr {
        /// The conflicting transaction reference
        utr: String,
    },

    /// The event document changed under a concurrent writer.
    #[error("The event was modified concurrently; please retry")]
    VersionConflict,

    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════

    /// No event with this id.
    #[error("Event {id} not found")]
    EventNotFound {
        /// The missing event id
        id: EventId,
    },

    /// No registration matched the id or email given.
    #[error("Registration not found for this event")]
    RegistrationNotFound,

    /// No sub-event with this id on the event.
    #[error("Sub-event {id} not found on this event")]
    SubEventNotFound {
        /// The missing sub-event id
        id: SubEventId,
    },

    /// No sponsor with this id.
    #[error("Sponsor {id} not found")]
    SponsorNotFound {
        /// The missing sponsor id
        id: SponsorId,
    },

    /// No team member with this id.
    #[error("Team member {id} not found")]
    TeamMemberNotFound {
        /// The missing team member id
        id: TeamMemberId,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Storage operation failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Driver-level failure description
        message: String,
    },

    /// A notification could not be delivered.
    #[error("Notification delivery failed: {message}")]
    NotificationFailed {
        /// Provider-level failure description
        message: String,
    },
}

impl DomainError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clubhub_core::error::DomainError;
    /// assert!(DomainError::EmptyMemberList.is_validation());
    /// assert!(!DomainError::VersionConflict.is_validation());
    /// ```
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RegistrationClosed
                | Self::EmptyMemberList
                | Self::InvalidPrimaryMember { .. }
                | Self::TeamSizeOutOfBounds { .. }
                | Self::InvalidCoupon { .. }
                | Self::NoSubEventsSelected
                | Self::ScreenshotRequired
                | Self::UtrRequired
                | Self::UnknownAction { .. }
        )
    }

    /// Returns `true` if this error reflects a conflict with existing state.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clubhub_core::error::DomainError;
    /// assert!(DomainError::AlreadyVerified.is_conflict());
    /// assert!(!DomainError::EmptyMemberList.is_conflict());
    /// ```
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail { .. }
                | Self::DuplicateIdNumber { .. }
                | Self::ProofPending
                | Self::AlreadyVerified
                | Self::DuplicateUtr { .. }
                | Self::VersionConflict
        )
    }

    /// Returns `true` if this error means a resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound { .. }
                | Self::RegistrationNotFound
                | Self::SubEventNotFound { .. }
                | Self::SponsorNotFound { .. }
                | Self::TeamMemberNotFound { .. }
        )
    }

    /// Short machine-readable code for API error bodies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        if self.is_validation() {
            "validation_error"
        } else if self.is_not_found() {
            "not_found"
        } else if self.is_conflict() {
            "conflict"
        } else {
            "internal_error"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifiers_are_disjoint() {
        let samples = [
            DomainError::RegistrationClosed,
            DomainError::EmptyMemberList,
            DomainError::ProofPending,
            DomainError::AlreadyVerified,
            DomainError::VersionConflict,
            DomainError::RegistrationNotFound,
            DomainError::Storage {
                message: "connection reset".to_string(),
            },
        ];
        for error in samples {
            let buckets = [error.is_validation(), error.is_conflict(), error.is_not_found()];
            assert!(
                buckets.iter().filter(|b| **b).count() <= 1,
                "{error:?} landed in more than one bucket"
            );
        }
    }

    #[test]
    fn codes_match_buckets() {
        assert_eq!(DomainError::EmptyMemberList.code(), "validation_error");
        assert_eq!(DomainError::VersionConflict.code(), "conflict");
        assert_eq!(DomainError::RegistrationNotFound.code(), "not_found");
        assert_eq!(
            DomainError::Storage {
                message: "boom".to_string()
            }
            .code(),
            "internal_error"
        );
    }
}
