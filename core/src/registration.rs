//! Registration rules: validation, capacity placement, and coupon redemption.
//!
//! These functions are pure over the event document. Nothing is persisted
//! here; callers load the event, apply the rules, and write the document back
//! in one piece, so a failed check leaves no partial state behind.

use crate::error::{DomainError, Result};
use crate::types::{CouponDiscount, Event, Member, Registration, RegistrationId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Where a new registration landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Accepted into the confirmed list
    Confirmed {
        /// Position in the confirmed list
        index: usize,
    },
    /// Capacity was full; parked on the waitlist
    Waitlisted {
        /// Position in the waitlist
        position: usize,
    },
}

impl Placement {
    /// Whether the registration went to the waitlist
    #[must_use]
    pub const fn is_waitlisted(&self) -> bool {
        matches!(self, Self::Waitlisted { .. })
    }
}

/// Rejects registrations when the event is not accepting them.
///
/// # Errors
///
/// Returns [`DomainError::RegistrationClosed`] when `registration_open` is off.
pub const fn ensure_registration_open(event: &Event) -> Result<()> {
    if event.registration_open {
        Ok(())
    } else {
        Err(DomainError::RegistrationClosed)
    }
}

/// Validates an incoming member list against the event.
///
/// Checks run in order and stop at the first failure:
/// 1. the list is non-empty and the primary member has a name and a usable
///    email;
/// 2. the member count fits the event's team size bounds;
/// 3. no member's email or id number is already present on the event's
///    confirmed registrations or waitlist.
///
/// # Errors
///
/// Returns a validation error for rule 1-2 failures and a conflict error
/// ([`DomainError::DuplicateEmail`] / [`DomainError::DuplicateIdNumber`]) for
/// rule 3.
pub fn validate_members(event: &Event, members: &[Member]) -> Result<()> {
    let Some(primary) = members.first() else {
        return Err(DomainError::EmptyMemberList);
    };

    if primary.name.trim().is_empty() {
        return Err(DomainError::InvalidPrimaryMember {
            reason: "a name is required".to_string(),
        });
    }
    let has_usable_email = primary
        .normalized_email()
        .is_some_and(|email| email.contains('@'));
    if !has_usable_email {
        return Err(DomainError::InvalidPrimaryMember {
            reason: "a valid email is required".to_string(),
        });
    }

    let (min, max) = event.team_size_bounds();
    let actual = u32::try_from(members.len()).unwrap_or(u32::MAX);
    if actual < min || actual > max {
        return Err(DomainError::TeamSizeOutOfBounds { min, max, actual });
    }

    let mut known_emails: HashSet<String> = HashSet::new();
    let mut known_ids: HashSet<String> = HashSet::new();
    for existing in event.all_registrations() {
        for member in &existing.members {
            if let Some(email) = member.normalized_email() {
                known_emails.insert(email);
            }
            if let Some(id) = member.normalized_id_number() {
                known_ids.insert(id);
            }
        }
    }

    for member in members {
        if let Some(email) = member.normalized_email() {
            if known_emails.contains(&email) {
                return Err(DomainError::DuplicateEmail { email });
            }
        }
        if let Some(id) = member.normalized_id_number() {
            if known_ids.contains(&id) {
                return Err(DomainError::DuplicateIdNumber { id_number: id });
            }
        }
    }

    Ok(())
}

/// Appends a validated registration to the event, respecting capacity.
///
/// A full event (capacity > 0 and the confirmed list at capacity) sends the
/// registration to the waitlist; otherwise it is confirmed. Capacity 0 means
/// unlimited.
pub fn place(event: &mut Event, registration: Registration) -> Placement {
    if event.is_full() {
        event.waitlist.push(registration);
        Placement::Waitlisted {
            position: event.waitlist.len() - 1,
        }
    } else {
        event.registrations.push(registration);
        Placement::Confirmed {
            index: event.registrations.len() - 1,
        }
    }
}

/// Removes a registration from the event, promoting the oldest waitlist
/// entry into the freed spot when there is one.
///
/// Promotion only happens when a confirmed registration leaves and the
/// event has room afterwards; cancelling a waitlisted entry never promotes.
/// Returns the removed registration and the promoted one, if any.
///
/// # Errors
///
/// Returns [`DomainError::RegistrationNotFound`] when the id is on neither
/// list.
pub fn cancel(
    event: &mut Event,
    id: RegistrationId,
) -> Result<(Registration, Option<Registration>)> {
    if let Some(index) = event.registrations.iter().position(|r| r.id == id) {
        let removed = event.registrations.remove(index);
        let promoted = if event.waitlist.is_empty() || event.is_full() {
            None
        } else {
            let next = event.waitlist.remove(0);
            event.registrations.push(next.clone());
            Some(next)
        };
        return Ok((removed, promoted));
    }
    if let Some(index) = event.waitlist.iter().position(|r| r.id == id) {
        return Ok((event.waitlist.remove(index), None));
    }
    Err(DomainError::RegistrationNotFound)
}

/// Redeems a coupon code on the event, counting the use.
///
/// The increment lands in the same document write as the registration that
/// used it, so a failed registration never consumes a redemption.
///
/// # Errors
///
/// Returns [`DomainError::InvalidCoupon`] when the code is unknown, outside
/// its validity window, or at its redemption cap.
pub fn redeem_coupon(
    event: &mut Event,
    code: &str,
    now: DateTime<Utc>,
) -> Result<CouponDiscount> {
    let Some(coupon) = event.find_coupon_mut(code) else {
        return Err(DomainError::InvalidCoupon {
            reason: format!("unknown code {}", code.trim()),
        });
    };
    if !coupon.is_valid_at(now) {
        return Err(DomainError::InvalidCoupon {
            reason: "not valid at this time".to_string(),
        });
    }
    if coupon.is_exhausted() {
        return Err(DomainError::InvalidCoupon {
            reason: "usage limit reached".to_string(),
        });
    }
    coupon.used_count += 1;
    Ok(coupon.discount)
}
