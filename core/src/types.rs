//! Domain types for the ClubHub event platform.
//!
//! This module contains the value objects and entities shared by every layer:
//! identifiers, money, events with their registrations and waitlists, payment
//! proofs, the append-only payment log, and the sponsor/team directories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a sub-event within a parent event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubEventId(Uuid);

impl SubEventId {
    /// Creates a new random `SubEventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SubEventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registration
///
/// Registrations are addressed by this id in the API; the positional index
/// inside the event document is reported for convenience only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random `RegistrationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RegistrationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a payment log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentLogId(Uuid);

impl PaymentLogId {
    /// Creates a new random `PaymentLogId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PaymentLogId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PaymentLogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a sponsor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SponsorId(Uuid);

impl SponsorId {
    /// Creates a new random `SponsorId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SponsorId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SponsorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SponsorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a club team member
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMemberId(Uuid);

impl TeamMemberId {
    /// Creates a new random `TeamMemberId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TeamMemberId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TeamMemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeamMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (smallest currency unit, no floating point)
// ============================================================================

/// Represents money in the smallest currency unit to avoid floating-point
/// arithmetic errors.
///
/// Serializes as a bare integer, so an event priced at 100 units appears as
/// `"price": 100` on the wire and in stored documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from smallest currency units
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in smallest currency units
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two money amounts, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts two money amounts (returns `None` if the result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// Subtracts two money amounts, clamping at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Takes a percentage of the amount, rounding down.
    ///
    /// Percentages above 100 are clamped to 100, so the result never exceeds
    /// the original amount.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn percent(self, percent: u32) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self((self.0 as u128 * percent as u128 / 100) as u64)
    }

    /// Returns the smaller of two amounts
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Members and Registration Types
// ============================================================================

/// A participant listed on a registration.
///
/// The first member of a registration is the primary contact: it must carry a
/// name and a usable email. Additional members may omit contact details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Full name
    pub name: String,
    /// Contact email (required for the primary member)
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// College/institution id number
    #[serde(default)]
    pub id_number: Option<String>,
}

impl Member {
    /// Email lowercased and trimmed, for duplicate comparison
    #[must_use]
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
    }

    /// Id number trimmed, for duplicate comparison
    #[must_use]
    pub fn normalized_id_number(&self) -> Option<String> {
        self.id_number
            .as_deref()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
    }
}

/// How participants sign up for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    /// Exactly one participant
    Solo,
    /// Exactly two participants
    Duo,
    /// A team within the event's configured size bounds
    Team,
}

// ============================================================================
// Payments
// ============================================================================

/// Verification state of a registration's payment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No proof submitted yet
    Pending,
    /// Proof submitted, awaiting admin review
    Submitted,
    /// Approved by an admin (terminal)
    Verified,
    /// Rejected by an admin; the participant may resubmit
    Rejected,
}

/// Proof of payment uploaded by a participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    /// Screenshot payload (data URI or storage key)
    pub screenshot: String,
    /// Bank UTR / transaction reference
    pub utr: String,
    /// When the participant says the transfer happened
    pub transaction_date: DateTime<Utc>,
    /// Amount the participant claims to have paid
    pub amount_paid: Money,
    /// Account or app the transfer was made from
    #[serde(default)]
    pub paid_from: Option<String>,
    /// Free-form notes from the participant
    #[serde(default)]
    pub user_notes: Option<String>,
    /// When the proof was submitted
    pub submitted_at: DateTime<Utc>,
}

/// Payment channels an event accepts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    /// UPI id shown to participants
    #[serde(default)]
    pub upi_id: Option<String>,
    /// Display name on the UPI account
    #[serde(default)]
    pub upi_name: Option<String>,
    /// Bank transfer details (account/IFSC), free-form
    #[serde(default)]
    pub bank_details: Option<String>,
    /// Whether cash is accepted at the venue
    #[serde(default)]
    pub accepts_cash: bool,
}

// ============================================================================
// Coupons and Sub-Events
// ============================================================================

/// Discount carried by a coupon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CouponDiscount {
    /// Percentage off the amount remaining after the multi-event discount
    Percent(u32),
    /// Fixed amount off
    Flat(Money),
}

/// A discount code configured on an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Code participants type in (matched case-insensitively)
    pub code: String,
    /// Discount applied when the coupon is accepted
    pub discount: CouponDiscount,
    /// Start of the validity window (open start when `None`)
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// End of the validity window (open end when `None`)
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Redemption cap; 0 means unlimited
    #[serde(default)]
    pub max_uses: u32,
    /// Redemptions so far
    #[serde(default)]
    pub used_count: u32,
}

impl Coupon {
    /// Whether the coupon's validity window covers `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(from) = self.valid_from {
            if now < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if now > until {
                return false;
            }
        }
        true
    }

    /// Whether the redemption cap has been reached
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.max_uses > 0 && self.used_count >= self.max_uses
    }
}

/// An individually priced competition inside a parent event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEvent {
    /// Unique sub-event identifier
    pub id: SubEventId,
    /// Sub-event title
    pub title: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Price per registration for this sub-event
    pub price: Money,
}

// ============================================================================
// Registrations
// ============================================================================

/// A confirmed or waitlisted signup stored inside an event document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Stable identifier used by the API
    pub id: RegistrationId,
    /// Team name (team events)
    #[serde(default)]
    pub team_name: Option<String>,
    /// Country the team registered from
    #[serde(default)]
    pub country: Option<String>,
    /// Participants; the first entry is the primary contact
    pub members: Vec<Member>,
    /// Whether payment is settled (free events and verified payments)
    pub paid: bool,
    /// Free-text payment reference provided at registration time
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Verification state of the payment
    pub payment_status: PaymentStatus,
    /// Uploaded payment proof, if any
    #[serde(default)]
    pub payment_proof: Option<PaymentProof>,
    /// Quoted amount for this registration
    pub amount_due: Money,
    /// Coupon code redeemed at registration time
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Groups the registrations created by one multi-event signup
    #[serde(default)]
    pub multi_event_group_id: Option<Uuid>,
    /// Sub-events covered by this registration
    #[serde(default)]
    pub selected_sub_events: Vec<SubEventId>,
    /// When the payment was verified
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    /// Admin who verified the payment
    #[serde(default)]
    pub verified_by: Option<String>,
    /// Reason given on rejection
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// When the registration was created
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// The primary contact (first member)
    #[must_use]
    pub fn primary_member(&self) -> Option<&Member> {
        self.members.first()
    }

    /// The primary contact's normalized email
    #[must_use]
    pub fn primary_email(&self) -> Option<String> {
        self.primary_member().and_then(Member::normalized_email)
    }

    /// UTR of the stored proof, if any
    #[must_use]
    pub fn proof_utr(&self) -> Option<&str> {
        self.payment_proof.as_ref().map(|p| p.utr.as_str())
    }
}

// ============================================================================
// Events
// ============================================================================

/// An event document: configuration plus its registrations and waitlist.
///
/// The whole document is read, mutated, and written back as a unit. `version`
/// implements optimistic concurrency: storage only applies an update when the
/// stored version still matches, so concurrent writers cannot silently
/// overwrite each other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,
    /// Optimistic concurrency version, bumped on every successful write
    pub version: u64,
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
    /// Price per registration; 0 makes the event free
    pub price: Money,
    /// Payment channels shown to participants
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Discount codes configured for this event
    #[serde(default)]
    pub coupons: Vec<Coupon>,
    /// Individually priced sub-events
    #[serde(default)]
    pub sub_events: Vec<SubEvent>,
    /// Whether new registrations are accepted
    pub registration_open: bool,
    /// Confirmed registrations, in arrival order
    #[serde(default)]
    pub registrations: Vec<Registration>,
    /// Overflow beyond capacity, in arrival order
    #[serde(default)]
    pub waitlist: Vec<Registration>,
    /// When the event was created
    pub created_at: DateTime<Utc>,
    /// When the event was last modified
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Allowed team size range for this event's registration type
    #[must_use]
    pub fn team_size_bounds(&self) -> (u32, u32) {
        match self.registration_type {
            RegistrationType::Solo => (1, 1),
            RegistrationType::Duo => (2, 2),
            RegistrationType::Team => {
                let min = if self.min_team_size == 0 { 1 } else { self.min_team_size };
                let max = if self.max_team_size == 0 {
                    u32::MAX
                } else if self.max_team_size < min {
                    min
                } else {
                    self.max_team_size
                };
                (min, max)
            }
        }
    }

    /// Whether confirmed registrations have reached capacity
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.registrations.len() >= self.capacity as usize
    }

    /// All signups, confirmed first, then the waitlist
    pub fn all_registrations(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter().chain(self.waitlist.iter())
    }

    /// Looks up a confirmed registration by id
    #[must_use]
    pub fn find_registration(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    /// Looks up a confirmed registration by id, mutably
    pub fn find_registration_mut(&mut self, id: RegistrationId) -> Option<&mut Registration> {
        self.registrations.iter_mut().find(|r| r.id == id)
    }

    /// Position of a confirmed registration in arrival order
    #[must_use]
    pub fn registration_index(&self, id: RegistrationId) -> Option<usize> {
        self.registrations.iter().position(|r| r.id == id)
    }

    /// Finds the confirmed registration whose primary contact has this email
    /// (case-insensitive)
    #[must_use]
    pub fn registration_index_by_email(&self, email: &str) -> Option<usize> {
        let needle = email.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.registrations
            .iter()
            .position(|r| r.primary_email().is_some_and(|e| e == needle))
    }

    /// Looks up a sub-event by id
    #[must_use]
    pub fn find_sub_event(&self, id: SubEventId) -> Option<&SubEvent> {
        self.sub_events.iter().find(|s| s.id == id)
    }

    /// Looks up a coupon by code, case-insensitively, mutably
    pub fn find_coupon_mut(&mut self, code: &str) -> Option<&mut Coupon> {
        let needle = code.trim().to_lowercase();
        self.coupons
            .iter_mut()
            .find(|c| c.code.trim().to_lowercase() == needle)
    }
}

// ============================================================================
// Payment Log
// ============================================================================

/// Action recorded in the payment log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentAction {
    /// A participant submitted proof of payment
    Submitted,
    /// An admin approved the payment
    Verified,
    /// An admin rejected the payment
    Rejected,
    /// An admin returned the payment to pending
    Reset,
}

impl fmt::Display for PaymentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Reset => "reset",
        };
        write!(f, "{s}")
    }
}

/// Append-only audit record of a payment action.
///
/// Log rows are never updated or deleted; corrections append new rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLog {
    /// Unique log entry identifier
    pub id: PaymentLogId,
    /// Event the registration belongs to
    pub event_id: EventId,
    /// Registration the action applies to
    pub registration_id: RegistrationId,
    /// What happened
    pub action: PaymentAction,
    /// Amount involved, when known
    #[serde(default)]
    pub amount: Option<Money>,
    /// UTR involved, when known
    #[serde(default)]
    pub utr: Option<String>,
    /// Who performed the action (participant email or admin name)
    pub actor: String,
    /// Extra context, e.g. a rejection reason
    #[serde(default)]
    pub note: Option<String>,
    /// When the action happened
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Directory Entities
// ============================================================================

/// A sponsor displayed on the club site
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    /// Unique sponsor identifier
    pub id: SponsorId,
    /// Sponsor name
    pub name: String,
    /// Sponsorship tier (e.g. "gold")
    #[serde(default)]
    pub tier: Option<String>,
    /// Sponsor website
    #[serde(default)]
    pub website: Option<String>,
    /// Logo image URL
    #[serde(default)]
    pub logo_url: Option<String>,
    /// When the sponsor was added
    pub created_at: DateTime<Utc>,
}

/// A club team member displayed on the club site
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Unique team member identifier
    pub id: TeamMemberId,
    /// Member name
    pub name: String,
    /// Role in the club (e.g. "Design Lead")
    #[serde(default)]
    pub role: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Profile photo URL
    #[serde(default)]
    pub photo_url: Option<String>,
    /// When the member was added
    pub created_at: DateTime<Utc>,
}
