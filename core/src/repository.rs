//! Storage trait seams.
//!
//! The HTTP layer talks to storage through these traits so handlers can run
//! against PostgreSQL in production and an in-memory double in tests. Traits
//! are object-safe (`Arc<dyn EventRepository>` lives in the shared app state).

use crate::error::Result;
use crate::types::{Event, EventId, PaymentLog, Sponsor, SponsorId, TeamMember, TeamMemberId};
use async_trait::async_trait;

/// Event document storage.
///
/// Events are stored as whole documents with an optimistic concurrency
/// version. `update_event` is the only write path for existing documents and
/// enforces the version check.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a freshly created event document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    async fn insert_event(&self, event: &Event) -> Result<()>;

    /// Fetch one event document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EventNotFound` if no document has this id, or
    /// `DomainError::Storage` if the query fails.
    async fn fetch_event(&self, id: EventId) -> Result<Event>;

    /// List all event documents, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the query fails.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Write back a mutated event document.
    ///
    /// The write only applies when the stored version still equals
    /// `event.version`; on success the version in `event` is bumped to match
    /// storage. A version miss means a concurrent writer won.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VersionConflict` on a version miss,
    /// `DomainError::EventNotFound` if the document vanished, or
    /// `DomainError::Storage` if the write fails.
    async fn update_event(&self, event: &mut Event) -> Result<()>;

    /// Delete an event document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EventNotFound` if no document has this id, or
    /// `DomainError::Storage` if the delete fails.
    async fn delete_event(&self, id: EventId) -> Result<()>;

    // ═══════════════════════════════════════════════════════════════════════
    // Payment Log (append-only)
    // ═══════════════════════════════════════════════════════════════════════

    /// Append one payment log entry. Entries are never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    async fn append_payment_log(&self, entry: &PaymentLog) -> Result<()>;

    /// All payment log entries for an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the query fails.
    async fn payment_logs(&self, event_id: EventId) -> Result<Vec<PaymentLog>>;
}

/// Sponsor and club team directories.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// All sponsors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the query fails.
    async fn list_sponsors(&self) -> Result<Vec<Sponsor>>;

    /// Add a sponsor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    async fn insert_sponsor(&self, sponsor: &Sponsor) -> Result<()>;

    /// Remove a sponsor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SponsorNotFound` if no sponsor has this id, or
    /// `DomainError::Storage` if the delete fails.
    async fn delete_sponsor(&self, id: SponsorId) -> Result<()>;

    /// All club team members, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the query fails.
    async fn list_team_members(&self) -> Result<Vec<TeamMember>>;

    /// Add a club team member.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the insert fails.
    async fn insert_team_member(&self, member: &TeamMember) -> Result<()>;

    /// Remove a club team member.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TeamMemberNotFound` if no member has this id, or
    /// `DomainError::Storage` if the delete fails.
    async fn delete_team_member(&self, id: TeamMemberId) -> Result<()>;
}
