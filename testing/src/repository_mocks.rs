//! In-memory repository and notifier doubles
//!
//! Fast, deterministic stand-ins for the storage and notification seams:
//! - [`InMemoryEventRepository`]: `HashMap`-backed event documents with the
//!   same version-check semantics as the PostgreSQL repository
//! - [`InMemoryDirectoryRepository`]: sponsor/team lists in vectors
//! - [`RecordingNotifier`]: captures notifications for assertions

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning cannot happen in these tests

use async_trait::async_trait;
use clubhub_core::error::{DomainError, Result};
use clubhub_core::notify::{Notification, Notifier};
use clubhub_core::repository::{DirectoryRepository, EventRepository};
use clubhub_core::types::{
    Event, EventId, PaymentLog, Sponsor, SponsorId, TeamMember, TeamMemberId,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory event repository for fast, deterministic testing.
///
/// Mirrors the PostgreSQL repository's contract, including the optimistic
/// version check in `update_event`, so concurrency tests behave the same
/// against either backend.
///
/// # Example
///
/// ```
/// use clubhub_testing::InMemoryEventRepository;
/// use clubhub_testing::builders::sample_event;
/// use clubhub_core::repository::EventRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryEventRepository::new();
/// let event = sample_event("Robo Rally");
/// repo.insert_event(&event).await?;
/// assert_eq!(repo.fetch_event(event.id).await?.title, "Robo Rally");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<EventId, Event>>>,
    logs: Arc<RwLock<Vec<PaymentLog>>>,
}

impl InMemoryEventRepository {
    /// Create a new empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Whether no events are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().unwrap().is_empty()
    }

    /// All stored payment log entries, oldest first (for assertions)
    #[must_use]
    pub fn all_logs(&self) -> Vec<PaymentLog> {
        self.logs.read().unwrap().clone()
    }

    /// Remove everything (for test isolation)
    pub fn clear(&self) {
        self.events.write().unwrap().clear();
        self.logs.write().unwrap().clear();
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.events
            .write()
            .unwrap()
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn fetch_event(&self, id: EventId) -> Result<Event> {
        self.events
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(DomainError::EventNotFound { id })
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read().unwrap().values().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn update_event(&self, event: &mut Event) -> Result<()> {
        let mut events = self.events.write().unwrap();
        let stored = events
            .get(&event.id)
            .ok_or(DomainError::EventNotFound { id: event.id })?;
        if stored.version != event.version {
            return Err(DomainError::VersionConflict);
        }
        event.version += 1;
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<()> {
        self.events
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::EventNotFound { id })
    }

    async fn append_payment_log(&self, entry: &PaymentLog) -> Result<()> {
        self.logs.write().unwrap().push(entry.clone());
        Ok(())
    }

    async fn payment_logs(&self, event_id: EventId) -> Result<Vec<PaymentLog>> {
        Ok(self
            .logs
            .read()
            .unwrap()
            .iter()
            .filter(|l| l.event_id == event_id)
            .cloned()
            .collect())
    }
}

/// In-memory sponsor/team directory for testing.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectoryRepository {
    sponsors: Arc<RwLock<Vec<Sponsor>>>,
    team_members: Arc<RwLock<Vec<TeamMember>>>,
}

impl InMemoryDirectoryRepository {
    /// Create a new empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn list_sponsors(&self) -> Result<Vec<Sponsor>> {
        let mut sponsors = self.sponsors.read().unwrap().clone();
        sponsors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sponsors)
    }

    async fn insert_sponsor(&self, sponsor: &Sponsor) -> Result<()> {
        self.sponsors.write().unwrap().push(sponsor.clone());
        Ok(())
    }

    async fn delete_sponsor(&self, id: SponsorId) -> Result<()> {
        let mut sponsors = self.sponsors.write().unwrap();
        let before = sponsors.len();
        sponsors.retain(|s| s.id != id);
        if sponsors.len() == before {
            return Err(DomainError::SponsorNotFound { id });
        }
        Ok(())
    }

    async fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        let mut members = self.team_members.read().unwrap().clone();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(members)
    }

    async fn insert_team_member(&self, member: &TeamMember) -> Result<()> {
        self.team_members.write().unwrap().push(member.clone());
        Ok(())
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> Result<()> {
        let mut members = self.team_members.write().unwrap();
        let before = members.len();
        members.retain(|m| m.id != id);
        if members.len() == before {
            return Err(DomainError::TeamMemberNotFound { id });
        }
        Ok(())
    }
}

/// Notifier that records every message instead of delivering it.
///
/// Construct with [`RecordingNotifier::failing`] to simulate a channel that
/// rejects every send.
///
/// # Example
///
/// ```
/// use clubhub_testing::RecordingNotifier;
/// use clubhub_core::notify::{Notification, Notifier};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let notifier = RecordingNotifier::new();
/// notifier
///     .send(Notification::WaitlistPromoted {
///         to: "asha@club.dev".to_string(),
///         event_title: "Robo Rally".to_string(),
///     })
///     .await?;
/// assert_eq!(notifier.kinds(), vec!["waitlist_promoted"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
    should_succeed: bool,
}

impl RecordingNotifier {
    /// Create a notifier whose sends succeed
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a notifier whose sends all fail
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// Everything sent so far, in order
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.read().unwrap().clone()
    }

    /// Kinds of everything sent so far, in order
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.sent.read().unwrap().iter().map(Notification::kind).collect()
    }

    /// Number of messages sent
    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    /// Forget recorded messages (for test isolation)
    pub fn clear(&self) {
        self.sent.write().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        self.sent.write().unwrap().push(notification);
        if self.should_succeed {
            Ok(())
        } else {
            Err(DomainError::NotificationFailed {
                message: "recording notifier set to fail".to_string(),
            })
        }
    }
}
