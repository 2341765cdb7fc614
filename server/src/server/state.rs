//! Application state for the ClubHub HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Event repository (documents and payment logs)
//! - Directory repository (sponsors and club team)
//! - Notification dispatcher
//! - Clock

use crate::notify::Dispatcher;
use clubhub_core::environment::Clock;
use clubhub_core::repository::{DirectoryRepository, EventRepository};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This struct contains all the dependencies needed by the API endpoints.
/// It's cloned (cheaply via Arc) for each request. There is no other shared
/// mutable state; everything an operation touches travels through the
/// repositories behind these seams.
#[derive(Clone)]
pub struct AppState {
    /// Event document storage (events, registrations, payment logs)
    pub events: Arc<dyn EventRepository>,

    /// Sponsor and club team storage
    pub directory: Arc<dyn DirectoryRepository>,

    /// Fire-and-forget notification dispatch
    pub notify: Dispatcher,

    /// Clock used for registration and payment timestamps
    pub clock: Arc<dyn Clock>,

    /// Static bearer key guarding admin endpoints; `None` rejects everything
    pub admin_key: Option<String>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// - `events`: Event document storage
    /// - `directory`: Sponsor and club team storage
    /// - `notify`: Notification dispatcher
    /// - `clock`: Source of timestamps
    /// - `admin_key`: Static admin bearer key, when configured
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        directory: Arc<dyn DirectoryRepository>,
        notify: Dispatcher,
        clock: Arc<dyn Clock>,
        admin_key: Option<String>,
    ) -> Self {
        Self {
            events,
            directory,
            notify,
            clock,
            admin_key,
        }
    }
}
