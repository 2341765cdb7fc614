//! # ClubHub Testing
//!
//! Testing utilities for the ClubHub event platform.
//!
//! This crate provides:
//! - In-memory implementations of the storage seams
//! - A recording notifier for asserting on dispatched messages
//! - A fixed clock for deterministic time
//! - Builders for common test fixtures
//!
//! ## Example
//!
//! ```
//! use clubhub_testing::{InMemoryEventRepository, builders::sample_event};
//! use clubhub_core::repository::EventRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = InMemoryEventRepository::new();
//! repo.insert_event(&sample_event("Robo Rally")).await?;
//! assert_eq!(repo.list_events().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use clubhub_core::environment::Clock;

pub mod builders;
pub mod repository_mocks;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use clubhub_testing::mocks::FixedClock;
    /// use clubhub_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use repository_mocks::{
    InMemoryDirectoryRepository, InMemoryEventRepository, RecordingNotifier,
};
