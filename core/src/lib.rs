//! # ClubHub Core
//!
//! Domain types and business rules for the ClubHub event platform.
//!
//! Everything here is deterministic and free of I/O: pricing, registration
//! validation and placement, the payment proof state machine, and the trait
//! seams (storage, notifications, clock) the HTTP layer plugs concrete
//! implementations into.
//!
//! ## Core Concepts
//!
//! - **Event document**: one event plus its registrations and waitlist,
//!   read and written as a unit with an optimistic concurrency version
//! - **Quote**: subtotal, multi-event discount, coupon discount, total
//! - **Payment workflow**: `Pending -> Submitted -> {Verified, Rejected}`,
//!   with `Rejected -> Submitted` resubmission and `Verified` terminal
//! - **Payment log**: append-only audit trail of payment actions
//!
//! ## Example
//!
//! ```
//! use clubhub_core::pricing::{self, Quote};
//! use clubhub_core::types::Money;
//!
//! let prices = [
//!     Money::from_units(100),
//!     Money::from_units(150),
//!     Money::from_units(200),
//! ];
//! let quote: Quote = pricing::quote(&prices, None);
//! assert_eq!(quote.total, Money::from_units(360));
//! ```

pub mod environment;
pub mod error;
pub mod notify;
pub mod payment;
pub mod pricing;
pub mod registration;
pub mod repository;
pub mod types;

pub use error::{DomainError, Result};
