//! Application services - orchestration between HTTP handlers and the domain.
//!
//! Services coordinate one operation end to end:
//! 1. Load the event document
//! 2. Apply the core business rules
//! 3. Write the document back through the version check
//! 4. Append audit entries and dispatch notifications after the write sticks

pub mod payments;
pub mod registration;

pub use payments::{PaymentService, PendingPayment};
pub use registration::{NewRegistration, RegistrationService};
