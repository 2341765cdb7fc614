//! API endpoints for the ClubHub server.
//!
//! This module contains all HTTP API handlers organized by domain:
//! - Events: CRUD operations for events
//! - Registrations: signing up, multi-sub-event signups, cancellation
//! - Payments: proof submission, verification, audit views
//! - Directory: sponsors and the club team

pub mod directory;
pub mod events;
pub mod payments;
pub mod registrations;

pub use directory::{
    create_sponsor, create_team_member, delete_sponsor, delete_team_member, list_sponsors,
    list_team_members,
};
pub use events::{create_event, delete_event, get_event, list_events, update_event};
pub use payments::{
    payment_logs, pending_payments, reset_payment, submit_payment_proof, verify_payment,
};
pub use registrations::{cancel_registration, register, register_multiple};
