//! # ClubHub Server
//!
//! HTTP API server for the ClubHub event platform.
//!
//! The server is a thin shell around `clubhub-core`: handlers decode typed
//! request schemas, application services run the domain rules against the
//! PostgreSQL document store, and notifications go out fire-and-forget after
//! each write sticks.
//!
//! ## Layers
//!
//! - [`api`]: request/response schemas and Axum handlers
//! - [`app`]: application services orchestrating one operation end to end
//! - [`server`]: router, shared state, health endpoints
//! - [`notify`]: notification dispatch (console or webhook)
//! - [`config`], [`error`], [`extractors`], [`metrics`]: the supporting cast
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | GET | `/health`, `/ready` | none |
//! | GET | `/events`, `/events/:id` | none |
//! | POST | `/events` | admin |
//! | PUT, DELETE | `/events/:id` | admin |
//! | POST | `/events/:id/register`, `/events/:id/register-multiple` | none |
//! | DELETE | `/events/:id/registrations/:registration_id` | admin |
//! | POST | `/events/:id/submit-payment-proof` | none |
//! | POST | `/events/:id/verify-payment/:registration_id` | admin |
//! | POST | `/events/:id/reset-payment/:registration_id` | admin |
//! | GET | `/events/:id/pending-payments`, `/events/:id/payment-logs` | admin |
//! | GET | `/sponsors`, `/team-members` | none |
//! | POST, DELETE | `/sponsors`, `/team-members` | admin |

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod notify;
pub mod server;

pub use config::Config;
pub use error::AppError;
pub use server::{AppState, build_router};
