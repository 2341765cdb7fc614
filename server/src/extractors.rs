//! Custom Axum extractors.
//!
//! This module contains the [`AdminKey`] extractor guarding organizer-only
//! endpoints. Handlers opt in by taking it as an argument; there is no
//! separate middleware layer.
//!
//! # Examples
//!
//! ```ignore
//! use clubhub_server::extractors::AdminKey;
//!
//! async fn verify_payment(
//!     _admin: AdminKey,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Response>, AppError> {
//!     // only reachable with a valid Authorization: Bearer <key> header
//! }
//! ```

use crate::error::AppError;
use crate::server::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Proof that the request carried the configured admin bearer key.
///
/// Compares `Authorization: Bearer <key>` against `ADMIN_API_KEY`. When no
/// key is configured the extractor rejects every request, so admin routes
/// are closed by default.
#[derive(Debug, Clone, Copy)]
pub struct AdminKey;

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_key.as_deref() else {
            return Err(AppError::unauthorized("Admin access is not configured"));
        };

        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match provided {
            Some(key) if key == expected => Ok(Self),
            _ => Err(AppError::unauthorized("A valid admin key is required")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::{ConsoleNotifier, Dispatcher};
    use axum::http::Request;
    use clubhub_testing::{InMemoryDirectoryRepository, InMemoryEventRepository, test_clock};
    use std::sync::Arc;

    fn state_with_key(key: Option<&str>) -> AppState {
        AppState::new(
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryDirectoryRepository::new()),
            Dispatcher::new(Arc::new(ConsoleNotifier::new())),
            Arc::new(test_clock()),
            key.map(str::to_string),
        )
    }

    async fn extract(state: &AppState, authorization: Option<&str>) -> Result<AdminKey, AppError> {
        let mut builder = Request::builder();
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AdminKey::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn correct_bearer_key_is_accepted() {
        let state = state_with_key(Some("s3cret"));
        assert!(extract(&state, Some("Bearer s3cret")).await.is_ok());
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = state_with_key(Some("s3cret"));
        assert!(extract(&state, None).await.is_err());
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let state = state_with_key(Some("s3cret"));
        assert!(extract(&state, Some("Bearer nope")).await.is_err());
    }

    #[tokio::test]
    async fn unconfigured_key_rejects_everything() {
        let state = state_with_key(None);
        assert!(extract(&state, Some("Bearer s3cret")).await.is_err());
    }
}
