//! Webhook notifier for production delivery.

use super::render_message;
use async_trait::async_trait;
use clubhub_core::error::{DomainError, Result};
use clubhub_core::notify::{Notification, Notifier};
use reqwest::Client;
use serde::Serialize;

/// Webhook notifier.
///
/// POSTs each notification as JSON to a configured endpoint, for example a
/// club Discord or email bridge. The endpoint owns formatting and fan-out;
/// this side only reports what happened and to whom.
///
/// # Configuration
///
/// Set `NOTIFY_WEBHOOK_URL` to enable this provider; without it the server
/// falls back to [`super::ConsoleNotifier`].
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    /// Endpoint notifications are POSTed to.
    url: String,

    /// HTTP client for making requests.
    http_client: Client,
}

/// Webhook request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    /// Notification kind (e.g. "registration_confirmed")
    kind: &'a str,
    /// Recipient email, absent for organizer-facing messages
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient: Option<&'a str>,
    /// Rendered human-readable message
    message: String,
}

impl WebhookNotifier {
    /// Create a notifier POSTing to `url`.
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        let payload = WebhookPayload {
            kind: notification.kind(),
            recipient: notification.recipient(),
            message: render_message(&notification),
        };

        let response = self
            .http_client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::NotificationFailed {
                message: format!("webhook request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(DomainError::NotificationFailed {
                message: format!("webhook returned status {}", response.status()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::post};

    async fn spawn(router: Router) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn sample() -> Notification {
        Notification::PaymentVerified {
            to: "asha@club.dev".to_string(),
            event_title: "Robo Rally".to_string(),
        }
    }

    #[tokio::test]
    async fn webhook_posts_json_payload() {
        let router = Router::new().route(
            "/hook",
            post(|body: axum::Json<serde_json::Value>| async move {
                if body.0["kind"] == "payment_verified" && body.0["recipient"] == "asha@club.dev" {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                }
            }),
        );
        let addr = spawn(router).await;

        let notifier = WebhookNotifier::new(format!("http://{addr}/hook"));
        assert!(notifier.send(sample()).await.is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_a_delivery_failure() {
        let router = Router::new().route(
            "/hook",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let addr = spawn(router).await;

        let notifier = WebhookNotifier::new(format!("http://{addr}/hook"));
        let outcome = notifier.send(sample()).await;
        assert!(matches!(
            outcome,
            Err(DomainError::NotificationFailed { .. })
        ));
    }
}
