//! Console notifier for development and testing.

use super::render_message;
use async_trait::async_trait;
use clubhub_core::error::Result;
use clubhub_core::notify::{Notification, Notifier};
use tracing::info;

/// Console notifier.
///
/// Logs notifications instead of delivering them. Useful for development
/// where no webhook endpoint is configured.
///
/// # Examples
///
/// ```ignore
/// use clubhub_server::notify::ConsoleNotifier;
///
/// let notifier = ConsoleNotifier::new();
/// notifier
///     .send(Notification::PaymentVerified {
///         to: "asha@club.dev".to_string(),
///         event_title: "Robo Rally".to_string(),
///     })
///     .await?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Create a new console notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        info!(
            kind = notification.kind(),
            to = notification.recipient().unwrap_or("organizers"),
            message = %render_message(&notification),
            "📣 Notification (Development Mode)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_send_always_succeeds() {
        let notifier = ConsoleNotifier::new();
        let outcome = notifier
            .send(Notification::WaitlistPromoted {
                to: "asha@club.dev".to_string(),
                event_title: "Robo Rally".to_string(),
            })
            .await;
        assert!(outcome.is_ok());
    }
}
