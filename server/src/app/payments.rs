//! Payment proof and verification workflows.
//!
//! Proof submission, admin verification, resets, and the read-only pending
//! and audit views. The payment log append always happens after the event
//! document write succeeds, so a lost version check never leaves a log
//! entry for a change that was not applied.

use crate::metrics;
use crate::notify::Dispatcher;
use clubhub_core::environment::Clock;
use clubhub_core::error::{DomainError, Result};
use clubhub_core::notify::Notification;
use clubhub_core::payment::{self, ProofSubmission, SubmittedProof};
use clubhub_core::repository::EventRepository;
use clubhub_core::types::{
    EventId, Money, PaymentAction, PaymentLog, PaymentLogId, PaymentProof, PaymentStatus,
    RegistrationId,
};
use std::sync::Arc;
use tracing::info;

/// A registration awaiting verification.
#[derive(Clone, Debug)]
pub struct PendingPayment {
    /// The registration's stable id
    pub registration_id: RegistrationId,
    /// Position in the confirmed list
    pub index: usize,
    /// Team name, when one was given
    pub team_name: Option<String>,
    /// Primary contact email
    pub email: Option<String>,
    /// Amount the registration owes
    pub amount_due: Money,
    /// The submitted proof under review
    pub proof: PaymentProof,
}

/// Payment workflow service.
pub struct PaymentService {
    events: Arc<dyn EventRepository>,
    notify: Dispatcher,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, notify: Dispatcher, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            notify,
            clock,
        }
    }

    /// Attach payment proof to the registration whose primary contact has
    /// this email.
    ///
    /// On success the participant gets a receipt notification and the
    /// organizers get a review request, and a `submitted` row lands in the
    /// payment log.
    ///
    /// # Errors
    ///
    /// Everything [`payment::submit_proof`] returns, plus storage and
    /// version-check errors.
    pub async fn submit_proof(
        &self,
        event_id: EventId,
        email: &str,
        submission: ProofSubmission,
    ) -> Result<SubmittedProof> {
        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();

        let submitted = payment::submit_proof(&mut event, email, submission, now)?;
        event.updated_at = now;
        self.events.update_event(&mut event).await?;

        let submitter = email.trim().to_lowercase();
        self.events
            .append_payment_log(&PaymentLog {
                id: PaymentLogId::new(),
                event_id,
                registration_id: submitted.registration_id,
                action: PaymentAction::Submitted,
                amount: Some(submitted.amount),
                utr: Some(submitted.utr.clone()),
                actor: submitter.clone(),
                note: None,
                created_at: now,
            })
            .await?;

        metrics::record_payment_action("submitted");
        info!(
            %event_id,
            registration_id = %submitted.registration_id,
            utr = %submitted.utr,
            "Payment proof submitted"
        );

        self.notify.dispatch(Notification::ProofSubmitted {
            to: submitter.clone(),
            event_title: event.title.clone(),
            utr: submitted.utr.clone(),
            amount: submitted.amount,
        });
        self.notify.dispatch(Notification::ProofAwaitingReview {
            event_title: event.title,
            submitter,
            utr: submitted.utr.clone(),
            amount: submitted.amount,
        });

        Ok(submitted)
    }

    /// Apply an organizer's verification decision.
    ///
    /// `action` is the wire string: `approve` marks the payment verified,
    /// `reject` marks it rejected with the optional reason. Either way a
    /// log row is appended and the participant is notified.
    ///
    /// # Errors
    ///
    /// `UnknownAction` for anything but approve/reject,
    /// `RegistrationNotFound` for an unknown registration,
    /// `AlreadyVerified` when the payment is final, plus storage and
    /// version-check errors.
    pub async fn verify(
        &self,
        event_id: EventId,
        registration_id: RegistrationId,
        action: &str,
        rejection_reason: Option<String>,
        verified_by: Option<String>,
    ) -> Result<PaymentAction> {
        let normalized = action.trim().to_lowercase();
        if normalized != "approve" && normalized != "reject" {
            return Err(DomainError::UnknownAction {
                action: action.trim().to_string(),
            });
        }

        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();
        let title = event.title.clone();
        let actor = verified_by
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "admin".to_string());

        let registration = event
            .find_registration_mut(registration_id)
            .ok_or(DomainError::RegistrationNotFound)?;

        let applied = if normalized == "approve" {
            payment::approve(registration, &actor, now)?;
            PaymentAction::Verified
        } else {
            payment::reject(registration, rejection_reason.clone())?;
            PaymentAction::Rejected
        };
        let amount = registration
            .payment_proof
            .as_ref()
            .map_or(registration.amount_due, |p| p.amount_paid);
        let utr = registration.proof_utr().map(str::to_string);
        let recipient = registration.primary_email();

        event.updated_at = now;
        self.events.update_event(&mut event).await?;

        let note = match applied {
            PaymentAction::Rejected => rejection_reason.clone(),
            _ => None,
        };
        self.events
            .append_payment_log(&PaymentLog {
                id: PaymentLogId::new(),
                event_id,
                registration_id,
                action: applied,
                amount: Some(amount),
                utr,
                actor,
                note,
                created_at: now,
            })
            .await?;

        info!(%event_id, %registration_id, action = %applied, "Payment verification applied");

        match applied {
            PaymentAction::Verified => {
                metrics::record_payment_action("verified");
                metrics::record_payment_verified_revenue(amount.units());
                if let Some(to) = recipient {
                    self.notify.dispatch(Notification::PaymentVerified {
                        to,
                        event_title: title,
                    });
                }
            }
            PaymentAction::Rejected => {
                metrics::record_payment_action("rejected");
                if let Some(to) = recipient {
                    self.notify.dispatch(Notification::PaymentRejected {
                        to,
                        event_title: title,
                        reason: rejection_reason,
                    });
                }
            }
            PaymentAction::Submitted | PaymentAction::Reset => {}
        }

        Ok(applied)
    }

    /// Return a payment to `Pending`, dropping the stored proof.
    ///
    /// # Errors
    ///
    /// `RegistrationNotFound` for an unknown registration,
    /// `AlreadyVerified` when the payment is final, plus storage and
    /// version-check errors.
    pub async fn reset(&self, event_id: EventId, registration_id: RegistrationId) -> Result<()> {
        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();

        let registration = event
            .find_registration_mut(registration_id)
            .ok_or(DomainError::RegistrationNotFound)?;
        let prior_amount = registration.payment_proof.as_ref().map(|p| p.amount_paid);
        let prior_utr = registration.proof_utr().map(str::to_string);
        payment::reset(registration)?;

        event.updated_at = now;
        self.events.update_event(&mut event).await?;

        self.events
            .append_payment_log(&PaymentLog {
                id: PaymentLogId::new(),
                event_id,
                registration_id,
                action: PaymentAction::Reset,
                amount: prior_amount,
                utr: prior_utr,
                actor: "admin".to_string(),
                note: None,
                created_at: now,
            })
            .await?;

        metrics::record_payment_action("reset");
        info!(%event_id, %registration_id, "Payment reset to pending");
        Ok(())
    }

    /// Registrations with proofs awaiting verification, in arrival order.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an unknown event, or storage errors.
    pub async fn pending(&self, event_id: EventId) -> Result<Vec<PendingPayment>> {
        let event = self.events.fetch_event(event_id).await?;
        Ok(event
            .registrations
            .iter()
            .enumerate()
            .filter(|(_, r)| r.payment_status == PaymentStatus::Submitted)
            .filter_map(|(index, r)| {
                r.payment_proof.clone().map(|proof| PendingPayment {
                    registration_id: r.id,
                    index,
                    team_name: r.team_name.clone(),
                    email: r.primary_email(),
                    amount_due: r.amount_due,
                    proof,
                })
            })
            .collect())
    }

    /// The full payment audit trail for an event, oldest first.
    ///
    /// # Errors
    ///
    /// `EventNotFound` for an unknown event, or storage errors.
    pub async fn logs(&self, event_id: EventId) -> Result<Vec<PaymentLog>> {
        // The existence check keeps unknown ids a 404 instead of an empty list.
        self.events.fetch_event(event_id).await?;
        self.events.payment_logs(event_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clubhub_testing::builders::{priced_event, solo_registration};
    use clubhub_testing::{InMemoryEventRepository, RecordingNotifier, test_clock};

    fn service(repo: &InMemoryEventRepository, notifier: &RecordingNotifier) -> PaymentService {
        PaymentService::new(
            Arc::new(repo.clone()),
            Dispatcher::new(Arc::new(notifier.clone())),
            Arc::new(test_clock()),
        )
    }

    fn submission(utr: &str) -> ProofSubmission {
        ProofSubmission {
            screenshot: "data:image/png;base64,abc".to_string(),
            utr: utr.to_string(),
            transaction_date: None,
            amount_paid: None,
            paid_from: Some("GPay".to_string()),
            user_notes: None,
        }
    }

    async fn seeded_event(repo: &InMemoryEventRepository, email: &str) -> EventId {
        let mut event = priced_event("Ideathon", 250);
        event.registrations.push(solo_registration(email, 250));
        repo.insert_event(&event).await.unwrap();
        event.id
    }

    async fn drain_notifications() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn submission_logs_and_notifies_both_sides() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;

        let submitted = service(&repo, &notifier)
            .submit_proof(event_id, "Asha@Club.Dev", submission("UTR123"))
            .await
            .unwrap();

        assert_eq!(submitted.index, 0);
        let logs = repo.payment_logs(event_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, PaymentAction::Submitted);
        assert_eq!(logs[0].actor, "asha@club.dev");
        assert_eq!(logs[0].utr.as_deref(), Some("UTR123"));

        drain_notifications().await;
        assert_eq!(
            notifier.kinds(),
            vec!["proof_submitted", "proof_awaiting_review"]
        );
    }

    #[tokio::test]
    async fn rejected_submission_leaves_no_log_entry() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;

        let outcome = service(&repo, &notifier)
            .submit_proof(event_id, "stranger@club.dev", submission("UTR123"))
            .await;

        assert_eq!(outcome.unwrap_err(), DomainError::RegistrationNotFound);
        assert!(repo.payment_logs(event_id).await.unwrap().is_empty());
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn approve_logs_verified_and_notifies() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;
        let svc = service(&repo, &notifier);

        let submitted = svc
            .submit_proof(event_id, "asha@club.dev", submission("UTR123"))
            .await
            .unwrap();
        drain_notifications().await;
        notifier.clear();

        let applied = svc
            .verify(
                event_id,
                submitted.registration_id,
                "approve",
                None,
                Some("treasurer".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(applied, PaymentAction::Verified);

        let event = repo.fetch_event(event_id).await.unwrap();
        let r = &event.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Verified);
        assert_eq!(r.verified_by.as_deref(), Some("treasurer"));
        assert!(r.paid);

        let logs = repo.payment_logs(event_id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].action, PaymentAction::Verified);
        assert_eq!(logs[1].actor, "treasurer");

        drain_notifications().await;
        assert_eq!(notifier.kinds(), vec!["payment_verified"]);
    }

    #[tokio::test]
    async fn reject_keeps_reason_in_log_and_notification() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;
        let svc = service(&repo, &notifier);

        let submitted = svc
            .submit_proof(event_id, "asha@club.dev", submission("UTR123"))
            .await
            .unwrap();
        drain_notifications().await;
        notifier.clear();

        svc.verify(
            event_id,
            submitted.registration_id,
            "reject",
            Some("amount does not match".to_string()),
            None,
        )
        .await
        .unwrap();

        let logs = repo.payment_logs(event_id).await.unwrap();
        assert_eq!(logs[1].action, PaymentAction::Rejected);
        assert_eq!(logs[1].note.as_deref(), Some("amount does not match"));
        assert_eq!(logs[1].actor, "admin");

        drain_notifications().await;
        let sent = notifier.sent();
        assert!(matches!(
            &sent[0],
            Notification::PaymentRejected { reason: Some(r), .. } if r == "amount does not match"
        ));
    }

    #[tokio::test]
    async fn unknown_action_is_a_validation_error() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;

        let outcome = service(&repo, &notifier)
            .verify(event_id, RegistrationId::new(), "escalate", None, None)
            .await;

        assert_eq!(
            outcome.unwrap_err(),
            DomainError::UnknownAction {
                action: "escalate".to_string()
            }
        );
    }

    #[tokio::test]
    async fn verified_payment_cannot_be_verified_again() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;
        let svc = service(&repo, &notifier);

        let submitted = svc
            .submit_proof(event_id, "asha@club.dev", submission("UTR123"))
            .await
            .unwrap();
        svc.verify(event_id, submitted.registration_id, "approve", None, None)
            .await
            .unwrap();

        let again = svc
            .verify(event_id, submitted.registration_id, "approve", None, None)
            .await;
        assert_eq!(again.unwrap_err(), DomainError::AlreadyVerified);

        // The failed attempt appended nothing.
        let logs = repo.payment_logs(event_id).await.unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn reset_drops_proof_and_logs() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let event_id = seeded_event(&repo, "asha@club.dev").await;
        let svc = service(&repo, &notifier);

        let submitted = svc
            .submit_proof(event_id, "asha@club.dev", submission("UTR123"))
            .await
            .unwrap();
        svc.reset(event_id, submitted.registration_id).await.unwrap();

        let event = repo.fetch_event(event_id).await.unwrap();
        let r = &event.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Pending);
        assert!(r.payment_proof.is_none());

        let logs = repo.payment_logs(event_id).await.unwrap();
        assert_eq!(logs[1].action, PaymentAction::Reset);
        assert_eq!(logs[1].utr.as_deref(), Some("UTR123"));
    }

    #[tokio::test]
    async fn pending_lists_only_submitted_registrations() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let mut event = priced_event("Ideathon", 250);
        event
            .registrations
            .push(solo_registration("asha@club.dev", 250));
        event
            .registrations
            .push(solo_registration("ravi@club.dev", 250));
        repo.insert_event(&event).await.unwrap();
        let svc = service(&repo, &notifier);

        svc.submit_proof(event.id, "ravi@club.dev", submission("UTR9"))
            .await
            .unwrap();

        let pending = svc.pending(event.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].index, 1);
        assert_eq!(pending[0].email.as_deref(), Some("ravi@club.dev"));
        assert_eq!(pending[0].proof.utr, "UTR9");
    }

    #[tokio::test]
    async fn logs_for_unknown_event_are_not_found() {
        let repo = InMemoryEventRepository::new();
        let notifier = RecordingNotifier::new();
        let svc = service(&repo, &notifier);

        let missing = EventId::new();
        let outcome = svc.logs(missing).await;
        assert_eq!(
            outcome.unwrap_err(),
            DomainError::EventNotFound { id: missing }
        );
    }
}
