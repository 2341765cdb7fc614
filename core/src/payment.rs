//! Payment proof workflow.
//!
//! Each registration's payment moves through `Pending -> Submitted ->
//! {Verified, Rejected}`. A rejected payment may be resubmitted; a verified
//! payment is terminal and immutable. Submissions are guarded against reusing
//! another registration's transaction reference on the same event.

use crate::error::{DomainError, Result};
use crate::types::{Event, Money, PaymentProof, PaymentStatus, Registration, RegistrationId};
use chrono::{DateTime, Utc};

/// Details supplied when a participant submits proof of payment.
#[derive(Clone, Debug)]
pub struct ProofSubmission {
    /// Screenshot payload (data URI or storage key)
    pub screenshot: String,
    /// Bank UTR / transaction reference
    pub utr: String,
    /// When the transfer happened; defaults to submission time
    pub transaction_date: Option<DateTime<Utc>>,
    /// Amount paid; defaults to the registration's quoted amount
    pub amount_paid: Option<Money>,
    /// Account or app the transfer was made from
    pub paid_from: Option<String>,
    /// Free-form notes from the participant
    pub user_notes: Option<String>,
}

/// What a successful proof submission recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmittedProof {
    /// The registration the proof was attached to
    pub registration_id: RegistrationId,
    /// Position of that registration in the confirmed list
    pub index: usize,
    /// Amount recorded on the proof
    pub amount: Money,
    /// Transaction reference recorded on the proof
    pub utr: String,
}

/// Attaches payment proof to the registration whose primary contact has the
/// given email, moving it to `Submitted`.
///
/// Checks run in order: required fields, registration lookup, current status,
/// then the duplicate-UTR guard against every non-rejected proof on the event.
///
/// # Errors
///
/// - [`DomainError::ScreenshotRequired`] / [`DomainError::UtrRequired`] for
///   missing fields;
/// - [`DomainError::RegistrationNotFound`] when no confirmed registration
///   matches the email;
/// - [`DomainError::AlreadyVerified`] / [`DomainError::ProofPending`] when the
///   payment is past resubmission;
/// - [`DomainError::DuplicateUtr`] when the reference is already claimed.
pub fn submit_proof(
    event: &mut Event,
    email: &str,
    submission: ProofSubmission,
    now: DateTime<Utc>,
) -> Result<SubmittedProof> {
    if submission.screenshot.trim().is_empty() {
        return Err(DomainError::ScreenshotRequired);
    }
    let utr = submission.utr.trim().to_string();
    if utr.is_empty() {
        return Err(DomainError::UtrRequired);
    }

    let index = event
        .registration_index_by_email(email)
        .ok_or(DomainError::RegistrationNotFound)?;

    let (registration_id, status, amount_due) = {
        let registration = &event.registrations[index];
        (
            registration.id,
            registration.payment_status,
            registration.amount_due,
        )
    };
    match status {
        PaymentStatus::Verified => return Err(DomainError::AlreadyVerified),
        PaymentStatus::Submitted => return Err(DomainError::ProofPending),
        PaymentStatus::Pending | PaymentStatus::Rejected => {}
    }

    if utr_conflicts(event, &utr, registration_id) {
        return Err(DomainError::DuplicateUtr { utr });
    }

    let amount = submission.amount_paid.unwrap_or(amount_due);
    let registration = &mut event.registrations[index];
    registration.payment_proof = Some(PaymentProof {
        screenshot: submission.screenshot,
        utr: utr.clone(),
        transaction_date: submission.transaction_date.unwrap_or(now),
        amount_paid: amount,
        paid_from: submission.paid_from,
        user_notes: submission.user_notes,
        submitted_at: now,
    });
    registration.payment_status = PaymentStatus::Submitted;
    registration.rejection_reason = None;

    Ok(SubmittedProof {
        registration_id,
        index,
        amount,
        utr,
    })
}

/// Marks the payment verified.
///
/// Allowed from any non-verified state, which covers cash collected at the
/// venue with no uploaded proof.
///
/// # Errors
///
/// Returns [`DomainError::AlreadyVerified`] when the payment was verified
/// before.
pub fn approve(
    registration: &mut Registration,
    verified_by: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if registration.payment_status == PaymentStatus::Verified {
        return Err(DomainError::AlreadyVerified);
    }
    registration.payment_status = PaymentStatus::Verified;
    registration.paid = true;
    registration.verified_at = Some(now);
    registration.verified_by = Some(verified_by.to_string());
    registration.rejection_reason = None;
    Ok(())
}

/// Marks the payment rejected, keeping the proof for reference.
///
/// The participant may resubmit afterwards.
///
/// # Errors
///
/// Returns [`DomainError::AlreadyVerified`] when the payment was verified
/// before; verified payments cannot be rejected.
pub fn reject(registration: &mut Registration, reason: Option<String>) -> Result<()> {
    if registration.payment_status == PaymentStatus::Verified {
        return Err(DomainError::AlreadyVerified);
    }
    registration.payment_status = PaymentStatus::Rejected;
    registration.paid = false;
    registration.verified_at = None;
    registration.verified_by = None;
    registration.rejection_reason = reason;
    Ok(())
}

/// Returns the payment to `Pending`, dropping the stored proof.
///
/// # Errors
///
/// Returns [`DomainError::AlreadyVerified`] when the payment was verified
/// before; verified payments cannot be reset.
pub fn reset(registration: &mut Registration) -> Result<()> {
    if registration.payment_status == PaymentStatus::Verified {
        return Err(DomainError::AlreadyVerified);
    }
    registration.payment_status = PaymentStatus::Pending;
    registration.payment_proof = None;
    registration.paid = false;
    registration.verified_at = None;
    registration.verified_by = None;
    registration.rejection_reason = None;
    Ok(())
}

/// Whether `utr` already backs a non-rejected proof on another registration.
fn utr_conflicts(event: &Event, utr: &str, exclude: RegistrationId) -> bool {
    event.all_registrations().any(|r| {
        r.id != exclude
            && r.payment_status != PaymentStatus::Rejected
            && r.proof_utr().is_some_and(|u| u.trim() == utr)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        EventId, Member, PaymentConfig, RegistrationType,
    };

    fn submission(utr: &str) -> ProofSubmission {
        ProofSubmission {
            screenshot: "data:image/png;base64,xyz".to_string(),
            utr: utr.to_string(),
            transaction_date: None,
            amount_paid: None,
            paid_from: Some("GPay".to_string()),
            user_notes: None,
        }
    }

    fn registration(email: &str) -> Registration {
        Registration {
            id: RegistrationId::new(),
            team_name: None,
            country: None,
            members: vec![Member {
                name: "Member".to_string(),
                email: Some(email.to_string()),
                phone: None,
                id_number: None,
            }],
            paid: false,
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            payment_proof: None,
            amount_due: Money::from_units(250),
            coupon_code: None,
            multi_event_group_id: None,
            selected_sub_events: Vec::new(),
            verified_at: None,
            verified_by: None,
            rejection_reason: None,
            registered_at: Utc::now(),
        }
    }

    fn event_with(registrations: Vec<Registration>) -> Event {
        Event {
            id: EventId::new(),
            version: 1,
            title: "Ideathon".to_string(),
            description: String::new(),
            venue: String::new(),
            starts_at: Utc::now(),
            ends_at: None,
            capacity: 0,
            registration_type: RegistrationType::Solo,
            min_team_size: 0,
            max_team_size: 0,
            price: Money::from_units(250),
            payment: PaymentConfig::default(),
            coupons: Vec::new(),
            sub_events: Vec::new(),
            registration_open: true,
            registrations,
            waitlist: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn submission_attaches_proof_and_defaults_amount() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        let now = Utc::now();

        let outcome = submit_proof(&mut e, "Asha@Club.Dev", submission("UTR123"), now).unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.amount, Money::from_units(250));

        let r = &e.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Submitted);
        let proof = r.payment_proof.as_ref().unwrap();
        assert_eq!(proof.utr, "UTR123");
        assert_eq!(proof.amount_paid, Money::from_units(250));
        assert_eq!(proof.submitted_at, now);
    }

    #[test]
    fn missing_fields_are_rejected_before_lookup() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        let mut no_screenshot = submission("UTR123");
        no_screenshot.screenshot = "  ".to_string();
        assert_eq!(
            submit_proof(&mut e, "asha@club.dev", no_screenshot, Utc::now()),
            Err(DomainError::ScreenshotRequired)
        );

        let no_utr = submission("   ");
        assert_eq!(
            submit_proof(&mut e, "asha@club.dev", no_utr, Utc::now()),
            Err(DomainError::UtrRequired)
        );
    }

    #[test]
    fn unknown_email_is_not_found() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        assert_eq!(
            submit_proof(&mut e, "stranger@club.dev", submission("UTR9"), Utc::now()),
            Err(DomainError::RegistrationNotFound)
        );
    }

    #[test]
    fn pending_review_blocks_resubmission() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR1"), Utc::now()).unwrap();
        assert_eq!(
            submit_proof(&mut e, "asha@club.dev", submission("UTR2"), Utc::now()),
            Err(DomainError::ProofPending)
        );
    }

    #[test]
    fn verified_payment_is_immutable() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR1"), Utc::now()).unwrap();
        approve(&mut e.registrations[0], "treasurer", Utc::now()).unwrap();

        assert_eq!(
            submit_proof(&mut e, "asha@club.dev", submission("UTR2"), Utc::now()),
            Err(DomainError::AlreadyVerified)
        );
        assert_eq!(
            approve(&mut e.registrations[0], "treasurer", Utc::now()),
            Err(DomainError::AlreadyVerified)
        );
        assert_eq!(
            reject(&mut e.registrations[0], None),
            Err(DomainError::AlreadyVerified)
        );
        assert_eq!(
            reset(&mut e.registrations[0]),
            Err(DomainError::AlreadyVerified)
        );
    }

    #[test]
    fn rejection_allows_resubmission_and_clears_reason() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR1"), Utc::now()).unwrap();
        reject(
            &mut e.registrations[0],
            Some("amount does not match".to_string()),
        )
        .unwrap();
        assert_eq!(e.registrations[0].payment_status, PaymentStatus::Rejected);
        assert!(e.registrations[0].rejection_reason.is_some());

        submit_proof(&mut e, "asha@club.dev", submission("UTR1-FIXED"), Utc::now()).unwrap();
        let r = &e.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Submitted);
        assert_eq!(r.rejection_reason, None);
    }

    #[test]
    fn duplicate_utr_on_another_registration_conflicts() {
        let mut e = event_with(vec![
            registration("asha@club.dev"),
            registration("ravi@club.dev"),
        ]);
        submit_proof(&mut e, "asha@club.dev", submission("SAME-UTR"), Utc::now()).unwrap();

        assert_eq!(
            submit_proof(&mut e, "ravi@club.dev", submission(" SAME-UTR "), Utc::now()),
            Err(DomainError::DuplicateUtr {
                utr: "SAME-UTR".to_string()
            })
        );
    }

    #[test]
    fn rejected_proof_frees_its_utr() {
        let mut e = event_with(vec![
            registration("asha@club.dev"),
            registration("ravi@club.dev"),
        ]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR-X"), Utc::now()).unwrap();
        reject(&mut e.registrations[0], Some("wrong account".to_string())).unwrap();

        // The rejected proof no longer reserves the reference.
        assert!(submit_proof(&mut e, "ravi@club.dev", submission("UTR-X"), Utc::now()).is_ok());
    }

    #[test]
    fn approve_records_verifier_and_time() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR1"), Utc::now()).unwrap();

        let now = Utc::now();
        approve(&mut e.registrations[0], "treasurer", now).unwrap();
        let r = &e.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Verified);
        assert!(r.paid);
        assert_eq!(r.verified_at, Some(now));
        assert_eq!(r.verified_by.as_deref(), Some("treasurer"));
    }

    #[test]
    fn approve_without_proof_covers_cash() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        approve(&mut e.registrations[0], "treasurer", Utc::now()).unwrap();
        assert_eq!(e.registrations[0].payment_status, PaymentStatus::Verified);
        assert!(e.registrations[0].payment_proof.is_none());
    }

    #[test]
    fn reset_returns_to_pending_and_drops_proof() {
        let mut e = event_with(vec![registration("asha@club.dev")]);
        submit_proof(&mut e, "asha@club.dev", submission("UTR1"), Utc::now()).unwrap();
        reset(&mut e.registrations[0]).unwrap();

        let r = &e.registrations[0];
        assert_eq!(r.payment_status, PaymentStatus::Pending);
        assert!(r.payment_proof.is_none());
        assert!(!r.paid);
    }
}
