//! Payment workflow API endpoints.
//!
//! - POST /events/:id/submit-payment-proof - Attach proof to a registration
//! - POST /events/:id/verify-payment/:registration_id - Approve or reject (admin)
//! - POST /events/:id/reset-payment/:registration_id - Return to pending (admin)
//! - GET /events/:id/pending-payments - Proofs awaiting review (admin)
//! - GET /events/:id/payment-logs - Audit trail, oldest first (admin)

use crate::app::{PaymentService, PendingPayment};
use crate::error::AppError;
use crate::extractors::AdminKey;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use clubhub_core::payment::ProofSubmission;
use clubhub_core::types::{EventId, Money, PaymentLog, PaymentProof, RegistrationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to submit proof of payment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofRequest {
    /// Primary contact email of the registration being paid for
    pub email: String,
    /// Screenshot payload (data URI or storage key)
    pub screenshot_data: String,
    /// Bank UTR / transaction reference
    pub utr_number: String,
    /// When the transfer happened; defaults to submission time
    #[serde(default)]
    pub transaction_date: Option<DateTime<Utc>>,
    /// Amount paid, in smallest currency units; defaults to the quoted amount
    #[serde(default)]
    pub amount_paid: Option<u64>,
    /// Account or app the transfer was made from
    #[serde(default)]
    pub paid_from: Option<String>,
    /// Free-form notes for the reviewer
    #[serde(default)]
    pub user_notes: Option<String>,
}

/// Response after submitting proof.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProofResponse {
    /// Human-readable outcome
    pub message: String,
    /// Always `submitted`
    pub status: &'static str,
    /// Id of the registration the proof was attached to
    pub registration_id: RegistrationId,
    /// Position of that registration in the confirmed list
    pub registration_index: usize,
}

/// Request to apply a verification decision.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// `approve` or `reject`
    pub action: String,
    /// Reason shown to the participant on rejection
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Admin applying the decision; defaults to `admin`
    #[serde(default)]
    pub verified_by: Option<String>,
}

/// Response after a verification decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Human-readable outcome
    pub message: String,
    /// `verified` or `rejected`
    pub status: String,
}

/// Response after resetting a payment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    /// Human-readable outcome
    pub message: String,
    /// Always `pending`
    pub status: &'static str,
}

/// A registration awaiting verification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPaymentEntry {
    /// Id of the registration
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

impl From<PendingPayment> for PendingPaymentEntry {
    fn from(pending: PendingPayment) -> Self {
        Self {
            registration_id: pending.registration_id,
            index: pending.index,
            team_name: pending.team_name,
            email: pending.email,
            amount_due: pending.amount_due,
            proof: pending.proof,
        }
    }
}

fn service(state: &AppState) -> PaymentService {
    PaymentService::new(state.events.clone(), state.notify.clone(), state.clock.clone())
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit proof of payment for a registration.
///
/// Public endpoint. The registration is found by the primary contact's
/// email. Resubmission is allowed only after a rejection.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/submit-payment-proof \
///   -H "Content-Type: application/json" \
///   -d '{
///     "email": "asha@club.dev",
///     "screenshotData": "data:image/png;base64,iVBOR...",
///     "utrNumber": "UTR20260312X",
///     "amountPaid": 250,
///     "paidFrom": "GPay"
///   }'
/// ```
pub async fn submit_payment_proof(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<SubmitProofRequest>,
) -> Result<Json<SubmitProofResponse>, AppError> {
    let submitted = service(&state)
        .submit_proof(
            EventId::from_uuid(event_id),
            &request.email,
            ProofSubmission {
                screenshot: request.screenshot_data,
                utr: request.utr_number,
                transaction_date: request.transaction_date,
                amount_paid: request.amount_paid.map(Money::from_units),
                paid_from: request.paid_from,
                user_notes: request.user_notes,
            },
        )
        .await?;

    Ok(Json(SubmitProofResponse {
        message: "Payment proof submitted for verification".to_string(),
        status: "submitted",
        registration_id: submitted.registration_id,
        registration_index: submitted.index,
    }))
}

/// Approve or reject a submitted payment.
///
/// Requires the admin bearer key. Approval is terminal; rejection lets the
/// participant resubmit.
///
/// # Example
///
/// ```bash
/// curl -X POST \
///   http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/verify-payment/7f000001-0000-4000-8000-000000000001 \
///   -H "Authorization: Bearer <admin_key>" \
///   -H "Content-Type: application/json" \
///   -d '{"action": "approve", "verifiedBy": "treasurer"}'
/// ```
pub async fn verify_payment(
    _admin: AdminKey,
    Path((event_id, registration_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let applied = service(&state)
        .verify(
            EventId::from_uuid(event_id),
            RegistrationId::from_uuid(registration_id),
            &request.action,
            request.rejection_reason,
            request.verified_by,
        )
        .await?;

    Ok(Json(VerifyResponse {
        message: format!("Payment {applied}"),
        status: applied.to_string(),
    }))
}

/// Return a payment to pending, dropping the stored proof.
///
/// Requires the admin bearer key. Verified payments cannot be reset.
///
/// # Example
///
/// ```bash
/// curl -X POST \
///   http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/reset-payment/7f000001-0000-4000-8000-000000000001 \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn reset_payment(
    _admin: AdminKey,
    Path((event_id, registration_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, AppError> {
    service(&state)
        .reset(
            EventId::from_uuid(event_id),
            RegistrationId::from_uuid(registration_id),
        )
        .await?;

    Ok(Json(ResetResponse {
        message: "Payment reset to pending".to_string(),
        status: "pending",
    }))
}

/// List registrations whose proofs await verification, in arrival order.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/pending-payments \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn pending_payments(
    _admin: AdminKey,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingPaymentEntry>>, AppError> {
    let pending = service(&state)
        .pending(EventId::from_uuid(event_id))
        .await?;

    Ok(Json(pending.into_iter().map(Into::into).collect()))
}

/// The payment audit trail for an event, oldest first.
///
/// Requires the admin bearer key.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events/550e8400-e29b-41d4-a716-446655440000/payment-logs \
///   -H "Authorization: Bearer <admin_key>"
/// ```
pub async fn payment_logs(
    _admin: AdminKey,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentLog>>, AppError> {
    let logs = service(&state).logs(EventId::from_uuid(event_id)).await?;
    Ok(Json(logs))
}
