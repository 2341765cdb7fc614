//! Registration workflows.
//!
//! Signing up, multi-sub-event signups, and cancellation with waitlist
//! promotion. Every operation is a single document round-trip: load, apply
//! rules, write back through the version check. Notifications go out only
//! after the write sticks.

use crate::metrics;
use crate::notify::Dispatcher;
use chrono::{DateTime, Utc};
use clubhub_core::environment::Clock;
use clubhub_core::error::{DomainError, Result};
use clubhub_core::notify::Notification;
use clubhub_core::pricing::{self, Quote};
use clubhub_core::registration::{self, Placement};
use clubhub_core::repository::EventRepository;
use clubhub_core::types::{
    Event, EventId, Member, PaymentStatus, Registration, RegistrationId, SubEventId,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Input for a new registration, shared by the single and multi-sub-event
/// paths.
#[derive(Clone, Debug)]
pub struct NewRegistration {
    /// Team name, for team events
    pub team_name: Option<String>,
    /// Country of the team or participant
    pub country: Option<String>,
    /// Members, primary contact first
    pub members: Vec<Member>,
    /// Coupon code to redeem, if any
    pub coupon_code: Option<String>,
    /// Organizer-asserted flag that payment was already collected
    pub paid: bool,
    /// External payment reference, when one exists up front
    pub payment_id: Option<String>,
}

/// What a completed registration produced.
#[derive(Clone, Debug)]
pub struct RegistrationOutcome {
    /// The updated event document
    pub event: Event,
    /// Id of the new registration
    pub registration_id: RegistrationId,
    /// Where the registration landed
    pub placement: Placement,
    /// Price breakdown behind `amount_due`
    pub quote: Quote,
    /// Group id stamped on multi-sub-event signups
    pub multi_event_group_id: Option<Uuid>,
}

/// What a cancellation produced.
#[derive(Clone, Debug)]
pub struct CancellationOutcome {
    /// The updated event document
    pub event: Event,
    /// Registration promoted off the waitlist, when a spot freed up
    pub promoted_registration_id: Option<RegistrationId>,
}

/// Registration workflow service.
pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    notify: Dispatcher,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    /// Create a new registration service.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, notify: Dispatcher, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            notify,
            clock,
        }
    }

    /// Register for the event itself.
    ///
    /// Validates the members, redeems the coupon, prices the signup, and
    /// places it against capacity. A zero total marks the registration paid
    /// and verified immediately.
    ///
    /// # Errors
    ///
    /// Validation errors for closed registration, bad members, or a bad
    /// coupon; conflict errors for duplicate members or a lost version
    /// check; `EventNotFound` when the event does not exist.
    pub async fn register(
        &self,
        event_id: EventId,
        input: NewRegistration,
    ) -> Result<RegistrationOutcome> {
        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();

        registration::ensure_registration_open(&event)?;
        registration::validate_members(&event, &input.members)?;
        let coupon = match input.coupon_code.as_deref() {
            Some(code) => Some(registration::redeem_coupon(&mut event, code, now)?),
            None => None,
        };
        let quote = pricing::quote(&[event.price], coupon);

        self.finish(event, input, quote, None, Vec::new(), now).await
    }

    /// Register for a selection of sub-events in one signup.
    ///
    /// Prices come from the selected sub-events; the multi-event tier and
    /// the coupon apply on top. The whole selection lands as one
    /// registration stamped with a shared group id.
    ///
    /// # Errors
    ///
    /// `NoSubEventsSelected` for an empty selection and `SubEventNotFound`
    /// for an unknown id, plus everything [`Self::register`] returns.
    pub async fn register_multiple(
        &self,
        event_id: EventId,
        input: NewRegistration,
        selected: Vec<SubEventId>,
    ) -> Result<RegistrationOutcome> {
        if selected.is_empty() {
            return Err(DomainError::NoSubEventsSelected);
        }
        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();

        registration::ensure_registration_open(&event)?;
        registration::validate_members(&event, &input.members)?;

        let mut prices = Vec::with_capacity(selected.len());
        for id in &selected {
            let sub_event = event
                .find_sub_event(*id)
                .ok_or(DomainError::SubEventNotFound { id: *id })?;
            prices.push(sub_event.price);
        }

        let coupon = match input.coupon_code.as_deref() {
            Some(code) => Some(registration::redeem_coupon(&mut event, code, now)?),
            None => None,
        };
        let quote = pricing::quote(&prices, coupon);

        self.finish(event, input, quote, Some(Uuid::new_v4()), selected, now)
            .await
    }

    /// Remove a registration, promoting the oldest waitlist entry into the
    /// freed spot.
    ///
    /// # Errors
    ///
    /// `RegistrationNotFound` when the id is on neither list, plus storage
    /// and version-check errors.
    pub async fn cancel(
        &self,
        event_id: EventId,
        registration_id: RegistrationId,
    ) -> Result<CancellationOutcome> {
        let mut event = self.events.fetch_event(event_id).await?;
        let now = self.clock.now();

        let (removed, promoted) = registration::cancel(&mut event, registration_id)?;
        event.updated_at = now;
        self.events.update_event(&mut event).await?;

        metrics::record_registration_cancelled();
        info!(
            %event_id,
            registration_id = %removed.id,
            promoted = promoted.is_some(),
            "Registration cancelled"
        );

        if let Some(promoted) = &promoted {
            metrics::record_waitlist_promotion();
            if let Some(to) = promoted.primary_email() {
                self.notify.dispatch(Notification::WaitlistPromoted {
                    to,
                    event_title: event.title.clone(),
                });
            }
        }

        Ok(CancellationOutcome {
            event,
            promoted_registration_id: promoted.map(|r| r.id),
        })
    }

    /// Build the registration, place it, persist, and notify.
    async fn finish(
        &self,
        mut event: Event,
        input: NewRegistration,
        quote: Quote,
        multi_event_group_id: Option<Uuid>,
        selected_sub_events: Vec<SubEventId>,
        now: DateTime<Utc>,
    ) -> Result<RegistrationOutcome> {
        let free = quote.total.is_zero();
        let registration = Registration {
            id: RegistrationId::new(),
            team_name: input.team_name,
            country: input.country,
            members: input.members,
            paid: free || input.paid,
            payment_id: input.payment_id,
            payment_status: if free {
                PaymentStatus::Verified
            } else {
                PaymentStatus::Pending
            },
            payment_proof: None,
            amount_due: quote.total,
            coupon_code: input.coupon_code,
            multi_event_group_id,
            selected_sub_events,
            verified_at: None,
            verified_by: None,
            rejection_reason: None,
            registered_at: now,
        };
        let registration_id = registration.id;
        // validate_members already required a usable primary email.
        let recipient = registration.primary_email().unwrap_or_default();
        let team_name = registration.team_name.clone();

        let placement = registration::place(&mut event, registration);
        event.updated_at = now;
        self.events.update_event(&mut event).await?;

        info!(
            event_id = %event.id,
            %registration_id,
            waitlisted = placement.is_waitlisted(),
            total = %quote.total,
            "Registration recorded"
        );

        match placement {
            Placement::Confirmed { .. } => {
                metrics::record_registration("confirmed");
                self.notify.dispatch(Notification::RegistrationConfirmed {
                    to: recipient,
                    event_title: event.title.clone(),
                    team_name,
                    amount_due: quote.total,
                });
            }
            Placement::Waitlisted { position } => {
                metrics::record_registration("waitlisted");
                self.notify.dispatch(Notification::WaitlistJoined {
                    to: recipient,
                    event_title: event.title.clone(),
                    position,
                });
            }
        }

        Ok(RegistrationOutcome {
            event,
            registration_id,
            placement,
            quote,
            multi_event_group_id,
        })
    }
}
