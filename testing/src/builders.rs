//! Builders for common test fixtures.
//!
//! Every builder returns a fully valid value with sensible defaults so tests
//! only spell out what they care about.

use chrono::{Duration, Utc};
use clubhub_core::types::{
    Event, EventId, Member, Money, PaymentConfig, PaymentStatus, Registration, RegistrationId,
    RegistrationType, SubEvent, SubEventId,
};

/// A free, open, solo event with unlimited capacity
#[must_use]
pub fn sample_event(title: &str) -> Event {
    let now = Utc::now();
    Event {
        id: EventId::new(),
        version: 1,
        title: title.to_string(),
        description: String::new(),
        venue: "Main Auditorium".to_string(),
        starts_at: now + Duration::days(7),
        ends_at: None,
        capacity: 0,
        registration_type: RegistrationType::Solo,
        min_team_size: 0,
        max_team_size: 0,
        price: Money::ZERO,
        payment: PaymentConfig::default(),
        coupons: Vec::new(),
        sub_events: Vec::new(),
        registration_open: true,
        registrations: Vec::new(),
        waitlist: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

/// A paid solo event
#[must_use]
pub fn priced_event(title: &str, price: u64) -> Event {
    let mut event = sample_event(title);
    event.price = Money::from_units(price);
    event
}

/// Adds priced sub-events to an event, returning their ids in order
pub fn with_sub_events(event: &mut Event, prices: &[u64]) -> Vec<SubEventId> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let id = SubEventId::new();
            event.sub_events.push(SubEvent {
                id,
                title: format!("Track {}", i + 1),
                description: String::new(),
                price: Money::from_units(*price),
            });
            id
        })
        .collect()
}

/// A member with a name and email
#[must_use]
pub fn member(name: &str, email: &str) -> Member {
    Member {
        name: name.to_string(),
        email: Some(email.to_string()),
        phone: None,
        id_number: None,
    }
}

/// A pending single-member registration owing `amount` units
#[must_use]
pub fn solo_registration(email: &str, amount: u64) -> Registration {
    Registration {
        id: RegistrationId::new(),
        team_name: None,
        country: None,
        members: vec![member("Test Member", email)],
        paid: false,
        payment_id: None,
        payment_status: PaymentStatus::Pending,
        payment_proof: None,
        amount_due: Money::from_units(amount),
        coupon_code: None,
        multi_event_group_id: None,
        selected_sub_events: Vec::new(),
        verified_at: None,
        verified_by: None,
        rejection_reason: None,
        registered_at: Utc::now(),
    }
}
