//! Analytics events emitted along the booking funnel.

use crate::environment::TrackingSink;
use crate::types::{Attribution, Reservation, Service, Slot};
use booking_core::detached_effect;
use booking_core::effect::Effect;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// A named analytics event with a JSON payload
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackingEvent {
    /// Event name, e.g. `service_selected`
    pub name: &'static str,
    /// Event properties
    pub payload: Value,
    /// When the wizard observed the event
    pub occurred_at: DateTime<Utc>,
}

impl TrackingEvent {
    fn new(name: &'static str, payload: Value, occurred_at: DateTime<Utc>) -> Self {
        Self {
            name,
            payload,
            occurred_at,
        }
    }

    /// A service was chosen
    #[must_use]
    pub fn service_selected(service: &Service, at: DateTime<Utc>) -> Self {
        Self::new(
            "service_selected",
            json!({ "service_name": service.name, "price": service.price }),
            at,
        )
    }

    /// Slots for a date were loaded
    #[must_use]
    pub fn date_selected(date: NaiveDate, at: DateTime<Utc>) -> Self {
        Self::new("date_selected", json!({ "date": date }), at)
    }

    /// A start time was chosen
    #[must_use]
    pub fn time_slot_selected(time: Slot, at: DateTime<Utc>) -> Self {
        Self::new("time_slot_selected", json!({ "time": time }), at)
    }

    /// The customer reached the contact step
    #[must_use]
    pub fn customer_data_entered(step_number: usize, at: DateTime<Utc>) -> Self {
        Self::new("customer_data_entered", json!({ "step": step_number }), at)
    }

    /// A reservation was created
    #[must_use]
    pub fn booking_completed(
        reservation: &Reservation,
        service: Option<&Service>,
        attribution: &Attribution,
        at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            "booking_completed",
            json!({
                "booking_number": reservation.booking_number,
                "service_name": service.map(|s| s.name.as_str()),
                "price": service.and_then(|s| s.price),
                "attribution": attribution,
            }),
            at,
        )
    }
}

/// Fire-and-forget effect that records `event`; failures are logged and dropped
pub fn record<A: Send + 'static>(sink: &Arc<dyn TrackingSink>, event: TrackingEvent) -> Effect<A> {
    let sink = Arc::clone(sink);
    detached_effect! {
        let name = event.name;
        if let Err(error) = sink.record_event(event).await {
            tracing::debug!(event = name, %error, "Tracking event dropped");
        }
    }
}
