//! Collaborators the wizard depends on.
//!
//! Each trait returns boxed futures so implementations can be held as
//! `Arc<dyn …>` and cloned into effects.

use crate::availability::AvailabilityKey;
use crate::error::{AttributionError, DirectoryError, TrackingError};
use crate::tracking::TrackingEvent;
use crate::types::{Attribution, Provider, Reservation, ReservationRequest, Service, Slot};
use booking_core::environment::{Clock, SystemClock};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Source of providers, services, slots and reservations
pub trait BookingDirectory: Send + Sync {
    /// All providers that take bookings
    fn list_providers(&self) -> BoxFuture<'_, Result<Vec<Provider>, DirectoryError>>;

    /// All bookable services
    fn list_services(&self) -> BoxFuture<'_, Result<Vec<Service>, DirectoryError>>;

    /// Free start times for a provider, service and day
    ///
    /// Times are already resolved to the studio's local timezone.
    fn query_availability(
        &self,
        key: AvailabilityKey,
    ) -> BoxFuture<'_, Result<Vec<Slot>, DirectoryError>>;

    /// Create a reservation
    fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> BoxFuture<'_, Result<Reservation, DirectoryError>>;
}

/// Analytics destination; failures never affect the booking flow
pub trait TrackingSink: Send + Sync {
    /// Record one named event
    fn record_event(&self, event: TrackingEvent) -> BoxFuture<'_, Result<(), TrackingError>>;
}

/// First-touch attribution of the current visitor
pub trait AttributionSource: Send + Sync {
    /// Attribution captured when the session began
    fn current_session(&self) -> BoxFuture<'_, Result<Attribution, AttributionError>>;
}

/// Tracking sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrackingSink;

impl TrackingSink for NoopTrackingSink {
    fn record_event(&self, _event: TrackingEvent) -> BoxFuture<'_, Result<(), TrackingError>> {
        Box::pin(async { Ok(()) })
    }
}

/// Attribution source for visitors without campaign data
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttribution;

impl AttributionSource for NoAttribution {
    fn current_session(&self) -> BoxFuture<'_, Result<Attribution, AttributionError>> {
        Box::pin(async { Ok(Attribution::default()) })
    }
}

/// Dependencies injected into the wizard reducer
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Booking directory
    pub directory: Arc<dyn BookingDirectory>,
    /// Analytics sink
    pub tracking: Arc<dyn TrackingSink>,
    /// Attribution source
    pub attribution: Arc<dyn AttributionSource>,
    /// Clock used to timestamp tracking events
    pub clock: Arc<dyn Clock>,
}

impl WizardEnvironment {
    /// Environment with the given directory, no tracking, no attribution
    /// and the system clock
    #[must_use]
    pub fn new(directory: Arc<dyn BookingDirectory>) -> Self {
        Self {
            directory,
            tracking: Arc::new(NoopTrackingSink),
            attribution: Arc::new(NoAttribution),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the tracking sink
    #[must_use]
    pub fn with_tracking(mut self, tracking: Arc<dyn TrackingSink>) -> Self {
        self.tracking = tracking;
        self
    }

    /// Replace the attribution source
    #[must_use]
    pub fn with_attribution(mut self, attribution: Arc<dyn AttributionSource>) -> Self {
        self.attribution = attribution;
        self
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for WizardEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardEnvironment").finish_non_exhaustive()
    }
}
