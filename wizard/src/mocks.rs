//! In-memory collaborators for tests and demos.
//!
//! `InMemoryDirectory` serves a fixed catalog and slot table, can delay
//! individual dates, fail scripted calls and counts every call it receives.

use crate::availability::AvailabilityKey;
use crate::environment::{AttributionSource, BookingDirectory, TrackingSink};
use crate::error::{AttributionError, DirectoryError, TrackingError};
use crate::tracking::TrackingEvent;
use crate::types::{
    Attribution, Provider, Reservation, ReservationId, ReservationRequest, Service, Slot,
};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct DirectoryData {
    providers: Vec<Provider>,
    services: Vec<Service>,
    slots: HashMap<AvailabilityKey, Vec<Slot>>,
    latency: HashMap<NaiveDate, Duration>,
    availability_failures: HashMap<NaiveDate, DirectoryError>,
    providers_failure: Option<DirectoryError>,
    services_failure: Option<DirectoryError>,
    reservation_script: VecDeque<Result<Reservation, DirectoryError>>,
    reservation_latency: Duration,
    requests: Vec<ReservationRequest>,
}

/// Booking directory backed by in-memory tables
#[derive(Default)]
pub struct InMemoryDirectory {
    data: Mutex<DirectoryData>,
    provider_calls: AtomicUsize,
    service_calls: AtomicUsize,
    availability_calls: AtomicUsize,
    reservation_calls: AtomicUsize,
}

impl InMemoryDirectory {
    /// Empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the catalog
    #[must_use]
    pub fn with_provider(self, provider: Provider) -> Self {
        lock(&self.data).providers.push(provider);
        self
    }

    /// Add a service to the catalog
    #[must_use]
    pub fn with_service(self, service: Service) -> Self {
        lock(&self.data).services.push(service);
        self
    }

    /// Serve `slots` for a provider, service and date
    #[must_use]
    pub fn with_slots(self, key: AvailabilityKey, slots: Vec<Slot>) -> Self {
        lock(&self.data).slots.insert(key, slots);
        self
    }

    /// Delay availability answers for `date`
    #[must_use]
    pub fn with_latency(self, date: NaiveDate, delay: Duration) -> Self {
        lock(&self.data).latency.insert(date, delay);
        self
    }

    /// Delay reservation answers
    #[must_use]
    pub fn with_reservation_latency(self, delay: Duration) -> Self {
        lock(&self.data).reservation_latency = delay;
        self
    }

    /// Fail availability queries for `date`
    #[must_use]
    pub fn failing_availability(self, date: NaiveDate, error: DirectoryError) -> Self {
        lock(&self.data).availability_failures.insert(date, error);
        self
    }

    /// Fail the provider list
    #[must_use]
    pub fn failing_providers(self, error: DirectoryError) -> Self {
        lock(&self.data).providers_failure = Some(error);
        self
    }

    /// Fail the service list
    #[must_use]
    pub fn failing_services(self, error: DirectoryError) -> Self {
        lock(&self.data).services_failure = Some(error);
        self
    }

    /// Queue the answer to the next unscripted reservation call
    ///
    /// Once the script is exhausted reservations succeed with ids `R-1`, `R-2`, …
    #[must_use]
    pub fn script_reservation(self, outcome: Result<Reservation, DirectoryError>) -> Self {
        lock(&self.data).reservation_script.push_back(outcome);
        self
    }

    /// Number of `list_providers` calls
    #[must_use]
    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_services` calls
    #[must_use]
    pub fn service_calls(&self) -> usize {
        self.service_calls.load(Ordering::SeqCst)
    }

    /// Number of `query_availability` calls
    #[must_use]
    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_reservation` calls
    #[must_use]
    pub fn reservation_calls(&self) -> usize {
        self.reservation_calls.load(Ordering::SeqCst)
    }

    /// Every reservation request received, oldest first
    #[must_use]
    pub fn reservation_requests(&self) -> Vec<ReservationRequest> {
        lock(&self.data).requests.clone()
    }

    /// Total calls of any kind
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.provider_calls()
            + self.service_calls()
            + self.availability_calls()
            + self.reservation_calls()
    }
}

impl BookingDirectory for InMemoryDirectory {
    fn list_providers(&self) -> BoxFuture<'_, Result<Vec<Provider>, DirectoryError>> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        let data = lock(&self.data);
        let result = data
            .providers_failure
            .clone()
            .map_or_else(|| Ok(data.providers.clone()), Err);
        Box::pin(async move { result })
    }

    fn list_services(&self) -> BoxFuture<'_, Result<Vec<Service>, DirectoryError>> {
        self.service_calls.fetch_add(1, Ordering::SeqCst);
        let data = lock(&self.data);
        let result = data
            .services_failure
            .clone()
            .map_or_else(|| Ok(data.services.clone()), Err);
        Box::pin(async move { result })
    }

    fn query_availability(
        &self,
        key: AvailabilityKey,
    ) -> BoxFuture<'_, Result<Vec<Slot>, DirectoryError>> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = {
            let data = lock(&self.data);
            let delay = data.latency.get(&key.date).copied();
            let result = data.availability_failures.get(&key.date).cloned().map_or_else(
                || Ok(data.slots.get(&key).cloned().unwrap_or_default()),
                Err,
            );
            (delay, result)
        };

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> BoxFuture<'_, Result<Reservation, DirectoryError>> {
        let call = self.reservation_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let (delay, result) = {
            let mut data = lock(&self.data);
            data.requests.push(request);
            let result = data.reservation_script.pop_front().unwrap_or_else(|| {
                Ok(Reservation {
                    id: ReservationId::new(format!("R-{call}")),
                    booking_number: format!("BK-{call:04}"),
                })
            });
            (data.reservation_latency, result)
        };

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// Tracking sink that keeps every event in memory
#[derive(Default)]
pub struct RecordingTrackingSink {
    events: Mutex<Vec<TrackingEvent>>,
    failing: bool,
}

impl RecordingTrackingSink {
    /// Sink that records successfully
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that records and then reports a failure for every event
    #[must_use]
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            failing: true,
        }
    }

    /// Recorded events, oldest first
    #[must_use]
    pub fn events(&self) -> Vec<TrackingEvent> {
        lock(&self.events).clone()
    }

    /// Names of recorded events, oldest first
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        lock(&self.events).iter().map(|event| event.name).collect()
    }

    /// How often `name` was recorded
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| event.name == name)
            .count()
    }
}

impl TrackingSink for RecordingTrackingSink {
    fn record_event(&self, event: TrackingEvent) -> BoxFuture<'_, Result<(), TrackingError>> {
        let name = event.name;
        lock(&self.events).push(event);
        let result = if self.failing {
            Err(TrackingError(format!("sink rejected {name}")))
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }
}

/// Attribution source returning a fixed value or a fixed failure
pub struct FixedAttribution(Result<Attribution, AttributionError>);

impl FixedAttribution {
    /// Always returns `attribution`
    #[must_use]
    pub const fn new(attribution: Attribution) -> Self {
        Self(Ok(attribution))
    }

    /// Always fails with `reason`
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self(Err(AttributionError(reason.into())))
    }
}

impl AttributionSource for FixedAttribution {
    fn current_session(&self) -> BoxFuture<'_, Result<Attribution, AttributionError>> {
        let result = self.0.clone();
        Box::pin(async move { result })
    }
}
