//! Actions for the booking wizard.
//!
//! Commands are customer intents sent by the UI layer. Events are
//! collaborator results fed back by effects.

use crate::availability::AvailabilityQuery;
use crate::error::{AvailabilityQueryError, CatalogError, SubmissionError, ValidationError};
use crate::types::{
    Attribution, ContactPayload, Provider, ProviderId, Reservation, Service, ServiceId, Slot,
};
use booking_macros::Action;
use chrono::NaiveDate;

/// Everything that can happen to a wizard session
#[derive(Action, Clone, Debug, PartialEq)]
pub enum WizardAction {
    // Commands
    /// Wizard mounted: load the catalog and read attribution
    #[command]
    Start,

    /// Choose a provider from the catalog
    #[command]
    SelectProvider {
        /// Provider to choose
        provider_id: ProviderId,
    },

    /// Choose a service from the catalog
    #[command]
    SelectService {
        /// Service to choose
        service_id: ServiceId,
    },

    /// Choose a day and load its slots
    #[command]
    SelectDate {
        /// Day to choose
        date: NaiveDate,
    },

    /// Choose a start time
    #[command]
    SelectTime {
        /// Start time to choose
        time: Slot,
    },

    /// Replace the contact details
    #[command]
    SetContact {
        /// New contact details
        contact: ContactPayload,
    },

    /// Tick or untick the privacy consent
    #[command]
    SetConsent {
        /// New consent value
        consent: bool,
    },

    /// Move to the next step if the gate allows
    #[command]
    Advance,

    /// Move to the previous step
    #[command]
    Retreat,

    /// Create the reservation
    #[command]
    Submit,

    // Events
    /// Provider list arrived
    #[event]
    ProvidersLoaded {
        /// Loaded providers
        providers: Vec<Provider>,
    },

    /// Service list arrived
    #[event]
    ServicesLoaded {
        /// Loaded services
        services: Vec<Service>,
    },

    /// Provider or service list failed to load
    #[event]
    CatalogLoadFailed {
        /// Which list failed
        error: CatalogError,
    },

    /// Session attribution was read
    #[event]
    AttributionCaptured {
        /// Captured attribution, empty if unavailable
        attribution: Attribution,
    },

    /// A slot query answered
    #[event]
    SlotsLoaded {
        /// Query the answer belongs to
        query: AvailabilityQuery,
        /// Free start times
        slots: Vec<Slot>,
    },

    /// A slot query failed
    #[event]
    SlotsLoadFailed {
        /// Query the failure belongs to
        query: AvailabilityQuery,
        /// Failure
        error: AvailabilityQueryError,
    },

    /// Submission refused before any network call
    #[event]
    SubmissionRefused {
        /// Unmet precondition
        error: ValidationError,
    },

    /// The directory created the reservation
    #[event]
    ReservationCreated {
        /// Created reservation
        reservation: Reservation,
    },

    /// The directory did not create the reservation
    #[event]
    ReservationFailed {
        /// Failure
        error: SubmissionError,
    },
}

impl WizardAction {
    /// Whether this action ends a submit attempt
    #[must_use]
    pub const fn is_submit_outcome(&self) -> bool {
        matches!(
            self,
            Self::SubmissionRefused { .. }
                | Self::ReservationCreated { .. }
                | Self::ReservationFailed { .. }
        )
    }
}
