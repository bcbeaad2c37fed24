//! Reservation submission: request assembly and the in-flight guard.

use crate::availability::SlotAvailabilityLoader;
use crate::error::ValidationError;
use crate::gate::StepGate;
use crate::layout::WizardStep;
use crate::selection::SelectionState;
use crate::types::{Attribution, Reservation, ReservationRequest};

/// Submission state for one wizard session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationSubmitter {
    in_flight: bool,
    reservation: Option<Reservation>,
}

impl ReservationSubmitter {
    /// Creates an idle submitter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the request from the current selection
    ///
    /// # Errors
    ///
    /// Returns the first unmet precondition: a missing selection, incomplete
    /// contact details or missing consent.
    pub fn build_request(
        selection: &SelectionState,
        availability: &SlotAvailabilityLoader,
        attribution: &Attribution,
    ) -> Result<ReservationRequest, ValidationError> {
        let provider = selection
            .provider
            .as_ref()
            .ok_or(ValidationError::MissingProvider)?;
        let service = selection
            .service
            .as_ref()
            .ok_or(ValidationError::MissingService)?;
        let date = selection.date.ok_or(ValidationError::MissingDate)?;
        let time = selection.time.ok_or(ValidationError::MissingTime)?;
        StepGate::check(WizardStep::Contact, selection, availability)?;

        Ok(ReservationRequest {
            provider_id: provider.id.clone(),
            service_id: service.id.clone(),
            booking_date: date,
            start_time: time,
            customer: selection.contact.clone(),
            attribution: attribution.clone(),
        })
    }

    /// Claims the in-flight slot; `false` if a submission is already running
    pub const fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Records a successful reservation
    pub fn succeed(&mut self, reservation: Reservation) {
        self.in_flight = false;
        self.reservation = Some(reservation);
    }

    /// Releases the in-flight slot after a failure
    pub const fn fail(&mut self) {
        self.in_flight = false;
    }

    /// Whether a submission is running
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// The created reservation, once successful
    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }
}
