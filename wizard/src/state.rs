//! Wizard session state.

use crate::availability::SlotAvailabilityLoader;
use crate::error::{ErrorCategory, WizardError};
use crate::gate::StepGate;
use crate::layout::{StepLayout, WizardStep};
use crate::selection::SelectionState;
use crate::submission::ReservationSubmitter;
use crate::types::{Attribution, Provider, ProviderId, Reservation, Service, ServiceId};

/// Providers and services loaded at wizard start
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    /// Loaded providers
    pub providers: Vec<Provider>,
    /// Loaded services
    pub services: Vec<Service>,
}

impl Catalog {
    /// Looks up a provider by id
    #[must_use]
    pub fn provider(&self, id: &ProviderId) -> Option<&Provider> {
        self.providers.iter().find(|p| &p.id == id)
    }

    /// Looks up a service by id
    #[must_use]
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }
}

/// State of one wizard session
#[derive(Clone, Debug, PartialEq)]
pub struct WizardState {
    layout: StepLayout,
    /// Zero-based position in `layout.steps()`
    step_index: usize,
    /// Customer selections
    pub selection: SelectionState,
    /// Loaded providers and services
    pub catalog: Catalog,
    /// Slot query state
    pub availability: SlotAvailabilityLoader,
    /// Submission state
    pub submitter: ReservationSubmitter,
    /// First-touch attribution, captured once at start
    pub attribution: Attribution,
    /// Most recent error
    pub last_error: Option<WizardError>,
    /// Route to the confirmation page once booked
    pub confirmation_route: Option<String>,
    started: bool,
}

impl WizardState {
    /// Creates an empty session on the first step of `layout`
    #[must_use]
    pub fn new(layout: StepLayout) -> Self {
        Self {
            layout,
            step_index: 0,
            selection: SelectionState::new(),
            catalog: Catalog::default(),
            availability: SlotAvailabilityLoader::new(),
            submitter: ReservationSubmitter::new(),
            attribution: Attribution::default(),
            last_error: None,
            confirmation_route: None,
            started: false,
        }
    }

    /// Step layout of this session
    #[must_use]
    pub const fn layout(&self) -> StepLayout {
        self.layout
    }

    /// Current step
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.layout.steps()[self.step_index]
    }

    /// Current step as a 1-based number
    #[must_use]
    pub const fn step_number(&self) -> usize {
        self.step_index + 1
    }

    /// Whether the current step is the last one
    #[must_use]
    pub const fn is_terminal_step(&self) -> bool {
        self.step_index + 1 == self.layout.step_count()
    }

    /// Whether the current step's gate is open
    ///
    /// On the contact step this means the details are complete and consent
    /// is given.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        StepGate::can_advance(self.step(), &self.selection, &self.availability)
    }

    /// Whether a submit would be accepted right now
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_terminal_step()
            && !self.is_completed()
            && !self.submitter.is_in_flight()
            && ReservationSubmitter::build_request(
                &self.selection,
                &self.availability,
                &self.attribution,
            )
            .is_ok()
    }

    /// Whether there is a previous step
    #[must_use]
    pub const fn can_retreat(&self) -> bool {
        self.step_index > 0
    }

    /// Whether a reservation was created
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.submitter.reservation().is_some()
    }

    /// The created reservation
    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        self.submitter.reservation()
    }

    /// Moves forward one step; the caller checks the gate
    pub(crate) const fn step_forward(&mut self) {
        if !self.is_terminal_step() {
            self.step_index += 1;
        }
    }

    /// Moves back one step, leaving every selection intact
    pub(crate) const fn step_back(&mut self) -> bool {
        if self.step_index == 0 {
            return false;
        }
        self.step_index -= 1;
        true
    }

    /// Marks the catalog load as issued; `false` if it already was
    pub(crate) const fn mark_started(&mut self) -> bool {
        let first = !self.started;
        self.started = true;
        first
    }

    /// Records `error` as the most recent error
    pub(crate) fn set_error(&mut self, error: impl Into<WizardError>) {
        self.last_error = Some(error.into());
    }

    /// Clears the most recent error if it belongs to `category`
    pub(crate) fn clear_error(&mut self, category: ErrorCategory) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|error| error.category() == category)
        {
            self.last_error = None;
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(StepLayout::default())
    }
}
