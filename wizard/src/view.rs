//! Read-only projection of a wizard session for rendering.

use crate::layout::{StepLayout, WizardStep};
use crate::selection::SelectionState;
use crate::state::WizardState;
use crate::types::{Provider, Reservation, Service, Slot};
use serde::Serialize;

/// Everything a UI needs to draw the current step
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WizardView {
    /// Step sequence
    pub layout: StepLayout,
    /// Current step
    pub step: WizardStep,
    /// Current step, 1-based
    pub step_number: usize,
    /// Number of steps in the layout
    pub total_steps: usize,
    /// Heading of the current step
    pub step_label: &'static str,
    /// Whether the current step's requirements are met
    pub can_advance: bool,
    /// Whether "book" is enabled
    pub can_submit: bool,
    /// Whether "back" is enabled
    pub can_retreat: bool,
    /// Whether this is the contact step
    pub is_terminal_step: bool,
    /// Loaded providers
    pub providers: Vec<Provider>,
    /// Loaded services
    pub services: Vec<Service>,
    /// Current selections
    pub selection: SelectionState,
    /// Latest slot set
    pub slots: Vec<Slot>,
    /// Whether a slot query is running
    pub is_loading_slots: bool,
    /// Whether a submission is running
    pub is_submitting: bool,
    /// Most recent error message
    pub last_error: Option<String>,
    /// Created reservation
    pub reservation: Option<Reservation>,
    /// Where to navigate after booking
    pub confirmation_route: Option<String>,
}

impl From<&WizardState> for WizardView {
    fn from(state: &WizardState) -> Self {
        let step = state.step();
        Self {
            layout: state.layout(),
            step,
            step_number: state.step_number(),
            total_steps: state.layout().step_count(),
            step_label: step.label(),
            can_advance: state.can_advance(),
            can_submit: state.can_submit(),
            can_retreat: state.can_retreat(),
            is_terminal_step: state.is_terminal_step(),
            providers: state.catalog.providers.clone(),
            services: state.catalog.services.clone(),
            selection: state.selection.clone(),
            slots: state.availability.slots().to_vec(),
            is_loading_slots: state.availability.is_loading(),
            is_submitting: state.submitter.is_in_flight(),
            last_error: state.last_error.as_ref().map(|error| error.display_message()),
            reservation: state.reservation().cloned(),
            confirmation_route: state.confirmation_route.clone(),
        }
    }
}
