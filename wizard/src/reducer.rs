//! Reducer driving the booking wizard.
//!
//! The reducer is the wizard controller: it applies selections through the
//! cascade, gates step transitions, owns every availability query and
//! submission call, and turns collaborator results back into state.

use crate::actions::WizardAction;
use crate::availability::{AvailabilityQuery, LoadOutcome};
use crate::config::DEFAULT_CONFIRMATION_PATH;
use crate::environment::WizardEnvironment;
use crate::error::{
    AvailabilityQueryError, CatalogError, ErrorCategory, SubmissionError, ValidationError,
    WizardError,
};
use crate::gate::StepGate;
use crate::layout::WizardStep;
use crate::state::WizardState;
use crate::submission::ReservationSubmitter;
use crate::tracking::{self, TrackingEvent};
use crate::types::{Attribution, ProviderId, Reservation, ServiceId, Slot};
use booking_core::async_effect;
use booking_core::{effect::Effect, reducer::Reducer};
use chrono::NaiveDate;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<WizardAction>; 4]>;

/// Reducer for a wizard session
#[derive(Debug, Clone)]
pub struct WizardReducer {
    confirmation_path: String,
}

impl WizardReducer {
    /// Create a reducer that routes confirmations under `confirmation_path`
    #[must_use]
    pub fn new(confirmation_path: impl Into<String>) -> Self {
        Self {
            confirmation_path: confirmation_path.into(),
        }
    }

    fn confirmation_route(&self, reservation: &Reservation) -> String {
        format!("{}/{}", self.confirmation_path, reservation.id)
    }

    fn start(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        if !state.mark_started() {
            tracing::debug!("Wizard already started, ignoring");
            return SmallVec::new();
        }

        let providers = Arc::clone(&env.directory);
        let services = Arc::clone(&env.directory);
        let attribution = Arc::clone(&env.attribution);

        smallvec![Effect::merge(vec![
            async_effect! {
                Some(match providers.list_providers().await {
                    Ok(providers) => WizardAction::ProvidersLoaded { providers },
                    Err(error) => WizardAction::CatalogLoadFailed {
                        error: CatalogError::Providers(error),
                    },
                })
            },
            async_effect! {
                Some(match services.list_services().await {
                    Ok(services) => WizardAction::ServicesLoaded { services },
                    Err(error) => WizardAction::CatalogLoadFailed {
                        error: CatalogError::Services(error),
                    },
                })
            },
            async_effect! {
                let attribution = attribution.current_session().await.unwrap_or_else(|error| {
                    tracing::debug!(%error, "Attribution unavailable, continuing without it");
                    Attribution::default()
                });
                Some(WizardAction::AttributionCaptured { attribution })
            },
        ])]
    }

    fn select_provider(state: &mut WizardState, provider_id: &ProviderId) -> Effects {
        let Some(provider) = state.catalog.provider(provider_id).cloned() else {
            tracing::debug!(%provider_id, "Unknown provider selected");
            state.set_error(ValidationError::UnknownProvider(provider_id.clone()));
            return SmallVec::new();
        };

        tracing::debug!(%provider_id, "Provider selected");
        state.selection.select_provider(provider);
        state.availability.deactivate();
        state.clear_error(ErrorCategory::Validation);
        SmallVec::new()
    }

    fn select_service(
        state: &mut WizardState,
        service_id: &ServiceId,
        env: &WizardEnvironment,
    ) -> Effects {
        let Some(service) = state.catalog.service(service_id).cloned() else {
            tracing::debug!(%service_id, "Unknown service selected");
            state.set_error(ValidationError::UnknownService(service_id.clone()));
            return SmallVec::new();
        };

        let event = TrackingEvent::service_selected(&service, env.clock.now());
        let layout = state.layout();
        if let Err(error) = state.selection.select_service(service, layout) {
            tracing::debug!(%service_id, %error, "Service selection refused");
            state.set_error(error);
            return SmallVec::new();
        }

        tracing::debug!(%service_id, "Service selected");
        state.availability.deactivate();
        state.clear_error(ErrorCategory::Validation);
        smallvec![tracking::record(&env.tracking, event)]
    }

    fn select_date(state: &mut WizardState, date: NaiveDate, env: &WizardEnvironment) -> Effects {
        state.availability.deactivate();
        let Some(key) = state.selection.select_date(date) else {
            tracing::debug!(%date, "Date selected without provider and service, no slot query");
            return SmallVec::new();
        };

        let query = state.availability.begin(key);
        tracing::debug!(%query, "Loading availability");
        smallvec![Self::query_availability(query, env)]
    }

    fn query_availability(
        query: AvailabilityQuery,
        env: &WizardEnvironment,
    ) -> Effect<WizardAction> {
        let directory = Arc::clone(&env.directory);
        async_effect! {
            Some(match directory.query_availability(query.key.clone()).await {
                Ok(slots) => WizardAction::SlotsLoaded { query, slots },
                Err(error) => WizardAction::SlotsLoadFailed {
                    query,
                    error: AvailabilityQueryError::from(error),
                },
            })
        }
    }

    fn select_time(state: &mut WizardState, time: Slot, env: &WizardEnvironment) -> Effects {
        tracing::debug!(%time, "Time selected");
        state.selection.select_time(time);
        smallvec![tracking::record(
            &env.tracking,
            TrackingEvent::time_slot_selected(time, env.clock.now()),
        )]
    }

    fn advance(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        let step = state.step();
        if state.is_terminal_step() {
            tracing::debug!(?step, "Advance on terminal step ignored");
            return SmallVec::new();
        }
        if let Err(reason) = StepGate::check(step, &state.selection, &state.availability) {
            tracing::debug!(?step, %reason, "Advance refused by gate");
            return SmallVec::new();
        }

        state.step_forward();
        tracing::debug!(step = ?state.step(), number = state.step_number(), "Advanced");

        if state.step() == WizardStep::Contact {
            smallvec![tracking::record(
                &env.tracking,
                TrackingEvent::customer_data_entered(state.step_number(), env.clock.now()),
            )]
        } else {
            SmallVec::new()
        }
    }

    fn submit(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        if state.submitter.is_in_flight() {
            tracing::warn!("Submission already in flight, ignoring");
            return SmallVec::new();
        }

        let request = match ReservationSubmitter::build_request(
            &state.selection,
            &state.availability,
            &state.attribution,
        ) {
            Ok(request) => request,
            Err(error) => {
                tracing::debug!(%error, "Submission refused");
                state.set_error(error.clone());
                return smallvec![async_effect! {
                    Some(WizardAction::SubmissionRefused { error })
                }];
            },
        };

        if !state.submitter.try_begin() {
            return SmallVec::new();
        }
        state.clear_error(ErrorCategory::Validation);
        state.clear_error(ErrorCategory::Submission);
        tracing::debug!(
            provider_id = %request.provider_id,
            service_id = %request.service_id,
            date = %request.booking_date,
            time = %request.start_time,
            "Submitting reservation"
        );

        let directory = Arc::clone(&env.directory);
        smallvec![async_effect! {
            Some(match directory.create_reservation(request).await {
                Ok(reservation) => WizardAction::ReservationCreated { reservation },
                Err(error) => WizardAction::ReservationFailed {
                    error: SubmissionError::from(error),
                },
            })
        }]
    }

    fn slots_resolved(
        state: &mut WizardState,
        query: &AvailabilityQuery,
        result: Result<Vec<Slot>, AvailabilityQueryError>,
        env: &WizardEnvironment,
    ) -> Effects {
        let failure = result.as_ref().err().cloned();
        match state.availability.resolve(query, result) {
            LoadOutcome::Applied => {
                tracing::debug!(%query, slots = state.availability.slots().len(), "Slots applied");
                state.clear_error(ErrorCategory::Availability);
                smallvec![tracking::record(
                    &env.tracking,
                    TrackingEvent::date_selected(query.key.date, env.clock.now()),
                )]
            },
            LoadOutcome::Failed => {
                if let Some(error) = failure {
                    tracing::debug!(%query, cause = %error.cause, "Availability query failed");
                    state.set_error(error);
                }
                SmallVec::new()
            },
            LoadOutcome::Stale => SmallVec::new(),
        }
    }

    fn reservation_created(
        &self,
        state: &mut WizardState,
        reservation: Reservation,
        env: &WizardEnvironment,
    ) -> Effects {
        tracing::info!(
            reservation_id = %reservation.id,
            booking_number = %reservation.booking_number,
            "Reservation created"
        );

        let event = TrackingEvent::booking_completed(
            &reservation,
            state.selection.service.as_ref(),
            &state.attribution,
            env.clock.now(),
        );
        state.confirmation_route = Some(self.confirmation_route(&reservation));
        state.submitter.succeed(reservation);
        state.clear_error(ErrorCategory::Submission);
        smallvec![tracking::record(&env.tracking, event)]
    }
}

impl Default for WizardReducer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRMATION_PATH)
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if state.is_completed() && action.is_command() {
            tracing::debug!(action = action.action_name(), "Session completed, ignoring");
            return SmallVec::new();
        }

        match action {
            WizardAction::Start => Self::start(state, env),

            WizardAction::SelectProvider { provider_id } => {
                Self::select_provider(state, &provider_id)
            },

            WizardAction::SelectService { service_id } => {
                Self::select_service(state, &service_id, env)
            },

            WizardAction::SelectDate { date } => Self::select_date(state, date, env),

            WizardAction::SelectTime { time } => Self::select_time(state, time, env),

            WizardAction::SetContact { contact } => {
                state.selection.set_contact(contact);
                SmallVec::new()
            },

            WizardAction::SetConsent { consent } => {
                state.selection.set_consent(consent);
                SmallVec::new()
            },

            WizardAction::Advance => Self::advance(state, env),

            WizardAction::Retreat => {
                if !state.step_back() {
                    tracing::debug!("Retreat on first step ignored");
                }
                SmallVec::new()
            },

            WizardAction::Submit => Self::submit(state, env),

            WizardAction::ProvidersLoaded { providers } => {
                tracing::debug!(count = providers.len(), "Providers loaded");
                state.catalog.providers = providers;
                if matches!(
                    state.last_error,
                    Some(WizardError::Catalog(CatalogError::Providers(_)))
                ) {
                    state.last_error = None;
                }
                SmallVec::new()
            },

            WizardAction::ServicesLoaded { services } => {
                tracing::debug!(count = services.len(), "Services loaded");
                state.catalog.services = services;
                if matches!(
                    state.last_error,
                    Some(WizardError::Catalog(CatalogError::Services(_)))
                ) {
                    state.last_error = None;
                }
                SmallVec::new()
            },

            WizardAction::CatalogLoadFailed { error } => {
                tracing::warn!(%error, "Catalog load failed");
                state.set_error(error);
                SmallVec::new()
            },

            WizardAction::AttributionCaptured { attribution } => {
                state.attribution = attribution;
                SmallVec::new()
            },

            WizardAction::SlotsLoaded { query, slots } => {
                Self::slots_resolved(state, &query, Ok(slots), env)
            },

            WizardAction::SlotsLoadFailed { query, error } => {
                Self::slots_resolved(state, &query, Err(error), env)
            },

            // Recorded when the submit was refused
            WizardAction::SubmissionRefused { .. } => SmallVec::new(),

            WizardAction::ReservationCreated { reservation } => {
                self.reservation_created(state, reservation, env)
            },

            WizardAction::ReservationFailed { error } => {
                tracing::info!(%error, "Reservation failed");
                state.submitter.fail();
                state.set_error(error);
                SmallVec::new()
            },
        }
    }
}
