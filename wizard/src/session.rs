//! Async handle over one wizard session's store.

use crate::actions::WizardAction;
use crate::config::WizardConfig;
use crate::environment::WizardEnvironment;
use crate::error::{SubmissionError, ValidationError};
use crate::reducer::WizardReducer;
use crate::state::WizardState;
use crate::types::{ContactPayload, ProviderId, Reservation, ServiceId, Slot};
use crate::view::WizardView;
use booking_runtime::{EffectHandle, Store, StoreError};
use chrono::NaiveDate;

/// Store type backing a wizard session
pub type WizardStore = Store<WizardState, WizardAction, WizardEnvironment, WizardReducer>;

/// Terminal result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Reservation created; navigate to `confirmation_route`
    Confirmed {
        /// Created reservation
        reservation: Reservation,
        /// Confirmation page route
        confirmation_route: String,
    },
    /// The directory refused or the call failed; state kept for a retry
    Failed {
        /// Failure
        error: SubmissionError,
        /// Message to show
        message: String,
    },
    /// A precondition was unmet; nothing was sent
    Invalid(ValidationError),
}

/// A running booking wizard session
///
/// # Example
///
/// ```ignore
/// let wizard = BookingWizard::new(WizardConfig::from_env(), environment);
/// wizard.start().await?;
/// wizard.select_provider("p1".into()).await?;
/// wizard.advance().await?;
/// let view = wizard.view().await;
/// ```
#[derive(Clone)]
pub struct BookingWizard {
    store: WizardStore,
    config: WizardConfig,
}

impl BookingWizard {
    /// Create a session with an empty selection on the first step
    #[must_use]
    pub fn new(config: WizardConfig, environment: WizardEnvironment) -> Self {
        let store = Store::with_config(
            WizardState::new(config.layout),
            WizardReducer::new(config.confirmation_path.clone()),
            environment,
            &config.store_config(),
        );
        Self { store, config }
    }

    /// Load the catalog and attribution
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn start(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::Start).await
    }

    /// Choose a provider
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn select_provider(&self, provider_id: ProviderId) -> Result<EffectHandle, StoreError> {
        self.store
            .send(WizardAction::SelectProvider { provider_id })
            .await
    }

    /// Choose a service
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn select_service(&self, service_id: ServiceId) -> Result<EffectHandle, StoreError> {
        self.store
            .send(WizardAction::SelectService { service_id })
            .await
    }

    /// Choose a date; the handle completes when its slot query resolves
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn select_date(&self, date: NaiveDate) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::SelectDate { date }).await
    }

    /// Choose a start time
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn select_time(&self, time: Slot) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::SelectTime { time }).await
    }

    /// Replace the contact details
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn set_contact(&self, contact: ContactPayload) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::SetContact { contact }).await
    }

    /// Set the privacy consent
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn set_consent(&self, consent: bool) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::SetConsent { consent }).await
    }

    /// Go to the next step if allowed
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn advance(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::Advance).await
    }

    /// Go to the previous step
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after shutdown.
    pub async fn retreat(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(WizardAction::Retreat).await
    }

    /// Submit the reservation and wait for its outcome
    ///
    /// A session that is already booked returns its confirmation without
    /// submitting again.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no outcome within the configured submit timeout
    /// - [`StoreError::ShutdownInProgress`]: the session was shut down
    pub async fn submit(&self) -> Result<SubmitOutcome, StoreError> {
        if let Some(outcome) = self.store.state(confirmed_outcome).await {
            return Ok(outcome);
        }

        let outcome = self
            .store
            .send_and_wait_for(
                WizardAction::Submit,
                WizardAction::is_submit_outcome,
                self.config.submit_timeout,
            )
            .await?;

        Ok(match outcome {
            WizardAction::ReservationCreated { reservation } => {
                let route = self
                    .store
                    .state(|s| s.confirmation_route.clone())
                    .await
                    .unwrap_or_default();
                SubmitOutcome::Confirmed {
                    reservation,
                    confirmation_route: route,
                }
            },
            WizardAction::ReservationFailed { error } => SubmitOutcome::Failed {
                message: error.display_message(),
                error,
            },
            WizardAction::SubmissionRefused { error } => SubmitOutcome::Invalid(error),
            other => {
                tracing::error!(action = other.action_name(), "Unexpected submit outcome");
                return Err(StoreError::ChannelClosed);
            },
        })
    }

    /// Snapshot for rendering
    pub async fn view(&self) -> WizardView {
        self.store.state(|state| WizardView::from(state)).await
    }

    /// Read arbitrary state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&WizardState) -> T,
    {
        self.store.state(f).await
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Stop accepting actions and wait for running effects
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// after the configured shutdown timeout.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown(self.config.shutdown_timeout).await
    }
}

fn confirmed_outcome(state: &WizardState) -> Option<SubmitOutcome> {
    let reservation = state.reservation()?;
    Some(SubmitOutcome::Confirmed {
        reservation: reservation.clone(),
        confirmation_route: state.confirmation_route.clone().unwrap_or_default(),
    })
}
