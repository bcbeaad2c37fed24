//! The customer's selections and the cascade that keeps them consistent.
//!
//! Selections form the ordered chain provider → service → date → time.
//! Changing a link clears every link after it. Contact details and consent
//! sit outside the chain and never cascade.

use crate::availability::AvailabilityKey;
use crate::error::ValidationError;
use crate::layout::StepLayout;
use crate::types::{ContactPayload, Provider, Service, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the customer has chosen so far
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Chosen provider
    pub provider: Option<Provider>,
    /// Chosen service
    pub service: Option<Service>,
    /// Chosen day
    pub date: Option<NaiveDate>,
    /// Chosen start time
    pub time: Option<Slot>,
    /// Contact details
    pub contact: ContactPayload,
    /// Privacy consent
    pub consent: bool,
}

impl SelectionState {
    /// Creates an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider and clears service, date and time
    pub fn select_provider(&mut self, provider: Provider) {
        self.provider = Some(provider);
        self.service = None;
        self.clear_schedule();
    }

    /// Sets the service and clears date and time
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ProviderRequired`] without changing anything
    /// when `layout` nests services under providers and no provider is set.
    pub fn select_service(
        &mut self,
        service: Service,
        layout: StepLayout,
    ) -> Result<(), ValidationError> {
        if layout.nests_service_under_provider() && self.provider.is_none() {
            return Err(ValidationError::ProviderRequired);
        }
        self.service = Some(service);
        self.clear_schedule();
        Ok(())
    }

    /// Sets the date and clears the time
    ///
    /// Returns the slot query to run when provider and service are both set.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<AvailabilityKey> {
        self.date = Some(date);
        self.time = None;
        self.availability_key()
    }

    /// Stores the time as given; membership in the slot set is checked by the gate
    pub const fn select_time(&mut self, time: Slot) {
        self.time = Some(time);
    }

    /// Replaces the contact details
    pub fn set_contact(&mut self, contact: ContactPayload) {
        self.contact = contact;
    }

    /// Sets the consent flag
    pub const fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    /// Slot query key for the current provider, service and date
    #[must_use]
    pub fn availability_key(&self) -> Option<AvailabilityKey> {
        match (&self.provider, &self.service, self.date) {
            (Some(provider), Some(service), Some(date)) => Some(AvailabilityKey {
                provider_id: provider.id.clone(),
                service_id: service.id.clone(),
                date,
            }),
            _ => None,
        }
    }

    const fn clear_schedule(&mut self) {
        self.date = None;
        self.time = None;
    }
}
