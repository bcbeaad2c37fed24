//! Step gating: may the customer leave the current step?
//!
//! Pure functions of the selection and the latest slot set. Nothing is
//! cached; callers re-evaluate on every check.

use crate::availability::SlotAvailabilityLoader;
use crate::error::ValidationError;
use crate::layout::WizardStep;
use crate::selection::SelectionState;

/// Decides whether advancing past a step is permitted
pub struct StepGate;

impl StepGate {
    /// Whether the requirements of `step` are met
    #[must_use]
    pub fn can_advance(
        step: WizardStep,
        selection: &SelectionState,
        availability: &SlotAvailabilityLoader,
    ) -> bool {
        Self::check(step, selection, availability).is_ok()
    }

    /// First unmet requirement of `step`
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing what is missing.
    pub fn check(
        step: WizardStep,
        selection: &SelectionState,
        availability: &SlotAvailabilityLoader,
    ) -> Result<(), ValidationError> {
        match step {
            WizardStep::Provider => require_provider(selection),
            WizardStep::Service => require_service(selection),
            WizardStep::ProviderAndService => {
                require_provider(selection)?;
                require_service(selection)
            },
            WizardStep::Schedule => {
                if selection.date.is_none() {
                    return Err(ValidationError::MissingDate);
                }
                let time = selection.time.ok_or(ValidationError::MissingTime)?;
                if availability.contains(time) {
                    Ok(())
                } else {
                    Err(ValidationError::TimeNotAvailable)
                }
            },
            WizardStep::Contact => {
                if !selection.contact.is_complete() {
                    return Err(ValidationError::IncompleteContact);
                }
                if selection.consent {
                    Ok(())
                } else {
                    Err(ValidationError::ConsentRequired)
                }
            },
        }
    }
}

const fn require_provider(selection: &SelectionState) -> Result<(), ValidationError> {
    if selection.provider.is_some() {
        Ok(())
    } else {
        Err(ValidationError::MissingProvider)
    }
}

const fn require_service(selection: &SelectionState) -> Result<(), ValidationError> {
    if selection.service.is_some() {
        Ok(())
    } else {
        Err(ValidationError::MissingService)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::availability::AvailabilityKey;
    use crate::layout::StepLayout;
    use crate::types::{ContactPayload, Provider, Service};

    fn scheduled() -> (SelectionState, SlotAvailabilityLoader) {
        let mut selection = SelectionState::new();
        selection.select_provider(Provider::new("p1", "Mara"));
        selection
            .select_service(Service::new("s1", "Fineline", 60), StepLayout::FourStage)
            .unwrap();
        let key: AvailabilityKey = selection.select_date("2025-06-10".parse().unwrap()).unwrap();

        let mut availability = SlotAvailabilityLoader::new();
        let query = availability.begin(key);
        availability.resolve(&query, Ok(vec!["10:00".parse().unwrap(), "11:00".parse().unwrap()]));
        (selection, availability)
    }

    #[test]
    fn provider_and_service_steps() {
        let availability = SlotAvailabilityLoader::new();
        let mut selection = SelectionState::new();
        assert!(!StepGate::can_advance(WizardStep::Provider, &selection, &availability));

        selection.select_provider(Provider::new("p1", "Mara"));
        assert!(StepGate::can_advance(WizardStep::Provider, &selection, &availability));
        assert_eq!(
            StepGate::check(WizardStep::ProviderAndService, &selection, &availability),
            Err(ValidationError::MissingService)
        );

        selection
            .select_service(Service::new("s1", "Fineline", 60), StepLayout::ThreeStage)
            .unwrap();
        assert!(StepGate::can_advance(WizardStep::Service, &selection, &availability));
        assert!(StepGate::can_advance(
            WizardStep::ProviderAndService,
            &selection,
            &availability
        ));
    }

    #[test]
    fn schedule_requires_time_from_current_slots() {
        let (mut selection, availability) = scheduled();
        assert_eq!(
            StepGate::check(WizardStep::Schedule, &selection, &availability),
            Err(ValidationError::MissingTime)
        );

        selection.select_time("12:00".parse().unwrap());
        assert_eq!(
            StepGate::check(WizardStep::Schedule, &selection, &availability),
            Err(ValidationError::TimeNotAvailable)
        );

        selection.select_time("11:00".parse().unwrap());
        assert!(StepGate::can_advance(WizardStep::Schedule, &selection, &availability));
    }

    #[test]
    fn contact_requires_trimmed_fields_and_consent() {
        let (mut selection, availability) = scheduled();
        selection.set_contact(ContactPayload::new("Ana", " ", "a@x.io", "1"));
        selection.set_consent(true);
        assert_eq!(
            StepGate::check(WizardStep::Contact, &selection, &availability),
            Err(ValidationError::IncompleteContact)
        );

        selection.set_contact(ContactPayload::new("Ana", "Silva", "a@x.io", "1"));
        selection.set_consent(false);
        assert_eq!(
            StepGate::check(WizardStep::Contact, &selection, &availability),
            Err(ValidationError::ConsentRequired)
        );

        selection.set_consent(true);
        assert!(StepGate::can_advance(WizardStep::Contact, &selection, &availability));
    }
}
