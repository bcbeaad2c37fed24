//! Step layouts and the wizard step sequence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One stage of the wizard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Choose who performs the service (four-stage layout)
    Provider,
    /// Choose what is booked (four-stage layout)
    Service,
    /// Choose provider and service on one screen (three-stage layout)
    ProviderAndService,
    /// Choose date and start time
    Schedule,
    /// Enter contact details and submit
    Contact,
}

impl WizardStep {
    /// Heading shown for this step
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Provider => "Choose provider",
            Self::Service => "Choose service",
            Self::ProviderAndService => "Choose provider & service",
            Self::Schedule => "Pick a date & time",
            Self::Contact => "Your details",
        }
    }
}

const FOUR_STAGE: [WizardStep; 4] = [
    WizardStep::Provider,
    WizardStep::Service,
    WizardStep::Schedule,
    WizardStep::Contact,
];

const THREE_STAGE: [WizardStep; 3] = [
    WizardStep::ProviderAndService,
    WizardStep::Schedule,
    WizardStep::Contact,
];

/// Which step sequence the wizard runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepLayout {
    /// Provider, Service, Schedule, Contact
    #[default]
    FourStage,
    /// Provider & Service, Schedule, Contact
    ThreeStage,
}

impl StepLayout {
    /// Ordered steps of this layout
    #[must_use]
    pub const fn steps(self) -> &'static [WizardStep] {
        match self {
            Self::FourStage => &FOUR_STAGE,
            Self::ThreeStage => &THREE_STAGE,
        }
    }

    /// Number of steps
    #[must_use]
    pub const fn step_count(self) -> usize {
        self.steps().len()
    }

    /// Step at a 1-based position, `None` outside `[1, len]`
    #[must_use]
    pub fn step_at(self, number: usize) -> Option<WizardStep> {
        number
            .checked_sub(1)
            .and_then(|index| self.steps().get(index).copied())
    }

    /// Whether choosing a service requires a provider on the same screen
    #[must_use]
    pub const fn nests_service_under_provider(self) -> bool {
        matches!(self, Self::ThreeStage)
    }
}

impl fmt::Display for StepLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FourStage => "four-stage",
            Self::ThreeStage => "three-stage",
        })
    }
}

/// Error returned for an unrecognised layout name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown step layout '{0}', expected 'four-stage' or 'three-stage'")]
pub struct ParseLayoutError(String);

impl FromStr for StepLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "four-stage" | "four" | "4" => Ok(Self::FourStage),
            "three-stage" | "three" | "3" => Ok(Self::ThreeStage),
            _ => Err(ParseLayoutError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_end_with_schedule_then_contact() {
        for layout in [StepLayout::FourStage, StepLayout::ThreeStage] {
            let steps = layout.steps();
            assert_eq!(steps[steps.len() - 2], WizardStep::Schedule);
            assert_eq!(steps[steps.len() - 1], WizardStep::Contact);
        }
    }

    #[test]
    fn step_at_is_one_based() {
        assert_eq!(StepLayout::FourStage.step_at(0), None);
        assert_eq!(StepLayout::FourStage.step_at(1), Some(WizardStep::Provider));
        assert_eq!(StepLayout::ThreeStage.step_at(3), Some(WizardStep::Contact));
        assert_eq!(StepLayout::ThreeStage.step_at(4), None);
    }

    #[test]
    fn layout_parses_from_config_strings() {
        assert_eq!("four-stage".parse::<StepLayout>(), Ok(StepLayout::FourStage));
        assert_eq!("THREE_STAGE".parse::<StepLayout>(), Ok(StepLayout::ThreeStage));
        assert!("five-stage".parse::<StepLayout>().is_err());
        assert_eq!(StepLayout::ThreeStage.to_string(), "three-stage");
    }
}
