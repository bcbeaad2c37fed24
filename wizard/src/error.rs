//! Error taxonomy for the booking wizard.
//!
//! Collaborator failures are captured into state as displayable messages;
//! none of these errors cross the public operation boundary as panics or
//! early returns.

use crate::types::{ProviderId, ServiceId};
use thiserror::Error;

/// Generic message shown when a submission fails without a usable reason
pub const GENERIC_SUBMIT_FAILURE: &str = "Could not complete the booking. Please try again.";

/// Failure reported by the booking directory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory refused the request as invalid
    #[error("{0}")]
    Validation(String),

    /// The requested slot or resource is no longer available
    #[error("{0}")]
    Conflict(String),

    /// Network or server failure; retrying may succeed
    #[error("transient directory failure: {0}")]
    Transient(String),
}

/// A precondition the user has not met yet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No provider chosen
    #[error("Please choose a provider")]
    MissingProvider,

    /// No service chosen
    #[error("Please choose a service")]
    MissingService,

    /// No date chosen
    #[error("Please pick a date")]
    MissingDate,

    /// No time chosen
    #[error("Please pick a time slot")]
    MissingTime,

    /// The chosen time is not in the latest slot set
    #[error("The selected time is not available")]
    TimeNotAvailable,

    /// A contact field is empty
    #[error("Please fill in all contact fields")]
    IncompleteContact,

    /// Consent checkbox not ticked
    #[error("Please accept the privacy policy")]
    ConsentRequired,

    /// A service was chosen before its provider
    #[error("Please choose a provider before choosing a service")]
    ProviderRequired,

    /// Provider id not present in the loaded catalog
    #[error("Unknown provider: {0}")]
    UnknownProvider(ProviderId),

    /// Service id not present in the loaded catalog
    #[error("Unknown service: {0}")]
    UnknownService(ServiceId),
}

/// Loading the slot set for a (provider, service, date) failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not load available times")]
pub struct AvailabilityQueryError {
    /// Underlying directory failure
    #[source]
    pub cause: DirectoryError,
}

impl From<DirectoryError> for AvailabilityQueryError {
    fn from(cause: DirectoryError) -> Self {
        Self { cause }
    }
}

/// Loading the provider or service catalog failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Provider list unavailable
    #[error("Could not load providers")]
    Providers(#[source] DirectoryError),

    /// Service list unavailable
    #[error("Could not load services")]
    Services(#[source] DirectoryError),
}

/// Attribution data could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("attribution unavailable: {0}")]
pub struct AttributionError(pub String);

/// An analytics event could not be recorded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("tracking failed: {0}")]
pub struct TrackingError(pub String);

/// Creating the reservation failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The slot was taken in the meantime
    #[error("{0}")]
    Conflict(String),

    /// The directory rejected the request
    #[error("{0}")]
    Rejected(String),

    /// The request did not reach the directory or the reply was lost
    #[error("transport failure: {0}")]
    Transport(String),
}

impl SubmissionError {
    /// Message for the customer, falling back to a generic retry hint
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Conflict(reason) | Self::Rejected(reason) if !reason.trim().is_empty() => {
                reason.clone()
            },
            _ => GENERIC_SUBMIT_FAILURE.to_owned(),
        }
    }
}

impl From<DirectoryError> for SubmissionError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::Validation(reason) => Self::Rejected(reason),
            DirectoryError::Conflict(reason) => Self::Conflict(reason),
            DirectoryError::Transient(reason) => Self::Transport(reason),
        }
    }
}

/// Category of the most recent error, used to clear it on a later success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input problems
    Validation,
    /// Provider/service catalog
    Catalog,
    /// Slot availability
    Availability,
    /// Reservation creation
    Submission,
}

/// The single most recent error shown to the customer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// See [`ValidationError`]
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// See [`CatalogError`]
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// See [`AvailabilityQueryError`]
    #[error(transparent)]
    Availability(#[from] AvailabilityQueryError),

    /// See [`SubmissionError`]
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl WizardError {
    /// Which operation category produced this error
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Catalog(_) => ErrorCategory::Catalog,
            Self::Availability(_) => ErrorCategory::Availability,
            Self::Submission(_) => ErrorCategory::Submission,
        }
    }

    /// Text to show the customer
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Submission(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_message_prefers_directory_reason() {
        let error = SubmissionError::Conflict("Slot already taken".to_string());
        assert_eq!(error.display_message(), "Slot already taken");
    }

    #[test]
    fn submission_message_falls_back_to_generic() {
        assert_eq!(
            SubmissionError::Transport("connection reset".to_string()).display_message(),
            GENERIC_SUBMIT_FAILURE
        );
        assert_eq!(
            SubmissionError::Rejected("  ".to_string()).display_message(),
            GENERIC_SUBMIT_FAILURE
        );
    }

    #[test]
    fn directory_errors_map_onto_submission_errors() {
        assert_eq!(
            SubmissionError::from(DirectoryError::Conflict("taken".into())),
            SubmissionError::Conflict("taken".into())
        );
        assert_eq!(
            SubmissionError::from(DirectoryError::Validation("bad email".into())),
            SubmissionError::Rejected("bad email".into())
        );
        assert!(matches!(
            SubmissionError::from(DirectoryError::Transient("timeout".into())),
            SubmissionError::Transport(_)
        ));
    }

    #[test]
    fn catalog_errors_name_the_failing_list() {
        let error = WizardError::from(CatalogError::Services(DirectoryError::Transient(
            "503".into(),
        )));
        assert_eq!(error.display_message(), "Could not load services");
        assert_eq!(error.category(), ErrorCategory::Catalog);
    }
}
