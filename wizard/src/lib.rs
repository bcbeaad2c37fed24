//! # Booking Wizard
//!
//! Orchestration engine for a guarded, multi-step appointment booking flow:
//! provider → service → date & time → contact details → reservation.
//!
//! ## Architecture
//!
//! - [`selection`]: the ordered selections and their cascading reset
//! - [`gate`]: pure step-advance predicates
//! - [`availability`]: slot loading with a last-key-wins guard
//! - [`submission`]: request assembly and the in-flight guard
//! - [`reducer`]: the controller tying them together as a `Reducer`
//! - [`session`]: async facade over a `Store`
//! - [`view`]: read-only projection for rendering
//!
//! ## Example
//!
//! ```ignore
//! use booking_wizard::{BookingWizard, WizardConfig, WizardEnvironment};
//!
//! let wizard = BookingWizard::new(WizardConfig::from_env(), WizardEnvironment::new(directory));
//! wizard.start().await?;
//! wizard.select_provider("p1".into()).await?;
//! wizard.advance().await?;
//! ```

pub mod actions;
pub mod availability;
pub mod config;
pub mod environment;
pub mod error;
pub mod gate;
pub mod layout;
pub mod mocks;
pub mod reducer;
pub mod selection;
pub mod session;
pub mod state;
pub mod submission;
pub mod tracking;
pub mod types;
pub mod view;

pub use actions::WizardAction;
pub use availability::{AvailabilityKey, AvailabilityQuery, SlotAvailabilityLoader};
pub use config::WizardConfig;
pub use environment::{AttributionSource, BookingDirectory, TrackingSink, WizardEnvironment};
pub use error::{
    AttributionError, AvailabilityQueryError, CatalogError, DirectoryError, SubmissionError,
    ValidationError, WizardError,
};
pub use gate::StepGate;
pub use layout::{StepLayout, WizardStep};
pub use reducer::WizardReducer;
pub use selection::SelectionState;
pub use session::{BookingWizard, SubmitOutcome};
pub use state::WizardState;
pub use submission::ReservationSubmitter;
pub use types::{
    Attribution, ContactPayload, Provider, ProviderId, Reservation, ReservationId,
    ReservationRequest, Service, ServiceId, Slot,
};
pub use view::WizardView;

pub use booking_runtime::StoreError;
