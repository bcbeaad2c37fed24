//! Configuration management for the booking wizard.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::layout::StepLayout;
use booking_runtime::StoreConfig;
use std::env;
use std::time::Duration;

/// Default route prefix of the confirmation page
pub const DEFAULT_CONFIRMATION_PATH: &str = "/booking/confirmation";

/// Wizard configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Step sequence (`BOOKING_STEP_LAYOUT`)
    pub layout: StepLayout,
    /// Confirmation route prefix (`BOOKING_CONFIRMATION_PATH`)
    pub confirmation_path: String,
    /// How long `submit` waits for an outcome (`BOOKING_SUBMIT_TIMEOUT_SECS`)
    pub submit_timeout: Duration,
    /// How long shutdown waits for running effects (`BOOKING_SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout: Duration,
    /// Buffered effect-produced actions (`BOOKING_BROADCAST_CAPACITY`)
    pub broadcast_capacity: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            layout: StepLayout::FourStage,
            confirmation_path: DEFAULT_CONFIRMATION_PATH.to_string(),
            submit_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(5),
            broadcast_capacity: 64,
        }
    }
}

impl WizardConfig {
    /// Load configuration from environment variables
    ///
    /// Falls back to defaults if environment variables are not set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let layout = match lookup("BOOKING_STEP_LAYOUT") {
            Some(raw) => raw.parse().unwrap_or_else(|error| {
                tracing::warn!(%error, fallback = %defaults.layout, "Invalid BOOKING_STEP_LAYOUT");
                defaults.layout
            }),
            None => defaults.layout,
        };

        Self {
            layout,
            confirmation_path: lookup("BOOKING_CONFIRMATION_PATH")
                .map(|path| path.trim_end_matches('/').to_string())
                .filter(|path| !path.is_empty())
                .unwrap_or(defaults.confirmation_path),
            submit_timeout: lookup("BOOKING_SUBMIT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.submit_timeout, Duration::from_secs),
            shutdown_timeout: lookup("BOOKING_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
            broadcast_capacity: lookup("BOOKING_BROADCAST_CAPACITY")
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.broadcast_capacity),
        }
    }

    /// Set the step layout
    #[must_use]
    pub const fn with_layout(mut self, layout: StepLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the submit timeout
    #[must_use]
    pub const fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig {
            broadcast_capacity: self.broadcast_capacity,
            default_shutdown_timeout: self.shutdown_timeout,
        }
    }
}
