//! # Booking Testing
//!
//! Testing utilities and helpers for the booking wizard.
//!
//! This crate provides:
//! - A deterministic `Clock` implementation
//! - `ReducerTest`, a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - Test-friendly tracing initialization
//!
//! ## Example
//!
//! ```ignore
//! use booking_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(WizardReducer::default())
//!     .with_env(test_environment())
//!     .given_state(WizardState::new(StepLayout::FourStage))
//!     .when_action(WizardAction::Retreat)
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use booking_core::environment::Clock;
use chrono::{DateTime, Utc};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use booking_testing::mocks::FixedClock;
    /// use booking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-06-01 09:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        let time = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z")
            .map_or_else(|_| Utc::now(), |t| t.with_timezone(&Utc));
        FixedClock::new(time)
    }
}

/// Install a tracing subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs the
/// subscriber. Honors `RUST_LOG`, defaulting to `debug`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
