//! Shared fixtures for wizard integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use booking_testing::test_clock;
use booking_wizard::mocks::{FixedAttribution, InMemoryDirectory, RecordingTrackingSink};
use booking_wizard::{
    Attribution, AvailabilityKey, BookingWizard, ContactPayload, Provider, Service, Slot,
    StepLayout, WizardConfig, WizardEnvironment,
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

pub const WAIT: Duration = Duration::from_secs(5);

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn slot(s: &str) -> Slot {
    s.parse().unwrap()
}

pub fn key(provider: &str, service: &str, day: &str) -> AvailabilityKey {
    AvailabilityKey {
        provider_id: provider.into(),
        service_id: service.into(),
        date: date(day),
    }
}

pub fn contact() -> ContactPayload {
    ContactPayload::new("Ana", "Silva", "ana@example.com", "+49 30 1234567")
}

pub fn campaign() -> Attribution {
    Attribution {
        source: Some("instagram".to_string()),
        medium: Some("social".to_string()),
        campaign: Some("summer".to_string()),
        referrer: Some("https://instagram.com/".to_string()),
    }
}

/// Two providers, two services, slots for p1/s1 on 10 and 11 June 2025
pub fn studio() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_provider(Provider::new("p1", "Mara").with_specialties("fineline"))
        .with_provider(Provider::new("p2", "Jo"))
        .with_service(Service::new("s1", "Fineline", 60).with_price(120.0))
        .with_service(Service::new("s2", "Lettering", 30).with_price(80.0))
        .with_slots(
            key("p1", "s1", "2025-06-10"),
            vec![slot("10:00"), slot("11:00")],
        )
        .with_slots(
            key("p1", "s1", "2025-06-11"),
            vec![slot("14:00"), slot("15:00")],
        )
}

pub struct Harness {
    pub wizard: BookingWizard,
    pub directory: Arc<InMemoryDirectory>,
    pub tracking: Arc<RecordingTrackingSink>,
}

pub fn harness(directory: InMemoryDirectory, layout: StepLayout) -> Harness {
    harness_with(
        directory,
        layout,
        RecordingTrackingSink::new(),
        FixedAttribution::new(campaign()),
    )
}

pub fn harness_with(
    directory: InMemoryDirectory,
    layout: StepLayout,
    tracking: RecordingTrackingSink,
    attribution: FixedAttribution,
) -> Harness {
    let config = WizardConfig::default()
        .with_layout(layout)
        .with_submit_timeout(WAIT);
    build(directory, config, tracking, attribution)
}

pub fn harness_with_timeout(directory: InMemoryDirectory, submit_timeout: Duration) -> Harness {
    build(
        directory,
        WizardConfig::default().with_submit_timeout(submit_timeout),
        RecordingTrackingSink::new(),
        FixedAttribution::new(campaign()),
    )
}

fn build(
    directory: InMemoryDirectory,
    config: WizardConfig,
    tracking: RecordingTrackingSink,
    attribution: FixedAttribution,
) -> Harness {
    booking_testing::init_test_tracing();

    let directory = Arc::new(directory);
    let tracking = Arc::new(tracking);
    let environment = WizardEnvironment::new(Arc::clone(&directory) as _)
        .with_tracking(Arc::clone(&tracking) as _)
        .with_attribution(Arc::new(attribution))
        .with_clock(Arc::new(test_clock()));

    Harness {
        wizard: BookingWizard::new(config, environment),
        directory,
        tracking,
    }
}

impl Harness {
    pub async fn start(&self) {
        self.wizard
            .start()
            .await
            .unwrap()
            .wait_with_timeout(WAIT)
            .await
            .unwrap();
    }

    pub async fn pick_date(&self, day: &str) {
        self.wizard
            .select_date(date(day))
            .await
            .unwrap()
            .wait_with_timeout(WAIT)
            .await
            .unwrap();
    }

    /// Walk a four-stage wizard to the contact step with p1/s1/2025-06-10 10:00
    pub async fn reach_contact_step(&self) {
        self.start().await;
        self.wizard.select_provider("p1".into()).await.unwrap();
        self.wizard.advance().await.unwrap();
        self.wizard.select_service("s1".into()).await.unwrap();
        self.wizard.advance().await.unwrap();
        self.pick_date("2025-06-10").await;
        self.wizard.select_time(slot("10:00")).await.unwrap();
        self.wizard.advance().await.unwrap();
        self.wizard.set_contact(contact()).await.unwrap();
        self.wizard.set_consent(true).await.unwrap();
    }
}
