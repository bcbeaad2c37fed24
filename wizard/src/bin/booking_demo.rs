//! Booking wizard demo.
//!
//! Walks one customer through the happy path against an in-memory
//! directory and prints the confirmation route.

use anyhow::{Context, bail};
use booking_wizard::mocks::{FixedAttribution, InMemoryDirectory, RecordingTrackingSink};
use booking_wizard::{
    Attribution, AvailabilityKey, BookingWizard, ContactPayload, Provider, Service, Slot,
    StepLayout, SubmitOutcome, WizardConfig, WizardEnvironment,
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn demo_directory(date: NaiveDate) -> anyhow::Result<InMemoryDirectory> {
    let slots = ["10:00", "11:30", "14:00"]
        .iter()
        .map(|s| s.parse::<Slot>())
        .collect::<Result<Vec<_>, _>>()
        .context("demo slots")?;

    Ok(InMemoryDirectory::new()
        .with_provider(
            Provider::new("p1", "Mara")
                .with_specialties("fineline, botanical")
                .with_social_handle("mara.ink")
                .as_lead(),
        )
        .with_provider(Provider::new("p2", "Jo").with_specialties("lettering"))
        .with_service(
            Service::new("s1", "Small fineline piece", 60)
                .with_price(120.0)
                .with_description("Up to 8 cm"),
        )
        .with_service(Service::new("s2", "Consultation", 30))
        .with_slots(
            AvailabilityKey {
                provider_id: "p1".into(),
                service_id: "s1".into(),
                date,
            },
            slots,
        )
        .with_latency(date, Duration::from_millis(50)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,booking_wizard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WizardConfig::from_env();
    info!(layout = %config.layout, "Starting booking wizard demo");

    let date = NaiveDate::from_ymd_opt(2025, 6, 10).context("demo date")?;
    let tracking = Arc::new(RecordingTrackingSink::new());
    let environment = WizardEnvironment::new(Arc::new(demo_directory(date)?))
        .with_tracking(Arc::clone(&tracking) as _)
        .with_attribution(Arc::new(FixedAttribution::new(Attribution {
            source: Some("instagram".to_string()),
            medium: Some("social".to_string()),
            ..Attribution::default()
        })));

    let wizard = BookingWizard::new(config, environment);
    let timeout = Duration::from_secs(5);

    wizard.start().await?.wait_with_timeout(timeout).await?;
    let view = wizard.view().await;
    info!(
        providers = view.providers.len(),
        services = view.services.len(),
        "Catalog loaded"
    );

    wizard.select_provider("p1".into()).await?;
    if wizard.config().layout == StepLayout::FourStage {
        wizard.advance().await?;
    }
    wizard.select_service("s1".into()).await?;
    wizard.advance().await?;

    wizard.select_date(date).await?.wait_with_timeout(timeout).await?;
    let view = wizard.view().await;
    let Some(first_slot) = view.slots.first().copied() else {
        bail!("no slots offered for {date}");
    };
    info!(slots = ?view.slots.iter().map(ToString::to_string).collect::<Vec<_>>(), "Slots loaded");

    wizard.select_time(first_slot).await?;
    wizard.advance().await?;

    wizard
        .set_contact(ContactPayload::new(
            "Ana",
            "Silva",
            "ana@example.com",
            "+49 30 1234567",
        ))
        .await?;
    wizard.set_consent(true).await?;

    let view = wizard.view().await;
    info!(step = view.step_label, "Ready to submit");

    match wizard.submit().await? {
        SubmitOutcome::Confirmed {
            reservation,
            confirmation_route,
        } => {
            info!(
                booking_number = %reservation.booking_number,
                route = %confirmation_route,
                "Booking confirmed"
            );
        },
        SubmitOutcome::Failed { message, .. } => bail!("booking failed: {message}"),
        SubmitOutcome::Invalid(error) => bail!("booking incomplete: {error}"),
    }

    wizard.shutdown().await?;
    info!(events = ?tracking.names(), "Tracked events");
    Ok(())
}
