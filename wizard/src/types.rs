//! Domain types for the booking wizard.
//!
//! Providers and services are loaded once per session and never mutated.
//! Slots, contact details and attribution are plain values carried by the
//! selection state and the reservation request built from it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a service provider
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a `ProviderId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a bookable service
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a `ServiceId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A person who performs services (artist, stylist, practitioner)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique identifier
    pub id: ProviderId,
    /// Display name
    pub name: String,
    /// Capability tags, e.g. "fineline" or "lettering"
    pub tags: Vec<String>,
    /// Social media handle without the leading `@`
    pub social_handle: Option<String>,
    /// Short biography
    pub bio: Option<String>,
    /// Whether this provider leads the studio
    pub is_lead: bool,
    /// Profile picture location
    pub image_url: Option<String>,
}

impl Provider {
    /// Creates a provider with only the required fields set
    #[must_use]
    pub fn new(id: impl Into<ProviderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: Vec::new(),
            social_handle: None,
            bio: None,
            is_lead: false,
            image_url: None,
        }
    }

    /// Sets the capability tags from a comma-separated specialties string
    ///
    /// ```
    /// use booking_wizard::types::Provider;
    ///
    /// let provider = Provider::new("p1", "Mara").with_specialties(" fineline, ,dotwork ");
    /// assert_eq!(provider.tags, vec!["fineline", "dotwork"]);
    /// ```
    #[must_use]
    pub fn with_specialties(mut self, specialties: &str) -> Self {
        self.tags = parse_tags(specialties);
        self
    }

    /// Sets the social media handle
    #[must_use]
    pub fn with_social_handle(mut self, handle: impl Into<String>) -> Self {
        self.social_handle = Some(handle.into());
        self
    }

    /// Sets the biography
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Marks the provider as studio lead
    #[must_use]
    pub const fn as_lead(mut self) -> Self {
        self.is_lead = true;
        self
    }

    /// Sets the profile picture location
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<String> for ServiceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Split a comma-separated list into trimmed, non-empty tags
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// A bookable service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,
    /// Display name
    pub name: String,
    /// Appointment length in minutes
    pub duration_minutes: u32,
    /// Price in euros, absent for "on request" services
    pub price: Option<f64>,
    /// Longer description
    pub description: Option<String>,
}

impl Service {
    /// Creates a service without price or description
    #[must_use]
    pub fn new(id: impl Into<ServiceId>, name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes,
            price: None,
            description: None,
        }
    }

    /// Sets the price
    #[must_use]
    pub const fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Error returned when a slot string is not `HH:MM` or `HH:MM:SS`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot time: {0}")]
pub struct ParseSlotError(String);

/// A bookable start time on a given day
///
/// Parsed from `HH:MM` or `HH:MM:SS`, always rendered as `HH:MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(NaiveTime);

impl Slot {
    /// Creates a slot from hour and minute, `None` when out of range
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Returns the start time
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for Slot {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(Self)
            .map_err(|_| ParseSlotError(s.to_owned()))
    }
}

impl TryFrom<String> for Slot {
    type Error = ParseSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Customer contact details entered on the final step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    /// First name
    pub given_name: String,
    /// Last name
    pub family_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl ContactPayload {
    /// Creates a contact payload from its four fields
    #[must_use]
    pub fn new(
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Whether every field has content after trimming whitespace
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.given_name, &self.family_name, &self.email, &self.phone]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// First-touch marketing attribution for the session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Origin marker (`utm_source`)
    #[serde(rename = "utmSource", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Channel marker (`utm_medium`)
    #[serde(rename = "utmMedium", skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    /// Campaign marker (`utm_campaign`)
    #[serde(rename = "utmCampaign", skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    /// Referring page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl Attribution {
    /// Whether no attribution data was captured
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.medium.is_none()
            && self.campaign.is_none()
            && self.referrer.is_none()
    }
}

/// Payload sent to the directory to create a reservation
///
/// Built on demand at submit time, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Chosen provider
    pub provider_id: ProviderId,
    /// Chosen service
    pub service_id: ServiceId,
    /// Appointment day
    pub booking_date: NaiveDate,
    /// Appointment start
    pub start_time: Slot,
    /// Customer contact details
    pub customer: ContactPayload,
    /// Session attribution, flattened into the top-level object
    #[serde(flatten)]
    pub attribution: Attribution,
}

/// Unique identifier for a created reservation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Creates a `ReservationId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reservation confirmed by the directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Identifier used in the confirmation route
    pub id: ReservationId,
    /// Human-readable booking reference
    pub booking_number: String,
}
