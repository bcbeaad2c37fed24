//! Slot availability loading with a stale-response guard.
//!
//! At most one query is active. Each query is tagged with the
//! (provider, service, date) it was issued for and a generation number, and a
//! response is applied only if it still matches the active query when it
//! arrives. Re-selecting an earlier date issues a new generation, so a late
//! answer to the first query for that date is dropped as well. Superseded
//! queries run to completion but their results are dropped.

use crate::error::AvailabilityQueryError;
use crate::types::{ProviderId, ServiceId, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The combination a slot query was issued for
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityKey {
    /// Provider the slots belong to
    pub provider_id: ProviderId,
    /// Service whose duration the slots fit
    pub service_id: ServiceId,
    /// Day of the slots
    pub date: NaiveDate,
}

impl fmt::Display for AvailabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.provider_id, self.service_id, self.date)
    }
}

/// One issued slot query
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Combination the query was issued for
    pub key: AvailabilityKey,
    /// Issue order within the session
    pub generation: u64,
}

impl fmt::Display for AvailabilityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.generation)
    }
}

/// What happened to a query response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slots replaced the current set
    Applied,
    /// The query failed and the error was recorded
    Failed,
    /// The response belonged to a superseded query and was ignored
    Stale,
}

/// Loading state for the current slot query
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotAvailabilityLoader {
    active: Option<AvailabilityQuery>,
    issued: u64,
    slots: Vec<Slot>,
    loading: bool,
    error: Option<AvailabilityQueryError>,
}

impl SlotAvailabilityLoader {
    /// Creates an idle loader with no slots
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a query for `key`, superseding any query in flight
    ///
    /// The slot set is emptied immediately. A previous error stays visible
    /// until this query succeeds. The returned query must accompany the
    /// response passed to [`resolve`](Self::resolve).
    pub fn begin(&mut self, key: AvailabilityKey) -> AvailabilityQuery {
        self.issued = self.issued.wrapping_add(1);
        let query = AvailabilityQuery {
            key,
            generation: self.issued,
        };
        if let Some(previous) = self.active.as_ref().filter(|_| self.loading) {
            tracing::debug!(%previous, next = %query, "Superseding in-flight availability query");
        }
        self.active = Some(query.clone());
        self.slots.clear();
        self.loading = true;
        query
    }

    /// Applies a query response if it belongs to the active query
    pub fn resolve(
        &mut self,
        query: &AvailabilityQuery,
        result: Result<Vec<Slot>, AvailabilityQueryError>,
    ) -> LoadOutcome {
        if self.active.as_ref() != Some(query) || !self.loading {
            tracing::warn!(%query, "Discarding stale availability response");
            return LoadOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(mut slots) => {
                slots.sort_unstable();
                slots.dedup();
                self.slots = slots;
                self.error = None;
                LoadOutcome::Applied
            },
            Err(error) => {
                self.error = Some(error);
                LoadOutcome::Failed
            },
        }
    }

    /// Forgets the active query after an upstream selection changed
    ///
    /// Any response still in flight becomes stale.
    pub fn deactivate(&mut self) {
        self.active = None;
        self.slots.clear();
        self.loading = false;
    }

    /// Key of the active query, if any
    #[must_use]
    pub fn active_key(&self) -> Option<&AvailabilityKey> {
        self.active.as_ref().map(|query| &query.key)
    }

    /// The active query, if any
    #[must_use]
    pub const fn active_query(&self) -> Option<&AvailabilityQuery> {
        self.active.as_ref()
    }

    /// Latest slot set for the active key
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Whether `slot` is in the latest slot set
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.binary_search(&slot).is_ok()
    }

    /// Whether a query is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the most recent failed query
    #[must_use]
    pub const fn error(&self) -> Option<&AvailabilityQueryError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::DirectoryError;

    fn key(date: &str) -> AvailabilityKey {
        AvailabilityKey {
            provider_id: ProviderId::new("p1"),
            service_id: ServiceId::new("s1"),
            date: date.parse().unwrap(),
        }
    }

    fn slots(times: &[&str]) -> Vec<Slot> {
        times.iter().map(|t| t.parse().unwrap()).collect()
    }

    #[test]
    fn applies_response_for_active_query() {
        let mut loader = SlotAvailabilityLoader::new();
        let query = loader.begin(key("2025-06-10"));
        assert!(loader.is_loading());
        assert_eq!(query.generation, 1);

        let outcome = loader.resolve(&query, Ok(slots(&["11:00", "10:00"])));

        assert_eq!(outcome, LoadOutcome::Applied);
        assert!(!loader.is_loading());
        assert_eq!(loader.slots(), slots(&["10:00", "11:00"]).as_slice());
        assert!(loader.contains("11:00".parse().unwrap()));
    }

    #[test]
    fn last_key_wins_regardless_of_arrival_order() {
        let mut loader = SlotAvailabilityLoader::new();
        let first = loader.begin(key("2025-06-10"));
        let second = loader.begin(key("2025-06-11"));

        let newer = loader.resolve(&second, Ok(slots(&["14:00"])));
        let older = loader.resolve(&first, Ok(slots(&["09:00"])));

        assert_eq!(newer, LoadOutcome::Applied);
        assert_eq!(older, LoadOutcome::Stale);
        assert_eq!(loader.slots(), slots(&["14:00"]).as_slice());
    }

    #[test]
    fn reselected_date_ignores_answer_to_earlier_query_for_same_key() {
        let mut loader = SlotAvailabilityLoader::new();
        let first = loader.begin(key("2025-06-10"));
        loader.begin(key("2025-06-11"));
        let current = loader.begin(key("2025-06-10"));
        assert_eq!(first.key, current.key);
        assert_ne!(first, current);

        let old = loader.resolve(&first, Err(DirectoryError::Transient("502".into()).into()));
        assert_eq!(old, LoadOutcome::Stale);
        assert!(loader.is_loading());
        assert!(loader.error().is_none());

        let live = loader.resolve(&current, Ok(slots(&["10:00"])));
        assert_eq!(live, LoadOutcome::Applied);
        assert_eq!(loader.slots(), slots(&["10:00"]).as_slice());
        assert!(loader.error().is_none());
    }

    #[test]
    fn reselected_date_keeps_live_answer_when_earlier_query_arrives_late() {
        let mut loader = SlotAvailabilityLoader::new();
        let first = loader.begin(key("2025-06-10"));
        loader.begin(key("2025-06-11"));
        let current = loader.begin(key("2025-06-10"));

        assert_eq!(loader.resolve(&current, Ok(slots(&["10:00"]))), LoadOutcome::Applied);
        assert_eq!(
            loader.resolve(&first, Err(DirectoryError::Transient("502".into()).into())),
            LoadOutcome::Stale
        );
        assert_eq!(loader.slots(), slots(&["10:00"]).as_slice());
        assert!(loader.error().is_none());
    }

    #[test]
    fn failure_keeps_empty_slots_and_records_error() {
        let mut loader = SlotAvailabilityLoader::new();
        let query = loader.begin(key("2025-06-10"));

        let outcome = loader.resolve(&query, Err(DirectoryError::Transient("502".into()).into()));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(!loader.is_loading());
        assert!(loader.slots().is_empty());
        assert!(loader.error().is_some());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut loader = SlotAvailabilityLoader::new();
        let failed = loader.begin(key("2025-06-10"));
        loader.resolve(&failed, Err(DirectoryError::Transient("502".into()).into()));

        let retry = loader.begin(key("2025-06-12"));
        assert!(loader.error().is_some());
        loader.resolve(&retry, Ok(slots(&["10:00"])));
        assert!(loader.error().is_none());
    }

    #[test]
    fn deactivated_query_is_stale() {
        let mut loader = SlotAvailabilityLoader::new();
        let query = loader.begin(key("2025-06-10"));
        loader.deactivate();

        assert_eq!(loader.resolve(&query, Ok(slots(&["10:00"]))), LoadOutcome::Stale);
        assert!(loader.slots().is_empty());
        assert!(loader.active_key().is_none());
    }

    #[test]
    fn duplicate_response_for_same_query_is_ignored() {
        let mut loader = SlotAvailabilityLoader::new();
        let query = loader.begin(key("2025-06-10"));
        loader.resolve(&query, Ok(slots(&["10:00"])));

        assert_eq!(loader.resolve(&query, Ok(slots(&["12:00"]))), LoadOutcome::Stale);
        assert_eq!(loader.slots(), slots(&["10:00"]).as_slice());
    }
}
