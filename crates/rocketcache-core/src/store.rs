//! The rocket store: combined remote and local records plus the filter
//! criteria and derived views built on them.
//!
//! State lives behind a lock that is never held across an `.await`, so the
//! store can be shared between tasks. Mutating actions run their
//! read-modify-write of local storage while holding that lock, which keeps
//! the in-memory list and the persisted list in lockstep.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::RocketSource;
use crate::models::{ActiveFilter, Rocket, RocketFilter};
use crate::storage::{KeyValueStore, LocalRockets, StorageError};

/// Message exposed through `error()` when fetching the collection fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch rockets";

#[derive(Debug, Default)]
struct StoreState {
    /// Local records first, then remote ones.
    rockets: Vec<Rocket>,
    /// Number of `fetch_all` calls currently awaiting the network.
    in_flight: usize,
    error: Option<String>,
    filter: RocketFilter,
    last_fetched: Option<DateTime<Utc>>,
}

/// State container for the rocket catalog.
///
/// Collaborators are injected at construction so tests can substitute
/// fakes for the network and for persistent storage.
pub struct RocketStore {
    source: Arc<dyn RocketSource>,
    local: LocalRockets,
    state: RwLock<StoreState>,
}

/// Clears the loading flag when a fetch finishes, fails or is cancelled.
struct LoadingGuard<'a> {
    store: &'a RocketStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.store.write_state();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl RocketStore {
    pub fn new(source: Arc<dyn RocketSource>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            source,
            local: LocalRockets::new(storage),
            state: RwLock::new(StoreState::default()),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Replace the record set with local records followed by a fresh copy of
    /// the remote collection.
    ///
    /// On failure the current records are kept and `error()` reports
    /// `FETCH_ERROR_MESSAGE`. Never returns an error itself.
    pub async fn fetch_all(&self) {
        {
            let mut state = self.write_state();
            state.in_flight += 1;
            state.error = None;
        }
        let _loading = LoadingGuard { store: self };

        let result = self.source.fetch_rockets().await;

        let mut state = self.write_state();
        match result {
            Ok(remote) => {
                // Read local records after the await so adds made meanwhile are kept
                let mut rockets = self.local.load();
                let local_count = rockets.len();
                let remote_count = remote.len();
                rockets.extend(remote);

                state.rockets = rockets;
                state.last_fetched = Some(Utc::now());
                info!(local = local_count, remote = remote_count, "Loaded rockets");
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch rockets");
                state.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        drop(state);
    }

    /// Mark `rocket` as local and put it at the front of both the persisted
    /// list and the in-memory records.
    ///
    /// Identifiers are not checked for uniqueness. If storage cannot be read
    /// or written nothing changes and the error is returned. Persisted
    /// entries that fail to decode are carried over untouched.
    pub fn add(&self, mut rocket: Rocket) -> Result<(), StorageError> {
        rocket.is_local = true;

        let mut state = self.write_state();
        if state.rockets.iter().any(|r| r.id == rocket.id) {
            warn!(id = %rocket.id, "Adding rocket with an identifier already in use");
        }

        self.local.update(|stored| stored.prepend(&rocket))?;

        info!(id = %rocket.id, name = %rocket.name, "Added local rocket");
        state.rockets.insert(0, rocket);
        Ok(())
    }

    /// Drop every record with `id` from memory and from the persisted list.
    ///
    /// Matching nothing is not an error. A remote record is only hidden from
    /// the in-memory view; it reappears on the next `fetch_all`.
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        let mut state = self.write_state();
        let removed_local = self.local.update(|stored| Ok(stored.remove(id)))?;

        let before = state.rockets.len();
        state.rockets.retain(|r| r.id != id);
        let removed = before - state.rockets.len();

        if removed > 0 && removed_local == 0 {
            debug!(id, "Removed remote rocket from view only");
        } else {
            debug!(id, removed, removed_local, "Removed rocket");
        }
        Ok(())
    }

    /// Look a record up on the remote API, falling back to `get_by_id` on
    /// any failure.
    pub async fn fetch_by_id(&self, id: &str) -> Option<Rocket> {
        match self.source.fetch_rocket(id).await {
            Ok(rocket) => Some(rocket),
            Err(e) => {
                debug!(id, error = %e, "Remote lookup failed, using local data");
                self.get_by_id(id)
            }
        }
    }

    /// Look a record up in memory, then in the persisted list. Never touches
    /// the network.
    pub fn get_by_id(&self, id: &str) -> Option<Rocket> {
        if let Some(rocket) = self.read_state().rockets.iter().find(|r| r.id == id) {
            return Some(rocket.clone());
        }
        self.local.find(id)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Distinct countries across the current records, sorted.
    pub fn countries(&self) -> Vec<String> {
        let state = self.read_state();
        let unique: BTreeSet<&str> = state.rockets.iter().map(|r| r.country.as_str()).collect();
        unique.into_iter().map(str::to_string).collect()
    }

    /// Records matching the current filter, in record order.
    pub fn filtered_rockets(&self) -> Vec<Rocket> {
        let state = self.read_state();
        state
            .filter
            .apply(&state.rockets)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    pub fn rockets(&self) -> Vec<Rocket> {
        self.read_state().rockets.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_fetched
    }

    pub fn filter(&self) -> RocketFilter {
        self.read_state().filter.clone()
    }

    // =========================================================================
    // Filter criteria
    // =========================================================================

    pub fn set_filter(&self, filter: RocketFilter) {
        self.write_state().filter = filter;
    }

    pub fn set_search(&self, search: impl Into<String>) {
        self.write_state().filter.search = search.into();
    }

    /// An empty country clears the restriction.
    pub fn set_country(&self, country: impl Into<String>) {
        self.write_state().filter.country = country.into();
    }

    pub fn set_cost_range(&self, cost_min: f64, cost_max: f64) {
        let mut state = self.write_state();
        state.filter.cost_min = cost_min;
        state.filter.cost_max = cost_max;
    }

    pub fn set_active(&self, active: ActiveFilter) {
        self.write_state().filter.active = active;
    }

    pub fn reset_filter(&self) {
        self.write_state().filter = RocketFilter::default();
    }
}

// ============================================================================
// Tests
// ============================================================================
