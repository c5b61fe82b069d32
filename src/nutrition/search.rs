use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use tracing::debug;
use uuid::Uuid;

use super::client::FoodItem;

/// Query text, candidate list and the chosen candidate of one food search.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SearchState {
    query: String,
    results: Vec<FoodItem>,
    selected: Option<i64>,
}

impl SearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[FoodItem] {
        &self.results
    }

    /// Replaces the candidate list. A previous selection is dropped.
    pub fn load_results(&mut self, results: Vec<FoodItem>) {
        self.results = results;
        self.selected = None;
    }

    /// Selects the candidate with `fdc_id`; leaves the selection untouched
    /// when no candidate matches.
    pub fn select(&mut self, fdc_id: i64) -> Option<&FoodItem> {
        let idx = self.results.iter().position(|f| f.fdc_id == fdc_id)?;
        self.selected = Some(fdc_id);
        self.results.get(idx)
    }

    pub fn selected(&self) -> Option<&FoodItem> {
        let id = self.selected?;
        self.results.iter().find(|f| f.fdc_id == id)
    }

    /// Resets query, results and selection in one step.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

struct Tracked {
    search: SearchState,
    touched: Instant,
}

/// Search state per login session, kept in memory.
///
/// Only a non-blank search creates an entry. Reads and updates of a session
/// without one leave the map alone.
#[derive(Clone, Default)]
pub struct SearchSessions {
    inner: Arc<Mutex<HashMap<Uuid, Tracked>>>,
}

impl SearchSessions {
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Tracked>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the session's search, creating an empty one if needed.
    pub fn with<R>(&self, session_id: Uuid, f: impl FnOnce(&mut SearchState) -> R) -> R {
        let mut map = self.lock();
        let tracked = map.entry(session_id).or_insert_with(|| Tracked {
            search: SearchState::default(),
            touched: Instant::now(),
        });
        tracked.touched = Instant::now();
        f(&mut tracked.search)
    }

    /// Runs `f` against an existing search. `None` when the session has none.
    pub fn update<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut SearchState) -> R,
    ) -> Option<R> {
        let mut map = self.lock();
        let tracked = map.get_mut(&session_id)?;
        tracked.touched = Instant::now();
        Some(f(&mut tracked.search))
    }

    /// Reads an existing search without creating one.
    pub fn view<R>(&self, session_id: Uuid, f: impl FnOnce(&SearchState) -> R) -> Option<R> {
        self.lock().get(&session_id).map(|t| f(&t.search))
    }

    pub fn remove(&self, session_id: Uuid) {
        self.lock().remove(&session_id);
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    /// Drops searches untouched for at least `max_idle`. Returns how many went.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, t| t.touched.elapsed() < max_idle);
        before - map.len()
    }

    /// Sweeps idle searches every `every` on a background task. Sessions that
    /// expire without a logout are collected here.
    pub fn spawn_idle_sweep(&self, max_idle: Duration, every: Duration) {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let dropped = sessions.prune_idle(max_idle);
                if dropped > 0 {
                    let remaining = sessions.active_count();
                    debug!(dropped, remaining, "idle food searches dropped");
                }
            }
        });
    }
}
