use common::models::ParsedSchedule;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Concurrency-safe schedule store with an atomic get-or-compute contract.
///
/// Each team key owns a `OnceCell`; the map lock is held only long enough to
/// look up or insert the cell, and `get_or_init` lets exactly one caller run
/// the compute while concurrent callers for the same team await the same
/// result. Entries live for the whole run and the roster bounds the map
/// size, so there is no eviction.
pub struct ScheduleCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<ParsedSchedule>>>>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_compute<F, Fut>(&self, team: &str, compute: F) -> Arc<ParsedSchedule>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ParsedSchedule>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(team.to_string()).or_default().clone()
        };

        cell.get_or_init(|| async { Arc::new(compute().await) })
            .await
            .clone()
    }

    /// Already-computed schedule, if any. Never waits on an in-flight compute.
    pub async fn get(&self, team: &str) -> Option<Arc<ParsedSchedule>> {
        let entries = self.entries.lock().await;
        entries.get(team).and_then(|cell| cell.get().cloned())
    }
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new()
    }
}
