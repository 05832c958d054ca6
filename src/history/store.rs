use log::{debug, warn};
use parking_lot::Mutex;

use crate::storage::{LocalStore, keys};

/// Insert `query` at the front of `entries`
///
/// No-op when `query` already is the front entry. Otherwise an existing
/// occurrence is moved to the front and the list is truncated to
/// `capacity`. Returns whether `entries` changed.
pub fn push_front_dedup(entries: &mut Vec<String>, query: &str, capacity: usize) -> bool {
    if entries.first().is_some_and(|front| front == query) {
        return false;
    }

    if let Some(index) = entries.iter().position(|entry| entry == query) {
        entries.remove(index);
    }

    entries.insert(0, query.to_string());
    entries.truncate(capacity);
    true
}

/// Completion suffixes for `prefix`, in recency order
///
/// Matching is case-sensitive; the matched prefix is stripped from each
/// returned entry.
#[must_use]
pub fn completions(entries: &[String], prefix: &str, limit: usize) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.strip_prefix(prefix))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Durable, capped record of past search queries
#[derive(Debug)]
pub struct SearchHistory {
    store: LocalStore,
    capacity: usize,
    suggestion_limit: usize,
    entries: Mutex<Vec<String>>,
}

impl SearchHistory {
    /// Load history from `store`
    ///
    /// Stored lists longer than `capacity` are truncated on load.
    #[must_use]
    pub fn load(store: LocalStore, capacity: usize, suggestion_limit: usize) -> Self {
        let mut entries: Vec<String> = store.get(keys::SEARCH_HISTORY).unwrap_or_default();
        entries.truncate(capacity);
        debug!("Loaded {} search history entries", entries.len());

        Self {
            store,
            capacity,
            suggestion_limit,
            entries: Mutex::new(entries),
        }
    }

    /// Record an executed query
    pub fn record(&self, query: &str) {
        let snapshot = {
            let mut entries = self.entries.lock();
            if !push_front_dedup(&mut entries, query, self.capacity) {
                return;
            }
            entries.clone()
        };

        if let Err(e) = self.store.set(keys::SEARCH_HISTORY, &snapshot) {
            warn!("Failed to persist search history: {e}");
        }
    }

    /// Up to `suggestion_limit` completion suffixes for `prefix`
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        completions(&self.entries.lock(), prefix, self.suggestion_limit)
    }

    /// All entries, most recent first
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        if let Err(e) = self.store.remove(keys::SEARCH_HISTORY) {
            warn!("Failed to clear persisted search history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{SEARCH_HISTORY_CAPACITY, SUGGESTION_LIMIT};

    fn history() -> SearchHistory {
        SearchHistory::load(
            LocalStore::in_memory(),
            SEARCH_HISTORY_CAPACITY,
            SUGGESTION_LIMIT,
        )
    }

    #[test]
    fn test_repeat_query_moves_to_front() {
        let history = history();
        history.record("a");
        history.record("b");
        history.record("a");
        assert_eq!(history.entries(), vec!["a", "b"]);
    }

    #[test]
    fn test_front_query_is_noop() {
        let history = history();
        history.record("a");
        history.record("a");
        assert_eq!(history.entries(), vec!["a"]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let history = history();
        for i in 0..=SEARCH_HISTORY_CAPACITY {
            history.record(&format!("query {i}"));
        }
        let entries = history.entries();
        assert_eq!(entries.len(), SEARCH_HISTORY_CAPACITY);
        assert_eq!(entries[0], format!("query {SEARCH_HISTORY_CAPACITY}"));
        assert!(!entries.contains(&"query 0".to_string()));
    }

    #[test]
    fn test_suggest_strips_prefix_in_recency_order() {
        let history = history();
        history.record("other");
        history.record("sell");
        history.record("search jira");
        assert_eq!(history.suggest("se"), vec!["arch jira", "ll"]);
    }

    #[test]
    fn test_suggest_is_case_sensitive_and_capped() {
        let history = history();
        for i in 0..10 {
            history.record(&format!("jira {i}"));
        }
        history.record("Jira upper");
        let suggestions = history.suggest("jira");
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
        assert_eq!(suggestions[0], " 9");
        assert!(!suggestions.contains(&" upper".to_string()));
    }

    #[test]
    fn test_history_is_persisted() {
        let store = LocalStore::in_memory();
        let history = SearchHistory::load(store.clone(), 100, 6);
        history.record("confluence onboarding");

        let reloaded = SearchHistory::load(store, 100, 6);
        assert_eq!(reloaded.entries(), vec!["confluence onboarding"]);
    }
}
