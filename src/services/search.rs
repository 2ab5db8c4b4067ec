use std::time::Duration;

use crate::{
    error::AppResult,
    models::{with_posters, Entry},
};

/// Message shown when an explicit search fails
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search movies. Please try again later.";

/// Tunables for the type-ahead search widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    /// Quiet period before the typed query is looked up
    pub debounce: Duration,
    /// Maximum number of suggestions kept from a lookup
    pub suggestion_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            suggestion_limit: 5,
        }
    }
}

/// Which list a catalog lookup feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Type-ahead dropdown, best effort
    Suggestions,
    /// Explicit submit, failures are shown to the user
    Results,
}

/// An issued catalog lookup
///
/// The sequence number is compared against the latest one issued for the same
/// kind when the response comes back; anything older is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub kind: LookupKind,
    pub seq: u64,
    pub query: String,
}

/// Point-in-time view of the widget state, for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub suggestions: Vec<Entry>,
    pub suggestions_visible: bool,
    pub results: Vec<Entry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchSnapshot {
    /// The dropdown renders only when it is open and has something to show
    pub fn dropdown_open(&self) -> bool {
        self.suggestions_visible && !self.suggestions.is_empty()
    }

    /// "No movies found" state: a settled, error-free search with nothing to show
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.results.is_empty() && !self.query.is_empty()
    }
}

/// Type-ahead search state machine
///
/// Owns the query, the suggestion dropdown and the submitted result list of a
/// single search widget. It performs no I/O: operations that need the catalog
/// return a [`Lookup`], and the caller reports the outcome back through
/// [`SearchCoordinator::complete`].
#[derive(Debug)]
pub struct SearchCoordinator {
    settings: SearchSettings,
    state: SearchSnapshot,
    suggestion_seq: u64,
    result_seq: u64,
}

impl SearchCoordinator {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            state: SearchSnapshot::default(),
            suggestion_seq: 0,
            result_seq: 0,
        }
    }

    pub fn snapshot(&self) -> &SearchSnapshot {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Keystroke: replaces the query and opens the dropdown
    pub fn on_query_change(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
        self.state.suggestions_visible = true;
    }

    pub fn on_focus(&mut self) {
        self.state.suggestions_visible = true;
    }

    /// Empties the query and the dropdown
    ///
    /// Any suggestion lookup still in flight is invalidated so it cannot
    /// repopulate the dropdown afterwards.
    pub fn on_clear(&mut self) {
        self.state.query.clear();
        self.state.suggestions.clear();
        self.suggestion_seq += 1;
    }

    /// Pointer pressed somewhere on screen; closes the dropdown if outside the widget
    pub fn on_pointer_down(&mut self, inside_widget: bool) {
        if !inside_widget {
            self.state.suggestions_visible = false;
        }
    }

    /// The debounced query settled on a new value
    ///
    /// A blank value empties the dropdown and issues nothing. Otherwise a
    /// suggestion lookup is issued and supersedes every earlier one.
    pub fn on_debounced_query_changed(&mut self, value: &str) -> Option<Lookup> {
        self.suggestion_seq += 1;

        if value.trim().is_empty() {
            self.state.suggestions.clear();
            return None;
        }

        Some(Lookup {
            kind: LookupKind::Suggestions,
            seq: self.suggestion_seq,
            query: value.to_string(),
        })
    }

    /// Explicit search with the current query; blank queries are ignored
    pub fn on_submit(&mut self) -> Option<Lookup> {
        if self.state.query.trim().is_empty() {
            return None;
        }

        self.result_seq += 1;
        self.state.loading = true;
        self.state.suggestions_visible = false;

        Some(Lookup {
            kind: LookupKind::Results,
            seq: self.result_seq,
            query: self.state.query.clone(),
        })
    }

    /// A suggestion was chosen: its title becomes the query and is submitted
    pub fn on_suggestion_picked(&mut self, entry: &Entry) -> Option<Lookup> {
        self.state.query = entry.title.clone();
        self.state.suggestions_visible = false;
        self.on_submit()
    }

    fn is_latest(&self, lookup: &Lookup) -> bool {
        let latest = match lookup.kind {
            LookupKind::Suggestions => self.suggestion_seq,
            LookupKind::Results => self.result_seq,
        };
        lookup.seq == latest
    }

    /// Applies the outcome of a lookup issued earlier
    ///
    /// Returns `false` when the lookup was superseded and its outcome dropped.
    pub fn complete(&mut self, lookup: &Lookup, outcome: AppResult<Vec<Entry>>) -> bool {
        if !self.is_latest(lookup) {
            tracing::debug!(
                kind = ?lookup.kind,
                seq = lookup.seq,
                query = %lookup.query,
                "Discarding superseded lookup response"
            );
            return false;
        }

        match (lookup.kind, outcome) {
            (LookupKind::Suggestions, Ok(entries)) => {
                let mut suggestions = with_posters(entries);
                suggestions.truncate(self.settings.suggestion_limit);
                self.state.suggestions = suggestions;
            }
            (LookupKind::Suggestions, Err(e)) => {
                tracing::warn!(error = %e, query = %lookup.query, "Failed to fetch suggestions");
            }
            (LookupKind::Results, Ok(entries)) => {
                self.state.results = with_posters(entries);
                self.state.error = None;
                self.state.loading = false;
            }
            (LookupKind::Results, Err(e)) => {
                tracing::error!(error = %e, query = %lookup.query, "Search failed");
                self.state.results.clear();
                self.state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                self.state.loading = false;
            }
        }

        true
    }
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn poster(id: u64, title: &str) -> Entry {
        Entry::new(id, title).with_poster(format!("/{}.jpg", id))
    }

    #[test]
    fn test_initial_state() {
        let coordinator = SearchCoordinator::default();
        let state = coordinator.snapshot();
        assert_eq!(state.query, "");
        assert!(!state.suggestions_visible);
        assert!(state.suggestions.is_empty());
        assert!(state.results.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_query_change_opens_dropdown_without_lookup() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("Incep");
        assert_eq!(coordinator.query(), "Incep");
        assert!(coordinator.snapshot().suggestions_visible);
        assert!(!coordinator.snapshot().loading);
    }

    #[test]
    fn test_suggestions_filtered_and_ordered() {
        let mut coordinator = SearchCoordinator::default();
        let lookup = coordinator.on_debounced_query_changed("Inception").unwrap();
        assert_eq!(lookup.query, "Inception");

        let applied = coordinator.complete(
            &lookup,
            Ok(vec![
                poster(1, "Inception"),
                Entry::new(2, "Inception: The Cobol Job"),
                poster(3, "Inception: Behind the Scenes"),
            ]),
        );

        assert!(applied);
        let ids: Vec<u64> = coordinator.snapshot().suggestions.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_suggestions_capped() {
        let mut coordinator = SearchCoordinator::default();
        let lookup = coordinator.on_debounced_query_changed("star").unwrap();
        let entries = (1..=8).map(|id| poster(id, "Star")).collect();

        coordinator.complete(&lookup, Ok(entries));
        assert_eq!(coordinator.snapshot().suggestions.len(), 5);
        assert_eq!(coordinator.snapshot().suggestions[4].id, 5);
    }

    #[test]
    fn test_blank_debounced_value_clears() {
        let mut coordinator = SearchCoordinator::default();
        let lookup = coordinator.on_debounced_query_changed("up").unwrap();
        coordinator.complete(&lookup, Ok(vec![poster(1, "Up")]));

        assert!(coordinator.on_debounced_query_changed("   ").is_none());
        assert!(coordinator.snapshot().suggestions.is_empty());
    }

    #[test]
    fn test_stale_suggestion_response_discarded() {
        let mut coordinator = SearchCoordinator::default();
        let a = coordinator.on_debounced_query_changed("alien").unwrap();
        let b = coordinator.on_debounced_query_changed("aliens").unwrap();

        assert!(coordinator.complete(&b, Ok(vec![poster(2, "Aliens")])));
        assert!(!coordinator.complete(&a, Ok(vec![poster(1, "Alien")])));

        assert_eq!(coordinator.snapshot().suggestions[0].title, "Aliens");
    }

    #[test]
    fn test_response_after_blank_value_discarded() {
        let mut coordinator = SearchCoordinator::default();
        let a = coordinator.on_debounced_query_changed("heat").unwrap();
        coordinator.on_debounced_query_changed("");

        assert!(!coordinator.complete(&a, Ok(vec![poster(1, "Heat")])));
        assert!(coordinator.snapshot().suggestions.is_empty());
    }

    #[test]
    fn test_clear_invalidates_in_flight_lookup() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("heat");
        let a = coordinator.on_debounced_query_changed("heat").unwrap();
        coordinator.on_clear();

        assert_eq!(coordinator.query(), "");
        assert!(!coordinator.complete(&a, Ok(vec![poster(1, "Heat")])));
        assert!(coordinator.snapshot().suggestions.is_empty());
    }

    #[test]
    fn test_suggestion_failure_keeps_previous() {
        let mut coordinator = SearchCoordinator::default();
        let a = coordinator.on_debounced_query_changed("dune").unwrap();
        coordinator.complete(&a, Ok(vec![poster(1, "Dune")]));

        let b = coordinator.on_debounced_query_changed("dune 2").unwrap();
        let applied = coordinator.complete(&b, Err(AppError::ExternalApi("502".to_string())));

        assert!(applied);
        let state = coordinator.snapshot();
        assert_eq!(state.suggestions.len(), 1);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_outside_pointer_hides_only() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("dune");
        let a = coordinator.on_debounced_query_changed("dune").unwrap();
        coordinator.complete(&a, Ok(vec![poster(1, "Dune")]));

        coordinator.on_pointer_down(true);
        assert!(coordinator.snapshot().dropdown_open());

        coordinator.on_pointer_down(false);
        assert!(!coordinator.snapshot().suggestions_visible);
        assert_eq!(coordinator.snapshot().suggestions.len(), 1);

        coordinator.on_focus();
        assert!(coordinator.snapshot().dropdown_open());
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("   ");

        assert!(coordinator.on_submit().is_none());
        let state = coordinator.snapshot();
        assert!(!state.loading);
        assert!(state.suggestions_visible);
    }

    #[test]
    fn test_submit_success() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("matrix");

        let lookup = coordinator.on_submit().unwrap();
        assert_eq!(lookup.kind, LookupKind::Results);
        assert!(coordinator.snapshot().loading);
        assert!(!coordinator.snapshot().suggestions_visible);

        coordinator.complete(
            &lookup,
            Ok(vec![poster(1, "The Matrix"), Entry::new(2, "Matrix Short")]),
        );

        let state = coordinator.snapshot();
        assert!(!state.loading);
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_submit_failure_sets_error_and_clears_results() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("matrix");
        let first = coordinator.on_submit().unwrap();
        coordinator.complete(&first, Ok(vec![poster(1, "The Matrix")]));

        let second = coordinator.on_submit().unwrap();
        coordinator.complete(&second, Err(AppError::ExternalApi("503".to_string())));

        let state = coordinator.snapshot();
        assert!(!state.loading);
        assert!(state.results.is_empty());
        assert_eq!(state.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));

        let third = coordinator.on_submit().unwrap();
        coordinator.complete(&third, Ok(vec![poster(1, "The Matrix")]));
        assert_eq!(coordinator.snapshot().error, None);
    }

    #[test]
    fn test_stale_submit_keeps_loading() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("heat");
        let first = coordinator.on_submit().unwrap();
        coordinator.on_query_change("heat 2");
        let second = coordinator.on_submit().unwrap();

        assert!(!coordinator.complete(&first, Ok(vec![poster(1, "Heat")])));
        assert!(coordinator.snapshot().loading);

        assert!(coordinator.complete(&second, Ok(vec![poster(2, "Heat 2")])));
        assert!(!coordinator.snapshot().loading);
        assert_eq!(coordinator.snapshot().results[0].id, 2);
    }

    #[test]
    fn test_suggestion_picked_submits_title() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("incep");

        let lookup = coordinator
            .on_suggestion_picked(&poster(27205, "Inception"))
            .unwrap();

        assert_eq!(lookup.query, "Inception");
        assert_eq!(coordinator.query(), "Inception");
        assert!(!coordinator.snapshot().suggestions_visible);
        assert!(coordinator.snapshot().loading);
    }

    #[test]
    fn test_suggestion_and_result_sequences_independent() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("jaws");
        let submit = coordinator.on_submit().unwrap();
        let suggest = coordinator.on_debounced_query_changed("jaws").unwrap();

        assert!(coordinator.complete(&suggest, Ok(vec![poster(1, "Jaws")])));
        assert!(coordinator.complete(&submit, Ok(vec![poster(1, "Jaws")])));
    }

    #[test]
    fn test_empty_result_state() {
        let mut coordinator = SearchCoordinator::default();
        coordinator.on_query_change("zzzz");
        let lookup = coordinator.on_submit().unwrap();
        coordinator.complete(&lookup, Ok(vec![Entry::new(1, "No Poster")]));
        assert!(coordinator.snapshot().is_empty_result());
    }
}
