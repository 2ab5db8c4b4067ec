use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch},
    task::{JoinHandle, JoinSet},
    time::{sleep_until, Instant},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::Entry,
    services::{
        debounce::Debouncer,
        providers::CatalogSearch,
        search::{Lookup, SearchCoordinator, SearchSettings, SearchSnapshot},
    },
    ui::pointer::{ListenerGuard, PointerListeners, Rect},
};

/// Input events delivered to a running search widget
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    QueryChanged(String),
    Focus,
    Clear,
    PointerDown { inside: bool },
    Submit,
    SuggestionPicked(Entry),
    Shutdown,
}

type LookupOutcome = (Lookup, AppResult<Vec<Entry>>);

/// Event loop of one mounted search widget
///
/// Owns the coordinator, the debounce timer and the outstanding lookups. All
/// state changes happen on this task; lookups run as child tasks and report
/// back through the join set.
pub struct SearchSession {
    id: Uuid,
    coordinator: SearchCoordinator,
    debouncer: Debouncer<String>,
    catalog: Arc<dyn CatalogSearch>,
    lookups: JoinSet<LookupOutcome>,
    state_tx: watch::Sender<SearchSnapshot>,
    _pointer_guard: ListenerGuard,
}

impl SearchSession {
    /// Mounts a search widget occupying `region` and starts its event loop
    ///
    /// The widget listens for pointer presses on `pointer` until it is shut
    /// down, so presses outside `region` close the suggestion dropdown.
    pub fn spawn(
        catalog: Arc<dyn CatalogSearch>,
        settings: SearchSettings,
        pointer: &PointerListeners,
        region: Rect,
    ) -> SearchHandle {
        let id = Uuid::new_v4();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchSnapshot::default());

        let weak_tx = events_tx.downgrade();
        let pointer_guard = pointer.register(move |point| {
            if let Some(tx) = weak_tx.upgrade() {
                let _ = tx.send(SearchEvent::PointerDown {
                    inside: region.contains(point),
                });
            }
        });

        let session = Self {
            id,
            coordinator: SearchCoordinator::new(settings),
            debouncer: Debouncer::new(String::new(), settings.debounce),
            catalog,
            lookups: JoinSet::new(),
            state_tx,
            _pointer_guard: pointer_guard,
        };

        let span = tracing::info_span!("search_session", session_id = %id);
        let task = tokio::spawn(session.run(events_rx).instrument(span));

        tracing::info!(session_id = %id, "Search session started");

        SearchHandle {
            id,
            events: events_tx,
            state: state_rx,
            task,
        }
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SearchEvent>) {
        loop {
            let deadline = self.debouncer.deadline();

            tokio::select! {
                event = events.recv() => match event {
                    Some(SearchEvent::Shutdown) | None => break,
                    Some(event) => self.handle_event(event),
                },
                Some(joined) = self.lookups.join_next(), if !self.lookups.is_empty() => {
                    match joined {
                        Ok((lookup, outcome)) => {
                            self.coordinator.complete(&lookup, outcome);
                        }
                        Err(e) => tracing::error!(error = %e, "Lookup task join error"),
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_debounce_elapsed();
                }
            }

            self.publish();
        }

        self.teardown();
    }

    fn handle_event(&mut self, event: SearchEvent) {
        tracing::trace!(event = ?event, "Search event");

        match event {
            SearchEvent::QueryChanged(text) => {
                self.coordinator.on_query_change(text.clone());
                self.debouncer.push(text, Instant::now());
            }
            SearchEvent::Focus => self.coordinator.on_focus(),
            SearchEvent::Clear => {
                // on_clear drops the lookup for the settled query, so the
                // settled value has to go with it
                self.coordinator.on_clear();
                self.debouncer.reset(String::new());
            }
            SearchEvent::PointerDown { inside } => self.coordinator.on_pointer_down(inside),
            SearchEvent::Submit => {
                if let Some(lookup) = self.coordinator.on_submit() {
                    self.issue(lookup);
                }
            }
            SearchEvent::SuggestionPicked(entry) => {
                self.debouncer.push(entry.title.clone(), Instant::now());
                if let Some(lookup) = self.coordinator.on_suggestion_picked(&entry) {
                    self.issue(lookup);
                }
            }
            SearchEvent::Shutdown => {}
        }
    }

    fn on_debounce_elapsed(&mut self) {
        let Some(value) = self.debouncer.fire(Instant::now()) else {
            return;
        };

        tracing::debug!(query = %value, "Debounced query settled");
        if let Some(lookup) = self.coordinator.on_debounced_query_changed(&value) {
            self.issue(lookup);
        }
    }

    fn issue(&mut self, lookup: Lookup) {
        tracing::info!(
            kind = ?lookup.kind,
            seq = lookup.seq,
            query = %lookup.query,
            provider = self.catalog.name(),
            "Issuing catalog lookup"
        );

        let catalog = self.catalog.clone();
        self.lookups.spawn(
            async move {
                let outcome = catalog.search(&lookup.query).await;
                (lookup, outcome)
            }
            .in_current_span(),
        );
    }

    fn publish(&self) {
        let next = self.coordinator.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == *next {
                return false;
            }
            *current = next.clone();
            true
        });
    }

    fn teardown(&mut self) {
        let outstanding = self.lookups.len();
        self.debouncer.cancel();
        self.lookups.abort_all();
        tracing::info!(
            session_id = %self.id,
            outstanding_lookups = outstanding,
            "Search session stopped"
        );
    }
}

/// Handle to a running search widget
///
/// Dropping the handle without calling [`SearchHandle::shutdown`] also stops the
/// session once the event channel drains.
pub struct SearchHandle {
    id: Uuid,
    events: mpsc::UnboundedSender<SearchEvent>,
    state: watch::Receiver<SearchSnapshot>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    fn send(&self, event: SearchEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!(session_id = %self.id, "Search session is no longer running");
        }
    }

    pub fn type_text(&self, text: impl Into<String>) {
        self.send(SearchEvent::QueryChanged(text.into()));
    }

    pub fn focus(&self) {
        self.send(SearchEvent::Focus);
    }

    pub fn clear(&self) {
        self.send(SearchEvent::Clear);
    }

    pub fn submit(&self) {
        self.send(SearchEvent::Submit);
    }

    pub fn pick(&self, entry: Entry) {
        self.send(SearchEvent::SuggestionPicked(entry));
    }

    /// Current widget state
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.clone()
    }

    /// Waits until the widget state satisfies `predicate`
    ///
    /// Returns `None` if the session stops first.
    pub async fn wait_for<F>(&self, predicate: F) -> Option<SearchSnapshot>
    where
        F: FnMut(&SearchSnapshot) -> bool,
    {
        let mut rx = self.state.clone();
        let snapshot = rx.wait_for(predicate).await.ok()?;
        Some(snapshot.clone())
    }

    /// Unmounts the widget
    ///
    /// Clears the debounce timer, aborts outstanding lookups and removes the
    /// pointer listener before returning.
    pub async fn shutdown(self) {
        self.send(SearchEvent::Shutdown);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Search session task failed");
        }
    }
}
