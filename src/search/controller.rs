//! SearchController - input debounce, catalog fetch and trending recording.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::{Debouncer, SearchOptions, SearchPhase, SearchView};
use crate::catalog::{Catalog, Movie};
use crate::resource::{AsyncResource, DataChanged, Invocation, ResourceState};
use crate::store::RowStore;
use crate::trending::TrendingAggregator;

/// Drives one search session.
///
/// Each [`edit`](Self::edit) restarts the debounce timer. When the timer
/// fires on non-blank text the controller fetches the catalog for that text
/// and, if anything came back, records one search for the top result. Data
/// that reaches the resource any other way (see [`revalidate`](Self::revalidate))
/// is recorded against the active query as well, so recording is
/// at-least-once per settled query.
///
/// Must be created inside a Tokio runtime. Dropping the controller tears it
/// down.
pub struct SearchController<S> {
    shared: Arc<Shared<S>>,
    listener: JoinHandle<()>,
}

struct Shared<S> {
    resource: AsyncResource<Vec<Movie>>,
    trending: TrendingAggregator<S>,
    settled_tx: watch::Sender<String>,
    session: Mutex<Session>,
}

struct Session {
    text: String,
    /// Last non-blank settled text; cleared when a blank query settles.
    settled: Option<String>,
    phase: SearchPhase,
    /// Bumped by every edit so a timer that raced a newer edit stands down.
    cycle: u64,
    /// Generation of the fetch started by the latest settlement. Its data is
    /// recorded by the settlement itself, not by the data-change listener.
    settling_generation: Option<u64>,
    debouncer: Debouncer,
    torn_down: bool,
}

impl<S: RowStore + 'static> SearchController<S> {
    pub fn new<C>(catalog: C, trending: TrendingAggregator<S>, options: SearchOptions) -> Self
    where
        C: Catalog + 'static,
    {
        let catalog = Arc::new(catalog);
        let (settled_tx, settled_rx) = watch::channel(String::new());

        let resource = AsyncResource::bind(
            move || {
                let catalog = Arc::clone(&catalog);
                let query = settled_rx.borrow().clone();
                async move {
                    if query.trim().is_empty() {
                        catalog.query_movies(None).await
                    } else {
                        catalog.query_movies(Some(&query)).await
                    }
                }
            },
            options.auto_start,
        );
        let events = resource.events();

        let shared = Arc::new(Shared {
            resource,
            trending,
            settled_tx,
            session: Mutex::new(Session {
                text: String::new(),
                settled: None,
                phase: SearchPhase::Empty,
                cycle: 0,
                settling_generation: None,
                debouncer: Debouncer::new(options.debounce),
                torn_down: false,
            }),
        });
        let listener = tokio::spawn(listen(Arc::downgrade(&shared), events));

        Self { shared, listener }
    }

    /// Replace the input text and restart the debounce window.
    pub fn edit(&self, text: impl Into<String>) {
        let text = text.into();
        let mut session = self.shared.session();
        if session.torn_down {
            return;
        }

        session.text = text.clone();
        session.cycle += 1;
        session.phase = SearchPhase::Debouncing;
        let cycle = session.cycle;

        let shared = Arc::clone(&self.shared);
        session
            .debouncer
            .schedule(async move { shared.settle(text, cycle).await });
    }

    /// Refetch the active query outside the debounce cycle. The result, if it
    /// becomes the resource's data, is recorded through the data-change path.
    pub fn revalidate(&self) -> Invocation<Vec<Movie>> {
        self.shared.resource.refetch()
    }
}

impl<S> SearchController<S> {
    /// Cancel the pending timer and stop every further state change.
    pub fn teardown(&self) {
        let mut session = self.shared.session();
        if session.torn_down {
            return;
        }
        session.torn_down = true;
        session.debouncer.cancel();
        drop(session);

        self.shared.resource.teardown();
        self.listener.abort();
        tracing::debug!("search controller torn down");
    }

    pub fn text(&self) -> String {
        self.shared.session().text.clone()
    }

    /// The active settled query, if the last settlement was non-blank.
    pub fn settled_text(&self) -> Option<String> {
        self.shared.session().settled.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.shared.session().phase
    }

    pub fn is_debouncing(&self) -> bool {
        self.shared.session().debouncer.is_pending()
    }

    pub fn state(&self) -> ResourceState<Vec<Movie>> {
        self.shared.resource.state()
    }

    pub fn resource(&self) -> &AsyncResource<Vec<Movie>> {
        &self.shared.resource
    }

    pub fn trending(&self) -> &TrendingAggregator<S> {
        &self.shared.trending
    }

    /// Display-ready summary of the current results.
    pub fn view(&self) -> SearchView {
        let query = self.settled_text();
        match (self.state(), query) {
            (ResourceState::Idle, _) => SearchView::Prompt,
            (ResourceState::Loading, _) => SearchView::Loading,
            (ResourceState::Failure(error), _) => SearchView::Failed(error),
            (ResourceState::Success(movies), None) => SearchView::Browse(movies),
            (ResourceState::Success(movies), Some(query)) if movies.is_empty() => {
                SearchView::NoResults { query }
            }
            (ResourceState::Success(movies), Some(query)) => SearchView::Results { query, movies },
        }
    }
}

impl<S> Drop for SearchController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S> Shared<S> {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: RowStore + 'static> Shared<S> {
    /// Runs when a debounce timer fires for `cycle`.
    async fn settle(self: Arc<Self>, text: String, cycle: u64) {
        let invocation = {
            let mut session = self.session();
            if session.torn_down || session.cycle != cycle {
                tracing::debug!(cycle, latest = session.cycle, "timer outlived its edit");
                return;
            }

            if text.trim().is_empty() {
                session.phase = SearchPhase::Empty;
                session.settled = None;
                session.settling_generation = None;
                self.settled_tx.send_replace(String::new());
                self.resource.reset();
                tracing::debug!("blank query settled");
                return;
            }

            session.settled = Some(text.clone());
            session.phase = SearchPhase::Fetching;
            self.settled_tx.send_replace(text.clone());
            let invocation = self.resource.refetch();
            session.settling_generation = Some(invocation.generation());
            tracing::debug!(query = %text, generation = invocation.generation(), "query settled");
            invocation
        };

        let settlement = invocation.await;

        {
            let mut session = self.session();
            if session.torn_down {
                return;
            }
            if session.cycle == cycle {
                session.phase = SearchPhase::Settled;
            }
        }

        if !settlement.authoritative {
            tracing::debug!(query = %text, "search superseded before it settled");
            return;
        }

        match &settlement.outcome {
            Ok(movies) => match movies.first() {
                Some(top) => self.record(&text, top).await,
                None => tracing::debug!(query = %text, "no results to record"),
            },
            Err(error) => tracing::warn!(query = %text, %error, "search failed"),
        }
    }

    /// Record data that arrived outside a settlement's own fetch.
    async fn on_data_changed(&self, event: DataChanged<Vec<Movie>>) {
        let term = {
            let session = self.session();
            if session.torn_down || session.settling_generation == Some(event.generation) {
                return;
            }
            match &session.settled {
                Some(term) => term.clone(),
                None => return,
            }
        };

        if let Some(top) = event.data.first() {
            self.record(&term, top).await;
        }
    }

    /// Store failures never reach the input flow; they are logged here.
    async fn record(&self, term: &str, top: &Movie) {
        if let Err(err) = self.trending.record_search(term, top).await {
            tracing::error!(term, error = %err, "failed to record trending search");
        }
    }
}

async fn listen<S: RowStore + 'static>(
    shared: Weak<Shared<S>>,
    mut events: broadcast::Receiver<DataChanged<Vec<Movie>>>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                shared.on_data_changed(event).await;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "search listener lagged behind data changes");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
