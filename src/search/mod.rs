use crate::error::messages;
use crate::models::MovieSummary;
use crate::omdb::MetadataProvider;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// What the result pane shows when nothing is in flight. At most one of
/// results and an error message is populated at rest.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    /// Query is non-empty but still under the minimum length.
    Hint(String),
    Results(Vec<MovieSummary>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub status: SearchStatus,
    pub is_loading: bool,
}

/// Serializes state commits against query supersession. Every publish
/// goes through `commit`, which drops writes from stale generations
/// while holding the same lock `begin` takes to start a new one.
struct Shared {
    state: watch::Sender<SearchState>,
    generation: Mutex<u64>,
}

impl Shared {
    fn begin(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap();
        *generation += 1;
        *generation
    }

    fn commit(&self, generation: u64, state: SearchState) -> bool {
        let current = self.generation.lock().unwrap();
        if *current != generation {
            return false;
        }
        self.state.send_replace(state);
        true
    }
}

/// Maps the live query text to search results, with at most one
/// logically active request at a time. A newer query aborts the
/// previous request's task, and even a task that escapes the abort
/// cannot publish: its generation is stale by the time it commits.
pub struct SearchController {
    provider: Arc<dyn MetadataProvider>,
    min_query_len: usize,
    shared: Arc<Shared>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(provider: Arc<dyn MetadataProvider>, min_query_len: usize) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            provider,
            min_query_len,
            shared: Arc::new(Shared {
                state,
                generation: Mutex::new(0),
            }),
            in_flight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Re-evaluate the query. Called on every edit of the search text.
    #[instrument(skip(self))]
    pub fn set_query(&self, query: &str) {
        let generation = self.shared.begin();

        if let Some(handle) = self.in_flight.lock().unwrap().take() {
            handle.abort();
        }

        if query.chars().count() < self.min_query_len {
            let status = if query.is_empty() {
                SearchStatus::Idle
            } else {
                SearchStatus::Hint(messages::KEEP_TYPING.to_string())
            };
            self.shared.commit(
                generation,
                SearchState {
                    status,
                    is_loading: false,
                },
            );
            return;
        }

        // Previous results stay visible while the new request runs, but
        // a stale error or hint is cleared up front.
        let status = match self.state().status {
            SearchStatus::Failed(_) | SearchStatus::Hint(_) => SearchStatus::Idle,
            other => other,
        };
        self.shared.commit(
            generation,
            SearchState {
                status,
                is_loading: true,
            },
        );

        let provider = Arc::clone(&self.provider);
        let shared = Arc::clone(&self.shared);
        let query = query.to_string();
        let handle = tokio::spawn(async move {
            let status = match provider.search(&query).await {
                Ok(items) => SearchStatus::Results(items),
                Err(err) => SearchStatus::Failed(messages::for_fetch_error(&err)),
            };
            let committed = shared.commit(
                generation,
                SearchState {
                    status,
                    is_loading: false,
                },
            );
            if !committed {
                debug!("Dropping superseded search response for {:?}", query);
            }
        });
        *self.in_flight.lock().unwrap() = Some(handle);
    }
}
