//! Polling ticker search.
//!
//! The backend runs a search as a job: one call starts it and hands back a
//! `search_id`, later calls collect whatever it has found so far. A session
//! keeps polling, merging each batch into what it already has, until the job
//! reports `complete`, enough distinct results are in, or its time budget
//! runs out.
//!
//! Sessions are cancelled cooperatively. A superseded session's requests are
//! left to finish, but nothing they return is ever published.

use crate::config::SearchConfig;
use crate::error::{ClientError, Result, SEARCH_FAILED_MESSAGE};
use crate::schema::{SearchBatch, SearchResult};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, trace};

/// The two calls a search session needs from the backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Submit `query`; returns the job's `search_id`.
    async fn start_search(&self, query: &str, limit: usize) -> Result<String>;

    /// Whatever the job has found so far.
    async fn poll_once(&self, search_id: &str) -> Result<SearchBatch>;
}

//////////////////////////////////////////////////////////////////////////////////////

/// Shared "is this session still wanted" flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

//////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchState {
    #[default]
    Idle,
    Starting,
    Polling,
    Done,
    Failed,
    Superseded,
}

/// Why a session stopped polling.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchStop {
    /// The backend said it had nothing more.
    Complete,
    /// Enough distinct results to show.
    Enough,
    /// The time budget ran out; results are whatever had arrived.
    Deadline,
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// The query was too short to send.
    Skipped,
    Finished {
        results: Vec<SearchResult>,
        stop: SearchStop,
    },
    Failed(ClientError),
    /// Replaced or torn down before it finished.
    Superseded,
}

/// What observers of a [`StockSearch`] see.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub state: SearchState,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Starting | SearchState::Polling)
    }
}

//////////////////////////////////////////////////////////////////////////////////////

/// `old ++ new` with duplicates removed, keyed on symbol + exchange. The first
/// instance of a key keeps its position.
pub fn merge(old: &[SearchResult], new: &[SearchResult]) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    old.iter()
        .chain(new.iter())
        .filter(|r| seen.insert(r.dedupe_key()))
        .cloned()
        .collect()
}

/// One running search job and everything it has returned so far.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub search_id: String,
    pub query: String,
    /// When the first poll went out; the deadline counts from here.
    pub started_at: Instant,
    pub results: Vec<SearchResult>,
    pub complete: bool,
}

impl SearchSession {
    pub fn new(search_id: impl Into<String>, query: impl Into<String>, started_at: Instant) -> Self {
        Self {
            search_id: search_id.into(),
            query: query.into(),
            started_at,
            results: Vec::new(),
            complete: false,
        }
    }

    /// [`merge`] a batch in; returns how many new results it contributed.
    pub fn absorb(&mut self, batch: SearchBatch) -> usize {
        let before = self.results.len();
        self.results = merge(&self.results, &batch.results);
        self.complete |= batch.complete;
        self.results.len() - before
    }

    /// `Some` once polling should stop.
    pub fn stop_reason(&self, config: &SearchConfig, now: Instant) -> Option<SearchStop> {
        if self.complete {
            Some(SearchStop::Complete)
        } else if self.results.len() >= config.enough_results {
            Some(SearchStop::Enough)
        } else if now.saturating_duration_since(self.started_at) >= config.deadline {
            Some(SearchStop::Deadline)
        } else {
            None
        }
    }
}

//////////////////////////////////////////////////////////////////////////////////////

/// Replace the published snapshot unless `token` has been cancelled. The
/// check runs under the channel's lock, so a session superseded through
/// [`StockSearch`] can never overwrite its successor.
fn publish(
    updates: &watch::Sender<SearchSnapshot>,
    token: &CancellationToken,
    snapshot: SearchSnapshot,
) -> bool {
    updates.send_if_modified(|current| {
        if token.is_cancelled() {
            return false;
        }
        *current = snapshot;
        true
    })
}

fn failed(
    query: &str,
    token: &CancellationToken,
    updates: &watch::Sender<SearchSnapshot>,
    e: ClientError,
) -> SearchOutcome {
    let published = publish(
        updates,
        token,
        SearchSnapshot {
            query: query.to_string(),
            state: SearchState::Failed,
            results: Vec::new(),
            error: Some(SEARCH_FAILED_MESSAGE.to_string()),
        },
    );
    if !published {
        debug!("search for {query:?} failed after being superseded: {e}");
        return SearchOutcome::Superseded;
    }
    error!("search for {query:?} failed: {e}");
    SearchOutcome::Failed(e)
}

/// Drive one search session from submission to a stop condition, publishing
/// every state change to `updates` for as long as `token` stays live.
///
/// Polls are strictly sequential with `config.poll_interval` between them.
/// Failures are not retried.
pub async fn run_search<B>(
    backend: &B,
    query: &str,
    config: &SearchConfig,
    token: &CancellationToken,
    updates: &watch::Sender<SearchSnapshot>,
) -> SearchOutcome
where
    B: SearchBackend + ?Sized,
{
    let snapshot = |state, results: &[SearchResult]| SearchSnapshot {
        query: query.to_string(),
        state,
        results: results.to_vec(),
        error: None,
    };

    if query.chars().count() < config.min_query_len {
        trace!("query {query:?} too short to search");
        publish(updates, token, snapshot(SearchState::Idle, &[]));
        return SearchOutcome::Skipped;
    }

    if !publish(updates, token, snapshot(SearchState::Starting, &[])) {
        return SearchOutcome::Superseded;
    }
    let search_id = match backend.start_search(query, config.limit).await {
        Ok(id) => id,
        Err(e) => return failed(query, token, updates, e),
    };
    if token.is_cancelled() {
        debug!("dropping search_id {search_id} for superseded query {query:?}");
        return SearchOutcome::Superseded;
    }
    trace!("search {search_id} started for {query:?}");

    let mut session = SearchSession::new(search_id, query, Instant::now());
    if !publish(updates, token, snapshot(SearchState::Polling, &[])) {
        return SearchOutcome::Superseded;
    }

    loop {
        let batch = match backend.poll_once(&session.search_id).await {
            Ok(batch) => batch,
            Err(e) => return failed(query, token, updates, e),
        };
        if token.is_cancelled() {
            debug!("dropping batch from superseded search {}", session.search_id);
            return SearchOutcome::Superseded;
        }

        let fresh = session.absorb(batch);
        trace!(
            "search {}: +{fresh} results ({} total, complete: {})",
            session.search_id,
            session.results.len(),
            session.complete
        );

        if let Some(stop) = session.stop_reason(config, Instant::now()) {
            if !publish(updates, token, snapshot(SearchState::Done, &session.results)) {
                return SearchOutcome::Superseded;
            }
            debug!(
                "search {} done ({stop:?}) with {} results",
                session.search_id,
                session.results.len()
            );
            return SearchOutcome::Finished {
                results: session.results,
                stop,
            };
        }

        if !publish(updates, token, snapshot(SearchState::Polling, &session.results)) {
            return SearchOutcome::Superseded;
        }
        sleep(config.poll_interval).await;
        if token.is_cancelled() {
            return SearchOutcome::Superseded;
        }
    }
}

//////////////////////////////////////////////////////////////////////////////////////

/// A search box's worth of state: at most one live session, replaced
/// whenever the query changes.
pub struct StockSearch<B: ?Sized> {
    backend: Arc<B>,
    config: SearchConfig,
    updates: Arc<watch::Sender<SearchSnapshot>>,
    active: Option<CancellationToken>,
}

impl<B> StockSearch<B>
where
    B: SearchBackend + ?Sized + 'static,
{
    pub fn new(backend: Arc<B>, config: SearchConfig) -> Self {
        let (updates, _) = watch::channel(SearchSnapshot::default());
        Self {
            backend,
            config,
            updates: Arc::new(updates),
            active: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.updates.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.updates.borrow().clone()
    }

    /// Supersede whatever is running and search for `query` instead.
    pub fn set_query(&mut self, query: impl Into<String>) -> JoinHandle<SearchOutcome> {
        let query = query.into();
        let token = CancellationToken::new();
        let previous = self.active.replace(token.clone());

        self.updates.send_modify(|current| {
            if let Some(previous) = &previous {
                previous.cancel();
            }
            *current = SearchSnapshot {
                query: query.clone(),
                ..Default::default()
            };
        });

        let backend = self.backend.clone();
        let config = self.config.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move { run_search(backend.as_ref(), &query, &config, &token, &updates).await })
    }

    /// Stop publishing from the current session, if any.
    pub fn teardown(&mut self) {
        if let Some(token) = self.active.take() {
            self.updates.send_modify(|current| {
                token.cancel();
                current.state = SearchState::Superseded;
            });
        }
    }
}

impl<B: ?Sized> Drop for StockSearch<B> {
    fn drop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }
}
