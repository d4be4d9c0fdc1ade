//! Debounced autocomplete search
//!
//! A [`SearchSession`] turns a stream of keystrokes into at most one
//! geocoding request at a time. Each new input cancels the pending timer or
//! in-flight request of the previous one, and a result is only published
//! while its request is still the newest.

use crate::config::Config;
use crate::error::Error;
use crate::geo::{is_searchable, GeoBackend, GeocodingFeature};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where a session is in its request cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// No timer and no request outstanding
    #[default]
    Idle,
    /// Waiting out the debounce delay
    Pending,
    /// A geocoding request is running
    InFlight,
}

/// Published state of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub phase: SearchPhase,
    pub results: Vec<GeocodingFeature>,
    /// User-facing message of the last failed request
    pub error: Option<String>,
}

struct Slot {
    generation: u64,
    token: CancellationToken,
}

struct Shared {
    slot: Mutex<Slot>,
    view: watch::Sender<SearchView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `update` if `generation` is still the newest request
    ///
    /// The check and the publication happen under the same lock.
    fn publish_if_current<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut SearchView),
    {
        let slot = self.lock();
        if slot.generation != generation {
            return false;
        }
        self.view.send_modify(update);
        true
    }
}

/// Autocomplete session over a geocoder
///
/// Must be used from within a Tokio runtime; requests run on spawned tasks.
pub struct SearchSession<G> {
    geocoder: Arc<G>,
    delay: Duration,
    limit: usize,
    shared: Arc<Shared>,
}

impl<G: GeoBackend + 'static> SearchSession<G> {
    pub fn new(geocoder: Arc<G>, delay: Duration, limit: usize) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            geocoder,
            delay,
            limit,
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    generation: 0,
                    token: CancellationToken::new(),
                }),
                view,
            }),
        }
    }

    /// Create a session with the configured delay and result limit
    pub fn from_config(geocoder: Arc<G>, config: &Config) -> Self {
        Self::new(
            geocoder,
            Duration::from_millis(config.search.debounce_ms),
            config.search.limit,
        )
    }

    /// Feed the current contents of the search box
    pub fn input(&self, query: &str) {
        let mut slot = self.shared.lock();
        slot.token.cancel();
        slot.generation += 1;
        let generation = slot.generation;

        if !is_searchable(query) {
            self.shared.view.send_modify(|view| {
                view.query = query.to_string();
                view.phase = SearchPhase::Idle;
                view.results.clear();
                view.error = None;
            });
            return;
        }

        let token = CancellationToken::new();
        slot.token = token.clone();
        self.shared.view.send_modify(|view| {
            view.query = query.to_string();
            view.phase = SearchPhase::Pending;
            view.error = None;
        });
        drop(slot);

        let geocoder = Arc::clone(&self.geocoder);
        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        let limit = self.limit;
        let query = query.to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            if !shared.publish_if_current(generation, |view| view.phase = SearchPhase::InFlight) {
                return;
            }
            debug!("Searching for '{}'", query);

            let result = tokio::select! {
                _ = token.cancelled() => Err(Error::Cancelled),
                result = geocoder.search(&query, limit) => result,
            };

            match result {
                Ok(features) => {
                    shared.publish_if_current(generation, |view| {
                        view.phase = SearchPhase::Idle;
                        view.results = features;
                        view.error = None;
                    });
                }
                Err(e) if e.is_cancelled() => {
                    debug!("Search for '{}' superseded", query);
                }
                Err(e) => {
                    debug!("Search for '{}' failed: {}", query, e);
                    shared.publish_if_current(generation, |view| {
                        view.phase = SearchPhase::Idle;
                        view.results.clear();
                        view.error = Some(e.user_message());
                    });
                }
            }
        });
    }

    /// Cancel any pending timer or in-flight request
    pub fn close(&self) {
        let mut slot = self.shared.lock();
        slot.token.cancel();
        slot.generation += 1;
        self.shared.view.send_if_modified(|view| {
            let was = std::mem::replace(&mut view.phase, SearchPhase::Idle);
            was != SearchPhase::Idle
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.shared.view.subscribe()
    }

    /// Latest published state
    pub fn view(&self) -> SearchView {
        self.shared.view.borrow().clone()
    }
}

impl<G> Drop for SearchSession<G> {
    fn drop(&mut self) {
        self.shared.lock().token.cancel();
    }
}
