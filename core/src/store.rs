//! Owned view-state container for the list and detail screens.
//!
//! # Design
//! Each slot is a `tokio::sync::watch` channel whose only writer is the
//! store. Presentation either reads a cloned snapshot or subscribes and
//! re-renders on change. A slot holds `None` until its first trigger and
//! one complete `ViewState` from then on.
//!
//! - The list slot fetches at most once. `load_list` is a check-and-set on
//!   `ListPhase`, so repeated triggers never issue a second request.
//! - The detail slot is last-request-wins. Every `load_detail` bumps a
//!   request token; a completion publishes only if its token is still the
//!   current one. Token check and publish happen under the slot's mutex, so
//!   a stale result can never land after a newer `Loading`.
//! - Fetches run on the supplied runtime in their own task. A panicking
//!   repository surfaces as `ErrorKind::Unknown` instead of leaving the slot
//!   stuck in `Loading`.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{ErrorInfo, ErrorKind};
use crate::repository::PokemonRepository;
use crate::state::ViewState;
use crate::types::{PokemonDetail, PokemonSummary};

pub type ListState = ViewState<Vec<PokemonSummary>>;
pub type DetailState = ViewState<PokemonDetail>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListPhase {
    Idle,
    InFlight,
    Done,
}

#[derive(Debug, Default)]
struct DetailSlot {
    token: u64,
    name: Option<String>,
}

struct Inner<R> {
    repository: R,
    runtime: Handle,
    list_phase: Mutex<ListPhase>,
    list_tx: watch::Sender<Option<ListState>>,
    detail_slot: Mutex<DetailSlot>,
    detail_tx: watch::Sender<Option<DetailState>>,
}

/// Cheap to clone; clones share the same slots.
pub struct ViewStateStore<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for ViewStateStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: PokemonRepository> ViewStateStore<R> {
    pub fn new(repository: R, runtime: Handle) -> Self {
        let (list_tx, _) = watch::channel(None);
        let (detail_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                repository,
                runtime,
                list_phase: Mutex::new(ListPhase::Idle),
                list_tx,
                detail_slot: Mutex::new(DetailSlot::default()),
                detail_tx,
            }),
        }
    }

    /// Start the listing fetch unless one is running or has finished.
    ///
    /// Returns the fetch task when this call started it.
    pub fn load_list(&self) -> Option<JoinHandle<()>> {
        {
            let mut phase = self.inner.list_phase.lock();
            if *phase != ListPhase::Idle {
                tracing::debug!(phase = ?*phase, "list already requested");
                return None;
            }
            *phase = ListPhase::InFlight;
            self.inner.list_tx.send_replace(Some(ViewState::Loading));
        }
        tracing::debug!("loading list");

        let inner = Arc::clone(&self.inner);
        Some(self.inner.runtime.spawn(async move {
            let fetch = {
                let inner = Arc::clone(&inner);
                async move { inner.repository.list_names().await }
            };
            let state = ViewState::from_result(guarded(&inner.runtime, fetch).await)
                .map(|names| names.into_iter().map(PokemonSummary::from).collect());
            if let ViewState::Error { cause } = &state {
                tracing::warn!(kind = %cause.kind, error = %cause.message, "list fetch failed");
            }

            let mut phase = inner.list_phase.lock();
            *phase = ListPhase::Done;
            inner.list_tx.send_replace(Some(state));
        }))
    }

    /// Start a detail fetch for `name`, superseding any fetch still running.
    pub fn load_detail(&self, name: &str) -> JoinHandle<()> {
        let token = {
            let mut slot = self.inner.detail_slot.lock();
            slot.token += 1;
            slot.name = Some(name.to_string());
            self.inner.detail_tx.send_replace(Some(ViewState::Loading));
            slot.token
        };
        tracing::debug!(pokemon = name, token, "loading detail");

        let inner = Arc::clone(&self.inner);
        let name = name.to_string();
        self.inner.runtime.spawn(async move {
            let fetch = {
                let inner = Arc::clone(&inner);
                let name = name.clone();
                async move { inner.repository.get_detail(&name).await }
            };
            let state = ViewState::from_result(guarded(&inner.runtime, fetch).await);

            let slot = inner.detail_slot.lock();
            if slot.token != token {
                tracing::debug!(pokemon = %name, token, current = slot.token, "dropping stale detail");
                return;
            }
            inner.detail_tx.send_replace(Some(state));
        })
    }
}

impl<R> ViewStateStore<R> {
    pub fn list_state(&self) -> Option<ListState> {
        self.inner.list_tx.borrow().clone()
    }

    pub fn detail_state(&self) -> Option<DetailState> {
        self.inner.detail_tx.borrow().clone()
    }

    pub fn subscribe_list(&self) -> watch::Receiver<Option<ListState>> {
        self.inner.list_tx.subscribe()
    }

    pub fn subscribe_detail(&self) -> watch::Receiver<Option<DetailState>> {
        self.inner.detail_tx.subscribe()
    }

    /// Name of the most recently requested detail.
    pub fn current_detail_name(&self) -> Option<String> {
        self.inner.detail_slot.lock().name.clone()
    }

    /// Requested name and detail state, read together so the state always
    /// belongs to the name (or to nothing newer than it).
    pub fn detail_snapshot(&self) -> (Option<String>, Option<DetailState>) {
        let slot = self.inner.detail_slot.lock();
        (slot.name.clone(), self.inner.detail_tx.borrow().clone())
    }

    pub fn runtime(&self) -> &Handle {
        &self.inner.runtime
    }
}

/// Run `fetch` in its own task so a panic becomes an `ErrorInfo`.
async fn guarded<T, F>(runtime: &Handle, fetch: F) -> Result<T, ErrorInfo>
where
    F: Future<Output = Result<T, ErrorInfo>> + Send + 'static,
    T: Send + 'static,
{
    match runtime.spawn(fetch).await {
        Ok(result) => result,
        Err(e) => Err(ErrorInfo::new(
            ErrorKind::Unknown,
            format!("fetch task failed: {e}"),
        )),
    }
}
