//! Authenticated fetch lifecycle
//!
//! One outbound request per trigger, decorated with the stored bearer
//! token. Missing, malformed or rejected credentials clear the stored
//! record and redirect to the login path.
//!
//! A new trigger cancels the one in flight; its late completion is
//! discarded. After [`FetchLifecycle::dispose`] no completion writes state.
//!
//! # Example
//!
//! ```ignore
//! let context = FetchContext::new(client, storage).with_navigator(navigator);
//! let school: FetchLifecycle<SchoolResponse> =
//!     FetchLifecycle::new(context, FetchRequest::new("school/detail").payload(json!({"id": id})));
//!
//! match school.trigger().await {
//!     FetchOutcome::Success => render(school.data()),
//!     FetchOutcome::Failed(err) => toast(err.to_string()),
//!     _ => {}
//! }
//! ```

mod context;
mod request;
mod state;

pub use context::FetchContext;
pub use request::FetchRequest;
pub use state::FetchOutcome;
pub use state::FetchSnapshot;
pub use state::FetchState;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::auth::Session;
use crate::error::{FetchError, UnauthorizedReason};

/// Internal state of a lifecycle.
#[derive(Debug)]
struct FetchInner<T> {
    data: Option<T>,
    error: Option<FetchError>,
    loading: bool,
    state: FetchState,
    /// Bumped by every trigger and reset; completions from older
    /// generations are dropped.
    generation: u64,
    cancel: Option<CancellationToken>,
    disposed: bool,
    request: FetchRequest,
}

/// What a finished exchange should do to state.
enum Completion<T> {
    Data(T),
    Error(FetchError),
    Unauthorized(UnauthorizedReason, Option<FetchError>),
}

/// Marks the run of one generation as abandoned if its future is dropped
/// before finishing.
struct PendingRun<T> {
    lifecycle: FetchLifecycle<T>,
    generation: u64,
    finished: bool,
}

impl<T> Drop for PendingRun<T> {
    fn drop(&mut self) {
        if !self.finished {
            self.lifecycle.abandon(self.generation);
        }
    }
}

/// An authenticated request lifecycle exposing `data`, `error` and
/// `loading` plus a trigger.
///
/// Cheap to clone; clones share state, so one clone can trigger while
/// another renders.
pub struct FetchLifecycle<T> {
    context: FetchContext,
    inner: Arc<RwLock<FetchInner<T>>>,
    dirty: Arc<AtomicBool>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T> FetchLifecycle<T> {
    fn touch(&self) {
        self.dirty.store(true, Ordering::SeqCst);
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Undo `begin` for a run whose future was dropped unfinished.
    ///
    /// No-op once a newer trigger, reset or dispose owns the outputs.
    fn abandon(&self, generation: u64) {
        {
            let Ok(mut guard) = self.inner.write() else {
                return;
            };
            if guard.generation != generation || guard.disposed {
                return;
            }
            debug!("Fetch of {} dropped before completing", guard.request.path);
            guard.cancel = None;
            guard.loading = false;
            guard.state = FetchState::Idle;
        }
        self.touch();
    }
}

impl<T> FetchLifecycle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create an idle lifecycle for `request`.
    pub fn new(context: FetchContext, request: FetchRequest) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            context,
            inner: Arc::new(RwLock::new(FetchInner {
                data: None,
                error: None,
                loading: false,
                state: FetchState::Idle,
                generation: 0,
                cancel: None,
                disposed: false,
                request,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
            revision: Arc::new(revision),
        }
    }

    // -------------------------------------------------------------------------
    // Outputs
    // -------------------------------------------------------------------------

    /// Last successfully fetched data.
    pub fn data(&self) -> Option<T> {
        self.inner.read().ok().and_then(|g| g.data.clone())
    }

    /// Last recorded error.
    pub fn error(&self) -> Option<FetchError> {
        self.inner.read().ok().and_then(|g| g.error.clone())
    }

    /// `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().map(|g| g.loading).unwrap_or(false)
    }

    pub fn state(&self) -> FetchState {
        self.inner.read().map(|g| g.state).unwrap_or_default()
    }

    /// Copy of every output at once.
    pub fn snapshot(&self) -> FetchSnapshot<T> {
        self.inner
            .read()
            .map(|g| FetchSnapshot {
                data: g.data.clone(),
                error: g.error.clone(),
                loading: g.loading,
                state: g.state,
            })
            .unwrap_or_default()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.read().map(|g| g.disposed).unwrap_or(true)
    }

    /// Receiver that changes whenever an output changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Check if outputs changed since last check.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Request
    // -------------------------------------------------------------------------

    /// Current request description.
    pub fn request(&self) -> FetchRequest {
        self.inner
            .read()
            .map(|g| g.request.clone())
            .unwrap_or_default()
    }

    /// Replace the request used by future triggers.
    pub fn set_request(&self, request: FetchRequest) {
        if let Ok(mut guard) = self.inner.write() {
            guard.request = request;
        }
    }

    /// Replace only the payload used by future triggers.
    pub fn set_payload(&self, payload: serde_json::Value) {
        if let Ok(mut guard) = self.inner.write() {
            guard.request.payload = Some(payload);
        }
    }

    // -------------------------------------------------------------------------
    // Control
    // -------------------------------------------------------------------------

    /// Start one lifecycle run.
    ///
    /// `loading` flips to `true` before this returns; the returned future
    /// performs the credential check and the exchange. Any run already in
    /// flight is cancelled. Dropping the future unfinished clears `loading`
    /// and returns the lifecycle to [`FetchState::Idle`].
    pub fn trigger(&self) -> impl Future<Output = FetchOutcome> + Send + 'static {
        let started = self.begin().map(|(generation, token, request)| {
            let pending = PendingRun {
                lifecycle: self.clone(),
                generation,
                finished: false,
            };
            (pending, token, request)
        });
        async move {
            let Some((mut pending, token, request)) = started else {
                return FetchOutcome::Disposed;
            };
            let outcome = pending
                .lifecycle
                .run(pending.generation, token, request)
                .await;
            pending.finished = true;
            outcome
        }
    }

    /// Trigger and drive the run on the tokio runtime.
    pub fn spawn_trigger(&self) -> JoinHandle<FetchOutcome> {
        tokio::spawn(self.trigger())
    }

    /// Cancel any run in flight and clear all outputs.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.inner.write() {
            if let Some(token) = guard.cancel.take() {
                token.cancel();
            }
            guard.generation += 1;
            guard.data = None;
            guard.error = None;
            guard.loading = false;
            guard.state = FetchState::Idle;
        }
        self.touch();
    }

    /// Cancel any run in flight and stop accepting completions.
    ///
    /// Call when the consuming view goes away.
    pub fn dispose(&self) {
        if let Ok(mut guard) = self.inner.write() {
            if let Some(token) = guard.cancel.take() {
                token.cancel();
            }
            guard.disposed = true;
            guard.loading = false;
        }
        self.touch();
    }

    fn begin(&self) -> Option<(u64, CancellationToken, FetchRequest)> {
        let started = {
            let mut guard = self.inner.write().ok()?;
            if guard.disposed {
                return None;
            }
            if let Some(previous) = guard.cancel.take() {
                debug!("Cancelling in-flight fetch of {}", guard.request.path);
                previous.cancel();
            }
            guard.generation += 1;
            let token = CancellationToken::new();
            guard.cancel = Some(token.clone());
            guard.loading = true;
            guard.state = FetchState::Fetching;
            (guard.generation, token, guard.request.clone())
        };
        self.touch();
        Some(started)
    }

    async fn run(
        &self,
        generation: u64,
        token: CancellationToken,
        request: FetchRequest,
    ) -> FetchOutcome {
        let completion = tokio::select! {
            _ = token.cancelled() => return self.stale_outcome(),
            completion = self.exchange(&request) => completion,
        };
        self.complete(generation, completion).await
    }

    async fn exchange(&self, request: &FetchRequest) -> Completion<T> {
        let key = &self.context.config.storage_key;

        let raw = match self.context.storage.get_item(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Reading stored credential failed: {}", e);
                return Completion::Error(FetchError::request_failed(format!(
                    "credential storage unavailable: {}",
                    e
                )));
            }
        };

        let session = match raw.as_deref().map(Session::parse) {
            None => {
                return Completion::Unauthorized(UnauthorizedReason::MissingCredential, None);
            }
            Some(None) => {
                return Completion::Unauthorized(UnauthorizedReason::MalformedCredential, None);
            }
            Some(Some(session)) => session,
        };
        let access_token = session.access_token();
        if access_token.is_expired() {
            return Completion::Unauthorized(UnauthorizedReason::ExpiredCredential, None);
        }

        let api_request = request.to_api_request(&self.context.config.default_method);
        match self
            .context
            .client
            .send(&api_request, &access_token)
            .await
        {
            Ok(body) => match serde_json::from_value::<T>(body) {
                Ok(data) => Completion::Data(data),
                Err(e) => Completion::Error(FetchError::request_failed(format!(
                    "unexpected response shape: {}",
                    e
                ))),
            },
            Err(e) if e.is_unauthorized() => Completion::Unauthorized(
                UnauthorizedReason::Rejected,
                Some(FetchError::Unauthorized(UnauthorizedReason::Rejected)),
            ),
            Err(e) => Completion::Error(FetchError::from(&e)),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner
            .read()
            .map(|g| g.generation == generation && !g.disposed)
            .unwrap_or(false)
    }

    fn stale_outcome(&self) -> FetchOutcome {
        if self.is_disposed() {
            FetchOutcome::Disposed
        } else {
            FetchOutcome::Superseded
        }
    }

    async fn complete(&self, generation: u64, completion: Completion<T>) -> FetchOutcome {
        if !self.is_current(generation) {
            return self.stale_outcome();
        }

        if let Completion::Unauthorized(reason, _) = &completion {
            let reason = *reason;
            if !self.handle_unauthorized(generation, reason).await {
                return self.stale_outcome();
            }
        }

        let outcome = {
            let Ok(mut guard) = self.inner.write() else {
                return FetchOutcome::Disposed;
            };
            if guard.generation != generation || guard.disposed {
                drop(guard);
                return self.stale_outcome();
            }
            guard.loading = false;
            guard.cancel = None;
            match completion {
                Completion::Data(data) => {
                    guard.data = Some(data);
                    guard.error = None;
                    guard.state = FetchState::Success;
                    FetchOutcome::Success
                }
                Completion::Error(error) => {
                    warn!("Fetch of {} failed: {}", guard.request.path, error);
                    guard.error = Some(error.clone());
                    guard.state = FetchState::Failed;
                    FetchOutcome::Failed(error)
                }
                Completion::Unauthorized(reason, error) => {
                    if let Some(error) = error {
                        guard.error = Some(error);
                    }
                    guard.state = FetchState::Idle;
                    FetchOutcome::Unauthorized(reason)
                }
            }
        };
        self.touch();
        outcome
    }

    /// Forced logout: clear the stored credential and redirect to login.
    ///
    /// The credential is cleared regardless; the redirect is skipped and
    /// `false` returned when a newer trigger, reset or dispose landed
    /// while clearing.
    async fn handle_unauthorized(&self, generation: u64, reason: UnauthorizedReason) -> bool {
        let config = &self.context.config;
        info!("Unauthorized ({}), clearing stored credential", reason);
        if let Err(e) = Session::clear(self.context.storage.as_ref(), &config.storage_key).await {
            warn!("Clearing stored credential failed: {}", e);
        }
        if !self.is_current(generation) {
            debug!("Unauthorized run went stale, not redirecting");
            return false;
        }
        info!("Redirecting to {}", config.login_path);
        self.context.navigator.replace(&config.login_path);
        true
    }
}

impl<T> Clone for FetchLifecycle<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<T> std::fmt::Debug for FetchLifecycle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchLifecycle")
            .field("context", &self.context)
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}
