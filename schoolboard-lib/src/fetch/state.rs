//! Fetch lifecycle states and outcomes.

use crate::error::{FetchError, UnauthorizedReason};

/// Where a fetch lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Not started, reset, or ended in an unauthorized redirect.
    #[default]
    Idle,
    /// A request is in flight.
    Fetching,
    /// The last request succeeded.
    Success,
    /// The last request failed.
    Failed,
}

/// How one trigger ended, as seen by whoever awaited it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `data` was replaced.
    Success,
    /// `error` was set; `data` kept its previous value.
    Failed(FetchError),
    /// Credential cleared and login redirect issued.
    Unauthorized(UnauthorizedReason),
    /// A newer trigger or a reset replaced this one; nothing was written.
    Superseded,
    /// The lifecycle was disposed; nothing was written.
    Disposed,
}

impl FetchOutcome {
    /// Returns `true` if this trigger wrote its result.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Superseded | Self::Disposed)
    }
}

/// Point-in-time copy of the observable outputs.
#[derive(Debug, Clone)]
pub struct FetchSnapshot<T> {
    pub data: Option<T>,
    pub error: Option<FetchError>,
    pub loading: bool,
    pub state: FetchState,
}

impl<T> Default for FetchSnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
            state: FetchState::Idle,
        }
    }
}
