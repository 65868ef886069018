//! Navigation boundary
//!
//! The library never manages routes. When it detects an unauthorized
//! session it asks a [`Navigator`] for a hard redirect and moves on.

use std::sync::Mutex;

use log::info;
use tokio::sync::mpsc;

/// Path the dashboard sends users to when their session is gone.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// A navigation request emitted by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// Target path.
    pub path: String,
    /// `true` for a history-replacing redirect.
    pub replace: bool,
}

impl NavigationEvent {
    /// Creates a history-replacing redirect.
    pub fn replace(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replace: true,
        }
    }
}

/// Receives navigation requests from the library.
pub trait Navigator: Send + Sync {
    /// Hard redirect to `path`, replacing the current location.
    fn replace(&self, path: &str);
}

/// Navigator that only logs the redirect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn replace(&self, path: &str) {
        info!("Navigation to {} requested (no navigator installed)", path);
    }
}

/// Navigator that forwards every request over an unbounded channel.
///
/// The front end owns the receiver and performs the actual routing.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<NavigationEvent>,
}

impl ChannelNavigator {
    /// Creates a navigator and the receiver for its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn replace(&self, path: &str) {
        // Receiver gone means the front end shut down; nothing to route.
        let _ = self.tx.send(NavigationEvent::replace(path));
    }
}

/// Navigator that records every redirect; handy in tests and the CLI.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events in order.
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Returns the most recent redirect target.
    pub fn last_path(&self) -> Option<String> {
        self.events().last().map(|e| e.path.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(NavigationEvent::replace(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_navigator_forwards() {
        let (nav, mut rx) = ChannelNavigator::new();
        nav.replace("/login");
        assert_eq!(rx.try_recv().unwrap(), NavigationEvent::replace("/login"));
    }

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new();
        assert!(nav.last_path().is_none());
        nav.replace("/login");
        nav.replace("/school");
        assert_eq!(nav.events().len(), 2);
        assert_eq!(nav.last_path().as_deref(), Some("/school"));
    }
}
