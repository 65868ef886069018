//! Independent state containers
//!
//! Each slice of application state lives in its own [`Store`] and is
//! changed only by dispatching that slice's actions. Stores are cheap to
//! clone; clones share state.
//!
//! # Example
//!
//! ```
//! use schoolboard_lib::store::{SidebarAction, SidebarSlice, Store};
//!
//! let sidebar = Store::<SidebarSlice>::default();
//! sidebar.dispatch(SidebarAction::Toggle);
//! assert!(sidebar.get().open);
//! ```

mod auth;
mod breadcrumb;
mod sidebar;

pub use auth::*;
pub use breadcrumb::*;
pub use sidebar::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::watch;

/// A slice of state together with the actions that change it.
pub trait Slice: Clone + Send + Sync + 'static {
    type Action: Send;

    /// Apply `action` in place.
    fn reduce(&mut self, action: Self::Action);
}

/// Shared container for one [`Slice`].
#[derive(Debug)]
pub struct Store<S> {
    inner: Arc<RwLock<S>>,
    dirty: Arc<AtomicBool>,
    revision: Arc<watch::Sender<u64>>,
}

impl<S: Slice> Store<S> {
    /// Create a store holding `initial`.
    pub fn new(initial: S) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(initial)),
            dirty: Arc::new(AtomicBool::new(false)),
            revision: Arc::new(revision),
        }
    }

    /// Get a clone of the current state
    pub fn get(&self) -> S {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Read the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Apply an action and notify subscribers.
    pub fn dispatch(&self, action: S::Action) {
        if let Ok(mut guard) = self.inner.write() {
            guard.reduce(action);
            self.dirty.store(true, Ordering::SeqCst);
        }
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Receiver that changes after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Check if the state has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<S: Slice + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = Store::<SidebarSlice>::default();
        let other = store.clone();
        other.dispatch(SidebarAction::Open);
        assert!(store.get().open);
        assert!(store.is_dirty());
        store.clear_dirty();
        assert!(!other.is_dirty());
    }

    #[test]
    fn test_subscribers_see_dispatch() {
        let store = Store::<BreadcrumbSlice>::default();
        let mut rx = store.subscribe();
        store.dispatch(BreadcrumbAction::Clear);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[test]
    fn test_stores_are_independent() {
        let sidebar = Store::<SidebarSlice>::default();
        let crumbs = Store::<BreadcrumbSlice>::default();
        sidebar.dispatch(SidebarAction::Toggle);
        assert!(!crumbs.is_dirty());
        assert!(crumbs.get().items.is_empty());
    }
}
