//! # Observable Store
//!
//! Wraps a state value with pure transitions and publishes every change to
//! subscribers. Used for [`crate::AuthState`] and [`crate::CartState`].
//!
//! ## Publish Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  store.update(|s| s.add_item(id))                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write lock ─► next = transition(current) ─► changed? ─► swap          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  release lock ─► call each listener(&next)                              │
//! │                                                                         │
//! │  Listeners run outside the lock, so a listener may read the store.      │
//! │  No-op transitions (next == current) publish nothing.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<S> {
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

/// A state container that notifies subscribers on change.
pub struct Store<S> {
    inner: RwLock<Inner<S>>,
}

impl<S> Store<S>
where
    S: Clone + PartialEq,
{
    /// Creates a store holding `state`.
    pub fn new(state: S) -> Self {
        Store {
            inner: RwLock::new(Inner {
                state,
                listeners: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get(&self) -> S {
        self.with(S::clone)
    }

    /// Executes a function with read access to the state.
    ///
    /// ```rust
    /// use inventory_core::{CartState, Store};
    ///
    /// let cart = Store::new(CartState::new());
    /// assert_eq!(cart.with(|c| c.len()), 0);
    /// ```
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&inner.state)
    }

    /// Applies a transition and publishes the result if it changed anything.
    ///
    /// Returns the new state.
    pub fn update<F>(&self, transition: F) -> S
    where
        F: FnOnce(S) -> S,
    {
        let (next, listeners) = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let next = transition(inner.state.clone());
            if next == inner.state {
                return next;
            }
            inner.state = next.clone();
            let listeners: Vec<Listener<S>> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (next, listeners)
        };

        for listener in listeners {
            listener(&next);
        }
        next
    }

    /// Registers a listener called with the new state after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

impl<S> Default for Store<S>
where
    S: Clone + PartialEq + Default,
{
    fn default() -> Self {
        Store::new(S::default())
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
