//! Listener registration and removal.
//!
//! Listeners are kept in insertion order, each tagged with a [`ListenerId`]
//! handed out at subscription time. Removal goes through that id, never
//! through closure identity, so registering the same closure twice yields
//! two independent entries.

use crate::metrics::StoreMetrics;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A registered listener callback.
pub(crate) type Listener = Rc<dyn Fn()>;

/// Identifier assigned to a listener when it subscribes.
///
/// Ids are unique per store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value, for logging
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Ordered collection of listeners shared between a store and its
/// subscription handles.
pub(crate) struct ListenerSet {
    store: String,
    entries: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl ListenerSet {
    pub(crate) fn new(store: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Name of the owning store, used as a metrics label
    pub(crate) fn store(&self) -> &str {
        &self.store
    }

    pub(crate) fn insert(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    /// Returns `false` if the id was not registered.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let index = entries.iter().position(|(entry_id, _)| *entry_id == id);
            index.map(|index| entries.remove(index))
        };
        // The listener's captures are dropped here, after the borrow ends.
        removed.is_some()
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Clones the current listeners so they can be called without holding
    /// the borrow. Listeners may subscribe or unsubscribe while running.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the listener
/// this handle was created for. Dropping the handle does not unsubscribe:
/// a listener registered for the lifetime of the store can simply discard it.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
/// use unistore_core::from_fn;
/// use unistore_runtime::Store;
///
/// let store = Store::new(from_fn(|n: &u32, _: &()| Ok::<_, Infallible>(n + 1)));
/// let subscription = store.subscribe(|| println!("changed"));
///
/// assert!(subscription.unsubscribe());
/// assert!(!subscription.unsubscribe()); // already removed
/// ```
pub struct Subscription {
    id: ListenerId,
    listeners: Weak<ListenerSet>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, listeners: &Rc<ListenerSet>) -> Self {
        Self {
            id,
            listeners: Rc::downgrade(listeners),
        }
    }

    /// The id of the listener this handle controls
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered with a live store
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.contains(self.id))
    }

    /// Remove the listener from its store.
    ///
    /// Returns `true` if this call removed it. Later calls, and calls made
    /// after the store has been dropped, do nothing and return `false`.
    pub fn unsubscribe(&self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            tracing::trace!(listener = %self.id, "Store already dropped, nothing to unsubscribe");
            return false;
        };

        let removed = listeners.remove(self.id);
        if removed {
            StoreMetrics::record_listeners(listeners.store(), listeners.len());
            tracing::debug!(
                listener = %self.id,
                remaining = listeners.len(),
                "Listener unsubscribed"
            );
        }
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
