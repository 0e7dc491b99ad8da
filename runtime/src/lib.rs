//! # Unistore Runtime
//!
//! The Store: a single state slot, changed only by a reducer, with listeners
//! notified after every committed change.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, the reducer and the listener list
//! - **Subscription**: Handle that removes one listener
//! - **`StoreConfig`**: Name and reentrancy bound
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::convert::Infallible;
//! use std::rc::Rc;
//! use unistore_core::from_fn;
//! use unistore_runtime::Store;
//!
//! let store = Store::new(from_fn(|count: &i64, delta: &i64| Ok::<_, Infallible>(count + delta)));
//!
//! let calls = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&calls);
//! let subscription = store.subscribe(move || seen.set(seen.get() + 1));
//!
//! store.dispatch(5).unwrap();
//! store.dispatch(-2).unwrap();
//! assert_eq!(store.snapshot(), 3);
//! assert_eq!(calls.get(), 2);
//!
//! subscription.unsubscribe();
//! store.dispatch(1).unwrap();
//! assert_eq!(calls.get(), 2);
//! ```
//!
//! ## Threading
//!
//! A store is single-threaded: it is neither `Send` nor `Sync`, and every
//! operation runs to completion on the caller's stack.

use std::cell::Cell;

/// Prometheus metrics for observability
pub mod metrics;

/// Listener ids and unsubscribe handles
pub mod subscription;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors returned by [`Store::dispatch`](crate::Store::dispatch)
    ///
    /// Whatever the variant, the dispatch committed nothing: the state is
    /// the one before the call and no listener ran.
    ///
    /// # Type Parameters
    ///
    /// - `E`: The reducer's error type
    #[derive(Error, Debug)]
    pub enum StoreError<E> {
        /// The reducer returned an error
        #[error("Reducer rejected the action")]
        Reducer(#[source] E),

        /// A listener dispatched while too many dispatches were already
        /// in progress on this store
        #[error("Reentrant dispatch at depth {depth} exceeds the limit of {limit}")]
        ReentrantDispatch {
            /// Dispatches already in progress when this one was attempted
            depth: usize,
            /// The configured `max_reentrant_depth`
            limit: usize,
        },
    }

    impl<E> StoreError<E> {
        /// The reducer's error, if that is what failed
        #[must_use]
        pub fn into_reducer_error(self) -> Option<E> {
            match self {
                Self::Reducer(error) => Some(error),
                Self::ReentrantDispatch { .. } => None,
            }
        }
    }
}

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use unistore_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_name("app")
///     .with_max_reentrant_depth(0); // listeners may not dispatch
///
/// assert_eq!(config.name, "app");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name attached to log spans and metric labels
    pub name: String,
    /// How many dispatches may be nested inside listeners.
    ///
    /// `0` rejects any dispatch made while another is notifying.
    pub max_reentrant_depth: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, max_reentrant_depth: usize) -> Self {
        Self {
            name: name.into(),
            max_reentrant_depth,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the reentrancy bound
    #[must_use]
    pub const fn with_max_reentrant_depth(mut self, depth: usize) -> Self {
        self.max_reentrant_depth = depth;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            max_reentrant_depth: 32,
        }
    }
}

/// Tracks how many dispatches are in progress; decrements on drop so an
/// unwinding listener does not leave the count raised.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

/// Store module - the runtime for a reducer
pub mod store {
    use super::{DepthGuard, StoreConfig};
    use crate::error::StoreError;
    use crate::metrics::StoreMetrics;
    use crate::subscription::{ListenerSet, Subscription};
    use std::cell::{Cell, RefCell};
    use std::fmt;
    use std::rc::Rc;
    use std::time::Instant;
    use unistore_core::reducer::Reducer;

    /// The Store - owner of a single state value
    ///
    /// The Store manages:
    /// 1. State (replaced wholesale on every successful dispatch)
    /// 2. Reducer (the only code that computes new state)
    /// 3. Listeners (called in subscription order after each commit)
    ///
    /// Cloning a store clones a handle; all clones share the same state and
    /// listeners. A listener that captures a clone of its own store keeps
    /// the store alive for as long as it stays subscribed.
    ///
    /// # Type Parameters
    ///
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```
    /// use std::convert::Infallible;
    /// use unistore_core::from_fn;
    /// use unistore_runtime::Store;
    ///
    /// let store = Store::new(from_fn(|names: &Vec<String>, name: &String| {
    ///     let mut next = names.clone();
    ///     next.push(name.clone());
    ///     Ok::<_, Infallible>(next)
    /// }));
    ///
    /// let observer = store.clone();
    /// store.subscribe(move || println!("{} names", observer.state(Vec::len)));
    ///
    /// store.dispatch("Ada".to_string()).unwrap();
    /// assert_eq!(store.snapshot(), vec!["Ada".to_string()]);
    /// ```
    pub struct Store<R: Reducer> {
        inner: Rc<Inner<R>>,
    }

    struct Inner<R: Reducer> {
        reducer: R,
        state: RefCell<R::State>,
        listeners: Rc<ListenerSet>,
        config: StoreConfig,
        depth: Cell<usize>,
    }

    impl<R: Reducer> Store<R> {
        /// Create a new store whose state is the reducer's initial state
        #[must_use]
        pub fn new(reducer: R) -> Self {
            Self::with_config(reducer, StoreConfig::default())
        }

        /// Create a new store starting from an explicit state
        #[must_use]
        pub fn with_state(reducer: R, initial_state: R::State) -> Self {
            Self::build(reducer, initial_state, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(reducer: R, config: StoreConfig) -> Self {
            let initial_state = reducer.initial_state();
            Self::build(reducer, initial_state, config)
        }

        fn build(reducer: R, initial_state: R::State, config: StoreConfig) -> Self {
            tracing::debug!(store = %config.name, "Store created");
            Self {
                inner: Rc::new(Inner {
                    reducer,
                    state: RefCell::new(initial_state),
                    listeners: Rc::new(ListenerSet::new(config.name.clone())),
                    config,
                    depth: Cell::new(0),
                }),
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len());
        /// ```
        ///
        /// # Panics
        ///
        /// Panics if `f` dispatches to this store; the state is borrowed for
        /// the duration of the call.
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let state = self.inner.state.borrow();
            f(&state)
        }

        /// A copy of the current state
        #[must_use]
        pub fn snapshot(&self) -> R::State
        where
            R::State: Clone,
        {
            self.inner.state.borrow().clone()
        }

        /// Register a listener to be called after every committed dispatch.
        ///
        /// Listeners are called in the order they subscribed. Subscribing the
        /// same closure twice registers it twice. Use the returned handle to
        /// remove it again.
        pub fn subscribe<F>(&self, listener: F) -> Subscription
        where
            F: Fn() + 'static,
        {
            let listeners = &self.inner.listeners;
            let id = listeners.insert(Rc::new(listener));
            StoreMetrics::record_listeners(&self.inner.config.name, listeners.len());
            tracing::debug!(
                store = %self.inner.config.name,
                listener = %id,
                total = listeners.len(),
                "Listener subscribed"
            );
            Subscription::new(id, listeners)
        }

        /// Apply an action and notify listeners
        ///
        /// 1. Runs the reducer on the current state
        /// 2. Replaces the state with the result
        /// 3. Calls every listener registered when notification starts, in
        ///    subscription order
        ///
        /// Listeners subscribed while notification runs are first called on
        /// the next dispatch; listeners unsubscribed while it runs are still
        /// called this time.
        ///
        /// A listener may dispatch again. The nested dispatch completes
        /// (commit and its own notification) before the outer notification
        /// moves on to its next listener.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Reducer`]: the reducer failed
        /// - [`StoreError::ReentrantDispatch`]: nesting exceeds
        ///   [`StoreConfig::max_reentrant_depth`]
        ///
        /// In both cases the state is unchanged and no listener is called.
        ///
        /// # Panics
        ///
        /// Panics if called from inside [`state`](Self::state). A panicking
        /// listener unwinds out of this call after the state was committed.
        #[tracing::instrument(
            skip(self, action),
            name = "store_dispatch",
            fields(store = %self.inner.config.name)
        )]
        pub fn dispatch(&self, action: R::Action) -> Result<(), StoreError<R::Error>> {
            let inner = &*self.inner;

            let depth = inner.depth.get();
            let limit = inner.config.max_reentrant_depth;
            if depth > limit {
                tracing::warn!(depth, limit, "Rejected reentrant dispatch");
                StoreMetrics::record_failure(&inner.config.name, "reentrant");
                return Err(StoreError::ReentrantDispatch { depth, limit });
            }
            let _guard = DepthGuard::enter(&inner.depth);
            let started = Instant::now();

            let next = {
                let state = inner.state.borrow();
                inner.reducer.reduce(&state, &action)
            };
            let next = match next {
                Ok(next) => next,
                Err(error) => {
                    tracing::warn!(depth, "Reducer rejected action, state unchanged");
                    StoreMetrics::record_failure(&inner.config.name, "reducer");
                    return Err(StoreError::Reducer(error));
                },
            };

            // The previous state is dropped after the borrow is released.
            let previous = inner.state.replace(next);
            drop(previous);

            let listeners = inner.listeners.snapshot();
            tracing::debug!(
                depth,
                listeners = listeners.len(),
                "State committed, notifying listeners"
            );
            for listener in &listeners {
                listener();
            }

            StoreMetrics::record_dispatch(&inner.config.name, started.elapsed());
            Ok(())
        }

        /// Number of listeners currently registered
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.inner.listeners.len()
        }

        /// This store's configuration
        #[must_use]
        pub fn config(&self) -> &StoreConfig {
            &self.inner.config
        }
    }

    impl<R: Reducer> Clone for Store<R> {
        fn clone(&self) -> Self {
            Self {
                inner: Rc::clone(&self.inner),
            }
        }
    }

    impl<R: Reducer> fmt::Debug for Store<R> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Store")
                .field("name", &self.inner.config.name)
                .field("listeners", &self.inner.listeners.len())
                .field("dispatching", &(self.inner.depth.get() > 0))
                .finish_non_exhaustive()
        }
    }
}

// Re-export for convenience
pub use error::StoreError;
pub use store::Store;
pub use subscription::{ListenerId, Subscription};
