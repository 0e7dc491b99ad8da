//! # Unistore Testing
//!
//! Testing utilities and helpers for unistore reducers and stores.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`CallLog`]: Listeners that record when and in which order they ran
//! - Property-based testing strategies for subscription sequences
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use unistore_runtime::Store;
//! use unistore_testing::CallLog;
//!
//! #[test]
//! fn listeners_fire_in_order() {
//!     let store = Store::new(AppReducer::new());
//!     let log = CallLog::new();
//!     store.subscribe(log.recorder("a"));
//!     store.subscribe(log.recorder("b"));
//!
//!     store.dispatch(AppAction::RemoveGoal { id: 0 }).unwrap();
//!
//!     assert_eq!(log.entries(), vec!["a", "b"]);
//! }
//! ```

/// Recording listeners
pub mod listeners;


/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a tracing subscriber that writes through the test harness.
    ///
    /// Filtering follows `RUST_LOG`, defaulting to `debug`. Safe to call
    /// from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities
///
/// Strategies that drive a store through random subscribe/unsubscribe
/// sequences.
pub mod properties {
    use proptest::prelude::*;

    /// One step of a subscription scenario
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ListenerOp {
        /// Register a new listener
        Subscribe,
        /// Unsubscribe the handle at this index (modulo the number of
        /// handles created so far); may target an already removed one
        Unsubscribe(usize),
        /// Dispatch one action
        Dispatch,
    }

    /// Random sequences of subscription steps, up to `max_len` long
    pub fn listener_ops(max_len: usize) -> impl Strategy<Value = Vec<ListenerOp>> {
        let op = prop_oneof![
            3 => Just(ListenerOp::Subscribe),
            2 => any::<usize>().prop_map(ListenerOp::Unsubscribe),
            2 => Just(ListenerOp::Dispatch),
        ];
        prop::collection::vec(op, 0..=max_len)
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use listeners::CallLog;
pub use properties::{ListenerOp, listener_ops};
pub use reducer_test::ReducerTest;
