//! # Unistore Core
//!
//! Core trait for the unistore state container.
//!
//! A store owns exactly one state value and changes it only by running a
//! reducer. This crate defines that reducer contract; the store itself lives
//! in `unistore-runtime`.
//!
//! ## Core Concepts
//!
//! - **State**: Application-defined value owned by a store
//! - **Action**: Description of an intended state transition
//! - **Reducer**: Pure function `(&State, &Action) → Result<State, Error>`
//!
//! ## Example
//!
//! ```
//! use std::convert::Infallible;
//! use unistore_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Reset,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Error = Infallible;
//!
//!     fn initial_state(&self) -> CounterState {
//!         CounterState::default()
//!     }
//!
//!     fn reduce(
//!         &self,
//!         state: &CounterState,
//!         action: &CounterAction,
//!     ) -> Result<CounterState, Infallible> {
//!         Ok(match action {
//!             CounterAction::Increment => CounterState { count: state.count + 1 },
//!             CounterAction::Reset => CounterState::default(),
//!         })
//!     }
//! }
//!
//! let reducer = CounterReducer;
//! let state = reducer.initial_state();
//! let state = reducer.reduce(&state, &CounterAction::Increment).unwrap();
//! assert_eq!(state.count, 1);
//! ```

/// Closure-backed reducers
pub mod function;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(&State, &Action) → Result<State, Error>`.
///
/// They receive the current state by shared reference, so they cannot mutate
/// it. A store commits the returned state only when the reducer succeeds.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer produces
    /// - `Action`: The action type this reducer processes
    /// - `Error`: What a failed reduction reports; use
    ///   [`Infallible`](std::convert::Infallible) for reducers that cannot fail
    ///
    /// # Example
    ///
    /// ```
    /// use std::convert::Infallible;
    /// use unistore_core::reducer::Reducer;
    ///
    /// struct Names;
    ///
    /// impl Reducer for Names {
    ///     type State = Vec<String>;
    ///     type Action = String;
    ///     type Error = Infallible;
    ///
    ///     fn initial_state(&self) -> Vec<String> {
    ///         Vec::new()
    ///     }
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &Vec<String>,
    ///         action: &String,
    ///     ) -> Result<Vec<String>, Infallible> {
    ///         let mut next = state.clone();
    ///         next.push(action.clone());
    ///         Ok(next)
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer produces
        type State;

        /// The action type this reducer processes
        type Action;

        /// The error a failed reduction returns
        type Error;

        /// State held by a store before its first dispatch
        ///
        /// Equivalent to reducing an absent state with an empty action.
        fn initial_state(&self) -> Self::State;

        /// Reduce an action into the next state
        ///
        /// Must not have side effects. Returning `Err` means no transition
        /// happened; the caller keeps `state` as it was.
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action cannot be applied to `state`.
        fn reduce(
            &self,
            state: &Self::State,
            action: &Self::Action,
        ) -> Result<Self::State, Self::Error>;
    }
}

pub use function::{FnReducer, from_fn};
pub use reducer::Reducer;
