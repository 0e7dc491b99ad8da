//! Reducers built from plain closures
//!
//! Most reducers are a single `match` over the action enum and carry no
//! configuration of their own. [`from_fn`] turns such a closure into a
//! [`Reducer`] whose initial state is `S::default()`.
//!
//! # Examples
//!
//! ```
//! use std::convert::Infallible;
//! use unistore_core::{Reducer, from_fn};
//!
//! let counter = from_fn(|count: &i32, delta: &i32| Ok::<_, Infallible>(count + delta));
//!
//! let state = counter.initial_state();
//! let state = counter.reduce(&state, &5).unwrap();
//! assert_eq!(state, 5);
//! ```

use crate::reducer::Reducer;
use std::fmt;
use std::marker::PhantomData;

/// Wraps a closure as a reducer.
///
/// The initial state is `S::default()`, so the closure only has to describe
/// transitions.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type
/// - `E`: The error type
/// - `F`: The closure
///
/// # Examples
///
/// ```
/// use unistore_core::{Reducer, from_fn};
///
/// #[derive(Debug, PartialEq)]
/// struct Overflow;
///
/// let bounded = from_fn(|count: &u8, delta: &u8| count.checked_add(*delta).ok_or(Overflow));
///
/// assert_eq!(bounded.reduce(&250, &5), Ok(255));
/// assert_eq!(bounded.reduce(&250, &6), Err(Overflow));
/// ```
pub fn from_fn<S, A, E, F>(f: F) -> FnReducer<S, A, E, F>
where
    S: Default,
    F: Fn(&S, &A) -> Result<S, E>,
{
    FnReducer {
        f,
        _phantom: PhantomData,
    }
}

/// A reducer backed by a closure.
///
/// Created by [`from_fn`].
pub struct FnReducer<S, A, E, F> {
    f: F,
    _phantom: PhantomData<fn(&S, &A) -> Result<S, E>>,
}

impl<S, A, E, F> Reducer for FnReducer<S, A, E, F>
where
    S: Default,
    F: Fn(&S, &A) -> Result<S, E>,
{
    type State = S;
    type Action = A;
    type Error = E;

    fn initial_state(&self) -> Self::State {
        S::default()
    }

    fn reduce(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, Self::Error> {
        (self.f)(state, action)
    }
}

impl<S, A, E, F: Clone> Clone for FnReducer<S, A, E, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _phantom: PhantomData,
        }
    }
}

// Closures don't implement Debug
impl<S, A, E, F> fmt::Debug for FnReducer<S, A, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnReducer").finish_non_exhaustive()
    }
}
