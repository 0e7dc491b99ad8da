//! Subscription, ordering and reentrancy behaviour of the Store
//!
//! These tests drive a small counter reducer through the public API only.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect
#![allow(clippy::panic)] // Tests exercise panicking listeners and reducers

use proptest::prelude::*;
use std::cell::RefCell;
use std::convert::Infallible;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use unistore_core::{FnReducer, from_fn};
use unistore_runtime::{Store, StoreConfig, StoreError, Subscription};
use unistore_testing::{CallLog, ListenerOp, init_test_tracing, listener_ops};

type Counter = FnReducer<i64, i64, Infallible, fn(&i64, &i64) -> Result<i64, Infallible>>;

fn add(count: &i64, delta: &i64) -> Result<i64, Infallible> {
    Ok(count + delta)
}

fn counter_store() -> Store<Counter> {
    Store::new(from_fn(add as fn(&i64, &i64) -> Result<i64, Infallible>))
}

fn counter_store_with(config: StoreConfig) -> Store<Counter> {
    Store::with_config(from_fn(add as fn(&i64, &i64) -> Result<i64, Infallible>), config)
}

#[test]
fn test_listener_called_once_per_dispatch() {
    init_test_tracing();
    let store = counter_store();
    let log = CallLog::new();
    let _subscription = store.subscribe(log.recorder("fn"));

    store.dispatch(1).unwrap();

    assert_eq!(log.count("fn"), 1);
}

#[test]
fn test_unsubscribed_listener_not_called() {
    let store = counter_store();
    let log = CallLog::new();
    let subscription = store.subscribe(log.recorder("fn"));

    store.dispatch(1).unwrap();
    assert!(subscription.unsubscribe());
    store.dispatch(1).unwrap();

    assert_eq!(log.count("fn"), 1);
    assert_eq!(store.snapshot(), 2);
}

#[test]
fn test_listeners_fire_in_subscription_order() {
    let store = counter_store();
    let log = CallLog::new();

    let started = log.clone();
    let _a = store.subscribe(move || {
        started.record("a:start");
        started.record("a:end");
    });
    let finished = log.clone();
    let _b = store.subscribe(move || {
        finished.record("b:start");
        finished.record("b:end");
    });

    store.dispatch(1).unwrap();

    assert_eq!(log.entries(), vec!["a:start", "a:end", "b:start", "b:end"]);
}

#[test]
fn test_unsubscribe_twice_is_noop() {
    let store = counter_store();
    let log = CallLog::new();
    let a = store.subscribe(log.recorder("a"));
    let _b = store.subscribe(log.recorder("b"));

    assert!(a.unsubscribe());
    assert!(!a.unsubscribe());
    assert_eq!(store.listener_count(), 1);

    store.dispatch(1).unwrap();
    assert_eq!(log.entries(), vec!["b"]);
}

#[test]
fn test_same_closure_subscribed_twice_is_two_entries() {
    let store = counter_store();
    let log = CallLog::new();
    let listener = Rc::new(log.recorder("dup"));

    let first_listener = Rc::clone(&listener);
    let first = store.subscribe(move || first_listener());
    let second = store.subscribe(move || listener());
    assert_ne!(first.id(), second.id());

    store.dispatch(1).unwrap();
    assert_eq!(log.count("dup"), 2);

    first.unsubscribe();
    store.dispatch(1).unwrap();
    assert_eq!(log.count("dup"), 3);
}

#[test]
fn test_dropping_subscription_keeps_listener() {
    let store = counter_store();
    let log = CallLog::new();
    drop(store.subscribe(log.recorder("kept")));

    store.dispatch(1).unwrap();

    assert_eq!(log.count("kept"), 1);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn test_unsubscribe_after_store_dropped() {
    let store = counter_store();
    let subscription = store.subscribe(|| {});
    assert!(subscription.is_active());

    drop(store);

    assert!(!subscription.is_active());
    assert!(!subscription.unsubscribe());
}

#[test]
fn test_subscribe_during_notification_waits_for_next_dispatch() {
    let store = counter_store();
    let log = CallLog::new();
    let late: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let registrar = store.clone();
    let slot = Rc::clone(&late);
    let recorder_log = log.clone();
    let _early = store.subscribe(move || {
        recorder_log.record("early");
        if slot.borrow().is_none() {
            *slot.borrow_mut() = Some(registrar.subscribe(recorder_log.recorder("late")));
        }
    });

    store.dispatch(1).unwrap();
    assert_eq!(log.entries(), vec!["early"]);

    store.dispatch(1).unwrap();
    assert_eq!(log.entries(), vec!["early", "early", "late"]);
}

#[test]
fn test_unsubscribe_during_notification_applies_next_dispatch() {
    let store = counter_store();
    let log = CallLog::new();
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&victim);
    let remover_log = log.clone();
    let _remover = store.subscribe(move || {
        remover_log.record("remover");
        if let Some(subscription) = slot.borrow().as_ref() {
            subscription.unsubscribe();
        }
    });
    *victim.borrow_mut() = Some(store.subscribe(log.recorder("victim")));

    // Still in the snapshot taken before the remover ran
    store.dispatch(1).unwrap();
    assert_eq!(log.entries(), vec!["remover", "victim"]);

    store.dispatch(1).unwrap();
    assert_eq!(log.entries(), vec!["remover", "victim", "remover"]);
}

#[test]
fn test_listener_can_unsubscribe_itself() {
    let store = counter_store();
    let log = CallLog::new();
    let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&own);
    let once_log = log.clone();
    *own.borrow_mut() = Some(store.subscribe(move || {
        once_log.record("once");
        if let Some(subscription) = slot.borrow().as_ref() {
            subscription.unsubscribe();
        }
    }));

    store.dispatch(1).unwrap();
    store.dispatch(1).unwrap();

    assert_eq!(log.count("once"), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn test_reentrant_dispatch_runs_nested() {
    let store = counter_store();
    let log = CallLog::new();

    let inner_store = store.clone();
    let first_log = log.clone();
    let _first = store.subscribe(move || {
        let value = inner_store.snapshot();
        first_log.record(format!("first saw {value}"));
        if value == 1 {
            inner_store.dispatch(10).unwrap();
        }
    });
    let second_store = store.clone();
    let second_log = log.clone();
    let _second = store.subscribe(move || {
        second_log.record(format!("second saw {}", second_store.snapshot()));
    });

    store.dispatch(1).unwrap();

    assert_eq!(
        log.entries(),
        vec![
            "first saw 1",
            // nested dispatch notifies everyone before the outer pass resumes
            "first saw 11",
            "second saw 11",
            "second saw 11",
        ]
    );
    assert_eq!(store.snapshot(), 11);
}

#[test]
fn test_reentrant_dispatch_rejected_when_disabled() {
    let store = counter_store_with(StoreConfig::default().with_max_reentrant_depth(0));
    let results = Rc::new(RefCell::new(Vec::new()));

    let inner_store = store.clone();
    let sink = Rc::clone(&results);
    let _subscription = store.subscribe(move || {
        sink.borrow_mut().push(inner_store.dispatch(100));
    });

    store.dispatch(1).unwrap();

    assert_eq!(store.snapshot(), 1);
    let results = results.borrow();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(StoreError::ReentrantDispatch { depth: 1, limit: 0 })
    ));
}

#[test]
fn test_unbounded_reentrancy_stops_at_limit() {
    let store = counter_store_with(StoreConfig::default().with_max_reentrant_depth(3));
    let rejected = Rc::new(RefCell::new(0));

    let inner_store = store.clone();
    let counter = Rc::clone(&rejected);
    let _subscription = store.subscribe(move || {
        if inner_store.dispatch(1).is_err() {
            *counter.borrow_mut() += 1;
        }
    });

    store.dispatch(1).unwrap();

    // Outer dispatch plus three nested ones committed; the fourth was refused
    assert_eq!(store.snapshot(), 4);
    assert_eq!(*rejected.borrow(), 1);

    // The depth counter unwound, so a fresh dispatch works again
    store.dispatch(1).unwrap();
    assert_eq!(store.snapshot(), 8);
}

#[test]
fn test_failed_reducer_notifies_nobody() {
    #[derive(Debug, PartialEq)]
    struct Negative;

    let store = Store::new(from_fn(|balance: &u32, delta: &i64| {
        let next = i64::from(*balance) + delta;
        u32::try_from(next).map_err(|_| Negative)
    }));
    let log = CallLog::new();
    let _subscription = store.subscribe(log.recorder("listener"));

    store.dispatch(5).unwrap();
    let error = store.dispatch(-10).unwrap_err();

    assert_eq!(error.into_reducer_error(), Some(Negative));
    assert_eq!(store.snapshot(), 5);
    assert_eq!(log.count("listener"), 1);
}

#[test]
fn test_panicking_listener_unwinds_after_commit() {
    let store = counter_store_with(StoreConfig::default().with_max_reentrant_depth(0));
    let subscription = store.subscribe(|| panic!("listener failed"));

    let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(1)));

    assert!(result.is_err());
    assert_eq!(store.snapshot(), 1);

    // With reentrancy disabled, a leftover depth count would reject this.
    subscription.unsubscribe();
    store.dispatch(1).unwrap();
    assert_eq!(store.snapshot(), 2);
}

#[test]
fn test_panicking_reducer_commits_nothing() {
    let store = Store::with_config(
        from_fn(|count: &i64, delta: &i64| {
            assert!(*delta >= 0, "negative delta");
            Ok::<_, Infallible>(count + delta)
        }),
        StoreConfig::default().with_max_reentrant_depth(0),
    );
    store.dispatch(5).unwrap();
    let log = CallLog::new();
    let _subscription = store.subscribe(log.recorder("fn"));

    let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(-1)));

    assert!(result.is_err());
    assert_eq!(store.snapshot(), 5);
    assert!(log.is_empty());

    store.dispatch(2).unwrap();
    assert_eq!(store.snapshot(), 7);
    assert_eq!(log.count("fn"), 1);
}

#[test]
#[should_panic]
fn test_dispatch_inside_state_closure_panics() {
    let store = counter_store();
    let _ = store.state(|_| store.dispatch(1));
}

proptest! {
    #[test]
    fn prop_listener_count_tracks_effective_subscriptions(ops in listener_ops(40)) {
        let store = counter_store();
        let log = CallLog::new();
        let mut handles = Vec::new();
        let mut active = 0usize;

        for op in ops {
            match op {
                ListenerOp::Subscribe => {
                    handles.push(store.subscribe(log.recorder("l")));
                    active += 1;
                },
                ListenerOp::Unsubscribe(index) if !handles.is_empty() => {
                    let handle: &Subscription = &handles[index % handles.len()];
                    if handle.unsubscribe() {
                        active -= 1;
                    }
                },
                ListenerOp::Unsubscribe(_) => {},
                ListenerOp::Dispatch => {
                    log.clear();
                    store.dispatch(1).unwrap();
                    prop_assert_eq!(log.len(), active);
                },
            }
            prop_assert_eq!(store.listener_count(), active);
        }
    }
}
