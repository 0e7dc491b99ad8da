//! Recording listeners for store tests
//!
//! A [`CallLog`] hands out listener closures that append a label to a shared
//! log when called, so tests can assert on how often and in which order
//! listeners ran.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, ordered log of listener calls
///
/// Cloning a `CallLog` clones a handle to the same log.
///
/// # Example
///
/// ```
/// use unistore_testing::CallLog;
///
/// let log = CallLog::new();
/// let a = log.recorder("a");
/// let b = log.recorder("b");
///
/// a();
/// b();
/// a();
///
/// assert_eq!(log.entries(), vec!["a", "b", "a"]);
/// assert_eq!(log.count("a"), 2);
/// ```
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records `label` each time it is called
    #[must_use]
    pub fn recorder(&self, label: &str) -> impl Fn() + use<> {
        let entries = Rc::clone(&self.entries);
        let label = label.to_owned();
        move || entries.borrow_mut().push(label.clone())
    }

    /// Append an entry directly, e.g. from inside a hand-written listener
    pub fn record(&self, label: impl Into<String>) {
        self.entries.borrow_mut().push(label.into());
    }

    /// All recorded labels, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// How many times `label` was recorded
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.entries.borrow().iter().filter(|entry| *entry == label).count()
    }

    /// Total number of recorded calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl fmt::Debug for CallLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}
