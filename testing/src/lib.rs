//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the composable todo architecture.
//!
//! This crate provides:
//! - Predictable implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//! - A [`Recorder`] for capturing listener calls
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{Recorder, SequentialIdGenerator};
//!
//! let renders = Recorder::new();
//! let _sub = store.subscribe(renders.sink(|state: &MyState| state.len()));
//!
//! store.send(MyAction::Add)?;
//! assert_eq!(renders.len(), 1);
//! ```

use composable_todo_core::environment::IdGenerator;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ergonomic reducer testing (Given-When-Then)
pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Predictable implementations of Environment traits
pub mod mocks {
    use super::{AtomicU64, IdGenerator, Ordering};

    /// Id generator that hands out `"{prefix}-1"`, `"{prefix}-2"`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::SequentialIdGenerator;
    /// use composable_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("todo");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `"{prefix}-1"`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }
}

/// Captures values passed to listeners and observers
///
/// Clones share the same log, so a clone can be moved into a listener while
/// the test keeps the original for assertions.
#[derive(Debug)]
pub struct Recorder<T> {
    entries: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Rc::clone(&self.entries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: 'static> Recorder<T> {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the log
    pub fn push(&self, value: T) {
        self.entries.borrow_mut().push(value);
    }

    /// Build a listener that records `map(value)` for every call
    pub fn sink<U, F>(&self, map: F) -> impl FnMut(&U) + use<T, U, F>
    where
        U: ?Sized + 'static,
        F: Fn(&U) -> T + 'static,
    {
        let entries = Rc::clone(&self.entries);
        move |value: &U| entries.borrow_mut().push(map(value))
    }

    /// Number of recorded calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<T: Clone + 'static> Recorder<T> {
    /// Copy of everything recorded so far, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<T> {
        self.entries.borrow().clone()
    }

    /// The most recent entry
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.entries.borrow().last().cloned()
    }
}

// Re-export commonly used items
pub use mocks::SequentialIdGenerator;
