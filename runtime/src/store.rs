//! Single-threaded Store runtime.
//!
//! The Store is the imperative shell around a pure reducer: it owns the
//! state, feeds actions through the reducer, and turns the resulting
//! [`Effect`]s into notifications for listeners and broadcast receivers.

use crate::error::StoreError;
use composable_todo_core::{effect::Effect, reducer::Reducer};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::broadcast;

type Listener<S> = Rc<RefCell<dyn FnMut(&S)>>;

/// Largest accepted action broadcast capacity
///
/// The channel preallocates one slot per unit of capacity.
pub const MAX_BROADCAST_CAPACITY: usize = 1 << 16;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity of the action broadcast channel
    ///
    /// Receivers that fall further behind than this observe a lag error
    /// and skip ahead. Always between 1 and [`MAX_BROADCAST_CAPACITY`].
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(broadcast_capacity: usize) -> Self {
        Self::default().with_broadcast_capacity(broadcast_capacity)
    }

    /// Set the action broadcast capacity, clamped to `1..=MAX_BROADCAST_CAPACITY`
    #[must_use]
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.clamp(1, MAX_BROADCAST_CAPACITY);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Registered state listeners, keyed by subscription id
struct Listeners<S: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Listener<S>)>,
}

impl<S: ?Sized> Listeners<S> {
    const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn insert(&mut self, listener: Listener<S>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }

    fn snapshot(&self) -> Vec<Listener<S>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

/// Resets the dispatch flag when a dispatch ends, even by unwinding
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle for a registered listener
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the
/// listener. A listener removed while a notification round is in progress
/// may still receive that round.
#[must_use = "dropping a Subscription immediately unsubscribes its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind a `RefCell`; the store is single-threaded)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (listener notification and action broadcast)
///
/// Cloning a Store is cheap and yields a handle to the same state.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Rc<RefCell<S>>,
    reducer: Rc<R>,
    environment: Rc<E>,
    listeners: Rc<RefCell<Listeners<S>>>,
    revision: Rc<Cell<u64>>,
    dispatching: Rc<Cell<bool>>,
    /// Every action emitted by an effect is published here.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: 'static,
    A: Clone + std::fmt::Debug,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with custom configuration
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        let capacity = config.broadcast_capacity.clamp(1, MAX_BROADCAST_CAPACITY);
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Rc::new(RefCell::new(initial_state)),
            reducer: Rc::new(reducer),
            environment: Rc::new(environment),
            listeners: Rc::new(RefCell::new(Listeners::new())),
            revision: Rc::new(Cell::new(0)),
            dispatching: Rc::new(Cell::new(false)),
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// Runs the reducer to completion, then executes its effects. If any
    /// action was emitted, the revision is bumped, each emitted action is
    /// broadcast, and every state listener is called once.
    ///
    /// # Returns
    ///
    /// The actions emitted by the reducer, in order. Empty when the action
    /// was a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReentrantDispatch`] if called while this store
    /// is already dispatching or while its state is borrowed by
    /// [`Store::state`].
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&self, action: A) -> Result<SmallVec<[A; 4]>, StoreError> {
        if self.dispatching.replace(true) {
            tracing::warn!(?action, "Rejected action: store is already dispatching");
            metrics::counter!("store.actions.rejected").increment(1);
            return Err(StoreError::ReentrantDispatch);
        }
        let _guard = DispatchGuard(&*self.dispatching);

        let effects = {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                tracing::warn!(?action, "Rejected action: state is borrowed");
                metrics::counter!("store.actions.rejected").increment(1);
                return Err(StoreError::ReentrantDispatch);
            };
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);
            self.reducer.reduce(&mut *state, action, &*self.environment)
        };

        let mut emitted: SmallVec<[A; 4]> = SmallVec::new();
        for effect in effects {
            emitted.extend(Self::execute_effect(effect));
        }

        if emitted.is_empty() {
            tracing::trace!("Action ignored, state unchanged");
            metrics::counter!("store.actions.ignored").increment(1);
            return Ok(emitted);
        }

        self.revision.set(self.revision.get() + 1);
        metrics::counter!("store.actions.emitted").increment(emitted.len() as u64);
        for action in &emitted {
            // No receivers is fine: nobody is watching the stream.
            let _ = self.action_broadcast.send(action.clone());
        }

        self.notify();
        tracing::debug!(
            revision = self.revision.get(),
            emitted = emitted.len(),
            "Action processing completed"
        );

        Ok(emitted)
    }

    fn execute_effect(effect: Effect<A>) -> Vec<A> {
        effect.into_emitted()
    }

    fn notify(&self) {
        let listeners = self.listeners.borrow().snapshot();
        let state = self.state.borrow();

        for listener in &listeners {
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(&*state);
            }
        }

        metrics::counter!("store.listeners.notified").increment(listeners.len() as u64);
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let count = store.state(|s| s.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.state.borrow())
    }

    /// Number of dispatches that changed state so far
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Register a listener called after every state-changing dispatch
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&S) + 'static,
    {
        let listener: Listener<S> = Rc::new(RefCell::new(listener));
        let id = self.listeners.borrow_mut().insert(listener);
        let listeners = Rc::downgrade(&self.listeners);

        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().remove(id);
            }
        })
    }

    /// Register a listener for a derived slice of state
    ///
    /// `selector` runs after every state-changing dispatch; `listener` runs
    /// only when the selected value differs from the previous one.
    pub fn subscribe_with_selector<T, Sel, F>(&self, selector: Sel, mut listener: F) -> Subscription
    where
        Sel: Fn(&S) -> T + 'static,
        T: PartialEq + 'static,
        F: FnMut(&T) + 'static,
    {
        let mut current = self.state(&selector);

        self.subscribe(move |state| {
            let next = selector(state);
            if next != current {
                current = next;
                listener(&current);
            }
        })
    }

    /// Subscribe to every action emitted by the reducer
    ///
    /// Only emitted actions are published, never the command that was sent.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Number of registered state listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            reducer: Rc::clone(&self.reducer),
            environment: Rc::clone(&self.environment),
            listeners: Rc::clone(&self.listeners),
            revision: Rc::clone(&self.revision),
            dispatching: Rc::clone(&self.dispatching),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use composable_todo_core::{smallvec, SmallVec};
    use composable_todo_testing::Recorder;

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
        label: &'static str,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Rename(&'static str),
        NoOp,
        Incremented(i32),
        Renamed(&'static str),
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::Emit(TestAction::Incremented(state.value))]
                },
                TestAction::Rename(label) if label != state.label => {
                    state.label = label;
                    smallvec![Effect::Emit(TestAction::Renamed(label))]
                },
                _ => smallvec![Effect::None],
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[test]
    fn test_send_returns_emitted_actions() {
        let store = test_store();

        let emitted = store.send(TestAction::Increment).unwrap();

        assert_eq!(emitted.as_slice(), &[TestAction::Incremented(1)]);
        assert_eq!(store.state(|s| s.value), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_noop_does_not_bump_revision_or_notify() {
        let store = test_store();
        let calls = Recorder::new();
        let _sub = store.subscribe(calls.sink(|s: &TestState| s.value));

        let emitted = store.send(TestAction::NoOp).unwrap();

        assert!(emitted.is_empty());
        assert_eq!(store.revision(), 0);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_listener_sees_post_dispatch_state() {
        let store = test_store();
        let values = Recorder::new();
        let _sub = store.subscribe(values.sink(|s: &TestState| s.value));

        store.send(TestAction::Increment).unwrap();
        store.send(TestAction::Increment).unwrap();

        assert_eq!(values.entries(), vec![1, 2]);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let store = test_store();
        let calls = Recorder::new();
        let sub = store.subscribe(calls.sink(|s: &TestState| s.value));
        assert_eq!(store.listener_count(), 1);

        drop(sub);
        store.send(TestAction::Increment).unwrap();

        assert_eq!(store.listener_count(), 0);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let store = test_store();
        let sub = store.subscribe(|_| {});
        sub.unsubscribe();
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_selector_fires_only_when_slice_changes() {
        let store = test_store();
        let labels = Recorder::new();
        let _sub = store.subscribe_with_selector(|s: &TestState| s.label, labels.sink(|l: &&'static str| *l));

        store.send(TestAction::Increment).unwrap();
        store.send(TestAction::Rename("a")).unwrap();
        store.send(TestAction::Increment).unwrap();

        assert_eq!(labels.entries(), vec!["a"]);
    }

    #[test]
    fn test_reentrant_send_from_listener_is_rejected() {
        let store = test_store();
        let inner = store.clone();
        let results = Recorder::new();
        let sink = results.clone();
        let _sub = store.subscribe(move |_| {
            sink.push(inner.send(TestAction::Increment));
        });

        store.send(TestAction::Increment).unwrap();

        assert_eq!(results.entries(), vec![Err(StoreError::ReentrantDispatch)]);
        assert_eq!(store.state(|s| s.value), 1);
        // The guard is released once the outer dispatch returns.
        assert!(store.send(TestAction::Increment).is_ok());
    }

    #[test]
    fn test_send_inside_state_closure_is_rejected() {
        let store = test_store();
        let result = store.state(|_| store.send(TestAction::Increment));
        assert_eq!(result, Err(StoreError::ReentrantDispatch));
        assert_eq!(store.state(|s| s.value), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let store = test_store();
        let other = store.clone();

        other.send(TestAction::Increment).unwrap();

        assert_eq!(store.state(|s| s.value), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_broadcast_publishes_emitted_actions_only() {
        let store = test_store();
        let mut rx = store.subscribe_actions();

        store.send(TestAction::NoOp).unwrap();
        store.send(TestAction::Increment).unwrap();

        assert_eq!(rx.try_recv().unwrap(), TestAction::Incremented(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_rejected_sends_are_counted_separately() {
        let recorder = counting::CountingRecorder::default();

        metrics::with_local_recorder(&recorder, || {
            let store = test_store();
            store.send(TestAction::Increment).unwrap();
            store.send(TestAction::NoOp).unwrap();
            let rejected = store.state(|_| store.send(TestAction::Increment));
            assert_eq!(rejected, Err(StoreError::ReentrantDispatch));
        });

        assert_eq!(recorder.get("store.actions.total"), 2);
        assert_eq!(recorder.get("store.actions.ignored"), 1);
        assert_eq!(recorder.get("store.actions.emitted"), 1);
        assert_eq!(recorder.get("store.actions.rejected"), 1);
    }

    #[test]
    fn test_config_clamps_capacity() {
        assert_eq!(StoreConfig::new(0).broadcast_capacity, 1);
        assert_eq!(StoreConfig::default().broadcast_capacity, 16);
        assert_eq!(StoreConfig::new(usize::MAX).broadcast_capacity, MAX_BROADCAST_CAPACITY);
    }

    #[test]
    fn test_oversized_capacity_in_literal_config_is_clamped() {
        let config = StoreConfig {
            broadcast_capacity: usize::MAX,
        };
        let store = Store::with_config(TestState::default(), TestReducer, (), config);
        let mut rx = store.subscribe_actions();

        store.send(TestAction::Increment).unwrap();

        assert_eq!(rx.try_recv().unwrap(), TestAction::Incremented(1));
    }

    /// Minimal in-process recorder for counter assertions
    mod counting {
        use metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        type Counts = Arc<Mutex<HashMap<String, u64>>>;

        #[derive(Default)]
        pub struct CountingRecorder {
            counts: Counts,
        }

        impl CountingRecorder {
            pub fn get(&self, name: &str) -> u64 {
                self.counts.lock().unwrap().get(name).copied().unwrap_or(0)
            }
        }

        struct NamedCounter {
            name: String,
            counts: Counts,
        }

        impl CounterFn for NamedCounter {
            fn increment(&self, value: u64) {
                *self.counts.lock().unwrap().entry(self.name.clone()).or_default() += value;
            }

            fn absolute(&self, value: u64) {
                self.counts.lock().unwrap().insert(self.name.clone(), value);
            }
        }

        impl Recorder for CountingRecorder {
            fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
            fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
            fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

            fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
                Counter::from_arc(Arc::new(NamedCounter {
                    name: key.name().to_string(),
                    counts: Arc::clone(&self.counts),
                }))
            }

            fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
                Gauge::noop()
            }

            fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
                Histogram::noop()
            }
        }
    }
}
