//! The todo list held in an external store, watched through selectors.

use crate::api::TodoApi;
use crate::collection::TodoCollection;
use crate::error::Result;
use crate::reducer::TodoReducer;
use crate::types::{Todo, TodoAction, TodoId};
use composable_todo_runtime::{Store, StoreConfig, Subscription};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Store type backing [`ReactiveTodoApp`]
pub type TodoStore = Store<TodoCollection, TodoAction, (), TodoReducer>;

/// Todo list held in an external reactive store
///
/// Views subscribe to the slice they render. The list view selects the
/// ordered ids and each row selects its own record, so toggling one record
/// wakes only that row.
#[derive(Clone)]
pub struct ReactiveTodoApp {
    store: TodoStore,
}

impl ReactiveTodoApp {
    /// Creates the app with the default records
    #[must_use]
    pub fn new() -> Self {
        Self::with_collection(TodoCollection::seeded())
    }

    /// Creates the app around an existing collection
    #[must_use]
    pub fn with_collection(collection: TodoCollection) -> Self {
        Self::with_config(collection, StoreConfig::default())
    }

    /// Creates the app with a custom store configuration
    #[must_use]
    pub fn with_config(collection: TodoCollection, config: StoreConfig) -> Self {
        Self {
            store: Store::with_config(collection, TodoReducer::new(), (), config),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Sends a raw action, returning the events it produced
    ///
    /// # Errors
    ///
    /// Fails if called from inside one of this store's listeners.
    pub fn dispatch(&self, action: TodoAction) -> Result<Vec<TodoAction>> {
        Ok(self.store.send(action)?.into_vec())
    }

    /// Calls `listener` whenever the ordered id list changes
    pub fn watch_ids<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Vec<TodoId>) + 'static,
    {
        self.store.subscribe_with_selector(TodoCollection::ids, listener)
    }

    /// Calls `listener` whenever the record with this id changes
    ///
    /// Deleting the record reports `None` once.
    pub fn watch_todo<F>(&self, id: TodoId, listener: F) -> Subscription
    where
        F: FnMut(&Option<Todo>) + 'static,
    {
        self.store
            .subscribe_with_selector(move |todos: &TodoCollection| todos.get(&id).cloned(), listener)
    }

    /// Stream of every event the store emits
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }

    /// The ordered ids
    #[must_use]
    pub fn ids(&self) -> Vec<TodoId> {
        self.store.state(TodoCollection::ids)
    }

    /// The record with this id
    #[must_use]
    pub fn todo(&self, id: &TodoId) -> Option<Todo> {
        self.store.state(|todos| todos.get(id).cloned())
    }
}

/// Drains every event already queued on `actions` and returns how many were
/// published
///
/// Events a lagging receiver lost still count toward the total.
pub fn drain_event_count(actions: &mut broadcast::Receiver<TodoAction>) -> u64 {
    let mut count = 0;
    loop {
        match actions.try_recv() {
            Ok(_) => count += 1,
            Err(TryRecvError::Lagged(missed)) => {
                tracing::debug!(missed, "Action receiver lagged");
                count += missed;
            },
            Err(TryRecvError::Empty | TryRecvError::Closed) => return count,
        }
    }
}

impl Default for ReactiveTodoApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoApi for ReactiveTodoApp {
    fn add_todo(&mut self, name: &str) -> Result<()> {
        self.dispatch(TodoAction::AddTodo {
            name: name.to_string(),
        })?;
        Ok(())
    }

    fn delete_todo(&mut self, id: &TodoId) -> Result<()> {
        self.dispatch(TodoAction::DeleteTodo { id: id.clone() })?;
        Ok(())
    }

    fn toggle_todo(&mut self, id: &TodoId) -> Result<()> {
        self.dispatch(TodoAction::ToggleTodo { id: id.clone() })?;
        Ok(())
    }

    fn todos(&self) -> Vec<Todo> {
        self.store.state(|todos| todos.list().to_vec())
    }
}
