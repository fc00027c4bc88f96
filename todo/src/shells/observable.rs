//! The todo list held as an observable object with per-record observers.

use crate::api::TodoApi;
use crate::collection::TodoCollection;
use crate::error::Result;
use crate::types::{Todo, TodoAction, TodoId};
use std::collections::HashMap;

type ListObserver = Box<dyn FnMut(&[Todo])>;
type TodoObserver = Box<dyn FnMut(&Todo)>;

/// Handle returned when registering an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Todo list held as an observable object
///
/// Observers track what they read. A list observer depends on the list's
/// structure and reruns on add and delete. A record observer depends on one
/// record's fields and reruns only when that record is toggled; it is
/// dropped together with the record.
pub struct ObservableTodoApp {
    collection: TodoCollection,
    next_observer: u64,
    list_observers: Vec<(ObserverId, ListObserver)>,
    todo_observers: HashMap<TodoId, Vec<(ObserverId, TodoObserver)>>,
}

impl ObservableTodoApp {
    /// Creates the app with the default records
    #[must_use]
    pub fn new() -> Self {
        Self::with_collection(TodoCollection::seeded())
    }

    /// Creates the app around an existing collection
    #[must_use]
    pub fn with_collection(collection: TodoCollection) -> Self {
        Self {
            collection,
            next_observer: 0,
            list_observers: Vec::new(),
            todo_observers: HashMap::new(),
        }
    }

    /// Read access to the underlying collection
    #[must_use]
    pub const fn collection(&self) -> &TodoCollection {
        &self.collection
    }

    /// Observe structural changes (records added or removed)
    pub fn observe_list<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&[Todo]) + 'static,
    {
        let id = self.allocate_id();
        self.list_observers.push((id, Box::new(observer)));
        id
    }

    /// Observe one record's completion flag
    ///
    /// Returns `None` if no record has this id.
    pub fn observe_todo<F>(&mut self, todo: &TodoId, observer: F) -> Option<ObserverId>
    where
        F: FnMut(&Todo) + 'static,
    {
        if !self.collection.contains(todo) {
            return None;
        }

        let id = self.allocate_id();
        self.todo_observers
            .entry(todo.clone())
            .or_default()
            .push((id, Box::new(observer)));
        Some(id)
    }

    /// Remove an observer; returns false if it was already gone
    pub fn unobserve(&mut self, observer: ObserverId) -> bool {
        let before = self.observer_count();

        self.list_observers.retain(|(id, _)| *id != observer);
        self.todo_observers.retain(|_, observers| {
            observers.retain(|(id, _)| *id != observer);
            !observers.is_empty()
        });

        self.observer_count() < before
    }

    /// Number of registered observers of any kind
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.list_observers.len() + self.todo_observers.values().map(Vec::len).sum::<usize>()
    }

    fn allocate_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        id
    }

    fn react(&mut self, change: Option<TodoAction>) {
        match change {
            Some(TodoAction::TodoAdded { .. }) => self.notify_list(),
            Some(TodoAction::TodoDeleted { id }) => {
                self.todo_observers.remove(&id);
                self.notify_list();
            },
            Some(TodoAction::TodoToggled { id, .. }) => self.notify_todo(&id),
            Some(
                TodoAction::AddTodo { .. } | TodoAction::DeleteTodo { .. } | TodoAction::ToggleTodo { .. },
            )
            | None => {},
        }
    }

    fn notify_list(&mut self) {
        let todos = self.collection.list();
        for (_, observer) in &mut self.list_observers {
            observer(todos);
        }
        tracing::trace!(observers = self.list_observers.len(), "List observers notified");
    }

    fn notify_todo(&mut self, id: &TodoId) {
        let (Some(todo), Some(observers)) = (self.collection.get(id), self.todo_observers.get_mut(id)) else {
            return;
        };
        for (_, observer) in observers.iter_mut() {
            observer(todo);
        }
        tracing::trace!(%id, observers = observers.len(), "Record observers notified");
    }
}

impl Default for ObservableTodoApp {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObservableTodoApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableTodoApp")
            .field("collection", &self.collection)
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl TodoApi for ObservableTodoApp {
    fn add_todo(&mut self, name: &str) -> Result<()> {
        let change = self.collection.add(name);
        self.react(change);
        Ok(())
    }

    fn delete_todo(&mut self, id: &TodoId) -> Result<()> {
        let change = self.collection.delete(id);
        self.react(change);
        Ok(())
    }

    fn toggle_todo(&mut self, id: &TodoId) -> Result<()> {
        let change = self.collection.toggle(id);
        self.react(change);
        Ok(())
    }

    fn todos(&self) -> Vec<Todo> {
        self.collection.list().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use composable_todo_testing::Recorder;

    fn id_of(app: &ObservableTodoApp, name: &str) -> TodoId {
        app.collection().find_by_name(name).unwrap().id.clone()
    }

    #[test]
    fn toggle_notifies_only_that_record() {
        let mut app = ObservableTodoApp::new();
        let learning = id_of(&app, "Learning");
        let eating = id_of(&app, "Eating");
        let list = Recorder::new();
        let learning_log = Recorder::new();
        let eating_log = Recorder::new();
        app.observe_list(list.sink(|todos: &[Todo]| todos.len()));
        app.observe_todo(&learning, learning_log.sink(|todo: &Todo| todo.completed))
            .unwrap();
        app.observe_todo(&eating, eating_log.sink(|todo: &Todo| todo.completed))
            .unwrap();

        app.toggle_todo(&learning).unwrap();

        assert!(list.is_empty());
        assert!(eating_log.is_empty());
        assert_eq!(learning_log.entries(), vec![true]);
    }

    #[test]
    fn add_and_delete_notify_list() {
        let mut app = ObservableTodoApp::new();
        let list = Recorder::new();
        app.observe_list(list.sink(|todos: &[Todo]| todos.len()));

        app.add_todo("Reading").unwrap();
        app.add_todo("Reading").unwrap();
        let sleeping = id_of(&app, "Sleeping");
        app.delete_todo(&sleeping).unwrap();

        assert_eq!(list.entries(), vec![4, 3]);
    }

    #[test]
    fn deleting_a_record_drops_its_observers() {
        let mut app = ObservableTodoApp::new();
        let sleeping = id_of(&app, "Sleeping");
        app.observe_todo(&sleeping, |_| {}).unwrap();
        assert_eq!(app.observer_count(), 1);

        app.delete_todo(&sleeping).unwrap();

        assert_eq!(app.observer_count(), 0);
    }

    #[test]
    fn observing_unknown_record_is_refused() {
        let mut app = ObservableTodoApp::new();
        assert!(app.observe_todo(&TodoId::from("missing"), |_| {}).is_none());
        assert_eq!(app.observer_count(), 0);
    }

    #[test]
    fn unobserve_stops_notifications() {
        let mut app = ObservableTodoApp::new();
        let list = Recorder::new();
        let id = app.observe_list(list.sink(|todos: &[Todo]| todos.len()));

        assert!(app.unobserve(id));
        assert!(!app.unobserve(id));
        app.add_todo("Reading").unwrap();

        assert!(list.is_empty());
    }
}
