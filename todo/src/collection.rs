//! The todo collection and its mutation contract.
//!
//! Every mutator is a guarded no-op when its precondition fails: adding a
//! name that is already present, or deleting/toggling an unknown id, leaves
//! the collection untouched and returns `None`. A successful mutation
//! returns the event describing it, which shells use to decide whom to
//! notify.

use crate::seed::DEFAULT_TODOS;
use crate::types::{Todo, TodoAction, TodoId};
use composable_todo_core::environment::{IdGenerator, RandomIdGenerator};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// How many fresh ids `add` draws before giving up on a colliding generator.
const MAX_ID_ATTEMPTS: usize = 8;

/// Ordered registry of todo records
///
/// Insertion order is display order. Lookups by id and by name are linear
/// scans; the list is expected to stay small.
#[derive(Clone)]
pub struct TodoCollection {
    todos: Vec<Todo>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoCollection {
    /// Creates an empty collection with random ids
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(RandomIdGenerator))
    }

    /// Creates an empty collection drawing ids from `ids`
    #[must_use]
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            todos: Vec::new(),
            ids,
        }
    }

    /// Creates a collection holding the default records, with random ids
    #[must_use]
    pub fn seeded() -> Self {
        Self::seeded_with(Arc::new(RandomIdGenerator))
    }

    /// Creates a collection holding the default records, drawing ids from `ids`
    #[must_use]
    pub fn seeded_with(ids: Arc<dyn IdGenerator>) -> Self {
        let mut collection = Self::with_id_generator(ids);
        for (name, completed) in DEFAULT_TODOS {
            if let Some(TodoAction::TodoAdded { todo }) = collection.add(name) {
                if completed {
                    collection.toggle(&todo.id);
                }
            }
        }
        collection
    }

    /// Adds a todo named `name` at the end of the list
    ///
    /// No-op if a record with exactly this name exists. Names are compared
    /// as raw strings, so `"read"` and `"Read"` are different todos.
    pub fn add(&mut self, name: impl Into<String>) -> Option<TodoAction> {
        let name = name.into();
        if self.contains_name(&name) {
            tracing::trace!(%name, "Ignoring add: name already present");
            return None;
        }

        let Some(id) = self.fresh_id() else {
            tracing::warn!(%name, "Ignoring add: id generator kept returning ids in use");
            return None;
        };

        let todo = Todo::new(id, name);
        tracing::debug!(id = %todo.id, name = %todo.name, "Todo added");
        self.todos.push(todo.clone());
        Some(TodoAction::TodoAdded { todo })
    }

    /// Removes the todo with this id, keeping the order of the rest
    ///
    /// No-op if no record has this id.
    pub fn delete(&mut self, id: &TodoId) -> Option<TodoAction> {
        let Some(index) = self.position(id) else {
            tracing::trace!(%id, "Ignoring delete: unknown id");
            return None;
        };

        let removed = self.todos.remove(index);
        tracing::debug!(id = %removed.id, name = %removed.name, "Todo deleted");
        Some(TodoAction::TodoDeleted { id: removed.id })
    }

    /// Flips the completion flag of the todo with this id
    ///
    /// No-op if no record has this id.
    pub fn toggle(&mut self, id: &TodoId) -> Option<TodoAction> {
        let Some(todo) = self.todos.iter_mut().find(|todo| &todo.id == id) else {
            tracing::trace!(%id, "Ignoring toggle: unknown id");
            return None;
        };

        todo.completed = !todo.completed;
        tracing::debug!(id = %todo.id, completed = todo.completed, "Todo toggled");
        Some(TodoAction::TodoToggled {
            id: todo.id.clone(),
            completed: todo.completed,
        })
    }

    /// Replays an event produced by another collection
    ///
    /// Returns true if the collection changed. Commands are ignored, as are
    /// events that would break an invariant (an added record whose id or
    /// name is already present) or that are already reflected in state.
    pub fn apply(&mut self, event: &TodoAction) -> bool {
        match event {
            TodoAction::TodoAdded { todo } => {
                if self.contains(&todo.id) || self.contains_name(&todo.name) {
                    tracing::trace!(id = %todo.id, "Ignoring replayed add: id or name present");
                    return false;
                }
                self.todos.push(todo.clone());
                true
            },
            TodoAction::TodoDeleted { id } => self.delete(id).is_some(),
            TodoAction::TodoToggled { id, completed } => {
                match self.todos.iter_mut().find(|todo| &todo.id == id) {
                    Some(todo) if todo.completed != *completed => {
                        todo.completed = *completed;
                        true
                    },
                    _ => false,
                }
            },
            TodoAction::AddTodo { .. } | TodoAction::DeleteTodo { .. } | TodoAction::ToggleTodo { .. } => {
                false
            },
        }
    }

    /// The records in display order
    #[must_use]
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    /// Iterates the records in display order
    pub fn iter(&self) -> std::slice::Iter<'_, Todo> {
        self.todos.iter()
    }

    /// The ids in display order
    #[must_use]
    pub fn ids(&self) -> Vec<TodoId> {
        self.todos.iter().map(|todo| todo.id.clone()).collect()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// True if there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of completed records
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|todo| todo.completed).count()
    }

    /// Looks a record up by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Looks a record up by exact name
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.name == name)
    }

    /// Index of the record in display order
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| &todo.id == id)
    }

    /// True if a record has this id
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// True if a record has exactly this name
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    fn fresh_id(&self) -> Option<TodoId> {
        (0..MAX_ID_ATTEMPTS)
            .map(|_| TodoId::generate(self.ids.as_ref()))
            .find(|id| !self.contains(id))
    }
}

impl Default for TodoCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TodoCollection {
    fn eq(&self, other: &Self) -> bool {
        self.todos == other.todos
    }
}

impl Eq for TodoCollection {}

impl std::fmt::Debug for TodoCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoCollection")
            .field("todos", &self.todos)
            .finish_non_exhaustive()
    }
}

impl Serialize for TodoCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.todos)
    }
}

impl<'a> IntoIterator for &'a TodoCollection {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
