//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of records that can be added,
//! deleted, and have their completion flag toggled. Nothing else about a
//! record ever changes.

use composable_todo_core::environment::IdGenerator;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a todo record
///
/// Assigned once when the record is created and never reused within the
/// collection that created it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Draws a fresh identifier from a generator
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.next_id())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single todo record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing; unique among records at the time it was added
    pub name: String,
    /// Whether the todo is done
    pub completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed, todo
    #[must_use]
    pub fn new(id: TodoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }

    /// Returns the record with its completion flag set
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns a copy differing only in the completion flag
    #[must_use]
    pub fn toggled(&self) -> Self {
        self.clone().with_completed(!self.completed)
    }
}

/// Actions representing commands and events for todos
///
/// Commands express intent and may be ignored. Events describe a change that
/// has happened and carry enough to replay it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Add a todo unless one with this name exists
    AddTodo {
        /// Name of the new todo
        name: String,
    },

    /// Command: Delete a todo if it exists
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Command: Flip a todo's completion flag if it exists
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    // ========== Events ==========
    /// Event: Todo was appended to the list
    TodoAdded {
        /// The new record
        todo: Todo,
    },

    /// Event: Todo was removed from the list
    TodoDeleted {
        /// Removed todo
        id: TodoId,
    },

    /// Event: Todo completion flag changed
    TodoToggled {
        /// Toggled todo
        id: TodoId,
        /// Flag value after the change
        completed: bool,
    },
}

impl TodoAction {
    /// Returns true for command variants
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::AddTodo { .. } | Self::DeleteTodo { .. } | Self::ToggleTodo { .. }
        )
    }

    /// Returns true for event variants
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// The todo an action refers to, if it names one
    #[must_use]
    pub const fn todo_id(&self) -> Option<&TodoId> {
        match self {
            Self::AddTodo { .. } => None,
            Self::TodoAdded { todo } => Some(&todo.id),
            Self::DeleteTodo { id }
            | Self::ToggleTodo { id }
            | Self::TodoDeleted { id }
            | Self::TodoToggled { id, .. } => Some(id),
        }
    }
}
