//! The boundary a presentation layer consumes.

use crate::error::Result;
use crate::types::{Todo, TodoId};

/// The four operations every app shell offers
///
/// Whatever notification strategy a shell uses, these behave the same:
/// a duplicate name or an unknown id is silently ignored.
pub trait TodoApi {
    /// Adds a todo unless one with this exact name exists
    ///
    /// # Errors
    ///
    /// Only if the shell's store is already dispatching.
    fn add_todo(&mut self, name: &str) -> Result<()>;

    /// Deletes the todo with this id, if any
    ///
    /// # Errors
    ///
    /// Only if the shell's store is already dispatching.
    fn delete_todo(&mut self, id: &TodoId) -> Result<()>;

    /// Flips the completion flag of the todo with this id, if any
    ///
    /// # Errors
    ///
    /// Only if the shell's store is already dispatching.
    fn toggle_todo(&mut self, id: &TodoId) -> Result<()>;

    /// The current records in display order
    fn todos(&self) -> Vec<Todo>;

    /// The record with this exact name, if any
    fn find_by_name(&self, name: &str) -> Option<Todo> {
        self.todos().into_iter().find(|todo| todo.name == name)
    }
}
