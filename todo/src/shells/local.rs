//! The todo list held as owned local state with forced full updates.

use crate::api::TodoApi;
use crate::collection::TodoCollection;
use crate::error::Result;
use crate::types::{Todo, TodoAction, TodoId};
use std::rc::Rc;

/// Todo list held as local state of a single component
///
/// The component keeps an immutable snapshot of the list. Each successful
/// mutation swaps in a new snapshot and forces an update; since nothing
/// narrower is tracked, the list and every row count as re-rendered.
#[derive(Debug)]
pub struct LocalTodoApp {
    collection: TodoCollection,
    snapshot: Rc<[Todo]>,
    revision: u64,
    renders: u64,
}

impl LocalTodoApp {
    /// Creates the app with the default records
    #[must_use]
    pub fn new() -> Self {
        Self::with_collection(TodoCollection::seeded())
    }

    /// Creates the app around an existing collection
    #[must_use]
    pub fn with_collection(collection: TodoCollection) -> Self {
        let snapshot: Rc<[Todo]> = collection.list().into();
        let renders = Self::render_cost(&snapshot);
        Self {
            collection,
            snapshot,
            revision: 0,
            renders,
        }
    }

    /// The current snapshot
    ///
    /// Snapshots are never mutated; a change produces a new one, so a held
    /// snapshot can be compared by pointer to detect updates.
    #[must_use]
    pub fn snapshot(&self) -> Rc<[Todo]> {
        Rc::clone(&self.snapshot)
    }

    /// Number of forced updates so far
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Rows plus list renders so far, including the initial mount
    #[must_use]
    pub const fn renders(&self) -> u64 {
        self.renders
    }

    /// Read access to the underlying collection
    #[must_use]
    pub const fn collection(&self) -> &TodoCollection {
        &self.collection
    }

    fn commit(&mut self, change: Option<TodoAction>) {
        let Some(change) = change else {
            return;
        };

        self.snapshot = self.collection.list().into();
        self.revision += 1;
        self.renders += Self::render_cost(&self.snapshot);
        tracing::debug!(
            revision = self.revision,
            renders = self.renders,
            ?change,
            "Local state replaced"
        );
    }

    fn render_cost(snapshot: &[Todo]) -> u64 {
        snapshot.len() as u64 + 1
    }
}

impl Default for LocalTodoApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoApi for LocalTodoApp {
    fn add_todo(&mut self, name: &str) -> Result<()> {
        let change = self.collection.add(name);
        self.commit(change);
        Ok(())
    }

    fn delete_todo(&mut self, id: &TodoId) -> Result<()> {
        let change = self.collection.delete(id);
        self.commit(change);
        Ok(())
    }

    fn toggle_todo(&mut self, id: &TodoId) -> Result<()> {
        let change = self.collection.toggle(id);
        self.commit(change);
        Ok(())
    }

    fn todos(&self) -> Vec<Todo> {
        self.snapshot.to_vec()
    }
}
