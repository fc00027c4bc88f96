//! A todo list held three different ways, to contrast how each one tells
//! its views about changes.
//!
//! The mutation contract lives in [`TodoCollection`]: add a uniquely named
//! todo, delete by id, toggle completion by id, list in insertion order.
//! Invalid requests (duplicate name, unknown id) are silent no-ops.
//!
//! Three shells wrap a collection:
//!
//! - [`LocalTodoApp`] keeps owned state and re-renders everything on change
//! - [`ReactiveTodoApp`] puts the collection in a [`Store`] and lets views
//!   subscribe to selected slices
//! - [`ObservableTodoApp`] notifies per-record observers
//!
//! # Quick Start
//!
//! ```
//! use todo::{ReactiveTodoApp, TodoApi};
//!
//! # fn main() -> Result<(), todo::TodoError> {
//! let mut app = ReactiveTodoApp::new();
//! let _ids = app.watch_ids(|ids| println!("list now has {} rows", ids.len()));
//!
//! app.add_todo("Reading")?;
//! app.add_todo("Reading")?; // ignored, name taken
//!
//! let learning = app.find_by_name("Learning").map(|todo| todo.id);
//! if let Some(id) = learning {
//!     app.toggle_todo(&id)?;
//! }
//!
//! let names: Vec<String> = app.todos().into_iter().map(|todo| todo.name).collect();
//! assert_eq!(names, ["Eating", "Sleeping", "Learning", "Reading"]);
//! # Ok(())
//! # }
//! ```
//!
//! [`Store`]: composable_todo_runtime::Store

pub mod api;
pub mod collection;
pub mod config;
pub mod error;
pub mod reducer;
pub mod seed;
pub mod shells;
pub mod types;

// Re-export commonly used types
pub use api::TodoApi;
pub use collection::TodoCollection;
pub use error::TodoError;
pub use reducer::TodoReducer;
pub use shells::{
    drain_event_count, LocalTodoApp, ObservableTodoApp, ObserverId, ReactiveTodoApp, TodoStore,
};
pub use types::{Todo, TodoAction, TodoId};
