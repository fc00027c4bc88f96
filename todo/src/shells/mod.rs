//! Three ways of holding the same todo list.
//!
//! - [`LocalTodoApp`]: owned state, every change re-renders everything
//! - [`ReactiveTodoApp`]: an external store with selector subscriptions
//! - [`ObservableTodoApp`]: per-record observers
//!
//! All three implement [`TodoApi`](crate::api::TodoApi) and share the
//! collection's mutation semantics.

mod local;
mod observable;
mod reactive;

pub use local::LocalTodoApp;
pub use observable::{ObservableTodoApp, ObserverId};
pub use reactive::{drain_event_count, ReactiveTodoApp, TodoStore};
