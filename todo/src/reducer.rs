//! Reducer logic for the todo list.
//!
//! Commands run the collection's guarded mutators; whatever event comes back
//! is emitted for observers. Events are replayed with
//! [`TodoCollection::apply`].

use crate::collection::TodoCollection;
use crate::types::TodoAction;
use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer for the todo list
///
/// The collection draws its own ids, so the reducer needs no environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn emit(event: Option<TodoAction>) -> SmallVec<[Effect<TodoAction>; 4]> {
        match event {
            Some(event) => smallvec![Effect::Emit(event)],
            None => smallvec![Effect::None],
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoCollection;
    type Action = TodoAction;
    type Environment = ();

    #[tracing::instrument(skip(self, state, _env), name = "todo_reduce", level = "debug")]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { name } => Self::emit(state.add(name)),
            TodoAction::DeleteTodo { id } => Self::emit(state.delete(&id)),
            TodoAction::ToggleTodo { id } => Self::emit(state.toggle(&id)),

            // ========== Events ==========
            event @ (TodoAction::TodoAdded { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::TodoToggled { .. }) => {
                let changed = state.apply(&event);
                Self::emit(changed.then_some(event))
            },
        }
    }
}
