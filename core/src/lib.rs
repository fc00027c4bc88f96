//! # Composable Todo Core
//!
//! Core traits and types for the composable todo architecture.
//!
//! This crate provides the abstractions every state container in the
//! workspace is built from, whichever way it notifies observers.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of what the runtime should do after a reduction
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterAction {
//!     Increment,
//!     Incremented(u32),
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Counter,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::Emit(CounterAction::Incremented(state.count))]
//!             }
//!             CounterAction::Incremented(_) => smallvec![Effect::None],
//!         }
//!     }
//! }
//!
//! let mut state = Counter::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Checks the action's preconditions against state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions for the runtime
        ///
        /// A rejected action is not an error: the reducer leaves state alone
        /// and returns [`Effect::None`].
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Descriptions of follow-up work for the runtime
///
/// Effects are values, not execution. A reducer returns them and the store
/// decides what to do with them.
pub mod effect {
    /// Effect type - describes what the runtime should do after a reduction
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects carry
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// State changed; report the action describing the change to observers
        Emit(Action),

        /// Run effects in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if executing this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Emit(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }

        /// Flattens the effect into the actions it emits, in order
        #[must_use]
        pub fn into_emitted(self) -> Vec<Action> {
            let mut out = Vec::new();
            self.collect_into(&mut out);
            out
        }

        fn collect_into(self, out: &mut Vec<Action>) {
            match self {
                Effect::None => {},
                Effect::Emit(action) => out.push(action),
                Effect::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_into(out);
                    }
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// External sources of nondeterminism are abstracted behind traits so tests
/// can swap in predictable implementations.
pub mod environment {
    use uuid::Uuid;

    /// Id generator trait - abstracts identifier creation for testability
    ///
    /// Identifiers only need to be unique for the lifetime of the container
    /// that requested them.
    ///
    /// # Examples
    ///
    /// ```
    /// use composable_todo_core::environment::{IdGenerator, RandomIdGenerator};
    ///
    /// let ids = RandomIdGenerator;
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> String;
    }

    /// Production id generator backed by random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }
}
