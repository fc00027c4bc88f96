//! Given-When-Then harness for reducers.
//!
//! A test seeds a state, feeds one or more actions through the reducer, and
//! then checks the final state and what the last reduction emitted.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use composable_todo_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Builder for one reducer scenario
///
/// Actions are reduced in the order they were added, all against the same
/// state. State checks see the state after the last action; effect checks
/// see the effects of the last action only, so earlier actions act as setup.
///
/// # Example
///
/// ```ignore
/// use composable_todo_testing::{assertions, ReducerTest};
///
/// ReducerTest::new(TodoReducer::new())
///     .with_env(())
///     .given_state(TodoCollection::new())
///     .when_action(TodoAction::AddTodo { name: "Read".into() })
///     .when_action(TodoAction::AddTodo { name: "Read".into() })
///     .then_state(|todos| assert_eq!(todos.len(), 1))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a scenario for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Environment passed to every reduction
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// State before the first action
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Queue an action; may be called repeatedly
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Check the state once every action has been reduced
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Check the effects returned for the last action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Shorthand for `then_effects` with [`assertions::assert_emitted`]
    #[must_use]
    pub fn then_emitted(self, expected: Vec<A>) -> Self
    where
        A: Clone + PartialEq + std::fmt::Debug + 'static,
    {
        self.then_effects(move |effects| assertions::assert_emitted(effects, &expected))
    }

    /// Reduce the queued actions and run every check
    ///
    /// # Panics
    ///
    /// If `given_state`, `with_env` or `when_action` was never called, or
    /// when a check fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let Self {
            reducer,
            environment,
            initial_state,
            actions,
            state_checks,
            effect_checks,
        } = self;

        let env = environment.expect("ReducerTest needs with_env()");
        let mut state = initial_state.expect("ReducerTest needs given_state()");
        assert!(!actions.is_empty(), "ReducerTest needs at least one when_action()");

        let last = actions
            .into_iter()
            .map(|action| reducer.reduce(&mut state, action, &env))
            .last()
            .map(smallvec::SmallVec::into_vec)
            .unwrap_or_default();

        state_checks.into_iter().for_each(|check| check(&state));
        effect_checks.into_iter().for_each(|check| check(&last));
    }
}

/// Checks over the effects a reduction returned
pub mod assertions {
    use composable_todo_core::effect::Effect;

    /// Nothing would happen: every effect is (or flattens to) `Effect::None`
    ///
    /// # Panics
    ///
    /// When some effect emits an action.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "expected only no-op effects, got {effects:?}"
        );
    }

    /// Exactly `expected` top-level effects were returned
    ///
    /// # Panics
    ///
    /// On a count mismatch.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A: std::fmt::Debug>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "unexpected effect count in {effects:?}");
    }

    /// The effects emit exactly `expected`, in order
    ///
    /// # Panics
    ///
    /// When the flattened emitted actions differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_emitted<A>(effects: &[Effect<A>], expected: &[A])
    where
        A: Clone + PartialEq + std::fmt::Debug,
    {
        let emitted: Vec<A> = effects
            .iter()
            .cloned()
            .flat_map(Effect::into_emitted)
            .collect();
        assert_eq!(emitted, expected, "emitted actions differ");
    }

    /// Something was emitted
    ///
    /// # Panics
    ///
    /// When every effect is a no-op.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_emit_effect<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|effect| !effect.is_none()),
            "expected an emitted action, got {effects:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composable_todo_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct Gauge {
        level: u8,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum GaugeAction {
        Raise,
        Lower,
        Moved(u8),
    }

    struct GaugeReducer;

    impl Reducer for GaugeReducer {
        type State = Gauge;
        type Action = GaugeAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                GaugeAction::Raise => {
                    state.level += 1;
                    smallvec![Effect::Emit(GaugeAction::Moved(state.level))]
                },
                GaugeAction::Lower if state.level > 0 => {
                    state.level -= 1;
                    smallvec![Effect::Emit(GaugeAction::Moved(state.level))]
                },
                GaugeAction::Lower | GaugeAction::Moved(_) => smallvec![Effect::None],
            }
        }
    }

    fn scenario() -> ReducerTest<GaugeReducer, Gauge, GaugeAction, ()> {
        ReducerTest::new(GaugeReducer)
            .with_env(())
            .given_state(Gauge { level: 0 })
    }

    #[test]
    fn single_action_emits() {
        scenario()
            .when_action(GaugeAction::Raise)
            .then_state(|gauge| assert_eq!(gauge.level, 1))
            .then_emitted(vec![GaugeAction::Moved(1)])
            .run();
    }

    #[test]
    fn rejected_action_is_a_noop() {
        scenario()
            .when_action(GaugeAction::Lower)
            .then_state(|gauge| assert_eq!(gauge.level, 0))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn effect_checks_see_only_the_last_action() {
        scenario()
            .when_action(GaugeAction::Raise)
            .when_action(GaugeAction::Raise)
            .when_action(GaugeAction::Lower)
            .then_state(|gauge| assert_eq!(gauge.level, 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_emit_effect(effects);
            })
            .then_emitted(vec![GaugeAction::Moved(1)])
            .run();
    }

    #[test]
    #[should_panic(expected = "at least one when_action")]
    fn running_without_actions_fails() {
        scenario().run();
    }

    #[test]
    fn nested_noops_count_as_no_effects() {
        assertions::assert_no_effects::<GaugeAction>(&[]);
        assertions::assert_no_effects::<GaugeAction>(&[Effect::chain(vec![Effect::None, Effect::None])]);
    }
}
