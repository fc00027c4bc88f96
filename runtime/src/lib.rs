//! # Composable Todo Runtime
//!
//! Runtime implementation for the composable todo architecture.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! tells interested parties when state changed.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Subscriptions**: State listeners, optionally narrowed by a selector
//! - **Action broadcast**: Every emitted action is published on a channel
//!
//! The store is single-threaded: a dispatch runs to completion before
//! `send` returns, and a second dispatch started while one is in flight is
//! rejected with [`StoreError::ReentrantDispatch`].
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let _subscription = store.subscribe(|state| println!("changed: {state:?}"));
//!
//! store.send(Action::DoSomething)?;
//! let value = store.state(|s| s.some_field);
//! ```

/// Error types for the Store runtime
pub mod error;

/// The Store and its subscriptions
pub mod store;

pub use error::StoreError;
pub use store::{Store, StoreConfig, Subscription, MAX_BROADCAST_CAPACITY};
