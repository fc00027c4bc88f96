//! Error types surfaced by the app shells.

use composable_todo_runtime::StoreError;
use thiserror::Error;

/// Failure of a shell operation
///
/// Domain rejections (duplicate names, unknown ids) are no-ops and never
/// show up here. This only reports misuse of a shell's store, such as
/// mutating it from inside one of its own listeners.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoError {
    /// The underlying store refused the dispatch
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for shell operations
pub type Result<T, E = TodoError> = std::result::Result<T, E>;
