use thiserror::Error;

/// Errors that can occur during Store operations
///
/// Domain-level rejections (an unknown id, a duplicate name) are never
/// errors; reducers turn them into no-ops. Only misuse of the store itself
/// is reported here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// An action was sent while the store was still processing another one
    ///
    /// This happens when a listener, or a closure passed to
    /// [`Store::state`](crate::Store::state), calls `send` on the same store.
    #[error("Store is already dispatching an action")]
    ReentrantDispatch,
}
