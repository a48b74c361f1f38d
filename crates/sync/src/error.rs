use thiserror::Error;

/// Errors reported to callers of a [`CoordinatorHandle`](crate::CoordinatorHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyncError {
	/// The coordinator task has stopped.
	#[error("coordinator has shut down")]
	Closed,
}

/// Result type for coordinator operations.
pub type Result<T, E = SyncError> = std::result::Result<T, E>;
