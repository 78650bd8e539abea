//! View model errors.

use worklog_backend::RequestError;
use worklog_core::{TaskId, ValidationErrors, WorkflowError};

/// Result type for view model operations.
pub type Result<T> = std::result::Result<T, ViewError>;

/// Errors surfaced by the view models.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Draft failed validation; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Role, ownership or target violation; nothing was sent
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Backend request failed
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Task is not in the local collection
    #[error("task {0} is not loaded")]
    NoSuchTask(TaskId),

    /// Operation does not apply in the current selection state
    #[error("cannot {action} while {state}")]
    Selection {
        /// Attempted operation
        action: &'static str,
        /// Selection state at the time
        state: &'static str,
    },
}

impl ViewError {
    /// Whether the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ViewError::Request(e) if e.is_unauthorized())
    }
}
