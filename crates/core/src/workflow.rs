//! Approval workflow - who may change a task, and how its status moves.
//!
//! ```text
//!            approve            approve
//!  Pending ──────────▶ Approved ◀────────┐
//!     │                   │  ▲           │
//!     │ reject     reject │  │ approve   │
//!     ▼                   ▼  │           │
//!  Rejected ◀─────────────┘  └───────────┘
//! ```
//!
//! Any state may move to Approved or Rejected. Nothing moves back to Pending.
//! A request for the state a task is already in is accepted as a no-op.

use crate::id::UserId;
use crate::session::{Role, Session};
use crate::task::{Task, TaskStatus};

/// Errors raised before any request reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Role may not perform the action
    #[error("{role} may not {action}")]
    Forbidden {
        /// Caller's role
        role: Role,
        /// Attempted action
        action: Action,
    },

    /// Task belongs to someone else
    #[error("task belongs to user {owner}, not {caller}")]
    NotOwner {
        /// Task owner
        owner: UserId,
        /// Caller
        caller: UserId,
    },

    /// Status cannot be requested as a target
    #[error("cannot move a task to {0}")]
    InvalidTarget(TaskStatus),
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a task
    Create,
    /// Edit title, date or hours
    Edit,
    /// Delete a task
    Delete,
    /// Change approval status
    ChangeStatus,
}

impl Action {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create tasks",
            Action::Edit => "edit tasks",
            Action::Delete => "delete tasks",
            Action::ChangeStatus => "change task status",
        }
    }

    /// Role allowed to perform this action.
    pub fn required_role(&self) -> Role {
        match self {
            Action::Create | Action::Edit | Action::Delete => Role::Employee,
            Action::ChangeStatus => Role::Manager,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of planning a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Status will move
    Change {
        /// Current status
        from: TaskStatus,
        /// Requested status
        to: TaskStatus,
    },
    /// Task is already in the requested status
    Unchanged(TaskStatus),
}

impl Transition {
    /// Whether a backend request is needed.
    pub fn is_change(&self) -> bool {
        matches!(self, Transition::Change { .. })
    }

    /// Status after the transition.
    pub fn target(&self) -> TaskStatus {
        match self {
            Transition::Change { to, .. } => *to,
            Transition::Unchanged(status) => *status,
        }
    }
}

/// Check that `session` may perform `action`.
pub fn authorize(session: &Session, action: Action) -> Result<(), WorkflowError> {
    if session.role == action.required_role() {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden { role: session.role, action })
    }
}

/// Check that `session` may perform an employee `action` on `task`.
pub fn authorize_owned(session: &Session, action: Action, task: &Task) -> Result<(), WorkflowError> {
    authorize(session, action)?;
    if task.is_owned_by(&session.user_id) {
        Ok(())
    } else {
        Err(WorkflowError::NotOwner {
            owner: task.user_id.clone(),
            caller: session.user_id.clone(),
        })
    }
}

/// Statuses a control may offer for a task currently in `current`.
pub fn allowed_targets(current: TaskStatus) -> Vec<TaskStatus> {
    [TaskStatus::Approved, TaskStatus::Rejected]
        .into_iter()
        .filter(|s| *s != current)
        .collect()
}

/// Plan a status change for `task` requested by `session`.
pub fn plan_transition(
    session: &Session,
    task: &Task,
    requested: TaskStatus,
) -> Result<Transition, WorkflowError> {
    authorize(session, Action::ChangeStatus)?;
    if requested == TaskStatus::Pending {
        return Err(WorkflowError::InvalidTarget(requested));
    }
    if task.status == requested {
        Ok(Transition::Unchanged(requested))
    } else {
        Ok(Transition::Change { from: task.status, to: requested })
    }
}
