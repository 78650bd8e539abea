//! Work-log core data models.
//!
//! This crate defines the task entity, draft validation, the approval
//! workflow and the authentication context shared by every other layer.

#![warn(missing_docs)]

// Core identities
mod id;

// Task model
mod task;
mod draft;
mod workflow;

// Authentication
mod session;

// Re-exports
pub use id::{TaskId, UserId};

// Task
pub use task::{Task, TaskStatus, UnknownStatus};
pub use draft::{
    parse_day, TaskDraft, TaskField, TaskFields, ValidationError, ValidationErrors, ValidationKind,
};
pub use workflow::{
    allowed_targets, authorize, authorize_owned, plan_transition, Action, Transition, WorkflowError,
};

// Session
pub use session::{AuthContext, Credentials, Role, Session};
