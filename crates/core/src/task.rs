//! Task model - a single day's logged hours owned by one employee.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{TaskId, UserId};

/// A work-log entry as held in a client-side collection.
///
/// Instances come from the backend (through date normalization) and are
/// never built field-by-field by front-ends; new entries start life as a
/// [`TaskDraft`](crate::TaskDraft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend-assigned identifier
    pub id: TaskId,

    /// What the hours were spent on
    pub title: String,

    /// Calendar day of the work, `None` for undated entries
    pub date: Option<NaiveDate>,

    /// Whole hours worked, at least 1
    pub hours_worked: u32,

    /// Approval state
    pub status: TaskStatus,

    /// Owning employee
    pub user_id: UserId,

    /// Owning employee's display name, when the backend supplies one
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Task {
    /// Whether `user` owns this task.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

/// Approval state of a task.
///
/// Declaration order doubles as the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Submitted, awaiting review
    #[default]
    Pending,
    /// Accepted by a manager
    Approved,
    /// Turned down by a manager
    Rejected,
}

impl TaskStatus {
    /// All states, in sort order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::Approved, TaskStatus::Rejected];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Approved => "Approved",
            TaskStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "approved" => Ok(TaskStatus::Approved),
            "rejected" => Ok(TaskStatus::Rejected),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}
