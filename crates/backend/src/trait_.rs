//! Backend API trait abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use worklog_core::{Credentials, Session, Task, TaskFields, TaskId, TaskStatus, UserId};

/// Error type for backend requests.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Login failed, for any cause
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Session missing, expired, or not allowed to make the request
    #[error("not authorized; please log in again")]
    Unauthorized,

    /// Item not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// Network or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response decoded but made no sense
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Configured API root is not a usable base URL
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl RequestError {
    /// Whether the caller should be sent back to login.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RequestError::Unauthorized)
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Title
    pub title: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Hours worked
    pub hours_worked: u32,
    /// Owner, taken from the session
    pub user_id: UserId,
}

impl NewTask {
    /// Build a create request for the session's user.
    pub fn new(fields: TaskFields, session: &Session) -> Self {
        Self {
            title: fields.title,
            date: fields.date,
            hours_worked: fields.hours_worked,
            user_id: session.user_id.clone(),
        }
    }
}

/// Body of an edit request. Status is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Edited task
    pub id: TaskId,
    /// Title
    pub title: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Hours worked
    pub hours_worked: u32,
    /// Owner, unchanged
    pub user_id: UserId,
}

impl TaskUpdate {
    /// Build an edit request for `task`, keeping its owner.
    pub fn new(task: &Task, fields: TaskFields) -> Self {
        Self {
            id: task.id.clone(),
            title: fields.title,
            date: fields.date,
            hours_worked: fields.hours_worked,
            user_id: task.user_id.clone(),
        }
    }
}

/// Contract the client depends on.
///
/// Every call except [`login`](TaskApi::login) carries the caller's session
/// explicitly; implementations keep no ambient credentials.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    /// Tasks owned by the session's user.
    async fn my_tasks(&self, session: &Session) -> Result<Vec<Task>>;

    /// Tasks of every employee. Manager only.
    async fn all_tasks(&self, session: &Session) -> Result<Vec<Task>>;

    /// Create a task. The backend assigns the id and Pending status.
    async fn create_task(&self, session: &Session, task: &NewTask) -> Result<Task>;

    /// Replace title, date and hours of a task.
    async fn update_task(&self, session: &Session, update: &TaskUpdate) -> Result<Task>;

    /// Delete a task.
    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<()>;

    /// Set the approval status of a task. Manager only.
    async fn update_status(&self, session: &Session, id: &TaskId, status: TaskStatus) -> Result<()>;
}
