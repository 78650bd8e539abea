//! Wire records and their normalization into core types.

use serde::Deserialize;
use tracing::warn;
use worklog_core::{parse_day, Role, Session, Task, TaskId, TaskStatus, UserId};
use super::{RequestError, Result};

/// Status as the backend sends it: a name or an enum ordinal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    /// `"Pending"`, `"Approved"`, `"Rejected"`
    Name(String),
    /// `0`, `1`, `2`
    Code(u8),
}

impl RawStatus {
    fn resolve(&self) -> Option<TaskStatus> {
        match self {
            RawStatus::Name(name) => name.parse().ok(),
            RawStatus::Code(code) => TaskStatus::ALL.get(*code as usize).copied(),
        }
    }
}

/// A task exactly as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    /// Backend id
    pub id: TaskId,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Date or timestamp text, possibly null
    #[serde(default)]
    pub date: Option<String>,
    /// Hours worked
    pub hours_worked: u32,
    /// Status
    #[serde(default = "pending")]
    pub status: RawStatus,
    /// Owner
    pub user_id: UserId,
    /// Owner display name
    #[serde(default)]
    pub user_name: Option<String>,
}

fn pending() -> RawStatus {
    RawStatus::Name(TaskStatus::Pending.as_str().to_string())
}

impl RawTask {
    /// Convert into a [`Task`], truncating the date to its calendar day.
    ///
    /// A missing date stays `None`. An unparsable date is logged and treated
    /// as undated rather than failing the whole fetch.
    pub fn normalize(self) -> Result<Task> {
        let status = self
            .status
            .resolve()
            .ok_or_else(|| RequestError::Decode(format!("task {} has unknown status {:?}", self.id, self.status)))?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let day = parse_day(text);
                if day.is_none() {
                    warn!("Task {} has unparsable date {:?}; treating as undated", self.id, text);
                }
                day
            }
        };

        Ok(Task {
            id: self.id,
            title: self.title,
            date,
            hours_worked: self.hours_worked,
            status,
            user_id: self.user_id,
            user_name: self.user_name,
        })
    }
}

/// Normalize a fetched list.
pub fn normalize_all(raw: Vec<RawTask>) -> Result<Vec<Task>> {
    raw.into_iter().map(RawTask::normalize).collect()
}

/// Successful login body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
    /// Role name
    pub role: String,
    /// User id
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub user_name: Option<String>,
}

impl LoginResponse {
    /// Convert into a [`Session`].
    pub fn into_session(self) -> Result<Session> {
        let role = match self.role.trim().to_lowercase().as_str() {
            "employee" => Role::Employee,
            "manager" => Role::Manager,
            other => return Err(RequestError::Decode(format!("unknown role {:?}", other))),
        };
        Ok(Session::new(self.token, role, self.id, self.user_name.unwrap_or_default()))
    }
}
