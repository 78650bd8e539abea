//! Draft validation for employee-entered tasks.
//!
//! Drafts hold raw user input. [`TaskDraft::validate`] checks every field and
//! reports all failures at once so each can be shown next to its input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::task::Task;

/// Fields an employee may set on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskField {
    /// Title text
    Title,
    /// Calendar day
    Date,
    /// Hours worked
    HoursWorked,
}

impl TaskField {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Date => "date",
            TaskField::HoursWorked => "hoursWorked",
        }
    }
}

/// Kind of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    /// Missing or unusable value
    Required,
    /// Value outside the accepted range
    Range,
}

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {}", field.as_str(), message)]
pub struct ValidationError {
    /// Offending field
    pub field: TaskField,
    /// Failure kind
    pub kind: ValidationKind,
    /// Human-readable message
    pub message: &'static str,
}

/// All validation failures found in one draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// Failure for `field`, if any.
    pub fn for_field(&self, field: TaskField) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }
}

/// Raw employee input for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Title as typed
    pub title: String,
    /// Date as typed
    pub date: String,
    /// Hours as typed
    pub hours_worked: String,
}

/// Checked values ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    /// Trimmed title
    pub title: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Whole hours, at least 1
    pub hours_worked: u32,
}

impl TaskDraft {
    /// Create a draft from raw input.
    pub fn new(title: impl Into<String>, date: impl Into<String>, hours_worked: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            hours_worked: hours_worked.into(),
        }
    }

    /// Prefill a draft from an existing task for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            date: task.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            hours_worked: task.hours_worked.to_string(),
        }
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<TaskFields, ValidationErrors> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(ValidationError {
                field: TaskField::Title,
                kind: ValidationKind::Required,
                message: "title is required",
            });
        }

        let date = parse_day(&self.date);
        if date.is_none() {
            errors.push(ValidationError {
                field: TaskField::Date,
                kind: ValidationKind::Required,
                message: "a valid date is required",
            });
        }

        let hours = self.hours_worked.trim().parse::<u32>().ok().filter(|h| *h >= 1);
        if hours.is_none() {
            errors.push(ValidationError {
                field: TaskField::HoursWorked,
                kind: ValidationKind::Range,
                message: "hours worked must be a whole number of at least 1",
            });
        }

        match (date, hours) {
            (Some(date), Some(hours_worked)) if errors.is_empty() => Ok(TaskFields {
                title: title.to_string(),
                date,
                hours_worked,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// Parse a calendar day, dropping any time-of-day.
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339
/// timestamps. For timestamps the date is taken as written, without converting
/// between offsets.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
