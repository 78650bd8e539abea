//! Overlay filters - simple text/dropdown filters kept outside the filter tree.

use worklog_core::{Task, TaskStatus};

/// Scalar filters applied on top of the structured filter.
///
/// Each overlay is inactive when unset, and all active overlays must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlays {
    /// Case-insensitive substring of the owner's display name
    pub employee_name: Option<String>,
    /// Exact status
    pub status: Option<TaskStatus>,
}

impl Overlays {
    /// No overlays.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the employee-name search.
    pub fn with_employee_name(mut self, name: impl Into<String>) -> Self {
        self.employee_name = Some(name.into());
        self
    }

    /// Set the status filter.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether any overlay would exclude rows.
    pub fn is_active(&self) -> bool {
        self.name_needle().is_some() || self.status.is_some()
    }

    fn name_needle(&self) -> Option<String> {
        self.employee_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Evaluate against `task`.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(needle) = self.name_needle() {
            let name = task.user_name.as_deref().unwrap_or_default().to_lowercase();
            if !name.contains(&needle) {
                return false;
            }
        }
        self.status.map_or(true, |s| task.status == s)
    }
}
