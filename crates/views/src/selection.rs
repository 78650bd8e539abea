//! Selection state machines for the two screens.
//!
//! ```text
//! Employee:  Idle -> RowSelected -> Editing          -> Idle
//!                               \-> ConfirmingDelete -> Idle
//! Manager:   Idle -> TaskSelected -> Idle
//! ```

use worklog_core::Task;
use crate::{Result, ViewError};

/// Selection on the employee screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EmployeeSelection {
    /// Nothing selected
    #[default]
    Idle,
    /// A row was clicked; edit or delete is offered
    RowSelected(Task),
    /// The edit form is open
    Editing(Task),
    /// Delete is awaiting confirmation
    ConfirmingDelete(Task),
}

impl EmployeeSelection {
    /// State name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeSelection::Idle => "idle",
            EmployeeSelection::RowSelected(_) => "row selected",
            EmployeeSelection::Editing(_) => "editing",
            EmployeeSelection::ConfirmingDelete(_) => "confirming delete",
        }
    }

    /// Task the selection refers to.
    pub fn task(&self) -> Option<&Task> {
        match self {
            EmployeeSelection::Idle => None,
            EmployeeSelection::RowSelected(t)
            | EmployeeSelection::Editing(t)
            | EmployeeSelection::ConfirmingDelete(t) => Some(t),
        }
    }

    /// Select a row. Allowed from `Idle` or to switch rows.
    pub fn select(&mut self, task: Task) -> Result<()> {
        match self {
            EmployeeSelection::Idle | EmployeeSelection::RowSelected(_) => {
                *self = EmployeeSelection::RowSelected(task);
                Ok(())
            }
            _ => Err(self.misuse("select a row")),
        }
    }

    /// Open the edit form for the selected row.
    pub fn edit(&mut self) -> Result<()> {
        match std::mem::take(self) {
            EmployeeSelection::RowSelected(task) => {
                *self = EmployeeSelection::Editing(task);
                Ok(())
            }
            other => {
                *self = other;
                Err(self.misuse("edit"))
            }
        }
    }

    /// Ask to confirm deletion of the selected row.
    pub fn delete(&mut self) -> Result<()> {
        match std::mem::take(self) {
            EmployeeSelection::RowSelected(task) => {
                *self = EmployeeSelection::ConfirmingDelete(task);
                Ok(())
            }
            other => {
                *self = other;
                Err(self.misuse("delete"))
            }
        }
    }

    /// Back to `Idle`.
    pub fn clear(&mut self) {
        *self = EmployeeSelection::Idle;
    }

    fn misuse(&self, action: &'static str) -> ViewError {
        ViewError::Selection { action, state: self.as_str() }
    }
}

/// Selection on the manager screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ManagerSelection {
    /// No task open
    #[default]
    Idle,
    /// A task is open for review
    TaskSelected(Task),
}

impl ManagerSelection {
    /// State name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerSelection::Idle => "idle",
            ManagerSelection::TaskSelected(_) => "task selected",
        }
    }

    /// Task under review.
    pub fn task(&self) -> Option<&Task> {
        match self {
            ManagerSelection::Idle => None,
            ManagerSelection::TaskSelected(t) => Some(t),
        }
    }
}
