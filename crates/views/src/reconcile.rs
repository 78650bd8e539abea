//! Local task collection and fetch-replace reconciliation.
//!
//! Every fetch is issued a [`Ticket`]. A response is applied only if its
//! ticket is newer than the last one applied, so a slow response can never
//! overwrite a fresher one. Applying always replaces the whole collection.

use tracing::{debug, warn};
use worklog_backend::{Result, TaskApi};
use worklog_core::{Session, Task, TaskId};

/// Which backend listing a view model mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The session user's own tasks
    Mine,
    /// Every employee's tasks
    All,
}

impl Scope {
    /// Fetch the listing for `session`.
    pub async fn fetch(self, api: &dyn TaskApi, session: &Session) -> Result<Vec<Task>> {
        match self {
            Scope::Mine => api.my_tasks(session).await,
            Scope::All => api.all_tasks(session).await,
        }
    }
}

/// Ordering token for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The canonical local copy of a task listing.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    issued: u64,
    applied: u64,
}

impl TaskCollection {
    /// Empty, never-loaded collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tasks.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Issue a ticket for a fetch about to start.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Replace the collection with `tasks` fetched under `ticket`.
    ///
    /// Returns `false` and leaves the collection alone if a newer fetch was
    /// already applied.
    pub fn apply(&mut self, ticket: Ticket, tasks: Vec<Task>) -> bool {
        if ticket.0 <= self.applied {
            warn!("Discarding stale fetch #{} (latest applied #{})", ticket.0, self.applied);
            return false;
        }
        debug!("Applying fetch #{} with {} tasks", ticket.0, tasks.len());
        self.applied = ticket.0;
        self.tasks = tasks;
        true
    }
}
