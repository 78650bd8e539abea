//! Employee screen: record, edit and delete one's own hours.

use std::sync::Arc;
use tracing::{info, warn};
use worklog_backend::{NewTask, TaskApi, TaskUpdate};
use worklog_core::{authorize, authorize_owned, Action, Session, Task, TaskDraft, TaskId};
use worklog_query::{FilterNode, PageRequest, QueryState, SortSpec, View};
use crate::reconcile::{Scope, TaskCollection};
use crate::selection::EmployeeSelection;
use crate::{Result, ViewConfig, ViewError};

/// View model over the session user's own tasks.
///
/// Only the structured filter is offered here; overlays belong to the
/// manager screen.
pub struct EmployeeView {
    api: Arc<dyn TaskApi>,
    session: Session,
    collection: TaskCollection,
    query: QueryState,
    selection: EmployeeSelection,
}

impl EmployeeView {
    /// Create the view for an employee session. Nothing is fetched yet.
    pub fn new(api: Arc<dyn TaskApi>, session: Session, config: &ViewConfig) -> Result<Self> {
        authorize(&session, Action::Create)?;
        Ok(Self {
            api,
            session,
            collection: TaskCollection::new(),
            query: QueryState::new(config.page_size),
            selection: EmployeeSelection::Idle,
        })
    }

    /// Session the view acts for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Local copy of the user's tasks.
    pub fn tasks(&self) -> &[Task] {
        self.collection.tasks()
    }

    /// Current query inputs.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Current selection.
    pub fn selection(&self) -> &EmployeeSelection {
        &self.selection
    }

    /// Rows to display.
    pub fn view(&self) -> View {
        self.query.view(self.collection.tasks())
    }

    /// Replace the structured filter.
    pub fn set_filter(&mut self, filter: Option<FilterNode>) {
        self.query.set_filter(filter);
    }

    /// Clear the structured filter.
    pub fn reset_filter(&mut self) {
        self.query.reset_filter();
    }

    /// Replace the sort.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.set_sort(sort);
    }

    /// Move the window.
    pub fn set_page(&mut self, page: PageRequest) {
        self.query.set_page(page);
    }

    /// Fetch the user's tasks and replace the local collection.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.collection.issue();
        let tasks = match Scope::Mine.fetch(self.api.as_ref(), &self.session).await {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Failed to load tasks: {}", e);
                return Err(e.into());
            }
        };
        if self.collection.apply(ticket, tasks) {
            let total = self.view().total;
            self.query.clamp_page(total);
        }
        Ok(())
    }

    /// Same as [`load`](Self::load).
    pub async fn refresh(&mut self) -> Result<()> {
        self.load().await
    }

    /// Record a new task. The backend makes it Pending.
    pub async fn create(&mut self, draft: &TaskDraft) -> Result<Task> {
        let fields = draft.validate()?;
        authorize(&self.session, Action::Create)?;

        let created = self
            .api
            .create_task(&self.session, &NewTask::new(fields, &self.session))
            .await?;
        info!("Created task {}", created.id);

        self.load().await?;
        Ok(created)
    }

    /// Replace title, date and hours of a loaded task.
    pub async fn edit(&mut self, id: &TaskId, draft: &TaskDraft) -> Result<Task> {
        let task = self.find(id)?.clone();
        let updated = self.send_edit(&task, draft).await?;
        self.load().await?;
        Ok(updated)
    }

    /// Delete a loaded task.
    pub async fn delete(&mut self, id: &TaskId) -> Result<()> {
        let task = self.find(id)?.clone();
        self.send_delete(&task).await?;
        self.load().await
    }

    /// Click a row.
    pub fn select_row(&mut self, id: &TaskId) -> Result<()> {
        let task = self.find(id)?.clone();
        self.selection.select(task)
    }

    /// Open the edit form for the selected row, prefilled from it.
    pub fn choose_edit(&mut self) -> Result<TaskDraft> {
        self.selection.edit()?;
        self.selection
            .task()
            .map(TaskDraft::from_task)
            .ok_or(ViewError::Selection { action: "edit", state: "idle" })
    }

    /// Ask to delete the selected row.
    pub fn choose_delete(&mut self) -> Result<()> {
        self.selection.delete()
    }

    /// Submit the open edit form.
    ///
    /// On failure the form stays open and the collection is untouched.
    pub async fn submit_edit(&mut self, draft: &TaskDraft) -> Result<Task> {
        let task = match &self.selection {
            EmployeeSelection::Editing(task) => task.clone(),
            other => {
                return Err(ViewError::Selection { action: "submit an edit", state: other.as_str() })
            }
        };
        let updated = self.send_edit(&task, draft).await?;
        self.selection.clear();
        self.load().await?;
        Ok(updated)
    }

    /// Confirm the pending delete.
    ///
    /// On failure the confirmation stays open and the collection is untouched.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let task = match &self.selection {
            EmployeeSelection::ConfirmingDelete(task) => task.clone(),
            other => {
                return Err(ViewError::Selection { action: "confirm a delete", state: other.as_str() })
            }
        };
        self.send_delete(&task).await?;
        self.selection.clear();
        self.load().await
    }

    /// Close whatever is open.
    pub fn cancel(&mut self) {
        self.selection.clear();
    }

    fn find(&self, id: &TaskId) -> Result<&Task> {
        self.collection
            .get(id)
            .ok_or_else(|| ViewError::NoSuchTask(id.clone()))
    }

    async fn send_edit(&self, task: &Task, draft: &TaskDraft) -> Result<Task> {
        let fields = draft.validate()?;
        authorize_owned(&self.session, Action::Edit, task)?;
        let updated = self
            .api
            .update_task(&self.session, &TaskUpdate::new(task, fields))
            .await?;
        info!("Updated task {}", task.id);
        Ok(updated)
    }

    async fn send_delete(&self, task: &Task) -> Result<()> {
        authorize_owned(&self.session, Action::Delete, task)?;
        self.api.delete_task(&self.session, &task.id).await?;
        info!("Deleted task {}", task.id);
        Ok(())
    }
}
