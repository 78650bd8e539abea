//! Manager screen: review everyone's hours and approve or reject them.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use worklog_backend::TaskApi;
use worklog_core::{
    allowed_targets, authorize, plan_transition, Action, Session, Task, TaskId, TaskStatus, Transition,
};
use worklog_query::{FilterNode, Overlays, PageRequest, QueryState, SortSpec, View};
use crate::notice::Notice;
use crate::reconcile::{Scope, TaskCollection};
use crate::selection::ManagerSelection;
use crate::{Result, ViewConfig, ViewError};

/// View model over every employee's tasks.
pub struct ManagerView {
    api: Arc<dyn TaskApi>,
    session: Session,
    collection: TaskCollection,
    query: QueryState,
    selection: ManagerSelection,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl ManagerView {
    /// Create the view for a manager session. Nothing is fetched yet.
    pub fn new(api: Arc<dyn TaskApi>, session: Session, config: &ViewConfig) -> Result<Self> {
        authorize(&session, Action::ChangeStatus)?;
        Ok(Self {
            api,
            session,
            collection: TaskCollection::new(),
            query: QueryState::new(config.page_size),
            selection: ManagerSelection::Idle,
            notice: None,
            notice_ttl: config.notice_ttl(),
        })
    }

    /// Session the view acts for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Local copy of all tasks.
    pub fn tasks(&self) -> &[Task] {
        self.collection.tasks()
    }

    /// Current query inputs.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Current selection.
    pub fn selection(&self) -> &ManagerSelection {
        &self.selection
    }

    /// Rows to display.
    pub fn view(&self) -> View {
        self.query.view(self.collection.tasks())
    }

    /// Confirmation message, while it is still showing.
    pub fn notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| !n.is_expired())
            .map(Notice::message)
    }

    /// Replace the structured filter.
    pub fn set_filter(&mut self, filter: Option<FilterNode>) {
        self.query.set_filter(filter);
    }

    /// Clear the structured filter, keeping the overlays.
    pub fn reset_filter(&mut self) {
        self.query.reset_filter();
    }

    /// Search by employee name. Blank text turns the search off.
    pub fn set_employee_name(&mut self, name: impl Into<String>) {
        let overlays = Overlays {
            employee_name: Some(name.into()),
            ..self.query.overlays().clone()
        };
        self.query.set_overlays(overlays);
    }

    /// Show only tasks in `status`, or every status for `None`.
    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        let overlays = Overlays {
            status,
            ..self.query.overlays().clone()
        };
        self.query.set_overlays(overlays);
    }

    /// Clear both overlays, keeping the structured filter.
    pub fn reset_overlays(&mut self) {
        self.query.reset_overlays();
    }

    /// Replace the sort.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.query.set_sort(sort);
    }

    /// Move the window.
    pub fn set_page(&mut self, page: PageRequest) {
        self.query.set_page(page);
    }

    /// Fetch all tasks and replace the local collection.
    pub async fn load(&mut self) -> Result<()> {
        let ticket = self.collection.issue();
        let tasks = match Scope::All.fetch(self.api.as_ref(), &self.session).await {
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

    /// Clear the status filter and reload.
    pub async fn refresh(&mut self) -> Result<()> {
        self.set_status_filter(None);
        self.load().await
    }

    /// Open a task for review. Returns the statuses it can be moved to.
    pub fn select_task(&mut self, id: &TaskId) -> Result<Vec<TaskStatus>> {
        let task = self
            .collection
            .get(id)
            .cloned()
            .ok_or_else(|| ViewError::NoSuchTask(id.clone()))?;
        let targets = allowed_targets(task.status);
        self.selection = ManagerSelection::TaskSelected(task);
        Ok(targets)
    }

    /// Approve the open task.
    pub async fn approve(&mut self) -> Result<Transition> {
        self.transition(TaskStatus::Approved).await
    }

    /// Reject the open task.
    pub async fn reject(&mut self) -> Result<Transition> {
        self.transition(TaskStatus::Rejected).await
    }

    /// Close the open task without changing it.
    pub fn close(&mut self) {
        self.selection = ManagerSelection::Idle;
    }

    async fn transition(&mut self, target: TaskStatus) -> Result<Transition> {
        let task = match &self.selection {
            ManagerSelection::TaskSelected(task) => task.clone(),
            ManagerSelection::Idle => {
                return Err(ViewError::Selection { action: "change status", state: "idle" })
            }
        };

        let transition = plan_transition(&self.session, &task, target)?;
        let to = match transition {
            Transition::Change { to, .. } => to,
            Transition::Unchanged(status) => {
                debug!("Task {} is already {}", task.id, status);
                self.selection = ManagerSelection::Idle;
                return Ok(transition);
            }
        };

        self.api.update_status(&self.session, &task.id, to).await?;
        info!("Task {} moved from {} to {}", task.id, task.status, to);

        self.selection = ManagerSelection::Idle;
        self.notice = Some(Notice::new(notice_text(to), self.notice_ttl));
        self.load().await?;
        Ok(transition)
    }
}

fn notice_text(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Approved => "Task approved successfully.",
        TaskStatus::Rejected => "Task rejected successfully.",
        TaskStatus::Pending => "Task updated successfully.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use worklog_backend::{InMemoryTaskApi, Operation};
    use worklog_core::{Credentials, Role, UserId, WorkflowError};
    use worklog_query::Field;

    fn task(owner: i64, name: Option<&str>, status: TaskStatus, day: Option<u32>) -> Task {
        Task {
            id: TaskId::from(0),
            title: "Report".to_string(),
            date: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 3, d)),
            hours_worked: 8,
            status,
            user_id: UserId::from(owner),
            user_name: name.map(str::to_string),
        }
    }

    async fn setup() -> (Arc<InMemoryTaskApi>, ManagerView, Vec<TaskId>) {
        let api = Arc::new(
            InMemoryTaskApi::new()
                .with_user("ana", "pw", 1, "Ana", Role::Employee)
                .with_user("boss", "pw", 9, "Boss", Role::Manager),
        );
        let ids = vec![
            api.seed(task(1, Some("Ana Smith"), TaskStatus::Pending, Some(3))).await,
            api.seed(task(2, Some("Bob Jones"), TaskStatus::Approved, Some(1))).await,
            api.seed(task(3, None, TaskStatus::Rejected, None)).await,
        ];
        let session = api.login(&Credentials::new("boss", "pw")).await.unwrap();
        let mut view = ManagerView::new(api.clone(), session, &ViewConfig::default()).unwrap();
        view.load().await.unwrap();
        (api, view, ids)
    }

    #[tokio::test]
    async fn test_employee_cannot_open_manager_view() {
        let api = Arc::new(InMemoryTaskApi::new().with_user("ana", "pw", 1, "Ana", Role::Employee));
        let session = api.login(&Credentials::new("ana", "pw")).await.unwrap();
        let err = ManagerView::new(api, session, &ViewConfig::default()).err().unwrap();
        assert!(matches!(err, ViewError::Workflow(WorkflowError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_approve_flips_status_and_refetches() {
        let (api, mut view, ids) = setup().await;

        let targets = view.select_task(&ids[0]).unwrap();
        assert_eq!(targets, vec![TaskStatus::Approved, TaskStatus::Rejected]);

        let transition = view.approve().await.unwrap();
        assert!(transition.is_change());
        assert_eq!(view.selection(), &ManagerSelection::Idle);
        assert_eq!(view.tasks()[0].status, TaskStatus::Approved);
        assert_eq!(api.calls(Operation::AllTasks).await, 2);
    }

    #[tokio::test]
    async fn test_same_state_is_a_no_op() {
        let (api, mut view, ids) = setup().await;

        view.select_task(&ids[1]).unwrap();
        let transition = view.approve().await.unwrap();

        assert_eq!(transition, Transition::Unchanged(TaskStatus::Approved));
        assert_eq!(api.calls(Operation::UpdateStatus).await, 0);
        assert_eq!(api.calls(Operation::AllTasks).await, 1);
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_rejected_can_be_approved_again() {
        let (_, mut view, ids) = setup().await;
        view.select_task(&ids[2]).unwrap();
        view.approve().await.unwrap();
        assert_eq!(view.tasks()[2].status, TaskStatus::Approved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires() {
        let (_, mut view, ids) = setup().await;
        view.select_task(&ids[0]).unwrap();
        view.reject().await.unwrap();
        assert_eq!(view.notice(), Some("Task rejected successfully."));

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_failed_transition_keeps_state() {
        let (api, mut view, ids) = setup().await;
        view.select_task(&ids[0]).unwrap();
        api.fail_next(Operation::UpdateStatus, 1).await;

        assert!(view.approve().await.is_err());
        assert!(matches!(view.selection(), ManagerSelection::TaskSelected(_)));
        assert_eq!(view.tasks()[0].status, TaskStatus::Pending);
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_transition_needs_selection() {
        let (_, mut view, ids) = setup().await;
        assert!(matches!(view.reject().await, Err(ViewError::Selection { .. })));

        view.select_task(&ids[0]).unwrap();
        view.close();
        assert!(view.approve().await.is_err());
    }

    #[tokio::test]
    async fn test_overlays() {
        let (_, mut view, _) = setup().await;

        view.set_status_filter(Some(TaskStatus::Approved));
        let shown = view.view();
        assert_eq!(shown.total, 1);
        assert_eq!(shown.rows[0].status, TaskStatus::Approved);

        view.set_status_filter(None);
        view.set_employee_name("SMITH");
        assert_eq!(view.view().total, 1);

        view.set_employee_name("  ");
        assert_eq!(view.view().total, 3);

        view.set_status_filter(Some(TaskStatus::Rejected));
        view.refresh().await.unwrap();
        assert_eq!(view.query().overlays().status, None);
        assert_eq!(view.view().total, 3);
    }

    #[tokio::test]
    async fn test_undated_sorts_first() {
        let (_, mut view, _) = setup().await;
        view.set_sort(Some(SortSpec::descending(Field::Date)));
        let rows = view.view().rows;
        assert_eq!(rows[0].date, None);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 3, 3));
    }
}
