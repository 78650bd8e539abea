//! In-memory implementation of [`TaskApi`].
//!
//! Mirrors the backend's behaviour closely enough to drive view models
//! without a server: it assigns ids, forces new tasks to Pending, checks
//! ownership and roles, and counts calls. Failures can be injected per
//! operation.

use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use worklog_core::{Credentials, Role, Session, Task, TaskId, TaskStatus, UserId};
use super::{NewTask, RequestError, Result, TaskApi, TaskUpdate};

/// Backend operations, for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST Auth/login`
    Login,
    /// `GET task/my-tasks`
    MyTasks,
    /// `GET task/all`
    AllTasks,
    /// `POST task`
    Create,
    /// `PUT task/{id}`
    Update,
    /// `DELETE task/{id}`
    Delete,
    /// `PUT task/status`
    UpdateStatus,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    id: UserId,
    name: String,
    role: Role,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, UserId>,
    tasks: Vec<Task>,
    next_id: i64,
    next_token: u64,
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, usize>,
}

impl MemoryState {
    fn record(&mut self, op: Operation) -> Result<()> {
        *self.calls.entry(op).or_default() += 1;
        if let Some(remaining) = self.failures.get_mut(&op) {
            if *remaining > 0 {
                *remaining -= 1;
                debug!("Injected failure for {:?}", op);
                return Err(RequestError::Status {
                    status: 503,
                    body: "injected failure".to_string(),
                });
            }
        }
        Ok(())
    }

    fn account(&self, session: &Session) -> Result<&Account> {
        let user = self.sessions.get(session.token()).ok_or(RequestError::Unauthorized)?;
        self.accounts
            .values()
            .find(|a| &a.id == user)
            .ok_or(RequestError::Unauthorized)
    }

    fn require(&self, session: &Session, role: Role) -> Result<Account> {
        let account = self.account(session)?;
        if account.role == role {
            Ok(account.clone())
        } else {
            Err(RequestError::Unauthorized)
        }
    }

    fn position(&self, id: &TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| RequestError::NotFound(format!("task {}", id)))
    }

    fn owned_position(&self, session: &Session, id: &TaskId) -> Result<usize> {
        let account = self.require(session, Role::Employee)?;
        let index = self.position(id)?;
        if self.tasks[index].user_id != account.id {
            return Err(RequestError::Unauthorized);
        }
        Ok(index)
    }
}

/// Backend double holding everything in memory.
#[derive(Default)]
pub struct InMemoryTaskApi {
    state: Mutex<MemoryState>,
}

impl InMemoryTaskApi {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    pub fn with_user(
        mut self,
        username: &str,
        password: &str,
        id: impl Into<UserId>,
        name: &str,
        role: Role,
    ) -> Self {
        self.state.get_mut().accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                id: id.into(),
                name: name.to_string(),
                role,
            },
        );
        self
    }

    /// Insert a task as if it had been created earlier. A fresh id is assigned.
    pub async fn seed(&self, mut task: Task) -> TaskId {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        task.id = TaskId::from(state.next_id);
        let id = task.id.clone();
        state.tasks.push(task);
        id
    }

    /// Snapshot of stored tasks.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// Number of calls made for `op`.
    pub async fn calls(&self, op: Operation) -> usize {
        self.state.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Make the next `times` calls of `op` fail with a 503.
    pub async fn fail_next(&self, op: Operation, times: usize) {
        self.state.lock().await.failures.insert(op, times);
    }

    /// Invalidate every issued session.
    pub async fn expire_sessions(&self) {
        self.state.lock().await.sessions.clear();
    }
}

#[async_trait]
impl TaskApi for InMemoryTaskApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let mut state = self.state.lock().await;
        state.record(Operation::Login).map_err(|_| RequestError::InvalidCredentials)?;
        let account = state
            .accounts
            .get(&credentials.username)
            .filter(|a| a.password == credentials.password)
            .cloned()
            .ok_or(RequestError::InvalidCredentials)?;
        state.next_token += 1;
        let token = format!("token-{}-{}", account.id, state.next_token);
        state.sessions.insert(token.clone(), account.id.clone());
        Ok(Session::new(token, account.role, account.id, account.name))
    }

    async fn my_tasks(&self, session: &Session) -> Result<Vec<Task>> {
        let mut state = self.state.lock().await;
        state.record(Operation::MyTasks)?;
        let account = state.account(session)?.clone();
        Ok(state.tasks.iter().filter(|t| t.user_id == account.id).cloned().collect())
    }

    async fn all_tasks(&self, session: &Session) -> Result<Vec<Task>> {
        let mut state = self.state.lock().await;
        state.record(Operation::AllTasks)?;
        state.require(session, Role::Manager)?;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, session: &Session, task: &NewTask) -> Result<Task> {
        let mut state = self.state.lock().await;
        state.record(Operation::Create)?;
        let account = state.require(session, Role::Employee)?;
        if task.user_id != account.id {
            return Err(RequestError::Unauthorized);
        }
        state.next_id += 1;
        let created = Task {
            id: TaskId::from(state.next_id),
            title: task.title.clone(),
            date: Some(task.date),
            hours_worked: task.hours_worked,
            status: TaskStatus::Pending,
            user_id: account.id,
            user_name: Some(account.name),
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, session: &Session, update: &TaskUpdate) -> Result<Task> {
        let mut state = self.state.lock().await;
        state.record(Operation::Update)?;
        let index = state.owned_position(session, &update.id)?;
        let task = &mut state.tasks[index];
        task.title = update.title.clone();
        task.date = Some(update.date);
        task.hours_worked = update.hours_worked;
        Ok(task.clone())
    }

    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(Operation::Delete)?;
        let index = state.owned_position(session, id)?;
        state.tasks.remove(index);
        Ok(())
    }

    async fn update_status(&self, session: &Session, id: &TaskId, status: TaskStatus) -> Result<()> {
        let mut state = self.state.lock().await;
        state.record(Operation::UpdateStatus)?;
        state.require(session, Role::Manager)?;
        let index = state.position(id)?;
        state.tasks[index].status = status;
        Ok(())
    }
}
