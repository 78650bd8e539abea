//! Worklog CLI - record hours and review them.

mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use worklog_backend::{HttpTaskApi, TaskApi};
use worklog_core::{AuthContext, Credentials, Role, Session, TaskDraft, TaskId, TaskStatus, Transition};
use worklog_query::{Condition, FilterNode, PageRequest, SortSpec, View};
use worklog_views::{EmployeeView, ManagerView, ViewConfig, ViewError};
use settings::Settings;

#[derive(Parser)]
#[command(name = "worklog")]
#[command(about = "Record work hours and approve them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend API root
    #[arg(long, global = true, env = "WORKLOG_API_URL")]
    api_url: Option<String>,

    /// Login name
    #[arg(long, short, global = true, env = "WORKLOG_USERNAME")]
    username: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "WORKLOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List your own tasks
    Mine {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Record hours
    Add {
        /// What you worked on
        title: String,
        /// Day worked (YYYY-MM-DD or MM/DD/YYYY)
        date: String,
        /// Whole hours
        hours: String,
    },
    /// Change one of your tasks
    Edit {
        /// Task ID
        id: TaskId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New day
        #[arg(long)]
        date: Option<String>,
        /// New hours
        #[arg(long)]
        hours: Option<String>,
    },
    /// Delete one of your tasks
    Delete {
        /// Task ID
        id: TaskId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List every employee's tasks (manager)
    All {
        #[command(flatten)]
        query: QueryArgs,
        /// Only employees whose name contains this text
        #[arg(long)]
        employee: Option<String>,
        /// Only tasks in this status
        #[arg(long)]
        status: Option<String>,
    },
    /// Approve a task (manager)
    Approve {
        /// Task ID
        id: TaskId,
    },
    /// Reject a task (manager)
    Reject {
        /// Task ID
        id: TaskId,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Filter expression, e.g. "hours >= 4" (repeatable)
    #[arg(long = "where", value_name = "EXPR")]
    conditions: Vec<String>,
    /// Match any filter instead of all
    #[arg(long)]
    any: bool,
    /// Sort column, e.g. "date:desc"
    #[arg(long)]
    sort: Option<String>,
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,
    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,
}

impl QueryArgs {
    fn filter(&self) -> Result<Option<FilterNode>> {
        if self.conditions.is_empty() {
            return Ok(None);
        }
        let nodes = self
            .conditions
            .iter()
            .map(|expr| {
                expr.parse::<Condition>()
                    .map(FilterNode::from)
                    .with_context(|| format!("bad filter '{}'", expr))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(if self.any { FilterNode::any(nodes) } else { FilterNode::all(nodes) }))
    }

    fn sort(&self) -> Result<Option<SortSpec>> {
        self.sort
            .as_deref()
            .map(|s| s.parse::<SortSpec>().with_context(|| format!("bad sort '{}'", s)))
            .transpose()
    }

    fn page(&self, config: &ViewConfig) -> PageRequest {
        let size = self.page_size.unwrap_or(config.page_size);
        PageRequest::page(self.page.saturating_sub(1), size)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        settings.backend.base_url = url.clone();
    }
    debug!("Using backend at {}", settings.backend.base_url);

    let api: Arc<dyn TaskApi> = Arc::new(HttpTaskApi::new(&settings.backend)?);
    let mut auth = AuthContext::new();
    auth.login(login(api.as_ref(), &cli, &settings).await?);

    match run(cli.command, api, &auth, &settings, cli.json).await {
        Err(e) if session_expired(&e) => {
            if let Some(session) = auth.logout() {
                debug!("Dropped session for {}: {:#}", session.user_name, e);
            }
            bail!("session expired, log in again")
        }
        other => other,
    }
}

async fn run(command: Commands, api: Arc<dyn TaskApi>, auth: &AuthContext, settings: &Settings, json: bool) -> Result<()> {
    match command {
        Commands::Mine { query } => {
            let mut view = employee_view(api, auth, &settings.view).await?;
            view.set_filter(query.filter()?);
            view.set_sort(query.sort()?);
            view.set_page(query.page(&settings.view));
            print_view(&view.view(), json)?;
        }
        Commands::Add { title, date, hours } => {
            let mut view = employee_view(api, auth, &settings.view).await?;
            let task = view.create(&TaskDraft::new(title, date, hours)).await?;
            println!("Added task {} ({})", task.id, task.status);
        }
        Commands::Edit { id, title, date, hours } => {
            let mut view = employee_view(api, auth, &settings.view).await?;
            view.select_row(&id)?;
            let mut draft = view.choose_edit()?;
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(date) = date {
                draft.date = date;
            }
            if let Some(hours) = hours {
                draft.hours_worked = hours;
            }
            let task = view.submit_edit(&draft).await?;
            println!("Updated task {}", task.id);
        }
        Commands::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete task {} without --yes", id);
            }
            let mut view = employee_view(api, auth, &settings.view).await?;
            view.select_row(&id)?;
            view.choose_delete()?;
            view.confirm_delete().await?;
            println!("Deleted task {}", id);
        }
        Commands::All { query, employee, status } => {
            let mut view = manager_view(api, auth, &settings.view).await?;
            view.set_filter(query.filter()?);
            if let Some(name) = employee {
                view.set_employee_name(name);
            }
            if let Some(status) = status {
                let status: TaskStatus = status.parse()?;
                view.set_status_filter(Some(status));
            }
            view.set_sort(query.sort()?);
            view.set_page(query.page(&settings.view));
            print_view(&view.view(), json)?;
        }
        Commands::Approve { id } => {
            let mut view = manager_view(api, auth, &settings.view).await?;
            review(&mut view, &id, TaskStatus::Approved).await?;
        }
        Commands::Reject { id } => {
            let mut view = manager_view(api, auth, &settings.view).await?;
            review(&mut view, &id, TaskStatus::Rejected).await?;
        }
    }

    Ok(())
}

/// Whether `error` came from a request the backend refused as unauthorized.
fn session_expired(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.downcast_ref::<ViewError>().is_some_and(ViewError::requires_login))
}

async fn login(api: &dyn TaskApi, cli: &Cli, settings: &Settings) -> Result<Session> {
    let Some(username) = cli.username.clone().or_else(|| settings.username.clone()) else {
        bail!("no username given; use --username or WORKLOG_USERNAME");
    };
    let Some(password) = cli.password.clone() else {
        bail!("no password given; use --password or WORKLOG_PASSWORD");
    };
    let session = api.login(&Credentials::new(username, password)).await?;
    Ok(session)
}

async fn employee_view(api: Arc<dyn TaskApi>, auth: &AuthContext, config: &ViewConfig) -> Result<EmployeeView> {
    let Some(session) = auth.session_for(Role::Employee) else {
        bail!("this command is for employees");
    };
    let mut view = EmployeeView::new(api, session.clone(), config)?;
    view.load().await.context("failed to load your tasks")?;
    Ok(view)
}

async fn manager_view(api: Arc<dyn TaskApi>, auth: &AuthContext, config: &ViewConfig) -> Result<ManagerView> {
    let Some(session) = auth.session_for(Role::Manager) else {
        bail!("this command is for managers");
    };
    let mut view = ManagerView::new(api, session.clone(), config)?;
    view.load().await.context("failed to load tasks")?;
    Ok(view)
}

async fn review(view: &mut ManagerView, id: &TaskId, status: TaskStatus) -> Result<()> {
    view.select_task(id)?;
    let transition = match status {
        TaskStatus::Rejected => view.reject().await?,
        _ => view.approve().await?,
    };
    match transition {
        Transition::Unchanged(status) => println!("Task {} is already {}", id, status),
        Transition::Change { .. } => {
            println!("{}", view.notice().unwrap_or("Task updated."));
        }
    }
    Ok(())
}

fn print_view(view: &View, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!("Tasks ({} shown of {})", view.rows.len(), view.total);
    for task in &view.rows {
        println!(
            "  {} | {} | {} | {}h | {} | {}",
            task.id,
            task.date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            format_status(task.status),
            task.hours_worked,
            task.user_name.as_deref().unwrap_or("-"),
            task.title,
        );
    }
    Ok(())
}

fn format_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PENDING",
        TaskStatus::Approved => "APPROVED",
        TaskStatus::Rejected => "REJECTED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_backend::RequestError;

    fn query(args: &[&str]) -> QueryArgs {
        let mut argv = vec!["worklog", "--password", "x", "mine"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Mine { query } => query,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_where_clauses_are_combined() {
        let q = query(&["--where", "hours >= 4", "--where", "status = Approved", "--any"]);
        match q.filter().unwrap() {
            Some(FilterNode::Group { filters, .. }) => assert_eq!(filters.len(), 2),
            other => panic!("unexpected filter: {other:?}"),
        }
        assert!(query(&[]).filter().unwrap().is_none());
        assert!(query(&["--where", "date contains 2024"]).filter().is_err());
    }

    #[test]
    fn test_page_is_one_based() {
        let q = query(&["--page", "3", "--page-size", "5"]);
        assert_eq!(q.page(&ViewConfig::default()), PageRequest::page(2, 5));
        assert_eq!(query(&[]).page(&ViewConfig::default()).limit, 10);
    }

    #[test]
    fn test_unauthorized_means_session_expired() {
        let expired = anyhow::Error::from(ViewError::from(RequestError::Unauthorized));
        assert!(session_expired(&expired));
        assert!(session_expired(&expired.context("failed to load tasks")));

        let missing = anyhow::Error::from(ViewError::from(RequestError::NotFound("task 3".into())));
        assert!(!session_expired(&missing));
        assert!(!session_expired(&anyhow::anyhow!("this command is for managers")));
    }

    #[test]
    fn test_sort() {
        assert!(query(&["--sort", "date:desc"]).sort().unwrap().is_some());
        assert!(query(&["--sort", "nonsense"]).sort().is_err());
    }
}
