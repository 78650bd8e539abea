//! HTTP implementation of [`TaskApi`] over the backend's REST endpoints.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::json;
use tracing::{debug, info};
use worklog_core::{Credentials, Session, Task, TaskId, TaskStatus};
use super::wire::{normalize_all, LoginResponse, RawTask};
use super::{BackendConfig, NewTask, RequestError, Result, TaskApi, TaskUpdate};

/// REST client for the work-log backend.
#[derive(Clone)]
pub struct HttpTaskApi {
    /// HTTP client
    client: Client,

    /// API root
    base_url: Url,
}

impl HttpTaskApi {
    /// Create a client from settings.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RequestError::InvalidUrl(config.base_url.clone()));
        }
        let client = ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Append `segments` to the API root. Each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str], session: &Session) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url.path());
        Ok(self.client.request(method, url).bearer_auth(session.token()))
    }

    /// Send `request` and map non-success statuses onto [`RequestError`].
    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RequestError::Unauthorized,
            StatusCode::NOT_FOUND => RequestError::NotFound(body),
            _ => RequestError::Status { status: status.as_u16(), body },
        })
    }

    async fn fetch(&self, segments: &[&str], session: &Session) -> Result<Vec<Task>> {
        let response = Self::send(self.request(Method::GET, segments, session)?).await?;
        let raw: Vec<RawTask> = response.json().await?;
        debug!("Fetched {} tasks", raw.len());
        normalize_all(raw)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let request = self
            .client
            .post(self.url(&["Auth", "login"])?)
            .json(&json!({
                "username": credentials.username,
                "password": credentials.password,
            }));

        let response = match Self::send(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Login failed: {}", e);
                return Err(RequestError::InvalidCredentials);
            }
        };
        let body: LoginResponse = response.json().await.map_err(|e| {
            debug!("Login response unreadable: {}", e);
            RequestError::InvalidCredentials
        })?;
        let session = body.into_session()?;
        info!("Logged in as {} ({})", session.user_name, session.role);
        Ok(session)
    }

    async fn my_tasks(&self, session: &Session) -> Result<Vec<Task>> {
        self.fetch(&["task", "my-tasks"], session).await
    }

    async fn all_tasks(&self, session: &Session) -> Result<Vec<Task>> {
        self.fetch(&["task", "all"], session).await
    }

    async fn create_task(&self, session: &Session, task: &NewTask) -> Result<Task> {
        let response = Self::send(self.request(Method::POST, &["task"], session)?.json(task)).await?;
        let raw: RawTask = response.json().await?;
        raw.normalize()
    }

    async fn update_task(&self, session: &Session, update: &TaskUpdate) -> Result<Task> {
        let id = update.id.to_string();
        let response = Self::send(self.request(Method::PUT, &["task", &id], session)?.json(update)).await?;
        let raw: RawTask = response.json().await?;
        raw.normalize()
    }

    async fn delete_task(&self, session: &Session, id: &TaskId) -> Result<()> {
        let id = id.to_string();
        Self::send(self.request(Method::DELETE, &["task", &id], session)?).await?;
        Ok(())
    }

    async fn update_status(&self, session: &Session, id: &TaskId, status: TaskStatus) -> Result<()> {
        Self::send(
            self.request(Method::PUT, &["task", "status"], session)?
                .query(&[("id", id.to_string())])
                .json(&json!({ "status": status })),
        )
        .await?;
        Ok(())
    }
}
