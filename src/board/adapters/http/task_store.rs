//! HTTP/JSON task store adapter.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET tasks?project_id=..`, `GET tasks?assignee_id=..`, `GET tasks`
//! - `GET tasks/{id}`
//! - `PATCH tasks/{id}` with body `{"status": ".."}`
//!
//! Bodies are read as text and passed through the strict record decoder, so
//! a body that is not a record list surfaces as
//! [`TaskStoreError::Malformed`] rather than a transport error.

use crate::board::{
    domain::{ActorId, ProjectId, TaskId, TaskRecord, decode_task, decode_task_list},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use crate::config::HttpStoreConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// Task store backed by a REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl HttpTaskStore {
    /// Creates a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the base URL is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: &HttpStoreConfig) -> TaskStoreResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(TaskStoreError::transport)?;
        if base_url.cannot_be_a_base() {
            return Err(TaskStoreError::transport_message(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(TaskStoreError::transport)?;

        Ok(Self {
            client,
            base_url,
            bearer_token: config.bearer_token.clone(),
            timeout: config.timeout(),
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> TaskStoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TaskStoreError::transport_message("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> TaskStoreResult<Response> {
        let authorized = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        authorized.send().await.map_err(|err| self.map_error(err))
    }

    async fn read_body(&self, response: Response) -> TaskStoreResult<String> {
        let checked = response
            .error_for_status()
            .map_err(|err| self.map_error(err))?;
        checked.text().await.map_err(|err| self.map_error(err))
    }

    fn map_error(&self, err: reqwest::Error) -> TaskStoreError {
        if err.is_timeout() {
            warn!(timeout = ?self.timeout, "task store request timed out");
            return TaskStoreError::TimedOut(self.timeout);
        }
        warn!(error = %err, "task store request failed");
        TaskStoreError::transport(err)
    }

    async fn fetch_list(&self, filter: Option<(&str, &str)>) -> TaskStoreResult<Vec<TaskRecord>> {
        let url = self.endpoint(&["tasks"])?;
        debug!(%url, ?filter, "fetching task list");
        let mut request = self.client.get(url);
        if let Some(pair) = filter {
            request = request.query(&[pair]);
        }
        let response = self.send(request).await?;
        let body = self.read_body(response).await?;
        Ok(decode_task_list(&body)?)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn fetch_tasks_by_project(
        &self,
        project: &ProjectId,
    ) -> TaskStoreResult<Vec<TaskRecord>> {
        self.fetch_list(Some(("project_id", project.as_str()))).await
    }

    async fn fetch_tasks_by_assignee(&self, owner: &ActorId) -> TaskStoreResult<Vec<TaskRecord>> {
        self.fetch_list(Some(("assignee_id", owner.as_str()))).await
    }

    async fn fetch_all_tasks(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.fetch_list(None).await
    }

    async fn update_task_status(&self, task_id: &TaskId, new_status: &str) -> TaskStoreResult<()> {
        let url = self.endpoint(&["tasks", task_id.as_str()])?;
        debug!(%url, status = new_status, "writing task status");
        let request = self
            .client
            .patch(url)
            .json(&StatusUpdate { status: new_status });
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TaskStoreError::NotFound(task_id.clone()));
        }
        self.read_body(response).await?;
        Ok(())
    }

    async fn fetch_task_by_id(&self, task_id: &TaskId) -> TaskStoreResult<TaskRecord> {
        let url = self.endpoint(&["tasks", task_id.as_str()])?;
        debug!(%url, "fetching task");
        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(TaskStoreError::NotFound(task_id.clone()));
        }
        let body = self.read_body(response).await?;
        Ok(decode_task(&body)?)
    }
}
