use reqwest::{Response, StatusCode};
use serde::Deserialize;
use taskboard_core::{
    models::{Task, TaskId},
    protocol::{CreateTaskRequest, ListQuery, TaskListResponse, UpdateTaskRequest},
};

use crate::errors::{ClientError, ClientResult};

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Stateless REST gateway to the task service. One instance per server;
/// all store traffic goes through here.
#[derive(Debug, Clone)]
pub struct RemoteTaskService {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteTaskService {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`; the
    /// `/todos` collection path is appended per request.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn item_url(&self, id: &TaskId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    /// `GET /todos` with the composed filter parameters.
    pub async fn list(&self, query: &ListQuery) -> ClientResult<Vec<Task>> {
        tracing::debug!(?query, "fetching task list");
        let response = self
            .http
            .get(self.collection_url())
            .query(query)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let body: TaskListResponse = response.json().await?;
        Ok(body.todos)
    }

    /// `GET /todos/{id}`.
    pub async fn get(&self, id: &TaskId) -> ClientResult<Task> {
        let response = self.http.get(self.item_url(id)).send().await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    /// `POST /todos`. Returns the canonical record with the server-assigned id.
    pub async fn create(&self, request: &CreateTaskRequest) -> ClientResult<Task> {
        tracing::debug!(title = %request.title, "creating task");
        let response = self
            .http
            .post(self.collection_url())
            .json(request)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Ok(response.json().await?)
    }

    /// `PUT /todos/{id}` with a partial body. Returns the canonical
    /// post-mutation record.
    pub async fn update(&self, id: &TaskId, request: &UpdateTaskRequest) -> ClientResult<Task> {
        tracing::debug!(%id, "updating task");
        let response = self
            .http
            .put(self.item_url(id))
            .json(request)
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /todos/{id}`.
    pub async fn delete(&self, id: &TaskId) -> ClientResult<()> {
        tracing::debug!(%id, "deleting task");
        let response = self.http.delete(self.item_url(id)).send().await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    /// Map a non-2xx response to an error. A 404 on an id-addressed call
    /// becomes `NotFound`; everything else keeps the status plus the
    /// backend's `detail` message when one is present.
    async fn check(response: Response, id: Option<&TaskId>) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ClientError::NotFound(id.clone()));
            }
        }
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.detail)
            .unwrap_or(raw);
        tracing::warn!(%status, %message, "request rejected by server");
        Err(ClientError::Api { status, message })
    }
}
