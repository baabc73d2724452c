use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use taskboard_core::models::{Task, TaskId};
use taskboard_core::protocol::{CreateTaskRequest, ListQuery, UpdateTaskRequest};

/// In-process stand-in for the task service, implementing the `/todos`
/// REST surface with the real backend's semantics. Tests steer it through
/// the handle: seed records, inject failures, delay list responses to force
/// out-of-order delivery, and inspect every request it received.
pub struct MockServer {
    pub addr: SocketAddr,
    state: MockState,
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Default)]
struct MockInner {
    tasks: Vec<Task>,
    next_id: u64,
    requests: Vec<String>,
    fail_lists: bool,
    fail_creates: bool,
    fail_updates: bool,
    fail_deletes: bool,
    // Keyed by the `search` parameter value ("" for none).
    list_delays: HashMap<String, Duration>,
}

#[allow(dead_code)]
impl MockServer {
    /// Start the server on a random port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/todos", get(list_todos).post(create_todo))
            .route(
                "/todos/:id",
                get(get_todo).put(update_todo).delete(delete_todo),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a record directly, bypassing the HTTP surface.
    pub fn seed(&self, title: &str, description: &str, completed: bool) -> Task {
        self.state
            .inner
            .lock()
            .unwrap()
            .admit(title, Some(description.to_string()), completed)
    }

    /// Server-side view of the stored records.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.inner.lock().unwrap().tasks.clone()
    }

    /// Mutate a stored record out-of-band, as another writer would.
    pub fn set_description(&self, id: &TaskId, description: &str) {
        let mut inner = self.state.inner.lock().unwrap();
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == *id) {
            task.description = Some(description.to_string());
            task.updated_at = Utc::now();
        }
    }

    /// Every request received so far, as "METHOD /path?query" lines.
    pub fn requests(&self) -> Vec<String> {
        self.state.inner.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.inner.lock().unwrap().requests.len()
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_lists = fail;
    }

    pub fn fail_creates(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_creates = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_updates = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_deletes = fail;
    }

    /// Delay list responses whose `search` parameter equals `search`.
    pub fn delay_list(&self, search: &str, delay: Duration) {
        self.state
            .inner
            .lock()
            .unwrap()
            .list_delays
            .insert(search.to_string(), delay);
    }
}

impl MockInner {
    fn admit(&mut self, title: &str, description: Option<String>, completed: bool) -> Task {
        self.next_id += 1;
        let now = Utc::now();
        let task = Task {
            id: TaskId::from(self.next_id.to_string()),
            title: title.to_string(),
            description,
            completed,
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task.clone());
        task
    }
}

fn server_error() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "Internal server error" })),
    )
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Todo not found" })),
    )
}

async fn list_todos(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let (delay, fail) = {
        let mut inner = state.inner.lock().unwrap();
        inner.requests.push(format!("GET {uri}"));
        let key = query.search.clone().unwrap_or_default();
        (inner.list_delays.get(&key).copied(), inner.fail_lists)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return server_error().into_response();
    }

    let inner = state.inner.lock().unwrap();
    let needle = query.search.as_deref().unwrap_or("").to_lowercase();
    let todos: Vec<Task> = inner
        .tasks
        .iter()
        .filter(|task| {
            needle.is_empty()
                || task.title.to_lowercase().contains(&needle)
                || task
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .filter(|task| query.completed.is_none_or(|wanted| task.completed == wanted))
        .cloned()
        .collect();

    let count = todos.len();
    Json(json!({ "todos": todos, "count": count })).into_response()
}

async fn get_todo(State(state): State<MockState>, Path(id): Path<String>) -> impl IntoResponse {
    let inner = state.inner.lock().unwrap();
    match inner.tasks.iter().find(|t| t.id.as_str() == id) {
        Some(task) => Json(task.clone()).into_response(),
        None => not_found().into_response(),
    }
}

async fn create_todo(
    State(state): State<MockState>,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    let mut inner = state.inner.lock().unwrap();
    inner.requests.push("POST /todos".to_string());
    if inner.fail_creates {
        return server_error().into_response();
    }
    let task = inner.admit(&request.title, request.description, request.completed);
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn update_todo(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    let mut inner = state.inner.lock().unwrap();
    inner.requests.push(format!("PUT /todos/{id}"));
    if inner.fail_updates {
        return server_error().into_response();
    }
    match inner.tasks.iter_mut().find(|t| t.id.as_str() == id) {
        Some(task) => {
            if let Some(title) = request.title {
                task.title = title;
            }
            if let Some(description) = request.description {
                task.description = Some(description);
            }
            if let Some(completed) = request.completed {
                task.completed = completed;
            }
            task.updated_at = Utc::now();
            Json(task.clone()).into_response()
        }
        None => not_found().into_response(),
    }
}

async fn delete_todo(State(state): State<MockState>, Path(id): Path<String>) -> impl IntoResponse {
    let mut inner = state.inner.lock().unwrap();
    inner.requests.push(format!("DELETE /todos/{id}"));
    if inner.fail_deletes {
        return server_error().into_response();
    }
    let before = inner.tasks.len();
    inner.tasks.retain(|t| t.id.as_str() != id);
    if inner.tasks.len() == before {
        return not_found().into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
