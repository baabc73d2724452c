use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use taskboard_core::{
    filter::{FilterState, StatusFilter},
    models::{Task, TaskId},
    protocol::{CreateTaskRequest, UpdateTaskRequest},
};

use crate::{
    errors::ClientResult,
    notify::{Notification, Notifier, Severity},
    remote::RemoteTaskService,
};

const FAILED_TO_LOAD: &str = "Failed to load tasks. Please try again.";

/// Lifecycle of the list view. Mutations never transition this machine;
/// only refreshes do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Which placeholder an empty Ready list should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoTasks,
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoTasks => "No tasks yet. Start by adding one!",
            EmptyState::NoMatches => "No matching tasks found.",
        }
    }
}

/// Point-in-time read of the store. The presentation layer renders from
/// this; it never reaches into the store's own state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub filter: FilterState,
}

impl Snapshot {
    /// `Some` only when a finished load came back empty; distinguishes the
    /// first-run placeholder from "your filters matched nothing".
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.phase != LoadPhase::Ready || !self.tasks.is_empty() {
            return None;
        }
        if self.filter.is_active() {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NoTasks)
        }
    }
}

#[derive(Debug)]
struct StoreState {
    tasks: Vec<Task>,
    phase: LoadPhase,
    error: Option<String>,
    filter: FilterState,
}

/// The authoritative in-memory projection of "tasks matching the current
/// filters", plus orchestration of every mutating operation against the
/// remote service.
///
/// Cloning is cheap (shared handles) so operations can be issued from
/// concurrent tasks, but all writes funnel through these methods; nothing
/// else touches the list.
#[derive(Debug, Clone)]
pub struct TaskStore {
    remote: Arc<RemoteTaskService>,
    state: Arc<Mutex<StoreState>>,
    generation: Arc<AtomicU64>,
    notifier: Notifier,
}

impl TaskStore {
    pub fn new(remote: RemoteTaskService) -> Self {
        Self {
            remote: Arc::new(remote),
            state: Arc::new(Mutex::new(StoreState {
                tasks: Vec::new(),
                phase: LoadPhase::Idle,
                error: None,
                filter: FilterState::default(),
            })),
            generation: Arc::new(AtomicU64::new(0)),
            notifier: Notifier::new(),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Receiver for transient success/failure notifications.
    pub fn notifications(&self) -> watch::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        Snapshot {
            tasks: state.tasks.clone(),
            phase: state.phase,
            error: state.error.clone(),
            filter: state.filter.clone(),
        }
    }

    /// Re-fetch the list for the current filters and replace it wholesale.
    ///
    /// Each refresh claims the next request generation before going to the
    /// network; if the counter has moved on by the time the response lands,
    /// the response no longer matches the current filters and is dropped.
    /// On failure the previous list is retained and an inline error is set
    /// until the next successful refresh.
    pub async fn refresh(&self) {
        let (generation, query) = {
            let mut state = self.state.lock().await;
            state.phase = LoadPhase::Loading;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (generation, state.filter.to_query())
        };

        let result = self.remote.list(&query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale list response");
            return;
        }

        let mut state = self.state.lock().await;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "list refreshed");
                state.tasks = tasks;
                state.phase = LoadPhase::Ready;
                state.error = None;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to refresh task list");
                state.phase = LoadPhase::Failed;
                state.error = Some(FAILED_TO_LOAD.to_string());
            }
        }
    }

    /// `onSearchChange` intent: every keystroke-level change re-fetches.
    pub async fn set_search(&self, search: impl Into<String>) {
        {
            let mut state = self.state.lock().await;
            state.filter.search = search.into();
        }
        self.refresh().await;
    }

    /// `onStatusFilterChange` intent.
    pub async fn set_status_filter(&self, status: StatusFilter) {
        {
            let mut state = self.state.lock().await;
            state.filter.status = status;
        }
        self.refresh().await;
    }

    /// Flip a task's completion flag. The server's record is the source of
    /// truth for every field, not just `completed`; on failure the list is
    /// left exactly as it was.
    pub async fn toggle_complete(&self, id: &TaskId, completed: bool) {
        match self
            .remote
            .update(id, &UpdateTaskRequest::completion(completed))
            .await
        {
            Ok(canonical) => {
                self.install(canonical).await;
                let message = if completed {
                    "Task completed"
                } else {
                    "Task reopened"
                };
                self.notifier.show(message, Severity::Success);
            }
            Err(error) => {
                tracing::warn!(%id, %error, "failed to toggle task");
                self.notifier.show("Failed to update task status", Severity::Error);
            }
        }
    }

    /// Delete a task. A failure (including not-found on a repeat call)
    /// leaves the list untouched, so the operation is idempotent in effect.
    pub async fn remove(&self, id: &TaskId) {
        match self.remote.delete(id).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.tasks.retain(|task| task.id != *id);
                drop(state);
                self.notifier.show("Task deleted", Severity::Success);
            }
            Err(error) => {
                tracing::warn!(%id, %error, "failed to delete task");
                self.notifier.show("Failed to delete task", Severity::Error);
            }
        }
    }

    /// Create a task and append the server's canonical record. Failures are
    /// returned to the caller (the edit form renders them inline) rather
    /// than raised as a notification.
    pub async fn create(&self, title: String, description: String) -> ClientResult<Task> {
        let task = self
            .remote
            .create(&CreateTaskRequest::new(title, description))
            .await?;
        {
            let mut state = self.state.lock().await;
            state.tasks.push(task.clone());
        }
        self.notifier.show("Task added", Severity::Success);
        Ok(task)
    }

    /// Rewrite a task's title and description, leaving `completed` alone.
    /// Failures are returned to the caller; the local record stays as-is.
    pub async fn update(
        &self,
        id: &TaskId,
        title: String,
        description: String,
    ) -> ClientResult<Task> {
        let task = self
            .remote
            .update(id, &UpdateTaskRequest::content(title, description))
            .await?;
        self.install(task.clone()).await;
        self.notifier.show("Task updated", Severity::Success);
        Ok(task)
    }

    /// Replace the record matching `task.id` with the server's canonical
    /// version. If the record left the list in the meantime (a concurrent
    /// refresh under different filters), there is nothing to patch.
    async fn install(&self, task: Task) {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }
}
