use taskboard_core::{
    errors::validate_title,
    models::Task,
};

use crate::store::TaskStore;

const SUBMIT_FAILED: &str = "An error occurred. Please try again.";

/// Modal form state for adding or editing a task.
///
/// The session is the input boundary: it validates the title before any
/// network call, routes the mutation through the store, and keeps itself
/// open with a form-level error when the remote call fails. Completion is
/// never touched from here.
#[derive(Debug, Clone)]
pub struct EditSession {
    store: TaskStore,
    target: Option<Task>,
    title: String,
    description: String,
    error: Option<String>,
    open: bool,
}

impl EditSession {
    /// `onAddRequested` intent: an empty form.
    pub fn add(store: TaskStore) -> Self {
        Self {
            store,
            target: None,
            title: String::new(),
            description: String::new(),
            error: None,
            open: true,
        }
    }

    /// `onEdit` intent: a form pre-filled from an existing task.
    pub fn edit(store: TaskStore, task: Task) -> Self {
        Self {
            store,
            title: task.title.clone(),
            description: task.description_or_default().to_string(),
            target: Some(task),
            error: None,
            open: true,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_editing(&self) -> bool {
        self.target.is_some()
    }

    /// Persist the form. Returns the canonical record on success, after
    /// which the session is closed; on failure the session stays open and
    /// `error()` carries the form-level message. A whitespace-only title
    /// fails validation locally and never reaches the network.
    pub async fn submit(&mut self) -> Option<Task> {
        if let Err(error) = validate_title(&self.title) {
            self.error = Some(error.to_string());
            return None;
        }

        let result = match &self.target {
            Some(task) => {
                self.store
                    .update(&task.id, self.title.clone(), self.description.clone())
                    .await
            }
            None => {
                self.store
                    .create(self.title.clone(), self.description.clone())
                    .await
            }
        };

        match result {
            Ok(task) => {
                self.error = None;
                self.open = false;
                Some(task)
            }
            Err(error) => {
                tracing::warn!(%error, "form submission failed");
                self.error = Some(SUBMIT_FAILED.to_string());
                None
            }
        }
    }

    /// Close without saving.
    pub fn cancel(&mut self) {
        self.open = false;
    }
}
