//! Kanban board for one project.

use taskboard_client::{ApiClient, ApiError};
use taskboard_core::board::{Column, columns, is_move};
use taskboard_core::{EntityId, Label, Task, TaskFilter, TaskRequest, TaskStatus};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Errors raised by [`BoardService`].
#[derive(Debug, Error)]
pub enum BoardError {
    /// The server call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A label id is not part of the project's label set.
    #[error("label {label_id} does not belong to this project")]
    ForeignLabel {
        /// Offending label id.
        label_id: EntityId,
    },
}

/// Tasks and labels of one project, kept in sync with the server.
#[derive(Debug)]
pub struct BoardService {
    client: ApiClient,
    project_id: EntityId,
    tasks: Vec<Task>,
    labels: Option<Vec<Label>>,
}

impl BoardService {
    /// Empty board for `project_id`; call [`load`](Self::load) to fill it.
    #[must_use]
    pub const fn new(client: ApiClient, project_id: EntityId) -> Self {
        Self {
            client,
            project_id,
            tasks: Vec::new(),
            labels: None,
        }
    }

    /// Fetch the project's tasks and labels.
    ///
    /// # Errors
    /// Propagates the first failing request; previous state is kept.
    pub async fn load(&mut self) -> Result<(), BoardError> {
        let tasks = self.client.project_tasks(self.project_id).await?;
        let labels = self.client.project_labels(self.project_id).await?;
        debug!(
            "loaded {} tasks and {} labels for project {}",
            tasks.len(),
            labels.len(),
            self.project_id
        );
        self.tasks = tasks;
        self.labels = Some(labels);
        Ok(())
    }

    /// Project this board belongs to.
    #[must_use]
    pub const fn project_id(&self) -> EntityId {
        self.project_id
    }

    /// Tasks in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Project labels, once loaded.
    #[must_use]
    pub fn labels(&self) -> Option<&[Label]> {
        self.labels.as_deref()
    }

    /// Filtered tasks grouped into the fixed status columns.
    #[must_use]
    pub fn columns(&self, filter: &TaskFilter, now: OffsetDateTime) -> Vec<Column> {
        columns(&filter.apply(&self.tasks, now))
    }

    /// Move a task to another column.
    ///
    /// Returns `Ok(false)` when the task is unknown or already in `target`.
    /// The local copy changes only after the server accepted the update.
    ///
    /// # Errors
    /// Returns the API error or a foreign-label error; local state is untouched.
    pub async fn move_task(&mut self, task_id: EntityId, target: TaskStatus) -> Result<bool, BoardError> {
        if !is_move(&self.tasks, task_id, target) {
            return Ok(false);
        }
        let Some(task) = self.tasks.iter().find(|task| task.id == task_id) else {
            return Ok(false);
        };

        let mut request = TaskRequest::from_task(task, self.project_id);
        request.status = target;
        self.check_labels(&request)?;

        self.client.update_task(task_id, &request).await?;
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) {
            task.status = target;
        }
        info!("moved task {task_id} to {target}");
        Ok(true)
    }

    /// Create a task in this project.
    ///
    /// # Errors
    /// Returns a foreign-label error before sending, or the API error.
    pub async fn create_task(&mut self, mut request: TaskRequest) -> Result<Task, BoardError> {
        request.project_id = self.project_id;
        self.check_labels(&request)?;
        let task = self.client.create_task(&request).await?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn check_labels(&self, request: &TaskRequest) -> Result<(), BoardError> {
        let (Some(labels), Some(ids)) = (&self.labels, &request.label_ids) else {
            return Ok(());
        };
        match ids
            .iter()
            .find(|id| !labels.iter().any(|label| label.id == **id))
        {
            Some(&label_id) => Err(BoardError::ForeignLabel { label_id }),
            None => Ok(()),
        }
    }
}
