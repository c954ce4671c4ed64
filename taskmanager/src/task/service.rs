use super::dao::{StorageError, TaskDao};
use super::validator::{ValidationError, validate};
use super::{NEW_TASK_ID, Task, TaskStatus};
use chrono::{DateTime, SubsecRound, Utc};

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents invalid input; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Represents a storage or connectivity failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Current time at the microsecond precision the database keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Validates and timestamps tasks around a [`TaskDao`].
pub struct TaskService<D> {
    dao: D,
}

impl<D: TaskDao> TaskService<D> {
    pub fn new(dao: D) -> Self {
        TaskService { dao }
    }

    /// Creates a new task and stores it.
    /// # Arguments
    ///
    /// * `title` - The title of the task.
    /// * `description` - An optional longer description.
    /// * `status` - The initial status of the task.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task` with its generated ID, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        title: String,
        description: Option<String>,
        status: Option<TaskStatus>,
    ) -> Result<Task, TaskServiceError> {
        let now = now();
        let task = Task::new(NEW_TASK_ID, title, description, status, now, now);
        validate(&task)?;
        let created = self.dao.save(task).await?;
        tracing::info!("Created task with ID {}", created.id());
        Ok(created)
    }

    /// Stores changes made to an existing task.
    ///
    /// The update timestamp is refreshed; the creation timestamp is left as is.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task`, or an error otherwise.
    #[tracing::instrument(skip(self, task), fields(task_id = task.id()))]
    pub async fn update_task(&self, mut task: Task) -> Result<Task, TaskServiceError> {
        task.touch(now());
        validate(&task)?;
        Ok(self.dao.save(task).await?)
    }

    /// Deletes a task by its ID. Deleting an ID that does not exist succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: i32) -> Result<(), TaskServiceError> {
        Ok(self.dao.delete(id).await?)
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, id: i32) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.dao.find_by_id(id).await?)
    }

    /// Retrieves all tasks, ordered by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.dao.find_all().await?)
    }

    /// Retrieves the tasks with the given status, ordered by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_tasks_by_status(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.dao.find_by_status(status).await?)
    }

    /// Retrieves the tasks whose title or description contains `query`, ignoring case.
    #[tracing::instrument(skip(self))]
    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.dao.search(query).await?)
    }
}
