use super::{Task, TaskStatus};
use crate::entities::task;
use async_trait::async_trait;
use sea_orm::*;

/// Error type for TaskDao operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Represents a failure reported by the database driver.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// Represents a stored status that is not one of the known names.
    #[error("Task {id} has unknown status '{value}' in storage")]
    UnknownStatus { id: i32, value: String },
    /// Represents an attempt to write a task that has no status.
    #[error("Task {0} has no status and cannot be stored")]
    MissingStatus(i32),
}

/// Persistence operations for tasks.
///
/// Every call runs a single statement on a connection borrowed from the pool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskDao: Send + Sync {
    /// Inserts the task when its id is `0` and returns it with the generated id,
    /// otherwise updates the matching row and returns the task as given.
    async fn save(&self, task: Task) -> Result<Task, StorageError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, StorageError>;

    /// Returns every task, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<Task>, StorageError>;

    /// Returns the tasks with the given status, ordered by ascending id.
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StorageError>;

    /// Returns the tasks whose title or description contains `query`, ignoring
    /// case, ordered by ascending id. An empty query matches every task.
    async fn search(&self, query: &str) -> Result<Vec<Task>, StorageError>;

    /// Removes the task with the given id. Missing ids are not an error.
    async fn delete(&self, id: i32) -> Result<(), StorageError>;
}

impl TryFrom<task::Model> for Task {
    type Error = StorageError;

    fn try_from(model: task::Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<TaskStatus>()
            .map_err(|err| StorageError::UnknownStatus {
                id: model.id,
                value: err.0,
            })?;
        Ok(Task::new(
            model.id,
            model.title,
            model.description,
            Some(status),
            model.created_at,
            model.updated_at,
        ))
    }
}

fn into_tasks(models: Vec<task::Model>) -> Result<Vec<Task>, StorageError> {
    models.into_iter().map(Task::try_from).collect()
}

/// Case folding happens here rather than in SQL: SQLite's `LOWER` only
/// folds ASCII. `needle` must already be lowercase.
fn contains_ignore_case(model: &task::Model, needle: &str) -> bool {
    model.title.to_lowercase().contains(needle)
        || model
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

/// [`TaskDao`] backed by a SeaORM connection pool.
pub struct SeaOrmTaskDao<'a> {
    db: &'a DatabaseConnection,
}

impl SeaOrmTaskDao<'_> {
    pub fn new(db: &DatabaseConnection) -> SeaOrmTaskDao<'_> {
        SeaOrmTaskDao { db }
    }

    async fn insert(&self, task: Task, status: TaskStatus) -> Result<Task, StorageError> {
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(task.title().to_string()),
            description: ActiveValue::Set(task.description().map(str::to_string)),
            status: ActiveValue::Set(status.as_str().to_string()),
            created_at: ActiveValue::Set(task.created_at()),
            updated_at: ActiveValue::Set(task.updated_at()),
            ..Default::default()
        };
        let result = task::Entity::insert(active_model).exec(self.db).await?;
        tracing::info!("Inserted task with ID {}", result.last_insert_id);
        Ok(task.with_id(result.last_insert_id))
    }

    async fn update(&self, task: Task, status: TaskStatus) -> Result<Task, StorageError> {
        let changes = task::ActiveModel {
            title: ActiveValue::Set(task.title().to_string()),
            description: ActiveValue::Set(task.description().map(str::to_string)),
            status: ActiveValue::Set(status.as_str().to_string()),
            updated_at: ActiveValue::Set(task.updated_at()),
            ..Default::default()
        };
        let result = task::Entity::update_many()
            .set(changes)
            .filter(task::Column::Id.eq(task.id()))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            tracing::warn!("Update matched no task with ID {}", task.id());
        }
        Ok(task)
    }
}

#[async_trait]
impl TaskDao for SeaOrmTaskDao<'_> {
    #[tracing::instrument(skip(self, task), fields(task_id = task.id()))]
    async fn save(&self, task: Task) -> Result<Task, StorageError> {
        let status = task.status().ok_or(StorageError::MissingStatus(task.id()))?;
        if task.is_new() {
            self.insert(task, status).await
        } else {
            self.update(task, status).await
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, StorageError> {
        task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Task>, StorageError> {
        let models = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?;
        tracing::debug!("Loaded {} tasks", models.len());
        into_tasks(models)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, StorageError> {
        let models = task::Entity::find()
            .filter(task::Column::Status.eq(status.as_str()))
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?;
        tracing::debug!("Loaded {} tasks with status {}", models.len(), status);
        into_tasks(models)
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Task>, StorageError> {
        if query.is_empty() {
            return self.find_all().await;
        }

        let needle = query.to_lowercase();
        let models: Vec<task::Model> = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .filter(|model| contains_ignore_case(model, &needle))
            .collect();
        tracing::debug!("Search matched {} tasks", models.len());
        into_tasks(models)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), StorageError> {
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            tracing::debug!("No task with ID {} to delete", id);
        } else {
            tracing::info!("Deleted task with ID {}", id);
        }
        Ok(())
    }
}
