//! Tasks and their lifecycle.
//!
//! A [`Task`] is created in memory with an id of `0`, receives a durable id on
//! its first save through a [`TaskDao`], and is removed for good on delete.
//! [`TaskService`] is the entry point callers are expected to use: it stamps
//! timestamps and runs [`validate`] before anything reaches storage.

use chrono::{DateTime, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub mod dao;
pub mod service;
pub mod validator;

pub use dao::{SeaOrmTaskDao, StorageError, TaskDao};
pub use service::{TaskService, TaskServiceError};
pub use validator::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN, ValidationError, validate};

/// Id carried by a task that has not been persisted yet.
pub const NEW_TASK_ID: i32 = 0;

/// The phase a task is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Returns the canonical name stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the canonical status names.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown task status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A single unit of work.
///
/// Identity is the `id` alone: two tasks compare equal when their ids match,
/// whatever their other fields hold.
#[derive(Debug, Clone)]
pub struct Task {
    id: i32,
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: i32,
        title: String,
        description: Option<String>,
        status: Option<TaskStatus>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the task, `0` when it has never been saved.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns `true` if the task has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id == NEW_TASK_ID
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_status(&mut self, status: Option<TaskStatus>) {
        self.status = status;
    }

    pub(crate) fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn task(id: i32, title: &str, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task::new(id, title.to_string(), None, Some(status), now, now)
    }

    #[test]
    fn status_names_round_trip_through_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_parsing_rejects_unknown_and_differently_cased_names() {
        assert_eq!(
            "BLOCKED".parse::<TaskStatus>(),
            Err(ParseStatusError("BLOCKED".to_string()))
        );
        assert!("todo".parse::<TaskStatus>().is_err());
        assert!("InProgress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_displays_canonical_name() {
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn tasks_with_same_id_are_equal_regardless_of_fields() {
        let a = task(7, "Write report", TaskStatus::Todo);
        let b = task(7, "Something else", TaskStatus::Done);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn tasks_with_different_ids_are_not_equal() {
        let a = task(1, "Same title", TaskStatus::Todo);
        let b = task(2, "Same title", TaskStatus::Todo);
        assert_ne!(a, b);
    }

    #[test]
    fn new_task_has_zero_id() {
        let draft = task(NEW_TASK_ID, "Draft", TaskStatus::Todo);
        assert!(draft.is_new());
        assert!(!draft.with_id(3).is_new());
    }
}
