//! Task records and the ordered repository that owns them.
//!
//! Identifiers are 1-based positions in the repository. Tasks are never
//! removed or reordered: deleting a task only hides it, so an identifier keeps
//! pointing at the same record for the lifetime of the data file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised by repository operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("invalid task id {0}")]
    InvalidIdentifier(u32),
    #[error("task {0} not found")]
    NotFound(u32),
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("at least one of title or description must be provided")]
    EmptyFields,
    #[error("invalid task status {0}")]
    InvalidStatus(u8),
    #[error("task at position {position} has id {id}")]
    MisplacedIdentifier { position: usize, id: u32 },
}

#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "InProgress",
            Status::Completed => "Completed",
        }
    }

    /// Label for a raw persisted status code, `Unknown` when the code is not
    /// one of the three known statuses.
    pub fn label_for_code(code: u8) -> &'static str {
        Status::try_from(code).map_or("Unknown", Status::label)
    }
}

impl TryFrom<u8> for Status {
    type Error = TaskError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Status::Pending),
            1 => Ok(Status::InProgress),
            2 => Ok(Status::Completed),
            other => Err(TaskError::InvalidStatus(other)),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => 0,
            Status::InProgress => 1,
            Status::Completed => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
pub struct Task {
    id: u32,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    status: Status,
    visible: bool,
}

impl Task {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Set only while the task is [`Status::Completed`].
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// `false` once the task has been deleted.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Ordered collection of every task ever created, deleted ones included.
///
/// Serialized as a plain JSON array. Deserializing rejects arrays whose ids
/// do not run 1, 2, 3, ... in order.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct TaskRepository {
    tasks: Vec<Task>,
}

impl TryFrom<Vec<Task>> for TaskRepository {
    type Error = TaskError;

    fn try_from(tasks: Vec<Task>) -> Result<Self, Self::Error> {
        for (index, task) in tasks.iter().enumerate() {
            let position = index + 1;
            if task.id as usize != position {
                return Err(TaskError::MisplacedIdentifier {
                    position,
                    id: task.id,
                });
            }
        }
        Ok(Self { tasks })
    }
}

impl<'de> Deserialize<'de> for TaskRepository {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tasks = Vec::<Task>::deserialize(deserializer)?;
        Self::try_from(tasks).map_err(serde::de::Error::custom)
    }
}

impl TaskRepository {
    pub fn new() -> Self {
        Self { tasks: vec![] }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a task by id, hidden tasks included.
    pub fn get(&self, id: u32) -> Option<&Task> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.tasks.get(index)
    }

    /// Checks that `id` names a task that exists and has not been deleted.
    ///
    /// Every operation targeting an existing task runs this first.
    pub fn validate_id(&self, id: u32) -> Result<(), TaskError> {
        self.index_of(id).map(|_| ())
    }

    /// Appends a new pending task and returns its id.
    ///
    /// Only the empty string is rejected; a title made of spaces is kept as-is.
    pub fn add(&mut self, title: String, description: String) -> Result<u32, TaskError> {
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let id = self.next_id();
        let now = Utc::now();
        self.tasks.push(Task {
            id,
            title,
            description,
            created_at: now,
            updated_at: now,
            completed_at: None,
            status: Status::Pending,
            visible: true,
        });
        debug!(id, "task added");
        Ok(id)
    }

    /// Replaces the non-empty fields of a task. An empty string leaves the
    /// corresponding field untouched.
    pub fn update(&mut self, id: u32, title: &str, description: &str) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        if title.is_empty() && description.is_empty() {
            return Err(TaskError::EmptyFields);
        }

        let task = &mut self.tasks[index];
        if !title.is_empty() {
            task.title = title.to_string();
        }
        if !description.is_empty() {
            task.description = description.to_string();
        }
        task.updated_at = Utc::now();
        debug!(id, "task updated");
        Ok(())
    }

    /// Hides a task. The record stays in place so ids never shift.
    pub fn delete(&mut self, id: u32) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        task.visible = false;
        task.updated_at = Utc::now();
        debug!(id, "task deleted");
        Ok(())
    }

    pub fn change_status(&mut self, id: u32, status: Status) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        let now = Utc::now();
        let task = &mut self.tasks[index];
        task.status = status;
        task.completed_at = match status {
            Status::Completed => Some(now),
            Status::Pending | Status::InProgress => None,
        };
        task.updated_at = now;
        debug!(id, %status, "task status changed");
        Ok(())
    }

    /// Same as [`change_status`](Self::change_status) for a raw status code.
    /// The id is validated before the code.
    pub fn change_status_code(&mut self, id: u32, code: u8) -> Result<(), TaskError> {
        self.validate_id(id)?;
        let status = Status::try_from(code)?;
        self.change_status(id, status)
    }

    /// Visible tasks in creation order. Each call starts a fresh pass.
    pub fn visible(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(|task| task.visible)
    }

    fn next_id(&self) -> u32 {
        u32::try_from(self.tasks.len()).map_or(u32::MAX, |len| len.saturating_add(1))
    }

    fn index_of(&self, id: u32) -> Result<usize, TaskError> {
        let task = self.get(id).ok_or(TaskError::InvalidIdentifier(id))?;
        if !task.visible {
            return Err(TaskError::NotFound(id));
        }
        Ok(id as usize - 1)
    }
}
