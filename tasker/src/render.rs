//! Table rendering for `--list`.

use crate::task::{Status, Task, TaskRepository};
use chrono::{DateTime, Local, Utc};
use comfy_table::{Cell, Table};

const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

pub const HEADER: [&str; 7] = [
    "ID",
    "Title",
    "Description",
    "Created",
    "Updated",
    "Status",
    "Completed",
];

/// One rendered line of the task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created: String,
    pub updated: String,
    pub status: String,
    pub completed: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let completed = match (task.status(), task.completed_at()) {
            (Status::Completed, Some(at)) => format_time(at),
            _ => String::new(),
        };
        Self {
            id: task.id().to_string(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            created: format_time(task.created_at()),
            updated: format_time(task.updated_at()),
            status: task.status().label().to_string(),
            completed,
        }
    }
}

impl TaskRow {
    fn into_cells(self) -> [Cell; 7] {
        [
            Cell::new(self.id),
            Cell::new(self.title),
            Cell::new(self.description),
            Cell::new(self.created),
            Cell::new(self.updated),
            Cell::new(self.status),
            Cell::new(self.completed),
        ]
    }
}

/// Rows for every visible task, in creation order.
pub fn rows(tasks: &TaskRepository) -> impl Iterator<Item = TaskRow> + '_ {
    tasks.visible().map(TaskRow::from)
}

pub fn task_table(tasks: &TaskRepository) -> Table {
    let mut table = Table::new();
    table.set_header(HEADER);
    for row in rows(tasks) {
        table.add_row(row.into_cells());
    }
    table
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIME_FORMAT).to_string()
}
