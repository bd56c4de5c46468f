//! A small task tracker that keeps its tasks in a JSON file.
//!
//! Each invocation loads the list, runs at most one command and saves the
//! list again. See [`app::run`].

pub mod app;
pub mod command;
pub mod config;
pub mod render;
pub mod storage;
pub mod task;

pub use command::{Cli, CommandError};
pub use storage::{JsonFileStore, StorageError, TaskStore};
pub use task::{Status, Task, TaskError, TaskRepository};
