//! Persistence of the task list.

use crate::task::TaskRepository;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no task file configured")]
    EmptyPath,
    #[error("no task list to load into")]
    NilTarget,
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("not saved because the task file could not be loaded")]
    SkippedAfterLoadFailure,
}

/// A place the task list is loaded from and saved to.
#[cfg_attr(test, mockall::automock)]
pub trait TaskStore {
    /// Replaces `target` with the stored list. Leaves it untouched when
    /// nothing has been stored yet.
    fn load(&self, target: &mut TaskRepository) -> Result<(), StorageError>;

    /// Writes the whole list, hidden tasks included.
    fn save(&self, tasks: &TaskRepository) -> Result<(), StorageError>;
}

/// Loads into an optional target, failing with [`StorageError::NilTarget`]
/// when there is none.
pub fn load_into<S: TaskStore + ?Sized>(
    store: &S,
    target: Option<&mut TaskRepository>,
) -> Result<(), StorageError> {
    let target = target.ok_or(StorageError::NilTarget)?;
    store.load(target)
}

/// Stores tasks as a pretty-printed JSON array in a single file.
///
/// There is no locking: two processes writing the same file race and the
/// last writer wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn checked_path(&self) -> Result<&Path, StorageError> {
        if self.path.as_os_str().is_empty() {
            return Err(StorageError::EmptyPath);
        }
        Ok(&self.path)
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> StorageError {
        StorageError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskStore for JsonFileStore {
    #[instrument(skip(target), fields(path = %self.path.display()))]
    fn load(&self, target: &mut TaskRepository) -> Result<(), StorageError> {
        let path = self.checked_path()?;
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("task file does not exist yet, starting with an empty list");
                return Ok(());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        *target = serde_json::from_str(&contents).map_err(|e| self.json_error(e))?;
        info!(count = target.len(), "tasks loaded");
        Ok(())
    }

    #[instrument(skip(tasks), fields(path = %self.path.display()))]
    fn save(&self, tasks: &TaskRepository) -> Result<(), StorageError> {
        let path = self.checked_path()?;
        let contents = serde_json::to_string_pretty(tasks).map_err(|e| self.json_error(e))?;
        fs::write(path, contents).map_err(|e| self.io_error(e))?;
        info!(count = tasks.len(), "tasks saved");
        Ok(())
    }
}
