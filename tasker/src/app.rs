//! One invocation: load, dispatch, save.

use crate::command::{self, Cli, CommandError};
use crate::storage::{self, StorageError, TaskStore};
use crate::task::TaskRepository;
use std::io::Write;
use tracing::{debug, instrument};

/// What went wrong during a run, phase by phase.
#[derive(Debug, Default)]
pub struct Report {
    pub load: Option<StorageError>,
    pub command: Option<CommandError>,
    pub save: Option<StorageError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.load.is_none() && self.command.is_none() && self.save.is_none()
    }

    /// Every error of the run with a short description of the failed phase.
    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &dyn std::error::Error)> + '_ {
        let load = self
            .load
            .as_ref()
            .map(|e| ("could not load tasks", e as &dyn std::error::Error));
        let command = self
            .command
            .as_ref()
            .map(|e| ("could not execute command", e as &dyn std::error::Error));
        let save = self
            .save
            .as_ref()
            .map(|e| ("could not save tasks", e as &dyn std::error::Error));
        load.into_iter().chain(command).chain(save)
    }
}

/// Runs one command against the tasks held by `store`.
///
/// A command error does not stop the save. A load error does: the list in
/// memory is then empty and saving it would wipe the unreadable file. For the
/// same reason a command that changes the list is not run after a load error.
///
/// Errors are only traced here; reporting them to the user is up to the caller.
#[instrument(skip_all)]
pub fn run<S: TaskStore + ?Sized>(cli: &Cli, store: &S, out: &mut impl Write) -> Report {
    let mut tasks = TaskRepository::new();
    let mut report = Report::default();

    if let Err(e) = storage::load_into(store, Some(&mut tasks)) {
        debug!("cannot load tasks: {e}");
        report.load = Some(e);
    }

    let dispatched = if report.load.is_some() && cli.action().is_mutation() {
        Err(CommandError::SkippedAfterLoadFailure)
    } else {
        command::dispatch(cli, Some(&mut tasks), out)
    };
    if let Err(e) = dispatched {
        debug!("cannot execute command: {e}");
        report.command = Some(e);
    }

    let saved = if report.load.is_some() {
        Err(StorageError::SkippedAfterLoadFailure)
    } else {
        store.save(&tasks)
    };
    if let Err(e) = saved {
        debug!("cannot save tasks: {e}");
        report.save = Some(e);
    }

    report
}
