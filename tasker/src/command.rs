//! Command-line flags and the single-shot dispatcher.
//!
//! Flags are not mutually exclusive at parse time. [`Cli::action`] picks one
//! of them in a fixed priority order and [`dispatch`] runs exactly that one.

use crate::render;
use crate::task::{Status, TaskError, TaskRepository};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, instrument};

const USAGE: &str = "\
  --list
      List all tasks

  --add --title \"Title\" --description \"Description\"
      Create a new task (a title is required)

  --update <ID> --title \"New title\" --description \"New description\"
      Update an existing task (at least one attribute is required)

  --delete <ID>
      Delete an existing task

  --pending <ID>
      Mark an existing task as Pending

  --in-progress <ID>
      Mark an existing task as InProgress

  --completed <ID>
      Mark an existing task as Completed

  --file <PATH>
      Use PATH as the task file for this invocation

  --help
      Show this list of commands
";

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("task list is not available")]
    EmptyCollection,
    #[error("not run because the task file could not be loaded")]
    SkippedAfterLoadFailure,
    #[error("{action}: {source}")]
    Task {
        action: &'static str,
        #[source]
        source: TaskError,
    },
}

impl CommandError {
    /// The domain error behind a failed mutation, if any.
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            CommandError::Task { source, .. } => Some(source),
            CommandError::EmptyCollection | CommandError::SkippedAfterLoadFailure => None,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(about = "Keep track of tasks from the command line", disable_help_flag = true)]
pub struct Cli {
    /// Show the list of commands
    #[arg(long)]
    pub help: bool,

    /// List all tasks
    #[arg(long)]
    pub list: bool,

    /// Create a new task, requires --title
    #[arg(long)]
    pub add: bool,

    /// Update the task with this ID
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub update: u32,

    /// Delete the task with this ID
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub delete: u32,

    /// Mark the task with this ID as pending
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub pending: u32,

    /// Mark the task with this ID as in progress
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub in_progress: u32,

    /// Mark the task with this ID as completed
    #[arg(long, value_name = "ID", default_value_t = 0)]
    pub completed: u32,

    /// Task title, used by --add and --update
    #[arg(long, default_value = "")]
    pub title: String,

    /// Task description, used by --add and --update
    #[arg(long, default_value = "")]
    pub description: String,

    /// Task file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// The one thing an invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    Help,
    List,
    Add {
        title: &'a str,
        description: &'a str,
    },
    Update {
        id: u32,
        title: &'a str,
        description: &'a str,
    },
    Delete(u32),
    ChangeStatus(u32, Status),
    Unrecognized,
}

impl Action<'_> {
    /// Whether running the action changes the task list.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::Help | Action::List | Action::Unrecognized)
    }
}

impl Cli {
    /// Resolves the flags into a single action.
    ///
    /// Priority: help, list, add, update, delete, pending, in-progress,
    /// completed. The first selected flag wins.
    pub fn action(&self) -> Action<'_> {
        if self.help {
            Action::Help
        } else if self.list {
            Action::List
        } else if self.add {
            Action::Add {
                title: &self.title,
                description: &self.description,
            }
        } else if self.update != 0 {
            Action::Update {
                id: self.update,
                title: &self.title,
                description: &self.description,
            }
        } else if self.delete != 0 {
            Action::Delete(self.delete)
        } else if self.pending != 0 {
            Action::ChangeStatus(self.pending, Status::Pending)
        } else if self.in_progress != 0 {
            Action::ChangeStatus(self.in_progress, Status::InProgress)
        } else if self.completed != 0 {
            Action::ChangeStatus(self.completed, Status::Completed)
        } else {
            Action::Unrecognized
        }
    }
}

pub fn usage() -> &'static str {
    USAGE
}

/// Runs the action selected by `cli` against `tasks`, writing user-facing
/// output to `out`.
///
/// Fails with [`CommandError::EmptyCollection`] before looking at any flag when
/// there is no task list. Domain errors come back wrapped with the name of the
/// failed operation.
#[instrument(skip_all)]
pub fn dispatch(
    cli: &Cli,
    tasks: Option<&mut TaskRepository>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let tasks = tasks.ok_or(CommandError::EmptyCollection)?;
    let action = cli.action();
    debug!(?action, "dispatching");

    match action {
        Action::Help => write_output(out, format_args!("{}", usage())),
        Action::List => write_output(out, format_args!("{}\n", render::task_table(tasks))),
        Action::Add { title, description } => {
            let id = tasks
                .add(title.to_string(), description.to_string())
                .map_err(wrap("failed to create task"))?;
            write_output(out, format_args!("Task {id} created: \"{title}\"\n"));
        }
        Action::Update {
            id,
            title,
            description,
        } => {
            tasks
                .update(id, title, description)
                .map_err(wrap("failed to update task"))?;
            write_output(out, format_args!("Task {id} updated\n"));
        }
        Action::Delete(id) => {
            tasks.delete(id).map_err(wrap("failed to delete task"))?;
            write_output(out, format_args!("Task {id} deleted\n"));
        }
        Action::ChangeStatus(id, status) => {
            tasks
                .change_status(id, status)
                .map_err(wrap("failed to change task status"))?;
            write_output(out, format_args!("Task {id} marked as \"{status}\"\n"));
        }
        Action::Unrecognized => write_output(
            out,
            format_args!("Unrecognized command\nUse --help to see the list of valid commands\n"),
        ),
    }
    Ok(())
}

fn wrap(action: &'static str) -> impl FnOnce(TaskError) -> CommandError {
    move |source| CommandError::Task { action, source }
}

// Output is best effort: the mutation has already happened and must still be saved.
fn write_output(out: &mut impl Write, args: std::fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(args) {
        tracing::warn!("cannot write command output: {e}");
    }
}
