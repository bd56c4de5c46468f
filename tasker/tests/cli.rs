use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn tasker(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tasker").expect("binary should build");
    cmd.current_dir(dir.path())
        .env_remove("TASKER_DATA_FILE")
        .env_remove("TASKER_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn first_run_without_flags_prints_hint() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;

    tasker(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("--help"))
        .stderr(predicate::str::is_empty());

    dir.child("tasks.json").assert(predicate::str::contains("[]"));
    Ok(())
}

#[test]
fn add_then_list() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;

    tasker(&dir)
        .args(["--add", "--title", "Buy milk", "--description", "semi-skimmed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1 created"));

    tasker(&dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk").and(predicate::str::contains("semi-skimmed")));
    Ok(())
}

#[test]
fn deleted_tasks_stay_in_file_but_not_in_list() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    tasker(&dir).args(["--add", "--title", "Keep me"]).assert().success();
    tasker(&dir).args(["--add", "--title", "Drop me"]).assert().success();

    tasker(&dir).args(["--delete", "2"]).assert().success();

    tasker(&dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me").and(predicate::str::contains("Drop me").not()));
    dir.child("tasks.json")
        .assert(predicate::str::contains("Drop me").and(predicate::str::contains("\"visible\": false")));
    Ok(())
}

#[test]
fn failed_command_reports_error_and_fails() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    tasker(&dir).args(["--add", "--title", "Only"]).assert().success();
    tasker(&dir).args(["--delete", "1"]).assert().success();

    tasker(&dir)
        .args(["--delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to delete task: task 1 not found"));
    Ok(())
}

#[test]
fn status_change_survives_reload() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    tasker(&dir).args(["--add", "--title", "Ship it"]).assert().success();

    tasker(&dir)
        .args(["--completed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"));

    tasker(&dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"));
    dir.child("tasks.json")
        .assert(predicate::str::contains("\"status\": 2"));
    Ok(())
}

#[test]
fn file_flag_and_env_choose_the_task_file() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;

    tasker(&dir)
        .args(["--file", "flag.json", "--add", "--title", "From flag"])
        .assert()
        .success();
    tasker(&dir)
        .env("TASKER_DATA_FILE", "env.json")
        .args(["--add", "--title", "From env"])
        .assert()
        .success();

    dir.child("flag.json").assert(predicate::str::contains("From flag"));
    dir.child("env.json").assert(predicate::str::contains("From env"));
    dir.child("tasks.json").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn corrupt_file_is_not_overwritten() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let file = dir.child("tasks.json");
    file.write_str("not json")?;

    tasker(&dir)
        .args(["--add", "--title", "Lost"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("created").not())
        .stderr(predicate::str::contains("could not load tasks"));

    file.assert("not json");
    Ok(())
}

#[test]
fn command_error_is_reported_once() -> anyhow::Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let message = "failed to delete task: invalid task id 1";

    tasker(&dir)
        .args(["--delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::function(move |stderr: &str| {
            stderr.matches(message).count() == 1
        }));
    Ok(())
}
