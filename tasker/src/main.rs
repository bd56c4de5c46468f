use clap::Parser;
use std::io;
use std::process::ExitCode;
use tasker::config::Settings;
use tasker::{Cli, JsonFileStore};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    let settings = Settings::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let path = args.file.clone().unwrap_or(settings.data_file);
    let store = JsonFileStore::new(path);

    let report = tasker::app::run(&args, &store, &mut io::stdout().lock());
    for (phase, e) in report.errors() {
        eprintln!("{phase}: {e}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
