//! Entrypoint: parses the fixed CLI flags and any dynamic `--source:NAME:KEY`
//! overrides, merges them over an optional `--config` YAML file, and runs
//! one `Driver` to completion or a clean halt.
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use ts_config::{split_source_flags, Cli};
use ts_driver::{AppError, Driver};

fn configure_logging() -> WorkerGuard {
    let log_dir = std::path::Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "ts-merge.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init();
    guard
}

fn main() -> std::process::ExitCode {
    let _log_guard = configure_logging();

    let args: Vec<String> = std::env::args().collect();
    let (fixed_args, raw_sources) = split_source_flags(&args);
    let cli = Cli::parse_from(fixed_args);

    let result = ts_config::load(cli, raw_sources)
        .map_err(AppError::from)
        .and_then(|config| {
            let mut driver = Driver::new(config)?;
            driver.run()
        });

    match result {
        Ok(flushed) => {
            tracing::info!(target: "ts-bin", flushed_timeslices = flushed, "run complete");
            std::process::ExitCode::from(0)
        }
        Err(AppError::Halted(source)) => {
            tracing::info!(target: "ts-bin", source = source.as_str(), "run halted cleanly");
            std::process::ExitCode::from(0)
        }
        Err(err) => {
            eprintln!("ts-merge: {err}");
            std::process::ExitCode::from(err.exit_code())
        }
    }
}
