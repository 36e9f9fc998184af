use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug, info};

use caffeine_diagrams_cli::{Args, error_adapter::report_failure};

fn main() -> ExitCode {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    match caffeine_diagrams_cli::run(&args) {
        Ok(()) => {
            info!("Caffeine diagrams written");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Nothing left to report to if stderr itself is gone
            let _ = report_failure(&err, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` is read first; `--log-level` then sets the global filter.
fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Unknown log level `{level}`, falling back to `info`");
        LevelFilter::Info
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();

    info!(log_level:? = filter; "Starting Caffeine diagram generator");
}
