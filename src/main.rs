use std::path::PathBuf;
use std::process::ExitCode;

use meshbox::{app, config, logging};

fn main() -> ExitCode {
    logging::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    tracing::info!(config = %path.display(), "starting");

    let result = config::Config::load(&path).and_then(app::run);
    match result {
        Ok(()) => {
            tracing::info!("exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}
