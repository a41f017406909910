//! Grimoire - script content platform service
//!
//! Async backend serving script CRUD and the bulk import pipeline.

use grimoire::config::Config;
use grimoire::server;
use grimoire::utils::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args().nth(1);
    let config = match Config::load(config_path.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_tracing(&config.logging.level);

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
