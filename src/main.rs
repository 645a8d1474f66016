use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};

use catalog::{upload, Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration; a missing file means defaults plus environment
    let mut config = if Path::new(CONFIG_PATH).exists() {
        match Config::load(CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_PATH}: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Config::default()
    };
    config.apply_env_overrides();

    if let Err(e) = catalog::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        catalog::logging::init_console_only(&config.logging.level);
    }

    info!("Catalog service starting");

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let db = match Database::connect(&config.database.url, config.database.max_connections).await
    {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let images = match upload::from_config(&config.uploads) {
        Ok(images) => images,
        Err(e) => {
            error!("Failed to initialize image uploads: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match WebServer::new(&config, db, images) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = server.run(shutdown).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
