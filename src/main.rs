//! radannotate — entry point.
//!
//! Startup sequence:
//!   1. Load `.env` and resolve config (fail fast, before any network use)
//!   2. Init logger at the configured level
//!   3. Build the annotator provider
//!   4. Serve the UI and API until ctrl-c

use radannotate::{config, error::AppError, logger, radgraph::providers, server};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = config::load()?;

    logger::init(&config.log_level)?;

    tracing::info!(
        provider = %config.provider,
        model_id = %config.model_id,
        bind = %config.bind,
        "config loaded"
    );

    let provider = providers::build(&config).map_err(|e| AppError::Config(e.to_string()))?;

    server::run(&config, provider).await
}
