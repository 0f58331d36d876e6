use clap::Parser;
use hub_relay::error::RelayError;
use hub_relay::logging::setup_logging;
use hub_relay::messaging::HipChatClient;
use hub_relay::{AppState, RelayConfig, router};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match RelayConfig::try_parse() {
        Ok(cfg) => cfg,
        // prints help/version with exit code 0, usage errors with non-zero
        Err(e) => e.exit(),
    };

    let _log_guard = match setup_logging(config.log_dir.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: RelayConfig) -> Result<(), RelayError> {
    let hipchat = HipChatClient::new(
        config.hipchat_api_url.clone(),
        config.hipchat_key.clone(),
        config.hipchat_timeout(),
    )?;

    let bind_address = config.listen_addr.clone();
    info!("Relaying Docker Hub builds to HipChat room '{}'", config.hipchat_room);

    let state = Arc::new(AppState::new(config, Arc::new(hipchat)));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| RelayError::ConfigError(format!("Failed to bind '{}': {}", bind_address, e)))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
