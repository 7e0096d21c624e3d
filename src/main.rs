use std::sync::Arc;

use tracing::{error, info};

use dmail::actor::AgentActorFactory;
use dmail::web::{AppState, WebServer};
use dmail::{AuthClient, Config};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = dmail::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        dmail::logging::init_console_only(&config.logging.level);
    }

    info!("dmail webmail");

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> dmail::Result<()> {
    let auth = AuthClient::create(&config.identity)?;
    let factory = AgentActorFactory::new(&config.backend);
    let registry_id = config.backend.registry_principal()?;
    info!(registry = %registry_id, url = %config.backend.url, "Backend configured");

    if !config.web.enabled {
        info!("Web server disabled, nothing to do");
        return Ok(());
    }

    let state = Arc::new(AppState::new(Arc::new(auth), Arc::new(factory), registry_id));
    let server = WebServer::new(&config.web, state)?;
    server.run().await?;
    Ok(())
}
