//! TriSense gateway - lazily loaded models behind a small HTTP API.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trisense_common::SlotName;
use trisense_gateway::{api, AppState, Config, ModelManager};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("trisense-gateway {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml and the HF_TEXT_DIR, FACE_MODEL_PATH, VOICE_MODEL_PATH, \
             META_MODEL_PATH and PORT environment variables.",
            e
        )
    })?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    for slot in SlotName::ALL {
        tracing::info!("{} model location: {}", slot, config.models.location(slot));
    }

    // Models are loaded on first use, not here
    let state = Arc::new(AppState::new(ModelManager::new(&config.models)));
    let app = api::app(state);

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
