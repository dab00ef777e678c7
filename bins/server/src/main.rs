//! Upload Service Server
//!
//! Main entry point issuing presigned storage URLs over HTTP.

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upload_api::{AppState, create_router};
use upload_core::storage::{ProviderRegistry, ProviderSlug, RegistryConfig};
use upload_core::upload::UploadService;
use upload_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upload=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv.is_err() {
        warn!("No .env file found, relying on environment variables");
    }

    // Load configuration
    let config = AppConfig::load()?;

    // Build every enabled backend, then bind the active one
    let registry = ProviderRegistry::load(&RegistryConfig::from_app_config(&config)?).await;
    let slug = ProviderSlug::new(&config.upload_provider);
    let uploads = UploadService::from_registry(&registry, &slug)?;
    info!(provider = %slug, "Storage provider selected");

    // Create router
    let app = create_router(AppState::new(uploads));

    // Start server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
