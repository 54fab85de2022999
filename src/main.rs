use locality_trends::api::{self, AppState};
use locality_trends::config::load_config_or_default;
use locality_trends::dataset::load_file;
use locality_trends::generator::{OpenAiGenerator, TextGenerator};
use locality_trends::summary::SummaryGenerator;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.json".into());
    let config = match load_config_or_default(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Config load error: {}", e);
            return;
        }
    };

    // The dataset is loaded once and shared read-only for the process lifetime
    let dataset = match load_file(Path::new(&config.dataset_path), &config.columns) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            error!("❌ Failed to load dataset {}: {}", config.dataset_path, e);
            return;
        }
    };
    let missing = dataset.missing_required_columns();
    if !missing.is_empty() {
        warn!(
            "⚠️ Dataset is missing required columns {:?}; queries will fail until it is fixed",
            missing
        );
    }
    info!("Known localities: {}", dataset.localities().len());

    let generator: Option<Arc<dyn TextGenerator>> =
        match OpenAiGenerator::from_config(&config.generator) {
            Ok(Some(g)) => {
                info!("✅ Text generation enabled (model {})", config.generator.model);
                Some(Arc::new(g))
            }
            Ok(None) => {
                info!(
                    "{} not set, summaries will be rule-based",
                    config.generator.api_key_env
                );
                None
            }
            Err(e) => {
                warn!("❌ Failed to create text generation client: {}", e);
                None
            }
        };

    let state = AppState::new(dataset, SummaryGenerator::new(generator));
    let app = api::router(state, &config.cors_origins);

    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("❌ Failed to bind {}: {}", config.bind_addr, e);
            return;
        }
    };
    info!("🚀 Listening on http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
    info!("Server stopped.");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested...");
}
