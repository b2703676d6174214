use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use watch_server::card::CardConfig;
use watch_server::config::AppConfig;
use watch_server::i18n::Catalog;
use watch_server::irail::{IrailClient, IrailConfig};
use watch_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let mut irail_config = IrailConfig::new(config.language);
    if let Some(base_url) = &config.base_url {
        irail_config = irail_config.with_base_url(base_url);
    }
    let irail = IrailClient::new(irail_config).expect("Failed to create iRail client");

    // Disk catalogs override the embedded ones; a missing directory
    // just means we run with the built-in strings
    let catalog = match Catalog::load_dir(&config.locales_dir) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(error = %e, dir = %config.locales_dir, "using embedded locales");
            Catalog::builtin()
        }
    };

    let card_config = CardConfig::default()
        .with_refresh_interval(Duration::from_secs(config.refresh_interval_secs));

    let state = AppState::new(irail, catalog, config.language, config.theme, card_config);

    // Warm the station directory; failure is not fatal, the index page
    // retries on demand
    match state.stations.get_or_fetch(&state.irail).await {
        Ok(stations) => info!(count = stations.len(), "station directory loaded"),
        Err(e) => warn!(error = %e, "station directory unavailable at startup"),
    }

    let app = create_router(state, &config.static_dir);

    info!(addr = %config.bind_addr, lang = config.language.as_str(), "train watch listening");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
