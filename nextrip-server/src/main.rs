use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nextrip_server::cache::{CacheConfig, CachedNexTripClient};
use nextrip_server::itinerary::{JourneyCatalog, builtin};
use nextrip_server::nextrip::{MockNexTripClient, NexTripClient, NexTripConfig};
use nextrip_server::refresh::{BoardSource, RefreshConfig, Refresher, Session};
use nextrip_server::web::{AppState, create_router};

/// Journey tracked at startup unless `JOURNEY` says otherwise.
const DEFAULT_JOURNEY: &str = "home_to_work";

/// Read a whole number of seconds from the environment.
fn env_secs(name: &str) -> Option<Duration> {
    let value = std::env::var(name).ok()?;
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(%name, %value, "ignoring invalid duration");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Journey catalog: file if given, otherwise the built-in one
    let catalog = match std::env::var("JOURNEYS_FILE") {
        Ok(path) => {
            info!(%path, "loading journeys");
            JourneyCatalog::load(&path).expect("Failed to load journeys file")
        }
        Err(_) => builtin().expect("Built-in journeys are invalid"),
    };
    info!(journeys = catalog.journeys().len(), "loaded journey catalog");

    let journey_id = std::env::var("JOURNEY").unwrap_or_else(|_| DEFAULT_JOURNEY.to_string());
    let journey = catalog
        .select(&journey_id)
        .expect("Failed to build initial journey");
    let session = Session::new(journey_id, journey).shared();

    // Board source: mock data directory for development, live API otherwise
    let source = match std::env::var("NEXTRIP_MOCK_DIR") {
        Ok(dir) => {
            let client = MockNexTripClient::new(&dir).expect("Failed to load mock boards");
            info!(%dir, stops = client.available_stops().await.len(), "using mock boards");
            BoardSource::Mock(client)
        }
        Err(_) => {
            let mut config = NexTripConfig::new();
            if let Ok(url) = std::env::var("NEXTRIP_BASE_URL") {
                config = config.with_base_url(url);
            }
            info!(base_url = %config.base_url, "using live NexTrip API");
            let client = NexTripClient::new(config).expect("Failed to create NexTrip client");
            BoardSource::Live(CachedNexTripClient::new(client, &CacheConfig::default()))
        }
    };

    let mut refresh_config = RefreshConfig::default();
    if let Some(interval) = env_secs("REFRESH_INTERVAL_SECS") {
        refresh_config = refresh_config.with_interval(interval);
    }
    if let Some(timeout) = env_secs("REFRESH_TIMEOUT_SECS") {
        refresh_config = refresh_config.with_timeout(timeout);
    }

    let state = AppState::new(
        catalog,
        Refresher::new(Arc::new(source), session, refresh_config),
    );

    // Background refresh; the first cycle runs immediately
    tokio::spawn(Arc::clone(&state.refresher).run_loop());

    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!(%addr, "departure estimator listening");
    info!("  GET  /health           - Health check");
    info!("  GET  /journeys         - Configured journeys");
    info!("  GET  /journey          - Current estimates");
    info!("  POST /journey/select   - Track another journey");
    info!("  POST /journey/refresh  - Refresh now");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
