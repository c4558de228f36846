//! Wiring & DI. Entry point: load records, build the analytics service, serve HTTP.
//! No business logic here; reports are built by AnalyticsService.

use dotenv::dotenv;
use revenue_intel::adapters::clock::{FixedClock, SystemClock};
use revenue_intel::adapters::http::{self, AppState, ENDPOINTS};
use revenue_intel::adapters::persistence::{InMemoryStore, JsonFixtureSource};
use revenue_intel::ports::{AnalyticsPort, Clock, RecordSource, RecordStore};
use revenue_intel::shared::config::AppConfig;
use revenue_intel::usecases::AnalyticsService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Records: all five files or nothing ---
    let data_dir = cfg.data_dir_or_default();
    info!(path = %data_dir, "data directory");
    let source = JsonFixtureSource::new(&data_dir);
    let records = source
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load data: {}", e))?;
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new(records));

    // --- Clock: pinned via REVINTEL_AS_OF, otherwise local date ---
    let clock: Arc<dyn Clock> = match cfg.as_of_date()? {
        Some(date) => {
            warn!(as_of = %date, "clock pinned; reports will not follow the calendar");
            Arc::new(FixedClock::new(date))
        }
        None => Arc::new(SystemClock),
    };

    let analytics: Arc<dyn AnalyticsPort> = Arc::new(AnalyticsService::new(store, clock));
    let state = AppState::new(analytics).with_trend_months(cfg.trend_months_or_default());
    let app = http::router(state);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", addr, e))?;
    info!(addr = %addr, "server listening");
    for endpoint in ENDPOINTS {
        info!("  GET {}", endpoint);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {}", e))?;

    Ok(())
}
