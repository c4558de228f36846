//! HTTP adapter. Serves the AnalyticsPort reports as JSON over axum.
//!
//! Every route answers GET only; OPTIONS preflights are answered by the CORS layer.

pub mod cors;
pub mod handlers;

use crate::ports::AnalyticsPort;
use crate::shared::config::DEFAULT_TREND_MONTHS;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Report routes mounted under `/api`, for startup logging.
pub const ENDPOINTS: &[&str] = &[
    "/api/summary",
    "/api/drivers",
    "/api/risk-factors",
    "/api/recommendations",
    "/api/revenue-trend",
    "/api/health",
];

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<dyn AnalyticsPort>,
    pub trend_months: usize,
}

impl AppState {
    pub fn new(analytics: Arc<dyn AnalyticsPort>) -> Self {
        Self {
            analytics,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }

    pub fn with_trend_months(mut self, months: usize) -> Self {
        self.trend_months = months;
        self
    }
}

/// Build the application router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    // route_layer: unknown paths still 404; HEAD is rejected before axum maps it onto GET.
    let api = Router::new()
        .route("/summary", get(handlers::summary))
        .route("/drivers", get(handlers::drivers))
        .route("/risk-factors", get(handlers::risk_factors))
        .route("/recommendations", get(handlers::recommendations))
        .route("/revenue-trend", get(handlers::revenue_trend))
        .route("/health", get(handlers::health))
        .route_layer(middleware::from_fn(handlers::get_only));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors::cors_layer())
        .layer(cors::allow_methods_header())
        .layer(cors::allow_headers_header())
        .layer(TraceLayer::new_for_http())
}
