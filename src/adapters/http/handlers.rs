//! Route handlers. Each delegates to the AnalyticsPort and returns its report as JSON.

use super::AppState;
use crate::domain::{
    HealthReport, MonthlyRevenue, Recommendation, RevenueDrivers, RiskFactor, SummaryReport,
};
use axum::Json;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// GET /api/summary
pub async fn summary(State(state): State<AppState>) -> Json<SummaryReport> {
    Json(state.analytics.summary())
}

/// GET /api/drivers
pub async fn drivers(State(state): State<AppState>) -> Json<RevenueDrivers> {
    Json(state.analytics.revenue_drivers())
}

/// GET /api/risk-factors
pub async fn risk_factors(State(state): State<AppState>) -> Json<Vec<RiskFactor>> {
    Json(state.analytics.risk_factors())
}

/// GET /api/recommendations
pub async fn recommendations(State(state): State<AppState>) -> Json<Vec<Recommendation>> {
    Json(state.analytics.recommendations())
}

/// GET /api/revenue-trend
pub async fn revenue_trend(State(state): State<AppState>) -> Json<Vec<MonthlyRevenue>> {
    Json(state.analytics.revenue_trend(state.trend_months))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.analytics.health())
}

pub fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
}

/// Lets only GET through to the report handlers; everything else, HEAD included, is a 405.
pub async fn get_only(req: Request, next: Next) -> Response {
    if req.method() != Method::GET {
        return method_not_allowed();
    }
    next.run(req).await
}
