//! Route definitions.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use vista_engine::Dashboard;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `dashboard` - The dashboard every view is computed from
pub fn create_router(dashboard: Arc<Dashboard>) -> Router {
    let state = Arc::new(AppState { dashboard });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Navigation
        .route("/api/v1/pages", get(handlers::list_pages))
        .route("/api/v1/pages/:page/slicers", get(handlers::page_slicers))
        .route("/api/v1/nav/toggle", get(handlers::toggle_navbar))
        // Return on capital
        .route("/api/v1/roc", get(handlers::return_on_capital))
        .route("/api/v1/roc/waterfall", get(handlers::waterfall))
        .route("/api/v1/roc/kpis", get(handlers::kpis))
        .route("/api/v1/roc/baseline", get(handlers::baseline))
        // ALM
        .route("/api/v1/alm", get(handlers::alm))
        // Raw facts
        .route("/api/v1/facts", get(handlers::facts))
        // Tickers
        .route("/api/v1/tickers", get(handlers::list_tickers))
        .route("/api/v1/returns", get(handlers::ticker_returns))
        // State
        .with_state(state)
}
