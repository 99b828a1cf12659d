pub mod estimate;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Estimation: trigger an analysis, observe the session state
        .route("/estimate", post(estimate::create_estimate))
        .route("/estimate", get(estimate::get_estimate_state))
}
