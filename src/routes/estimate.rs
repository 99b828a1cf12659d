//! Estimation endpoints.
//!
//! `POST /estimate` runs one complete analysis and returns either a full
//! `ProjectDetails` or an error, never a partial result. `GET /estimate`
//! exposes the session state machine for the presentation layer.

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::EstimateRequest;
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id::RequestIdExt;
use crate::services::estimator::run_estimate;
use crate::session::{AnalysisEvent, AnalysisSnapshot};

/// Analyze a project description.
///
/// POST /estimate
pub async fn create_estimate(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(req): Json<EstimateRequest>,
) -> ApiResult<impl IntoResponse> {
    let description = req.project_description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest(
            "Project description must not be empty".to_string(),
        ));
    }

    tracing::info!(
        request_id = ?headers.request_id(),
        description_len = description.len(),
        "Starting project analysis"
    );

    state.session.dispatch(AnalysisEvent::Started);

    match run_estimate(state.generator.as_ref(), description).await {
        Ok(details) => {
            // Exactly-once delivery of the successful estimate.
            state.session.dispatch(AnalysisEvent::Completed(details.clone()));
            Ok(Json(DataResponse::new(details)))
        }
        Err(e) => {
            state.session.dispatch(AnalysisEvent::Failed(e.public_message()));
            Err(e)
        }
    }
}

/// Observe the current analysis session state.
///
/// GET /estimate
pub async fn get_estimate_state(State(state): State<Arc<AppState>>) -> Json<AnalysisSnapshot> {
    Json(state.session.snapshot())
}
