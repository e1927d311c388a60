//! HTTP API for the Fee Engine.
//!
//! This module exposes a minimal REST API around the review engine
//! using the [`axum`](https://crates.io/crates/axum) framework.  Clients
//! submit a fee structure, scholarship list and payment plan and
//! receive the computed review as JSON.  Validation failures are
//! reported as `422 Unprocessable Entity` with an `{"error": ...}` body.

use crate::engine::{review, review_all_plans, review_batch};
use crate::error::FeeEngineError;
use crate::models::{FeeStructureReview, ReviewRequest, Scholarship, ScholarshipValidation};
use crate::scholarship::{find_applicable_scholarship, scholarship_amount_for, validate_scholarship_ranges};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

/// Error returned by handlers.
pub struct ApiError(FeeEngineError);

impl From<FeeEngineError> for ApiError {
    fn from(err: FeeEngineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "rejected review request");
        let body = Json(json!({"error": self.0.to_string()}));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

/// Body of `POST /api/scholarships/validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateScholarshipsRequest {
    pub scholarships: Vec<Scholarship>,
    #[serde(default)]
    pub exclude_id: Option<String>,
}

/// Body of `POST /api/scholarships/match`.
#[derive(Debug, Deserialize)]
pub struct MatchScholarshipRequest {
    pub scholarships: Vec<Scholarship>,
    pub test_score: f64,
    pub program_fee: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchScholarshipResponse {
    pub scholarship: Option<Scholarship>,
    pub amount: f64,
}

/// One entry of the `POST /api/review/batch` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Review { review: Box<FeeStructureReview> },
    Error { error: String },
}

/// Build the API router.
pub fn build_router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/review", post(review_handler))
        .route("/api/review/compare", post(compare_handler))
        .route("/api/review/batch", post(batch_handler))
        .route("/api/scholarships/validate", post(validate_scholarships_handler))
        .route("/api/scholarships/match", post(match_scholarship_handler))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Handler for POST /api/review
async fn review_handler(Json(request): Json<ReviewRequest>) -> Result<Json<FeeStructureReview>, ApiError> {
    info!(plan = ?request.payment_plan, "review requested");
    Ok(Json(review(&request)?))
}

/// Handler for POST /api/review/compare
async fn compare_handler(Json(request): Json<ReviewRequest>) -> Result<Json<Vec<FeeStructureReview>>, ApiError> {
    info!("plan comparison requested");
    Ok(Json(review_all_plans(&request)?))
}

/// Handler for POST /api/review/batch
async fn batch_handler(Json(requests): Json<Vec<ReviewRequest>>) -> Json<Vec<BatchItem>> {
    info!(count = requests.len(), "batch review requested");
    let items = review_batch(&requests)
        .into_iter()
        .map(|result| match result {
            Ok(review) => BatchItem::Review {
                review: Box::new(review),
            },
            Err(err) => BatchItem::Error {
                error: err.to_string(),
            },
        })
        .collect();
    Json(items)
}

/// Handler for POST /api/scholarships/validate
async fn validate_scholarships_handler(
    Json(request): Json<ValidateScholarshipsRequest>,
) -> Json<ScholarshipValidation> {
    Json(validate_scholarship_ranges(
        &request.scholarships,
        request.exclude_id.as_deref(),
    ))
}

/// Handler for POST /api/scholarships/match
async fn match_scholarship_handler(Json(request): Json<MatchScholarshipRequest>) -> Json<MatchScholarshipResponse> {
    let scholarship = find_applicable_scholarship(request.test_score, &request.scholarships);
    Json(MatchScholarshipResponse {
        amount: scholarship_amount_for(request.program_fee, scholarship),
        scholarship: scholarship.cloned(),
    })
}

/// Launch the API server on `addr`.  Blocks until the server
/// terminates (e.g. when interrupted).
pub async fn serve(addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router()).await?;
    Ok(())
}
