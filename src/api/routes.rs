use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::health::HealthState;
use crate::calculator::{calculate, normalize};
use crate::config::SERVICE_NAME;
use crate::db::models::LeadRecord;
use crate::error::{AppError, Result};
use crate::types::{Contact, FormDefaults, RawRoiInput, RoiResult, Submission, SubmissionResponse};

pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Sus resultados están en camino! En breve te contactaremos.";

#[derive(Clone)]
pub struct ApiState {
    pub health: Arc<HealthState>,
    /// `None` when lead storage is disabled.
    pub leads: Option<mpsc::Sender<LeadRecord>>,
    pub defaults: FormDefaults,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/calculate-roi", post(calculate_roi))
        .route("/api/submit-roi", post(submit_roi))
        .route("/api/defaults", get(get_defaults))
        .route("/api/health", get(get_health))
        .with_state(state)
}

/// `*` allows any origin; anything else must be a single exact origin.
pub fn cors_layer(allow_origin: &str) -> Result<CorsLayer> {
    if allow_origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origin = allow_origin
        .parse::<HeaderValue>()
        .map_err(|_| AppError::Config(format!("invalid CORS_ALLOW_ORIGIN: {allow_origin}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub lead_store: bool,
    pub calculations_served: u64,
    pub submissions_received: u64,
    pub leads_stored: u64,
    pub leads_dropped: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn calculate_roi(
    State(state): State<ApiState>,
    Json(raw): Json<RawRoiInput>,
) -> Result<Json<RoiResult>> {
    let input = normalize(&raw).inspect_err(|e| warn!("Rejected calculation: {e}"))?;
    let result = calculate(&input).inspect_err(|e| warn!("Rejected calculation: {e}"))?;
    state.health.inc_calculations_served();
    Ok(Json(result))
}

async fn submit_roi(
    State(state): State<ApiState>,
    Json(submission): Json<Submission>,
) -> Result<Json<SubmissionResponse>> {
    let input = normalize(&submission.roi).inspect_err(|e| warn!("Rejected submission: {e}"))?;
    let contact = submission
        .contact
        .normalized()
        .inspect_err(|e| warn!("Rejected submission contact: {e}"))?;
    let result = calculate(&input).inspect_err(|e| warn!("Rejected submission: {e}"))?;
    state.health.inc_submissions_received();

    log_submission(&contact, &result);

    if let Some(tx) = &state.leads {
        let lead = LeadRecord {
            contact,
            input,
            result: result.clone(),
            received_at_ns: now_ns(),
        };
        if let Err(e) = tx.try_send(lead) {
            state.health.inc_leads_dropped();
            warn!("Lead writer channel unavailable, lead not stored: {e}");
        }
    }

    Ok(Json(SubmissionResponse {
        success: true,
        message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        result,
    }))
}

async fn get_defaults(State(state): State<ApiState>) -> Json<FormDefaults> {
    Json(state.defaults)
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        lead_store: state.leads.is_some(),
        calculations_served: state.health.calculations_served(),
        submissions_received: state.health.submissions_received(),
        leads_stored: state.health.leads_stored(),
        leads_dropped: state.health.leads_dropped(),
    })
}

/// Structured record of a new lead for whoever follows up on it.
fn log_submission(contact: &Contact, result: &RoiResult) {
    let roi = result
        .roi_pct
        .value()
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "undefined".to_string());
    info!(
        event = "ROI_SUBMISSION",
        company = %contact.company,
        email = %contact.email,
        total_annual_savings = result.total_annual_savings,
        roi = %roi,
        "ROI SUBMISSION | {} <{}> | {}",
        contact.full_name,
        contact.email,
        result.summary_lines().join(" | "),
    );
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
