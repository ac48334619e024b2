//! REST API Server for the Admission Helpdesk
//!
//! Exposes profile management and query routing over HTTP.
//! This is the presentation layer: it owns form checks and turns
//! external-service failures into a generic apology.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::agent::AdmissionOfficer;
use crate::error::HelpdeskError;
use crate::models::{student_id, StudentRecord};
use crate::state::StudentStore;

pub const QUERY_FAILURE_MESSAGE: &str = "⚠️ Error processing query. Please try again.";

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QueryRequest {
    pub name: String,
    pub query: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiResult {
    (status, Json(ApiResponse::error(message.into())))
}

fn store_failure(e: HelpdeskError) -> ApiResult {
    error!("Record store failure: {}", e);
    failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Record store failure: {}", e))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub officer: Arc<AdmissionOfficer>,
    pub store: Arc<dyn StudentStore>,
}

/// =============================
/// Form Checks
/// =============================

/// Range checks applied to every profile write.
pub fn check_profile_ranges(record: &StudentRecord) -> crate::Result<()> {
    let invalid = |msg: &str| -> crate::Result<()> {
        Err(HelpdeskError::InvalidProfile(msg.to_string()))
    };

    match record.age {
        Some(age) if (16..=60).contains(&age) => {}
        Some(_) => return invalid("age must be between 16 and 60"),
        None => return invalid("age is required"),
    }
    for (label, marks) in [("10th", record.marks_10th), ("12th", record.marks_12th)] {
        if let Some(marks) = marks {
            if !(0.0..=100.0).contains(&marks) {
                return Err(HelpdeskError::InvalidProfile(format!(
                    "{} marks must be between 0 and 100",
                    label
                )));
            }
        }
    }
    if !record.loan_requested.is_finite() || record.loan_requested < 0.0 {
        return invalid("loan amount cannot be negative");
    }
    Ok(())
}

/// Registration additionally requires the fields a new applicant must fill in.
pub fn check_registration(record: &StudentRecord) -> crate::Result<()> {
    let filled = !record.name.trim().is_empty()
        && !record.course_applied.trim().is_empty()
        && !record.documents_submitted.is_empty()
        && record.marks_10th.is_some_and(|m| m != 0.0)
        && record.marks_12th.is_some_and(|m| m != 0.0);

    if !filled {
        return Err(HelpdeskError::InvalidProfile(
            "Please fill all required fields.".to_string(),
        ));
    }
    check_profile_ranges(record)
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Profile Endpoints
/// =============================

async fn register_student(
    State(state): State<ApiState>,
    Json(record): Json<StudentRecord>,
) -> ApiResult {
    if let Err(e) = check_registration(&record) {
        return failure(StatusCode::BAD_REQUEST, e.to_string());
    }

    match state.store.upsert(&record).await {
        Ok(()) => {
            info!(student_id = %record.student_id(), "Student profile created");
            (StatusCode::CREATED, Json(ApiResponse::success(record)))
        }
        Err(e) => store_failure(e),
    }
}

async fn update_student(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(mut record): Json<StudentRecord>,
) -> ApiResult {
    let existing = match state.store.get(&name).await {
        Ok(Some(existing)) => existing,
        Ok(None) => return failure(StatusCode::NOT_FOUND, format!("No profile found for '{}'", name)),
        Err(e) => return store_failure(e),
    };

    // The stored name stays the identity; an edit cannot rename a profile.
    record.name = existing.name;

    if let Err(e) = check_profile_ranges(&record) {
        return failure(StatusCode::BAD_REQUEST, e.to_string());
    }

    match state.store.upsert(&record).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(record))),
        Err(e) => store_failure(e),
    }
}

async fn get_student(State(state): State<ApiState>, Path(name): Path<String>) -> ApiResult {
    match state.store.get(&name).await {
        Ok(Some(record)) => (StatusCode::OK, Json(ApiResponse::success(record))),
        Ok(None) => failure(StatusCode::NOT_FOUND, format!("No profile found for '{}'", name)),
        Err(e) => store_failure(e),
    }
}

async fn delete_student(State(state): State<ApiState>, Path(name): Path<String>) -> ApiResult {
    match state.store.delete(&name).await {
        Ok(true) => {
            let id = student_id(&name);
            let cleared = match state.officer.conversation_log().clear(&id).await {
                Ok(cleared) => cleared,
                Err(e) => {
                    warn!(student_id = %id, "Failed to clear conversation history: {}", e);
                    0
                }
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "deleted": id,
                    "history_entries_cleared": cleared,
                }))),
            )
        }
        Ok(false) => failure(StatusCode::NOT_FOUND, format!("No profile found for '{}'", name)),
        Err(e) => store_failure(e),
    }
}

async fn student_history(State(state): State<ApiState>, Path(name): Path<String>) -> ApiResult {
    match state.officer.conversation_log().history(&student_id(&name)).await {
        Ok(entries) => (StatusCode::OK, Json(ApiResponse::success(entries))),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// =============================
/// Query Endpoint
/// =============================

async fn run_query(State(state): State<ApiState>, Json(req): Json<QueryRequest>) -> ApiResult {
    info!(student = %req.name, "Received helpdesk query");

    let record = match state.store.get(&req.name).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return failure(
                StatusCode::NOT_FOUND,
                format!("No profile found for '{}'. Please register first.", req.name),
            )
        }
        Err(e) => return store_failure(e),
    };

    match state.officer.handle_query(&req.query, &record).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "intent": reply.intent,
                "answer": reply.response,
                "student_id": record.student_id(),
            }))),
        ),
        Err(e) if e.is_external() => {
            error!(student = %req.name, "Query processing failed: {}", e);
            failure(StatusCode::BAD_GATEWAY, QUERY_FAILURE_MESSAGE)
        }
        Err(e) => {
            error!(student = %req.name, "Query processing failed internally: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, QUERY_FAILURE_MESSAGE)
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(officer: Arc<AdmissionOfficer>, store: Arc<dyn StudentStore>) -> Router {
    let state = ApiState { officer, store };

    Router::new()
        .route("/health", get(health))
        .route("/api/students", post(register_student))
        .route(
            "/api/students/:name",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/students/:name/history", get(student_history))
        .route("/api/query", post(run_query))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    officer: Arc<AdmissionOfficer>,
    store: Arc<dyn StudentStore>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(officer, store);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
