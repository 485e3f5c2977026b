//! Secret-Santa assignment handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::AuthUser;
use crate::models::Assignment;
use crate::services::Permission;
use crate::utils::errors::{Result, SecretSantaError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAssignmentsRequest {
    pub event_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAssignmentsResponse {
    pub success: bool,
    pub message: String,
    pub assignments_count: usize,
}

#[derive(Debug, Serialize)]
pub struct AssignmentListResponse {
    pub success: bool,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyAssignmentResponse {
    pub success: bool,
    pub event_id: Uuid,
    pub receiver_id: Uuid,
}

fn parse_event_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| SecretSantaError::InvalidInput("eventId must be a valid UUID".to_string()))
}

/// POST /api/v1/secret-santa/generate
pub async fn generate_assignments(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    payload: std::result::Result<Json<GenerateAssignmentsRequest>, JsonRejection>,
) -> Result<Json<GenerateAssignmentsResponse>> {
    state
        .services
        .auth_service
        .require_permission(&requester, Permission::Admin)?;

    let Json(payload) = payload.map_err(|e| SecretSantaError::InvalidInput(e.body_text()))?;
    let raw_event_id = payload
        .event_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| SecretSantaError::InvalidInput("eventId is required".to_string()))?;
    let event_id = parse_event_id(&raw_event_id)?;

    info!(event_id = %event_id, admin_id = %requester.user_id, "Generating Secret-Santa assignments");

    let outcome = state
        .services
        .assignment_service
        .generate_assignments(event_id, &requester)
        .await?;

    Ok(Json(GenerateAssignmentsResponse {
        success: true,
        message: format!("Successfully generated {} assignments", outcome.assignments_count),
        assignments_count: outcome.assignments_count,
    }))
}

/// GET /api/v1/secret-santa/events/{event_id}/assignments
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<AssignmentListResponse>> {
    let event_id = parse_event_id(&event_id)?;
    let assignments = state
        .services
        .assignment_service
        .list_assignments(event_id, &requester)
        .await?;

    Ok(Json(AssignmentListResponse {
        success: true,
        assignments,
    }))
}

/// GET /api/v1/secret-santa/events/{event_id}/my-assignment
pub async fn my_assignment(
    State(state): State<Arc<AppState>>,
    AuthUser(requester): AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<MyAssignmentResponse>> {
    let event_id = parse_event_id(&event_id)?;
    let assignment = state
        .services
        .assignment_service
        .my_assignment(event_id, &requester)
        .await?;

    Ok(Json(MyAssignmentResponse {
        success: true,
        event_id: assignment.event_id,
        receiver_id: assignment.receiver_id,
    }))
}

/// OPTIONS without CORS request headers; real pre-flights are answered by the CORS layer
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
