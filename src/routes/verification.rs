// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Driver-facing verification routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::VerificationStatus;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/verification/status", get(verification_status))
        .route("/api/verification/check-access", get(check_access))
        .route("/api/verification/resubmit", post(resubmit))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RequestSummaryResponse {
    pub id: String,
    pub status: String,
    pub submitted_at: String,
    pub processed_at: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VerificationStatusResponse {
    pub profile_exists: bool,
    pub verification_status: Option<String>,
    pub can_access_jobs: bool,
    pub profile_completed: bool,
    pub verification_request: Option<RequestSummaryResponse>,
}

/// GET /api/verification/status - current review state plus latest request.
async fn verification_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<VerificationStatusResponse>> {
    let view = state.workflow.status(&user.user_id).await?;

    Ok(Json(VerificationStatusResponse {
        profile_exists: view.profile_exists,
        verification_status: view.verification_status.map(|s| s.as_str().to_string()),
        can_access_jobs: view.can_access_jobs,
        profile_completed: view.profile_completed,
        verification_request: view.verification_request.map(|r| RequestSummaryResponse {
            id: r.id,
            status: r.status.as_str().to_string(),
            submitted_at: r.submitted_at.to_rfc3339(),
            processed_at: r.processed_at.map(|d| d.to_rfc3339()),
            notes: r.notes,
        }),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CheckAccessResponse {
    pub can_access_jobs: bool,
    pub verification_status: String,
    pub message: String,
}

/// GET /api/verification/check-access - quick gate probe for the app shell.
async fn check_access(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CheckAccessResponse>> {
    let profile = state.workflow.profile(&user.user_id).await?;

    let can_access = profile
        .as_ref()
        .map(|p| p.verification_status == VerificationStatus::Approved)
        .unwrap_or(false);

    Ok(Json(CheckAccessResponse {
        can_access_jobs: can_access,
        verification_status: profile
            .map(|p| p.verification_status.as_str().to_string())
            .unwrap_or_else(|| "no_profile".to_string()),
        message: if can_access {
            "Access granted".to_string()
        } else {
            "Verification required".to_string()
        },
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResubmitResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
}

/// POST /api/verification/resubmit - reopen review after a rejection.
async fn resubmit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ResubmitResponse>)> {
    let request = state.workflow.resubmit(&user.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ResubmitResponse {
            success: true,
            message: "Verification resubmitted successfully".to_string(),
            request_id: request.id,
        }),
    ))
}
