// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Admin review routes.

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::admin::AdminUser;
use crate::services::verification::{Decision, RequestStats, ReviewEntry};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/verifications/pending", get(pending_verifications))
        .route("/api/admin/verifications", get(all_verifications))
        .route("/api/admin/verifications/stats", get(verification_stats))
        .route(
            "/api/admin/verifications/{request_id}/process",
            patch(process_verification),
        )
}

/// GET /api/admin/verifications/pending - the review queue, newest first.
async fn pending_verifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReviewEntry>>> {
    let entries = state.workflow.list_pending().await?;
    tracing::debug!(count = entries.len(), "Fetched pending verifications");
    Ok(Json(entries))
}

/// GET /api/admin/verifications - full request history for audit.
async fn all_verifications(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ReviewEntry>>> {
    let entries = state.workflow.list_all().await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub action: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
    pub profile_id: String,
}

/// PATCH /api/admin/verifications/{request_id}/process - approve or reject.
async fn process_verification(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminUser>,
    Path(request_id): Path<String>,
    Json(payload): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>> {
    let action = Decision::parse(&payload.action).ok_or_else(|| {
        AppError::field_validation("action", "must be 'approved' or 'rejected'")
    })?;

    let outcome = state
        .workflow
        .decide(&request_id, action, &admin.admin_id, payload.notes)
        .await?;

    Ok(Json(ProcessResponse {
        success: true,
        message: format!("Driver {} successfully", action.as_str()),
        request_id: outcome.request.id,
        profile_id: outcome.profile.user_id,
    }))
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: RequestStats,
}

/// GET /api/admin/verifications/stats - dashboard counters.
async fn verification_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let stats = state.workflow.stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
