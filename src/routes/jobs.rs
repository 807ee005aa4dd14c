// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Job feed for verified drivers.
//!
//! The job subsystem is a peer; this read surface exists so the access gate
//! has its production consumer. Routed behind `require_auth` +
//! `require_approved_driver` in routes/mod.rs.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::models::JobPost;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/jobs", get(list_jobs))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct JobSummary {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub truck_type: String,
    pub source_location: Option<String>,
    pub destination_location: Option<String>,
    pub salary_range: Option<String>,
    pub created_at: String,
}

impl From<&JobPost> for JobSummary {
    fn from(job: &JobPost) -> Self {
        Self {
            id: job.id.clone(),
            owner_id: job.owner_id.clone(),
            title: job.title.clone(),
            truck_type: job.truck_type.clone(),
            source_location: job.source_location.clone(),
            destination_location: job.destination_location.clone(),
            salary_range: job.salary_range.clone(),
            created_at: job.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct JobsResponse {
    pub jobs: Vec<JobSummary>,
}

/// GET /api/jobs - open job posts, newest first.
async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<JobsResponse>> {
    let jobs = state.jobs.list_open_jobs().await?;

    Ok(Json(JobsResponse {
        jobs: jobs.iter().map(JobSummary::from).collect(),
    }))
}
