// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Driver profile routes.

use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::DriverProfile;
use crate::services::verification::{ProfileSubmission, SubmitKind};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/profile/driver",
        get(get_driver_profile)
            .post(submit_driver_profile)
            .patch(submit_driver_profile),
    )
}

/// Driver profile projection returned to clients.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DriverProfileResponse {
    pub user_id: String,
    pub name: String,
    pub profile_photo: Option<String>,
    pub license_photo_front: Option<String>,
    pub license_photo_back: Option<String>,
    pub license_number: Option<String>,
    pub license_expiry_date: Option<String>,
    pub known_truck_types: Vec<String>,
    pub experience: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub location: Option<String>,
    pub profile_completed: bool,
    pub verification_status: String,
    pub verification_requested_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub resubmission_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&DriverProfile> for DriverProfileResponse {
    fn from(profile: &DriverProfile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            profile_photo: profile.profile_photo.clone(),
            license_photo_front: profile.license_photo_front.clone(),
            license_photo_back: profile.license_photo_back.clone(),
            license_number: profile.license_number.clone(),
            license_expiry_date: profile.license_expiry_date.map(|d| d.to_rfc3339()),
            known_truck_types: profile.known_truck_types.clone(),
            experience: profile.experience.clone(),
            gender: profile.gender.clone(),
            age: profile.age,
            location: profile.location.clone(),
            profile_completed: profile.profile_completed,
            verification_status: profile.verification_status.as_str().to_string(),
            verification_requested_at: profile.verification_requested_at.map(|d| d.to_rfc3339()),
            rejection_reason: profile.rejection_reason.clone(),
            resubmission_count: profile.resubmission_count,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmitProfileResponse {
    pub success: bool,
    /// Whether this submission opened a new review cycle
    pub requires_verification: bool,
    pub message: String,
    pub profile: DriverProfileResponse,
}

/// POST|PATCH /api/profile/driver - submit or partially update the profile.
async fn submit_driver_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(submission): Json<ProfileSubmission>,
) -> Result<Json<SubmitProfileResponse>> {
    let outcome = state
        .workflow
        .submit_or_update_profile(&user.user_id, submission)
        .await?;

    let message = match outcome.kind {
        SubmitKind::FirstSubmission => "Profile submitted for first-time review",
        SubmitKind::CriticalResubmission => "Profile resubmitted for review after critical changes",
        SubmitKind::NoReview => "Profile updated, no review needed",
    };

    Ok(Json(SubmitProfileResponse {
        success: true,
        requires_verification: outcome.verification_triggered,
        message: message.to_string(),
        profile: DriverProfileResponse::from(&outcome.profile),
    }))
}

/// GET /api/profile/driver - fetch the caller's profile.
async fn get_driver_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DriverProfileResponse>> {
    let profile = state
        .workflow
        .profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(DriverProfileResponse::from(&profile)))
}
