// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! AccessGate middleware for job-access endpoints.

use crate::middleware::auth::AuthUser;
use crate::services::access::{AccessDecision, AccessDenied, DenyCode};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Gate job-access routes on the caller's verification state.
///
/// Runs after `require_auth`; on allow, the loaded driver profile is made
/// available to handlers as an extension.
pub async fn require_approved_driver(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.gate.authorize(&user.user_id).await {
        Ok(AccessDecision::Allow { profile }) => {
            if let Some(profile) = profile {
                request.extensions_mut().insert(profile);
            }
            next.run(request).await
        }
        Ok(AccessDecision::Deny(denied)) => {
            tracing::debug!(
                user_id = %user.user_id,
                code = denied.code.as_str(),
                "Job access denied"
            );
            denied_response(denied)
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Serialize)]
struct DeniedBody {
    error: &'static str,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_reason: Option<String>,
}

fn denied_response(denied: AccessDenied) -> Response {
    let error = match denied.code {
        DenyCode::UserNotFound => "User not found",
        DenyCode::NoProfile => "Profile not found",
        DenyCode::IncompleteProfile => "Profile incomplete",
        DenyCode::VerificationPending => "Verification pending",
        DenyCode::VerificationRejected => "Verification rejected",
    };

    let body = DeniedBody {
        error,
        code: denied.code.as_str(),
        message: denied.message,
        verification_status: denied.verification_status.map(|s| s.as_str()),
        rejection_reason: denied.rejection_reason,
    };

    (StatusCode::FORBIDDEN, Json(body)).into_response()
}
