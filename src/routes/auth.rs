// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Login/registration against the federated identity provider.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{AuthProvider, Role, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

/// Login or registration request. A request carrying name + phone + role is
/// treated as registration; anything else is a plain login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id_token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// User projection returned to clients.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub registration_completed: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserResponse,
    pub message: String,
}

#[derive(Serialize)]
struct NeedsRegistrationResponse {
    error: &'static str,
    message: &'static str,
    needs_registration: bool,
    /// Phone from the verified token, for pre-filling the registration form
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.user_id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        photo_url: user.photo_url.clone(),
        role: user.role.as_str().to_string(),
        is_active: user.is_active,
        registration_completed: user.registration_completed,
    }
}

/// POST /auth/login - verify a federated ID token, then log in or register.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    if payload.id_token.trim().is_empty() {
        return Err(AppError::field_validation("id_token", "required"));
    }

    let subject = state
        .identity
        .verify_id_token(&payload.id_token)
        .await
        .map_err(AppError::from)?;

    let now = Utc::now();

    let registration = match (&payload.name, &payload.phone, &payload.role) {
        (Some(name), Some(phone), Some(role))
            if !name.trim().is_empty() && !phone.trim().is_empty() && !role.trim().is_empty() =>
        {
            Some((name.clone(), phone.clone(), role.clone()))
        }
        _ => None,
    };

    if let Some((name, phone, role)) = registration {
        let role = match role.as_str() {
            "driver" => Role::Driver,
            "owner" => Role::Owner,
            _ => {
                return Err(AppError::field_validation(
                    "role",
                    "must be 'driver' or 'owner'",
                ))
            }
        };

        let normalized_phone: String = phone.split_whitespace().collect();

        // When the token itself carries a phone number, the submitted one
        // must match it.
        if let Some(token_phone) = &subject.phone_number {
            let token_phone: String = token_phone.split_whitespace().collect();
            if token_phone != normalized_phone {
                return Err(AppError::BadRequest(
                    "Phone number does not match authenticated number".to_string(),
                ));
            }
        }

        let auth_provider = if subject.email.is_some() {
            AuthProvider::Google
        } else {
            AuthProvider::Phone
        };

        // Preserve the original creation timestamp on re-registration.
        let created_at = state
            .users
            .get_user(&subject.uid)
            .await?
            .map(|u| u.created_at)
            .unwrap_or(now);

        let user = User {
            user_id: subject.uid.clone(),
            name: name.trim().to_string(),
            email: subject.email.clone(),
            phone: Some(normalized_phone),
            photo_url: subject.picture.clone(),
            role,
            is_active: true,
            registration_completed: true,
            auth_provider,
            created_at,
            last_login: now,
        };
        state.users.upsert_user(&user).await?;

        tracing::info!(user_id = %user.user_id, role = role.as_str(), "User registered");

        return Ok(Json(LoginResponse {
            success: true,
            user: user_response(&user),
            message: "Registration successful".to_string(),
        })
        .into_response());
    }

    match state.users.get_user(&subject.uid).await? {
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(NeedsRegistrationResponse {
                error: "User not found",
                message: "Please complete registration first",
                needs_registration: true,
                phone: subject.phone_number.clone(),
            }),
        )
            .into_response()),
        Some(mut user) => {
            user.last_login = now;
            state.users.upsert_user(&user).await?;

            tracing::info!(user_id = %user.user_id, role = user.role.as_str(), "User logged in");

            Ok(Json(LoginResponse {
                success: true,
                user: user_response(&user),
                message: "Login successful".to_string(),
            })
            .into_response())
        }
    }
}
