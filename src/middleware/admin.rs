// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Admin session middleware.
//!
//! Admin sessions use locally-issued HS256 JWTs rather than federated
//! tokens. How admin credentials are provisioned is out of scope here;
//! `create_admin_jwt` is used by ops tooling and tests.

use crate::error::AppError;
use crate::middleware::auth::bearer_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Admin JWT claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    /// Subject (admin identifier)
    pub sub: String,
    /// Marks the token as an admin session
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated admin extracted from a valid admin JWT.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub admin_id: String,
}

/// Middleware that requires a valid admin JWT.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<AdminClaims>(&token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    if !token_data.claims.admin {
        return Err(AppError::Forbidden(
            "Admin privileges required".to_string(),
        ));
    }

    request.extensions_mut().insert(AdminUser {
        admin_id: token_data.claims.sub,
    });

    Ok(next.run(request).await)
}

/// Create an admin session JWT (8 hour expiry).
pub fn create_admin_jwt(admin_id: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = AdminClaims {
        sub: admin_id.to_string(),
        admin: true,
        iat: now,
        exp: now + 8 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
