// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Shared test helpers: in-memory state and a stub identity verifier.

use haullink::config::Config;
use haullink::db::MemoryDb;
use haullink::models::{AuthProvider, Role, User};
use haullink::routes::create_router;
use haullink::services::identity::{IdentityError, IdentityVerifier, VerifiedSubject};
use haullink::services::{AccessGate, VerificationWorkflow};
use haullink::AppState;
use std::collections::HashMap;
use std::sync::Arc;

/// Identity verifier stub mapping fixed opaque tokens to subjects.
#[derive(Default)]
pub struct StubVerifier {
    subjects: HashMap<String, VerifiedSubject>,
}

impl StubVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, token: &str, uid: &str) -> Self {
        self.subjects.insert(
            token.to_string(),
            VerifiedSubject {
                uid: uid.to_string(),
                name: Some("Test Driver".to_string()),
                email: None,
                phone_number: Some("+911234567890".to_string()),
                picture: None,
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify_id_token(&self, token: &str) -> Result<VerifiedSubject, IdentityError> {
        self.subjects
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("unknown test token".to_string()))
    }
}

/// Build app state over in-memory stores with the given verifier.
#[allow(dead_code)]
pub fn test_state(verifier: StubVerifier) -> (Arc<AppState>, Arc<MemoryDb>) {
    let config = Config::test_default();
    let db = Arc::new(MemoryDb::new());

    let workflow = VerificationWorkflow::new(db.clone(), db.clone(), db.clone());
    let gate = AccessGate::new(db.clone(), db.clone());

    let state = Arc::new(AppState {
        config,
        identity: Arc::new(verifier),
        users: db.clone(),
        jobs: db.clone(),
        workflow,
        gate,
    });

    (state, db)
}

/// Build the full router over in-memory stores with the given verifier.
#[allow(dead_code)]
pub fn test_app(verifier: StubVerifier) -> (axum::Router, Arc<AppState>, Arc<MemoryDb>) {
    let (state, db) = test_state(verifier);
    (create_router(state.clone()), state, db)
}

/// A registered user record for seeding stores directly.
#[allow(dead_code)]
pub fn test_user(user_id: &str, role: Role) -> User {
    let now = chrono::Utc::now();
    User {
        user_id: user_id.to_string(),
        name: "Test User".to_string(),
        email: None,
        phone: Some("+911234567890".to_string()),
        photo_url: None,
        role,
        is_active: true,
        registration_completed: true,
        auth_provider: AuthProvider::Phone,
        created_at: now,
        last_login: now,
    }
}
