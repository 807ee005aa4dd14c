// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! HaulLink API Server
//!
//! Backend for the trucking job marketplace: federated login, driver
//! profiles with admin verification, and verification-gated job access.

use haullink::{
    config::Config,
    db::FirestoreDb,
    services::{AccessGate, FirebaseTokenVerifier, VerificationWorkflow},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting HaulLink API");

    // Initialize Firestore database
    let db = Arc::new(
        FirestoreDb::new(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
    );

    // Initialize the federated identity verifier
    let identity = Arc::new(
        FirebaseTokenVerifier::new(&config).expect("Failed to initialize identity verifier"),
    );

    // Wire the workflow and gate against the shared store
    let workflow = VerificationWorkflow::new(db.clone(), db.clone(), db.clone());
    let gate = AccessGate::new(db.clone(), db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        users: db.clone(),
        jobs: db,
        workflow,
        gate,
    });

    // Build router
    let app = haullink::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("haullink=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
