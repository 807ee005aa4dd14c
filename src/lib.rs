// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! HaulLink: trucking job-marketplace backend.
//!
//! This crate provides the REST API connecting truck owners and drivers,
//! centered on the driver verification workflow: profile submission, admin
//! review, and verification-gated job access.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::{JobPostStore, UserStore};
use services::{AccessGate, IdentityVerifier, VerificationWorkflow};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: Arc<dyn IdentityVerifier>,
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobPostStore>,
    pub workflow: VerificationWorkflow,
    pub gate: AccessGate,
}
