// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Services module - business logic layer.

pub mod access;
pub mod identity;
pub mod verification;

pub use access::{AccessDecision, AccessGate, DenyCode};
pub use identity::{FirebaseTokenVerifier, IdentityError, IdentityVerifier, VerifiedSubject};
pub use verification::{
    Decision, ProfileSubmission, SubmitKind, VerificationWorkflow, CRITICAL_FIELDS,
};
