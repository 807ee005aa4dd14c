// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Access gate decision tests.
//!
//! The deny codes have a strict priority order; these tests pin it down,
//! including the "incomplete profile beats stale rejection" case.

use haullink::db::{MemoryDb, ProfileStore, UserStore};
use haullink::models::{DriverProfile, Role, VerificationStatus};
use haullink::services::{AccessDecision, AccessGate, DenyCode};
use std::sync::Arc;

mod common;

fn gate() -> (AccessGate, Arc<MemoryDb>) {
    let db = Arc::new(MemoryDb::new());
    (AccessGate::new(db.clone(), db.clone()), db)
}

fn profile(user_id: &str, status: VerificationStatus, completed: bool) -> DriverProfile {
    let now = chrono::Utc::now();
    DriverProfile {
        user_id: user_id.to_string(),
        name: "Gate Test".to_string(),
        profile_photo: None,
        license_photo_front: None,
        license_photo_back: None,
        license_number: None,
        license_expiry_date: None,
        known_truck_types: vec![],
        experience: None,
        gender: None,
        age: None,
        location: None,
        profile_completed: completed,
        verification_status: status,
        verification_requested_at: Some(now),
        approved_by: None,
        approved_at: None,
        rejection_reason: None,
        resubmission_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn deny_code(decision: AccessDecision) -> DenyCode {
    match decision {
        AccessDecision::Deny(denied) => denied.code,
        AccessDecision::Allow { .. } => panic!("expected deny"),
    }
}

#[tokio::test]
async fn test_unknown_user_is_denied() {
    let (gate, _db) = gate();
    let decision = gate.authorize("ghost").await.unwrap();
    assert_eq!(deny_code(decision), DenyCode::UserNotFound);
}

#[tokio::test]
async fn test_non_driver_roles_pass_through() {
    let (gate, db) = gate();
    db.upsert_user(&common::test_user("owner-1", Role::Owner))
        .await
        .unwrap();
    db.upsert_user(&common::test_user("new-1", Role::Unassigned))
        .await
        .unwrap();

    for user_id in ["owner-1", "new-1"] {
        let decision = gate.authorize(user_id).await.unwrap();
        assert!(matches!(decision, AccessDecision::Allow { profile: None }));
    }
}

#[tokio::test]
async fn test_driver_without_profile_is_denied() {
    let (gate, db) = gate();
    db.upsert_user(&common::test_user("driver-1", Role::Driver))
        .await
        .unwrap();

    let decision = gate.authorize("driver-1").await.unwrap();
    assert_eq!(deny_code(decision), DenyCode::NoProfile);
}

#[tokio::test]
async fn test_incomplete_profile_beats_stale_rejection() {
    // A stale rejection_reason from a previous cycle must not surface as
    // VERIFICATION_REJECTED while the profile is incomplete.
    let (gate, db) = gate();
    db.upsert_user(&common::test_user("driver-1", Role::Driver))
        .await
        .unwrap();
    let mut stale = profile("driver-1", VerificationStatus::Rejected, false);
    stale.rejection_reason = Some("old reason".to_string());
    db.upsert_profile(&stale).await.unwrap();

    let decision = gate.authorize("driver-1").await.unwrap();
    assert_eq!(deny_code(decision), DenyCode::IncompleteProfile);
}

#[tokio::test]
async fn test_pending_and_rejected_denials() {
    let (gate, db) = gate();
    db.upsert_user(&common::test_user("driver-1", Role::Driver))
        .await
        .unwrap();

    db.upsert_profile(&profile("driver-1", VerificationStatus::Pending, true))
        .await
        .unwrap();
    let decision = gate.authorize("driver-1").await.unwrap();
    assert_eq!(deny_code(decision), DenyCode::VerificationPending);

    let mut rejected = profile("driver-1", VerificationStatus::Rejected, true);
    rejected.rejection_reason = Some("license expired".to_string());
    db.upsert_profile(&rejected).await.unwrap();
    match gate.authorize("driver-1").await.unwrap() {
        AccessDecision::Deny(denied) => {
            assert_eq!(denied.code, DenyCode::VerificationRejected);
            assert_eq!(denied.message, "license expired");
            assert_eq!(denied.rejection_reason.as_deref(), Some("license expired"));
        }
        AccessDecision::Allow { .. } => panic!("expected deny"),
    }
}

#[tokio::test]
async fn test_approved_driver_is_allowed_with_profile() {
    let (gate, db) = gate();
    db.upsert_user(&common::test_user("driver-1", Role::Driver))
        .await
        .unwrap();
    db.upsert_profile(&profile("driver-1", VerificationStatus::Approved, true))
        .await
        .unwrap();

    match gate.authorize("driver-1").await.unwrap() {
        AccessDecision::Allow { profile: Some(p) } => {
            assert_eq!(p.user_id, "driver-1");
        }
        other => panic!("expected allow with profile, got {:?}", other),
    }
}
