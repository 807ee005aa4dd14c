// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Verification workflow state-machine tests.
//!
//! These run the real workflow against the in-memory store backend, covering
//! the full profile lifecycle: first submission, critical/non-critical edits,
//! admin decisions, and resubmission.

use haullink::db::{MemoryDb, ProfileStore, UserStore, VerificationRequestStore};
use haullink::error::AppError;
use haullink::models::{RequestStatus, Role, VerificationStatus};
use haullink::services::verification::{Decision, ProfileSubmission, SubmitKind};
use haullink::services::{AccessDecision, AccessGate, VerificationWorkflow};
use std::sync::Arc;

mod common;

fn workflow() -> (VerificationWorkflow, Arc<MemoryDb>) {
    let db = Arc::new(MemoryDb::new());
    (
        VerificationWorkflow::new(db.clone(), db.clone(), db.clone()),
        db,
    )
}

fn full_submission() -> ProfileSubmission {
    ProfileSubmission {
        name: Some("Ravi Kumar".to_string()),
        profile_photo: Some("https://img.test/ravi.jpg".to_string()),
        license_photo_front: Some("https://img.test/lic-front.jpg".to_string()),
        license_photo_back: Some("https://img.test/lic-back.jpg".to_string()),
        license_number: Some("TN-2020-0042".to_string()),
        known_truck_types: Some(vec!["Trailer".to_string(), "Tipper".to_string()]),
        experience: Some("8 years".to_string()),
        gender: Some("male".to_string()),
        age: Some(34),
        location: Some("Coimbatore".to_string()),
        ..Default::default()
    }
}

async fn pending_request_id(db: &MemoryDb, driver: &str) -> String {
    db.pending_request_for_driver(driver)
        .await
        .unwrap()
        .expect("expected a pending request")
        .id
}

#[tokio::test]
async fn test_first_submission_always_reviewed() {
    let (workflow, db) = workflow();

    let outcome = workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();

    assert_eq!(outcome.kind, SubmitKind::FirstSubmission);
    assert!(outcome.verification_triggered);
    assert_eq!(
        outcome.profile.verification_status,
        VerificationStatus::Pending
    );
    assert!(outcome.profile.profile_completed);
    assert!(outcome.profile.verification_requested_at.is_some());

    let request = db
        .pending_request_for_driver("driver-1")
        .await
        .unwrap()
        .expect("first submission must open a request");
    assert_eq!(
        request.documents.license_photo_front,
        "https://img.test/lic-front.jpg"
    );
    assert_eq!(request.documents.profile_photo, "https://img.test/ravi.jpg");
}

#[tokio::test]
async fn test_minimal_first_submission_still_reviewed() {
    // Property 1 holds regardless of which fields were supplied.
    let (workflow, db) = workflow();

    let outcome = workflow
        .submit_or_update_profile(
            "driver-min",
            ProfileSubmission {
                name: Some("Bare Minimum".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.verification_triggered);
    let request = db
        .pending_request_for_driver("driver-min")
        .await
        .unwrap()
        .unwrap();
    // No documents yet: the snapshot records empty URLs, not missing fields.
    assert_eq!(request.documents.license_photo_front, "");
}

#[tokio::test]
async fn test_first_submission_requires_name() {
    let (workflow, db) = workflow();

    let err = workflow
        .submit_or_update_profile(
            "driver-2",
            ProfileSubmission {
                age: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
    assert!(db.get_profile("driver-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_submission_validation_rules() {
    let (workflow, _db) = workflow();

    let err = workflow
        .submit_or_update_profile(
            "driver-3",
            ProfileSubmission {
                name: Some("Young".to_string()),
                age: Some(16),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let err = workflow
        .submit_or_update_profile(
            "driver-3",
            ProfileSubmission {
                name: Some("Tagless".to_string()),
                known_truck_types: Some(vec!["Trailer".to_string(), "  ".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_non_critical_update_keeps_approved_status() {
    let (workflow, db) = workflow();
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let request_id = pending_request_id(&db, "driver-1").await;
    workflow
        .decide(&request_id, Decision::Approved, "admin-1", None)
        .await
        .unwrap();

    let outcome = workflow
        .submit_or_update_profile(
            "driver-1",
            ProfileSubmission {
                age: Some(35),
                location: Some("Salem".to_string()),
                experience: Some("9 years".to_string()),
                gender: Some("male".to_string()),
                profile_photo: Some("https://img.test/new-face.jpg".to_string()),
                license_number: Some("TN-2020-0099".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, SubmitKind::NoReview);
    assert!(!outcome.verification_triggered);
    assert_eq!(
        outcome.profile.verification_status,
        VerificationStatus::Approved
    );
    assert_eq!(outcome.profile.age, Some(35));
    assert_eq!(outcome.profile.location.as_deref(), Some("Salem"));

    // No new request was opened.
    assert!(db
        .pending_request_for_driver("driver-1")
        .await
        .unwrap()
        .is_none());
    assert_eq!(db.list_requests(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_critical_update_reopens_review() {
    let (workflow, db) = workflow();
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let first_id = pending_request_id(&db, "driver-1").await;
    workflow
        .decide(&first_id, Decision::Approved, "admin-1", None)
        .await
        .unwrap();

    let outcome = workflow
        .submit_or_update_profile(
            "driver-1",
            ProfileSubmission {
                license_photo_front: Some("https://img.test/lic-front-v2.jpg".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.kind, SubmitKind::CriticalResubmission);
    assert!(outcome.verification_triggered);
    assert_eq!(
        outcome.profile.verification_status,
        VerificationStatus::Pending
    );

    // Exactly one new pending request, snapshotting the just-updated values.
    let pending = db
        .pending_request_for_driver("driver-1")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(pending.id, first_id);
    assert_eq!(
        pending.documents.license_photo_front,
        "https://img.test/lic-front-v2.jpg"
    );
    // The untouched document carried over from the profile.
    assert_eq!(
        pending.documents.license_photo_back,
        "https://img.test/lic-back.jpg"
    );
    assert_eq!(db.list_requests(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_critical_update_supersedes_pending_request() {
    let (workflow, db) = workflow();
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let first_id = pending_request_id(&db, "driver-1").await;

    // Edit critical fields while the first request is still pending.
    workflow
        .submit_or_update_profile(
            "driver-1",
            ProfileSubmission {
                name: Some("Ravi K".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let first = db.get_request(&first_id).await.unwrap().unwrap();
    assert_eq!(first.status, RequestStatus::Cancelled);
    assert_eq!(first.notes.as_deref(), Some("superseded by profile update"));

    // Cancel-and-replace keeps the audit trail and the single-pending invariant.
    let pending: Vec<_> = db
        .list_requests(Some(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_ne!(pending[0].id, first_id);
    assert_eq!(db.list_requests(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_at_most_one_pending_request_across_operations() {
    let (workflow, db) = workflow();

    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    for name in ["A", "B", "C"] {
        workflow
            .submit_or_update_profile(
                "driver-1",
                ProfileSubmission {
                    name: Some(name.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let pending: Vec<_> = db
        .list_requests(Some(RequestStatus::Pending))
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.driver_id == "driver-1")
        .collect();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_concurrent_edits_leave_single_pending_request() {
    // Two concurrent edits for the same driver must not each open a request.
    let db = Arc::new(MemoryDb::new());
    let workflow = Arc::new(VerificationWorkflow::new(
        db.clone(),
        db.clone(),
        db.clone(),
    ));

    workflow
        .submit_or_update_profile("driver-race", full_submission())
        .await
        .unwrap();

    let mut handles = vec![];
    for i in 0..8 {
        let workflow = workflow.clone();
        handles.push(tokio::spawn(async move {
            workflow
                .submit_or_update_profile(
                    "driver-race",
                    ProfileSubmission {
                        name: Some(format!("Racer {}", i)),
                        ..Default::default()
                    },
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let pending: Vec<_> = db
        .list_requests(Some(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1, "exactly one request may stay pending");
}

#[tokio::test]
async fn test_resubmit_requires_rejected_state() {
    let (workflow, db) = workflow();

    // No profile at all.
    let err = workflow.resubmit("driver-1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Pending profile.
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let err = workflow.resubmit("driver-1").await.unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));

    // Nothing changed.
    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(profile.verification_status, VerificationStatus::Pending);
    assert_eq!(profile.resubmission_count, 0);
    assert_eq!(db.list_requests(None).await.unwrap().len(), 1);

    // Approved profile.
    let request_id = pending_request_id(&db, "driver-1").await;
    workflow
        .decide(&request_id, Decision::Approved, "admin-1", None)
        .await
        .unwrap();
    let err = workflow.resubmit("driver-1").await.unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));
}

#[tokio::test]
async fn test_decide_is_single_use() {
    let (workflow, db) = workflow();
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let request_id = pending_request_id(&db, "driver-1").await;

    workflow
        .decide(&request_id, Decision::Approved, "admin-1", None)
        .await
        .unwrap();

    let err = workflow
        .decide(&request_id, Decision::Rejected, "admin-2", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));

    // The profile retains the result of the first decision.
    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(profile.verification_status, VerificationStatus::Approved);
    assert_eq!(profile.approved_by.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn test_decide_unknown_request() {
    let (workflow, _db) = workflow();
    let err = workflow
        .decide("no-such-id", Decision::Approved, "admin-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_rejection_defaults_reason_when_notes_empty() {
    let (workflow, db) = workflow();
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let request_id = pending_request_id(&db, "driver-1").await;

    workflow
        .decide(
            &request_id,
            Decision::Rejected,
            "admin-1",
            Some("   ".to_string()),
        )
        .await
        .unwrap();

    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(
        profile.rejection_reason.as_deref(),
        Some("No specific reason provided")
    );
}

#[tokio::test]
async fn test_end_to_end_reject_resubmit_approve() {
    let (workflow, db) = workflow();
    let gate = AccessGate::new(db.clone(), db.clone());
    db.upsert_user(&common::test_user("driver-1", Role::Driver))
        .await
        .unwrap();

    // Submit: pending, R1 created.
    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let r1 = pending_request_id(&db, "driver-1").await;

    // Reject with a reason.
    workflow
        .decide(
            &r1,
            Decision::Rejected,
            "admin-1",
            Some("blurry photo".to_string()),
        )
        .await
        .unwrap();
    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(profile.verification_status, VerificationStatus::Rejected);
    assert_eq!(profile.rejection_reason.as_deref(), Some("blurry photo"));

    // Resubmit (documents unchanged is fine).
    let r2 = workflow.resubmit("driver-1").await.unwrap();
    assert_ne!(r2.id, r1);
    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(profile.verification_status, VerificationStatus::Pending);
    assert_eq!(profile.resubmission_count, 1);
    assert!(profile.rejection_reason.is_none());

    // Approve with empty notes.
    workflow
        .decide(&r2.id, Decision::Approved, "admin-1", Some(String::new()))
        .await
        .unwrap();
    let profile = db.get_profile("driver-1").await.unwrap().unwrap();
    assert_eq!(profile.verification_status, VerificationStatus::Approved);
    assert!(profile.approved_at.is_some());
    assert_eq!(profile.approved_by.as_deref(), Some("admin-1"));

    // The gate now allows job access.
    let decision = gate.authorize("driver-1").await.unwrap();
    assert!(matches!(decision, AccessDecision::Allow { profile: Some(_) }));
}

#[tokio::test]
async fn test_list_pending_joins_and_placeholders() {
    let (workflow, db) = workflow();

    // driver-a has a user record; driver-b does not.
    db.upsert_user(&common::test_user("driver-a", Role::Driver))
        .await
        .unwrap();
    workflow
        .submit_or_update_profile("driver-a", full_submission())
        .await
        .unwrap();
    workflow
        .submit_or_update_profile(
            "driver-b",
            ProfileSubmission {
                name: Some("Orphan".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let entries = workflow.list_pending().await.unwrap();
    assert_eq!(entries.len(), 2);

    // Newest first: driver-b submitted last.
    assert_eq!(entries[0].driver_id, "driver-b");
    assert_eq!(entries[0].driver.name, "Unknown Driver");
    assert_eq!(entries[0].driver.email, "N/A");
    assert_eq!(entries[0].profile.name, "Orphan");

    assert_eq!(entries[1].driver_id, "driver-a");
    assert_eq!(entries[1].driver.name, "Test User");
    assert_eq!(entries[1].profile.license_number, "TN-2020-0042");
}

#[tokio::test]
async fn test_status_view_and_stats() {
    let (workflow, db) = workflow();

    let view = workflow.status("driver-1").await.unwrap();
    assert!(!view.profile_exists);
    assert!(!view.can_access_jobs);
    assert!(view.verification_request.is_none());

    workflow
        .submit_or_update_profile("driver-1", full_submission())
        .await
        .unwrap();
    let view = workflow.status("driver-1").await.unwrap();
    assert!(view.profile_exists);
    assert_eq!(view.verification_status, Some(VerificationStatus::Pending));
    assert!(!view.can_access_jobs);
    let summary = view.verification_request.unwrap();
    assert_eq!(summary.status, RequestStatus::Pending);

    let request_id = pending_request_id(&db, "driver-1").await;
    workflow
        .decide(&request_id, Decision::Approved, "admin-1", None)
        .await
        .unwrap();

    let view = workflow.status("driver-1").await.unwrap();
    assert!(view.can_access_jobs);

    let stats = workflow.stats().await.unwrap();
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.rejected, 0);
}
