// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Driver verification workflow.
//!
//! The one place verification state moves: profile submission/update,
//! resubmission after rejection, and admin decisions all funnel through
//! here. Mutations for the same driver are serialized with a per-driver
//! lock; drivers never contend with each other.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::db::{ProfileStore, UserStore, VerificationRequestStore};
use crate::error::AppError;
use crate::models::{
    DocumentSnapshot, DriverProfile, Priority, RequestStatus, VerificationRequest,
    VerificationStatus,
};

/// Profile fields whose change mandates a new admin review cycle.
///
/// Everything else (age, location, experience, gender, profile photo,
/// license number/expiry) may change freely without forcing re-review, so
/// cosmetic edits are not punished with review delay.
pub const CRITICAL_FIELDS: [&str; 4] = [
    "name",
    "known_truck_types",
    "license_photo_front",
    "license_photo_back",
];

const SUPERSEDED_NOTE: &str = "superseded by profile update";
const DEFAULT_REJECTION_REASON: &str = "No specific reason provided";

const UNKNOWN_DRIVER: &str = "Unknown Driver";
const NOT_AVAILABLE: &str = "N/A";

/// Partial profile submission: only fields actually present overwrite
/// existing values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileSubmission {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub license_photo_front: Option<String>,
    pub license_photo_back: Option<String>,
    pub license_number: Option<String>,
    pub license_expiry_date: Option<DateTime<Utc>>,
    pub known_truck_types: Option<Vec<String>>,
    pub experience: Option<String>,
    pub gender: Option<String>,
    #[validate(range(min = 18, max = 80, message = "must be between 18 and 80"))]
    pub age: Option<u32>,
    pub location: Option<String>,
}

impl ProfileSubmission {
    /// Fields present in this submission that belong to [`CRITICAL_FIELDS`].
    pub fn critical_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.known_truck_types.is_some() {
            fields.push("known_truck_types");
        }
        if self.license_photo_front.is_some() {
            fields.push("license_photo_front");
        }
        if self.license_photo_back.is_some() {
            fields.push("license_photo_back");
        }
        fields
    }
}

/// What a submission did to the review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    /// New profile, always reviewed
    FirstSubmission,
    /// Critical fields changed on an existing profile
    CriticalResubmission,
    /// Only non-critical fields changed
    NoReview,
}

/// Result of a profile submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub profile: DriverProfile,
    pub verification_triggered: bool,
    pub kind: SubmitKind,
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Parse the wire value; anything but "approved"/"rejected" is invalid.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "approved" => Some(Decision::Approved),
            "rejected" => Some(Decision::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    fn request_status(&self) -> RequestStatus {
        match self {
            Decision::Approved => RequestStatus::Approved,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }

    fn verification_status(&self) -> VerificationStatus {
        match self {
            Decision::Approved => VerificationStatus::Approved,
            Decision::Rejected => VerificationStatus::Rejected,
        }
    }
}

/// Outcome of a processed decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub request: VerificationRequest,
    pub profile: DriverProfile,
}

/// Driver identity columns of a review entry; placeholders when the user
/// record is missing.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDriverIdentity {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Profile summary columns of a review entry; placeholders when the profile
/// record is missing.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewProfileSummary {
    pub name: String,
    pub license_number: String,
    pub license_expiry_date: Option<DateTime<Utc>>,
    pub experience: String,
    pub location: String,
    pub gender: String,
    pub age: Option<u32>,
    pub known_truck_types: Vec<String>,
}

/// A verification request joined with driver identity and profile summary.
///
/// A request is always visible even if a related record was removed; missing
/// joins render placeholder values instead of dropping the row.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    pub id: String,
    pub driver_id: String,
    pub status: RequestStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    pub notes: Option<String>,
    pub driver: ReviewDriverIdentity,
    pub profile: ReviewProfileSummary,
    pub documents: DocumentSnapshot,
}

/// Latest request summary for the driver-facing status view.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub id: String,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Driver-facing verification status projection.
#[derive(Debug, Clone)]
pub struct StatusView {
    pub profile_exists: bool,
    pub verification_status: Option<VerificationStatus>,
    pub can_access_jobs: bool,
    pub profile_completed: bool,
    pub verification_request: Option<RequestSummary>,
}

/// Request counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequestStats {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// The verification state machine, owning injected stores.
pub struct VerificationWorkflow {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
    requests: Arc<dyn VerificationRequestStore>,
    driver_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl VerificationWorkflow {
    pub fn new(
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn ProfileStore>,
        requests: Arc<dyn VerificationRequestStore>,
    ) -> Self {
        Self {
            users,
            profiles,
            requests,
            driver_locks: DashMap::new(),
        }
    }

    /// Serialize mutations per driver. Two concurrent edits for the same
    /// driver could otherwise both see "no pending request" and each open one.
    async fn lock_driver(&self, user_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = self
            .driver_locks
            .entry(user_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Submit a new driver profile or partially update an existing one.
    ///
    /// A first submission is always reviewed. On an existing profile, only
    /// critical-field changes open a new review cycle; any pending request
    /// is superseded (cancelled) rather than left dangling.
    pub async fn submit_or_update_profile(
        &self,
        user_id: &str,
        submission: ProfileSubmission,
    ) -> Result<SubmitOutcome, AppError> {
        submission.validate().map_err(AppError::from)?;
        if let Some(types) = &submission.known_truck_types {
            if types.iter().any(|t| t.trim().is_empty()) {
                return Err(AppError::field_validation(
                    "known_truck_types",
                    "tags must not be empty",
                ));
            }
        }

        let _guard = self.lock_driver(user_id).await;
        let now = Utc::now();

        match self.profiles.get_profile(user_id).await? {
            None => {
                let name = submission
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::field_validation("name", "required on first submission")
                    })?;

                let mut profile = DriverProfile {
                    user_id: user_id.to_string(),
                    name,
                    profile_photo: None,
                    license_photo_front: None,
                    license_photo_back: None,
                    license_number: None,
                    license_expiry_date: None,
                    known_truck_types: Vec::new(),
                    experience: None,
                    gender: None,
                    age: None,
                    location: None,
                    profile_completed: true,
                    verification_status: VerificationStatus::Pending,
                    verification_requested_at: Some(now),
                    approved_by: None,
                    approved_at: None,
                    rejection_reason: None,
                    resubmission_count: 0,
                    created_at: now,
                    updated_at: now,
                };
                apply_submission(&mut profile, &submission, now);

                let request = new_request(&profile, now);
                self.requests.insert_request(&request).await?;
                self.profiles.upsert_profile(&profile).await?;

                tracing::info!(
                    user_id,
                    request_id = %request.id,
                    "Driver profile submitted for first review"
                );

                Ok(SubmitOutcome {
                    profile,
                    verification_triggered: true,
                    kind: SubmitKind::FirstSubmission,
                })
            }
            Some(mut profile) => {
                let critical = submission.critical_fields();
                apply_submission(&mut profile, &submission, now);

                if critical.is_empty() {
                    self.profiles.upsert_profile(&profile).await?;
                    return Ok(SubmitOutcome {
                        profile,
                        verification_triggered: false,
                        kind: SubmitKind::NoReview,
                    });
                }

                profile.verification_status = VerificationStatus::Pending;
                profile.rejection_reason = None;
                profile.verification_requested_at = Some(now);

                self.supersede_pending_request(user_id, now).await?;
                let request = new_request(&profile, now);
                self.requests.insert_request(&request).await?;
                self.profiles.upsert_profile(&profile).await?;

                tracing::info!(
                    user_id,
                    request_id = %request.id,
                    fields = ?critical,
                    "Critical profile fields changed, re-verification opened"
                );

                Ok(SubmitOutcome {
                    profile,
                    verification_triggered: true,
                    kind: SubmitKind::CriticalResubmission,
                })
            }
        }
    }

    /// Resubmit for review after a rejection. Only valid from the rejected
    /// state with no review already in flight.
    pub async fn resubmit(&self, user_id: &str) -> Result<VerificationRequest, AppError> {
        let _guard = self.lock_driver(user_id).await;

        let mut profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver profile not found".to_string()))?;

        if !profile.profile_completed {
            return Err(AppError::PreconditionFailed(
                "profile is not complete".to_string(),
            ));
        }
        if profile.verification_status != VerificationStatus::Rejected {
            return Err(AppError::PreconditionFailed(
                "can only resubmit rejected verifications".to_string(),
            ));
        }
        if self
            .requests
            .pending_request_for_driver(user_id)
            .await?
            .is_some()
        {
            return Err(AppError::PreconditionFailed(
                "a verification request is already pending".to_string(),
            ));
        }

        let now = Utc::now();
        let request = new_request(&profile, now);
        self.requests.insert_request(&request).await?;

        profile.verification_status = VerificationStatus::Pending;
        profile.rejection_reason = None;
        profile.resubmission_count += 1;
        profile.verification_requested_at = Some(now);
        profile.updated_at = now;
        self.profiles.upsert_profile(&profile).await?;

        tracing::info!(
            user_id,
            request_id = %request.id,
            resubmission_count = profile.resubmission_count,
            "Verification resubmitted"
        );

        Ok(request)
    }

    /// Process an admin decision on a pending request.
    ///
    /// The single state-transition point: this is the only place a profile's
    /// verification status moves out of `pending`.
    pub async fn decide(
        &self,
        request_id: &str,
        action: Decision,
        admin_id: &str,
        notes: Option<String>,
    ) -> Result<DecisionOutcome, AppError> {
        let not_found =
            || AppError::NotFound(format!("Verification request {} not found", request_id));

        let initial = self
            .requests
            .get_request(request_id)
            .await?
            .ok_or_else(not_found)?;

        let _guard = self.lock_driver(&initial.driver_id).await;

        // Re-read under the driver lock: a racing decide or supersede may
        // have processed the request between the first read and the lock.
        let mut request = self
            .requests
            .get_request(request_id)
            .await?
            .ok_or_else(not_found)?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::PreconditionFailed(
                "request already processed".to_string(),
            ));
        }

        let now = Utc::now();
        let notes = notes.filter(|n| !n.trim().is_empty());

        request.status = action.request_status();
        request.processed_by = Some(admin_id.to_string());
        request.processed_at = Some(now);
        request.notes = notes.clone();
        self.requests.update_request(&request).await?;

        let mut profile = self
            .profiles
            .get_profile(&request.driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver profile not found".to_string()))?;

        profile.verification_status = action.verification_status();
        profile.updated_at = now;
        match action {
            Decision::Approved => {
                profile.approved_by = Some(admin_id.to_string());
                profile.approved_at = Some(now);
                profile.rejection_reason = None;
            }
            Decision::Rejected => {
                profile.rejection_reason =
                    Some(notes.unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string()));
            }
        }
        self.profiles.upsert_profile(&profile).await?;

        tracing::info!(
            request_id,
            driver_id = %request.driver_id,
            admin_id,
            action = action.as_str(),
            "Verification request processed"
        );

        Ok(DecisionOutcome { request, profile })
    }

    /// Pending requests joined with driver identity and profile summary,
    /// newest first.
    pub async fn list_pending(&self) -> Result<Vec<ReviewEntry>, AppError> {
        let requests = self
            .requests
            .list_requests(Some(RequestStatus::Pending))
            .await?;
        self.join_entries(requests).await
    }

    /// All requests regardless of status (audit/history view), newest first.
    pub async fn list_all(&self) -> Result<Vec<ReviewEntry>, AppError> {
        let requests = self.requests.list_requests(None).await?;
        self.join_entries(requests).await
    }

    /// Driver-facing status projection.
    pub async fn status(&self, user_id: &str) -> Result<StatusView, AppError> {
        let Some(profile) = self.profiles.get_profile(user_id).await? else {
            return Ok(StatusView {
                profile_exists: false,
                verification_status: None,
                can_access_jobs: false,
                profile_completed: false,
                verification_request: None,
            });
        };

        let latest = self.requests.latest_request_for_driver(user_id).await?;

        Ok(StatusView {
            profile_exists: true,
            verification_status: Some(profile.verification_status),
            can_access_jobs: profile.verification_status == VerificationStatus::Approved,
            profile_completed: profile.profile_completed,
            verification_request: latest.map(|r| RequestSummary {
                id: r.id,
                status: r.status,
                submitted_at: r.created_at,
                processed_at: r.processed_at,
                notes: r.notes,
            }),
        })
    }

    /// The driver's own profile.
    pub async fn profile(&self, user_id: &str) -> Result<Option<DriverProfile>, AppError> {
        self.profiles.get_profile(user_id).await
    }

    /// Request counts for the admin dashboard.
    pub async fn stats(&self) -> Result<RequestStats, AppError> {
        let (pending, approved, rejected) = tokio::try_join!(
            self.requests.count_requests(RequestStatus::Pending),
            self.requests.count_requests(RequestStatus::Approved),
            self.requests.count_requests(RequestStatus::Rejected),
        )?;

        Ok(RequestStats {
            pending,
            approved,
            rejected,
        })
    }

    /// Mark the driver's pending request (if any) as superseded.
    async fn supersede_pending_request(
        &self,
        driver_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if let Some(mut pending) = self.requests.pending_request_for_driver(driver_id).await? {
            pending.status = RequestStatus::Cancelled;
            pending.processed_at = Some(now);
            pending.notes = Some(SUPERSEDED_NOTE.to_string());
            self.requests.update_request(&pending).await?;

            tracing::debug!(
                driver_id,
                request_id = %pending.id,
                "Pending verification request superseded"
            );
        }
        Ok(())
    }

    async fn join_entries(
        &self,
        requests: Vec<VerificationRequest>,
    ) -> Result<Vec<ReviewEntry>, AppError> {
        stream::iter(requests)
            .then(|request| self.join_entry(request))
            .collect::<Vec<Result<ReviewEntry, AppError>>>()
            .await
            .into_iter()
            .collect()
    }

    async fn join_entry(&self, request: VerificationRequest) -> Result<ReviewEntry, AppError> {
        let user = self.users.get_user(&request.driver_id).await?;
        let profile = self.profiles.get_profile(&request.driver_id).await?;

        let driver = match user {
            Some(user) => ReviewDriverIdentity {
                name: user.name,
                email: user.email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                phone: user.phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
            None => ReviewDriverIdentity {
                name: UNKNOWN_DRIVER.to_string(),
                email: NOT_AVAILABLE.to_string(),
                phone: NOT_AVAILABLE.to_string(),
            },
        };

        let profile = match profile {
            Some(profile) => ReviewProfileSummary {
                name: profile.name,
                license_number: profile
                    .license_number
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                license_expiry_date: profile.license_expiry_date,
                experience: profile
                    .experience
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                location: profile.location.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                gender: profile.gender.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                age: profile.age,
                known_truck_types: profile.known_truck_types,
            },
            None => ReviewProfileSummary {
                name: NOT_AVAILABLE.to_string(),
                license_number: NOT_AVAILABLE.to_string(),
                license_expiry_date: None,
                experience: NOT_AVAILABLE.to_string(),
                location: NOT_AVAILABLE.to_string(),
                gender: NOT_AVAILABLE.to_string(),
                age: None,
                known_truck_types: Vec::new(),
            },
        };

        Ok(ReviewEntry {
            id: request.id,
            driver_id: request.driver_id,
            status: request.status,
            priority: request.priority,
            created_at: request.created_at,
            processed_at: request.processed_at,
            processed_by: request.processed_by,
            notes: request.notes,
            driver,
            profile,
            documents: request.documents,
        })
    }
}

/// Overwrite only the fields present in the submission.
fn apply_submission(
    profile: &mut DriverProfile,
    submission: &ProfileSubmission,
    now: DateTime<Utc>,
) {
    if let Some(name) = &submission.name {
        profile.name = name.clone();
    }
    if let Some(photo) = &submission.profile_photo {
        profile.profile_photo = Some(photo.clone());
    }
    if let Some(front) = &submission.license_photo_front {
        profile.license_photo_front = Some(front.clone());
    }
    if let Some(back) = &submission.license_photo_back {
        profile.license_photo_back = Some(back.clone());
    }
    if let Some(number) = &submission.license_number {
        profile.license_number = Some(number.clone());
    }
    if let Some(expiry) = submission.license_expiry_date {
        profile.license_expiry_date = Some(expiry);
    }
    if let Some(types) = &submission.known_truck_types {
        profile.known_truck_types = types.clone();
    }
    if let Some(experience) = &submission.experience {
        profile.experience = Some(experience.clone());
    }
    if let Some(gender) = &submission.gender {
        profile.gender = Some(gender.clone());
    }
    if let Some(age) = submission.age {
        profile.age = Some(age);
    }
    if let Some(location) = &submission.location {
        profile.location = Some(location.clone());
    }
    profile.updated_at = now;
}

/// Snapshot the profile's current document URLs into a new pending request.
fn new_request(profile: &DriverProfile, now: DateTime<Utc>) -> VerificationRequest {
    VerificationRequest {
        id: Uuid::new_v4().to_string(),
        driver_id: profile.user_id.clone(),
        profile_id: profile.user_id.clone(),
        status: RequestStatus::Pending,
        priority: Priority::default(),
        documents: DocumentSnapshot {
            profile_photo: profile.profile_photo.clone().unwrap_or_default(),
            license_photo_front: profile.license_photo_front.clone().unwrap_or_default(),
            license_photo_back: profile.license_photo_back.clone().unwrap_or_default(),
        },
        processed_by: None,
        processed_at: None,
        notes: None,
        created_at: now,
    }
}
