// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Database layer: store traits plus the Firestore and in-memory backends.
//!
//! The workflow and gate depend only on the traits here; the concrete
//! backend is chosen at startup and injected.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{DriverProfile, JobPost, RequestStatus, User, VerificationRequest};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const DRIVER_PROFILES: &str = "driver_profiles";
    pub const VERIFICATION_REQUESTS: &str = "verification_requests";
    pub const JOB_POSTS: &str = "job_posts";
}

/// Persistence for user accounts, keyed by subject id.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;
    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;
}

/// Persistence for driver profiles, keyed by subject id (unique per driver).
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<DriverProfile>, AppError>;
    async fn upsert_profile(&self, profile: &DriverProfile) -> Result<(), AppError>;
}

/// Persistence for verification requests.
///
/// Stores only enforce lookup/ordering contracts; the "at most one pending
/// request per driver" invariant is the workflow's responsibility.
#[async_trait::async_trait]
pub trait VerificationRequestStore: Send + Sync {
    async fn get_request(&self, id: &str) -> Result<Option<VerificationRequest>, AppError>;
    async fn insert_request(&self, request: &VerificationRequest) -> Result<(), AppError>;
    async fn update_request(&self, request: &VerificationRequest) -> Result<(), AppError>;
    /// The driver's pending request, if any.
    async fn pending_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError>;
    /// The driver's most recent request across all statuses.
    async fn latest_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError>;
    /// Requests filtered by status (all statuses when `None`), newest first.
    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<VerificationRequest>, AppError>;
    async fn count_requests(&self, status: RequestStatus) -> Result<u64, AppError>;
}

/// Read surface for job posts consumed by verified drivers.
#[async_trait::async_trait]
pub trait JobPostStore: Send + Sync {
    /// Open job posts, newest first.
    async fn list_open_jobs(&self) -> Result<Vec<JobPost>, AppError>;
    async fn insert_job(&self, job: &JobPost) -> Result<(), AppError>;
}
