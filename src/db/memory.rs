// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! In-memory store backend.
//!
//! Backs the integration tests and emulator-free local development with the
//! same lookup and ordering contracts as the Firestore backend.

use dashmap::DashMap;

use crate::db::{JobPostStore, ProfileStore, UserStore, VerificationRequestStore};
use crate::error::AppError;
use crate::models::{DriverProfile, JobPost, JobStatus, RequestStatus, User, VerificationRequest};

/// DashMap-backed store implementing all store traits.
#[derive(Default)]
pub struct MemoryDb {
    users: DashMap<String, User>,
    profiles: DashMap<String, DriverProfile>,
    requests: DashMap<String, VerificationRequest>,
    jobs: DashMap<String, JobPost>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<DriverProfile>, AppError> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn upsert_profile(&self, profile: &DriverProfile) -> Result<(), AppError> {
        self.profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl VerificationRequestStore for MemoryDb {
    async fn get_request(&self, id: &str) -> Result<Option<VerificationRequest>, AppError> {
        Ok(self.requests.get(id).map(|r| r.clone()))
    }

    async fn insert_request(&self, request: &VerificationRequest) -> Result<(), AppError> {
        self.requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn update_request(&self, request: &VerificationRequest) -> Result<(), AppError> {
        self.requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn pending_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError> {
        Ok(self
            .requests
            .iter()
            .find(|r| r.driver_id == driver_id && r.status == RequestStatus::Pending)
            .map(|r| r.clone()))
    }

    async fn latest_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError> {
        let mut requests: Vec<VerificationRequest> = self
            .requests
            .iter()
            .filter(|r| r.driver_id == driver_id)
            .map(|r| r.clone())
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests.into_iter().next())
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<VerificationRequest>, AppError> {
        let mut requests: Vec<VerificationRequest> = self
            .requests
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .map(|r| r.clone())
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn count_requests(&self, status: RequestStatus) -> Result<u64, AppError> {
        Ok(self.requests.iter().filter(|r| r.status == status).count() as u64)
    }
}

#[async_trait::async_trait]
impl JobPostStore for MemoryDb {
    async fn list_open_jobs(&self) -> Result<Vec<JobPost>, AppError> {
        let mut jobs: Vec<JobPost> = self
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Open)
            .map(|j| j.clone())
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn insert_job(&self, job: &JobPost) -> Result<(), AppError> {
        self.jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }
}
