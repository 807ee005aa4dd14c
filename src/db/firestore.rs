// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Firestore client wrapper implementing the store traits.
//!
//! One collection per model:
//! - Users (account records, doc id = subject id)
//! - Driver profiles (doc id = subject id, enforcing one profile per driver)
//! - Verification requests (doc id = request UUID)
//! - Job posts (doc id = job UUID)

use crate::db::collections;
use crate::db::{JobPostStore, ProfileStore, UserStore, VerificationRequestStore};
use crate::error::AppError;
use crate::models::{DriverProfile, JobPost, JobStatus, RequestStatus, User, VerificationRequest};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait::async_trait]
impl UserStore for FirestoreDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for FirestoreDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<DriverProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::DRIVER_PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_profile(&self, profile: &DriverProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::DRIVER_PROFILES)
            .document_id(&profile.user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl VerificationRequestStore for FirestoreDb {
    async fn get_request(&self, id: &str) -> Result<Option<VerificationRequest>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VERIFICATION_REQUESTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_request(&self, request: &VerificationRequest) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VERIFICATION_REQUESTS)
            .document_id(&request.id)
            .object(request)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn update_request(&self, request: &VerificationRequest) -> Result<(), AppError> {
        self.insert_request(request).await
    }

    async fn pending_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError> {
        let pending: Vec<VerificationRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::VERIFICATION_REQUESTS)
            .filter(|q| {
                q.for_all([
                    q.field("driver_id").eq(driver_id),
                    q.field("status").eq(RequestStatus::Pending.as_str()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(pending.into_iter().next())
    }

    async fn latest_request_for_driver(
        &self,
        driver_id: &str,
    ) -> Result<Option<VerificationRequest>, AppError> {
        let latest: Vec<VerificationRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::VERIFICATION_REQUESTS)
            .filter(|q| q.for_all([q.field("driver_id").eq(driver_id)]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(latest.into_iter().next())
    }

    async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<VerificationRequest>, AppError> {
        match status {
            Some(status) => self
                .get_client()?
                .fluent()
                .select()
                .from(collections::VERIFICATION_REQUESTS)
                .filter(move |q| q.for_all([q.field("status").eq(status.as_str())]))
                .order_by([(
                    "created_at",
                    firestore::FirestoreQueryDirection::Descending,
                )])
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            None => self
                .get_client()?
                .fluent()
                .select()
                .from(collections::VERIFICATION_REQUESTS)
                .order_by([(
                    "created_at",
                    firestore::FirestoreQueryDirection::Descending,
                )])
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
        }
    }

    async fn count_requests(&self, status: RequestStatus) -> Result<u64, AppError> {
        // Review queues are admin-sized; fetching and counting keeps the
        // query shape identical to the emulator-tested list path.
        let requests: Vec<VerificationRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::VERIFICATION_REQUESTS)
            .filter(move |q| q.for_all([q.field("status").eq(status.as_str())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(requests.len() as u64)
    }
}

#[async_trait::async_trait]
impl JobPostStore for FirestoreDb {
    async fn list_open_jobs(&self) -> Result<Vec<JobPost>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::JOB_POSTS)
            .filter(|q| q.for_all([q.field("status").eq(JobStatus::Open.as_str())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert_job(&self, job: &JobPost) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::JOB_POSTS)
            .document_id(&job.id)
            .object(job)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
