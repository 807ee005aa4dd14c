//! Job post model.
//!
//! The job subsystem is a peer of the verification core; only the read
//! surface consumed by verified drivers lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Assigned,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::Closed => "closed",
        }
    }
}

/// Job post stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPost {
    /// Job id (UUID, also the document ID)
    pub id: String,
    /// Posting owner's subject id
    pub owner_id: String,
    pub title: String,
    /// Truck category required for the job
    pub truck_type: String,
    pub source_location: Option<String>,
    pub destination_location: Option<String>,
    /// Free-form wage descriptor (e.g. "₹30k-35k / month")
    pub salary_range: Option<String>,
    pub description: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}
