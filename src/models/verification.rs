//! Verification request model — one record per review cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a verification request.
///
/// Only `pending` requests can be processed by an admin. Requests that are
/// superseded by a newer submission are marked `cancelled`, never deleted,
/// so the full review history is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

/// Review priority. Informational only; the queue is ordered by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Snapshot of the reviewable document URLs at submission time.
///
/// A copy, not a live reference: later profile edits do not alter a request
/// already under review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub profile_photo: String,
    pub license_photo_front: String,
    pub license_photo_back: String,
}

/// A single verification review cycle, stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Request id (UUID, also the document ID)
    pub id: String,
    /// Subject id of the driver under review
    pub driver_id: String,
    /// The reviewed profile (profiles are keyed by user id)
    pub profile_id: String,
    pub status: RequestStatus,
    pub priority: Priority,
    /// Documents as they were when this cycle opened
    pub documents: DocumentSnapshot,
    /// Admin who processed the request
    pub processed_by: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    /// Free-form review notes; doubles as the rejection reason
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
