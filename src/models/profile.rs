//! Driver profile model and verification lifecycle fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Verification lifecycle state of a driver profile.
///
/// Transitions: `pending → approved`, `pending → rejected` (admin decision),
/// `rejected → pending` (resubmission), `approved → pending` (critical edit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

/// Driver profile stored in Firestore, keyed by the owning user's subject id.
///
/// At most one profile exists per `user_id`; the verification fields are
/// only meaningful once `profile_completed` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverProfile {
    /// Owning user's subject identifier (also the document ID)
    pub user_id: String,
    /// Legal name as it appears on the license
    pub name: String,
    /// Profile photo URL (blob storage)
    pub profile_photo: Option<String>,
    /// Front license photo URL
    pub license_photo_front: Option<String>,
    /// Back license photo URL
    pub license_photo_back: Option<String>,
    /// License number
    pub license_number: Option<String>,
    /// License expiry date
    pub license_expiry_date: Option<DateTime<Utc>>,
    /// Truck categories the driver can operate
    pub known_truck_types: Vec<String>,
    /// Free-form experience descriptor (e.g. "5+ years")
    pub experience: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub location: Option<String>,
    /// Whether the profile has been submitted in full
    pub profile_completed: bool,
    pub verification_status: VerificationStatus,
    /// When the current review cycle was opened
    pub verification_requested_at: Option<DateTime<Utc>>,
    /// Admin who approved the profile
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason given for the latest rejection; cleared on re-submission and approval
    pub rejection_reason: Option<String>,
    /// Number of times the driver resubmitted after rejection or critical edits
    pub resubmission_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
