// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Access gate for job endpoints.
//!
//! Drivers only reach job listings once an admin has approved their
//! profile; every other role passes through untouched.

use serde::Serialize;
use std::sync::Arc;

use crate::db::{ProfileStore, UserStore};
use crate::error::AppError;
use crate::models::{DriverProfile, Role, VerificationStatus};

/// Why a driver was denied access.
///
/// The order of the checks matters: an incomplete profile must never be
/// reported as "rejected", even if a stale rejection reason is still set
/// from an earlier cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyCode {
    UserNotFound,
    NoProfile,
    IncompleteProfile,
    VerificationPending,
    VerificationRejected,
}

impl DenyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyCode::UserNotFound => "USER_NOT_FOUND",
            DenyCode::NoProfile => "NO_PROFILE",
            DenyCode::IncompleteProfile => "INCOMPLETE_PROFILE",
            DenyCode::VerificationPending => "VERIFICATION_PENDING",
            DenyCode::VerificationRejected => "VERIFICATION_REJECTED",
        }
    }
}

/// A denied access check.
#[derive(Debug, Clone)]
pub struct AccessDenied {
    pub code: DenyCode,
    pub message: String,
    /// The profile's verification status, when one exists
    pub verification_status: Option<VerificationStatus>,
    /// Rejection reason, for VERIFICATION_REJECTED
    pub rejection_reason: Option<String>,
}

/// Outcome of an access check.
#[derive(Debug, Clone)]
pub enum AccessDecision {
    /// Access granted; carries the driver profile when the caller is a driver
    Allow { profile: Option<DriverProfile> },
    Deny(AccessDenied),
}

/// Reads a driver's verification state and allows or denies job access.
pub struct AccessGate {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl AccessGate {
    pub fn new(users: Arc<dyn UserStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { users, profiles }
    }

    /// Decide whether the given subject may access job endpoints.
    pub async fn authorize(&self, user_id: &str) -> Result<AccessDecision, AppError> {
        let Some(user) = self.users.get_user(user_id).await? else {
            return Ok(deny(
                DenyCode::UserNotFound,
                "Please complete registration first",
                None,
            ));
        };

        // The gate is a no-op for owners, admins, and unassigned accounts.
        if user.role != Role::Driver {
            return Ok(AccessDecision::Allow { profile: None });
        }

        let Some(profile) = self.profiles.get_profile(user_id).await? else {
            return Ok(deny(
                DenyCode::NoProfile,
                "Please complete your driver profile first",
                None,
            ));
        };

        if !profile.profile_completed {
            return Ok(deny(
                DenyCode::IncompleteProfile,
                "Please complete your driver profile",
                Some(&profile),
            ));
        }

        match profile.verification_status {
            VerificationStatus::Pending => Ok(deny(
                DenyCode::VerificationPending,
                "Your profile is under review. Please wait for admin approval.",
                Some(&profile),
            )),
            VerificationStatus::Rejected => Ok(AccessDecision::Deny(AccessDenied {
                code: DenyCode::VerificationRejected,
                message: profile.rejection_reason.clone().unwrap_or_else(|| {
                    "Your profile was rejected. Please update and resubmit.".to_string()
                }),
                verification_status: Some(profile.verification_status),
                rejection_reason: profile.rejection_reason.clone(),
            })),
            VerificationStatus::Approved => {
                tracing::debug!(user_id, "Driver approved for job access");
                Ok(AccessDecision::Allow {
                    profile: Some(profile),
                })
            }
        }
    }
}

fn deny(code: DenyCode, message: &str, profile: Option<&DriverProfile>) -> AccessDecision {
    AccessDecision::Deny(AccessDenied {
        code,
        message: message.to_string(),
        verification_status: profile.map(|p| p.verification_status),
        rejection_reason: profile.and_then(|p| p.rejection_reason.clone()),
    })
}
