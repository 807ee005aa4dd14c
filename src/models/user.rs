//! User account model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a user account.
///
/// New accounts start as `unassigned` until registration picks a side of
/// the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Owner,
    Admin,
    Unassigned,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Unassigned => "unassigned",
        }
    }
}

/// How the account was authenticated with the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Phone,
}

/// User account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable subject identifier from the identity provider (also the document ID)
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Email address (may be absent for phone-auth accounts)
    pub email: Option<String>,
    /// Phone number (may be absent for Google-auth accounts)
    pub phone: Option<String>,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Marketplace role
    pub role: Role,
    /// Whether the account is active
    pub is_active: bool,
    /// Whether registration (name + phone + role) was completed
    pub registration_completed: bool,
    /// How the account authenticated
    pub auth_provider: AuthProvider,
    /// When the account was first seen
    pub created_at: DateTime<Utc>,
    /// Last successful login
    pub last_login: DateTime<Utc>,
}
