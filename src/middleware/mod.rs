// SPDX-License-Identifier: MIT
// Copyright 2026 HaulLink Developers

//! Middleware modules (authentication, access gating, security).

pub mod admin;
pub mod auth;
pub mod driver_gate;
pub mod security;

pub use admin::{create_admin_jwt, require_admin};
pub use auth::require_auth;
pub use driver_gate::require_approved_driver;
