// src/models/proctor.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::ids::string_or_number;

/// An exam supervisor (pengawas), resolved from a badge scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proctor {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    /// Badge id printed in the proctor's QR code.
    #[serde(default, deserialize_with = "string_or_number")]
    pub niy: String,
}

/// The proctor's own check-in/check-out for today.
/// Arrival vs departure is decided by the server; this side only displays it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctorPresence {
    #[serde(default)]
    pub waktu_datang: Option<String>,

    #[serde(default)]
    pub waktu_pulang: Option<String>,
}

/// DTO for badge login.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = validate_badge))]
    pub niy: String,
}

const MAX_BADGE_LEN: usize = 64;

fn validate_badge(niy: &str) -> Result<(), validator::ValidationError> {
    if niy.is_empty() {
        return Err(validator::ValidationError::new("empty_badge")
            .with_message("Badge code must not be empty.".into()));
    }
    if niy.chars().count() > MAX_BADGE_LEN {
        return Err(validator::ValidationError::new("badge_too_long")
            .with_message(format!("Badge code is longer than {} characters.", MAX_BADGE_LEN).into()));
    }
    Ok(())
}

impl LoginRequest {
    /// Builds a login request from a raw decoded badge payload.
    pub fn from_badge(badge: &str) -> Self {
        Self {
            niy: badge.trim().to_string(),
        }
    }
}

/// Successful `login-niy` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: Proctor,

    #[serde(default)]
    pub presensi: Option<ProctorPresence>,
}
