// src/models/presence.rs

use serde::{Deserialize, Serialize};

use crate::models::proctor::ProctorPresence;
use crate::utils::ids::string_or_number;

/// One attendance entry scanned today (presensi).
/// Not tied to a particular exam; the roster decides what it counts towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub kode_peserta: String,

    #[serde(default)]
    pub waktu_datang: Option<String>,

    #[serde(default)]
    pub waktu_pulang: Option<String>,
}

/// DTO for `scan-peserta`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub kode_peserta: String,

    /// Currently selected exam; empty when none is selected.
    pub ujian_id: String,
}

/// How the gateway classified a scanned code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Peserta,
    Pengawas,
}

/// `scan-peserta` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResponse {
    #[serde(rename = "type")]
    pub kind: ScanKind,

    #[serde(default)]
    pub message: String,

    /// Present when the code was the proctor's own badge.
    #[serde(default)]
    pub presensi: Option<ProctorPresence>,
}
