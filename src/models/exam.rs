// src/models/exam.rs

use serde::{Deserialize, Serialize};

use crate::utils::ids::{count_from_any, string_or_number};

/// A top-level examination event (ujian).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default)]
    pub nama_ujian: String,
}

/// Bootstrap payload from `init-data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitData {
    /// Proctor directory. Only carried through; login resolves the proctor.
    #[serde(default)]
    pub pengawas: Vec<serde_json::Value>,

    #[serde(default)]
    pub ujians: Vec<Exam>,
}

/// A resolved (exam, proctor) schedule entry (jadwal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default, deserialize_with = "string_or_number")]
    pub mapel_id: String,

    /// Subject display name.
    #[serde(default)]
    pub mata_pelajaran: String,

    #[serde(default)]
    pub kelas: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub kelas_id: String,

    #[serde(default, deserialize_with = "string_or_number")]
    pub sesi_id: String,

    #[serde(default)]
    pub sesi_name: String,

    #[serde(default)]
    pub mulai_ujian: String,

    #[serde(default)]
    pub ujian_berakhir: String,

    /// Expected headcount.
    #[serde(deserialize_with = "count_from_any")]
    pub total_siswa: u32,
}

/// A student expected for an assignment (peserta).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterEntry {
    pub nama: String,

    #[serde(deserialize_with = "string_or_number")]
    pub nomor_peserta: String,
}

/// `get-assignment` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignmentResponse {
    pub jadwal: Assignment,

    #[serde(default)]
    pub peserta: Vec<RosterEntry>,
}
