// src/models/report.rs

use std::path::Path;

use serde::Serialize;
use validator::Validate;

use crate::{error::AppError, models::exam::Assignment};

/// The exam-minutes document (berita acara) being assembled.
///
/// Counts are kept as operands only: `total_absent` is always derived from
/// `total_expected` and `total_present` and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    pub ujian_id: String,
    pub pengawas_id: String,

    pub mapel_id: String,
    pub mata_pelajaran_display: String,
    pub kelas: String,
    pub kelas_id: String,
    pub sesi_id: String,
    pub sesi_name: String,
    pub mulai_ujian: String,
    pub ujian_berakhir: String,

    total_expected: Option<u32>,
    total_present: Option<u32>,
    present_manual: bool,

    pub absent_details: String,
    pub notes: String,
}

/// User-editable draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Kelas,
    TotalPresent,
    AbsentDetails,
    Notes,
}

impl ReportDraft {
    pub fn total_expected(&self) -> Option<u32> {
        self.total_expected
    }

    pub fn total_present(&self) -> Option<u32> {
        self.total_present
    }

    /// `max(0, expected - present)`, with a missing present count read as 0.
    /// Blank until an expected headcount is known.
    pub fn total_absent(&self) -> Option<u32> {
        self.total_expected
            .map(|expected| expected.saturating_sub(self.total_present.unwrap_or(0)))
    }

    /// A present count typed in by the proctor.
    pub fn set_total_present(&mut self, present: Option<u32>) {
        self.total_present = present;
        self.present_manual = present.is_some();
    }

    /// A present count derived from the roster and scan list.
    /// Replaces any manual value.
    pub fn set_reconciled_present(&mut self, present: Option<u32>) {
        self.total_present = present;
        self.present_manual = false;
    }

    pub fn present_is_manual(&self) -> bool {
        self.present_manual
    }

    /// Copies a resolved assignment into the draft verbatim.
    /// The present count is left alone.
    pub fn apply_assignment(&mut self, jadwal: &Assignment) {
        self.mapel_id = jadwal.mapel_id.clone();
        self.mata_pelajaran_display = jadwal.mata_pelajaran.clone();
        self.kelas = jadwal.kelas.clone();
        self.kelas_id = jadwal.kelas_id.clone();
        self.sesi_id = jadwal.sesi_id.clone();
        self.sesi_name = jadwal.sesi_name.clone();
        self.mulai_ujian = jadwal.mulai_ujian.clone();
        self.ujian_berakhir = jadwal.ujian_berakhir.clone();
        self.total_expected = Some(jadwal.total_siswa);
    }

    /// Blanks every assignment-derived field. Selection ids stay.
    pub fn clear_assignment(&mut self) {
        self.mapel_id.clear();
        self.mata_pelajaran_display.clear();
        self.kelas.clear();
        self.kelas_id.clear();
        self.sesi_id.clear();
        self.sesi_name.clear();
        self.mulai_ujian.clear();
        self.ujian_berakhir.clear();
        self.total_expected = None;
    }

    pub fn has_assignment(&self) -> bool {
        self.total_expected.is_some()
    }

    /// Freezes the draft into its transmittable form and validates it.
    pub fn freeze(&self) -> Result<ReportSubmission, AppError> {
        let submission = ReportSubmission {
            ujian_id: self.ujian_id.clone(),
            pengawas_id: self.pengawas_id.clone(),
            mapel_id: self.mapel_id.clone(),
            mata_pelajaran_display: self.mata_pelajaran_display.clone(),
            kelas: self.kelas.clone(),
            kelas_id: self.kelas_id.clone(),
            sesi_id: self.sesi_id.clone(),
            sesi_name: self.sesi_name.clone(),
            mulai_ujian: self.mulai_ujian.clone(),
            ujian_berakhir: self.ujian_berakhir.clone(),
            total_expected: count_text(self.total_expected),
            total_present: count_text(self.total_present),
            total_absent: count_text(self.total_absent()),
            absent_details: self.absent_details.clone(),
            notes: self.notes.clone(),
        };

        submission.validate()?;
        Ok(submission)
    }
}

fn count_text(count: Option<u32>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

/// A frozen draft, ready for `submit-report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct ReportSubmission {
    #[validate(length(min = 1, message = "Exam must be selected."))]
    pub ujian_id: String,
    #[validate(length(min = 1, message = "Proctor must be logged in."))]
    pub pengawas_id: String,
    pub mapel_id: String,
    pub mata_pelajaran_display: String,
    pub kelas: String,
    pub kelas_id: String,
    pub sesi_id: String,
    pub sesi_name: String,
    pub mulai_ujian: String,
    pub ujian_berakhir: String,
    pub total_expected: String,
    pub total_present: String,
    pub total_absent: String,
    pub absent_details: String,
    pub notes: String,
}

impl ReportSubmission {
    /// Flattened key/value pairs, in form order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ujian_id", self.ujian_id.clone()),
            ("pengawas_id", self.pengawas_id.clone()),
            ("mapel_id", self.mapel_id.clone()),
            ("mata_pelajaran_display", self.mata_pelajaran_display.clone()),
            ("kelas", self.kelas.clone()),
            ("kelas_id", self.kelas_id.clone()),
            ("sesi_id", self.sesi_id.clone()),
            ("sesi_name", self.sesi_name.clone()),
            ("mulai_ujian", self.mulai_ujian.clone()),
            ("ujian_berakhir", self.ujian_berakhir.clone()),
            ("total_expected", self.total_expected.clone()),
            ("total_present", self.total_present.clone()),
            ("total_absent", self.total_absent.clone()),
            ("absent_details", self.absent_details.clone()),
            ("notes", self.notes.clone()),
        ]
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Signature-capture surface.
pub trait SignatureCapture {
    fn is_empty(&self) -> bool;

    /// Trimmed raster export, PNG encoded.
    fn export_png(&self) -> Vec<u8>;
}

/// A capture surface fed from PNG files drawn elsewhere.
#[derive(Debug, Clone, Default)]
pub struct PngPad {
    png: Vec<u8>,
}

impl PngPad {
    /// Replaces the pad contents with an image from disk; the file must be a PNG.
    /// On error the pad is left as it was.
    pub fn load(&mut self, path: &Path) -> Result<(), AppError> {
        let png = std::fs::read(path).map_err(|e| {
            AppError::ValidationError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        if !png.starts_with(&PNG_MAGIC) {
            return Err(AppError::ValidationError(format!(
                "{} is not a PNG image",
                path.display()
            )));
        }
        self.png = png;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.png.clear();
    }
}

impl SignatureCapture for PngPad {
    fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    fn export_png(&self) -> Vec<u8> {
        self.png.clone()
    }
}

/// The proctor's signature as a PNG attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    png: Vec<u8>,
}

impl Signature {
    pub const FILE_NAME: &'static str = "signature.png";
    pub const MIME: &'static str = "image/png";

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    /// Takes the current contents of a capture surface.
    pub fn from_capture(pad: &dyn SignatureCapture) -> Self {
        if pad.is_empty() {
            Self::empty()
        } else {
            Self::from_png(pad.export_png())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.png
    }
}
