// src/gateway/mod.rs

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        exam::{AssignmentResponse, InitData},
        presence::{ScanRecord, ScanRequest, ScanResponse},
        proctor::{LoginRequest, LoginResponse},
        report::{ReportSubmission, Signature},
    },
};

pub use http::HttpGateway;

/// The remote backend that owns exams, schedules, presence and reports.
///
/// Every call is a suspension point; callers must tolerate other events
/// being processed while one is in flight.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET init-data`
    async fn init_data(&self) -> Result<InitData, AppError>;

    /// `POST login-niy`. Fails with `AuthError` on an unknown badge.
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError>;

    /// `GET presensi-today`
    async fn presence_today(&self) -> Result<Vec<ScanRecord>, AppError>;

    /// `GET get-assignment`. Fails with `AssignmentNotFound` when the pair has no schedule.
    async fn assignment(&self, exam_id: &str, proctor_id: &str) -> Result<AssignmentResponse, AppError>;

    /// `POST scan-peserta`. Fails with `ScanRejected` when the code is refused.
    async fn scan(&self, req: &ScanRequest) -> Result<ScanResponse, AppError>;

    /// `POST submit-report` as multipart with the signature attached.
    async fn submit_report(&self, report: &ReportSubmission, signature: &Signature) -> Result<(), AppError>;
}
