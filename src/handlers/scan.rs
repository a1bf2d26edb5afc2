// src/handlers/scan.rs

use crate::{
    error::AppError,
    gateway::Gateway,
    models::{
        presence::{ScanKind, ScanRequest},
        proctor::Proctor,
    },
    scanner::{ScanEvent, ScanMode},
    state::AppState,
};

/// Result of one attendance scan accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReceipt {
    pub kind: ScanKind,
    pub message: String,
    /// Whether today's presence list could be re-fetched afterwards.
    pub list_refreshed: bool,
}

/// What a decoded payload turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    LoggedIn(Proctor),
    Informational(String),
    Attendance(AttendanceReceipt),
}

impl AppState {
    /// Routes a decoded payload by the mode its surface was opened with.
    pub async fn handle_scan(&mut self, gateway: &dyn Gateway, event: ScanEvent) -> Result<ScanOutcome, AppError> {
        match event.mode {
            ScanMode::Login => {
                let proctor = self.authenticate(gateway, &event.payload).await?;
                Ok(ScanOutcome::LoggedIn(proctor))
            }
            ScanMode::Informational => {
                self.session().require_active()?;
                tracing::info!("Informational scan: {}", event.payload);
                Ok(ScanOutcome::Informational(event.payload))
            }
            ScanMode::MarkAttendance => {
                let receipt = self.mark_attendance(gateway, &event.payload).await?;
                Ok(ScanOutcome::Attendance(receipt))
            }
        }
    }

    /// Submits a presence scan and applies the gateway's classification.
    pub async fn mark_attendance(&mut self, gateway: &dyn Gateway, code: &str) -> Result<AttendanceReceipt, AppError> {
        self.session().require_active()?;

        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::ValidationError("Scanned code is empty".to_string()));
        }

        let req = ScanRequest {
            kode_peserta: code.to_string(),
            ujian_id: self.draft().ujian_id.clone(),
        };
        let response = gateway.scan(&req).await.map_err(|e| {
            tracing::warn!("Scan of {} rejected: {:?}", code, e);
            e
        })?;

        match response.kind {
            ScanKind::Pengawas => {
                if let Some(presence) = response.presensi {
                    self.update_proctor_presence(presence)?;
                }
                tracing::info!("Proctor self-scan recorded");
            }
            ScanKind::Peserta => tracing::info!("Student {} scanned", code),
        }

        let list_refreshed = match self.refresh_presence(gateway).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error fetching presensi after scan: {:?}", e);
                false
            }
        };

        Ok(AttendanceReceipt {
            kind: response.kind,
            message: response.message,
            list_refreshed,
        })
    }
}
