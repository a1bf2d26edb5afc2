// src/handlers/report.rs

use crate::{error::AppError, gateway::Gateway, models::report::Signature, state::AppState};

impl AppState {
    /// Submits the exam minutes with the proctor's signature.
    ///
    /// Checks run before any network call: active session, signature
    /// present, required fields filled. On success the whole state is reset
    /// to logged out; on failure the draft is left intact for a retry.
    pub async fn submit(&mut self, gateway: &dyn Gateway, signature: &Signature) -> Result<(), AppError> {
        self.session().require_active()?;

        if signature.is_empty() {
            return Err(AppError::ValidationError("Signature required".to_string()));
        }

        let submission = self.draft().freeze()?;

        gateway
            .submit_report(&submission, signature)
            .await
            .map_err(|e| {
                tracing::error!("Failed to submit report for exam {}: {:?}", submission.ujian_id, e);
                e
            })?;

        tracing::info!(
            "Report submitted: exam {} by proctor {}",
            submission.ujian_id,
            submission.pengawas_id
        );
        self.reset();
        Ok(())
    }
}
