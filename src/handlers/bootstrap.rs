// src/handlers/bootstrap.rs

use crate::{error::AppError, gateway::Gateway, state::AppState};

impl AppState {
    /// Loads the exam catalogue and today's presence list.
    ///
    /// Either call failing aborts the load; there is no partially
    /// initialised state to fall back on.
    pub async fn bootstrap(gateway: &dyn Gateway) -> Result<AppState, AppError> {
        let init = gateway.init_data().await.map_err(|e| {
            tracing::error!("Failed to load initial data: {:?}", e);
            e
        })?;
        tracing::info!("Initial data loaded: {} exams", init.ujians.len());

        let scans = gateway.presence_today().await.map_err(|e| {
            tracing::error!("Failed to load today's presence: {:?}", e);
            e
        })?;
        tracing::info!("Presence loaded: {} scans today", scans.len());

        Ok(AppState::new(init, scans))
    }

    /// Re-fetches today's presence and reconciles the counts.
    pub async fn refresh_presence(&mut self, gateway: &dyn Gateway) -> Result<(), AppError> {
        let scans = gateway.presence_today().await?;
        tracing::debug!("Presence refreshed: {} scans", scans.len());
        self.replace_scans(scans);
        Ok(())
    }
}
