// src/handlers/auth.rs

use validator::Validate;

use crate::{
    error::AppError,
    gateway::Gateway,
    models::proctor::{LoginRequest, Proctor},
    state::AppState,
};

impl AppState {
    /// Logs a proctor in from a scanned badge code.
    ///
    /// On success the session is on the welcome screen. On failure the
    /// session stays logged out and the gateway's message is returned.
    pub async fn authenticate(&mut self, gateway: &dyn Gateway, badge: &str) -> Result<Proctor, AppError> {
        if !self.session().is_logged_out() {
            return Err(AppError::InvalidState("A proctor is already logged in".to_string()));
        }

        let req = LoginRequest::from_badge(badge);
        req.validate()?;

        let login = gateway.login(&req).await.map_err(|e| {
            tracing::warn!("Login failed for badge {}: {:?}", req.niy, e);
            e
        })?;
        let proctor = login.user.clone();

        if let Some(ticket) = self.login_succeeded(login)? {
            // Re-login with an exam still selected; a lookup failure here
            // must not undo the login itself.
            if let Err(e) = self.run_resolution(gateway, ticket).await {
                tracing::warn!("Assignment lookup after login failed: {:?}", e);
            }
        }

        Ok(proctor)
    }
}
