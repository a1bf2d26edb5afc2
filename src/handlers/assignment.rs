// src/handlers/assignment.rs

use crate::{
    error::AppError,
    gateway::Gateway,
    models::exam::AssignmentResponse,
    resolver::ResolutionTicket,
    state::{AppState, Resolution},
};

/// Runs the lookup for a ticket without touching any state.
///
/// Used when the lookup is spawned off the event loop; feed the pair back
/// through `AppState::apply_resolution`.
pub async fn lookup(
    gateway: &dyn Gateway,
    ticket: ResolutionTicket,
) -> (ResolutionTicket, Result<AssignmentResponse, AppError>) {
    let result = gateway.assignment(&ticket.exam_id, &ticket.proctor_id).await;
    (ticket, result)
}

impl AppState {
    /// Selects an exam and resolves the proctor's assignment for it.
    pub async fn select_exam(&mut self, gateway: &dyn Gateway, exam_id: &str) -> Result<Resolution, AppError> {
        match self.choose_exam(exam_id)? {
            Some(ticket) => self.run_resolution(gateway, ticket).await,
            None => Ok(Resolution::Skipped),
        }
    }

    /// Resolves a ticket and applies the result if it is still current.
    pub async fn run_resolution(
        &mut self,
        gateway: &dyn Gateway,
        ticket: ResolutionTicket,
    ) -> Result<Resolution, AppError> {
        let (ticket, result) = lookup(gateway, ticket).await;
        self.apply_resolution(&ticket, result)
    }
}
