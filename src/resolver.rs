// src/resolver.rs

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared by every resolver in the process, so a ticket issued before a
/// reload can never match a generation issued after it.
static GENERATIONS: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    GENERATIONS.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one assignment lookup.
///
/// Carries the inputs it was issued for, so a response can be matched back
/// against the selection that is current when it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    pub generation: u64,
    pub exam_id: String,
    pub proctor_id: String,
}

/// Staleness guard for assignment lookups.
///
/// Every change of the (exam, proctor) selection takes a new generation from
/// a process-wide monotonic counter; only a ticket from the latest one may
/// apply. A fresh resolver sits at generation 0, which no ticket carries.
#[derive(Debug, Clone, Default)]
pub struct AssignmentResolver {
    generation: u64,
    current: Option<(String, String)>,
}

impl AssignmentResolver {
    /// Records a selection change.
    ///
    /// Returns a ticket when both ids are non-empty. Always invalidates
    /// earlier tickets, including when no new lookup is needed.
    pub fn trigger(&mut self, exam_id: &str, proctor_id: &str) -> Option<ResolutionTicket> {
        self.generation = next_generation();

        if exam_id.is_empty() || proctor_id.is_empty() {
            self.current = None;
            return None;
        }

        self.current = Some((exam_id.to_string(), proctor_id.to_string()));
        Some(ResolutionTicket {
            generation: self.generation,
            exam_id: exam_id.to_string(),
            proctor_id: proctor_id.to_string(),
        })
    }

    /// Invalidates every outstanding ticket.
    pub fn cancel(&mut self) {
        self.generation = next_generation();
        self.current = None;
    }

    pub fn is_current(&self, ticket: &ResolutionTicket) -> bool {
        ticket.generation == self.generation
            && self
                .current
                .as_ref()
                .is_some_and(|(exam, proctor)| *exam == ticket.exam_id && *proctor == ticket.proctor_id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
