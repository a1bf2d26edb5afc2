// src/reconcile.rs

use std::collections::HashSet;

use crate::models::{exam::RosterEntry, presence::ScanRecord};

/// A roster entry with its derived presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterStatus<'a> {
    pub entry: &'a RosterEntry,
    pub present: bool,
}

impl RosterStatus<'_> {
    pub fn label(&self) -> &'static str {
        if self.present { "Hadir" } else { "Belum Scan" }
    }
}

/// Index of scanned codes for O(1) membership.
pub fn scanned_codes(scans: &[ScanRecord]) -> HashSet<&str> {
    scans.iter().map(|s| s.kode_peserta.as_str()).collect()
}

/// Number of roster entries that have at least one matching scan.
///
/// Scans matching no roster entry are ignored. Duplicate scans and the order
/// of either list do not change the result.
pub fn count_present(roster: &[RosterEntry], scans: &[ScanRecord]) -> u32 {
    let codes = scanned_codes(scans);
    let present = roster
        .iter()
        .filter(|entry| codes.contains(entry.nomor_peserta.as_str()))
        .count();
    u32::try_from(present).unwrap_or(u32::MAX)
}

/// Per-student presence, in roster order.
pub fn roster_status<'a>(roster: &'a [RosterEntry], scans: &[ScanRecord]) -> Vec<RosterStatus<'a>> {
    let codes = scanned_codes(scans);
    roster
        .iter()
        .map(|entry| RosterStatus {
            entry,
            present: codes.contains(entry.nomor_peserta.as_str()),
        })
        .collect()
}
