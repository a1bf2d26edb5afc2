// src/state.rs

use crate::{
    error::AppError,
    models::{
        exam::{AssignmentResponse, Exam, InitData, RosterEntry},
        presence::ScanRecord,
        proctor::{LoginResponse, Proctor, ProctorPresence},
        report::{DraftField, ReportDraft},
    },
    reconcile::{self, RosterStatus},
    resolver::{AssignmentResolver, ResolutionTicket},
    scanner::ScanMode,
    session::Session,
};

/// Which part of the form is in front of the proctor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Attendance scanning.
    #[default]
    ScanPeserta,
    /// The exam-minutes form.
    BeritaAcara,
}

/// What happened to an assignment lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// Selection incomplete; nothing was looked up.
    Skipped,
    /// The selection changed while the lookup was in flight; result dropped.
    Stale,
}

/// The whole form state for one device and one proctor session.
///
/// All mutation goes through the named transitions below (and the async
/// handlers built on them), so every transition is testable without a UI.
#[derive(Debug, Clone)]
pub struct AppState {
    init: InitData,
    session: Session,
    draft: ReportDraft,
    roster: Vec<RosterEntry>,
    scans: Vec<ScanRecord>,
    tab: Tab,
    resolver: AssignmentResolver,
}

impl AppState {
    /// A fresh, logged-out state over bootstrap data.
    pub fn new(init: InitData, scans: Vec<ScanRecord>) -> Self {
        Self {
            init,
            session: Session::default(),
            draft: ReportDraft::default(),
            roster: Vec::new(),
            scans,
            tab: Tab::default(),
            resolver: AssignmentResolver::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn proctor(&self) -> Option<&Proctor> {
        self.session.proctor()
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn roster_status(&self) -> Vec<RosterStatus<'_>> {
        reconcile::roster_status(&self.roster, &self.scans)
    }

    pub fn scans(&self) -> &[ScanRecord] {
        &self.scans
    }

    pub fn exams(&self) -> &[Exam] {
        &self.init.ujians
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// The interpretation a scan surface opened now should use.
    pub fn scan_mode(&self) -> ScanMode {
        if self.session.is_logged_out() {
            ScanMode::Login
        } else if self.tab == Tab::BeritaAcara {
            ScanMode::Informational
        } else {
            ScanMode::MarkAttendance
        }
    }

    pub fn set_tab(&mut self, tab: Tab) -> Result<(), AppError> {
        self.session.require_active()?;
        self.tab = tab;
        Ok(())
    }

    /// Records a successful badge login and moves to the welcome screen.
    ///
    /// Returns a lookup ticket when an exam was already selected.
    pub fn login_succeeded(&mut self, login: LoginResponse) -> Result<Option<ResolutionTicket>, AppError> {
        let proctor_id = login.user.id.clone();
        self.session
            .login(login.user, login.presensi.unwrap_or_default())?;
        self.draft.pengawas_id = proctor_id;

        tracing::info!("Proctor {} logged in", self.draft.pengawas_id);
        Ok(self.resolver.trigger(&self.draft.ujian_id, &self.draft.pengawas_id))
    }

    pub fn acknowledge_welcome(&mut self) -> Result<(), AppError> {
        self.session.acknowledge()
    }

    /// Drops the proctor, their presence and everything resolved for them.
    /// Any lookup still in flight is invalidated.
    pub fn logout(&mut self) {
        if let Some(proctor) = self.session.proctor() {
            tracing::info!("Proctor {} logged out", proctor.id);
        }
        self.session.logout();
        self.resolver.cancel();
        self.draft.pengawas_id.clear();
        self.draft.clear_assignment();
        self.roster.clear();
        self.reconcile();
        self.tab = Tab::default();
    }

    /// Changes the selected exam.
    ///
    /// Returns the ticket for the lookup that must follow, or `None` when the
    /// selection is incomplete, in which case the old assignment is dropped.
    pub fn choose_exam(&mut self, exam_id: &str) -> Result<Option<ResolutionTicket>, AppError> {
        self.session.require_active()?;
        self.draft.ujian_id = exam_id.trim().to_string();

        let ticket = self.resolver.trigger(&self.draft.ujian_id, &self.draft.pengawas_id);
        if ticket.is_none() {
            self.draft.clear_assignment();
            self.roster.clear();
            self.reconcile();
        }
        Ok(ticket)
    }

    /// Applies an assignment lookup result if its ticket is still current.
    ///
    /// On failure the assignment fields and roster are cleared but the
    /// selection stays, and the error is handed back for display.
    pub fn apply_resolution(
        &mut self,
        ticket: &ResolutionTicket,
        result: Result<AssignmentResponse, AppError>,
    ) -> Result<Resolution, AppError> {
        if !self.resolver.is_current(ticket) {
            tracing::warn!(
                "Discarding stale assignment for exam {} (generation {}, now {})",
                ticket.exam_id,
                ticket.generation,
                self.resolver.generation()
            );
            return Ok(Resolution::Stale);
        }

        match result {
            Ok(AssignmentResponse { jadwal, peserta }) => {
                tracing::info!(
                    "Assignment resolved: exam {} class {} with {} students",
                    ticket.exam_id,
                    jadwal.kelas,
                    peserta.len()
                );
                self.draft.apply_assignment(&jadwal);
                self.roster = peserta;
                self.reconcile();
                Ok(Resolution::Applied)
            }
            Err(e) => {
                tracing::warn!("Assignment lookup failed for exam {}: {:?}", ticket.exam_id, e);
                self.draft.clear_assignment();
                self.roster.clear();
                self.reconcile();
                Err(e)
            }
        }
    }

    /// Replaces today's scan list.
    pub fn replace_scans(&mut self, scans: Vec<ScanRecord>) {
        self.scans = scans;
        self.reconcile();
    }

    pub fn update_proctor_presence(&mut self, presence: ProctorPresence) -> Result<(), AppError> {
        self.session.update_presence(presence)
    }

    /// User edit of a free-form draft field.
    pub fn edit(&mut self, field: DraftField, value: &str) -> Result<(), AppError> {
        self.session.require_active()?;

        match field {
            DraftField::Kelas => self.draft.kelas = value.to_string(),
            DraftField::AbsentDetails => self.draft.absent_details = value.to_string(),
            DraftField::Notes => self.draft.notes = value.to_string(),
            DraftField::TotalPresent => {
                let value = value.trim();
                let present = if value.is_empty() {
                    None
                } else {
                    Some(value.parse::<u32>().map_err(|_| {
                        AppError::ValidationError(format!(
                            "Present count must be a non-negative number, got '{}'",
                            value
                        ))
                    })?)
                };
                self.draft.set_total_present(present);
            }
        }
        Ok(())
    }

    /// Back to the post-bootstrap state: logged out with an empty draft.
    pub fn reset(&mut self) {
        self.session.logout();
        self.resolver.cancel();
        self.draft = ReportDraft::default();
        self.roster.clear();
        self.tab = Tab::default();
    }

    /// Recomputes the present count from the current roster and scans.
    ///
    /// With no roster there is nothing to count against: a manually entered
    /// value is kept, a count from an earlier roster is dropped.
    fn reconcile(&mut self) {
        if self.roster.is_empty() {
            if !self.draft.present_is_manual() {
                self.draft.set_reconciled_present(None);
            }
            return;
        }
        let present = reconcile::count_present(&self.roster, &self.scans);
        self.draft.set_reconciled_present(Some(present));
    }
}
