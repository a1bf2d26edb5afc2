// src/kiosk.rs

use std::{fmt::Write as _, io::Write, sync::Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::{self, UnboundedSender},
};

use crate::{
    error::AppError,
    gateway::Gateway,
    handlers::{
        assignment::lookup,
        scan::{AttendanceReceipt, ScanOutcome},
    },
    models::{
        exam::AssignmentResponse,
        presence::ScanKind,
        proctor::{Proctor, ProctorPresence},
        report::{PngPad, Signature, SignatureCapture},
    },
    resolver::ResolutionTicket,
    routes::{Command, HELP, parse_command},
    scanner::{CaptureDevice, KeyboardWedge, ScanEvent, ScanMode, ScanSurface},
    state::{AppState, Resolution, Tab},
    utils::time::clock_label,
};

type LookupResult = (ResolutionTicket, Result<AssignmentResponse, AppError>);

/// Builds a fresh capture device each time a scan surface opens.
pub type DeviceFactory = Box<dyn Fn() -> Box<dyn CaptureDevice> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line-driven front end over `AppState`.
///
/// Reads commands (and scanner payloads) line by line. Assignment lookups
/// run as spawned tasks whose results come back through a channel, so the
/// proctor can keep typing while one is in flight.
pub struct Kiosk<W: Write> {
    state: AppState,
    gateway: Arc<dyn Gateway>,
    devices: DeviceFactory,
    surface: Option<ScanSurface>,
    pad: PngPad,
    out: W,
}

impl<W: Write> Kiosk<W> {
    pub fn new(state: AppState, gateway: Arc<dyn Gateway>, out: W) -> Self {
        Self {
            state,
            gateway,
            devices: Box::new(|| Box::new(KeyboardWedge) as Box<dyn CaptureDevice>),
            surface: None,
            pad: PngPad::default(),
            out,
        }
    }

    pub fn with_devices(mut self, devices: DeviceFactory) -> Self {
        self.devices = devices;
        self
    }

    /// Runs until `quit` or end of input, then waits for outstanding
    /// lookups. Returns the final state and the output sink.
    pub async fn run<R>(mut self, input: R) -> Result<(AppState, W), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<LookupResult>();
        let mut lines = input.lines();

        self.say("E-Berita Acara. Type 'login' and scan your badge, or 'help'.")?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = line.map_err(|e| AppError::Io(format!("Input closed: {}", e)))?;
                    match line {
                        Some(line) => {
                            if self.on_line(&line, &tx).await? == Flow::Quit {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some((ticket, result)) = rx.recv() => self.on_lookup(&ticket, result)?,
            }
        }

        drop(tx);
        while let Some((ticket, result)) = rx.recv().await {
            self.on_lookup(&ticket, result)?;
        }

        Ok((self.state, self.out))
    }

    async fn on_line(&mut self, line: &str, lookups: &UnboundedSender<LookupResult>) -> Result<Flow, AppError> {
        if let Some(surface) = self.surface.as_mut() {
            if line.trim().eq_ignore_ascii_case("cancel") {
                if let Some(surface) = self.surface.take() {
                    let mode = surface.mode();
                    surface.cancel();
                    self.say(&format!("Scanner closed ({}).", mode))?;
                }
                return Ok(Flow::Continue);
            }

            let event = surface.decode(line);
            // One-shot: the surface is dismissed whatever the outcome.
            self.surface = None;
            if let Some(event) = event {
                self.on_scan(event).await?;
            }
            return Ok(Flow::Continue);
        }

        match parse_command(line) {
            Ok(cmd) => self.dispatch(cmd, lookups).await,
            Err(e) => {
                self.alert(&e)?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, cmd: Command, lookups: &UnboundedSender<LookupResult>) -> Result<Flow, AppError> {
        let gateway = Arc::clone(&self.gateway);

        match cmd {
            Command::Login => {
                if !self.state.session().is_logged_out() {
                    self.alert(&AppError::InvalidState("Already logged in".to_string()))?;
                } else {
                    self.open_surface(ScanMode::Login)?;
                }
            }
            Command::Scan => match self.state.session().require_active().map(|_| ()) {
                Ok(()) => {
                    let mode = self.state.scan_mode();
                    self.open_surface(mode)?;
                }
                Err(e) => self.alert(&e)?,
            },
            Command::Cancel => self.say("Scanner is not open.")?,
            Command::Acknowledge => match self.state.acknowledge_welcome() {
                Ok(()) => self.say("Continue to the minutes form.")?,
                Err(e) => self.alert(&e)?,
            },
            Command::Tab(tab) => match self.state.set_tab(tab) {
                Ok(()) => self.say(match tab {
                    Tab::ScanPeserta => "Tab: Scan Peserta",
                    Tab::BeritaAcara => "Tab: Berita Acara",
                })?,
                Err(e) => self.alert(&e)?,
            },
            Command::Exam(exam_id) => match self.state.choose_exam(&exam_id) {
                Ok(Some(ticket)) => {
                    let tx = lookups.clone();
                    tokio::spawn(async move {
                        let result = lookup(gateway.as_ref(), ticket).await;
                        // The loop may already be gone on quit.
                        let _ = tx.send(result);
                    });
                    self.say(&format!("Looking up assignment for exam {}...", exam_id.trim()))?;
                }
                Ok(None) => self.say("Exam selection cleared.")?,
                Err(e) => self.alert(&e)?,
            },
            Command::Edit(field, value) => {
                if let Err(e) = self.state.edit(field, &value) {
                    self.alert(&e)?;
                }
            }
            Command::Sign(path) => match self.pad.load(&path) {
                Ok(()) => self.say("Signature attached.")?,
                Err(e) => self.alert(&e)?,
            },
            Command::Unsign => {
                self.pad.clear();
                self.say("Signature cleared.")?;
            }
            Command::Submit => self.submit(gateway.as_ref()).await?,
            Command::Logout => {
                self.state.logout();
                self.pad.clear();
                self.say("Logged out.")?;
            }
            Command::Status => {
                let text = render_status(&self.state, !self.pad.is_empty());
                self.say(&text)?;
            }
            Command::Help => self.say(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn open_surface(&mut self, mode: ScanMode) -> Result<(), AppError> {
        match ScanSurface::open((self.devices)(), mode) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.say(&format!("Scanner ready ({}). Scan a code or type 'cancel'.", mode))
            }
            Err(e) => self.alert(&e),
        }
    }

    async fn on_scan(&mut self, event: ScanEvent) -> Result<(), AppError> {
        let gateway = Arc::clone(&self.gateway);

        match self.state.handle_scan(gateway.as_ref(), event).await {
            Ok(ScanOutcome::LoggedIn(proctor)) => {
                let presence = self.state.session().presence().cloned().unwrap_or_default();
                self.say(&render_welcome(&proctor, &presence))
            }
            Ok(ScanOutcome::Informational(payload)) => self.say(&format!("Scanned: {}.", payload)),
            Ok(ScanOutcome::Attendance(receipt)) => self.report_receipt(&receipt),
            Err(e) => self.alert(&e),
        }
    }

    fn report_receipt(&mut self, receipt: &AttendanceReceipt) -> Result<(), AppError> {
        let prefix = match receipt.kind {
            ScanKind::Peserta => "Student",
            ScanKind::Pengawas => "Proctor",
        };
        self.say(&format!("{}: {}", prefix, receipt.message))?;
        if !receipt.list_refreshed {
            self.say("Warning: could not refresh today's attendance list.")?;
        }
        Ok(())
    }

    fn on_lookup(&mut self, ticket: &ResolutionTicket, result: Result<AssignmentResponse, AppError>) -> Result<(), AppError> {
        match self.state.apply_resolution(ticket, result) {
            Ok(Resolution::Applied) => {
                let draft = self.state.draft();
                let text = format!(
                    "Assignment: {} / {} / {} ({} - {}), {} students expected.",
                    draft.mata_pelajaran_display,
                    draft.kelas,
                    draft.sesi_name,
                    draft.mulai_ujian,
                    draft.ujian_berakhir,
                    draft.total_expected().unwrap_or(0)
                );
                self.say(&text)
            }
            Ok(Resolution::Skipped) | Ok(Resolution::Stale) => Ok(()),
            Err(e) => self.alert(&e),
        }
    }

    async fn submit(&mut self, gateway: &dyn Gateway) -> Result<(), AppError> {
        let signature = Signature::from_capture(&self.pad);
        if let Err(e) = self.state.submit(gateway, &signature).await {
            return self.alert(&e);
        }

        self.pad.clear();
        self.say("Berita Acara berhasil dikirim!")?;

        // Same as reloading the page: start over from fresh bootstrap data.
        // Without it there is nothing valid to continue on, so stop.
        match AppState::bootstrap(gateway).await {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(e) => {
                self.alert(&e)?;
                Err(e)
            }
        }
    }

    fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    fn alert(&mut self, err: &AppError) -> Result<(), AppError> {
        writeln!(self.out, "! {}", err.user_message())?;
        Ok(())
    }
}

/// Welcome screen shown between login and the form.
pub fn render_welcome(proctor: &Proctor, presence: &ProctorPresence) -> String {
    format!(
        "Selamat datang, {}.\nArrival recorded: {} WIB\nType 'ok' to continue.",
        proctor.name,
        clock_label(presence.waktu_datang.as_deref())
    )
}

/// A plain-text dump of the whole form.
pub fn render_status(state: &AppState, signed: bool) -> String {
    let mut text = String::new();

    match state.proctor() {
        Some(proctor) => {
            let presence = state.session().presence().cloned().unwrap_or_default();
            let _ = write!(
                text,
                "Proctor: {} (D: {}",
                proctor.name,
                clock_label(presence.waktu_datang.as_deref())
            );
            if presence.waktu_pulang.is_some() {
                let _ = write!(text, ", P: {}", clock_label(presence.waktu_pulang.as_deref()));
            }
            let _ = writeln!(text, ")");
        }
        None => {
            let _ = writeln!(text, "Not logged in.");
            return text;
        }
    }

    let draft = state.draft();
    let exam_name = state
        .exams()
        .iter()
        .find(|e| e.id == draft.ujian_id)
        .map(|e| e.nama_ujian.as_str())
        .unwrap_or("-");

    let _ = writeln!(text, "Tab: {:?}", state.tab());
    let _ = writeln!(text, "Exam: {} [{}]", exam_name, draft.ujian_id);
    if draft.has_assignment() {
        let _ = writeln!(text, "Subject: {}", draft.mata_pelajaran_display);
        let _ = writeln!(text, "Class: {}", draft.kelas);
        let _ = writeln!(text, "Session: {} ({} - {})", draft.sesi_name, draft.mulai_ujian, draft.ujian_berakhir);
    } else {
        let _ = writeln!(text, "Assignment: not resolved");
        if !draft.kelas.is_empty() {
            let _ = writeln!(text, "Class: {}", draft.kelas);
        }
    }

    let count = |c: Option<u32>| c.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        text,
        "Expected: {}  Present: {}{}  Absent: {}",
        count(draft.total_expected()),
        count(draft.total_present()),
        if draft.present_is_manual() { " (manual)" } else { "" },
        count(draft.total_absent())
    );

    if !state.roster().is_empty() {
        let _ = writeln!(text, "Roster:");
        for status in state.roster_status() {
            let _ = writeln!(
                text,
                "  {:<24} {:<14} {}",
                status.entry.nama,
                status.entry.nomor_peserta,
                status.label()
            );
        }
    }

    let _ = writeln!(text, "Scanned today: {}", state.scans().len());
    for scan in state.scans() {
        let _ = writeln!(
            text,
            "  {:<14} {} - {}",
            scan.kode_peserta,
            clock_label(scan.waktu_datang.as_deref()),
            clock_label(scan.waktu_pulang.as_deref())
        );
    }

    let _ = writeln!(text, "Absence details: {}", draft.absent_details);
    let _ = writeln!(text, "Notes: {}", draft.notes);
    let _ = write!(text, "Signature: {}", if signed { "attached" } else { "missing" });

    text
}
