// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use berita_acara::{
    AppError,
    gateway::Gateway,
    models::{
        exam::{Assignment, AssignmentResponse, InitData, RosterEntry},
        presence::{ScanKind, ScanRecord, ScanRequest, ScanResponse},
        proctor::{LoginRequest, LoginResponse, Proctor, ProctorPresence},
        report::{ReportSubmission, Signature},
    },
};
use serde_json::{Value, json};
use tokio::sync::Notify;

/// Minimal valid PNG header, enough for the attachment checks.
pub const PNG_BYTES: [u8; 12] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn signature() -> Signature {
    Signature::from_png(PNG_BYTES.to_vec())
}

// ---------------------------------------------------------------------------
// Fake backend over HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SubmittedReport {
    pub fields: HashMap<String, String>,
    pub signature: Vec<u8>,
    pub signature_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub scans: Vec<Value>,
    pub reports: Vec<SubmittedReport>,
    pub proctor_presence: HashMap<String, Value>,
    pub assignment_lookups: usize,
    pub reject_reports: bool,
    /// Routes (e.g. "init-data") answering with a fixed status.
    pub fail_with: HashMap<&'static str, StatusCode>,
    /// Moved into `fail_with` once a report is accepted.
    pub fail_after_report: HashMap<&'static str, StatusCode>,
}

impl Backend {
    pub fn failing(route: &'static str, status: StatusCode) -> Self {
        let mut backend = Backend::default();
        backend.fail_with.insert(route, status);
        backend
    }

    fn failure(&self, route: &str) -> Option<Response> {
        self.fail_with.get(route).map(|status| {
            (*status, Json(json!({"message": "Server sedang gangguan"}))).into_response()
        })
    }
}

pub type Shared = Arc<Mutex<Backend>>;

fn proctors() -> Vec<Value> {
    vec![
        json!({"id": 7, "name": "Pak Budi Santoso", "niy": "P001"}),
        json!({"id": 8, "name": "Bu Sari Wulandari", "niy": "P002"}),
    ]
}

fn students() -> Vec<(&'static str, &'static str)> {
    vec![
        ("001", "Ahmad Fauzi"),
        ("002", "Bunga Lestari"),
        ("003", "Candra Wijaya"),
        ("004", "Dewi Anggraini"),
        ("005", "Eko Prasetyo"),
        ("009", "Gilang Ramadhan"),
    ]
}

fn student_row(nomor: &str) -> Value {
    let nama = students()
        .into_iter()
        .find(|(n, _)| *n == nomor)
        .map(|(_, nama)| nama)
        .unwrap_or("?");
    json!({"nama": nama, "nomor_peserta": nomor})
}

async fn init_data(State(db): State<Shared>) -> Response {
    if let Some(failure) = db.lock().unwrap().failure("init-data") {
        return failure;
    }

    Json(json!({
        "pengawas": proctors(),
        "ujians": [
            {"id": 1, "nama_ujian": "PTS Ganjil 2024"},
            {"id": "UTS-2024", "nama_ujian": "UTS 2024"}
        ]
    }))
    .into_response()
}

async fn login(State(db): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = db.lock().unwrap().failure("login-niy") {
        return failure;
    }

    let niy = body["niy"].as_str().unwrap_or_default().to_string();
    let Some(user) = proctors().into_iter().find(|p| p["niy"] == niy.as_str()) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "NIY tidak terdaftar"})),
        )
            .into_response();
    };

    let mut db = db.lock().unwrap();
    let presensi = db
        .proctor_presence
        .entry(niy)
        .or_insert_with(|| json!({"waktu_datang": "2024-05-01 06:55:00", "waktu_pulang": null}))
        .clone();

    Json(json!({"user": user, "presensi": presensi})).into_response()
}

async fn presensi_today(State(db): State<Shared>) -> Response {
    let db = db.lock().unwrap();
    if let Some(failure) = db.failure("presensi-today") {
        return failure;
    }
    Json(Value::Array(db.scans.clone())).into_response()
}

async fn get_assignment(
    State(db): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    db.lock().unwrap().assignment_lookups += 1;

    let key = (
        q.get("ujian_id").cloned().unwrap_or_default(),
        q.get("pengawas_id").cloned().unwrap_or_default(),
    );

    let body = match (key.0.as_str(), key.1.as_str()) {
        ("1", "7") => json!({
            "jadwal": {
                "mapel_id": 3,
                "mata_pelajaran": "Matematika",
                "kelas": "X-1",
                "kelas_id": 2,
                "sesi_id": 1,
                "sesi_name": "Sesi 1",
                "mulai_ujian": "07:30",
                "ujian_berakhir": "09:30",
                "total_siswa": 3
            },
            "peserta": [student_row("001"), student_row("002"), student_row("003")]
        }),
        ("1", "8") => json!({
            "jadwal": {
                "mapel_id": "4",
                "mata_pelajaran": "Bahasa Indonesia",
                "kelas": "X-2",
                "kelas_id": "3",
                "sesi_id": "2",
                "sesi_name": "Sesi 2",
                "mulai_ujian": "10:00",
                "ujian_berakhir": "12:00",
                "total_siswa": "2"
            },
            "peserta": [student_row("004"), student_row("005")]
        }),
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "Jadwal tidak ditemukan"})),
            )
                .into_response();
        }
    };

    Json(body).into_response()
}

async fn scan_peserta(State(db): State<Shared>, Json(body): Json<Value>) -> Response {
    let kode = body["kode_peserta"].as_str().unwrap_or_default().to_string();
    let mut db = db.lock().unwrap();
    if let Some(failure) = db.failure("scan-peserta") {
        return failure;
    }

    if let Some(presence) = db.proctor_presence.get_mut(&kode) {
        presence["waktu_pulang"] = json!("2024-05-01 12:10:00");
        let presensi = presence.clone();
        return Json(json!({
            "type": "pengawas",
            "message": "Presensi pulang pengawas tercatat",
            "presensi": presensi
        }))
        .into_response();
    }

    if !students().iter().any(|(n, _)| *n == kode) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Peserta tidak ditemukan"})),
        )
            .into_response();
    }

    if db.scans.iter().any(|s| s["kode_peserta"] == kode.as_str()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Peserta sudah melakukan presensi"})),
        )
            .into_response();
    }

    db.scans.push(json!({
        "kode_peserta": kode,
        "waktu_datang": "2024-05-01 07:12:00",
        "waktu_pulang": null
    }));

    Json(json!({"type": "peserta", "message": "Presensi peserta berhasil"})).into_response()
}

async fn submit_report(State(db): State<Shared>, mut multipart: Multipart) -> Response {
    let mut report = SubmittedReport::default();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "signature" {
            report.signature_name = field.file_name().map(str::to_string);
            report.signature = field.bytes().await.unwrap().to_vec();
        } else {
            let value = field.text().await.unwrap();
            report.fields.insert(name, value);
        }
    }

    let mut db = db.lock().unwrap();
    if let Some(failure) = db.failure("submit-report") {
        return failure;
    }
    if db.reject_reports {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Berita acara untuk jadwal ini sudah dikirim"})),
        )
            .into_response();
    }

    db.reports.push(report);
    let after = std::mem::take(&mut db.fail_after_report);
    db.fail_with.extend(after);
    Json(json!({"message": "ok"})).into_response()
}

/// Spawns the fake backend on a random port.
/// Returns the API base URL (e.g. "http://127.0.0.1:12345/api") and its state.
pub async fn spawn_backend() -> (String, Shared) {
    spawn_backend_with(Backend::default()).await
}

pub async fn spawn_backend_with(backend: Backend) -> (String, Shared) {
    let db: Shared = Arc::new(Mutex::new(backend));

    let app = Router::new()
        .route("/api/init-data", get(init_data))
        .route("/api/login-niy", post(login))
        .route("/api/presensi-today", get(presensi_today))
        .route("/api/get-assignment", get(get_assignment))
        .route("/api/scan-peserta", post(scan_peserta))
        .route("/api/submit-report", post(submit_report))
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{}/api", port), db)
}

/// A base URL nothing is listening on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}

// ---------------------------------------------------------------------------
// In-process gateway double
// ---------------------------------------------------------------------------

pub fn proctor() -> Proctor {
    Proctor {
        id: "7".to_string(),
        name: "Pak Budi Santoso".to_string(),
        niy: "P001".to_string(),
    }
}

pub fn roster_entry(nama: &str, nomor: &str) -> RosterEntry {
    RosterEntry {
        nama: nama.to_string(),
        nomor_peserta: nomor.to_string(),
    }
}

pub fn scan_record(kode: &str) -> ScanRecord {
    ScanRecord {
        kode_peserta: kode.to_string(),
        waktu_datang: Some("2024-05-01 07:00:00".to_string()),
        waktu_pulang: None,
    }
}

pub fn assignment_for(kelas: &str, total: u32, roster: Vec<RosterEntry>) -> AssignmentResponse {
    AssignmentResponse {
        jadwal: Assignment {
            mapel_id: "1".to_string(),
            mata_pelajaran: format!("Mapel {}", kelas),
            kelas: kelas.to_string(),
            kelas_id: "1".to_string(),
            sesi_id: "1".to_string(),
            sesi_name: "Sesi 1".to_string(),
            mulai_ujian: "07:30".to_string(),
            ujian_berakhir: "09:30".to_string(),
            total_siswa: total,
        },
        peserta: roster,
    }
}

/// Scriptable gateway that records every call.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<&'static str>>,
    pub assignments: Mutex<HashMap<String, AssignmentResponse>>,
    pub scans: Mutex<Vec<ScanRecord>>,
    pub gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeGateway {
    pub fn with_assignment(self, exam_id: &str, response: AssignmentResponse) -> Self {
        self.assignments
            .lock()
            .unwrap()
            .insert(exam_id.to_string(), response);
        self
    }

    /// Makes lookups for `exam_id` wait until the returned handle is notified.
    pub fn hold(&self, exam_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(exam_id.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn init_data(&self) -> Result<InitData, AppError> {
        self.record("init_data");
        Ok(InitData::default())
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        self.record("login");
        if req.niy == "P001" {
            Ok(LoginResponse {
                user: proctor(),
                presensi: Some(ProctorPresence {
                    waktu_datang: Some("2024-05-01 06:55:00".to_string()),
                    waktu_pulang: None,
                }),
            })
        } else {
            Err(AppError::AuthError("NIY tidak terdaftar".to_string()))
        }
    }

    async fn presence_today(&self) -> Result<Vec<ScanRecord>, AppError> {
        self.record("presence_today");
        Ok(self.scans.lock().unwrap().clone())
    }

    async fn assignment(&self, exam_id: &str, _proctor_id: &str) -> Result<AssignmentResponse, AppError> {
        self.record("assignment");

        let gate = self.gates.lock().unwrap().get(exam_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.assignments
            .lock()
            .unwrap()
            .get(exam_id)
            .cloned()
            .ok_or_else(|| AppError::AssignmentNotFound("Jadwal tidak ditemukan".to_string()))
    }

    async fn scan(&self, req: &ScanRequest) -> Result<ScanResponse, AppError> {
        self.record("scan");
        self.scans.lock().unwrap().push(scan_record(&req.kode_peserta));
        Ok(ScanResponse {
            kind: ScanKind::Peserta,
            message: "Presensi peserta berhasil".to_string(),
            presensi: None,
        })
    }

    async fn submit_report(&self, _report: &ReportSubmission, _signature: &Signature) -> Result<(), AppError> {
        self.record("submit_report");
        Ok(())
    }
}
