// src/gateway/http.rs

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::Deserialize;
use url::Url;

use crate::{
    config::Config,
    error::AppError,
    gateway::Gateway,
    models::{
        exam::{AssignmentResponse, InitData},
        presence::{ScanRecord, ScanRequest, ScanResponse},
        proctor::{LoginRequest, LoginResponse},
        report::{ReportSubmission, Signature},
    },
};

/// Error body returned by the backend on rejection.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// REST/JSON gateway over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base: config.api_base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }
}

/// Maps a non-success response onto the error taxonomy.
///
/// 4xx means the backend refused the request and goes to `client_error`;
/// anything else is a transport problem. The body's `message` is kept.
async fn rejection(response: Response, client_error: fn(String) -> AppError) -> AppError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();

    tracing::warn!("Gateway rejected request: {} {}", status, message);

    if status.is_client_error() {
        client_error(message)
    } else if message.is_empty() {
        AppError::TransportError(format!("Server responded with {}", status))
    } else {
        AppError::TransportError(message)
    }
}

fn transport(err: reqwest::Error) -> AppError {
    tracing::error!("Gateway request failed: {:?}", err);
    AppError::from(err)
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn init_data(&self) -> Result<InitData, AppError> {
        let url = self.endpoint("init-data")?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response, AppError::TransportError).await);
        }

        Ok(response.json::<InitData>().await?)
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let url = self.endpoint("login-niy")?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response, AppError::AuthError).await);
        }

        Ok(response.json::<LoginResponse>().await?)
    }

    async fn presence_today(&self) -> Result<Vec<ScanRecord>, AppError> {
        let url = self.endpoint("presensi-today")?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response, AppError::TransportError).await);
        }

        Ok(response.json::<Vec<ScanRecord>>().await?)
    }

    async fn assignment(&self, exam_id: &str, proctor_id: &str) -> Result<AssignmentResponse, AppError> {
        let url = self.endpoint("get-assignment")?;
        tracing::debug!("GET {} ujian_id={} pengawas_id={}", url, exam_id, proctor_id);

        let response = self
            .client
            .get(url)
            .query(&[("ujian_id", exam_id), ("pengawas_id", proctor_id)])
            .send()
            .await
            .map_err(transport)?;

        // 404 is the normal "no schedule" answer; other 4xx are treated alike
        if response.status().is_client_error() {
            return Err(rejection(response, AppError::AssignmentNotFound).await);
        }
        if !response.status().is_success() {
            return Err(rejection(response, AppError::TransportError).await);
        }

        Ok(response.json::<AssignmentResponse>().await?)
    }

    async fn scan(&self, req: &ScanRequest) -> Result<ScanResponse, AppError> {
        let url = self.endpoint("scan-peserta")?;
        tracing::debug!("POST {} kode_peserta={}", url, req.kode_peserta);

        let response = self
            .client
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response, AppError::ScanRejected).await);
        }

        Ok(response.json::<ScanResponse>().await?)
    }

    async fn submit_report(&self, report: &ReportSubmission, signature: &Signature) -> Result<(), AppError> {
        let url = self.endpoint("submit-report")?;
        tracing::debug!("POST {} (multipart)", url);

        let mut form = Form::new();
        for (key, value) in report.form_fields() {
            form = form.text(key, value);
        }
        let attachment = Part::bytes(signature.bytes().to_vec())
            .file_name(Signature::FILE_NAME)
            .mime_str(Signature::MIME)?;
        form = form.part("signature", attachment);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(rejection(response, AppError::ValidationError).await);
        }

        Ok(())
    }
}
