//! Analysis client: the single point of contact with the remote analysis service.
//!
//! No other module talks to the network. The page controller hands an upload to
//! an `Analyzer` and gets back either a decoded `AnalysisResult` or an
//! `AnalysisError` whose `Display` is the message shown to the user.
//!
//! One attempt per request; no retries.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

pub mod de;
pub mod models;

pub use models::{AnalysisResult, Criterion, EvaluationSection, Evaluations, PaperIr};

use crate::page::upload::{UploadSelection, PDF_MEDIA_TYPE};

const ANALYZE_PATH: &str = "/analyze";
const FILE_PART: &str = "file";
/// Shown when a transport failure carries no message of its own.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx status. `message` is the body text or a synthesized status line.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose payload carries an `error` field.
    #[error("{0}")]
    Payload(String),

    #[error("Invalid response from analysis service: {0}")]
    Decode(String),
}

impl AnalysisError {
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            AnalysisError::Transport(FALLBACK_MESSAGE.to_string())
        } else {
            AnalysisError::Transport(message)
        }
    }

    /// Any non-empty body is the message, whitespace included.
    pub fn server(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("Server error: {status}")
        } else {
            body.to_string()
        };
        AnalysisError::Server { status, message }
    }

    /// HTTP status of a non-2xx response; `None` for every other failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalysisError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classifies a completed HTTP exchange.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<AnalysisResult, AnalysisError> {
    if !status.is_success() {
        return Err(AnalysisError::server(status.as_u16(), body));
    }
    let result = AnalysisResult::from_json(body)?;
    if let Some(message) = &result.error {
        return Err(AnalysisError::Payload(message.clone()));
    }
    Ok(result)
}

/// Seam between the page controller and the analysis backend.
///
/// Carried in `AppState` as `Arc<dyn Analyzer>`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, upload: &UploadSelection) -> Result<AnalysisResult, AnalysisError>;
}

/// HTTP client for `POST {base_url}/analyze`.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    /// `timeout` of `None` leaves the call unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("Failed to build analysis HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the PDF as a single multipart part named `file`, typed
    /// `application/pdf` whatever parameters the browser declared.
    pub async fn submit(&self, upload: &UploadSelection) -> Result<AnalysisResult, AnalysisError> {
        let part = Part::bytes(upload.bytes().to_vec())
            .file_name(upload.file_name().to_string())
            .mime_str(PDF_MEDIA_TYPE)
            .map_err(|e| AnalysisError::transport(&e))?;
        let form = Form::new().part(FILE_PART, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisError::transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::transport(&e))?;

        debug!(
            "Analysis service responded {} ({} bytes)",
            status,
            body.len()
        );

        interpret_response(status, &body)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, upload: &UploadSelection) -> Result<AnalysisResult, AnalysisError> {
        self.submit(upload).await
    }
}
