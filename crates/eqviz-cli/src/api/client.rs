//! HTTP API client for the eqviz server

use crate::api::{endpoints, types::*};
use crate::error::{CliError, Result};
use reqwest::{
    header,
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via EQVIZ_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Default eqviz server URL when not specified via environment variable.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// API client for the eqviz server
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let timeout_secs = std::env::var("EQVIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("EQVIZ_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check server health; unreachable servers report `false`
    pub async fn health_check(&self) -> Result<bool> {
        let url = endpoints::health_url(&self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(error = %e, "Health check request failed");
                Ok(false)
            },
        }
    }

    /// Upload CSV bytes under `file_name`
    pub async fn upload(&self, file_name: &str, content: Vec<u8>) -> Result<DatasetInfo> {
        let url = endpoints::upload_url(&self.base_url);

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let api_response: ApiResponse<DatasetInfo> = decode(response).await?;

        Ok(api_response.data)
    }

    /// Most recent datasets, newest first
    pub async fn history(&self, limit: Option<u32>) -> Result<History> {
        let url = endpoints::history_url(&self.base_url, limit);

        let response = self.client.get(&url).send().await?;
        let api_response: ApiResponse<Vec<DatasetInfo>> = decode(response).await?;

        let meta = api_response
            .meta
            .map(serde_json::from_value::<HistoryMeta>)
            .transpose()?;

        Ok(History {
            datasets: api_response.data,
            meta,
        })
    }

    pub async fn summary(&self, id: Uuid) -> Result<Summary> {
        let url = endpoints::summary_url(&self.base_url, id);

        let response = self.client.get(&url).send().await?;
        let api_response: ApiResponse<Summary> = decode(response).await?;

        Ok(api_response.data)
    }

    /// Download the rendered report
    pub async fn report(&self, id: Uuid) -> Result<ReportFile> {
        let url = endpoints::report_url(&self.base_url, id);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(error_from_body(status, &body));
        }

        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let file_name = header_value(header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(attachment_file_name);
        let content_type = header_value(header::CONTENT_TYPE);
        let content = response.bytes().await?.to_vec();

        Ok(ReportFile {
            file_name,
            content_type,
            content,
        })
    }
}

/// Turn a JSON response into its success envelope or a [`CliError`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }

    serde_json::from_slice(&body)
        .map_err(|e| CliError::UnexpectedResponse(format!("HTTP {}: {}", status.as_u16(), e)))
}

fn error_from_body(status: StatusCode, body: &[u8]) -> CliError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => CliError::api(envelope.error.code, envelope.error.message),
        Err(_) => CliError::UnexpectedResponse(format!("HTTP {}", status.as_u16())),
    }
}

/// File name from an `attachment; filename="..."` header value
pub fn attachment_file_name(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
