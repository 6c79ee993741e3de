use async_trait::async_trait;
use reqwest::multipart;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use super::api::BackendInterface;
use super::types::{AnalysisResponse, BackendError, StoredAnalysis};
use crate::config::BackendConfig;
use crate::entitlement::EntitlementState;
use crate::request::SubmissionRequest;

/// HTTP client for the analysis backend. Speaks the FastAPI wire protocol:
/// bearer auth, multipart upload, `{"detail": ...}` error bodies.
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[async_trait]
impl BackendInterface for BackendClient {
    async fn submit_chart(
        &self,
        request: &SubmissionRequest,
    ) -> Result<AnalysisResponse, BackendError> {
        let url = format!("{}/analyze-image", self.base_url);
        info!(
            "📤 Uploading {} ({} bytes, {} variant)",
            request.image.file_name,
            request.image.bytes.len(),
            request.variant.as_str()
        );

        let file_part = multipart::Part::bytes(request.image.bytes.clone())
            .file_name(request.image.file_name.clone())
            .mime_str(request.image.mime_type())?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("analysis_type", request.variant.as_str())
            .text("language", request.language.clone());

        if let Some(params) = &request.parameters {
            for (field, value) in params.as_form_fields() {
                form = form.text(field, value);
            }
        }

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let parsed: AnalysisResponse = response.json().await?;
        info!(
            "✅ Analysis received (trend={}, confidence={})",
            parsed.trend, parsed.confidence
        );
        Ok(parsed)
    }

    async fn fetch_entitlement(&self) -> Result<EntitlementState, BackendError> {
        let url = format!("{}/me", self.base_url);
        debug!("Fetching entitlement from {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let state: EntitlementState = ensure_success(response).await?.json().await?;
        Ok(state)
    }

    async fn list_past_analyses(&self) -> Result<Vec<StoredAnalysis>, BackendError> {
        let url = format!("{}/analysis-history", self.base_url);
        debug!("Fetching history from {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let items: Vec<StoredAnalysis> = ensure_success(response).await?.json().await?;
        Ok(items)
    }

    async fn delete_analysis(&self, id: i64) -> Result<(), BackendError> {
        let url = format!("{}/analysis-history/{}", self.base_url, id);

        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        // Validate up front so a typo in the env shows up at boot, not on
        // the first request.
        Url::parse(&config.base_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }
}

/// Map non-success statuses into the error taxonomy. Any 403 is an
/// entitlement denial no matter what the body says.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);

    if status == StatusCode::FORBIDDEN {
        warn!("🚫 Backend denied the request: {}", detail);
        return Err(BackendError::Denied { detail });
    }

    warn!("❌ Backend error {}: {}", status, detail);
    Err(BackendError::Api {
        status: status.as_u16(),
        detail,
    })
}

/// Pull the message out of a FastAPI `{"detail": ...}` body, falling back
/// to the raw text for anything else.
fn extract_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct DetailBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<DetailBody>(body) {
        Ok(DetailBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(DetailBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
