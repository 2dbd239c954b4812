//! reqwest-backed publish endpoint.

use super::contract::{PublishEndpoint, UploadPayload, UploadReceipt};
use crate::config::{PublishConfig, UploadAcceptance};
use crate::error::PublishError;
use crate::negotiate::{PrepareRequest, PrepareResponse};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Multipart field carrying the archive.
pub const ARCHIVE_FIELD: &str = "zippack";
/// Multipart field carrying the serialized diff.
pub const DIFF_FIELD: &str = "diff";
/// File name given to the archive part.
pub const ARCHIVE_FILE_NAME: &str = "content.zip";

/// HTTP client for a publish server.
pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: Url,
    credential: Option<String>,
    accept: UploadAcceptance,
}

impl HttpEndpoint {
    /// Create an endpoint for `base_url`.
    pub fn new(
        base_url: &str,
        credential: Option<String>,
        accept: UploadAcceptance,
        timeout: Option<Duration>,
    ) -> Result<Self, PublishError> {
        let base_url = base_url.trim();
        let parsed = Url::parse(base_url)
            .map_err(|e| PublishError::Config(format!("Invalid server URL {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PublishError::Config(format!(
                "Server URL must use http or https: {}",
                base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: parsed,
            credential: credential.filter(|c| !c.trim().is_empty()),
            accept,
        })
    }

    /// Create an endpoint from publish configuration.
    pub fn from_config(config: &PublishConfig) -> Result<Self, PublishError> {
        let server_url = config
            .server_url()
            .ok_or_else(|| PublishError::Config("Publish server url not set".to_string()))?;
        Self::new(
            server_url,
            config.credential.clone(),
            config.accept,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn prepare_url(&self) -> Url {
        self.endpoint_url(&["publish", "prepare"])
    }

    pub fn publish_url(&self) -> Url {
        self.endpoint_url(&["publish"])
    }

    /// Append `segments` to the base path, keeping any query string.
    fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_fragment(None);
        // http and https URLs always have a path to extend.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credential {
            Some(credential) => request.bearer_auth(credential),
            None => request,
        }
    }
}

async fn unexpected_status(response: reqwest::Response) -> PublishError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    PublishError::UnexpectedStatus { status, body }
}

#[async_trait]
impl PublishEndpoint for HttpEndpoint {
    async fn prepare(&self, request: &PrepareRequest) -> Result<PrepareResponse, PublishError> {
        let url = self.prepare_url();
        debug!(url = %url, files = request.filelist.len(), "Sending prepare request");

        let response = self
            .authorize(self.client.post(url))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn upload(&self, payload: UploadPayload) -> Result<UploadReceipt, PublishError> {
        let url = self.publish_url();
        debug!(
            url = %url,
            archive_bytes = payload.archive.len(),
            has_diff = payload.diff.is_some(),
            "Sending publish request"
        );

        let archive = Part::bytes(payload.archive)
            .file_name(ARCHIVE_FILE_NAME)
            .mime_str("application/zip")?;
        let mut form = Form::new().part(ARCHIVE_FIELD, archive);
        if let Some(diff) = &payload.diff {
            form = form.text(DIFF_FIELD, serde_json::to_string(diff)?);
        }

        let response = self
            .authorize(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        if !self.accept.accepts(status) {
            return Err(unexpected_status(response).await);
        }

        Ok(UploadReceipt { status })
    }
}
