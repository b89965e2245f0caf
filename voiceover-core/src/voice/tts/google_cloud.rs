//! Google Cloud Text-to-Speech implementation

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use super::provider::TextToSpeech;
use super::types::{AudioData, SynthesisRequest, Voice};
use crate::credentials::CredentialContext;
use crate::error::SynthesisError;

pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com";

#[derive(Debug, Clone)]
pub struct GoogleCloudConfig {
    pub endpoint: String,
    pub credentials: CredentialContext,
    /// Project billed for the request when using user credentials
    pub quota_project: Option<String>,
    /// Whole-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl GoogleCloudConfig {
    pub fn new(credentials: CredentialContext) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
            quota_project: None,
            timeout: None,
        }
    }
}

pub struct GoogleCloudTts {
    config: GoogleCloudConfig,
    client: Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

#[derive(Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

impl GoogleCloudTts {
    pub fn new(config: GoogleCloudConfig) -> Result<Self, SynthesisError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SynthesisError::Request(anyhow!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = self.config.credentials.apply(request);
        match &self.config.quota_project {
            Some(project) => request.header("x-goog-user-project", project),
            None => request,
        }
    }

    /// Read the body and translate non-success statuses into the error taxonomy
    async fn read_body(response: Response) -> Result<String, SynthesisError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SynthesisError::Request(anyhow!("Failed to read response: {e}")))?;

        if status.is_success() {
            return Ok(body);
        }

        debug!(?status, ?body, "Google Cloud TTS returned error");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SynthesisError::Authentication(
                anyhow!("Google Cloud TTS error {status}: {body}"),
            )),
            _ => Err(SynthesisError::Request(anyhow!(
                "Google Cloud TTS error {status}: {body}"
            ))),
        }
    }
}

#[async_trait]
impl TextToSpeech for GoogleCloudTts {
    fn name(&self) -> &'static str {
        "google_cloud"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioData, SynthesisError> {
        info!(
            voice = %request.voice.name,
            language = %request.voice.language_code,
            chars = request.text().len(),
            "Requesting speech synthesis"
        );

        let response = self
            .authorize(self.client.post(self.url("text:synthesize")))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                debug!(?e, "Google Cloud TTS call failed");
                SynthesisError::Request(anyhow!("Network error: {e}"))
            })?;

        let body = Self::read_body(response).await?;
        let parsed: SynthesizeResponse = serde_json::from_str(&body).map_err(|e| {
            SynthesisError::Request(anyhow!(
                "Failed to parse synthesis response: {e} - Response: {body}"
            ))
        })?;

        let content = parsed
            .audio_content
            .ok_or_else(|| SynthesisError::Request(anyhow!("Missing audioContent in response")))?;
        let bytes = general_purpose::STANDARD
            .decode(content.as_bytes())
            .map_err(|e| SynthesisError::Request(anyhow!("Failed to decode audio: {e}")))?;

        Ok(AudioData {
            bytes,
            encoding: request.audio_config.audio_encoding,
        })
    }

    async fn list_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Voice>, SynthesisError> {
        let mut request = self.client.get(self.url("voices"));
        if let Some(code) = language_code {
            request = request.query(&[("languageCode", code)]);
        }

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| SynthesisError::Request(anyhow!("Network error: {e}")))?;

        let body = Self::read_body(response).await?;
        let parsed: VoicesResponse = serde_json::from_str(&body)?;
        Ok(parsed.voices)
    }
}
