//! Explicit credentials for the synthesis service.
//!
//! A [`CredentialSource`] lives in settings and describes *where* a credential
//! comes from. Resolving it yields a [`CredentialContext`] that is handed to a
//! provider at construction, so providers never consult the process
//! environment on their own.

use std::fmt;

use anyhow::anyhow;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SynthesisError;

pub const DEFAULT_API_KEY_VAR: &str = "GOOGLE_CLOUD_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    /// API key stored directly in settings
    ApiKey { key: String },
    /// Pre-issued OAuth access token
    AccessToken { token: String },
    /// API key read from an environment variable at resolve time
    ApiKeyEnv {
        #[serde(default = "default_api_key_var")]
        var: String,
    },
    /// Access token printed on stdout by an external helper
    Command {
        #[serde(default = "default_token_program")]
        program: String,
        #[serde(default = "default_token_args")]
        args: Vec<String>,
    },
}

fn default_api_key_var() -> String {
    DEFAULT_API_KEY_VAR.to_string()
}

fn default_token_program() -> String {
    "gcloud".to_string()
}

fn default_token_args() -> Vec<String> {
    ["auth", "application-default", "print-access-token"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Command {
            program: default_token_program(),
            args: default_token_args(),
        }
    }
}

impl CredentialSource {
    pub async fn resolve(&self) -> Result<CredentialContext, SynthesisError> {
        match self {
            CredentialSource::ApiKey { key } => non_empty(key, "api key in settings")
                .map(|key| CredentialContext::ApiKey(key.to_string())),
            CredentialSource::AccessToken { token } => {
                non_empty(token, "access token in settings")
                    .map(|token| CredentialContext::AccessToken(token.to_string()))
            }
            CredentialSource::ApiKeyEnv { var } => {
                let key = std::env::var(var).map_err(|e| {
                    SynthesisError::Authentication(anyhow!(
                        "API key variable {var} is not usable: {e}"
                    ))
                })?;
                non_empty(&key, var).map(|key| CredentialContext::ApiKey(key.to_string()))
            }
            CredentialSource::Command { program, args } => {
                run_token_command(program, args).await
            }
        }
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, SynthesisError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SynthesisError::Authentication(anyhow!("{what} is empty")));
    }
    Ok(trimmed)
}

async fn run_token_command(
    program: &str,
    args: &[String],
) -> Result<CredentialContext, SynthesisError> {
    debug!(program, ?args, "Resolving access token via command");

    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            SynthesisError::Authentication(anyhow!("Failed to run credential helper {program}: {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SynthesisError::Authentication(anyhow!(
            "Credential helper {program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let token = non_empty(&stdout, "credential helper output")?;
    Ok(CredentialContext::AccessToken(token.to_string()))
}

/// A resolved credential, ready to attach to outgoing requests.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialContext {
    ApiKey(String),
    AccessToken(String),
}

impl CredentialContext {
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            CredentialContext::ApiKey(key) => request.query(&[("key", key)]),
            CredentialContext::AccessToken(token) => request.bearer_auth(token),
        }
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialContext::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            CredentialContext::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}
