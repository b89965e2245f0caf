use crate::credentials::CredentialSource;
use crate::voice::tts::google_cloud::DEFAULT_ENDPOINT;
use crate::voice::tts::mock::MockBehavior;
use crate::voice::tts::types::VoiceDefaults;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TtsProviderConfig {
    #[serde(rename = "google_cloud")]
    GoogleCloud {
        #[serde(default = "default_endpoint")]
        endpoint: String,
        #[serde(default)]
        credentials: CredentialSource,
        #[serde(default)]
        quota_project: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        behavior: MockBehavior,
    },
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for TtsProviderConfig {
    fn default() -> Self {
        Self::GoogleCloud {
            endpoint: default_endpoint(),
            credentials: CredentialSource::default(),
            quota_project: None,
            timeout_secs: None,
        }
    }
}

/// Core application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// The name of the currently active TTS provider
    #[serde(default)]
    pub default_tts: Option<String>,

    /// Map of provider name to configuration
    #[serde(default)]
    pub tts_providers: HashMap<String, TtsProviderConfig>,

    /// Request parameters shared by every segment
    #[serde(default)]
    pub voice: VoiceDefaults,

    /// Directory relative output filenames are resolved against
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Get the active provider configuration, falling back to Google Cloud
    /// with helper-issued credentials when nothing is configured
    pub fn active_tts(&self) -> TtsProviderConfig {
        self.default_tts
            .as_ref()
            .and_then(|name| self.tts_providers.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Set the active provider (returns error if provider doesn't exist)
    pub fn set_active_tts(&mut self, name: &str) -> Result<(), String> {
        if self.tts_providers.contains_key(name) {
            self.default_tts = Some(name.to_string());
            Ok(())
        } else {
            Err(format!(
                "Provider '{name}' not found (configured: {})",
                self.list_providers().join(", ")
            ))
        }
    }

    /// Add or update a provider configuration
    pub fn add_provider(&mut self, name: String, config: TtsProviderConfig) {
        self.tts_providers.insert(name, config);
    }

    /// List all provider names, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tts_providers.keys().cloned().collect();
        names.sort();
        names
    }
}
