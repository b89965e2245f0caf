//! Text-to-speech providers

pub mod google_cloud;
pub mod mock;
pub mod provider;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::SynthesisError;
use crate::settings::config::TtsProviderConfig;
use google_cloud::{GoogleCloudConfig, GoogleCloudTts};
use mock::MockTts;
use provider::TextToSpeech;

/// Build the provider described by `config`, resolving its credentials first
pub async fn create_provider(
    config: &TtsProviderConfig,
) -> Result<Arc<dyn TextToSpeech>, SynthesisError> {
    match config {
        TtsProviderConfig::GoogleCloud {
            endpoint,
            credentials,
            quota_project,
            timeout_secs,
        } => {
            let credentials = credentials.resolve().await?;
            info!(%endpoint, ?credentials, "Using Google Cloud TTS");
            let provider = GoogleCloudTts::new(GoogleCloudConfig {
                endpoint: endpoint.clone(),
                credentials,
                quota_project: quota_project.clone(),
                timeout: timeout_secs.map(Duration::from_secs),
            })?;
            Ok(Arc::new(provider))
        }
        TtsProviderConfig::Mock { behavior } => {
            info!(?behavior, "Using mock TTS");
            Ok(Arc::new(MockTts::new(behavior.clone())))
        }
    }
}
