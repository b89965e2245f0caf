use async_trait::async_trait;

use super::types::{AudioData, SynthesisRequest, Voice};
use crate::error::SynthesisError;

/// Trait for text-to-speech providers
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    fn name(&self) -> &'static str;

    /// Synthesize one request into audio
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioData, SynthesisError>;

    /// List available voices, optionally restricted to one language
    async fn list_voices(&self, language_code: Option<&str>)
        -> Result<Vec<Voice>, SynthesisError>;
}
