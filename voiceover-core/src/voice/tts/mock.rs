use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use super::provider::TextToSpeech;
use super::types::{AudioData, SsmlGender, SynthesisRequest, Voice};
use crate::error::SynthesisError;

/// Mock behavior for the mock provider
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return audio derived from the request text
    #[default]
    Success,
    /// Always reject credentials
    AlwaysAuthenticationError,
    /// Always reject the request
    AlwaysRequestError,
    /// Succeed except for the given 1-based call, which is rejected
    FailOnCall { call: usize },
    /// Apply queued behaviors one per call, then fall back to success
    BehaviorQueue { behaviors: Vec<MockBehavior> },
}

/// Mock TTS provider for testing and dry runs
#[derive(Clone)]
pub struct MockTts {
    behavior: Arc<Mutex<MockBehavior>>,
    call_count: Arc<Mutex<usize>>,
    captured_requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl MockTts {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            call_count: Arc::new(Mutex::new(0)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn pop_behavior_from_queue(behavior: &mut MockBehavior) -> MockBehavior {
        if let MockBehavior::BehaviorQueue { behaviors } = behavior {
            if behaviors.is_empty() {
                return MockBehavior::Success;
            }
            return behaviors.remove(0);
        }
        behavior.clone()
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_captured_requests(&self) -> Vec<SynthesisRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    /// Audio the mock returns for `text`
    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("mock audio: {}", text.trim()).into_bytes()
    }
}

#[async_trait]
impl TextToSpeech for MockTts {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioData, SynthesisError> {
        self.captured_requests.lock().unwrap().push(request.clone());

        let call = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };

        let effective = {
            let mut behavior = self.behavior.lock().unwrap();
            Self::pop_behavior_from_queue(&mut behavior)
        };

        if request.text().trim().is_empty() {
            return Err(SynthesisError::Request(anyhow!("Mock: input text is empty")));
        }

        match effective {
            MockBehavior::Success | MockBehavior::BehaviorQueue { .. } => Ok(AudioData {
                bytes: Self::audio_for(request.text()),
                encoding: request.audio_config.audio_encoding,
            }),
            MockBehavior::AlwaysAuthenticationError => Err(SynthesisError::Authentication(
                anyhow!("Mock: credentials rejected"),
            )),
            MockBehavior::AlwaysRequestError => {
                Err(SynthesisError::Request(anyhow!("Mock: request rejected")))
            }
            MockBehavior::FailOnCall { call: failing } if failing == call => Err(
                SynthesisError::Request(anyhow!("Mock: request {call} rejected")),
            ),
            MockBehavior::FailOnCall { .. } => Ok(AudioData {
                bytes: Self::audio_for(request.text()),
                encoding: request.audio_config.audio_encoding,
            }),
        }
    }

    async fn list_voices(
        &self,
        language_code: Option<&str>,
    ) -> Result<Vec<Voice>, SynthesisError> {
        let voices = [
            ("en-US-Wavenet-C", "en-US", SsmlGender::Female),
            ("en-US-Wavenet-D", "en-US", SsmlGender::Male),
            ("en-GB-Wavenet-A", "en-GB", SsmlGender::Female),
        ];

        Ok(voices
            .into_iter()
            .filter(|(_, lang, _)| language_code.map_or(true, |code| code == *lang))
            .map(|(name, lang, gender)| Voice {
                name: name.to_string(),
                language_codes: vec![lang.to_string()],
                ssml_gender: gender,
                natural_sample_rate_hertz: 24000,
            })
            .collect())
    }
}
