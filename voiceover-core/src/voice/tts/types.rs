use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Gender hint sent alongside the voice selection. The service treats it as
/// a preference; an explicit voice name may override it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SsmlGender {
    SsmlVoiceGenderUnspecified,
    Male,
    Female,
    #[default]
    Neutral,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AudioEncoding {
    #[default]
    Mp3,
    Linear16,
    OggOpus,
    Mulaw,
    Alaw,
}

impl AudioEncoding {
    /// Conventional file extension for audio in this encoding
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::Linear16 => "wav",
            AudioEncoding::OggOpus => "ogg",
            AudioEncoding::Mulaw | AudioEncoding::Alaw => "wav",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelection {
    pub language_code: String,
    pub name: String,
    pub ssml_gender: SsmlGender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: AudioEncoding,
}

/// One synthesis call. Serializes to the `text:synthesize` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelection,
    pub audio_config: AudioConfig,
}

impl SynthesisRequest {
    pub fn text(&self) -> &str {
        &self.input.text
    }
}

/// Audio returned from a synthesis call
#[derive(Debug, Clone)]
pub struct AudioData {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
}

/// A voice offered by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub name: String,
    #[serde(default)]
    pub language_codes: Vec<String>,
    #[serde(default)]
    pub ssml_gender: SsmlGender,
    #[serde(default)]
    pub natural_sample_rate_hertz: u32,
}

fn default_language_code() -> String {
    "en-US".to_string()
}

/// Request parameters applied to every segment unless overridden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDefaults {
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default)]
    pub ssml_gender: SsmlGender,
    #[serde(default)]
    pub audio_encoding: AudioEncoding,
}

impl Default for VoiceDefaults {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            ssml_gender: SsmlGender::default(),
            audio_encoding: AudioEncoding::default(),
        }
    }
}

impl VoiceDefaults {
    pub fn request(&self, text: &str, voice_name: &str) -> SynthesisRequest {
        SynthesisRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelection {
                language_code: self.language_code.clone(),
                name: voice_name.to_string(),
                ssml_gender: self.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: self.audio_encoding,
            },
        }
    }
}
