pub mod credentials;
pub mod error;
pub mod runner;
pub mod segment;
pub mod settings;
pub mod voice;

// Public library API
pub use error::SynthesisError;
pub use runner::{RunReport, SynthesisRunner};
pub use segment::{Script, Segment};
pub use settings::{Settings, SettingsManager};
pub use voice::tts::provider::TextToSpeech;
