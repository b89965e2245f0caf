pub mod config;
pub mod manager;

#[cfg(test)]
mod tests;

pub use config::{Settings, TtsProviderConfig};
pub use manager::SettingsManager;
