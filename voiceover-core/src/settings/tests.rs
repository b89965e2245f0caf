use crate::credentials::CredentialSource;
use crate::settings::manager::SettingsManager;
use crate::settings::{Settings, TtsProviderConfig};
use crate::voice::tts::mock::MockBehavior;
use crate::voice::tts::types::{AudioEncoding, SsmlGender};
use tempfile::TempDir;

#[test]
fn test_missing_settings_file_is_created_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("nested").join("settings.toml");

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert!(settings_path.exists());
    assert_eq!(manager.path(), settings_path.as_path());
    assert_eq!(manager.settings().default_tts, None);
    assert_eq!(manager.settings().voice.language_code, "en-US");
    assert_eq!(manager.settings().voice.ssml_gender, SsmlGender::Neutral);
    assert_eq!(manager.settings().voice.audio_encoding, AudioEncoding::Mp3);
}

#[test]
fn test_saved_settings_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");

    let mut manager = SettingsManager::from_path(settings_path.clone()).unwrap();
    let mut settings = Settings::default();
    settings.add_provider(
        "google".to_string(),
        TtsProviderConfig::GoogleCloud {
            endpoint: "http://localhost:9999".to_string(),
            credentials: CredentialSource::ApiKeyEnv {
                var: "MY_KEY".to_string(),
            },
            quota_project: Some("demo-project".to_string()),
            timeout_secs: Some(30),
        },
    );
    settings.set_active_tts("google").unwrap();
    settings.voice.audio_encoding = AudioEncoding::OggOpus;
    manager.save_settings(settings).unwrap();

    let reloaded = SettingsManager::from_path(settings_path).unwrap();
    let settings = reloaded.settings();
    assert_eq!(settings.default_tts.as_deref(), Some("google"));
    assert_eq!(settings.voice.audio_encoding, AudioEncoding::OggOpus);
    match settings.active_tts() {
        TtsProviderConfig::GoogleCloud {
            endpoint,
            credentials,
            quota_project,
            timeout_secs,
        } => {
            assert_eq!(endpoint, "http://localhost:9999");
            assert_eq!(
                credentials,
                CredentialSource::ApiKeyEnv {
                    var: "MY_KEY".to_string()
                }
            );
            assert_eq!(quota_project.as_deref(), Some("demo-project"));
            assert_eq!(timeout_secs, Some(30));
        }
        other => panic!("unexpected provider {other:?}"),
    }
}

#[test]
fn test_corrupted_settings_are_backed_up() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(&settings_path, "this is = = not toml").unwrap();

    let manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    assert_eq!(manager.settings().default_tts, None);
    let backup = temp_dir.path().join("settings.toml.backup");
    assert_eq!(
        std::fs::read_to_string(backup).unwrap(),
        "this is = = not toml"
    );
    let rewritten = std::fs::read_to_string(&settings_path).unwrap();
    assert!(toml::from_str::<Settings>(&rewritten).is_ok());
}

#[test]
fn test_hand_written_settings_parse() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &settings_path,
        r#"
default_tts = "dry"
output_dir = "out"

[voice]
ssml_gender = "FEMALE"

[tts_providers.dry]
type = "mock"

[tts_providers.google]
type = "google_cloud"
credentials = { type = "api_key", key = "abc" }
"#,
    )
    .unwrap();

    let manager = SettingsManager::from_path(settings_path).unwrap();
    let settings = manager.settings();

    assert_eq!(
        settings.active_tts(),
        TtsProviderConfig::Mock {
            behavior: MockBehavior::Success
        }
    );
    assert_eq!(settings.output_dir.as_deref(), Some(std::path::Path::new("out")));
    assert_eq!(settings.voice.ssml_gender, SsmlGender::Female);
    assert_eq!(settings.voice.language_code, "en-US");
    assert_eq!(settings.list_providers(), vec!["dry", "google"]);
}

#[test]
fn test_unconfigured_provider_falls_back_to_google_cloud() {
    let settings = Settings::default();
    assert_eq!(settings.active_tts(), TtsProviderConfig::default());
    assert!(matches!(
        settings.active_tts(),
        TtsProviderConfig::GoogleCloud {
            credentials: CredentialSource::Command { .. },
            ..
        }
    ));
}

#[test]
fn test_set_active_tts_rejects_unknown_provider() {
    let mut settings = Settings::default();
    let err = settings.set_active_tts("missing").unwrap_err();
    assert!(err.contains("missing"));
    assert_eq!(settings.default_tts, None);
}

#[test]
fn test_update_setting_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.toml");
    let mut manager = SettingsManager::from_path(settings_path.clone()).unwrap();

    manager.update_setting(|s| s.voice.language_code = "en-GB".to_string());
    assert_eq!(manager.settings().voice.language_code, "en-GB");

    let reloaded = SettingsManager::from_path(settings_path).unwrap();
    assert_eq!(reloaded.settings().voice.language_code, "en-US");
}
