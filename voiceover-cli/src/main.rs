use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use voiceover_core::voice::tts::types::{AudioEncoding, SsmlGender};
use voiceover_core::SettingsManager;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "voiceover")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synthesize scripted narration segments into audio files")]
struct Args {
    /// Script (TOML) listing the segments to synthesize. Without it the
    /// built-in four-part demo script is used.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Settings file to use instead of ~/.voiceover/settings.toml
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Use a named provider from settings instead of the default one
    #[arg(long, value_name = "NAME")]
    provider: Option<String>,

    /// Directory relative output filenames are written to (must exist)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Voice for every segment, overriding the script
    #[arg(long, value_name = "NAME")]
    voice: Option<String>,

    /// Language code sent with each request (e.g. en-US)
    #[arg(long, value_name = "CODE")]
    language: Option<String>,

    /// Gender hint: NEUTRAL, MALE or FEMALE
    #[arg(long, value_name = "GENDER")]
    gender: Option<SsmlGender>,

    /// Audio encoding: MP3, LINEAR16, OGG_OPUS, MULAW or ALAW
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<AudioEncoding>,

    /// Keep synthesizing after a segment fails and report every failure
    #[arg(long)]
    keep_going: bool,

    /// List the provider's voices and exit. Limited to --language when given.
    #[arg(long)]
    list_voices: bool,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: script={:?}, settings={:?}, provider={:?}, keep_going={}, list_voices={}",
        args.script, args.settings, args.provider, args.keep_going, args.list_voices
    );

    let mut manager = match &args.settings {
        Some(path) => SettingsManager::from_path(path.clone())?,
        None => SettingsManager::new()?,
    };
    info!("Settings loaded from {:?}", manager.path());

    let mut provider_selection = Ok(());
    manager.update_setting(|s| {
        if let Some(name) = &args.provider {
            provider_selection = s.set_active_tts(name);
        }
        if let Some(language) = args.language.clone() {
            s.voice.language_code = language;
        }
        if let Some(gender) = args.gender {
            s.voice.ssml_gender = gender;
        }
        if let Some(encoding) = args.encoding {
            s.voice.audio_encoding = encoding;
        }
        if let Some(dir) = args.output_dir.clone() {
            s.output_dir = Some(dir);
        }
    });
    provider_selection.map_err(anyhow::Error::msg)?;

    let settings = manager.settings();

    if args.list_voices {
        return commands::list_voices(settings, args.language.as_deref(), commands::stdout())
            .await;
    }

    commands::synthesize_script(
        settings,
        args.script.as_deref(),
        args.voice.as_deref(),
        args.keep_going,
        commands::stdout(),
    )
    .await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Create trace directory in user's home
    let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
    let trace_dir = home.join(".voiceover").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("voiceover.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Setup tracing subscriber with file output
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
