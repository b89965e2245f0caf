use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{info, warn};
use voiceover_core::voice::tts::create_provider;
use voiceover_core::{Script, Settings, SynthesisRunner};

/// Where user-facing lines go. Shared so the runner's write notifier can
/// report progress while the run is in flight.
pub type Output = Arc<Mutex<dyn Write + Send>>;

pub fn stdout() -> Output {
    Arc::new(Mutex::new(std::io::stdout()))
}

fn emit(out: &Output, line: fmt::Arguments<'_>) -> Result<()> {
    let mut out = out.lock().map_err(|_| anyhow!("Output lock poisoned"))?;
    out.write_fmt(line)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Print the active provider's voices, optionally limited to one language
pub async fn list_voices(settings: &Settings, language: Option<&str>, out: Output) -> Result<()> {
    let tts = create_provider(&settings.active_tts()).await?;
    let voices = tts
        .list_voices(language)
        .await
        .with_context(|| format!("Failed to list {} voices", tts.name()))?;

    if voices.is_empty() {
        match language {
            Some(language) => emit(&out, format_args!("No voices available for {language}"))?,
            None => emit(&out, format_args!("No voices available"))?,
        }
        return Ok(());
    }

    for voice in voices {
        emit(
            &out,
            format_args!(
                "{:<28} {:<12} {:<8} {} Hz",
                voice.name,
                voice.language_codes.join(","),
                voice.ssml_gender.to_string(),
                voice.natural_sample_rate_hertz
            ),
        )?;
    }
    Ok(())
}

/// Synthesize a script (or the built-in demo script) into audio files
pub async fn synthesize_script(
    settings: &Settings,
    script_path: Option<&Path>,
    voice: Option<&str>,
    keep_going: bool,
    out: Output,
) -> Result<()> {
    let mut script = match script_path {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };
    if let Some(voice) = voice {
        script = script.with_voice(voice);
    }
    if script.is_empty() {
        bail!("Script has no segments");
    }

    let tts = create_provider(&settings.active_tts()).await?;
    info!(
        provider = tts.name(),
        segments = script.len(),
        "Starting synthesis"
    );

    let sink = out.clone();
    let runner = SynthesisRunner::new(tts)
        .with_defaults(settings.voice.clone())
        .with_output_dir(settings.output_dir.clone().unwrap_or_default())
        .on_written(move |path| {
            let written = emit(
                &sink,
                format_args!("Audio content written to \"{}\"", path.display()),
            );
            if let Err(e) = written {
                warn!("Failed to report written file: {e}");
            }
        });

    if keep_going {
        let report = runner.run_isolated(&script).await;
        let failures: Vec<_> = report.failed().collect();
        if !failures.is_empty() {
            emit(&out, format_args!(""))?;
            for (path, error) in &failures {
                emit(&out, format_args!("Failed {}: {error}", path.display()))?;
            }
            bail!(
                "{} of {} segments failed",
                failures.len(),
                report.segments.len()
            );
        }
    } else {
        runner.run(&script).await?;
    }

    emit(
        &out,
        format_args!("\nAll audio segments generated. Combine them in your video editor."),
    )?;
    Ok(())
}
