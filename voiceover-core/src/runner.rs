//! Turns segments into audio files, one provider call per segment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::SynthesisError;
use crate::segment::{Script, Segment};
use crate::voice::tts::provider::TextToSpeech;
use crate::voice::tts::types::VoiceDefaults;

/// Called with the destination path after each file is written
pub type WriteNotifier = Box<dyn Fn(&Path) + Send + Sync>;

pub struct SynthesisRunner {
    tts: Arc<dyn TextToSpeech>,
    defaults: VoiceDefaults,
    output_dir: PathBuf,
    notifier: Option<WriteNotifier>,
}

/// Result of one segment within a run
#[derive(Debug)]
pub struct SegmentReport {
    pub output_filename: PathBuf,
    pub outcome: Result<PathBuf, SynthesisError>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub segments: Vec<SegmentReport>,
}

impl RunReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.segments
            .iter()
            .filter_map(|s| s.outcome.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &SynthesisError)> {
        self.segments.iter().filter_map(|s| match &s.outcome {
            Ok(_) => None,
            Err(e) => Some((s.output_filename.as_path(), e)),
        })
    }

    pub fn is_success(&self) -> bool {
        self.segments.iter().all(|s| s.outcome.is_ok())
    }
}

impl SynthesisRunner {
    pub fn new(tts: Arc<dyn TextToSpeech>) -> Self {
        Self {
            tts,
            defaults: VoiceDefaults::default(),
            output_dir: PathBuf::new(),
            notifier: None,
        }
    }

    pub fn with_defaults(mut self, defaults: VoiceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Directory that relative output filenames are resolved against. The
    /// directory must already exist.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn on_written(mut self, notifier: impl Fn(&Path) + Send + Sync + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    fn resolve_path(&self, output_filename: &Path) -> PathBuf {
        self.output_dir.join(output_filename)
    }

    /// Synthesize one segment and write its audio, replacing any existing file.
    pub async fn synthesize(&self, segment: &Segment) -> Result<PathBuf, SynthesisError> {
        if segment.text().trim().is_empty() {
            return Err(SynthesisError::Request(anyhow!(
                "Text for {:?} is empty",
                segment.output_filename()
            )));
        }

        let path = self.resolve_path(segment.output_filename());
        ensure_parent_dir(&path).await?;

        let expected = self.defaults.audio_encoding.extension();
        if path.extension().and_then(|e| e.to_str()) != Some(expected) {
            warn!(
                ?path,
                encoding = %self.defaults.audio_encoding,
                "Output extension does not match encoding (expected .{expected})"
            );
        }

        let request = self
            .defaults
            .request(segment.text(), segment.voice_identifier());
        let audio = self.tts.synthesize(&request).await?;

        write_audio(&path, &audio.bytes).await?;
        info!(?path, bytes = audio.bytes.len(), provider = self.tts.name(), "Audio written");

        if let Some(notify) = &self.notifier {
            notify(&path);
        }
        Ok(path)
    }

    /// Synthesize every segment in order, stopping at the first failure.
    /// Files written before the failure are left in place.
    pub async fn run(&self, script: &Script) -> Result<RunReport, SynthesisError> {
        warn_on_duplicates(script);

        let mut report = RunReport::default();
        for segment in script.segments() {
            let path = self.synthesize(segment).await?;
            report.segments.push(SegmentReport {
                output_filename: segment.output_filename().to_path_buf(),
                outcome: Ok(path),
            });
        }
        Ok(report)
    }

    /// Synthesize every segment in order, recording failures and carrying on.
    pub async fn run_isolated(&self, script: &Script) -> RunReport {
        warn_on_duplicates(script);

        let mut report = RunReport::default();
        for segment in script.segments() {
            let outcome = self.synthesize(segment).await;
            if let Err(e) = &outcome {
                warn!(output = ?segment.output_filename(), "Segment failed: {e}");
            }
            report.segments.push(SegmentReport {
                output_filename: segment.output_filename().to_path_buf(),
                outcome,
            });
        }
        report
    }
}

fn warn_on_duplicates(script: &Script) {
    for path in script.duplicate_filenames() {
        warn!(
            ?path,
            "Output filename used by more than one segment; later audio overwrites earlier"
        );
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<(), SynthesisError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    let metadata = tokio::fs::metadata(parent)
        .await
        .map_err(|e| SynthesisError::io(path, e))?;
    if !metadata.is_dir() {
        return Err(SynthesisError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{parent:?} is not a directory"),
            ),
        ));
    }
    Ok(())
}

async fn write_audio(path: &Path, bytes: &[u8]) -> Result<(), SynthesisError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| SynthesisError::io(path, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| SynthesisError::io(path, e))?;
    file.flush().await.map_err(|e| SynthesisError::io(path, e))?;
    Ok(())
}
