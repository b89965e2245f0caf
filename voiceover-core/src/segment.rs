//! Segments of narration and the scripts that order them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Voice used when neither a segment nor its script names one
pub const DEFAULT_VOICE: &str = "en-US-Wavenet-D";

/// One piece of text destined for its own audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    output_filename: PathBuf,
    voice_identifier: String,
}

impl Segment {
    pub fn new(
        text: impl Into<String>,
        output_filename: impl Into<PathBuf>,
        voice_identifier: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            output_filename: output_filename.into(),
            voice_identifier: voice_identifier.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn output_filename(&self) -> &Path {
        &self.output_filename
    }

    pub fn voice_identifier(&self) -> &str {
        &self.voice_identifier
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    default_voice: Option<String>,
    #[serde(default)]
    segments: Vec<SegmentEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SegmentEntry {
    text: String,
    output: PathBuf,
    #[serde(default)]
    voice: Option<String>,
}

/// An ordered list of segments, synthesized front to back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    segments: Vec<Segment>,
}

impl Script {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse a script from TOML:
    ///
    /// ```toml
    /// default_voice = "en-US-Wavenet-D"
    ///
    /// [[segments]]
    /// text = "Hello."
    /// output = "part1.mp3"
    /// voice = "en-US-Wavenet-C"   # optional
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(contents).context("Failed to parse script")?;
        let default_voice = file
            .default_voice
            .unwrap_or_else(|| DEFAULT_VOICE.to_string());

        let segments = file
            .segments
            .into_iter()
            .map(|entry| {
                let voice = entry.voice.unwrap_or_else(|| default_voice.clone());
                Segment::new(entry.text, entry.output, voice)
            })
            .collect();

        Ok(Self { segments })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {path:?}"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid script {path:?}"))
    }

    /// The four-part product voiceover the tool was first written for
    pub fn demo() -> Self {
        let texts = [DEMO_PART_1, DEMO_PART_2, DEMO_PART_3, DEMO_PART_4];
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Segment::new(
                    *text,
                    format!("klarity_voiceover_part{}.mp3", i + 1),
                    DEFAULT_VOICE,
                )
            })
            .collect();
        Self { segments }
    }

    /// Replace every segment's voice
    pub fn with_voice(self, voice: &str) -> Self {
        let segments = self
            .segments
            .into_iter()
            .map(|s| Segment {
                voice_identifier: voice.to_string(),
                ..s
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Output filenames used by more than one segment, in first-seen order.
    /// Later segments overwrite earlier ones at these paths.
    pub fn duplicate_filenames(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for segment in &self.segments {
            let path = segment.output_filename();
            if !seen.insert(path) && !duplicates.contains(&path) {
                duplicates.push(path);
            }
        }
        duplicates
    }
}

const DEMO_PART_1: &str = "In an age of constant noise and information overload, many of us find \
ourselves grappling with profound questions. How do we find clarity? How do we align with our \
deepest selves amidst life's inherent complexities?";

const DEMO_PART_2: &str = "Introducing 'Klarity' – your private, AI co-pilot for profound \
self-discovery. It's not an advice-giver. It's a cognitive tool designed to help you navigate \
your own thoughts. Simply externalize your dilemma, and let the process begin.";

const DEMO_PART_3: &str = "But how does it provide real clarity? It does so by providing a \
cognitive scaffold. First, 'Deconstructive Insight' helps you reframe the problem, separating \
what you can control from what you can't. Next, 'Contextual Wisdom' broadens your perspective, \
showing how timeless philosophies might view your situation. Finally, 'Self-Alignment Guidance' \
uses metacognitive prompts to connect these insights back to your core values, guiding you \
toward your own authentic answer. This entire journey of introspection happens in a sanctuary \
of absolute privacy. Klarity is 100% local-first. Your data never leaves your device. And \
incredibly, this entire, fully functional application—its logic, its contemplative design, its \
privacy-by-design architecture—was brought to life from one single, unedited prompt to \
Bolt.new, showcasing the pinnacle of AI-driven development.";

const DEMO_PART_4: &str = "Klarity: Augment your wisdom, not your data. Experience a new class \
of AI tool, built for genuine clarity. Thank you.";
