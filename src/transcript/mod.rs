// Transcript input model
// Parses and validates the {pause, speakers} JSON shape the engine consumes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// One phrase as authored in the transcript, before timeline placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseSpec {
    pub words: String,
    /// Intended speaking duration in milliseconds
    #[serde(rename = "time")]
    pub duration_ms: u64,
}

/// One speaker and their ordered phrase list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Speaker {
    pub name: String,
    pub phrases: Vec<PhraseSpec>,
}

/// The full transcript input: a pause constant plus ordered speakers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    /// Gap inserted between consecutive phrases, in milliseconds
    #[serde(rename = "pause")]
    pub pause_ms: u64,
    pub speakers: Vec<Speaker>,
}

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read transcript file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse transcript: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("speaker at position {index} has an empty name")]
    EmptySpeakerName { index: usize },
    #[error("phrase {phrase} of speaker \"{speaker}\" has no words")]
    EmptyWords { speaker: String, phrase: usize },
    #[error("phrase {phrase} of speaker \"{speaker}\" has a zero duration")]
    ZeroDuration { speaker: String, phrase: usize },
}

impl Transcript {
    /// Parse and validate a transcript from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TranscriptError> {
        let transcript: Transcript = serde_json::from_str(json)?;
        transcript.validate()?;
        Ok(transcript)
    }

    /// Load and validate a transcript from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TranscriptError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check the input constraints every timeline build relies on
    pub fn validate(&self) -> Result<(), TranscriptError> {
        validate_speakers(&self.speakers)
    }
}

/// Reject speakers the timeline builder cannot place: empty names, empty
/// phrase text, or zero-width phrase intervals
pub(crate) fn validate_speakers(speakers: &[Speaker]) -> Result<(), TranscriptError> {
    for (index, speaker) in speakers.iter().enumerate() {
        if speaker.name.trim().is_empty() {
            return Err(TranscriptError::EmptySpeakerName { index });
        }
        for (phrase, spec) in speaker.phrases.iter().enumerate() {
            if spec.words.trim().is_empty() {
                return Err(TranscriptError::EmptyWords {
                    speaker: speaker.name.clone(),
                    phrase,
                });
            }
            if spec.duration_ms == 0 {
                return Err(TranscriptError::ZeroDuration {
                    speaker: speaker.name.clone(),
                    phrase,
                });
            }
        }
    }
    Ok(())
}
