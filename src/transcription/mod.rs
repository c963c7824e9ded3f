#![allow(dead_code)]

use crate::audio::segment::Segment;
use serde::{Deserialize, Serialize};

pub mod assembler;
pub mod models;
pub mod whisper;

/// Recognized text for exactly one audio segment.
///
/// Empty text is a valid result: a silent segment transcribes to nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub segment: Segment,
    pub text: String,
}

impl TranscriptionResult {
    pub fn new(segment: Segment, text: String) -> Self {
        Self { segment, text }
    }

    pub fn is_silence(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Finished transcript: per-segment entries in ordinal order plus the
/// assembled text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub entries: Vec<TranscriptionResult>,
    pub text: String,
}

impl Transcript {
    pub fn segment_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn segment(index: usize, start: u64, end: u64) -> Segment {
        Segment {
            index,
            start: Duration::from_secs(start),
            end: Duration::from_secs(end),
        }
    }

    #[test]
    fn test_silence_detection() {
        let silent = TranscriptionResult::new(segment(0, 0, 30), "  ".to_string());
        assert!(silent.is_silence());

        let spoken = TranscriptionResult::new(segment(1, 30, 60), "hello".to_string());
        assert!(!spoken.is_silence());
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript {
            entries: vec![],
            text: String::new(),
        };
        assert!(transcript.is_empty());
        assert_eq!(transcript.segment_count(), 0);
    }
}
