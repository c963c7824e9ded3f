use crate::transcription::{Transcript, TranscriptionResult};
use std::time::Duration;

/// Name of the downloadable artifact for each assembly mode.
pub fn output_filename(timestamps: bool) -> &'static str {
    if timestamps {
        "complete_transcript.txt"
    } else {
        "transcript.txt"
    }
}

/// Format a stream offset as HH:MM:SS
pub fn format_offset(offset: Duration) -> String {
    let total = offset.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Accumulates per-segment results, in ordinal order, into one transcript.
///
/// The running text is visible after every push, so the shell can render
/// progress while later segments are still being transcribed.
pub struct TranscriptAssembler {
    timestamps: bool,
    entries: Vec<TranscriptionResult>,
    buffer: String,
}

impl TranscriptAssembler {
    pub fn new(timestamps: bool) -> Self {
        Self {
            timestamps,
            entries: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Append the next result and return its rendered contribution.
    ///
    /// Timestamp mode labels each entry with the segment's start offset;
    /// plain mode joins entry texts with a single space. An empty text keeps
    /// its place (and its label) either way.
    pub fn push(&mut self, result: TranscriptionResult) -> String {
        let contribution = if self.timestamps {
            format!(
                "Timestamp {}:\n{}\n\n",
                format_offset(result.segment.start),
                result.text
            )
        } else if self.entries.is_empty() {
            result.text.clone()
        } else {
            format!(" {}", result.text)
        };

        self.buffer.push_str(&contribution);
        self.entries.push(result);
        contribution
    }

    /// The transcript assembled so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn finish(self) -> Transcript {
        Transcript {
            entries: self.entries,
            text: self.buffer,
        }
    }
}
