use crate::audio::convert::prepare_for_whisper;
use crate::audio::segment::Segmenter;
use crate::audio::{AudioStream, WHISPER_SAMPLE_RATE};
use crate::error::{ParlatoError, Result};
use crate::transcription::assembler::TranscriptAssembler;
use crate::transcription::whisper::WhisperEngine;
use crate::transcription::{Transcript, TranscriptionResult};
use std::time::Duration;

/// One second of audio, the smallest input whisper.cpp will accept
const MIN_SEGMENT_SAMPLES: usize = WHISPER_SAMPLE_RATE as usize;

/// Run the full transcription pipeline over one extracted stream.
///
/// Segments are pulled lazily and processed strictly in order: slice,
/// transcribe, append. At most one segment's audio is in flight at a time.
/// `on_entry` receives each completed entry and its rendered contribution,
/// so callers can display progress while later segments are still pending.
///
/// Any segment failure aborts the run; no partial transcript is returned.
pub fn run<F>(
    engine: &WhisperEngine,
    stream: &AudioStream,
    window: Duration,
    timestamps: bool,
    mut on_entry: F,
) -> Result<Transcript>
where
    F: FnMut(&TranscriptionResult, &str),
{
    if window.is_zero() {
        return Err(ParlatoError::Config(
            "Segment window must be positive".to_string(),
        ));
    }

    let duration = stream.duration();
    let samples = prepare_for_whisper(stream)?;

    tracing::info!(
        "Transcribing {:.1}s of audio in {}s windows",
        duration.as_secs_f64(),
        window.as_secs()
    );

    let mut assembler = TranscriptAssembler::new(timestamps);

    for segment in Segmenter::new(duration, window) {
        tracing::debug!(
            "Segment {}: {:.1}s - {:.1}s",
            segment.index,
            segment.start.as_secs_f64(),
            segment.end.as_secs_f64()
        );

        let range = segment.sample_range(WHISPER_SAMPLE_RATE, samples.len());
        let slice = &samples[range];

        // whisper.cpp rejects sub-second input; zero-pad a short tail window
        let text = if slice.len() < MIN_SEGMENT_SAMPLES {
            let mut padded = slice.to_vec();
            padded.resize(MIN_SEGMENT_SAMPLES, 0.0);
            engine.transcribe(&padded)
        } else {
            engine.transcribe(slice)
        }
        .map_err(|e| ParlatoError::SegmentTranscription {
            index: segment.index,
            message: e.to_string(),
        })?;

        let result = TranscriptionResult::new(segment, text);
        let contribution = assembler.push(result.clone());
        on_entry(&result, &contribution);
    }

    Ok(assembler.finish())
}
