use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

/// One window of an audio stream, identified by its ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
}

impl Segment {
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Map this segment's time range onto sample indices, clamped to the
    /// buffer so rounding at the tail never slices past the end.
    pub fn sample_range(&self, sample_rate: u32, total_samples: usize) -> Range<usize> {
        let start = (self.start.as_secs_f64() * sample_rate as f64).round() as usize;
        let end = (self.end.as_secs_f64() * sample_rate as f64).round() as usize;
        start.min(total_samples)..end.min(total_samples)
    }
}

/// Lazily yields contiguous, non-overlapping segments covering [0, duration).
///
/// Every segment is `window` long except possibly the last, which takes
/// whatever remains. A stream shorter than one window yields a single
/// segment; a zero-length stream yields none. Pulling one segment at a time
/// keeps at most one window of audio resident downstream.
pub struct Segmenter {
    duration: Duration,
    window: Duration,
    cursor: Duration,
    index: usize,
}

impl Segmenter {
    /// `window` must be nonzero; the config layer enforces this.
    pub fn new(duration: Duration, window: Duration) -> Self {
        debug_assert!(!window.is_zero(), "segment window must be positive");
        Self {
            duration,
            window,
            cursor: Duration::ZERO,
            index: 0,
        }
    }
}

impl Iterator for Segmenter {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.cursor >= self.duration {
            return None;
        }

        let start = self.cursor;
        let end = (start + self.window).min(self.duration);
        let segment = Segment {
            index: self.index,
            start,
            end,
        };

        self.cursor = end;
        self.index += 1;
        Some(segment)
    }
}
