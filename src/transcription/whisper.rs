use crate::error::{ParlatoError, Result};
use crate::transcription::models::{ModelManager, WhisperModel};
use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// A loaded Whisper model.
///
/// Loading is the expensive part; the CLI layer constructs one engine per run
/// and passes it down, so every segment reuses the same context.
pub struct WhisperEngine {
    ctx: WhisperContext,
}

impl WhisperEngine {
    pub fn new<P: AsRef<Path>>(model_path: P, use_gpu: bool) -> Result<Self> {
        let mut params = WhisperContextParameters::default();
        params.use_gpu = use_gpu;

        let ctx = WhisperContext::new_with_params(
            model_path.as_ref().to_str().unwrap_or_default(),
            params,
        )
        .map_err(|e| ParlatoError::ModelUnavailable(format!("Failed to load model: {}", e)))?;

        Ok(Self { ctx })
    }

    pub fn from_model(manager: &ModelManager, model: WhisperModel, use_gpu: bool) -> Result<Self> {
        let path = manager.model_path(model);
        if !path.exists() {
            return Err(ParlatoError::WhisperModelNotFound(path));
        }
        Self::new(path, use_gpu)
    }

    /// Transcribe one segment of audio (16kHz mono f32).
    ///
    /// Returns the recognized text, which is empty for silence.
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| ParlatoError::Audio(format!("Failed to create decoder state: {}", e)))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| ParlatoError::Audio(format!("Inference failed: {}", e)))?;

        let num_segments = state.full_n_segments();

        let mut pieces = Vec::new();
        for i in 0..num_segments {
            if let Some(segment) = state.get_segment(i) {
                let text = segment
                    .to_str_lossy()
                    .map_err(|e| ParlatoError::Audio(format!("Failed to get text: {}", e)))?;
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
            }
        }

        Ok(pieces.join(" "))
    }
}
