use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParlatoConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub segmentation: SegmentationConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ParlatoConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            segmentation: SegmentationConfig::default(),
            transcription: TranscriptionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Which source wins when a file and a URL are both supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPrecedence {
    Url,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_precedence")]
    pub precedence: InputPrecedence,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            precedence: InputPrecedence::Url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Window length in seconds; must be positive
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self { window_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Whisper model: tiny, base, small, medium, large
    #[serde(default = "default_model")]
    pub model: String,
    /// Explicit model file override (skips the managed models directory)
    pub model_path: Option<PathBuf>,
    #[serde(default)]
    pub use_gpu: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            model_path: None,
            use_gpu: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix each entry with its HH:MM:SS offset label
    #[serde(default)]
    pub timestamps: bool,
    /// Where transcript files land (None = current directory)
    pub directory: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            timestamps: false,
            directory: None,
        }
    }
}

fn default_precedence() -> InputPrecedence {
    InputPrecedence::Url
}

fn default_window_secs() -> u64 {
    30
}

fn default_model() -> String {
    "base".to_string()
}
