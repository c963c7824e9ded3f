use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParlatoError {
    #[error("Audio extraction failed: {0}")]
    Extraction(String),

    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Whisper model not found: {0}")]
    WhisperModelNotFound(PathBuf),

    #[error("Transcription failed on segment {index}: {message}")]
    SegmentTranscription { index: usize, message: String },

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParlatoError>;
