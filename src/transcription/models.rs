use crate::error::{ParlatoError, Result};
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Whisper model size tier, trading accuracy against resource cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl FromStr for WhisperModel {
    type Err = ParlatoError;

    /// Selector validation happens here, before any audio is touched.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(ParlatoError::ModelUnavailable(format!(
                "Unknown model '{}'. Use: tiny, base, small, medium, large",
                other
            ))),
        }
    }
}

impl WhisperModel {
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Tiny => "ggml-tiny.bin",
            Self::Base => "ggml-base.bin",
            Self::Small => "ggml-small.bin",
            Self::Medium => "ggml-medium.bin",
            Self::Large => "ggml-large.bin",
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{}",
            self.filename()
        )
    }

    /// Approximate download size, for progress display
    pub fn size_mb(&self) -> u64 {
        match self {
            Self::Tiny => 75,
            Self::Base => 142,
            Self::Small => 466,
            Self::Medium => 1500,
            Self::Large => 2900,
        }
    }

    pub fn all() -> &'static [WhisperModel] {
        &[
            Self::Tiny,
            Self::Base,
            Self::Small,
            Self::Medium,
            Self::Large,
        ]
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tiny => write!(f, "tiny"),
            Self::Base => write!(f, "base"),
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

/// Resolves, downloads, and deletes ggml model files on disk.
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }

    pub fn model_path(&self, model: WhisperModel) -> PathBuf {
        self.models_dir.join(model.filename())
    }

    pub fn model_exists(&self, model: WhisperModel) -> bool {
        self.model_path(model).exists()
    }

    pub fn list_all(&self) -> Vec<(WhisperModel, bool, u64)> {
        WhisperModel::all()
            .iter()
            .map(|m| (*m, self.model_exists(*m), m.size_mb()))
            .collect()
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.models_dir)?;
        Ok(())
    }

    pub fn download_model<F>(&self, model: WhisperModel, progress: F) -> Result<PathBuf>
    where
        F: Fn(u64, u64),
    {
        self.ensure_dir()?;

        let path = self.model_path(model);

        if path.exists() {
            let size = fs::metadata(&path)?.len();
            progress(size, size);
            return Ok(path);
        }

        let url = model.download_url();
        let temp_path = path.with_extension("bin.tmp");

        let response = reqwest::blocking::Client::new()
            .get(&url)
            .send()
            .map_err(|e| ParlatoError::Api(format!("Download failed: {}", e)))?;

        let total_size = response
            .content_length()
            .unwrap_or(model.size_mb() * 1024 * 1024);

        let mut file = fs::File::create(&temp_path)?;
        let mut downloaded: u64 = 0;

        let mut reader = response;
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer)?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])?;
            downloaded += bytes_read as u64;
            progress(downloaded, total_size);
        }

        fs::rename(&temp_path, &path)?;

        Ok(path)
    }

    pub fn delete_model(&self, model: WhisperModel) -> Result<()> {
        let path = self.model_path(model);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_model_from_str() {
        assert_eq!("base".parse::<WhisperModel>().unwrap(), WhisperModel::Base);
        assert_eq!("TINY".parse::<WhisperModel>().unwrap(), WhisperModel::Tiny);
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = "huge".parse::<WhisperModel>().unwrap_err();
        assert!(matches!(err, ParlatoError::ModelUnavailable(_)));
    }

    #[test]
    fn test_model_path() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        let path = manager.model_path(WhisperModel::Base);
        assert!(path.ends_with("ggml-base.bin"));
    }

    #[test]
    fn test_list_all() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        let models = manager.list_all();
        assert_eq!(models.len(), 5);
        assert!(models.iter().all(|(_, exists, _)| !exists));
    }

    #[test]
    fn test_model_display() {
        assert_eq!(WhisperModel::Tiny.to_string(), "tiny");
        assert_eq!(WhisperModel::Medium.to_string(), "medium");
        assert_eq!(WhisperModel::Large.to_string(), "large");
    }

    #[test]
    fn test_download_urls_match_filenames() {
        for model in WhisperModel::all() {
            assert!(model.download_url().ends_with(model.filename()));
        }
    }

    #[test]
    fn test_ensure_dir() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().join("models"));
        assert!(manager.ensure_dir().is_ok());
        assert!(dir.path().join("models").exists());
    }

    #[test]
    fn test_model_exists() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        manager.ensure_dir().unwrap();

        fs::write(manager.model_path(WhisperModel::Base), b"dummy").unwrap();

        assert!(manager.model_exists(WhisperModel::Base));
        assert!(!manager.model_exists(WhisperModel::Tiny));
    }

    #[test]
    fn test_delete_model() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        manager.ensure_dir().unwrap();

        let path = manager.model_path(WhisperModel::Base);
        fs::write(&path, b"dummy").unwrap();
        assert!(path.exists());

        assert!(manager.delete_model(WhisperModel::Base).is_ok());
        assert!(!path.exists());
    }
}
