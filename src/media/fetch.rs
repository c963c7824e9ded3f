use crate::error::{ParlatoError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Filename stem used for downloads; yt-dlp appends the container extension.
const DOWNLOAD_STEM: &str = "source";

/// Download a remote video into `dest_dir` and return the container path.
///
/// The caller owns `dest_dir` (typically a TempDir), so the downloaded
/// container never outlives the pipeline run. Failures surface verbatim;
/// there are no retries.
pub fn fetch_url(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    tracing::info!("Fetching remote media: {}", url);

    let template = dest_dir.join(format!("{}.%(ext)s", DOWNLOAD_STEM));

    let output = Command::new("yt-dlp")
        .args(["--no-playlist", "-f", "bestaudio/best", "-o"])
        .arg(&template)
        .arg(url)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ParlatoError::RemoteFetch(
                    "yt-dlp not found in PATH. Install yt-dlp to transcribe from URLs."
                        .to_string(),
                )
            } else {
                ParlatoError::RemoteFetch(format!("Failed to spawn yt-dlp: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ParlatoError::RemoteFetch(format!(
            "yt-dlp exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    find_downloaded(dest_dir)
}

/// yt-dlp chooses the extension, so locate whatever landed under the stem.
fn find_downloaded(dir: &Path) -> Result<PathBuf> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let stem_matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with(DOWNLOAD_STEM))
            .unwrap_or(false);
        if path.is_file() && stem_matches {
            tracing::debug!("Downloaded container: {}", path.display());
            return Ok(path);
        }
    }

    Err(ParlatoError::RemoteFetch(
        "Downloader reported success but produced no file".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_downloaded() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("source.m4a"), b"x").unwrap();

        let found = find_downloaded(dir.path()).unwrap();
        assert!(found.ends_with("source.m4a"));
    }

    #[test]
    fn test_find_downloaded_ignores_unrelated_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        assert!(find_downloaded(dir.path()).is_err());
    }

    #[test]
    fn test_find_downloaded_empty_dir() {
        let dir = tempdir().unwrap();
        let err = find_downloaded(dir.path()).unwrap_err();
        assert!(matches!(err, ParlatoError::RemoteFetch(_)));
    }
}
