use crate::audio::convert::i16_to_f32;
use crate::audio::{AudioStream, WHISPER_SAMPLE_RATE};
use crate::error::{ParlatoError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

/// Produce a linear PCM stream from an arbitrary media container.
///
/// WAV sources are read directly with no external re-encode. Everything else
/// goes through ffmpeg into a scratch directory that is removed on every exit
/// path, error or not.
pub fn extract_audio(source: &Path) -> Result<AudioStream> {
    if is_wav(source)? {
        match read_wav(source) {
            Ok(stream) => {
                tracing::debug!("WAV source, passing through without re-encoding");
                return Ok(stream);
            }
            Err(e) => {
                tracing::warn!("WAV passthrough failed ({}), falling back to ffmpeg", e);
            }
        }
    }

    let scratch = tempfile::tempdir()?;
    let wav_path = scratch.path().join("audio.wav");

    decode_with_ffmpeg(source, &wav_path)?;
    read_wav(&wav_path)
}

/// Sniff the RIFF/WAVE magic without trusting the file extension.
fn is_wav(path: &Path) -> Result<bool> {
    let mut header = [0u8; 12];
    let mut file = File::open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) => Ok(&header[0..4] == b"RIFF" && &header[8..12] == b"WAVE"),
        // Too short to be any media file; let ffmpeg produce the real error
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn read_wav(path: &Path) -> Result<AudioStream> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| ParlatoError::Extraction(format!("Failed to open WAV: {}", e)))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            let ints: Vec<i16> = reader
                .into_samples::<i16>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| ParlatoError::Extraction(format!("Failed to read WAV: {}", e)))?;
            i16_to_f32(&ints)
        }
        (hound::SampleFormat::Int, bits) => {
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| ParlatoError::Extraction(format!("Failed to read WAV: {}", e)))?
                .into_iter()
                .map(|s| s as f32 / max_val)
                .collect()
        }
        (hound::SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| ParlatoError::Extraction(format!("Failed to read WAV: {}", e)))?,
    };

    Ok(AudioStream::new(samples, spec.sample_rate, spec.channels))
}

fn decode_with_ffmpeg(source: &Path, dest: &Path) -> Result<()> {
    tracing::info!("Extracting audio track: {}", source.display());

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(source)
        .args(["-vn", "-acodec", "pcm_s16le"])
        .args(["-ar", &WHISPER_SAMPLE_RATE.to_string()])
        .args(["-ac", "1", "-y"])
        .arg(dest)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ParlatoError::Extraction(
                    "ffmpeg not found in PATH. Install ffmpeg to decode non-WAV media."
                        .to_string(),
                )
            } else {
                ParlatoError::Extraction(format!("Failed to spawn ffmpeg: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ParlatoError::Extraction(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            tail_lines(&stderr, 4)
        )));
    }

    Ok(())
}

/// Last few stderr lines; ffmpeg buries the actual failure at the bottom.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_wav_i16(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_is_wav_detects_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sound.wav");
        write_wav_i16(&path, &[0i16; 100], 16000, 1);
        assert!(is_wav(&path).unwrap());
    }

    #[test]
    fn test_is_wav_rejects_other_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("video.mp4");
        std::fs::write(&path, b"\x00\x00\x00\x20ftypisom_not_a_wav_header").unwrap();
        assert!(!is_wav(&path).unwrap());
    }

    #[test]
    fn test_is_wav_short_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny");
        std::fs::write(&path, b"RI").unwrap();
        assert!(!is_wav(&path).unwrap());
    }

    #[test]
    fn test_read_wav_i16_mono() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        write_wav_i16(&path, &[i16::MAX, 0, i16::MIN], 16000, 1);

        let stream = read_wav(&path).unwrap();
        assert_eq!(stream.sample_rate, 16000);
        assert_eq!(stream.channels, 1);
        assert_eq!(stream.samples.len(), 3);
        assert!((stream.samples[0] - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_read_wav_f32() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0.5f32, -0.5, 0.25, -0.25] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let stream = read_wav(&path).unwrap();
        assert_eq!(stream.sample_rate, 44100);
        assert_eq!(stream.channels, 2);
        assert_eq!(stream.samples, vec![0.5, -0.5, 0.25, -0.25]);
    }

    #[test]
    fn test_wav_passthrough_keeps_rate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("44k.wav");
        write_wav_i16(&path, &[0i16; 44100], 44100, 1);

        let stream = extract_audio(&path).unwrap();
        assert_eq!(stream.sample_rate, 44100);
    }

    #[test]
    fn test_tail_lines() {
        let text = "one\ntwo\nthree\nfour\nfive";
        assert_eq!(tail_lines(text, 2), "four\nfive");
        assert_eq!(tail_lines("single", 4), "single");
    }
}
