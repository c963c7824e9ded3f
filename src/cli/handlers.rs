use crate::cli::commands::*;
use crate::config;
use crate::config::settings::InputPrecedence;
use crate::error::{ParlatoError, Result};
use crate::media;
use crate::pipeline;
use crate::transcription::assembler::output_filename;
use crate::transcription::models::{ModelManager, WhisperModel};
use crate::transcription::whisper::WhisperEngine;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub async fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Transcribe {
            file,
            url,
            model,
            timestamps,
            window_secs,
            output,
        } => handle_transcribe(file, url, model, timestamps, window_secs, output).await,
        Commands::Models { action } => handle_models(action).await,
        Commands::Config { action } => handle_config(action).await,
    }
}

/// The source a transcribe run acts on; exactly one per run.
enum InputSource {
    File(PathBuf),
    Url(String),
}

/// When both a file and a URL are supplied, `input.precedence` decides.
fn resolve_source(
    file: Option<PathBuf>,
    url: Option<String>,
    precedence: InputPrecedence,
) -> Result<InputSource> {
    match (file, url) {
        (None, None) => Err(ParlatoError::InvalidInput(
            "Provide a media file or --url".to_string(),
        )),
        (Some(file), None) => Ok(InputSource::File(file)),
        (None, Some(url)) => Ok(InputSource::Url(url)),
        (Some(file), Some(url)) => Ok(match precedence {
            InputPrecedence::Url => InputSource::Url(url),
            InputPrecedence::File => InputSource::File(file),
        }),
    }
}

async fn handle_transcribe(
    file: Option<PathBuf>,
    url: Option<String>,
    model: Option<String>,
    timestamps: bool,
    window_secs: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::loader::load_config()?;

    // Validate the model selector before touching any audio
    let model_name = model.unwrap_or_else(|| cfg.transcription.model.clone());
    let model: WhisperModel = model_name.parse()?;

    let window_secs = window_secs.unwrap_or(cfg.segmentation.window_secs);
    if window_secs == 0 {
        return Err(ParlatoError::Config(
            "Segment window must be positive".to_string(),
        ));
    }
    let window = Duration::from_secs(window_secs);
    let timestamps = timestamps || cfg.output.timestamps;

    // Scratch dir for downloads; removed when this handler returns
    let scratch = tempfile::tempdir()?;

    let container = match resolve_source(file, url, cfg.input.precedence)? {
        InputSource::File(path) => {
            if !path.exists() {
                return Err(ParlatoError::InvalidInput(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            path
        }
        InputSource::Url(url) => {
            println!("Downloading: {}", url);
            media::fetch_url(&url, scratch.path())?
        }
    };

    println!("Extracting audio: {}", container.display());
    let stream = media::extract_audio(&container)?;

    if stream.is_empty() {
        println!("Stream contains no audio; nothing to transcribe.");
        return Ok(());
    }

    let engine = match &cfg.transcription.model_path {
        Some(path) => WhisperEngine::new(path, cfg.transcription.use_gpu)?,
        None => {
            let manager = ModelManager::new(config::loader::models_dir()?);
            if !manager.model_exists(model) {
                return Err(ParlatoError::ModelUnavailable(format!(
                    "Model '{}' not downloaded. Run: parlato models download {}",
                    model, model
                )));
            }
            WhisperEngine::from_model(&manager, model, cfg.transcription.use_gpu)?
        }
    };

    println!("Transcribing with {} model...\n", model);

    let transcript = pipeline::run(&engine, &stream, window, timestamps, |entry, contribution| {
        if timestamps {
            print!("{}", contribution);
        } else if !entry.is_silence() {
            println!("{}", entry.text);
        }
        std::io::stdout().flush().ok();
    })?;

    let out_path = match output {
        Some(path) => path,
        None => cfg
            .output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(output_filename(timestamps)),
    };

    std::fs::write(&out_path, &transcript.text)?;
    println!(
        "\nTranscript written to {} ({} segments)",
        out_path.display(),
        transcript.segment_count()
    );

    Ok(())
}

async fn handle_models(action: ModelCommands) -> Result<()> {
    let manager = ModelManager::new(config::loader::models_dir()?);

    match action {
        ModelCommands::List => {
            println!("{:<10} {:<12} {:<10}", "Model", "Size (MB)", "Downloaded");
            println!("{}", "-".repeat(35));

            for (model, exists, size) in manager.list_all() {
                let status = if exists { "✓" } else { "-" };
                println!("{:<10} {:<12} {:<10}", model, size, status);
            }
        }
        ModelCommands::Download { model } => {
            let whisper_model: WhisperModel = model.parse()?;

            println!(
                "Downloading {} model (~{} MB)...",
                whisper_model,
                whisper_model.size_mb()
            );

            let path = manager.download_model(whisper_model, |downloaded, total| {
                let percent = (downloaded as f64 / total as f64 * 100.0) as u32;
                print!(
                    "\rProgress: {}% ({}/{} MB)",
                    percent,
                    downloaded / 1024 / 1024,
                    total / 1024 / 1024
                );
                std::io::stdout().flush().ok();
            })?;

            println!("\nDownloaded to: {}", path.display());
        }
        ModelCommands::Delete { model } => {
            let whisper_model: WhisperModel = model.parse()?;

            manager.delete_model(whisper_model)?;
            println!("Deleted {} model", model);
        }
    }
    Ok(())
}

async fn handle_config(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let cfg = config::loader::load_config()?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigCommands::Path => {
            println!("{}", config::loader::config_path()?.display());
        }
        ConfigCommands::Init => {
            config::loader::ensure_directories()?;
            let cfg = config::loader::load_config()?;
            println!(
                "Configuration initialized at: {}",
                config::loader::config_path()?.display()
            );
            println!("\nDefault settings:");
            println!("  Model: {}", cfg.transcription.model);
            println!("  Segment window: {}s", cfg.segmentation.window_secs);
            println!("  Timestamps: {}", cfg.output.timestamps);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_source_requires_input() {
        assert!(resolve_source(None, None, InputPrecedence::Url).is_err());
    }

    #[test]
    fn test_resolve_source_single_input() {
        let source = resolve_source(Some(PathBuf::from("a.mp4")), None, InputPrecedence::Url);
        assert!(matches!(source, Ok(InputSource::File(_))));

        let source = resolve_source(None, Some("https://example.com/v".into()), InputPrecedence::File);
        assert!(matches!(source, Ok(InputSource::Url(_))));
    }

    #[test]
    fn test_resolve_source_precedence() {
        let both = || {
            (
                Some(PathBuf::from("a.mp4")),
                Some("https://example.com/v".to_string()),
            )
        };

        let (file, url) = both();
        let source = resolve_source(file, url, InputPrecedence::Url).unwrap();
        assert!(matches!(source, InputSource::Url(_)));

        let (file, url) = both();
        let source = resolve_source(file, url, InputPrecedence::File).unwrap();
        assert!(matches!(source, InputSource::File(_)));
    }
}
