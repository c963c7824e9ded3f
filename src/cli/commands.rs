use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parlato")]
#[command(author, version, about = "Transcribe audio and video with a local Whisper model")]
#[command(
    long_about = "Extract the audio track from a media file or video URL, split it into fixed-length windows, and transcribe each window with a local Whisper model"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe a media file or a video URL
    Transcribe {
        /// Local audio or video file
        file: Option<PathBuf>,

        /// Remote video URL to download and transcribe
        #[arg(short, long)]
        url: Option<String>,

        /// Whisper model: tiny, base, small, medium, large
        #[arg(short, long)]
        model: Option<String>,

        /// Prefix each segment with its HH:MM:SS offset
        #[arg(short, long)]
        timestamps: bool,

        /// Segment window length in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// Output file path (defaults to transcript.txt in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Whisper model management
    Models {
        #[command(subcommand)]
        action: ModelCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// List available Whisper models
    List,
    /// Download a Whisper model
    Download {
        /// Model name: tiny, base, small, medium, large
        model: String,
    },
    /// Delete a downloaded model
    Delete { model: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print config file path
    Path,
    /// Initialize default configuration
    Init,
}
