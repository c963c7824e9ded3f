use clap::Parser;
use tracing_subscriber::EnvFilter;

mod audio;
mod cli;
mod config;
mod error;
mod media;
mod pipeline;
mod transcription;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = cli::handle_command(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
