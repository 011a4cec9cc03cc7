//! pdf-audio - Convert PDF documents to MP3 audio using cloud text-to-speech

mod audio;
mod config;
mod document;
mod pipeline;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::{Pipeline, RunConfig, StatusEvent};
use speech_client::verify::check_input;
use speech_client::{Credentials, SpeechProvider, get_provider, verify_credentials};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pdf-audio")]
#[command(about = "Convert PDF documents to MP3 audio using cloud text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF file
    pdf_file: Option<PathBuf>,

    /// Folder for the MP3 (default: configured output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Voice name, e.g. en-US-AndrewNeural
    #[arg(long)]
    voice: Option<String>,

    /// Maximum characters per synthesis request
    #[arg(long)]
    chunk_size: Option<NonZeroUsize>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify and store speech service credentials
    Login {
        /// Subscription key
        #[arg(long)]
        key: String,
        /// Service region, e.g. westeurope
        #[arg(long)]
        region: String,
    },
    /// Remove stored credentials
    Logout,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice {
        /// Voice name
        voice: String,
    },
    /// Set maximum characters per synthesis request
    SetChunkSize {
        /// Value (at least 1)
        value: NonZeroUsize,
    },
    /// Set default output folder
    SetOutputDir {
        /// Existing directory
        path: PathBuf,
    },
    /// Set service output format
    SetFormat {
        /// Format identifier, e.g. audio-16khz-32kbitrate-mono-mp3
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Some(Commands::Login { key, region }) => return handle_login(key, region).await,
        Some(Commands::Logout) => return handle_logout(),
        Some(Commands::Config { action }) => return handle_config_command(action),
        None => {}
    }

    let pdf_path = args
        .pdf_file
        .clone()
        .ok_or_else(|| anyhow::anyhow!("PDF file path is required. Run 'pdf-audio --help' for usage."))?;

    if !pdf_path.exists() {
        anyhow::bail!("PDF file not found: {}", pdf_path.display());
    }

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(voice) = &args.voice {
        config.voice = voice.clone();
    }
    if let Some(size) = args.chunk_size {
        config.chunk_size = size.get();
    }

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No output folder selected.\n\n\
                 Pass --output-dir <DIR> or set a default:\n\
                 \x20 pdf-audio config set-output-dir <DIR>"
            )
        })?;

    let credentials = Credentials::resolve()
        .context("Not logged in. Run 'pdf-audio login --key <KEY> --region <REGION>'")?;

    log::debug!("PDF: {}", pdf_path.display());
    log::debug!("Output folder: {}", output_dir.display());
    log::debug!("Region: {}", credentials.service_region);
    log::debug!("Voice: {}", config.voice);
    log::debug!("Chunk size: {}", config.chunk_size);

    let provider: Arc<dyn SpeechProvider> =
        Arc::from(get_provider(&credentials, config.synthesis_settings())?);
    let run_config = RunConfig {
        chunk_size: config.chunk_size()?,
        scratch_dir: audio::scratch_dir()?,
    };

    let (sink, mut events) = pipeline::status::channel();
    let mut pipeline = Pipeline::new(run_config, provider, Arc::new(sink));
    pipeline.select_output_dir(&output_dir);

    eprintln!("Extracting text: {}", pdf_path.display());
    let task = tokio::spawn(async move {
        if let Err(e) = pipeline.select_document(&pdf_path).await {
            return Err(e);
        }
        let result = pipeline.convert().await;
        log::debug!("Pipeline {}", pipeline.state());
        result
    });

    let mut progress = Progress::default();
    while let Some(event) = events.recv().await {
        progress.render(&event)?;
    }

    let report = task.await.context("Conversion task panicked")??;

    let size_mb = report.bytes as f64 / (1024.0 * 1024.0);
    eprintln!(
        "Output: {} ({:.1} MB appended)",
        report.destination.display(),
        size_mb
    );

    Ok(())
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Renders status events on stderr.
#[derive(Default)]
struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    fn render(&mut self, event: &StatusEvent) -> Result<()> {
        log::debug!("{:?}", event);

        match event {
            StatusEvent::Extracted { .. } => eprintln!("{}", event.message()),
            StatusEvent::Chunked { chunks } => {
                eprintln!("{}", event.message());
                let pb = ProgressBar::new(*chunks as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                        .progress_chars("#>-"),
                );
                self.bar = Some(pb);
            }
            StatusEvent::ChunkStarted { .. } => {
                if let Some(pb) = &self.bar {
                    pb.set_message(event.message());
                }
            }
            StatusEvent::ChunkSaved { .. } => {
                if let Some(pb) = &self.bar {
                    pb.inc(1);
                    pb.set_message(event.message());
                }
            }
            StatusEvent::Succeeded { .. } => match self.bar.take() {
                Some(pb) => pb.finish_with_message(event.message()),
                None => eprintln!("{}", event.message()),
            },
            // The error itself is reported when main returns
            StatusEvent::Failed { .. } => {
                if let Some(pb) = self.bar.take() {
                    pb.abandon();
                }
            }
        }
        Ok(())
    }
}

async fn handle_login(key: &str, region: &str) -> Result<()> {
    let credentials = Credentials::new(key, region);
    check_input(&credentials)?;

    let config = AppConfig::load().context("Failed to load configuration")?;
    let provider = get_provider(&credentials, config.synthesis_settings())?;

    eprintln!("Verifying credentials ({})...", credentials.service_region);
    verify_credentials(&credentials, provider.as_ref()).await?;

    credentials.save().context("Failed to save credentials")?;
    println!(
        "Login successful. Credentials saved to {}",
        Credentials::store_path()?.display()
    );
    Ok(())
}

fn handle_logout() -> Result<()> {
    Credentials::clear().context("Failed to remove credentials")?;
    println!("Logged out.");
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            println!("Configuration file: {:?}", AppConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("output_format = \"{}\"", config.output_format);
            println!("chunk_size = {}", config.chunk_size);
            if let Some(dir) = &config.output_dir {
                println!("output_dir = \"{}\"", dir.display());
            } else {
                println!("output_dir = (none)");
            }

            let credentials = Credentials::load()?;
            if credentials.is_complete() {
                println!("logged in: yes (region {})", credentials.service_region);
            } else {
                println!("logged in: no");
            }
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = AppConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {}", config.voice);
        }
        ConfigAction::SetChunkSize { value } => {
            let mut config = AppConfig::load()?;
            config.chunk_size = value.get();
            config.save()?;
            println!("Chunk size set to: {}", config.chunk_size);
        }
        ConfigAction::SetOutputDir { path } => {
            if !path.is_dir() {
                anyhow::bail!("Not a directory: {}", path.display());
            }
            let mut config = AppConfig::load()?;
            config.output_dir = Some(path.clone());
            config.save()?;
            println!("Default output folder set to: {}", path.display());
        }
        ConfigAction::SetFormat { format } => {
            let mut config = AppConfig::load()?;
            config.output_format = format.clone();
            config.save()?;
            println!("Output format set to: {}", config.output_format);
        }
    }
    Ok(())
}
