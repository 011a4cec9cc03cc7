//! pdf-audio configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use speech_client::SynthesisSettings;
use speech_client::config::{DEFAULT_OUTPUT_FORMAT, DEFAULT_VOICE};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::text::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Neural voice name, e.g. en-US-AndrewNeural
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Service output format identifier
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Maximum characters per synthesis request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Folder the MP3 is written to when --output-dir is not given
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            output_format: default_output_format(),
            chunk_size: default_chunk_size(),
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path: ~/.config/cli-programs/pdf-audio.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("pdf-audio.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn synthesis_settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            voice: self.voice.clone(),
            output_format: self.output_format.clone(),
        }
    }

    /// Chunk size as a non-zero bound; 0 is rejected
    pub fn chunk_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.chunk_size)
            .ok_or_else(|| anyhow::anyhow!("chunk_size must be greater than zero"))
    }
}
