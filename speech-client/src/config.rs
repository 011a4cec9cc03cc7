use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SpeechError};

/// Environment variable consulted when no key is stored
pub const KEY_ENV_VAR: &str = "AZURE_SPEECH_KEY";

/// Environment variable consulted when no region is stored
pub const REGION_ENV_VAR: &str = "AZURE_SPEECH_REGION";

/// Default neural voice
pub const DEFAULT_VOICE: &str = "en-US-AndrewNeural";

/// 16 kHz mono MP3 at 32 kbit/s
pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-16khz-32kbitrate-mono-mp3";

/// Subscription credentials for the speech service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub speech_key: String,

    #[serde(default)]
    pub service_region: String,
}

impl Credentials {
    pub fn new(speech_key: impl Into<String>, service_region: impl Into<String>) -> Self {
        Self {
            speech_key: speech_key.into().trim().to_string(),
            service_region: service_region.into().trim().to_string(),
        }
    }

    /// Both fields are filled in
    pub fn is_complete(&self) -> bool {
        !self.speech_key.is_empty() && !self.service_region.is_empty()
    }

    /// Get the credential store path: ~/.config/cli-programs/speech.toml
    pub fn store_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| SpeechError::Config("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/cli-programs/speech.toml"))
    }

    /// Load stored credentials, returning empty ones if nothing is stored
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::store_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let credentials: Credentials = toml::from_str(&content)?;
        Ok(credentials)
    }

    /// Save credentials to the default store
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::store_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Remove stored credentials (logout)
    pub fn clear() -> Result<()> {
        Self::clear_at(&Self::store_path()?)
    }

    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Resolve credentials from the store, falling back to environment variables
    pub fn resolve() -> Result<Self> {
        let stored = Self::load()?;
        if stored.is_complete() {
            return Ok(stored);
        }

        Self::from_env()
    }

    fn from_env() -> Result<Self> {
        let key = std::env::var(KEY_ENV_VAR).unwrap_or_default();
        let region = std::env::var(REGION_ENV_VAR).unwrap_or_default();
        let credentials = Self::new(key, region);

        if credentials.is_complete() {
            Ok(credentials)
        } else {
            Err(SpeechError::MissingCredentials {
                key_var: KEY_ENV_VAR,
                region_var: REGION_ENV_VAR,
            })
        }
    }
}

/// Voice and output format used for every synthesis call of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSettings {
    pub voice: String,
    pub output_format: String,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}
