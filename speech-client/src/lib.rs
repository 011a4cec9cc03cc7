//! Shared speech synthesis client for the pdf-audio workspace
//!
//! Provides a unified interface over cloud text-to-speech services:
//! - Azure Speech (REST, SSML input, MP3 output)
//! - A scripted mock for tests
//!
//! Credentials are kept in a small TOML store and verified with a one-word
//! test synthesis before they are saved.

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod verify;

pub use config::{Credentials, SynthesisSettings};
pub use error::{Result, SpeechError};
pub use provider::{SpeechProvider, SynthesisResult};
pub use providers::{AzureSpeechProvider, MockSpeechProvider, get_provider};
pub use verify::{AuthError, verify_credentials};
