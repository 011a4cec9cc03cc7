use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Outcome of a single synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisResult {
    /// Audio was written to the requested output path
    Completed { bytes_written: u64 },
    /// The service refused or aborted the request
    Canceled { detail: String },
    /// Anything else the service reported
    Unexpected { reason: String },
}

impl SynthesisResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Trait for speech synthesis providers
///
/// One call synthesizes one piece of text and writes the complete audio
/// payload to `output_path`, replacing whatever was there. Implementations
/// must not retry: every call may be billed by the service.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize `text` into the file at `output_path`
    async fn synthesize(&self, text: &str, output_path: &Path) -> Result<SynthesisResult>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;
}
