//! Mock speech provider for testing
//!
//! Plays back a script of per-call outcomes so pipelines can be exercised
//! without a network: successes write their payload to the output path just
//! like a real provider would.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SynthesisResult};

/// What the mock does on one call
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Write these bytes and report Completed
    Audio(Vec<u8>),
    /// Report Canceled with this detail
    Canceled(String),
    /// Report Unexpected with this reason
    Unexpected(String),
    /// Fail the call itself
    Error(String),
}

/// A mock provider with scripted outcomes
pub struct MockSpeechProvider {
    /// Outcomes consumed one per call
    script: Mutex<VecDeque<MockOutcome>>,
    /// Used once the script runs out
    fallback: MockOutcome,
    /// Current call count
    call_count: AtomicUsize,
    /// Text of every call, in order
    requests: Mutex<Vec<String>>,
    /// Provider name for display
    name: &'static str,
}

impl MockSpeechProvider {
    /// Create a provider that plays `outcomes` in order, then reports Unexpected
    pub fn scripted(outcomes: Vec<MockOutcome>) -> Self {
        Self::with_fallback(
            outcomes,
            MockOutcome::Unexpected("mock script exhausted".to_string()),
        )
    }

    /// Create a provider that always writes `payload`
    pub fn always_succeeds(payload: &[u8]) -> Self {
        Self::with_fallback(Vec::new(), MockOutcome::Audio(payload.to_vec()))
    }

    /// Create a provider that always cancels with `detail`
    pub fn always_cancels(detail: &str) -> Self {
        Self::with_fallback(Vec::new(), MockOutcome::Canceled(detail.to_string()))
    }

    fn with_fallback(outcomes: Vec<MockOutcome>, fallback: MockOutcome) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            fallback,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts passed to synthesize(), in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Set a custom provider name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    fn next_outcome(&self) -> MockOutcome {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(&self, text: &str, output_path: &Path) -> Result<SynthesisResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(text.to_string());

        match self.next_outcome() {
            MockOutcome::Audio(bytes) => {
                tokio::fs::write(output_path, &bytes).await?;
                Ok(SynthesisResult::Completed {
                    bytes_written: bytes.len() as u64,
                })
            }
            MockOutcome::Canceled(detail) => Ok(SynthesisResult::Canceled { detail }),
            MockOutcome::Unexpected(reason) => Ok(SynthesisResult::Unexpected { reason }),
            MockOutcome::Error(message) => Err(SpeechError::Http(message)),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
