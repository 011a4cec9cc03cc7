//! Credential verification by test synthesis
//!
//! A key/region pair is accepted only after the service synthesizes a single
//! word with it. Cancellation details are mapped to a login error the user
//! can act on.

use tempfile::TempPath;
use thiserror::Error;

use crate::config::Credentials;
use crate::error::SpeechError;
use crate::provider::{SpeechProvider, SynthesisResult};

/// Text sent when verifying credentials
pub const VERIFY_TEXT: &str = "Test";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter both API Key and Region")]
    MissingInput,

    #[error("Invalid API Key")]
    InvalidKey,

    #[error("Invalid Region")]
    InvalidRegion,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Login failed. Please try again.")]
    LoginFailed,

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

/// Reject empty fields before any network call
pub fn check_input(credentials: &Credentials) -> Result<(), AuthError> {
    if credentials.is_complete() {
        Ok(())
    } else {
        Err(AuthError::MissingInput)
    }
}

/// Map a cancellation detail to a login error
pub fn classify_cancellation(detail: &str) -> AuthError {
    if detail.contains("401") || detail.contains("Unauthorized") {
        AuthError::InvalidKey
    } else if detail.contains("region") {
        AuthError::InvalidRegion
    } else {
        AuthError::InvalidCredentials(detail.to_string())
    }
}

/// Verify credentials with a one-word synthesis through `provider`
pub async fn verify_credentials(
    credentials: &Credentials,
    provider: &dyn SpeechProvider,
) -> Result<(), AuthError> {
    check_input(credentials)?;

    let audio_file = login_audio_file().map_err(SpeechError::from)?;
    let result = provider.synthesize(VERIFY_TEXT, &audio_file).await;
    if let Err(e) = audio_file.close() {
        log::warn!("Failed to remove login test audio: {}", e);
    }

    match result? {
        SynthesisResult::Completed { .. } => Ok(()),
        SynthesisResult::Canceled { detail } => {
            log::debug!("Credential check canceled: {}", detail);
            Err(classify_cancellation(&detail))
        }
        SynthesisResult::Unexpected { reason } => {
            log::debug!("Credential check returned: {}", reason);
            Err(AuthError::LoginFailed)
        }
    }
}

/// Fresh, exclusively created file for the test synthesis
fn login_audio_file() -> std::io::Result<TempPath> {
    Ok(tempfile::Builder::new()
        .prefix("pdf-audio-login-")
        .suffix(".mp3")
        .tempfile()?
        .into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockOutcome, MockSpeechProvider};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Records the output path and whether it was a fresh empty file
    #[derive(Default)]
    struct PathRecorder {
        seen: Mutex<Option<(PathBuf, bool)>>,
    }

    #[async_trait]
    impl SpeechProvider for PathRecorder {
        async fn synthesize(
            &self,
            _text: &str,
            output_path: &Path,
        ) -> crate::error::Result<SynthesisResult> {
            let fresh = std::fs::symlink_metadata(output_path)
                .map(|m| m.is_file() && m.len() == 0)
                .unwrap_or(false);
            *self.seen.lock().unwrap() = Some((output_path.to_path_buf(), fresh));
            tokio::fs::write(output_path, b"AUDIO").await?;
            Ok(SynthesisResult::Completed { bytes_written: 5 })
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[test]
    fn test_classify_cancellation() {
        assert!(matches!(
            classify_cancellation("HTTP 401 Unauthorized"),
            AuthError::InvalidKey
        ));
        assert!(matches!(
            classify_cancellation("Unauthorized: key revoked"),
            AuthError::InvalidKey
        ));
        assert!(matches!(
            classify_cancellation("Connection to region 'nowhere' failed: dns error"),
            AuthError::InvalidRegion
        ));
        match classify_cancellation("HTTP 429 Too Many Requests") {
            AuthError::InvalidCredentials(detail) => assert_eq!(detail, "HTTP 429 Too Many Requests"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_input_skips_network() {
        let provider = MockSpeechProvider::always_succeeds(b"x");
        let result = verify_credentials(&Credentials::new("", "eastus"), &provider).await;
        assert!(matches!(result, Err(AuthError::MissingInput)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_verify_success() {
        let provider = MockSpeechProvider::always_succeeds(b"x");
        verify_credentials(&Credentials::new("key", "eastus"), &provider)
            .await
            .unwrap();
        assert_eq!(provider.requests(), vec![VERIFY_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_verify_invalid_key() {
        let provider = MockSpeechProvider::always_cancels("HTTP 401 Unauthorized");
        let result = verify_credentials(&Credentials::new("bad", "eastus"), &provider).await;
        assert_eq!(result.unwrap_err().to_string(), "Invalid API Key");
    }

    #[tokio::test]
    async fn test_verify_unexpected() {
        let provider =
            MockSpeechProvider::scripted(vec![MockOutcome::Unexpected("odd".to_string())]);
        let result = verify_credentials(&Credentials::new("key", "eastus"), &provider).await;
        assert!(matches!(result, Err(AuthError::LoginFailed)));
    }

    #[tokio::test]
    async fn test_verify_client_error() {
        let provider = MockSpeechProvider::scripted(vec![MockOutcome::Error("tls".to_string())]);
        let result = verify_credentials(&Credentials::new("key", "eastus"), &provider).await;
        assert!(matches!(result, Err(AuthError::Speech(_))));
    }

    #[tokio::test]
    async fn test_login_audio_goes_to_fresh_file_that_is_removed() {
        let provider = PathRecorder::default();
        verify_credentials(&Credentials::new("key", "eastus"), &provider)
            .await
            .unwrap();

        let (path, fresh) = provider.seen.lock().unwrap().clone().unwrap();
        assert!(fresh);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("pdf-audio-login-"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_login_files_are_distinct() {
        let first = PathRecorder::default();
        let second = PathRecorder::default();
        let credentials = Credentials::new("key", "eastus");
        verify_credentials(&credentials, &first).await.unwrap();
        verify_credentials(&credentials, &second).await.unwrap();

        let a = first.seen.lock().unwrap().clone().unwrap().0;
        let b = second.seen.lock().unwrap().clone().unwrap().0;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_login_failure_after_one_call() {
        let provider = MockSpeechProvider::always_cancels("HTTP 401 Unauthorized");
        let result = verify_credentials(&Credentials::new("bad", "eastus"), &provider).await;
        assert!(result.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
