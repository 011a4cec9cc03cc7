//! Azure Speech text-to-speech provider
//!
//! Talks to the regional REST endpoint directly:
//! `POST https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`
//! with an SSML body. The response body is the encoded audio.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;

use crate::config::{Credentials, SynthesisSettings};
use crate::error::{Result, SpeechError};
use crate::provider::{SpeechProvider, SynthesisResult};

const USER_AGENT: &str = concat!("pdf-audio/", env!("CARGO_PKG_VERSION"));

/// Provider for the Azure Speech REST API
pub struct AzureSpeechProvider {
    api_key: String,
    region: String,
    endpoint: String,
    settings: SynthesisSettings,
    client: Client,
}

impl AzureSpeechProvider {
    /// Create a new Azure provider for the given subscription
    pub fn new(credentials: &Credentials, settings: SynthesisSettings) -> Result<Self> {
        if !credentials.is_complete() {
            return Err(SpeechError::Config(
                "speech key and service region are both required".into(),
            ));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| SpeechError::Http(e.to_string()))?;

        Ok(Self {
            api_key: credentials.speech_key.clone(),
            region: credentials.service_region.clone(),
            endpoint: endpoint_for_region(&credentials.service_region),
            settings,
            client,
        })
    }

    /// Point the provider at a different endpoint (private links, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Regional synthesis endpoint
pub fn endpoint_for_region(region: &str) -> String {
    format!(
        "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
        region.trim().to_lowercase()
    )
}

/// Wrap text in a single-voice SSML document
pub fn build_ssml(text: &str, voice: &str) -> String {
    let lang = voice_language(voice);
    format!(
        "<speak version='1.0' xml:lang='{lang}'><voice xml:lang='{lang}' name='{}'>{}</voice></speak>",
        escape_xml(voice),
        escape_xml(text)
    )
}

/// Language tag from a voice name: "en-US-AndrewNeural" -> "en-US"
fn voice_language(voice: &str) -> String {
    let parts: Vec<&str> = voice.splitn(3, '-').collect();
    if parts.len() == 3 {
        format!("{}-{}", parts[0], parts[1])
    } else {
        "en-US".to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Control characters other than whitespace are not allowed in XML 1.0
            c if c.is_control() && !matches!(c, '\n' | '\r' | '\t') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Map a non-audio HTTP response to a cancellation detail
fn describe_failure(status: StatusCode, body: &[u8]) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = String::from_utf8_lossy(body);
    let body = body.trim();

    if body.is_empty() {
        format!("HTTP {} {}", status.as_u16(), reason)
    } else {
        format!("HTTP {} {}: {}", status.as_u16(), reason, body)
    }
}

#[async_trait]
impl SpeechProvider for AzureSpeechProvider {
    async fn synthesize(&self, text: &str, output_path: &Path) -> Result<SynthesisResult> {
        let ssml = build_ssml(text, &self.settings.voice);

        log::debug!(
            "Azure synthesis: region={} voice={} chars={}",
            self.region,
            self.settings.voice,
            text.chars().count()
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.settings.output_format)
            .header("User-Agent", USER_AGENT)
            .body(ssml)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Azure request failed: {}", e);
                return Ok(SynthesisResult::Canceled {
                    detail: format!("Connection to region '{}' failed: {}", self.region, e),
                });
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(SynthesisResult::Canceled {
                    detail: format!("Failed to read response: {}", e),
                });
            }
        };

        if !status.is_success() {
            let detail = describe_failure(status, &body);
            log::warn!("Azure synthesis canceled: {}", detail);
            return Ok(SynthesisResult::Canceled { detail });
        }

        if body.is_empty() {
            return Ok(SynthesisResult::Unexpected {
                reason: format!("HTTP {} with no audio", status.as_u16()),
            });
        }

        tokio::fs::write(output_path, &body).await?;

        Ok(SynthesisResult::Completed {
            bytes_written: body.len() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "Azure Speech"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("key", "WestEurope")
    }

    #[test]
    fn test_endpoint_for_region() {
        assert_eq!(
            endpoint_for_region("WestEurope"),
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = AzureSpeechProvider::new(&Credentials::default(), SynthesisSettings::default());
        assert!(matches!(result, Err(SpeechError::Config(_))));
    }

    #[test]
    fn test_with_endpoint() {
        let provider = AzureSpeechProvider::new(&credentials(), SynthesisSettings::default())
            .unwrap()
            .with_endpoint("http://localhost:8080/tts/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/tts");
        assert_eq!(provider.name(), "Azure Speech");
    }

    #[test]
    fn test_build_ssml() {
        let ssml = build_ssml("Hello world", "en-US-AndrewNeural");
        assert_eq!(
            ssml,
            "<speak version='1.0' xml:lang='en-US'><voice xml:lang='en-US' name='en-US-AndrewNeural'>Hello world</voice></speak>"
        );
    }

    #[test]
    fn test_build_ssml_escapes_text() {
        let ssml = build_ssml("Tom & Jerry <3 'quotes' \"double\"", "de-DE-KatjaNeural");
        assert!(ssml.contains("xml:lang='de-DE'"));
        assert!(ssml.contains("Tom &amp; Jerry &lt;3 &apos;quotes&apos; &quot;double&quot;"));
        assert!(!ssml.contains("<3"));
    }

    #[test]
    fn test_escape_drops_control_chars() {
        assert_eq!(escape_xml("a\u{0}b\u{c}c\nd"), "abc\nd");
    }

    #[test]
    fn test_voice_language_fallback() {
        assert_eq!(voice_language("custom"), "en-US");
        assert_eq!(voice_language("fr-FR-DeniseNeural"), "fr-FR");
    }

    #[test]
    fn test_describe_failure() {
        assert_eq!(
            describe_failure(StatusCode::UNAUTHORIZED, b""),
            "HTTP 401 Unauthorized"
        );
        assert_eq!(
            describe_failure(StatusCode::BAD_REQUEST, b" invalid ssml \n"),
            "HTTP 400 Bad Request: invalid ssml"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_canceled() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");
        // Port 9 (discard) on localhost is closed in test environments
        let provider = AzureSpeechProvider::new(&credentials(), SynthesisSettings::default())
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/cognitiveservices/v1");

        let result = provider.synthesize("Hello", &output).await.unwrap();
        match result {
            SynthesisResult::Canceled { detail } => {
                assert!(detail.contains("region 'WestEurope'"), "detail: {}", detail);
            }
            other => panic!("expected Canceled, got {:?}", other),
        }
        assert!(!output.exists());
    }
}
