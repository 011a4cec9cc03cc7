//! Speech provider implementations

mod azure;
pub mod mock;

pub use azure::{AzureSpeechProvider, build_ssml, endpoint_for_region};
pub use mock::{MockOutcome, MockSpeechProvider};

use crate::config::{Credentials, SynthesisSettings};
use crate::error::Result;
use crate::provider::SpeechProvider;

/// Create the speech provider for a set of credentials
pub fn get_provider(
    credentials: &Credentials,
    settings: SynthesisSettings,
) -> Result<Box<dyn SpeechProvider>> {
    Ok(Box::new(AzureSpeechProvider::new(credentials, settings)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_provider() {
        let credentials = Credentials::new("key", "eastus");
        let provider = get_provider(&credentials, SynthesisSettings::default()).unwrap();
        assert_eq!(provider.name(), "Azure Speech");
    }

    #[test]
    fn test_get_provider_missing_credentials() {
        let credentials = Credentials::new("key", "");
        assert!(get_provider(&credentials, SynthesisSettings::default()).is_err());
    }
}
