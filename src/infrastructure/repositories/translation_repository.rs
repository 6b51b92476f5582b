use crate::domain::conversion::LanguageCode;
use async_trait::async_trait;

/// Remote text translation capability.
///
/// The source language is detected by the provider. Implementations hold no per-request state
/// and are shared across concurrent requests.
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// Translate `text` into `target` with a single remote round trip
    ///
    /// # Errors
    /// Returns the provider's message for unsupported languages, network failures or
    /// malformed responses
    async fn translate(&self, text: &str, target: &LanguageCode) -> Result<String, String>;

    fn provider_name(&self) -> &'static str;
}
