use crate::domain::conversion::LanguageCode;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI, ...)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Merging audio chunks into a single audio stream
/// - Provider-specific voice selection, including rejecting languages they cannot speak
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech for a given language
    ///
    /// Returns merged audio data ready for playback (MP3 format)
    ///
    /// # Errors
    /// Returns a human-readable message if synthesis fails, the language has no voice,
    /// or the provider is unavailable
    async fn synthesize(&self, text: &str, language: &LanguageCode) -> Result<Vec<u8>, String>;

    fn provider_name(&self) -> &'static str;
}
