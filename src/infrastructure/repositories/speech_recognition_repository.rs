use crate::domain::conversion::LanguageCode;
use async_trait::async_trait;

/// Why a recognition attempt produced no text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    /// The provider processed the audio but found no usable speech
    #[error("Could not understand the audio: {0}")]
    Unintelligible(String),
    /// The provider could not be reached or failed internally
    #[error("Speech recognition service unavailable: {0}")]
    Unavailable(String),
}

/// Remote speech-to-text capability
#[async_trait]
pub trait SpeechRecognitionRepository: Send + Sync {
    /// Transcribe in-memory audio, using `language` as a hint
    ///
    /// `file_name` carries the container format (by extension) to providers that sniff it.
    async fn recognize(
        &self,
        file_name: &str,
        audio: Vec<u8>,
        language: &LanguageCode,
    ) -> Result<String, RecognitionError>;

    fn provider_name(&self) -> &'static str;
}
