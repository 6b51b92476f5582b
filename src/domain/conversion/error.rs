use super::language::LanguageCode;
use crate::error::AppError;

/// Failure of a single conversion step.
///
/// Every remote capability error is folded into one of these before it leaves the domain, so the
/// controller only ever sees one taxonomy. Messages are never empty.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{0}")]
    Translation(String),
    #[error("{0}")]
    Synthesis(String),
    #[error("{0}")]
    Unintelligible(String),
    #[error("{0}")]
    RecognitionUnavailable(String),
    #[error("{0}")]
    UnsupportedLanguage(String),
    #[error("{0}")]
    Resource(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConversionError {
    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation(non_empty(message, "Translation failed"))
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(non_empty(message, "Speech synthesis failed"))
    }

    pub fn unintelligible(message: impl Into<String>) -> Self {
        Self::Unintelligible(non_empty(message, "Could not understand the audio"))
    }

    pub fn recognition_unavailable(message: impl Into<String>) -> Self {
        Self::RecognitionUnavailable(non_empty(
            message,
            "Speech recognition service unavailable",
        ))
    }

    pub fn unsupported_language(code: &LanguageCode) -> Self {
        Self::UnsupportedLanguage(format!("Unsupported language code: '{}'", code))
    }

    pub fn resource(err: std::io::Error) -> Self {
        Self::Resource(non_empty(
            format!("Transient audio file error: {}", err),
            "Transient audio file error",
        ))
    }

    /// Short label for logs
    pub fn step(&self) -> &'static str {
        match self {
            Self::Translation(_) => "translation",
            Self::Synthesis(_) => "synthesis",
            Self::Unintelligible(_) | Self::RecognitionUnavailable(_) => "recognition",
            Self::UnsupportedLanguage(_) => "language",
            Self::Resource(_) => "resource",
            Self::Other(_) => "other",
        }
    }
}

fn non_empty(message: impl Into<String>, fallback: &str) -> String {
    let message = message.into();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Outcome of any conversion operation
pub type ConversionResult<T> = Result<T, ConversionError>;

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Other(e) => AppError::Internal(e.to_string()),
            other => AppError::RemoteCapability(other.to_string()),
        }
    }
}
