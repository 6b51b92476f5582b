use std::str::FromStr;

/// The four conversion pipelines, selected by the `option` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    TextToText,
    TextToSpeech,
    SpeechToText,
    SpeechToSpeech,
}

/// Kind of input a mode consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Audio,
}

impl ConversionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionMode::TextToText => "text-to-text",
            ConversionMode::TextToSpeech => "text-to-speech",
            ConversionMode::SpeechToText => "speech-to-text",
            ConversionMode::SpeechToSpeech => "speech-to-speech",
        }
    }

    pub fn input_kind(&self) -> InputKind {
        match self {
            ConversionMode::TextToText | ConversionMode::TextToSpeech => InputKind::Text,
            ConversionMode::SpeechToText | ConversionMode::SpeechToSpeech => InputKind::Audio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversion mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for ConversionMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-to-text" => Ok(ConversionMode::TextToText),
            "text-to-speech" => Ok(ConversionMode::TextToSpeech),
            "speech-to-text" => Ok(ConversionMode::SpeechToText),
            "speech-to-speech" => Ok(ConversionMode::SpeechToSpeech),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
