use serde::Serialize;

use super::audio::TransientAudioResource;
use super::language::LanguageCode;
use super::mode::{ConversionMode, InputKind};

/// Input of a conversion: text for text modes, uploaded audio for speech modes
#[derive(Debug)]
pub enum ConversionInput {
    Text(String),
    Audio(TransientAudioResource),
}

impl ConversionInput {
    pub fn kind(&self) -> InputKind {
        match self {
            ConversionInput::Text(_) => InputKind::Text,
            ConversionInput::Audio(_) => InputKind::Audio,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{mode} expects {expected:?} input but received {actual:?}")]
pub struct InputMismatch {
    pub mode: ConversionMode,
    pub expected: InputKind,
    pub actual: InputKind,
}

/// A validated conversion request. The input always matches the mode.
#[derive(Debug)]
pub struct ConversionRequest {
    mode: ConversionMode,
    input: ConversionInput,
    source_language: LanguageCode,
    target_language: LanguageCode,
}

impl ConversionRequest {
    pub fn new(
        mode: ConversionMode,
        input: ConversionInput,
        source_language: LanguageCode,
        target_language: LanguageCode,
    ) -> Result<Self, InputMismatch> {
        if mode.input_kind() != input.kind() {
            return Err(InputMismatch {
                mode,
                expected: mode.input_kind(),
                actual: input.kind(),
            });
        }

        Ok(Self {
            mode,
            input,
            source_language,
            target_language,
        })
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    pub fn input(&self) -> &ConversionInput {
        &self.input
    }

    pub fn source_language(&self) -> &LanguageCode {
        &self.source_language
    }

    pub fn target_language(&self) -> &LanguageCode {
        &self.target_language
    }
}

/// Audio produced by the synthesis step, together with the text that was spoken
#[derive(Debug)]
pub struct SynthesizedSpeech {
    pub translated_text: String,
    pub audio: TransientAudioResource,
}

/// Successful outcome of a pipeline
#[derive(Debug)]
pub enum ConversionOutput {
    Translated {
        translated_text: String,
    },
    Recognized {
        text: String,
    },
    RecognizedAndTranslated {
        original_text: String,
        translated_text: String,
    },
    Speech(SynthesizedSpeech),
}

/// JSON body of text-producing modes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextConversionResponse {
    RecognizedAndTranslated {
        original_text: String,
        translated_text: String,
    },
    Translated {
        translated_text: String,
    },
    Recognized {
        text: String,
    },
}
