pub mod audio;
pub mod dto;
pub mod error;
pub mod language;
pub mod mode;
pub mod service;

pub use audio::{ScratchSpace, TransientAudioResource};
pub use dto::{
    ConversionInput, ConversionOutput, ConversionRequest, SynthesizedSpeech,
    TextConversionResponse,
};
pub use error::{ConversionError, ConversionResult};
pub use language::LanguageCode;
pub use mode::{ConversionMode, InputKind};
pub use service::{ConversionService, ConversionServiceApi};
