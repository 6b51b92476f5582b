use super::audio::{ScratchSpace, TransientAudioResource};
use super::dto::{ConversionInput, ConversionOutput, ConversionRequest, SynthesizedSpeech};
use super::error::{ConversionError, ConversionResult};
use super::language::LanguageCode;
use super::mode::ConversionMode;
use crate::infrastructure::repositories::{
    RecognitionError, SpeechRecognitionRepository, TranslationRepository, TtsRepository,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Chains translation, synthesis and recognition according to the requested mode.
///
/// Holds only shared, immutable capability handles; concurrent requests never
/// observe each other's parameters.
pub struct ConversionService {
    translation_repo: Arc<dyn TranslationRepository>,
    tts_repo: Arc<dyn TtsRepository>,
    recognition_repo: Arc<dyn SpeechRecognitionRepository>,
    scratch: ScratchSpace,
}

impl ConversionService {
    pub fn new(
        translation_repo: Arc<dyn TranslationRepository>,
        tts_repo: Arc<dyn TtsRepository>,
        recognition_repo: Arc<dyn SpeechRecognitionRepository>,
        scratch: ScratchSpace,
    ) -> Self {
        Self {
            translation_repo,
            tts_repo,
            recognition_repo,
            scratch,
        }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Provider names for the readiness probe, in translation/synthesis/recognition order
    pub fn providers(&self) -> (&'static str, &'static str, &'static str) {
        (
            self.translation_repo.provider_name(),
            self.tts_repo.provider_name(),
            self.recognition_repo.provider_name(),
        )
    }
}

#[async_trait]
pub trait ConversionServiceApi: Send + Sync {
    /// Translate text with one remote round trip
    async fn translate_text(&self, text: &str, target: &LanguageCode) -> ConversionResult<String>;

    /// Translate, then speak the translation into a new transient MP3 file
    async fn synthesize_speech(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> ConversionResult<SynthesizedSpeech>;

    /// Transcribe an audio resource, distinguishing unintelligible audio from an
    /// unavailable provider
    async fn recognize_speech(
        &self,
        audio: &TransientAudioResource,
        source: &LanguageCode,
    ) -> ConversionResult<String>;

    /// Run the pipeline for `request.mode()`.
    ///
    /// The first failing step ends the pipeline; its error is the result and no later step runs.
    async fn convert(&self, request: &ConversionRequest) -> ConversionResult<ConversionOutput>;
}

#[async_trait]
impl ConversionServiceApi for ConversionService {
    async fn translate_text(&self, text: &str, target: &LanguageCode) -> ConversionResult<String> {
        if text.trim().is_empty() {
            return Err(ConversionError::translation(
                "Text to translate must not be empty",
            ));
        }
        if !target.is_well_formed() {
            return Err(ConversionError::unsupported_language(target));
        }

        let start_time = std::time::Instant::now();
        let translated = self
            .translation_repo
            .translate(text, target)
            .await
            .map_err(ConversionError::translation)?;

        if translated.trim().is_empty() {
            return Err(ConversionError::translation(
                "Translation service returned no text",
            ));
        }

        tracing::info!(
            provider = self.translation_repo.provider_name(),
            target_language = %target,
            input_length = text.len(),
            output_length = translated.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Text translated"
        );

        Ok(translated)
    }

    async fn synthesize_speech(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> ConversionResult<SynthesizedSpeech> {
        // Never speak the untranslated source text
        let translated_text = self.translate_text(text, target).await?;

        let start_time = std::time::Instant::now();
        let audio_data = self
            .tts_repo
            .synthesize(&translated_text, target)
            .await
            .map_err(ConversionError::synthesis)?;

        if audio_data.is_empty() {
            return Err(ConversionError::synthesis(
                "Speech synthesis returned no audio",
            ));
        }

        let audio = self
            .scratch
            .materialize_mp3(&audio_data)
            .await
            .map_err(ConversionError::resource)?;

        tracing::info!(
            provider = self.tts_repo.provider_name(),
            language = %target,
            characters_count = translated_text.len(),
            audio_size_bytes = audio_data.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Speech synthesized"
        );

        Ok(SynthesizedSpeech {
            translated_text,
            audio,
        })
    }

    async fn recognize_speech(
        &self,
        audio: &TransientAudioResource,
        source: &LanguageCode,
    ) -> ConversionResult<String> {
        if !source.is_well_formed() {
            return Err(ConversionError::unsupported_language(source));
        }

        let audio_data = audio.read().await.map_err(ConversionError::resource)?;
        if audio_data.is_empty() {
            return Err(ConversionError::unintelligible(
                "Could not understand the audio: the uploaded file is empty",
            ));
        }

        let start_time = std::time::Instant::now();
        let audio_size = audio_data.len();
        let text = self
            .recognition_repo
            .recognize(audio.file_name(), audio_data, source)
            .await
            .map_err(|e| match e {
                RecognitionError::Unintelligible(_) => ConversionError::unintelligible(e.to_string()),
                RecognitionError::Unavailable(_) => {
                    ConversionError::recognition_unavailable(e.to_string())
                }
            })?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ConversionError::unintelligible(
                "Could not understand the audio: no speech was recognized",
            ));
        }

        tracing::info!(
            provider = self.recognition_repo.provider_name(),
            language = %source,
            audio_size_bytes = audio_size,
            text_length = text.len(),
            latency_ms = start_time.elapsed().as_millis(),
            "Speech recognized"
        );

        Ok(text)
    }

    async fn convert(&self, request: &ConversionRequest) -> ConversionResult<ConversionOutput> {
        let source = request.source_language();
        let target = request.target_language();

        tracing::info!(
            mode = %request.mode(),
            source_language = %source,
            target_language = %target,
            "Conversion started"
        );

        let output = match (request.mode(), request.input()) {
            (ConversionMode::TextToText, ConversionInput::Text(text)) => {
                let translated_text = self.translate_text(text, target).await?;
                ConversionOutput::Translated { translated_text }
            }
            (ConversionMode::TextToSpeech, ConversionInput::Text(text)) => {
                ConversionOutput::Speech(self.synthesize_speech(text, target).await?)
            }
            (ConversionMode::SpeechToText, ConversionInput::Audio(audio)) => {
                let recognized = self.recognize_speech(audio, source).await?;
                if source == target {
                    ConversionOutput::Recognized { text: recognized }
                } else {
                    let translated_text = self.translate_text(&recognized, target).await?;
                    ConversionOutput::RecognizedAndTranslated {
                        original_text: recognized,
                        translated_text,
                    }
                }
            }
            (ConversionMode::SpeechToSpeech, ConversionInput::Audio(audio)) => {
                let recognized = self.recognize_speech(audio, source).await?;
                ConversionOutput::Speech(self.synthesize_speech(&recognized, target).await?)
            }
            (mode, input) => {
                return Err(anyhow::anyhow!(
                    "{} cannot consume {:?} input",
                    mode,
                    input.kind()
                )
                .into());
            }
        };

        tracing::info!(mode = %request.mode(), "Conversion completed");

        Ok(output)
    }
}
