use super::speech_recognition_repository::{RecognitionError, SpeechRecognitionRepository};
use crate::domain::conversion::LanguageCode;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{AudioInput, CreateTranscriptionRequestArgs},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI Whisper implementation of speech recognition
pub struct OpenAiSpeechRecognitionRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiSpeechRecognitionRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Rejections of the audio itself are "unintelligible"; everything else means the
    /// service could not do its job
    fn classify(err: OpenAIError) -> RecognitionError {
        match err {
            OpenAIError::ApiError(api_error)
                if api_error.r#type.as_deref() == Some("invalid_request_error") =>
            {
                RecognitionError::Unintelligible(api_error.message)
            }
            other => RecognitionError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl SpeechRecognitionRepository for OpenAiSpeechRecognitionRepository {
    async fn recognize(
        &self,
        file_name: &str,
        audio: Vec<u8>,
        language: &LanguageCode,
    ) -> Result<String, RecognitionError> {
        let start_time = std::time::Instant::now();
        let audio_size = audio.len();

        // Whisper accepts ISO-639-1 only
        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name.to_string(), audio))
            .model(&self.model)
            .language(language.primary())
            .build()
            .map_err(|e| RecognitionError::Unavailable(e.to_string()))?;

        tracing::info!(
            model = %self.model,
            language = %language,
            file_name = file_name,
            audio_size_bytes = audio_size,
            "Calling OpenAI transcription API"
        );

        let response = self.client.audio().transcribe(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI transcription failed");
            Self::classify(e)
        })?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::Unintelligible(
                "no speech detected".to_string(),
            ));
        }

        tracing::info!(
            provider = "openai",
            latency_ms = start_time.elapsed().as_millis(),
            text_length = text.len(),
            "Transcription completed"
        );

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
