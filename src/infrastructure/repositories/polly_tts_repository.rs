use super::text_batching::split_into_batches;
use super::tts_repository::TtsRepository;
use crate::domain::conversion::LanguageCode;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// Voice chosen for a language, and whether it runs on the neural engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PollyVoice {
    name: &'static str,
    neural: bool,
}

const fn neural(name: &'static str) -> PollyVoice {
    PollyVoice { name, neural: true }
}

const fn standard(name: &'static str) -> PollyVoice {
    PollyVoice {
        name,
        neural: false,
    }
}

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Select the Polly voice for a language, preferring regional variants when given
    fn get_voice_for_language(language: &LanguageCode) -> Option<PollyVoice> {
        let voice = match language.as_str() {
            "pt-BR" => neural("Camila"),
            "en-GB" => neural("Amy"),
            "es-MX" | "es-US" | "es-419" => neural("Mia"),
            "fr-CA" => neural("Gabrielle"),
            _ => match language.primary() {
                "en" => neural("Joanna"),
                "es" => neural("Lupe"),
                "fr" => neural("Lea"),
                "de" => neural("Vicki"),
                "it" => neural("Bianca"),
                "pt" => neural("Ines"),
                "nl" => neural("Laura"),
                "pl" => neural("Ola"),
                "sv" => neural("Elin"),
                "da" => neural("Sofie"),
                "nb" | "no" => neural("Ida"),
                "fi" => neural("Suvi"),
                "ja" => neural("Takumi"),
                "ko" => neural("Seoyeon"),
                "zh" => neural("Zhiyu"),
                "ar" => neural("Hala"),
                "hi" => neural("Kajal"),
                "tr" => neural("Burcu"),
                "ca" => neural("Arlet"),
                "ru" => standard("Tatyana"),
                "is" => standard("Dora"),
                "ro" => standard("Carmen"),
                "cy" => standard("Gwyneth"),
                _ => return None,
            },
        };
        Some(voice)
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(&self, text: &str, voice: PollyVoice) -> Result<Vec<u8>, String> {
        let voice_id = VoiceId::from(voice.name);
        let engine = if voice.neural {
            Engine::Neural
        } else {
            Engine::Standard
        };

        tracing::info!(
            voice = voice.name,
            engine = ?engine,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    voice = voice.name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, language: &LanguageCode) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let voice = Self::get_voice_for_language(language)
            .ok_or_else(|| format!("AWS Polly has no voice for language '{}'", language))?;

        let batches = split_into_batches(text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = text.len(),
            "Text split into batches"
        );

        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            audio_data.extend(self.call_polly(batch, voice).await?);
            tracing::debug!(
                batch_index = index,
                total_audio_size = audio_data.len(),
                "Batch synthesized and merged"
            );
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            language = %language,
            voice = voice.name,
            latency_ms = duration.as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    fn provider_name(&self) -> &'static str {
        "polly"
    }
}
