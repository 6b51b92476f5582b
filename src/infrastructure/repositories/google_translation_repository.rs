use super::translation_repository::TranslationRepository;
use crate::domain::conversion::LanguageCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Google Cloud Translation (v2 "basic") implementation of the translation repository
pub struct GoogleTranslationRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslationsData,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    code: u16,
    message: String,
}

impl GoogleTranslationRepository {
    pub fn new(http_client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    /// Turn a raw API reply into the translated text or a readable error
    fn parse_response(status: u16, body: &str) -> Result<Translation, String> {
        if !(200..300).contains(&status) {
            return Err(match serde_json::from_str::<GoogleErrorResponse>(body) {
                Ok(e) => format!("Google Translate error {}: {}", e.error.code, e.error.message),
                Err(_) => format!("Google Translate error {}", status),
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(body)
            .map_err(|e| format!("Unexpected Google Translate response: {}", e))?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| "Google Translate returned no translations".to_string())
    }
}

#[async_trait]
impl TranslationRepository for GoogleTranslationRepository {
    async fn translate(&self, text: &str, target: &LanguageCode) -> Result<String, String> {
        let request = TranslateRequest {
            q: text,
            target: target.as_str(),
            format: "text",
        };

        let response = self
            .http_client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, target_language = %target, "Google Translate request failed");
                format!("Google Translate request failed: {}", e)
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read Google Translate response: {}", e))?;

        let translation = Self::parse_response(status, &body).map_err(|e| {
            tracing::error!(status = status, error = %e, "Google Translate rejected request");
            e
        })?;

        tracing::debug!(
            detected_source_language = ?translation.detected_source_language,
            target_language = %target,
            "Google Translate succeeded"
        );

        Ok(translation.translated_text)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
