use super::translation_repository::TranslationRepository;
use crate::domain::conversion::LanguageCode;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Translation through an OpenAI chat model
pub struct OpenAiTranslationRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTranslationRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn system_prompt(target: &LanguageCode) -> String {
        format!(
            "You are a translation engine. Detect the language of the user's message and \
             translate it into the language with BCP-47 tag '{}'. Reply with the translation \
             only, without quotes, notes or explanations. If the text is already in that \
             language, reply with it unchanged.",
            target
        )
    }

    fn build_request(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(0.0)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(Self::system_prompt(target))
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()?
                    .into(),
            ])
            .build()
    }
}

#[async_trait]
impl TranslationRepository for OpenAiTranslationRepository {
    async fn translate(&self, text: &str, target: &LanguageCode) -> Result<String, String> {
        let request = self
            .build_request(text, target)
            .map_err(|e| format!("Invalid OpenAI translation request: {}", e))?;

        tracing::info!(
            model = %self.model,
            target_language = %target,
            text_length = text.len(),
            "Calling OpenAI chat completion for translation"
        );

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI translation failed");
            format!("OpenAI translation error: {}", e)
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| "OpenAI translation returned no text".to_string())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
