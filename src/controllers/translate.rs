use axum::{
    body::Body,
    extract::{Multipart, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json, RequestExt,
};
use std::sync::Arc;

use crate::{
    domain::conversion::{
        ConversionInput, ConversionMode, ConversionOutput, ConversionRequest, ConversionService,
        ConversionServiceApi, InputKind, LanguageCode, SynthesizedSpeech, TextConversionResponse,
    },
    error::{AppError, AppResult},
};

pub const AUDIO_CONTENT_TYPE: &str = "audio/mp3";
pub const AUDIO_ATTACHMENT: &str = "attachment; filename=\"translation.mp3\"";
pub const X_TRANSLATED_TEXT: &str = "x-translated-text";
pub const X_TRANSLATED_TEXT_TRUNCATED: &str = "x-translated-text-truncated";

/// Longest percent-encoded `X-Translated-Text` value sent to clients
pub const MAX_TRANSLATED_TEXT_HEADER_BYTES: usize = 4096;

/// Fields of POST /translate, from either a urlencoded or a multipart body.
///
/// When a field is repeated the first occurrence wins, whatever the encoding.
#[derive(Debug, Default)]
pub struct TranslateForm {
    pub option: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub audio: Option<UploadedAudio>,
}

impl TranslateForm {
    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "option" => Some(&mut self.option),
            "text" => Some(&mut self.text),
            "language" => Some(&mut self.language),
            "source_language" => Some(&mut self.source_language),
            _ => None,
        }
    }

    /// Record a text field unless it was already seen; unknown names are ignored
    fn set_text(&mut self, name: &str, value: String) {
        if let Some(slot) = self.slot(name) {
            slot.get_or_insert(value);
        }
    }

    fn wants_text(&mut self, name: &str) -> bool {
        matches!(self.slot(name), Some(None))
    }
}

/// The `audio` part of a multipart body
#[derive(Debug)]
pub struct UploadedAudio {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct TranslateController {
    conversion_service: Arc<ConversionService>,
}

impl TranslateController {
    pub fn new(conversion_service: Arc<ConversionService>) -> Self {
        Self { conversion_service }
    }

    /// POST /translate - Run one of the four conversion pipelines
    pub async fn translate(
        State(controller): State<Arc<TranslateController>>,
        request: Request,
    ) -> AppResult<Response> {
        let form = parse_form(request).await?;

        let option = form.option.as_deref().ok_or_else(AppError::missing_option)?;
        let mode: ConversionMode = option.parse().map_err(|_| AppError::InvalidOption)?;
        let target_language = LanguageCode::or_default(form.language.as_deref());
        let source_language = LanguageCode::or_default(form.source_language.as_deref());

        tracing::info!(
            mode = %mode,
            source_language = %source_language,
            target_language = %target_language,
            "Translate request"
        );

        let input = match mode.input_kind() {
            InputKind::Text => ConversionInput::Text(form.text.ok_or_else(AppError::missing_text)?),
            InputKind::Audio => {
                let (file_name, bytes) = require_audio(form.audio)?;
                // Deleted when `conversion_request` goes out of scope, whatever the outcome
                let resource = controller
                    .conversion_service
                    .scratch()
                    .materialize(&file_name, &bytes)
                    .await
                    .map_err(|e| AppError::Internal(format!("Failed to store uploaded audio: {}", e)))?;
                ConversionInput::Audio(resource)
            }
        };

        let conversion_request =
            ConversionRequest::new(mode, input, source_language, target_language)
                .map_err(|e| AppError::Internal(e.to_string()))?;

        let output = controller
            .conversion_service
            .convert(&conversion_request)
            .await
            .map_err(|e| {
                tracing::warn!(mode = %mode, step = e.step(), error = %e, "Conversion failed");
                AppError::from(e)
            })?;

        match output {
            ConversionOutput::Speech(speech) => audio_response(speech).await,
            text => Ok(Json(text_response(text)?).into_response()),
        }
    }
}

/// Read the request body as a form, whichever encoding the client used.
///
/// Bodies that are neither urlencoded nor multipart yield an empty form.
async fn parse_form(request: Request) -> AppResult<TranslateForm> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(pairs) = request
            .extract::<Form<Vec<(String, String)>>, _>()
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;

        let mut form = TranslateForm::default();
        for (name, value) in pairs {
            form.set_text(&name, value);
        }
        return Ok(form);
    }

    if content_type.starts_with("multipart/form-data") {
        let multipart = request
            .extract::<Multipart, _>()
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        return parse_multipart(multipart).await;
    }

    Ok(TranslateForm::default())
}

async fn parse_multipart(mut multipart: Multipart) -> AppResult<TranslateForm> {
    let mut form = TranslateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "audio" {
            if form.audio.is_some() {
                continue;
            }
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            form.audio = Some(UploadedAudio {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        if !form.wants_text(&name) {
            continue;
        }
        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(format!(
                "Failed reading multipart '{}' field: {}",
                name,
                e.body_text()
            ))
        })?;
        form.set_text(&name, value);
    }

    Ok(form)
}

fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::BadRequest(message)
    }
}

/// An upload counts only when it has a non-empty file name
fn require_audio(audio: Option<UploadedAudio>) -> AppResult<(String, Vec<u8>)> {
    match audio {
        Some(UploadedAudio {
            file_name: Some(file_name),
            bytes,
        }) if !file_name.trim().is_empty() => Ok((file_name, bytes)),
        _ => Err(AppError::missing_audio()),
    }
}

fn text_response(output: ConversionOutput) -> AppResult<TextConversionResponse> {
    match output {
        ConversionOutput::Translated { translated_text } => {
            Ok(TextConversionResponse::Translated { translated_text })
        }
        ConversionOutput::Recognized { text } => Ok(TextConversionResponse::Recognized { text }),
        ConversionOutput::RecognizedAndTranslated {
            original_text,
            translated_text,
        } => Ok(TextConversionResponse::RecognizedAndTranslated {
            original_text,
            translated_text,
        }),
        ConversionOutput::Speech(_) => Err(AppError::Internal(
            "Audio output cannot be rendered as text".to_string(),
        )),
    }
}

/// Load synthesized audio into the response and release its file before replying
async fn audio_response(speech: SynthesizedSpeech) -> AppResult<Response> {
    let audio_data = speech
        .audio
        .read()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read synthesized audio: {}", e)))?;
    let (encoded_text, truncated) = encode_translated_text(&speech.translated_text);
    let translated_text =
        HeaderValue::from_str(&encoded_text).map_err(|e| AppError::Internal(e.to_string()))?;
    drop(speech);

    let mut response = (StatusCode::OK, Body::from(audio_data)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_CONTENT_TYPE));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static(AUDIO_ATTACHMENT),
    );
    headers.insert(X_TRANSLATED_TEXT, translated_text);
    if truncated {
        headers.insert(X_TRANSLATED_TEXT_TRUNCATED, HeaderValue::from_static("true"));
    }

    Ok(response)
}

/// Percent-encode `text` for a header, keeping whole characters only up to
/// `MAX_TRANSLATED_TEXT_HEADER_BYTES`. The flag reports whether anything was cut.
fn encode_translated_text(text: &str) -> (String, bool) {
    let mut encoded = String::new();
    let mut buf = [0u8; 4];

    for ch in text.chars() {
        let piece = urlencoding::encode(ch.encode_utf8(&mut buf));
        if encoded.len() + piece.len() > MAX_TRANSLATED_TEXT_HEADER_BYTES {
            tracing::debug!(
                text_length = text.len(),
                "Translated text truncated in response header"
            );
            return (encoded, true);
        }
        encoded.push_str(&piece);
    }

    (encoded, false)
}
