use crate::e2e::helpers;

use helpers::api_client::FilePart;
use helpers::fakes::{RecognitionCall, FAKE_MP3};
use helpers::{TestContext, TEST_MAX_UPLOAD_BYTES};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use translation_gateway::controllers::translate::MAX_TRANSLATED_TEXT_HEADER_BYTES;
use translation_gateway::infrastructure::repositories::RecognitionError;

const WAV: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

fn clip() -> Option<FilePart<'static>> {
    Some(FilePart {
        field: "audio",
        file_name: "clip.wav",
        bytes: WAV,
    })
}

fn call(text: &str, language: &str) -> (String, String) {
    (text.to_string(), language.to_string())
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_option(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/translate", &[("text", "hello")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing option parameter");
    assert!(ctx.translator.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_read_non_form_bodies_as_empty_forms(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/translate", "application/json", r#"{"option":"text-to-text"}"#)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing option parameter");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_option(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-braille"), ("text", "hello")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid option");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    for option in ["text-to-text", "text-to-speech"] {
        let response = ctx
            .client
            .post_form("/translate", &[("option", option), ("language", "es")])
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing text parameter");
    }
    assert!(ctx.translator.calls().is_empty());
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_audio(ctx: &TestContext) {
    for option in ["speech-to-text", "speech-to-speech"] {
        let response = ctx
            .client
            .post_multipart("/translate", &[("option", option)], None)
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing audio file");
    }
    assert!(ctx.recognizer.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_audio_with_empty_file_name(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "speech-to-text")],
            Some(FilePart {
                field: "audio",
                file_name: "",
                bytes: WAV,
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing audio file");
    assert!(ctx.recognizer.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_multipart(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw(
            "/translate",
            "multipart/form-data; boundary=abc",
            "--abc\r\nContent-Disposition: form-data; name=\"option\"\r\n\r\ntext-to-text",
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body.as_ref().unwrap()["error"].is_string());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_uploads_above_the_limit(ctx: &TestContext) {
    let oversized = vec![0u8; TEST_MAX_UPLOAD_BYTES + 1];

    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "speech-to-text")],
            Some(FilePart {
                field: "audio",
                file_name: "big.wav",
                bytes: &oversized,
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(ctx.recognizer.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

// ---------------------------------------------------------------------------
// text-to-text
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_translate_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/translate",
            &[("option", "text-to-text"), ("text", "Good morning"), ("language", "es")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({ "translated_text": "[es] Good morning" }))
    );
    assert_eq!(ctx.translator.calls(), vec![call("Good morning", "es")]);
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_target_language_to_english(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-text"), ("text", "Hola")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "translated_text": "[en] Hola" })));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_language_names(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/translate",
            &[("option", "text-to-text"), ("text", "Good morning"), ("language", "Spanish")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "translated_text": "[es] Good morning" })));
    assert_eq!(ctx.translator.calls(), vec![call("Good morning", "es")]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_multipart_text_requests(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "text-to-text"), ("text", "Bonjour"), ("language", "de")],
            None,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "translated_text": "[de] Bonjour" })));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_translation_failures(ctx: &TestContext) {
    ctx.translator.fail_with("quota exceeded");

    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-text"), ("text", "hello")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("quota exceeded");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_on_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-text"), ("text", "")])
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(ctx.translator.calls().is_empty());
}

// ---------------------------------------------------------------------------
// text-to-speech
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_speak_translated_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/translate",
            &[("option", "text-to-speech"), ("text", "hello world"), ("language", "fr")],
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mp3")
        .assert_header(
            "content-disposition",
            "attachment; filename=\"translation.mp3\"",
        )
        .assert_header("x-translated-text", "%5Bfr%5D%20hello%20world");
    assert!(!response.body_bytes.is_empty());

    // Synthesis speaks the translation, never the source text
    assert_eq!(ctx.translator.calls(), vec![call("hello world", "fr")]);
    assert_eq!(ctx.tts.calls(), vec![call("[fr] hello world", "fr")]);
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_synthesize_when_translation_fails(ctx: &TestContext) {
    ctx.translator.fail_with("translation backend down");

    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-speech"), ("text", "hello")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("translation backend down");
    assert!(ctx.tts.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_synthesis_failures(ctx: &TestContext) {
    ctx.tts.fail_with("voice not available");

    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-speech"), ("text", "hello")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("voice not available");
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_cap_the_translated_text_header_for_long_text(ctx: &TestContext) {
    let text = "hello world ".repeat(4_500);

    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "text-to-speech"), ("text", text.as_str())],
            None,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mp3")
        .assert_header("x-translated-text-truncated", "true");
    assert_eq!(response.body_bytes, FAKE_MP3.to_vec());

    let header = response.header("x-translated-text").unwrap();
    assert!(header.len() <= MAX_TRANSLATED_TEXT_HEADER_BYTES, "header is {} bytes", header.len());
    let decoded = urlencoding::decode(header).unwrap();
    assert!(decoded.starts_with("[en] hello world"));
    assert!(format!("[en] {}", text).starts_with(decoded.as_ref()));
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_flag_short_translations_as_truncated(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/translate", &[("option", "text-to-speech"), ("text", "hi")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response.header("x-translated-text-truncated").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_the_first_of_repeated_fields(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/translate",
            &[
                ("option", "text-to-text"),
                ("option", "text-to-speech"),
                ("text", "first"),
                ("text", "second"),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "translated_text": "[en] first" })));

    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[
                ("option", "text-to-text"),
                ("option", "text-to-speech"),
                ("text", "first"),
                ("text", "second"),
            ],
            None,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "translated_text": "[en] first" })));
}

// ---------------------------------------------------------------------------
// speech-to-text
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_without_translating_for_same_language(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[
                ("option", "speech-to-text"),
                ("source_language", "en"),
                ("language", "en"),
            ],
            clip(),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "text": "hello world" })));
    assert!(ctx.translator.calls().is_empty());
    assert_eq!(
        ctx.recognizer.calls(),
        vec![RecognitionCall {
            file_name: "clip.wav".to_string(),
            audio: WAV.to_vec(),
            language: "en".to_string(),
        }]
    );
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_and_translate_for_different_languages(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[
                ("option", "speech-to-text"),
                ("source_language", "en"),
                ("language", "it"),
            ],
            clip(),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({
            "original_text": "hello world",
            "translated_text": "[it] hello world"
        }))
    );
    assert_eq!(ctx.translator.calls(), vec![call("hello world", "it")]);
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_compare_languages_case_insensitively(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[
                ("option", "speech-to-text"),
                ("source_language", "pt-br"),
                ("language", "PT-BR"),
            ],
            clip(),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({ "text": "hello world" })));
    assert_eq!(ctx.recognizer.calls()[0].language, "pt-BR");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_unintelligible_audio(ctx: &TestContext) {
    ctx.recognizer
        .respond_with(Err(RecognitionError::Unintelligible("noise".to_string())));

    let response = ctx
        .client
        .post_multipart("/translate", &[("option", "speech-to-text")], clip())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Could not understand the audio: noise");
    assert!(ctx.translator.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_recognition_outages(ctx: &TestContext) {
    ctx.recognizer
        .respond_with(Err(RecognitionError::Unavailable("connection reset".to_string())));

    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "speech-to-text"), ("language", "es")],
            clip(),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Speech recognition service unavailable: connection reset");
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_empty_uploads_as_unintelligible(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "speech-to-text")],
            Some(FilePart {
                field: "audio",
                file_name: "silence.wav",
                bytes: &[],
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Could not understand the audio: the uploaded file is empty");
    assert!(ctx.recognizer.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

// ---------------------------------------------------------------------------
// speech-to-speech
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_recognize_translate_and_speak(ctx: &TestContext) {
    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[
                ("option", "speech-to-speech"),
                ("source_language", "en"),
                ("language", "ja"),
            ],
            clip(),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/mp3")
        .assert_header(
            "content-disposition",
            "attachment; filename=\"translation.mp3\"",
        )
        .assert_header("x-translated-text", "%5Bja%5D%20hello%20world");
    assert_eq!(response.body_bytes, FAKE_MP3.to_vec());

    assert_eq!(ctx.recognizer.calls().len(), 1);
    assert_eq!(ctx.translator.calls(), vec![call("hello world", "ja")]);
    assert_eq!(ctx.tts.calls(), vec![call("[ja] hello world", "ja")]);
    // Both the upload and the synthesized file are gone
    assert!(ctx.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_synthesize_when_recognition_fails(ctx: &TestContext) {
    ctx.recognizer.respond_with(Err(RecognitionError::Unintelligible(
        "unsupported codec".to_string(),
    )));

    let response = ctx
        .client
        .post_multipart(
            "/translate",
            &[("option", "speech-to-speech"), ("language", "es")],
            clip(),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Could not understand the audio: unsupported codec");
    assert!(ctx.translator.calls().is_empty());
    assert!(ctx.tts.calls().is_empty());
    assert!(ctx.scratch_is_empty());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_concurrent_requests_independent(ctx: &TestContext) {
    let languages = ["es", "fr", "de", "it", "pt", "nl", "sv", "pl"];

    let handles: Vec<_> = languages
        .iter()
        .map(|language| {
            let client = ctx.client.clone();
            let language = language.to_string();
            tokio::spawn(async move {
                let response = client
                    .post_multipart(
                        "/translate",
                        &[("option", "speech-to-speech"), ("language", language.as_str())],
                        clip(),
                    )
                    .await
                    .unwrap();
                (language, response)
            })
        })
        .collect();

    for handle in handles {
        let (language, response) = handle.await.unwrap();
        let expected = urlencoding::encode(&format!("[{}] hello world", language)).into_owned();
        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header("x-translated-text").map(String::as_str),
            Some(expected.as_str())
        );
    }

    assert_eq!(ctx.tts.calls().len(), languages.len());
    assert!(ctx.scratch_is_empty());
}
