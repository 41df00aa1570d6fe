use crate::e2e::helpers;

use helpers::assertions::{assert_tts_headers, assert_voice_descriptor};
use helpers::{TestContext, TEST_API_KEY};
use hyper::StatusCode;
use serde_json::json;
use std::time::Duration;
use test_context::test_context;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_short_text_with_one_provider_call(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("q", "Hello world"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-hello".to_vec()))
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/api/v1/tts", &json!({ "text": "Hello world" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_tts_headers(&response.headers);
    response
        .assert_header("x-provider", "google")
        .assert_header("x-audio-format", "mp3")
        .assert_header("x-character-count", "11")
        .assert_header("x-chunk-count", "1");
    assert_eq!(response.body_bytes, b"ID3-hello".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reassemble_long_text_in_chunk_order(ctx: &TestContext) {
    let first = format!("{}.", "a".repeat(148));
    let second = format!("{}.", "b".repeat(148));
    let third = format!("{}.", "c".repeat(149));
    let text = format!("{} {} {}", first, second, third);

    Mock::given(query_param("q", first.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[1]".to_vec()))
        .expect(1)
        .mount(&ctx.google)
        .await;
    Mock::given(query_param("q", second.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"[2]".to_vec())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&ctx.google)
        .await;
    Mock::given(query_param("q", third.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[3]".to_vec()))
        .expect(1)
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/api/v1/tts", &json!({ "text": text }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-character-count", "450")
        .assert_header("x-chunk-count", "3");
    assert_eq!(String::from_utf8(response.body_bytes.clone()).unwrap(), "[1][2][3]");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_with_elevenlabs_voice_options(ctx: &TestContext) {
    Mock::given(method("POST"))
        .and(path("/text-to-speech/pNInz6obpgDQGcFmaJgB"))
        .and(header("xi-api-key", TEST_API_KEY))
        .and(body_partial_json(json!({
            "text": "Read this aloud.",
            "voice_settings": { "stability": 0.25 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-adam".to_vec()))
        .expect(1)
        .mount(&ctx.elevenlabs)
        .await;

    let response = ctx
        .client
        .post(
            "/api/v1/tts",
            &json!({
                "text": "Read this aloud.",
                "provider": "ElevenLabs",
                "voice_options": { "voiceId": "pNInz6obpgDQGcFmaJgB", "stability": 0.25 }
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-provider", "elevenlabs");
    assert_eq!(response.body_bytes, b"ID3-adam".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_or_blank_text(ctx: &TestContext) {
    for body in [json!({}), json!({ "text": "" }), json!({ "text": "   \n " })] {
        let response = ctx.client.post("/api/v1/tts", &body).await.unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing required parameter: text");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_enforce_text_length_limit(ctx: &TestContext) {
    let long_text = "a".repeat(10001);

    let response = ctx
        .client
        .post("/api/v1/tts", &json!({ "text": long_text }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("10000 characters or less");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_provider(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/v1/tts",
            &json!({ "text": "Hello", "provider": "unknown-provider" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unsupported TTS provider: unknown-provider");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_out_of_range_voice_options(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/v1/tts",
            &json!({ "text": "Hello", "voice_options": { "rate": 3.0 } }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("rate must be between");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_voice_ids_that_escape_the_voice_path(ctx: &TestContext) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .expect(0)
        .mount(&ctx.elevenlabs)
        .await;

    let response = ctx
        .client
        .post(
            "/api/v1/tts",
            &json!({
                "text": "Hello",
                "provider": "elevenlabs",
                "voice_options": { "voiceId": "../voices" }
            }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid Eleven Labs voice id: ../voices");
}

#[tokio::test]
async fn it_should_report_unconfigured_provider_as_unavailable() {
    let ctx = TestContext::without_elevenlabs_key().await;

    let response = ctx
        .client
        .post(
            "/api/v1/tts",
            &json!({ "text": "Hello", "provider": "elevenlabs" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("Eleven Labs TTS is not configured");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_provider_failures_with_provider_name(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.google)
        .await;

    let response = ctx
        .client
        .post("/api/v1/tts", &json!({ "text": "Hello world" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message(
            "Failed to generate audio with Google TTS: Failed to fetch audio: 503",
        );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_google_voices(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/v1/tts/voices?provider=google")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let voices = response.body.as_ref().unwrap().as_array().unwrap();
    assert_eq!(voices.len(), 11);
    for voice in voices {
        assert_voice_descriptor(voice, "google");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_static_elevenlabs_voices(ctx: &TestContext) {
    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.elevenlabs)
        .await;

    let response = ctx
        .client
        .get("/api/v1/tts/voices?provider=elevenlabs")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let voices = response.body.as_ref().unwrap().as_array().unwrap();
    assert_eq!(voices.len(), 9);
    assert_eq!(voices[0]["name"], "Rachel");
    for voice in voices {
        assert_voice_descriptor(voice, "elevenlabs");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_voice_listing_for_unknown_provider(ctx: &TestContext) {
    let response = ctx
        .client
        .get("/api/v1/tts/voices?provider=polly")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unsupported TTS provider: polly");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_providers(ctx: &TestContext) {
    let response = ctx.client.get("/api/v1/tts/providers").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({ "default": "google", "providers": ["google", "elevenlabs"] }))
    );
}

#[tokio::test]
async fn it_should_use_configured_default_provider() {
    let ctx = TestContext::with_default_provider("elevenlabs").await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-rachel".to_vec()))
        .expect(1)
        .mount(&ctx.elevenlabs)
        .await;

    let response = ctx
        .client
        .post("/api/v1/tts", &json!({ "text": "Hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("x-provider", "elevenlabs");
}
