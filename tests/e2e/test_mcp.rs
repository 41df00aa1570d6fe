use crate::e2e::helpers;

use helpers::assertions::assert_voice_descriptor;
use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_describe_service_for_discovery(ctx: &TestContext) {
    let response = ctx.client.get("/discovery").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["name"], "Claude Voice MCP");
    assert_eq!(body["capabilities"], json!(["text-to-speech"]));
    assert_eq!(body["protocols"], json!(["websocket", "http"]));
    assert_eq!(body["status"], "available");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_mcp_info(ctx: &TestContext) {
    let response = ctx.client.get("/api/v1/info").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["type"], "voice");
    assert_eq!(body["capabilities"], json!({ "tts": true, "stt": false }));
    assert_eq!(body["protocol_version"], "1.0");
    assert_eq!(body["service_id"], "claude-voice-mcp");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_connected_clients_in_api_health(ctx: &TestContext) {
    let response = ctx.client.get("/api/v1/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connected_clients"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_register_client_with_endpoints_from_host(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_headers(
            "/api/v1/register",
            &json!({
                "client_id": "desktop-1",
                "client_name": "Claude Desktop",
                "client_version": "1.2.3"
            }),
            &[("host", "voice.local:3000")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "registered");
    assert!(Uuid::parse_str(body["session_id"].as_str().unwrap()).is_ok());
    assert_eq!(
        body["service_endpoints"],
        json!({
            "websocket": "ws://voice.local:3000/api/v1/ws",
            "rest": "http://voice.local:3000/api/v1"
        })
    );
    assert_eq!(body["capabilities"]["tts"]["formats"], json!(["mp3"]));

    let voices = body["capabilities"]["tts"]["voices"].as_array().unwrap();
    assert_eq!(voices.len(), 11);
    for voice in voices {
        assert_voice_descriptor(voice, "google");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_tts_config(ctx: &TestContext) {
    let response = ctx.client.get("/api/v1/tts/config").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["default_voice"], "en-US");
    assert_eq!(body["default_provider"], "google");
    assert_eq!(body["providers"], json!(["google", "elevenlabs"]));
    assert_eq!(body["formats"], json!(["mp3"]));
    assert_eq!(body["rate_min"], 0.5);
    assert_eq!(body["rate_max"], 2.0);
    assert_eq!(body["pitch_default"], 1.0);
    assert_eq!(body["voices"].as_array().unwrap().len(), 11);
}
