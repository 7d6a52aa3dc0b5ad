//! Integration tests for request construction per endpoint.

mod common;

use std::sync::Arc;

use food_lens_api::{ApiClient, HttpMethod, RequestBody};
use food_lens_core::Nutrition;
use serde_json::json;

use common::RecordingTransport;

#[tokio::test]
async fn request_shape_tests_analysis_posts_multipart_image() {
    let transport = Arc::new(RecordingTransport::replying(
        200,
        r#"{"foods":[{"name":"Rice","confidence":0.95}],"nutrition":{"calories":130,"protein":2.7,"carbs":28,"fat":0.3},"advice":"ok"}"#,
    ));
    let client = ApiClient::new("http://backend.test", transport.clone()).expect("client should build");

    let result = client.analyze_food(&common::fixture_jpeg()).await;
    assert_eq!(result.food_names(), vec!["Rice".to_string()]);
    assert_eq!(result.advice, "ok");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url.as_str(), "http://backend.test/api/analyze-food");
    match &requests[0].body {
        RequestBody::Multipart {
            field,
            file_name,
            blob,
        } => {
            assert_eq!(*field, "image");
            assert_eq!(file_name, "lunch.jpg");
            assert_eq!(blob.mime_type, "image/jpeg");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}

#[tokio::test]
async fn request_shape_tests_gesture_sends_data_url_json() {
    let transport = Arc::new(RecordingTransport::replying(
        200,
        r#"{"gesture":"thumbs_up","confidence":0.7}"#,
    ));
    let client = ApiClient::new("http://backend.test", transport.clone()).expect("client should build");

    let gesture = client.recognize_gesture(&common::fixture_jpeg()).await;
    assert_eq!(gesture.gesture, "thumbs_up");

    let requests = transport.requests();
    assert_eq!(
        requests[0].body,
        RequestBody::Json(json!({"image": "data:image/jpeg;base64,/9j/2Q=="}))
    );
}

#[tokio::test]
async fn request_shape_tests_chat_and_advice_send_json_payloads() {
    let transport = Arc::new(RecordingTransport::replying(
        200,
        r#"{"response":"hi","context":{"turn":2},"advice":"eat greens","recommendations":["greens"]}"#,
    ));
    let client = ApiClient::new("http://backend.test/", transport.clone()).expect("client should build");

    let reply = client.chat_with_ai("hello", None).await;
    assert_eq!(reply.response, "hi");
    assert_eq!(reply.context, Some(json!({"turn": 2})));

    let advice = client
        .get_nutrition_advice(&Nutrition {
            calories: 320.0,
            protein: 8.5,
            carbs: 65.2,
            fat: 2.1,
        })
        .await;
    assert_eq!(advice.recommendations, vec!["greens".to_string()]);

    let requests = transport.requests();
    assert_eq!(
        requests[0].body,
        RequestBody::Json(json!({"message": "hello", "context": null}))
    );
    assert_eq!(
        requests[1].body,
        RequestBody::Json(json!({"calories": 320.0, "protein": 8.5, "carbs": 65.2, "fat": 2.1}))
    );
    assert_eq!(requests[1].url.path(), "/api/nutrition-advice");
}

#[tokio::test]
async fn request_shape_tests_health_is_a_bodyless_get() {
    let transport = Arc::new(RecordingTransport::replying(204, ""));
    let client = ApiClient::new("http://backend.test", transport.clone()).expect("client should build");

    assert!(client.health_check().await);
    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].body, RequestBody::Empty);
    assert_eq!(requests[0].url.path(), "/api/health");
}

#[tokio::test]
async fn request_shape_tests_speech_posts_multipart_audio() {
    let transport = Arc::new(RecordingTransport::replying(
        200,
        r#"{"text":"two eggs","confidence":0.8}"#,
    ));
    let client = ApiClient::new("http://backend.test", transport.clone()).expect("client should build");

    let transcript = client.speech_to_text(&common::fixture_audio()).await;
    assert_eq!(transcript.text, "two eggs");

    match &transport.requests()[0].body {
        RequestBody::Multipart { field, file_name, .. } => {
            assert_eq!(*field, "audio");
            assert_eq!(file_name, "audio.webm");
        }
        other => panic!("expected multipart body, got {other:?}"),
    }
}
