#![allow(clippy::unwrap_used)]
// Integration tests for `DetectorClient` using wiremock.

use std::time::Duration;

use chrono::Timelike;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use firewatch_api::{
    DetectorClient, DetectorState, Error, NotificationSettings, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DetectorClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DetectorClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": "2024-06-15T10:30:00.250",
            "state": "beep",
            "frequency": 3187,
            "magnitude_db": -12.3,
            "beep_count": 2,
            "alarm_active": false
        })))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert_eq!(status.state, DetectorState::Beep);
    assert!(!status.alarm_active);
    assert!((status.frequency - 3187.0).abs() < f64::EPSILON);
    assert_eq!(status.magnitude_db, Some(-12.3));
    assert_eq!(status.beep_count, 2);

    let ts = status.timestamp.unwrap();
    assert_eq!((ts.hour(), ts.minute()), (10, 30));
}

#[tokio::test]
async fn test_get_status_null_magnitude() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "idle",
            "frequency": 0,
            "magnitude_db": null,
            "beep_count": 0,
            "alarm_active": false
        })))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert_eq!(status.state, DetectorState::Idle);
    assert_eq!(status.magnitude_db, None);
    assert_eq!(status.timestamp, None);
}

#[tokio::test]
async fn test_get_status_with_unreadable_timestamp() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "alarm",
            "frequency": 3150,
            "magnitude_db": -12.0,
            "beep_count": 3,
            "alarm_active": true,
            "timestamp": "15/06/2024 10:30"
        })))
        .mount(&server)
        .await;

    let status = client.get_status().await.unwrap();
    assert!(status.alarm_active);
    assert_eq!(status.timestamp, None);
}

#[tokio::test]
async fn test_get_status_error_body_is_extracted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "error": "Detector not running" })),
        )
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    match &err {
        Error::Http { status, message } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "Detector not running");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_status_plain_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let result = client.get_status().await;
    assert!(
        matches!(&result, Err(Error::Http { status: 502, message }) if message == "Detector not responding"),
        "expected generic Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_status_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "idle" })))
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_get_status_timeout() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let transport = TransportConfig::with_timeout(Duration::from_millis(100));
    let client = DetectorClient::new(base_url, &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client.get_status().await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { .. }),
        "expected Timeout error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_detector() {
    let client = DetectorClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
    );

    let err = client.get_status().await.unwrap_err();
    assert!(
        matches!(err, Error::Transport(_)),
        "expected Transport error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_base_url_trailing_slash() {
    let (server, _) = setup().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = DetectorClient::with_client(reqwest::Client::new(), base_url);

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "api": "ok", "detector": "running" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();
    assert!(health.detector_running());
}

// ── Detection log tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_list_detections_keeps_remote_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/detections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "timestamp": "2024-06-15T10:30:00.000",
                "event": "fire_alarm",
                "frequency": 3150,
                "magnitude_db": -10.5,
                "beep_count": 3
            },
            {
                "timestamp": "2024-06-15T11:45:12.500",
                "frequency": 3200,
                "magnitude_db": null
            }
        ])))
        .mount(&server)
        .await;

    let events = client.list_detections().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp.unwrap().hour(), 10);
    assert_eq!(events[0].event.as_deref(), Some("fire_alarm"));
    assert_eq!(events[0].beep_count, Some(3));
    assert_eq!(events[1].timestamp.unwrap().hour(), 11);
    assert_eq!(events[1].magnitude_db, None);
    assert_eq!(events[1].event, None);
}

#[tokio::test]
async fn test_list_detections_survives_a_bad_timestamp() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/detections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"timestamp": "2024-06-15T10:30:00", "frequency": 3150, "magnitude_db": -10.5},
            {"timestamp": "garbage", "frequency": 3200, "magnitude_db": -9.0}
        ])))
        .mount(&server)
        .await;

    let events = client.list_detections().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp.unwrap().hour(), 10);
    assert_eq!(events[1].timestamp, None);
}

#[tokio::test]
async fn test_list_detections_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/detections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client.list_detections().await.unwrap().is_empty());
}

// ── Health tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_detector_stopped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "api": "ok", "detector": "stopped" })),
        )
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();
    assert_eq!(health.api, "ok");
    assert!(!health.detector_running());
}

// ── Settings tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_settings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "topic": "kitchen-alarm", "enabled": true })),
        )
        .mount(&server)
        .await;

    let settings = client.get_settings().await.unwrap();
    assert_eq!(
        settings,
        NotificationSettings {
            topic: "kitchen-alarm".into(),
            enabled: true,
        }
    );
}

#[tokio::test]
async fn test_save_settings_with_echo() {
    let (server, client) = setup().await;
    let settings = NotificationSettings {
        topic: "garage".into(),
        enabled: true,
    };

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .and(body_json(json!({ "topic": "garage", "enabled": true })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "topic": "garage", "enabled": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let echo = client.save_settings(&settings).await.unwrap();
    assert_eq!(echo, Some(settings));
}

#[tokio::test]
async fn test_save_settings_without_echo() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let echo = client
        .save_settings(&NotificationSettings::default())
        .await
        .unwrap();
    assert_eq!(echo, None);
}

#[tokio::test]
async fn test_save_settings_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
        .mount(&server)
        .await;

    let result = client.save_settings(&NotificationSettings::default()).await;
    assert!(
        matches!(&result, Err(Error::Http { status: 500, message }) if message == "disk full"),
        "expected Http error, got: {result:?}"
    );
}

// ── Test notification tests ─────────────────────────────────────────

#[tokio::test]
async fn test_send_test_notification_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/test-notification"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "sent" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.send_test_notification().await.unwrap();
}

#[tokio::test]
async fn test_send_test_notification_flag_false_with_200() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/test-notification"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "no topic configured" })),
        )
        .mount(&server)
        .await;

    let err = client.send_test_notification().await.unwrap_err();
    match &err {
        Error::NotificationFailed { message } => assert_eq!(message, "no topic configured"),
        other => panic!("expected NotificationFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_send_test_notification_flag_true_with_500() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/test-notification"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    client.send_test_notification().await.unwrap();
}

#[tokio::test]
async fn test_send_test_notification_no_flag_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/test-notification"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let result = client.send_test_notification().await;
    assert!(
        matches!(result, Err(Error::Http { status: 404, .. })),
        "expected Http error, got: {result:?}"
    );
}
