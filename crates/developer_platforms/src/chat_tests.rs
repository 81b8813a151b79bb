use super::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_message_omits_empty_channel() {
    let message = WebhookMessage {
        username: DEFAULT_BOT_USERNAME,
        channel: "",
        text: "hello",
    };

    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(
        value,
        json!({ "username": "Review Bot 🧐", "text": "hello" })
    );
}

#[tokio::test]
async fn test_send_posts_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/abc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "username": "Review Bot 🧐",
            "channel": "@john",
            "text": "# Reminder \"quoted\"\nline two"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(&format!("{}/hooks/abc", server.uri()));
    notifier
        .send("@john", "# Reminder \"quoted\"\nline two")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_with_custom_username() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/abc"))
        .and(body_json(json!({
            "username": "reminder",
            "channel": "dev",
            "text": "hi"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        WebhookNotifier::new(&format!("{}/hooks/abc", server.uri())).with_username("reminder");
    notifier.send("dev", "hi").await.unwrap();
}

#[tokio::test]
async fn test_send_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/abc"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_payload"))
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::new(&format!("{}/hooks/abc", server.uri()));
    let result = notifier.send("dev", "hi").await;

    match result {
        Err(Error::DeliveryFailed(status, body)) => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid_payload");
        }
        other => panic!("expected a delivery failure, got {:?}", other),
    }
}
