//! Messages and messaging profiles against a wiremock server.

use serde_json::json;
use telnyx::{
    testing::{test_client, TEST_API_KEY},
    CreateMessagingProfileParams, Error, GroupMmsParams, ListMessagingProfilesParams,
    MessageStatus, PageParams, SendMessageParams, UpdateMessagingProfileParams,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "record_type": "message",
        "direction": "outbound",
        "type": "SMS",
        "from": {"phone_number": "+13125550001", "carrier": "Telnyx", "line_type": "VoIP"},
        "to": [{"phone_number": "+13125550002", "status": status}],
        "text": "hello",
        "parts": 1,
        "tags": null,
        "errors": []
    })
}

fn profile_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "record_type": "messaging_profile",
        "name": name,
        "enabled": true,
        "webhook_api_version": "2",
        "whitelisted_destinations": ["US"],
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn send_message_posts_body_with_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(header("accept", "application/json"))
        .and(header(
            "x-telnyx-client",
            concat!("telnyx-rust/", env!("CARGO_PKG_VERSION")),
        ))
        .and(body_json(json!({
            "to": "+13125550002",
            "from": "+13125550001",
            "text": "hello"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": message_json("msg-1", "queued")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let message = client
        .messages()
        .send(SendMessageParams::text("+13125550002", "hello").with_from("+13125550001"))
        .await
        .expect("send should succeed");

    assert_eq!(message.id, "msg-1");
    assert_eq!(message.status(), Some(MessageStatus::Queued));
    assert!(message.tags.is_empty());
}

#[tokio::test]
async fn invalid_message_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .messages()
        .send(SendMessageParams::text("+13125550002", "hello"))
        .await
        .expect_err("missing sender should fail");

    match err {
        Error::Validation(v) => assert_eq!(v.field.as_deref(), Some("from")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn retrieve_and_group_mms() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/msg-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": message_json("msg-2", "delivered")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/messages/group_mms"))
        .and(body_json(json!({
            "from": "+13125550001",
            "to": ["+13125550002", "+13125550003"],
            "media_urls": ["https://cdn.test/cat.gif"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": message_json("msg-3", "queued")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let delivered = client.messages().retrieve("msg-2").await.unwrap();
    assert_eq!(delivered.status(), Some(MessageStatus::Delivered));

    let group = client
        .messages()
        .send_group_mms(
            GroupMmsParams::new(
                "+13125550001",
                vec!["+13125550002".into(), "+13125550003".into()],
            )
            .with_media_url("https://cdn.test/cat.gif"),
        )
        .await
        .unwrap();
    assert_eq!(group.id, "msg-3");
}

#[tokio::test]
async fn retrieve_inbound_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/messages/msg-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "msg-in",
                "record_type": "message",
                "direction": "inbound",
                "type": "SMS",
                "from": {"phone_number": "+13125550002", "carrier": "T-Mobile USA", "line_type": "Wireless"},
                "to": [{
                    "phone_number": "+13125550001",
                    "status": "webhook_delivered",
                    "carrier": "Telnyx",
                    "line_type": "Wireless"
                }],
                "text": "hi back",
                "media": [],
                "parts": 1,
                "received_at": "2024-03-01T12:00:00.000+00:00"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let message = client.messages().retrieve("msg-in").await.unwrap();
    assert_eq!(message.direction, telnyx::Direction::Inbound);
    assert_eq!(message.status(), Some(MessageStatus::WebhookDelivered));
    assert!(message.received_at.is_some());
}

#[tokio::test]
async fn messaging_profile_crud() {
    let server = MockServer::start().await;
    let id = "16fd2706-8baf-433b-82eb-8c7fada847da";

    Mock::given(method("GET"))
        .and(path("/messaging_profiles"))
        .and(query_param("filter[name]", "Support"))
        .and(query_param("page[size]", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [profile_json(id, "Support")],
            "meta": {"page_number": 1, "page_size": 5, "total_pages": 1, "total_results": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/messaging_profiles"))
        .and(body_json(json!({
            "name": "Support",
            "whitelisted_destinations": ["US"],
            "webhook_url": "https://hooks.test/sms"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": profile_json(id, "Support")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/messaging_profiles/{id}")))
        .and(body_json(json!({"name": "Support EU", "enabled": false})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": profile_json(id, "Support EU")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/messaging_profiles/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": profile_json(id, "Support EU")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let profiles = client.messaging_profiles();

    let page = profiles
        .list(
            ListMessagingProfilesParams::default()
                .with_name("Support")
                .with_page(PageParams::default().with_size(5)),
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(!page.has_next_page());

    let created = profiles
        .create(
            CreateMessagingProfileParams::new("Support", vec!["US".into()])
                .with_webhook_url("https://hooks.test/sms"),
        )
        .await
        .unwrap();
    assert_eq!(created.id, id);

    let updated = profiles
        .update(
            id,
            UpdateMessagingProfileParams::default()
                .with_name("Support EU")
                .with_enabled(false),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Support EU");

    let deleted = profiles.delete(id).await.unwrap();
    assert_eq!(deleted.id, id);
}
