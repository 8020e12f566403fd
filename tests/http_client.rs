//! Transport behaviour shared by every resource: headers, errors, telemetry.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use telnyx::{
    testing::test_client, ApiRequest, Client, Config, DataResponse, Error, HeaderEntry,
    HeaderList, HttpRequestMetrics, MetricsCallbacks, RequestOptions, SendMessageParams,
    TransportErrorKind,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn balance_body() -> serde_json::Value {
    json!({
        "data": {
            "record_type": "balance",
            "balance": "300.00",
            "credit_limit": "100.00",
            "available_credit": "400.00",
            "pending": "10.00",
            "currency": "USD"
        }
    })
}

#[tokio::test]
async fn balance_is_unwrapped_from_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(1)
        .mount(&server)
        .await;

    let balance = test_client(&server.uri()).balance().retrieve().await.unwrap();
    assert_eq!(balance.balance, "300.00");
    assert_eq!(balance.currency, "USD");
    assert_eq!(balance.available_credit.as_deref(), Some("400.00"));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/v2/", server.uri()));
    client.balance().retrieve().await.unwrap();
}

#[tokio::test]
async fn default_and_per_call_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-tenant", "acme"))
        .and(header("x-trace", "abc"))
        .and(header("idempotency-key", "send-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "msg-1",
                "direction": "outbound",
                "from": {"phone_number": "+13125550001"},
                "to": [{"phone_number": "+13125550002", "status": "queued"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut defaults = HeaderList::new();
    defaults.push(HeaderEntry::new("X-Tenant".into(), "acme".into()));
    let client = Client::new(Config {
        api_key: Some("KEY_test".into()),
        base_url: Some(server.uri()),
        default_headers: Some(defaults),
        ..Default::default()
    })
    .unwrap();

    client
        .messages()
        .with_options(
            RequestOptions::default()
                .with_header("X-Trace", "abc")
                .with_idempotency_key("send-42"),
        )
        .send(SendMessageParams::text("+13125550002", "hi").with_from("+13125550001"))
        .await
        .unwrap();
}

#[tokio::test]
async fn not_found_envelope_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/messages/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "req-404")
                .set_body_json(json!({
                    "errors": [{
                        "code": "10005",
                        "title": "Resource not found",
                        "detail": "",
                        "source": {"pointer": "/id"}
                    }]
                })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .messages()
        .retrieve("missing")
        .await
        .unwrap_err();
    let api = err.as_api().expect("api error");
    assert!(api.is_not_found());
    // Blank detail falls back to the title.
    assert_eq!(api.message, "Resource not found");
    assert_eq!(api.request_id.as_deref(), Some("req-404"));
    assert!(api.raw_body.is_some());
}

#[tokio::test]
async fn unstructured_error_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());

    let err = client.balance().retrieve().await.unwrap_err();
    let api = err.as_api().unwrap();
    assert_eq!(api.status, 500);
    assert_eq!(api.message, "internal failure");
    assert!(api.errors.is_empty());

    let err = client.balance().retrieve().await.unwrap_err();
    let api = err.as_api().unwrap();
    assert!(api.is_unauthorized());
    assert_eq!(api.message, "Unauthorized");
}

#[tokio::test]
async fn malformed_success_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .balance()
        .retrieve()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Serialization(_)), "{err:?}");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(balance_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .balance()
        .with_options(RequestOptions::default().with_timeout(Duration::from_millis(50)))
        .retrieve()
        .await
        .unwrap_err();
    match err {
        Error::Transport(t) => assert_eq!(t.kind, TransportErrorKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn telemetry_sees_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-ok")
                .set_body_json(balance_body()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/messages/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let seen: Arc<Mutex<Vec<HttpRequestMetrics>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let client = Client::new(Config {
        api_key: Some("KEY_test".into()),
        base_url: Some(server.uri()),
        metrics: Some(
            MetricsCallbacks::default()
                .with_http_request(move |m| sink.lock().unwrap().push(m)),
        ),
        ..Default::default()
    })
    .unwrap();

    client.balance().retrieve().await.unwrap();
    client.messages().retrieve("nope").await.unwrap_err();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].status, Some(200));
    assert_eq!(seen[0].context.method, "GET");
    assert_eq!(seen[0].context.path, "/balance");
    assert_eq!(seen[0].context.request_id.as_deref(), Some("req-ok"));
    assert!(seen[0].error.is_none());
    assert_eq!(seen[1].status, Some(404));
    assert!(seen[1].error.is_some());
}

#[tokio::test]
async fn raw_requests_reach_unwrapped_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifications/sms"))
        .and(query_param("dry_run", "true"))
        .and(body_json(json!({"phone_number": "+13125550002"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "ver-1", "status": "pending"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::post("/verifications/sms")
        .with_query_pair("dry_run", "true")
        .with_json(&json!({"phone_number": "+13125550002"}))
        .unwrap();
    let resp: DataResponse<serde_json::Value> = test_client(&server.uri())
        .execute(request, RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(resp.data["id"], "ver-1");
}
