//! Blocking client against a wiremock server.

#![cfg(feature = "blocking")]

use serde_json::json;
use telnyx::testing::{blocking_test_client, TEST_API_KEY};
use telnyx::{
    DialParams, Error, HangupParams, ListPhoneNumbersParams, PageParams, SendMessageParams,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn number_json(number: &str) -> serde_json::Value {
    json!({"id": number, "phone_number": number, "status": "active"})
}

#[test]
fn blocking_send_message() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
            .and(body_json(json!({
                "to": "+13125550002",
                "messaging_profile_id": "prof-1",
                "text": "hello"
            })))
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
    });

    let client = blocking_test_client(&server.uri());
    let message = client
        .messages()
        .send(SendMessageParams::text("+13125550002", "hello").with_messaging_profile_id("prof-1"))
        .expect("send should succeed");
    assert_eq!(message.id, "msg-1");
}

#[test]
fn blocking_list_all_iterates_pages() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/phone_numbers"))
            .and(query_param("page[number]", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [number_json("+13125550001"), number_json("+13125550002")],
                "meta": {"page_number": 1, "page_size": 2, "total_pages": 2, "total_results": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/phone_numbers"))
            .and(query_param("page[number]", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [number_json("+13125550003")],
                "meta": {"page_number": 2, "page_size": 2, "total_pages": 2, "total_results": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;
    });

    let client = blocking_test_client(&server.uri());
    let numbers: Vec<String> = client
        .phone_numbers()
        .list_all(ListPhoneNumbersParams::default().with_page(PageParams::new(1, 2)))
        .expect("request should build")
        .map(|item| item.map(|n| n.phone_number))
        .collect::<telnyx::Result<_>>()
        .expect("every page should load");
    assert_eq!(numbers, vec!["+13125550001", "+13125550002", "+13125550003"]);
}

#[test]
fn blocking_errors_match_async_mapping() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime should start");
    let server = rt.block_on(async { MockServer::start().await });

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/calls/v3%3Agone/actions/hangup"))
            .respond_with(
                ResponseTemplate::new(422)
                    .insert_header("x-request-id", "req-blocking")
                    .set_body_json(json!({
                        "errors": [{"code": "90018", "title": "Call has already ended"}]
                    })),
            )
            .expect(1)
            .mount(&server)
            .await;
    });

    let client = blocking_test_client(&server.uri());
    let err = client
        .calls()
        .hangup("v3:gone", HangupParams::default())
        .expect_err("hangup should fail");
    let api = err.as_api().expect("api error");
    assert_eq!(api.status, 422);
    assert_eq!(api.message, "Call has already ended");
    assert_eq!(api.request_id.as_deref(), Some("req-blocking"));

    let err = client
        .calls()
        .dial(DialParams::new("", "+18005550199", "+18005550100"))
        .expect_err("blank connection should fail");
    assert!(matches!(err, Error::Validation(_)));
}
