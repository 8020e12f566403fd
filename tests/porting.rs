//! Porting orders and port-outs.

use futures_util::TryStreamExt;
use serde_json::json;
use telnyx::{
    testing::test_client, CreatePortingOrderParams, ListPortoutsParams, PageParams,
    PortingOrderStatusValue, PortoutStatus, PortoutStatusUpdate, UpdatePortingOrderParams,
    UpdatePortoutStatusParams,
};
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn order_json(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "record_type": "porting_order",
        "status": {"value": status, "details": []},
        "support_key": "sr_a12345",
        "customer_reference": "ref-1",
        "porting_phone_numbers_count": 1,
        "phone_number_type": "local",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z"
    })
}

fn portout_json(id: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "record_type": "portout",
        "status": status,
        "phone_numbers": ["+35312345678"],
        "carrier_name": "Acme",
        "spid": "ACME",
        "support_key": "PO_abc123",
        "foc_date": "2024-05-01T00:00:00Z"
    })
}

#[tokio::test]
async fn porting_order_lifecycle() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/porting_orders"))
        .and(body_json(json!({
            "phone_numbers": ["+13035550000"],
            "customer_reference": "ref-1"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": [order_json(id, "draft")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/porting_orders/{id}")))
        .and(body_json(json!({
            "activation_settings": {"foc_datetime_requested": "2024-06-03T15:00:00Z"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": order_json(id, "draft")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    for (action, status) in [
        ("submit", "submitted"),
        ("confirm", "foc-date-confirmed"),
        ("cancel", "cancel-pending"),
    ] {
        Mock::given(method("POST"))
            .and(path(format!("/porting_orders/{id}/actions/{action}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": order_json(id, status)})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("DELETE"))
        .and(path(format!("/porting_orders/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client.porting_orders();

    let created = orders
        .create(CreatePortingOrderParams::new(["+13035550000"]).with_customer_reference("ref-1"))
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].status_value(), PortingOrderStatusValue::Draft);

    let foc = "2024-06-03T15:00:00Z".parse().unwrap();
    orders
        .update(
            &id,
            UpdatePortingOrderParams::default().with_foc_datetime_requested(foc),
        )
        .await
        .unwrap();

    assert_eq!(
        orders.submit(&id).await.unwrap().status_value(),
        PortingOrderStatusValue::Submitted
    );
    assert_eq!(
        orders.confirm(&id).await.unwrap().status_value(),
        PortingOrderStatusValue::FocDateConfirmed
    );
    assert_eq!(
        orders.cancel(&id).await.unwrap().status_value(),
        PortingOrderStatusValue::CancelPending
    );
    orders.delete(&id).await.unwrap();
}

#[tokio::test]
async fn portout_status_update_and_listing() {
    let server = MockServer::start().await;
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path(format!("/portouts/{first}/authorized")))
        .and(body_json(json!({"reason": "Customer confirmed", "host_messaging": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": portout_json(first, "authorized")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portouts"))
        .and(query_param("filter[status]", "pending"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [portout_json(first, "pending")],
            "meta": {"page_number": 1, "page_size": 1, "total_pages": 2, "total_results": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portouts"))
        .and(query_param("filter[status]", "pending"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [portout_json(second, "pending")],
            "meta": {"page_number": 2, "page_size": 1, "total_pages": 2, "total_results": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let updated = client
        .portouts()
        .update_status(
            &first,
            PortoutStatusUpdate::Authorized,
            UpdatePortoutStatusParams::new("Customer confirmed").with_host_messaging(true),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, PortoutStatus::Authorized);

    let pending: Vec<_> = client
        .portouts()
        .list_all(
            ListPortoutsParams::default()
                .with_status(PortoutStatus::Pending)
                .with_page(PageParams::new(1, 1)),
        )
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    let ids: Vec<Uuid> = pending.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn missing_portout_is_not_found() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/portouts/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{
                "code": "10005",
                "title": "Resource not found",
                "detail": "The requested resource or URL could not be found."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.portouts().retrieve(&id).await.unwrap_err();
    let api = err.as_api().expect("api error");
    assert!(api.is_not_found());
    assert_eq!(api.code.as_deref(), Some("10005"));
    assert_eq!(api.errors.len(), 1);
}
