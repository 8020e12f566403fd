//! Webhook envelopes as delivered to a receiving endpoint.

use telnyx::{parse_event, Error, MessageStatus, WebhookEventType, WebhookPayload};

#[test]
fn inbound_message_delivery_report() {
    let body = br#"{
        "data": {
            "id": "86f58db9-0734-4ea8-a9e6-5d28e4eb4b4c",
            "event_type": "message.finalized",
            "occurred_at": "2024-03-01T12:00:00.000+00:00",
            "record_type": "event",
            "payload": {
                "id": "40385f64-5717-4562-b3fc-2c963f66afa6",
                "record_type": "message",
                "direction": "outbound",
                "type": "SMS",
                "from": {"phone_number": "+13125550001"},
                "to": [{"phone_number": "+13125550002", "status": "delivered"}],
                "text": "hello",
                "tags": null
            }
        },
        "meta": {"attempt": 1, "delivered_to": "https://hooks.test/sms"}
    }"#;

    let event = parse_event(body).expect("message webhook should parse");
    assert_eq!(event.event_type(), WebhookEventType::MessageFinalized);
    let message = event.payload().as_message().expect("message payload");
    assert_eq!(message.status(), Some(MessageStatus::Delivered));
    assert_eq!(event.meta.as_ref().and_then(|m| m.attempt), Some(1));
}

#[test]
fn inbound_message_received() {
    let body = br#"{
        "data": {
            "id": "b301ed3f-1490-491f-995f-6e64e69674d4",
            "event_type": "message.received",
            "occurred_at": "2024-03-01T12:00:00.000+00:00",
            "record_type": "event",
            "payload": {
                "id": "84cca175-9755-4859-b67f-4730d7f58aa3",
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
                "encoding": "GSM-7",
                "received_at": "2024-03-01T12:00:00.000+00:00"
            }
        },
        "meta": {"attempt": 1, "delivered_to": "https://hooks.test/sms"}
    }"#;

    let event = parse_event(body).expect("inbound message webhook should parse");
    assert_eq!(event.event_type(), WebhookEventType::MessageReceived);
    let message = event.payload().as_message().expect("message payload");
    assert_eq!(message.status(), Some(MessageStatus::WebhookDelivered));
    assert_eq!(message.text.as_deref(), Some("hi back"));
}

fn envelope(event_type: &str, payload: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "data": {
            "id": "e3b3c5a4-2a6f-4a0e-8b0a-6d3f7d0b7f10",
            "event_type": event_type,
            "occurred_at": "2024-03-01T12:00:00Z",
            "payload": payload
        }
    }))
    .unwrap()
}

#[test]
fn every_event_family_parses() {
    let cases = [
        ("call.recording.error", "call"),
        ("conference.participant.joined", "conference"),
        ("fax.delivered", "fax"),
        ("message.sent", "message"),
        ("number_order.complete", "number_order"),
        ("porting_order.loa_updated", "porting_order"),
        ("portout.foc_date_changed", "portout"),
        ("video.room.recording.saved", "video"),
    ];
    for (wire, family) in cases {
        let event = parse_event(&envelope(wire, serde_json::json!({"note": wire})))
            .unwrap_or_else(|err| panic!("{wire}: {err}"));
        assert_eq!(event.event_type().as_str(), wire);
        assert_eq!(event.event_type().family(), family);
        match event.payload() {
            WebhookPayload::Other(raw) => assert_eq!(raw["note"], wire),
            other => panic!("{wire}: expected raw payload, got {other:?}"),
        }
    }
}

#[test]
fn call_events_outside_the_basic_set_keep_call_fields() {
    let body = envelope(
        "call.gather.ended",
        serde_json::json!({
            "call_control_id": "v3:abc",
            "call_leg_id": "leg",
            "call_session_id": "session",
            "connection_id": "conn",
            "digits": "1234",
            "status": "valid"
        }),
    );
    let event = parse_event(&body).unwrap();
    assert_eq!(event.event_type(), WebhookEventType::CallGatherEnded);
    assert_eq!(event.payload().as_call().unwrap().call_control_id, "v3:abc");

    for wire in ["call.fork.started", "call.streaming.failed"] {
        assert!(parse_event(&envelope(wire, serde_json::json!({}))).is_ok(), "{wire}");
    }
}

#[test]
fn unmodelled_payload_falls_back_to_raw_json() {
    let body = br#"{
        "data": {
            "id": "e3b3c5a4-2a6f-4a0e-8b0a-6d3f7d0b7f10",
            "event_type": "video.room.session.started",
            "occurred_at": "2024-03-01T12:00:00Z",
            "payload": {"room_id": "0ccc7b54-4df3-4bca-a65a-3da1ecc777f0", "session_id": "s-1"}
        }
    }"#;

    let event = parse_event(body).unwrap();
    match event.payload() {
        WebhookPayload::Other(raw) => assert_eq!(raw["session_id"], "s-1"),
        other => panic!("expected raw payload, got {other:?}"),
    }
}

#[test]
fn unknown_event_type_is_rejected() {
    let body = br#"{
        "data": {
            "id": "e3b3c5a4-2a6f-4a0e-8b0a-6d3f7d0b7f10",
            "event_type": "call.teleported",
            "occurred_at": "2024-03-01T12:00:00Z",
            "payload": {}
        }
    }"#;

    assert!(matches!(parse_event(body), Err(Error::Serialization(_))));
}
