//! Outbound SMS/MMS and message records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::Service,
    core::{path_param, require, require_items, ApiRequest},
    enums::Direction,
    errors::{ApiErrorDetail, Result, ValidationError},
    http::RequestOptions,
    resources::{null_default, Cost},
};

string_enum! {
    pub enum MessageType {
        Sms => "SMS",
        Mms => "MMS",
    }
}

string_enum! {
    /// Per-recipient delivery status.
    pub enum MessageStatus {
        Queued => "queued",
        Sending => "sending",
        Sent => "sent",
        Expired => "expired",
        SendingFailed => "sending_failed",
        DeliveryUnconfirmed => "delivery_unconfirmed",
        Delivered => "delivered",
        DeliveryFailed => "delivery_failed",
        GatewayTimeout => "gw_timeout",
        WebhookDelivered => "webhook_delivered",
    }
}

/// Parameters for `POST /messages`.
///
/// Build with [`SendMessageParams::text`] or [`SendMessageParams::media`] and
/// pick a sender with `with_from` or `with_messaging_profile_id`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendMessageParams {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_profile_webhooks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detect: Option<bool>,
}

impl SendMessageParams {
    fn empty(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            messaging_profile_id: None,
            text: None,
            subject: None,
            media_urls: None,
            message_type: None,
            webhook_url: None,
            webhook_failover_url: None,
            use_profile_webhooks: None,
            auto_detect: None,
        }
    }

    /// A text message to `to`.
    pub fn text(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::empty(to)
        }
    }

    /// An MMS carrying `media_urls`.
    pub fn media(to: impl Into<String>, media_urls: Vec<String>) -> Self {
        Self {
            media_urls: Some(media_urls),
            message_type: Some(MessageType::Mms),
            ..Self::empty(to)
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_messaging_profile_id(mut self, id: impl Into<String>) -> Self {
        self.messaging_profile_id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_urls.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_webhook_failover_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_failover_url = Some(url.into());
        self
    }

    pub fn with_use_profile_webhooks(mut self, enabled: bool) -> Self {
        self.use_profile_webhooks = Some(enabled);
        self
    }

    pub fn with_auto_detect(mut self, enabled: bool) -> Self {
        self.auto_detect = Some(enabled);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.to, "to")?;
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_media = self.media_urls.as_ref().is_some_and(|m| !m.is_empty());
        if !has_text && !has_media {
            return Err(ValidationError::new("text or media_urls is required")
                .with_field("text")
                .into());
        }
        if let Some(urls) = &self.media_urls {
            for url in urls {
                require(url, "media_urls")?;
            }
        }
        let has_from = self.from.as_deref().is_some_and(|f| !f.trim().is_empty());
        let has_profile = self
            .messaging_profile_id
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if !has_from && !has_profile {
            return Err(ValidationError::new("from or messaging_profile_id is required")
                .with_field("from")
                .into());
        }
        Ok(())
    }
}

/// Sender side of a message.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageEndpoint {
    pub phone_number: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub line_type: Option<String>,
}

/// One recipient of a message, with its delivery status.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageRecipient {
    pub phone_number: String,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub line_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MessageMedia {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A message record (outbound or inbound).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub record_type: Option<String>,
    pub direction: Direction,
    #[serde(rename = "type", default)]
    pub message_type: Option<MessageType>,
    pub from: MessageEndpoint,
    pub to: Vec<MessageRecipient>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub media: Vec<MessageMedia>,
    #[serde(default)]
    pub parts: Option<u32>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub cost: Option<Cost>,
    #[serde(default)]
    pub messaging_profile_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub webhook_failover_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

impl Message {
    /// Delivery status of the first recipient, if reported.
    pub fn status(&self) -> Option<MessageStatus> {
        self.to.first().and_then(|r| r.status)
    }
}

pub(crate) fn send_request(params: &SendMessageParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/messages").with_json(params)
}

pub(crate) fn retrieve_request(id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(format!("/messages/{}", path_param(id, "id")?)))
}

/// Send a group MMS (`POST /messages/group_mms`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupMmsParams {
    pub from: String,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl GroupMmsParams {
    pub fn new(from: impl Into<String>, to: Vec<String>) -> Self {
        Self {
            from: from.into(),
            to,
            text: None,
            subject: None,
            media_urls: None,
            webhook_url: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_media_url(mut self, url: impl Into<String>) -> Self {
        self.media_urls.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.from, "from")?;
        require_items(&self.to, "to")?;
        for recipient in &self.to {
            require(recipient, "to")?;
        }
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_media = self.media_urls.as_ref().is_some_and(|m| !m.is_empty());
        if !has_text && !has_media {
            return Err(ValidationError::new("text or media_urls is required")
                .with_field("text")
                .into());
        }
        Ok(())
    }
}

pub(crate) fn send_group_mms_request(params: &GroupMmsParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/messages/group_mms").with_json(params)
}

#[derive(Clone)]
pub struct MessagesClient {
    service: Service,
}

impl MessagesClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    /// Send an SMS or MMS.
    pub async fn send(&self, params: SendMessageParams) -> Result<Message> {
        self.service.data(send_request(&params)?).await
    }

    /// Send one MMS to several recipients as a group conversation.
    pub async fn send_group_mms(&self, params: GroupMmsParams) -> Result<Message> {
        self.service.data(send_group_mms_request(&params)?).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<Message> {
        self.service.data(retrieve_request(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde_json::json;

    #[test]
    fn send_omits_unset_fields() {
        let params = SendMessageParams::text("+13125550002", "hi").with_from("+13125550001");
        let req = send_request(&params).unwrap();
        assert_eq!(req.path(), "/messages");
        assert_eq!(
            req.body(),
            Some(&json!({"to": "+13125550002", "from": "+13125550001", "text": "hi"}))
        );
    }

    #[test]
    fn media_message_sets_mms_type() {
        let params = SendMessageParams::media("+13125550002", vec!["https://x.test/a.png".into()])
            .with_messaging_profile_id("profile-1");
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["type"], "MMS");
        assert_eq!(body["media_urls"], json!(["https://x.test/a.png"]));
        params.validate().unwrap();
    }

    #[test]
    fn send_requires_sender() {
        let err = send_request(&SendMessageParams::text("+13125550002", "hi")).unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.field.as_deref(), Some("from")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn send_requires_content() {
        let params = SendMessageParams::text("+13125550002", "").with_from("+13125550001");
        assert!(params.validate().is_err());
    }

    #[test]
    fn group_mms_requires_recipients() {
        let params = GroupMmsParams::new("+13125550001", vec![]).with_text("hey");
        assert!(send_group_mms_request(&params).is_err());
    }

    #[test]
    fn group_mms_rejects_empty_text_without_media() {
        let params = GroupMmsParams::new("+13125550001", vec!["+13125550002".into()]).with_text("");
        match params.validate().unwrap_err() {
            Error::Validation(v) => assert_eq!(v.field.as_deref(), Some("text")),
            other => panic!("unexpected: {other:?}"),
        }
        params
            .with_media_url("https://cdn.test/cat.gif")
            .validate()
            .unwrap();
    }

    #[test]
    fn message_deserializes_with_recipient_status() {
        let msg: Message = serde_json::from_value(json!({
            "id": "40385f64-5717-4562-b3fc-2c963f66afa6",
            "record_type": "message",
            "direction": "outbound",
            "type": "SMS",
            "from": {"phone_number": "+13125550001", "carrier": "Telnyx", "line_type": "Wireless"},
            "to": [{"phone_number": "+13125550002", "status": "queued"}],
            "text": "hi",
            "parts": 1,
            "cost": {"amount": "0.0051", "currency": "USD"}
        }))
        .unwrap();
        assert_eq!(msg.status(), Some(MessageStatus::Queued));
        assert_eq!(msg.direction, Direction::Outbound);
        assert_eq!(msg.cost.unwrap().amount, "0.0051");
    }
}
