//! Typed webhook envelopes.
//!
//! Telnyx delivers every event as `{"data": {...}, "meta": {...}}`. The
//! `payload` inside `data` has no discriminator of its own, so
//! [`WebhookPayload`] tries each known shape in order and keeps the first
//! that fits. Payloads that match none of them are kept as raw JSON.
//!
//! Signature verification is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{Error, Result},
    resources::{
        messages::Message,
        null_default,
        porting_orders::PortingOrderStatus,
        portouts::PortoutStatus,
    },
};

string_enum! {
    /// Published `event_type` values, grouped by family.
    pub enum WebhookEventType {
        CallInitiated => "call.initiated",
        CallAnswered => "call.answered",
        CallHangup => "call.hangup",
        CallBridged => "call.bridged",
        CallEnqueued => "call.enqueued",
        CallDequeued => "call.dequeued",
        CallCost => "call.cost",
        CallConversationEnded => "call.conversation.ended",
        CallSpeakStarted => "call.speak.started",
        CallSpeakEnded => "call.speak.ended",
        CallGatherEnded => "call.gather.ended",
        CallAiGatherEnded => "call.ai_gather.ended",
        CallAiGatherPartialResults => "call.ai_gather.partial_results",
        CallMachineDetectionEnded => "call.machine.detection.ended",
        CallMachineGreetingEnded => "call.machine.greeting.ended",
        CallMachinePremiumDetectionEnded => "call.machine.premium.detection.ended",
        CallMachinePremiumGreetingEnded => "call.machine.premium.greeting.ended",
        CallDtmfReceived => "call.dtmf.received",
        CallPlaybackStarted => "call.playback.started",
        CallPlaybackEnded => "call.playback.ended",
        CallRecordingSaved => "call.recording.saved",
        CallRecordingError => "call.recording.error",
        CallRecordingTranscriptionSaved => "call.recording.transcription.saved",
        CallForkStarted => "call.fork.started",
        CallForkStopped => "call.fork.stopped",
        CallStreamingStarted => "call.streaming.started",
        CallStreamingStopped => "call.streaming.stopped",
        CallStreamingFailed => "call.streaming.failed",
        CallReferStarted => "call.refer.started",
        CallReferCompleted => "call.refer.completed",
        CallReferFailed => "call.refer.failed",
        CallSiprecStarted => "call.siprec.started",
        CallSiprecStopped => "call.siprec.stopped",
        CallSiprecFailed => "call.siprec.failed",
        ConferenceCreated => "conference.created",
        ConferenceEnded => "conference.ended",
        ConferenceFloorChanged => "conference.floor.changed",
        ConferenceParticipantJoined => "conference.participant.joined",
        ConferenceParticipantLeft => "conference.participant.left",
        ConferenceParticipantPlaybackStarted => "conference.participant.playback.started",
        ConferenceParticipantPlaybackEnded => "conference.participant.playback.ended",
        ConferenceParticipantSpeakStarted => "conference.participant.speak.started",
        ConferenceParticipantSpeakEnded => "conference.participant.speak.ended",
        ConferencePlaybackStarted => "conference.playback.started",
        ConferencePlaybackEnded => "conference.playback.ended",
        ConferenceSpeakStarted => "conference.speak.started",
        ConferenceSpeakEnded => "conference.speak.ended",
        ConferenceRecordingSaved => "conference.recording.saved",
        MessageSent => "message.sent",
        MessageFinalized => "message.finalized",
        MessageReceived => "message.received",
        FaxQueued => "fax.queued",
        FaxMediaProcessed => "fax.media.processed",
        FaxSendingStarted => "fax.sending.started",
        FaxDelivered => "fax.delivered",
        FaxFailed => "fax.failed",
        FaxReceived => "fax.received",
        NumberOrderComplete => "number_order.complete",
        PortingOrderStatusChanged => "porting_order.status_changed",
        PortingOrderNewComment => "porting_order.new_comment",
        PortingOrderSplit => "porting_order.split",
        PortingOrderDeleted => "porting_order.deleted",
        PortingOrderLoaUpdated => "porting_order.loa_updated",
        PortingOrderMessagingChanged => "porting_order.messaging_changed",
        PortingOrderSharingTokenExpired => "porting_order.sharing_token_expired",
        PortoutStatusChanged => "portout.status_changed",
        PortoutNewComment => "portout.new_comment",
        PortoutFocDateChanged => "portout.foc_date_changed",
        VideoRoomSessionStarted => "video.room.session.started",
        VideoRoomSessionEnded => "video.room.session.ended",
        VideoRoomParticipantJoined => "video.room.participant.joined",
        VideoRoomParticipantLeft => "video.room.participant.left",
        VideoRoomRecordingSaved => "video.room.recording.saved",
        VideoRoomCompositionCompleted => "video.room.composition.completed",
    }
}

impl WebhookEventType {
    /// Event family prefix (`call`, `message`, `portout`, ...).
    pub fn family(&self) -> &'static str {
        let wire = self.as_str();
        wire.split('.').next().unwrap_or(wire)
    }
}

/// Payload of `call.*` events.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CallEventPayload {
    pub call_control_id: String,
    pub call_leg_id: String,
    pub call_session_id: String,
    pub connection_id: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub client_state: Option<String>,
    #[serde(default)]
    pub hangup_cause: Option<String>,
    #[serde(default)]
    pub hangup_source: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// `human`, `machine`, ... on machine detection events.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub digit: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct IdRef {
    pub id: Uuid,
}

/// `porting_order.split`: numbers moved from one order into a new one.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingOrderSplitPayload {
    pub from: IdRef,
    pub to: IdRef,
    pub porting_phone_numbers: Vec<IdRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingComment {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub body: String,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub inserted_at: Option<DateTime<Utc>>,
}

/// `porting_order.new_comment`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingOrderCommentPayload {
    pub porting_order_id: Uuid,
    pub comment: PortingComment,
    #[serde(default)]
    pub support_key: Option<String>,
}

/// `porting_order.status_changed`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingOrderStatusChangedPayload {
    pub id: Uuid,
    pub status: PortingOrderStatus,
    #[serde(default)]
    pub customer_reference: Option<String>,
    #[serde(default)]
    pub support_key: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `portout.new_comment`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortoutCommentPayload {
    pub portout_id: Uuid,
    pub comment: String,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `portout.status_changed`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortoutStatusChangedPayload {
    pub id: Uuid,
    pub status: PortoutStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub carrier_name: Option<String>,
    #[serde(default)]
    pub spid: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub attempted_pin: Option<String>,
}

/// `portout.foc_date_changed`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortoutFocDateChangedPayload {
    pub id: Uuid,
    pub foc_date: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Event payload, matched structurally in declaration order.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum WebhookPayload {
    Call(CallEventPayload),
    Message(Box<Message>),
    PortingOrderSplit(PortingOrderSplitPayload),
    PortingOrderComment(PortingOrderCommentPayload),
    PortingOrderStatusChanged(PortingOrderStatusChangedPayload),
    PortoutComment(PortoutCommentPayload),
    PortoutStatusChanged(PortoutStatusChangedPayload),
    PortoutFocDateChanged(PortoutFocDateChangedPayload),
    Other(serde_json::Value),
}

impl WebhookPayload {
    pub fn as_call(&self) -> Option<&CallEventPayload> {
        match self {
            WebhookPayload::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            WebhookPayload::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, WebhookPayload::Other(_))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EventData {
    pub id: Uuid,
    pub event_type: WebhookEventType,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub record_type: Option<String>,
    pub payload: WebhookPayload,
}

/// Delivery metadata.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EventMeta {
    #[serde(default)]
    pub attempt: Option<u32>,
    #[serde(default)]
    pub delivered_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WebhookEvent {
    pub data: EventData,
    #[serde(default)]
    pub meta: Option<EventMeta>,
}

impl WebhookEvent {
    pub fn event_type(&self) -> WebhookEventType {
        self.data.event_type
    }

    pub fn payload(&self) -> &WebhookPayload {
        &self.data.payload
    }
}

/// Parse a raw webhook request body.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent> {
    serde_json::from_slice(body).map_err(Error::Serialization)
}
