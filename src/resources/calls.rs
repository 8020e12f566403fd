//! Call Control: outbound dialing and commands on live call legs.
//!
//! Every command addresses a leg by its `call_control_id`, the opaque handle
//! returned by [`CallsClient::dial`] or delivered in `call.initiated` webhooks.

use serde::{Deserialize, Serialize};

use crate::{
    client::Service,
    core::{path_param, require, ApiRequest},
    errors::Result,
    http::RequestOptions,
};

string_enum! {
    pub enum AnsweringMachineDetection {
        Premium => "premium",
        Detect => "detect",
        DetectBeep => "detect_beep",
        DetectWords => "detect_words",
        GreetingEnd => "greeting_end",
        Disabled => "disabled",
    }
}

string_enum! {
    pub enum SpeakPayloadType {
        Text => "text",
        Ssml => "ssml",
    }
}

string_enum! {
    /// Text-to-speech engine tier.
    pub enum ServiceLevel {
        Basic => "basic",
        Premium => "premium",
    }
}

string_enum! {
    pub enum WebhookUrlMethod {
        Post => "POST",
        Get => "GET",
    }
}

/// Custom SIP header sent on the outbound INVITE.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomSipHeader {
    pub name: String,
    pub value: String,
}

impl CustomSipHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parameters for `POST /calls`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DialParams {
    pub connection_id: String,
    pub to: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answering_machine_detection: Option<AnsweringMachineDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_headers: Vec<CustomSipHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url_method: Option<WebhookUrlMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to: Option<String>,
}

impl DialParams {
    pub fn new(
        connection_id: impl Into<String>,
        to: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            to: to.into(),
            from: from.into(),
            from_display_name: None,
            timeout_secs: None,
            time_limit_secs: None,
            answering_machine_detection: None,
            audio_url: None,
            client_state: None,
            command_id: None,
            custom_headers: Vec::new(),
            webhook_url: None,
            webhook_url_method: None,
            link_to: None,
        }
    }

    pub fn with_from_display_name(mut self, name: impl Into<String>) -> Self {
        self.from_display_name = Some(name.into());
        self
    }

    /// Seconds to wait for the callee to answer.
    pub fn with_timeout_secs(mut self, secs: u32) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Hard limit on the call duration once answered.
    pub fn with_time_limit_secs(mut self, secs: u32) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    pub fn with_answering_machine_detection(mut self, mode: AnsweringMachineDetection) -> Self {
        self.answering_machine_detection = Some(mode);
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Opaque state echoed back on every webhook for this leg (base64).
    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push(CustomSipHeader::new(name, value));
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>, method: WebhookUrlMethod) -> Self {
        self.webhook_url = Some(url.into());
        self.webhook_url_method = Some(method);
        self
    }

    /// Join the new leg to the session of an existing one.
    pub fn with_link_to(mut self, call_control_id: impl Into<String>) -> Self {
        self.link_to = Some(call_control_id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.connection_id, "connection_id")?;
        require(&self.to, "to")?;
        require(&self.from, "from")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AnswerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl AnswerParams {
    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HangupParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl HangupParams {
    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }
}

/// Text-to-speech on a live call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpeakParams {
    pub payload: String,
    /// `male`, `female`, or a provider voice id such as `Polly.Joanna`.
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<SpeakPayloadType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_level: Option<ServiceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl SpeakParams {
    pub fn new(payload: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            voice: voice.into(),
            language: None,
            payload_type: None,
            service_level: None,
            stop: None,
            client_state: None,
            command_id: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_payload_type(mut self, payload_type: SpeakPayloadType) -> Self {
        self.payload_type = Some(payload_type);
        self
    }

    pub fn with_service_level(mut self, level: ServiceLevel) -> Self {
        self.service_level = Some(level);
        self
    }

    /// Stop current audio on the leg (`current` or `all`) before speaking.
    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.payload, "payload")?;
        require(&self.voice, "voice")?;
        Ok(())
    }
}

/// Blind transfer of a live call to a new destination.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransferParams {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answering_machine_detection: Option<AnsweringMachineDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_headers: Vec<CustomSipHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url_method: Option<WebhookUrlMethod>,
}

impl TransferParams {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            from_display_name: None,
            timeout_secs: None,
            answering_machine_detection: None,
            audio_url: None,
            custom_headers: Vec::new(),
            client_state: None,
            command_id: None,
            webhook_url: None,
            webhook_url_method: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_from_display_name(mut self, name: impl Into<String>) -> Self {
        self.from_display_name = Some(name.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u32) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_answering_machine_detection(mut self, mode: AnsweringMachineDetection) -> Self {
        self.answering_machine_detection = Some(mode);
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push(CustomSipHeader::new(name, value));
        self
    }

    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>, method: WebhookUrlMethod) -> Self {
        self.webhook_url = Some(url.into());
        self.webhook_url_method = Some(method);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.to, "to")
    }
}

/// Bridge the addressed call with another live leg.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BridgeParams {
    /// The leg to bridge with.
    pub call_control_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub park_after_unbridge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl BridgeParams {
    pub fn new(call_control_id: impl Into<String>) -> Self {
        Self {
            call_control_id: call_control_id.into(),
            park_after_unbridge: None,
            client_state: None,
            command_id: None,
        }
    }

    /// Park the other leg instead of hanging it up when the bridge ends (`self`).
    pub fn with_park_after_unbridge(mut self, value: impl Into<String>) -> Self {
        self.park_after_unbridge = Some(value.into());
        self
    }

    pub fn with_client_state(mut self, state: impl Into<String>) -> Self {
        self.client_state = Some(state.into());
        self
    }

    pub fn with_command_id(mut self, id: impl Into<String>) -> Self {
        self.command_id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.call_control_id, "call_control_id")
    }
}

/// A call leg as returned by dial and status lookups.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Call {
    pub call_control_id: String,
    #[serde(default)]
    pub call_leg_id: Option<String>,
    #[serde(default)]
    pub call_session_id: Option<String>,
    #[serde(default)]
    pub is_alive: Option<bool>,
    #[serde(default)]
    pub record_type: Option<String>,
    /// Seconds since the leg was answered.
    #[serde(default)]
    pub call_duration: Option<u64>,
    #[serde(default)]
    pub client_state: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Acknowledgement returned by call commands (`{"result": "ok"}`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CallActionResult {
    pub result: String,
}

impl CallActionResult {
    pub fn is_ok(&self) -> bool {
        self.result.eq_ignore_ascii_case("ok")
    }
}

pub(crate) fn dial_request(params: &DialParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/calls").with_json(params)
}

pub(crate) fn retrieve_status_request(call_control_id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(format!(
        "/calls/{}",
        path_param(call_control_id, "call_control_id")?
    )))
}

pub(crate) fn action_request<T: Serialize>(
    call_control_id: &str,
    action: &str,
    params: &T,
) -> Result<ApiRequest> {
    let id = path_param(call_control_id, "call_control_id")?;
    ApiRequest::post(format!("/calls/{id}/actions/{action}")).with_json(params)
}

pub(crate) fn speak_request(call_control_id: &str, params: &SpeakParams) -> Result<ApiRequest> {
    params.validate()?;
    action_request(call_control_id, "speak", params)
}

pub(crate) fn transfer_request(call_control_id: &str, params: &TransferParams) -> Result<ApiRequest> {
    params.validate()?;
    action_request(call_control_id, "transfer", params)
}

pub(crate) fn bridge_request(call_control_id: &str, params: &BridgeParams) -> Result<ApiRequest> {
    params.validate()?;
    action_request(call_control_id, "bridge", params)
}

#[derive(Clone)]
pub struct CallsClient {
    service: Service,
}

impl CallsClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    /// Place an outbound call.
    pub async fn dial(&self, params: DialParams) -> Result<Call> {
        self.service.data(dial_request(&params)?).await
    }

    pub async fn retrieve_status(&self, call_control_id: &str) -> Result<Call> {
        self.service
            .data(retrieve_status_request(call_control_id)?)
            .await
    }

    pub async fn answer(
        &self,
        call_control_id: &str,
        params: AnswerParams,
    ) -> Result<CallActionResult> {
        self.service
            .data(action_request(call_control_id, "answer", &params)?)
            .await
    }

    pub async fn hangup(
        &self,
        call_control_id: &str,
        params: HangupParams,
    ) -> Result<CallActionResult> {
        self.service
            .data(action_request(call_control_id, "hangup", &params)?)
            .await
    }

    pub async fn speak(&self, call_control_id: &str, params: SpeakParams) -> Result<CallActionResult> {
        self.service
            .data(speak_request(call_control_id, &params)?)
            .await
    }

    pub async fn transfer(
        &self,
        call_control_id: &str,
        params: TransferParams,
    ) -> Result<CallActionResult> {
        self.service
            .data(transfer_request(call_control_id, &params)?)
            .await
    }

    pub async fn bridge(
        &self,
        call_control_id: &str,
        params: BridgeParams,
    ) -> Result<CallActionResult> {
        self.service
            .data(bridge_request(call_control_id, &params)?)
            .await
    }
}
