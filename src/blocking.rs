//! Blocking client built on `reqwest::blocking`.
//!
//! Mirrors the async [`Client`](crate::Client) service for service: every
//! method builds the same [`ApiRequest`] through the shared request builders in
//! `resources`, then sends it on the calling thread.

use std::{collections::VecDeque, sync::Arc, time::Duration, time::Instant};

use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response},
    header::ACCEPT,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    client::{read_env, resolve_settings},
    core::{decode_json, join_url, ApiRequest},
    errors::{Error, Result, TransportError, TransportErrorKind},
    http::{
        header_pairs, parse_api_error_parts, request_id_from_headers, HeaderList, RequestOptions,
    },
    pagination::{DataResponse, ListResponse, PAGE_NUMBER_KEY},
    resources::{
        available_phone_numbers::{
            self, AvailablePhoneNumbersResponse, ListAvailablePhoneNumbersParams,
        },
        balance::{self, Balance},
        calls::{
            self, AnswerParams, BridgeParams, Call, CallActionResult, DialParams, HangupParams,
            SpeakParams, TransferParams,
        },
        messages::{self, GroupMmsParams, Message, SendMessageParams},
        messaging_profiles::{
            self, CreateMessagingProfileParams, ListMessagingProfilesParams, MessagingProfile,
            UpdateMessagingProfileParams,
        },
        number_orders::{self, CreateNumberOrderParams, ListNumberOrdersParams, NumberOrder},
        phone_numbers::{self, ListPhoneNumbersParams, PhoneNumber, UpdatePhoneNumberParams},
        porting_orders::{
            self, CreatePortingOrderParams, ListPortingOrdersParams, PortingOrder,
            UpdatePortingOrderParams,
        },
        portouts::{
            self, ListPortoutsParams, Portout, PortoutStatusUpdate, UpdatePortoutStatusParams,
        },
        rooms::{self, CreateRoomParams, ListRoomsParams, Room, UpdateRoomParams},
        sim_cards::{self, ListSimCardsParams, SimCard, SimCardAction, UpdateSimCardParams},
    },
    telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext, Telemetry},
    CLIENT_HEADER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};

#[derive(Clone, Debug, Default)]
pub struct BlockingConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub client_header: Option<String>,
    pub http_client: Option<HttpClient>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 60s).
    pub timeout: Option<Duration>,
    pub default_headers: Option<HeaderList>,
    pub metrics: Option<MetricsCallbacks>,
}

impl BlockingConfig {
    pub fn from_env() -> Result<Self> {
        let (api_key, base_url) = read_env()?;
        Ok(Self {
            api_key: Some(api_key),
            base_url,
            ..Default::default()
        })
    }
}

#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: String,
    api_key: String,
    client_header: String,
    http: HttpClient,
    request_timeout: Duration,
    default_headers: Option<HeaderList>,
    telemetry: Telemetry,
}

impl BlockingClient {
    pub fn new(cfg: BlockingConfig) -> Result<Self> {
        let (api_key, base_url, client_header) =
            resolve_settings(cfg.api_key, cfg.base_url, cfg.client_header)?;
        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http = match cfg.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .connect_timeout(connect_timeout)
                .build()
                .map_err(|err| TransportError {
                    kind: TransportErrorKind::Connect,
                    message: "failed to build http client".to_string(),
                    source: Some(err),
                })?,
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                api_key,
                client_header,
                http,
                request_timeout,
                default_headers: cfg.default_headers,
                telemetry: Telemetry::new(cfg.metrics),
            }),
        })
    }

    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(BlockingConfig {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BlockingConfig::from_env()?)
    }

    pub fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: RequestOptions,
    ) -> Result<T> {
        self.inner.execute(request, &options)
    }

    fn service(&self) -> BlockingService {
        BlockingService {
            inner: self.inner.clone(),
            options: RequestOptions::default(),
        }
    }

    pub fn balance(&self) -> BlockingBalanceClient {
        BlockingBalanceClient(self.service())
    }

    pub fn messages(&self) -> BlockingMessagesClient {
        BlockingMessagesClient(self.service())
    }

    pub fn messaging_profiles(&self) -> BlockingMessagingProfilesClient {
        BlockingMessagingProfilesClient(self.service())
    }

    pub fn calls(&self) -> BlockingCallsClient {
        BlockingCallsClient(self.service())
    }

    pub fn phone_numbers(&self) -> BlockingPhoneNumbersClient {
        BlockingPhoneNumbersClient(self.service())
    }

    pub fn available_phone_numbers(&self) -> BlockingAvailablePhoneNumbersClient {
        BlockingAvailablePhoneNumbersClient(self.service())
    }

    pub fn number_orders(&self) -> BlockingNumberOrdersClient {
        BlockingNumberOrdersClient(self.service())
    }

    pub fn porting_orders(&self) -> BlockingPortingOrdersClient {
        BlockingPortingOrdersClient(self.service())
    }

    pub fn portouts(&self) -> BlockingPortoutsClient {
        BlockingPortoutsClient(self.service())
    }

    pub fn rooms(&self) -> BlockingRoomsClient {
        BlockingRoomsClient(self.service())
    }

    pub fn sim_cards(&self) -> BlockingSimCardsClient {
        BlockingSimCardsClient(self.service())
    }
}

#[derive(Clone)]
struct BlockingService {
    inner: Arc<ClientInner>,
    options: RequestOptions,
}

impl BlockingService {
    fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.inner.execute(request, &self.options)
    }

    fn data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let resp: DataResponse<T> = self.call(request)?;
        Ok(resp.data)
    }

    fn empty(&self, request: ApiRequest) -> Result<()> {
        self.inner.send(&request, &self.options).map(|_| ())
    }

    fn paginate<T: DeserializeOwned>(&self, request: ApiRequest) -> PageIter<T> {
        PageIter {
            inner: self.inner.clone(),
            options: self.options.clone(),
            next: Some(request),
            buffered: VecDeque::new(),
        }
    }
}

/// Iterator over every item of a list endpoint; pages are fetched lazily.
///
/// A failed page fetch is yielded once as `Err` and ends the iteration.
pub struct PageIter<T> {
    inner: Arc<ClientInner>,
    options: RequestOptions,
    next: Option<ApiRequest>,
    buffered: VecDeque<T>,
}

impl<T: DeserializeOwned> Iterator for PageIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }
            let request = self.next.take()?;
            let page: ListResponse<T> = match self.inner.execute(request.clone(), &self.options) {
                Ok(page) => page,
                Err(err) => return Some(Err(err)),
            };
            self.next = page.next_page_number().map(|number| {
                let mut next = request;
                next.set_query_pair(PAGE_NUMBER_KEY, number.to_string());
                next
            });
            self.buffered.extend(page.data);
        }
    }
}

impl ClientInner {
    fn execute<T: DeserializeOwned>(&self, request: ApiRequest, options: &RequestOptions) -> Result<T> {
        let resp = self.send(&request, options)?;
        let bytes = resp
            .bytes()
            .map_err(|err| Error::Transport(TransportError::from_reqwest(err)))?;
        decode_json(&bytes)
    }

    fn build(&self, request: &ApiRequest, options: &RequestOptions) -> Result<RequestBuilder> {
        let url = join_url(&self.base_url, request.path())?;
        let mut builder = self.http.request(request.method().clone(), url);
        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        builder = builder
            .header(ACCEPT, "application/json")
            .header(CLIENT_HEADER, self.client_header.as_str())
            .bearer_auth(&self.api_key);
        if let Some(defaults) = &self.default_headers {
            for (name, value) in header_pairs(defaults)? {
                builder = builder.header(name, value);
            }
        }
        for (name, value) in header_pairs(&options.header_entries())? {
            builder = builder.header(name, value);
        }
        Ok(builder.timeout(options.timeout.unwrap_or(self.request_timeout)))
    }

    fn send(&self, request: &ApiRequest, options: &RequestOptions) -> Result<Response> {
        let builder = self.build(request, options)?;
        let ctx = RequestContext::new(request.method().as_str(), request.path());
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "telnyx.http",
            method = %ctx.method,
            path = %ctx.path
        )
        .entered();
        let start = Instant::now();

        match builder.send() {
            Ok(resp) => {
                let status = resp.status();
                let ctx = ctx.with_request_id(request_id_from_headers(resp.headers()));
                let failed = !status.is_success();
                self.telemetry.record_http(HttpRequestMetrics {
                    latency: start.elapsed(),
                    status: Some(status.as_u16()),
                    error: failed.then(|| format!("http {}", status.as_u16())),
                    context: ctx,
                });
                if !failed {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        status = %status,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "request completed"
                    );
                    return Ok(resp);
                }
                #[cfg(feature = "tracing")]
                tracing::warn!(status = %status, path = request.path(), "request failed");
                let headers = resp.headers().clone();
                let body = resp.text().unwrap_or_default();
                Err(parse_api_error_parts(status, &headers, body))
            }
            Err(err) => {
                self.telemetry.record_http(HttpRequestMetrics {
                    latency: start.elapsed(),
                    status: None,
                    error: Some(err.to_string()),
                    context: ctx,
                });
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, path = request.path(), "transport error");
                Err(TransportError::from_reqwest(err).into())
            }
        }
    }
}

#[derive(Clone)]
pub struct BlockingBalanceClient(BlockingService);

impl BlockingBalanceClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn retrieve(&self) -> Result<Balance> {
        self.0.data(balance::retrieve_request())
    }
}

#[derive(Clone)]
pub struct BlockingMessagesClient(BlockingService);

impl BlockingMessagesClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn send(&self, params: SendMessageParams) -> Result<Message> {
        self.0.data(messages::send_request(&params)?)
    }

    pub fn send_group_mms(&self, params: GroupMmsParams) -> Result<Message> {
        self.0.data(messages::send_group_mms_request(&params)?)
    }

    pub fn retrieve(&self, id: &str) -> Result<Message> {
        self.0.data(messages::retrieve_request(id)?)
    }
}

#[derive(Clone)]
pub struct BlockingMessagingProfilesClient(BlockingService);

impl BlockingMessagingProfilesClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListMessagingProfilesParams) -> Result<ListResponse<MessagingProfile>> {
        self.0.call(messaging_profiles::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListMessagingProfilesParams) -> Result<PageIter<MessagingProfile>> {
        Ok(self.0.paginate(messaging_profiles::list_request(&params)?))
    }

    pub fn create(&self, params: CreateMessagingProfileParams) -> Result<MessagingProfile> {
        self.0.data(messaging_profiles::create_request(&params)?)
    }

    pub fn retrieve(&self, id: &str) -> Result<MessagingProfile> {
        self.0.data(messaging_profiles::retrieve_request(id)?)
    }

    pub fn update(&self, id: &str, params: UpdateMessagingProfileParams) -> Result<MessagingProfile> {
        self.0.data(messaging_profiles::update_request(id, &params)?)
    }

    pub fn delete(&self, id: &str) -> Result<MessagingProfile> {
        self.0.data(messaging_profiles::delete_request(id)?)
    }
}

#[derive(Clone)]
pub struct BlockingCallsClient(BlockingService);

impl BlockingCallsClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn dial(&self, params: DialParams) -> Result<Call> {
        self.0.data(calls::dial_request(&params)?)
    }

    pub fn retrieve_status(&self, call_control_id: &str) -> Result<Call> {
        self.0.data(calls::retrieve_status_request(call_control_id)?)
    }

    pub fn answer(&self, call_control_id: &str, params: AnswerParams) -> Result<CallActionResult> {
        self.0
            .data(calls::action_request(call_control_id, "answer", &params)?)
    }

    pub fn hangup(&self, call_control_id: &str, params: HangupParams) -> Result<CallActionResult> {
        self.0
            .data(calls::action_request(call_control_id, "hangup", &params)?)
    }

    pub fn speak(&self, call_control_id: &str, params: SpeakParams) -> Result<CallActionResult> {
        self.0.data(calls::speak_request(call_control_id, &params)?)
    }

    pub fn transfer(
        &self,
        call_control_id: &str,
        params: TransferParams,
    ) -> Result<CallActionResult> {
        self.0.data(calls::transfer_request(call_control_id, &params)?)
    }

    pub fn bridge(&self, call_control_id: &str, params: BridgeParams) -> Result<CallActionResult> {
        self.0.data(calls::bridge_request(call_control_id, &params)?)
    }
}

#[derive(Clone)]
pub struct BlockingPhoneNumbersClient(BlockingService);

impl BlockingPhoneNumbersClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListPhoneNumbersParams) -> Result<ListResponse<PhoneNumber>> {
        self.0.call(phone_numbers::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListPhoneNumbersParams) -> Result<PageIter<PhoneNumber>> {
        Ok(self.0.paginate(phone_numbers::list_request(&params)?))
    }

    pub fn retrieve(&self, id: &str) -> Result<PhoneNumber> {
        self.0.data(phone_numbers::retrieve_request(id)?)
    }

    pub fn update(&self, id: &str, params: UpdatePhoneNumberParams) -> Result<PhoneNumber> {
        self.0.data(phone_numbers::update_request(id, &params)?)
    }

    pub fn delete(&self, id: &str) -> Result<PhoneNumber> {
        self.0.data(phone_numbers::delete_request(id)?)
    }
}

#[derive(Clone)]
pub struct BlockingAvailablePhoneNumbersClient(BlockingService);

impl BlockingAvailablePhoneNumbersClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(
        &self,
        params: ListAvailablePhoneNumbersParams,
    ) -> Result<AvailablePhoneNumbersResponse> {
        self.0.call(available_phone_numbers::list_request(&params)?)
    }
}

#[derive(Clone)]
pub struct BlockingNumberOrdersClient(BlockingService);

impl BlockingNumberOrdersClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn create(&self, params: CreateNumberOrderParams) -> Result<NumberOrder> {
        self.0.data(number_orders::create_request(&params)?)
    }

    pub fn list(&self, params: ListNumberOrdersParams) -> Result<ListResponse<NumberOrder>> {
        self.0.call(number_orders::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListNumberOrdersParams) -> Result<PageIter<NumberOrder>> {
        Ok(self.0.paginate(number_orders::list_request(&params)?))
    }

    pub fn retrieve(&self, id: &Uuid) -> Result<NumberOrder> {
        self.0.data(number_orders::retrieve_request(id)?)
    }
}

#[derive(Clone)]
pub struct BlockingPortingOrdersClient(BlockingService);

impl BlockingPortingOrdersClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListPortingOrdersParams) -> Result<ListResponse<PortingOrder>> {
        self.0.call(porting_orders::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListPortingOrdersParams) -> Result<PageIter<PortingOrder>> {
        Ok(self.0.paginate(porting_orders::list_request(&params)?))
    }

    pub fn create(&self, params: CreatePortingOrderParams) -> Result<Vec<PortingOrder>> {
        self.0.data(porting_orders::create_request(&params)?)
    }

    pub fn retrieve(&self, id: &Uuid) -> Result<PortingOrder> {
        self.0.data(porting_orders::retrieve_request(id)?)
    }

    pub fn update(&self, id: &Uuid, params: UpdatePortingOrderParams) -> Result<PortingOrder> {
        self.0.data(porting_orders::update_request(id, &params)?)
    }

    pub fn delete(&self, id: &Uuid) -> Result<()> {
        self.0.empty(porting_orders::delete_request(id)?)
    }

    pub fn submit(&self, id: &Uuid) -> Result<PortingOrder> {
        self.0.data(porting_orders::action_request(id, "submit")?)
    }

    pub fn cancel(&self, id: &Uuid) -> Result<PortingOrder> {
        self.0.data(porting_orders::action_request(id, "cancel")?)
    }

    pub fn confirm(&self, id: &Uuid) -> Result<PortingOrder> {
        self.0.data(porting_orders::action_request(id, "confirm")?)
    }
}

#[derive(Clone)]
pub struct BlockingPortoutsClient(BlockingService);

impl BlockingPortoutsClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListPortoutsParams) -> Result<ListResponse<Portout>> {
        self.0.call(portouts::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListPortoutsParams) -> Result<PageIter<Portout>> {
        Ok(self.0.paginate(portouts::list_request(&params)?))
    }

    pub fn retrieve(&self, id: &Uuid) -> Result<Portout> {
        self.0.data(portouts::retrieve_request(id)?)
    }

    pub fn update_status(
        &self,
        id: &Uuid,
        status: PortoutStatusUpdate,
        params: UpdatePortoutStatusParams,
    ) -> Result<Portout> {
        self.0
            .data(portouts::update_status_request(id, status, &params)?)
    }
}

#[derive(Clone)]
pub struct BlockingRoomsClient(BlockingService);

impl BlockingRoomsClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListRoomsParams) -> Result<ListResponse<Room>> {
        self.0.call(rooms::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListRoomsParams) -> Result<PageIter<Room>> {
        Ok(self.0.paginate(rooms::list_request(&params)?))
    }

    pub fn create(&self, params: CreateRoomParams) -> Result<Room> {
        self.0.data(rooms::create_request(&params)?)
    }

    pub fn retrieve(&self, room_id: &Uuid, include_sessions: bool) -> Result<Room> {
        self.0
            .data(rooms::retrieve_request(room_id, include_sessions)?)
    }

    pub fn update(&self, room_id: &Uuid, params: UpdateRoomParams) -> Result<Room> {
        self.0.data(rooms::update_request(room_id, &params)?)
    }

    pub fn delete(&self, room_id: &Uuid) -> Result<()> {
        self.0.empty(rooms::delete_request(room_id)?)
    }
}

#[derive(Clone)]
pub struct BlockingSimCardsClient(BlockingService);

impl BlockingSimCardsClient {
    pub fn with_options(self, options: RequestOptions) -> Self {
        Self(self.0.with_options(options))
    }

    pub fn list(&self, params: ListSimCardsParams) -> Result<ListResponse<SimCard>> {
        self.0.call(sim_cards::list_request(&params)?)
    }

    pub fn list_all(&self, params: ListSimCardsParams) -> Result<PageIter<SimCard>> {
        Ok(self.0.paginate(sim_cards::list_request(&params)?))
    }

    pub fn retrieve(&self, id: &Uuid) -> Result<SimCard> {
        self.0.data(sim_cards::retrieve_request(id)?)
    }

    pub fn update(&self, id: &Uuid, params: UpdateSimCardParams) -> Result<SimCard> {
        self.0.data(sim_cards::update_request(id, &params)?)
    }

    pub fn delete(&self, id: &Uuid) -> Result<SimCard> {
        self.0.data(sim_cards::delete_request(id)?)
    }

    pub fn enable(&self, id: &Uuid) -> Result<SimCardAction> {
        self.0.data(sim_cards::action_request(id, "enable")?)
    }

    pub fn disable(&self, id: &Uuid) -> Result<SimCardAction> {
        self.0.data(sim_cards::action_request(id, "disable")?)
    }
}
