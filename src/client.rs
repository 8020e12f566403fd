use std::{
    pin::Pin,
    sync::Arc,
    time::{Duration, Instant},
};

use futures_core::Stream;
use futures_util::{stream, StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::{
    core::{decode_json, join_url, ApiRequest},
    errors::{Error, Result, TransportError, TransportErrorKind},
    http::{
        header_pairs, parse_api_error_parts, request_id_from_headers, HeaderList, RequestOptions,
    },
    pagination::{DataResponse, ListResponse, PAGE_NUMBER_KEY},
    resources::{
        available_phone_numbers::AvailablePhoneNumbersClient, balance::BalanceClient,
        calls::CallsClient, messages::MessagesClient, messaging_profiles::MessagingProfilesClient,
        number_orders::NumberOrdersClient, phone_numbers::PhoneNumbersClient,
        porting_orders::PortingOrdersClient, portouts::PortoutsClient, rooms::RoomsClient,
        sim_cards::SimCardsClient,
    },
    telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext, Telemetry},
    API_KEY_ENV, BASE_URL_ENV, CLIENT_HEADER, DEFAULT_BASE_URL, DEFAULT_CLIENT_HEADER,
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};

/// Stream of items produced by walking every page of a list endpoint.
pub type PageStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Defaults to `https://api.telnyx.com/v2`.
    pub base_url: Option<String>,
    pub client_header: Option<String>,
    pub http_client: Option<reqwest::Client>,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 60s).
    pub timeout: Option<Duration>,
    /// Default extra headers applied to all requests.
    pub default_headers: Option<HeaderList>,
    /// Optional metrics callbacks (HTTP latency and outcome).
    pub metrics: Option<MetricsCallbacks>,
}

impl Config {
    /// Read `TELNYX_API_KEY` (required) and `TELNYX_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let (api_key, base_url) = read_env()?;
        Ok(Self {
            api_key: Some(api_key),
            base_url,
            ..Default::default()
        })
    }
}

pub(crate) fn read_env() -> Result<(String, Option<String>)> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{API_KEY_ENV} is not set")))?;
    let base_url = std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty());
    Ok((api_key, base_url))
}

/// Validate the API key and base URL shared by both client flavors.
pub(crate) fn resolve_settings(
    api_key: Option<String>,
    base_url: Option<String>,
    client_header: Option<String>,
) -> Result<(String, String, String)> {
    let api_key = api_key
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config("api key is required".to_string()))?;
    let base = base_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string();
    reqwest::Url::parse(&base).map_err(|err| Error::Config(format!("invalid base url: {err}")))?;
    let client_header = client_header
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CLIENT_HEADER.to_string());
    Ok((api_key, base, client_header))
}

/// Async Telnyx client. Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    base_url: String,
    api_key: String,
    client_header: String,
    http: reqwest::Client,
    request_timeout: Duration,
    default_headers: Option<HeaderList>,
    telemetry: Telemetry,
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
        let (api_key, base_url, client_header) =
            resolve_settings(cfg.api_key, cfg.base_url, cfg.client_header)?;
        let connect_timeout = cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
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

    /// Build a client for the production API with the given key.
    pub fn from_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(Config {
            api_key: Some(api_key.into()),
            ..Default::default()
        })
    }

    /// Build a client from `TELNYX_API_KEY` / `TELNYX_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    /// Send an arbitrary request and decode the response body as `T`.
    ///
    /// Use this for endpoints without a dedicated service method.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: RequestOptions,
    ) -> Result<T> {
        self.inner.execute(request, &options).await
    }

    fn service(&self) -> Service {
        Service {
            inner: self.inner.clone(),
            options: RequestOptions::default(),
        }
    }

    pub fn balance(&self) -> BalanceClient {
        BalanceClient::new(self.service())
    }

    pub fn messages(&self) -> MessagesClient {
        MessagesClient::new(self.service())
    }

    pub fn messaging_profiles(&self) -> MessagingProfilesClient {
        MessagingProfilesClient::new(self.service())
    }

    pub fn calls(&self) -> CallsClient {
        CallsClient::new(self.service())
    }

    pub fn phone_numbers(&self) -> PhoneNumbersClient {
        PhoneNumbersClient::new(self.service())
    }

    pub fn available_phone_numbers(&self) -> AvailablePhoneNumbersClient {
        AvailablePhoneNumbersClient::new(self.service())
    }

    pub fn number_orders(&self) -> NumberOrdersClient {
        NumberOrdersClient::new(self.service())
    }

    pub fn porting_orders(&self) -> PortingOrdersClient {
        PortingOrdersClient::new(self.service())
    }

    pub fn portouts(&self) -> PortoutsClient {
        PortoutsClient::new(self.service())
    }

    pub fn rooms(&self) -> RoomsClient {
        RoomsClient::new(self.service())
    }

    pub fn sim_cards(&self) -> SimCardsClient {
        SimCardsClient::new(self.service())
    }
}

/// Handle shared by every resource client: the transport plus per-call options.
#[derive(Clone)]
pub(crate) struct Service {
    inner: Arc<ClientInner>,
    options: RequestOptions,
}

impl Service {
    pub(crate) fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute and decode the whole body as `T`.
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.inner.execute(request, &self.options).await
    }

    /// Execute and unwrap a `{"data": T}` envelope.
    pub(crate) async fn data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let resp: DataResponse<T> = self.call(request).await?;
        Ok(resp.data)
    }

    /// Execute and discard the body.
    pub(crate) async fn empty(&self, request: ApiRequest) -> Result<()> {
        let _ = self.inner.send(request, &self.options).await?;
        Ok(())
    }

    pub(crate) fn paginate<T>(&self, request: ApiRequest) -> PageStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.inner.paginate(request, self.options.clone())
    }
}

fn apply_header_list(
    mut builder: reqwest::RequestBuilder,
    headers: &HeaderList,
) -> Result<reqwest::RequestBuilder> {
    for (name, value) in header_pairs(headers)? {
        builder = builder.header(name, value);
    }
    Ok(builder)
}

async fn fetch_page<T: DeserializeOwned>(
    inner: Arc<ClientInner>,
    options: RequestOptions,
    state: Option<ApiRequest>,
) -> Result<Option<(Vec<T>, Option<ApiRequest>)>> {
    let Some(request) = state else {
        return Ok(None);
    };
    let page: ListResponse<T> = inner.execute(request.clone(), &options).await?;
    let next = page.next_page_number().map(|number| {
        let mut next = request;
        next.set_query_pair(PAGE_NUMBER_KEY, number.to_string());
        next
    });
    Ok(Some((page.data, next)))
}

impl ClientInner {
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: &RequestOptions,
    ) -> Result<T> {
        let resp = self.send(request, options).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| Error::Transport(TransportError::from_reqwest(err)))?;
        decode_json(&bytes)
    }

    /// Walk every page of a list endpoint, starting from the page in `request`.
    pub(crate) fn paginate<T>(
        self: &Arc<Self>,
        request: ApiRequest,
        options: RequestOptions,
    ) -> PageStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let inner = self.clone();
        let pages = stream::try_unfold(Some(request), move |state| {
            fetch_page::<T>(inner.clone(), options.clone(), state)
        });
        pages
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
            .boxed()
    }

    fn build(
        &self,
        request: &ApiRequest,
        options: &RequestOptions,
    ) -> Result<reqwest::RequestBuilder> {
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
            builder = apply_header_list(builder, defaults)?;
        }
        builder = apply_header_list(builder, &options.header_entries())?;
        Ok(builder.timeout(options.timeout.unwrap_or(self.request_timeout)))
    }

    async fn send(
        &self,
        request: ApiRequest,
        options: &RequestOptions,
    ) -> Result<reqwest::Response> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "telnyx.http",
            method = %request.method(),
            path = %request.path()
        );
        let round_trip = self.round_trip(request, options);
        // Completion and failure events are emitted inside the span.
        #[cfg(feature = "tracing")]
        let round_trip = {
            use tracing::Instrument;
            round_trip.instrument(span)
        };
        round_trip.await
    }

    async fn round_trip(
        &self,
        request: ApiRequest,
        options: &RequestOptions,
    ) -> Result<reqwest::Response> {
        let builder = self.build(&request, options)?;
        let ctx = RequestContext::new(request.method().as_str(), request.path());
        let start = Instant::now();
        let result = builder.send().await;

        match result {
            Ok(resp) => {
                let status = resp.status();
                let ctx = ctx.with_request_id(request_id_from_headers(resp.headers()));
                if status.is_success() {
                    if self.telemetry.http_enabled() {
                        self.telemetry.record_http(HttpRequestMetrics {
                            latency: start.elapsed(),
                            status: Some(status.as_u16()),
                            error: None,
                            context: ctx,
                        });
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        status = %status,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "request completed"
                    );
                    return Ok(resp);
                }

                if self.telemetry.http_enabled() {
                    self.telemetry.record_http(HttpRequestMetrics {
                        latency: start.elapsed(),
                        status: Some(status.as_u16()),
                        error: Some(format!("http {}", status.as_u16())),
                        context: ctx,
                    });
                }
                #[cfg(feature = "tracing")]
                tracing::warn!(status = %status, path = request.path(), "request failed");
                let headers = resp.headers().clone();
                let body = resp.text().await.unwrap_or_default();
                Err(parse_api_error_parts(status, &headers, body))
            }
            Err(err) => {
                if self.telemetry.http_enabled() {
                    self.telemetry.record_http(HttpRequestMetrics {
                        latency: start.elapsed(),
                        status: None,
                        error: Some(err.to_string()),
                        context: ctx,
                    });
                }
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, path = request.path(), "transport error");
                Err(TransportError::from_reqwest(err).into())
            }
        }
    }
}
