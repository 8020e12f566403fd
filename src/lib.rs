//! Typed Rust SDK for the Telnyx REST API (v2).
//!
//! ```rust,no_run
//! use telnyx::{Client, SendMessageParams};
//!
//! # async fn run() -> telnyx::Result<()> {
//! let client = Client::from_env()?;
//! let message = client
//!     .messages()
//!     .send(SendMessageParams::text("+13125550002", "hello").with_from("+13125550001"))
//!     .await?;
//! println!("queued {}", message.id);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::result_large_err)]

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.telnyx.com/v2";

/// Default value of the client identification header.
pub(crate) const DEFAULT_CLIENT_HEADER: &str = concat!("telnyx-rust/", env!("CARGO_PKG_VERSION"));

/// Header carrying the client identification string.
pub(crate) const CLIENT_HEADER: &str = "X-Telnyx-Client";

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (60 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Response header carrying the server-side request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request header used for idempotent retries of mutating calls.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TELNYX_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "TELNYX_BASE_URL";

#[macro_use]
mod enums;

mod client;
mod core;
mod errors;
mod http;
mod pagination;
pub mod query;
pub mod resources;
mod telemetry;
#[doc(hidden)]
pub mod testing;
pub mod webhooks;

#[cfg(feature = "blocking")]
mod blocking;

pub use client::{Client, Config, PageStream};
pub use crate::core::ApiRequest;
pub use enums::{Direction, PhoneNumberType};
pub use errors::{
    ApiError, ApiErrorDetail, Error, ErrorSource, Result, TransportError, TransportErrorKind,
    ValidationError,
};
pub use http::{HeaderEntry, HeaderList, RequestOptions};
pub use pagination::{DataResponse, ListResponse, PageParams, PaginationMeta};
pub use telemetry::{HttpRequestMetrics, MetricsCallbacks, RequestContext};

pub use resources::{
    available_phone_numbers::{
        AvailableNumberFilter, AvailablePhoneNumber, AvailablePhoneNumbersClient,
        AvailablePhoneNumbersResponse, ListAvailablePhoneNumbersParams, NumberFeature,
    },
    balance::{Balance, BalanceClient},
    calls::{
        AnswerParams, AnsweringMachineDetection, BridgeParams, Call, CallActionResult,
        CallsClient, DialParams, HangupParams, SpeakParams, TransferParams,
    },
    messages::{
        GroupMmsParams, Message, MessageStatus, MessageType, MessagesClient, SendMessageParams,
    },
    messaging_profiles::{
        CreateMessagingProfileParams, ListMessagingProfilesParams, MessagingProfile,
        MessagingProfilesClient, UpdateMessagingProfileParams, WebhookApiVersion,
    },
    number_orders::{
        CreateNumberOrderParams, ListNumberOrdersParams, NumberOrder, NumberOrderStatus,
        NumberOrdersClient,
    },
    phone_numbers::{
        ListPhoneNumbersParams, PhoneNumber, PhoneNumberFilter, PhoneNumberStatus,
        PhoneNumbersClient, UpdatePhoneNumberParams,
    },
    porting_orders::{
        CreatePortingOrderParams, ListPortingOrdersParams, PortingOrder, PortingOrderStatus,
        PortingOrderStatusValue, PortingOrdersClient, UpdatePortingOrderParams,
    },
    portouts::{
        ListPortoutsParams, Portout, PortoutStatus, PortoutStatusUpdate, PortoutsClient,
        UpdatePortoutStatusParams,
    },
    rooms::{CreateRoomParams, ListRoomsParams, Room, RoomsClient, UpdateRoomParams},
    sim_cards::{
        ListSimCardsParams, SimCard, SimCardAction, SimCardStatusValue, SimCardsClient,
        UpdateSimCardParams,
    },
    DateRange, StringMatch,
};

pub use webhooks::{parse_event, WebhookEvent, WebhookEventType, WebhookPayload};

#[cfg(feature = "blocking")]
pub use blocking::{
    BlockingAvailablePhoneNumbersClient, BlockingBalanceClient, BlockingCallsClient,
    BlockingClient, BlockingConfig, BlockingMessagesClient, BlockingMessagingProfilesClient,
    BlockingNumberOrdersClient, BlockingPhoneNumbersClient, BlockingPortingOrdersClient,
    BlockingPortoutsClient, BlockingRoomsClient, BlockingSimCardsClient, PageIter,
};
