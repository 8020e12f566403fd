//! Port-out requests: another carrier asking to take numbers away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{PageStream, Service},
    core::{require, uuid_param, ApiRequest},
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::null_default,
};

string_enum! {
    pub enum PortoutStatus {
        Pending => "pending",
        Authorized => "authorized",
        Ported => "ported",
        Rejected => "rejected",
        RejectedPending => "rejected-pending",
        Canceled => "canceled",
    }
}

string_enum! {
    /// Statuses a customer may move a pending port-out to.
    pub enum PortoutStatusUpdate {
        Authorized => "authorized",
        RejectedPending => "rejected-pending",
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Portout {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    pub status: PortoutStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub carrier_name: Option<String>,
    /// Service provider id of the gaining carrier.
    #[serde(default)]
    pub spid: Option<String>,
    #[serde(default)]
    pub support_key: Option<String>,
    #[serde(default)]
    pub pon: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub end_user_name: Option<String>,
    #[serde(default)]
    pub service_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    /// Links to the local service request documents.
    #[serde(default, deserialize_with = "null_default")]
    pub lsr: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub already_ported: bool,
    #[serde(default)]
    pub requested_foc_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub foc_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PortoutFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PortoutStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListPortoutsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PortoutFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListPortoutsParams {
    pub fn with_filter(mut self, filter: PortoutFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_status(mut self, status: PortoutStatus) -> Self {
        self.filter.get_or_insert_with(Default::default).status = Some(status);
        self
    }

    pub fn with_phone_number(mut self, number: impl Into<String>) -> Self {
        self.filter.get_or_insert_with(Default::default).phone_number = Some(number.into());
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

/// Body of `PATCH /portouts/{id}/{status}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdatePortoutStatusParams {
    pub reason: String,
    /// Keep messaging on Telnyx after the voice port completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_messaging: Option<bool>,
}

impl UpdatePortoutStatusParams {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            host_messaging: None,
        }
    }

    pub fn with_host_messaging(mut self, host: bool) -> Self {
        self.host_messaging = Some(host);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.reason, "reason")
    }
}

pub(crate) fn list_request(params: &ListPortoutsParams) -> Result<ApiRequest> {
    ApiRequest::get("/portouts").with_query(params)
}

pub(crate) fn retrieve_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::get(format!("/portouts/{}", uuid_param(id, "id")?)))
}

pub(crate) fn update_status_request(
    id: &Uuid,
    status: PortoutStatusUpdate,
    params: &UpdatePortoutStatusParams,
) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::patch(format!("/portouts/{}/{status}", uuid_param(id, "id")?)).with_json(params)
}

#[derive(Clone)]
pub struct PortoutsClient {
    service: Service,
}

impl PortoutsClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(&self, params: ListPortoutsParams) -> Result<ListResponse<Portout>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(&self, params: ListPortoutsParams) -> Result<PageStream<Portout>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn retrieve(&self, id: &Uuid) -> Result<Portout> {
        self.service.data(retrieve_request(id)?).await
    }

    /// Authorize or reject a pending port-out.
    pub async fn update_status(
        &self,
        id: &Uuid,
        status: PortoutStatusUpdate,
        params: UpdatePortoutStatusParams,
    ) -> Result<Portout> {
        self.service
            .data(update_status_request(id, status, &params)?)
            .await
    }
}
