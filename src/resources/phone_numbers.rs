//! Phone numbers owned by the account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::{PageStream, Service},
    core::{path_param, ApiRequest},
    enums::PhoneNumberType,
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::{null_default, StringMatch},
};

string_enum! {
    pub enum PhoneNumberStatus {
        PurchasePending => "purchase-pending",
        PurchaseFailed => "purchase-failed",
        PortPending => "port-pending",
        PortFailed => "port-failed",
        Active => "active",
        Deleted => "deleted",
        EmergencyOnly => "emergency-only",
        PortedOut => "ported-out",
        PortOutPending => "port-out-pending",
    }
}

string_enum! {
    pub enum PhoneNumberSort {
        PurchasedAt => "purchased_at",
        PhoneNumber => "phone_number",
        ConnectionName => "connection_name",
        UsagePaymentMethod => "usage_payment_method",
    }
}

/// `filter[number_type][eq]=...`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NumberTypeMatch {
    pub eq: PhoneNumberType,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PhoneNumberFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PhoneNumberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(
        rename = "voice.connection_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_connection_name: Option<StringMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_address_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_type: Option<NumberTypeMatch>,
}

impl PhoneNumberFilter {
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Partial match on the E.164 number.
    pub fn with_phone_number(mut self, number: impl Into<String>) -> Self {
        self.phone_number = Some(number.into());
        self
    }

    pub fn with_status(mut self, status: PhoneNumberStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_connection_id(mut self, id: impl Into<String>) -> Self {
        self.connection_id = Some(id.into());
        self
    }

    pub fn with_voice_connection_name(mut self, name: StringMatch) -> Self {
        self.voice_connection_name = Some(name);
        self
    }

    pub fn with_billing_group_id(mut self, id: impl Into<String>) -> Self {
        self.billing_group_id = Some(id.into());
        self
    }

    pub fn with_customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.customer_reference = Some(reference.into());
        self
    }

    pub fn with_number_type(mut self, number_type: PhoneNumberType) -> Self {
        self.number_type = Some(NumberTypeMatch { eq: number_type });
        self
    }
}

/// Query for `GET /phone_numbers`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListPhoneNumbersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PhoneNumberFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<PhoneNumberSort>,
}

impl ListPhoneNumbersParams {
    pub fn with_filter(mut self, filter: PhoneNumberFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_sort(mut self, sort: PhoneNumberSort) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Fields accepted by `PATCH /phone_numbers/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdatePhoneNumberParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hd_voice_enabled: Option<bool>,
}

impl UpdatePhoneNumberParams {
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_external_pin(mut self, pin: impl Into<String>) -> Self {
        self.external_pin = Some(pin.into());
        self
    }

    pub fn with_customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.customer_reference = Some(reference.into());
        self
    }

    pub fn with_connection_id(mut self, id: impl Into<String>) -> Self {
        self.connection_id = Some(id.into());
        self
    }

    pub fn with_billing_group_id(mut self, id: impl Into<String>) -> Self {
        self.billing_group_id = Some(id.into());
        self
    }

    pub fn with_hd_voice_enabled(mut self, enabled: bool) -> Self {
        self.hd_voice_enabled = Some(enabled);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PhoneNumber {
    pub id: String,
    #[serde(default)]
    pub record_type: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub status: Option<PhoneNumberStatus>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub external_pin: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub connection_name: Option<String>,
    #[serde(default)]
    pub customer_reference: Option<String>,
    #[serde(default)]
    pub messaging_profile_id: Option<String>,
    #[serde(default)]
    pub messaging_profile_name: Option<String>,
    #[serde(default)]
    pub billing_group_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub emergency_enabled: bool,
    #[serde(default)]
    pub emergency_address_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub call_forwarding_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub cnam_listing_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub caller_id_name_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub call_recording_enabled: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub t38_fax_gateway_enabled: bool,
    #[serde(default)]
    pub phone_number_type: Option<PhoneNumberType>,
    #[serde(default)]
    pub purchased_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn list_request(params: &ListPhoneNumbersParams) -> Result<ApiRequest> {
    ApiRequest::get("/phone_numbers").with_query(params)
}

pub(crate) fn retrieve_request(id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(format!("/phone_numbers/{}", path_param(id, "id")?)))
}

pub(crate) fn update_request(id: &str, params: &UpdatePhoneNumberParams) -> Result<ApiRequest> {
    ApiRequest::patch(format!("/phone_numbers/{}", path_param(id, "id")?)).with_json(params)
}

pub(crate) fn delete_request(id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(format!(
        "/phone_numbers/{}",
        path_param(id, "id")?
    )))
}

#[derive(Clone)]
pub struct PhoneNumbersClient {
    service: Service,
}

impl PhoneNumbersClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    /// Fetch one page.
    pub async fn list(&self, params: ListPhoneNumbersParams) -> Result<ListResponse<PhoneNumber>> {
        self.service.call(list_request(&params)?).await
    }

    /// Stream every number matching `params`, following pages until the last one.
    pub fn list_all(&self, params: ListPhoneNumbersParams) -> Result<PageStream<PhoneNumber>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn retrieve(&self, id: &str) -> Result<PhoneNumber> {
        self.service.data(retrieve_request(id)?).await
    }

    pub async fn update(&self, id: &str, params: UpdatePhoneNumberParams) -> Result<PhoneNumber> {
        self.service.data(update_request(id, &params)?).await
    }

    /// Release the number. Returns the record as it was at deletion.
    pub async fn delete(&self, id: &str) -> Result<PhoneNumber> {
        self.service.data(delete_request(id)?).await
    }
}
