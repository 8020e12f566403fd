//! Purchasing numbers found through available-number search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{PageStream, Service},
    core::{require, require_items, uuid_param, ApiRequest},
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::{null_default, DateRange},
};

string_enum! {
    pub enum NumberOrderStatus {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPhoneNumber {
    pub phone_number: String,
}

/// Body of `POST /number_orders`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateNumberOrderParams {
    pub phone_numbers: Vec<OrderPhoneNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
}

impl CreateNumberOrderParams {
    /// Order the given E.164 numbers.
    pub fn new<I, S>(phone_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phone_numbers: phone_numbers
                .into_iter()
                .map(|n| OrderPhoneNumber {
                    phone_number: n.into(),
                })
                .collect(),
            connection_id: None,
            messaging_profile_id: None,
            billing_group_id: None,
            customer_reference: None,
        }
    }

    pub fn with_connection_id(mut self, id: impl Into<String>) -> Self {
        self.connection_id = Some(id.into());
        self
    }

    pub fn with_messaging_profile_id(mut self, id: impl Into<String>) -> Self {
        self.messaging_profile_id = Some(id.into());
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

    pub fn validate(&self) -> Result<()> {
        require_items(&self.phone_numbers, "phone_numbers")?;
        for number in &self.phone_numbers {
            require(&number.phone_number, "phone_numbers.phone_number")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct NumberOrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NumberOrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements_met: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListNumberOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<NumberOrderFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListNumberOrdersParams {
    pub fn with_status(mut self, status: NumberOrderStatus) -> Self {
        self.filter.get_or_insert_with(Default::default).status = Some(status);
        self
    }

    pub fn with_created_at(mut self, range: DateRange) -> Self {
        self.filter.get_or_insert_with(Default::default).created_at = Some(range);
        self
    }

    pub fn with_customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.filter.get_or_insert_with(Default::default).customer_reference =
            Some(reference.into());
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

/// One number inside an order, with its own fulfilment status.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NumberOrderPhoneNumber {
    #[serde(default)]
    pub id: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub status: Option<NumberOrderStatus>,
    #[serde(default)]
    pub requirements_met: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NumberOrder {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub phone_numbers: Vec<NumberOrderPhoneNumber>,
    #[serde(default)]
    pub phone_numbers_count: Option<u32>,
    #[serde(default)]
    pub status: Option<NumberOrderStatus>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub messaging_profile_id: Option<String>,
    #[serde(default)]
    pub billing_group_id: Option<String>,
    #[serde(default)]
    pub customer_reference: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub sub_number_orders_ids: Vec<String>,
    #[serde(default)]
    pub requirements_met: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn create_request(params: &CreateNumberOrderParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/number_orders").with_json(params)
}

pub(crate) fn list_request(params: &ListNumberOrdersParams) -> Result<ApiRequest> {
    ApiRequest::get("/number_orders").with_query(params)
}

pub(crate) fn retrieve_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::get(format!(
        "/number_orders/{}",
        uuid_param(id, "number_order_id")?
    )))
}

#[derive(Clone)]
pub struct NumberOrdersClient {
    service: Service,
}

impl NumberOrdersClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn create(&self, params: CreateNumberOrderParams) -> Result<NumberOrder> {
        self.service.data(create_request(&params)?).await
    }

    pub async fn list(&self, params: ListNumberOrdersParams) -> Result<ListResponse<NumberOrder>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(&self, params: ListNumberOrdersParams) -> Result<PageStream<NumberOrder>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn retrieve(&self, id: &Uuid) -> Result<NumberOrder> {
        self.service.data(retrieve_request(id)?).await
    }
}
