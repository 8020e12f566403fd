//! Port-in orders: moving numbers from another carrier to Telnyx.
//!
//! A draft order is created from a list of numbers, completed with end-user
//! details through `update`, then submitted. Telnyx may split one request into
//! several orders (per carrier or number type), so `create` returns a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{PageStream, Service},
    core::{require, require_items, uuid_param, ApiRequest},
    enums::PhoneNumberType,
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::{null_default, DateRange},
};

string_enum! {
    pub enum PortingOrderStatusValue {
        Draft => "draft",
        InProcess => "in-process",
        Submitted => "submitted",
        Exception => "exception",
        FocDateConfirmed => "foc-date-confirmed",
        CancelPending => "cancel-pending",
        Ported => "ported",
        Cancelled => "cancelled",
    }
}

string_enum! {
    /// Whether every number on the account is ported, or only some.
    pub enum PortingOrderType {
        Full => "full",
        Partial => "partial",
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StatusDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingOrderStatus {
    pub value: PortingOrderStatusValue,
    #[serde(default, deserialize_with = "null_default")]
    pub details: Vec<StatusDetail>,
}

/// Account holder as registered with the losing carrier.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EndUserAdmin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_passcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_identifier: Option<String>,
}

/// Service address on file with the losing carrier.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EndUserLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EndUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<EndUserAdmin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<EndUserLocation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ActivationSettings {
    /// Requested firm order commitment (port) date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foc_datetime_requested: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foc_datetime_actual: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_port_eligible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingMisc {
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub order_type: Option<PortingOrderType>,
    /// `disconnect` or `keep` for numbers left behind by a partial port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_numbers_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_billing_phone_number: Option<String>,
}

/// Where ported numbers land once active.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PhoneNumberConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Ids of uploaded documents backing the order.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingDocuments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loa: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PortingOrder {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    pub status: PortingOrderStatus,
    #[serde(default)]
    pub support_key: Option<String>,
    #[serde(default)]
    pub customer_reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub old_service_provider_ocn: Option<String>,
    #[serde(default)]
    pub parent_support_key: Option<String>,
    #[serde(default)]
    pub porting_phone_numbers_count: Option<u32>,
    #[serde(default)]
    pub phone_number_type: Option<PhoneNumberType>,
    #[serde(default)]
    pub end_user: Option<EndUser>,
    #[serde(default)]
    pub activation_settings: Option<ActivationSettings>,
    #[serde(default)]
    pub misc: Option<PortingMisc>,
    #[serde(default)]
    pub phone_number_configuration: Option<PhoneNumberConfiguration>,
    #[serde(default)]
    pub documents: Option<PortingDocuments>,
    #[serde(default)]
    pub requirements_met: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub user_feedback: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PortingOrder {
    pub fn status_value(&self) -> PortingOrderStatusValue {
        self.status.value
    }
}

/// Body of `POST /porting_orders`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatePortingOrderParams {
    pub phone_numbers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
}

impl CreatePortingOrderParams {
    pub fn new<I, S>(phone_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phone_numbers: phone_numbers.into_iter().map(Into::into).collect(),
            customer_reference: None,
        }
    }

    pub fn with_customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.customer_reference = Some(reference.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_items(&self.phone_numbers, "phone_numbers")?;
        for number in &self.phone_numbers {
            require(number, "phone_numbers")?;
        }
        Ok(())
    }
}

/// Body of `PATCH /porting_orders/{id}`. Only draft orders accept edits.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdatePortingOrderParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misc: Option<PortingMisc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_user: Option<EndUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_settings: Option<ActivationSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_configuration: Option<PhoneNumberConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<PortingDocuments>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl UpdatePortingOrderParams {
    pub fn with_misc(mut self, misc: PortingMisc) -> Self {
        self.misc = Some(misc);
        self
    }

    pub fn with_end_user(mut self, end_user: EndUser) -> Self {
        self.end_user = Some(end_user);
        self
    }

    pub fn with_foc_datetime_requested(mut self, at: DateTime<Utc>) -> Self {
        self.activation_settings
            .get_or_insert_with(Default::default)
            .foc_datetime_requested = Some(at);
        self
    }

    pub fn with_phone_number_configuration(mut self, config: PhoneNumberConfiguration) -> Self {
        self.phone_number_configuration = Some(config);
        self
    }

    pub fn with_documents(mut self, documents: PortingDocuments) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_customer_reference(mut self, reference: impl Into<String>) -> Self {
        self.customer_reference = Some(reference.into());
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PortingOrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PortingOrderStatusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_type: Option<PhoneNumberType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateRange>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListPortingOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PortingOrderFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_phone_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListPortingOrdersParams {
    pub fn with_filter(mut self, filter: PortingOrderFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_status(mut self, status: PortingOrderStatusValue) -> Self {
        self.filter.get_or_insert_with(Default::default).status = Some(status);
        self
    }

    pub fn with_include_phone_numbers(mut self, include: bool) -> Self {
        self.include_phone_numbers = Some(include);
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

fn item_path(id: &Uuid) -> Result<String> {
    Ok(format!("/porting_orders/{}", uuid_param(id, "id")?))
}

pub(crate) fn list_request(params: &ListPortingOrdersParams) -> Result<ApiRequest> {
    ApiRequest::get("/porting_orders").with_query(params)
}

pub(crate) fn create_request(params: &CreatePortingOrderParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/porting_orders").with_json(params)
}

pub(crate) fn retrieve_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::get(item_path(id)?))
}

pub(crate) fn update_request(id: &Uuid, params: &UpdatePortingOrderParams) -> Result<ApiRequest> {
    ApiRequest::patch(item_path(id)?).with_json(params)
}

pub(crate) fn delete_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(item_path(id)?))
}

pub(crate) fn action_request(id: &Uuid, action: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::post(format!("{}/actions/{action}", item_path(id)?)))
}

#[derive(Clone)]
pub struct PortingOrdersClient {
    service: Service,
}

impl PortingOrdersClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(&self, params: ListPortingOrdersParams) -> Result<ListResponse<PortingOrder>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(&self, params: ListPortingOrdersParams) -> Result<PageStream<PortingOrder>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    /// Create draft orders; one per group the numbers were split into.
    pub async fn create(&self, params: CreatePortingOrderParams) -> Result<Vec<PortingOrder>> {
        self.service.data(create_request(&params)?).await
    }

    pub async fn retrieve(&self, id: &Uuid) -> Result<PortingOrder> {
        self.service.data(retrieve_request(id)?).await
    }

    pub async fn update(&self, id: &Uuid, params: UpdatePortingOrderParams) -> Result<PortingOrder> {
        self.service.data(update_request(id, &params)?).await
    }

    /// Delete a draft order.
    pub async fn delete(&self, id: &Uuid) -> Result<()> {
        self.service.empty(delete_request(id)?).await
    }

    /// Submit a completed draft to the losing carrier.
    pub async fn submit(&self, id: &Uuid) -> Result<PortingOrder> {
        self.service.data(action_request(id, "submit")?).await
    }

    pub async fn cancel(&self, id: &Uuid) -> Result<PortingOrder> {
        self.service.data(action_request(id, "cancel")?).await
    }

    /// Confirm the FOC date offered by the losing carrier.
    pub async fn confirm(&self, id: &Uuid) -> Result<PortingOrder> {
        self.service.data(action_request(id, "confirm")?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn create_requires_numbers() {
        assert!(create_request(&CreatePortingOrderParams::new(Vec::<String>::new())).is_err());
        let req = create_request(&CreatePortingOrderParams::new(["+13035550000"])).unwrap();
        assert_eq!(req.body(), Some(&json!({"phone_numbers": ["+13035550000"]})));
    }

    #[test]
    fn actions_post_to_action_path() {
        let id = Uuid::parse_str("eef10fb8-f3df-4c67-97c5-e18179723222").unwrap();
        let req = action_request(&id, "submit").unwrap();
        assert_eq!(req.method(), &reqwest::Method::POST);
        assert_eq!(
            req.path(),
            "/porting_orders/eef10fb8-f3df-4c67-97c5-e18179723222/actions/submit"
        );
        assert!(req.body().is_none());
        assert!(action_request(&Uuid::nil(), "cancel").is_err());
    }

    #[test]
    fn update_nests_end_user_and_activation() {
        let id = Uuid::new_v4();
        let foc = Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap();
        let params = UpdatePortingOrderParams::default()
            .with_end_user(EndUser {
                admin: Some(EndUserAdmin {
                    entity_name: Some("Acme".into()),
                    pin_passcode: Some("1234".into()),
                    ..Default::default()
                }),
                location: None,
            })
            .with_misc(PortingMisc {
                order_type: Some(PortingOrderType::Partial),
                remaining_numbers_action: Some("keep".into()),
                new_billing_phone_number: None,
            })
            .with_foc_datetime_requested(foc);
        let body = update_request(&id, &params).unwrap().body().cloned().unwrap();
        assert_eq!(
            body,
            json!({
                "misc": {"type": "partial", "remaining_numbers_action": "keep"},
                "end_user": {"admin": {"entity_name": "Acme", "pin_passcode": "1234"}},
                "activation_settings": {"foc_datetime_requested": "2024-06-03T15:00:00Z"}
            })
        );
    }

    #[test]
    fn list_filters_by_status() {
        let req = list_request(
            &ListPortingOrdersParams::default()
                .with_status(PortingOrderStatusValue::FocDateConfirmed)
                .with_include_phone_numbers(false),
        )
        .unwrap();
        assert_eq!(
            req.query(),
            &[
                ("filter[status]".to_string(), "foc-date-confirmed".to_string()),
                ("include_phone_numbers".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn order_parses_status_details() {
        let order: PortingOrder = serde_json::from_value(json!({
            "id": "eef10fb8-f3df-4c67-97c5-e18179723222",
            "record_type": "porting_order",
            "status": {
                "value": "exception",
                "details": [{"code": "ACCOUNT_NUMBER_MISMATCH", "description": "Account number mismatch"}]
            },
            "support_key": "sr_a12345",
            "misc": {"type": "full"},
            "user_feedback": null
        }))
        .unwrap();
        assert_eq!(order.status_value(), PortingOrderStatusValue::Exception);
        assert_eq!(order.status.details.len(), 1);
        assert_eq!(
            order.misc.and_then(|m| m.order_type),
            Some(PortingOrderType::Full)
        );
        assert!(order.user_feedback.is_null());
    }
}
