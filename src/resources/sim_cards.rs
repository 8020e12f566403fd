//! Wireless SIM cards and their asynchronous state-change actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{PageStream, Service},
    core::{uuid_param, ApiRequest},
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::null_default,
};

string_enum! {
    pub enum SimCardStatusValue {
        Registering => "registering",
        Enabling => "enabling",
        Enabled => "enabled",
        Disabling => "disabling",
        Disabled => "disabled",
        DataLimitExceeded => "data_limit_exceeded",
        SettingStandby => "setting_standby",
        Standby => "standby",
    }
}

string_enum! {
    pub enum SimCardType {
        Physical => "physical",
        Esim => "esim",
    }
}

string_enum! {
    pub enum DataUnit {
        Mb => "MB",
        Gb => "GB",
    }
}

string_enum! {
    pub enum SimCardActionType {
        Enable => "enable",
        EnableStandbySimCard => "enable_standby_sim_card",
        Disable => "disable",
        SetStandby => "set_standby",
    }
}

string_enum! {
    pub enum SimCardActionStatusValue {
        InProgress => "in-progress",
        Completed => "completed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SimCardStatus {
    pub value: SimCardStatusValue,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A data volume such as a monthly limit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DataAmount {
    pub amount: String,
    pub unit: DataUnit,
}

impl DataAmount {
    pub fn new(amount: impl Into<String>, unit: DataUnit) -> Self {
        Self {
            amount: amount.into(),
            unit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SimCard {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    pub status: SimCardStatus,
    #[serde(rename = "type", default)]
    pub sim_card_type: Option<SimCardType>,
    pub iccid: String,
    #[serde(default)]
    pub imsi: Option<String>,
    #[serde(default)]
    pub msisdn: Option<String>,
    #[serde(default)]
    pub sim_card_group_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub data_limit: Option<DataAmount>,
    #[serde(default)]
    pub current_billing_period_consumed_data: Option<DataAmount>,
    #[serde(default, deserialize_with = "null_default")]
    pub authorized_imeis: Vec<String>,
    #[serde(default)]
    pub current_imei: Option<String>,
    #[serde(default)]
    pub ipv4: Option<String>,
    #[serde(default)]
    pub ipv6: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SimCardActionStatus {
    pub value: SimCardActionStatusValue,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Tracks an asynchronous enable/disable request until it completes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SimCardAction {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    pub sim_card_id: Uuid,
    pub action_type: SimCardActionType,
    pub status: SimCardActionStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SimCardAction {
    pub fn is_finished(&self) -> bool {
        self.status.value != SimCardActionStatusValue::InProgress
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateSimCardParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_card_group_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<DataAmount>,
    /// Only these IMEIs may use the SIM once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_imeis: Option<Vec<String>>,
}

impl UpdateSimCardParams {
    pub fn with_sim_card_group_id(mut self, id: Uuid) -> Self {
        self.sim_card_group_id = Some(id);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_data_limit(mut self, limit: DataAmount) -> Self {
        self.data_limit = Some(limit);
        self
    }

    pub fn with_authorized_imeis(mut self, imeis: Vec<String>) -> Self {
        self.authorized_imeis = Some(imeis);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SimCardFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iccid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<SimCardStatusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_card_group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListSimCardsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SimCardFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_sim_card_group: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListSimCardsParams {
    pub fn with_iccid(mut self, iccid: impl Into<String>) -> Self {
        self.filter.get_or_insert_with(Default::default).iccid = Some(iccid.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.filter
            .get_or_insert_with(Default::default)
            .tags
            .push(tag.into());
        self
    }

    pub fn with_status(mut self, status: SimCardStatusValue) -> Self {
        self.filter
            .get_or_insert_with(Default::default)
            .status
            .push(status);
        self
    }

    pub fn with_sim_card_group_id(mut self, id: Uuid) -> Self {
        self.filter.get_or_insert_with(Default::default).sim_card_group_id = Some(id);
        self
    }

    pub fn with_include_sim_card_group(mut self, include: bool) -> Self {
        self.include_sim_card_group = Some(include);
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

fn item_path(id: &Uuid) -> Result<String> {
    Ok(format!("/sim_cards/{}", uuid_param(id, "id")?))
}

pub(crate) fn list_request(params: &ListSimCardsParams) -> Result<ApiRequest> {
    ApiRequest::get("/sim_cards").with_query(params)
}

pub(crate) fn retrieve_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::get(item_path(id)?))
}

pub(crate) fn update_request(id: &Uuid, params: &UpdateSimCardParams) -> Result<ApiRequest> {
    ApiRequest::patch(item_path(id)?).with_json(params)
}

pub(crate) fn delete_request(id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(item_path(id)?))
}

pub(crate) fn action_request(id: &Uuid, action: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::post(format!("{}/actions/{action}", item_path(id)?)))
}

#[derive(Clone)]
pub struct SimCardsClient {
    service: Service,
}

impl SimCardsClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(&self, params: ListSimCardsParams) -> Result<ListResponse<SimCard>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(&self, params: ListSimCardsParams) -> Result<PageStream<SimCard>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn retrieve(&self, id: &Uuid) -> Result<SimCard> {
        self.service.data(retrieve_request(id)?).await
    }

    pub async fn update(&self, id: &Uuid, params: UpdateSimCardParams) -> Result<SimCard> {
        self.service.data(update_request(id, &params)?).await
    }

    /// Deactivate and remove the SIM from the account.
    pub async fn delete(&self, id: &Uuid) -> Result<SimCard> {
        self.service.data(delete_request(id)?).await
    }

    /// Request activation. The returned action starts `in-progress`.
    pub async fn enable(&self, id: &Uuid) -> Result<SimCardAction> {
        self.service.data(action_request(id, "enable")?).await
    }

    pub async fn disable(&self, id: &Uuid) -> Result<SimCardAction> {
        self.service.data(action_request(id, "disable")?).await
    }
}
