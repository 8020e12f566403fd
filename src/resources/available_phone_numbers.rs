//! Inventory search for numbers that can be ordered.

use serde::{Deserialize, Serialize};

use crate::{
    client::Service,
    core::ApiRequest,
    enums::PhoneNumberType,
    errors::Result,
    http::RequestOptions,
    resources::{null_default, StringMatch},
};

string_enum! {
    pub enum NumberFeature {
        Sms => "sms",
        Mms => "mms",
        Voice => "voice",
        Fax => "fax",
        Emergency => "emergency",
        HdVoice => "hd_voice",
        InternationalSms => "international_sms",
        LocalCalling => "local_calling",
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AvailableNumberFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<StringMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    /// ISO 3166-1 alpha-2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_destination_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number_type: Option<PhoneNumberType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<NumberFeature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_effort: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quickship: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_held_numbers: Option<bool>,
}

impl AvailableNumberFilter {
    pub fn with_phone_number(mut self, pattern: StringMatch) -> Self {
        self.phone_number = Some(pattern);
        self
    }

    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    pub fn with_administrative_area(mut self, area: impl Into<String>) -> Self {
        self.administrative_area = Some(area.into());
        self
    }

    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    pub fn with_national_destination_code(mut self, code: impl Into<String>) -> Self {
        self.national_destination_code = Some(code.into());
        self
    }

    pub fn with_rate_center(mut self, rate_center: impl Into<String>) -> Self {
        self.rate_center = Some(rate_center.into());
        self
    }

    pub fn with_phone_number_type(mut self, number_type: PhoneNumberType) -> Self {
        self.phone_number_type = Some(number_type);
        self
    }

    pub fn with_feature(mut self, feature: NumberFeature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Return near matches when no number satisfies every filter.
    pub fn with_best_effort(mut self, enabled: bool) -> Self {
        self.best_effort = Some(enabled);
        self
    }

    pub fn with_quickship(mut self, enabled: bool) -> Self {
        self.quickship = Some(enabled);
        self
    }

    pub fn with_reservable(mut self, enabled: bool) -> Self {
        self.reservable = Some(enabled);
        self
    }

    pub fn with_exclude_held_numbers(mut self, enabled: bool) -> Self {
        self.exclude_held_numbers = Some(enabled);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListAvailablePhoneNumbersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<AvailableNumberFilter>,
}

impl ListAvailablePhoneNumbersParams {
    pub fn new(filter: AvailableNumberFilter) -> Self {
        Self {
            filter: Some(filter),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegionInformation {
    #[serde(default)]
    pub region_type: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CostInformation {
    #[serde(default)]
    pub upfront_cost: Option<String>,
    #[serde(default)]
    pub monthly_cost: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FeatureName {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailablePhoneNumber {
    #[serde(default)]
    pub record_type: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub vanity_format: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub best_effort: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub quickship: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub reservable: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub region_information: Vec<RegionInformation>,
    #[serde(default)]
    pub cost_information: Option<CostInformation>,
    #[serde(default, deserialize_with = "null_default")]
    pub features: Vec<FeatureName>,
}

impl AvailablePhoneNumber {
    pub fn has_feature(&self, feature: NumberFeature) -> bool {
        self.features.iter().any(|f| f.name == feature.as_str())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct AvailablePhoneNumbersMeta {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub best_effort_results: u64,
}

/// Search results. This endpoint is not paginated.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AvailablePhoneNumbersResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<AvailablePhoneNumber>,
    #[serde(default)]
    pub meta: Option<AvailablePhoneNumbersMeta>,
}

pub(crate) fn list_request(params: &ListAvailablePhoneNumbersParams) -> Result<ApiRequest> {
    ApiRequest::get("/available_phone_numbers").with_query(params)
}

#[derive(Clone)]
pub struct AvailablePhoneNumbersClient {
    service: Service,
}

impl AvailablePhoneNumbersClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(
        &self,
        params: ListAvailablePhoneNumbersParams,
    ) -> Result<AvailablePhoneNumbersResponse> {
        self.service.call(list_request(&params)?).await
    }
}
