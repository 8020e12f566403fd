//! Messaging profiles group sender numbers with shared webhook and routing settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::{PageStream, Service},
    core::{path_param, require, ApiRequest},
    errors::Result,
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::null_default,
};

string_enum! {
    /// Webhook payload format delivered for this profile.
    pub enum WebhookApiVersion {
        V1 => "1",
        V2 => "2",
        V2010 => "2010-04-01",
    }
}

/// Spread outbound traffic across the profile's numbers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NumberPoolSettings {
    pub long_code_weight: f64,
    pub toll_free_weight: f64,
    pub skip_unhealthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky_sender: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geomatch: Option<bool>,
}

impl NumberPoolSettings {
    pub fn new(long_code_weight: f64, toll_free_weight: f64, skip_unhealthy: bool) -> Self {
        Self {
            long_code_weight,
            toll_free_weight,
            skip_unhealthy,
            sticky_sender: None,
            geomatch: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UrlShortenerSettings {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_blacklist_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_webhooks: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MessagingProfile {
    pub id: String,
    #[serde(default)]
    pub record_type: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub webhook_failover_url: Option<String>,
    #[serde(default)]
    pub webhook_api_version: Option<WebhookApiVersion>,
    /// Destination countries (ISO alpha-2) this profile may send to.
    #[serde(default, deserialize_with = "null_default")]
    pub whitelisted_destinations: Vec<String>,
    #[serde(default)]
    pub number_pool_settings: Option<NumberPoolSettings>,
    #[serde(default)]
    pub url_shortener_settings: Option<UrlShortenerSettings>,
    #[serde(default)]
    pub alpha_sender: Option<String>,
    #[serde(default)]
    pub daily_spend_limit: Option<String>,
    #[serde(default)]
    pub daily_spend_limit_enabled: Option<bool>,
    #[serde(default)]
    pub mms_fall_back_to_sms: Option<bool>,
    #[serde(default)]
    pub mms_transcoding: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /messaging_profiles`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateMessagingProfileParams {
    pub name: String,
    pub whitelisted_destinations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_api_version: Option<WebhookApiVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_pool_settings: Option<NumberPoolSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_shortener_settings: Option<UrlShortenerSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_spend_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_spend_limit_enabled: Option<bool>,
}

impl CreateMessagingProfileParams {
    pub fn new(name: impl Into<String>, whitelisted_destinations: Vec<String>) -> Self {
        Self {
            name: name.into(),
            whitelisted_destinations,
            enabled: None,
            webhook_url: None,
            webhook_failover_url: None,
            webhook_api_version: None,
            number_pool_settings: None,
            url_shortener_settings: None,
            alpha_sender: None,
            daily_spend_limit: None,
            daily_spend_limit_enabled: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_webhook_failover_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_failover_url = Some(url.into());
        self
    }

    pub fn with_webhook_api_version(mut self, version: WebhookApiVersion) -> Self {
        self.webhook_api_version = Some(version);
        self
    }

    pub fn with_number_pool_settings(mut self, settings: NumberPoolSettings) -> Self {
        self.number_pool_settings = Some(settings);
        self
    }

    pub fn with_url_shortener_settings(mut self, settings: UrlShortenerSettings) -> Self {
        self.url_shortener_settings = Some(settings);
        self
    }

    pub fn with_alpha_sender(mut self, sender: impl Into<String>) -> Self {
        self.alpha_sender = Some(sender.into());
        self
    }

    /// Decimal amount in USD, enforced when `daily_spend_limit_enabled` is set.
    pub fn with_daily_spend_limit(mut self, limit: impl Into<String>) -> Self {
        self.daily_spend_limit = Some(limit.into());
        self.daily_spend_limit_enabled = Some(true);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.name, "name")
    }
}

/// Body of `PATCH /messaging_profiles/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UpdateMessagingProfileParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelisted_destinations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_api_version: Option<WebhookApiVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_pool_settings: Option<NumberPoolSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_shortener_settings: Option<UrlShortenerSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_sender: Option<String>,
}

impl UpdateMessagingProfileParams {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_whitelisted_destinations(mut self, destinations: Vec<String>) -> Self {
        self.whitelisted_destinations = Some(destinations);
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_webhook_failover_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_failover_url = Some(url.into());
        self
    }

    pub fn with_webhook_api_version(mut self, version: WebhookApiVersion) -> Self {
        self.webhook_api_version = Some(version);
        self
    }

    pub fn with_number_pool_settings(mut self, settings: NumberPoolSettings) -> Self {
        self.number_pool_settings = Some(settings);
        self
    }

    pub fn with_url_shortener_settings(mut self, settings: UrlShortenerSettings) -> Self {
        self.url_shortener_settings = Some(settings);
        self
    }

    pub fn with_alpha_sender(mut self, sender: impl Into<String>) -> Self {
        self.alpha_sender = Some(sender.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => require(name, "name"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MessagingProfileFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListMessagingProfilesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<MessagingProfileFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListMessagingProfilesParams {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(MessagingProfileFilter {
            name: Some(name.into()),
        });
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

fn item_path(id: &str) -> Result<String> {
    Ok(format!("/messaging_profiles/{}", path_param(id, "id")?))
}

pub(crate) fn list_request(params: &ListMessagingProfilesParams) -> Result<ApiRequest> {
    ApiRequest::get("/messaging_profiles").with_query(params)
}

pub(crate) fn create_request(params: &CreateMessagingProfileParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/messaging_profiles").with_json(params)
}

pub(crate) fn retrieve_request(id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::get(item_path(id)?))
}

pub(crate) fn update_request(id: &str, params: &UpdateMessagingProfileParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::patch(item_path(id)?).with_json(params)
}

pub(crate) fn delete_request(id: &str) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(item_path(id)?))
}

#[derive(Clone)]
pub struct MessagingProfilesClient {
    service: Service,
}

impl MessagingProfilesClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(
        &self,
        params: ListMessagingProfilesParams,
    ) -> Result<ListResponse<MessagingProfile>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(
        &self,
        params: ListMessagingProfilesParams,
    ) -> Result<PageStream<MessagingProfile>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn create(&self, params: CreateMessagingProfileParams) -> Result<MessagingProfile> {
        self.service.data(create_request(&params)?).await
    }

    pub async fn retrieve(&self, id: &str) -> Result<MessagingProfile> {
        self.service.data(retrieve_request(id)?).await
    }

    pub async fn update(
        &self,
        id: &str,
        params: UpdateMessagingProfileParams,
    ) -> Result<MessagingProfile> {
        self.service.data(update_request(id, &params)?).await
    }

    /// Delete the profile. Returns the deleted record.
    pub async fn delete(&self, id: &str) -> Result<MessagingProfile> {
        self.service.data(delete_request(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde_json::json;

    #[test]
    fn create_requires_name() {
        let err = create_request(&CreateMessagingProfileParams::new(" ", vec!["US".into()]))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(v) if v.field.as_deref() == Some("name")));
    }

    #[test]
    fn create_serializes_nested_settings() {
        let params = CreateMessagingProfileParams::new("Support", vec!["US".into(), "CA".into()])
            .with_webhook_api_version(WebhookApiVersion::V2)
            .with_number_pool_settings(NumberPoolSettings::new(1.0, 10.0, true));
        let body = create_request(&params).unwrap().body().cloned().unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Support",
                "whitelisted_destinations": ["US", "CA"],
                "webhook_api_version": "2",
                "number_pool_settings": {
                    "long_code_weight": 1.0,
                    "toll_free_weight": 10.0,
                    "skip_unhealthy": true
                }
            })
        );
    }

    #[test]
    fn update_rejects_blank_name_only_when_set() {
        assert!(update_request("p1", &UpdateMessagingProfileParams::default()).is_ok());
        assert!(
            update_request("p1", &UpdateMessagingProfileParams::default().with_name("")).is_err()
        );
    }

    #[test]
    fn list_filters_by_name() {
        let req = list_request(
            &ListMessagingProfilesParams::default()
                .with_name("Support")
                .with_page(PageParams::default().with_size(10)),
        )
        .unwrap();
        assert_eq!(
            req.query(),
            &[
                ("filter[name]".to_string(), "Support".to_string()),
                ("page[size]".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn profile_parses_version_2010() {
        let profile: MessagingProfile = serde_json::from_value(json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "record_type": "messaging_profile",
            "name": "Legacy",
            "enabled": true,
            "webhook_api_version": "2010-04-01",
            "whitelisted_destinations": null
        }))
        .unwrap();
        assert_eq!(profile.webhook_api_version, Some(WebhookApiVersion::V2010));
        assert!(profile.whitelisted_destinations.is_empty());
    }
}
