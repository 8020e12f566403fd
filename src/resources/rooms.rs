//! Video rooms.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::{PageStream, Service},
    core::{uuid_param, ApiRequest},
    errors::{Result, ValidationError},
    http::RequestOptions,
    pagination::{ListResponse, PageParams},
    resources::null_default,
};

/// Allowed range for `max_participants`.
pub const MAX_PARTICIPANTS_RANGE: RangeInclusive<u32> = 2..=50;

fn validate_max_participants(value: Option<u32>) -> Result<()> {
    match value {
        Some(n) if !MAX_PARTICIPANTS_RANGE.contains(&n) => Err(ValidationError::new(format!(
            "max_participants must be between {} and {}",
            MAX_PARTICIPANTS_RANGE.start(),
            MAX_PARTICIPANTS_RANGE.end()
        ))
        .with_field("max_participants")
        .into()),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RoomSession {
    pub id: Uuid,
    #[serde(default)]
    pub room_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_default")]
    pub active: bool,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Room {
    pub id: Uuid,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub enable_recording: bool,
    #[serde(default)]
    pub webhook_event_url: Option<String>,
    #[serde(default)]
    pub webhook_event_failover_url: Option<String>,
    #[serde(default)]
    pub webhook_timeout_secs: Option<u32>,
    #[serde(default)]
    pub active_session_id: Option<Uuid>,
    /// Only populated when listed with `include_sessions`.
    #[serde(default, deserialize_with = "null_default")]
    pub sessions: Vec<RoomSession>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CreateRoomParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_recording: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_event_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_event_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_timeout_secs: Option<u32>,
}

impl CreateRoomParams {
    pub fn with_unique_name(mut self, name: impl Into<String>) -> Self {
        self.unique_name = Some(name.into());
        self
    }

    pub fn with_max_participants(mut self, max: u32) -> Self {
        self.max_participants = Some(max);
        self
    }

    pub fn with_enable_recording(mut self, enabled: bool) -> Self {
        self.enable_recording = Some(enabled);
        self
    }

    pub fn with_webhook_event_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_event_url = Some(url.into());
        self
    }

    pub fn with_webhook_event_failover_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_event_failover_url = Some(url.into());
        self
    }

    pub fn with_webhook_timeout_secs(mut self, secs: u32) -> Self {
        self.webhook_timeout_secs = Some(secs);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_participants(self.max_participants)
    }
}

/// Body of `PATCH /rooms/{room_id}`; same fields as creation.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateRoomParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_recording: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_event_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_event_failover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_timeout_secs: Option<u32>,
}

impl UpdateRoomParams {
    pub fn with_unique_name(mut self, name: impl Into<String>) -> Self {
        self.unique_name = Some(name.into());
        self
    }

    pub fn with_max_participants(mut self, max: u32) -> Self {
        self.max_participants = Some(max);
        self
    }

    pub fn with_enable_recording(mut self, enabled: bool) -> Self {
        self.enable_recording = Some(enabled);
        self
    }

    pub fn with_webhook_event_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_event_url = Some(url.into());
        self
    }

    pub fn with_webhook_timeout_secs(mut self, secs: u32) -> Self {
        self.webhook_timeout_secs = Some(secs);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_participants(self.max_participants)
    }
}

/// Calendar-day comparison (`filter[date_created_at][gte]=2024-01-31`).
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RoomFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created_at: Option<DateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated_at: Option<DateFilter>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ListRoomsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RoomFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_sessions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageParams>,
}

impl ListRoomsParams {
    pub fn with_unique_name(mut self, name: impl Into<String>) -> Self {
        self.filter.get_or_insert_with(Default::default).unique_name = Some(name.into());
        self
    }

    pub fn with_date_created_at(mut self, filter: DateFilter) -> Self {
        self.filter.get_or_insert_with(Default::default).date_created_at = Some(filter);
        self
    }

    pub fn with_include_sessions(mut self, include: bool) -> Self {
        self.include_sessions = Some(include);
        self
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }
}

fn item_path(room_id: &Uuid) -> Result<String> {
    Ok(format!("/rooms/{}", uuid_param(room_id, "room_id")?))
}

pub(crate) fn list_request(params: &ListRoomsParams) -> Result<ApiRequest> {
    ApiRequest::get("/rooms").with_query(params)
}

pub(crate) fn create_request(params: &CreateRoomParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::post("/rooms").with_json(params)
}

pub(crate) fn retrieve_request(room_id: &Uuid, include_sessions: bool) -> Result<ApiRequest> {
    let req = ApiRequest::get(item_path(room_id)?);
    Ok(if include_sessions {
        req.with_query_pair("include_sessions", "true")
    } else {
        req
    })
}

pub(crate) fn update_request(room_id: &Uuid, params: &UpdateRoomParams) -> Result<ApiRequest> {
    params.validate()?;
    ApiRequest::patch(item_path(room_id)?).with_json(params)
}

pub(crate) fn delete_request(room_id: &Uuid) -> Result<ApiRequest> {
    Ok(ApiRequest::delete(item_path(room_id)?))
}

#[derive(Clone)]
pub struct RoomsClient {
    service: Service,
}

impl RoomsClient {
    pub(crate) fn new(service: Service) -> Self {
        Self { service }
    }

    pub fn with_options(self, options: RequestOptions) -> Self {
        Self::new(self.service.with_options(options))
    }

    pub async fn list(&self, params: ListRoomsParams) -> Result<ListResponse<Room>> {
        self.service.call(list_request(&params)?).await
    }

    pub fn list_all(&self, params: ListRoomsParams) -> Result<PageStream<Room>> {
        Ok(self.service.paginate(list_request(&params)?))
    }

    pub async fn create(&self, params: CreateRoomParams) -> Result<Room> {
        self.service.data(create_request(&params)?).await
    }

    pub async fn retrieve(&self, room_id: &Uuid, include_sessions: bool) -> Result<Room> {
        self.service
            .data(retrieve_request(room_id, include_sessions)?)
            .await
    }

    pub async fn update(&self, room_id: &Uuid, params: UpdateRoomParams) -> Result<Room> {
        self.service.data(update_request(room_id, &params)?).await
    }

    pub async fn delete(&self, room_id: &Uuid) -> Result<()> {
        self.service.empty(delete_request(room_id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use serde_json::json;

    #[test]
    fn max_participants_bounds() {
        for ok in [2, 10, 50] {
            assert!(create_request(&CreateRoomParams::default().with_max_participants(ok)).is_ok());
        }
        for bad in [0, 1, 51] {
            let err = create_request(&CreateRoomParams::default().with_max_participants(bad))
                .unwrap_err();
            assert!(
                matches!(err, Error::Validation(v) if v.field.as_deref() == Some("max_participants"))
            );
        }
        let id = Uuid::new_v4();
        assert!(update_request(&id, &UpdateRoomParams::default().with_max_participants(60)).is_err());
        assert!(create_request(&CreateRoomParams::default()).is_ok());
    }

    #[test]
    fn create_body_omits_unset_fields() {
        let req = create_request(
            &CreateRoomParams::default()
                .with_unique_name("standup")
                .with_max_participants(10),
        )
        .unwrap();
        assert_eq!(
            req.body(),
            Some(&json!({"unique_name": "standup", "max_participants": 10}))
        );
    }

    #[test]
    fn list_uses_calendar_dates() {
        let params = ListRoomsParams::default()
            .with_date_created_at(DateFilter {
                gte: NaiveDate::from_ymd_opt(2024, 1, 31),
                ..Default::default()
            })
            .with_include_sessions(true);
        let req = list_request(&params).unwrap();
        assert_eq!(
            req.query(),
            &[
                (
                    "filter[date_created_at][gte]".to_string(),
                    "2024-01-31".to_string()
                ),
                ("include_sessions".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn retrieve_adds_include_sessions_only_when_requested() {
        let id = Uuid::new_v4();
        assert!(retrieve_request(&id, false).unwrap().query().is_empty());
        assert_eq!(retrieve_request(&id, true).unwrap().query().len(), 1);
        assert!(delete_request(&Uuid::nil()).is_err());
    }

    #[test]
    fn room_parses_sessions() {
        let room: Room = serde_json::from_value(json!({
            "id": "0ccc7b54-4df3-4bca-a65a-3da1ecc777f0",
            "record_type": "room",
            "unique_name": "standup",
            "max_participants": 10,
            "enable_recording": null,
            "sessions": [{
                "id": "7b61621f-62e0-4aad-ab11-9fd19e272e73",
                "room_id": "0ccc7b54-4df3-4bca-a65a-3da1ecc777f0",
                "active": true
            }]
        }))
        .unwrap();
        assert!(!room.enable_recording);
        assert!(room.sessions[0].active);
    }
}
