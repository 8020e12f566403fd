//! Per-resource models and service clients.
//!
//! Every module follows the same layout: enums, params models, response
//! models, `pub(crate)` request builders shared by the async and blocking
//! transports, then the async service client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub mod available_phone_numbers;
pub mod balance;
pub mod calls;
pub mod messages;
pub mod messaging_profiles;
pub mod number_orders;
pub mod phone_numbers;
pub mod porting_orders;
pub mod portouts;
pub mod rooms;
pub mod sim_cards;

/// Deserialize `null` or a missing field as `T::default()`.
///
/// List and flag fields are sent as `null` by some endpoints.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// String comparison operators accepted by filter parameters.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StringMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
}

impl StringMatch {
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            eq: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            contains: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn starts_with(value: impl Into<String>) -> Self {
        Self {
            starts_with: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn ends_with(value: impl Into<String>) -> Self {
        Self {
            ends_with: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Timestamp range operators (`filter[created_at][gt]=...`).
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn after(at: DateTime<Utc>) -> Self {
        Self {
            gt: Some(at),
            ..Default::default()
        }
    }

    pub fn before(at: DateTime<Utc>) -> Self {
        Self {
            lt: Some(at),
            ..Default::default()
        }
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            gte: Some(from),
            lte: Some(to),
            ..Default::default()
        }
    }
}

/// Monetary amount as returned by the API (decimal string plus currency).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Cost {
    pub amount: String,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::flatten_query;
    use chrono::TimeZone;

    #[test]
    fn string_match_flattens_single_operator() {
        #[derive(Serialize)]
        struct Params {
            filter: Filter,
        }
        #[derive(Serialize)]
        struct Filter {
            phone_number: StringMatch,
        }

        let pairs = flatten_query(&Params {
            filter: Filter {
                phone_number: StringMatch::starts_with("+1312"),
            },
        })
        .unwrap();
        assert_eq!(
            pairs,
            vec![(
                "filter[phone_number][starts_with]".to_string(),
                "+1312".to_string()
            )]
        );
    }

    #[test]
    fn null_default_accepts_null_and_missing() {
        #[derive(Deserialize)]
        struct Record {
            #[serde(default, deserialize_with = "null_default")]
            tags: Vec<String>,
            #[serde(default, deserialize_with = "null_default")]
            enabled: bool,
        }

        let rec: Record = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(rec.tags.is_empty());
        assert!(!rec.enabled);
        let rec: Record = serde_json::from_str(r#"{"tags": ["a"], "enabled": true}"#).unwrap();
        assert_eq!(rec.tags, vec!["a".to_string()]);
        assert!(rec.enabled);
    }

    #[test]
    fn date_range_serializes_rfc3339() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let value = serde_json::to_value(DateRange::between(from, to)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"gte": "2024-01-01T00:00:00Z", "lte": "2024-02-01T00:00:00Z"})
        );
    }
}
