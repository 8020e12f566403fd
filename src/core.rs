//! Shared runtime-agnostic logic for the async and blocking clients.
//!
//! Resource services describe each call as an [`ApiRequest`] (method, path,
//! query pairs, JSON body). Both transports execute the same description, so
//! request construction and validation live here and in the resource modules,
//! never in the transports.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    errors::{Error, Result, ValidationError},
    query::flatten_query,
};

/// A fully described API call, independent of the transport that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append deepObject-flattened query parameters.
    pub fn with_query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self> {
        self.query.extend(flatten_query(params)?);
        Ok(self)
    }

    /// Append a single query pair.
    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Serialization)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Replace a query pair (or add it), used when walking pages.
    pub(crate) fn set_query_pair(&mut self, key: &str, value: String) {
        if let Some(slot) = self.query.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.query.push((key.to_string(), value));
        }
    }
}

/// Decode a 2xx body. Empty bodies (204 No Content) decode as JSON `null`, so
/// `()` and `Option<T>` responses work for delete-style endpoints.
pub(crate) fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let trimmed = bytes.iter().all(|b| b.is_ascii_whitespace());
    let source: &[u8] = if trimmed { b"null" } else { bytes };
    serde_json::from_slice(source).map_err(Error::Serialization)
}

/// Join the configured base URL and a request path (absolute URLs pass through).
pub(crate) fn join_url(base_url: &str, path: &str) -> Result<reqwest::Url> {
    let raw = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    };
    reqwest::Url::parse(&raw).map_err(|err| Error::Config(format!("invalid request url: {err}")))
}

/// Validate and percent-encode a path parameter.
pub(crate) fn path_param(value: &str, field: &str) -> Result<String> {
    require(value, field)?;
    Ok(urlencoding::encode(value.trim()).into_owned())
}

/// Reject the nil UUID as a path parameter.
pub(crate) fn uuid_param(id: &uuid::Uuid, field: &str) -> Result<String> {
    if id.is_nil() {
        return Err(ValidationError::required(field).into());
    }
    Ok(id.to_string())
}

/// Reject empty or whitespace-only required strings.
pub(crate) fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field).into());
    }
    Ok(())
}

/// Reject an empty required list.
pub(crate) fn require_items<T>(items: &[T], field: &str) -> Result<()> {
    if items.is_empty() {
        return Err(ValidationError::new(format!("{field} must not be empty"))
            .with_field(field)
            .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_param_encodes_reserved_characters() {
        assert_eq!(path_param("+13125550001", "id").unwrap(), "%2B13125550001");
        assert_eq!(path_param("v3:abc/def", "id").unwrap(), "v3%3Aabc%2Fdef");
    }

    #[test]
    fn path_param_rejects_blank() {
        let err = path_param("   ", "call_control_id").unwrap_err();
        match err {
            Error::Validation(v) => assert_eq!(v.field.as_deref(), Some("call_control_id")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_collects_query_and_body() {
        let req = ApiRequest::post("/messages")
            .with_query(&json!({"page": {"number": 1}}))
            .unwrap()
            .with_json(&json!({"to": "+13125550001"}))
            .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.query(), &[("page[number]".to_string(), "1".to_string())]);
        assert_eq!(req.body(), Some(&json!({"to": "+13125550001"})));
    }

    #[test]
    fn set_query_pair_replaces_existing() {
        let mut req = ApiRequest::get("/rooms").with_query_pair("page[number]", "1");
        req.set_query_pair("page[number]", "3".into());
        req.set_query_pair("page[size]", "10".into());
        assert_eq!(
            req.query(),
            &[
                ("page[number]".to_string(), "3".to_string()),
                ("page[size]".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn decode_empty_body_as_unit() {
        decode_json::<()>(b"").unwrap();
        decode_json::<()>(b"  \n").unwrap();
        let none: Option<serde_json::Value> = decode_json(b"").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn join_url_keeps_base_path() {
        let url = join_url("https://api.telnyx.com/v2", "/phone_numbers/%2B1555").unwrap();
        assert_eq!(url.as_str(), "https://api.telnyx.com/v2/phone_numbers/%2B1555");
        let url = join_url("https://api.telnyx.com/v2", "balance").unwrap();
        assert_eq!(url.as_str(), "https://api.telnyx.com/v2/balance");
    }

    #[test]
    fn uuid_param_rejects_nil() {
        assert!(uuid_param(&uuid::Uuid::nil(), "id").is_err());
        let id = uuid::Uuid::new_v4();
        assert_eq!(uuid_param(&id, "id").unwrap(), id.to_string());
    }

    #[test]
    fn require_items_rejects_empty() {
        assert!(require_items::<String>(&[], "phone_numbers").is_err());
        assert!(require_items(&["+1"], "phone_numbers").is_ok());
    }
}
