use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};

use crate::{
    errors::{ApiError, ApiErrorDetail, Error, Result},
    IDEMPOTENCY_KEY_HEADER, REQUEST_ID_HEADER,
};

/// Per-call overrides applied on top of the client defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub headers: HeaderList,
    pub timeout: Option<Duration>,
    pub idempotency_key: Option<String>,
}

impl RequestOptions {
    /// Add an extra header. Entries with a blank key or value are dropped.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let entry = HeaderEntry::new(key.into(), value.into());
        if entry.is_valid() {
            self.headers.push(entry);
        }
        self
    }

    /// Override the overall request timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send an `Idempotency-Key` header so the API deduplicates replays.
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub(crate) fn header_entries(&self) -> HeaderList {
        let mut list = self.headers.clone();
        if let Some(key) = self.idempotency_key.as_deref() {
            if !key.trim().is_empty() {
                list.push(HeaderEntry::new(
                    IDEMPOTENCY_KEY_HEADER.to_string(),
                    key.to_string(),
                ));
            }
        }
        list
    }
}

/// Structured header list with validation.
#[derive(Clone, Debug, Default)]
pub struct HeaderList(Vec<HeaderEntry>);

impl HeaderList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a header entry.
    ///
    /// # Panics
    /// Panics if the header key or value is empty or contains only whitespace.
    pub fn push(&mut self, entry: HeaderEntry) {
        assert!(
            entry.is_valid(),
            "Invalid header: key and value must be non-empty (got key={:?}, value={:?})",
            entry.key,
            entry.value
        );
        self.0.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }

    pub fn is_valid(&self) -> bool {
        !(self.key.trim().is_empty() || self.value.trim().is_empty())
    }
}

/// Convert the valid entries of a header list into typed header pairs.
pub(crate) fn header_pairs(headers: &HeaderList) -> Result<Vec<(HeaderName, HeaderValue)>> {
    headers
        .iter()
        .filter(|entry| entry.is_valid())
        .map(|entry| {
            let name = HeaderName::from_bytes(entry.key.trim().as_bytes())
                .map_err(|err| Error::Config(format!("invalid header name: {err}")))?;
            let val = HeaderValue::from_str(entry.value.trim())
                .map_err(|err| Error::Config(format!("invalid header value: {err}")))?;
            Ok((name, val))
        })
        .collect()
}

pub(crate) fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

pub(crate) fn parse_api_error_parts(status: StatusCode, headers: &HeaderMap, body: String) -> Error {
    let request_id = request_id_from_headers(headers);
    let status_code = status.as_u16();
    let status_text = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();

    if body.trim().is_empty() {
        return ApiError {
            status: status_code,
            code: None,
            message: status_text,
            request_id,
            errors: Vec::new(),
            raw_body: None,
        }
        .into();
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
        if let Some(first) = envelope.errors.first() {
            let message = first
                .detail
                .clone()
                .filter(|s| !s.trim().is_empty())
                .or_else(|| first.title.clone())
                .unwrap_or_else(|| status_text.clone());
            return ApiError {
                status: status_code,
                code: first.code.clone(),
                message,
                request_id,
                errors: envelope.errors,
                raw_body: Some(body),
            }
            .into();
        }
    }

    // Not the documented envelope: fall back to a top-level message or the raw body.
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.clone());
    ApiError {
        status: status_code,
        code: None,
        message,
        request_id,
        errors: Vec::new(),
        raw_body: Some(body),
    }
    .into()
}
