//! JSON:API response documents and their normalization.

use serde_json::{Map, Value};

use crate::config::ErrorEnvelopePolicy;
use crate::error::{ApiError, ErrorObject};
use crate::transport::HttpResponse;
use crate::{Error, Result};

/// A JSON:API response document, returned to the caller unmodified.
///
/// ```rust
/// use outreach_sdk::Envelope;
///
/// let envelope = Envelope::new(200, serde_json::json!({
///     "data": [{"type": "prospect", "id": 1}],
///     "meta": {"count": 1},
/// }));
/// assert_eq!(envelope.data().unwrap()[0]["id"], 1);
/// assert_eq!(envelope.meta().unwrap()["count"], 1);
/// assert!(envelope.errors().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status: u16,
    document: Value,
}

impl Envelope {
    /// Wraps a parsed document.
    pub fn new(status: u16, document: Value) -> Self {
        Self { status, document }
    }

    /// An empty document, e.g. for `204 No Content`.
    pub fn empty(status: u16) -> Self {
        Self::new(status, Value::Object(Map::new()))
    }

    /// HTTP status of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The primary data: an object for single resources, an array for lists.
    pub fn data(&self) -> Option<&Value> {
        self.document.get("data")
    }

    /// Related resources requested with `include`.
    pub fn included(&self) -> Option<&Vec<Value>> {
        self.document.get("included").and_then(Value::as_array)
    }

    /// Top-level `meta`, e.g. the total when `count=true`.
    pub fn meta(&self) -> Option<&Value> {
        self.document.get("meta")
    }

    /// Top-level pagination `links`.
    pub fn links(&self) -> Option<&Value> {
        self.document.get("links")
    }

    /// URL of the next page, if any.
    pub fn next_page(&self) -> Option<&str> {
        self.links()?.get("next")?.as_str()
    }

    /// The `errors` list, present only when errors are returned rather than
    /// raised.
    pub fn errors(&self) -> Option<&Vec<Value>> {
        self.document.get("errors").and_then(Value::as_array)
    }

    /// Returns `true` if the document carries an `errors` list.
    pub fn is_error(&self) -> bool {
        self.errors().is_some()
    }

    /// The whole document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Consumes the envelope, returning the whole document.
    pub fn into_document(self) -> Value {
        self.document
    }

    /// Consumes the envelope, returning `data` or `Null`.
    pub fn into_data(self) -> Value {
        match self.document {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// Turns a transport response into an envelope or an error.
///
/// - an empty 2xx body is an empty envelope
/// - an unparseable body is `Http` for non-2xx, `InvalidResponse` otherwise
/// - an `errors` list is `Api` (first entry) under [`ErrorEnvelopePolicy::Raise`]
/// - any other non-2xx document is `Http`
pub(crate) fn normalize(response: HttpResponse, policy: ErrorEnvelopePolicy) -> Result<Envelope> {
    let status = response.status;

    if response.is_empty() {
        return if response.is_success() {
            Ok(Envelope::empty(status))
        } else {
            Err(Error::http(status, ""))
        };
    }

    let document: Value = match serde_json::from_slice(&response.body) {
        Ok(document) => document,
        Err(_) if !response.is_success() => return Err(Error::http(status, &response.text())),
        Err(e) => {
            return Err(Error::invalid_response(format!("response is not JSON: {e}")).with_status(status));
        }
    };

    if let Some(errors) = document.get("errors").and_then(Value::as_array) {
        return match policy {
            ErrorEnvelopePolicy::Raise => Err(Error::api(first_error(status, errors))),
            ErrorEnvelopePolicy::Return => Ok(Envelope::new(status, document)),
        };
    }

    if !response.is_success() {
        return Err(Error::http(status, &response.text()));
    }
    Ok(Envelope::new(status, document))
}

fn first_error(status: u16, errors: &[Value]) -> ApiError {
    errors
        .first()
        .and_then(|first| serde_json::from_value::<ErrorObject>(first.clone()).ok())
        .map(|object| ApiError::from_error_object(status, object))
        .unwrap_or_else(|| ApiError::new(status, "", ""))
}
