//! Normalization of transport outcomes into a uniform result envelope.
//!
//! # Design
//! The service wraps every answer as `{"response": {"meta": {...}, ...}}`.
//! [`normalize`] splits that into `metadata` (the `meta` object) and
//! `payload` (the rest of `response`). Every other outcome (an unreachable
//! host, a body that is not JSON, JSON without a `response` object) becomes
//! an envelope with `succeeded == false` and an `error_message`. Nothing here
//! returns an error; callers decide whether a failed envelope matters.
//!
//! The HTTP status is copied from the transport outcome before any branch
//! runs. A 404 carrying a well-formed envelope is a successful call whose
//! payload simply lacks the entity.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::http::{HttpResponse, TransportFailure, TransportResult};

/// Normalized outcome of one API call. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub(crate) metadata: Map<String, Value>,
    pub(crate) http_status: Option<u16>,
    pub(crate) succeeded: bool,
    pub(crate) payload: Option<Value>,
    pub(crate) error_message: Option<String>,
}

impl ResultEnvelope {
    /// The service's `meta` section. Empty when the service sent none.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Status code of the exchange; `None` only when no exchange happened.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Everything under `response` except `meta`.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The service-issued usage token (`meta.fums`), forwarded verbatim.
    pub fn usage_token(&self) -> Option<&Value> {
        self.metadata.get("fums")
    }

    fn failed(http_status: Option<u16>, error_message: String) -> Self {
        Self {
            metadata: Map::new(),
            http_status,
            succeeded: false,
            payload: None,
            error_message: Some(error_message),
        }
    }
}

/// Run a transport call and normalize whatever it produced.
pub fn normalize_with<F>(call: F) -> ResultEnvelope
where
    F: FnOnce() -> TransportResult,
{
    normalize(call())
}

/// Turn a transport outcome into a [`ResultEnvelope`]. Never fails.
pub fn normalize(outcome: TransportResult) -> ResultEnvelope {
    match outcome {
        Ok(response) => from_response(response),
        Err(failure) => from_failure(failure),
    }
}

fn from_failure(failure: TransportFailure) -> ResultEnvelope {
    let TransportFailure {
        status,
        body,
        message,
    } = failure;
    warn!(status = ?status, reason = %message, "transport failure captured");
    let error_message = match body {
        Some(body) if !body.is_empty() => body,
        _ => message,
    };
    ResultEnvelope::failed(status, error_message)
}

fn from_response(response: HttpResponse) -> ResultEnvelope {
    let status = Some(response.status);

    let document: Value = match serde_json::from_str(&response.body) {
        Ok(document) => document,
        Err(e) => {
            warn!(status = response.status, error = %e, "response body is not JSON");
            let error_message = if response.body.is_empty() {
                e.to_string()
            } else {
                response.body
            };
            return ResultEnvelope::failed(status, error_message);
        }
    };

    let Value::Object(mut root) = document else {
        warn!(status = response.status, "response body is not a JSON object");
        return ResultEnvelope::failed(status, response.body);
    };
    let Some(Value::Object(mut section)) = root.remove("response") else {
        warn!(status = response.status, "response body has no `response` object");
        return ResultEnvelope::failed(status, response.body);
    };

    let metadata = match section.remove("meta") {
        Some(Value::Object(meta)) => meta,
        _ => Map::new(),
    };
    debug!(
        status = response.status,
        fields = section.len(),
        "response normalized"
    );
    ResultEnvelope {
        metadata,
        http_status: status,
        succeeded: true,
        payload: Some(Value::Object(section)),
        error_message: None,
    }
}
