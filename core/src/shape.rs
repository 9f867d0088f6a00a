//! Caller-facing result shapes.
//!
//! # Design
//! Each operation declares whether it answers with a collection or a single
//! value, and where in the payload the entities live (a JSON pointer such as
//! `/chapters`). The shaper consumes the envelope, selects that part of the
//! payload and wraps it:
//!
//! - collection: an array is used as-is, a lone object becomes a one-element
//!   list, and a missing or null selection is an empty list;
//! - value: the service answers single lookups with one-element lists, so an
//!   array contributes its first element; missing, null or empty is `None`.
//!
//! Neither an empty collection nor an absent value marks the call as failed.
//! The usage token (`meta.fums`) is attached whenever the service sent one.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::ResultEnvelope;
use crate::error::ServiceError;

/// Payload wrapped for the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Collection {
        items: Vec<Value>,
    },
    #[serde(rename = "value")]
    Single {
        item: Option<Value>,
    },
}

/// The value every lookup returns. Constructed once per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedResult {
    #[serde(flatten)]
    shape: Shape,
    usage_token: Option<Value>,
    http_status: Option<u16>,
    succeeded: bool,
    error_message: Option<String>,
}

impl ShapedResult {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }

    /// Items of a collection result. Empty for value results.
    pub fn items(&self) -> &[Value] {
        match &self.shape {
            Shape::Collection { items } => items,
            Shape::Single { .. } => &[],
        }
    }

    /// Item of a value result. `None` for collection results.
    pub fn item(&self) -> Option<&Value> {
        match &self.shape {
            Shape::Collection { .. } => None,
            Shape::Single { item } => item.as_ref(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, Shape::Collection { .. })
    }

    /// Opaque usage-accounting token (`meta.fums`), forwarded verbatim.
    pub fn usage_token(&self) -> Option<&Value> {
        self.usage_token.as_ref()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Escalate a failed call into a [`ServiceError`].
    pub fn check(self) -> Result<Self, ServiceError> {
        if self.succeeded {
            return Ok(self);
        }
        Err(ServiceError {
            status: self.http_status,
            message: self.error_message.unwrap_or_default(),
        })
    }
}

/// Shape the entities at `pointer` as zero or more items.
pub fn shape_as_collection(envelope: ResultEnvelope, pointer: &str) -> ShapedResult {
    let (selected, envelope) = select(envelope, pointer);
    let items = match selected {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => vec![other],
    };
    attach_usage_token(envelope, Shape::Collection { items })
}

/// An empty collection carrying the envelope's status and usage token.
pub(crate) fn shape_as_empty_collection(envelope: ResultEnvelope) -> ShapedResult {
    attach_usage_token(envelope, Shape::Collection { items: Vec::new() })
}

/// Shape the entity at `pointer` as a possibly absent single value.
pub fn shape_as_value(envelope: ResultEnvelope, pointer: &str) -> ShapedResult {
    let (selected, envelope) = select(envelope, pointer);
    let item = match selected {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => items.into_iter().next(),
        Some(other) => Some(other),
    };
    attach_usage_token(envelope, Shape::Single { item })
}

fn select(mut envelope: ResultEnvelope, pointer: &str) -> (Option<Value>, ResultEnvelope) {
    let selected = envelope
        .payload
        .as_mut()
        .and_then(|payload| payload.pointer_mut(pointer))
        .map(Value::take);
    (selected, envelope)
}

fn attach_usage_token(envelope: ResultEnvelope, shape: Shape) -> ShapedResult {
    let ResultEnvelope {
        mut metadata,
        http_status,
        succeeded,
        error_message,
        ..
    } = envelope;
    ShapedResult {
        shape,
        usage_token: metadata.remove("fums"),
        http_status,
        succeeded,
        error_message,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::normalize;
    use crate::http::{HttpResponse, TransportFailure};

    fn envelope(body: Value) -> ResultEnvelope {
        normalize(Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }))
    }

    #[test]
    fn collection_uses_array_as_is() {
        let env = envelope(json!({"response": {"meta": {"fums": "tok"}, "chapters": [{"id": 1}, {"id": 2}]}}));
        let shaped = shape_as_collection(env, "/chapters");
        assert_eq!(shaped.items(), &[json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(shaped.usage_token(), Some(&json!("tok")));
        assert!(shaped.succeeded());
    }

    #[test]
    fn collection_wraps_single_object() {
        let env = envelope(json!({"response": {"chapters": {"id": 1}}}));
        let shaped = shape_as_collection(env, "/chapters");
        assert_eq!(shaped.items(), &[json!({"id": 1})]);
        assert!(shaped.usage_token().is_none());
    }

    #[test]
    fn absent_collection_is_empty_not_failed() {
        let env = envelope(json!({"response": {"meta": {"fums": "tok"}}}));
        let shaped = shape_as_collection(env, "/chapters");
        assert!(shaped.items().is_empty());
        assert!(shaped.is_collection());
        assert!(shaped.succeeded());

        let env = envelope(json!({"response": {"chapters": null}}));
        assert!(shape_as_collection(env, "/chapters").items().is_empty());
    }

    #[test]
    fn value_takes_first_of_list() {
        let env = envelope(json!({"response": {"chapters": [{"id": "a"}, {"id": "b"}]}}));
        let shaped = shape_as_value(env, "/chapters");
        assert_eq!(shaped.item(), Some(&json!({"id": "a"})));
    }

    #[test]
    fn absent_value_is_none_and_still_succeeded() {
        let env = envelope(json!({"response": {"meta": {"fums": "tok"}, "chapters": []}}));
        let shaped = shape_as_value(env, "/chapters");
        assert!(shaped.item().is_none());
        assert!(shaped.succeeded());
        assert_eq!(shaped.usage_token(), Some(&json!("tok")));
    }

    #[test]
    fn nested_pointer_selection() {
        let env = envelope(json!({"response": {"search": {"result": {"type": "verses", "verses": [{"id": 1}]}}}}));
        let shaped = shape_as_collection(env, "/search/result/verses");
        assert_eq!(shaped.items().len(), 1);
    }

    #[test]
    fn failed_envelope_shapes_to_empty_and_checks_to_error() {
        let env = normalize(Err(TransportFailure::unreachable("refused")));
        let shaped = shape_as_collection(env, "/books");
        assert!(shaped.items().is_empty());
        assert!(!shaped.succeeded());
        let err = shaped.check().unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(err.message, "refused");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let env = envelope(json!({"response": {"meta": {"fums": "tok"}, "verses": [{"id": 1}]}}));
        let json = serde_json::to_value(shape_as_value(env, "/verses")).unwrap();
        assert_eq!(json["kind"], "value");
        assert_eq!(json["item"], json!({"id": 1}));
        assert_eq!(json["usage_token"], "tok");
    }
}
