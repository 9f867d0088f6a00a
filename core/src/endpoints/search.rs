//! `/search` — full-text search.
//!
//! The service reports whether a query matched verses or resolved to a
//! passage reference in `search.result.type`; the items live under the key of
//! the same name. Without a `type` there is nothing to select, so the result
//! is an empty collection.

use serde_json::Value;

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::SearchOptions;
use crate::shape::{shape_as_collection, shape_as_empty_collection, ShapedResult};
use crate::signature;

use super::Route;

pub fn search(query: &str, options: &SearchOptions) -> Result<Route, InvalidSignature> {
    let query = signature::parse_search_query(query)?;
    for version_id in &options.versions {
        signature::parse_version(version_id)?;
    }
    Ok(Route::new("/search.js".to_string())
        .param("query", query)
        .options(options))
}

pub fn shape_search(envelope: ResultEnvelope) -> ShapedResult {
    let pointer = envelope
        .payload()
        .and_then(|payload| payload.pointer("/search/result/type"))
        .and_then(Value::as_str)
        .map(|kind| format!("/search/result/{}", escape_token(kind)));
    match pointer {
        Some(pointer) => shape_as_collection(envelope, &pointer),
        None => shape_as_empty_collection(envelope),
    }
}

/// Escape one JSON pointer reference token (RFC 6901).
fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::normalize;
    use crate::http::HttpResponse;

    fn envelope(body: Value) -> ResultEnvelope {
        normalize(Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }))
    }

    #[test]
    fn search_scoped_to_versions() {
        let route = search(
            "grace",
            &SearchOptions {
                versions: vec!["eng-GNTD".to_string()],
            },
        )
        .unwrap();
        assert_eq!(
            route.query,
            vec![
                ("query".to_string(), "grace".to_string()),
                ("version".to_string(), "eng-GNTD".to_string()),
            ]
        );
    }

    #[test]
    fn search_rejects_bad_scope() {
        let err = search(
            "grace",
            &SearchOptions {
                versions: vec!["eng-GNTD:2Tim".to_string()],
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"Version signature must be in the form "VERSION_ID""#);
    }

    #[test]
    fn shapes_passage_results() {
        let env = envelope(json!({"response": {"meta": {"fums": "t"}, "search": {"result": {
            "type": "passages",
            "passages": [{"display": "2 Timothy 1:3-7"}]
        }}}}));
        let shaped = shape_search(env);
        assert_eq!(shaped.items(), &[json!({"display": "2 Timothy 1:3-7"})]);
    }

    #[test]
    fn result_without_type_is_empty() {
        let env = envelope(json!({"response": {"search": {"result": {
            "verses": [{"id": "eng-GNTD:2Tim.1.15"}]
        }}}}));
        let shaped = shape_search(env);
        assert!(shaped.succeeded());
        assert!(shaped.items().is_empty());
    }

    #[test]
    fn type_is_a_single_key_not_a_path() {
        let env = envelope(json!({"response": {"search": {"result": {
            "type": "nested/verses",
            "nested": {"verses": [{"id": "wrong"}]},
            "nested/verses": [{"id": "eng-GNTD:2Tim.1.15"}]
        }}}}));
        let shaped = shape_search(env);
        assert_eq!(shaped.items(), &[json!({"id": "eng-GNTD:2Tim.1.15"})]);
    }

    #[test]
    fn missing_result_is_empty() {
        let env = envelope(json!({"response": {"search": {}}}));
        assert!(shape_search(env).items().is_empty());
    }
}
