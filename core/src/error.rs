//! Error types for the Bible search client.
//!
//! # Design
//! Only [`InvalidSignature`] is ever returned as an `Err` from a lookup: it is
//! produced before any request is built, so nothing has touched the network.
//! Transport and decoding problems are absorbed into the result envelope and
//! surface through [`crate::ShapedResult`]; callers that want them as errors
//! call [`crate::ShapedResult::check`] and receive a [`ServiceError`].
//!
//! The `Display` text of `InvalidSignature` is part of the public contract.
//! Callers (and tests) compare it verbatim.

use thiserror::Error;

use crate::signature::Granularity;

/// A caller-supplied reference did not match the documented format or key set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSignature {
    /// The string form did not match `VERSION_ID:BOOK_ID[.CHAPTER[.VERSE]]`,
    /// or a structured value could not be rendered into that form.
    #[error("{} signature must be in the form \"{}\"", .0.label(), .0.form())]
    Malformed(Granularity),

    /// The structured form had missing or extra keys.
    #[error("{} signature hash must include {}", .0.label(), .0.key_list())]
    KeyMismatch(Granularity),

    /// A passage whose end verse comes before its start verse.
    #[error("Passage signature must end at or after its start")]
    ReversedRange,

    /// A passage whose endpoints name different versions or books.
    #[error("Passage signature endpoints must share :version_id and :book_id")]
    MixedEndpoints,

    /// A search request with no query text.
    #[error("Search query must not be blank")]
    BlankQuery,
}

/// A normalized call that did not succeed, raised on request by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed (HTTP {}): {message}", status_label(.status))]
pub struct ServiceError {
    /// Status code of the exchange, if one took place.
    pub status: Option<u16>,
    /// Raw body text or transport message captured by the normalizer.
    pub message: String,
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "n/a".to_string(),
    }
}

/// Client configuration could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingApiKey(&'static str),

    #[error("base URL must not be empty")]
    EmptyBaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_messages_name_the_expected_form() {
        assert_eq!(
            InvalidSignature::Malformed(Granularity::Book).to_string(),
            r#"Book signature must be in the form "VERSION_ID:BOOK_ID""#
        );
        assert_eq!(
            InvalidSignature::Malformed(Granularity::Chapter).to_string(),
            r#"Chapter signature must be in the form "VERSION_ID:BOOK_ID.CHAPTER_NUMBER""#
        );
    }

    #[test]
    fn key_mismatch_messages_list_required_keys() {
        assert_eq!(
            InvalidSignature::KeyMismatch(Granularity::Book).to_string(),
            "Book signature hash must include :version_id and :book_id"
        );
        assert_eq!(
            InvalidSignature::KeyMismatch(Granularity::Verse).to_string(),
            "Verse signature hash must include :version_id, :book_id, :chapter, and :verse"
        );
    }

    #[test]
    fn service_error_without_status() {
        let err = ServiceError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "request failed (HTTP n/a): connection refused");
    }
}
