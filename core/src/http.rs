//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and transport outcomes as plain data.
//! The core builds `HttpRequest` values and interprets `TransportResult`
//! values without ever touching the network. The caller (or a [`Transport`]
//! implementation it supplies) performs the actual round-trip.
//!
//! A transport attempt has exactly two shapes: an HTTP exchange completed
//! (`Ok(HttpResponse)`, whatever its status or body), or it did not
//! (`Err(TransportFailure)`). Decoding the body is the normalizer's job, so a
//! malformed body is never a transport failure.

use thiserror::Error;
use url::form_urlencoded;

/// HTTP method for a request. The service is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
///
/// `path` already includes the configured base URL. `query` holds unencoded
/// key/value pairs in emission order; [`HttpRequest::url`] encodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Full request URL with the query string percent-encoded.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{query}", self.path)
    }

    /// First header value whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP exchange described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A transport attempt that did not yield a usable HTTP exchange.
///
/// Some transports fail after a status line or partial body arrived; those
/// pieces are kept so the normalizer can report them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub message: String,
}

impl TransportFailure {
    /// A failure before any HTTP exchange took place (DNS, connect, TLS...).
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }
}

/// Outcome of one transport attempt.
pub type TransportResult = Result<HttpResponse, TransportFailure>;

/// The external HTTP collaborator.
///
/// Implementations execute the request as given (authentication and accept
/// headers are already present) and report the outcome. Redirect, TLS and
/// timeout policy belong to the implementation.
pub trait Transport {
    fn call(&self, request: &HttpRequest) -> TransportResult;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> TransportResult,
{
    fn call(&self, request: &HttpRequest) -> TransportResult {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: Vec<(&str, &str)>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: "https://bibles.org/v2/passages.js".to_string(),
            query: query
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
        }
    }

    #[test]
    fn url_without_query_is_the_path() {
        assert_eq!(request(Vec::new()).url(), "https://bibles.org/v2/passages.js");
    }

    #[test]
    fn url_encodes_query_pairs() {
        let req = request(vec![("q[]", "2Tim 1:3-2:5"), ("version", "eng-GNTD")]);
        assert_eq!(
            req.url(),
            "https://bibles.org/v2/passages.js?q%5B%5D=2Tim+1%3A3-2%3A5&version=eng-GNTD"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(Vec::new());
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn closures_are_transports() {
        let transport = |_: &HttpRequest| -> TransportResult {
            Err(TransportFailure::unreachable("offline"))
        };
        let err = Transport::call(&transport, &request(Vec::new())).unwrap_err();
        assert_eq!(err.to_string(), "offline");
        assert_eq!(err.status, None);
    }
}
