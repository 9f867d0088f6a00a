//! Request builder and response parser for the Bible search API.
//!
//! # Design
//! `BibleSearch` holds only its [`ClientConfig`] and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! validates the reference and produces an `HttpRequest`, and a `parse_*`
//! method that normalizes a `TransportResult` and shapes it. The caller
//! executes the HTTP round-trip in between.
//!
//! `BibleSearchClient` joins the two halves around a [`Transport`] for callers
//! that prefer one call per lookup. Validation failures are returned before
//! the transport is touched.

use tracing::debug;

use crate::config::ClientConfig;
use crate::endpoints::{books, chapters, passages, search, verses, versions, Route};
use crate::envelope::{normalize, normalize_with, ResultEnvelope};
use crate::error::InvalidSignature;
use crate::http::{HttpMethod, HttpRequest, Transport, TransportResult};
use crate::options::{BookOptions, SearchOptions, TextOptions, VerseOptions, VersionOptions};
use crate::shape::ShapedResult;
use crate::signature::Signature;

/// Synchronous, stateless builder/parser for the Bible search API.
#[derive(Debug, Clone)]
pub struct BibleSearch {
    config: ClientConfig,
}

impl BibleSearch {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, route: Route) -> HttpRequest {
        debug!(path = %route.path, params = route.query.len(), "request built");
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{}", self.config.base_url, route.path),
            query: route.query,
            headers: vec![
                ("authorization".to_string(), self.config.authorization()),
                ("accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    // -- versions ---------------------------------------------------------

    pub fn build_versions(&self, options: &VersionOptions) -> HttpRequest {
        self.request(versions::versions(options))
    }

    pub fn parse_versions(&self, outcome: TransportResult) -> ShapedResult {
        versions::shape_versions(normalize(outcome))
    }

    pub fn build_version(&self, version_id: &str) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(versions::version(version_id)?))
    }

    pub fn parse_version(&self, outcome: TransportResult) -> ShapedResult {
        versions::shape_version(normalize(outcome))
    }

    // -- books ------------------------------------------------------------

    pub fn build_books(
        &self,
        version_id: &str,
        options: &BookOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(books::books(version_id, options)?))
    }

    pub fn parse_books(&self, outcome: TransportResult) -> ShapedResult {
        books::shape_books(normalize(outcome))
    }

    pub fn build_book(&self, book: impl Into<Signature>) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(books::book(book)?))
    }

    pub fn parse_book(&self, outcome: TransportResult) -> ShapedResult {
        books::shape_book(normalize(outcome))
    }

    // -- chapters ---------------------------------------------------------

    pub fn build_chapters(
        &self,
        book: impl Into<Signature>,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(chapters::chapters(book)?))
    }

    pub fn parse_chapters(&self, outcome: TransportResult) -> ShapedResult {
        chapters::shape_chapters(normalize(outcome))
    }

    pub fn build_chapter(
        &self,
        chapter: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(chapters::chapter(chapter, options)?))
    }

    pub fn parse_chapter(&self, outcome: TransportResult) -> ShapedResult {
        chapters::shape_chapter(normalize(outcome))
    }

    // -- verses -----------------------------------------------------------

    pub fn build_verses(
        &self,
        chapter: impl Into<Signature>,
        options: &VerseOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(verses::verses(chapter, options)?))
    }

    pub fn parse_verses(&self, outcome: TransportResult) -> ShapedResult {
        verses::shape_verses(normalize(outcome))
    }

    pub fn build_verse(
        &self,
        verse: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(verses::verse(verse, options)?))
    }

    pub fn parse_verse(&self, outcome: TransportResult) -> ShapedResult {
        verses::shape_verse(normalize(outcome))
    }

    // -- passages and search ----------------------------------------------

    pub fn build_passages(
        &self,
        passage: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(passages::passages(passage, options)?))
    }

    pub fn parse_passages(&self, outcome: TransportResult) -> ShapedResult {
        passages::shape_passages(normalize(outcome))
    }

    pub fn build_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<HttpRequest, InvalidSignature> {
        Ok(self.request(search::search(query, options)?))
    }

    pub fn parse_search(&self, outcome: TransportResult) -> ShapedResult {
        search::shape_search(normalize(outcome))
    }
}

/// [`BibleSearch`] bound to a transport: one call per lookup.
///
/// Holds no state beyond its configuration and transport, so a shared
/// reference may be used from several threads when `T` allows it.
#[derive(Debug, Clone)]
pub struct BibleSearchClient<T> {
    api: BibleSearch,
    transport: T,
}

impl<T: Transport> BibleSearchClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            api: BibleSearch::new(config),
            transport,
        }
    }

    pub fn api(&self) -> &BibleSearch {
        &self.api
    }

    fn execute(&self, request: HttpRequest, shape: fn(ResultEnvelope) -> ShapedResult) -> ShapedResult {
        shape(normalize_with(|| self.transport.call(&request)))
    }

    pub fn versions(&self, options: &VersionOptions) -> ShapedResult {
        self.execute(self.api.build_versions(options), versions::shape_versions)
    }

    pub fn version(&self, version_id: &str) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_version(version_id)?;
        Ok(self.execute(request, versions::shape_version))
    }

    pub fn books(
        &self,
        version_id: &str,
        options: &BookOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_books(version_id, options)?;
        Ok(self.execute(request, books::shape_books))
    }

    pub fn book(&self, book: impl Into<Signature>) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_book(book)?;
        Ok(self.execute(request, books::shape_book))
    }

    pub fn chapters(&self, book: impl Into<Signature>) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_chapters(book)?;
        Ok(self.execute(request, chapters::shape_chapters))
    }

    pub fn chapter(
        &self,
        chapter: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_chapter(chapter, options)?;
        Ok(self.execute(request, chapters::shape_chapter))
    }

    pub fn verses(
        &self,
        chapter: impl Into<Signature>,
        options: &VerseOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_verses(chapter, options)?;
        Ok(self.execute(request, verses::shape_verses))
    }

    pub fn verse(
        &self,
        verse: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_verse(verse, options)?;
        Ok(self.execute(request, verses::shape_verse))
    }

    pub fn passages(
        &self,
        passage: impl Into<Signature>,
        options: &TextOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_passages(passage, options)?;
        Ok(self.execute(request, passages::shape_passages))
    }

    pub fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<ShapedResult, InvalidSignature> {
        let request = self.api.build_search(query, options)?;
        Ok(self.execute(request, search::shape_search))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::http::{HttpResponse, TransportFailure};
    use crate::signature::{BookReference, ChapterReference};

    fn config() -> ClientConfig {
        ClientConfig::new("secret", "http://localhost:3000").unwrap()
    }

    fn api() -> BibleSearch {
        BibleSearch::new(config())
    }

    fn ok(status: u16, body: serde_json::Value) -> TransportResult {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn build_chapters_produces_correct_request() {
        let req = api().build_chapters("eng-GNTD:2Tim").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/books/eng-GNTD:2Tim/chapters.js");
        assert!(req.query.is_empty());
        assert_eq!(req.header("authorization"), Some("Basic c2VjcmV0Olg="));
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn build_chapter_from_typed_reference() {
        let reference = ChapterReference {
            version_id: "eng-GNTD".to_string(),
            book_id: "2Tim".to_string(),
            chapter: 1,
        };
        let typed = api().build_chapter(reference, &TextOptions::default()).unwrap();
        let text = api().build_chapter("eng-GNTD:2Tim.1", &TextOptions::default()).unwrap();
        assert_eq!(typed, text);
    }

    #[test]
    fn build_passages_url() {
        let req = api()
            .build_passages("eng-GNTD:2Tim.1.3-1.7", &TextOptions::with_marginalia())
            .unwrap();
        assert_eq!(
            req.url(),
            "http://localhost:3000/passages.js?q%5B%5D=2Tim+1%3A3-1%3A7&version=eng-GNTD&include_marginalia=true"
        );
    }

    #[test]
    fn parse_chapters_success() {
        let shaped = api().parse_chapters(ok(
            200,
            json!({"response": {"meta": {"fums": "tok"}, "chapters": [{"id": "eng-GNTD:2Tim.1"}]}}),
        ));
        assert_eq!(shaped.items().len(), 1);
        assert_eq!(shaped.items()[0]["id"], "eng-GNTD:2Tim.1");
        assert_eq!(shaped.usage_token(), Some(&json!("tok")));
    }

    #[test]
    fn parse_chapter_not_found_is_none() {
        let shaped = api().parse_chapter(ok(404, json!({"response": {"meta": {"fums": "tok"}}})));
        assert!(shaped.item().is_none());
        assert!(shaped.succeeded());
        assert_eq!(shaped.http_status(), Some(404));
    }

    #[test]
    fn parse_books_bad_json() {
        let shaped = api().parse_books(Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        }));
        assert!(!shaped.succeeded());
        assert!(shaped.items().is_empty());
        assert_eq!(shaped.error_message(), Some("not json"));
    }

    #[test]
    fn client_rejects_before_calling_transport() {
        let calls = Cell::new(0);
        let transport = |_: &HttpRequest| -> TransportResult {
            calls.set(calls.get() + 1);
            Err(TransportFailure::unreachable("should not be called"))
        };
        let client = BibleSearchClient::new(config(), transport);
        let err = client.chapters("UnknownVersion").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Book signature must be in the form "VERSION_ID:BOOK_ID""#
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn client_hash_and_string_yield_equal_results() {
        let transport = |req: &HttpRequest| -> TransportResult {
            assert!(req.path.ends_with("/books/eng-GNTD:2Tim/chapters.js"));
            ok(200, json!({"response": {"meta": {"fums": "tok"}, "chapters": [{"id": "eng-GNTD:2Tim.1"}]}}))
        };
        let client = BibleSearchClient::new(config(), transport);
        let from_hash = client
            .chapters(BookReference {
                version_id: "eng-GNTD".to_string(),
                book_id: "2Tim".to_string(),
            })
            .unwrap();
        let from_text = client.chapters("eng-GNTD:2Tim").unwrap();
        assert_eq!(from_hash, from_text);
    }

    #[test]
    fn client_absorbs_transport_failure() {
        let transport = |_: &HttpRequest| -> TransportResult {
            Err(TransportFailure::unreachable("connection refused"))
        };
        let client = BibleSearchClient::new(config(), transport);
        let shaped = client.verse("eng-GNTD:2Tim.1.5", &TextOptions::default()).unwrap();
        assert!(!shaped.succeeded());
        assert!(shaped.item().is_none());
        assert_eq!(shaped.error_message(), Some("connection refused"));
    }
}
