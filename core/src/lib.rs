//! Synchronous client core for a Bible-text REST service.
//!
//! # Overview
//! Validates scripture references, builds `HttpRequest` values for the
//! service's books/chapters/verses/passages/search endpoints, and turns
//! whatever the transport produced into a uniform `ShapedResult`. The caller
//! executes the HTTP round-trip (host-does-IO), either between `build_*` and
//! `parse_*` on [`BibleSearch`] or through a [`Transport`] handed to
//! [`BibleSearchClient`].
//!
//! # Design
//! - `signature` accepts a reference as its canonical string or as a JSON
//!   mapping, and renders both to the same path segment.
//! - `envelope` never fails: transport errors and undecodable bodies are
//!   captured in a `ResultEnvelope` with `succeeded == false`.
//! - `shape` wraps the payload as a collection or a single value and forwards
//!   the service's usage token.
//! - `InvalidSignature` is the only error a lookup returns, and it is
//!   returned before any request exists.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod options;
pub mod shape;
pub mod signature;

pub use client::{BibleSearch, BibleSearchClient};
pub use config::ClientConfig;
pub use envelope::ResultEnvelope;
pub use error::{ConfigError, InvalidSignature, ServiceError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportFailure, TransportResult};
pub use options::{BookOptions, SearchOptions, Testament, TextOptions, VerseOptions, VersionOptions};
pub use shape::{Shape, ShapedResult};
pub use signature::{
    BookReference, ChapterReference, Granularity, PassageReference, Signature, VerseReference,
};
