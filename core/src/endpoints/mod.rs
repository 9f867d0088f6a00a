//! Per-resource operations.
//!
//! Each module pairs a request builder (validate the reference through
//! [`crate::signature`], produce a [`Route`]) with a shaper that picks the
//! entities out of the normalized envelope. Modules depend only on the
//! signature parser and the result shaper; [`crate::BibleSearch`] composes
//! them.

pub mod books;
pub mod chapters;
pub mod passages;
pub mod search;
pub mod verses;
pub mod versions;

use crate::options::QueryOptions;

/// Path (relative to the base URL) and query parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Route {
    pub(crate) fn new(path: String) -> Self {
        Self {
            path,
            query: Vec::new(),
        }
    }

    pub(crate) fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub(crate) fn options(mut self, options: &impl QueryOptions) -> Self {
        self.query.extend(options.query_pairs());
        self
    }
}
