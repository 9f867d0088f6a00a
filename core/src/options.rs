//! Optional flags accompanying a lookup.
//!
//! # Design
//! Each operation takes the option struct that lists exactly what it
//! permits, so an unsupported flag is a type error rather than a silently
//! ignored key. All of them lower to query pairs through [`QueryOptions`];
//! none of them affects whether a reference is valid.

use serde::{Deserialize, Serialize};

/// Options that contribute query parameters to an outgoing request.
pub trait QueryOptions {
    fn query_pairs(&self) -> Vec<(String, String)>;
}

/// Text lookups (chapter, verse, passages).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    /// Include footnotes and cross references with the text.
    #[serde(default)]
    pub include_marginalia: bool,
}

impl TextOptions {
    pub fn with_marginalia() -> Self {
        Self {
            include_marginalia: true,
        }
    }
}

impl QueryOptions for TextOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.include_marginalia {
            pairs.push(("include_marginalia".to_string(), "true".to_string()));
        }
        pairs
    }
}

/// Testament filter for book listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Testament {
    #[serde(rename = "OT")]
    Old,
    #[serde(rename = "NT")]
    New,
    #[serde(rename = "DEUT")]
    Deuterocanon,
}

impl Testament {
    pub fn code(self) -> &'static str {
        match self {
            Testament::Old => "OT",
            Testament::New => "NT",
            Testament::Deuterocanon => "DEUT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOptions {
    #[serde(default)]
    pub testament: Option<Testament>,
}

impl QueryOptions for BookOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.testament
            .map(|t| ("testament".to_string(), t.code().to_string()))
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOptions {
    /// ISO 639-3 language code, e.g. `eng`.
    #[serde(default)]
    pub language: Option<String>,
}

impl QueryOptions for VersionOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.language
            .iter()
            .map(|l| ("language".to_string(), l.clone()))
            .collect()
    }
}

/// Verse listings within one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseOptions {
    /// First verse number to return.
    #[serde(default)]
    pub start: Option<u32>,
    /// Last verse number to return.
    #[serde(default)]
    pub end: Option<u32>,
    #[serde(default)]
    pub include_marginalia: bool,
}

impl QueryOptions for VerseOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start".to_string(), start.to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end".to_string(), end.to_string()));
        }
        if self.include_marginalia {
            pairs.push(("include_marginalia".to_string(), "true".to_string()));
        }
        pairs
    }
}

/// Scope restriction for full-text search.
///
/// Version identifiers are validated by the search operation before any
/// request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Restrict results to these versions. Empty means the service default.
    #[serde(default)]
    pub versions: Vec<String>,
}

impl QueryOptions for SearchOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        if self.versions.is_empty() {
            return Vec::new();
        }
        vec![("version".to_string(), self.versions.join(","))]
    }
}
