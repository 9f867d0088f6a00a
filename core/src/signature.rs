//! Validation and canonicalization of scripture references.
//!
//! # Design
//! A reference arrives either as its canonical string
//! (`VERSION_ID:BOOK_ID[.CHAPTER[.VERSE]]`) or as a JSON mapping of named
//! fields. The mapping is kept open (`serde_json::Map`) rather than
//! deserialized straight into a struct so that extra keys are detected and
//! rejected instead of silently dropped.
//!
//! A structured reference is rendered to its canonical string and then runs
//! through the same anchored pattern as string input. Both forms therefore
//! produce the same typed reference and the same path segment.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::InvalidSignature;

const VERSION: &str = r"(?P<version>(?:[A-Za-z0-9]+-)?[A-Za-z0-9]+)";
const BOOK: &str = r"(?P<book>[A-Za-z0-9]+)";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{VERSION}$")).expect("version pattern"));
static BOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{VERSION}:{BOOK}$")).expect("book pattern"));
static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{VERSION}:{BOOK}\.(?P<chapter>[0-9]+)$")).expect("chapter pattern")
});
static VERSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^{VERSION}:{BOOK}\.(?P<chapter>[0-9]+)\.(?P<verse>[0-9]+)$"
    ))
    .expect("verse pattern")
});

/// The level of detail a reference identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Version,
    Book,
    Chapter,
    Verse,
    Passage,
}

impl Granularity {
    /// Capitalized name used at the start of error messages.
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Version => "Version",
            Granularity::Book => "Book",
            Granularity::Chapter => "Chapter",
            Granularity::Verse => "Verse",
            Granularity::Passage => "Passage",
        }
    }

    /// The documented string form.
    pub fn form(self) -> &'static str {
        match self {
            Granularity::Version => "VERSION_ID",
            Granularity::Book => "VERSION_ID:BOOK_ID",
            Granularity::Chapter => "VERSION_ID:BOOK_ID.CHAPTER_NUMBER",
            Granularity::Verse => "VERSION_ID:BOOK_ID.CHAPTER_NUMBER.VERSE_NUMBER",
            Granularity::Passage => {
                "VERSION_ID:BOOK_ID.CHAPTER_NUMBER.VERSE_NUMBER-CHAPTER_NUMBER.VERSE_NUMBER"
            }
        }
    }

    /// The required keys of the structured form, as listed in error messages.
    ///
    /// Version ids are accepted as text only, so no `KeyMismatch` is ever
    /// raised at `Version` granularity; its arm names the lone key for
    /// completeness.
    pub fn key_list(self) -> &'static str {
        match self {
            Granularity::Version => ":version_id",
            Granularity::Book => ":version_id and :book_id",
            Granularity::Chapter => ":version_id, :book_id, and :chapter",
            Granularity::Verse => ":version_id, :book_id, :chapter, and :verse",
            Granularity::Passage => ":start and :end",
        }
    }

    /// Required keys of the structured form, in canonical-string order.
    fn keys(self) -> &'static [&'static str] {
        match self {
            // Unreachable: `parse_version` takes text only.
            Granularity::Version => &["version_id"],
            Granularity::Book => &["version_id", "book_id"],
            Granularity::Chapter => &["version_id", "book_id", "chapter"],
            Granularity::Verse => &["version_id", "book_id", "chapter", "verse"],
            Granularity::Passage => &["start", "end"],
        }
    }
}

/// A reference as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Signature {
    /// Canonical string form, e.g. `eng-GNTD:2Tim.1`.
    Text(String),
    /// Structured form, e.g. `{"version_id": "eng-GNTD", "book_id": "2Tim"}`.
    Fields(Map<String, Value>),
}

impl From<&str> for Signature {
    fn from(text: &str) -> Self {
        Signature::Text(text.to_string())
    }
}

impl From<String> for Signature {
    fn from(text: String) -> Self {
        Signature::Text(text)
    }
}

impl From<Map<String, Value>> for Signature {
    fn from(fields: Map<String, Value>) -> Self {
        Signature::Fields(fields)
    }
}

impl TryFrom<Value> for Signature {
    type Error = Value;

    /// Strings and objects convert; any other JSON value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Signature::Text(text)),
            Value::Object(fields) => Ok(Signature::Fields(fields)),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookReference {
    pub version_id: String,
    pub book_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterReference {
    pub version_id: String,
    pub book_id: String,
    pub chapter: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseReference {
    pub version_id: String,
    pub book_id: String,
    pub chapter: u32,
    pub verse: u32,
}

/// An inclusive range of verses within one book of one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassageReference {
    pub start: VerseReference,
    pub end: VerseReference,
}

impl fmt::Display for BookReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.version_id, self.book_id)
    }
}

impl fmt::Display for ChapterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}.{}", self.version_id, self.book_id, self.chapter)
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}.{}.{}",
            self.version_id, self.book_id, self.chapter, self.verse
        )
    }
}

impl fmt::Display for PassageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.start, self.end.chapter, self.end.verse)
    }
}

impl PassageReference {
    /// The human-readable range the passages endpoint expects in `q[]`,
    /// e.g. `2Tim 1:3-2:5`.
    pub fn query(&self) -> String {
        format!(
            "{} {}:{}-{}:{}",
            self.start.book_id, self.start.chapter, self.start.verse, self.end.chapter, self.end.verse
        )
    }
}

impl From<BookReference> for Signature {
    fn from(r: BookReference) -> Self {
        let mut fields = Map::new();
        fields.insert("version_id".into(), Value::String(r.version_id));
        fields.insert("book_id".into(), Value::String(r.book_id));
        Signature::Fields(fields)
    }
}

impl From<ChapterReference> for Signature {
    fn from(r: ChapterReference) -> Self {
        let mut fields = Map::new();
        fields.insert("version_id".into(), Value::String(r.version_id));
        fields.insert("book_id".into(), Value::String(r.book_id));
        fields.insert("chapter".into(), Value::from(r.chapter));
        Signature::Fields(fields)
    }
}

impl From<VerseReference> for Signature {
    fn from(r: VerseReference) -> Self {
        Signature::Fields(verse_fields(r))
    }
}

impl From<PassageReference> for Signature {
    fn from(r: PassageReference) -> Self {
        let mut fields = Map::new();
        fields.insert("start".into(), Value::Object(verse_fields(r.start)));
        fields.insert("end".into(), Value::Object(verse_fields(r.end)));
        Signature::Fields(fields)
    }
}

fn verse_fields(r: VerseReference) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("version_id".into(), Value::String(r.version_id));
    fields.insert("book_id".into(), Value::String(r.book_id));
    fields.insert("chapter".into(), Value::from(r.chapter));
    fields.insert("verse".into(), Value::from(r.verse));
    fields
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Validate a bare version identifier such as `eng-GNTD`.
pub fn parse_version(input: &str) -> Result<String, InvalidSignature> {
    if VERSION_RE.is_match(input) {
        Ok(input.to_string())
    } else {
        Err(InvalidSignature::Malformed(Granularity::Version))
    }
}

pub fn parse_book(signature: impl Into<Signature>) -> Result<BookReference, InvalidSignature> {
    let text = canonical_text(signature.into(), Granularity::Book)?;
    let caps = captures(&BOOK_RE, &text, Granularity::Book)?;
    Ok(BookReference {
        version_id: caps["version"].to_string(),
        book_id: caps["book"].to_string(),
    })
}

pub fn parse_chapter(
    signature: impl Into<Signature>,
) -> Result<ChapterReference, InvalidSignature> {
    let text = canonical_text(signature.into(), Granularity::Chapter)?;
    let caps = captures(&CHAPTER_RE, &text, Granularity::Chapter)?;
    Ok(ChapterReference {
        version_id: caps["version"].to_string(),
        book_id: caps["book"].to_string(),
        chapter: number(&caps, "chapter", Granularity::Chapter)?,
    })
}

pub fn parse_verse(signature: impl Into<Signature>) -> Result<VerseReference, InvalidSignature> {
    let text = canonical_text(signature.into(), Granularity::Verse)?;
    let caps = captures(&VERSE_RE, &text, Granularity::Verse)?;
    Ok(VerseReference {
        version_id: caps["version"].to_string(),
        book_id: caps["book"].to_string(),
        chapter: number(&caps, "chapter", Granularity::Verse)?,
        verse: number(&caps, "verse", Granularity::Verse)?,
    })
}

/// Parse a verse range.
///
/// The string form is a verse signature followed by `-` and either
/// `CHAPTER.VERSE` or a second full verse signature. The structured form is
/// a mapping with exactly `start` and `end`, each a verse-level reference;
/// errors from either endpoint are reported at verse granularity.
pub fn parse_passage(
    signature: impl Into<Signature>,
) -> Result<PassageReference, InvalidSignature> {
    let (start, end) = match signature.into() {
        Signature::Text(text) => passage_endpoints(&text)?,
        Signature::Fields(mut fields) => {
            if !has_exact_keys(&fields, Granularity::Passage) {
                return Err(InvalidSignature::KeyMismatch(Granularity::Passage));
            }
            let start = endpoint(fields.remove("start"))?;
            let end = endpoint(fields.remove("end"))?;
            (start, end)
        }
    };

    if start.version_id != end.version_id || start.book_id != end.book_id {
        return Err(InvalidSignature::MixedEndpoints);
    }
    if (end.chapter, end.verse) < (start.chapter, start.verse) {
        return Err(InvalidSignature::ReversedRange);
    }
    Ok(PassageReference { start, end })
}

/// Validate free-text search input. The text is kept exactly as given.
pub fn parse_search_query(query: &str) -> Result<String, InvalidSignature> {
    if query.trim().is_empty() {
        return Err(InvalidSignature::BlankQuery);
    }
    Ok(query.to_string())
}

fn passage_endpoints(text: &str) -> Result<(VerseReference, VerseReference), InvalidSignature> {
    let malformed = InvalidSignature::Malformed(Granularity::Passage);
    // Version identifiers may contain `-` too, so the separator is the first
    // one preceded by a complete verse signature.
    let (start, tail) = text
        .match_indices('-')
        .find_map(|(i, _)| parse_verse(&text[..i]).ok().map(|start| (start, &text[i + 1..])))
        .ok_or(malformed.clone())?;
    let end = if tail.contains(':') {
        parse_verse(tail)
    } else {
        parse_verse(format!("{}:{}.{tail}", start.version_id, start.book_id))
    }
    .map_err(|_| malformed)?;
    Ok((start, end))
}

fn endpoint(value: Option<Value>) -> Result<VerseReference, InvalidSignature> {
    let value = value.ok_or(InvalidSignature::KeyMismatch(Granularity::Passage))?;
    let signature = Signature::try_from(value)
        .map_err(|_| InvalidSignature::Malformed(Granularity::Verse))?;
    parse_verse(signature)
}

/// Render either form as a canonical string ready for pattern matching.
fn canonical_text(signature: Signature, granularity: Granularity) -> Result<String, InvalidSignature> {
    match signature {
        Signature::Text(text) => Ok(text),
        Signature::Fields(fields) => render(&fields, granularity),
    }
}

fn render(fields: &Map<String, Value>, granularity: Granularity) -> Result<String, InvalidSignature> {
    if !has_exact_keys(fields, granularity) {
        return Err(InvalidSignature::KeyMismatch(granularity));
    }
    let malformed = || InvalidSignature::Malformed(granularity);

    let mut text = String::new();
    for (i, key) in granularity.keys().iter().enumerate() {
        let value = fields.get(*key).ok_or_else(malformed)?;
        match i {
            0 => text.push_str(identifier(value).ok_or_else(malformed)?),
            1 => {
                text.push(':');
                text.push_str(identifier(value).ok_or_else(malformed)?);
            }
            _ => {
                text.push('.');
                text.push_str(&numeral(value).ok_or_else(malformed)?);
            }
        }
    }
    Ok(text)
}

fn has_exact_keys(fields: &Map<String, Value>, granularity: Granularity) -> bool {
    let required = granularity.keys();
    fields.len() == required.len() && required.iter().all(|key| fields.contains_key(*key))
}

fn identifier(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Chapter and verse numbers may be JSON integers or strings of digits.
fn numeral(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.clone())
        }
        _ => None,
    }
}

fn captures<'t>(
    pattern: &Regex,
    text: &'t str,
    granularity: Granularity,
) -> Result<Captures<'t>, InvalidSignature> {
    pattern
        .captures(text)
        .ok_or(InvalidSignature::Malformed(granularity))
}

fn number(caps: &Captures<'_>, name: &str, granularity: Granularity) -> Result<u32, InvalidSignature> {
    caps[name]
        .parse()
        .map_err(|_| InvalidSignature::Malformed(granularity))
}
