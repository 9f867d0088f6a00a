//! `/chapters/{chapter}/verses` and `/verses/{verse}`.

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::{TextOptions, VerseOptions};
use crate::shape::{shape_as_collection, shape_as_value, ShapedResult};
use crate::signature::{self, Signature};

use super::Route;

/// Verses of a chapter, optionally windowed by verse number.
pub fn verses(
    chapter: impl Into<Signature>,
    options: &VerseOptions,
) -> Result<Route, InvalidSignature> {
    let chapter = signature::parse_chapter(chapter)?;
    Ok(Route::new(format!("/chapters/{chapter}/verses.js")).options(options))
}

pub fn shape_verses(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_collection(envelope, "/verses")
}

pub fn verse(verse: impl Into<Signature>, options: &TextOptions) -> Result<Route, InvalidSignature> {
    let verse = signature::parse_verse(verse)?;
    Ok(Route::new(format!("/verses/{verse}.js")).options(options))
}

pub fn shape_verse(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_value(envelope, "/verses")
}
