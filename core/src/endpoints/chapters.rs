//! `/books/{book}/chapters` and `/chapters/{chapter}`.

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::TextOptions;
use crate::shape::{shape_as_collection, shape_as_value, ShapedResult};
use crate::signature::{self, Signature};

use super::Route;

/// Chapters of a book. Accepts a book-level reference.
pub fn chapters(book: impl Into<Signature>) -> Result<Route, InvalidSignature> {
    let book = signature::parse_book(book)?;
    Ok(Route::new(format!("/books/{book}/chapters.js")))
}

pub fn shape_chapters(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_collection(envelope, "/chapters")
}

/// One chapter with its text. Accepts a chapter-level reference.
pub fn chapter(
    chapter: impl Into<Signature>,
    options: &TextOptions,
) -> Result<Route, InvalidSignature> {
    let chapter = signature::parse_chapter(chapter)?;
    Ok(Route::new(format!("/chapters/{chapter}.js")).options(options))
}

pub fn shape_chapter(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_value(envelope, "/chapters")
}
