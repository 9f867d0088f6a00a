//! `/books` — the books of a version, and single book lookups.

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::BookOptions;
use crate::shape::{shape_as_collection, shape_as_value, ShapedResult};
use crate::signature::{self, Signature};

use super::Route;

pub fn books(version_id: &str, options: &BookOptions) -> Result<Route, InvalidSignature> {
    let version_id = signature::parse_version(version_id)?;
    Ok(Route::new(format!("/versions/{version_id}/books.js")).options(options))
}

pub fn shape_books(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_collection(envelope, "/books")
}

pub fn book(book: impl Into<Signature>) -> Result<Route, InvalidSignature> {
    let book = signature::parse_book(book)?;
    Ok(Route::new(format!("/books/{book}.js")))
}

pub fn shape_book(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_value(envelope, "/books")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Testament;

    #[test]
    fn books_filtered_by_testament() {
        let route = books(
            "eng-GNTD",
            &BookOptions {
                testament: Some(Testament::Old),
            },
        )
        .unwrap();
        assert_eq!(route.path, "/versions/eng-GNTD/books.js");
        assert_eq!(route.query, vec![("testament".to_string(), "OT".to_string())]);
    }

    #[test]
    fn book_path_uses_canonical_signature() {
        assert_eq!(book("eng-GNTD:2Tim").unwrap().path, "/books/eng-GNTD:2Tim.js");
    }
}
