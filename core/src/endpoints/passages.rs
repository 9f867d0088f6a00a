//! `/passages` — verse ranges rendered as text.

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::TextOptions;
use crate::shape::{shape_as_collection, ShapedResult};
use crate::signature::{self, Signature};

use super::Route;

pub fn passages(
    passage: impl Into<Signature>,
    options: &TextOptions,
) -> Result<Route, InvalidSignature> {
    let passage = signature::parse_passage(passage)?;
    Ok(Route::new("/passages.js".to_string())
        .param("q[]", passage.query())
        .param("version", passage.start.version_id)
        .options(options))
}

pub fn shape_passages(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_collection(envelope, "/passages")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_query_parameters() {
        let route = passages("eng-GNTD:2Tim.1.3-1.7", &TextOptions::default()).unwrap();
        assert_eq!(route.path, "/passages.js");
        assert_eq!(
            route.query,
            vec![
                ("q[]".to_string(), "2Tim 1:3-1:7".to_string()),
                ("version".to_string(), "eng-GNTD".to_string()),
            ]
        );
    }

    #[test]
    fn reversed_range_never_builds() {
        assert_eq!(
            passages("eng-GNTD:2Tim.1.7-1.3", &TextOptions::default()).unwrap_err(),
            InvalidSignature::ReversedRange
        );
    }
}
