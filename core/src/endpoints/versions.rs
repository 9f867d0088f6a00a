//! `/versions` — translations offered by the service.

use crate::envelope::ResultEnvelope;
use crate::error::InvalidSignature;
use crate::options::VersionOptions;
use crate::shape::{shape_as_collection, shape_as_value, ShapedResult};
use crate::signature;

use super::Route;

pub fn versions(options: &VersionOptions) -> Route {
    Route::new("/versions.js".to_string()).options(options)
}

pub fn shape_versions(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_collection(envelope, "/versions")
}

pub fn version(version_id: &str) -> Result<Route, InvalidSignature> {
    let version_id = signature::parse_version(version_id)?;
    Ok(Route::new(format!("/versions/{version_id}.js")))
}

pub fn shape_version(envelope: ResultEnvelope) -> ShapedResult {
    shape_as_value(envelope, "/versions")
}
