//! Dynamic parameter negotiation.
//! Runs once per invocation, before resolution, against the provider owning
//! a representative sample path: the first supplied path, or "." when the
//! invocation carries no paths yet. The whole batch shares the one
//! negotiated set even when source paths span several items.

use tracing::debug;

use crate::context::{DynamicParameters, ExecutionContext};
use crate::errors::PropertyError;
use crate::registry::Registry;

/// Sample path used when no source paths are known at negotiation time.
const DEFAULT_SAMPLE_PATH: &str = ".";

/// Ask the sample path's provider what extra parameters a move needs.
///
/// A sample path that fails to resolve is not an error here: negotiation is
/// skipped and the same failure resurfaces per item inside the batch, where
/// it is properly isolated. Provider faults raised by the negotiation call
/// itself do propagate.
pub(super) fn negotiate(
    registry: &Registry,
    paths: &[String],
    property: &str,
    destination: &str,
    context: &ExecutionContext,
) -> Result<Option<DynamicParameters>, PropertyError> {
    let sample = paths
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_SAMPLE_PATH);

    let (provider, _) = match registry.resolve(sample, context) {
        Ok(found) => found,
        Err(err) => {
            debug!(code = err.code(), sample, error = %err, "sample path did not resolve; skipping negotiation");
            return Ok(None);
        }
    };

    let params =
        provider.move_property_dynamic_parameters(sample, property, destination, property, context)?;
    match &params {
        Some(p) if !p.is_empty() => {
            debug!(provider = provider.name(), count = p.len(), "negotiated dynamic parameters");
        }
        _ => debug!(provider = provider.name(), "provider declared no dynamic parameters"),
    }
    Ok(params)
}
