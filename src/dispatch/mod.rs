//! Dispatch pipeline: resolve, negotiate, execute, collect.

mod batch;
mod executor;
mod negotiate;
mod resolve;

pub use batch::{BatchEvent, MoveBatch};
pub use executor::MoveRequest;
pub use resolve::{PathSpec, ResolveError, ResolvedItem, Resolver, resolve_specs};

use tracing::debug;

use crate::context::ExecutionContext;
use crate::errors::PropertyError;
use crate::registry::Registry;

/// Parsed front-end inputs for one move invocation.
#[derive(Debug, Clone, Default)]
pub struct MoveParams {
    /// Path patterns or literal paths, in supplied order.
    pub paths: Vec<String>,
    /// Treat every path verbatim, bypassing wildcard expansion.
    pub literal: bool,
    /// Property names to move, in supplied order. May be empty (no work)
    /// and may contain duplicates.
    pub names: Vec<String>,
    /// Destination item path, passed to providers verbatim.
    pub destination: String,
}

/// Move the named properties from every resolved source item to
/// `params.destination`.
///
/// Dynamic parameters are negotiated once, with the first supplied path (or
/// "." when none) as the representative sample, and the one negotiated set
/// is shared by the whole batch. The returned [`MoveBatch`] is lazy; nothing
/// resolves or moves until it is iterated.
pub fn move_item_property<'a>(
    registry: &'a Registry,
    params: MoveParams,
    context: &ExecutionContext,
) -> Result<MoveBatch<'a>, PropertyError> {
    if params.destination.is_empty() {
        return Err(PropertyError::InvalidArgument(
            "destination must not be empty".to_string(),
        ));
    }
    if params.names.iter().any(String::is_empty) {
        return Err(PropertyError::InvalidArgument(
            "property names must not be empty".to_string(),
        ));
    }

    let first_property = params.names.first().map(String::as_str).unwrap_or_default();
    let negotiated = negotiate::negotiate(
        registry,
        &params.paths,
        first_property,
        &params.destination,
        context,
    )?;

    // The caller's context is never mutated; the negotiated set is merged
    // into a private copy shared by every unit in the batch.
    let mut effective = context.clone();
    if let Some(negotiated) = negotiated {
        match effective.dynamic_parameters.as_mut() {
            Some(existing) => existing.merge(negotiated),
            None => effective.dynamic_parameters = Some(negotiated),
        }
    }

    let specs: Vec<PathSpec> = params
        .paths
        .iter()
        .map(|p| {
            if params.literal {
                PathSpec::literal(p.as_str())
            } else {
                PathSpec::pattern(p.as_str())
            }
        })
        .collect();

    debug!(
        paths = specs.len(),
        properties = params.names.len(),
        destination = %params.destination,
        literal = params.literal,
        "starting property move batch"
    );

    let resolver = resolve_specs(registry, specs, &effective);
    Ok(MoveBatch::new(
        resolver,
        effective,
        params.destination,
        params.names,
    ))
}
