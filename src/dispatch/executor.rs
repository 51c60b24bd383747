//! Single-unit move dispatch.
//! One provider call per (source item, property name) pair. The destination
//! property name always mirrors the source name; that is an invariant of the
//! operation's contract, not a caller choice.

use serde_json::Value;
use tracing::{debug, info};

use crate::context::ExecutionContext;
use crate::errors::PropertyError;
use crate::provider::ItemPath;

use super::resolve::ResolvedItem;

/// One unit of work: move `property` from `source` to the item named by
/// `destination`, keeping the property's own name.
#[derive(Debug, Clone)]
pub struct MoveRequest {
    pub source: ItemPath,
    pub property: String,
    pub destination: String,
}

impl MoveRequest {
    /// Destination property name; always equal to the source name.
    pub fn destination_property(&self) -> &str {
        &self.property
    }
}

pub(super) enum UnitOutcome {
    Moved(Option<Value>),
    Skipped,
}

/// Dispatch one unit against the item's owning provider.
pub(super) fn execute(
    item: &ResolvedItem,
    property: &str,
    destination: &str,
    context: &ExecutionContext,
) -> Result<UnitOutcome, PropertyError> {
    let provider = &item.provider;
    if !provider.supports_property_move() {
        return Err(PropertyError::NotSupported(provider.name().to_string()));
    }

    if !context.confirmed(&item.path, property, destination) {
        debug!(source = %item.path, property, "unit declined by confirmation; skipping");
        return Ok(UnitOutcome::Skipped);
    }

    if context.dry_run {
        info!(source = %item.path, property, destination, "dry-run: would move property");
        return Ok(UnitOutcome::Skipped);
    }

    let pass_thru = provider.move_property(&item.path, property, destination, property, context)?;
    info!(source = %item.path, property, destination, provider = provider.name(), "moved property");
    Ok(UnitOutcome::Moved(if context.pass_thru {
        pass_thru
    } else {
        None
    }))
}
