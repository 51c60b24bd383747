//! Provider capability interface and parsed item paths.
//! A provider owns a subtree of the addressable namespace (one or more
//! mounted drives) and defines its own wildcard and property semantics. The
//! dispatch core never touches item data; it only routes calls here.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::{DynamicParameters, ExecutionContext};
use crate::errors::PropertyError;

/// A parsed provider-namespace path: mounted drive plus drive-relative path.
/// Displays as `drive:path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPath {
    drive: String,
    path: String,
}

impl ItemPath {
    pub fn new(drive: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            drive: drive.into(),
            path: path.into(),
        }
    }

    pub fn drive(&self) -> &str {
        &self.drive
    }

    /// Drive-relative portion of the path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.drive, self.path)
    }
}

/// Capability interface implemented by every pluggable backing store.
pub trait PropertyProvider: std::fmt::Debug {
    /// Unique provider name used for registration and `provider::` path
    /// qualifiers.
    fn name(&self) -> &str;

    /// Whether this provider implements the property-move primitive. A move
    /// against a provider answering `false` fails with `NotSupported`.
    fn supports_property_move(&self) -> bool;

    /// Whether `item` names an existing item.
    fn item_exists(
        &self,
        item: &ItemPath,
        context: &ExecutionContext,
    ) -> Result<bool, PropertyError>;

    /// Expand a wildcard pattern into concrete drive-relative paths.
    ///
    /// Wildcard syntax is provider-defined; [`crate::pattern::WildcardPattern`]
    /// offers the default `*`/`?`/character-class semantics. An empty result
    /// is not an error; providers that treat "no match" as a failure return
    /// `ItemNotFound` instead.
    fn expand_wildcards(
        &self,
        pattern: &ItemPath,
        context: &ExecutionContext,
    ) -> Result<Vec<String>, PropertyError>;

    /// Move one property off `source` onto the item at `destination`.
    ///
    /// The property is removed from the source item and created or merged on
    /// the destination as the provider defines. `destination` arrives
    /// verbatim; resolving it is the provider's concern. The returned value
    /// is an opaque passthrough object surfaced to the caller on request.
    fn move_property(
        &self,
        source: &ItemPath,
        property: &str,
        destination: &str,
        destination_property: &str,
        context: &ExecutionContext,
    ) -> Result<Option<Value>, PropertyError>;

    /// Extra provider-specific parameters required for a move, if any.
    /// Paths arrive unresolved because negotiation runs before resolution.
    fn move_property_dynamic_parameters(
        &self,
        _source: &str,
        _property: &str,
        _destination: &str,
        _destination_property: &str,
        _context: &ExecutionContext,
    ) -> Result<Option<DynamicParameters>, PropertyError> {
        Ok(None)
    }
}

/// Shared handle to a registered provider.
pub type ProviderHandle = Arc<dyn PropertyProvider>;
