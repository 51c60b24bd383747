//! Core library for `prop_move`.
//!
//! Moves a named property from one addressable item to another across a
//! pluggable namespace of providers. The library is the dispatch core only:
//! it resolves path patterns and literals to concrete items, looks up the
//! provider owning each path, negotiates provider-specific parameters once
//! per invocation, and drives the per-item, per-property move calls with
//! partial-failure isolation. No concrete provider ships here; callers
//! implement [`PropertyProvider`] and mount drives on a [`Registry`].
//!
//! A batch is lazy: [`move_item_property`] returns a [`MoveBatch`] iterator
//! yielding one event per (path, property) unit. Addressing failures
//! (unknown drive or provider, missing item, unsupported provider) are
//! collected as [`ErrorEntry`] records without stopping the batch; any other
//! failure aborts the remaining units.

pub mod context;
pub mod dispatch;
pub mod errors;
pub mod pattern;
pub mod provider;
pub mod registry;

pub use context::{ConfirmFn, DynamicParameters, ExecutionContext, Transaction};
pub use dispatch::{
    BatchEvent, MoveBatch, MoveParams, MoveRequest, PathSpec, ResolveError, ResolvedItem,
    Resolver, move_item_property, resolve_specs,
};
pub use errors::{ErrorEntry, ErrorKind, PropertyError};
pub use pattern::WildcardPattern;
pub use provider::{ItemPath, PropertyProvider, ProviderHandle};
pub use registry::Registry;
