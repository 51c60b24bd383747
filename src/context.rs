//! Ambient execution settings threaded through every provider call.
//! - ExecutionContext is owned by the caller and passed by reference; the
//!   core works on a private clone when it needs to merge negotiated
//!   parameters, so the caller's copy is never mutated.
//! - Transaction is an opaque enlistment handle; commit and rollback belong
//!   to the caller and the providers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::ItemPath;

/// Per-unit confirmation callback: (source, property, destination).
/// Returning `false` skips the unit; a skip is not an error and does not
/// stop the rest of the batch.
pub type ConfirmFn = dyn Fn(&ItemPath, &str, &str) -> bool;

/// Ambient settings for one move invocation.
///
/// All fields are read-only to the core. Providers receive the context by
/// reference on every call and interpret `force`, `filter` and the dynamic
/// parameters as they see fit.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Path resolved when the invocation carries no source paths.
    pub current_location: String,
    /// Log the would-be moves and skip dispatching them.
    pub dry_run: bool,
    /// Passed through to providers; semantics are provider-defined.
    pub force: bool,
    /// Surface provider passthrough values on completed units.
    pub pass_thru: bool,
    /// Opaque provider filter string, forwarded with wildcard expansion.
    pub filter: Option<String>,
    /// Leaf-name wildcard filters applied to expanded matches.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Transactional enlistment shared by every provider call in the batch.
    pub transaction: Option<Transaction>,
    /// Negotiated provider parameters. Populated on the core's private copy
    /// of the context before the first executor call.
    pub dynamic_parameters: Option<DynamicParameters>,
    confirm: Option<Arc<ConfirmFn>>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            current_location: ".".to_string(),
            dry_run: false,
            force: false,
            pass_thru: false,
            filter: None,
            include: Vec::new(),
            exclude: Vec::new(),
            transaction: None,
            dynamic_parameters: None,
            confirm: None,
        }
    }
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a per-unit confirmation callback.
    pub fn set_confirm(&mut self, callback: impl Fn(&ItemPath, &str, &str) -> bool + 'static) {
        self.confirm = Some(Arc::new(callback));
    }

    /// Ask the confirmation callback whether to proceed with one unit.
    /// With no callback installed every unit proceeds.
    pub(crate) fn confirmed(&self, source: &ItemPath, property: &str, destination: &str) -> bool {
        self.confirm
            .as_ref()
            .is_none_or(|cb| cb(source, property, destination))
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("current_location", &self.current_location)
            .field("dry_run", &self.dry_run)
            .field("force", &self.force)
            .field("pass_thru", &self.pass_thru)
            .field("filter", &self.filter)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("transaction", &self.transaction)
            .field("dynamic_parameters", &self.dynamic_parameters)
            .field("confirm", &self.confirm.is_some())
            .finish()
    }
}

/// Provider-declared extra parameters for one operation, determined only by
/// querying the provider at negotiation time. Opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicParameters(BTreeMap<String, Value>);

impl DynamicParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merge `other` over `self`; keys in `other` win.
    pub fn merge(&mut self, other: DynamicParameters) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

static NEXT_TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque transactional enlistment handle.
///
/// The core only threads it through: every provider call in a batch sees the
/// same handle. Clones compare equal so providers can detect shared
/// enlistment by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: u64,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            id: NEXT_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
