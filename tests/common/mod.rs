//! Shared in-memory fake provider for the integration tests.
//! Items live in a sorted map of drive-relative path -> property map, so
//! wildcard expansion order is deterministic. Every provider call is
//! recorded for order and argument assertions.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use prop_move::{
    BatchEvent, DynamicParameters, ExecutionContext, ItemPath, MoveBatch, MoveParams,
    PropertyError, PropertyProvider, Registry, WildcardPattern,
};

/// How the fake reacts when a wildcard pattern matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatch {
    /// Zero items, zero errors.
    Empty,
    /// Surface `ItemNotFound`, as some real providers do.
    Error,
}

/// One recorded `move_property` call.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCall {
    pub source: String,
    pub property: String,
    pub destination: String,
    pub destination_property: String,
    pub transaction: Option<u64>,
    pub dynamic: Option<DynamicParameters>,
}

#[derive(Debug)]
pub struct MemoryProvider {
    name: String,
    supports_move: bool,
    no_match: NoMatch,
    dynamic: Option<DynamicParameters>,
    fault_on: Option<String>,
    expand_fault: bool,
    pub items: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    pub calls: Mutex<Vec<MoveCall>>,
    pub negotiations: Mutex<Vec<String>>,
}

impl MemoryProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supports_move: true,
            no_match: NoMatch::Empty,
            dynamic: None,
            fault_on: None,
            expand_fault: false,
            items: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            negotiations: Mutex::new(Vec::new()),
        }
    }

    pub fn without_move_support(mut self) -> Self {
        self.supports_move = false;
        self
    }

    pub fn no_match_is_error(mut self) -> Self {
        self.no_match = NoMatch::Error;
        self
    }

    pub fn with_dynamic(mut self, params: DynamicParameters) -> Self {
        self.dynamic = Some(params);
        self
    }

    /// Raise an unexpected provider fault when moving off this
    /// drive-relative source path.
    pub fn with_fault_on(mut self, path: &str) -> Self {
        self.fault_on = Some(path.to_string());
        self
    }

    /// Raise an unexpected provider fault from wildcard expansion.
    pub fn with_expand_fault(mut self) -> Self {
        self.expand_fault = true;
        self
    }

    pub fn with_item(self, path: &str, properties: &[(&str, Value)]) -> Self {
        let props = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.items.lock().unwrap().insert(path.to_string(), props);
        self
    }

    pub fn properties_of(&self, path: &str) -> Option<BTreeMap<String, Value>> {
        self.items.lock().unwrap().get(path).cloned()
    }

    pub fn recorded_calls(&self) -> Vec<MoveCall> {
        self.calls.lock().unwrap().clone()
    }

    /// (source, property) pairs, in call order.
    pub fn recorded_units(&self) -> Vec<(String, String)> {
        self.recorded_calls()
            .into_iter()
            .map(|c| (c.source, c.property))
            .collect()
    }
}

fn drive_relative(path: &str) -> &str {
    path.split_once(':').map(|(_, rest)| rest).unwrap_or(path)
}

impl PropertyProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_property_move(&self) -> bool {
        self.supports_move
    }

    fn item_exists(
        &self,
        item: &ItemPath,
        _context: &ExecutionContext,
    ) -> Result<bool, PropertyError> {
        Ok(self.items.lock().unwrap().contains_key(item.path()))
    }

    fn expand_wildcards(
        &self,
        pattern: &ItemPath,
        _context: &ExecutionContext,
    ) -> Result<Vec<String>, PropertyError> {
        if self.expand_fault {
            return Err(PropertyError::Provider(anyhow::anyhow!(
                "backing store fault expanding {pattern}"
            )));
        }
        let matcher = WildcardPattern::new(pattern.path())?;
        let matches: Vec<String> = self
            .items
            .lock()
            .unwrap()
            .keys()
            .filter(|path| matcher.matches(path))
            .cloned()
            .collect();
        if matches.is_empty() && self.no_match == NoMatch::Error {
            return Err(PropertyError::ItemNotFound(pattern.to_string()));
        }
        Ok(matches)
    }

    fn move_property(
        &self,
        source: &ItemPath,
        property: &str,
        destination: &str,
        destination_property: &str,
        context: &ExecutionContext,
    ) -> Result<Option<Value>, PropertyError> {
        self.calls.lock().unwrap().push(MoveCall {
            source: source.to_string(),
            property: property.to_string(),
            destination: destination.to_string(),
            destination_property: destination_property.to_string(),
            transaction: context.transaction.as_ref().map(|t| t.id()),
            dynamic: context.dynamic_parameters.clone(),
        });

        if self.fault_on.as_deref() == Some(source.path()) {
            return Err(PropertyError::Provider(anyhow::anyhow!(
                "backing store fault on {source}"
            )));
        }

        let mut items = self.items.lock().unwrap();
        let dest_key = drive_relative(destination).to_string();
        if !items.contains_key(&dest_key) {
            return Err(PropertyError::ItemNotFound(destination.to_string()));
        }

        let value = items
            .get_mut(source.path())
            .ok_or_else(|| PropertyError::ItemNotFound(source.to_string()))?
            .remove(property)
            .ok_or_else(|| {
                PropertyError::ItemNotFound(format!("property '{property}' on {source}"))
            })?;

        items
            .get_mut(&dest_key)
            .expect("destination checked above")
            .insert(destination_property.to_string(), value.clone());

        Ok(Some(json!({
            "path": dest_key,
            "property": destination_property,
            "value": value,
        })))
    }

    fn move_property_dynamic_parameters(
        &self,
        source: &str,
        _property: &str,
        _destination: &str,
        _destination_property: &str,
        _context: &ExecutionContext,
    ) -> Result<Option<DynamicParameters>, PropertyError> {
        self.negotiations.lock().unwrap().push(source.to_string());
        Ok(self.dynamic.clone())
    }
}

/// Registry with one provider mounted on one drive.
pub fn registry_with(provider: &Arc<MemoryProvider>, drive: &str) -> Registry {
    let mut registry = Registry::new();
    registry.register(provider.clone()).unwrap();
    registry.add_drive(drive, provider.name()).unwrap();
    registry
}

pub fn params(paths: &[&str], names: &[&str], destination: &str) -> MoveParams {
    MoveParams {
        paths: paths.iter().map(|s| s.to_string()).collect(),
        literal: false,
        names: names.iter().map(|s| s.to_string()).collect(),
        destination: destination.to_string(),
    }
}

/// Collect a batch, asserting no fatal error occurred.
pub fn drain(batch: MoveBatch<'_>) -> Vec<BatchEvent> {
    batch
        .map(|event| event.expect("unexpected fatal batch error"))
        .collect()
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
