//! Batch driver and error collector.
//! Walks the resolved source items in order and dispatches the full
//! path x property cross product. Expected addressing failures become
//! collected entries and the batch keeps going; any other failure ends it.

use serde_json::Value;
use tracing::warn;

use crate::context::ExecutionContext;
use crate::errors::{ErrorEntry, PropertyError};

use super::executor::{MoveRequest, UnitOutcome, execute};
use super::resolve::{ResolveError, ResolvedItem, Resolver};

/// Per-unit event emitted by a [`MoveBatch`].
#[derive(Debug)]
pub enum BatchEvent {
    /// The unit completed. `pass_thru` carries the provider's passthrough
    /// value when the context requested it.
    Moved {
        request: MoveRequest,
        pass_thru: Option<Value>,
    },
    /// The unit was declined by confirmation or suppressed by dry-run.
    /// Not an error; the batch continues.
    Skipped { request: MoveRequest },
    /// An expected per-unit addressing failure; the batch continues.
    Error(ErrorEntry),
}

/// Lazy stream of per-unit outcomes.
///
/// Iteration order is deterministic: outer loop over resolved source paths,
/// inner loop over property names, each in supplied order. A fatal failure
/// is yielded as `Err` and fuses the iterator.
pub struct MoveBatch<'a> {
    resolver: Resolver<'a>,
    context: ExecutionContext,
    destination: String,
    properties: Vec<String>,
    current: Option<(ResolvedItem, usize)>,
    done: bool,
}

impl std::fmt::Debug for MoveBatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveBatch")
            .field("destination", &self.destination)
            .field("properties", &self.properties)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'a> MoveBatch<'a> {
    pub(super) fn new(
        resolver: Resolver<'a>,
        context: ExecutionContext,
        destination: String,
        properties: Vec<String>,
    ) -> Self {
        Self {
            resolver,
            context,
            destination,
            properties,
            current: None,
            done: false,
        }
    }

    /// Next (item, property) unit from the current source item, if any.
    /// Clears `current` once its property list is exhausted.
    fn take_unit(&mut self) -> Option<(ResolvedItem, String)> {
        let (item, next) = self.current.as_mut()?;
        if *next < self.properties.len() {
            let property = self.properties[*next].clone();
            *next += 1;
            return Some((item.clone(), property));
        }
        self.current = None;
        None
    }

    fn dispatch(&self, item: &ResolvedItem, property: &str) -> Result<BatchEvent, PropertyError> {
        let request = MoveRequest {
            source: item.path.clone(),
            property: property.to_string(),
            destination: self.destination.clone(),
        };
        match execute(item, property, &self.destination, &self.context) {
            Ok(UnitOutcome::Moved(pass_thru)) => Ok(BatchEvent::Moved { request, pass_thru }),
            Ok(UnitOutcome::Skipped) => Ok(BatchEvent::Skipped { request }),
            Err(err) if err.is_per_unit() => {
                warn!(
                    code = err.code(),
                    source = %request.source,
                    property = %request.property,
                    error = %err,
                    "property move failed; continuing batch"
                );
                Ok(BatchEvent::Error(ErrorEntry::unit(
                    request.source.to_string(),
                    request.property,
                    &err,
                )))
            }
            Err(err) => Err(err),
        }
    }
}

impl Iterator for MoveBatch<'_> {
    type Item = Result<BatchEvent, PropertyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some((item, property)) = self.take_unit() {
                let result = self.dispatch(&item, &property);
                if result.is_err() {
                    self.done = true;
                }
                return Some(result);
            }

            match self.resolver.next() {
                Some(Ok(item)) => {
                    // An empty property list is legal and yields no work.
                    if self.properties.is_empty() {
                        continue;
                    }
                    self.current = Some((item, 0));
                }
                // Addressing and argument failures stay scoped to their
                // spec; an opaque provider fault is fatal even here.
                Some(Err(ResolveError { path, error })) => {
                    if let PropertyError::Provider(_) = error {
                        self.done = true;
                        return Some(Err(error));
                    }
                    return Some(Ok(BatchEvent::Error(ErrorEntry::resolution(&path, &error))));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}
