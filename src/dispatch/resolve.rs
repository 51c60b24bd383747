//! Path resolution.
//! Expands each path spec into concrete items tagged with their owning
//! provider, lazily, one spec at a time. Failures are scoped to the failing
//! spec so later specs still resolve.
//!
//! Notes:
//! - Wildcard expansion is delegated to the owning provider; different
//!   providers may define different syntaxes.
//! - A literal spec never expands, even when it contains metacharacters.
//! - Include/exclude leaf filters apply to expanded matches only.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::errors::PropertyError;
use crate::pattern::{WildcardPattern, contains_wildcards};
use crate::provider::{ItemPath, ProviderHandle};
use crate::registry::Registry;

/// A single user-supplied path: wildcard pattern or literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    path: String,
    literal: bool,
}

impl PathSpec {
    /// A path subject to wildcard expansion.
    pub fn pattern(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            literal: false,
        }
    }

    /// A path used verbatim; expansion is suppressed even when the string
    /// contains metacharacters.
    pub fn literal(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            literal: true,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

/// A concrete addressable item plus the provider that owns it.
/// Created per resolution call and consumed immediately by the executor.
#[derive(Clone)]
pub struct ResolvedItem {
    pub path: ItemPath,
    pub provider: ProviderHandle,
}

impl fmt::Debug for ResolvedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedItem")
            .field("path", &self.path)
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// A resolution failure, scoped to the spec that raised it.
#[derive(Debug)]
pub struct ResolveError {
    /// The raw spec path that failed to resolve.
    pub path: String,
    pub error: PropertyError,
}

/// Lazy resolution stream over a sequence of path specs.
///
/// Yields `Ok(ResolvedItem)` per concrete item and `Err(ResolveError)` per
/// failed spec, in supplied order. A failed spec does not stop later specs
/// from resolving. Nothing resolves until iterated.
pub struct Resolver<'a> {
    registry: &'a Registry,
    context: ExecutionContext,
    specs: std::vec::IntoIter<PathSpec>,
    pending: VecDeque<Result<ResolvedItem, ResolveError>>,
}

/// Build a resolver over `specs`. When the sequence is empty the context's
/// current location is resolved as a single literal spec.
pub fn resolve_specs<'a>(
    registry: &'a Registry,
    specs: Vec<PathSpec>,
    context: &ExecutionContext,
) -> Resolver<'a> {
    let specs = if specs.is_empty() {
        debug!(current = %context.current_location, "no paths supplied; resolving current location");
        vec![PathSpec::literal(context.current_location.clone())]
    } else {
        specs
    };
    Resolver {
        registry,
        context: context.clone(),
        specs: specs.into_iter(),
        pending: VecDeque::new(),
    }
}

impl Iterator for Resolver<'_> {
    type Item = Result<ResolvedItem, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(next) = self.pending.pop_front() {
                return Some(next);
            }
            let spec = self.specs.next()?;
            self.resolve_one(&spec);
        }
    }
}

impl Resolver<'_> {
    fn resolve_one(&mut self, spec: &PathSpec) {
        match self.try_resolve(spec) {
            Ok(items) => self.pending.extend(items.into_iter().map(Ok)),
            Err(err) => {
                warn!(code = err.code(), path = spec.path(), error = %err, "path spec failed to resolve");
                self.pending.push_back(Err(ResolveError {
                    path: spec.path().to_string(),
                    error: err,
                }));
            }
        }
    }

    fn try_resolve(&self, spec: &PathSpec) -> Result<Vec<ResolvedItem>, PropertyError> {
        let (provider, item) = self.registry.resolve(spec.path(), &self.context)?;

        if spec.is_literal() || !contains_wildcards(item.path()) {
            // No expansion: validate existence and yield exactly one item.
            if !provider.item_exists(&item, &self.context)? {
                return Err(PropertyError::ItemNotFound(item.to_string()));
            }
            debug!(item = %item, provider = provider.name(), "resolved path");
            return Ok(vec![ResolvedItem {
                path: item,
                provider,
            }]);
        }

        let include = compile_filters(&self.context.include)?;
        let exclude = compile_filters(&self.context.exclude)?;
        let matches = provider.expand_wildcards(&item, &self.context)?;
        debug!(pattern = %item, count = matches.len(), provider = provider.name(), "expanded wildcard pattern");

        let mut out = Vec::with_capacity(matches.len());
        for path in matches {
            let resolved = ItemPath::new(item.drive(), path);
            if !passes_filters(leaf(resolved.path()), &include, &exclude) {
                continue;
            }
            out.push(ResolvedItem {
                path: resolved,
                provider: Arc::clone(&provider),
            });
        }
        Ok(out)
    }
}

fn compile_filters(patterns: &[String]) -> Result<Vec<WildcardPattern>, PropertyError> {
    patterns.iter().map(|p| WildcardPattern::new(p)).collect()
}

/// Include first (empty include admits everything), then exclude.
fn passes_filters(leaf: &str, include: &[WildcardPattern], exclude: &[WildcardPattern]) -> bool {
    if !include.is_empty() && !include.iter().any(|p| p.matches(leaf)) {
        return false;
    }
    !exclude.iter().any(|p| p.matches(leaf))
}

fn leaf(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
