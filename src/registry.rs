//! Provider registration and path-to-provider lookup.
//! Maps mounted drive names to the providers that own them and parses the
//! three supported path forms:
//!  - `provider::drive:rest` (explicit provider qualifier)
//!  - `drive:rest`
//!  - bare relative path, joined onto the context's current location

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::ExecutionContext;
use crate::errors::PropertyError;
use crate::provider::{ItemPath, ProviderHandle};

/// Registry of providers and the drives they own.
#[derive(Default)]
pub struct Registry {
    providers: BTreeMap<String, ProviderHandle>,
    drives: BTreeMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: ProviderHandle) -> Result<(), PropertyError> {
        let name = provider.name().to_string();
        if name.is_empty() || name.contains(':') {
            return Err(PropertyError::InvalidArgument(format!(
                "invalid provider name: '{name}'"
            )));
        }
        if self.providers.contains_key(&name) {
            return Err(PropertyError::InvalidArgument(format!(
                "provider already registered: '{name}'"
            )));
        }
        debug!(provider = %name, "registered provider");
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Mount a drive owned by an already-registered provider.
    pub fn add_drive(&mut self, drive: &str, provider: &str) -> Result<(), PropertyError> {
        if drive.is_empty() || drive.contains(':') {
            return Err(PropertyError::InvalidArgument(format!(
                "invalid drive name: '{drive}'"
            )));
        }
        if !self.providers.contains_key(provider) {
            return Err(PropertyError::ProviderNotFound(provider.to_string()));
        }
        if self.drives.contains_key(drive) {
            return Err(PropertyError::InvalidArgument(format!(
                "drive already mounted: '{drive}'"
            )));
        }
        debug!(drive, provider, "mounted drive");
        self.drives.insert(drive.to_string(), provider.to_string());
        Ok(())
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderHandle> {
        self.providers.get(name)
    }

    /// Resolve a raw path string to its owning provider and parsed path.
    pub fn resolve(
        &self,
        path: &str,
        context: &ExecutionContext,
    ) -> Result<(ProviderHandle, ItemPath), PropertyError> {
        if path.is_empty() {
            return Err(PropertyError::InvalidArgument("empty path".to_string()));
        }

        if let Some((qualifier, rest)) = path.split_once("::") {
            if !self.providers.contains_key(qualifier) {
                return Err(PropertyError::ProviderNotFound(qualifier.to_string()));
            }
            let (provider, item) = self.resolve_unqualified(rest, context)?;
            if provider.name() != qualifier {
                return Err(PropertyError::InvalidArgument(format!(
                    "drive '{}' is not owned by provider '{}'",
                    item.drive(),
                    qualifier
                )));
            }
            return Ok((provider, item));
        }

        self.resolve_unqualified(path, context)
    }

    fn resolve_unqualified(
        &self,
        path: &str,
        context: &ExecutionContext,
    ) -> Result<(ProviderHandle, ItemPath), PropertyError> {
        if let Some((drive, rest)) = path.split_once(':') {
            let provider = self.drive_provider(drive)?;
            return Ok((provider, ItemPath::new(drive, rest)));
        }

        // Relative path: join onto the current location, which must itself
        // be drive-qualified to name a root.
        match context.current_location.split_once(':') {
            Some((drive, base)) => {
                let provider = self.drive_provider(drive)?;
                let joined = join_relative(base, path);
                debug!(path, current = %context.current_location, resolved = %joined, "joined relative path");
                Ok((provider, ItemPath::new(drive, joined)))
            }
            None => Err(PropertyError::ProviderNotFound(path.to_string())),
        }
    }

    fn drive_provider(&self, drive: &str) -> Result<ProviderHandle, PropertyError> {
        let name = self
            .drives
            .get(drive)
            .ok_or_else(|| PropertyError::DriveNotFound(drive.to_string()))?;
        let provider = self
            .providers
            .get(name)
            .ok_or_else(|| PropertyError::ProviderNotFound(name.clone()))?;
        Ok(Arc::clone(provider))
    }
}

/// Join a relative path onto a drive-relative base.
fn join_relative(base: &str, rel: &str) -> String {
    let rel = rel.strip_prefix("./").unwrap_or(rel);
    if rel == "." || rel.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return rel.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), rel)
}
