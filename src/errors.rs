//! Typed error definitions for prop_move.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Failure modes raised by the dispatch core and by providers.
///
/// The first four variants are expected per-unit addressing failures: the
/// batch collects them as [`ErrorEntry`] records and keeps going. Everything
/// else indicates a programming or environment fault and aborts the batch.
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("provider '{0}' does not support property moves")]
    NotSupported(String),

    #[error("drive not found: {0}")]
    DriveNotFound(String),

    #[error("no provider claims the path root: {0}")]
    ProviderNotFound(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other provider-raised fault.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

impl PropertyError {
    /// Stable machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            PropertyError::NotSupported(_) => "not_supported",
            PropertyError::DriveNotFound(_) => "drive_not_found",
            PropertyError::ProviderNotFound(_) => "provider_not_found",
            PropertyError::ItemNotFound(_) => "item_not_found",
            PropertyError::InvalidArgument(_) => "invalid_argument",
            PropertyError::Provider(_) => "provider_fault",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PropertyError::NotSupported(_) => ErrorKind::NotSupported,
            PropertyError::DriveNotFound(_) => ErrorKind::DriveNotFound,
            PropertyError::ProviderNotFound(_) => ErrorKind::ProviderNotFound,
            PropertyError::ItemNotFound(_) => ErrorKind::ItemNotFound,
            PropertyError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            PropertyError::Provider(_) => ErrorKind::Provider,
        }
    }

    /// Whether a failure of this kind is collected per unit at the executor
    /// boundary. Anything else aborts the remaining batch.
    pub fn is_per_unit(&self) -> bool {
        matches!(
            self,
            PropertyError::NotSupported(_)
                | PropertyError::DriveNotFound(_)
                | PropertyError::ProviderNotFound(_)
                | PropertyError::ItemNotFound(_)
        )
    }
}

/// Discriminant of [`PropertyError`], serializable for front-end reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotSupported,
    DriveNotFound,
    ProviderNotFound,
    ItemNotFound,
    InvalidArgument,
    Provider,
}

/// One collected per-unit failure.
///
/// Identifies the (path, property) unit that failed, the failure kind, and
/// the underlying message. `property` is absent for resolution-time failures
/// where no property name was in play yet.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub path: String,
    pub property: Option<String>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorEntry {
    pub(crate) fn resolution(path: &str, error: &PropertyError) -> Self {
        Self {
            path: path.to_string(),
            property: None,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub(crate) fn unit(path: String, property: String, error: &PropertyError) -> Self {
        Self {
            path,
            property: Some(property),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{} ({}): {}", self.path, property, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}
