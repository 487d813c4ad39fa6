//! Domain-specific errors.

use thiserror::Error;

use crate::domain::model::NodeId;

/// Failures of overlay lifecycle operations. All of them are absorbed by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("no overlay surface is attached")]
    SurfaceMissing,
    #[error("refusing to tear down the overlay from a synthesized event")]
    UntrustedTeardown,
    #[error("overlay surface '{0}' is already attached to the page")]
    SurfaceAlreadyAttached(String),
    #[error("view template '{0}' failed to render")]
    ViewRender(String),
}

/// Errors raised while loading or querying a page structure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Errors raised by the message catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unsupported locale '{0}'")]
    UnknownLocale(String),
    #[error("invalid message catalog for '{locale}': {message}")]
    Invalid { locale: String, message: String },
}
