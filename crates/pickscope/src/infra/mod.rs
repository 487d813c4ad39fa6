//! Reference adapters for the page, surface, catalog and rule collaborators.

pub mod clipboard;
pub mod config;
pub mod local;
pub mod localization;
pub mod page;
pub mod rules;
pub mod surface;
