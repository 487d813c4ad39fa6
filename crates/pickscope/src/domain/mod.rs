//! Domain types and collaborator seams of the overlay engine.

pub mod errors;
pub mod model;
pub mod ports;
