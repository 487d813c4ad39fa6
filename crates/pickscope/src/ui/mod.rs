//! Terminal front end driving the overlay engine with key events.

pub mod app;
pub mod components;
