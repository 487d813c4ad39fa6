//! Overlay engine: the host, its view controllers and the scope cursor they drive.

pub mod cursor;
pub mod host;
pub mod markup;
pub mod menu;
pub mod notify;
pub mod prompt;
pub mod rules;
pub mod session;
pub mod view;
