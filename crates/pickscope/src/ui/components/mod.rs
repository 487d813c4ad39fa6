//! Ratatui components composing the picker screen.

pub mod overlay_popup;
pub mod page_tree;
pub mod rule_panel;
