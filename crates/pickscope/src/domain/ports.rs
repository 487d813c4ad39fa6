//! Traits implemented by the collaborators surrounding the overlay engine.

use crate::domain::errors::OverlayError;
use crate::domain::model::{ListenerKind, NodeId, RuleRequest};

/// Read-only traversal of the host page structure.
pub trait PageDom {
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn tag_name(&self, node: NodeId) -> Option<&str>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Ancestors of `node`, nearest first, up to and including the document root. The node
    /// itself is not part of the result.
    fn parents_level(&self, node: NodeId) -> Vec<NodeId> {
        let mut parents = Vec::new();
        let mut current = self.parent(node);
        while let Some(parent) = current {
            parents.push(parent);
            current = self.parent(parent);
        }
        parents
    }

    /// Every node strictly contained in `node`, depth-first in document order.
    fn all_children(&self, node: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            descendants.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        descendants
    }
}

/// Page-level element selector: highlighting, click-to-select and block previews.
pub trait PageSelector {
    /// Highlight `node` as the current blocking target.
    fn select_element(&mut self, node: NodeId);

    /// Remove any highlight and stop picking.
    fn close(&mut self);

    /// Reset and start click-to-select on the page.
    fn start(&mut self);

    /// Render a preview of the page with `node` blocked by `rule`.
    fn show_preview(&mut self, node: NodeId, rule: Option<&str>);
}

/// Synthesizes blocking rule text for a node. Treated as a pure function of its inputs.
pub trait RuleConstructor {
    fn construct_rule_text(&self, dom: &dyn PageDom, node: NodeId, request: &RuleRequest) -> String;
}

/// Message lookup for overlay markup.
pub trait Localizer {
    fn message(&self, key: &str) -> Option<String>;
}

/// The isolated rendering area hosting overlay markup.
///
/// Creation is asynchronous: [`SurfaceBackend::create`] only starts it and the owner is told
/// about completion separately.
pub trait SurfaceBackend {
    /// Start creating the surface and attach it to the host document.
    fn create(&mut self, id: &str) -> Result<(), OverlayError>;

    /// Write the base stylesheet into a freshly loaded surface.
    fn write_stylesheet(&mut self, css: &str);

    /// Replace the surface body with `markup`.
    fn set_content(&mut self, markup: &str);

    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str);

    fn set_style(&mut self, name: &str, value: &str);

    fn set_visible(&mut self, visible: bool);

    /// Height in pixels of the rendered content.
    fn content_height(&self) -> u32;

    fn attach_listener(&mut self, kind: ListenerKind);

    fn detach_listener(&mut self, kind: ListenerKind);

    /// Detach the surface from the host document.
    fn destroy(&mut self);
}

/// Collaborators the engine talks to while handling one call.
pub struct Page<'a> {
    pub dom: &'a dyn PageDom,
    pub selector: &'a mut dyn PageSelector,
    pub rules: &'a dyn RuleConstructor,
    pub localizer: &'a dyn Localizer,
    pub location: &'a str,
}
