//! In-memory page structure and highlight state used outside a browser.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::errors::PageError;
use crate::domain::model::NodeId;
use crate::domain::ports::{PageDom, PageSelector};

/// Serializable description of an element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeShape {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeShape>,
}

impl NodeShape {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: NodeShape) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
}

/// Arena of page elements. Node ids are assigned depth-first, so id order is document order.
#[derive(Debug, Clone)]
pub struct PageTree {
    nodes: Vec<NodeData>,
}

impl PageTree {
    pub fn from_shape(root: &NodeShape) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(root, None, 0);
        tree
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let root: NodeShape = serde_json::from_str(data).context("invalid page description")?;
        Ok(Self::from_shape(&root))
    }

    /// Load a page description from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read page file {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("failed to load page {}", path.display()))
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Validate a raw handle against this page.
    pub fn node(&self, raw: usize) -> Result<NodeId, PageError> {
        if raw < self.nodes.len() {
            Ok(NodeId(raw))
        } else {
            Err(PageError::UnknownNode(NodeId(raw)))
        }
    }

    pub fn depth(&self, node: NodeId) -> usize {
        self.nodes.get(node.0).map_or(0, |data| data.depth)
    }

    /// Short CSS-like label, e.g. `img#logo.banner`.
    pub fn describe(&self, node: NodeId) -> String {
        let Some(data) = self.nodes.get(node.0) else {
            return format!("<missing {node}>");
        };
        let mut label = data.tag.clone();
        if let Some(id) = data.attrs.get("id").filter(|id| !id.is_empty()) {
            label.push('#');
            label.push_str(id);
        }
        if let Some(classes) = data.attrs.get("class") {
            for class in classes.split_whitespace() {
                label.push('.');
                label.push_str(class);
            }
        }
        label
    }

    fn insert(&mut self, shape: &NodeShape, parent: Option<NodeId>, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: shape.tag.to_ascii_lowercase(),
            attrs: shape.attrs.clone(),
            parent,
            children: Vec::new(),
            depth,
        });
        let children = shape
            .children
            .iter()
            .map(|child| self.insert(child, Some(id), depth + 1))
            .collect();
        self.nodes[id.0].children = children;
        id
    }
}

impl PageDom for PageTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|data| data.attrs.get(name))
            .map(String::as_str)
    }
}

/// Page-level highlight state standing in for the in-page element selector.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageHighlight {
    highlighted: Option<NodeId>,
    picking: bool,
    preview: Option<BlockPreview>,
}

/// Most recently requested block preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPreview {
    pub node: NodeId,
    pub rule: Option<String>,
}

impl PageHighlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    /// Whether click-to-select is currently running.
    pub fn is_picking(&self) -> bool {
        self.picking
    }

    pub fn preview(&self) -> Option<&BlockPreview> {
        self.preview.as_ref()
    }

    /// Finish click-to-select on `node`, returning it for the overlay to mount its menu.
    pub fn pick(&mut self, node: NodeId) -> Option<NodeId> {
        if !self.picking {
            return None;
        }
        self.picking = false;
        self.highlighted = Some(node);
        Some(node)
    }
}

impl PageSelector for PageHighlight {
    fn select_element(&mut self, node: NodeId) {
        self.highlighted = Some(node);
        self.preview = None;
    }

    fn close(&mut self) {
        self.highlighted = None;
        self.picking = false;
        self.preview = None;
    }

    fn start(&mut self) {
        self.close();
        self.picking = true;
    }

    fn show_preview(&mut self, node: NodeId, rule: Option<&str>) {
        self.preview = Some(BlockPreview {
            node,
            rule: rule.map(str::to_owned),
        });
    }
}
