//! Scope cursor over the ancestor chain and descendant set of a picked node.

use crate::domain::model::NodeId;

/// Signed cursor selecting a widen/narrow target around an anchor node.
///
/// `position == 0` addresses the anchor, positive positions walk up `ancestors` and negative
/// positions walk down `descendants` (`descendants[-position - 1]`). The position always stays in
/// `[-descendants.len(), ancestors.len() - 1]`; moves past either bound are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeCursor {
    anchor: NodeId,
    ancestors: Vec<NodeId>,
    descendants: Vec<NodeId>,
    position: isize,
}

impl ScopeCursor {
    /// Create a cursor positioned on `anchor`.
    ///
    /// `ancestors` must start with `anchor` itself followed by its parents up to the document
    /// root. This is not validated.
    pub fn new(anchor: NodeId, ancestors: Vec<NodeId>, descendants: Vec<NodeId>) -> Self {
        Self {
            anchor,
            ancestors,
            descendants,
            position: 0,
        }
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn ancestors(&self) -> &[NodeId] {
        &self.ancestors
    }

    pub fn descendants(&self) -> &[NodeId] {
        &self.descendants
    }

    /// Highest reachable position.
    pub fn upper_bound(&self) -> isize {
        self.ancestors.len() as isize - 1
    }

    /// Lowest reachable position.
    pub fn lower_bound(&self) -> isize {
        -(self.descendants.len() as isize)
    }

    /// Node addressed by the current position.
    pub fn target(&self) -> Option<NodeId> {
        self.resolve(self.position)
    }

    /// Move one level up towards the document root, saturating at the root.
    pub fn widen(&mut self) -> Option<NodeId> {
        if self.position < self.upper_bound() {
            self.position += 1;
        }
        self.target()
    }

    /// Move one step down into the descendants, saturating at the last one.
    pub fn narrow(&mut self) -> Option<NodeId> {
        if self.position > self.lower_bound() {
            self.position -= 1;
        }
        self.target()
    }

    /// Map a position to its node. `None` only when the position is outside the tracked arrays.
    pub fn resolve(&self, position: isize) -> Option<NodeId> {
        if position >= 0 {
            self.ancestors.get(position as usize).copied()
        } else {
            self.descendants.get((!position) as usize).copied()
        }
    }
}
