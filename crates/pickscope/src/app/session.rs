//! Overlay session state shared by the host and the mounted view controller.

use serde::Serialize;

use crate::domain::model::{NodeId, ViewId};

/// Position of the scope cursor within its reachable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopePosition {
    pub position: isize,
    pub lower: isize,
    pub upper: isize,
}

/// State of the single overlay session.
///
/// `derived_rule` is only ever written together with `current_target`, so it always describes
/// the current target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySession {
    current_view: Option<ViewId>,
    current_target: Option<NodeId>,
    derived_rule: Option<String>,
    scope: Option<ScopePosition>,
}

impl OverlaySession {
    pub fn current_view(&self) -> Option<ViewId> {
        self.current_view
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn derived_rule(&self) -> Option<&str> {
        self.derived_rule.as_deref()
    }

    pub fn scope(&self) -> Option<ScopePosition> {
        self.scope
    }

    /// Switch the highlighted target and store the rule derived for it.
    pub fn retarget(&mut self, target: NodeId, rule: String) {
        self.current_target = Some(target);
        self.derived_rule = Some(rule);
    }

    pub fn set_scope(&mut self, scope: ScopePosition) {
        self.scope = Some(scope);
    }

    pub(crate) fn set_view(&mut self, view: Option<ViewId>) {
        self.current_view = view;
    }

    /// Drop everything tied to the mounted view, keeping nothing from the previous session.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serializable view of the session for reporting.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            view: self.current_view.map(|view| view.template()),
            target: self.current_target,
            position: self.scope.map(|scope| scope.position),
            rule: self.derived_rule.clone(),
        }
    }
}

/// Point-in-time report of an [`OverlaySession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub view: Option<&'static str>,
    pub target: Option<NodeId>,
    pub position: Option<isize>,
    pub rule: Option<String>,
}
