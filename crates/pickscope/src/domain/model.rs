//! Domain models shared by the overlay engine and its collaborators.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a node of the host page.
///
/// Handles are weak: they stay meaningful only while the page structure that issued them is
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two views that can be mounted inside the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    /// Prompt inviting the user to start picking an element.
    SelectorPrompt,
    /// Menu for widening/narrowing the picked element.
    ScopeMenu,
}

impl ViewId {
    /// Template name of the view markup.
    pub fn template(&self) -> &'static str {
        match self {
            ViewId::SelectorPrompt => "mobile-popup.html",
            ViewId::ScopeMenu => "mobile-menu.html",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template())
    }
}

/// Discrete user intents bound to overlay controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Close,
    Preview,
    Accept,
    Widen,
    Narrow,
    StartSelect,
    CancelSelect,
    ShowSelectorPrompt,
}

/// Where an event that reached the overlay came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrigin {
    /// Programmatic call from the engine itself, no event involved.
    #[default]
    Internal,
    /// Genuine user input.
    UserEvent,
    /// Event synthesized by a page script.
    SyntheticEvent,
}

impl EventOrigin {
    /// Build an origin from a DOM-style `isTrusted` flag.
    pub fn from_trusted(is_trusted: bool) -> Self {
        if is_trusted {
            EventOrigin::UserEvent
        } else {
            EventOrigin::SyntheticEvent
        }
    }

    pub fn is_trusted(&self) -> bool {
        !matches!(self, EventOrigin::SyntheticEvent)
    }
}

/// Document and window level listeners the overlay installs on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    DocumentClick,
    WindowResize,
    OrientationChange,
}

impl ListenerKind {
    /// DOM event name of the listener.
    pub fn event_name(&self) -> &'static str {
        match self {
            ListenerKind::DocumentClick => "click",
            ListenerKind::WindowResize => "resize",
            ListenerKind::OrientationChange => "orientationchange",
        }
    }
}

/// CSS selector flavour requested from the rule constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CssSelectorType {
    StrictFull,
}

/// Kind of blocking rule requested from the rule constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleType {
    Css,
    Url,
}

/// Request handed to the rule-construction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    pub url_mask: Option<String>,
    pub css_selector_type: CssSelectorType,
    pub is_block_one_domain: bool,
    pub url: String,
    pub rule_type: RuleType,
}

/// Options passed to a view controller when its view is mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    pub element: Option<NodeId>,
}

impl MountOptions {
    pub fn for_element(element: NodeId) -> Self {
        Self {
            element: Some(element),
        }
    }
}

/// Ordered attribute or style declarations applied to the overlay surface.
pub type Declarations = BTreeMap<String, String>;
