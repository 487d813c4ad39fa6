//! View controller contract and the registries a controller fills in while initializing.

use std::collections::{BTreeMap, BTreeSet};

use crate::app::session::OverlaySession;
use crate::domain::model::{Intent, ListenerKind, MountOptions, NodeId};
use crate::domain::ports::{Page, SurfaceBackend};

/// Request a controller hands back to the host after handling an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Tear the overlay down.
    Close,
    /// Hide the overlay and let the user pick a new element on the page.
    StartSelect,
    /// Replace the current view with the selector prompt.
    ShowSelectorPrompt,
    /// Render a block preview of `node` using `rule`.
    Preview { node: NodeId, rule: Option<String> },
}

/// Everything a controller may touch while it is being initialized or handling an intent.
pub struct ViewContext<'s, 'p> {
    pub session: &'s mut OverlaySession,
    pub bindings: &'s mut Bindings,
    pub listeners: &'s mut ListenerRegistry,
    pub page: &'s mut Page<'p>,
}

/// Controller backing one overlay view.
pub trait ViewController {
    /// Bind controls and compute initial state once the view markup is in place.
    fn init(&mut self, ctx: &mut ViewContext<'_, '_>, options: &MountOptions);

    /// React to an intent. Returning `None` leaves the decision to the host.
    fn handle(&mut self, intent: Intent, ctx: &mut ViewContext<'_, '_>) -> Option<HostCommand>;
}

/// Control class to intent bindings of the mounted view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bindings {
    controls: BTreeMap<String, Intent>,
}

impl Bindings {
    /// Bind clicks on elements carrying `class` to `intent`. Rebinding a class replaces it.
    pub fn bind(&mut self, class: &str, intent: Intent) {
        self.controls
            .insert(class.trim_start_matches('.').to_owned(), intent);
    }

    pub fn intent_for(&self, class: &str) -> Option<Intent> {
        self.controls.get(class.trim_start_matches('.')).copied()
    }

    /// Bound classes in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.controls.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn clear(&mut self) {
        self.controls.clear();
    }
}

/// Document/window listeners requested for the current surface.
///
/// Registration is idempotent. Each kind is attached to the surface at most once and detached
/// exactly once by [`ListenerRegistry::detach_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListenerRegistry {
    handlers: BTreeMap<ListenerKind, Intent>,
    attached: BTreeSet<ListenerKind>,
}

impl ListenerRegistry {
    pub fn register(&mut self, kind: ListenerKind, intent: Intent) {
        self.handlers.insert(kind, intent);
    }

    /// Intent of an attached listener.
    pub fn intent_for(&self, kind: ListenerKind) -> Option<Intent> {
        self.attached
            .contains(&kind)
            .then(|| self.handlers.get(&kind).copied())
            .flatten()
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.attached.contains(&kind)
    }

    /// Attach every registered listener that is not attached yet.
    pub fn attach_pending<S: SurfaceBackend + ?Sized>(&mut self, surface: &mut S) {
        for kind in self.handlers.keys() {
            if self.attached.insert(*kind) {
                tracing::trace!(event = kind.event_name(), "attaching overlay listener");
                surface.attach_listener(*kind);
            }
        }
    }

    /// Detach all attached listeners and forget every registration.
    pub fn detach_all<S: SurfaceBackend + ?Sized>(&mut self, surface: &mut S) {
        for kind in std::mem::take(&mut self.attached) {
            tracing::trace!(event = kind.event_name(), "detaching overlay listener");
            surface.detach_listener(kind);
        }
        self.handlers.clear();
    }
}
