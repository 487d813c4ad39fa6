//! In-memory overlay surface recording everything the host applies to it.

use std::collections::BTreeMap;

use crate::domain::errors::OverlayError;
use crate::domain::model::ListenerKind;
use crate::domain::ports::SurfaceBackend;

/// Pixel height of one line of rendered markup.
const LINE_HEIGHT: u32 = 18;

/// Lifecycle stage of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    #[default]
    Detached,
    /// Attached to the page, waiting for the load signal.
    Loading,
    Loaded,
}

/// Surface backend keeping state in memory; used by the terminal front end and tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    state: SurfaceState,
    id: Option<String>,
    stylesheet: Option<String>,
    content: String,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    visible: bool,
    listeners: BTreeMap<ListenerKind, usize>,
    attach_calls: usize,
    detach_calls: usize,
    created: usize,
    destroyed: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Mark a pending surface as loaded. Returns `false` if nothing was loading.
    pub fn finish_loading(&mut self) -> bool {
        if self.state != SurfaceState::Loading {
            return false;
        }
        self.state = SurfaceState::Loaded;
        true
    }

    pub fn is_attached(&self) -> bool {
        self.state != SurfaceState::Detached
    }

    pub fn is_visible(&self) -> bool {
        self.is_attached() && self.visible
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    /// Listeners currently attached to the host page.
    pub fn active_listeners(&self) -> Vec<ListenerKind> {
        self.listeners
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn listener_attach_calls(&self) -> usize {
        self.attach_calls
    }

    pub fn listener_detach_calls(&self) -> usize {
        self.detach_calls
    }

    /// Number of surfaces created and destroyed over the lifetime of this backend.
    pub fn lifecycle_counts(&self) -> (usize, usize) {
        (self.created, self.destroyed)
    }
}

impl SurfaceBackend for MemorySurface {
    fn create(&mut self, id: &str) -> Result<(), OverlayError> {
        if self.is_attached() {
            return Err(OverlayError::SurfaceAlreadyAttached(id.to_owned()));
        }
        self.state = SurfaceState::Loading;
        self.id = Some(id.to_owned());
        self.visible = true;
        self.created += 1;
        Ok(())
    }

    fn write_stylesheet(&mut self, css: &str) {
        self.stylesheet = Some(css.to_owned());
    }

    fn set_content(&mut self, markup: &str) {
        self.content = markup.to_owned();
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_owned(), value.to_owned());
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn content_height(&self) -> u32 {
        self.content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count() as u32
            * LINE_HEIGHT
    }

    fn attach_listener(&mut self, kind: ListenerKind) {
        *self.listeners.entry(kind).or_default() += 1;
        self.attach_calls += 1;
    }

    fn detach_listener(&mut self, kind: ListenerKind) {
        if let Some(count) = self.listeners.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
        self.detach_calls += 1;
    }

    fn destroy(&mut self) {
        self.state = SurfaceState::Detached;
        self.id = None;
        self.stylesheet = None;
        self.content.clear();
        self.attributes.clear();
        self.styles.clear();
        self.visible = false;
        self.destroyed += 1;
    }
}
