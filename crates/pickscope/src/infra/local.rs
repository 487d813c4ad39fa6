//! Overlay engine wired to the in-memory page, surface and catalog.

use anyhow::{Context, Result};

use crate::app::host::{MountOutcome, OverlayHost};
use crate::domain::errors::OverlayError;
use crate::domain::model::{EventOrigin, ListenerKind, NodeId};
use crate::domain::ports::Page;
use crate::infra::config::Config;
use crate::infra::localization::Catalog;
use crate::infra::page::{PageHighlight, PageTree};
use crate::infra::rules::StrictPathRules;
use crate::infra::surface::MemorySurface;

/// Host plus the reference collaborators it talks to.
///
/// The in-memory surface loads as soon as the host asks for it, so every mount completes within
/// the call that requested it.
#[derive(Debug)]
pub struct LocalOverlay {
    host: OverlayHost<MemorySurface>,
    tree: PageTree,
    highlight: PageHighlight,
    catalog: Catalog,
    rules: StrictPathRules,
    location: String,
}

impl LocalOverlay {
    pub fn new(tree: PageTree, config: &Config) -> Result<Self> {
        let catalog = Catalog::load_or_default(&config.locale.language)
            .context("failed to load message catalog")?;
        let host = OverlayHost::new(MemorySurface::new(), config.surface.clone())?;
        Ok(Self {
            host,
            tree,
            highlight: PageHighlight::new(),
            catalog,
            rules: StrictPathRules,
            location: config.page.location.clone(),
        })
    }

    pub fn host(&self) -> &OverlayHost<MemorySurface> {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut OverlayHost<MemorySurface> {
        &mut self.host
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn highlight(&self) -> &PageHighlight {
        &self.highlight
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Borrow the host together with the collaborators it needs for one call.
    pub fn split(&mut self) -> (&mut OverlayHost<MemorySurface>, Page<'_>) {
        let page = Page {
            dom: &self.tree,
            selector: &mut self.highlight,
            rules: &self.rules,
            localizer: &self.catalog,
            location: &self.location,
        };
        (&mut self.host, page)
    }

    pub fn show_selector_prompt(&mut self) -> Result<MountOutcome, OverlayError> {
        let (host, mut page) = self.split();
        let outcome = host.show_selector_prompt(&mut page)?;
        self.settle(outcome)
    }

    pub fn show_scope_menu(&mut self, element: NodeId) -> Result<MountOutcome, OverlayError> {
        let (host, mut page) = self.split();
        let outcome = host.show_scope_menu(element, &mut page)?;
        self.settle(outcome)
    }

    /// Finish click-to-select on `node` and open its scope menu.
    ///
    /// Returns `None` when the page selector was not picking.
    pub fn pick(&mut self, node: NodeId) -> Option<Result<MountOutcome, OverlayError>> {
        let picked = self.highlight.pick(node)?;
        Some(self.show_scope_menu(picked))
    }

    pub fn start_select(&mut self) {
        let (host, mut page) = self.split();
        host.start_select(&mut page);
    }

    pub fn click(&mut self, class: &str, origin: EventOrigin) -> Result<(), OverlayError> {
        let (host, mut page) = self.split();
        host.click(class, origin, &mut page)?;
        self.settle(MountOutcome::Shown).map(|_| ())
    }

    pub fn fire(&mut self, kind: ListenerKind, origin: EventOrigin) -> Result<(), OverlayError> {
        let (host, mut page) = self.split();
        host.fire(kind, origin, &mut page)?;
        self.settle(MountOutcome::Shown).map(|_| ())
    }

    pub fn close(&mut self, origin: EventOrigin) -> Result<(), OverlayError> {
        self.host.unmount(origin, &mut self.highlight)
    }

    /// Deliver the load signal of a surface created during the last call.
    fn settle(&mut self, outcome: MountOutcome) -> Result<MountOutcome, OverlayError> {
        if !self.host.is_loading() {
            return Ok(outcome);
        }
        self.host.surface_mut().finish_loading();
        let (host, mut page) = self.split();
        host.surface_loaded(&mut page)
    }
}
