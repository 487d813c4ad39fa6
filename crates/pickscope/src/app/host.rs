//! Overlay host owning the single rendering surface and the mounted view.

use std::fmt;

use anyhow::Result;

use crate::app::markup::{OVERLAY_STYLESHEET, ViewRenderer};
use crate::app::menu::MenuController;
use crate::app::notify::Notifier;
use crate::app::prompt::SelectorPromptController;
use crate::app::session::OverlaySession;
use crate::app::view::{Bindings, HostCommand, ListenerRegistry, ViewContext, ViewController};
use crate::domain::errors::OverlayError;
use crate::domain::model::{
    Declarations, EventOrigin, Intent, ListenerKind, MountOptions, NodeId, ViewId,
};
use crate::domain::ports::{Page, PageSelector, SurfaceBackend};
use crate::infra::config::SurfaceConfig;

/// Result of a [`OverlayHost::mount`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The view is mounted and visible.
    Shown,
    /// The surface is still loading; the view mounts on [`OverlayHost::surface_loaded`].
    Pending,
    /// The view was already current (or already waiting for the surface); nothing changed.
    AlreadyShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfacePhase {
    Detached,
    Loading,
    Ready,
}

struct MountRequest {
    view: ViewId,
    controller: Option<Box<dyn ViewController>>,
    options: MountOptions,
    styles: Declarations,
    attributes: Declarations,
}

/// Owns the overlay surface, guaranteeing at most one is attached to the page at a time.
pub struct OverlayHost<S> {
    surface: S,
    settings: SurfaceConfig,
    renderer: ViewRenderer,
    phase: SurfacePhase,
    pending: Option<MountRequest>,
    session: OverlaySession,
    controller: Option<Box<dyn ViewController>>,
    bindings: Bindings,
    listeners: ListenerRegistry,
    on_view_shown: Notifier,
    on_menu_closed: Notifier,
}

impl<S: SurfaceBackend> OverlayHost<S> {
    pub fn new(surface: S, settings: SurfaceConfig) -> Result<Self> {
        Ok(Self {
            surface,
            settings,
            renderer: ViewRenderer::new()?,
            phase: SurfacePhase::Detached,
            pending: None,
            session: OverlaySession::default(),
            controller: None,
            bindings: Bindings::default(),
            listeners: ListenerRegistry::default(),
            on_view_shown: Notifier::new(),
            on_menu_closed: Notifier::new(),
        })
    }

    pub fn session(&self) -> &OverlaySession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn has_surface(&self) -> bool {
        self.phase != SurfacePhase::Detached
    }

    /// Whether a surface is attached but has not signalled load yet.
    pub fn is_loading(&self) -> bool {
        self.phase == SurfacePhase::Loading
    }

    /// Fires after a view finishes mounting and becomes visible.
    pub fn on_view_shown(&mut self) -> &mut Notifier {
        &mut self.on_view_shown
    }

    /// Fires after the overlay has been torn down.
    pub fn on_menu_closed(&mut self) -> &mut Notifier {
        &mut self.on_menu_closed
    }

    /// Mount `view` inside the surface, creating the surface first if needed.
    pub fn mount(
        &mut self,
        view: ViewId,
        controller: Option<Box<dyn ViewController>>,
        options: MountOptions,
        styles: Declarations,
        attributes: Declarations,
        page: &mut Page<'_>,
    ) -> Result<MountOutcome, OverlayError> {
        let waiting_for = self.pending.as_ref().map(|request| request.view);
        if self.session.current_view() == Some(view) || waiting_for == Some(view) {
            tracing::debug!(view = %view, "view already shown");
            return Ok(MountOutcome::AlreadyShown);
        }

        let request = MountRequest {
            view,
            controller,
            options,
            styles,
            attributes,
        };

        match self.phase {
            SurfacePhase::Detached => {
                tracing::debug!(id = %self.settings.id, "creating overlay surface");
                self.surface.create(&self.settings.id)?;
                self.phase = SurfacePhase::Loading;
                self.listeners
                    .register(ListenerKind::DocumentClick, Intent::Close);
                self.listeners
                    .register(ListenerKind::OrientationChange, Intent::ShowSelectorPrompt);
                self.listeners.attach_pending(&mut self.surface);
                self.pending = Some(request);
                Ok(MountOutcome::Pending)
            }
            SurfacePhase::Loading => {
                tracing::debug!(view = %view, "replacing mount waiting for surface load");
                self.pending = Some(request);
                Ok(MountOutcome::Pending)
            }
            SurfacePhase::Ready => self.apply_mount(request, page),
        }
    }

    /// Completion signal of the asynchronous surface creation.
    pub fn surface_loaded(&mut self, page: &mut Page<'_>) -> Result<MountOutcome, OverlayError> {
        match self.phase {
            SurfacePhase::Detached => return Err(OverlayError::SurfaceMissing),
            SurfacePhase::Ready => {
                tracing::debug!("repeated surface load signal");
                return Ok(MountOutcome::AlreadyShown);
            }
            SurfacePhase::Loading => {}
        }
        tracing::debug!("overlay surface loaded, writing styles");
        self.phase = SurfacePhase::Ready;
        self.surface.write_stylesheet(OVERLAY_STYLESHEET);
        match self.pending.take() {
            Some(request) => self.apply_mount(request, page),
            None => Ok(MountOutcome::AlreadyShown),
        }
    }

    /// Tear the surface down and end the session.
    ///
    /// Refused for synthesized events so page scripts cannot close the overlay.
    pub fn unmount(
        &mut self,
        origin: EventOrigin,
        selector: &mut dyn PageSelector,
    ) -> Result<(), OverlayError> {
        if !origin.is_trusted() {
            tracing::debug!("ignoring overlay teardown from untrusted event");
            return Err(OverlayError::UntrustedTeardown);
        }
        if self.phase == SurfacePhase::Detached {
            return Err(OverlayError::SurfaceMissing);
        }

        self.listeners.detach_all(&mut self.surface);
        self.surface.destroy();
        self.phase = SurfacePhase::Detached;
        self.pending = None;
        self.controller = None;
        self.bindings.clear();
        self.session.reset();
        selector.close();
        tracing::info!("overlay closed");
        self.on_menu_closed.notify();
        Ok(())
    }

    pub fn hide(&mut self) -> Result<(), OverlayError> {
        self.set_visible(false)
    }

    pub fn show(&mut self) -> Result<(), OverlayError> {
        self.set_visible(true)
    }

    /// Prompt the user to start picking an element.
    pub fn show_selector_prompt(&mut self, page: &mut Page<'_>) -> Result<MountOutcome, OverlayError> {
        if self.session.current_view() == Some(ViewId::SelectorPrompt) {
            self.show()?;
            return Ok(MountOutcome::AlreadyShown);
        }
        self.hide_if_attached();
        page.selector.close();
        self.mount(
            ViewId::SelectorPrompt,
            Some(Box::new(SelectorPromptController)),
            MountOptions::default(),
            prompt_styles(),
            Declarations::new(),
            page,
        )
    }

    /// Open the scope menu for an element the page selector reported.
    pub fn show_scope_menu(
        &mut self,
        element: NodeId,
        page: &mut Page<'_>,
    ) -> Result<MountOutcome, OverlayError> {
        tracing::debug!(element = %element, "element selected");
        self.mount(
            ViewId::ScopeMenu,
            Some(Box::new(MenuController::new())),
            MountOptions::for_element(element),
            menu_styles(),
            Declarations::new(),
            page,
        )
    }

    /// Hide the overlay and start click-to-select on the page.
    ///
    /// The mounted view is dropped so the next pick opens a fresh menu session.
    pub fn start_select(&mut self, page: &mut Page<'_>) {
        self.hide_if_attached();
        self.controller = None;
        self.bindings.clear();
        self.session.reset();
        page.selector.start();
    }

    /// Route a click on an overlay control carrying `class`.
    pub fn click(
        &mut self,
        class: &str,
        origin: EventOrigin,
        page: &mut Page<'_>,
    ) -> Result<(), OverlayError> {
        match self.bindings.intent_for(class) {
            Some(intent) => self.dispatch(intent, origin, page),
            None => {
                tracing::trace!(class = %class, "click on unbound control");
                Ok(())
            }
        }
    }

    /// Route an event of an attached document/window listener.
    pub fn fire(
        &mut self,
        kind: ListenerKind,
        origin: EventOrigin,
        page: &mut Page<'_>,
    ) -> Result<(), OverlayError> {
        match self.listeners.intent_for(kind) {
            Some(intent) => self.dispatch(intent, origin, page),
            None => Ok(()),
        }
    }

    /// Hand `intent` to the mounted controller and apply what it asks for.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        origin: EventOrigin,
        page: &mut Page<'_>,
    ) -> Result<(), OverlayError> {
        let command = match self.controller.as_mut() {
            Some(controller) => {
                let mut ctx = ViewContext {
                    session: &mut self.session,
                    bindings: &mut self.bindings,
                    listeners: &mut self.listeners,
                    page: &mut *page,
                };
                controller.handle(intent, &mut ctx)
            }
            None => None,
        };
        self.listeners.attach_pending(&mut self.surface);

        match command.or_else(|| default_command(intent)) {
            Some(command) => self.apply_command(command, origin, page),
            None => Ok(()),
        }
    }

    fn apply_command(
        &mut self,
        command: HostCommand,
        origin: EventOrigin,
        page: &mut Page<'_>,
    ) -> Result<(), OverlayError> {
        match command {
            HostCommand::Close => self.unmount(origin, &mut *page.selector),
            HostCommand::StartSelect => {
                self.start_select(page);
                Ok(())
            }
            HostCommand::ShowSelectorPrompt => self.show_selector_prompt(page).map(|_| ()),
            HostCommand::Preview { node, rule } => {
                page.selector.show_preview(node, rule.as_deref());
                Ok(())
            }
        }
    }

    fn apply_mount(
        &mut self,
        request: MountRequest,
        page: &mut Page<'_>,
    ) -> Result<MountOutcome, OverlayError> {
        let MountRequest {
            view,
            controller,
            options,
            styles,
            attributes,
        } = request;

        let markup = self
            .renderer
            .render(view, page.localizer)
            .map_err(|err| OverlayError::ViewRender(format!("{err:#}")))?;
        self.surface.set_content(&markup);

        self.bindings.clear();
        self.session.reset();
        self.controller = controller;
        if let Some(controller) = self.controller.as_mut() {
            let mut ctx = ViewContext {
                session: &mut self.session,
                bindings: &mut self.bindings,
                listeners: &mut self.listeners,
                page: &mut *page,
            };
            controller.init(&mut ctx, &options);
        }
        self.listeners.attach_pending(&mut self.surface);

        self.apply_attributes(&attributes);
        self.apply_styles(&styles);

        self.session.set_view(Some(view));
        tracing::debug!(view = %view, "view shown");
        self.on_view_shown.notify();
        self.surface.set_visible(true);
        Ok(MountOutcome::Shown)
    }

    fn apply_attributes(&mut self, overrides: &Declarations) {
        self.surface.remove_attribute("height");

        let mut attributes = self.settings.default_attributes();
        attributes.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        for (name, value) in &attributes {
            if name != "height" {
                self.surface.set_attribute(name, value);
            }
        }

        let height = match attributes.get("height").map(String::as_str) {
            Some("auto") | None => self.surface.content_height().to_string(),
            Some(explicit) => explicit.to_owned(),
        };
        self.surface.set_attribute("height", &height);
    }

    fn apply_styles(&mut self, overrides: &Declarations) {
        let mut styles = self.settings.default_styles();
        styles.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        for (name, value) in &styles {
            self.surface.set_style(name, value);
        }
        let height = format!("{}px", self.surface.content_height());
        self.surface.set_style("height", &height);
    }

    fn hide_if_attached(&mut self) {
        if self.phase != SurfacePhase::Detached {
            self.surface.set_visible(false);
        }
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), OverlayError> {
        if self.phase == SurfacePhase::Detached {
            return Err(OverlayError::SurfaceMissing);
        }
        self.surface.set_visible(visible);
        Ok(())
    }
}

impl<S> fmt::Debug for OverlayHost<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHost")
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// What the host does with an intent no controller claimed.
fn default_command(intent: Intent) -> Option<HostCommand> {
    match intent {
        Intent::Close | Intent::CancelSelect => Some(HostCommand::Close),
        Intent::StartSelect => Some(HostCommand::StartSelect),
        Intent::ShowSelectorPrompt => Some(HostCommand::ShowSelectorPrompt),
        Intent::Preview | Intent::Accept | Intent::Widen | Intent::Narrow => None,
    }
}

fn declarations(pairs: &[(&str, &str)]) -> Declarations {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect()
}

fn prompt_styles() -> Declarations {
    declarations(&[
        ("position", "fixed"),
        ("left", "0"),
        ("top", "0"),
        ("right", "0"),
        ("bottom", "0"),
        ("margin", "auto"),
        ("border-radius", "2px"),
        ("background", "transparent"),
    ])
}

fn menu_styles() -> Declarations {
    declarations(&[
        ("position", "fixed"),
        ("bottom", "0"),
        ("left", "50%"),
        ("transform", "translateX(-50%)"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use crate::infra::localization::Catalog;
    use crate::infra::page::{NodeShape, PageHighlight, PageTree};
    use crate::infra::rules::StrictPathRules;
    use crate::infra::surface::MemorySurface;

    struct Env {
        tree: PageTree,
        highlight: PageHighlight,
        catalog: Catalog,
        rules: StrictPathRules,
    }

    impl Env {
        fn new() -> Self {
            let tree = PageTree::from_shape(
                &NodeShape::new("html").child(
                    NodeShape::new("body").child(NodeShape::new("img").attr("src", "a.png")),
                ),
            );
            Self {
                tree,
                highlight: PageHighlight::new(),
                catalog: Catalog::load("en").unwrap(),
                rules: StrictPathRules,
            }
        }

        fn page(&mut self) -> Page<'_> {
            Page {
                dom: &self.tree,
                selector: &mut self.highlight,
                rules: &self.rules,
                localizer: &self.catalog,
                location: "https://example.org/",
            }
        }
    }

    struct CountingController {
        inits: Rc<Cell<usize>>,
    }

    impl ViewController for CountingController {
        fn init(&mut self, ctx: &mut ViewContext<'_, '_>, _options: &MountOptions) {
            self.inits.set(self.inits.get() + 1);
            ctx.bindings.bind(".adg-accept", Intent::Accept);
        }

        fn handle(&mut self, intent: Intent, _ctx: &mut ViewContext<'_, '_>) -> Option<HostCommand> {
            (intent == Intent::Accept).then_some(HostCommand::Close)
        }
    }

    fn counting(inits: &Rc<Cell<usize>>) -> Option<Box<dyn ViewController>> {
        Some(Box::new(CountingController {
            inits: Rc::clone(inits),
        }))
    }

    fn host() -> OverlayHost<MemorySurface> {
        OverlayHost::new(MemorySurface::new(), SurfaceConfig::default()).unwrap()
    }

    fn mount_loaded(
        host: &mut OverlayHost<MemorySurface>,
        env: &mut Env,
        view: ViewId,
        controller: Option<Box<dyn ViewController>>,
    ) -> MountOutcome {
        let outcome = host
            .mount(
                view,
                controller,
                MountOptions::default(),
                Declarations::new(),
                Declarations::new(),
                &mut env.page(),
            )
            .unwrap();
        if outcome == MountOutcome::Pending {
            host.surface_mut().finish_loading();
            return host.surface_loaded(&mut env.page()).unwrap();
        }
        outcome
    }

    #[test]
    fn first_mount_waits_for_surface_load() {
        let mut env = Env::new();
        let mut host = host();
        let inits = Rc::new(Cell::new(0));

        let outcome = host
            .mount(
                ViewId::SelectorPrompt,
                counting(&inits),
                MountOptions::default(),
                Declarations::new(),
                Declarations::new(),
                &mut env.page(),
            )
            .unwrap();
        assert_eq!(outcome, MountOutcome::Pending);
        assert!(host.is_loading());
        assert_eq!(inits.get(), 0);
        assert_eq!(host.session().current_view(), None);

        host.surface_mut().finish_loading();
        assert_eq!(
            host.surface_loaded(&mut env.page()),
            Ok(MountOutcome::Shown)
        );
        assert_eq!(inits.get(), 1);
        assert_eq!(host.session().current_view(), Some(ViewId::SelectorPrompt));
        assert!(host.surface().is_visible());
        assert!(host.surface().stylesheet().is_some());
    }

    #[test]
    fn mounting_current_view_again_initializes_once() {
        let mut env = Env::new();
        let mut host = host();
        let inits = Rc::new(Cell::new(0));
        let shown = Rc::new(Cell::new(0));
        let counter = Rc::clone(&shown);
        host.on_view_shown().attach(move || counter.set(counter.get() + 1));

        mount_loaded(&mut host, &mut env, ViewId::ScopeMenu, counting(&inits));
        let second = mount_loaded(&mut host, &mut env, ViewId::ScopeMenu, counting(&inits));

        assert_eq!(second, MountOutcome::AlreadyShown);
        assert_eq!(inits.get(), 1);
        assert_eq!(shown.get(), 1);
    }

    #[test]
    fn mount_while_loading_replaces_pending_request() {
        let mut env = Env::new();
        let mut host = host();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        for (view, inits) in [(ViewId::SelectorPrompt, &first), (ViewId::ScopeMenu, &second)] {
            let outcome = host
                .mount(
                    view,
                    counting(inits),
                    MountOptions::default(),
                    Declarations::new(),
                    Declarations::new(),
                    &mut env.page(),
                )
                .unwrap();
            assert_eq!(outcome, MountOutcome::Pending);
        }

        host.surface_mut().finish_loading();
        host.surface_loaded(&mut env.page()).unwrap();
        assert_eq!((first.get(), second.get()), (0, 1));
        assert_eq!(host.session().current_view(), Some(ViewId::ScopeMenu));
        assert_eq!(host.surface().lifecycle_counts(), (1, 0));
    }

    #[test]
    fn untrusted_unmount_is_refused() {
        let mut env = Env::new();
        let mut host = host();
        let closed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closed);
        host.on_menu_closed().attach(move || counter.set(counter.get() + 1));
        mount_loaded(&mut host, &mut env, ViewId::SelectorPrompt, None);

        assert_eq!(
            host.unmount(EventOrigin::SyntheticEvent, &mut env.highlight),
            Err(OverlayError::UntrustedTeardown)
        );
        assert_eq!(host.session().current_view(), Some(ViewId::SelectorPrompt));
        assert_eq!(closed.get(), 0);

        assert_eq!(host.unmount(EventOrigin::UserEvent, &mut env.highlight), Ok(()));
        assert_eq!(host.session().current_view(), None);
        assert_eq!(closed.get(), 1);
        assert!(!host.surface().is_attached());
    }

    #[test]
    fn unmount_without_surface_reports_failure() {
        let mut env = Env::new();
        let mut host = host();
        let closed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&closed);
        host.on_menu_closed().attach(move || counter.set(counter.get() + 1));

        assert_eq!(
            host.unmount(EventOrigin::Internal, &mut env.highlight),
            Err(OverlayError::SurfaceMissing)
        );
        assert_eq!(host.hide(), Err(OverlayError::SurfaceMissing));
        assert_eq!(host.show(), Err(OverlayError::SurfaceMissing));
        assert_eq!(closed.get(), 0);
    }

    #[test]
    fn teardown_detaches_listeners_exactly_once() {
        let mut env = Env::new();
        let mut host = host();
        mount_loaded(&mut host, &mut env, ViewId::SelectorPrompt, None);
        let attached = host.surface().listener_attach_calls();
        assert_eq!(attached, 2);

        host.unmount(EventOrigin::Internal, &mut env.highlight).unwrap();
        assert_eq!(host.surface().listener_detach_calls(), attached);
        assert!(host.surface().active_listeners().is_empty());

        assert!(host.unmount(EventOrigin::Internal, &mut env.highlight).is_err());
        assert_eq!(host.surface().listener_detach_calls(), attached);
    }

    #[test]
    fn attribute_overrides_take_precedence() {
        let mut env = Env::new();
        let mut host = host();
        let mut attributes = Declarations::new();
        attributes.insert("width".into(), "240".into());
        let mut styles = Declarations::new();
        styles.insert("z-index".into(), "10".into());

        let outcome = host
            .mount(
                ViewId::SelectorPrompt,
                None,
                MountOptions::default(),
                styles,
                attributes,
                &mut env.page(),
            )
            .unwrap();
        assert_eq!(outcome, MountOutcome::Pending);
        host.surface_mut().finish_loading();
        host.surface_loaded(&mut env.page()).unwrap();

        let surface = host.surface();
        assert_eq!(surface.attribute("width"), Some("240"));
        assert_eq!(surface.attribute("class"), Some("adg-ignore"));
        assert_eq!(surface.attribute("id"), Some("iframe-x2eRYVVQRsG9"));
        assert_eq!(surface.style("z-index"), Some("10"));
        assert_eq!(surface.style("clip"), Some("auto"));

        let height = surface.content_height();
        assert!(height > 0);
        assert_eq!(surface.attribute("height"), Some(height.to_string().as_str()));
        assert_eq!(surface.style("height"), Some(format!("{height}px").as_str()));
    }

    #[test]
    fn hide_and_show_keep_session() {
        let mut env = Env::new();
        let mut host = host();
        mount_loaded(&mut host, &mut env, ViewId::SelectorPrompt, None);

        host.hide().unwrap();
        assert!(!host.surface().is_visible());
        assert_eq!(host.session().current_view(), Some(ViewId::SelectorPrompt));
        host.show().unwrap();
        assert!(host.surface().is_visible());
    }

    #[test]
    fn controller_commands_respect_event_origin() {
        let mut env = Env::new();
        let mut host = host();
        let inits = Rc::new(Cell::new(0));
        mount_loaded(&mut host, &mut env, ViewId::ScopeMenu, counting(&inits));

        assert_eq!(
            host.click("adg-accept", EventOrigin::SyntheticEvent, &mut env.page()),
            Err(OverlayError::UntrustedTeardown)
        );
        assert!(host.has_surface());

        host.click("adg-accept", EventOrigin::UserEvent, &mut env.page())
            .unwrap();
        assert!(!host.has_surface());
    }

    #[test]
    fn document_click_listener_closes_overlay() {
        let mut env = Env::new();
        let mut host = host();
        mount_loaded(&mut host, &mut env, ViewId::SelectorPrompt, None);

        host.fire(ListenerKind::DocumentClick, EventOrigin::UserEvent, &mut env.page())
            .unwrap();
        assert_eq!(host.session().current_view(), None);
        assert!(!host.has_surface());
    }

    #[test]
    fn repeated_load_signal_keeps_mounted_view() {
        let mut env = Env::new();
        let mut host = host();
        let inits = Rc::new(Cell::new(0));
        mount_loaded(&mut host, &mut env, ViewId::SelectorPrompt, counting(&inits));

        assert_eq!(
            host.surface_loaded(&mut env.page()),
            Ok(MountOutcome::AlreadyShown)
        );
        assert_eq!(inits.get(), 1);
        assert_eq!(host.session().current_view(), Some(ViewId::SelectorPrompt));
    }

    #[test]
    fn load_signal_without_surface_is_rejected() {
        let mut env = Env::new();
        let mut host = host();
        assert_eq!(
            host.surface_loaded(&mut env.page()),
            Err(OverlayError::SurfaceMissing)
        );
    }

    #[test]
    fn detached_host_still_starts_picking_and_prompts() {
        let mut env = Env::new();
        let mut host = host();

        host.start_select(&mut env.page());
        assert!(env.highlight.is_picking());
        assert!(!host.has_surface());

        assert_eq!(
            host.show_selector_prompt(&mut env.page()),
            Ok(MountOutcome::Pending)
        );
        assert!(host.is_loading());
    }

    #[test]
    fn scope_menu_mount_binds_controls_for_element() {
        let mut env = Env::new();
        let mut host = host();
        assert_eq!(
            host.show_scope_menu(NodeId(2), &mut env.page()),
            Ok(MountOutcome::Pending)
        );
        host.surface_mut().finish_loading();
        assert_eq!(host.surface_loaded(&mut env.page()), Ok(MountOutcome::Shown));

        assert_eq!(host.bindings().intent_for("adg-plus"), Some(Intent::Widen));
        assert_eq!(host.session().current_target(), Some(NodeId(2)));
    }
}
