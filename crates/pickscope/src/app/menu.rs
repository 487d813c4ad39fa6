//! Scope menu controller: widen/narrow the picked element and keep its rule current.

use crate::app::cursor::ScopeCursor;
use crate::app::rules::derive_rule;
use crate::app::session::ScopePosition;
use crate::app::view::{HostCommand, ViewContext, ViewController};
use crate::domain::model::{Intent, ListenerKind, MountOptions, NodeId};

const MENU_CONTROLS: [(&str, Intent); 5] = [
    (".adg-close", Intent::Close),
    (".adg-preview", Intent::Preview),
    (".adg-accept", Intent::Accept),
    (".adg-plus", Intent::Widen),
    (".adg-minus", Intent::Narrow),
];

/// Controller of the scope menu view. Owns the cursor of one menu session.
///
/// Only [`OverlayHost::show_scope_menu`](crate::app::host::OverlayHost::show_scope_menu)
/// builds one, always together with the picked element.
#[derive(Debug)]
pub struct MenuController {
    cursor: Option<ScopeCursor>,
}

impl MenuController {
    pub(crate) fn new() -> Self {
        Self { cursor: None }
    }

    pub fn cursor(&self) -> Option<&ScopeCursor> {
        self.cursor.as_ref()
    }

    fn on_widen(&mut self, ctx: &mut ViewContext<'_, '_>) {
        self.move_scope(ctx, ScopeCursor::widen);
    }

    fn on_narrow(&mut self, ctx: &mut ViewContext<'_, '_>) {
        self.move_scope(ctx, ScopeCursor::narrow);
    }

    fn on_preview(&self, ctx: &ViewContext<'_, '_>) -> Option<HostCommand> {
        let node = ctx.session.current_target()?;
        Some(HostCommand::Preview {
            node,
            rule: ctx.session.derived_rule().map(str::to_owned),
        })
    }

    fn move_scope(
        &mut self,
        ctx: &mut ViewContext<'_, '_>,
        step: fn(&mut ScopeCursor) -> Option<NodeId>,
    ) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        let previous = ctx.session.current_target();
        let Some(target) = step(cursor) else {
            tracing::warn!(position = cursor.position(), "scope cursor out of range");
            return;
        };
        if previous == Some(target) {
            tracing::trace!(position = cursor.position(), "scope saturated");
            return;
        }

        ctx.session.set_scope(scope_position(cursor));
        ctx.page.selector.select_element(target);
        retarget(ctx, target);
    }
}

impl ViewController for MenuController {
    fn init(&mut self, ctx: &mut ViewContext<'_, '_>, options: &MountOptions) {
        let Some(element) = options.element else {
            tracing::error!("scope menu mounted without an element");
            return;
        };

        for (class, intent) in MENU_CONTROLS {
            ctx.bindings.bind(class, intent);
        }
        ctx.listeners
            .register(ListenerKind::WindowResize, Intent::StartSelect);
        ctx.page.selector.select_element(element);

        let dom = ctx.page.dom;
        let mut ancestors = Vec::with_capacity(8);
        ancestors.push(element);
        ancestors.extend(dom.parents_level(element));
        let cursor = ScopeCursor::new(element, ancestors, dom.all_children(element));
        tracing::debug!(
            element = %element,
            ancestors = cursor.ancestors().len(),
            descendants = cursor.descendants().len(),
            "scope menu session started"
        );

        ctx.session.set_scope(scope_position(&cursor));
        self.cursor = Some(cursor);
        retarget(ctx, element);
    }

    fn handle(&mut self, intent: Intent, ctx: &mut ViewContext<'_, '_>) -> Option<HostCommand> {
        match intent {
            Intent::Widen => {
                self.on_widen(ctx);
                None
            }
            Intent::Narrow => {
                self.on_narrow(ctx);
                None
            }
            Intent::Preview => self.on_preview(ctx),
            Intent::Accept | Intent::Close => Some(HostCommand::Close),
            Intent::StartSelect | Intent::CancelSelect | Intent::ShowSelectorPrompt => None,
        }
    }
}

fn scope_position(cursor: &ScopeCursor) -> ScopePosition {
    ScopePosition {
        position: cursor.position(),
        lower: cursor.lower_bound(),
        upper: cursor.upper_bound(),
    }
}

fn retarget(ctx: &mut ViewContext<'_, '_>, target: NodeId) {
    let rule = derive_rule(ctx.page.dom, ctx.page.rules, target, ctx.page.location);
    ctx.session.retarget(target, rule);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::session::OverlaySession;
    use crate::app::view::{Bindings, ListenerRegistry};
    use crate::domain::ports::{Page, PageSelector};
    use crate::infra::localization::Catalog;
    use crate::infra::page::{NodeShape, PageHighlight, PageTree};
    use crate::infra::rules::StrictPathRules;

    struct Fixture {
        tree: PageTree,
        highlight: PageHighlight,
        catalog: Catalog,
        session: OverlaySession,
        bindings: Bindings,
        listeners: ListenerRegistry,
    }

    impl Fixture {
        /// html > body > section > ul > li
        fn new() -> Self {
            let tree = PageTree::from_shape(
                &NodeShape::new("html").child(
                    NodeShape::new("body").child(
                        NodeShape::new("section")
                            .child(NodeShape::new("ul").child(NodeShape::new("li"))),
                    ),
                ),
            );
            Self {
                tree,
                highlight: PageHighlight::new(),
                catalog: Catalog::load("en").unwrap(),
                session: OverlaySession::default(),
                bindings: Bindings::default(),
                listeners: ListenerRegistry::default(),
            }
        }

        fn with_ctx<R>(&mut self, run: impl FnOnce(&mut ViewContext<'_, '_>) -> R) -> R {
            let mut page = Page {
                dom: &self.tree,
                selector: &mut self.highlight,
                rules: &StrictPathRules,
                localizer: &self.catalog,
                location: "https://example.org/",
            };
            let mut ctx = ViewContext {
                session: &mut self.session,
                bindings: &mut self.bindings,
                listeners: &mut self.listeners,
                page: &mut page,
            };
            run(&mut ctx)
        }
    }

    fn started(fixture: &mut Fixture, element: NodeId) -> MenuController {
        let mut menu = MenuController::new();
        fixture.with_ctx(|ctx| menu.init(ctx, &MountOptions::for_element(element)));
        menu
    }

    #[test]
    fn init_binds_controls_and_builds_cursor() {
        let mut fixture = Fixture::new();
        let menu = started(&mut fixture, NodeId(2));

        let classes: Vec<_> = fixture.bindings.classes().collect();
        assert_eq!(
            classes,
            vec!["adg-accept", "adg-close", "adg-minus", "adg-plus", "adg-preview"]
        );
        assert_eq!(fixture.bindings.intent_for("adg-plus"), Some(Intent::Widen));

        let cursor = menu.cursor().expect("cursor");
        assert_eq!(cursor.ancestors(), &[NodeId(2), NodeId(1), NodeId(0)]);
        assert_eq!(cursor.descendants(), &[NodeId(3), NodeId(4)]);
        assert_eq!(fixture.highlight.highlighted(), Some(NodeId(2)));
        assert_eq!(
            fixture.session.derived_rule(),
            Some("example.org##html > body > section:nth-child(1)")
        );
        assert_eq!(
            fixture.session.scope(),
            Some(ScopePosition {
                position: 0,
                lower: -2,
                upper: 2
            })
        );
    }

    #[test]
    fn init_registers_resize_restart() {
        let mut fixture = Fixture::new();
        started(&mut fixture, NodeId(2));

        let mut surface = crate::infra::surface::MemorySurface::new();
        fixture.listeners.attach_pending(&mut surface);
        assert_eq!(
            fixture.listeners.intent_for(ListenerKind::WindowResize),
            Some(Intent::StartSelect)
        );
    }

    #[test]
    fn init_without_element_leaves_session_untouched() {
        let mut fixture = Fixture::new();
        let mut menu = MenuController::new();
        fixture.with_ctx(|ctx| menu.init(ctx, &MountOptions::default()));

        assert!(menu.cursor().is_none());
        assert!(fixture.bindings.is_empty());
        assert_eq!(fixture.session.current_target(), None);
    }

    #[test]
    fn saturated_move_changes_nothing() {
        let mut fixture = Fixture::new();
        let mut menu = started(&mut fixture, NodeId(0));
        let preview = fixture.with_ctx(|ctx| menu.handle(Intent::Preview, ctx));
        assert_eq!(
            preview,
            Some(HostCommand::Preview {
                node: NodeId(0),
                rule: Some("example.org##html".into())
            })
        );
        fixture.highlight.show_preview(NodeId(0), Some("example.org##html"));

        let before = fixture.session.clone();
        assert_eq!(fixture.with_ctx(|ctx| menu.handle(Intent::Widen, ctx)), None);
        assert_eq!(fixture.session, before);
        assert!(fixture.highlight.preview().is_some());
    }

    #[test]
    fn widen_then_narrow_restores_target() {
        let mut fixture = Fixture::new();
        let mut menu = started(&mut fixture, NodeId(2));
        let initial_rule = fixture.session.derived_rule().map(str::to_owned);

        fixture.with_ctx(|ctx| menu.handle(Intent::Widen, ctx));
        assert_eq!(fixture.session.current_target(), Some(NodeId(1)));
        assert_eq!(fixture.highlight.highlighted(), Some(NodeId(1)));

        fixture.with_ctx(|ctx| menu.handle(Intent::Narrow, ctx));
        assert_eq!(fixture.session.current_target(), Some(NodeId(2)));
        assert_eq!(fixture.session.derived_rule().map(str::to_owned), initial_rule);
    }

    #[test]
    fn accept_and_close_request_teardown() {
        let mut fixture = Fixture::new();
        let mut menu = started(&mut fixture, NodeId(4));
        for intent in [Intent::Accept, Intent::Close] {
            assert_eq!(
                fixture.with_ctx(|ctx| menu.handle(intent, ctx)),
                Some(HostCommand::Close)
            );
        }
        assert_eq!(fixture.with_ctx(|ctx| menu.handle(Intent::StartSelect, ctx)), None);
    }
}
