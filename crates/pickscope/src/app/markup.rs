//! Overlay view templates and their localization.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use minijinja::Environment;
use serde::Serialize;

use crate::domain::model::ViewId;
use crate::domain::ports::Localizer;

/// Base stylesheet written into every freshly loaded surface.
pub const OVERLAY_STYLESHEET: &str = include_str!("../../assets/views/overlay.css");

/// Markup and localization keys of one overlay view.
#[derive(Debug)]
pub struct ViewTemplate {
    pub id: ViewId,
    source: &'static str,
    /// Keys of elements marked with `i18n`, translated into their text.
    pub labels: &'static [&'static str],
    /// Keys of elements marked with `i18n-title`, translated into their `title`.
    pub titles: &'static [&'static str],
    /// Control classes the view controller is expected to bind.
    pub controls: &'static [&'static str],
}

static VIEWS: [ViewTemplate; 2] = [
    ViewTemplate {
        id: ViewId::SelectorPrompt,
        source: include_str!("../../assets/views/mobile-popup.html"),
        labels: &["prompt_title", "prompt_start", "prompt_cancel"],
        titles: &[],
        controls: &["start-select-mode", "cancel-select-mode"],
    },
    ViewTemplate {
        id: ViewId::ScopeMenu,
        source: include_str!("../../assets/views/mobile-menu.html"),
        labels: &["menu_title", "menu_scope", "menu_preview", "menu_accept"],
        titles: &["menu_close", "menu_narrow", "menu_widen"],
        controls: &[
            "adg-close",
            "adg-preview",
            "adg-accept",
            "adg-plus",
            "adg-minus",
        ],
    },
];

/// Template registered for `view`.
pub fn view_template(view: ViewId) -> &'static ViewTemplate {
    match view {
        ViewId::SelectorPrompt => &VIEWS[0],
        ViewId::ScopeMenu => &VIEWS[1],
    }
}

/// Resolve `keys` through `localizer`, falling back to the key itself.
pub fn localize(keys: &[&'static str], localizer: &dyn Localizer) -> BTreeMap<&'static str, String> {
    keys.iter()
        .map(|key| {
            let message = localizer.message(key).unwrap_or_else(|| {
                tracing::debug!(key = %key, "missing overlay translation");
                (*key).to_owned()
            });
            (*key, message)
        })
        .collect()
}

/// Renders localized view markup.
pub struct ViewRenderer {
    env: Environment<'static>,
}

impl ViewRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for view in &VIEWS {
            env.add_template(view.id.template(), view.source)
                .map_err(|err| anyhow!("failed to register view '{}': {err}", view.id))?;
        }
        Ok(Self { env })
    }

    /// Render `view` with its labels and titles translated by `localizer`.
    pub fn render(&self, view: ViewId, localizer: &dyn Localizer) -> Result<String> {
        let template = view_template(view);
        let context = MarkupContext {
            view: view.template(),
            labels: localize(template.labels, localizer),
            titles: localize(template.titles, localizer),
        };
        self.env
            .get_template(view.template())
            .and_then(|tmpl| tmpl.render(&context))
            .map_err(|err| anyhow!("failed to render view '{view}': {err}"))
    }
}

#[derive(Serialize)]
struct MarkupContext {
    view: &'static str,
    labels: BTreeMap<&'static str, String>,
    titles: BTreeMap<&'static str, String>,
}
