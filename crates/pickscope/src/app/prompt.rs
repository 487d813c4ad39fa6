//! Selector prompt controller: the "start selecting" popup.

use crate::app::view::{HostCommand, ViewContext, ViewController};
use crate::domain::model::{Intent, MountOptions};

#[derive(Debug, Default, Clone, Copy)]
pub struct SelectorPromptController;

impl ViewController for SelectorPromptController {
    fn init(&mut self, ctx: &mut ViewContext<'_, '_>, _options: &MountOptions) {
        ctx.bindings.bind(".start-select-mode", Intent::StartSelect);
        ctx.bindings.bind(".cancel-select-mode", Intent::CancelSelect);
    }

    fn handle(&mut self, intent: Intent, _ctx: &mut ViewContext<'_, '_>) -> Option<HostCommand> {
        match intent {
            Intent::StartSelect => Some(HostCommand::StartSelect),
            Intent::CancelSelect => Some(HostCommand::Close),
            _ => None,
        }
    }
}
