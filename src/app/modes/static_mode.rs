//! Static: reine Anzeige ohne Interaktion.

use super::bindings::Bindings;
use super::{InteractionMode, ModeContext, ModeName};
use crate::app::notifications::ActionState;
use crate::core::RenderFeature;

/// Modus ohne Bindings; alle Features werden inaktiv gezeichnet.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMode;

impl InteractionMode for StaticMode {
    fn name(&self) -> ModeName {
        ModeName::Static
    }

    fn start(&mut self, ctx: &mut ModeContext<'_>, _bindings: &mut Bindings<Self>) {
        ctx.set_actionable(ActionState::none());
    }

    fn render(
        &self,
        _ctx: &mut ModeContext<'_>,
        mut feature: RenderFeature,
        emit: &mut dyn FnMut(RenderFeature),
    ) {
        feature.active = false;
        emit(feature);
    }
}
