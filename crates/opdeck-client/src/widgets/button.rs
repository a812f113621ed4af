use crate::widget::DrawCtx;
use opdeck_core::{ElementId, Surface, Value};

pub struct Button {
    id: ElementId,
}

impl Button {
    pub fn new(id: ElementId) -> Self {
        Self { id }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        if surface.button(&self.id.to_string(), &self.id.name) {
            ctx.outbox.push(self.id.clone(), Value::Bool(true));
        }
    }
}
