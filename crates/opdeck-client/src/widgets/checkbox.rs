use crate::widget::DrawCtx;
use opdeck_core::{ElementId, Surface, Value};

/// Toggles commit immediately; there is no edit session to protect since the
/// click itself is the confirmation.
pub struct Checkbox {
    id: ElementId,
    state: bool,
}

impl Checkbox {
    pub fn new(id: ElementId) -> Self {
        Self { id, state: false }
    }

    pub fn data(&mut self, state: bool) {
        self.state = state;
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let mut state = self.state;
        if surface.checkbox(&self.id.to_string(), &mut state) {
            self.state = state;
            ctx.outbox.push(self.id.clone(), Value::Bool(state));
        }
    }
}
