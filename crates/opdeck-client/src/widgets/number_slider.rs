use crate::widget::DrawCtx;
use opdeck_core::{ElementId, Surface, Value};

/// Slider committing continuously while dragged; the authority's own updates
/// keep it in sync the rest of the time.
pub struct NumberSlider {
    id: ElementId,
    value: f64,
    min: f64,
    max: f64,
}

impl NumberSlider {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            value: 0.0,
            min: 0.0,
            max: 1.0,
        }
    }

    pub fn data(&mut self, value: f64, min: f64, max: f64) {
        self.value = value;
        self.min = min;
        self.max = max;
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let mut value = self.value;
        if surface.slider_number(&self.id.to_string(), &mut value, self.min, self.max) {
            self.value = value;
            ctx.outbox.push(self.id.clone(), Value::Number(value));
        }
    }
}
