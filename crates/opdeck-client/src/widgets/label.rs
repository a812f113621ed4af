use opdeck_core::{ElementId, Surface};

pub struct Label {
    id: ElementId,
    text: String,
}

impl Label {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            text: String::new(),
        }
    }

    pub fn data(&mut self, text: String) {
        self.text = text;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) {
        surface.text(&self.id.name);
        surface.same_line();
        surface.text(&self.text);
    }
}
