use opdeck_core::{ElementId, Surface};

/// Row-streamed table. Rows accumulate between `start` and `end` and swap in
/// atomically on `end`, so a render pass never sees a half-built table.
pub struct Table {
    id: ElementId,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    pending: Vec<Vec<String>>,
}

impl Table {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            header: Vec::new(),
            rows: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn start(&mut self, header: Vec<String>) {
        self.header = header;
        self.pending.clear();
    }

    pub fn row(&mut self, data: Vec<String>) {
        self.pending.push(data);
    }

    pub fn end(&mut self) {
        self.rows = std::mem::take(&mut self.pending);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) {
        surface.text(&self.id.name);
        surface.table(&self.id.to_string(), &self.header, &self.rows);
    }
}
