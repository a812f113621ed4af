use opdeck_core::{ElementId, Surface};

/// Read-only vector display with optional per-component labels. Long
/// unlabeled vectors collapse to their norm, with the full contents in a
/// tooltip.
pub struct ArrayLabel {
    id: ElementId,
    labels: Vec<String>,
    data: Vec<f64>,
}

impl ArrayLabel {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn data(&mut self, labels: Vec<String>, data: Vec<f64>) {
        self.labels = labels;
        self.data = data;
    }

    fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn draw(&mut self, surface: &mut dyn Surface) {
        let key = self.id.to_string();
        surface.text(&self.id.name);
        if self.labels.is_empty() && self.data.len() > 6 {
            surface.same_line();
            surface.text(&format!("{:.4}", self.norm()));
            surface.tooltip(&format!("{:?}", self.data));
            return;
        }
        if !self.labels.is_empty() {
            surface.columns_row(&format!("{key}/labels"), &self.labels);
        }
        let cells: Vec<String> = self.data.iter().map(|v| format!("{v:.4}")).collect();
        surface.columns_row(&format!("{key}/values"), &cells);
        surface.tooltip(&format!("{:.4}", self.norm()));
    }
}
