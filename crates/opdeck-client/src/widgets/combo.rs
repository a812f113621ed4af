use crate::widget::DrawCtx;
use opdeck_core::{ElementId, Surface, Value};

/// Selection from an inline list; picking an entry commits immediately.
pub struct ComboInput {
    id: ElementId,
    values: Vec<String>,
    value: String,
}

impl ComboInput {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            values: Vec::new(),
            value: String::new(),
        }
    }

    pub fn data(&mut self, values: Vec<String>, value: String) {
        self.values = values;
        self.value = value;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let current = (!self.value.is_empty()).then_some(self.value.as_str());
        if let Some(index) = surface.combo(&self.id.to_string(), current, &self.values) {
            if let Some(picked) = self.values.get(index) {
                if *picked != self.value {
                    self.value = picked.clone();
                    ctx.outbox.push(self.id.clone(), Value::String(picked.clone()));
                }
            }
        }
    }
}

/// Selection whose option list lives in the authority's published data map;
/// the client resolves the reference path at dispatch time.
pub struct DataComboInput {
    id: ElementId,
    reference: Vec<String>,
    values: Vec<String>,
    value: String,
}

impl DataComboInput {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            reference: Vec::new(),
            values: Vec::new(),
            value: String::new(),
        }
    }

    pub fn data(&mut self, reference: Vec<String>, values: Vec<String>, value: String) {
        self.reference = reference;
        self.values = values;
        self.value = value;
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Path into the authority's data map the option list came from.
    pub fn reference(&self) -> &[String] {
        &self.reference
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let current = (!self.value.is_empty()).then_some(self.value.as_str());
        if let Some(index) = surface.combo(&self.id.to_string(), current, &self.values) {
            if let Some(picked) = self.values.get(index) {
                if *picked != self.value {
                    self.value = picked.clone();
                    ctx.outbox.push(self.id.clone(), Value::String(picked.clone()));
                }
            }
        }
    }
}
