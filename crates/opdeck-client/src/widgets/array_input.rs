use crate::widget::DrawCtx;
use opdeck_core::{EditState, ElementId, Surface, Value};

/// Editable vector of numbers, one input per component, under the same
/// Edit/Done session as [`super::SingleInput`].
pub struct ArrayInput {
    id: ElementId,
    labels: Vec<String>,
    state: EditState<Vec<f64>>,
}

impl ArrayInput {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            labels: Vec::new(),
            state: EditState::new(Vec::new()),
        }
    }

    pub fn data(&mut self, labels: Vec<String>, data: Vec<f64>) {
        self.labels = labels;
        self.state.apply_remote(data);
    }

    pub fn state(&self) -> &EditState<Vec<f64>> {
        &self.state
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let key = self.id.to_string();
        let editing = self.state.is_editing();
        let toggle = surface.button(
            &format!("{key}/toggle"),
            if editing { "Done" } else { "Edit" },
        );
        if !self.labels.is_empty() {
            surface.columns_row(&format!("{key}/labels"), &self.labels);
        }
        if !editing {
            if toggle {
                self.state.begin_edit();
            }
            let shown = self.state.draft().clone();
            for (i, mut component) in shown.into_iter().enumerate() {
                surface.input_number(&format!("{key}/{i}"), &mut component, false);
            }
            return;
        }
        let mut submitted = toggle;
        let draft = self.state.draft_mut();
        for i in 0..draft.len() {
            let event = surface.input_number(&format!("{key}/{i}"), &mut draft[i], true);
            submitted |= event.done;
        }
        if submitted {
            if let Some(value) = self.state.commit() {
                ctx.outbox.push(self.id.clone(), Value::Vector(value));
            }
        }
    }
}
