use crate::ctx::FormCtx;
use crate::spatial::SpatialLeaf;
use opdeck_core::{EditState, Surface, Value, ValueError};

/// Scalar or spatial field of a form.
///
/// Every leaf wraps an [`EditState`]: the committed value is what collection
/// emits (and what readiness checks), the draft is the buffer the operator
/// edits against. Form leaves use immediate edits: each change is locally
/// final, and the node lock keeps authority updates away until submission.
pub enum FormLeaf {
    Checkbox(EditState<bool>),
    Integer(EditState<i64>),
    Number(EditState<f64>),
    Text(EditState<String>),
    Vector(VectorLeaf),
    Combo(ComboLeaf),
    DataCombo(ComboLeaf),
    Spatial(SpatialLeaf),
}

/// Vector of numbers with optional per-component labels. A fixed-size vector
/// cannot be grown or shrunk by the operator.
pub struct VectorLeaf {
    pub state: EditState<Vec<f64>>,
    pub labels: Vec<String>,
    pub fixed: bool,
}

/// Selection from a list of strings. `send_index` switches the collected
/// payload from the selected string to its position.
pub struct ComboLeaf {
    pub state: EditState<String>,
    pub values: Vec<String>,
    pub send_index: bool,
    pub index: Option<usize>,
}

impl ComboLeaf {
    pub fn new(values: Vec<String>, send_index: bool) -> Self {
        Self {
            state: EditState::new(String::new()),
            values,
            send_index,
            index: None,
        }
    }

    fn select(&mut self, index: usize) {
        if let Some(value) = self.values.get(index) {
            self.index = Some(index);
            self.state.edit(value.clone());
        }
    }

    fn apply_remote(&mut self, value: &str) {
        self.index = self.values.iter().position(|v| v == value);
        self.state.apply_remote(value.to_owned());
    }

    fn clone_fresh(&self) -> ComboLeaf {
        ComboLeaf {
            state: EditState::seeded(self.state.committed().cloned(), String::new()),
            values: self.values.clone(),
            send_index: self.send_index,
            index: self.index,
        }
    }
}

impl FormLeaf {
    pub fn is_editing(&self) -> bool {
        match self {
            FormLeaf::Checkbox(state) => state.is_editing(),
            FormLeaf::Integer(state) => state.is_editing(),
            FormLeaf::Number(state) => state.is_editing(),
            FormLeaf::Text(state) => state.is_editing(),
            FormLeaf::Vector(leaf) => leaf.state.is_editing(),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => leaf.state.is_editing(),
            FormLeaf::Spatial(leaf) => leaf.is_editing(),
        }
    }

    /// Ends the edit session after collection, keeping the committed value.
    pub fn end_edit(&mut self) {
        match self {
            FormLeaf::Checkbox(state) => state.end_edit(),
            FormLeaf::Integer(state) => state.end_edit(),
            FormLeaf::Number(state) => state.end_edit(),
            FormLeaf::Text(state) => state.end_edit(),
            FormLeaf::Vector(leaf) => leaf.state.end_edit(),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => leaf.state.end_edit(),
            FormLeaf::Spatial(leaf) => leaf.end_edit(),
        }
    }

    /// Abandons the edit session, surfacing the latest authority value.
    pub fn reset(&mut self) {
        match self {
            FormLeaf::Checkbox(state) => state.reset(),
            FormLeaf::Integer(state) => state.reset(),
            FormLeaf::Number(state) => state.reset(),
            FormLeaf::Text(state) => state.reset(),
            FormLeaf::Vector(leaf) => leaf.state.reset(),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => leaf.state.reset(),
            FormLeaf::Spatial(leaf) => leaf.reset(),
        }
    }

    /// Strings and vectors additionally require non-zero length; everything
    /// else is ready once any committed value exists.
    pub fn ready(&self) -> bool {
        match self {
            FormLeaf::Checkbox(state) => state.has_value(),
            FormLeaf::Integer(state) => state.has_value(),
            FormLeaf::Number(state) => state.has_value(),
            FormLeaf::Text(state) => state.committed().is_some_and(|s| !s.is_empty()),
            FormLeaf::Vector(leaf) => leaf.state.committed().is_some_and(|v| !v.is_empty()),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => {
                leaf.state.committed().is_some_and(|s| !s.is_empty())
            }
            FormLeaf::Spatial(leaf) => leaf.ready(),
        }
    }

    /// The value collection emits: the committed value when ready, the draft
    /// default otherwise.
    pub fn collect_value(&self) -> Value {
        match self {
            FormLeaf::Checkbox(state) => {
                Value::Bool(*state.committed().unwrap_or(state.draft()))
            }
            FormLeaf::Integer(state) => Value::Int(*state.committed().unwrap_or(state.draft())),
            FormLeaf::Number(state) => {
                Value::Number(*state.committed().unwrap_or(state.draft()))
            }
            FormLeaf::Text(state) => {
                Value::String(state.committed().unwrap_or(state.draft()).clone())
            }
            FormLeaf::Vector(leaf) => {
                Value::Vector(leaf.state.committed().unwrap_or(leaf.state.draft()).clone())
            }
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => {
                let value = leaf.state.committed().unwrap_or(leaf.state.draft());
                if leaf.send_index {
                    let index = leaf
                        .values
                        .iter()
                        .position(|v| v == value)
                        .or(leaf.index)
                        .unwrap_or(0);
                    Value::Int(index as i64)
                } else {
                    Value::String(value.clone())
                }
            }
            FormLeaf::Spatial(leaf) => leaf.collect_value(),
        }
    }

    /// Applies an authority update to this leaf. Bookkeeping is always
    /// recorded; the visible value only moves while the leaf is not mid-edit.
    pub fn update_value(&mut self, value: &Value) -> Result<(), ValueError> {
        match self {
            FormLeaf::Checkbox(state) => state.apply_remote(value.as_bool()?),
            FormLeaf::Integer(state) => state.apply_remote(value.as_int()?),
            FormLeaf::Number(state) => state.apply_remote(value.as_number()?),
            FormLeaf::Text(state) => state.apply_remote(value.as_str()?.to_owned()),
            FormLeaf::Vector(leaf) => leaf.state.apply_remote(value.as_vector()?.to_vec()),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => {
                leaf.apply_remote(value.as_str()?)
            }
            FormLeaf::Spatial(leaf) => leaf.update_value(value)?,
        }
        Ok(())
    }

    /// Fresh copy carrying the committed value but no edit session; array
    /// templates and one-of candidates are cloned through here.
    pub fn clone_fresh(&self, ctx: &mut FormCtx<'_>) -> FormLeaf {
        match self {
            FormLeaf::Checkbox(state) => {
                FormLeaf::Checkbox(EditState::seeded(state.committed().copied(), false))
            }
            FormLeaf::Integer(state) => {
                FormLeaf::Integer(EditState::seeded(state.committed().copied(), 0))
            }
            FormLeaf::Number(state) => {
                FormLeaf::Number(EditState::seeded(state.committed().copied(), 0.0))
            }
            FormLeaf::Text(state) => {
                FormLeaf::Text(EditState::seeded(state.committed().cloned(), String::new()))
            }
            FormLeaf::Vector(leaf) => FormLeaf::Vector(VectorLeaf {
                state: EditState::seeded(leaf.state.committed().cloned(), Vec::new()),
                labels: leaf.labels.clone(),
                fixed: leaf.fixed,
            }),
            FormLeaf::Combo(leaf) => FormLeaf::Combo(leaf.clone_fresh()),
            FormLeaf::DataCombo(leaf) => FormLeaf::DataCombo(leaf.clone_fresh()),
            FormLeaf::Spatial(leaf) => FormLeaf::Spatial(leaf.clone_fresh(ctx)),
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, key: &str) {
        match self {
            FormLeaf::Checkbox(state) => {
                surface.same_line();
                let mut value = *state.draft();
                if surface.checkbox(key, &mut value) {
                    state.edit(value);
                }
            }
            FormLeaf::Integer(state) => {
                surface.same_line();
                let mut value = *state.draft();
                if surface.input_int(key, &mut value, true).changed {
                    state.edit(value);
                }
            }
            FormLeaf::Number(state) => {
                surface.same_line();
                let mut value = *state.draft();
                if surface.input_number(key, &mut value, true).changed {
                    state.edit(value);
                }
            }
            FormLeaf::Text(state) => {
                surface.same_line();
                let mut value = state.draft().clone();
                if surface.input_text(key, &mut value, true).changed {
                    state.edit(value);
                }
            }
            FormLeaf::Vector(leaf) => leaf.draw(surface, key),
            FormLeaf::Combo(leaf) | FormLeaf::DataCombo(leaf) => {
                surface.same_line();
                let current = leaf
                    .state
                    .committed()
                    .map(String::as_str)
                    .filter(|s| !s.is_empty());
                if let Some(index) = surface.combo(key, current, &leaf.values) {
                    leaf.select(index);
                }
            }
            FormLeaf::Spatial(leaf) => leaf.draw(surface, key),
        }
    }

    pub fn draw_3d(&mut self) {
        if let FormLeaf::Spatial(leaf) = self {
            leaf.draw_3d();
        }
    }
}

impl VectorLeaf {
    pub fn new(labels: Vec<String>, default: Option<Vec<f64>>, fixed: bool) -> Self {
        Self {
            state: EditState::seeded(default, Vec::new()),
            labels,
            fixed,
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, key: &str) {
        if !self.labels.is_empty() {
            surface.columns_row(&format!("{key}/labels"), &self.labels);
        }
        let mut draft = self.state.draft().clone();
        let mut changed = false;
        for (i, component) in draft.iter_mut().enumerate() {
            changed |= surface
                .input_number(&format!("{key}/{i}"), component, true)
                .changed;
        }
        if !self.fixed {
            if surface.button(&format!("{key}/grow"), "+") {
                draft.push(0.0);
                changed = true;
            }
            surface.same_line();
            if surface.button(&format!("{key}/shrink"), "-") && !draft.is_empty() {
                draft.pop();
                changed = true;
            }
        }
        if changed {
            self.state.edit(draft);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_readiness_requires_non_empty() {
        let mut leaf = FormLeaf::Text(EditState::new(String::new()));
        assert!(!leaf.ready());
        leaf.update_value(&Value::String(String::new())).unwrap();
        assert!(!leaf.ready());
        leaf.update_value(&Value::String("walk".into())).unwrap();
        assert!(leaf.ready());
    }

    #[test]
    fn checkbox_ready_once_any_value_committed() {
        let mut leaf = FormLeaf::Checkbox(EditState::new(false));
        assert!(!leaf.ready());
        leaf.update_value(&Value::Bool(false)).unwrap();
        assert!(leaf.ready());
        assert_eq!(leaf.collect_value(), Value::Bool(false));
    }

    #[test]
    fn combo_collects_index_when_asked() {
        let mut leaf = ComboLeaf::new(vec!["a".into(), "b".into(), "c".into()], true);
        leaf.apply_remote("c");
        let leaf = FormLeaf::Combo(leaf);
        assert!(leaf.ready());
        assert_eq!(leaf.collect_value(), Value::Int(2));
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let mut leaf = FormLeaf::Integer(EditState::new(0));
        assert!(leaf.update_value(&Value::String("no".into())).is_err());
    }

    #[test]
    fn collect_falls_back_to_draft_default() {
        let leaf = FormLeaf::Integer(EditState::new(42));
        assert!(!leaf.ready());
        assert_eq!(leaf.collect_value(), Value::Int(42));
    }
}
