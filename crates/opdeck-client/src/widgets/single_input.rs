use crate::widget::DrawCtx;
use opdeck_core::{EditState, ElementId, InputEvent, Surface, Value};

/// Scalar kinds a [`SingleInput`] can hold: each knows its input primitive
/// and its wire representation.
pub trait InputScalar: Clone + PartialEq {
    fn input(surface: &mut dyn Surface, key: &str, value: &mut Self, editable: bool)
        -> InputEvent;

    fn to_value(&self) -> Value;
}

impl InputScalar for i64 {
    fn input(
        surface: &mut dyn Surface,
        key: &str,
        value: &mut Self,
        editable: bool,
    ) -> InputEvent {
        surface.input_int(key, value, editable)
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl InputScalar for f64 {
    fn input(
        surface: &mut dyn Surface,
        key: &str,
        value: &mut Self,
        editable: bool,
    ) -> InputEvent {
        surface.input_number(key, value, editable)
    }

    fn to_value(&self) -> Value {
        Value::Number(*self)
    }
}

impl InputScalar for String {
    fn input(
        surface: &mut dyn Surface,
        key: &str,
        value: &mut Self,
        editable: bool,
    ) -> InputEvent {
        surface.input_text(key, value, editable)
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

/// Single-value widget with the full edit-lock protocol.
///
/// Idle: the committed value is shown read-only next to an Edit button.
/// Editing: the draft is bound to the input; Done (or the accept keystroke)
/// commits, and a commit whose draft differs from the committed value queues
/// exactly one outbound message.
pub struct SingleInput<T: InputScalar> {
    id: ElementId,
    state: EditState<T>,
}

pub type StringInput = SingleInput<String>;
pub type IntegerInput = SingleInput<i64>;
pub type NumberInput = SingleInput<f64>;

impl<T: InputScalar> SingleInput<T> {
    pub fn new(id: ElementId, default: T) -> Self {
        Self {
            id,
            state: EditState::new(default),
        }
    }

    pub fn data(&mut self, value: T) {
        self.state.apply_remote(value);
    }

    pub fn state(&self) -> &EditState<T> {
        &self.state
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        surface.text(&self.id.name);
        surface.same_line();
        let key = self.id.to_string();
        if !self.state.is_editing() {
            if surface.button(&format!("{key}/edit"), "Edit") {
                self.state.begin_edit();
            }
            surface.same_line();
            let mut shown = self.state.draft().clone();
            T::input(surface, &format!("{key}/value"), &mut shown, false);
        } else {
            let done = surface.button(&format!("{key}/done"), "Done");
            surface.same_line();
            let event = T::input(surface, &format!("{key}/value"), self.state.draft_mut(), true);
            if done || event.done {
                if let Some(value) = self.state.commit() {
                    ctx.outbox.push(self.id.clone(), value.to_value());
                }
            }
        }
    }
}
