use crate::widgets::{
    ArrayInput, ArrayLabel, Button, Checkbox, ComboInput, DataComboInput, IntegerInput, Label,
    NumberInput, NumberSlider, StringInput, Table,
};
use opdeck_core::{ElementId, MarkerFactory, Outbox, Surface};
use opdeck_form::Form;

/// Capabilities widgets reach for while drawing: the commit queue and the
/// marker factory for forms with spatial fields.
pub struct DrawCtx<'a> {
    pub outbox: &'a mut Outbox,
    pub markers: &'a mut dyn MarkerFactory,
}

/// Declared kind of a widget, compared on every update to decide reuse
/// versus destroy-and-rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    Label,
    ArrayLabel,
    Button,
    Checkbox,
    StringInput,
    IntegerInput,
    NumberInput,
    NumberSlider,
    ArrayInput,
    Combo,
    DataCombo,
    Table,
    Form,
}

/// Closed set of widget implementations. The kind tag is the whole identity
/// contract: an update declaring a different kind at the same address throws
/// the old instance away wholesale.
pub enum Widget {
    Label(Label),
    ArrayLabel(ArrayLabel),
    Button(Button),
    Checkbox(Checkbox),
    StringInput(StringInput),
    IntegerInput(IntegerInput),
    NumberInput(NumberInput),
    NumberSlider(NumberSlider),
    ArrayInput(ArrayInput),
    Combo(ComboInput),
    DataCombo(DataComboInput),
    Table(Table),
    Form(Form),
}

impl Widget {
    pub fn new(kind: WidgetKind, id: ElementId) -> Self {
        match kind {
            WidgetKind::Label => Widget::Label(Label::new(id)),
            WidgetKind::ArrayLabel => Widget::ArrayLabel(ArrayLabel::new(id)),
            WidgetKind::Button => Widget::Button(Button::new(id)),
            WidgetKind::Checkbox => Widget::Checkbox(Checkbox::new(id)),
            WidgetKind::StringInput => Widget::StringInput(StringInput::new(id, String::new())),
            WidgetKind::IntegerInput => Widget::IntegerInput(IntegerInput::new(id, 0)),
            WidgetKind::NumberInput => Widget::NumberInput(NumberInput::new(id, 0.0)),
            WidgetKind::NumberSlider => Widget::NumberSlider(NumberSlider::new(id)),
            WidgetKind::ArrayInput => Widget::ArrayInput(ArrayInput::new(id)),
            WidgetKind::Combo => Widget::Combo(ComboInput::new(id)),
            WidgetKind::DataCombo => Widget::DataCombo(DataComboInput::new(id)),
            WidgetKind::Table => Widget::Table(Table::new(id)),
            WidgetKind::Form => Widget::Form(Form::new(id)),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::Label(_) => WidgetKind::Label,
            Widget::ArrayLabel(_) => WidgetKind::ArrayLabel,
            Widget::Button(_) => WidgetKind::Button,
            Widget::Checkbox(_) => WidgetKind::Checkbox,
            Widget::StringInput(_) => WidgetKind::StringInput,
            Widget::IntegerInput(_) => WidgetKind::IntegerInput,
            Widget::NumberInput(_) => WidgetKind::NumberInput,
            Widget::NumberSlider(_) => WidgetKind::NumberSlider,
            Widget::ArrayInput(_) => WidgetKind::ArrayInput,
            Widget::Combo(_) => WidgetKind::Combo,
            Widget::DataCombo(_) => WidgetKind::DataCombo,
            Widget::Table(_) => WidgetKind::Table,
            Widget::Form(_) => WidgetKind::Form,
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        match self {
            Widget::Label(w) => w.draw(surface),
            Widget::ArrayLabel(w) => w.draw(surface),
            Widget::Button(w) => w.draw(surface, ctx),
            Widget::Checkbox(w) => w.draw(surface, ctx),
            Widget::StringInput(w) => w.draw(surface, ctx),
            Widget::IntegerInput(w) => w.draw(surface, ctx),
            Widget::NumberInput(w) => w.draw(surface, ctx),
            Widget::NumberSlider(w) => w.draw(surface, ctx),
            Widget::ArrayInput(w) => w.draw(surface, ctx),
            Widget::Combo(w) => w.draw(surface, ctx),
            Widget::DataCombo(w) => w.draw(surface, ctx),
            Widget::Table(w) => w.draw(surface),
            Widget::Form(w) => w.draw(surface, ctx.outbox, ctx.markers),
        }
    }

    pub fn draw_3d(&mut self) {
        if let Widget::Form(form) = self {
            form.draw_3d();
        }
    }
}
