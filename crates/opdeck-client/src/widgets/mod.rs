//! Per-kind display widgets: thin rendering glue over the shared edit-lock
//! state. Each widget owns its identity so commits address the right leaf.

mod array_input;
mod array_label;
mod button;
mod checkbox;
mod combo;
mod label;
mod number_slider;
mod single_input;
mod table;

pub use array_input::ArrayInput;
pub use array_label::ArrayLabel;
pub use button::Button;
pub use checkbox::Checkbox;
pub use combo::{ComboInput, DataComboInput};
pub use label::Label;
pub use number_slider::NumberSlider;
pub use single_input::{IntegerInput, NumberInput, SingleInput, StringInput};
pub use table::Table;
