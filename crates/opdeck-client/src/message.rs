use opdeck_core::{ElementId, Pose, Value};
use opdeck_plot::{Color, LineStyle, PolygonDescription, Range, Side};
use serde::{Deserialize, Serialize};

/// One typed publish call from the authority.
///
/// A tick's batch of these is applied in delivery order before anything is
/// rendered. Form field declarations carry the owning form's identity;
/// container begin/end calls rely on the active-form cursor instead, exactly
/// like the stream they mirror.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// The authority's free-form data map, consulted for reference lists.
    Data { data: Value },
    Label {
        id: ElementId,
        text: String,
    },
    ArrayLabel {
        id: ElementId,
        labels: Vec<String>,
        data: Vec<f64>,
    },
    Button {
        id: ElementId,
    },
    Checkbox {
        id: ElementId,
        state: bool,
    },
    StringInput {
        id: ElementId,
        data: String,
    },
    IntegerInput {
        id: ElementId,
        data: i64,
    },
    NumberInput {
        id: ElementId,
        data: f64,
    },
    NumberSlider {
        id: ElementId,
        data: f64,
        min: f64,
        max: f64,
    },
    ArrayInput {
        id: ElementId,
        labels: Vec<String>,
        data: Vec<f64>,
    },
    ComboInput {
        id: ElementId,
        values: Vec<String>,
        data: String,
    },
    DataComboInput {
        id: ElementId,
        reference: Vec<String>,
        data: String,
    },
    TableStart {
        id: ElementId,
        header: Vec<String>,
    },
    TableRow {
        id: ElementId,
        data: Vec<String>,
    },
    TableEnd {
        id: ElementId,
    },
    Form {
        id: ElementId,
    },
    FormCheckbox {
        form: ElementId,
        name: String,
        required: bool,
        default: bool,
    },
    FormIntegerInput {
        form: ElementId,
        name: String,
        required: bool,
        default: i64,
    },
    FormNumberInput {
        form: ElementId,
        name: String,
        required: bool,
        default: f64,
    },
    FormStringInput {
        form: ElementId,
        name: String,
        required: bool,
        default: String,
    },
    FormArrayInput {
        form: ElementId,
        name: String,
        required: bool,
        labels: Vec<String>,
        default: Vec<f64>,
        fixed_size: bool,
    },
    FormComboInput {
        form: ElementId,
        name: String,
        required: bool,
        values: Vec<String>,
        send_index: bool,
    },
    FormDataComboInput {
        form: ElementId,
        name: String,
        required: bool,
        reference: Vec<String>,
        send_index: bool,
    },
    FormPoint3dInput {
        form: ElementId,
        name: String,
        required: bool,
        default: [f64; 3],
        interactive: bool,
    },
    FormRotationInput {
        form: ElementId,
        name: String,
        required: bool,
        default: Pose,
        interactive: bool,
    },
    FormTransformInput {
        form: ElementId,
        name: String,
        required: bool,
        default: Pose,
        interactive: bool,
    },
    FormObjectBegin {
        name: String,
        required: bool,
    },
    FormObjectEnd,
    FormObjectArrayBegin {
        name: String,
        required: bool,
    },
    FormObjectArrayEnd,
    FormGenericArrayBegin {
        name: String,
        required: bool,
        data: Option<Vec<Value>>,
    },
    FormGenericArrayEnd,
    FormOneOfBegin {
        name: String,
        required: bool,
        data: Option<(usize, Value)>,
    },
    FormOneOfEnd,
    StartPlot {
        id: u64,
        title: String,
    },
    PlotSetupXAxis {
        id: u64,
        label: String,
        range: Range,
    },
    PlotSetupYAxisLeft {
        id: u64,
        label: String,
        range: Range,
    },
    PlotSetupYAxisRight {
        id: u64,
        label: String,
        range: Range,
    },
    PlotPoint {
        id: u64,
        dataset: u64,
        label: String,
        x: f64,
        y: f64,
        color: Color,
        style: LineStyle,
        side: Side,
    },
    PlotPolygon {
        id: u64,
        dataset: u64,
        label: String,
        polygon: PolygonDescription,
        side: Side,
    },
    PlotPolygons {
        id: u64,
        dataset: u64,
        label: String,
        polygons: Vec<PolygonDescription>,
        side: Side,
    },
    EndPlot {
        id: u64,
    },
}
