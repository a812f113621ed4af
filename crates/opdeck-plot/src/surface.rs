use crate::style::{Color, LineStyle, Point, PolygonDescription, Side};

/// Per-axis drawing instructions for one frame.
#[derive(Clone, Copy, Debug)]
pub struct AxisSpec<'a> {
    /// Axis legend; `None` suppresses the label entirely.
    pub label: Option<&'a str>,
    /// Pinned limits; `None` lets the surface autofit.
    pub limits: Option<(f64, f64)>,
    /// Whether gridlines/ticks are drawn at all this frame.
    pub decorations: bool,
}

/// Data extents the surface actually rendered, fed back into the
/// partially-pinned axis policy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlotExtents {
    pub x: (f64, f64),
    pub y_left: (f64, f64),
    pub y_right: (f64, f64),
}

/// Plot-drawing capability supplied by the embedder.
///
/// Calls arrive bracketed: `begin_plot`, any number of `line`/`polygon`
/// items when it returned true, then `end_plot`.
pub trait PlotSurface {
    fn begin_plot(
        &mut self,
        key: &str,
        title: &str,
        x: AxisSpec<'_>,
        y_left: AxisSpec<'_>,
        y_right: AxisSpec<'_>,
    ) -> bool;

    fn line(&mut self, label: &str, color: Color, style: LineStyle, side: Side, points: &[Point]);

    fn polygon(&mut self, label: &str, side: Side, polygon: &PolygonDescription);

    fn end_plot(&mut self) -> PlotExtents;
}
