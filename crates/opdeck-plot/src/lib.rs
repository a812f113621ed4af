//! Plot aggregation for the opdeck client.
//!
//! A [`Plot`] owns the data the authority streams for one figure: per-dataset
//! point series appended in arrival order, polygon descriptions replaced only
//! when their value changes, and the axis-limit policy that mixes pinned
//! bounds with autofit. Drawing goes through the [`PlotSurface`] capability;
//! this crate never owns pixels and is independent of the widget tree.

mod plot;
mod style;
mod surface;

pub use plot::Plot;
pub use style::{Color, LineStyle, Point, PolygonDescription, Range, Side};
pub use surface::{AxisSpec, PlotExtents, PlotSurface};
