use crate::style::{Color, LineStyle, Point, PolygonDescription, Range, Side};
use crate::surface::{AxisSpec, PlotExtents, PlotSurface};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

#[derive(Clone, Debug)]
struct Series {
    label: String,
    color: Color,
    style: LineStyle,
    side: Side,
    points: Vec<Point>,
}

#[derive(Clone, Debug)]
struct PolygonEntry {
    label: String,
    side: Side,
    polygon: PolygonDescription,
}

#[derive(Clone, Debug)]
struct PolygonGroupEntry {
    label: String,
    side: Side,
    polygons: Vec<PolygonDescription>,
}

/// Aggregated data and axis policy for one figure.
///
/// Points are append-only in arrival order; polygons are replaced only when
/// their description changes by value. The side counters track how many
/// datasets ever attached to each y axis and drive whether that axis draws
/// decorations at all.
pub struct Plot {
    uid: u64,
    title: String,
    x_label: String,
    y_label: String,
    y2_label: String,
    x_limits: Option<(f64, f64)>,
    y_limits: Option<(f64, f64)>,
    y2_limits: Option<(f64, f64)>,
    x_extent: (f64, f64),
    y_extent: (f64, f64),
    y2_extent: (f64, f64),
    left_series: u64,
    right_series: u64,
    series: FxHashMap<u64, Series>,
    polygons: FxHashMap<u64, PolygonEntry>,
    polygon_groups: FxHashMap<u64, PolygonGroupEntry>,
}

/// Turns a requested range into pinned limits.
///
/// Both ends unbounded means autofit (no pinned limits). A single unbounded
/// end is filled from the last rendered extent on that side, so a
/// partially-pinned axis does not jump from frame to frame.
fn range_to_limits(range: Range, extent: (f64, f64)) -> Option<(f64, f64)> {
    if range.min_unbounded() && range.max_unbounded() {
        return None;
    }
    let min = if range.min_unbounded() {
        extent.0
    } else {
        range.min
    };
    let max = if range.max_unbounded() {
        extent.1
    } else {
        range.max
    };
    Some((min, max))
}

impl Plot {
    pub fn new(uid: u64, title: impl Into<String>) -> Self {
        Self {
            uid,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            y2_label: String::new(),
            x_limits: None,
            y_limits: None,
            y2_limits: None,
            x_extent: (0.0, 1.0),
            y_extent: (0.0, 1.0),
            y2_extent: (0.0, 1.0),
            left_series: 0,
            right_series: 0,
            series: FxHashMap::default(),
            polygons: FxHashMap::default(),
            polygon_groups: FxHashMap::default(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn setup_xaxis(&mut self, label: impl Into<String>, range: Range) {
        self.x_label = label.into();
        self.x_limits = range_to_limits(range, self.x_extent);
    }

    pub fn setup_yaxis_left(&mut self, label: impl Into<String>, range: Range) {
        self.y_label = label.into();
        self.y_limits = range_to_limits(range, self.y_extent);
    }

    pub fn setup_yaxis_right(&mut self, label: impl Into<String>, range: Range) {
        self.y2_label = label.into();
        self.y2_limits = range_to_limits(range, self.y2_extent);
    }

    pub fn x_limits(&self) -> Option<(f64, f64)> {
        self.x_limits
    }

    pub fn y_limits(&self) -> Option<(f64, f64)> {
        self.y_limits
    }

    pub fn y2_limits(&self) -> Option<(f64, f64)> {
        self.y2_limits
    }

    /// Appends one point to a dataset, creating the dataset on first use.
    /// Arrival order is time order; nothing is reordered or deduplicated.
    pub fn add_point(
        &mut self,
        dataset: u64,
        label: impl Into<String>,
        x: f64,
        y: f64,
        color: Color,
        style: LineStyle,
        side: Side,
    ) {
        let uid = self.uid;
        let series = self.series.entry(dataset).or_insert_with(|| {
            log::trace!("plot {uid}: new dataset {dataset}");
            Series {
                label: String::new(),
                color,
                style,
                side,
                points: Vec::with_capacity(1024),
            }
        });
        series.label = label.into();
        series.color = color;
        series.style = style;
        series.side = side;
        series.points.push(Point { x, y });
        match side {
            Side::Left => self.left_series += 1,
            Side::Right => self.right_series += 1,
        }
    }

    /// Stores a polygon description, replacing the previous one only when it
    /// differs by value. Label and side always refresh. Returns true when
    /// the description was actually replaced.
    pub fn set_polygon(
        &mut self,
        dataset: u64,
        label: impl Into<String>,
        polygon: PolygonDescription,
        side: Side,
    ) -> bool {
        let label = label.into();
        let replaced = match self.polygons.entry(dataset) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                let replaced = entry.polygon != polygon;
                if replaced {
                    entry.polygon = polygon;
                }
                entry.label = label;
                entry.side = side;
                replaced
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PolygonEntry {
                    label,
                    side,
                    polygon,
                });
                true
            }
        };
        match side {
            Side::Left => self.left_series += 1,
            Side::Right => self.right_series += 1,
        }
        replaced
    }

    /// Same replace-on-change rule as [`Plot::set_polygon`], for a list of
    /// polygons rendered under one dataset id.
    pub fn set_polygons(
        &mut self,
        dataset: u64,
        label: impl Into<String>,
        polygons: Vec<PolygonDescription>,
        side: Side,
    ) -> bool {
        let label = label.into();
        let replaced = match self.polygon_groups.entry(dataset) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                let replaced = entry.polygons != polygons;
                if replaced {
                    entry.polygons = polygons;
                }
                entry.label = label;
                entry.side = side;
                replaced
            }
            Entry::Vacant(vacant) => {
                vacant.insert(PolygonGroupEntry {
                    label,
                    side,
                    polygons,
                });
                true
            }
        };
        match side {
            Side::Left => self.left_series += 1,
            Side::Right => self.right_series += 1,
        }
        replaced
    }

    /// Draws the plot and records the rendered extents for the
    /// partially-pinned axis policy.
    pub fn render(&mut self, surface: &mut dyn PlotSurface) {
        let x = AxisSpec {
            label: Some(self.x_label.as_str()),
            limits: self.x_limits,
            decorations: true,
        };
        let y_left = AxisSpec {
            label: (self.left_series > 0).then_some(self.y_label.as_str()),
            limits: self.y_limits,
            decorations: self.left_series > 0,
        };
        let y_right = AxisSpec {
            label: (self.right_series > 0).then_some(self.y2_label.as_str()),
            limits: self.y2_limits,
            decorations: self.right_series > 0,
        };
        let key = format!("{}##{}", self.title, self.uid);
        if !surface.begin_plot(&key, &self.title, x, y_left, y_right) {
            return;
        }
        for entry in self.polygons.values() {
            surface.polygon(&entry.label, entry.side, &entry.polygon);
        }
        for group in self.polygon_groups.values() {
            for polygon in &group.polygons {
                surface.polygon(&group.label, group.side, polygon);
            }
        }
        for series in self.series.values() {
            surface.line(
                &series.label,
                series.color,
                series.style,
                series.side,
                &series.points,
            );
        }
        let extents = surface.end_plot();
        self.x_extent = extents.x;
        self.y_extent = extents.y_left;
        self.y2_extent = extents.y_right;
    }
}
