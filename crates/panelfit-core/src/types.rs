use serde::{Deserialize, Serialize};

/// A 2D point, serialized as an `[x, y]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Simple polygon, closed implicitly from the last vertex back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns `None` for a polygon without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.vertices.iter().fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Point::from).collect())
    }
}

/// Dimensions shared by every panel of a search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

impl PanelSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bottom-left corner of a panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub x: f64,
    pub y: f64,
}

impl Panel {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Corners of the rectangle spanned by this panel, counter-clockwise from
    /// the bottom-left.
    pub fn corners(&self, size: PanelSize) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + size.width, self.y),
            Point::new(self.x + size.width, self.y + size.height),
            Point::new(self.x, self.y + size.height),
        ]
    }
}

/// One point of the search space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Polygon rotation in whole degrees, `[0, 360)`
    pub angle: u32,
    /// Horizontal stagger added per row, `[0, panel width)`
    pub indentation: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Input: what the caller provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub polygon: Polygon,
    pub panel_size: PanelSize,
    /// Step between tried rotation angles, in degrees
    #[serde(default = "default_angle_resolution")]
    pub angle_resolution: u32,
    /// Step used for the indentation and offset ranges
    #[serde(default = "default_offset_step")]
    pub offset_step: f64,
    /// Score angles on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

impl SolveRequest {
    pub fn new(polygon: Polygon, panel_size: PanelSize, angle_resolution: u32) -> Self {
        Self {
            polygon,
            panel_size,
            angle_resolution,
            offset_step: default_offset_step(),
            parallel: false,
        }
    }
}

fn default_angle_resolution() -> u32 {
    15
}

fn default_offset_step() -> f64 {
    1.0
}

/// Polygon and panels of the winning configuration, for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestLayout {
    /// Rotated and normalized polygon
    pub polygon: Polygon,
    /// Every panel of the grid, contained or not
    pub grid: Vec<Panel>,
    /// Panels fully inside the polygon, in grid order
    pub contained: Vec<Panel>,
}

/// Counters collected during a sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub angles_evaluated: usize,
    pub configurations_evaluated: usize,
    pub improvements: usize,
}

/// Output: what the solver returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub max_panel_count: usize,
    /// Unset when no configuration contains a single panel
    pub best: Option<Configuration>,
    pub panel_size: PanelSize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub layout: Option<BestLayout>,
    #[serde(default)]
    pub stats: SearchStats,
}

impl SolveResult {
    /// Flattens the result into
    /// `(max_count, angle, indentation, offset_x, offset_y)`.
    pub fn summary(&self) -> (usize, Option<u32>, Option<f64>, Option<f64>, Option<f64>) {
        match self.best {
            Some(c) => (
                self.max_panel_count,
                Some(c.angle),
                Some(c.indentation),
                Some(c.offset_x),
                Some(c.offset_y),
            ),
            None => (self.max_panel_count, None, None, None, None),
        }
    }
}

/// Error type for the search
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Degenerate polygon: need at least 3 vertices, got {vertices}")]
    DegeneratePolygon { vertices: usize },

    #[error("Invalid panel size {width} x {height}: both dimensions must be positive")]
    InvalidPanelSize { width: f64, height: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
