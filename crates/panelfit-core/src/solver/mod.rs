use crate::geometry::NORMALIZE_MARGIN;
use crate::types::*;
use tracing::info;

pub mod containment;
pub mod grid;
pub mod space;
mod sweep;

pub use space::SearchSpace;

/// Largest grid, in panels, generated for a single configuration.
pub const MAX_GRID_PANELS: usize = 1_000_000;

/// Largest number of configurations a single search may evaluate.
pub const MAX_CONFIGURATIONS: usize = 10_000_000;

/// Reported to a [`SearchObserver`] whenever the best count strictly improves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    pub panel_count: usize,
    pub configuration: Configuration,
}

/// Receives progress from a running search.
pub trait SearchObserver {
    fn on_improvement(&mut self, improvement: &Improvement);
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_improvement(&mut self, _: &Improvement) {}
}

impl<F: FnMut(&Improvement)> SearchObserver for F {
    fn on_improvement(&mut self, improvement: &Improvement) {
        self(improvement)
    }
}

/// Searches rotations and grid offsets for the placement that fits the most
/// panels inside a polygon.
pub struct Solver {
    request: SolveRequest,
    space: SearchSpace,
}

impl Solver {
    /// Validates the request and precomputes the search space.
    pub fn new(request: SolveRequest) -> Result<Self> {
        if request.polygon.len() < 3 {
            return Err(SolverError::DegeneratePolygon {
                vertices: request.polygon.len(),
            });
        }

        if let Some(p) = request
            .polygon
            .vertices
            .iter()
            .find(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(SolverError::InvalidInput(format!(
                "Polygon vertex ({}, {}) is not finite",
                p.x, p.y
            )));
        }

        let PanelSize { width, height } = request.panel_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SolverError::InvalidPanelSize { width, height });
        }

        if !(1..=360).contains(&request.angle_resolution) {
            return Err(SolverError::InvalidInput(format!(
                "Angle resolution must be between 1 and 360 degrees, got {}",
                request.angle_resolution
            )));
        }

        if !(request.offset_step.is_finite() && request.offset_step > 0.0) {
            return Err(SolverError::InvalidInput(format!(
                "Offset step must be positive, got {}",
                request.offset_step
            )));
        }

        check_search_size(&request)?;

        let space = SearchSpace::new(
            request.panel_size,
            request.angle_resolution,
            request.offset_step,
        );
        Ok(Self { request, space })
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    /// Runs the full sweep without progress reporting.
    pub fn solve(&self) -> Result<SolveResult> {
        self.solve_with(&mut NoopObserver)
    }

    /// Runs the full sweep, notifying `observer` on every strict improvement.
    pub fn solve_with<O: SearchObserver>(&self, observer: &mut O) -> Result<SolveResult> {
        info!(
            vertices = self.request.polygon.len(),
            panel_width = self.request.panel_size.width,
            panel_height = self.request.panel_size.height,
            angles = self.space.angles().len(),
            configurations = self.space.len(),
            parallel = self.request.parallel,
            "Starting panel search"
        );

        let (best, stats) = if self.request.parallel {
            self.sweep_parallel(observer)
        } else {
            self.sweep_sequential(observer)
        };

        let result = match best {
            Some(best) => SolveResult {
                max_panel_count: best.count,
                best: Some(best.configuration),
                panel_size: self.request.panel_size,
                layout: Some(best.layout),
                stats,
            },
            None => SolveResult {
                max_panel_count: 0,
                best: None,
                panel_size: self.request.panel_size,
                layout: None,
                stats,
            },
        };

        match result.best {
            Some(c) => info!(
                panels = result.max_panel_count,
                angle = c.angle,
                indentation = c.indentation,
                offset_x = c.offset_x,
                offset_y = c.offset_y,
                "Search complete"
            ),
            None => info!("Search complete: no panel fits inside the polygon"),
        }

        Ok(result)
    }
}

/// Number of `step`s needed to span `extent`, or `None` past `cap`.
fn steps(extent: f64, step: f64, cap: usize) -> Option<usize> {
    let n = (extent / step).ceil();
    (n.is_finite() && n <= cap as f64).then_some(n as usize)
}

/// Rejects requests whose grid or configuration count exceeds
/// [`MAX_GRID_PANELS`] or [`MAX_CONFIGURATIONS`]. Runs before anything is
/// allocated.
fn check_search_size(request: &SolveRequest) -> Result<()> {
    let PanelSize { width, height } = request.panel_size;
    let step = request.offset_step;

    // Any rotation fits inside a square with the bounding-box diagonal as side
    let diagonal = request
        .polygon
        .bounds()
        .map_or(0.0, |b| (b.max_x - b.min_x).hypot(b.max_y - b.min_y));
    let extent = diagonal + NORMALIZE_MARGIN;
    let grid = steps(extent, width, MAX_GRID_PANELS)
        .zip(steps(extent, height, MAX_GRID_PANELS))
        .and_then(|(columns, rows)| (columns + 1).checked_mul(rows + 1))
        .filter(|&panels| panels <= MAX_GRID_PANELS);
    if grid.is_none() {
        return Err(SolverError::InvalidInput(format!(
            "Polygon extent {extent} needs more than {MAX_GRID_PANELS} panels of {width} x {height}"
        )));
    }

    let angles = 360usize.div_ceil(request.angle_resolution as usize);
    let configurations = steps(width, step, MAX_CONFIGURATIONS)
        .zip(steps(width, step, MAX_CONFIGURATIONS))
        .zip(steps(height, step, MAX_CONFIGURATIONS))
        .and_then(|((indentations, half_x), half_y)| {
            angles
                .checked_mul(indentations)?
                .checked_mul(half_x.checked_mul(2)?)?
                .checked_mul(half_y.checked_mul(2)?)
        })
        .filter(|&n| n <= MAX_CONFIGURATIONS);
    if configurations.is_none() {
        return Err(SolverError::InvalidInput(format!(
            "Search space exceeds {MAX_CONFIGURATIONS} configurations; \
             raise offset_step or angle_resolution"
        )));
    }

    Ok(())
}

/// Convenience wrapper: validates and solves in one call with the default
/// offset step.
pub fn solve(polygon: Polygon, panel_size: PanelSize, angle_resolution: u32) -> Result<SolveResult> {
    Solver::new(SolveRequest::new(polygon, panel_size, angle_resolution))?.solve()
}
