use super::containment::filter_contained;
use super::grid::{generate_grid, GridDimensions};
use super::*;
use crate::geometry::normalize;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Winning configuration together with everything needed to draw it.
pub(super) struct Best {
    pub count: usize,
    pub configuration: Configuration,
    pub layout: BestLayout,
}

/// Best result seen so far. Only a strictly higher count replaces it, so the
/// first configuration to reach a count keeps it.
#[derive(Default)]
struct Incumbent {
    best: Option<Best>,
    improvements: usize,
}

impl Incumbent {
    fn count(&self) -> usize {
        self.best.as_ref().map_or(0, |b| b.count)
    }

    fn improves(&self, count: usize) -> bool {
        count > self.count()
    }

    fn replace(&mut self, best: Best) -> Improvement {
        let improvement = Improvement {
            panel_count: best.count,
            configuration: best.configuration,
        };
        self.best = Some(best);
        self.improvements += 1;
        improvement
    }
}

/// Polygon and grid size for one rotation angle
pub(super) struct AngleFrame {
    pub polygon: Polygon,
    pub dims: GridDimensions,
}

impl Solver {
    pub(super) fn frame(&self, angle: u32) -> AngleFrame {
        // Always rotate the caller's polygon, never a previous frame.
        let polygon = normalize(&self.request.polygon, f64::from(angle).to_radians());
        let dims = match polygon.bounds() {
            Some(bounds) => GridDimensions::covering(&bounds, self.request.panel_size),
            None => GridDimensions {
                columns: 0,
                rows: 0,
            },
        };
        AngleFrame { polygon, dims }
    }

    /// Scores every placement at `angle` against `incumbent`. Returns the
    /// number of configurations evaluated.
    fn scan_angle<O: SearchObserver>(
        &self,
        angle: u32,
        incumbent: &mut Incumbent,
        observer: &mut O,
    ) -> usize {
        let size = self.request.panel_size;
        let frame = self.frame(angle);
        trace!(
            angle,
            columns = frame.dims.columns,
            rows = frame.dims.rows,
            "Scanning angle"
        );

        let mut evaluated = 0;
        for configuration in self.space.configurations_at(angle) {
            let grid = generate_grid(
                frame.dims,
                size,
                configuration.indentation,
                configuration.offset_x,
                configuration.offset_y,
            );
            let contained = filter_contained(&grid, size, &frame.polygon);
            evaluated += 1;

            if incumbent.improves(contained.len()) {
                let improvement = incumbent.replace(Best {
                    count: contained.len(),
                    configuration,
                    layout: BestLayout {
                        polygon: frame.polygon.clone(),
                        grid,
                        contained,
                    },
                });
                debug!(
                    panels = improvement.panel_count,
                    angle = configuration.angle,
                    indentation = configuration.indentation,
                    offset_x = configuration.offset_x,
                    offset_y = configuration.offset_y,
                    "New best placement"
                );
                observer.on_improvement(&improvement);
            }
        }
        evaluated
    }

    pub(super) fn sweep_sequential<O: SearchObserver>(
        &self,
        observer: &mut O,
    ) -> (Option<Best>, SearchStats) {
        let mut incumbent = Incumbent::default();
        let mut stats = SearchStats::default();

        for &angle in self.space.angles() {
            stats.configurations_evaluated += self.scan_angle(angle, &mut incumbent, observer);
            stats.angles_evaluated += 1;
        }

        stats.improvements = incumbent.improvements;
        (incumbent.best, stats)
    }

    /// Scores angles concurrently, then merges the per-angle winners in
    /// ascending angle order. The merge applies the same strict rule, so the
    /// outcome matches [`Solver::sweep_sequential`]; the observer only sees
    /// improvements made during the merge.
    pub(super) fn sweep_parallel<O: SearchObserver>(
        &self,
        observer: &mut O,
    ) -> (Option<Best>, SearchStats) {
        let per_angle: Vec<(Incumbent, usize)> = self
            .space
            .angles()
            .par_iter()
            .map(|&angle| {
                let mut local = Incumbent::default();
                let evaluated = self.scan_angle(angle, &mut local, &mut NoopObserver);
                (local, evaluated)
            })
            .collect();

        let mut incumbent = Incumbent::default();
        let mut stats = SearchStats::default();

        for (local, evaluated) in per_angle {
            stats.angles_evaluated += 1;
            stats.configurations_evaluated += evaluated;

            if let Some(best) = local.best {
                if incumbent.improves(best.count) {
                    let improvement = incumbent.replace(best);
                    observer.on_improvement(&improvement);
                }
            }
        }

        stats.improvements = incumbent.improvements;
        (incumbent.best, stats)
    }
}
