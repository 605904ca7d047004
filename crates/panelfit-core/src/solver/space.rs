use crate::types::{Configuration, PanelSize};

/// Discrete parameter space swept by the solver.
///
/// Each axis is materialized once; [`SearchSpace::configurations_at`] walks
/// the indentation/offset product lazily for a given angle.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    angles: Vec<u32>,
    indentations: Vec<f64>,
    offsets_x: Vec<f64>,
    offsets_y: Vec<f64>,
}

impl SearchSpace {
    pub fn new(size: PanelSize, angle_resolution: u32, step: f64) -> Self {
        Self {
            angles: (0..360).step_by(angle_resolution.max(1) as usize).collect(),
            indentations: forward_steps(size.width, step),
            offsets_x: symmetric_steps(size.width, step),
            offsets_y: symmetric_steps(size.height, step),
        }
    }

    pub fn angles(&self) -> &[u32] {
        &self.angles
    }

    /// Number of configurations tried per angle.
    pub fn placements_per_angle(&self) -> usize {
        self.indentations.len() * self.offsets_x.len() * self.offsets_y.len()
    }

    pub fn len(&self) -> usize {
        self.angles.len() * self.placements_per_angle()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configurations for a single angle, indentation outermost.
    pub fn configurations_at(&self, angle: u32) -> impl Iterator<Item = Configuration> + '_ {
        self.indentations.iter().flat_map(move |&indentation| {
            self.offsets_x.iter().flat_map(move |&offset_x| {
                self.offsets_y.iter().map(move |&offset_y| Configuration {
                    angle,
                    indentation,
                    offset_x,
                    offset_y,
                })
            })
        })
    }

    /// Every configuration in sweep order.
    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.angles
            .iter()
            .flat_map(move |&angle| self.configurations_at(angle))
    }
}

/// `0, step, 2*step, ...` strictly below `limit`.
fn forward_steps(limit: f64, step: f64) -> Vec<f64> {
    let count = (limit / step).ceil() as usize;
    (0..count)
        .map(|k| k as f64 * step)
        .filter(|&v| v < limit)
        .collect()
}

/// Every multiple of `step` in `[-limit, limit)`, non-negative values first so
/// the zero offset is tried before its negative twin.
fn symmetric_steps(limit: f64, step: f64) -> Vec<f64> {
    let mut values = forward_steps(limit, step);
    let negatives = (1..=(limit / step).floor() as usize)
        .rev()
        .map(|k| -(k as f64) * step);
    values.extend(negatives);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_panel_ranges() {
        let space = SearchSpace::new(PanelSize::new(3.0, 1.0), 90, 1.0);
        assert_eq!(space.angles(), &[0, 90, 180, 270]);
        assert_eq!(space.indentations, vec![0.0, 1.0, 2.0]);
        assert_eq!(space.offsets_x, vec![0.0, 1.0, 2.0, -3.0, -2.0, -1.0]);
        assert_eq!(space.offsets_y, vec![0.0, -1.0]);
        assert_eq!(space.placements_per_angle(), 3 * 6 * 2);
        assert_eq!(space.len(), 4 * 36);
    }

    #[test]
    fn fractional_panel_ranges_stay_half_open() {
        let space = SearchSpace::new(PanelSize::new(2.5, 1.0), 360, 1.0);
        assert_eq!(space.angles(), &[0]);
        assert_eq!(space.indentations, vec![0.0, 1.0, 2.0]);
        assert_eq!(space.offsets_x, vec![0.0, 1.0, 2.0, -2.0, -1.0]);
        for c in space.configurations() {
            assert!(c.offset_x >= -2.5 && c.offset_x < 2.5);
            assert!(c.indentation < 2.5);
        }
    }

    #[test]
    fn angles_that_do_not_divide_a_full_turn() {
        let space = SearchSpace::new(PanelSize::new(1.0, 1.0), 100, 1.0);
        assert_eq!(space.angles(), &[0, 100, 200, 300]);
    }

    #[test]
    fn configurations_enumerate_the_full_product() {
        let space = SearchSpace::new(PanelSize::new(2.0, 1.0), 180, 1.0);
        let all: Vec<Configuration> = space.configurations().collect();
        assert_eq!(all.len(), space.len());
        assert_eq!(
            all[0],
            Configuration {
                angle: 0,
                indentation: 0.0,
                offset_x: 0.0,
                offset_y: 0.0
            }
        );
        assert_eq!(all.last().map(|c| c.angle), Some(180));
    }
}
