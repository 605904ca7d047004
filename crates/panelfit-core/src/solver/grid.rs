use crate::types::{Bounds, Panel, PanelSize};

/// Column and row counts of a panel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub columns: usize,
    pub rows: usize,
}

impl GridDimensions {
    /// Smallest grid that still covers `bounds` when shifted by up to one
    /// panel in the negative direction.
    pub fn covering(bounds: &Bounds, size: PanelSize) -> Self {
        let cells = |extent: f64, step: f64| (extent / step).ceil().max(0.0) as usize + 1;
        Self {
            columns: cells(bounds.max_x, size.width),
            rows: cells(bounds.max_y, size.height),
        }
    }
}

/// Generates the bottom-left corners of a `columns x rows` lattice.
///
/// Row `j` is shifted right by `indentation * j` wrapped into
/// `[0, panel width)`, which produces brick-style layouts. Corners are
/// ordered column by column.
pub fn generate_grid(
    dims: GridDimensions,
    size: PanelSize,
    indentation: f64,
    offset_x: f64,
    offset_y: f64,
) -> Vec<Panel> {
    let mut grid = Vec::with_capacity(dims.columns * dims.rows);
    for i in 0..dims.columns {
        for j in 0..dims.rows {
            let stagger = (indentation * j as f64).rem_euclid(size.width);
            grid.push(Panel::new(
                i as f64 * size.width + stagger + offset_x,
                j as f64 * size.height + offset_y,
            ));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: PanelSize = PanelSize::new(3.0, 1.0);

    #[test]
    fn plain_grid_is_column_major() {
        let dims = GridDimensions { columns: 2, rows: 3 };
        let grid = generate_grid(dims, SIZE, 0.0, 0.0, 0.0);
        let expected: Vec<Panel> = [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (3.0, 0.0), (3.0, 1.0), (3.0, 2.0)]
            .into_iter()
            .map(|(x, y)| Panel::new(x, y))
            .collect();
        assert_eq!(grid, expected);
    }

    #[test]
    fn indentation_wraps_within_panel_width() {
        let dims = GridDimensions { columns: 1, rows: 5 };
        let grid = generate_grid(dims, SIZE, 1.0, 0.0, 0.0);
        let xs: Vec<f64> = grid.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn offsets_shift_every_panel() {
        let dims = GridDimensions { columns: 2, rows: 2 };
        let grid = generate_grid(dims, SIZE, 0.0, -3.0, 0.5);
        assert_eq!(grid[0], Panel::new(-3.0, 0.5));
        assert_eq!(grid[3], Panel::new(0.0, 1.5));
    }

    #[test]
    fn covering_adds_a_margin_cell() {
        let bounds = Bounds {
            min_x: 1.0,
            min_y: 1.0,
            max_x: 10.0,
            max_y: 2.5,
        };
        let dims = GridDimensions::covering(&bounds, SIZE);
        assert_eq!(dims, GridDimensions { columns: 5, rows: 4 });
    }
}
