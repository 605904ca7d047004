use crate::types::{Panel, PanelSize, Point, Polygon};

/// Edge tolerance relative to the polygon's largest coordinate.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Distance from an edge within which a point counts as lying on it:
/// [`BOUNDARY_EPSILON`] scaled by the largest absolute coordinate (at least 1),
/// so rotation round-off on large polygons stays absorbed.
pub fn boundary_tolerance(polygon: &Polygon) -> f64 {
    let scale = polygon
        .vertices
        .iter()
        .fold(1.0_f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
    BOUNDARY_EPSILON * scale
}

/// Boundary-inclusive point-in-polygon test.
///
/// Points on an edge (within [`boundary_tolerance`]) are inside; everything
/// else is decided by even-odd ray casting.
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    point_within(point, polygon, boundary_tolerance(polygon))
}

fn point_within(point: Point, polygon: &Polygon, tolerance: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    if polygon
        .edges()
        .any(|(a, b)| on_segment(point, a, b, tolerance))
    {
        return true;
    }

    let mut inside = false;
    for (a, b) in polygon.edges() {
        // Cast a ray towards +x and flip on every edge it crosses
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

fn on_segment(p: Point, a: Point, b: Point, tolerance: f64) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y) <= tolerance;
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx).hypot(p.y - cy) <= tolerance
}

/// True when all four corners of the panel lie inside or on the polygon.
pub fn rectangle_contained(corner: Panel, size: PanelSize, polygon: &Polygon) -> bool {
    rectangle_within(corner, size, polygon, boundary_tolerance(polygon))
}

fn rectangle_within(corner: Panel, size: PanelSize, polygon: &Polygon, tolerance: f64) -> bool {
    corner
        .corners(size)
        .into_iter()
        .all(|p| point_within(p, polygon, tolerance))
}

/// Keeps the panels fully inside the polygon, preserving grid order.
pub fn filter_contained(grid: &[Panel], size: PanelSize, polygon: &Polygon) -> Vec<Panel> {
    let tolerance = boundary_tolerance(polygon);
    grid.iter()
        .copied()
        .filter(|&panel| rectangle_within(panel, size, polygon, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::grid::{generate_grid, GridDimensions};
    use proptest::prelude::*;

    fn square() -> Polygon {
        Polygon::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
    }

    /// Concave "L" shape, notch in the top right quadrant
    fn ell() -> Polygon {
        Polygon::from(vec![
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ])
    }

    #[test]
    fn interior_and_exterior_points() {
        assert!(point_in_polygon(Point::new(2.0, 2.0), &square()));
        assert!(!point_in_polygon(Point::new(5.0, 2.0), &square()));
        assert!(!point_in_polygon(Point::new(-0.1, 2.0), &square()));
    }

    #[test]
    fn boundary_points_are_inside() {
        let sq = square();
        assert!(point_in_polygon(Point::new(0.0, 0.0), &sq));
        assert!(point_in_polygon(Point::new(4.0, 4.0), &sq));
        assert!(point_in_polygon(Point::new(4.0, 1.5), &sq));
        assert!(point_in_polygon(Point::new(2.0, 4.0), &sq));
    }

    #[test]
    fn concave_notch_is_outside() {
        assert!(!point_in_polygon(Point::new(3.0, 3.0), &ell()));
        assert!(point_in_polygon(Point::new(1.0, 3.0), &ell()));
        assert!(point_in_polygon(Point::new(3.0, 1.0), &ell()));
    }

    #[test]
    fn too_few_vertices_contain_nothing() {
        let segment = Polygon::from(vec![(0.0, 0.0), (4.0, 4.0)]);
        assert!(!point_in_polygon(Point::new(2.0, 2.0), &segment));
    }

    #[test]
    fn rectangle_needs_every_corner_inside() {
        let size = PanelSize::new(2.0, 2.0);
        assert!(rectangle_contained(Panel::new(0.0, 0.0), size, &ell()));
        assert!(rectangle_contained(Panel::new(2.0, 0.0), size, &ell()));
        // Three corners inside, the top right one sits in the notch
        assert!(!rectangle_contained(Panel::new(1.0, 1.0), size, &ell()));
    }

    #[test]
    fn filter_keeps_grid_order() {
        let dims = GridDimensions { columns: 3, rows: 3 };
        let size = PanelSize::new(2.0, 2.0);
        let grid = generate_grid(dims, size, 0.0, 0.0, 0.0);
        let inside = filter_contained(&grid, size, &ell());
        assert_eq!(
            inside,
            vec![Panel::new(0.0, 0.0), Panel::new(0.0, 2.0), Panel::new(2.0, 0.0)]
        );
    }

    #[test]
    fn large_rotated_tiling_keeps_edge_panels() {
        let rect = Polygon::from(vec![(0.0, 0.0), (4e8, 0.0), (4e8, 2e8), (0.0, 2e8)]);
        let size = PanelSize::new(1e8, 1e8);

        for angle in [std::f64::consts::FRAC_PI_2, std::f64::consts::PI] {
            let rotated = crate::geometry::normalize(&rect, angle);
            let dims = GridDimensions::covering(&rotated.bounds().unwrap(), size);
            // Normalized polygons start at 1, so shift the lattice onto them
            let grid = generate_grid(dims, size, 0.0, 1.0, 1.0);
            assert_eq!(filter_contained(&grid, size, &rotated).len(), 8);
        }
    }

    #[test]
    fn tolerance_grows_with_coordinates() {
        assert_eq!(boundary_tolerance(&square()), 4.0 * BOUNDARY_EPSILON);
        let tiny = Polygon::from(vec![(0.0, 0.0), (0.1, 0.0), (0.0, 0.1)]);
        assert_eq!(boundary_tolerance(&tiny), BOUNDARY_EPSILON);
    }

    proptest! {
        #[test]
        fn filtered_panels_are_a_contained_subsequence(
            radius in 2.0f64..20.0,
            sides in 3usize..10,
            width in 0.5f64..4.0,
            height in 0.5f64..4.0,
            indentation in 0.0f64..4.0,
        ) {
            // Regular polygon centred away from the origin
            let polygon = Polygon::new(
                (0..sides)
                    .map(|k| {
                        let t = std::f64::consts::TAU * k as f64 / sides as f64;
                        Point::new(25.0 + radius * t.cos(), 25.0 + radius * t.sin())
                    })
                    .collect(),
            );
            let size = PanelSize::new(width, height);
            let dims = GridDimensions::covering(&polygon.bounds().unwrap(), size);
            let grid = generate_grid(dims, size, indentation, 0.0, 0.0);
            let inside = filter_contained(&grid, size, &polygon);

            let mut rest = grid.iter();
            for panel in &inside {
                prop_assert!(rectangle_contained(*panel, size, &polygon));
                prop_assert!(rest.any(|g| g == panel));
            }
        }
    }
}
