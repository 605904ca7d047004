use crate::types::{Point, Polygon};

/// Distance kept between the axes and a normalized polygon.
pub const NORMALIZE_MARGIN: f64 = 1.0;

/// Rotates a point about the origin. `angle` is in radians.
pub fn rotate(point: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}

/// Rotates every vertex by `angle` (radians), then shifts the result so its
/// lowest x and y both sit at [`NORMALIZE_MARGIN`].
///
/// Returns a new polygon; vertex order is preserved. An empty polygon is
/// returned unchanged.
pub fn normalize(polygon: &Polygon, angle: f64) -> Polygon {
    let rotated = Polygon::new(polygon.vertices.iter().map(|&p| rotate(p, angle)).collect());
    let Some(bounds) = rotated.bounds() else {
        return rotated;
    };

    let shift_x = bounds.min_x - NORMALIZE_MARGIN;
    let shift_y = bounds.min_y - NORMALIZE_MARGIN;
    Polygon::new(
        rotated
            .vertices
            .into_iter()
            .map(|p| Point::new(p.x - shift_x, p.y - shift_y))
            .collect(),
    )
}
