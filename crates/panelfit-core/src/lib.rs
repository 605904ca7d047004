//! Grid search for the panel placement that fits the most identical
//! rectangles inside a simple polygon.

pub mod geometry;
pub mod solver;
pub mod types;

pub use geometry::{normalize, rotate};
pub use solver::containment::{filter_contained, point_in_polygon, rectangle_contained};
pub use solver::grid::{generate_grid, GridDimensions};
pub use solver::{solve, Improvement, NoopObserver, SearchObserver, SearchSpace, Solver};
pub use types::*;
