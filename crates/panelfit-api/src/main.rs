use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use panelfit_core::{SolveRequest, SolveResult, Solver, SolverError};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Panel Fit API");

    let addr = std::env::var("PANELFIT_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://{}/api/health", addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/solve", post(solve))
        .route("/api/generate/svg", post(generate_svg))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "panelfit-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Runs a full search. The sweep is CPU bound, so it runs on the blocking pool.
async fn solve(Json(request): Json<SolveRequest>) -> Result<Json<SolveResult>, AppError> {
    info!(
        "Received search request: {} vertices, panel {} x {}, {}° steps",
        request.polygon.len(),
        request.panel_size.width,
        request.panel_size.height,
        request.angle_resolution
    );

    let solver = Solver::new(request)?;
    let result = tokio::task::spawn_blocking(move || solver.solve())
        .await
        .map_err(anyhow::Error::from)??;

    info!(
        "Search complete: {} panels after {} configurations",
        result.max_panel_count, result.stats.configurations_evaluated
    );

    Ok(Json(result))
}

/// Generate SVG visualization
async fn generate_svg(Json(result): Json<SolveResult>) -> Result<Response, AppError> {
    info!("Generating SVG for a {} panel layout", result.max_panel_count);

    let svg = generate_svg_content(&result)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Draws the polygon, the grid and the contained panels at a fixed scale.
fn generate_svg_content(result: &SolveResult) -> Result<String, AppError> {
    use std::fmt::Write;

    let layout = result
        .layout
        .as_ref()
        .ok_or_else(|| AppError::bad_request("Result has no layout to render"))?;
    let bounds = layout
        .polygon
        .bounds()
        .ok_or_else(|| AppError::bad_request("Result polygon is empty"))?;

    let margin = 20.0;
    let scale = 40.0;
    let size = result.panel_size;

    // Grid panels may hang over the polygon by up to one panel on each side
    let min_x = bounds.min_x.min(0.0) - size.width;
    let min_y = bounds.min_y.min(0.0) - size.height;
    let max_x = layout
        .grid
        .iter()
        .map(|p| p.x + size.width)
        .fold(bounds.max_x, f64::max);
    let max_y = layout
        .grid
        .iter()
        .map(|p| p.y + size.height)
        .fold(bounds.max_y, f64::max);

    let svg_width = (max_x - min_x) * scale + 2.0 * margin;
    let svg_height = (max_y - min_y) * scale + 2.0 * margin;
    let tx = |x: f64| margin + (x - min_x) * scale;
    let ty = |y: f64| svg_height - margin - (y - min_y) * scale;

    let mut svg = String::new();
    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    for (panels, style) in [
        (&layout.grid, r#"fill="none" stroke="red" stroke-width="1""#),
        (
            &layout.contained,
            r##"fill="#4CAF50" stroke="#2E7D32" stroke-width="1" opacity="0.8""##,
        ),
    ] {
        for p in panels {
            writeln!(
                &mut svg,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
                tx(p.x),
                ty(p.y + size.height),
                size.width * scale,
                size.height * scale,
                style
            )?;
        }
    }

    let points: Vec<String> = layout
        .polygon
        .vertices
        .iter()
        .map(|p| format!("{},{}", tx(p.x), ty(p.y)))
        .collect();
    writeln!(
        &mut svg,
        r#"  <polygon points="{}" fill="none" stroke="blue" stroke-width="2"/>"#,
        points.join(" ")
    )?;

    // Summary
    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">Panels: {}</text>"##,
        margin,
        margin - 5.0,
        result.max_panel_count
    )?;

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

/// Application error type
struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn bad_request(message: &str) -> Self {
        AppError {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(message.to_string()),
        }
    }
}

impl From<SolverError> for AppError {
    fn from(err: SolverError) -> Self {
        AppError {
            status: StatusCode::BAD_REQUEST,
            error: err.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err,
        }
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        anyhow::Error::from(err).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.error);

        (
            self.status,
            Json(json!({
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelfit_core::{solve as run_search, PanelSize, Polygon};

    fn rectangle_result() -> SolveResult {
        let rect = Polygon::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        run_search(rect, PanelSize::new(1.0, 1.0), 90).unwrap()
    }

    #[test]
    fn test_svg_contains_layout() {
        let result = rectangle_result();
        let svg = generate_svg_content(&result).ok().unwrap();

        assert!(svg.contains("<polygon"));
        assert_eq!(svg.matches("#4CAF50").count(), 8);
        assert!(svg.contains("Panels: 8"));
    }

    #[test]
    fn test_svg_without_layout_is_bad_request() {
        let mut result = rectangle_result();
        result.layout = None;
        let err = generate_svg_content(&result).err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_solve_endpoint_rejects_degenerate_polygon() {
        let request: SolveRequest = serde_json::from_value(json!({
            "polygon": [[0, 0], [1, 1]],
            "panel_size": { "width": 1, "height": 1 }
        }))
        .unwrap();

        let err = solve(Json(request)).await.err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
