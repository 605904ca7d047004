use anyhow::{bail, Result};
use panelfit_core::{Bounds, Panel, PanelSize, SolveResult};
use std::fmt::Write;

/// Width of the longest side of the drawing, in SVG user units
const CANVAS_SIZE: f64 = 800.0;
const MARGIN: f64 = 20.0;

/// Renders the best layout: polygon outline in blue, grid in red, contained
/// panels filled in lime.
pub fn render(result: &SolveResult) -> Result<String> {
    let Some(layout) = &result.layout else {
        bail!("Result has no layout to render (no panel fits inside the polygon)");
    };
    let Some(bounds) = drawing_bounds(result) else {
        bail!("Result layout is empty");
    };

    let extent = (bounds.max_x - bounds.min_x).max(bounds.max_y - bounds.min_y);
    let scale = CANVAS_SIZE / extent;
    let width = (bounds.max_x - bounds.min_x) * scale + 2.0 * MARGIN;
    let height = (bounds.max_y - bounds.min_y) * scale + 2.0 * MARGIN;

    // Flip y so the drawing keeps the polygon's orientation
    let tx = |x: f64| MARGIN + (x - bounds.min_x) * scale;
    let ty = |y: f64| height - MARGIN - (y - bounds.min_y) * scale;

    let mut svg = String::new();
    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.1}" height="{:.1}" viewBox="0 0 {:.1} {:.1}">"#,
        width, height, width, height
    )?;
    writeln!(&mut svg, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##)?;

    let panel_rect = |svg: &mut String, panel: &Panel, style: &str| -> std::fmt::Result {
        writeln!(
            svg,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
            tx(panel.x),
            ty(panel.y + result.panel_size.height),
            result.panel_size.width * scale,
            result.panel_size.height * scale,
            style
        )
    };

    for panel in &layout.grid {
        panel_rect(&mut svg, panel, r#"fill="none" stroke="red" stroke-width="1""#)?;
    }
    for panel in &layout.contained {
        panel_rect(&mut svg, panel, r#"fill="lime" stroke="black" stroke-width="1""#)?;
    }

    let points: Vec<String> = layout
        .polygon
        .vertices
        .iter()
        .map(|p| format!("{:.2},{:.2}", tx(p.x), ty(p.y)))
        .collect();
    writeln!(
        &mut svg,
        r#"  <polygon points="{}" fill="none" stroke="blue" stroke-width="2"/>"#,
        points.join(" ")
    )?;

    if let Some(best) = result.best {
        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="14" fill="#333">{} panels | angle {} | indentation {} | offset ({}, {})</text>"##,
            MARGIN,
            MARGIN - 5.0,
            result.max_panel_count,
            best.angle,
            best.indentation,
            best.offset_x,
            best.offset_y
        )?;
    }

    writeln!(&mut svg, "</svg>")?;
    Ok(svg)
}

/// Box around the polygon and every grid panel.
fn drawing_bounds(result: &SolveResult) -> Option<Bounds> {
    let layout = result.layout.as_ref()?;
    let PanelSize { width, height } = result.panel_size;
    let mut bounds = layout.polygon.bounds()?;
    for panel in &layout.grid {
        bounds.min_x = bounds.min_x.min(panel.x);
        bounds.min_y = bounds.min_y.min(panel.y);
        bounds.max_x = bounds.max_x.max(panel.x + width);
        bounds.max_y = bounds.max_y.max(panel.y + height);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelfit_core::{solve, Polygon};

    #[test]
    fn test_render_draws_every_panel() {
        let rect = Polygon::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        let result = solve(rect, PanelSize::new(1.0, 1.0), 90).unwrap();
        let layout = result.layout.as_ref().unwrap();

        let svg = render(&result).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"fill="lime""#).count(), 8);
        assert_eq!(
            svg.matches(r#"stroke="red""#).count(),
            layout.grid.len()
        );
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert!(svg.contains("8 panels | angle 0"));
    }

    #[test]
    fn test_render_rejects_empty_result() {
        let tiny = Polygon::from(vec![(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        let result = solve(tiny, PanelSize::new(1.0, 1.0), 90).unwrap();
        assert!(render(&result).is_err());
    }
}
