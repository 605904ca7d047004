use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use panelfit_core::{Improvement, PanelSize, Polygon, SolveRequest, SolveResult, Solver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod svg;

#[derive(Parser)]
#[command(name = "panelfit")]
#[command(about = "Panel Fit - Find the rotation and grid offset that fits the most panels in a polygon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the best panel placement
    Solve {
        /// Request file (YAML or JSON); the built-in demo polygon is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render the best layout to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Override the angle step from the request (degrees)
        #[arg(short, long)]
        angle_resolution: Option<u32>,

        /// Score angles in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Generate SVG visualization from result
    Render {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            output,
            svg,
            angle_resolution,
            parallel,
        } => {
            solve_command(input, output, svg, angle_resolution, parallel)?;
        }
        Commands::Render { input, output } => {
            render_command(input, output)?;
        }
    }

    Ok(())
}

/// Polygon and panel size the tool was first written for
fn demo_request() -> SolveRequest {
    SolveRequest::new(
        Polygon::from(vec![
            (1.0, 1.0),
            (5.0, 3.0),
            (10.0, 2.0),
            (8.0, 8.0),
            (4.0, 6.0),
            (2.0, 5.0),
        ]),
        PanelSize::new(3.0, 1.0),
        15,
    )
}

fn load_request(input: &Path) -> Result<SolveRequest> {
    let content = std::fs::read_to_string(input)?;
    let is_yaml = matches!(
        input.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(path = %input.display(), yaml = is_yaml, "Loading request");
    let request = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(request)
}

fn solve_command(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    svg_path: Option<PathBuf>,
    angle_resolution: Option<u32>,
    parallel: bool,
) -> Result<()> {
    let mut request = match &input {
        Some(path) => {
            println!("{}", "🔍 Loading input...".bright_blue());
            load_request(path)?
        }
        None => {
            println!("{}", "🔍 No input given, using the demo polygon".bright_blue());
            demo_request()
        }
    };
    if let Some(resolution) = angle_resolution {
        request.angle_resolution = resolution;
    }
    request.parallel |= parallel;

    println!(
        "  {} polygon vertices",
        request.polygon.len().to_string().bright_white().bold()
    );
    println!(
        "  Panel size {} x {}",
        request.panel_size.width.to_string().bright_white(),
        request.panel_size.height.to_string().bright_white()
    );
    println!();

    let solver = Solver::new(request)?;
    println!(
        "{} ({} configurations)",
        "🚀 Searching...".bright_blue(),
        solver.search_space().len()
    );

    let mut report = |imp: &Improvement| {
        let c = imp.configuration;
        println!(
            "  {} panels at angle {}°, indentation {}, offset ({}, {})",
            imp.panel_count.to_string().bright_white().bold(),
            c.angle,
            c.indentation,
            c.offset_x,
            c.offset_y
        );
    };
    let result = solver.solve_with(&mut report)?;

    println!();
    println!("{}", "✅ Search complete!".bright_green().bold());
    println!();
    print_summary(&result);
    println!();

    let json = serde_json::to_string_pretty(&result)?;
    info!(
        panels = result.max_panel_count,
        configurations = result.stats.configurations_evaluated,
        "Writing result"
    );
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    if let Some(svg_path) = svg_path {
        std::fs::write(&svg_path, svg::render(&result)?)?;
        println!(
            "🎨 Saved SVG to {}",
            svg_path.display().to_string().bright_white()
        );
    }

    Ok(())
}

fn print_summary(result: &SolveResult) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    match result.best {
        Some(best) => {
            println!(
                "  Maximal number of panels: {}",
                result.max_panel_count.to_string().bright_white().bold()
            );
            println!("  Angle: {}°", best.angle);
            println!("  Indentation: {}", best.indentation);
            println!("  Offset: ({}, {})", best.offset_x, best.offset_y);
        }
        None => {
            println!("  {}", "No panel fits inside the polygon".bright_red());
        }
    }
    println!(
        "  Evaluated {} configurations over {} angles",
        result.stats.configurations_evaluated, result.stats.angles_evaluated
    );
}

fn render_command(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading result...".bright_blue());

    let content = std::fs::read_to_string(&input)?;
    let result: SolveResult = serde_json::from_str(&content)?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = svg::render(&result)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}
