//! Quadwire CLI - wireframe mesh generation tool.
//!
//! Usage: quadwire <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `quadwire --help` for available commands. Set `RUST_LOG=debug` for
//! per-stage diagnostics.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use quadwire::io;
use quadwire::mesh::{AttributeSelection, MeshBuffers};
use quadwire::wireframe::{
    build_adjacency, compact_triangle_wireframe_with_progress, quad_wireframe_with_progress,
    triangle_wireframe_with_progress, PairingCoefficients, Progress, TriangleSet, WireframeLimits,
    WireframeMesh, WireframeOptions,
};

#[derive(Parser)]
#[command(name = "quadwire")]
#[command(author, version, about = "Wireframe mesh generation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Triangle wireframe with exclusive vertices
    Triangle {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Triangle wireframe keeping consistent vertex sharing
    Compact {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Quad wireframe hiding paired triangle diagonals
    Quad {
        #[command(flatten)]
        common: CommonArgs,

        /// Weight of the normal alignment term
        #[arg(long, default_value = "1.0")]
        normal: f64,

        /// Weight of the corner angle term
        #[arg(long, default_value = "1.0")]
        angle: f64,

        /// Weight of the area ratio term (the parallel term needs > 0.5)
        #[arg(long, default_value = "1.0")]
        area: f64,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Input mesh file
    input: PathBuf,

    /// Keep only positions and the baked UV channel
    #[arg(long)]
    positions_only: bool,

    /// Lift the 16-bit index buffer size ceilings
    #[arg(long)]
    unbounded: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

impl CommonArgs {
    fn options(&self) -> WireframeOptions {
        let attributes = if self.positions_only {
            AttributeSelection::none()
        } else {
            AttributeSelection::all()
        };
        let limits = if self.unbounded {
            WireframeLimits::unbounded()
        } else {
            WireframeLimits::default()
        };
        WireframeOptions::default()
            .with_attributes(attributes)
            .with_limits(limits)
            .with_parallel(!self.sequential)
    }

    fn mode(&self) -> &'static str {
        if self.sequential {
            "sequential"
        } else {
            "parallel"
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Triangle { common } => {
            let mesh = load(&common.input)?;
            println!("Generating triangle wireframe ({})...", common.mode());
            let progress = create_progress();
            let start = Instant::now();
            let result = triangle_wireframe_with_progress(&mesh, &common.options(), &progress)?;
            print_result(&result, start);
        }

        Commands::Compact { common } => {
            let mesh = load(&common.input)?;
            println!("Generating compact triangle wireframe ({})...", common.mode());
            let options = common.options();
            let progress = create_progress();
            let start = Instant::now();
            let result = compact_triangle_wireframe_with_progress(&mesh, &options, &progress)?;
            print_result(&result, start);
        }

        Commands::Quad {
            common,
            normal,
            angle,
            area,
        } => {
            let mesh = load(&common.input)?;
            println!(
                "Generating quad wireframe (normal={}, angle={}, area={}, {})...",
                normal,
                angle,
                area,
                common.mode()
            );
            let options = common
                .options()
                .with_coefficients(PairingCoefficients::new(normal, angle, area));
            let progress = create_progress();
            let start = Instant::now();
            let result = quad_wireframe_with_progress(&mesh, &options, &progress)?;
            print_result(&result, start);
        }
    }

    Ok(())
}

fn load(input: &Path) -> Result<MeshBuffers, Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} triangles, {} submeshes",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.submesh_count()
    );
    Ok(mesh)
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Highest percent shown so far

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Stages have different totals; never move the bar backwards
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<32}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn print_result(result: &WireframeMesh, start: Instant) {
    let elapsed = start.elapsed();
    let stats = &result.stats;

    println!(
        "Result: {} vertices, {} triangles ({:.2?})",
        stats.output_vertices,
        result.mesh.triangle_count(),
        elapsed
    );
    if stats.matched_pairs > 0 || stats.unmatched_triangles > 0 {
        println!(
            "Quads: {} pairs, {} unmatched triangles",
            stats.matched_pairs, stats.unmatched_triangles
        );
    }
    if let Some(outcome) = stats.repair_outcome {
        println!(
            "Repair: {} rounds, ended {:?}, {} triangles dropped",
            stats.repair_rounds, outcome, stats.dropped_triangles
        );
        let exploded = stats.triangles * 3;
        if exploded > 0 {
            println!(
                "Vertex sharing: {} of {} corners ({:.1}%)",
                stats.output_vertices,
                exploded,
                100.0 * stats.output_vertices as f64 / exploded as f64
            );
        }
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    if let Some(format) = io::Format::from_path(input) {
        println!("Format: {}", format.name());
    }
    println!("Vertices: {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    println!("Submeshes: {}", mesh.submesh_count());

    let mut attributes = Vec::new();
    if !mesh.normals.is_empty() {
        attributes.push("normals".to_string());
    }
    if !mesh.tangents.is_empty() {
        attributes.push("tangents".to_string());
    }
    if !mesh.colors.is_empty() {
        attributes.push("colors".to_string());
    }
    for channel in 0..quadwire::mesh::UV_CHANNELS {
        if mesh.has_uv(channel) {
            attributes.push(format!("uv{}", channel));
        }
    }
    if !mesh.bone_weights.is_empty() {
        attributes.push(format!("skin ({} bind poses)", mesh.bind_poses.len()));
    }
    if attributes.is_empty() {
        println!("Attributes: none");
    } else {
        println!("Attributes: {}", attributes.join(", "));
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    if let Err(e) = mesh.validate() {
        println!("Invalid: {}", e);
        return Ok(());
    }

    let mut set = TriangleSet::from_mesh(&mesh);
    let adjacency = build_adjacency(&mut set);
    println!(
        "Edges: {} ({} shared, {} non-manifold)",
        adjacency.edges, adjacency.shared_edges, adjacency.non_manifold_edges
    );
    if adjacency.skipped_pairs > 0 {
        println!("Degenerate neighbor pairs: {}", adjacency.skipped_pairs);
    }

    let limits = WireframeLimits::default();
    println!(
        "Fits triangle path: {}",
        yes_no(mesh.index_count() <= limits.max_vertices)
    );
    println!(
        "Fits quad path: {}",
        yes_no(mesh.triangle_count() <= limits.max_quad_triangles)
    );

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
