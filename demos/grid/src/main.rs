//! Synthesize per-second entity trajectories on a synthetic street grid.
//!
//! Builds a square street grid, stitches one route per entity long enough
//! to cover the requested duration, resamples every route onto a shared
//! one-second grid, and writes `trajectories.csv` (`entity_id,time_s,x,y`)
//! plus `entity_summaries.csv` to the output directory.
//!
//! Settings come from an optional TOML file (see `grid.toml`) and are then
//! overridden by command-line flags.  Log verbosity follows `RUST_LOG`
//! (default `info`).

// mimalloc for the many short-lived per-entity buffers across worker threads.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod network;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mt_batch::TraceBatchBuilder;
use mt_core::{PlanarPoint, TraceConfig};
use mt_output::{CsvWriter, TraceOutputObserver};
use mt_spatial::DijkstraRouter;

use network::{GridSpec, build_grid};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_OUTPUT_DIR: &str = "output/grid";
const DEFAULT_LOG_FILTER: &str = "info";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Contents of the TOML configuration file.  Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoFile {
    output_dir: Option<PathBuf>,
    grid:       GridSpec,
    trace:      TraceConfig,
}

#[derive(Debug, Parser)]
#[command(name = "grid", about = "Synthesize entity trajectories on a street grid")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (created if missing).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Number of entities.
    #[arg(short = 'n', long)]
    entities: Option<u32>,

    /// Trajectory length in seconds.
    #[arg(short, long)]
    duration: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Minimum straight-line distance between route endpoints, metres.
    #[arg(long)]
    min_dist: Option<f64>,

    /// Target site as `x,y` in grid metres; enables target-biased routes.
    #[arg(long, value_parser = parse_point)]
    target: Option<PlanarPoint>,

    /// Ignore any configured target and sample endpoints uniformly.
    #[arg(long, conflicts_with = "target")]
    no_target: bool,

    /// Draw far endpoints anywhere instead of on the grid boundary.
    #[arg(long)]
    no_boundary: bool,

    /// Worker threads (default: all logical cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Intersections per grid side.
    #[arg(long)]
    grid_size: Option<usize>,
}

fn parse_point(s: &str) -> Result<PlanarPoint, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let coord = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("bad coordinate `{v}`: {e}"));
    Ok(PlanarPoint::new(coord(x)?, coord(y)?))
}

fn load_file(path: &Path) -> Result<DemoFile> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => load_file(path)?,
        None => DemoFile::default(),
    };

    let mut grid = file.grid;
    if let Some(size) = cli.grid_size {
        grid.size = size;
    }

    let mut builder = TraceBatchBuilder::new(file.trace);
    if let Some(n) = cli.entities {
        builder = builder.entity_count(n);
    }
    if let Some(d) = cli.duration {
        builder = builder.duration_secs(d);
    }
    if let Some(s) = cli.seed {
        builder = builder.seed(s);
    }
    if let Some(m) = cli.min_dist {
        builder = builder.min_travel_dist_m(m);
    }
    if cli.target.is_some() {
        builder = builder.target(cli.target);
    }
    if cli.no_target {
        builder = builder.target(None);
    }
    if cli.no_boundary {
        builder = builder.boundary_sampling(false);
    }
    if cli.threads.is_some() {
        builder = builder.num_threads(cli.threads);
    }
    let batch = builder.build().context("invalid trace configuration")?;

    let out_dir = cli
        .out
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    // ── Network ───────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let graph = build_grid(&grid)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "built {0}×{0} grid",
        grid.size
    );
    if let (Some(target), Some(bbox)) = (batch.config().target, graph.bbox()) {
        if !bbox.contains(target) {
            warn!(%target, "target lies outside the grid; near-target sampling may fail");
        }
    }

    // ── Trace ─────────────────────────────────────────────────────────────
    let t1 = Instant::now();
    let mut obs = TraceOutputObserver::new(CsvWriter::new(&out_dir)?);
    let trajectories = batch.run(&graph, &DijkstraRouter, &mut obs)?;
    if let Some(e) = obs.take_error() {
        bail!("writing output failed: {e}");
    }

    let rows = trajectories.iter().map(|t| t.len()).sum::<usize>();
    let mean_km = trajectories.iter().map(|t| t.sampled_distance_m()).sum::<f64>()
        / trajectories.len().max(1) as f64
        / 1_000.0;
    info!(
        entities = trajectories.len(),
        rows,
        mean_km,
        elapsed_ms = t1.elapsed().as_millis() as u64,
        "wrote trajectories to {}",
        out_dir.display()
    );
    Ok(())
}
