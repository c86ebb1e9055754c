//! Synthetic street grid.
//!
//! A square grid of `size × size` intersections `block_m` apart, origin at
//! (0, 0).  Every `arterial_every`-th row and column is a fast two-way
//! arterial.  The remaining east–west streets alternate one-way directions;
//! north–south streets are two-way, which keeps the graph strongly connected.

use anyhow::{Result, ensure};
use serde::Deserialize;

use mt_core::{NodeId, PlanarPoint};
use mt_spatial::{StreetGraph, StreetGraphBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub size:           usize,
    pub block_m:        f64,
    pub street_kmh:     f64,
    pub arterial_kmh:   f64,
    pub arterial_every: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            size:           21,
            block_m:        150.0,
            street_kmh:     30.0,
            arterial_kmh:   50.0,
            arterial_every: 5,
        }
    }
}

#[derive(Clone, Copy)]
enum Flow {
    TwoWay,
    Forward,
    Backward,
}

pub fn build_grid(spec: &GridSpec) -> Result<StreetGraph> {
    ensure!(spec.size >= 2, "grid size must be at least 2, got {}", spec.size);
    ensure!(spec.block_m > 0.0, "block length must be positive, got {}", spec.block_m);
    ensure!(
        spec.street_kmh > 0.0 && spec.arterial_kmh > 0.0,
        "speeds must be positive"
    );

    let n = spec.size;
    let mut b = StreetGraphBuilder::with_capacity(n * n, 4 * n * (n - 1));
    let ids: Vec<NodeId> = (0..n * n)
        .map(|i| b.add_node(PlanarPoint::new((i % n) as f64 * spec.block_m, (i / n) as f64 * spec.block_m)))
        .collect();

    let arterial = |k: usize| spec.arterial_every > 0 && k % spec.arterial_every == 0;
    let secs = |kmh: f64| spec.block_m / (kmh / 3.6);

    for row in 0..n {
        // East–west street along `row`.
        let (flow, travel) = if arterial(row) {
            (Flow::TwoWay, secs(spec.arterial_kmh))
        } else if row % 2 == 1 {
            (Flow::Forward, secs(spec.street_kmh))
        } else {
            (Flow::Backward, secs(spec.street_kmh))
        };
        for col in 0..n - 1 {
            let (w, e) = (ids[row * n + col], ids[row * n + col + 1]);
            match flow {
                Flow::TwoWay => b.add_road(w, e, spec.block_m, travel, None),
                Flow::Forward => b.add_directed_edge(w, e, spec.block_m, travel, None),
                Flow::Backward => b.add_directed_edge(e, w, spec.block_m, travel, None),
            }
        }
    }

    for col in 0..n {
        let kmh = if arterial(col) { spec.arterial_kmh } else { spec.street_kmh };
        for row in 0..n - 1 {
            b.add_road(ids[row * n + col], ids[(row + 1) * n + col], spec.block_m, secs(kmh), None);
        }
    }

    Ok(b.build()?)
}
