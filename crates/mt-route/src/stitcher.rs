//! Duration-driven route stitching.
//!
//! ```text
//!            ┌──────────── no path / trivial ────────────┐
//!            ▼                                           │
//!          Init ──── path ───► Extending ── t ≥ T ──► Done
//!                                 │  ▲
//!                         no path │  │ path
//!                                 ▼  │
//!                              Recovering ── nothing left to drop ──► error
//! ```
//!
//! `Recovering` drops the tail node and draws a fresh endpoint with the
//! same heading from the new tail.  Every failed path query counts against
//! `max_path_attempts`.

use log::{debug, warn};

use mt_core::{EntityRng, NodeId, TraceConfig};
use mt_spatial::{Route, Router, StreetGraph};

use crate::sampler::{EndpointSampler, Heading, SamplingPolicy};
use crate::{RouteError, RouteResult};

/// State of the per-entity stitching machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StitchState {
    Init,
    Extending,
    Recovering,
    Done,
}

/// A finished entity route plus stitching diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedRoute {
    pub route: Route,

    /// Index in `route.nodes` where the final appended segment starts.
    /// The prefix `nodes[..=last_segment_start]` is strictly shorter than
    /// the requested duration.
    pub last_segment_start: usize,

    /// Shortest-path segments that make up the route (after backtracking).
    pub segments: u32,

    /// Nodes dropped while recovering from dead ends.
    pub backtracks: u32,
}

/// Outcome of one shortest-path query during stitching.
enum Segment {
    Found(Route),
    /// `from == to`; nothing to append.
    Trivial,
    NoPath,
}

/// Outcome of one attempt to grow the route from its tail.
enum Extension {
    /// A segment was appended starting at this node index.
    Appended(usize),
    Trivial,
    NoPath,
}

/// Per-entity counters carried across states.
struct Tally {
    heading:            Heading,
    failures:           u32,
    segments:           u32,
    backtracks:         u32,
    last_segment_start: usize,
}

impl Tally {
    fn appended(&mut self, start: usize) {
        self.last_segment_start = start;
        self.segments += 1;
        self.heading = self.heading.flip();
    }
}

/// Route under construction, with cumulative travel time per node.
struct Partial {
    nodes: Vec<NodeId>,
    /// `cum_secs[i]` = travel time from `nodes[0]` to `nodes[i]`.
    cum_secs: Vec<f64>,
}

impl Partial {
    fn new() -> Self {
        Self { nodes: Vec::new(), cum_secs: Vec::new() }
    }

    fn elapsed(&self) -> f64 {
        self.cum_secs.last().copied().unwrap_or(0.0)
    }

    fn tail(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Append `path`, skipping its first node when it repeats the tail.
    fn append(&mut self, graph: &StreetGraph, path: &[NodeId]) -> RouteResult<()> {
        let skip = usize::from(self.tail().is_some() && self.tail() == path.first().copied());
        for &next in &path[skip..] {
            let t = match self.tail() {
                None => 0.0,
                Some(prev) => self.elapsed() + graph.travel_secs(graph.edge_between(prev, next)?),
            };
            self.nodes.push(next);
            self.cum_secs.push(t);
        }
        Ok(())
    }

    fn pop(&mut self) {
        self.nodes.pop();
        self.cum_secs.pop();
    }

    fn into_route(self) -> Route {
        Route { total_travel_secs: self.elapsed(), nodes: self.nodes }
    }
}

// ── RouteStitcher ─────────────────────────────────────────────────────────────

/// Builds one route per call whose travel time covers a requested duration.
///
/// Holds only shared references, so a single stitcher serves every entity
/// of a batch; per-entity state lives on the stack of [`stitch`](Self::stitch).
pub struct RouteStitcher<'g, R: Router> {
    graph:             &'g StreetGraph,
    router:            &'g R,
    sampler:           EndpointSampler<'g>,
    max_path_attempts: u32,
}

impl<'g, R: Router> RouteStitcher<'g, R> {
    pub fn new(
        graph:             &'g StreetGraph,
        router:            &'g R,
        sampler:           EndpointSampler<'g>,
        max_path_attempts: u32,
    ) -> Self {
        Self { graph, router, sampler, max_path_attempts: max_path_attempts.max(1) }
    }

    /// Build the sampler and stitcher a batch configuration describes.
    pub fn from_config(graph: &'g StreetGraph, router: &'g R, config: &TraceConfig) -> RouteResult<Self> {
        let sampler = EndpointSampler::new(
            graph,
            SamplingPolicy::from_config(config),
            config.max_sample_attempts,
        )?;
        Ok(Self::new(graph, router, sampler, config.max_path_attempts))
    }

    /// Stitch a route whose cumulative travel time is at least
    /// `duration_secs`.
    ///
    /// Stitching stops at the first segment that crosses the threshold, so
    /// dropping that segment leaves the route short of `duration_secs`.
    pub fn stitch(&self, duration_secs: u32, rng: &mut EntityRng) -> RouteResult<StitchedRoute> {
        self.run(None, duration_secs, rng)
    }

    /// Like [`stitch`](Self::stitch), but the route starts at `origin`.
    ///
    /// The first segment runs from `origin` to a destination drawn for the
    /// initial heading; under the target-biased policy that is a node near
    /// the target site.
    pub fn stitch_from(
        &self,
        origin:        NodeId,
        duration_secs: u32,
        rng:           &mut EntityRng,
    ) -> RouteResult<StitchedRoute> {
        self.graph.check_node(origin)?;
        self.run(Some(origin), duration_secs, rng)
    }

    fn run(
        &self,
        origin:        Option<NodeId>,
        duration_secs: u32,
        rng:           &mut EntityRng,
    ) -> RouteResult<StitchedRoute> {
        let required = duration_secs as f64;

        let mut state = StitchState::Init;
        let mut route = Partial::new();
        let mut tally = Tally {
            heading:            Heading::Toward,
            failures:           0,
            segments:           0,
            backtracks:         0,
            last_segment_start: 0,
        };

        loop {
            state = match state {
                StitchState::Init => {
                    let (start, end) = match origin {
                        Some(o) => (o, self.sampler.next_endpoint(o, tally.heading, rng)?),
                        None => self.sampler.initial_pair(rng)?,
                    };
                    match self.segment(start, end)? {
                        Segment::Found(path) => {
                            route.append(self.graph, &path.nodes)?;
                            tally.appended(0);
                            debug!("initial path {start} -> {end}: {:.1} s", route.elapsed());
                            StitchState::Extending
                        }
                        Segment::Trivial | Segment::NoPath => {
                            self.record_failure(&mut tally.failures)?;
                            StitchState::Init
                        }
                    }
                }

                StitchState::Extending if route.elapsed() >= required => StitchState::Done,

                StitchState::Extending => match self.try_extend(&mut route, tally.heading, rng)? {
                    Extension::Appended(start) => {
                        tally.appended(start);
                        StitchState::Extending
                    }
                    Extension::Trivial => {
                        self.record_failure(&mut tally.failures)?;
                        StitchState::Extending
                    }
                    Extension::NoPath => {
                        self.record_failure(&mut tally.failures)?;
                        warn!(
                            "no path onward from tail {:?} at {:.1} s; backtracking",
                            route.tail(),
                            route.elapsed()
                        );
                        StitchState::Recovering
                    }
                },

                StitchState::Recovering => {
                    // The origin alone can still be extended; only an empty
                    // route is exhausted.
                    if route.nodes.len() <= 1 {
                        return Err(RouteError::RouteTooShortToBacktrack {
                            backtracks: tally.backtracks,
                        });
                    }
                    route.pop();
                    tally.backtracks += 1;
                    debug!("backtracked to {:?} ({:.1} s)", route.tail(), route.elapsed());

                    match self.try_extend(&mut route, tally.heading, rng)? {
                        Extension::Appended(start) => {
                            tally.appended(start);
                            StitchState::Extending
                        }
                        // The new tail is not known to be a dead end; draw
                        // again from it.
                        Extension::Trivial => {
                            self.record_failure(&mut tally.failures)?;
                            StitchState::Extending
                        }
                        Extension::NoPath => {
                            self.record_failure(&mut tally.failures)?;
                            StitchState::Recovering
                        }
                    }
                }

                StitchState::Done => {
                    debug!(
                        "stitched {} nodes in {} segments: {:.1} s for {required} s required, {} backtracks",
                        route.nodes.len(),
                        tally.segments,
                        route.elapsed(),
                        tally.backtracks
                    );
                    return Ok(StitchedRoute {
                        route:              route.into_route(),
                        last_segment_start: tally.last_segment_start,
                        segments:           tally.segments,
                        backtracks:         tally.backtracks,
                    });
                }
            };
        }
    }

    /// Draw the next endpoint for the current heading and append the path
    /// from the tail to it.
    fn try_extend(
        &self,
        route:   &mut Partial,
        heading: Heading,
        rng:     &mut EntityRng,
    ) -> RouteResult<Extension> {
        let Some(tail) = route.tail() else {
            return Ok(Extension::NoPath);
        };
        let end = self.sampler.next_endpoint(tail, heading, rng)?;
        Ok(match self.segment(tail, end)? {
            Segment::Found(path) => {
                let start = route.nodes.len() - 1;
                route.append(self.graph, &path.nodes)?;
                Extension::Appended(start)
            }
            Segment::Trivial => Extension::Trivial,
            Segment::NoPath => Extension::NoPath,
        })
    }

    /// One shortest-path query, classified.
    fn segment(&self, from: NodeId, to: NodeId) -> RouteResult<Segment> {
        match self.router.route(self.graph, from, to) {
            Ok(path) if path.is_trivial() => Ok(Segment::Trivial),
            Ok(path) => Ok(Segment::Found(path)),
            Err(e) if e.is_no_route() => Ok(Segment::NoPath),
            Err(e) => Err(e.into()),
        }
    }

    fn record_failure(&self, failures: &mut u32) -> RouteResult<()> {
        *failures += 1;
        if *failures >= self.max_path_attempts {
            return Err(RouteError::RetriesExhausted { attempts: *failures });
        }
        Ok(())
    }
}
