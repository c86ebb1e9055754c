//! Dense per-second entity trajectories.

use mt_core::{EntityId, PlanarPoint};

/// One sample: position at a whole second since the route start.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPoint {
    pub time:     u32,
    pub position: PlanarPoint,
}

impl PathPoint {
    #[inline]
    pub fn new(time: u32, position: PlanarPoint) -> Self {
        Self { time, position }
    }
}

/// A route rendered on the integer-second grid `0..=duration`.
///
/// `points[i].time == i` for every sample, so indexing by second is direct.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    pub entity: EntityId,
    pub points: Vec<PathPoint>,
}

impl Trajectory {
    /// Number of samples (`duration + 1` for a resampled route).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last sampled second, or `None` for an empty trajectory.
    pub fn duration_secs(&self) -> Option<u32> {
        self.points.last().map(|p| p.time)
    }

    #[inline]
    pub fn first_position(&self) -> Option<PlanarPoint> {
        self.points.first().map(|p| p.position)
    }

    #[inline]
    pub fn last_position(&self) -> Option<PlanarPoint> {
        self.points.last().map(|p| p.position)
    }

    /// Position at second `t`, or `None` past the end of the grid.
    #[inline]
    pub fn position_at(&self, t: u32) -> Option<PlanarPoint> {
        self.points.get(t as usize).map(|p| p.position)
    }

    /// Total straight-line distance between consecutive samples, in metres.
    pub fn sampled_distance_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].position.distance_m(w[1].position))
            .sum()
    }
}
