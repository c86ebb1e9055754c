//! Concatenated trajectory table with an explicit entity column.

use mt_core::EntityId;
use mt_trajectory::Trajectory;

/// One output row: an entity's planar position at one second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub entity_id: u32,
    pub time_s:    u32,
    pub x:         f64,
    pub y:         f64,
}

impl TraceRow {
    /// Rows of a single trajectory, in time order.
    pub fn rows_of(trajectory: &Trajectory) -> impl Iterator<Item = TraceRow> + '_ {
        let entity_id = trajectory.entity.0;
        trajectory.points.iter().map(move |p| TraceRow {
            entity_id,
            time_s: p.time,
            x:      p.position.x,
            y:      p.position.y,
        })
    }
}

/// All trajectories of a batch, concatenated in entity order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceTable {
    rows: Vec<TraceRow>,
}

impl TraceTable {
    pub fn from_trajectories(trajectories: &[Trajectory]) -> Self {
        let mut table = Self {
            rows: Vec::with_capacity(trajectories.iter().map(Trajectory::len).sum()),
        };
        for t in trajectories {
            table.push(t);
        }
        table
    }

    /// Append one trajectory's rows.
    pub fn push(&mut self, trajectory: &Trajectory) {
        self.rows.extend(TraceRow::rows_of(trajectory));
    }

    #[inline]
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to `entity`.
    pub fn entity_rows(&self, entity: EntityId) -> impl Iterator<Item = &TraceRow> + '_ {
        self.rows.iter().filter(move |r| r.entity_id == entity.0)
    }
}
