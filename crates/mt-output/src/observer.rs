//! `TraceOutputObserver<W>`: bridges `BatchObserver` to a `TrajectoryWriter`.

use mt_batch::{BatchObserver, BatchSummary, TraceRow};
use mt_route::StitchedRoute;
use mt_trajectory::Trajectory;

use crate::row::EntitySummaryRow;
use crate::writer::TrajectoryWriter;
use crate::{OutputError, OutputResult};

/// A [`BatchObserver`] that streams each finished entity to a
/// [`TrajectoryWriter`] backend.
///
/// Observer callbacks cannot fail, so the first write error is stored and
/// later writes are skipped.  Check [`take_error`](Self::take_error) after
/// `run` returns.
pub struct TraceOutputObserver<W: TrajectoryWriter> {
    writer:     W,
    rows:       Vec<TraceRow>,
    last_error: Option<OutputError>,
}

impl<W: TrajectoryWriter> TraceOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: Vec::new(), last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TrajectoryWriter> BatchObserver for TraceOutputObserver<W> {
    fn on_entity_done(&mut self, route: &StitchedRoute, trajectory: &Trajectory) {
        if self.last_error.is_some() {
            return;
        }
        // Reuse one buffer across entities.
        self.rows.clear();
        self.rows.extend(TraceRow::rows_of(trajectory));
        let result = self
            .writer
            .write_rows(&self.rows)
            .and_then(|()| self.writer.write_summary(&EntitySummaryRow::new(route, trajectory)));
        self.store_err(result);
    }

    fn on_batch_end(&mut self, _summary: &BatchSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
