//! The `TrajectoryWriter` trait implemented by output backends.

use mt_batch::{TraceRow, TraceTable};

use crate::{EntitySummaryRow, OutputResult};

pub trait TrajectoryWriter {
    /// Append trajectory rows.  Callers pass rows grouped by entity and in
    /// time order.
    fn write_rows(&mut self, rows: &[TraceRow]) -> OutputResult<()>;

    /// Append one entity summary row.
    fn write_summary(&mut self, row: &EntitySummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write a whole concatenated table.
    fn write_table(&mut self, table: &TraceTable) -> OutputResult<()> {
        self.write_rows(table.rows())
    }
}
