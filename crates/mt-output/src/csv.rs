//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `trajectories.csv`: `entity_id,time_s,x,y`, one row per entity-second
//! - `entity_summaries.csv`: one row per entity

use std::fs::File;
use std::path::Path;

use csv::Writer;
use mt_batch::TraceRow;

use crate::writer::TrajectoryWriter;
use crate::{EntitySummaryRow, OutputError, OutputResult};

pub const TRAJECTORY_FILE: &str = "trajectories.csv";
pub const SUMMARY_FILE: &str = "entity_summaries.csv";

/// Writes trajectory output to two CSV files.
pub struct CsvWriter {
    trajectories: Writer<File>,
    summaries:    Writer<File>,
    finished:     bool,
}

impl CsvWriter {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.  The directory must exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trajectories = Writer::from_path(dir.join(TRAJECTORY_FILE))?;
        trajectories.write_record(["entity_id", "time_s", "x", "y"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record([
            "entity_id",
            "route_nodes",
            "segments",
            "backtracks",
            "travel_secs",
            "sampled_m",
        ])?;

        Ok(Self { trajectories, summaries, finished: false })
    }

    fn check_open(&self) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }
        Ok(())
    }
}

impl TrajectoryWriter for CsvWriter {
    fn write_rows(&mut self, rows: &[TraceRow]) -> OutputResult<()> {
        self.check_open()?;
        for row in rows {
            self.trajectories.write_record(&[
                row.entity_id.to_string(),
                row.time_s.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &EntitySummaryRow) -> OutputResult<()> {
        self.check_open()?;
        self.summaries.write_record(&[
            row.entity_id.to_string(),
            row.route_nodes.to_string(),
            row.segments.to_string(),
            row.backtracks.to_string(),
            format!("{:.3}", row.travel_secs),
            format!("{:.3}", row.sampled_m),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trajectories.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
