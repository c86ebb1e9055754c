//! `mt-output` — trajectory output writers for mobtrace.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `trajectories.csv`, `entity_summaries.csv`     |
//!
//! Coordinates are written in the graph's planar system; reprojection is
//! left to downstream tools.  Backends implement [`TrajectoryWriter`] and
//! are driven either directly with a [`TraceTable`][mt_batch::TraceTable]
//! or by [`TraceOutputObserver`], which streams entities as a batch
//! finishes them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mt_output::{CsvWriter, TraceOutputObserver};
//!
//! let mut obs = TraceOutputObserver::new(CsvWriter::new(Path::new("./out"))?);
//! batch.run(&graph, &DijkstraRouter, &mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceOutputObserver;
pub use row::EntitySummaryRow;
pub use writer::TrajectoryWriter;
