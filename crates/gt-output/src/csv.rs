//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `vehicle_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, TickSummaryRow, VehicleSnapshotRow};

pub const SNAPSHOT_HEADER: [&str; 12] = [
    "tick", "vehicle_id", "class", "state",
    "x", "y", "z", "qx", "qy", "qz", "qw",
    "wagons_visible",
];

pub const SUMMARY_HEADER: [&str; 12] = [
    "tick", "elapsed_ms", "created", "removed", "rerouted", "blocked", "trail_requests",
    "active_trains", "active_boats", "active_planes", "waiting", "held_segments",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("vehicle_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

/// Empty cells for hidden bodies.
fn cells<const N: usize>(values: Option<[f32; N]>) -> [String; N] {
    match values {
        Some(v) => v.map(|x| x.to_string()),
        None    => std::array::from_fn(|_| String::new()),
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[VehicleSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            let [x, y, z] = cells(row.position);
            let [qx, qy, qz, qw] = cells(row.rotation);
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.vehicle_id.to_string(),
                row.class.to_owned(),
                row.state.to_owned(),
                x, y, z, qx, qy, qz, qw,
                row.wagons_visible.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_ms.to_string(),
            row.created.to_string(),
            row.removed.to_string(),
            row.rerouted.to_string(),
            row.blocked.to_string(),
            row.trail_requests.to_string(),
            row.active_trains.to_string(),
            row.active_boats.to_string(),
            row.active_planes.to_string(),
            row.waiting.to_string(),
            row.held_segments.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
