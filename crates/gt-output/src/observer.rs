//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use gt_core::{SimConfig, Tick, VehicleClass};
use gt_mobility::VehiclePose;
use gt_orbit::SatellitePose;
use gt_sim::{RunTotals, SimObserver, TickStats};

use crate::row::{TickSummaryRow, VehicleSnapshotRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes vehicle snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    tick_duration_ms: u32,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for elapsed
    /// time conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_duration_ms: config.tick_duration_ms,
            last_error:       None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn elapsed_ms(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_duration_ms as u64
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        let active = |c: VehicleClass| stats.active[c.index()] as u64;
        let row = TickSummaryRow {
            tick:           tick.0,
            elapsed_ms:     self.elapsed_ms(tick),
            created:        stats.created as u64,
            removed:        stats.removed as u64,
            rerouted:       stats.rerouted as u64,
            blocked:        stats.blocked as u64,
            trail_requests: stats.trail_requests as u64,
            active_trains:  active(VehicleClass::Train),
            active_boats:   active(VehicleClass::Boat),
            active_planes:  active(VehicleClass::Plane),
            waiting:        stats.waiting as u64,
            held_segments:  stats.held_segments as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, vehicles: &[VehiclePose], _satellites: &[SatellitePose]) {
        let rows: Vec<VehicleSnapshotRow> = vehicles
            .iter()
            .map(|pose| VehicleSnapshotRow::from_pose(tick.0, pose))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _totals: &RunTotals) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
