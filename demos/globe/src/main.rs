//! globe: trains, boats and planes crossing a synthetic world.
//!
//! Usage: `globe [transport.json]`
//!
//! The optional JSON file overrides any subset of `TransportConfig`, e.g.
//! `{"plane": {"max_active": 20}, "orbit": {"small_count": 4}}`.  Set
//! `RUST_LOG=debug` to follow individual vehicles.

mod world;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use gt_core::{SimConfig, Tick, TransportConfig, VehicleClass};
use gt_mobility::VehiclePose;
use gt_output::{CsvWriter, OutputWriter, SimOutputObserver};
use gt_sim::{RunTotals, SimBuilder, SimObserver, TickStats};

use world::build_world;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TICK_DURATION_MS:      u32 = 16;   // ~60 frames per second
const TOTAL_TICKS:           u64 = 6_000;
const OUTPUT_INTERVAL_TICKS: u64 = 30;
/// The globe is hidden for a stretch mid-run; spawning and trails pause.
const HIDE_AT:               u64 = 2_000;
const HIDE_FOR:              u64 = 500;
const OUTPUT_DIR:            &str = "output/globe";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
    peak_active:   usize,
    blocked:       u64,
    trails:        u64,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0, peak_active: 0, blocked: 0, trails: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.summary_rows += 1;
        self.peak_active = self.peak_active.max(stats.total_active());
        self.blocked += stats.blocked as u64;
        self.trails += stats.trail_requests as u64;
        self.inner.on_tick_end(tick, stats);
    }

    fn on_snapshot(&mut self, tick: Tick, vehicles: &[VehiclePose], satellites: &[gt_orbit::SatellitePose]) {
        self.snapshot_rows += vehicles.len();
        self.inner.on_snapshot(tick, vehicles, satellites);
    }

    fn on_sim_end(&mut self, final_tick: Tick, totals: &RunTotals) {
        self.inner.on_sim_end(final_tick, totals);
    }
}

fn load_transport(path: Option<&str>) -> Result<TransportConfig> {
    let Some(path) = path else {
        return Ok(TransportConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config: TransportConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    log::info!("loaded transport overrides from {path}");
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Configuration.
    let arg = std::env::args().nth(1);
    let transport = load_transport(arg.as_deref())?;
    let config = SimConfig {
        total_ticks:           TOTAL_TICKS,
        seed:                  Some(SEED),
        tick_duration_ms:      TICK_DURATION_MS,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
    };

    // 2. Route graphs.
    let [rail, sea, air] = build_world()?;
    println!("=== globe transport demo ===");
    println!(
        "Rail: {} cities / {} edges  |  Sea: {} ports / {} edges  |  Air: {} airports / {} edges",
        rail.location_count(), rail.edge_count(),
        sea.location_count(),  sea.edge_count(),
        air.location_count(),  air.edge_count(),
    );
    println!(
        "Sim: {} ticks at {} ms, snapshot every {} ticks, seed {}",
        config.total_ticks, config.tick_duration_ms, config.output_interval_ticks, SEED
    );
    println!();

    // 3. Build sim.
    let mut sim = SimBuilder::new(config.clone(), transport)
        .graph(VehicleClass::Train, rail)
        .graph(VehicleClass::Boat, sea)
        .graph(VehicleClass::Plane, air)
        .build()?;
    sim.set_marker_on_screen(true);

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run, hiding the globe for a while.
    let t0 = Instant::now();
    sim.run_ticks(HIDE_AT, &mut obs)?;
    sim.set_globe_visible(false);
    sim.run_ticks(HIDE_FOR, &mut obs)?;
    sim.set_globe_visible(true);
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        log::error!("output error: {e}");
    }

    // 6. Summary.
    let totals = sim.totals;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  vehicles: {} created, {} removed, {} reroutes, {} blocked, peak {} active",
        totals.created, totals.removed, totals.rerouted, obs.blocked, obs.peak_active
    );
    println!("  trail requests      : {}", obs.trails);
    println!("  vehicle_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  tick_summaries.csv    : {} rows", obs.summary_rows);
    println!();

    // 7. Vehicles still on the map.
    println!("{:<8} {:<6} {:<14} {:<24} {:>8}", "Vehicle", "Class", "State", "Leg", "Progress");
    println!("{}", "-".repeat(64));
    for rt in &sim.classes {
        for v in rt.fleet.iter() {
            let leg = format!(
                "{} -> {}",
                rt.graph.name(v.origin(&rt.graph)),
                rt.graph.name(v.destination(&rt.graph)),
            );
            println!(
                "{:<8} {:<6} {:<14} {:<24} {:>7.0}%",
                v.id.0, v.class.as_str(), v.state.as_str(), leg, v.progress * 100.0
            );
        }
    }

    println!();
    println!("{} satellites in orbit", sim.orbit.len());
    Ok(())
}
