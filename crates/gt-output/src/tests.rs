//! Integration tests for gt-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{TickSummaryRow, VehicleSnapshotRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(vehicle_id: u32, tick: u64) -> VehicleSnapshotRow {
        VehicleSnapshotRow {
            tick,
            vehicle_id,
            class:          "train",
            state:          "en_route",
            position:       Some([100.0, 0.5, -2.0]),
            rotation:       Some([0.0, 0.0, 0.0, 1.0]),
            wagons_visible: 3,
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            elapsed_ms:     tick * 16,
            created:        2,
            removed:        1,
            rerouted:       0,
            blocked:        1,
            trail_requests: 4,
            active_trains:  3,
            active_boats:   1,
            active_planes:  0,
            waiting:        1,
            held_segments:  3,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("vehicle_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, crate::csv::SNAPSHOT_HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, crate::csv::SUMMARY_HEADER);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 3);
        assert_eq!(&read_rows[0][0], "5");        // tick
        assert_eq!(&read_rows[0][1], "0");        // vehicle_id
        assert_eq!(&read_rows[0][2], "train");
        assert_eq!(&read_rows[0][3], "en_route");
        assert_eq!(&read_rows[0][4], "100");      // x
        assert_eq!(&read_rows[0][10], "1");       // qw
        assert_eq!(&read_rows[0][11], "3");       // wagons_visible
        assert_eq!(&read_rows[2][1], "2");
    }

    #[test]
    fn csv_hidden_body_leaves_pose_cells_empty() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let hidden = VehicleSnapshotRow { position: None, rotation: None, wagons_visible: 0, ..snap_row(7, 1) };
        w.write_snapshots(&[hidden]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 12);
        assert_eq!(&row[1], "7");
        for i in 4..11 {
            assert_eq!(&row[i], "", "pose cell {i} should be empty");
        }
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "3");    // tick
        assert_eq!(&read_rows[0][1], "48");   // 3 * 16 ms
        assert_eq!(&read_rows[0][5], "1");    // blocked
        assert_eq!(&read_rows[0][6], "4");    // trail_requests
        assert_eq!(&read_rows[0][11], "3");   // held_segments
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    #[test]
    fn csv_missing_directory_is_io_error() {
        let dir = tmp();
        let missing = dir.path().join("does").join("not").join("exist");
        assert!(CsvWriter::new(&missing).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use gt_core::{GeoPoint, SimConfig, VehicleClass};
    use gt_sim::SimBuilder;
    use gt_spatial::{build_graph, ArcCurveProvider, Itinerary, Location, LocationKind, RouteGraph};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn sea() -> RouteGraph {
        let locations = [
            Location::new("Lisbon", GeoPoint::new(38.7, -9.1), LocationKind::Port),
            Location::new("Dakar", GeoPoint::new(14.7, -17.4), LocationKind::Port),
        ];
        build_graph(&locations, &[("Lisbon", "Dakar")], &ArcCurveProvider::new(100.0, 0.5, 2.0))
            .expect("valid sea graph")
    }

    fn config() -> SimConfig {
        SimConfig {
            total_ticks:           6,
            seed:                  Some(1),
            tick_duration_ms:      16,
            output_interval_ticks: 2,
        }
    }

    #[test]
    fn integration_csv() {
        let config = config();
        let graph = sea();
        let from = graph.location_by_name("Lisbon").unwrap();
        let to = graph.location_by_name("Dakar").unwrap();
        let leg = graph.find_edge(from, to).unwrap();

        let mut sim = SimBuilder::new(config.clone(), Default::default())
            .graph(VehicleClass::Boat, graph)
            .spawners_running(false)
            .satellites(false)
            .build()
            .unwrap();
        sim.launch(VehicleClass::Boat, Itinerary::single(leg)).unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 2: snapshots at ticks 0, 2, 4 with one slow boat each.
        let mut rdr = csv::Reader::from_path(dir.path().join("vehicle_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3, "expected 3 snapshot rows, got {}", rows.len());
        let ticks: Vec<&str> = rows.iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(ticks, ["0", "2", "4"]);
        assert!(rows.iter().all(|r| &r[2] == "boat"));
        assert!(rows.iter().all(|r| !r[4].is_empty()), "boat body should be visible");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][2], "1", "launch is reported on the first tick");
        assert_eq!(&rows[5][1], "80");
        assert!(rows.iter().all(|r| &r[8] == "1"), "one active boat throughout");
        assert!(rows.iter().all(|r| &r[11] == "1"), "boat holds its segment");
    }
}
