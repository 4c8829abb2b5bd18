//! Unit tests for gt-orbit.

#[cfg(test)]
mod helpers {
    use glam::Quat;

    use crate::{SatelliteKind, SatelliteSpec};

    pub fn spec(kind: SatelliteKind, radius: f32, speed: f32, inclination: f32) -> SatelliteSpec {
        SatelliteSpec {
            kind,
            name: kind.as_str().to_owned(),
            orbit_radius: radius,
            orbit_speed: speed,
            inclination,
            rotation_angle: 0.7,
            angle: 0.0,
            fixed_rotation: Quat::IDENTITY,
        }
    }
}

// ── OrbitPlane ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod plane {
    use std::f32::consts::{FRAC_PI_2, TAU};

    use assert_approx_eq::assert_approx_eq;
    use glam::Vec3;

    use crate::{min_safe_radius, OrbitPlane};

    #[test]
    fn basis_is_orthonormal() {
        for (inc, rot) in [(0.0, 0.0), (0.9, 1.3), (FRAC_PI_2, 2.0), (3.0, 5.5)] {
            let p = OrbitPlane::new(inc, rot);
            assert_approx_eq!(p.normal.length(), 1.0, 1e-5);
            assert_approx_eq!(p.right.length(), 1.0, 1e-5);
            assert_approx_eq!(p.forward.length(), 1.0, 1e-5);
            assert_approx_eq!(p.normal.dot(p.right), 0.0, 1e-5);
            assert_approx_eq!(p.normal.dot(p.forward), 0.0, 1e-5);
            assert_approx_eq!(p.right.dot(p.forward), 0.0, 1e-5);
        }
    }

    #[test]
    fn equatorial_orbit_uses_fallback_axis() {
        let p = OrbitPlane::new(0.0, 0.0);
        assert!((p.normal - Vec3::Y).length() < 1e-6);
        assert!(p.right.is_finite());
        assert_approx_eq!(p.right.y, 0.0, 1e-6);
    }

    #[test]
    fn positions_stay_on_radius_and_repeat() {
        let p = OrbitPlane::new(0.4, 2.1);
        for a in [0.0, 0.5, 2.0, 4.0] {
            let here = p.position(120.0, a);
            assert_approx_eq!(here.length(), 120.0, 1e-3);
            assert!((here - p.position(120.0, a + TAU)).length() < 1e-3);
        }
    }

    #[test]
    fn min_safe_radius_grows_with_inclination() {
        assert_approx_eq!(min_safe_radius(100.0, 6.0, 0.0), 106.0, 1e-5);
        assert_approx_eq!(min_safe_radius(100.0, 6.0, FRAC_PI_2), 112.0, 1e-5);
        assert!(min_safe_radius(100.0, 6.0, 0.5) < min_safe_radius(100.0, 6.0, 1.0));
    }
}

// ── Satellite ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod satellite {
    use assert_approx_eq::assert_approx_eq;
    use glam::Vec3;
    use gt_core::SatelliteId;

    use super::helpers::spec;
    use crate::{OrbitError, Satellite, SatelliteKind};

    #[test]
    fn rejects_unsafe_radius() {
        let err = Satellite::new(SatelliteId(0), spec(SatelliteKind::Small, 101.0, 0.01, 0.0), 106.0)
            .unwrap_err();
        assert!(matches!(err, OrbitError::BelowSafeRadius { .. }));
        let err = Satellite::new(SatelliteId(0), spec(SatelliteKind::Small, f32::NAN, 0.01, 0.0), 106.0)
            .unwrap_err();
        assert!(matches!(err, OrbitError::BelowSafeRadius { .. }));
    }

    #[test]
    fn rejects_non_finite_speed() {
        let err = Satellite::new(SatelliteId(0), spec(SatelliteKind::Small, 120.0, f32::INFINITY, 0.0), 106.0)
            .unwrap_err();
        assert!(matches!(err, OrbitError::InvalidSpeed { .. }));
    }

    #[test]
    fn station_faces_along_velocity() {
        let sat = Satellite::new(SatelliteId(0), spec(SatelliteKind::Station, 120.0, 0.01, 0.9), 110.0).unwrap();
        let pose = sat.pose(0.01);
        let forward = pose.rotation * Vec3::Z;
        let travel = (sat.position_at(sat.angle + 0.01) - sat.position()).normalize();
        assert!((forward - travel).length() < 1e-3);
        assert_approx_eq!((pose.rotation * Vec3::Y).dot(forward), 0.0, 1e-4);
    }

    #[test]
    fn small_satellite_keeps_fixed_rotation() {
        let mut s = spec(SatelliteKind::Small, 120.0, 0.01, 0.3);
        s.fixed_rotation = glam::Quat::from_rotation_x(0.8);
        let sat = Satellite::new(SatelliteId(0), s, 110.0).unwrap();
        assert_eq!(sat.pose(0.01).rotation, glam::Quat::from_rotation_x(0.8));
    }
}

// ── OrbitEngine ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use std::f32::consts::TAU;

    use assert_approx_eq::assert_approx_eq;
    use gt_core::{OrbitConfig, SatelliteId, SimRng};

    use super::helpers::spec;
    use crate::engine::satellite_id;
    use crate::{OrbitEngine, OrbitError, SatelliteKind};

    #[test]
    fn populate_builds_expected_kinds() {
        let cfg = OrbitConfig::default();
        let engine = OrbitEngine::populate(&cfg, &mut SimRng::new(42)).unwrap();
        assert_eq!(engine.len(), cfg.small_count + 2);
        let count = |k| engine.satellites().iter().filter(|s| s.kind == k).count();
        assert_eq!(count(SatelliteKind::Small), cfg.small_count);
        assert_eq!(count(SatelliteKind::Station), 1);
        assert_eq!(count(SatelliteKind::MarsShip), 1);
    }

    #[test]
    fn populated_orbits_respect_safe_radius() {
        let cfg = OrbitConfig::default();
        for seed in 0..20 {
            let engine = OrbitEngine::populate(&cfg, &mut SimRng::new(seed)).unwrap();
            for s in engine.satellites() {
                assert!(s.orbit_radius >= engine.min_safe_radius(s.inclination), "{}", s.name);
            }
        }
    }

    #[test]
    fn low_station_radius_is_raised() {
        let cfg = OrbitConfig { station_radius: 50.0, ..OrbitConfig::default() };
        let engine = OrbitEngine::populate(&cfg, &mut SimRng::new(1)).unwrap();
        let station = engine.satellites().iter().find(|s| s.kind == SatelliteKind::Station).unwrap();
        assert_approx_eq!(station.orbit_radius, engine.min_safe_radius(cfg.station_inclination), 1e-5);
    }

    #[test]
    fn populate_is_deterministic_for_a_seed() {
        let cfg = OrbitConfig::default();
        let a = OrbitEngine::populate(&cfg, &mut SimRng::new(9)).unwrap();
        let b = OrbitEngine::populate(&cfg, &mut SimRng::new(9)).unwrap();
        assert_eq!(a.poses(), b.poses());
    }

    #[test]
    fn satellite_ids_stop_before_the_sentinel() {
        assert_eq!(satellite_id(0).unwrap(), SatelliteId(0));
        assert_eq!(satellite_id(65_534).unwrap(), SatelliteId(65_534));
        assert!(matches!(satellite_id(65_535), Err(OrbitError::TooManySatellites { count: 65_535 })));
        assert!(matches!(satellite_id(70_000), Err(OrbitError::TooManySatellites { .. })));
    }

    #[test]
    fn add_fails_once_ids_run_out() {
        let cfg = OrbitConfig::default();
        let mut engine = OrbitEngine::empty(&cfg);
        for i in 0..65_535u32 {
            let id = engine.add(spec(SatelliteKind::Small, 130.0, 0.01, 0.2)).unwrap();
            assert_eq!(u32::from(id.0), i);
        }
        let err = engine.add(spec(SatelliteKind::Small, 130.0, 0.01, 0.2)).unwrap_err();
        assert!(matches!(err, OrbitError::TooManySatellites { count: 65_535 }));
        assert_eq!(engine.len(), 65_535);
    }

    #[test]
    fn tick_wraps_angle() {
        let cfg = OrbitConfig::default();
        let mut engine = OrbitEngine::empty(&cfg);
        engine.add(spec(SatelliteKind::Small, 130.0, 1.0, 0.2)).unwrap();
        for _ in 0..20 {
            engine.tick();
            let a = engine.satellites()[0].angle;
            assert!((0.0..TAU).contains(&a));
        }
    }

    #[test]
    fn marker_and_hover_slow_only_the_station() {
        let cfg = OrbitConfig::default();
        let mut engine = OrbitEngine::empty(&cfg);
        let station = engine.add(spec(SatelliteKind::Station, 130.0, 0.04, 0.2)).unwrap();
        let small   = engine.add(spec(SatelliteKind::Small, 130.0, 0.04, 0.2)).unwrap();

        let speed = |e: &OrbitEngine, id| e.effective_speed(e.get(id).unwrap());
        assert_approx_eq!(speed(&engine, station), 0.04, 1e-7);

        engine.set_marker_on_screen(true);
        assert_approx_eq!(speed(&engine, station), 0.04 * cfg.marker_slowdown, 1e-7);

        engine.set_hovered(true);
        assert_approx_eq!(speed(&engine, station), 0.04 * cfg.marker_slowdown * cfg.hover_slowdown, 1e-7);
        assert_approx_eq!(speed(&engine, small), 0.04, 1e-7);

        engine.tick();
        assert_approx_eq!(engine.get(small).unwrap().angle, 0.04, 1e-6);
        assert_approx_eq!(
            engine.get(station).unwrap().angle,
            0.04 * cfg.marker_slowdown * cfg.hover_slowdown,
            1e-6
        );
    }
}
