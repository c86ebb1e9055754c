//! Unit tests for mt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, EntityId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, NodeId(42));
    }

    #[test]
    fn invalid_sentinels() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
        assert!(!EntityId::INVALID.is_valid());
        assert!(EntityId(0).is_valid());
    }

    #[test]
    fn display_tags() {
        assert_eq!(NodeId(7).to_string(), "n7");
        assert_eq!(EdgeId(3).to_string(), "e3");
        assert_eq!(EntityId(12).to_string(), "ue12");
    }
}

#[cfg(test)]
mod geom {
    use crate::{BBox, PlanarPoint};

    #[test]
    fn distance_3_4_5() {
        let a = PlanarPoint::new(0.0, 0.0);
        let b = PlanarPoint::new(3.0, 4.0);
        assert_eq!(a.distance_m(b), 5.0);
        assert_eq!(a.distance2(b), 25.0);
    }

    #[test]
    fn bbox_from_points() {
        let pts = [
            PlanarPoint::new(1.0, 5.0),
            PlanarPoint::new(-2.0, 3.0),
            PlanarPoint::new(4.0, -1.0),
        ];
        let bb = BBox::from_points(pts).unwrap();
        assert_eq!(bb.min, PlanarPoint::new(-2.0, -1.0));
        assert_eq!(bb.max, PlanarPoint::new(4.0, 5.0));
        assert_eq!(bb.width(), 6.0);
        assert_eq!(bb.height(), 6.0);
    }

    #[test]
    fn bbox_empty_is_none() {
        assert!(BBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn bbox_boundary() {
        let bb = BBox { min: PlanarPoint::new(0.0, 0.0), max: PlanarPoint::new(10.0, 10.0) };
        assert!(bb.on_boundary(PlanarPoint::new(0.0, 3.0)));
        assert!(bb.on_boundary(PlanarPoint::new(7.5, 10.0)));
        assert!(!bb.on_boundary(PlanarPoint::new(5.0, 5.0)));
        assert!(!bb.on_boundary(PlanarPoint::new(11.0, 10.0)));
    }
}

#[cfg(test)]
mod rng {
    use crate::{EntityId, EntityRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = EntityRng::new(42, EntityId(3));
        let mut b = EntityRng::new(42, EntityId(3));
        for _ in 0..100 {
            assert_eq!(a.index(1_000), b.index(1_000));
        }
    }

    #[test]
    fn entities_get_distinct_streams() {
        let mut a = EntityRng::new(42, EntityId(0));
        let mut b = EntityRng::new(42, EntityId(1));
        let xs: Vec<usize> = (0..32).map(|_| a.index(1 << 20)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.index(1 << 20)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn uniform_stays_in_closed_range() {
        let mut r = EntityRng::new(7, EntityId(0));
        for _ in 0..1_000 {
            let v = r.uniform(-3.0, 2.5);
            assert!((-3.0..=2.5).contains(&v));
        }
        assert_eq!(r.uniform(4.0, 4.0), 4.0);
    }
}

#[cfg(test)]
mod config {
    use crate::{PlanarPoint, TraceConfig};

    #[test]
    fn default_is_valid() {
        let c = TraceConfig::default();
        c.validate().unwrap();
        assert_eq!(c.near_radius_m, 500.0);
        assert_eq!(c.samples_per_entity(), c.duration_secs as usize + 1);
    }

    #[test]
    fn rejects_zero_entities_and_duration() {
        let c = TraceConfig { entity_count: 0, ..Default::default() };
        assert!(c.validate().is_err());
        let c = TraceConfig { duration_secs: 0, ..Default::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_bad_distances() {
        let c = TraceConfig { min_travel_dist_m: -1.0, ..Default::default() };
        assert!(c.validate().is_err());
        let c = TraceConfig { near_radius_m: 0.0, ..Default::default() };
        assert!(c.validate().is_err());
        let c = TraceConfig {
            target: Some(PlanarPoint::new(f64::NAN, 0.0)),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_caps() {
        let c = TraceConfig { max_sample_attempts: 0, ..Default::default() };
        assert!(c.validate().is_err());
        let c = TraceConfig { num_threads: Some(0), ..Default::default() };
        assert!(c.validate().is_err());
    }
}
