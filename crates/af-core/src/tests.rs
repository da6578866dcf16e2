//! Unit tests for af-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActorId, KeyId, StoreId};

    #[test]
    fn index_roundtrip() {
        let id = ActorId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ActorId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(ActorId::INVALID.0, u32::MAX);
        assert_eq!(KeyId::INVALID.0, u16::MAX);
        assert!(!StoreId::default().is_valid());
        assert!(StoreId(0).is_valid());
    }

    #[test]
    fn key_id_rejects_overflow() {
        assert!(KeyId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(ActorId(7).to_string(), "ActorId(7)");
    }
}

#[cfg(test)]
mod name {
    use crate::Name;

    #[test]
    fn none_is_empty() {
        assert!(Name::NONE.is_none());
        assert!(Name::default().is_none());
        assert!(!Name::from("Health").is_none());
    }

    #[test]
    fn display_none() {
        assert_eq!(Name::NONE.to_string(), "None");
        assert_eq!(Name::from("Target").to_string(), "Target");
    }

    #[test]
    fn compares_with_str() {
        assert_eq!(Name::from("Alpha"), "Alpha");
        assert_ne!(Name::from("Alpha"), "alpha");
    }
}

#[cfg(test)]
mod math {
    use crate::{KINDA_SMALL_NUMBER, Rotator, SMALL_NUMBER, Vector, nearly_equal};

    #[test]
    fn floats_within_tolerance() {
        assert!(nearly_equal(3.25, 3.25, SMALL_NUMBER));
        assert!(nearly_equal(1.0, 1.0 + 1.0e-9, SMALL_NUMBER));
        assert!(!nearly_equal(1.0, 1.001, SMALL_NUMBER));
    }

    #[test]
    fn float_tolerance_is_tighter_than_vector_tolerance() {
        // A gap vectors absorb is still a difference between float keys.
        let gap = 1.0e-5;
        assert!(!nearly_equal(2.0, 2.0 + gap as f32, SMALL_NUMBER));
        assert!(Vector::new(2.0, 0.0, 0.0).equals(Vector::new(2.0 + gap, 0.0, 0.0), KINDA_SMALL_NUMBER));
    }

    #[test]
    fn vector_equals() {
        let a = Vector::new(1.0, 2.0, 3.0);
        assert!(a.equals(Vector::new(1.00001, 2.0, 3.0), KINDA_SMALL_NUMBER));
        assert!(!a.equals(Vector::new(1.1, 2.0, 3.0), KINDA_SMALL_NUMBER));
    }

    #[test]
    fn rotator_wraps() {
        let a = Rotator::new(0.0, 359.99999, 0.0);
        let b = Rotator::new(0.0, -0.00001, 0.0);
        assert!(a.equals(b, KINDA_SMALL_NUMBER));
        assert!(!a.equals(Rotator::new(0.0, 90.0, 0.0), KINDA_SMALL_NUMBER));
    }

    #[test]
    fn normalize_axis_range() {
        assert_eq!(Rotator::normalize_axis(540.0), 180.0);
        assert_eq!(Rotator::normalize_axis(-90.0), -90.0);
        assert_eq!(Rotator::normalize_axis(270.0), -90.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AmbientRng, FlowRng, combine_seeds};

    #[test]
    fn flow_rng_deterministic() {
        let mut a = FlowRng::new(99);
        let mut b = FlowRng::new(99);
        for _ in 0..50 {
            assert_eq!(a.rand_helper(1000), b.rand_helper(1000));
        }
    }

    #[test]
    fn rand_helper_bounds() {
        let mut rng = FlowRng::new(1);
        for _ in 0..500 {
            let v = rng.rand_helper(7);
            assert!((0..7).contains(&v));
        }
        assert_eq!(rng.rand_helper(0), 0);
        assert_eq!(rng.rand_helper(-3), 0);
    }

    #[test]
    fn rand_helper_wide_spans_past_i32() {
        let mut rng = FlowRng::new(8);
        let max = 2 * i64::from(i32::MAX);
        for _ in 0..200 {
            let v = rng.rand_helper_wide(max);
            assert!((0..max).contains(&v));
        }
        assert_eq!(rng.rand_helper_wide(0), 0);
    }

    #[test]
    fn rand_range_inclusive() {
        let mut rng = AmbientRng::new(5);
        let mut seen_max = false;
        for _ in 0..500 {
            let v = rng.rand_range(0, 3);
            assert!((0..=3).contains(&v));
            seen_max |= v == 3;
        }
        assert!(seen_max);
        assert_eq!(rng.rand_range(4, 4), 4);
    }

    #[test]
    fn combine_is_order_sensitive() {
        assert_ne!(combine_seeds(1, 2), combine_seeds(2, 1));
        assert_eq!(combine_seeds(1, 2), combine_seeds(1, 2));
    }

    #[test]
    fn initialize_restarts_sequence() {
        let mut rng = FlowRng::new(3);
        let first: Vec<i32> = (0..5).map(|_| rng.rand_helper(100)).collect();
        rng.initialize(3);
        let again: Vec<i32> = (0..5).map(|_| rng.rand_helper(100)).collect();
        assert_eq!(first, again);
    }
}

#[cfg(test)]
mod config {
    use crate::{FlowConfig, Name};

    #[test]
    fn defaults() {
        let cfg = FlowConfig::default();
        assert_eq!(cfg.seed, 0);
        assert!(cfg.ambient_seed.is_none());
        assert_eq!(cfg.store_name(&Name::from("BB_Enemy")), "Comp_BB_Enemy");
    }

    #[test]
    fn seeded_ambient_is_reproducible() {
        let cfg = FlowConfig { ambient_seed: Some(11), ..FlowConfig::default() };
        let mut a = cfg.ambient_rng();
        let mut b = cfg.ambient_rng();
        assert_eq!(a.rand_helper(1 << 20), b.rand_helper(1 << 20));
    }
}

#[cfg(test)]
mod error {
    use crate::{ActorId, AfError};

    #[test]
    fn actor_not_found_names_the_actor() {
        assert_eq!(AfError::ActorNotFound(ActorId(3)).to_string(), "actor ActorId(3) not found");
    }
}
