//! Property-based tests for token budget resolution

use moonshot_sdk::budget::{model_capacity, resolve};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_kilo_budget(n in 1u64..100_000, fraction in 0.0f64..=1.0) {
        let capacity = n * 1024;
        let input = (capacity as f64 * fraction) as u64;
        let model = format!("moonshot-v1-{}k", n);

        prop_assert_eq!(model_capacity(&model).unwrap(), capacity);
        prop_assert_eq!(resolve(&model, input).unwrap(), capacity - input);
    }

    #[test]
    fn test_unit_factors(n in 1u64..1000) {
        prop_assert_eq!(model_capacity(&format!("m-{}", n)).unwrap(), n);
        prop_assert_eq!(model_capacity(&format!("m-{}m", n)).unwrap(), n << 20);
        prop_assert_eq!(model_capacity(&format!("m-{}b", n)).unwrap(), n << 30);
    }

    #[test]
    fn test_only_last_segment_counts(prefix in "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,3}", n in 1u64..512) {
        prop_assert_eq!(model_capacity(&format!("{}-{}k", prefix, n)).unwrap(), n * 1024);
    }

    #[test]
    fn test_letter_segments_rejected(segment in "[a-z]{1,10}") {
        let model = format!("moonshot-v1-{}", segment);
        prop_assert!(model_capacity(&model).is_err());
    }

    #[test]
    fn test_overspent_input_rejected(n in 1u64..1000, extra in 1u64..10_000) {
        let model = format!("moonshot-v1-{}k", n);
        prop_assert!(resolve(&model, n * 1024 + extra).is_err());
    }
}
