//! Property-based tests for reply selection

use moonshot_sdk::types::{Choice, Message};
use moonshot_sdk::ResponseSelector;
use proptest::prelude::*;

fn reason_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(Some("stop")), Just(Some("length")), Just(Some("content_filter")), Just(None)]
}

proptest! {
    #[test]
    fn test_selection_prefers_stop(
        reasons in prop::collection::vec(reason_strategy(), 1..8),
        seed in any::<u64>(),
    ) {
        let choices: Vec<Choice> = reasons
            .iter()
            .enumerate()
            .map(|(i, r)| Choice::new(i as u32, Message::assistant(format!("c{}", i)), *r))
            .collect();

        let picked = ResponseSelector::seeded(seed).select(&choices).unwrap();
        prop_assert!(choices.contains(picked));
        if reasons.contains(&Some("stop")) {
            prop_assert!(picked.is_complete());
        }
    }

    #[test]
    fn test_same_seed_same_choice(n in 1usize..8, seed in any::<u64>()) {
        let choices: Vec<Choice> = (0..n)
            .map(|i| Choice::new(i as u32, Message::assistant(format!("c{}", i)), Some("stop")))
            .collect();

        let a = ResponseSelector::seeded(seed).select(&choices).unwrap().index;
        let b = ResponseSelector::seeded(seed).select(&choices).unwrap().index;
        prop_assert_eq!(a, b);
    }
}
