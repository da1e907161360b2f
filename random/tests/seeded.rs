use dungeon_random::{shuffled, RandomSource, SeededSource};
use proptest::prelude::*;

#[test]
fn identical_seeds_replay_identical_draws() {
    let mut first = SeededSource::new(0xDEAD_BEEF);
    let mut second = SeededSource::new(0xDEAD_BEEF);

    let draws_a: Vec<i32> = (0..64).map(|_| first.next_in(3, 9)).collect();
    let draws_b: Vec<i32> = (0..64).map(|_| second.next_in(3, 9)).collect();
    assert_eq!(draws_a, draws_b);
    assert_eq!(first.permutation(20), second.permutation(20));
}

#[test]
fn boxed_sources_are_usable_through_the_trait() {
    let mut source: Box<dyn RandomSource> = Box::new(SeededSource::new(3));
    let items = shuffled(source.as_mut(), &[1, 2, 3, 4, 5]);
    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
}

proptest! {
    #[test]
    fn draws_stay_inside_the_half_open_range(seed in any::<u64>(), min in -50i32..50, span in 1i32..100) {
        let mut source = SeededSource::new(seed);
        let max = min + span;
        for _ in 0..32 {
            let value = source.next_in(min, max);
            prop_assert!(value >= min && value < max);
        }
    }

    #[test]
    fn permutations_cover_every_index_once(seed in any::<u64>(), len in 0usize..64) {
        let mut source = SeededSource::new(seed);
        let mut order = source.permutation(len);
        order.sort_unstable();
        prop_assert_eq!(order, (0..len).collect::<Vec<_>>());
    }
}
