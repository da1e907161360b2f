use std::collections::VecDeque;

use dungeon_core::{
    Command, CommandError, Direction, LocationKind, LocationSnapshot, WorldConfig,
};
use dungeon_random::SeededSource;
use dungeon_world::{self as world, query, World};
use proptest::prelude::*;

fn reachable(locations: &[LocationSnapshot], start: usize) -> usize {
    let mut seen = vec![false; locations.len()];
    seen[start] = true;
    let mut queue = VecDeque::from([start]);
    let mut count = 1;
    while let Some(index) = queue.pop_front() {
        for (_, next) in locations[index].neighbors.iter() {
            if !seen[next.index()] {
                seen[next.index()] = true;
                count += 1;
                queue.push_back(next.index());
            }
        }
    }
    count
}

fn config_strategy() -> impl Strategy<Value = WorldConfig> {
    let grid = (4u32..9, 4u32..9, 0u32..3, 0u32..=100, any::<bool>());
    let hazards = (1u32..4, 0u32..3, 0u32..2, 0u32..3);
    (grid, hazards).prop_map(
        |(
            (rows, columns, interconnectivity, treasure_percent, wrapping),
            (stationary_monsters, thieves, pits, mobile_monsters),
        )| WorldConfig {
            rows,
            columns,
            interconnectivity,
            treasure_percent,
            wrapping,
            stationary_monsters,
            thieves,
            pits,
            mobile_monsters,
        },
    )
}

proptest! {
    #[test]
    fn generated_worlds_uphold_their_invariants(config in config_strategy(), seed in any::<u64>()) {
        let Ok(world) = World::new(config, Box::new(SeededSource::new(seed))) else {
            return Ok(());
        };
        let locations = query::locations(&world);
        let start = query::start(&world);
        let goal = query::goal(&world);

        prop_assert!(query::adjacency(&world).is_symmetric());
        prop_assert_eq!(reachable(&locations, start.index()), locations.len());
        prop_assert!(locations[goal.index()].has_live_stationary());
        prop_assert_ne!(start, goal);

        let home = &locations[start.index()];
        prop_assert!(home.occupant.is_none());
        prop_assert!(!home.pit);
        prop_assert!(!home.thief);

        for location in &locations {
            let degree = location.neighbors.degree();
            prop_assert_eq!(location.kind == LocationKind::Tunnel, degree == 2);
            if location.kind == LocationKind::Tunnel {
                prop_assert!(location.treasure.is_empty());
                prop_assert!(!location.pit);
                prop_assert!(!location.thief);
                prop_assert!(!location.has_live_stationary());
            }
            prop_assert!(location.arrows <= 3);
        }
    }

    #[test]
    fn rejected_commands_leave_the_world_untouched(seed in any::<u64>(), distance in -5i32..1) {
        let Ok(mut world) = World::new(WorldConfig::default(), Box::new(SeededSource::new(seed))) else {
            return Ok(());
        };
        let before = query::locations(&world);
        let player = query::player(&world);
        let mut events = Vec::new();

        let result = world::apply(
            &mut world,
            Command::Shoot { distance, direction: Direction::South },
            &mut events,
        );
        prop_assert_eq!(result, Err(CommandError::InvalidDistance(distance)));
        prop_assert!(events.is_empty());
        prop_assert_eq!(query::locations(&world), before);
        prop_assert_eq!(query::player(&world), player);
    }
}
