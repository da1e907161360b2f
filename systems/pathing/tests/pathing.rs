use std::collections::VecDeque;

use dungeon_core::{Adjacency, CellId};
use dungeon_random::{FixedSource, SeededSource};
use dungeon_system_maze::{build, Config};
use dungeon_system_pathing::{depths, select_endpoints, MIN_GOAL_DISTANCE};
use proptest::prelude::*;

fn breadth_first(adjacency: &Adjacency, source: CellId) -> Vec<Option<u32>> {
    let mut levels = vec![None; adjacency.len()];
    levels[source.index()] = Some(0);
    let mut queue = VecDeque::from([source]);
    while let Some(cell) = queue.pop_front() {
        let level = levels[cell.index()].unwrap_or(0);
        for (_, next) in adjacency.neighbors(cell).iter() {
            if levels[next.index()].is_none() {
                levels[next.index()] = Some(level + 1);
                queue.push_back(next);
            }
        }
    }
    levels
}

#[test]
fn fixed_maze_starts_next_to_the_corner_and_ends_in_the_far_corner() {
    let mut source = FixedSource::new(2);
    let maze = build(Config::new(5, 7, 4, false), &mut source).expect("maze builds");
    let endpoints = select_endpoints(maze.adjacency(), &mut source).expect("endpoints exist");

    assert_eq!(endpoints.start, CellId::new(1));
    assert_eq!(endpoints.goal, CellId::new(34));
    assert_eq!(endpoints.distance, 9);

    let depth = depths(maze.adjacency(), endpoints.start);
    let expected = [
        (0, 1),
        (28, 5),
        (3, 2),
        (10, 3),
        (31, 6),
        (6, 5),
        (33, 8),
    ];
    for (cell, level) in expected {
        assert_eq!(depth.get(CellId::new(cell)), Some(level), "cell {cell}");
    }
}

proptest! {
    #[test]
    fn depths_match_breadth_first_distances(
        seed in any::<u64>(),
        rows in 1u32..8,
        columns in 1u32..8,
        wrapping in any::<bool>(),
    ) {
        let mut source = SeededSource::new(seed);
        let maze = build(Config::new(rows, columns, 0, wrapping), &mut source).expect("maze builds");
        let adjacency = maze.adjacency();
        let start = CellId::new(0);
        let depth = depths(adjacency, start);
        let expected = breadth_first(adjacency, start);
        for cell in adjacency.cells() {
            prop_assert_eq!(depth.get(cell), expected[cell.index()]);
        }
    }

    #[test]
    fn selected_goals_are_distant_caves(seed in any::<u64>()) {
        let mut source = SeededSource::new(seed);
        let maze = build(Config::new(6, 6, 2, false), &mut source).expect("maze builds");
        if let Ok(endpoints) = select_endpoints(maze.adjacency(), &mut source) {
            let depth = depths(maze.adjacency(), endpoints.start);
            prop_assert!(endpoints.distance >= MIN_GOAL_DISTANCE);
            prop_assert_eq!(depth.get(endpoints.goal), Some(endpoints.distance));
            prop_assert_ne!(endpoints.start, endpoints.goal);
        }
    }
}
