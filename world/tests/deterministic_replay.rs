use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use dungeon_core::{Command, Direction, Event, WorldConfig};
use dungeon_random::SeededSource;
use dungeon_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let seed = (0x5EED..0x5EED + 64)
        .find(|seed| replay(*seed, Vec::new()).is_some())
        .expect("some seed generates the default world");
    let first = replay(seed, scripted_commands());
    let second = replay(seed, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.is_some());
}

#[test]
fn different_seeds_generate_different_worlds() {
    let outcomes: Vec<ReplayOutcome> = (0..16)
        .filter_map(|seed| replay(seed, Vec::new()))
        .collect();
    let distinct = outcomes
        .iter()
        .map(ReplayOutcome::fingerprint)
        .collect::<std::collections::BTreeSet<_>>();
    assert!(distinct.len() > 1, "every seed produced the same world");
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::PickArrow, Command::PickTreasure];
    for direction in Direction::ALL {
        commands.push(Command::Shoot {
            distance: 2,
            direction,
        });
    }
    for direction in [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::South,
    ] {
        commands.push(Command::Move { direction });
        commands.push(Command::PickArrow);
        commands.push(Command::PickTreasure);
    }
    commands
}

fn replay(seed: u64, commands: Vec<Command>) -> Option<ReplayOutcome> {
    let mut world =
        World::new(WorldConfig::default(), Box::new(SeededSource::new(seed))).ok()?;
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        if world::apply(&mut world, command, &mut events).is_err() {
            break;
        }
        log.extend(events.iter().map(EventRecord::from));
    }

    Some(ReplayOutcome {
        start: query::start(&world).get(),
        goal: query::goal(&world).get(),
        player: format!("{:?}", query::player(&world)),
        locations: format!("{:?}", query::locations(&world)),
        events: log,
    })
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    start: u32,
    goal: u32,
    player: String,
    locations: String,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct EventRecord(String);

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self(format!("{event:?}"))
    }
}
