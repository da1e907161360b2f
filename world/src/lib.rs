#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the dungeon.
//!
//! The world owns the maze, the contents of every location and the player.
//! Adapters drive it exclusively through [`apply`] and read it through the
//! functions in [`query`]. Generation and combat decisions are delegated to
//! the pure systems; this crate only applies their plans.

mod location;
mod senses;

use dungeon_core::{
    Adjacency, CellId, Command, CommandError, ConfigError, Creature, CreatureKind, Direction,
    Event, GameStatus, LocationSnapshot, TreasureKind, WorldConfig, FULL_HEALTH,
    STARTING_ARROWS,
};
use dungeon_random::RandomSource;
use dungeon_system_combat::{
    confront_stationary, melee, resolve_shot, trace_arrow, ArrowFlight, Encounter, MeleeOutcome,
    ARROW_DAMAGE,
};
use dungeon_system_maze::MazeError;
use dungeon_system_pathing::{select_endpoints, PathingError};
use dungeon_system_population::{scatter_roamers, stock, PopulationError, StockConfig};
use thiserror::Error;
use tracing::{debug, info};

use crate::location::Location;

/// Reasons a world cannot be generated from a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The maze could not host the requested extra links.
    #[error(transparent)]
    Maze(#[from] MazeError),
    /// No start and goal pair is far enough apart.
    #[error(transparent)]
    Pathing(#[from] PathingError),
    /// The caves cannot host the requested hazards.
    #[error(transparent)]
    Population(#[from] PopulationError),
}

/// Read-only record of a freshly generated world used to replay it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Baseline {
    config: WorldConfig,
    treasure_percent: u32,
    adjacency: Adjacency,
    start: CellId,
    goal: CellId,
    locations: Vec<LocationSnapshot>,
}

impl Baseline {
    /// Configuration the world was generated from.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Treasure percentage after the upward re-roll.
    #[must_use]
    pub const fn treasure_percent(&self) -> u32 {
        self.treasure_percent
    }

    /// Maze links shared by every replay.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Cave the player starts in.
    #[must_use]
    pub const fn start(&self) -> CellId {
        self.start
    }

    /// Cave ending the game.
    #[must_use]
    pub const fn goal(&self) -> CellId {
        self.goal
    }

    /// Contents of every location right after generation.
    #[must_use]
    pub fn locations(&self) -> &[LocationSnapshot] {
        &self.locations
    }
}

#[derive(Clone, Debug)]
struct Player {
    location: CellId,
    treasure: Vec<TreasureKind>,
    arrows: u32,
    health: i32,
}

impl Player {
    fn new(location: CellId) -> Self {
        Self {
            location,
            treasure: Vec::new(),
            arrows: STARTING_ARROWS,
            health: FULL_HEALTH,
        }
    }
}

/// Represents the authoritative dungeon state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    treasure_percent: u32,
    adjacency: Adjacency,
    locations: Vec<Location>,
    start: CellId,
    goal: CellId,
    player: Player,
    status: GameStatus,
    mobile_remaining: u32,
    baseline: Baseline,
    source: Box<dyn RandomSource>,
}

impl World {
    /// Generates a new world, drawing every random decision from `source`.
    ///
    /// Draw order: the treasure percentage re-roll, the maze, the start and
    /// goal search, the one-off stock and finally the first roamer placement.
    pub fn new(
        config: WorldConfig,
        mut source: Box<dyn RandomSource>,
    ) -> Result<Self, GenerationError> {
        config.validate()?;

        let base = config.treasure_percent;
        let bonus = source.next_in(0, (100 - base) as i32);
        let treasure_percent = base
            .saturating_add(u32::try_from(bonus).unwrap_or(0))
            .min(100);

        let maze = dungeon_system_maze::build(
            dungeon_system_maze::Config::new(
                config.rows,
                config.columns,
                config.interconnectivity,
                config.wrapping,
            ),
            source.as_mut(),
        )?;
        let adjacency = maze.into_adjacency();
        let endpoints = select_endpoints(&adjacency, source.as_mut())?;
        let plan = stock(
            &adjacency,
            endpoints,
            StockConfig::new(treasure_percent, config.stationary_monsters, config.pits),
            source.as_mut(),
        )?;

        let mut locations = vec![Location::default(); adjacency.len()];
        for cell in &plan.treasure {
            locations[cell.index()].treasure = TreasureKind::BUNDLE.to_vec();
        }
        for (cell, bundle) in &plan.arrows {
            locations[cell.index()].arrows = *bundle;
        }
        for cell in &plan.stationary {
            locations[cell.index()].occupant = Some(Creature::new(CreatureKind::Stationary));
        }
        for cell in &plan.pits {
            locations[cell.index()].pit = true;
        }

        let mut world = Self {
            treasure_percent,
            start: endpoints.start,
            goal: endpoints.goal,
            player: Player::new(endpoints.start),
            status: GameStatus::Exploring,
            mobile_remaining: config.mobile_monsters,
            baseline: Baseline {
                config: config.clone(),
                treasure_percent,
                adjacency: adjacency.clone(),
                start: endpoints.start,
                goal: endpoints.goal,
                locations: Vec::new(),
            },
            config,
            adjacency,
            locations,
            source,
        };
        world.scatter_roamers();
        world.baseline.locations = world.snapshots();
        world.locations[world.start.index()].visited = true;

        info!(
            rows = world.config.rows,
            columns = world.config.columns,
            start = world.start.get(),
            goal = world.goal.get(),
            distance = endpoints.distance,
            treasure_percent,
            "world_generated"
        );
        Ok(world)
    }

    /// Rebuilds the world recorded in `baseline` with a fresh player at its start.
    #[must_use]
    pub fn restart(baseline: &Baseline, source: Box<dyn RandomSource>) -> Self {
        let mut locations: Vec<Location> = baseline
            .locations
            .iter()
            .map(Location::from_snapshot)
            .collect();
        for location in &mut locations {
            location.visited = false;
        }
        if let Some(location) = locations.get_mut(baseline.start.index()) {
            location.visited = true;
        }

        info!(start = baseline.start.get(), goal = baseline.goal.get(), "world_restarted");
        Self {
            config: baseline.config.clone(),
            treasure_percent: baseline.treasure_percent,
            adjacency: baseline.adjacency.clone(),
            locations,
            start: baseline.start,
            goal: baseline.goal,
            player: Player::new(baseline.start),
            status: GameStatus::Exploring,
            mobile_remaining: baseline.config.mobile_monsters,
            baseline: baseline.clone(),
            source,
        }
    }

    fn snapshots(&self) -> Vec<LocationSnapshot> {
        self.adjacency
            .cells()
            .map(|cell| self.locations[cell.index()].snapshot(&self.adjacency, cell))
            .collect()
    }

    fn here(&mut self) -> &mut Location {
        &mut self.locations[self.player.location.index()]
    }

    /// Clears last turn's thieves and mobile monsters and places them afresh.
    fn scatter_roamers(&mut self) {
        for location in &mut self.locations {
            location.thief = false;
            if location
                .occupant
                .is_some_and(|creature| creature.kind() == CreatureKind::Mobile)
            {
                location.occupant = None;
            }
        }

        let plan = scatter_roamers(
            &self.snapshots(),
            self.start,
            self.player.location,
            self.mobile_remaining,
            self.config.thieves,
            self.source.as_mut(),
        );
        for cell in &plan.mobile {
            self.locations[cell.index()].occupant = Some(Creature::new(CreatureKind::Mobile));
        }
        for cell in &plan.thieves {
            self.locations[cell.index()].thief = true;
        }
        debug!(mobile = ?plan.mobile, thieves = ?plan.thieves, "roamers_scattered");
    }

    fn kill_player(&mut self) {
        self.player.health = self.player.health.min(0);
        self.status = GameStatus::Dead;
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.player.location;
        let Some(to) = self.adjacency.neighbor(from, direction) else {
            out_events.push(Event::MoveBlocked { direction });
            return;
        };

        self.player.location = to;
        out_events.push(Event::PlayerMoved { from, to });
        let arrived = &mut self.locations[to.index()];
        arrived.visited = true;

        if arrived.thief {
            out_events.push(Event::ThiefEncountered { cell: to });
            if self.player.treasure.is_empty() {
                out_events.push(Event::NothingToSteal);
            } else {
                let count = self.player.treasure.len();
                self.player.treasure.clear();
                out_events.push(Event::TreasureStolen { count });
            }
        }

        let occupant = self.locations[to.index()].occupant;
        if self.locations[to.index()].pit {
            out_events.push(Event::FellIntoPit { cell: to });
            self.kill_player();
        } else if let Some(creature) = occupant {
            match creature.kind() {
                CreatureKind::Mobile => self.fight(to, creature, out_events),
                CreatureKind::Stationary => {
                    match confront_stationary(creature, self.source.as_mut()) {
                        Encounter::Eaten => {
                            out_events.push(Event::EatenByMonster { cell: to });
                            self.kill_player();
                        }
                        Encounter::Escaped => {
                            out_events.push(Event::EscapedInjuredMonster { cell: to });
                        }
                        Encounter::Passed => {}
                    }
                }
            }
        }

        if self.status == GameStatus::Exploring && to == self.goal {
            out_events.push(Event::GoalReached { cell: to });
            self.status = GameStatus::Won;
        }

        self.scatter_roamers();
        debug!(from = from.get(), to = to.get(), status = ?self.status, "player_moved");
    }

    fn fight(&mut self, cell: CellId, creature: Creature, out_events: &mut Vec<Event>) {
        let report = melee(cell, self.player.health, creature, self.source.as_mut());
        out_events.extend(report.events);
        self.player.health = report.player_health;

        if report.monster_health <= 0 {
            self.locations[cell.index()].occupant = None;
        }
        match report.outcome {
            MeleeOutcome::Victory => {
                self.mobile_remaining = self.mobile_remaining.saturating_sub(1);
            }
            MeleeOutcome::Defeat => self.kill_player(),
        }
    }

    fn shoot(
        &mut self,
        distance: i32,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let reach = u32::try_from(distance)
            .ok()
            .filter(|reach| *reach >= 1)
            .ok_or(CommandError::InvalidDistance(distance))?;

        if self.player.arrows == 0 {
            out_events.push(Event::OutOfArrows);
            return Ok(());
        }
        self.player.arrows -= 1;

        let flight = trace_arrow(&self.adjacency, self.player.location, direction, reach);
        let target = match flight {
            ArrowFlight::Landed(cell) => Some(cell),
            ArrowFlight::Lost => None,
        };
        let occupant = target.and_then(|cell| self.locations[cell.index()].occupant);
        let outcome = resolve_shot(flight, occupant);

        if let Some(cell) = target.filter(|_| outcome.is_hit()) {
            if let Some(creature) = self.locations[cell.index()].occupant.as_mut() {
                creature.hit(ARROW_DAMAGE);
            }
        }
        debug!(?outcome, arrows = self.player.arrows, "arrow_fired");
        out_events.push(outcome.event());
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.status.is_terminal() {
        return Err(CommandError::GameOver);
    }

    match command {
        Command::Move { direction } => world.move_player(direction, out_events),
        Command::PickArrow => {
            let here = world.here();
            let count = here.arrows;
            if count == 0 {
                out_events.push(Event::NoArrowsHere);
            } else {
                here.arrows = 0;
                world.player.arrows = world.player.arrows.saturating_add(count);
                out_events.push(Event::ArrowsPicked {
                    count,
                    total: world.player.arrows,
                });
            }
        }
        Command::PickTreasure => {
            let items = std::mem::take(&mut world.here().treasure);
            if items.is_empty() {
                out_events.push(Event::NoTreasureHere);
            } else {
                world.player.treasure.extend(items.iter().copied());
                out_events.push(Event::TreasurePicked { items });
            }
        }
        Command::Shoot {
            distance,
            direction,
        } => world.shoot(distance, direction, out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use dungeon_core::{
        Adjacency, CellId, Direction, GameStatus, LocationSnapshot, PlayerSnapshot, Smell, Soil,
        WorldConfig,
    };

    use super::{senses, Baseline, World};

    /// Snapshots of every location in identifier order.
    #[must_use]
    pub fn locations(world: &World) -> Vec<LocationSnapshot> {
        world.snapshots()
    }

    /// Snapshot of a single location, if it exists.
    #[must_use]
    pub fn location(world: &World, cell: CellId) -> Option<LocationSnapshot> {
        world
            .locations
            .get(cell.index())
            .map(|location| location.snapshot(&world.adjacency, cell))
    }

    /// Snapshot of the location the player stands in.
    #[must_use]
    pub fn current_location(world: &World) -> LocationSnapshot {
        let cell = world.player.location;
        world.locations[cell.index()].snapshot(&world.adjacency, cell)
    }

    /// Cave the player started in.
    #[must_use]
    pub fn start(world: &World) -> CellId {
        world.start
    }

    /// Cave that ends the game when reached alive.
    #[must_use]
    pub fn goal(world: &World) -> CellId {
        world.goal
    }

    /// Copy of the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            location: world.player.location,
            treasure: world.player.treasure.clone(),
            arrows: world.player.arrows,
            health: world.player.health,
        }
    }

    /// Odour of live stationary monsters around the player.
    #[must_use]
    pub fn smell(world: &World) -> Smell {
        senses::smell(&world.adjacency, world.player.location, |cell| {
            world.locations[cell.index()].has_live_stationary()
        })
    }

    /// Texture of the ground around the player.
    #[must_use]
    pub fn soil(world: &World) -> Soil {
        senses::soil(&world.adjacency, world.player.location, |cell| {
            world.locations[cell.index()].pit
        })
    }

    /// Reports whether the player stands on the goal.
    #[must_use]
    pub fn has_reached_end(world: &World) -> bool {
        world.player.location == world.goal
    }

    /// Lifecycle state of the player.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Directions the player can move in, in canonical order.
    #[must_use]
    pub fn available_moves(world: &World) -> Vec<Direction> {
        world.adjacency.neighbors(world.player.location).directions()
    }

    /// Mobile monsters that have not been slain yet.
    #[must_use]
    pub fn mobile_monsters_remaining(world: &World) -> u32 {
        world.mobile_remaining
    }

    /// Maze links of the world.
    #[must_use]
    pub fn adjacency(world: &World) -> &Adjacency {
        &world.adjacency
    }

    /// Configuration the world was generated from.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Treasure percentage after the upward re-roll.
    #[must_use]
    pub fn treasure_percent(world: &World) -> u32 {
        world.treasure_percent
    }

    /// Record of the world right after generation, used for restarts.
    #[must_use]
    pub fn baseline(world: &World) -> &Baseline {
        &world.baseline
    }
}
