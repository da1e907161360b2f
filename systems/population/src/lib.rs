#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement system that decides where supplies and hazards go.
//!
//! The system never mutates the world. It reads the adjacency or location
//! snapshots and answers with plans listing the cells that should receive
//! each kind of content; the world applies those plans.

use dungeon_core::{Adjacency, CellId, LocationKind, LocationSnapshot};
use dungeon_random::{shuffled, RandomSource};
use dungeon_system_pathing::Endpoints;
use thiserror::Error;
use tracing::debug;

/// Smallest arrow bundle left in a location.
pub const MIN_ARROW_BUNDLE: i32 = 1;
/// Exclusive upper bound on the size of an arrow bundle.
pub const MAX_ARROW_BUNDLE: i32 = 4;

/// Failures raised when the grid cannot host the requested content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PopulationError {
    /// Not enough caves remain for the stationary monsters.
    #[error("monster count {requested} is greater than the {available} caves that can host one")]
    TooManyMonsters {
        /// Stationary monsters requested, the goal's included.
        requested: u32,
        /// Caves available besides the start and goal.
        available: usize,
    },
    /// Not enough caves remain for the pits.
    #[error("pit count {requested} is greater than the {available} caves that can host one")]
    TooManyPits {
        /// Pits requested.
        requested: u32,
        /// Caves without a live monster besides the start and goal.
        available: usize,
    },
}

/// Quantities governing the one-off placement performed at generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockConfig {
    treasure_percent: u32,
    stationary_monsters: u32,
    pits: u32,
}

impl StockConfig {
    /// Creates a configuration from the effective treasure percentage and hazard counts.
    #[must_use]
    pub const fn new(treasure_percent: u32, stationary_monsters: u32, pits: u32) -> Self {
        Self {
            treasure_percent,
            stationary_monsters,
            pits,
        }
    }
}

/// Content placed once when a world is generated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StockPlan {
    /// Caves receiving a full treasure bundle.
    pub treasure: Vec<CellId>,
    /// Locations receiving arrows along with the bundle size.
    pub arrows: Vec<(CellId, u32)>,
    /// Caves receiving a stationary monster; the goal comes first.
    pub stationary: Vec<CellId>,
    /// Caves receiving a pit.
    pub pits: Vec<CellId>,
}

/// Hazards placed afresh after every successful move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoamerPlan {
    /// Locations receiving a mobile monster.
    pub mobile: Vec<CellId>,
    /// Caves receiving a thief.
    pub thieves: Vec<CellId>,
}

/// Number of items out of `total` matching `percent`, rounded half up.
#[must_use]
pub fn share(percent: u32, total: usize) -> usize {
    (percent as usize * total + 50) / 100
}

/// Plans treasure, arrows, stationary monsters and pits for a fresh world.
///
/// Draws happen in that order: a permutation of the caves for treasure, a
/// permutation of every location followed by one bundle size per armed
/// location, a permutation of the monster pool, then a permutation of the pit
/// pool.
pub fn stock(
    adjacency: &Adjacency,
    endpoints: Endpoints,
    config: StockConfig,
    source: &mut dyn RandomSource,
) -> Result<StockPlan, PopulationError> {
    let caves: Vec<CellId> = adjacency
        .cells()
        .filter(|cell| adjacency.kind(*cell) == LocationKind::Cave)
        .collect();
    let everything: Vec<CellId> = adjacency.cells().collect();

    let treasure: Vec<CellId> = shuffled(source, &caves)
        .into_iter()
        .take(share(config.treasure_percent, caves.len()))
        .collect();

    let armed: Vec<CellId> = shuffled(source, &everything)
        .into_iter()
        .take(share(config.treasure_percent, everything.len()))
        .collect();
    let arrows = armed
        .into_iter()
        .map(|cell| {
            let bundle = source.next_in(MIN_ARROW_BUNDLE, MAX_ARROW_BUNDLE);
            (cell, u32::try_from(bundle).unwrap_or(0))
        })
        .collect();

    let monster_pool: Vec<CellId> = caves
        .iter()
        .copied()
        .filter(|cell| *cell != endpoints.start && *cell != endpoints.goal)
        .collect();
    let extra_monsters = config.stationary_monsters.saturating_sub(1) as usize;
    if extra_monsters > monster_pool.len() {
        return Err(PopulationError::TooManyMonsters {
            requested: config.stationary_monsters,
            available: monster_pool.len(),
        });
    }
    let mut stationary = vec![endpoints.goal];
    stationary.extend(
        shuffled(source, &monster_pool)
            .into_iter()
            .take(extra_monsters),
    );

    let pit_pool: Vec<CellId> = monster_pool
        .iter()
        .copied()
        .filter(|cell| !stationary.contains(cell))
        .collect();
    if config.pits as usize > pit_pool.len() {
        return Err(PopulationError::TooManyPits {
            requested: config.pits,
            available: pit_pool.len(),
        });
    }
    let pits = shuffled(source, &pit_pool)
        .into_iter()
        .take(config.pits as usize)
        .collect();

    let plan = StockPlan {
        treasure,
        arrows,
        stationary,
        pits,
    };
    debug!(
        treasure = plan.treasure.len(),
        arrows = plan.arrows.len(),
        stationary = plan.stationary.len(),
        pits = plan.pits.len(),
        "world_stocked"
    );
    Ok(plan)
}

/// Plans where mobile monsters and thieves lurk for the coming turn.
///
/// `locations` must describe the world with last turn's mobile monsters and
/// thieves already removed. Mobile monsters go to unoccupied locations without
/// a pit, away from both the start and the player. Thieves then go to caves
/// without a live creature or pit, away from the start. Each pool is shuffled
/// once and truncated, so small worlds simply receive fewer roamers.
pub fn scatter_roamers(
    locations: &[LocationSnapshot],
    start: CellId,
    player: CellId,
    mobile_monsters: u32,
    thieves: u32,
    source: &mut dyn RandomSource,
) -> RoamerPlan {
    let mobile_pool: Vec<CellId> = locations
        .iter()
        .filter(|location| {
            location.occupant.is_none()
                && !location.pit
                && location.id != start
                && location.id != player
        })
        .map(|location| location.id)
        .collect();
    let mobile: Vec<CellId> = shuffled(source, &mobile_pool)
        .into_iter()
        .take(mobile_monsters as usize)
        .collect();

    let thief_pool: Vec<CellId> = locations
        .iter()
        .filter(|location| {
            location.kind == LocationKind::Cave
                && !location.occupant.is_some_and(|creature| creature.is_alive())
                && !location.pit
                && location.id != start
                && !mobile.contains(&location.id)
        })
        .map(|location| location.id)
        .collect();
    let thieves = shuffled(source, &thief_pool)
        .into_iter()
        .take(thieves as usize)
        .collect();

    RoamerPlan { mobile, thieves }
}
