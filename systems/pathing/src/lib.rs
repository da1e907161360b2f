#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reachability analysis used to choose where the player starts and ends.

use dungeon_core::{Adjacency, CellId, LocationKind};
use dungeon_random::{shuffled, RandomSource};
use thiserror::Error;
use tracing::debug;

/// Minimum number of steps separating the start from the goal.
pub const MIN_GOAL_DISTANCE: u32 = 5;

/// Failures raised while choosing the start and goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathingError {
    /// No cave has another cave far enough away to serve as the goal.
    #[error("no pair of caves is at least {minimum} steps apart")]
    NoDistantGoal {
        /// Required separation in steps.
        minimum: u32,
    },
}

/// Step counts from a source cell to every other cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Depths {
    source: CellId,
    levels: Vec<Option<u32>>,
}

impl Depths {
    /// Cell the traversal started from.
    #[must_use]
    pub const fn source(&self) -> CellId {
        self.source
    }

    /// Fewest steps needed to reach `cell`, or `None` when unreachable.
    #[must_use]
    pub fn get(&self, cell: CellId) -> Option<u32> {
        self.levels.get(cell.index()).copied().flatten()
    }

    /// Number of cells reached by the traversal, the source included.
    #[must_use]
    pub fn reached(&self) -> usize {
        self.levels.iter().flatten().count()
    }
}

/// Start and goal chosen for a new world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Cave the player starts in.
    pub start: CellId,
    /// Cave guarded by a monster that ends the game when reached.
    pub goal: CellId,
    /// Steps between start and goal.
    pub distance: u32,
}

/// Labels every cell with its depth below `source` using a depth-first walk.
///
/// A cell is expanded again whenever it is reached through a shorter route
/// than before, so the recorded depth settles on the fewest steps needed.
/// Neighbours are explored in North, South, East, West order.
#[must_use]
pub fn depths(adjacency: &Adjacency, source: CellId) -> Depths {
    let mut levels: Vec<Option<u32>> = vec![None; adjacency.len()];
    let mut stack = vec![(source, 0_u32)];

    while let Some((cell, level)) = stack.pop() {
        let Some(slot) = levels.get_mut(cell.index()) else {
            continue;
        };
        if slot.is_some_and(|known| known <= level) {
            continue;
        }
        *slot = Some(level);

        let neighbors: Vec<CellId> = adjacency
            .neighbors(cell)
            .iter()
            .map(|(_, next)| next)
            .collect();
        for next in neighbors.into_iter().rev() {
            stack.push((next, level + 1));
        }
    }

    Depths { source, levels }
}

/// Picks a start cave and the farthest cave at least [`MIN_GOAL_DISTANCE`] away.
///
/// The candidate pool is reshuffled before every attempt and its first cave
/// tried as the start. Candidates without a distant enough cave are dropped
/// from the pool. Among equally distant goals the lowest identifier wins.
pub fn select_endpoints(
    adjacency: &Adjacency,
    source: &mut dyn RandomSource,
) -> Result<Endpoints, PathingError> {
    let caves: Vec<CellId> = adjacency
        .cells()
        .filter(|cell| adjacency.kind(*cell) == LocationKind::Cave)
        .collect();
    let mut pool = caves.clone();

    while !pool.is_empty() {
        pool = shuffled(source, &pool);
        let candidate = pool[0];
        let depth = depths(adjacency, candidate);

        let mut best: Option<(CellId, u32)> = None;
        for cave in &caves {
            let Some(level) = depth.get(*cave) else {
                continue;
            };
            if level < MIN_GOAL_DISTANCE {
                continue;
            }
            if best.map_or(true, |(_, known)| level > known) {
                best = Some((*cave, level));
            }
        }

        if let Some((goal, distance)) = best {
            debug!(
                start = candidate.get(),
                goal = goal.get(),
                distance,
                "endpoints_selected"
            );
            return Ok(Endpoints {
                start: candidate,
                goal,
                distance,
            });
        }

        debug!(candidate = candidate.get(), "start_candidate_rejected");
        pool.retain(|cell| *cell != candidate);
    }

    Err(PathingError::NoDistantGoal {
        minimum: MIN_GOAL_DISTANCE,
    })
}
