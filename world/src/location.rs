//! Mutable per-cell contents owned by the world.

use dungeon_core::{Adjacency, CellId, Creature, LocationSnapshot, TreasureKind};

/// Everything a single location holds besides its links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Location {
    pub(crate) treasure: Vec<TreasureKind>,
    pub(crate) arrows: u32,
    pub(crate) occupant: Option<Creature>,
    pub(crate) pit: bool,
    pub(crate) thief: bool,
    pub(crate) visited: bool,
}

impl Location {
    /// Rebuilds mutable contents from a snapshot taken earlier.
    pub(crate) fn from_snapshot(snapshot: &LocationSnapshot) -> Self {
        Self {
            treasure: snapshot.treasure.clone(),
            arrows: snapshot.arrows,
            occupant: snapshot.occupant,
            pit: snapshot.pit,
            thief: snapshot.thief,
            visited: snapshot.visited,
        }
    }

    /// Combines the contents with the cell's links into a read-only snapshot.
    pub(crate) fn snapshot(&self, adjacency: &Adjacency, id: CellId) -> LocationSnapshot {
        LocationSnapshot {
            id,
            row: adjacency.row_of(id),
            column: adjacency.column_of(id),
            kind: adjacency.kind(id),
            neighbors: adjacency.neighbors(id),
            treasure: self.treasure.clone(),
            arrows: self.arrows,
            occupant: self.occupant,
            pit: self.pit,
            thief: self.thief,
            visited: self.visited,
        }
    }

    /// Reports whether a stationary monster with health left lives here.
    pub(crate) fn has_live_stationary(&self) -> bool {
        self.occupant
            .is_some_and(|creature| creature.is_live_stationary())
    }
}
