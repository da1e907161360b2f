#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and the pure generation systems. Adapters submit [`Command`] values
//! describing what the player wants to do, the world executes those commands
//! via its `apply` entry point, and then reports [`Event`] values describing
//! everything that happened. Systems read the immutable [`Adjacency`] and
//! snapshot types defined here and respond with placement plans or reports.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health every creature and the player start with.
pub const FULL_HEALTH: i32 = 100;

/// Arrows carried by a freshly created player.
pub const STARTING_ARROWS: u32 = 3;

/// Unique identifier of a location, equal to `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the cell inside dense per-cell vectors.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cardinal directions linking neighbouring locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Canonical iteration order used wherever a deterministic choice is needed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Single-letter code used by text adapters.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    /// Parses one of the four cardinal letters, ignoring case and surrounding whitespace.
    pub fn from_letter(value: &str) -> Result<Self, CommandError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Self::North),
            "S" => Ok(Self::South),
            "E" => Ok(Self::East),
            "W" => Ok(Self::West),
            _ => Err(CommandError::InvalidDirection(value.to_owned())),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }
}

impl FromStr for Direction {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_letter(value)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        };
        f.write_str(name)
    }
}

/// Classification of a location derived from its neighbour count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// Any location that does not have exactly two neighbours.
    Cave,
    /// A location with exactly two neighbours; only ever holds arrows.
    Tunnel,
}

impl LocationKind {
    /// Classifies a location from the number of linked neighbours.
    #[must_use]
    pub const fn from_degree(degree: usize) -> Self {
        if degree == 2 {
            Self::Tunnel
        } else {
            Self::Cave
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cave => f.write_str("Cave"),
            Self::Tunnel => f.write_str("Tunnel"),
        }
    }
}

/// Kinds of treasure that can be found in caves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreasureKind {
    /// A diamond.
    Diamond,
    /// A ruby.
    Ruby,
    /// A sapphire.
    Sapphire,
}

impl TreasureKind {
    /// A full bundle holds one unit of every treasure kind.
    pub const BUNDLE: [TreasureKind; 3] = [
        TreasureKind::Diamond,
        TreasureKind::Ruby,
        TreasureKind::Sapphire,
    ];
}

impl fmt::Display for TreasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diamond => f.write_str("Diamond"),
            Self::Ruby => f.write_str("Ruby"),
            Self::Sapphire => f.write_str("Sapphire"),
        }
    }
}

/// Behaviour class of a hazardous creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    /// Fixed-position monster that eats intruders and can be shot.
    Stationary,
    /// Roaming monster engaged through hand-to-hand combat.
    Mobile,
}

/// Hazardous creature occupying a single location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creature {
    kind: CreatureKind,
    health: i32,
}

impl Creature {
    /// Creates a creature of the given kind at full health.
    #[must_use]
    pub const fn new(kind: CreatureKind) -> Self {
        Self {
            kind,
            health: FULL_HEALTH,
        }
    }

    /// Kind fixed at creation.
    #[must_use]
    pub const fn kind(&self) -> CreatureKind {
        self.kind
    }

    /// Remaining health; zero or below means dead.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Reports whether the creature still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Reports whether this is a stationary monster that is still alive.
    #[must_use]
    pub fn is_live_stationary(&self) -> bool {
        self.kind == CreatureKind::Stationary && self.is_alive()
    }

    /// Subtracts `damage` from the creature's health without clamping.
    pub fn hit(&mut self, damage: i32) {
        self.health -= damage;
    }
}

/// Direction-keyed links from one location to its neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighbors {
    slots: [Option<CellId>; 4],
}

impl Neighbors {
    /// Neighbour reached by travelling in `direction`, if linked.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Option<CellId> {
        self.slots[direction.slot()]
    }

    /// Links `cell` in the provided direction, replacing any previous link.
    pub fn insert(&mut self, direction: Direction, cell: CellId) {
        self.slots[direction.slot()] = Some(cell);
    }

    /// Number of linked neighbours.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Linked neighbours in canonical North, South, East, West order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, CellId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|cell| (direction, cell)))
    }

    /// Directions that lead somewhere, in canonical order.
    #[must_use]
    pub fn directions(&self) -> Vec<Direction> {
        self.iter().map(|(direction, _)| direction).collect()
    }
}

/// Flat adjacency structure indexed by [`CellId`].
///
/// Links are stored independently on both endpoints. [`Adjacency::link`] is
/// the only mutator and always writes both sides, so a link from `a` to `b`
/// heading East implies a link from `b` to `a` heading West.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    rows: u32,
    columns: u32,
    wrapping: bool,
    cells: Vec<Neighbors>,
}

impl Adjacency {
    /// Creates an adjacency for a `rows` by `columns` grid with no links.
    #[must_use]
    pub fn new(rows: u32, columns: u32, wrapping: bool) -> Self {
        let count = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        Self {
            rows,
            columns,
            wrapping,
            cells: vec![Neighbors::default(); count],
        }
    }

    /// Links `from` to `to` in `direction` and `to` back to `from` in the opposite direction.
    pub fn link(&mut self, from: CellId, direction: Direction, to: CellId) {
        if let Some(neighbors) = self.cells.get_mut(from.index()) {
            neighbors.insert(direction, to);
        }
        if let Some(neighbors) = self.cells.get_mut(to.index()) {
            neighbors.insert(direction.opposite(), from);
        }
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the grid edges were allowed to wrap around.
    #[must_use]
    pub const fn wrapping(&self) -> bool {
        self.wrapping
    }

    /// Total number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid holds no locations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over every cell identifier in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(|index| CellId::new(index as u32))
    }

    /// Links of a single cell; empty for identifiers outside the grid.
    #[must_use]
    pub fn neighbors(&self, cell: CellId) -> Neighbors {
        self.cells.get(cell.index()).copied().unwrap_or_default()
    }

    /// Neighbour of `cell` in `direction`, if linked.
    #[must_use]
    pub fn neighbor(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        self.neighbors(cell).get(direction)
    }

    /// Classification of `cell` derived from its degree.
    #[must_use]
    pub fn kind(&self, cell: CellId) -> LocationKind {
        LocationKind::from_degree(self.neighbors(cell).degree())
    }

    /// Row containing `cell`.
    #[must_use]
    pub fn row_of(&self, cell: CellId) -> u32 {
        if self.columns == 0 {
            0
        } else {
            cell.get() / self.columns
        }
    }

    /// Column containing `cell`.
    #[must_use]
    pub fn column_of(&self, cell: CellId) -> u32 {
        if self.columns == 0 {
            0
        } else {
            cell.get() % self.columns
        }
    }

    /// Total number of undirected links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.cells.iter().map(Neighbors::degree).sum::<usize>() / 2
    }

    /// Verifies that every stored link has a matching reverse link.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.cells().all(|cell| {
            self.neighbors(cell)
                .iter()
                .all(|(direction, other)| self.neighbor(other, direction.opposite()) == Some(cell))
        })
    }
}

/// Parameters collected by an external settings source to generate a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of grid rows; at least one.
    pub rows: u32,
    /// Number of grid columns; at least one.
    pub columns: u32,
    /// Extra non-spanning-tree links added back into the maze.
    pub interconnectivity: u32,
    /// Base treasure percentage in `0..=100`; re-randomized upward at generation.
    pub treasure_percent: u32,
    /// Whether grid borders connect to the opposite border.
    pub wrapping: bool,
    /// Stationary monsters including the one guarding the goal; at least one.
    pub stationary_monsters: u32,
    /// Thieves present each turn.
    pub thieves: u32,
    /// Pits placed once at generation.
    pub pits: u32,
    /// Mobile monsters placed each turn.
    pub mobile_monsters: u32,
}

impl WorldConfig {
    /// Checks the construction-validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 1 {
            return Err(ConfigError::InvalidRows(self.rows));
        }
        if self.columns < 1 {
            return Err(ConfigError::InvalidColumns(self.columns));
        }
        if self.stationary_monsters < 1 {
            return Err(ConfigError::InvalidMonsterCount(self.stationary_monsters));
        }
        if self.treasure_percent > 100 {
            return Err(ConfigError::InvalidTreasurePercent(self.treasure_percent));
        }
        Ok(())
    }

    /// Number of locations the grid will contain.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 7,
            interconnectivity: 2,
            treasure_percent: 25,
            wrapping: false,
            stationary_monsters: 5,
            thieves: 1,
            pits: 1,
            mobile_monsters: 1,
        }
    }
}

/// Reasons a world configuration is rejected before generation starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid needs at least one row.
    #[error("rows entered ({0}) is not correct, at least 1 is required")]
    InvalidRows(u32),
    /// The grid needs at least one column.
    #[error("columns entered ({0}) is not correct, at least 1 is required")]
    InvalidColumns(u32),
    /// At least the goal monster must be requested.
    #[error("monster count entered ({0}) is not correct, at least 1 is required")]
    InvalidMonsterCount(u32),
    /// Treasure percentages live in `0..=100`.
    #[error("treasure percent {0} is invalid, should be between 0 and 100")]
    InvalidTreasurePercent(u32),
}

/// Reasons a player command is rejected without touching the world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The direction was not one of `N`, `S`, `E`, `W`.
    #[error("invalid direction {0:?}, expected one of N, S, E, W")]
    InvalidDirection(String),
    /// Arrows must travel at least one cave.
    #[error("distance should be at least 1, got {0}")]
    InvalidDistance(i32),
    /// The player already died or reached the goal.
    #[error("the game is over, restart to play again")]
    GameOver,
}

/// Commands that express every permissible player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the player one location in the given direction.
    Move {
        /// Direction of travel.
        direction: Direction,
    },
    /// Collects every arrow lying at the player's location.
    PickArrow,
    /// Collects the treasure bundle at the player's location.
    PickTreasure,
    /// Fires one arrow that travels `distance` caves.
    Shoot {
        /// Number of caves the arrow should cross; must be positive.
        distance: i32,
        /// Initial direction of flight.
        direction: Direction,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// No neighbour exists in the requested direction; nothing changed.
    MoveBlocked {
        /// Direction the player asked for.
        direction: Direction,
    },
    /// The player stepped into a neighbouring location.
    PlayerMoved {
        /// Location the player left.
        from: CellId,
        /// Location the player entered.
        to: CellId,
    },
    /// A thief lurks in the entered location.
    ThiefEncountered {
        /// Location holding the thief.
        cell: CellId,
    },
    /// The thief emptied the player's treasure.
    TreasureStolen {
        /// Number of treasure units taken.
        count: usize,
    },
    /// The thief found nothing to take.
    NothingToSteal,
    /// The player fell into a pit and died.
    FellIntoPit {
        /// Location holding the pit.
        cell: CellId,
    },
    /// A stationary monster ate the player.
    EatenByMonster {
        /// Location of the monster.
        cell: CellId,
    },
    /// The player slipped past an injured stationary monster.
    EscapedInjuredMonster {
        /// Location of the monster.
        cell: CellId,
    },
    /// A mobile monster forced the player into hand-to-hand combat.
    MeleeStarted {
        /// Location of the fight.
        cell: CellId,
    },
    /// The mobile monster landed a blow.
    PlayerStruck {
        /// Damage dealt to the player.
        damage: i32,
        /// Player health after the blow.
        health: i32,
    },
    /// The player landed a blow on the mobile monster.
    MonsterStruck {
        /// Damage dealt to the monster.
        damage: i32,
        /// Monster health after the blow.
        health: i32,
    },
    /// The player won the fight; the mobile monster is gone.
    MobileMonsterSlain {
        /// Location of the fight.
        cell: CellId,
    },
    /// The player lost the fight.
    PlayerSlain {
        /// Location of the fight.
        cell: CellId,
    },
    /// The player arrived alive at the goal.
    GoalReached {
        /// Goal location.
        cell: CellId,
    },
    /// Arrows were collected.
    ArrowsPicked {
        /// Arrows taken from the location.
        count: u32,
        /// Arrows the player now carries.
        total: u32,
    },
    /// There were no arrows to collect.
    NoArrowsHere,
    /// A treasure bundle was collected.
    TreasurePicked {
        /// Treasure units taken from the location.
        items: Vec<TreasureKind>,
    },
    /// There was no treasure to collect.
    NoTreasureHere,
    /// The player has no arrows left to shoot.
    OutOfArrows,
    /// The arrow hit a wall before covering its distance.
    ArrowLost,
    /// The arrow landed in a location without a live stationary monster.
    ArrowMissed {
        /// Location where the arrow stopped.
        cell: CellId,
    },
    /// The arrow wounded a stationary monster.
    MonsterInjured {
        /// Location of the monster.
        cell: CellId,
        /// Health left after the hit.
        health: i32,
    },
    /// The arrow killed a stationary monster.
    MonsterKilled {
        /// Location of the monster.
        cell: CellId,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveBlocked { direction } => {
                write!(f, "Move {} not possible", direction.letter())
            }
            Self::PlayerMoved { to, .. } => {
                write!(f, "Player moved successfully to location {to}")
            }
            Self::ThiefEncountered { .. } => f.write_str("Thief in the cave."),
            Self::TreasureStolen { .. } => f.write_str(
                "Thief stole all treasures of the player, player has no treasure",
            ),
            Self::NothingToSteal => f.write_str("Player has no treasure to steal"),
            Self::FellIntoPit { .. } => f.write_str(
                "Pit in the cave! Ohhh nooo, player died by falling into the pit",
            ),
            Self::EatenByMonster { .. } => f.write_str(
                "Monster in the cave! Chomp, chomp, chomp, player got eaten. Better luck next time",
            ),
            Self::EscapedInjuredMonster { cell } => write!(
                f,
                "Player escaped successfully from an injured monster at location {cell}"
            ),
            Self::MeleeStarted { .. } => {
                f.write_str("Mobile monster encountered in the cave, player has to fight.")
            }
            Self::PlayerStruck { damage, .. } => {
                write!(f, "Monster hits player, damage by: {damage}")
            }
            Self::MonsterStruck { damage, .. } => {
                write!(f, "Player hits monster, damage by: {damage}")
            }
            Self::MobileMonsterSlain { .. } => f.write_str("Player killed the mobile monster"),
            Self::PlayerSlain { .. } => f.write_str("Game over! Player got killed"),
            Self::GoalReached { cell } => {
                write!(f, "Player has reached the destination location {cell}")
            }
            Self::ArrowsPicked { count, .. } => write!(f, "Arrow picked up ({count})"),
            Self::NoArrowsHere => f.write_str("No arrow present at the location"),
            Self::TreasurePicked { .. } => f.write_str("Treasure picked up"),
            Self::NoTreasureHere => f.write_str("No treasure present at the location"),
            Self::OutOfArrows => f.write_str("You are out of arrows, explore to find more"),
            Self::ArrowLost => f.write_str("You shot an arrow into the darkness"),
            Self::ArrowMissed { .. } => f.write_str("Player shot an arrow into the darkness"),
            Self::MonsterInjured { .. } => {
                f.write_str("Player shot the monster, monster is injured")
            }
            Self::MonsterKilled { .. } => {
                f.write_str("Player shot the monster, monster has been killed")
            }
        }
    }
}

/// Joins the messages of `events` into a single human-readable report.
#[must_use]
pub fn narrate(events: &[Event]) -> String {
    events
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lifecycle state of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Alive and still looking for the goal.
    Exploring,
    /// Alive on the goal location.
    Won,
    /// Killed by a pit or a monster.
    Dead,
}

impl GameStatus {
    /// Reports whether no further commands are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Exploring)
    }
}

/// Strength of the odour given off by nearby stationary monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Smell {
    /// No live stationary monster within two steps.
    None,
    /// Exactly one live stationary monster two steps away.
    Low,
    /// A live stationary monster next door, or several two steps away.
    High,
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Odourless"),
            Self::Low => f.write_str("Less pungent"),
            Self::High => f.write_str("Highly pungent"),
        }
    }
}

/// Texture of the ground hinting at nearby pits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Soil {
    /// No pit within two steps.
    None,
    /// A pit two steps away.
    Porous,
    /// A pit next door.
    Dense,
}

impl fmt::Display for Soil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Normal"),
            Self::Porous => f.write_str("Porous"),
            Self::Dense => f.write_str("Dense"),
        }
    }
}

/// Immutable representation of a single location used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    /// Identifier of the location.
    pub id: CellId,
    /// Row containing the location.
    pub row: u32,
    /// Column containing the location.
    pub column: u32,
    /// Cave or tunnel classification.
    pub kind: LocationKind,
    /// Direction-keyed links to neighbouring locations.
    pub neighbors: Neighbors,
    /// Treasure lying in the location.
    pub treasure: Vec<TreasureKind>,
    /// Arrows lying in the location.
    pub arrows: u32,
    /// Creature occupying the location, alive or not.
    pub occupant: Option<Creature>,
    /// Whether the location holds a pit.
    pub pit: bool,
    /// Whether a thief lurks in the location.
    pub thief: bool,
    /// Whether the player has been here.
    pub visited: bool,
}

impl LocationSnapshot {
    /// Reports whether a live stationary monster occupies the location.
    #[must_use]
    pub fn has_live_stationary(&self) -> bool {
        self.occupant
            .is_some_and(|creature| creature.is_live_stationary())
    }
}

impl fmt::Display for LocationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " - Location Description - ")?;
        writeln!(f, "{} {} ({}, {})", self.kind, self.id, self.row, self.column)?;
        if self.treasure.is_empty() {
            writeln!(f, "The {} has no treasures", self.kind)?;
        } else {
            writeln!(f, "Treasures:")?;
            for item in &self.treasure {
                writeln!(f, "  {item}")?;
            }
        }
        if self.arrows > 0 {
            write!(f, "Arrows: {}", self.arrows)
        } else {
            write!(f, "There are no arrows at the current location")
        }
    }
}

/// Immutable representation of the player handed to presentation layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Location the player currently occupies.
    pub location: CellId,
    /// Treasure collected so far, in pickup order.
    pub treasure: Vec<TreasureKind>,
    /// Arrows carried.
    pub arrows: u32,
    /// Remaining health; zero or below means dead.
    pub health: i32,
}

impl PlayerSnapshot {
    /// Treasure units grouped by kind.
    #[must_use]
    pub fn treasure_tally(&self) -> BTreeMap<TreasureKind, usize> {
        let mut tally = BTreeMap::new();
        for item in &self.treasure {
            *tally.entry(*item).or_insert(0) += 1;
        }
        tally
    }
}

impl fmt::Display for PlayerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " - Player Description - ")?;
        writeln!(f, "Current location: {}", self.location)?;
        writeln!(f, "Health: {}", self.health)?;
        let tally = self.treasure_tally();
        if tally.is_empty() {
            writeln!(f, "Player has no treasure")?;
        } else {
            writeln!(f, "Treasure:")?;
            for (kind, count) in tally {
                writeln!(f, "  {kind}: {count}")?;
            }
        }
        if self.arrows > 0 {
            write!(f, "Arrows: {}", self.arrows)
        } else {
            write!(f, "Player has no arrows")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        narrate, Adjacency, CellId, CommandError, ConfigError, Creature, CreatureKind, Direction,
        Event, LocationKind, PlayerSnapshot, TreasureKind, WorldConfig,
    };

    #[test]
    fn direction_letters_parse_case_insensitively() {
        assert_eq!(Direction::from_letter("n"), Ok(Direction::North));
        assert_eq!(Direction::from_letter(" S "), Ok(Direction::South));
        assert_eq!("e".parse::<Direction>(), Ok(Direction::East));
        assert_eq!(Direction::from_letter("W"), Ok(Direction::West));
    }

    #[test]
    fn unknown_direction_letters_are_rejected() {
        assert_eq!(
            Direction::from_letter("X"),
            Err(CommandError::InvalidDirection("X".to_owned()))
        );
        assert!(Direction::from_letter("").is_err());
        assert!(Direction::from_letter("NE").is_err());
    }

    #[test]
    fn link_writes_both_sides() {
        let mut adjacency = Adjacency::new(2, 2, false);
        adjacency.link(CellId::new(0), Direction::East, CellId::new(1));
        adjacency.link(CellId::new(0), Direction::South, CellId::new(2));

        assert_eq!(
            adjacency.neighbor(CellId::new(1), Direction::West),
            Some(CellId::new(0))
        );
        assert_eq!(
            adjacency.neighbor(CellId::new(2), Direction::North),
            Some(CellId::new(0))
        );
        assert_eq!(adjacency.link_count(), 2);
        assert!(adjacency.is_symmetric());
        assert_eq!(adjacency.kind(CellId::new(0)), LocationKind::Tunnel);
        assert_eq!(adjacency.kind(CellId::new(3)), LocationKind::Cave);
    }

    #[test]
    fn neighbors_iterate_in_canonical_order() {
        let mut adjacency = Adjacency::new(3, 3, false);
        let centre = CellId::new(4);
        adjacency.link(centre, Direction::West, CellId::new(3));
        adjacency.link(centre, Direction::North, CellId::new(1));
        adjacency.link(centre, Direction::East, CellId::new(5));

        assert_eq!(
            adjacency.neighbors(centre).directions(),
            vec![Direction::North, Direction::East, Direction::West]
        );
    }

    #[test]
    fn stationary_creature_tracks_health() {
        let mut creature = Creature::new(CreatureKind::Stationary);
        assert!(creature.is_live_stationary());
        creature.hit(50);
        assert_eq!(creature.health(), 50);
        creature.hit(50);
        assert!(!creature.is_alive());
        assert!(!creature.is_live_stationary());
    }

    #[test]
    fn config_validation_rejects_out_of_range_values() {
        let valid = WorldConfig::default();
        assert_eq!(valid.validate(), Ok(()));

        let rows = WorldConfig {
            rows: 0,
            ..WorldConfig::default()
        };
        assert_eq!(rows.validate(), Err(ConfigError::InvalidRows(0)));

        let percent = WorldConfig {
            treasure_percent: 110,
            ..WorldConfig::default()
        };
        assert_eq!(
            percent.validate(),
            Err(ConfigError::InvalidTreasurePercent(110))
        );

        let monsters = WorldConfig {
            stationary_monsters: 0,
            ..WorldConfig::default()
        };
        assert_eq!(
            monsters.validate(),
            Err(ConfigError::InvalidMonsterCount(0))
        );
    }

    #[test]
    fn narrate_joins_event_messages() {
        let events = vec![
            Event::ThiefEncountered {
                cell: CellId::new(8),
            },
            Event::NothingToSteal,
        ];
        assert_eq!(
            narrate(&events),
            "Thief in the cave.\nPlayer has no treasure to steal"
        );
    }

    #[test]
    fn player_description_groups_treasure() {
        let player = PlayerSnapshot {
            location: CellId::new(3),
            treasure: vec![
                TreasureKind::Ruby,
                TreasureKind::Diamond,
                TreasureKind::Ruby,
            ],
            arrows: 0,
            health: 100,
        };
        let tally = player.treasure_tally();
        assert_eq!(tally.get(&TreasureKind::Ruby), Some(&2));
        assert_eq!(tally.get(&TreasureKind::Diamond), Some(&1));

        let description = player.to_string();
        assert!(description.contains("Ruby: 2"));
        assert!(description.contains("Player has no arrows"));
    }

    #[test]
    fn adjacency_survives_bincode() {
        let mut adjacency = Adjacency::new(1, 3, false);
        adjacency.link(CellId::new(0), Direction::East, CellId::new(1));
        adjacency.link(CellId::new(1), Direction::East, CellId::new(2));

        let bytes = bincode::serialize(&adjacency).expect("serialize");
        let restored: Adjacency = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, adjacency);
    }
}
