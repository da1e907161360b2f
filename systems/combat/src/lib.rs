#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat system resolving arrows, stationary monsters and melee fights.
//!
//! Every function here is pure: it reads the adjacency and creature values it
//! is handed, draws from the provided [`RandomSource`] and reports what should
//! happen. Applying the outcome to the world is left to the caller.

use dungeon_core::{Adjacency, CellId, Creature, Direction, Event, LocationKind, FULL_HEALTH};
use dungeon_random::RandomSource;
use tracing::{debug, trace};

/// Damage a single arrow deals to a stationary monster.
pub const ARROW_DAMAGE: i32 = 50;
/// Smallest damage dealt by a melee strike.
pub const MIN_STRIKE: i32 = 30;
/// Exclusive upper bound on melee strike damage.
pub const MAX_STRIKE: i32 = 100;

/// Where a fired arrow ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowFlight {
    /// The arrow hit a wall before covering its distance.
    Lost,
    /// The arrow covered its distance and stopped in this cell.
    Landed(CellId),
}

/// Follows an arrow fired from `from` that must cross `distance` caves.
///
/// Tunnels do not count toward the distance. An arrow entering a tunnel bends
/// toward the first exit, in North, South, East, West order, that does not
/// lead straight back.
#[must_use]
pub fn trace_arrow(
    adjacency: &Adjacency,
    from: CellId,
    direction: Direction,
    distance: u32,
) -> ArrowFlight {
    let mut position = from;
    let mut heading = direction;
    let mut remaining = distance;

    while remaining > 0 {
        let Some(next) = adjacency.neighbor(position, heading) else {
            return ArrowFlight::Lost;
        };
        position = next;
        trace!(cell = position.get(), heading = %heading, remaining, "arrow_step");

        if adjacency.kind(position) == LocationKind::Cave {
            remaining -= 1;
            continue;
        }

        let back = heading.opposite();
        if let Some((exit, _)) = adjacency
            .neighbors(position)
            .iter()
            .find(|(exit, _)| *exit != back)
        {
            heading = exit;
        }
    }

    ArrowFlight::Landed(position)
}

/// Result of an arrow reaching its final cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The arrow never reached its distance.
    Lost,
    /// Nothing alive stood in the landing cell.
    Missed {
        /// Landing cell.
        cell: CellId,
    },
    /// A stationary monster survived the hit.
    Injured {
        /// Landing cell.
        cell: CellId,
        /// Monster health after the hit.
        health: i32,
    },
    /// A stationary monster died from the hit.
    Killed {
        /// Landing cell.
        cell: CellId,
        /// Monster health after the hit.
        health: i32,
    },
}

impl ShotOutcome {
    /// Event reporting this outcome to the player.
    #[must_use]
    pub fn event(&self) -> Event {
        match *self {
            Self::Lost => Event::ArrowLost,
            Self::Missed { cell } => Event::ArrowMissed { cell },
            Self::Injured { cell, health } => Event::MonsterInjured { cell, health },
            Self::Killed { cell, .. } => Event::MonsterKilled { cell },
        }
    }

    /// Reports whether the arrow struck a monster.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Injured { .. } | Self::Killed { .. })
    }
}

/// Decides what an arrow does to the occupant of the cell it landed in.
///
/// Only live stationary monsters can be hit; for anything else the shot
/// misses.
#[must_use]
pub fn resolve_shot(flight: ArrowFlight, occupant: Option<Creature>) -> ShotOutcome {
    let ArrowFlight::Landed(cell) = flight else {
        return ShotOutcome::Lost;
    };
    match occupant {
        Some(mut creature) if creature.is_live_stationary() => {
            creature.hit(ARROW_DAMAGE);
            if creature.is_alive() {
                ShotOutcome::Injured {
                    cell,
                    health: creature.health(),
                }
            } else {
                ShotOutcome::Killed {
                    cell,
                    health: creature.health(),
                }
            }
        }
        _ => ShotOutcome::Missed { cell },
    }
}

/// What happens when the player walks into a stationary monster's cave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encounter {
    /// The monster ate the player.
    Eaten,
    /// The player slipped past an injured monster.
    Escaped,
    /// The monster is dead; nothing happens.
    Passed,
}

/// Resolves arrival in a cave guarded by a stationary monster.
///
/// One coin flip is drawn on every arrival. A healthy monster always eats the
/// player, an injured one only on an odd flip, and a dead one is harmless.
pub fn confront_stationary(monster: Creature, source: &mut dyn RandomSource) -> Encounter {
    let flip = source.next_in(0, 2);
    let outcome = if monster.health() >= FULL_HEALTH {
        Encounter::Eaten
    } else if !monster.is_alive() {
        Encounter::Passed
    } else if flip % 2 != 0 {
        Encounter::Eaten
    } else {
        Encounter::Escaped
    };
    debug!(health = monster.health(), flip, ?outcome, "stationary_encounter");
    outcome
}

/// Which side survived a melee fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeleeOutcome {
    /// The mobile monster died and the player lives.
    Victory,
    /// The player died.
    Defeat,
}

/// Full account of a melee fight against a mobile monster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeleeReport {
    /// Who won.
    pub outcome: MeleeOutcome,
    /// Player health when the fight ended.
    pub player_health: i32,
    /// Monster health when the fight ended.
    pub monster_health: i32,
    /// Number of rounds fought.
    pub rounds: u32,
    /// Every blow in order, bracketed by the start and end of the fight.
    pub events: Vec<Event>,
}

/// Fights a mobile monster to the death.
///
/// A draw from `20..30` decides the order: on an even draw the monster strikes
/// first in every round. Each strike draws its damage from `30..100`, and a
/// strike always deals at least one point so the fight is bound to end. The
/// monster only strikes while alive; the player's strike closes every round.
pub fn melee(
    cell: CellId,
    player_health: i32,
    monster: Creature,
    source: &mut dyn RandomSource,
) -> MeleeReport {
    let mut events = vec![Event::MeleeStarted { cell }];
    let mut player = player_health;
    let mut foe = monster;
    let mut rounds = 0;
    let monster_first = source.next_in(20, 30) % 2 == 0;

    while player > 0 && foe.is_alive() {
        rounds += 1;
        if monster_first {
            monster_turn(&foe, &mut player, source, &mut events);
            player_turn(&mut foe, source, &mut events);
        } else {
            player_turn(&mut foe, source, &mut events);
            monster_turn(&foe, &mut player, source, &mut events);
        }
    }

    let outcome = if player <= 0 {
        events.push(Event::PlayerSlain { cell });
        MeleeOutcome::Defeat
    } else {
        events.push(Event::MobileMonsterSlain { cell });
        MeleeOutcome::Victory
    };
    debug!(
        cell = cell.get(),
        rounds,
        player_health = player,
        monster_health = foe.health(),
        ?outcome,
        "melee_resolved"
    );

    MeleeReport {
        outcome,
        player_health: player,
        monster_health: foe.health(),
        rounds,
        events,
    }
}

fn strike(source: &mut dyn RandomSource) -> i32 {
    source.next_in(MIN_STRIKE, MAX_STRIKE).max(1)
}

fn monster_turn(
    foe: &Creature,
    player: &mut i32,
    source: &mut dyn RandomSource,
    events: &mut Vec<Event>,
) {
    if !foe.is_alive() {
        return;
    }
    let damage = strike(source);
    *player -= damage;
    events.push(Event::PlayerStruck {
        damage,
        health: *player,
    });
}

fn player_turn(foe: &mut Creature, source: &mut dyn RandomSource, events: &mut Vec<Event>) {
    let damage = strike(source);
    foe.hit(damage);
    events.push(Event::MonsterStruck {
        damage,
        health: foe.health(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::CreatureKind;
    use dungeon_random::FixedSource;

    #[test]
    fn healthy_stationary_monsters_always_eat() {
        let monster = Creature::new(CreatureKind::Stationary);
        assert_eq!(
            confront_stationary(monster, &mut FixedSource::new(0)),
            Encounter::Eaten
        );
    }

    #[test]
    fn injured_stationary_monsters_follow_the_coin() {
        let mut monster = Creature::new(CreatureKind::Stationary);
        monster.hit(ARROW_DAMAGE);
        assert_eq!(
            confront_stationary(monster, &mut FixedSource::new(0)),
            Encounter::Escaped
        );
        assert_eq!(
            confront_stationary(monster, &mut FixedSource::new(1)),
            Encounter::Eaten
        );
        monster.hit(ARROW_DAMAGE);
        assert_eq!(
            confront_stationary(monster, &mut FixedSource::new(1)),
            Encounter::Passed
        );
    }

    #[test]
    fn shots_only_hurt_live_stationary_monsters() {
        let cell = CellId::new(4);
        let mut monster = Creature::new(CreatureKind::Stationary);
        let first = resolve_shot(ArrowFlight::Landed(cell), Some(monster));
        assert_eq!(first, ShotOutcome::Injured { cell, health: 50 });
        assert!(first.is_hit());

        monster.hit(ARROW_DAMAGE);
        let second = resolve_shot(ArrowFlight::Landed(cell), Some(monster));
        assert_eq!(second, ShotOutcome::Killed { cell, health: 0 });
        assert!(second.is_hit());

        monster.hit(ARROW_DAMAGE);
        assert_eq!(
            resolve_shot(ArrowFlight::Landed(cell), Some(monster)),
            ShotOutcome::Missed { cell }
        );
        assert_eq!(
            resolve_shot(
                ArrowFlight::Landed(cell),
                Some(Creature::new(CreatureKind::Mobile))
            ),
            ShotOutcome::Missed { cell }
        );
        assert_eq!(resolve_shot(ArrowFlight::Lost, None), ShotOutcome::Lost);
    }

    #[test]
    fn degenerate_damage_still_ends_the_fight() {
        let report = melee(
            CellId::new(0),
            100,
            Creature::new(CreatureKind::Mobile),
            &mut FixedSource::new(0),
        );
        assert_eq!(report.rounds, 100);
        assert_eq!(report.outcome, MeleeOutcome::Defeat);
    }
}
