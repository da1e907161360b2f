//! Proximity signals derived from graph distance to hazards.

use std::collections::BTreeSet;

use dungeon_core::{Adjacency, CellId, Smell, Soil};

/// Grades the odour of live stationary monsters around `cell`.
///
/// A monster next door is always overwhelming. Otherwise the distinct
/// monsters found among the neighbours' neighbours decide: one is faint, two
/// or more are as strong as an adjacent one.
pub(crate) fn smell<F>(adjacency: &Adjacency, cell: CellId, mut has_monster: F) -> Smell
where
    F: FnMut(CellId) -> bool,
{
    let neighbors = adjacency.neighbors(cell);
    if neighbors.iter().any(|(_, next)| has_monster(next)) {
        return Smell::High;
    }

    let mut distant = BTreeSet::new();
    for (_, next) in neighbors.iter() {
        for (_, beyond) in adjacency.neighbors(next).iter() {
            if has_monster(beyond) {
                let _ = distant.insert(beyond);
            }
        }
    }

    match distant.len() {
        0 => Smell::None,
        1 => Smell::Low,
        _ => Smell::High,
    }
}

/// Grades the ground around `cell` by how close the nearest pit is.
pub(crate) fn soil<F>(adjacency: &Adjacency, cell: CellId, mut has_pit: F) -> Soil
where
    F: FnMut(CellId) -> bool,
{
    let neighbors = adjacency.neighbors(cell);
    if neighbors.iter().any(|(_, next)| has_pit(next)) {
        return Soil::Dense;
    }
    let porous = neighbors.iter().any(|(_, next)| {
        adjacency
            .neighbors(next)
            .iter()
            .any(|(_, beyond)| has_pit(beyond))
    });
    if porous {
        Soil::Porous
    } else {
        Soil::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_core::Direction;

    fn corridor(length: u32) -> Adjacency {
        let mut adjacency = Adjacency::new(1, length, false);
        for id in 1..length {
            adjacency.link(CellId::new(id - 1), Direction::East, CellId::new(id));
        }
        adjacency
    }

    #[test]
    fn smell_fades_with_distance() {
        let adjacency = corridor(6);
        let at = |target: u32| move |cell: CellId| cell.get() == target;
        assert_eq!(smell(&adjacency, CellId::new(0), at(1)), Smell::High);
        assert_eq!(smell(&adjacency, CellId::new(0), at(2)), Smell::Low);
        assert_eq!(smell(&adjacency, CellId::new(0), at(3)), Smell::None);
    }

    #[test]
    fn two_distant_monsters_smell_strongly() {
        let adjacency = corridor(5);
        let monsters = |cell: CellId| cell.get() == 0 || cell.get() == 4;
        assert_eq!(smell(&adjacency, CellId::new(2), monsters), Smell::High);
    }

    #[test]
    fn soil_tracks_the_nearest_pit() {
        let adjacency = corridor(6);
        let pit = |cell: CellId| cell.get() == 5;
        assert_eq!(soil(&adjacency, CellId::new(4), pit), Soil::Dense);
        assert_eq!(soil(&adjacency, CellId::new(3), pit), Soil::Porous);
        assert_eq!(soil(&adjacency, CellId::new(2), pit), Soil::None);
    }
}
