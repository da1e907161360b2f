#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze generation system that turns a grid into a connected adjacency.
//!
//! The builder lists every candidate link between grid neighbours, weighs
//! them randomly, keeps a spanning tree chosen by Kruskal's algorithm and then
//! re-adds a configurable number of the discarded links to create loops.

use dungeon_core::{Adjacency, CellId, Direction};
use dungeon_random::{shuffled, RandomSource};
use thiserror::Error;
use tracing::debug;

/// Smallest weight a candidate link may receive.
pub const MIN_WEIGHT: i32 = 3;
/// Exclusive upper bound on candidate link weights.
pub const MAX_WEIGHT: i32 = 9;

/// Failures raised while building the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// More extra links were requested than the grid leaves outside the spanning tree.
    #[error("interconnectivity {requested} is too high, at most {available} extra links exist")]
    InterconnectivityTooHigh {
        /// Extra links requested.
        requested: u32,
        /// Links left over after building the spanning tree.
        available: usize,
    },
}

/// Candidate link between two grid neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    source: CellId,
    destination: CellId,
    direction: Direction,
    weight: i32,
}

impl Edge {
    /// Creates a link from `source` heading `direction` to `destination`.
    #[must_use]
    pub const fn new(source: CellId, direction: Direction, destination: CellId, weight: i32) -> Self {
        Self {
            source,
            destination,
            direction,
            weight,
        }
    }

    /// Cell the link starts from.
    #[must_use]
    pub const fn source(&self) -> CellId {
        self.source
    }

    /// Cell the link leads to.
    #[must_use]
    pub const fn destination(&self) -> CellId {
        self.destination
    }

    /// Direction of travel from the source to the destination.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Random weight used to order links for Kruskal's algorithm.
    #[must_use]
    pub const fn weight(&self) -> i32 {
        self.weight
    }
}

/// Dimensions and connectivity of the maze to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rows: u32,
    columns: u32,
    interconnectivity: u32,
    wrapping: bool,
}

impl Config {
    /// Creates a configuration for a `rows` by `columns` grid.
    #[must_use]
    pub const fn new(rows: u32, columns: u32, interconnectivity: u32, wrapping: bool) -> Self {
        Self {
            rows,
            columns,
            interconnectivity,
            wrapping,
        }
    }

    fn cell_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }
}

/// Result of a maze build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    adjacency: Adjacency,
    spanning_links: usize,
    extra_links: usize,
}

impl Maze {
    /// Direction-keyed links of every cell.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Consumes the maze and yields its adjacency.
    #[must_use]
    pub fn into_adjacency(self) -> Adjacency {
        self.adjacency
    }

    /// Number of links belonging to the spanning tree.
    #[must_use]
    pub const fn spanning_links(&self) -> usize {
        self.spanning_links
    }

    /// Number of links added on top of the spanning tree.
    #[must_use]
    pub const fn extra_links(&self) -> usize {
        self.extra_links
    }
}

/// Builds a connected maze for the provided configuration.
pub fn build(config: Config, source: &mut dyn RandomSource) -> Result<Maze, MazeError> {
    let candidates = candidate_edges(config, source);
    let (tree, leftovers) = spanning_tree(&candidates, config.cell_count() as usize);

    let requested = config.interconnectivity as usize;
    if requested > leftovers.len() {
        return Err(MazeError::InterconnectivityTooHigh {
            requested: config.interconnectivity,
            available: leftovers.len(),
        });
    }
    let extras: Vec<Edge> = shuffled(source, &leftovers)
        .into_iter()
        .take(requested)
        .collect();

    let mut adjacency = Adjacency::new(config.rows, config.columns, config.wrapping);
    for edge in tree.iter().chain(extras.iter()) {
        adjacency.link(edge.source, edge.direction, edge.destination);
    }

    debug!(
        rows = config.rows,
        columns = config.columns,
        candidates = candidates.len(),
        spanning = tree.len(),
        extra = extras.len(),
        "maze_built"
    );

    Ok(Maze {
        adjacency,
        spanning_links: tree.len(),
        extra_links: extras.len(),
    })
}

/// Lists every candidate link of the grid, drawing one weight per link.
///
/// Cells are visited in ascending order. Each cell offers its East link, then
/// its South link, then the wrapped North and West links for cells on the top
/// row and left column. Wrapped links only exist along dimensions of at least
/// three cells, since shorter dimensions would duplicate links or loop a cell
/// onto itself.
pub fn candidate_edges(config: Config, source: &mut dyn RandomSource) -> Vec<Edge> {
    let Config {
        rows,
        columns,
        wrapping,
        ..
    } = config;
    let count = config.cell_count();
    let mut edges = Vec::new();

    for id in 0..count {
        let cell = CellId::new(id);
        if (id + 1) % columns != 0 {
            edges.push(weighted(source, cell, Direction::East, CellId::new(id + 1)));
        }
        if id < count.saturating_sub(columns) {
            edges.push(weighted(
                source,
                cell,
                Direction::South,
                CellId::new(id + columns),
            ));
        }
        if wrapping {
            if id < columns && rows >= 3 {
                edges.push(weighted(
                    source,
                    cell,
                    Direction::North,
                    CellId::new(id + count - columns),
                ));
            }
            if id % columns == 0 && columns >= 3 {
                edges.push(weighted(
                    source,
                    cell,
                    Direction::West,
                    CellId::new(id + columns - 1),
                ));
            }
        }
    }

    edges
}

fn weighted(
    source: &mut dyn RandomSource,
    from: CellId,
    direction: Direction,
    to: CellId,
) -> Edge {
    Edge::new(from, direction, to, source.next_in(MIN_WEIGHT, MAX_WEIGHT))
}

/// Runs Kruskal's algorithm over `edges` for a graph of `cell_count` cells.
///
/// Links are visited in ascending weight order, ties keeping their listing
/// order. Returns the accepted tree links and every link left over.
#[must_use]
pub fn spanning_tree(edges: &[Edge], cell_count: usize) -> (Vec<Edge>, Vec<Edge>) {
    let mut ordered: Vec<Edge> = edges.to_vec();
    ordered.sort_by_key(Edge::weight);

    let mut sets = DisjointSets::new(cell_count);
    let mut tree = Vec::with_capacity(cell_count.saturating_sub(1));
    for edge in &ordered {
        if tree.len() + 1 >= cell_count {
            break;
        }
        if sets.union(edge.source.index(), edge.destination.index()) {
            tree.push(*edge);
        }
    }

    let leftovers = edges
        .iter()
        .filter(|edge| !tree.contains(edge))
        .copied()
        .collect();
    (tree, leftovers)
}

/// Union-find forest over cell indices.
#[derive(Debug)]
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&self, mut node: usize) -> usize {
        while let Some(&parent) = self.parent.get(node) {
            if parent == node {
                break;
            }
            node = parent;
        }
        node
    }

    /// Joins the sets holding `a` and `b`; returns `false` when already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        if let Some(slot) = self.parent.get_mut(root_a) {
            *slot = root_b;
        }
        true
    }
}
