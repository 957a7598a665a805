use core::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::best_first::{best_first, SearchResult};
use crate::terrain_grid::{Cell, TerrainGrid};

pub mod astar;
pub mod bfs;
pub mod dijkstra;

use astar::{AstarSolver, Heuristic};
use bfs::BfsSolver;
use dijkstra::DijkstraSolver;

/// Search result over grid cells with real-valued costs.
pub type GridSearchResult = SearchResult<Cell, f64>;

pub type Successors = SmallVec<[(Cell, f64); 4]>;

pub trait GridSolver {
    fn heuristic(&self, grid: &TerrainGrid, p1: &Cell, p2: &Cell) -> f64;

    /// Walkable neighbours with the cost of entering them, in the grid's neighbour order.
    fn successors(&self, grid: &TerrainGrid, node: &Cell) -> Successors {
        grid.neighbors_and_cost(*node)
    }

    /// Runs the search from `start` until `goal` is settled or every reachable cell is.
    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> GridSearchResult {
        best_first(
            &start,
            |node| self.successors(grid, node),
            |node| self.heuristic(grid, node, &goal),
            |node| *node == goal,
        )
    }

    /// The path from start to goal, empty if the goal cannot be reached.
    fn get_path_single_goal(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Vec<Cell> {
        self.search(grid, start, goal).path_to(&goal)
    }
}

/// The closed set of strategies a run can be started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    Dijkstra,
    AstarManhattan,
    AstarEuclidean,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dijkstra,
        Algorithm::AstarManhattan,
        Algorithm::AstarEuclidean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AstarManhattan => "A* Manhattan",
            Algorithm::AstarEuclidean => "A* Euclidean",
        }
    }

    /// Whether the algorithm takes terrain costs into account.
    pub fn is_weighted(&self) -> bool {
        *self != Algorithm::Bfs
    }

    pub fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> GridSearchResult {
        match self {
            Algorithm::Bfs => BfsSolver.search(grid, start, goal),
            Algorithm::Dijkstra => DijkstraSolver.search(grid, start, goal),
            Algorithm::AstarManhattan => {
                AstarSolver::new(Heuristic::Manhattan).search(grid, start, goal)
            }
            Algorithm::AstarEuclidean => {
                AstarSolver::new(Heuristic::Euclidean).search(grid, start, goal)
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown algorithm {:?}, expected one of bfs, dijkstra, astar-manhattan, astar-euclidean",
            self.0
        )
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Algorithm, UnknownAlgorithm> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Algorithm::Bfs),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar-manhattan" | "a*_m" | "a* manhattan" => Ok(Algorithm::AstarManhattan),
            "astar-euclidean" | "a*_e" | "a* euclidean" => Ok(Algorithm::AstarEuclidean),
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}
