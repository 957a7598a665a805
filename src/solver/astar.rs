use crate::{
    solver::GridSolver,
    terrain_grid::{Cell, TerrainGrid},
};

/// Distance estimates for A*. Both are admissible and consistent on a 4-connected grid as long
/// as they are scaled by the cheapest step cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
}

impl Heuristic {
    pub fn distance(&self, p1: &Cell, p2: &Cell) -> f64 {
        match self {
            Heuristic::Manhattan => p1.manhattan_distance(p2) as f64,
            Heuristic::Euclidean => p1.euclidean_distance(p2),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    /// Values above 1.0 make the search greedier at the price of optimality.
    pub heuristic_factor: f64,
}

impl AstarSolver {
    pub fn new(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            heuristic_factor: 1.0,
        }
    }
}

impl GridSolver for AstarSolver {
    /// The distance in steps times the cheapest step cost, times the heuristic factor.
    fn heuristic(&self, grid: &TerrainGrid, p1: &Cell, p2: &Cell) -> f64 {
        self.heuristic.distance(p1, p2) * grid.costs().min_step_cost() * self.heuristic_factor
    }
}
