use core::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::solver::Algorithm;
use crate::terrain_grid::{Cell, TerrainGrid};

/// Summary of one run, as shown next to the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct RunStats {
    pub algorithm: Algorithm,
    /// Number of expanded cells, not the number of queue pushes.
    pub expanded_count: usize,
    /// Cells on the path including start and goal, 0 if the goal was not reached.
    pub path_length: usize,
    /// Summed entry cost of the path under the grid's terrain costs.
    pub path_cost: Option<f64>,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn goal_reached(&self) -> bool {
        self.path_length > 0
    }
    pub fn runtime_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.algorithm)?;
        writeln!(f, "Visited Nodes: {}", self.expanded_count)?;
        writeln!(f, "Path Length : {}", self.path_length)?;
        write!(f, "Runtime     : {:.2} ms", self.runtime_ms())
    }
}

/// The outcome of a run: the expansion trace and path to animate, plus the summary.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub expanded: Vec<Cell>,
    pub path: Vec<Cell>,
    pub stats: RunStats,
}

/// Searches from the grid's start to its goal with `algorithm`. The elapsed time covers the
/// search call only.
pub fn run_algorithm(algorithm: Algorithm, grid: &TerrainGrid) -> RunReport {
    let (start, goal) = (grid.start(), grid.goal());
    let timer = Instant::now();
    let result = algorithm.search(grid, start, goal);
    let elapsed = timer.elapsed();
    let path = result.path_to(&goal);

    let stats = RunStats {
        algorithm,
        expanded_count: result.expanded_count(),
        path_length: path.len(),
        path_cost: grid.path_cost(&path),
        elapsed,
    };
    info!(
        "{} from {} to {}: {} expanded, path of {} cells, {:.3} ms",
        algorithm,
        start,
        goal,
        stats.expanded_count,
        stats.path_length,
        stats.runtime_ms()
    );
    RunReport {
        expanded: result.into_expanded(),
        path,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_grid::Terrain;

    #[test]
    fn stats_describe_the_run() {
        let grid = TerrainGrid::new(3, 3);
        let report = run_algorithm(Algorithm::Bfs, &grid);
        assert_eq!(report.stats.expanded_count, 9);
        assert_eq!(report.stats.expanded_count, report.expanded.len());
        assert_eq!(report.stats.path_length, 5);
        assert_eq!(report.stats.path_cost, Some(4.0));
        assert!(report.stats.goal_reached());
    }

    #[test]
    fn unreachable_goal_is_not_an_error() {
        let mut grid = TerrainGrid::new(2, 2);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(1, 0), Terrain::Wall).unwrap();
        for algorithm in Algorithm::ALL {
            let report = run_algorithm(algorithm, &grid);
            assert!(report.path.is_empty());
            assert_eq!(report.stats.path_length, 0);
            assert_eq!(report.stats.path_cost, None);
            assert_eq!(report.stats.expanded_count, 1);
        }
    }

    #[test]
    fn summary_text() {
        let stats = RunStats {
            algorithm: Algorithm::AstarEuclidean,
            expanded_count: 12,
            path_length: 7,
            path_cost: Some(6.0),
            elapsed: Duration::from_micros(1250),
        };
        assert_eq!(
            stats.to_string(),
            "A* Euclidean\nVisited Nodes: 12\nPath Length : 7\nRuntime     : 1.25 ms"
        );
    }
}
