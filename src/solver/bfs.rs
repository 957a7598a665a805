use crate::best_first::breadth_first;
use crate::solver::{GridSearchResult, GridSolver};
use crate::terrain_grid::{Cell, TerrainGrid};

/// Shortest paths by number of steps. Terrain costs are ignored; walls are still impassable.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn heuristic(&self, _: &TerrainGrid, _: &Cell, _: &Cell) -> f64 {
        0.0
    }

    fn search(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> GridSearchResult {
        breadth_first(
            &start,
            |node| grid.walkable_neighbors(*node),
            |node| *node == goal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_grid::Terrain;

    #[test]
    fn open_three_by_three() {
        let grid = TerrainGrid::new(3, 3);
        let result = BfsSolver.search(&grid, grid.start(), grid.goal());
        let c = |r, c| Cell::new(r, c);
        assert_eq!(
            result.expanded(),
            &[
                c(0, 0),
                c(1, 0),
                c(0, 1),
                c(2, 0),
                c(1, 1),
                c(0, 2),
                c(2, 1),
                c(1, 2),
                c(2, 2)
            ]
        );
        assert_eq!(
            result.path_to(&grid.goal()),
            vec![c(0, 0), c(1, 0), c(2, 0), c(2, 1), c(2, 2)]
        );
        assert_eq!(result.cost_to(&grid.goal()), Some(4.0));
    }

    #[test]
    fn ignores_water() {
        // |S|
        // |w|
        // |G|
        let mut grid = TerrainGrid::new(3, 1);
        grid.set_terrain(Cell::new(1, 0), Terrain::Water).unwrap();
        let path = BfsSolver.get_path_single_goal(&grid, grid.start(), grid.goal());
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn walled_in_start_terminates() {
        // |S#|
        // |#G|
        let mut grid = TerrainGrid::new(2, 2);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(1, 0), Terrain::Wall).unwrap();
        let result = BfsSolver.search(&grid, grid.start(), grid.goal());
        assert_eq!(result.expanded(), &[grid.start()]);
        assert!(result.path_to(&grid.goal()).is_empty());
    }
}
