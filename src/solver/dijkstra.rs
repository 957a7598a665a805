use crate::{
    solver::GridSolver,
    terrain_grid::{Cell, TerrainGrid},
};

/// Cheapest paths under the grid's terrain costs. A* without a heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: &TerrainGrid, _: &Cell, _: &Cell) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain_grid::Terrain;
    use crate::WATER_COST;

    #[test]
    fn settles_in_cost_order() {
        // |S w|
        // |. .|
        let mut grid = TerrainGrid::new(2, 2);
        grid.set_terrain(Cell::new(0, 1), Terrain::Water).unwrap();
        grid.place_goal(Cell::new(0, 1)).unwrap();
        let result = DijkstraSolver.search(&grid, grid.start(), grid.goal());
        assert_eq!(
            result.expanded(),
            &[
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(1, 1),
                Cell::new(0, 1)
            ]
        );
        // Entering the goal directly beats the detour (6.0 vs 1.0 + 1.0 + 6.0).
        assert_eq!(result.cost_to(&grid.goal()), Some(WATER_COST));
        assert_eq!(
            result.path_to(&grid.goal()),
            vec![Cell::new(0, 0), Cell::new(0, 1)]
        );
    }

    #[test]
    fn unreachable_goal_settles_component() {
        // |S#.|
        // |.#G|
        let mut grid = TerrainGrid::new(2, 3);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(1, 1), Terrain::Wall).unwrap();
        let result = DijkstraSolver.search(&grid, grid.start(), grid.goal());
        assert_eq!(result.expanded_count(), 2);
        assert!(!result.reached(&grid.goal()));
    }
}
