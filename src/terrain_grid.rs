use core::fmt;
use std::error::Error;

use itertools::Itertools;
use log::warn;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::{OPEN_COST, WATER_COST};

/// Offsets in the order every solver visits neighbours: south, north, east, west.
/// Changing this order changes which of several equal-cost paths gets reported.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A (row, column) position on the grid. Rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }
    /// Moves by the given offset, returning [None] when that would leave the first quadrant.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell::new(
            self.row.checked_add_signed(d_row)?,
            self.col.checked_add_signed(d_col)?,
        ))
    }
    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
    pub fn euclidean_distance(&self, other: &Cell) -> f64 {
        (self.row.abs_diff(other.row) as f64).hypot(self.col.abs_diff(other.col) as f64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell::new(row, col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Terrain {
    #[default]
    Open,
    Wall,
    Water,
}

impl Terrain {
    /// Map symbol for the terrain. Unknown symbols read back as [Terrain::Open].
    pub fn symbol(&self) -> char {
        match self {
            Terrain::Open => '.',
            Terrain::Wall => '#',
            Terrain::Water => 'w',
        }
    }
    pub fn from_symbol(symbol: char) -> Terrain {
        match symbol {
            '#' => Terrain::Wall,
            'w' => Terrain::Water,
            _ => Terrain::Open,
        }
    }
    pub fn is_walkable(&self) -> bool {
        *self != Terrain::Wall
    }
}

/// Cost charged for entering a cell of each walkable terrain. Walls have no cost. Both costs are
/// finite and positive, which the weighted searches rely on to settle the goal on its first pop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainCosts {
    open: f64,
    water: f64,
}

impl Default for TerrainCosts {
    fn default() -> TerrainCosts {
        TerrainCosts {
            open: OPEN_COST,
            water: WATER_COST,
        }
    }
}

impl TerrainCosts {
    pub fn new(open: f64, water: f64) -> Result<TerrainCosts, EditError> {
        for (terrain, cost) in [(Terrain::Open, open), (Terrain::Water, water)] {
            if !(cost.is_finite() && cost > 0.0) {
                warn!("Refusing cost {} for {:?}", cost, terrain);
                return Err(EditError::InvalidCost(terrain));
            }
        }
        Ok(TerrainCosts { open, water })
    }
    pub fn cost(&self, terrain: Terrain) -> Option<f64> {
        match terrain {
            Terrain::Open => Some(self.open),
            Terrain::Water => Some(self.water),
            Terrain::Wall => None,
        }
    }
    /// Cheapest cost of a single step. Distance heuristics are scaled by this to stay admissible.
    pub fn min_step_cost(&self) -> f64 {
        self.open.min(self.water)
    }
}

/// Why an edit of the grid was refused. A refused edit leaves the grid untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditError {
    OutOfBounds(Cell),
    /// Terrain edits may not touch the start or goal cell.
    Occupied(Cell),
    /// Start and goal may not be placed on a wall.
    Blocked(Cell),
    /// Entry costs must be finite and greater than zero.
    InvalidCost(Terrain),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(cell) => write!(f, "cell {cell} is outside the grid"),
            Self::Occupied(cell) => write!(f, "cell {cell} holds the start or goal marker"),
            Self::Blocked(cell) => write!(f, "cell {cell} is a wall"),
            Self::InvalidCost(terrain) => {
                write!(f, "cost of {terrain:?} must be finite and positive")
            }
        }
    }
}

impl Error for EditError {}

/// [TerrainGrid] stores a terrain tag per cell together with the start and goal markers, which are
/// kept apart from the terrain so that painting never moves or erases them. Like the walkable
/// flags, connected components of walkable cells are maintained in a [UnionFind] structure to
/// answer reachability queries without searching.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
    start: Cell,
    goal: Cell,
    costs: TerrainCosts,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl TerrainGrid {
    /// An all-open grid with the start in the top left and the goal in the bottom right corner.
    pub fn new(rows: usize, cols: usize) -> TerrainGrid {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        TerrainGrid::from_parts(
            rows,
            cols,
            vec![Terrain::Open; rows * cols],
            Cell::new(0, 0),
            Cell::new(rows - 1, cols - 1),
        )
    }

    /// Assembles a grid in one step; the caller guarantees that the markers are in bounds and not walls.
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        cells: Vec<Terrain>,
        start: Cell,
        goal: Cell,
    ) -> TerrainGrid {
        debug_assert_eq!(cells.len(), rows * cols);
        let mut grid = TerrainGrid {
            rows,
            cols,
            cells,
            start,
            goal,
            costs: TerrainCosts::default(),
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn start(&self) -> Cell {
        self.start
    }
    pub fn goal(&self) -> Cell {
        self.goal
    }
    pub fn costs(&self) -> &TerrainCosts {
        &self.costs
    }
    pub fn set_costs(&mut self, costs: TerrainCosts) {
        self.costs = costs;
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }
    fn ix(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }
    fn cell_at(&self, ix: usize) -> Cell {
        Cell::new(ix / self.cols, ix % self.cols)
    }

    pub fn terrain(&self, cell: Cell) -> Option<Terrain> {
        if self.in_bounds(cell) {
            Some(self.cells[self.ix(cell)])
        } else {
            None
        }
    }
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.terrain(cell).is_some_and(|t| t.is_walkable())
    }
    /// Cost of entering `cell`, [None] for walls and cells outside the grid.
    pub fn cost_of(&self, cell: Cell) -> Option<f64> {
        self.terrain(cell).and_then(|t| self.costs.cost(t))
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Terrain)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(ix, terrain)| (self.cell_at(ix), *terrain))
    }

    /// The in-bounds, non-wall orthogonal neighbours of `cell` in [NEIGHBOR_OFFSETS] order.
    pub fn walkable_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(d_row, d_col)| cell.offset(d_row, d_col))
            .filter(move |n| self.is_walkable(*n))
    }
    /// Walkable neighbours paired with the cost of entering them.
    pub fn neighbors_and_cost(&self, cell: Cell) -> SmallVec<[(Cell, f64); 4]> {
        self.walkable_neighbors(cell)
            .filter_map(|n| self.cost_of(n).map(|c| (n, c)))
            .collect()
    }

    /// Total entry cost of a path, [None] for an empty path or one that crosses a wall.
    pub fn path_cost(&self, path: &[Cell]) -> Option<f64> {
        if path.is_empty() {
            return None;
        }
        path.iter()
            .tuple_windows()
            .map(|(_, next)| self.cost_of(*next))
            .sum()
    }

    /// Paints `terrain` onto `cell` and returns the previous terrain. Joins newly connected
    /// components and flags the components as dirty if they are (potentially) broken apart.
    pub fn set_terrain(&mut self, cell: Cell, terrain: Terrain) -> Result<Terrain, EditError> {
        if !self.in_bounds(cell) {
            return Err(EditError::OutOfBounds(cell));
        }
        if cell == self.start || cell == self.goal {
            warn!("Refusing to paint {:?} over marker at {}", terrain, cell);
            return Err(EditError::Occupied(cell));
        }
        let ix = self.ix(cell);
        let previous = std::mem::replace(&mut self.cells[ix], terrain);
        if previous.is_walkable() && !terrain.is_walkable() {
            self.components_dirty = true;
        } else if !previous.is_walkable() && terrain.is_walkable() {
            let neighbours = self.walkable_neighbors(cell).collect::<SmallVec<[Cell; 4]>>();
            for n in neighbours {
                let n_ix = self.ix(n);
                self.components.union(ix, n_ix);
            }
        }
        Ok(previous)
    }

    pub fn place_start(&mut self, cell: Cell) -> Result<(), EditError> {
        self.check_marker_target(cell)?;
        self.start = cell;
        Ok(())
    }
    pub fn place_goal(&mut self, cell: Cell) -> Result<(), EditError> {
        self.check_marker_target(cell)?;
        self.goal = cell;
        Ok(())
    }
    fn check_marker_target(&self, cell: Cell) -> Result<(), EditError> {
        match self.terrain(cell) {
            None => Err(EditError::OutOfBounds(cell)),
            Some(Terrain::Wall) => {
                warn!("Refusing to move a marker onto the wall at {}", cell);
                Err(EditError::Blocked(cell))
            }
            Some(_) => Ok(()),
        }
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }
    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and links up walkable neighbours to the same component.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for ix in 0..self.cells.len() {
            let cell = self.cell_at(ix);
            if !self.is_walkable(cell) {
                continue;
            }
            // South and east suffice, the other two directions are covered from the other side.
            for n in [cell.offset(1, 0), cell.offset(0, 1)].into_iter().flatten() {
                if self.is_walkable(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
    /// Checks if start and goal are on the same component. Only meaningful while the components
    /// are not dirty, see [update](Self::update).
    pub fn reachable(&self, start: Cell, goal: Cell) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: Cell, goal: Cell) -> bool {
        if self.is_walkable(start) && self.is_walkable(goal) {
            !self.components.equiv(self.ix(start), self.ix(goal))
        } else {
            true
        }
    }
    /// Number of walkable cells in the component containing `cell`, 0 for walls.
    pub fn component_size(&self, cell: Cell) -> usize {
        if !self.is_walkable(cell) {
            return 0;
        }
        let root = self.components.find(self.ix(cell));
        (0..self.cells.len())
            .filter(|&ix| self.cells[ix].is_walkable() && self.components.find(ix) == root)
            .count()
    }
}

/// Writes the grid in the map format read by [parse_map](crate::map::parse_map).
impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            let line = (0..self.cols)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    if cell == self.start {
                        'S'
                    } else if cell == self.goal {
                        'G'
                    } else {
                        self.cells[self.ix(cell)].symbol()
                    }
                })
                .join("");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_follow_fixed_order() {
        let grid = TerrainGrid::new(3, 3);
        let centre = grid.walkable_neighbors(Cell::new(1, 1)).collect::<Vec<_>>();
        assert_eq!(
            centre,
            vec![
                Cell::new(2, 1),
                Cell::new(0, 1),
                Cell::new(1, 2),
                Cell::new(1, 0)
            ]
        );
        let corner = grid.walkable_neighbors(Cell::new(0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn walls_are_not_neighbours() {
        let mut grid = TerrainGrid::new(3, 3);
        grid.set_terrain(Cell::new(1, 0), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(0, 1), Terrain::Water).unwrap();
        let n = grid.neighbors_and_cost(Cell::new(0, 0));
        assert_eq!(n.as_slice(), &[(Cell::new(0, 1), WATER_COST)]);
        assert_eq!(grid.cost_of(Cell::new(1, 0)), None);
        assert_eq!(grid.cost_of(Cell::new(5, 5)), None);
    }

    #[test]
    fn markers_cannot_be_painted_over() {
        let mut grid = TerrainGrid::new(2, 2);
        let start = grid.start();
        assert_eq!(
            grid.set_terrain(start, Terrain::Wall),
            Err(EditError::Occupied(start))
        );
        assert_eq!(grid.terrain(start), Some(Terrain::Open));
        assert_eq!(
            grid.set_terrain(Cell::new(2, 0), Terrain::Water),
            Err(EditError::OutOfBounds(Cell::new(2, 0)))
        );
    }

    #[test]
    fn markers_cannot_move_onto_walls() {
        let mut grid = TerrainGrid::new(2, 2);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        assert_eq!(
            grid.place_goal(Cell::new(0, 1)),
            Err(EditError::Blocked(Cell::new(0, 1)))
        );
        assert_eq!(grid.goal(), Cell::new(1, 1));
        grid.place_start(Cell::new(1, 0)).unwrap();
        assert_eq!(grid.start(), Cell::new(1, 0));
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |S#.|
        // |.#G|
        let mut grid = TerrainGrid::new(2, 3);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(1, 1), Terrain::Wall).unwrap();
        assert!(grid.components_dirty());
        grid.update();
        assert!(grid.unreachable(Cell::new(0, 0), Cell::new(1, 2)));
        assert!(grid.reachable(Cell::new(0, 0), Cell::new(1, 0)));
        assert_eq!(grid.component_size(Cell::new(0, 0)), 2);
        assert_eq!(grid.component_size(Cell::new(0, 1)), 0);

        // Opening a wall joins components without regeneration.
        grid.set_terrain(Cell::new(1, 1), Terrain::Water).unwrap();
        assert!(!grid.components_dirty());
        assert!(grid.reachable(Cell::new(0, 0), Cell::new(1, 2)));
        assert_eq!(grid.component_size(Cell::new(0, 0)), 5);
    }

    #[test]
    fn costs_must_be_positive() {
        assert_eq!(
            TerrainCosts::new(1.0, -5.0),
            Err(EditError::InvalidCost(Terrain::Water))
        );
        assert_eq!(
            TerrainCosts::new(0.0, 6.0),
            Err(EditError::InvalidCost(Terrain::Open))
        );
        assert!(TerrainCosts::new(f64::NAN, 6.0).is_err());
        assert!(TerrainCosts::new(1.0, f64::INFINITY).is_err());

        let costs = TerrainCosts::new(2.0, 0.5).unwrap();
        assert_eq!(costs.cost(Terrain::Water), Some(0.5));
        assert_eq!(costs.min_step_cost(), 0.5);
        assert_eq!(TerrainCosts::default(), TerrainCosts::new(OPEN_COST, WATER_COST).unwrap());
    }

    #[test]
    fn path_cost_charges_entered_cells() {
        let mut grid = TerrainGrid::new(1, 3);
        grid.set_terrain(Cell::new(0, 1), Terrain::Water).unwrap();
        let path = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        assert_eq!(grid.path_cost(&path), Some(WATER_COST + OPEN_COST));
        assert_eq!(grid.path_cost(&path[..1]), Some(0.0));
        assert_eq!(grid.path_cost(&[]), None);
    }

    #[test]
    fn display_uses_map_symbols() {
        let mut grid = TerrainGrid::new(2, 3);
        grid.set_terrain(Cell::new(0, 1), Terrain::Wall).unwrap();
        grid.set_terrain(Cell::new(1, 0), Terrain::Water).unwrap();
        assert_eq!(grid.to_string(), "S#.\nw.G\n");
    }
}
