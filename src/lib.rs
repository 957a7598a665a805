//! # terrain_search
//!
//! Side-by-side comparison of four grid searches on a small map with walls and water:
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) and
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with a Manhattan or a Euclidean
//! heuristic. Moves are 4-directional and entering a cell costs its terrain cost, so water is
//! passable but expensive.
//!
//! Every run yields the order in which cells were expanded and the resulting path, ready to be
//! replayed cell by cell, together with the expanded count, path length and runtime.
//!
//! ```
//! use terrain_search::{run_algorithm, Algorithm, Preset};
//!
//! let grid = Preset::Map1.load().unwrap();
//! let bfs = run_algorithm(Algorithm::Bfs, &grid);
//! let dijkstra = run_algorithm(Algorithm::Dijkstra, &grid);
//! assert!(dijkstra.stats.path_cost <= bfs.stats.path_cost);
//! ```
mod best_first;
pub mod map;
pub mod playback;
pub mod run;
pub mod session;
pub mod solver;
pub mod terrain_grid;

pub use best_first::{reconstruct_path, SearchResult};
pub use map::{default_grid, parse_map, parse_map_sized, MapError, Preset};
pub use playback::{Playback, PlaybackConfig, PlaybackPhase, PlaybackStep};
pub use run::{run_algorithm, RunReport, RunStats};
pub use session::{Session, SessionError};
pub use solver::{Algorithm, GridSearchResult, GridSolver};
pub use terrain_grid::{Cell, EditError, Terrain, TerrainCosts, TerrainGrid};

/// Number of rows of the interactive grid and the preset maps.
pub const ROWS: usize = 20;
/// Number of columns of the interactive grid and the preset maps.
pub const COLS: usize = 20;

/// Default cost of entering an open cell.
pub const OPEN_COST: f64 = 1.0;
/// Default cost of entering a water cell.
pub const WATER_COST: f64 = 6.0;
