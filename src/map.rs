//! Text maps: one string per row, `#` for walls, `w` for water, `S` and `G` for the start and
//! goal markers and anything else for open ground.
use core::fmt;
use std::error::Error;
use std::str::FromStr;

use log::warn;

use crate::terrain_grid::{Cell, Terrain, TerrainGrid};
use crate::{COLS, ROWS};

const MAP_1: [&str; ROWS] = [
    "....#########...#...",
    "..............#.#.#.",
    "....###########...#.",
    "....wwwwwwwww######.",
    "....wwwwwwwww##...#.",
    "....wwwwwwwww##.#.#.",
    "....wwwwwwwww#..#...",
    "....wwwwwwwww#.#####",
    "....wwwwwwwww.......",
    "....wwwwwwwww.......",
    "S...wwwwwwwww......G",
    "....wwwwwww######.##",
    "....wwwwwww#...##..#",
    "....wwwwwww#.#.###..",
    "....wwwwwww#.#.####.",
    "....wwwwwww#.#.###..",
    "....wwwwwww#.#.###.#",
    "....wwwwwww#.#.###..",
    "....########.#.####.",
    ".............#......",
];

const MAP_2: [&str; ROWS] = [
    "#####....G..........",
    "#...#..#.###..#.....",
    "#.#....#...##..#....",
    "#.####.###.###..#...",
    "#.#.##.#...###..##..",
    "#.#.##.#.####...##..",
    "#.#....#...#...###..",
    "#.#######.##..#####.",
    "....................",
    ".########.########..",
    "....................",
    ".#.#############.#..",
    ".#...............#..",
    ".#.#.#########.#.#..",
    ".#.#...........#.#..",
    ".#.#.#.#####.#.#.#..",
    ".#.#.#.......#.#.#..",
    ".#.#.#.#.S.#.#.#.#..",
    "....................",
    "####################",
];

/// The maps that ship with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// A lake west of a walled maze; the cheap route goes around the water.
    Map1,
    /// Corridors and a walled pocket around the start.
    Map2,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Map1, Preset::Map2];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Map1 => "Map 1",
            Preset::Map2 => "Map 2",
        }
    }
    pub fn layout(&self) -> &'static [&'static str] {
        match self {
            Preset::Map1 => &MAP_1,
            Preset::Map2 => &MAP_2,
        }
    }
    pub fn load(&self) -> Result<TerrainGrid, MapError> {
        parse_map(self.layout())
    }
}

/// The empty map: all open, start in the top left, goal in the bottom right corner.
pub fn default_grid() -> TerrainGrid {
    TerrainGrid::new(ROWS, COLS)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    /// Row count or row width differs from the expected grid size, given as (rows, cols).
    Dimensions {
        expected: (usize, usize),
        found: (usize, usize),
    },
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    MissingMarker(char),
    DuplicateMarker {
        marker: char,
        first: Cell,
        second: Cell,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimensions { expected, found } => write!(
                f,
                "map is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::MissingMarker(marker) => write!(f, "map has no '{marker}' marker"),
            Self::DuplicateMarker {
                marker,
                first,
                second,
            } => write!(f, "map has a second '{marker}' marker at {second}, first at {first}"),
        }
    }
}

impl Error for MapError {}

/// Parses a map of the fixed [ROWS] x [COLS] size.
pub fn parse_map<S: AsRef<str>>(lines: &[S]) -> Result<TerrainGrid, MapError> {
    parse_map_sized(lines, ROWS, COLS)
}

/// Parses a map that must be exactly `rows` x `cols` cells and hold exactly one start and one
/// goal marker. Nothing is built unless the whole map is valid.
pub fn parse_map_sized<S: AsRef<str>>(
    lines: &[S],
    rows: usize,
    cols: usize,
) -> Result<TerrainGrid, MapError> {
    let result = parse_lines(lines, rows, cols);
    if let Err(e) = &result {
        warn!("Rejected map: {}", e);
    }
    result
}

fn parse_lines<S: AsRef<str>>(
    lines: &[S],
    rows: usize,
    cols: usize,
) -> Result<TerrainGrid, MapError> {
    if lines.len() != rows || rows == 0 || cols == 0 {
        let width = lines.first().map_or(0, |l| l.as_ref().chars().count());
        return Err(MapError::Dimensions {
            expected: (rows, cols),
            found: (lines.len(), width),
        });
    }
    let mut cells = Vec::with_capacity(rows * cols);
    let mut start: Option<Cell> = None;
    let mut goal: Option<Cell> = None;
    for (row, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let width = line.chars().count();
        if width != cols {
            return Err(MapError::RaggedRow {
                row,
                expected: cols,
                found: width,
            });
        }
        for (col, symbol) in line.chars().enumerate() {
            let cell = Cell::new(row, col);
            let marker = match symbol {
                'S' => Some(&mut start),
                'G' => Some(&mut goal),
                _ => None,
            };
            if let Some(slot) = marker {
                if let Some(first) = *slot {
                    return Err(MapError::DuplicateMarker {
                        marker: symbol,
                        first,
                        second: cell,
                    });
                }
                *slot = Some(cell);
            }
            cells.push(Terrain::from_symbol(symbol));
        }
    }
    let start = start.ok_or(MapError::MissingMarker('S'))?;
    let goal = goal.ok_or(MapError::MissingMarker('G'))?;
    Ok(TerrainGrid::from_parts(rows, cols, cells, start, goal))
}

/// Reads a map of any size; the first line fixes the width. Empty lines before the first and
/// after the last row are ignored, every other line is a row as written, spaces included.
impl FromStr for TerrainGrid {
    type Err = MapError;

    fn from_str(s: &str) -> Result<TerrainGrid, MapError> {
        let lines = s.lines().collect::<Vec<&str>>();
        let first = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
        let last = lines.iter().rposition(|l| !l.is_empty()).map_or(first, |ix| ix + 1);
        let rows = &lines[first..last];
        let cols = rows.first().map_or(0, |l| l.chars().count());
        parse_map_sized(rows, rows.len(), cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_load() {
        let map_1 = Preset::Map1.load().unwrap();
        assert_eq!(map_1.start(), Cell::new(10, 0));
        assert_eq!(map_1.goal(), Cell::new(10, 19));
        assert_eq!(map_1.terrain(Cell::new(3, 4)), Some(Terrain::Water));
        assert_eq!(map_1.terrain(Cell::new(0, 4)), Some(Terrain::Wall));
        let map_2 = Preset::Map2.load().unwrap();
        assert_eq!(map_2.start(), Cell::new(17, 9));
        assert_eq!(map_2.goal(), Cell::new(0, 9));
    }

    #[test]
    fn presets_round_trip_through_display() {
        for preset in Preset::ALL {
            let grid = preset.load().unwrap();
            let text = grid.to_string();
            assert_eq!(text.lines().collect::<Vec<_>>(), preset.layout());
        }
    }

    #[test]
    fn parses_small_maps() {
        let grid: TerrainGrid = "S.#\n.wG".parse().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.start(), Cell::new(0, 0));
        assert_eq!(grid.goal(), Cell::new(1, 2));
        assert_eq!(grid.terrain(Cell::new(0, 2)), Some(Terrain::Wall));
        assert_eq!(grid.terrain(Cell::new(1, 1)), Some(Terrain::Water));
        // Markers sit on open ground, unknown symbols are open too.
        let grid: TerrainGrid = "S?G".parse().unwrap();
        assert_eq!(grid.terrain(Cell::new(0, 1)), Some(Terrain::Open));
        assert_eq!(grid.terrain(Cell::new(0, 0)), Some(Terrain::Open));
    }

    #[test]
    fn rejects_wrong_dimensions() {
        assert_eq!(
            parse_map(&["S..G"]).unwrap_err(),
            MapError::Dimensions {
                expected: (ROWS, COLS),
                found: (1, 4)
            }
        );
        assert_eq!(
            parse_map_sized(&["S..", ".G"], 2, 3).unwrap_err(),
            MapError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert!("".parse::<TerrainGrid>().is_err());
    }

    #[test]
    fn spaces_are_open_cells() {
        let grid: TerrainGrid = "S. \n..G".parse().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.terrain(Cell::new(0, 2)), Some(Terrain::Open));

        let grid: TerrainGrid = "S.G\n   \n...".parse().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 3));
        assert_eq!(grid.terrain(Cell::new(1, 1)), Some(Terrain::Open));

        let grid: TerrainGrid = "\nS.G\n...\n\n".parse().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
    }

    #[test]
    fn rejects_missing_and_duplicate_markers() {
        assert_eq!(
            "...\n..G".parse::<TerrainGrid>().unwrap_err(),
            MapError::MissingMarker('S')
        );
        assert_eq!(
            "S..\n...".parse::<TerrainGrid>().unwrap_err(),
            MapError::MissingMarker('G')
        );
        assert_eq!(
            "S.G\n.GS".parse::<TerrainGrid>().unwrap_err(),
            MapError::DuplicateMarker {
                marker: 'G',
                first: Cell::new(0, 2),
                second: Cell::new(1, 1)
            }
        );
    }
}
