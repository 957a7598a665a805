use core::fmt;
use std::error::Error;
use std::time::Duration;

use log::{debug, info};

use crate::map::{default_grid, parse_map, MapError, Preset};
use crate::playback::{Playback, PlaybackConfig, PlaybackPhase, PlaybackStep};
use crate::run::{run_algorithm, RunReport, RunStats};
use crate::solver::Algorithm;
use crate::terrain_grid::{Cell, EditError, Terrain, TerrainGrid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A replay is in progress; stop it or let it finish first.
    Busy,
    Edit(EditError),
    Map(MapError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "a run is still being played back"),
            Self::Edit(e) => write!(f, "edit rejected: {e}"),
            Self::Map(e) => write!(f, "map rejected: {e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Busy => None,
            Self::Edit(e) => Some(e),
            Self::Map(e) => Some(e),
        }
    }
}

impl From<EditError> for SessionError {
    fn from(e: EditError) -> SessionError {
        SessionError::Edit(e)
    }
}

impl From<MapError> for SessionError {
    fn from(e: MapError) -> SessionError {
        SessionError::Map(e)
    }
}

/// Owns the grid being edited and the replay of the latest run. While a replay is active every
/// edit and every new run is refused, so the grid always matches what is being animated.
#[derive(Clone, Debug)]
pub struct Session {
    grid: TerrainGrid,
    playback: Playback,
    config: PlaybackConfig,
    last_run: Option<RunStats>,
}

impl Default for Session {
    fn default() -> Session {
        Session::with_grid(default_grid())
    }
}

impl Session {
    pub fn new(config: PlaybackConfig) -> Session {
        Session {
            config,
            ..Session::default()
        }
    }
    pub fn with_grid(grid: TerrainGrid) -> Session {
        Session {
            grid,
            playback: Playback::default(),
            config: PlaybackConfig::default(),
            last_run: None,
        }
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }
    pub fn set_config(&mut self, config: PlaybackConfig) {
        self.config = config;
    }
    /// Stats of the latest run, cleared whenever a new map is loaded.
    pub fn last_run(&self) -> Option<&RunStats> {
        self.last_run.as_ref()
    }
    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }
    pub fn is_animating(&self) -> bool {
        self.playback.is_active()
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.is_animating() {
            debug!("Rejecting request during playback ({:?})", self.phase());
            Err(SessionError::Busy)
        } else {
            Ok(())
        }
    }

    /// Paints one cell and returns its previous terrain.
    pub fn set_terrain(&mut self, cell: Cell, terrain: Terrain) -> Result<Terrain, SessionError> {
        self.ensure_idle()?;
        Ok(self.grid.set_terrain(cell, terrain)?)
    }
    /// Turns a wall into open ground and anything else into a wall, like a click on the canvas.
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<Terrain, SessionError> {
        self.ensure_idle()?;
        let next = match self.grid.terrain(cell) {
            Some(Terrain::Wall) => Terrain::Open,
            _ => Terrain::Wall,
        };
        self.set_terrain(cell, next)
    }
    pub fn place_start(&mut self, cell: Cell) -> Result<(), SessionError> {
        self.ensure_idle()?;
        Ok(self.grid.place_start(cell)?)
    }
    pub fn place_goal(&mut self, cell: Cell) -> Result<(), SessionError> {
        self.ensure_idle()?;
        Ok(self.grid.place_goal(cell)?)
    }

    pub fn load_preset(&mut self, preset: Preset) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let grid = preset.load()?;
        info!("Loaded {}", preset.name());
        self.replace_grid(grid);
        Ok(())
    }
    /// Loads a custom map of the fixed size. On error the current grid stays as it was.
    pub fn load_map<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let grid = parse_map(lines)?;
        self.replace_grid(grid);
        Ok(())
    }
    pub fn reset_to_default(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.replace_grid(default_grid());
        Ok(())
    }
    fn replace_grid(&mut self, grid: TerrainGrid) {
        let costs = *self.grid.costs();
        self.grid = grid;
        self.grid.set_costs(costs);
        self.playback.cancel();
        self.last_run = None;
    }

    /// Runs `algorithm` on the current grid and starts replaying its trace and path.
    pub fn run(&mut self, algorithm: Algorithm) -> Result<RunReport, SessionError> {
        self.ensure_idle()?;
        self.grid.update();
        let (start, goal) = (self.grid.start(), self.grid.goal());
        if self.grid.unreachable(start, goal) {
            info!(
                "{} cannot be reached from {}, {} will exhaust {} cells",
                goal,
                start,
                algorithm,
                self.grid.component_size(start)
            );
        }
        let report = run_algorithm(algorithm, &self.grid);
        self.playback = Playback::new(report.expanded.clone(), report.path.clone(), start, goal);
        self.last_run = Some(report.stats.clone());
        Ok(report)
    }

    /// Advances the replay by one step; [None] when nothing is playing.
    pub fn tick(&mut self) -> Option<PlaybackStep> {
        self.playback.tick()
    }
    pub fn next_delay(&self) -> Option<Duration> {
        self.playback.next_delay(&self.config)
    }
    /// Cancels the replay. The grid keeps every edit made before the run. Returns whether
    /// anything was playing.
    pub fn stop(&mut self) -> bool {
        let was_animating = self.is_animating();
        self.playback.cancel();
        was_animating
    }
}
