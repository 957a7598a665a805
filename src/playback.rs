//! Step-by-step replay of a run for an animating front end. The front end calls
//! [Playback::tick] whenever its timer fires and waits [Playback::next_delay] before the next
//! call; nothing here sleeps or spawns.
use std::time::Duration;
use std::vec;

use crate::terrain_grid::Cell;

/// Tick intervals for the two phases of a replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
    pub expand_interval: Duration,
    pub path_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> PlaybackConfig {
        PlaybackConfig {
            expand_interval: Duration::from_millis(1),
            path_interval: Duration::from_millis(5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    NotRunning,
    Expanding,
    DrawingPath,
    Done,
}

/// One unit of animation. `endpoint` is set for the start and goal cells, which front ends
/// usually leave painted as markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStep {
    Expanded { cell: Cell, endpoint: bool },
    Path { cell: Cell, endpoint: bool },
    Finished,
}

/// Replays an expansion trace followed by a path. Each sequence is consumed as it is played and
/// cannot be rewound.
#[derive(Clone, Debug, Default)]
pub struct Playback {
    phase: PlaybackPhase,
    expanded: vec::IntoIter<Cell>,
    path: vec::IntoIter<Cell>,
    endpoints: Option<(Cell, Cell)>,
}

impl Playback {
    pub fn new(expanded: Vec<Cell>, path: Vec<Cell>, start: Cell, goal: Cell) -> Playback {
        Playback {
            phase: PlaybackPhase::Expanding,
            expanded: expanded.into_iter(),
            path: path.into_iter(),
            endpoints: Some((start, goal)),
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }
    /// Whether steps are still pending. A finished or cancelled replay is inactive.
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::Expanding | PlaybackPhase::DrawingPath
        )
    }
    pub fn remaining_expanded(&self) -> usize {
        self.expanded.len()
    }
    pub fn remaining_path(&self) -> usize {
        self.path.len()
    }

    fn is_endpoint(&self, cell: Cell) -> bool {
        self.endpoints
            .is_some_and(|(start, goal)| cell == start || cell == goal)
    }

    /// Produces the next step. Once the trace is exhausted the path starts in the same tick; after
    /// the last path cell one [PlaybackStep::Finished] is returned and then [None].
    pub fn tick(&mut self) -> Option<PlaybackStep> {
        if self.phase == PlaybackPhase::Expanding {
            match self.expanded.next() {
                Some(cell) => {
                    let endpoint = self.is_endpoint(cell);
                    return Some(PlaybackStep::Expanded { cell, endpoint });
                }
                None => self.phase = PlaybackPhase::DrawingPath,
            }
        }
        if self.phase == PlaybackPhase::DrawingPath {
            return match self.path.next() {
                Some(cell) => {
                    let endpoint = self.is_endpoint(cell);
                    Some(PlaybackStep::Path { cell, endpoint })
                }
                None => {
                    self.phase = PlaybackPhase::Done;
                    Some(PlaybackStep::Finished)
                }
            };
        }
        None
    }

    /// How long to wait before the next [tick](Self::tick), [None] once nothing is pending.
    pub fn next_delay(&self, config: &PlaybackConfig) -> Option<Duration> {
        match self.phase {
            PlaybackPhase::Expanding => Some(config.expand_interval),
            PlaybackPhase::DrawingPath => Some(config.path_interval),
            PlaybackPhase::NotRunning | PlaybackPhase::Done => None,
        }
    }

    /// Drops every pending step and returns to [PlaybackPhase::NotRunning] from any phase.
    pub fn cancel(&mut self) {
        *self = Playback::default();
    }
}
