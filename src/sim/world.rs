/// WorldState: the authoritative copy of a running game.
///
/// ## Maze ownership
///
/// The maze is either being built or ready, never both:
///   - `Building` — the `MazeBuilder` has exclusive write access; the
///     renderer may draw its preview but nothing may move on it.
///   - `Ready`    — wall flags are frozen; movement reads them.
///
/// Every level change, restart and resize throws the current maze away
/// and starts a new builder. Nothing is reused between levels.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::MazeConfig;
use crate::domain::grid::{Grid, GridSize};
use crate::domain::maze::{generate, MazeBuilder};
use crate::domain::movement::Player;
use super::event::GameEvent;
use super::progression::{self, LevelState, Transition};

pub enum MazeState {
    /// Only seen transiently while swapping builder for grid.
    Empty,
    Building(MazeBuilder),
    Ready(Grid),
}

pub struct WorldState {
    pub progress: LevelState,
    pub maze: MazeState,
    pub player: Player,
    pub size: GridSize,
    rng: StdRng,

    // ── Generation pacing ──
    pub animate: bool,
    pub carve_steps_per_tick: u32,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub paused: bool,
}

impl WorldState {
    /// Start a run at level 1 with a freshly generated maze.
    pub fn new(cfg: &MazeConfig, size: GridSize) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut world = WorldState {
            progress: LevelState::new(),
            maze: MazeState::Empty,
            player: Player::at_start(),
            size,
            rng,
            animate: cfg.animate,
            carve_steps_per_tick: cfg.carve_steps_per_tick.max(1),
            message: String::new(),
            message_timer: 0,
            paused: false,
        };
        let (state, _) = progression::restart(world.progress);
        world.progress = state;
        world.begin_build();
        world
    }

    /// Finished maze, or None while one is being carved.
    pub fn grid(&self) -> Option<&Grid> {
        match &self.maze {
            MazeState::Ready(g) => Some(g),
            _ => None,
        }
    }

    /// Whatever wall state exists right now, for drawing.
    pub fn visible_grid(&self) -> Option<&Grid> {
        match &self.maze {
            MazeState::Ready(g) => Some(g),
            MazeState::Building(b) => Some(b.preview()),
            MazeState::Empty => None,
        }
    }

    /// Carve head position while building.
    pub fn carve_head(&self) -> Option<(usize, usize)> {
        match &self.maze {
            MazeState::Building(b) => Some(b.current()),
            _ => None,
        }
    }

    pub fn is_building(&self) -> bool {
        matches!(self.maze, MazeState::Building(_))
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Apply a progression transition; returns the events it produced.
    pub fn apply(&mut self, transition: Transition) -> Vec<GameEvent> {
        match transition {
            Transition::Stay => vec![],
            Transition::Won => vec![GameEvent::Won],
            Transition::Rebuild { level } => {
                self.begin_build();
                let mut events = vec![];
                if !self.is_building() {
                    events.push(GameEvent::MazeReady { level });
                }
                events
            }
        }
    }

    /// Change maze dimensions and rebuild the current level.
    pub fn resize(&mut self, size: GridSize) -> Vec<GameEvent> {
        if size == self.size {
            return vec![];
        }
        self.size = size;
        let (state, transition) = progression::rebuild_current(self.progress);
        self.progress = state;
        self.apply(transition)
    }

    /// Advance an in-progress build by the configured number of carve steps.
    pub fn tick_generation(&mut self) -> Vec<GameEvent> {
        let builder = match &mut self.maze {
            MazeState::Building(b) => b,
            _ => return vec![],
        };
        for _ in 0..self.carve_steps_per_tick {
            if builder.is_done() {
                break;
            }
            builder.step(&mut self.rng);
        }
        if builder.is_done() {
            self.complete_build();
            return vec![GameEvent::MazeReady { level: self.progress.level }];
        }
        vec![]
    }

    // ── Internal ──

    fn begin_build(&mut self) {
        self.player = Player::at_start();
        if self.animate {
            self.maze = MazeState::Building(MazeBuilder::new(self.size));
        } else {
            self.maze = MazeState::Ready(generate(self.size, &mut self.rng));
            self.progress = progression::maze_ready(self.progress);
        }
    }

    fn complete_build(&mut self) {
        let maze = std::mem::replace(&mut self.maze, MazeState::Empty);
        self.maze = match maze {
            MazeState::Building(b) => MazeState::Ready(b.finish(&mut self.rng)),
            other => other,
        };
        self.progress = progression::maze_ready(self.progress);
    }
}
