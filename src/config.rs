/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::grid::{GridError, GridSize, MAX_DIM};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    pub cols: usize,   // 0 = fit to terminal
    pub rows: usize,   // 0 = fit to terminal
    pub seed: Option<u64>,
    pub animate: bool,
    pub carve_steps_per_tick: u32,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub win_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

impl MazeConfig {
    /// Fixed dimensions win; zero falls back to what fits the terminal.
    pub fn size_for(&self, fit: GridSize) -> GridSize {
        let cols = if self.cols == 0 { fit.cols() } else { self.cols };
        let rows = if self.rows == 0 { fit.rows() } else { self.rows };
        GridSize::clamped(cols, rows)
    }

    pub fn fits_terminal(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

#[derive(Debug, Error)]
enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default)]
    cols: i64,
    #[serde(default)]
    rows: i64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_animate")]
    animate: bool,
    #[serde(default = "default_carve_steps")]
    carve_steps_per_tick: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_win_delay")]
    win_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_animate() -> bool { true }
fn default_carve_steps() -> u32 { 4 }
fn default_tick_rate() -> u64 { 10 }
fn default_win_delay() -> u64 { 300 }

fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            cols: 0,
            rows: 0,
            seed: None,
            animate: default_animate(),
            carve_steps_per_tick: default_carve_steps(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            win_delay_ms: default_win_delay(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            restart: default_restart(),
            quit: default_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        let ((cols, rows), problem) = dimensions(t.maze.cols, t.maze.rows);
        if let Some(e) = problem {
            eprintln!("Warning: {e}; clamping to 1..={MAX_DIM}.");
        }
        GameConfig {
            maze: MazeConfig {
                cols,
                rows,
                seed: t.maze.seed,
                animate: t.maze.animate,
                carve_steps_per_tick: t.maze.carve_steps_per_tick.max(1),
            },
            speed: SpeedConfig {
                tick_rate_ms: t.speed.tick_rate_ms.max(1),
                win_delay_ms: t.speed.win_delay_ms,
            },
            gamepad: GamepadConfig {
                restart: t.gamepad.restart,
                quit: t.gamepad.quit,
            },
        }
    }
}

/// Zero keeps "fit to terminal" on that axis. The explicit axes are checked
/// as one pair; out-of-range values come back clamped with the error.
fn dimensions(cols: i64, rows: i64) -> ((usize, usize), Option<GridError>) {
    let explicit = |v: i64| if v == 0 { 1 } else { v };
    let problem = GridSize::new(explicit(cols), explicit(rows)).err();
    ((axis(cols), axis(rows)), problem)
}

fn axis(value: i64) -> usize {
    match value {
        0 => 0,
        v if v < 0 => 1,
        v => (v as u64).min(MAX_DIM as u64) as usize,
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/mazerun");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match read_toml(&path) {
            Ok(cfg) => return cfg,
            Err(e @ ConfigError::Parse(_)) => {
                eprintln!("Warning: {e}");
                eprintln!("Using default settings.");
                return TomlConfig::default();
            }
            Err(e) => eprintln!("Warning: {e}"),
        }
    }
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    Ok(parse(&text)?)
}

fn parse(text: &str) -> Result<TomlConfig, toml::de::Error> {
    toml::from_str::<TomlConfig>(text)
}
