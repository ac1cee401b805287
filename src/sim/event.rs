/// Events emitted by the simulation.
/// The presentation layer consumes these for sound and effects.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    Moved { x: usize, y: usize },
    Bumped,
    LevelAdvanced { level: u32 },
    MazeReady { level: u32 },
    Won,
    Restarted,
}
