/// Level progression state machine.
///
///   Playing(n) --finish, n < MAX--> Advancing(n+1) --maze ready--> Playing(n+1)
///   Playing(MAX) --finish--> Won
///   any --restart--> Playing(1)   (via Advancing(1) while the maze builds)
///
/// All transitions are pure: they take a `LevelState` and return the next
/// one plus what the caller has to do about it.

pub const MAX_LEVEL: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Playing,
    /// A fresh maze for `level` is being generated; input is dropped.
    Advancing,
    Won,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LevelState {
    pub level: u32,
    pub status: Status,
}

/// Follow-up the orchestrator owes after a transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Nothing changed.
    Stay,
    /// Build a new maze for this level.
    Rebuild { level: u32 },
    /// Final maze cleared: fire the win effect once.
    Won,
}

impl LevelState {
    pub fn new() -> Self {
        LevelState { level: 1, status: Status::Playing }
    }

    pub fn accepts_moves(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn is_won(&self) -> bool {
        self.status == Status::Won
    }
}

impl Default for LevelState {
    fn default() -> Self { LevelState::new() }
}

/// The player stepped onto the finish cell.
pub fn on_finish_reached(state: LevelState) -> (LevelState, Transition) {
    if state.status != Status::Playing {
        return (state, Transition::Stay);
    }
    if state.level >= MAX_LEVEL {
        let won = LevelState { level: MAX_LEVEL, status: Status::Won };
        return (won, Transition::Won);
    }
    let next = state.level + 1;
    (
        LevelState { level: next, status: Status::Advancing },
        Transition::Rebuild { level: next },
    )
}

/// Start over at level 1. Valid from any status.
pub fn restart(_state: LevelState) -> (LevelState, Transition) {
    (
        LevelState { level: 1, status: Status::Advancing },
        Transition::Rebuild { level: 1 },
    )
}

/// Regenerate the current level's maze (e.g. after a resize). No-op once won.
pub fn rebuild_current(state: LevelState) -> (LevelState, Transition) {
    if state.status == Status::Won {
        return (state, Transition::Stay);
    }
    (
        LevelState { level: state.level, status: Status::Advancing },
        Transition::Rebuild { level: state.level },
    )
}

/// Generation finished; play resumes on the new maze.
pub fn maze_ready(state: LevelState) -> LevelState {
    match state.status {
        Status::Advancing => LevelState { level: state.level, status: Status::Playing },
        _ => state,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(level: u32) -> LevelState {
        LevelState { level, status: Status::Playing }
    }

    #[test]
    fn starts_playing_level_one() {
        assert_eq!(LevelState::new(), playing(1));
        assert!(LevelState::new().accepts_moves());
    }

    #[test]
    fn finish_advances_through_advancing() {
        let (s, t) = on_finish_reached(playing(1));
        assert_eq!(s, LevelState { level: 2, status: Status::Advancing });
        assert_eq!(t, Transition::Rebuild { level: 2 });
        assert!(!s.accepts_moves());
        assert_eq!(maze_ready(s), playing(2));
    }

    #[test]
    fn ninety_nine_finishes_reach_level_hundred() {
        let mut s = LevelState::new();
        for _ in 0..99 {
            let (next, t) = on_finish_reached(s);
            assert!(matches!(t, Transition::Rebuild { .. }));
            s = maze_ready(next);
        }
        assert_eq!(s, playing(MAX_LEVEL));
        let (s, t) = on_finish_reached(s);
        assert_eq!(t, Transition::Won);
        assert!(s.is_won());
        assert_eq!(s.level, MAX_LEVEL);
    }

    #[test]
    fn won_is_terminal() {
        let won = LevelState { level: MAX_LEVEL, status: Status::Won };
        assert_eq!(on_finish_reached(won), (won, Transition::Stay));
        assert_eq!(rebuild_current(won), (won, Transition::Stay));
        assert_eq!(maze_ready(won), won);
    }

    #[test]
    fn finish_ignored_while_advancing() {
        let s = LevelState { level: 4, status: Status::Advancing };
        assert_eq!(on_finish_reached(s), (s, Transition::Stay));
    }

    #[test]
    fn restart_from_anywhere_goes_to_level_one() {
        for s in [
            playing(37),
            LevelState { level: 12, status: Status::Advancing },
            LevelState { level: MAX_LEVEL, status: Status::Won },
        ] {
            let (r, t) = restart(s);
            assert_eq!(t, Transition::Rebuild { level: 1 });
            assert_eq!(maze_ready(r), playing(1));
        }
    }

    #[test]
    fn rebuild_current_keeps_level() {
        let (s, t) = rebuild_current(playing(8));
        assert_eq!(t, Transition::Rebuild { level: 8 });
        assert_eq!(maze_ready(s), playing(8));
    }
}
