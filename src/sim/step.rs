/// Per-input simulation step.
///
/// Processing order:
///   1. Drop the intent unless a finished maze is in play
///   2. Movement (wall-checked)
///   3. Finish check → level progression
///   4. Progression follow-up (rebuild or win)

use crate::domain::movement::{attempt_move, Direction};
use super::event::GameEvent;
use super::progression::{self, Transition};
use super::world::WorldState;

pub fn step(world: &mut WorldState, intent: Option<Direction>) -> Vec<GameEvent> {
    let dir = match intent {
        Some(d) => d,
        None => return vec![],
    };
    if !world.progress.accepts_moves() || world.paused {
        return vec![];
    }
    let grid = match world.grid() {
        Some(g) => g,
        None => return vec![],
    };

    let before = world.player;
    let after = attempt_move(grid, before, dir);
    let finish = grid.finish();

    if after == before {
        return vec![GameEvent::Bumped];
    }
    world.player = after;
    let mut events = vec![GameEvent::Moved { x: after.x, y: after.y }];

    if (after.x, after.y) == finish {
        let (state, transition) = progression::on_finish_reached(world.progress);
        world.progress = state;
        if let Transition::Rebuild { level } = transition {
            events.push(GameEvent::LevelAdvanced { level });
        }
        events.extend(world.apply(transition));
    }

    events
}

/// Explicit restart: level 1, new maze, player at the start.
pub fn restart(world: &mut WorldState) -> Vec<GameEvent> {
    let (state, transition) = progression::restart(world.progress);
    world.progress = state;
    world.paused = false;
    let mut events = vec![GameEvent::Restarted];
    events.extend(world.apply(transition));
    events
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MazeConfig;
    use crate::domain::grid::{GridSize, Side};
    use crate::domain::movement::Player;
    use crate::sim::progression::{Status, MAX_LEVEL};

    fn cfg(animate: bool) -> MazeConfig {
        MazeConfig {
            cols: 0,
            rows: 0,
            seed: Some(99),
            animate,
            carve_steps_per_tick: 3,
        }
    }

    /// Column of two cells: one passage, Down always reaches the finish.
    fn corridor(animate: bool) -> WorldState {
        WorldState::new(&cfg(animate), GridSize::clamped(1, 2))
    }

    fn build_out(world: &mut WorldState) -> Vec<GameEvent> {
        let mut events = vec![];
        while world.is_building() {
            events.extend(world.tick_generation());
        }
        events
    }

    #[test]
    fn new_world_is_ready_at_level_one() {
        let world = WorldState::new(&cfg(false), GridSize::clamped(6, 4));
        assert_eq!(world.progress.level, 1);
        assert_eq!(world.progress.status, Status::Playing);
        assert_eq!(world.player, Player::at_start());
        assert_eq!(world.grid().map(|g| g.passage_count()), Some(23));
    }

    #[test]
    fn no_intent_is_a_no_op() {
        let mut world = corridor(false);
        assert!(step(&mut world, None).is_empty());
        assert_eq!(world.player, Player::at_start());
    }

    #[test]
    fn blocked_move_reports_bump() {
        let mut world = corridor(false);
        assert_eq!(step(&mut world, Some(Direction::Up)), vec![GameEvent::Bumped]);
        assert_eq!(step(&mut world, Some(Direction::Up)), vec![GameEvent::Bumped]);
        assert_eq!(world.player, Player::at_start());
    }

    #[test]
    fn reaching_finish_advances_and_rebuilds() {
        let mut world = corridor(false);
        let events = step(&mut world, Some(Direction::Down));
        assert_eq!(
            events,
            vec![
                GameEvent::Moved { x: 0, y: 1 },
                GameEvent::LevelAdvanced { level: 2 },
                GameEvent::MazeReady { level: 2 },
            ]
        );
        assert_eq!(world.progress.level, 2);
        assert_eq!(world.progress.status, Status::Playing);
        assert_eq!(world.player, Player::at_start());
    }

    #[test]
    fn hundredth_finish_wins_without_rebuild() {
        let mut world = corridor(false);
        for level in 1..MAX_LEVEL {
            assert_eq!(world.progress.level, level);
            step(&mut world, Some(Direction::Down));
        }
        assert_eq!(world.progress.level, MAX_LEVEL);
        let events = step(&mut world, Some(Direction::Down));
        assert_eq!(events, vec![GameEvent::Moved { x: 0, y: 1 }, GameEvent::Won]);
        assert!(world.progress.is_won());
        assert_eq!(world.player, Player::new(0, 1));
        assert!(step(&mut world, Some(Direction::Up)).is_empty());
        assert_eq!(world.player, Player::new(0, 1));
    }

    #[test]
    fn restart_after_win_resets_everything() {
        let mut world = corridor(false);
        for _ in 0..MAX_LEVEL {
            step(&mut world, Some(Direction::Down));
        }
        assert!(world.progress.is_won());
        let events = restart(&mut world);
        assert_eq!(events, vec![GameEvent::Restarted, GameEvent::MazeReady { level: 1 }]);
        assert_eq!(world.progress.level, 1);
        assert_eq!(world.progress.status, Status::Playing);
        assert_eq!(world.player, Player::at_start());
    }

    #[test]
    fn restart_mid_run_gives_connected_maze() {
        let mut world = WorldState::new(&cfg(false), GridSize::clamped(7, 5));
        world.progress.level = 42;
        restart(&mut world);
        assert_eq!(world.progress.level, 1);
        assert_eq!(world.grid().map(|g| g.passage_count()), Some(34));
    }

    #[test]
    fn input_dropped_while_animated_build_runs() {
        let mut world = WorldState::new(&cfg(true), GridSize::clamped(5, 5));
        assert!(world.is_building());
        assert_eq!(world.progress.status, Status::Advancing);
        assert!(world.grid().is_none());
        assert!(world.carve_head().is_some());
        assert!(step(&mut world, Some(Direction::Right)).is_empty());
        assert_eq!(world.player, Player::at_start());

        let events = build_out(&mut world);
        assert_eq!(events, vec![GameEvent::MazeReady { level: 1 }]);
        assert_eq!(world.progress.status, Status::Playing);
        assert_eq!(world.grid().map(|g| g.passage_count()), Some(24));
    }

    #[test]
    fn animated_advance_waits_for_carving() {
        let mut world = corridor(true);
        build_out(&mut world);
        let events = step(&mut world, Some(Direction::Down));
        assert_eq!(
            events,
            vec![GameEvent::Moved { x: 0, y: 1 }, GameEvent::LevelAdvanced { level: 2 }]
        );
        assert_eq!(world.progress.status, Status::Advancing);
        assert_eq!(build_out(&mut world), vec![GameEvent::MazeReady { level: 2 }]);
    }

    #[test]
    fn paused_world_ignores_moves() {
        let mut world = corridor(false);
        world.paused = true;
        assert!(step(&mut world, Some(Direction::Down)).is_empty());
        assert_eq!(world.progress.level, 1);
    }

    #[test]
    fn resize_rebuilds_same_level() {
        let mut world = WorldState::new(&cfg(false), GridSize::clamped(4, 4));
        world.progress.level = 9;
        world.player = Player::new(2, 2);
        let events = world.resize(GridSize::clamped(6, 3));
        assert_eq!(events, vec![GameEvent::MazeReady { level: 9 }]);
        assert_eq!(world.progress.level, 9);
        assert_eq!(world.player, Player::at_start());
        assert_eq!(world.grid().map(|g| g.finish()), Some((5, 2)));
        assert!(world.resize(GridSize::clamped(6, 3)).is_empty());
    }

    #[test]
    fn walking_an_open_wall_moves_the_player() {
        let mut world = WorldState::new(&cfg(false), GridSize::clamped(5, 5));
        let open = {
            let g = world.grid().unwrap();
            [Direction::Right, Direction::Down]
                .into_iter()
                .find(|d| !g.has_wall(0, 0, d.side()))
        };
        let dir = open.unwrap();
        let events = step(&mut world, Some(dir));
        assert!(matches!(events[0], GameEvent::Moved { .. }));
        let expected = match dir.side() {
            Side::Right => Player::new(1, 0),
            _ => Player::new(0, 1),
        };
        assert_eq!(world.player, expected);
    }
}
