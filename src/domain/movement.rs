/// Player position and wall-checked movement.
///
/// `attempt_move` is pure: it reads the grid and returns the new player.
/// Only the wall on the current cell's face is checked; carving clears
/// both faces together, so the target cell's opposite face always agrees.

use super::grid::{Grid, Side};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The cell face crossed when moving this way.
    pub fn side(self) -> Side {
        match self {
            Direction::Up => Side::Top,
            Direction::Down => Side::Bottom,
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Player {
    pub x: usize,
    pub y: usize,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player { x, y }
    }

    /// Level start position.
    pub fn at_start() -> Self {
        Player::default()
    }
}

/// Move one cell if the target is on the grid and no wall is in the way;
/// otherwise return the player unchanged.
pub fn attempt_move(grid: &Grid, player: Player, dir: Direction) -> Player {
    let side = dir.side();
    let target = match grid.step(player.x, player.y, side) {
        Some(t) => t,
        None => return player,
    };
    if grid.has_wall(player.x, player.y, side) {
        return player;
    }
    Player::new(target.0, target.1)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::GridSize;
    use crate::domain::maze::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn maze(cols: usize, rows: usize, seed: u64) -> Grid {
        generate(GridSize::clamped(cols, rows), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn closed_grid_blocks_everything() {
        let g = Grid::new(GridSize::clamped(3, 3));
        let p = Player::new(1, 1);
        for dir in Direction::ALL {
            assert_eq!(attempt_move(&g, p, dir), p);
        }
    }

    #[test]
    fn border_blocks_even_without_checking_walls() {
        let g = maze(1, 1, 0);
        let p = Player::at_start();
        for dir in Direction::ALL {
            assert_eq!(attempt_move(&g, p, dir), p);
        }
    }

    #[test]
    fn moves_follow_wall_flags_everywhere() {
        for seed in 0..10 {
            let g = maze(8, 6, seed);
            for cell in g.cells() {
                let p = Player::new(cell.i, cell.j);
                for dir in Direction::ALL {
                    let q = attempt_move(&g, p, dir);
                    assert!(q.x < g.cols() && q.y < g.rows());
                    if cell.has_wall(dir.side()) {
                        assert_eq!(q, p);
                    } else {
                        assert_eq!(g.step(p.x, p.y, dir.side()), Some((q.x, q.y)));
                    }
                }
            }
        }
    }

    #[test]
    fn blocked_move_is_idempotent() {
        let g = maze(5, 5, 9);
        let p = Player::at_start();
        for dir in [Direction::Up, Direction::Left] {
            let once = attempt_move(&g, p, dir);
            let twice = attempt_move(&g, once, dir);
            assert_eq!(once, p);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn two_by_two_reaches_finish() {
        for seed in 0..10 {
            let g = maze(2, 2, seed);
            let routes = [
                [Direction::Right, Direction::Down],
                [Direction::Down, Direction::Right],
            ];
            let reached = routes.iter().any(|route| {
                let end = route
                    .iter()
                    .fold(Player::at_start(), |p, &d| attempt_move(&g, p, d));
                (end.x, end.y) == g.finish()
            });
            assert!(reached, "seed {seed}");
        }
    }

    #[test]
    fn move_is_reversible_through_open_wall() {
        let g = maze(6, 6, 4);
        let p = Player::at_start();
        for (dir, back) in [(Direction::Right, Direction::Left), (Direction::Down, Direction::Up)] {
            let q = attempt_move(&g, p, dir);
            if q != p {
                assert_eq!(attempt_move(&g, q, back), p);
            }
        }
    }
}
