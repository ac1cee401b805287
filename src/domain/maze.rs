/// Maze generator: randomized depth-first backtracking.
///
/// `MazeBuilder` owns the grid while carving and advances one step at a
/// time, so the caller can interleave rendering between steps. `generate()`
/// is the synchronous form that runs the builder to completion.
///
/// Each step does exactly one of:
///   - Carve: pick a uniformly random unvisited neighbour of the current
///     cell, push the current cell, open the shared wall, move into it.
///   - Backtrack: no unvisited neighbours, pop the stack into current.
///   - Finish: nothing left to pop.
///
/// Every cell is entered once, so a full build is at most `n` carves plus
/// `n` backtracks and leaves exactly `n - 1` passages (a spanning tree).

use rand::Rng;

use super::grid::{Grid, GridSize, Side};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CarveStep {
    Carved { from: (usize, usize), to: (usize, usize) },
    Backtracked { to: (usize, usize) },
    Done,
}

pub struct MazeBuilder {
    grid: Grid,
    /// Build-time scratch, dropped with the builder.
    visited: Vec<bool>,
    stack: Vec<(usize, usize)>,
    current: (usize, usize),
    done: bool,
}

impl MazeBuilder {
    pub fn new(size: GridSize) -> Self {
        let grid = Grid::new(size);
        let mut visited = vec![false; size.cell_count()];
        visited[0] = true;
        MazeBuilder {
            grid,
            visited,
            stack: Vec::with_capacity(size.cell_count()),
            current: (0, 0),
            done: false,
        }
    }

    /// Advance the carve by one step.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CarveStep {
        if self.done {
            return CarveStep::Done;
        }

        let (i, j) = self.current;
        let mut options = [Side::Top; 4];
        let mut count = 0;
        for side in Side::ALL {
            if let Some((ni, nj)) = self.grid.step(i, j, side) {
                if !self.visited[ni + nj * self.grid.cols()] {
                    options[count] = side;
                    count += 1;
                }
            }
        }

        if count > 0 {
            let side = options[rng.gen_range(0..count)];
            if let Some(next) = self.grid.carve(i, j, side) {
                self.stack.push(self.current);
                self.visited[next.0 + next.1 * self.grid.cols()] = true;
                self.current = next;
                return CarveStep::Carved { from: (i, j), to: next };
            }
        }

        match self.stack.pop() {
            Some(prev) => {
                self.current = prev;
                CarveStep::Backtracked { to: prev }
            }
            None => {
                self.done = true;
                CarveStep::Done
            }
        }
    }

    /// Iterate carve steps until completion (the final `Done` is not yielded).
    #[cfg(test)]
    pub fn steps<'a, R: Rng + ?Sized>(&'a mut self, rng: &'a mut R) -> Steps<'a, R> {
        Steps { builder: self, rng }
    }

    /// Run any remaining steps and hand over the finished grid.
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Grid {
        while self.step(rng) != CarveStep::Done {}
        self.grid
    }

    pub fn is_done(&self) -> bool { self.done }

    /// Partially carved grid, for drawing progress only.
    pub fn preview(&self) -> &Grid { &self.grid }

    /// Cell the carve head currently sits on.
    pub fn current(&self) -> (usize, usize) { self.current }

    #[cfg(test)]
    pub fn stack_depth(&self) -> usize { self.stack.len() }

    #[cfg(test)]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
pub struct Steps<'a, R: Rng + ?Sized> {
    builder: &'a mut MazeBuilder,
    rng: &'a mut R,
}

#[cfg(test)]
impl<'a, R: Rng + ?Sized> Iterator for Steps<'a, R> {
    type Item = CarveStep;

    fn next(&mut self) -> Option<CarveStep> {
        match self.builder.step(self.rng) {
            CarveStep::Done => None,
            step => Some(step),
        }
    }
}

/// Build a complete perfect maze in one call.
pub fn generate<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Grid {
    MazeBuilder::new(size).finish(rng)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
