/// Grid model: a fixed cols×rows arena of cells and their walls.
///
/// Cells are stored row-major and addressed by `i + j * cols`, where
/// `i` is the column and `j` the row. Walls start fully closed; the only
/// way to open one is `carve()`, which clears both faces of a shared wall
/// at once so neighbouring cells always agree.
///
/// Wall state is written only by the maze builder. Everything downstream
/// (movement, renderer) reads through `&Grid`.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must be at least 1x1 (got {cols}x{rows})")]
    Degenerate { cols: i64, rows: i64 },
    #[error("grid may be at most {max}x{max} (got {cols}x{rows})", max = MAX_DIM)]
    TooLarge { cols: i64, rows: i64 },
}

/// Largest accepted extent on either axis.
pub const MAX_DIM: usize = 1024;

/// Validated grid dimensions, each within `1..=MAX_DIM`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridSize {
    cols: usize,
    rows: usize,
}

impl GridSize {
    pub fn new(cols: i64, rows: i64) -> Result<Self, GridError> {
        if cols < 1 || rows < 1 {
            return Err(GridError::Degenerate { cols, rows });
        }
        if cols > MAX_DIM as i64 || rows > MAX_DIM as i64 {
            return Err(GridError::TooLarge { cols, rows });
        }
        Ok(GridSize { cols: cols as usize, rows: rows as usize })
    }

    /// Clamp into `1..=MAX_DIM` instead of rejecting.
    pub fn clamped(cols: usize, rows: usize) -> Self {
        GridSize {
            cols: cols.clamp(1, MAX_DIM),
            rows: rows.clamp(1, MAX_DIM),
        }
    }

    pub fn cols(self) -> usize { self.cols }
    pub fn rows(self) -> usize { self.rows }

    /// Both axes are capped at `MAX_DIM`, so this cannot overflow.
    pub fn cell_count(self) -> usize {
        self.cols * self.rows
    }
}

/// One face of a cell. Discriminants index `Cell::walls`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    /// Scan order used when gathering neighbours.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// (di, dj) step across this face.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
    /// top, right, bottom, left. `true` = wall present.
    pub walls: [bool; 4],
    pub finish: bool,
}

impl Cell {
    fn new(i: usize, j: usize) -> Self {
        Cell { i, j, walls: [true; 4], finish: false }
    }

    #[inline]
    pub fn has_wall(&self, side: Side) -> bool {
        self.walls[side as usize]
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate a fully walled grid with the finish marker on the last cell.
    pub fn new(size: GridSize) -> Self {
        let mut cells = Vec::with_capacity(size.cell_count());
        for j in 0..size.rows {
            for i in 0..size.cols {
                cells.push(Cell::new(i, j));
            }
        }
        if let Some(last) = cells.last_mut() {
            last.finish = true;
        }
        Grid { size, cells }
    }

    pub fn cols(&self) -> usize { self.size.cols }
    pub fn rows(&self) -> usize { self.size.rows }
    pub fn cells(&self) -> &[Cell] { &self.cells }

    /// Row-major index, or None when (i, j) lies outside the grid.
    #[inline]
    pub fn index(&self, i: isize, j: isize) -> Option<usize> {
        if i < 0 || j < 0 {
            return None;
        }
        let (i, j) = (i as usize, j as usize);
        if i >= self.size.cols || j >= self.size.rows {
            return None;
        }
        Some(i + j * self.size.cols)
    }

    /// Cell at (i, j); any out-of-range coordinate, negative included, is None.
    #[inline]
    pub fn neighbor_at(&self, i: isize, j: isize) -> Option<&Cell> {
        self.index(i, j).map(|idx| &self.cells[idx])
    }

    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        self.neighbor_at(i as isize, j as isize)
    }

    /// Coordinates of the cell across `side` from (i, j), if inside the grid.
    pub fn step(&self, i: usize, j: usize, side: Side) -> Option<(usize, usize)> {
        let (di, dj) = side.offset();
        let (ni, nj) = (i as isize + di, j as isize + dj);
        self.index(ni, nj).map(|_| (ni as usize, nj as usize))
    }

    /// Wall flag of (i, j) on `side`. Out-of-range cells read as walled.
    #[inline]
    pub fn has_wall(&self, i: usize, j: usize, side: Side) -> bool {
        self.cell(i, j).map_or(true, |c| c.has_wall(side))
    }

    /// The goal cell, always the last one in row-major order.
    pub fn finish(&self) -> (usize, usize) {
        (self.size.cols - 1, self.size.rows - 1)
    }

    /// Open the wall between (i, j) and its neighbour across `side`,
    /// clearing both faces. Returns the neighbour, or None at the border.
    pub(super) fn carve(&mut self, i: usize, j: usize, side: Side) -> Option<(usize, usize)> {
        let (ni, nj) = self.step(i, j, side)?;
        let a = i + j * self.size.cols;
        let b = ni + nj * self.size.cols;
        self.cells[a].walls[side as usize] = false;
        self.cells[b].walls[side.opposite() as usize] = false;
        Some((ni, nj))
    }

    /// Number of opened internal walls, each shared pair counted once.
    #[cfg(test)]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| {
                let right = !c.has_wall(Side::Right) && c.i + 1 < self.size.cols;
                let down = !c.has_wall(Side::Bottom) && c.j + 1 < self.size.rows;
                right as usize + down as usize
            })
            .sum()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
