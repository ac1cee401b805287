/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of terminal cells)
///   2. Compare each cell with `back` (the previous frame)
///   3. Emit terminal commands only for cells that changed
///   4. Batch everything with `queue!`, flush once at the end
///   5. Swap front/back
///
/// ## Maze layout
///
/// A cols×rows maze becomes a (2·cols+1)×(2·rows+1) block map: odd/odd
/// blocks are cell interiors, odd/even and even/odd blocks are the walls
/// between them, even/even blocks are corner posts. Each block is two
/// terminal columns wide so cells come out roughly square.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{Grid, GridSize, Side};
use crate::sim::progression::{Status, MAX_LEVEL};
use crate::sim::world::WorldState;
use super::confetti::Confetti;

/// Rows reserved for the header and the message line.
pub const HUD_ROWS: u16 = 2;
const BLOCK_W: usize = 2;

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const WALL: Color = Color::Rgb { r: 200, g: 200, b: 215 };
const PLAYER: Color = Color::Rgb { r: 230, g: 40, b: 40 };
const FINISH: Color = Color::Rgb { r: 40, g: 190, b: 70 };
const CARVE_HEAD: Color = Color::Rgb { r: 240, g: 200, b: 40 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Differs from any real cell, so every position gets redrawn.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (k, ch) in s.chars().enumerate() {
            self.set(x + k, y, Cell::new(ch, fg, BASE_BG));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg);
    }
}

/// Largest maze that fits a `term_w`×`term_h` terminal with the HUD.
pub fn fit_grid(term_w: u16, term_h: u16) -> GridSize {
    let blocks_w = term_w as usize / BLOCK_W;
    let blocks_h = term_h.saturating_sub(HUD_ROWS) as usize;
    GridSize::clamped(blocks_w.saturating_sub(1) / 2, blocks_h.saturating_sub(1) / 2)
}

/// Is the block at (bx, by) of the block map solid?
fn block_is_wall(grid: &Grid, bx: usize, by: usize) -> bool {
    let (cols, rows) = (grid.cols(), grid.rows());
    match (bx % 2, by % 2) {
        (0, 0) => true,
        (1, 1) => false,
        (1, 0) => {
            let i = bx / 2;
            let j = by / 2;
            if j < rows { grid.has_wall(i, j, Side::Top) } else { grid.has_wall(i, rows - 1, Side::Bottom) }
        }
        _ => {
            let i = bx / 2;
            let j = by / 2;
            if i < cols { grid.has_wall(i, j, Side::Left) } else { grid.has_wall(cols - 1, j, Side::Right) }
        }
    }
}

pub struct Renderer {
    front: FrameBuffer,
    back: FrameBuffer,
    out: BufWriter<io::Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            out: BufWriter::with_capacity(64 * 1024, io::stdout()),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn render(&mut self, world: &WorldState, confetti: &Confetti) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        let (w, h) = (tw as usize, th as usize);
        if w != self.front.width || h != self.front.height {
            self.front = FrameBuffer::new(w, h);
            self.back = FrameBuffer::new(w, h);
            self.back.invalidate();
            queue!(self.out, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.draw_hud(world);
        self.draw_maze(world);
        self.draw_confetti(confetti);
        if world.progress.is_won() {
            self.draw_win_banner();
        }
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Layers ──

    fn draw_hud(&mut self, world: &WorldState) {
        let status = match world.progress.status {
            Status::Playing if world.paused => "PAUSED",
            Status::Playing => "",
            Status::Advancing => "carving...",
            Status::Won => "ESCAPED!",
        };
        let header = format!(
            " MAZE RUN   Level: {} / {}   {}",
            world.progress.level, MAX_LEVEL, status
        );
        self.front.put_str(0, 0, &header, Color::White);
        let help = "[WASD/Arrows] Move  [R] Restart  [P] Pause  [Q] Quit ";
        let x = self.front.width.saturating_sub(help.len());
        if x > header.len() {
            self.front.put_str(x, 0, help, Color::DarkGrey);
        }
        if !world.message.is_empty() {
            let y = self.front.height.saturating_sub(1);
            self.front.put_centered(y, &world.message, Color::Yellow);
        }
    }

    fn draw_maze(&mut self, world: &WorldState) {
        let grid = match world.visible_grid() {
            Some(g) => g,
            None => return,
        };
        let blocks_w = 2 * grid.cols() + 1;
        let blocks_h = 2 * grid.rows() + 1;
        let ox = self.front.width.saturating_sub(blocks_w * BLOCK_W) / 2;
        let oy = HUD_ROWS as usize - 1;

        for by in 0..blocks_h {
            for bx in 0..blocks_w {
                if block_is_wall(grid, bx, by) {
                    self.fill_block(ox, oy, bx, by, Cell::new(' ', WALL, WALL));
                }
            }
        }

        for cell in grid.cells().iter().filter(|c| c.finish) {
            self.fill_block(ox, oy, 2 * cell.i + 1, 2 * cell.j + 1, Cell::new('▒', FINISH, BASE_BG));
        }

        if let Some((cx, cy)) = world.carve_head() {
            self.fill_block(ox, oy, 2 * cx + 1, 2 * cy + 1, Cell::new(' ', CARVE_HEAD, CARVE_HEAD));
        } else {
            let p = world.player;
            let (sx, sy) = (ox + (2 * p.x + 1) * BLOCK_W, oy + 2 * p.y + 1);
            self.front.set(sx, sy, Cell::new('●', PLAYER, BASE_BG));
            self.front.set(sx + 1, sy, Cell::new(' ', PLAYER, BASE_BG));
        }
    }

    fn fill_block(&mut self, ox: usize, oy: usize, bx: usize, by: usize, cell: Cell) {
        for dx in 0..BLOCK_W {
            self.front.set(ox + bx * BLOCK_W + dx, oy + by, cell);
        }
    }

    fn draw_confetti(&mut self, confetti: &Confetti) {
        for p in confetti.particles() {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let a = p.opacity.clamp(0.0, 1.0);
            let fade = |c: u8| (c as f32 * a) as u8;
            let fg = Color::Rgb { r: fade(p.rgb.0), g: fade(p.rgb.1), b: fade(p.rgb.2) };
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.front.width && y < self.front.height {
                let bg = self.front.get(x, y).bg;
                self.front.set(x, y, Cell::new(p.glyph(), fg, bg));
            }
        }
    }

    fn draw_win_banner(&mut self) {
        let y = self.front.height / 2;
        let line = format!("  You escaped all {} mazes!  ", MAX_LEVEL);
        self.front.put_centered(y, &line, Color::Green);
        self.front.put_centered(y + 1, "  [R] Play again   [Q] Quit  ", Color::White);
    }

    // ── Output ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.out, MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::maze::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fit_grid_leaves_room_for_hud() {
        let size = fit_grid(80, 24);
        assert_eq!(size, GridSize::clamped(19, 10));
        assert!((2 * size.cols() + 1) * BLOCK_W <= 80);
        assert!(2 * size.rows() + 1 + HUD_ROWS as usize - 1 <= 24);
    }

    #[test]
    fn fit_grid_never_degenerate() {
        assert_eq!(fit_grid(0, 0), GridSize::clamped(1, 1));
        assert_eq!(fit_grid(3, 2), GridSize::clamped(1, 1));
    }

    #[test]
    fn block_map_mirrors_wall_flags() {
        let g = generate(GridSize::clamped(6, 4), &mut StdRng::seed_from_u64(8));
        for cell in g.cells() {
            let (bx, by) = (2 * cell.i + 1, 2 * cell.j + 1);
            assert!(!block_is_wall(&g, bx, by));
            assert_eq!(block_is_wall(&g, bx, by - 1), cell.has_wall(Side::Top));
            assert_eq!(block_is_wall(&g, bx + 1, by), cell.has_wall(Side::Right));
            assert_eq!(block_is_wall(&g, bx, by + 1), cell.has_wall(Side::Bottom));
            assert_eq!(block_is_wall(&g, bx - 1, by), cell.has_wall(Side::Left));
        }
    }

    #[test]
    fn block_map_outer_frame_is_solid() {
        let g = generate(GridSize::clamped(5, 3), &mut StdRng::seed_from_u64(1));
        let (w, h) = (11, 7);
        for x in 0..w {
            assert!(block_is_wall(&g, x, 0));
            assert!(block_is_wall(&g, x, h - 1));
        }
        for y in 0..h {
            assert!(block_is_wall(&g, 0, y));
            assert!(block_is_wall(&g, w - 1, y));
        }
    }
}
