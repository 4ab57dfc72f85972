/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Each board tile is two terminal columns by one row. Entity pixel
/// positions snap to the nearest tile; anything outside the board (an
/// entity mid-wrap) is not drawn.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Block, Kind, SpriteId};
use crate::domain::physics::TILE_SIZE;
use crate::sim::view::{FrameView, Hud, SpriteDraw};
use super::sprites::{Glyph, SpriteSheet, TILE_COLUMNS};

// ── Cell: the unit of the back-buffer ──

const CELL_BYTES: usize = 16;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; CELL_BYTES], // up to 16 bytes (supports ZWJ emoji sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this glyph occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide glyph (skip render)
}

impl Cell {
    const BASE_BG: Color = Color::Black;

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; CELL_BYTES],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    /// Cell holding a whole glyph string, clipped at a char boundary.
    fn from_str(s: &str, fg: Color, bg: Color, wide: bool) -> Self {
        let mut cell = Self::BLANK;
        let mut len = 0;
        for (i, c) in s.char_indices() {
            let end = i + c.len_utf8();
            if end > CELL_BYTES { break; }
            len = end;
        }
        cell.ch[..len].copy_from_slice(&s.as_bytes()[..len]);
        cell.ch_len = len as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell.wide = wide;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("")
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
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }

    /// Draw a glyph into one tile (two columns).
    fn put_glyph(&mut self, col: usize, row: usize, glyph: &Glyph) {
        if glyph.width >= TILE_COLUMNS {
            self.set(col, row, Cell::from_str(&glyph.text, glyph.color, Cell::BASE_BG, true));
            self.set(col + 1, row, Cell::WIDE_CONT);
        } else {
            self.set(col, row, Cell::from_str(&glyph.text, glyph.color, Cell::BASE_BG, false));
            self.set(col + 1, row, Cell::BLANK);
        }
    }
}

// ── Renderer ──

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const PELLET_CHAR: char = '·';
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_overlay: Option<(bool, bool)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_overlay: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, view: &FrameView, sheet: &SpriteSheet) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Overlay change → clear for clean transition
        let overlay = (view.hud.paused, view.hud.game_over);
        if self.last_overlay != Some(overlay) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_overlay = Some(overlay);
        }

        self.compose(view, sheet);

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide glyph)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide glyph printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, view: &FrameView, sheet: &SpriteSheet) {
        self.front.clear();

        let cols = (view.board.width / TILE_SIZE).max(0) as usize;
        let rows = (view.board.height / TILE_SIZE).max(0) as usize;

        self.compose_hud(&view.hud);

        // Back to front: walls, food, then the movers
        for wall in view.walls {
            self.compose_block(wall, sheet, cols, rows);
        }
        for pellet in view.pellets {
            self.compose_block(pellet, sheet, cols, rows);
        }
        for cherry in view.cherries {
            self.compose_block(cherry, sheet, cols, rows);
        }
        if let Some(power) = view.power_pellet {
            self.compose_block(power, sheet, cols, rows);
        }
        for ghost in &view.ghosts {
            self.compose_draw(ghost, sheet, cols, rows);
        }
        self.compose_draw(&view.avatar, sheet, cols, rows);

        // ── Help bar ──
        let help_row = MAP_ROW + rows + 1;
        let help = " ←↑↓→:Move  SPACE:Pause  R:Restart  ESC/Q:Quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);

        if view.hud.game_over {
            self.compose_overlay(cols, rows, "GAME OVER", "Press R to restart", Color::Rgb { r: 255, g: 60, b: 60 });
        } else if view.hud.paused {
            self.compose_overlay(cols, rows, "PAUSED", "Press SPACE to continue", Color::Rgb { r: 255, g: 220, b: 50 });
        }
    }

    fn compose_hud(&mut self, hud: &Hud) {
        // Fill entire HUD row with background
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, HUD_BG));
        }
        let text = format!(
            " x{}  Score: {}   High Score: {}   Level: {} ",
            hud.lives, hud.score, hud.high_score, hud.level,
        );
        self.front.put_str(0, HUD_ROW, &text, Color::White, HUD_BG);
    }

    fn compose_block(&mut self, block: &Block, sheet: &SpriteSheet, cols: usize, rows: usize) {
        // Pellets carry no sprite and are drawn as a plain dot
        if block.kind == Kind::Pellet {
            if let Some((col, row)) = tile_of(block.x, block.y, block.w, block.h, cols, rows) {
                let dot = Cell::from_char(PELLET_CHAR, Color::White, Cell::BASE_BG);
                self.front.set(col * TILE_COLUMNS, MAP_ROW + row, dot);
            }
            return;
        }
        self.compose_sprite(block.x, block.y, block.w, block.h, block.sprite, sheet, cols, rows);
    }

    fn compose_draw(&mut self, draw: &SpriteDraw, sheet: &SpriteSheet, cols: usize, rows: usize) {
        self.compose_sprite(draw.x, draw.y, draw.w, draw.h, draw.sprite, sheet, cols, rows);
    }

    #[allow(clippy::too_many_arguments)]
    fn compose_sprite(
        &mut self,
        x: i32, y: i32, w: i32, h: i32,
        sprite: Option<SpriteId>,
        sheet: &SpriteSheet,
        cols: usize, rows: usize,
    ) {
        let Some(id) = sprite else { return };
        if let Some((col, row)) = tile_of(x, y, w, h, cols, rows) {
            self.front.put_glyph(col * TILE_COLUMNS, MAP_ROW + row, sheet.get(id));
        }
    }

    /// Two-line message box centred on the board.
    fn compose_overlay(&mut self, cols: usize, rows: usize, title: &str, hint: &str, color: Color) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let board_w = cols * TILE_COLUMNS;
        // Whole tiles only, so no wide glyph is cut in half at the edges
        let box_w = ((hint.chars().count() + 5) & !1).min(board_w.max(1));
        let box_x = (board_w.saturating_sub(box_w) / 2) & !1;
        let box_y = MAP_ROW + rows.saturating_sub(4) / 2;

        for y in box_y..box_y + 4 {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::White, dim));
            }
        }
        let centre = |s: &str| box_x + box_w.saturating_sub(s.chars().count()) / 2;
        self.front.put_str(centre(title), box_y + 1, title, color, dim);
        self.front.put_str(centre(hint), box_y + 2, hint, Color::White, dim);
    }
}

/// Nearest tile for an entity's centre, or None if it is off the board.
fn tile_of(x: i32, y: i32, w: i32, h: i32, cols: usize, rows: usize) -> Option<(usize, usize)> {
    let col = (x + w / 2).div_euclid(TILE_SIZE);
    let row = (y + h / 2).div_euclid(TILE_SIZE);
    if col < 0 || row < 0 || col as usize >= cols || row as usize >= rows {
        return None;
    }
    Some((col as usize, row as usize))
}
