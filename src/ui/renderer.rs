/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The layout used for the frame is kept so clicks can be hit-tested
/// against exactly what was drawn.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::board::CellStatus;
use crate::domain::status::{ControlStatus, PlayerId};
use crate::sim::session::Session;
use crate::ui::avatar::AssetCatalog;
use crate::ui::layout::{self, Layout, Rect, HEX_H, HEX_W, HUD_ROW, PROMPT_LINES};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap color matches on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
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
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write at most `max` chars, ending with '…' when cut.
    fn put_clipped(&mut self, x: usize, y: usize, s: &str, max: usize, fg: Color, bg: Color) {
        if s.chars().count() <= max {
            self.put_str(x, y, s, fg, bg);
        } else if max > 0 {
            let cut: String = s.chars().take(max - 1).chain(std::iter::once('…')).collect();
            self.put_str(x, y, &cut, fg, bg);
        }
    }

    fn fill(&mut self, r: Rect, bg: Color) {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.set(x, y, Cell::new(' ', Color::White, bg));
            }
        }
    }

    fn fill_row(&mut self, y: usize, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
    }

    /// Single-line frame around `r`, with an optional title in the top edge.
    fn draw_box(&mut self, r: Rect, title: &str, fg: Color, bg: Color) {
        if r.w < 2 || r.h < 2 { return; }
        let (x1, y1) = (r.right() - 1, r.bottom() - 1);
        for x in r.x + 1..x1 {
            self.set(x, r.y, Cell::new('─', fg, bg));
            self.set(x, y1, Cell::new('─', fg, bg));
        }
        for y in r.y + 1..y1 {
            self.set(r.x, y, Cell::new('│', fg, bg));
            self.set(x1, y, Cell::new('│', fg, bg));
        }
        self.set(r.x, r.y, Cell::new('┌', fg, bg));
        self.set(x1, r.y, Cell::new('┐', fg, bg));
        self.set(r.x, y1, Cell::new('└', fg, bg));
        self.set(x1, y1, Cell::new('┘', fg, bg));
        if !title.is_empty() {
            self.put_clipped(r.x + 2, r.y, title, r.w.saturating_sub(4), fg, bg);
        }
    }
}

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const PANEL_FG: Color = Color::Rgb { r: 170, g: 170, b: 200 };
const CHOSEN_BG: Color = Color::Rgb { r: 40, g: 70, b: 110 };
const GOLD: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const PASSED_FG: Color = Color::Rgb { r: 90, g: 90, b: 110 };

fn player_color(p: PlayerId) -> Color {
    match p {
        PlayerId::First => Color::Rgb { r: 230, g: 90, b: 80 },
        PlayerId::Second => Color::Rgb { r: 90, g: 150, b: 240 },
    }
}

fn status_colors(status: ControlStatus) -> (Color, Color) {
    match status {
        ControlStatus::Start => (Color::Black, Color::Rgb { r: 80, g: 200, b: 120 }),
        ControlStatus::AskedQuestion => (Color::Black, Color::Rgb { r: 230, g: 200, b: 80 }),
        ControlStatus::AnswerChosen => (Color::Black, Color::Rgb { r: 100, g: 200, b: 220 }),
        ControlStatus::Incorrect => (Color::White, Color::Rgb { r: 190, g: 50, b: 50 }),
        ControlStatus::Correct => (Color::Black, Color::Rgb { r: 120, g: 240, b: 90 }),
        ControlStatus::Victory => (Color::Black, GOLD),
    }
}

// ── Renderer ──

/// Narrowest terminal the screen is laid out for.
const MIN_WIDTH: usize = 60;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    layout: Layout,
    pad_help: String,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            layout: Layout::default(),
            pad_help: String::new(),
        }
    }

    /// Help line shown while a gamepad is in use.
    pub fn set_pad_help(&mut self, help: String) {
        self.pad_help = help;
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame: back ≠ front for every cell.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    /// Hit regions of the last frame drawn.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// `cursor` is the gamepad answer cursor (1-based), when a pad is in use.
    pub fn render(&mut self, s: &Session, avatars: &AssetCatalog, cursor: Option<usize>) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let (nrows, ncols) = s.controller.board().dimensions();
        let layout = Layout::compute(self.term_w, s.controller.panel().answer_count(), nrows, ncols);

        // Build front buffer
        self.front.clear();
        let fits = self.term_w >= MIN_WIDTH.max(layout.board.right() + 1)
            && self.term_h >= layout.min_height();
        if fits {
            self.layout = layout;
            self.compose_hud(s);
            self.compose_avatar(s, avatars);
            self.compose_control(s);
            self.compose_board(s);
            self.compose_panel(s, cursor);
            self.compose_bars(s, cursor.is_some());
        } else {
            // Nothing clickable while the screen is too small.
            self.layout = Layout::default();
            let need_w = MIN_WIDTH.max(layout.board.right() + 1);
            self.compose_too_small(need_w, layout.min_height());
        }

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

        // Set explicit base colors at start of frame (never ResetColor,
        // which would fall back to the terminal's own default).
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
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

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, s: &Session) {
        let ctl = &s.controller;
        self.front.fill_row(HUD_ROW, Color::White, HUD_BG);
        self.front.put_str(1, HUD_ROW, &format!("⬡ {}", s.title), GOLD, HUD_BG);

        let who = ctl.current_player();
        let turn = if ctl.status() == ControlStatus::Victory {
            format!("{} wins! ", who.label())
        } else {
            let level = ctl.player().level;
            format!(
                "{}'s turn  Level {} ({} left) ",
                who.label(),
                ctl.board().row_name(level),
                ctl.remaining_questions(level),
            )
        };
        let x = self.front.width.saturating_sub(turn.chars().count() + 1);
        self.front.put_str(x, HUD_ROW, &turn, player_color(who), HUD_BG);
    }

    fn compose_avatar(&mut self, s: &Session, avatars: &AssetCatalog) {
        let r = self.layout.avatar;
        let key = s.controller.avatar();
        let title = format!(" {} ", s.controller.board().row_name(key.level));
        self.front.draw_box(r, &title, PANEL_FG, Color::Reset);

        let inner_w = r.w - 2;
        let inner_h = r.h - 2;
        let frame = avatars.frame_at(key, s.anim_tick);
        let top = r.y + 1 + inner_h.saturating_sub(frame.len()) / 2;
        for (i, line) in frame.iter().take(inner_h).enumerate() {
            let len = line.chars().count().min(inner_w);
            let x = r.x + 1 + (inner_w - len) / 2;
            self.front.put_clipped(x, top + i, line, inner_w, Color::White, Color::Reset);
        }
    }

    /// Hex-shaped control button showing the turn phase.
    fn compose_control(&mut self, s: &Session) {
        let r = self.layout.control;
        let status = s.controller.status();
        let (fg, bg) = status_colors(status);
        let inner = r.w - 2;

        let top: String = std::iter::once('/').chain("‾".repeat(inner).chars()).chain(std::iter::once('\\')).collect();
        let bottom: String = std::iter::once('\\').chain("_".repeat(inner).chars()).chain(std::iter::once('/')).collect();
        let mid = format!("<{:^inner$}>", status.label());

        self.front.put_str(r.x, r.y, &top, bg, Color::Reset);
        self.front.put_str(r.x, r.y + 1, &mid, fg, bg);
        self.front.put_str(r.x, r.y + 2, &bottom, bg, Color::Reset);
    }

    /// Hex board: level 0 at the bottom, odd columns half a cell lower.
    fn compose_board(&mut self, s: &Session) {
        let ctl = &s.controller;
        let board = ctl.board();
        let (nrows, ncols) = board.dimensions();
        let origin = self.layout.board;
        let pawns = [PlayerId::First, PlayerId::Second].map(|p| (p, ctl.position(p)));

        for row in 0..nrows {
            let name: String = board.row_name(row).chars().take(HEX_W - 2).collect();
            for col in 0..ncols {
                let x = origin.x + col * HEX_W;
                let y = origin.y + (nrows - 1 - row) * HEX_H + col % 2;

                let occupant = pawns
                    .iter()
                    .find(|(_, pos)| pos.level == row && pos.column == col)
                    .map(|(p, _)| *p);

                let (fg, bg) = match (board.status(row, col), occupant) {
                    (CellStatus::Active, Some(p)) => (Color::Black, player_color(p)),
                    (CellStatus::Active, None) => (Color::White, Color::Reset),
                    (CellStatus::Passed, _) if row == board.goal_row() => (GOLD, Color::Reset),
                    (CellStatus::Passed, _) => (PASSED_FG, Color::Reset),
                };

                let top = format!("/{:^w$}\\", name, w = HEX_W - 2);
                let bottom = match occupant {
                    Some(p) => format!("\\_P{}_/", p.index() + 1),
                    None => "\\____/".to_string(),
                };
                self.front.put_str(x, y, &top, fg, bg);
                self.front.put_str(x, y + 1, &bottom, fg, bg);
            }
        }
    }

    fn compose_panel(&mut self, s: &Session, cursor: Option<usize>) {
        let panel = s.controller.panel();
        let r = self.layout.prompt;
        self.front.draw_box(r, " Question ", PANEL_FG, Color::Reset);

        let text_w = r.w.saturating_sub(4);
        let lines = layout::wrap_text(panel.prompt(), text_w);
        for (i, line) in lines.iter().take(PROMPT_LINES).enumerate() {
            let last_visible = i + 1 == PROMPT_LINES && lines.len() > PROMPT_LINES;
            let shown = if last_visible { format!("{line}…") } else { line.clone() };
            self.front.put_clipped(r.x + 2, r.y + 1 + i, &shown, text_w, Color::White, Color::Reset);
        }

        let chosen = panel.chosen();
        for (i, rect) in self.layout.answers.clone().into_iter().enumerate() {
            let idx = i + 1;
            let text = panel.entries().get(idx).map(String::as_str).unwrap_or("");
            let bg = if chosen == Some(idx) { CHOSEN_BG } else { Color::Reset };
            let marker = if cursor == Some(idx) { '▶' } else { ' ' };
            self.front.fill(rect, bg);
            let line = format!("{marker}[{idx}] {text}");
            self.front.put_clipped(rect.x, rect.y, &line, rect.w, Color::White, bg);
        }
    }

    fn compose_bars(&mut self, s: &Session, pad: bool) {
        let msg_row = self.layout.message_row;
        if !s.message.is_empty() {
            self.front.fill_row(msg_row, Color::Black, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" ◈ {} ", s.message), Color::Black, MSG_BG);
        }

        let help = if pad {
            self.pad_help.as_str()
        } else {
            " Click or Space: control  1-9: answer  N: new game  Esc/Q: quit"
        };
        self.front.put_str(0, self.layout.help_row, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_too_small(&mut self, need_w: usize, need_h: usize) {
        let msg = format!("Terminal too small: need {need_w}x{need_h}, have {}x{}", self.term_w, self.term_h);
        let y = self.front.height / 2;
        let x = self.front.width.saturating_sub(msg.chars().count()) / 2;
        self.front.put_str(x, y, &msg, GOLD, Color::Reset);
    }
}
