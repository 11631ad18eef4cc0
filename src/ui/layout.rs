/// Screen layout and click hit-testing.
///
/// The renderer computes a Layout from the terminal size each frame and
/// keeps it; main resolves mouse clicks against the last one drawn, so a
/// click always refers to what the player actually saw.
///
///   ┌ HUD ─────────────────────────────────────────┐
///   │ avatar │  board (hex columns, level 0 low)   │
///   │control │                                     │
///   ├ question prompt ─────────────────────────────┤
///   │ [1] answer  …  [n] answer                    │
///   │ message                                      │
///   │ help                                         │

use crate::sim::event::InputEvent;

pub const HUD_ROW: usize = 0;
const TOP: usize = 1;

pub const AVATAR_W: usize = 17;
pub const AVATAR_H: usize = 7;
pub const CONTROL_H: usize = 3;

/// Hex cell footprint on the terminal: "/ XL \" over "\_P1_/".
pub const HEX_W: usize = 6;
pub const HEX_H: usize = 2;

/// Text lines reserved for the question prompt.
pub const PROMPT_LINES: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Rect { x, y, w, h }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn bottom(&self) -> usize {
        self.y + self.h
    }

    pub fn right(&self) -> usize {
        self.x + self.w
    }
}

#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub avatar: Rect,
    pub control: Rect,
    pub board: Rect,
    pub prompt: Rect,
    /// Answer rows, index 0 = answer #1.
    pub answers: Vec<Rect>,
    pub message_row: usize,
    pub help_row: usize,
}

impl Layout {
    /// Place every region for a terminal of `term_w` columns, a board of
    /// `nrows` x `ncols`, and `answer_count` answer rows.
    pub fn compute(term_w: usize, answer_count: usize, nrows: usize, ncols: usize) -> Self {
        let avatar = Rect::new(1, TOP, AVATAR_W, AVATAR_H);
        let control = Rect::new(1, avatar.bottom(), AVATAR_W, CONTROL_H);

        // Odd columns sit half a cell lower, hence the extra row.
        let board_h = nrows * HEX_H + 1;
        let board = Rect::new(avatar.right() + 3, TOP, ncols * HEX_W, board_h);

        let panel_w = term_w.saturating_sub(2).max(20);
        let prompt_y = control.bottom().max(board.bottom());
        let prompt = Rect::new(1, prompt_y, panel_w, PROMPT_LINES + 2);

        let answers = (0..answer_count)
            .map(|i| Rect::new(1, prompt.bottom() + i, panel_w, 1))
            .collect::<Vec<_>>();

        let message_row = prompt.bottom() + answer_count + 1;
        Layout {
            avatar,
            control,
            board,
            prompt,
            answers,
            message_row,
            help_row: message_row + 1,
        }
    }

    /// The event a click at terminal cell (x, y) stands for, if any.
    pub fn resolve(&self, x: usize, y: usize) -> Option<InputEvent> {
        if self.control.contains(x, y) {
            return Some(InputEvent::ControlPressed);
        }
        self.answers
            .iter()
            .position(|r| r.contains(x, y))
            .map(|i| InputEvent::AnswerPicked(i + 1))
    }

    /// Terminal rows needed to show everything.
    pub fn min_height(&self) -> usize {
        self.help_row + 1
    }
}

/// Greedy word wrap to `width` columns; words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let wlen = chars.len();
        if wlen == 0 {
            continue;
        }
        if line_len > 0 && line_len + 1 + wlen > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(chars);
        line_len += wlen;
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_resolve_to_regions() {
        let lay = Layout::compute(80, 3, 5, 5);
        let c = lay.control;
        assert_eq!(lay.resolve(c.x, c.y), Some(InputEvent::ControlPressed));
        assert_eq!(lay.resolve(c.right() - 1, c.bottom() - 1), Some(InputEvent::ControlPressed));

        let a2 = lay.answers[1];
        assert_eq!(lay.resolve(a2.x + 10, a2.y), Some(InputEvent::AnswerPicked(2)));

        // prompt and board are not buttons
        assert_eq!(lay.resolve(lay.prompt.x + 1, lay.prompt.y + 1), None);
        assert_eq!(lay.resolve(lay.board.x, lay.board.y), None);
        assert_eq!(lay.resolve(0, 0), None);
    }

    #[test]
    fn regions_do_not_overlap() {
        let lay = Layout::compute(100, 4, 5, 5);
        assert!(lay.board.x >= lay.avatar.right());
        assert!(lay.prompt.y >= lay.control.bottom());
        assert!(lay.prompt.y >= lay.board.bottom());
        assert_eq!(lay.answers[0].y, lay.prompt.bottom());
        assert!(lay.message_row > lay.answers[3].y);
        assert_eq!(lay.min_height(), lay.help_row + 1);
    }

    #[test]
    fn default_board_fits_classic_terminal() {
        let lay = Layout::compute(80, 3, 5, 5);
        assert!(lay.min_height() <= 24, "needs {} rows", lay.min_height());
        assert!(lay.board.right() < 80);
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, ["the quick", "brown fox", "jumps"]);
        assert!(wrap_text("   ", 5).is_empty());
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), ["abc", "def", "gh", "ij"]);
        assert_eq!(wrap_text("ab abcdef", 4), ["ab", "abcd", "ef"]);
    }
}
