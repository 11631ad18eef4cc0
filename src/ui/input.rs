/// Terminal input collector.
///
/// The quiz is driven by discrete presses, so only edge events matter:
///   - Key presses (Release and Repeat are ignored)
///   - Left mouse clicks, reported as terminal cell coordinates
///   - Resize, which forces a full redraw
///
/// Mouse capture must be enabled by the renderer for clicks to arrive.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

pub struct InputState {
    /// Keys pressed during the most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier handling.
    pub raw_events: Vec<KeyEvent>,

    /// Left-click positions (column, row) in arrival order.
    pub clicks: Vec<(u16, u16)>,

    /// Terminal was resized since the last drain.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            clicks: Vec::with_capacity(4),
            resized: false,
        }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before the session is updated.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();
        self.resized = false;

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.record(ev),
                Err(_) => break,
            }
        }
    }

    fn record(&mut self, ev: Event) {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.raw_events.push(key);
                self.fresh_presses.push(key.code);
            }
            Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.clicks.push((m.column, m.row));
            }
            Event::Resize(_, _) => self.resized = true,
            _ => {}
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First answer number key (1-9) pressed this frame.
    pub fn digit_pressed(&self) -> Option<usize> {
        self.fresh_presses.iter().find_map(|c| match c {
            KeyCode::Char(ch @ '1'..='9') => ch.to_digit(10).map(|d| d as usize),
            _ => None,
        })
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{MouseEvent, KeyEventState};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn only_presses_count() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('3'), KeyEventKind::Press));
        input.record(key(KeyCode::Enter, KeyEventKind::Release));
        input.record(key(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert_eq!(input.digit_pressed(), Some(3));
        assert!(!input.was_pressed(KeyCode::Enter));
        assert!(!input.any_pressed(&[KeyCode::Char(' ')]));
    }

    #[test]
    fn left_clicks_only() {
        let mut input = InputState::new();
        input.record(mouse(MouseEventKind::Down(MouseButton::Left), 4, 7));
        input.record(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1));
        input.record(mouse(MouseEventKind::Moved, 2, 2));
        input.record(Event::Resize(80, 24));
        assert_eq!(input.clicks, vec![(4, 7)]);
        assert!(input.resized);
    }

    #[test]
    fn zero_is_not_an_answer_key() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char('0'), KeyEventKind::Press));
        assert_eq!(input.digit_pressed(), None);
    }
}
