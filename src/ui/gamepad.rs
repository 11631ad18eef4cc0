/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move the answer cursor
///   A                     →  Pick the answer under the cursor
///   Start / X             →  Control button
///   Y                     →  New game (after a victory)
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST"  => Some(Btn::B),
            "X" | "WEST"  => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB"   => Some(Btn::L1),
            "R1" | "RB"   => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Btn::A => "A",
            Btn::B => "B",
            Btn::X => "X",
            Btn::Y => "Y",
            Btn::L1 => "L1",
            Btn::R1 => "R1",
            Btn::Start => "Start",
            Btn::Select => "Select",
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    control: Vec<Btn>,
    pick: Vec<Btn>,
    new_game: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            control:  vec![Btn::Start, Btn::X],
            pick:     vec![Btn::A],
            new_game: vec![Btn::Y],
            quit:     vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Unknown names are skipped; an action left empty keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String], fallback: Vec<Btn>) -> Vec<Btn> {
            let list: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if list.is_empty() { fallback } else { list }
        }
        let d = ActionMap::default();
        ActionMap {
            control: parse_list(&cfg.control, d.control),
            pick: parse_list(&cfg.pick, d.pick),
            new_game: parse_list(&cfg.new_game, d.new_game),
            quit: parse_list(&cfg.quit, d.quit),
        }
    }

    /// One-line legend of the current mapping, e.g. "A pick  Start/X control".
    fn help_line(&self) -> String {
        fn names(btns: &[Btn]) -> String {
            btns.iter().map(|b| b.name()).collect::<Vec<_>>().join("/")
        }
        format!(
            " Pad: ↕ cursor  {} pick  {} control  {} new game  {} quit",
            names(&self.pick),
            names(&self.control),
            names(&self.new_game),
            names(&self.quit),
        )
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last update (edge-triggered).
    pressed: Vec<Btn>,

    /// Net cursor movement since the last update: -1 up, +1 down.
    cursor_step: i32,

    // Stick position, used to detect crossings of the deadzone
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,

    /// Highlighted answer (1-based, 0 = none yet).
    pub cursor: usize,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pressed: Vec::with_capacity(4),
            cursor_step: 0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            cursor: 0,
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    pub fn update(&mut self) {
        self.pressed.clear();
        self.cursor_step = 0;

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    match btn {
                        Button::DPadUp => self.cursor_step -= 1,
                        Button::DPadDown => self.cursor_step += 1,
                        _ => {
                            if let Some(b) = Btn::from_gilrs(btn) {
                                self.pressed.push(b);
                            }
                        }
                    }
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    self.connected = true;
                    let was_up = self.stick_y > STICK_DEADZONE;
                    let was_down = self.stick_y < -STICK_DEADZONE;
                    self.stick_y = value;
                    if value > STICK_DEADZONE && !was_up { self.cursor_step -= 1; }
                    if value < -STICK_DEADZONE && !was_down { self.cursor_step += 1; }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.pressed.clear();
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }
    }

    /// Move the cursor over answers `1..=answer_count`, wrapping around.
    pub fn update_cursor(&mut self, answer_count: usize) {
        if answer_count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = step_cursor(self.cursor, self.cursor_step, answer_count);
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.pressed.contains(b))
    }

    pub fn help_line(&self) -> String {
        self.action_map.help_line()
    }

    pub fn control_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.control)
    }
    pub fn pick_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.pick)
    }
    pub fn new_game_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.new_game)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }
}

/// Cursor arithmetic over `1..=n`; 0 means "no selection yet" and the first
/// step lands on answer 1 (down) or answer n (up).
fn step_cursor(cursor: usize, step: i32, n: usize) -> usize {
    if step == 0 {
        return cursor.min(n);
    }
    let start = if cursor == 0 || cursor > n {
        if step > 0 { 0 } else { n as i64 + 1 }
    } else {
        cursor as i64
    };
    let zero_based = (start - 1 + step as i64).rem_euclid(n as i64);
    zero_based as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_over_answers() {
        assert_eq!(step_cursor(0, 1, 4), 1);
        assert_eq!(step_cursor(0, -1, 4), 4);
        assert_eq!(step_cursor(4, 1, 4), 1);
        assert_eq!(step_cursor(1, -1, 4), 4);
        assert_eq!(step_cursor(2, 2, 4), 4);
        assert_eq!(step_cursor(3, 0, 4), 3);
        assert_eq!(step_cursor(6, 0, 4), 4);
    }

    #[test]
    fn config_names_map_to_buttons() {
        let cfg = GamepadConfig {
            control: vec!["rb".into(), "bogus".into()],
            pick: vec!["south".into(), "B".into()],
            new_game: vec![],
            quit: vec!["back".into()],
        };
        let map = ActionMap::from_config(&cfg);
        assert_eq!(map.control, vec![Btn::R1]);
        assert_eq!(map.pick, vec![Btn::A, Btn::B]);
        assert_eq!(map.new_game, vec![Btn::Y]);
        assert_eq!(map.quit, vec![Btn::Select]);
        assert_eq!(
            map.help_line(),
            " Pad: ↕ cursor  A/B pick  R1 control  Y new game  Select quit"
        );
    }

    #[test]
    fn default_help_lists_every_action() {
        assert_eq!(
            ActionMap::default().help_line(),
            " Pad: ↕ cursor  A pick  Start/X control  Y new game  Select quit"
        );
    }

    #[test]
    fn pressed_buttons_drive_actions() {
        let mut pad = GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            pressed: vec![Btn::Start],
            cursor_step: 1,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            cursor: 0,
            connected: true,
        };
        assert!(pad.control_pressed());
        assert!(!pad.pick_pressed());
        pad.update_cursor(3);
        assert_eq!(pad.cursor, 1);
        pad.update_cursor(0);
        assert_eq!(pad.cursor, 0);
    }
}
