/// Session: the controller plus what the screen needs around it
/// (title, transient message line, animation tick).

use crate::sim::controller::GameController;
use crate::sim::event::{GameEvent, InputEvent};

/// Frames a transient message stays on screen.
const MESSAGE_FRAMES: u32 = 30;

pub struct Session {
    pub controller: GameController,
    pub title: String,
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,
}

impl Session {
    pub fn new(controller: GameController, title: String) -> Self {
        Session {
            controller,
            title,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
        }
    }

    /// Forward an input to the controller and turn notable events into
    /// messages. Returns the events for the sound layer.
    pub fn apply(&mut self, input: InputEvent) -> Vec<GameEvent> {
        let events = self.controller.handle(input);
        self.describe(&events);
        events
    }

    /// New game; only honoured once the current one is won.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        if !self.controller.status().is_terminal() {
            return vec![];
        }
        let events = self.controller.restart();
        self.set_message("New game!", MESSAGE_FRAMES);
        events
    }

    /// Advance one frame: animation counter and message expiry.
    pub fn tick(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    /// Set a message; duration 0 keeps it until replaced.
    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    fn describe(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::QuestionAsked { level } => {
                    let name = self.controller.board().row_name(*level).to_string();
                    let n = self.controller.panel().answer_count();
                    self.set_message(&format!("Level {name} question: pick an answer (1-{n})"), 0);
                }
                GameEvent::AnswerChosen { index } => {
                    self.set_message(&format!("Answer {index} chosen, press the control button to check"), 0);
                }
                GameEvent::AnswerJudged { correct: true } => {
                    self.set_message("Right! Press the control button to climb", 0);
                }
                GameEvent::AnswerJudged { correct: false } => {
                    self.set_message("Wrong! Press the control button to step aside", 0);
                }
                GameEvent::PawnMoved { player, from, to } => {
                    tracing::debug!(
                        "{} moved ({}, {}) -> ({}, {})",
                        player.label(), from.level, from.column, to.level, to.column,
                    );
                }
                GameEvent::PoolRecycled { level } => {
                    let name = self.controller.board().row_name(*level).to_string();
                    self.set_message(&format!("All {name} questions asked, starting over"), MESSAGE_FRAMES);
                }
                GameEvent::NoQuestions { level } => {
                    let name = self.controller.board().row_name(*level).to_string();
                    self.set_message(&format!("No questions for level {name}"), MESSAGE_FRAMES);
                }
                GameEvent::TurnPassed { to } => {
                    self.set_message(&format!("{}'s turn", to.label()), MESSAGE_FRAMES);
                }
                GameEvent::Victory { player } => {
                    self.set_message(&format!("{} wins!  [N] New game", player.label()), 0);
                }
                GameEvent::Cue(_) => {}
            }
        }
    }
}
