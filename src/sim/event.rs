/// Events flowing in and out of the controller.
/// Input events come from the front-end (clicks, keys, pad);
/// game events go back to it for sound and messages.

use crate::domain::board::PlayerState;
use crate::domain::status::{PlayerId, SoundCue};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    /// The control button was pressed.
    ControlPressed,
    /// An answer cell was picked; 1-based, 0 means none.
    AnswerPicked(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    QuestionAsked { level: usize },
    /// The level had run dry and was refilled before drawing.
    PoolRecycled { level: usize },
    /// The level has no questions at all.
    NoQuestions { level: usize },
    AnswerChosen { index: usize },
    AnswerJudged { correct: bool },
    PawnMoved { player: PlayerId, from: PlayerState, to: PlayerState },
    TurnPassed { to: PlayerId },
    Victory { player: PlayerId },
    Cue(SoundCue),
}
