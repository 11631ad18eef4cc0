/// GameController: the turn state machine.
///
/// ## Transitions on a control press
/// ┌───────────────┬──────────────────────────────────────────┬──────────────────┐
/// │ From          │ Action                                   │ To               │
/// ├───────────────┼──────────────────────────────────────────┼──────────────────┤
/// │ Start         │ draw question, show shuffled answers,    │ AskedQuestion    │
/// │               │ emotion Quest, cue Question              │                  │
/// │ AskedQuestion │ (ignored, waiting for an answer pick)    │ AskedQuestion    │
/// │ AnswerChosen  │ judge pick: Smile + Right / Wrong + Wrong│ Correct/Incorrect│
/// │ Correct       │ straight step, clear panel, check goal   │ Start / Victory  │
/// │ Incorrect     │ sideways step, clear panel, check goal   │ Start / Victory  │
/// │ Victory       │ (ignored, terminal)                      │ Victory          │
/// └───────────────┴──────────────────────────────────────────┴──────────────────┘
///
/// An answer pick is accepted only in AskedQuestion: it records the cell,
/// shows Quest, plays AnswerChosen and moves to AnswerChosen.
///
/// After a move that does not reach the goal row the turn passes, the avatar
/// shows Norm for the new player's level and NextTurn plays. On the goal row
/// the game ends with Victory and the turn stays put.

use crate::domain::board::{BoardModel, PlayerState};
use crate::domain::question::QuestionPanel;
use crate::domain::rules::{self, MoveDelta};
use crate::domain::status::{AvatarKey, ControlStatus, Emotion, PlayerId, SoundCue};
use crate::error::GameError;
use crate::sim::bank::QuestionBank;
use crate::sim::event::{GameEvent, InputEvent};

pub struct GameController {
    bank: QuestionBank,
    board: BoardModel,
    starts: [PlayerState; 2],
    players: [PlayerState; 2],
    current: PlayerId,
    status: ControlStatus,
    panel: QuestionPanel,
    avatar: AvatarKey,
    cue: Option<SoundCue>,
}

// ── Construction ──

impl GameController {
    pub fn new(bank: QuestionBank, board: BoardModel, starts: [PlayerState; 2]) -> Result<Self, GameError> {
        for (i, s) in starts.iter().enumerate() {
            if !board.contains(s.level, s.column) {
                return Err(GameError::InvalidBoard(format!(
                    "player {} starts outside the board at ({}, {})",
                    i + 1, s.level, s.column,
                )));
            }
            if s.level >= board.goal_row() {
                return Err(GameError::InvalidBoard(format!("player {} starts on the goal row", i + 1)));
            }
        }
        if starts[0] == starts[1] {
            return Err(GameError::InvalidBoard("both players start on the same cell".into()));
        }

        let panel = QuestionPanel::placeholder(bank.answers_n());
        let mut ctl = GameController {
            bank,
            board,
            starts,
            players: starts,
            current: PlayerId::First,
            status: ControlStatus::Start,
            panel,
            avatar: AvatarKey::new(starts[0].level, Emotion::Norm),
            cue: Some(SoundCue::Welcome),
        };
        ctl.place_pawns();
        Ok(ctl)
    }

    fn place_pawns(&mut self) {
        for p in self.players {
            self.board.toggle_pawn_marker(p.level, p.column);
        }
    }

    /// Start over: full pools, pawns on their start cells, player 1 to move.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.bank.reset();
        self.board.reset();
        self.players = self.starts;
        self.place_pawns();
        self.current = PlayerId::First;
        self.status = ControlStatus::Start;
        self.panel = QuestionPanel::placeholder(self.bank.answers_n());
        self.avatar = AvatarKey::new(self.players[0].level, Emotion::Norm);
        tracing::info!("new game");
        let mut events = vec![];
        self.select_cue(SoundCue::Welcome, &mut events);
        events
    }
}

// ── Dispatch ──

impl GameController {
    pub fn handle(&mut self, input: InputEvent) -> Vec<GameEvent> {
        let mut events = vec![];
        match input {
            InputEvent::ControlPressed => self.press_control(&mut events),
            InputEvent::AnswerPicked(index) => self.pick_answer(index, &mut events),
        }
        events
    }

    fn press_control(&mut self, events: &mut Vec<GameEvent>) {
        match self.status {
            ControlStatus::Start => self.ask_question(events),
            ControlStatus::AskedQuestion | ControlStatus::Victory => {}
            ControlStatus::AnswerChosen => self.judge_answer(events),
            ControlStatus::Correct => self.resolve_move(rules::correct_step(), events),
            ControlStatus::Incorrect => {
                let (_, ncols) = self.board.dimensions();
                let step = rules::wrong_step_on_board(self.current, self.player().column, ncols);
                self.resolve_move(step, events);
            }
        }
    }

    fn pick_answer(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        if self.status != ControlStatus::AskedQuestion || !self.panel.choose(index) {
            return;
        }
        self.status = ControlStatus::AnswerChosen;
        self.set_avatar(self.player().level, Emotion::Quest);
        events.push(GameEvent::AnswerChosen { index });
        self.select_cue(SoundCue::AnswerChosen, events);
    }
}

// ── Transitions ──

impl GameController {
    fn ask_question(&mut self, events: &mut Vec<GameEvent>) {
        let level = self.player().level;
        let drawn = self.bank.draw_question(level).cloned();
        let question = match drawn {
            Some(q) => q,
            None => {
                if self.bank.recycle(level) == 0 {
                    tracing::warn!(level, "no questions for this level");
                    events.push(GameEvent::NoQuestions { level });
                    return;
                }
                tracing::info!(level, "question pool exhausted, recycling");
                events.push(GameEvent::PoolRecycled { level });
                match self.bank.draw_question(level).cloned() {
                    Some(q) => q,
                    None => return,
                }
            }
        };

        let entries = self.bank.shuffle_answers(&question);
        self.panel.show(question.id, entries);
        self.status = ControlStatus::AskedQuestion;
        self.set_avatar(level, Emotion::Quest);
        events.push(GameEvent::QuestionAsked { level });
        self.select_cue(SoundCue::Question, events);
    }

    fn judge_answer(&mut self, events: &mut Vec<GameEvent>) {
        let question = self.panel.question_id().and_then(|id| self.bank.question(id));
        let correct = match (question, self.panel.chosen_text()) {
            (Some(q), Some(text)) => self.bank.check_answer(q, text),
            _ => false,
        };

        let level = self.player().level;
        if correct {
            self.status = ControlStatus::Correct;
            self.set_avatar(level, Emotion::Smile);
        } else {
            self.status = ControlStatus::Incorrect;
            self.set_avatar(level, Emotion::Wrong);
        }
        tracing::debug!(player = self.current.label(), correct, "answer judged");
        events.push(GameEvent::AnswerJudged { correct });
        self.select_cue(if correct { SoundCue::Right } else { SoundCue::Wrong }, events);
    }

    fn resolve_move(&mut self, step: MoveDelta, events: &mut Vec<GameEvent>) {
        let player = self.current;
        let from = self.players[player.index()];
        let to = rules::apply(from, step, self.board.goal_row());

        // A cell shared with the other pawn stays Active.
        let other = self.players[player.other().index()];
        if from != other {
            self.board.toggle_pawn_marker(from.level, from.column);
        }
        if to != other {
            self.board.toggle_pawn_marker(to.level, to.column);
        }
        self.players[player.index()] = to;
        self.panel.clear();
        events.push(GameEvent::PawnMoved { player, from, to });

        if rules::is_victory(to, self.board.nrows()) {
            self.status = ControlStatus::Victory;
            tracing::info!(player = player.label(), "victory");
            events.push(GameEvent::Victory { player });
            self.select_cue(SoundCue::Victory, events);
        } else {
            self.current = player.other();
            self.status = ControlStatus::Start;
            self.set_avatar(self.player().level, Emotion::Norm);
            events.push(GameEvent::TurnPassed { to: self.current });
            self.select_cue(SoundCue::NextTurn, events);
        }
    }

    fn set_avatar(&mut self, level: usize, emotion: Emotion) {
        self.avatar = AvatarKey::new(level, emotion);
    }

    fn select_cue(&mut self, cue: SoundCue, events: &mut Vec<GameEvent>) {
        self.cue = Some(cue);
        events.push(GameEvent::Cue(cue));
    }
}

// ── Queries ──

impl GameController {
    pub fn status(&self) -> ControlStatus {
        self.status
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Position of the player holding the turn.
    pub fn player(&self) -> PlayerState {
        self.players[self.current.index()]
    }

    pub fn position(&self, player: PlayerId) -> PlayerState {
        self.players[player.index()]
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    pub fn panel(&self) -> &QuestionPanel {
        &self.panel
    }

    pub fn avatar(&self) -> AvatarKey {
        self.avatar
    }

    /// The cue picked by the last transition (or the welcome cue).
    pub fn last_cue(&self) -> Option<SoundCue> {
        self.cue
    }

    pub fn remaining_questions(&self, level: usize) -> usize {
        self.bank.remaining(level)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::CellStatus;

    const QUESTIONS: &str = "\
level;question;answer1;answer2;answer3
0;q0a;right0a;wrong0a1;wrong0a2
0;q0b;right0b;wrong0b1;wrong0b2
1;q1a;right1a;wrong1a1;wrong1a2
1;q1b;right1b;wrong1b1;wrong1b2
2;q2a;right2a;wrong2a1;wrong2a2
3;q3a;right3a;wrong3a1;wrong3a2
";

    fn controller_with(csv: &str) -> GameController {
        controller_starting(csv, [PlayerState::new(0, 1), PlayerState::new(0, 3)])
    }

    fn controller_starting(csv: &str, starts: [PlayerState; 2]) -> GameController {
        let bank = QuestionBank::parse(csv, ';').unwrap().with_seed(42);
        let names = ["S", "M", "L", "XL", "V"].iter().map(|s| s.to_string()).collect();
        let board = BoardModel::new(names, 5).unwrap();
        GameController::new(bank, board, starts).unwrap()
    }

    fn controller() -> GameController {
        controller_with(QUESTIONS)
    }

    /// Panel index holding the right (or a wrong) answer.
    fn answer_index(ctl: &GameController, right: bool) -> usize {
        let id = ctl.panel.question_id().unwrap();
        let correct = ctl.bank.question(id).unwrap().correct_answer().to_string();
        ctl.panel
            .entries()
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, e)| (**e == correct) == right)
            .map(|(i, _)| i)
            .unwrap()
    }

    fn play_turn(ctl: &mut GameController, right: bool) -> Vec<GameEvent> {
        let mut events = ctl.handle(InputEvent::ControlPressed);
        let idx = answer_index(ctl, right);
        events.extend(ctl.handle(InputEvent::AnswerPicked(idx)));
        events.extend(ctl.handle(InputEvent::ControlPressed));
        events.extend(ctl.handle(InputEvent::ControlPressed));
        events
    }

    #[test]
    fn new_game_marks_start_cells() {
        let ctl = controller();
        assert_eq!(ctl.status(), ControlStatus::Start);
        assert_eq!(ctl.current_player(), PlayerId::First);
        assert_eq!(ctl.board().status(0, 1), CellStatus::Active);
        assert_eq!(ctl.board().status(0, 3), CellStatus::Active);
        assert_eq!(ctl.board().status(0, 2), CellStatus::Passed);
        assert_eq!(ctl.last_cue(), Some(SoundCue::Welcome));
    }

    #[test]
    fn start_press_asks_question() {
        let mut ctl = controller();
        let events = ctl.handle(InputEvent::ControlPressed);
        assert_eq!(ctl.status(), ControlStatus::AskedQuestion);
        assert_eq!(ctl.avatar(), AvatarKey::new(0, Emotion::Quest));
        assert_eq!(ctl.last_cue(), Some(SoundCue::Question));
        assert!(events.contains(&GameEvent::QuestionAsked { level: 0 }));
        assert_eq!(ctl.panel().entries().len(), 4);
        assert!(ctl.panel().prompt().starts_with("q0"));
        assert_eq!(ctl.remaining_questions(0), 1);
    }

    #[test]
    fn control_press_while_asked_is_ignored() {
        let mut ctl = controller();
        ctl.handle(InputEvent::ControlPressed);
        let events = ctl.handle(InputEvent::ControlPressed);
        assert!(events.is_empty());
        assert_eq!(ctl.status(), ControlStatus::AskedQuestion);
    }

    #[test]
    fn answer_pick_only_in_asked_state() {
        let mut ctl = controller();
        assert!(ctl.handle(InputEvent::AnswerPicked(1)).is_empty());
        assert_eq!(ctl.status(), ControlStatus::Start);

        ctl.handle(InputEvent::ControlPressed);
        assert!(ctl.handle(InputEvent::AnswerPicked(0)).is_empty());
        assert!(ctl.handle(InputEvent::AnswerPicked(4)).is_empty());
        assert_eq!(ctl.status(), ControlStatus::AskedQuestion);

        let events = ctl.handle(InputEvent::AnswerPicked(2));
        assert_eq!(ctl.status(), ControlStatus::AnswerChosen);
        assert_eq!(ctl.current_player(), PlayerId::First);
        assert_eq!(ctl.panel().chosen(), Some(2));
        assert_eq!(ctl.last_cue(), Some(SoundCue::AnswerChosen));
        assert_eq!(events[0], GameEvent::AnswerChosen { index: 2 });

        // A second pick after choosing is ignored.
        assert!(ctl.handle(InputEvent::AnswerPicked(1)).is_empty());
        assert_eq!(ctl.panel().chosen(), Some(2));
    }

    #[test]
    fn right_answer_moves_straight_and_passes_turn() {
        let mut ctl = controller();
        ctl.handle(InputEvent::ControlPressed);
        let idx = answer_index(&ctl, true);
        ctl.handle(InputEvent::AnswerPicked(idx));

        ctl.handle(InputEvent::ControlPressed);
        assert_eq!(ctl.status(), ControlStatus::Correct);
        assert_eq!(ctl.avatar().emotion, Emotion::Smile);
        assert_eq!(ctl.last_cue(), Some(SoundCue::Right));

        let events = ctl.handle(InputEvent::ControlPressed);
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(1, 1));
        assert_eq!(ctl.board().status(0, 1), CellStatus::Passed);
        assert_eq!(ctl.board().status(1, 1), CellStatus::Active);
        assert_eq!(ctl.status(), ControlStatus::Start);
        assert_eq!(ctl.current_player(), PlayerId::Second);
        assert_eq!(ctl.avatar(), AvatarKey::new(0, Emotion::Norm));
        assert_eq!(ctl.last_cue(), Some(SoundCue::NextTurn));
        assert!(events.contains(&GameEvent::TurnPassed { to: PlayerId::Second }));
        assert!(ctl.panel().entries().iter().all(|e| e.is_empty()));
    }

    #[test]
    fn wrong_answer_moves_sideways() {
        let mut ctl = controller();
        ctl.handle(InputEvent::ControlPressed);
        let idx = answer_index(&ctl, false);
        ctl.handle(InputEvent::AnswerPicked(idx));
        ctl.handle(InputEvent::ControlPressed);
        assert_eq!(ctl.status(), ControlStatus::Incorrect);
        assert_eq!(ctl.avatar().emotion, Emotion::Wrong);
        assert_eq!(ctl.last_cue(), Some(SoundCue::Wrong));

        ctl.handle(InputEvent::ControlPressed);
        // player 0, column 1: (0, -1)
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(0, 0));
        assert_eq!(ctl.board().status(0, 0), CellStatus::Active);
        assert_eq!(ctl.board().status(0, 1), CellStatus::Passed);

        // player 1, column 3: (0, +1)
        play_turn(&mut ctl, false);
        assert_eq!(ctl.position(PlayerId::Second), PlayerState::new(0, 4));

        // player 0, column 0: (1, +1)
        play_turn(&mut ctl, false);
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(1, 1));
    }

    #[test]
    fn shared_cell_stays_active() {
        let starts = [PlayerState::new(0, 1), PlayerState::new(0, 2)];
        let mut ctl = controller_starting(QUESTIONS, starts);
        // (0,1) -> (0,0), then (0,2) -> (1,1), then (0,0) -> (1,1)
        for _ in 0..3 {
            play_turn(&mut ctl, false);
        }
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(1, 1));
        assert_eq!(ctl.position(PlayerId::Second), PlayerState::new(1, 1));
        assert_eq!(ctl.board().status(1, 1), CellStatus::Active);
        assert_eq!(ctl.board().status(0, 0), CellStatus::Passed);

        // Player 2 leaves (1,1) for (1,2); player 1 still stands there.
        play_turn(&mut ctl, false);
        assert_eq!(ctl.position(PlayerId::Second), PlayerState::new(1, 2));
        assert_eq!(ctl.board().status(1, 1), CellStatus::Active);
        assert_eq!(ctl.board().status(1, 2), CellStatus::Active);
    }

    #[test]
    fn four_right_answers_win() {
        let mut ctl = controller();
        let mut last = vec![];
        for turn in 0..7 {
            let first = turn % 2 == 0;
            last = play_turn(&mut ctl, first);
        }
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(4, 1));
        assert_eq!(ctl.status(), ControlStatus::Victory);
        assert_eq!(ctl.current_player(), PlayerId::First);
        assert_eq!(ctl.last_cue(), Some(SoundCue::Victory));
        assert!(last.contains(&GameEvent::Victory { player: PlayerId::First }));
        assert!(!last.iter().any(|e| matches!(e, GameEvent::TurnPassed { .. })));

        // Nothing moves after the game is won.
        assert!(ctl.handle(InputEvent::ControlPressed).is_empty());
        assert!(ctl.handle(InputEvent::AnswerPicked(1)).is_empty());
        assert_eq!(ctl.current_player(), PlayerId::First);
        assert_eq!(ctl.status(), ControlStatus::Victory);
    }

    #[test]
    fn exhausted_level_is_recycled() {
        let mut ctl = controller();
        // Player 0 wrong from column 1 stays on level 0, as does player 1 from column 3.
        play_turn(&mut ctl, false);
        play_turn(&mut ctl, false);
        assert_eq!(ctl.remaining_questions(0), 0);
        let events = ctl.handle(InputEvent::ControlPressed);
        assert!(events.contains(&GameEvent::PoolRecycled { level: 0 }));
        assert_eq!(ctl.status(), ControlStatus::AskedQuestion);
        assert_eq!(ctl.remaining_questions(0), 1);
    }

    #[test]
    fn level_without_questions_stays_in_start() {
        let mut ctl = controller_with("level;question;answer1;answer2\n1;q;a;b\n");
        let events = ctl.handle(InputEvent::ControlPressed);
        assert_eq!(events, vec![GameEvent::NoQuestions { level: 0 }]);
        assert_eq!(ctl.status(), ControlStatus::Start);
    }

    #[test]
    fn restart_resets_everything() {
        let mut ctl = controller();
        play_turn(&mut ctl, true);
        play_turn(&mut ctl, false);
        let events = ctl.restart();
        assert_eq!(events, vec![GameEvent::Cue(SoundCue::Welcome)]);
        assert_eq!(ctl.position(PlayerId::First), PlayerState::new(0, 1));
        assert_eq!(ctl.position(PlayerId::Second), PlayerState::new(0, 3));
        assert_eq!(ctl.board().status(1, 1), CellStatus::Passed);
        assert_eq!(ctl.board().status(0, 1), CellStatus::Active);
        assert_eq!(ctl.current_player(), PlayerId::First);
        assert_eq!(ctl.remaining_questions(0), 2);
    }

    #[test]
    fn rejects_bad_starts() {
        let bank = || QuestionBank::parse(QUESTIONS, ';').unwrap();
        let board = || BoardModel::new(vec!["S".into(), "M".into(), "V".into()], 3).unwrap();
        let same = [PlayerState::new(0, 1), PlayerState::new(0, 1)];
        assert!(GameController::new(bank(), board(), same).is_err());
        let outside = [PlayerState::new(0, 1), PlayerState::new(0, 3)];
        assert!(GameController::new(bank(), board(), outside).is_err());
        let on_goal = [PlayerState::new(2, 0), PlayerState::new(0, 1)];
        assert!(GameController::new(bank(), board(), on_goal).is_err());
    }
}
