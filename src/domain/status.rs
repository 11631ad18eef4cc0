/// Discrete selectors of the game: turn phase, avatar emotion, sound cue,
/// and which player holds the turn.
/// Labels and file-name indices live here so the numbering is centralized.

/// Phase of the current turn, shown on the control button.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ControlStatus {
    #[default]
    Start,
    AskedQuestion,
    AnswerChosen,
    Incorrect,
    Correct,
    Victory,
}

impl ControlStatus {
    pub fn label(self) -> &'static str {
        match self {
            ControlStatus::Start => "Start",
            ControlStatus::AskedQuestion => "Question",
            ControlStatus::AnswerChosen => ".???.",
            ControlStatus::Incorrect => "Oops!",
            ControlStatus::Correct => "RIGHT!",
            ControlStatus::Victory => "!VICTORY!",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ControlStatus::Victory)
    }
}

/// Avatar expression. The index is the second number in `name_<row>_<col>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Emotion {
    Norm,
    Quest,
    Wrong,
    Smile,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [Emotion::Norm, Emotion::Quest, Emotion::Wrong, Emotion::Smile];

    pub fn index(self) -> usize {
        match self {
            Emotion::Norm => 0,
            Emotion::Quest => 1,
            Emotion::Wrong => 2,
            Emotion::Smile => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Emotion> {
        Emotion::ALL.get(i).copied()
    }
}

/// Avatar lookup key: the board level of the player in focus plus the
/// expression to show.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AvatarKey {
    pub level: usize,
    pub emotion: Emotion,
}

impl AvatarKey {
    pub fn new(level: usize, emotion: Emotion) -> Self {
        AvatarKey { level, emotion }
    }
}

/// Sound selector. The index is the number in `name_<cue>.<ext>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum SoundCue {
    NextTurn,
    Question,
    AnswerChosen,
    Wrong,
    Right,
    Victory,
    Welcome,
}

impl SoundCue {
    pub const ALL: [SoundCue; 7] = [
        SoundCue::NextTurn,
        SoundCue::Question,
        SoundCue::AnswerChosen,
        SoundCue::Wrong,
        SoundCue::Right,
        SoundCue::Victory,
        SoundCue::Welcome,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<SoundCue> {
        SoundCue::ALL.get(i).copied()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlayerId {
    #[default]
    First,
    Second,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::First => 0,
            PlayerId::Second => 1,
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerId::First => "Player 1",
            PlayerId::Second => "Player 2",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_indices_follow_file_convention() {
        for (i, cue) in SoundCue::ALL.iter().enumerate() {
            assert_eq!(cue.index(), i);
            assert_eq!(SoundCue::from_index(i), Some(*cue));
        }
        assert_eq!(SoundCue::from_index(7), None);
        assert_eq!(SoundCue::Victory.index(), 5);
    }

    #[test]
    fn emotion_indices_follow_file_convention() {
        assert_eq!(Emotion::Quest.index(), 1);
        assert_eq!(Emotion::Smile.index(), 3);
        assert_eq!(Emotion::from_index(2), Some(Emotion::Wrong));
        assert_eq!(Emotion::from_index(4), None);
    }

    #[test]
    fn player_toggle() {
        assert_eq!(PlayerId::First.other(), PlayerId::Second);
        assert_eq!(PlayerId::Second.other().other(), PlayerId::Second);
    }
}
