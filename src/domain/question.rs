/// Questions and the question panel.
///
/// A `Question` is one row of the question file. The first answer is always
/// the correct one; the panel shows the answers shuffled.

/// Index of a question inside its `QuestionBank`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct QuestionId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub level: usize,
    pub text: String,
    /// Answer options in file order; `answers[0]` is correct.
    pub answers: Vec<String>,
}

impl Question {
    pub fn correct_answer(&self) -> &str {
        self.answers.first().map(String::as_str).unwrap_or("")
    }
}

/// What the quest board shows: prompt in slot 0, answers in 1..,
/// plus the answer cell the player picked.
#[derive(Clone, Debug)]
pub struct QuestionPanel {
    entries: Vec<String>,
    question: Option<QuestionId>,
    chosen: Option<usize>,
}

impl QuestionPanel {
    /// Panel with placeholder texts for `answers_n` answer cells.
    pub fn placeholder(answers_n: usize) -> Self {
        let mut entries = Vec::with_capacity(answers_n + 1);
        entries.push("THE QUESTION WILL BE HERE".to_string());
        for n in 1..=answers_n {
            entries.push(format!("Answer #{n} will be here"));
        }
        QuestionPanel { entries, question: None, chosen: None }
    }

    /// Put a question on display. `entries[0]` is the prompt.
    pub fn show(&mut self, id: QuestionId, entries: Vec<String>) {
        self.entries = entries;
        self.question = Some(id);
        self.chosen = None;
    }

    /// Blank every cell and forget the question.
    pub fn clear(&mut self) {
        for e in &mut self.entries {
            e.clear();
        }
        self.question = None;
        self.chosen = None;
    }

    /// Record a pick of answer cell `index` (1-based). Returns false for the
    /// prompt cell or an index past the last answer.
    pub fn choose(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.chosen = Some(index);
        true
    }

    pub fn chosen(&self) -> Option<usize> {
        self.chosen
    }

    pub fn chosen_text(&self) -> Option<&str> {
        self.chosen.map(|i| self.entries[i].as_str())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn prompt(&self) -> &str {
        self.entries.first().map(String::as_str).unwrap_or("")
    }

    pub fn answer_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn question_id(&self) -> Option<QuestionId> {
        self.question
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_prompt_and_answers() {
        let p = QuestionPanel::placeholder(3);
        assert_eq!(p.entries().len(), 4);
        assert_eq!(p.answer_count(), 3);
        assert!(p.question_id().is_none());
    }

    #[test]
    fn choose_rejects_prompt_and_out_of_range() {
        let mut p = QuestionPanel::placeholder(3);
        assert!(!p.choose(0));
        assert!(!p.choose(4));
        assert!(p.choose(3));
        assert_eq!(p.chosen(), Some(3));
        assert_eq!(p.chosen_text(), Some("Answer #3 will be here"));
    }

    #[test]
    fn show_resets_choice_and_clear_blanks() {
        let mut p = QuestionPanel::placeholder(2);
        p.choose(1);
        p.show(QuestionId(7), vec!["Q?".into(), "a".into(), "b".into()]);
        assert_eq!(p.chosen(), None);
        assert_eq!(p.question_id(), Some(QuestionId(7)));
        assert_eq!(p.prompt(), "Q?");

        p.clear();
        assert!(p.entries().iter().all(|e| e.is_empty()));
        assert_eq!(p.entries().len(), 3);
        assert!(p.question_id().is_none());
    }
}
