/// Question bank: loads the question file and serves random questions.
///
/// ## File format
///   ```
///   num;level;question;answer1;answer2;answer3
///   1;0;What colour is the sky?;Blue;Green;Red
///   ```
///
/// The first line is a header. The bank needs a `level` column, a
/// `question` column and at least one column whose name contains `answer`.
/// Answer columns are taken in header order and the first one is the
/// correct answer. Other columns are ignored. Fields may be wrapped in
/// double quotes (`""` inside quotes is a literal quote).
///
/// ## Pools
/// Every level keeps a pool of question ids not asked yet. Drawing removes
/// one id at random. The bank never refills a pool on its own; callers use
/// `recycle()` / `reset()` for that.

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::question::{Question, QuestionId};
use crate::error::GameError;

pub struct QuestionBank {
    questions: Vec<Question>,
    pools: BTreeMap<usize, Vec<QuestionId>>,
    answers_n: usize,
    rng: StdRng,
}

// ══════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════

impl QuestionBank {
    /// Load and parse a question file.
    pub fn load(path: &Path, delimiter: char) -> Result<Self, GameError> {
        if !path.is_file() {
            return Err(GameError::DataUnavailable { path: path.to_path_buf() });
        }
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::InvalidData => GameError::NotUtf8 { path: path.to_path_buf() },
            _ => GameError::Io { path: path.to_path_buf(), source },
        })?;
        let bank = Self::parse(&text, delimiter)?;
        tracing::info!(
            path = %path.display(),
            questions = bank.len(),
            levels = bank.pools.len(),
            answers = bank.answers_n,
            "question bank loaded"
        );
        Ok(bank)
    }

    /// Parse question file contents.
    pub fn parse(text: &str, delimiter: char) -> Result<Self, GameError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or(GameError::MissingColumn("level"))?;
        let columns = Columns::from_header(&split_fields(header, delimiter))?;

        let mut questions = vec![];
        for (line_no, line) in lines {
            let fields = split_fields(line, delimiter);
            let id = QuestionId(questions.len());
            questions.push(columns.question(id, &fields, line_no)?);
        }

        let answers_n = columns.answers.len();
        Ok(Self::from_questions(questions, answers_n))
    }

    fn from_questions(questions: Vec<Question>, answers_n: usize) -> Self {
        let mut bank = QuestionBank {
            questions,
            pools: BTreeMap::new(),
            answers_n,
            rng: StdRng::from_os_rng(),
        };
        bank.reset();
        bank
    }

    /// Replace the RNG with a seeded one (deterministic draws).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

// ══════════════════════════════════════════════════════════════
// Queries and draws
// ══════════════════════════════════════════════════════════════

impl QuestionBank {
    /// Remove and return a random not-yet-asked question of `level`.
    pub fn draw_question(&mut self, level: usize) -> Option<&Question> {
        let pool = self.pools.get_mut(&level)?;
        if pool.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..pool.len());
        let id = pool.swap_remove(pick);
        tracing::debug!(level, question = id.0, left = pool.len(), "question drawn");
        self.questions.get(id.0)
    }

    /// Is `submitted` the designated correct answer of `question`?
    pub fn check_answer(&self, question: &Question, submitted: &str) -> bool {
        submitted == question.correct_answer()
    }

    /// Prompt first, then the answers in random order.
    pub fn shuffle_answers(&mut self, question: &Question) -> Vec<String> {
        let mut answers = question.answers.clone();
        answers.shuffle(&mut self.rng);
        let mut entries = Vec::with_capacity(answers.len() + 1);
        entries.push(question.text.clone());
        entries.extend(answers);
        entries
    }

    /// Refill the pool of `level` with every question of that level.
    /// Returns the new pool size.
    pub fn recycle(&mut self, level: usize) -> usize {
        let ids: Vec<QuestionId> = self
            .questions
            .iter()
            .filter(|q| q.level == level)
            .map(|q| q.id)
            .collect();
        let n = ids.len();
        if n > 0 {
            self.pools.insert(level, ids);
        }
        n
    }

    /// Refill every pool.
    pub fn reset(&mut self) {
        self.pools.clear();
        for q in &self.questions {
            self.pools.entry(q.level).or_default().push(q.id);
        }
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id.0)
    }

    /// Questions of `level` not asked yet.
    pub fn remaining(&self, level: usize) -> usize {
        self.pools.get(&level).map_or(0, Vec::len)
    }

    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.pools.keys().copied()
    }

    pub fn answers_n(&self) -> usize {
        self.answers_n
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

// ══════════════════════════════════════════════════════════════
// Field parsing
// ══════════════════════════════════════════════════════════════

/// Column positions resolved from the header.
struct Columns {
    level: usize,
    question: usize,
    answers: Vec<usize>,
}

impl Columns {
    fn from_header(names: &[String]) -> Result<Self, GameError> {
        let find = |wanted: &'static str| {
            names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(wanted))
                .ok_or(GameError::MissingColumn(wanted))
        };
        let level = find("level")?;
        let question = find("question")?;
        let answers: Vec<usize> = names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.to_lowercase().contains("answer"))
            .map(|(i, _)| i)
            .collect();
        if answers.is_empty() {
            return Err(GameError::NoAnswerColumns);
        }
        Ok(Columns { level, question, answers })
    }

    fn width(&self) -> usize {
        self.answers
            .iter()
            .copied()
            .chain([self.level, self.question])
            .max()
            .unwrap_or(0)
            + 1
    }

    fn question(&self, id: QuestionId, fields: &[String], line: usize) -> Result<Question, GameError> {
        if fields.len() < self.width() {
            return Err(GameError::MalformedRow {
                line,
                reason: format!("expected {} fields, found {}", self.width(), fields.len()),
            });
        }
        let level = fields[self.level].parse::<usize>().map_err(|_| GameError::MalformedRow {
            line,
            reason: format!("level '{}' is not a number", fields[self.level]),
        })?;
        let text = fields[self.question].clone();
        if text.is_empty() {
            return Err(GameError::MalformedRow { line, reason: "empty question".into() });
        }
        let answers: Vec<String> = self.answers.iter().map(|&i| fields[i].clone()).collect();
        if answers[0].is_empty() {
            return Err(GameError::MalformedRow { line, reason: "empty correct answer".into() });
        }
        Ok(Question { id, level, text, answers })
    }
}

/// Split one line into trimmed fields, honouring double quotes.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = vec![];
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
