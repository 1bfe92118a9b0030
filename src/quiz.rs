//! Question banks and the quiz state machine.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::matcher::{is_correct, normalize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

/// Reads a JSON array of `{question, answer}` records.
pub fn load_bank(path: &Path) -> Result<Vec<Question>> {
    let raw = fs::read_to_string(path)?;
    let questions: Vec<Question> = serde_json::from_str(&raw).map_err(|source| Error::Bank {
        path: path.to_path_buf(),
        source,
    })?;
    if questions.is_empty() {
        return Err(Error::EmptyBank(path.to_path_buf()));
    }
    info!(path = %path.display(), count = questions.len(), "question bank loaded");
    Ok(questions)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// Expected answer after normalization, as read back to the player.
    pub expected: String,
}

impl Verdict {
    pub fn feedback(&self) -> &'static str {
        if self.correct {
            "Correct Answer"
        } else {
            "Wrong Answer"
        }
    }

    pub fn spoken(&self) -> String {
        if self.correct {
            "Correct answer".to_string()
        } else {
            format!("Wrong answer. The correct answer is {}", self.expected)
        }
    }
}

/// Walks the bank in order, one judged answer per question.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    score: u32,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            index: 0,
            score: 0,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// 1-based number of the current question.
    pub fn number(&self) -> usize {
        (self.index + 1).min(self.questions.len())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Judges `answer` against the current question and moves on. `None`
    /// once every question has been answered.
    pub fn submit(&mut self, answer: &str) -> Option<Verdict> {
        let question = self.questions.get(self.index)?;
        let correct = is_correct(answer, &question.answer);
        debug!(
            user = %normalize(answer),
            expected = %normalize(&question.answer),
            correct,
            "answer judged"
        );
        let verdict = Verdict {
            correct,
            expected: normalize(&question.answer),
        };
        if correct {
            self.score += 1;
        }
        self.index += 1;
        Some(verdict)
    }

    pub fn summary(&self) -> String {
        format!("Quiz completed. Your score is {}", self.score)
    }
}
