//! Serializable session snapshot stored under one localStorage key per subject.
//!
//! ```text
//! {
//!   "currentIndex": 2,
//!   "score": 1,
//!   "questions": [
//!     { "id": 3, "answered": true, "correct": true, "userAnswer": "testparm", "optionOrder": null },
//!     ...
//!   ]
//! }
//! ```
//!
//! `questions` is in session order. Snapshots written by the older page use
//! `currentQuestionIndex` and `isCorrect`; both are accepted on read.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SnapshotError;
use crate::quiz::question::{Question, QuestionId, QuestionProgress, UserAnswer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSnapshot {
    pub id: QuestionId,
    #[serde(default)]
    pub answered: bool,
    #[serde(default, alias = "isCorrect")]
    pub correct: Option<bool>,
    #[serde(default)]
    pub user_answer: Option<UserAnswer>,
    #[serde(default)]
    pub option_order: Option<Vec<String>>,
}

impl QuestionSnapshot {
    pub fn capture(question: &Question) -> Self {
        let p = &question.progress;
        Self {
            id: question.id.clone(),
            answered: p.answered,
            correct: p.correct,
            user_answer: p.user_answer.clone(),
            option_order: p.option_order.clone(),
        }
    }

    pub fn to_progress(&self) -> QuestionProgress {
        QuestionProgress {
            answered: self.answered,
            correct: self.correct,
            user_answer: self.user_answer.clone(),
            option_order: self.option_order.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(alias = "currentQuestionIndex")]
    pub current_index: usize,
    pub score: usize,
    pub questions: Vec<QuestionSnapshot>,
}

impl Snapshot {
    /// Parse a stored value. Any parse failure is `SnapshotError::Corrupt`.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(raw).map_err(|e| SnapshotError::Corrupt(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // Plain structs of strings, numbers and bools always serialize.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Check the snapshot against the loaded questions: same count, and every
    /// stored id names a distinct loaded question (so the id sets are equal).
    pub fn validate(&self, loaded: &[Question]) -> Result<(), SnapshotError> {
        if self.questions.len() != loaded.len() {
            return Err(SnapshotError::CountMismatch {
                stored: self.questions.len(),
                loaded: loaded.len(),
            });
        }
        let known: HashSet<&QuestionId> = loaded.iter().map(|q| &q.id).collect();
        let mut seen = HashSet::with_capacity(self.questions.len());
        for q in &self.questions {
            if !known.contains(&q.id) || !seen.insert(&q.id) {
                return Err(SnapshotError::UnknownQuestion { id: q.id.to_string() });
            }
        }
        Ok(())
    }

    /// Position of `id` in the stored session order.
    pub fn position_of(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }
}
