//! Question records: immutable data loaded from the subject's JSON document
//! plus the per-session progress the session mutates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Question identifier. Data files use numbers, but strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// One option label is correct.
    Choice,
    /// A set of option labels must be selected exactly.
    MultiSelect,
    /// Free text compared against accepted answers.
    FillIn,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Choice => "choice",
            QuestionKind::MultiSelect => "multi-select",
            QuestionKind::FillIn => "fill-in",
        }
    }

    /// Decide the kind from the optional `kind`/`tipo` hint and the answer shape.
    fn resolve(hint: Option<&str>, answer: &AnswerKey) -> Self {
        match hint.map(str::trim) {
            Some("fill") | Some("fill-in") => QuestionKind::FillIn,
            Some("multi") | Some("multi-select") => QuestionKind::MultiSelect,
            _ => match answer {
                AnswerKey::Many(_) => QuestionKind::MultiSelect,
                AnswerKey::One(_) => QuestionKind::Choice,
            },
        }
    }
}

/// The correct answer as written in the data file: one value or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    One(String),
    Many(Vec<String>),
}

impl AnswerKey {
    pub fn values(&self) -> &[String] {
        match self {
            AnswerKey::One(v) => std::slice::from_ref(v),
            AnswerKey::Many(vs) => vs,
        }
    }
}

/// What the user submitted. Labels for choice questions, text for fill-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAnswer {
    Many(Vec<String>),
    One(String),
}

impl UserAnswer {
    /// Whether `label` is part of this answer.
    pub fn includes(&self, label: &str) -> bool {
        match self {
            UserAnswer::One(v) => v == label,
            UserAnswer::Many(vs) => vs.iter().any(|v| v == label),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            UserAnswer::One(v) => Some(v),
            UserAnswer::Many(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
}

/// Session-scoped mutable state of one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionProgress {
    pub answered: bool,
    pub correct: Option<bool>,
    pub user_answer: Option<UserAnswer>,
    /// Display order of the original option labels, fixed once chosen.
    pub option_order: Option<Vec<String>>,
}

impl QuestionProgress {
    pub fn reset(&mut self) {
        *self = QuestionProgress::default();
    }

    pub fn is_correct(&self) -> bool {
        self.correct == Some(true)
    }
}

/// Raw record as it appears in the data file. English field names are
/// canonical; the aliases cover the data files already published.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: QuestionId,
    #[serde(alias = "pergunta")]
    prompt: String,
    #[serde(default, alias = "tipo")]
    kind: Option<String>,
    #[serde(default, alias = "opcoes")]
    options: BTreeMap<String, String>,
    #[serde(alias = "respostaCorreta")]
    answer: AnswerKey,
    #[serde(default, alias = "explicacao")]
    explanation: Option<String>,
    #[serde(default, alias = "imagem")]
    image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "QuestionRecord")]
pub struct Question {
    pub id: QuestionId,
    /// Trusted markup (may contain `<code>` and similar tags).
    pub prompt: String,
    pub kind: QuestionKind,
    /// Options in label order. Empty for fill-in questions.
    pub options: Vec<AnswerOption>,
    pub answer: AnswerKey,
    pub explanation: Option<String>,
    pub image: Option<String>,
    pub progress: QuestionProgress,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let kind = QuestionKind::resolve(record.kind.as_deref(), &record.answer);
        let options = if kind == QuestionKind::FillIn {
            Vec::new()
        } else {
            record
                .options
                .into_iter()
                .map(|(label, text)| AnswerOption { label, text })
                .collect()
        };
        Self {
            id: record.id,
            prompt: record.prompt,
            kind,
            options,
            answer: record.answer,
            explanation: record.explanation.filter(|e| !e.trim().is_empty()),
            image: record.image.filter(|i| !i.trim().is_empty()),
            progress: QuestionProgress::default(),
        }
    }
}

impl Question {
    /// Original option labels in label order.
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.label.clone()).collect()
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o.label == label)
    }

    pub fn option_text(&self, label: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.label == label)
            .map(|o| o.text.as_str())
    }

    /// Whether `label` belongs to the correct answer (choice or multi-select).
    pub fn is_correct_label(&self, label: &str) -> bool {
        self.answer.values().iter().any(|v| v == label)
    }

    /// Order-independent exact set comparison. No partial credit.
    pub fn is_correct_set(&self, labels: &[String]) -> bool {
        let submitted: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = self.answer.values().iter().map(String::as_str).collect();
        submitted == expected
    }

    /// Exact, case-sensitive match against any accepted answer.
    pub fn accepts_text(&self, text: &str) -> bool {
        self.answer.values().iter().any(|v| v == text)
    }
}
