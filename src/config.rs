//! Runtime configuration for paths, storage keys and display labels.
//!
//! Defaults match the static site layout (`data/dados_<subject>.json`,
//! `images/`, `quizState_<subject>`). The JS bridge may post a JSON object to
//! `/api/quiz/config` to override any subset of fields.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Directory the question documents are fetched from.
    pub data_dir: String,
    /// File name prefix before the subject, e.g. `dados_` for `dados_lpic202.json`.
    pub data_file_prefix: String,
    /// localStorage key prefix; the subject is appended.
    pub storage_key_prefix: String,
    /// Directory question images are served from.
    pub image_dir: String,
    /// Labels shown next to options, by display position.
    pub display_labels: Vec<String>,
    /// Prompt characters shown per navigator entry.
    pub nav_preview_chars: usize,
    /// Page titles by subject. Unlisted subjects get `Quiz <SUBJECT>`.
    /// A posted map replaces the built-in one.
    pub titles: HashMap<String, String>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            data_file_prefix: "dados_".to_string(),
            storage_key_prefix: "quizState_".to_string(),
            image_dir: "images".to_string(),
            display_labels: ["A", "B", "C", "D", "E", "F", "G"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            nav_preview_chars: 30,
            titles: [
                ("lpic101", "LPIC-1 Exam 101"),
                ("lpic102", "LPIC-1 Exam 102"),
                ("lpic201", "LPIC-2 Exam 201"),
                ("lpic202", "LPIC-2 Exam 202"),
            ]
            .iter()
            .map(|(subject, title)| (subject.to_string(), title.to_string()))
            .collect(),
        }
    }
}

impl QuizConfig {
    /// Parse a config posted by the bridge. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = serde_json::from_str(json)?;
        if config.display_labels.is_empty() {
            return Err(ConfigError::NoDisplayLabels);
        }
        Ok(config)
    }

    /// Label shown for the option at display position `index`.
    /// Falls back to the 1-based number past the configured labels.
    pub fn display_label(&self, index: usize) -> String {
        self.display_labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

thread_local! {
    static CONFIG: RefCell<QuizConfig> = RefCell::new(QuizConfig::default());
}

/// Read access to the active config.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&QuizConfig) -> R,
{
    CONFIG.with(|c| f(&c.borrow()))
}

/// Clone of the active config.
pub fn current() -> QuizConfig {
    with_config(Clone::clone)
}

/// Replace the active config.
pub fn replace_config(config: QuizConfig) {
    CONFIG.with(|c| *c.borrow_mut() = config);
}
