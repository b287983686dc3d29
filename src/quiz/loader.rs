//! Subject lookup and question document loading.
//!
//! The page URL carries the subject (`?subject=lpic202`). From it we derive
//! the data file the bridge fetches, the localStorage key and the page title.
//! The bridge performs the fetch and hands back either the payload or the
//! failure; everything after that is decided here.

use tracing::warn;

use crate::config::QuizConfig;
use crate::error::LoadError;
use crate::quiz::question::Question;

/// A validated, non-empty subject identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    /// Read the subject from decoded page query parameters (`subject`, or
    /// the older `assunto`). Missing or blank is `LoadError::MissingParameter`.
    pub fn from_params(params: &[(String, String)]) -> Result<Self, LoadError> {
        let lookup = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        let raw = lookup("subject").or_else(|| lookup("assunto")).unwrap_or("");
        Self::new(raw)
    }

    pub fn new(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoadError::MissingParameter);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<data_dir>/<prefix><subject>.json`
    pub fn data_path(&self, config: &QuizConfig) -> String {
        let dir = config.data_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}{}.json", config.data_file_prefix, self.0)
        } else {
            format!("{}/{}{}.json", dir, config.data_file_prefix, self.0)
        }
    }

    /// One key per subject so quizzes persist independently.
    pub fn storage_key(&self, config: &QuizConfig) -> String {
        format!("{}{}", config.storage_key_prefix, self.0)
    }

    pub fn title(&self, config: &QuizConfig) -> String {
        match config.titles.get(&self.0) {
            Some(title) => format!("Quiz {}", title),
            None => format!("Quiz {}", self.0.to_uppercase()),
        }
    }
}

/// What the bridge observed when fetching the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// HTTP status; 0 when the request never completed.
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turn a fetch result into the loaded question list.
pub fn load_questions(path: &str, fetched: &FetchResult) -> Result<Vec<Question>, LoadError> {
    if !fetched.is_success() {
        let reason = match (fetched.status, fetched.status_text.trim()) {
            (0, "") => "network error".to_string(),
            (0, text) => text.to_string(),
            (status, "") => format!("HTTP {}", status),
            (status, text) => format!("HTTP {} {}", status, text),
        };
        warn!(path, %reason, "quiz data fetch failed");
        return Err(LoadError::LoadFailure {
            path: path.to_string(),
            reason,
        });
    }
    parse_questions(path, &fetched.body)
}

/// Parse the document body. Must be a non-empty array of question records.
pub fn parse_questions(path: &str, body: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> =
        serde_json::from_str(body).map_err(|e| {
            warn!(path, error = %e, "quiz data is malformed");
            LoadError::MalformedData {
                path: path.to_string(),
                detail: e.to_string(),
            }
        })?;
    if questions.is_empty() {
        warn!(path, "quiz data is empty");
        return Err(LoadError::MalformedData {
            path: path.to_string(),
            detail: "no questions".to_string(),
        });
    }
    Ok(questions)
}
