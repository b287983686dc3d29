//! Quiz session state machine.
//!
//! Owns the ordered questions, the current position, the running score and
//! the mode. Every answer and every forward move in normal mode writes a
//! snapshot to the injected store; completion and fresh starts clear it.
//! Review mode replays stored answers and never writes.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SnapshotError};
use crate::quiz::question::{Question, QuestionKind, UserAnswer};
use crate::quiz::shuffle::fisher_yates;
use crate::quiz::snapshot::{QuestionSnapshot, Snapshot};
use crate::quiz::store::SnapshotStore;
use crate::quiz::summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Read-only replay after completion.
    Review,
}

/// Result of a submit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Recorded { correct: bool },
    /// Review mode, or the question was already answered.
    Ignored,
}

/// Result of `advance` / `jump_to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Navigation {
    Moved(usize),
    QuizComplete(Summary),
    ReviewComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Fresh,
    Resumed,
    /// The offered snapshot failed validation; a fresh session started instead.
    Discarded(SnapshotError),
}

pub struct QuizSession<S> {
    storage_key: String,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    mode: Mode,
    store: S,
    rng: StdRng,
}

impl<S: SnapshotStore> QuizSession<S> {
    /// Wrap freshly loaded questions. Call `start` before use.
    pub fn new(storage_key: impl Into<String>, questions: Vec<Question>, store: S) -> Self {
        Self::with_rng(storage_key, questions, store, StdRng::from_entropy())
    }

    pub fn with_rng(
        storage_key: impl Into<String>,
        questions: Vec<Question>,
        store: S,
        rng: StdRng,
    ) -> Self {
        Self {
            storage_key: storage_key.into(),
            questions,
            current_index: 0,
            score: 0,
            mode: Mode::Normal,
            store,
            rng,
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Start a session, resuming from `resume` when it matches the loaded
    /// questions. A mismatching snapshot is dropped and a fresh session begins.
    pub fn start(&mut self, resume: Option<Snapshot>) -> StartOutcome {
        self.mode = Mode::Normal;
        if let Some(snapshot) = resume {
            match self.restore(&snapshot) {
                Ok(()) => {
                    info!(
                        key = %self.storage_key,
                        index = self.current_index,
                        score = self.score,
                        "quiz session resumed"
                    );
                    return StartOutcome::Resumed;
                }
                Err(err) => {
                    warn!(key = %self.storage_key, "discarding saved quiz: {}", err);
                    self.start_fresh();
                    return StartOutcome::Discarded(err);
                }
            }
        }
        self.start_fresh();
        StartOutcome::Fresh
    }

    fn start_fresh(&mut self) {
        fisher_yates(&mut self.questions, &mut self.rng);
        self.current_index = 0;
        self.score = 0;
        for q in &mut self.questions {
            q.progress.reset();
        }
        self.store.remove(&self.storage_key);
        info!(key = %self.storage_key, questions = self.questions.len(), "quiz session started");
    }

    /// Replay the finished quiz read-only from the first question.
    pub fn start_review(&mut self) {
        self.mode = Mode::Review;
        self.current_index = 0;
        debug!(key = %self.storage_key, "review mode");
    }

    // ── Queries ────────────────────────────────────────────────────

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions.get(self.current_index).ok_or(SessionError::OutOfRange {
            index: self.current_index,
            len: self.questions.len(),
        })
    }

    /// Display order of the options of question `index`. Shuffled on first
    /// request, then fixed for the rest of the session. Fill-in questions
    /// have no options and never get an order.
    pub fn option_order_for(&mut self, index: usize) -> Result<&[String], SessionError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(SessionError::OutOfRange { index, len })?;
        if question.kind == QuestionKind::FillIn {
            return Ok(&[]);
        }
        if question.progress.option_order.is_none() {
            let mut labels = question.labels();
            fisher_yates(&mut labels, &mut self.rng);
            question.progress.option_order = Some(labels);
        }
        Ok(question.progress.option_order.as_deref().unwrap_or(&[]))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn summary(&self) -> Summary {
        Summary::new(self.score, self.questions.len())
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn count_correct(&self) -> usize {
        self.questions.iter().filter(|q| q.progress.is_correct()).count()
    }

    // ── Answers ────────────────────────────────────────────────────

    /// Answer a single-choice question with an original option label.
    pub fn submit_choice(&mut self, label: &str) -> Result<Submission, SessionError> {
        let question = self.current_question()?;
        if self.is_locked(question) {
            return Ok(Submission::Ignored);
        }
        if question.kind != QuestionKind::Choice {
            return Err(SessionError::WrongKind { kind: question.kind.as_str() });
        }
        if !question.has_option(label) {
            return Err(SessionError::UnknownOption { label: label.to_string() });
        }
        let correct = question.is_correct_label(label);
        Ok(self.record(UserAnswer::One(label.to_string()), correct))
    }

    /// Answer a multi-select question. Correct only when the submitted set
    /// equals the correct set. An empty submission is a valid answer.
    pub fn submit_multi_choice(&mut self, labels: &[String]) -> Result<Submission, SessionError> {
        let question = self.current_question()?;
        if self.is_locked(question) {
            return Ok(Submission::Ignored);
        }
        if question.kind != QuestionKind::MultiSelect {
            return Err(SessionError::WrongKind { kind: question.kind.as_str() });
        }
        let mut picked: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            if !question.has_option(label) {
                return Err(SessionError::UnknownOption { label: label.clone() });
            }
            if !picked.contains(label) {
                picked.push(label.clone());
            }
        }
        let correct = question.is_correct_set(&picked);
        Ok(self.record(UserAnswer::Many(picked), correct))
    }

    /// Answer a fill-in question. Only surrounding whitespace is removed;
    /// case and punctuation must match an accepted answer exactly.
    pub fn submit_fill_answer(&mut self, text: &str) -> Result<Submission, SessionError> {
        let question = self.current_question()?;
        if self.is_locked(question) {
            return Ok(Submission::Ignored);
        }
        if question.kind != QuestionKind::FillIn {
            return Err(SessionError::WrongKind { kind: question.kind.as_str() });
        }
        let trimmed = text.trim();
        let correct = question.accepts_text(trimmed);
        Ok(self.record(UserAnswer::One(trimmed.to_string()), correct))
    }

    fn is_locked(&self, question: &Question) -> bool {
        let locked = self.mode == Mode::Review || question.progress.answered;
        if locked {
            debug!(id = %question.id, mode = ?self.mode, "submission ignored");
        }
        locked
    }

    fn record(&mut self, answer: UserAnswer, correct: bool) -> Submission {
        let progress = &mut self.questions[self.current_index].progress;
        progress.answered = true;
        progress.correct = Some(correct);
        progress.user_answer = Some(answer);
        if correct {
            self.score += 1;
        }
        self.persist();
        Submission::Recorded { correct }
    }

    // ── Navigation ─────────────────────────────────────────────────

    /// Move to the next question, or complete the quiz (normal mode) or the
    /// review (review mode) from the last question. The new question's option
    /// order is fixed before the snapshot is written, so a reload shows the
    /// same order.
    pub fn advance(&mut self) -> Navigation {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            let _ = self.option_order_for(self.current_index);
            self.persist();
            Navigation::Moved(self.current_index)
        } else {
            self.finish()
        }
    }

    /// Reposition without touching answers. Out-of-range targets complete
    /// the quiz or review the same way `advance` does from the last question.
    /// A finished quiz in normal mode stays finished; only review or a
    /// restart reopens its questions.
    pub fn jump_to(&mut self, index: usize) -> Navigation {
        if self.mode == Mode::Normal && self.is_complete() {
            debug!(key = %self.storage_key, index, "jump ignored after completion");
            return Navigation::QuizComplete(self.summary());
        }
        if index < self.questions.len() {
            self.current_index = index;
            Navigation::Moved(index)
        } else {
            self.finish()
        }
    }

    fn finish(&mut self) -> Navigation {
        self.current_index = self.questions.len();
        match self.mode {
            Mode::Review => Navigation::ReviewComplete,
            Mode::Normal => {
                self.store.remove(&self.storage_key);
                let summary = self.summary();
                info!(
                    key = %self.storage_key,
                    score = summary.score,
                    total = summary.total,
                    "quiz complete"
                );
                Navigation::QuizComplete(summary)
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_index: self.current_index,
            score: self.score,
            questions: self.questions.iter().map(QuestionSnapshot::capture).collect(),
        }
    }

    /// Apply a snapshot: validate it, reorder the questions to the stored
    /// order and restore every question's progress by id.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        snapshot.validate(&self.questions)?;

        self.questions
            .sort_by_cached_key(|q| snapshot.position_of(&q.id).unwrap_or(usize::MAX));
        for q in &mut self.questions {
            q.progress = snapshot
                .questions
                .iter()
                .find(|s| s.id == q.id)
                .map(QuestionSnapshot::to_progress)
                .unwrap_or_default();
            if !q.progress.answered {
                q.progress.correct = None;
            }
        }

        self.score = self.count_correct();
        if self.score != snapshot.score {
            warn!(
                stored = snapshot.score,
                recomputed = self.score,
                "saved score disagrees with saved answers; using answers"
            );
        }
        self.current_index = snapshot.current_index.min(self.questions.len());
        self.mode = Mode::Normal;
        Ok(())
    }

    /// Read the stored snapshot for this session. Unparseable entries are
    /// removed; entries that no longer match the loaded questions are removed
    /// too. Either way the caller sees `None` and starts fresh.
    pub fn load_saved(&mut self) -> Option<Snapshot> {
        let raw = self.store.get(&self.storage_key)?;
        let checked = Snapshot::from_json(&raw).and_then(|snapshot| {
            snapshot.validate(&self.questions)?;
            Ok(snapshot)
        });
        match checked {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(key = %self.storage_key, "ignoring saved quiz: {}", err);
                self.store.remove(&self.storage_key);
                None
            }
        }
    }

    pub fn discard_saved(&mut self) {
        self.store.remove(&self.storage_key);
    }

    fn persist(&mut self) {
        if self.mode != Mode::Normal {
            return;
        }
        let json = self.snapshot().to_json();
        self.store.set(&self.storage_key, json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::store::MemoryStore;

    const KEY: &str = "quizState_test";

    fn fixture() -> Vec<Question> {
        serde_json::from_str(
            r#"[
            {"id":1,"pergunta":"Samba implements?","opcoes":{"A":"NFS","B":"Apache","C":"Samba","D":"OpenLDAP"},"respostaCorreta":"C","explicacao":"SMB/CIFS."},
            {"id":2,"pergunta":"Samba config file?","opcoes":{"A":"/etc/samba/samba.conf","B":"/etc/smb.conf"},"respostaCorreta":"B"},
            {"id":3,"pergunta":"Check smb.conf syntax?","tipo":"fill","respostaCorreta":["testparm","testparm -s"]},
            {"id":4,"pergunta":"Unix file sharing?","opcoes":{"A":"NFS","B":"CIFS","C":"AFS"},"respostaCorreta":["A","C"]}
        ]"#,
        )
        .unwrap()
    }

    fn session(seed: u64) -> QuizSession<MemoryStore> {
        session_with_store(seed, MemoryStore::new())
    }

    fn session_with_store(seed: u64, store: MemoryStore) -> QuizSession<MemoryStore> {
        QuizSession::with_rng(KEY, fixture(), store, StdRng::seed_from_u64(seed))
    }

    fn assert_score_invariant(s: &QuizSession<MemoryStore>) {
        let correct = s.questions().iter().filter(|q| q.progress.correct == Some(true)).count();
        assert_eq!(s.score(), correct);
    }

    fn answer(s: &mut QuizSession<MemoryStore>, right: bool) -> Submission {
        let q = s.current_question().unwrap().clone();
        match q.kind {
            QuestionKind::Choice => {
                let label = q
                    .labels()
                    .into_iter()
                    .find(|l| q.is_correct_label(l) == right)
                    .unwrap();
                s.submit_choice(&label).unwrap()
            }
            QuestionKind::MultiSelect => {
                let labels: Vec<String> = if right {
                    q.answer.values().iter().rev().cloned().collect()
                } else {
                    vec![q.answer.values()[0].clone()]
                };
                s.submit_multi_choice(&labels).unwrap()
            }
            QuestionKind::FillIn => {
                let text = if right { " testparm " } else { "TESTPARM" };
                s.submit_fill_answer(text).unwrap()
            }
        }
    }

    fn ids(s: &QuizSession<MemoryStore>) -> Vec<String> {
        s.questions().iter().map(|q| q.id.to_string()).collect()
    }

    #[test]
    fn fresh_start_is_a_permutation_and_clears_store() {
        let mut store = MemoryStore::new();
        store.set(KEY, "stale".into());
        let mut s = session_with_store(3, store);
        assert_eq!(s.start(None), StartOutcome::Fresh);
        let mut sorted = ids(&s);
        sorted.sort();
        assert_eq!(sorted, vec!["1", "2", "3", "4"]);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.store().get(KEY), None);
    }

    #[test]
    fn three_right_one_wrong_scores_75_percent() {
        let mut s = session(11);
        s.start(None);
        let plan = [true, true, false, true];
        let mut last = None;
        for right in plan {
            assert_eq!(answer(&mut s, right), Submission::Recorded { correct: right });
            assert_score_invariant(&s);
            last = Some(s.advance());
            assert_score_invariant(&s);
        }
        match last {
            Some(Navigation::QuizComplete(summary)) => {
                assert_eq!(summary.score, 3);
                assert_eq!(summary.rounded_percentage(), 75);
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(s.is_complete());
        assert_eq!(s.store().get(KEY), None);
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut s = session(5);
        s.start(None);
        answer(&mut s, false);
        let before = s.current_question().unwrap().progress.clone();
        assert_eq!(answer(&mut s, true), Submission::Ignored);
        assert_eq!(s.current_question().unwrap().progress, before);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn answering_persists_snapshot() {
        let mut s = session(9);
        s.start(None);
        answer(&mut s, true);
        let raw = s.store().get(KEY).unwrap();
        let snap = Snapshot::from_json(&raw).unwrap();
        assert_eq!(snap.score, 1);
        assert!(snap.questions[0].answered);
    }

    #[test]
    fn multi_select_exact_set_only() {
        let mut s = session(1);
        s.start(None);
        let idx = s.questions().iter().position(|q| q.id.to_string() == "4").unwrap();
        s.jump_to(idx);
        assert_eq!(
            s.submit_multi_choice(&["C".into(), "A".into()]).unwrap(),
            Submission::Recorded { correct: true }
        );

        for wrong in [vec!["A"], vec!["A", "B", "C"], vec!["B"], vec![]] {
            let mut s = session(1);
            s.start(None);
            s.jump_to(idx);
            let labels: Vec<String> = wrong.iter().map(|l| l.to_string()).collect();
            assert_eq!(
                s.submit_multi_choice(&labels).unwrap(),
                Submission::Recorded { correct: false }
            );
        }
    }

    #[test]
    fn fill_in_is_case_sensitive_and_trims() {
        let mut s = session(1);
        s.start(None);
        let idx = s.questions().iter().position(|q| q.kind == QuestionKind::FillIn).unwrap();
        s.jump_to(idx);
        assert_eq!(
            s.submit_fill_answer("Testparm").unwrap(),
            Submission::Recorded { correct: false }
        );

        let mut s = session(1);
        s.start(None);
        s.jump_to(idx);
        assert_eq!(
            s.submit_fill_answer("  testparm -s\n").unwrap(),
            Submission::Recorded { correct: true }
        );
        let stored = s.current_question().unwrap().progress.user_answer.clone();
        assert_eq!(stored, Some(UserAnswer::One("testparm -s".into())));
    }

    #[test]
    fn wrong_kind_and_unknown_option_are_errors() {
        let mut s = session(1);
        s.start(None);
        let fill = s.questions().iter().position(|q| q.kind == QuestionKind::FillIn).unwrap();
        s.jump_to(fill);
        assert!(matches!(s.submit_choice("A"), Err(SessionError::WrongKind { .. })));

        let choice = s.questions().iter().position(|q| q.kind == QuestionKind::Choice).unwrap();
        s.jump_to(choice);
        assert!(matches!(s.submit_choice("Z"), Err(SessionError::UnknownOption { .. })));
        assert!(!s.current_question().unwrap().progress.answered);
    }

    #[test]
    fn option_order_is_stable() {
        let mut s = session(21);
        s.start(None);
        let idx = s.questions().iter().position(|q| q.id.to_string() == "1").unwrap();
        let first = s.option_order_for(idx).unwrap().to_vec();
        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C", "D"]);
        for _ in 0..10 {
            assert_eq!(s.option_order_for(idx).unwrap(), &first[..]);
        }
        let fill = s.questions().iter().position(|q| q.kind == QuestionKind::FillIn).unwrap();
        assert!(s.option_order_for(fill).unwrap().is_empty());
        assert!(s.questions()[fill].progress.option_order.is_none());
        assert!(matches!(s.option_order_for(99), Err(SessionError::OutOfRange { .. })));
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut s = session(4);
        s.start(None);
        for i in 0..s.len() {
            s.option_order_for(i).unwrap();
        }
        answer(&mut s, true);
        s.advance();
        answer(&mut s, false);
        let snap = s.snapshot();

        let mut other = session(99);
        other.restore(&snap).unwrap();
        assert_eq!(other.snapshot(), snap);
        assert_eq!(other.current_index(), s.current_index());
        assert_eq!(other.score(), s.score());
    }

    #[test]
    fn resume_after_two_of_four() {
        let mut s = session(8);
        s.start(None);
        answer(&mut s, true);
        s.advance();
        answer(&mut s, false);
        s.advance();
        let order = ids(&s);
        let flags: Vec<Option<bool>> = s.questions()[..2].iter().map(|q| q.progress.correct).collect();

        let mut reloaded = session_with_store(1234, s.store().clone());
        let saved = reloaded.load_saved();
        assert!(saved.is_some());
        assert_eq!(reloaded.start(saved), StartOutcome::Resumed);
        assert_eq!(reloaded.current_index(), 2);
        assert_eq!(ids(&reloaded), order);
        let restored: Vec<Option<bool>> =
            reloaded.questions()[..2].iter().map(|q| q.progress.correct).collect();
        assert_eq!(restored, flags);
        assert_eq!(reloaded.score(), 1);
        assert_score_invariant(&reloaded);
    }

    #[test]
    fn stale_snapshot_starts_fresh() {
        let raw = r#"{"currentIndex":3,"score":2,"questions":[
            {"id":1,"answered":true,"correct":true},{"id":2,"answered":true,"correct":true},
            {"id":3},{"id":4},{"id":5}]}"#;
        let snap = Snapshot::from_json(raw).unwrap();
        let mut s = session(2);
        let outcome = s.start(Some(snap));
        assert_eq!(
            outcome,
            StartOutcome::Discarded(SnapshotError::CountMismatch { stored: 5, loaded: 4 })
        );
        assert_eq!(s.len(), 4);
        assert_eq!(s.score(), 0);
        assert_eq!(s.current_index(), 0);
        assert!(s.questions().iter().all(|q| !q.progress.answered));
    }

    #[test]
    fn stale_entry_in_store_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(KEY, r#"{"currentIndex":0,"score":0,"questions":[{"id":1},{"id":2},{"id":3},{"id":4},{"id":5}]}"#.into());
        let mut s = session_with_store(2, store);
        assert_eq!(s.load_saved(), None);
        assert_eq!(s.store().get(KEY), None);
    }

    #[test]
    fn corrupt_entry_is_removed() {
        let mut store = MemoryStore::new();
        store.set(KEY, "{not json".into());
        let mut s = session_with_store(2, store);
        assert_eq!(s.load_saved(), None);
        assert_eq!(s.store().get(KEY), None);
        assert_eq!(s.start(None), StartOutcome::Fresh);
    }

    #[test]
    fn review_never_mutates_and_completes_after_last() {
        let mut s = session(6);
        s.start(None);
        for right in [true, false, true, true] {
            answer(&mut s, right);
            s.advance();
        }
        assert!(s.is_complete());
        let score = s.score();
        let answers: Vec<_> = s.questions().iter().map(|q| q.progress.clone()).collect();

        s.start_review();
        assert_eq!(s.mode(), Mode::Review);
        assert_eq!(s.current_index(), 0);
        for i in 0..4 {
            assert_eq!(answer(&mut s, true), Submission::Ignored);
            assert_eq!(s.score(), score);
            let nav = s.advance();
            if i < 3 {
                assert_eq!(nav, Navigation::Moved(i + 1));
            } else {
                assert_eq!(nav, Navigation::ReviewComplete);
            }
        }
        let after: Vec<_> = s.questions().iter().map(|q| q.progress.clone()).collect();
        assert_eq!(after, answers);
        assert_eq!(s.store().get(KEY), None);
    }

    #[test]
    fn jump_keeps_answers_and_out_of_range_completes() {
        let mut s = session(10);
        s.start(None);
        answer(&mut s, true);
        assert_eq!(s.jump_to(3), Navigation::Moved(3));
        assert!(s.questions()[0].progress.answered);
        assert_eq!(s.jump_to(0), Navigation::Moved(0));
        assert_eq!(answer(&mut s, false), Submission::Ignored);
        assert!(matches!(s.jump_to(4), Navigation::QuizComplete(_)));
        assert!(matches!(
            s.current_question(),
            Err(SessionError::OutOfRange { index: 4, len: 4 })
        ));
    }

    #[test]
    fn advance_persists_position() {
        let mut s = session(12);
        s.start(None);
        s.advance();
        let snap = Snapshot::from_json(&s.store().get(KEY).unwrap()).unwrap();
        assert_eq!(snap.current_index, 1);
    }

    #[test]
    fn advance_saves_option_order_of_new_question() {
        let mut s = session(15);
        s.start(None);
        for _ in 0..3 {
            answer(&mut s, true);
            s.advance();
            let idx = s.current_index();
            let snap = Snapshot::from_json(&s.store().get(KEY).unwrap()).unwrap();
            let stored = snap.questions[idx].option_order.clone();
            if s.questions()[idx].kind == QuestionKind::FillIn {
                assert_eq!(stored, None);
            } else {
                let shown = s.option_order_for(idx).unwrap().to_vec();
                assert_eq!(stored, Some(shown));
            }
        }
    }

    #[test]
    fn finished_quiz_ignores_jumps_until_review() {
        let mut s = session(16);
        s.start(None);
        for _ in 0..4 {
            answer(&mut s, true);
            s.advance();
        }
        assert!(s.is_complete());
        assert!(matches!(s.jump_to(0), Navigation::QuizComplete(_)));
        assert!(s.is_complete());
        assert!(matches!(s.advance(), Navigation::QuizComplete(_)));
        assert_eq!(s.store().get(KEY), None);

        s.start_review();
        assert_eq!(s.jump_to(2), Navigation::Moved(2));
    }

    #[test]
    fn restore_recomputes_inconsistent_score() {
        let mut s = session(13);
        s.start(None);
        answer(&mut s, true);
        let mut snap = s.snapshot();
        snap.score = 3;
        let mut other = session(14);
        other.restore(&snap).unwrap();
        assert_eq!(other.score(), 1);
    }
}
