//! Active quiz container.
//!
//! Uses `thread_local!` + `RefCell` for mutable access in single-threaded
//! WASM. The runtime exists only after the question data loaded; before that
//! (or after a fatal load error) it is `None`.

use std::cell::RefCell;

use crate::quiz::loader::Subject;
use crate::quiz::session::QuizSession;
use crate::quiz::snapshot::Snapshot;
use crate::quiz::store::{BridgeStore, StoreOp};

pub struct QuizRuntime {
    pub subject: Subject,
    pub title: String,
    pub session: QuizSession<BridgeStore>,
    /// Multi-select labels toggled on the current question, not yet submitted.
    pub selection: Vec<String>,
    /// Saved progress waiting for the continue / start over choice.
    pub pending_resume: Option<Snapshot>,
}

impl QuizRuntime {
    pub fn new(subject: Subject, title: String, session: QuizSession<BridgeStore>) -> Self {
        Self {
            subject,
            title,
            session,
            selection: Vec::new(),
            pending_resume: None,
        }
    }

    /// Flip `label` in the pending multi-select selection.
    pub fn toggle_selection(&mut self, label: &str) {
        if let Some(pos) = self.selection.iter().position(|l| l == label) {
            self.selection.remove(pos);
        } else {
            self.selection.push(label.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Storage writes queued since the last response.
    pub fn flush_store(&mut self) -> Vec<StoreOp> {
        self.session.store_mut().drain()
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<QuizRuntime>> = const { RefCell::new(None) };
}

/// Read access to the active quiz, `None` when nothing is loaded.
pub fn with_runtime<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&QuizRuntime) -> R,
{
    RUNTIME.with(|r| r.borrow().as_ref().map(f))
}

/// Mutable access to the active quiz, `None` when nothing is loaded.
pub fn with_runtime_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut QuizRuntime) -> R,
{
    RUNTIME.with(|r| r.borrow_mut().as_mut().map(f))
}

pub fn install(runtime: QuizRuntime) {
    RUNTIME.with(|r| *r.borrow_mut() = Some(runtime));
}

pub fn clear_runtime() {
    RUNTIME.with(|r| *r.borrow_mut() = None);
}

pub fn is_loaded() -> bool {
    RUNTIME.with(|r| r.borrow().is_some())
}
