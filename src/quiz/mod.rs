//! Quiz domain: question records, the session state machine, snapshots and
//! their storage, and loading the question document for a subject.
//!
//! Session state lives in WASM memory (thread_local) for the lifetime of the
//! page; progress survives reloads through the snapshot in localStorage.

pub mod keyboard;
pub mod loader;
pub mod question;
pub mod session;
pub mod shuffle;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod summary;
