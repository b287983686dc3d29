//! In-browser WASM quiz runner.
//!
//! Exports `handle_request(method, path, query, body)` for the page's JS
//! bridge to call. Uses `matchit` for URL routing, the same router engine
//! that powers Axum.
//!
//! The bridge owns the two things WASM cannot reach: it fetches the question
//! document for the subject and hands it to `/api/quiz/load`, and it runs the
//! inline scripts in responses that mirror session snapshots to localStorage.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod quiz;
pub mod routes;

/// Process an HTTP-like request and return an HTML fragment.
///
/// Called from JavaScript via wasm-bindgen.
///
/// # Arguments
/// * `method`: HTTP method ("GET" or "POST")
/// * `path`  : URL path (e.g., "/api/quiz/answer")
/// * `query` : Query string (e.g., "?subject=lpic202")
/// * `body`  : Request body (form data, or JSON for `/api/quiz/config`).
///   Empty string for GET requests.
///
/// # Returns
/// An HTML string fragment suitable for HTMX to swap into the DOM.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/quiz/boot", "boot").ok();
    router.insert("/api/quiz/load", "load").ok();
    router.insert("/api/quiz/start", "start").ok();
    router.insert("/api/quiz/question", "question").ok();
    router.insert("/api/quiz/answer", "answer").ok();
    router.insert("/api/quiz/toggle", "toggle").ok();
    router.insert("/api/quiz/next", "next").ok();
    router.insert("/api/quiz/jump", "jump").ok();
    router.insert("/api/quiz/nav", "nav").ok();
    router.insert("/api/quiz/key", "key").ok();
    router.insert("/api/quiz/restart", "restart").ok();
    router.insert("/api/quiz/review", "review").ok();
    router.insert("/api/quiz/summary", "summary").ok();
    router.insert("/api/quiz/config", "config").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            // GET routes
            ("boot", "GET") => routes::quiz::handle_boot_get(query),
            ("question", "GET") => routes::quiz::handle_question_get(query),
            ("nav", "GET") => routes::quiz::handle_nav_get(query),
            ("summary", "GET") => routes::quiz::handle_summary_get(query),

            // POST routes
            ("load", "POST") => routes::quiz::handle_load_post(body),
            ("start", "POST") => routes::quiz::handle_start_post(body),
            ("answer", "POST") => routes::quiz::handle_answer_post(body),
            ("toggle", "POST") => routes::quiz::handle_toggle_post(body),
            ("next", "POST") => routes::quiz::handle_next_post(body),
            ("jump", "POST") => routes::quiz::handle_jump_post(body),
            ("key", "POST") => routes::quiz::handle_key_post(body),
            ("restart", "POST") => routes::quiz::handle_restart_post(body),
            ("review", "POST") => routes::quiz::handle_review_post(body),
            ("config", "POST") => routes::quiz::handle_config_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="notice text-error">404: route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="notice text-error">405: method not allowed</span>"#.to_string()
}
