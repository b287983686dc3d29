//! `/api/quiz/*` routes: load the question document, answer, navigate,
//! review, and restart.
//!
//! Every handler that can change the session appends the drained storage
//! writes to its fragment, so the page's `localStorage` follows the session.

use tracing::{debug, warn};

use crate::config::{self, QuizConfig};
use crate::quiz::keyboard::KeyAction;
use crate::quiz::loader::{self, FetchResult, Subject};
use crate::quiz::question::QuestionKind;
use crate::quiz::session::{Mode, QuizSession, StartOutcome};
use crate::quiz::state::{self, QuizRuntime};
use crate::quiz::store::BridgeStore;
use crate::routes::render;
use crate::routes::util::{get_all, get_param, parse_form_body, parse_query};

fn no_quiz() -> String {
    render::render_notice("No quiz is loaded.")
}

/// Fragment plus any storage writes it caused.
fn respond(rt: &mut QuizRuntime, html: String) -> String {
    let mut out = html;
    out.push_str(&render::render_store_ops(&rt.flush_store()));
    out
}

/// Current question is answered, or the session is in review mode.
fn current_locked(rt: &QuizRuntime) -> bool {
    rt.session.mode() == Mode::Review
        || rt
            .session
            .current_question()
            .map(|q| q.progress.answered)
            .unwrap_or(true)
}

fn current_kind(rt: &QuizRuntime) -> Option<QuestionKind> {
    rt.session.current_question().ok().map(|q| q.kind)
}

// ── GET /api/quiz/boot ─────────────────────────────────────────────

/// Handle GET /api/quiz/boot?subject={subject}
/// Returns the loading indicator and the bridge call that fetches the data
/// file, or the error panel when no subject was given.
pub fn handle_boot_get(query: &str) -> String {
    let config = config::current();
    match Subject::from_params(&parse_query(query)) {
        Ok(subject) => render::render_loader(
            subject.as_str(),
            &subject.data_path(&config),
            &subject.storage_key(&config),
            &subject.title(&config),
        ),
        Err(err) => {
            warn!(%err, "quiz boot without subject");
            state::clear_runtime();
            render::render_error(&err.to_string())
        }
    }
}

// ── POST /api/quiz/load ────────────────────────────────────────────

/// Handle POST /api/quiz/load
/// Body params (sent by the bridge after fetching the data file):
///   - subject={subject}
///   - status={http status, 0 on network error}&reason={status text}
///   - data={response body}
///   - saved={localStorage value for the subject, if any}
///
/// Builds the session. A valid saved snapshot produces the resume prompt;
/// otherwise the first question of a fresh session is returned.
pub fn handle_load_post(body: &str) -> String {
    let params = parse_form_body(body);
    let config = config::current();

    let subject = match Subject::new(get_param(&params, "subject").unwrap_or("")) {
        Ok(s) => s,
        Err(err) => {
            state::clear_runtime();
            return render::render_error(&err.to_string());
        }
    };
    let path = subject.data_path(&config);
    let fetched = FetchResult {
        status: get_param(&params, "status")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0),
        status_text: get_param(&params, "reason").unwrap_or("").to_string(),
        body: get_param(&params, "data").unwrap_or("").to_string(),
    };
    let questions = match loader::load_questions(&path, &fetched) {
        Ok(q) => q,
        Err(err) => {
            state::clear_runtime();
            return render::render_error(&err.to_string());
        }
    };

    let key = subject.storage_key(&config);
    let store = BridgeStore::seeded(&key, get_param(&params, "saved"));
    let mut session = QuizSession::new(key, questions, store);
    let saved = session.load_saved();
    let title = subject.title(&config);
    let mut rt = QuizRuntime::new(subject, title, session);

    let html = match saved {
        Some(snapshot) => {
            debug!(key = rt.session.storage_key(), "offering to resume saved quiz");
            rt.pending_resume = Some(snapshot);
            render::render_resume_prompt(&rt.title)
        }
        None => {
            rt.session.start(None);
            render::render_view(&mut rt, &config)
        }
    };
    let out = respond(&mut rt, html);
    state::install(rt);
    out
}

// ── POST /api/quiz/start ───────────────────────────────────────────

/// Handle POST /api/quiz/start
/// Body params: resume=true (continue saved progress) | resume=false (start over).
pub fn handle_start_post(body: &str) -> String {
    let params = parse_form_body(body);
    let resume = get_param(&params, "resume") == Some("true");
    let config = config::current();

    state::with_runtime_mut(|rt| {
        let Some(snapshot) = rt.pending_resume.take() else {
            // Nothing pending: the prompt was already answered.
            return render::render_view(rt, &config);
        };
        let outcome = if resume {
            rt.session.start(Some(snapshot))
        } else {
            rt.session.start(None)
        };
        if let StartOutcome::Discarded(err) = &outcome {
            debug!(%err, "saved quiz could not be resumed");
        }
        rt.clear_selection();
        let html = render::render_view(rt, &config);
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

// ── GET /api/quiz/question ─────────────────────────────────────────

/// Handle GET /api/quiz/question
/// Current question (with the navigator out-of-band), the summary once the
/// quiz is complete, or the resume prompt while it is still unanswered.
pub fn handle_question_get(_query: &str) -> String {
    let config = config::current();
    state::with_runtime_mut(|rt| {
        if rt.pending_resume.is_some() {
            return render::render_resume_prompt(&rt.title);
        }
        render::render_view(rt, &config)
    })
    .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/answer ──────────────────────────────────────────

/// Handle POST /api/quiz/answer
/// Body params:
///   - choice={label}                   → single-choice answer
///   - text={answer}                    → fill-in answer
///   - multi=submit[&labels[]={label}]  → multi-select answer; without
///                                         labels the toggled selection is used
pub fn handle_answer_post(body: &str) -> String {
    let params = parse_form_body(body);
    let config = config::current();

    state::with_runtime_mut(|rt| {
        let result = if let Some(choice) = get_param(&params, "choice") {
            rt.session.submit_choice(choice)
        } else if let Some(text) = get_param(&params, "text") {
            rt.session.submit_fill_answer(text)
        } else if get_param(&params, "multi").is_some() {
            let explicit: Vec<String> = get_all(&params, "labels")
                .into_iter()
                .map(str::to_string)
                .collect();
            let labels = if explicit.is_empty() {
                rt.selection.clone()
            } else {
                explicit
            };
            rt.session.submit_multi_choice(&labels)
        } else {
            return render::render_notice("Missing answer parameter");
        };

        let html = match result {
            Ok(_) => {
                rt.clear_selection();
                render::render_view(rt, &config)
            }
            Err(err) => {
                warn!(%err, "answer rejected");
                let mut html = render::render_notice(&err.to_string());
                html.push_str(&render::render_view(rt, &config));
                html
            }
        };
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/toggle ──────────────────────────────────────────

/// Handle POST /api/quiz/toggle
/// Body params: label={label}. Flips one option in the pending multi-select
/// selection. Ignored once the question is answered or in review mode.
pub fn handle_toggle_post(body: &str) -> String {
    let params = parse_form_body(body);
    let label = match get_param(&params, "label") {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => return render::render_notice("Missing label parameter"),
    };
    let config = config::current();

    state::with_runtime_mut(|rt| {
        let valid = current_kind(rt) == Some(QuestionKind::MultiSelect)
            && rt
                .session
                .current_question()
                .map(|q| q.has_option(&label))
                .unwrap_or(false);
        if valid && !current_locked(rt) {
            rt.toggle_selection(&label);
        }
        render::render_view(rt, &config)
    })
    .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/next ────────────────────────────────────────────

/// Handle POST /api/quiz/next
/// Moves on from an answered question (or any question in review mode).
/// From the last question this completes the quiz and returns the summary.
pub fn handle_next_post(_body: &str) -> String {
    let config = config::current();
    state::with_runtime_mut(|rt| {
        if !current_locked(rt) {
            return render::render_view(rt, &config);
        }
        rt.session.advance();
        rt.clear_selection();
        let html = render::render_view(rt, &config);
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/jump ────────────────────────────────────────────

/// Handle POST /api/quiz/jump
/// Body params: index={0-based question index}
pub fn handle_jump_post(body: &str) -> String {
    let params = parse_form_body(body);
    let index: usize = match get_param(&params, "index").and_then(|s| s.trim().parse().ok()) {
        Some(i) => i,
        None => return render::render_notice("Missing or invalid index parameter"),
    };
    let config = config::current();

    state::with_runtime_mut(|rt| {
        rt.session.jump_to(index);
        rt.clear_selection();
        let html = render::render_view(rt, &config);
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

// ── GET /api/quiz/nav ──────────────────────────────────────────────

/// Handle GET /api/quiz/nav
pub fn handle_nav_get(_query: &str) -> String {
    let config = config::current();
    state::with_runtime(|rt| render::render_nav(&rt.session, &config, false))
        .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/key ─────────────────────────────────────────────

/// Handle POST /api/quiz/key
/// Body params: key={KeyboardEvent.key}. The bridge does not forward keys
/// typed into the fill-in input.
pub fn handle_key_post(body: &str) -> String {
    let params = parse_form_body(body);
    let key = get_param(&params, "key").unwrap_or("");
    let config = config::current();

    state::with_runtime_mut(|rt| {
        if rt.pending_resume.is_some() {
            return render::render_resume_prompt(&rt.title);
        }
        if rt.session.is_complete() {
            return render::render_view(rt, &config);
        }
        match KeyAction::from_key(key, &config.display_labels) {
            KeyAction::Option(pos) => apply_option_key(rt, pos),
            KeyAction::Confirm => apply_confirm_key(rt),
            KeyAction::Ignore => {}
        }
        let html = render::render_view(rt, &config);
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

fn apply_option_key(rt: &mut QuizRuntime, pos: usize) {
    if current_locked(rt) {
        return;
    }
    let index = rt.session.current_index();
    let label = match rt.session.option_order_for(index) {
        Ok(order) => match order.get(pos) {
            Some(label) => label.clone(),
            None => return,
        },
        Err(_) => return,
    };
    match current_kind(rt) {
        Some(QuestionKind::Choice) => {
            if let Err(err) = rt.session.submit_choice(&label) {
                warn!(%err, "key answer rejected");
            }
        }
        Some(QuestionKind::MultiSelect) => rt.toggle_selection(&label),
        _ => {}
    }
}

fn apply_confirm_key(rt: &mut QuizRuntime) {
    if current_locked(rt) {
        rt.session.advance();
        rt.clear_selection();
        return;
    }
    if current_kind(rt) == Some(QuestionKind::MultiSelect) {
        let labels = rt.selection.clone();
        match rt.session.submit_multi_choice(&labels) {
            Ok(_) => rt.clear_selection(),
            Err(err) => warn!(%err, "key answer rejected"),
        }
    }
}

// ── POST /api/quiz/restart ─────────────────────────────────────────

/// Handle POST /api/quiz/restart
/// Fresh shuffle, cleared answers, cleared saved progress.
pub fn handle_restart_post(_body: &str) -> String {
    let config = config::current();
    state::with_runtime_mut(|rt| {
        rt.pending_resume = None;
        rt.session.start(None);
        rt.clear_selection();
        let html = render::render_view(rt, &config);
        respond(rt, html)
    })
    .unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/review ──────────────────────────────────────────

/// Handle POST /api/quiz/review
/// Only available once the quiz is complete.
pub fn handle_review_post(_body: &str) -> String {
    let config = config::current();
    state::with_runtime_mut(|rt| {
        if !rt.session.is_complete() {
            let mut html = render::render_notice("Finish the quiz before reviewing it.");
            html.push_str(&render::render_view(rt, &config));
            return html;
        }
        rt.session.start_review();
        rt.clear_selection();
        render::render_view(rt, &config)
    })
    .unwrap_or_else(no_quiz)
}

// ── GET /api/quiz/summary ──────────────────────────────────────────

/// Handle GET /api/quiz/summary
pub fn handle_summary_get(_query: &str) -> String {
    state::with_runtime(|rt| render::render_summary(&rt.session.summary())).unwrap_or_else(no_quiz)
}

// ── POST /api/quiz/config ──────────────────────────────────────────

/// Handle POST /api/quiz/config
/// Body: a JSON `QuizConfig`; omitted fields take their defaults.
pub fn handle_config_post(body: &str) -> String {
    match QuizConfig::from_json(body) {
        Ok(config) => {
            config::replace_config(config);
            r#"<span class="notice">Quiz configuration updated.</span>"#.to_string()
        }
        Err(err) => {
            warn!(%err, "rejected quiz configuration");
            render::render_notice(&err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::store::SnapshotStore;

    /// Form-encode a value the way `encodeURIComponent` does.
    fn enc(s: &str) -> String {
        let mut out = String::new();
        for b in s.bytes() {
            match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    out.push(b as char)
                }
                _ => out.push_str(&format!("%{:02X}", b)),
            }
        }
        out
    }

    const DOC: &str = r#"[
        {"id":1,"prompt":"Which tool checks smb.conf?","options":{"A":"testparm","B":"smbstatus"},"answer":"A","explanation":"testparm validates the file."},
        {"id":2,"prompt":"Pick the DNS servers","options":{"A":"bind","B":"apache","C":"unbound"},"answer":["A","C"]},
        {"id":3,"prompt":"Default Samba port?","kind":"fill","answer":["445"]}
    ]"#;

    fn load(saved: &str) -> String {
        let body = format!(
            "subject=lpic202&status=200&reason=OK&data={}&saved={}",
            enc(DOC),
            enc(saved)
        );
        handle_load_post(&body)
    }

    fn current_id() -> String {
        state::with_runtime(|rt| rt.session.current_question().unwrap().id.to_string()).unwrap()
    }

    /// Answer whatever question is current correctly through the routes.
    fn answer_current_correctly() -> String {
        match current_id().as_str() {
            "1" => handle_answer_post("choice=A"),
            "2" => handle_answer_post("multi=submit&labels%5B%5D=A&labels%5B%5D=C"),
            _ => handle_answer_post("text=445"),
        }
    }

    #[test]
    fn boot_requires_subject() {
        state::clear_runtime();
        let html = handle_boot_get("");
        assert!(html.contains("error-box"));
        assert!(html.contains("No quiz subject was specified"));

        assert!(handle_boot_get("?subject=+").contains("error-box"));

        let html = handle_boot_get("?assunto=lpic202");
        assert!(html.contains("data/dados_lpic202.json"));
        assert!(html.contains("Quiz LPIC-2 Exam 202"));
    }

    #[test]
    fn load_failure_shows_error_panel() {
        state::clear_runtime();
        let html = handle_load_post("subject=lpic202&status=404&reason=Not+Found&data=");
        assert!(html.contains("error-box"));
        assert!(html.contains("data/dados_lpic202.json"));
        assert!(html.contains("404"));
        assert!(!state::is_loaded());
    }

    #[test]
    fn malformed_data_shows_error_panel() {
        state::clear_runtime();
        let html = handle_load_post("subject=lpic202&status=200&data=%7Bnot+json");
        assert!(html.contains("error-box"));
        assert!(!state::is_loaded());
    }

    #[test]
    fn fresh_load_renders_first_question() {
        state::clear_runtime();
        let html = load("");
        assert!(html.contains("Question 1/3"));
        assert!(html.contains("question-list"));
        assert!(state::is_loaded());
        state::clear_runtime();
    }

    #[test]
    fn answering_persists_snapshot() {
        state::clear_runtime();
        load("");
        let html = answer_current_correctly();
        assert!(html.contains("next-btn"));
        assert!(html.contains("localStorage.setItem(\"quizState_lpic202\""));
        assert_eq!(state::with_runtime(|rt| rt.session.score()), Some(1));
        state::clear_runtime();
    }

    #[test]
    fn next_requires_an_answer_in_normal_mode() {
        state::clear_runtime();
        load("");
        handle_next_post("");
        assert_eq!(state::with_runtime(|rt| rt.session.current_index()), Some(0));
        answer_current_correctly();
        handle_next_post("");
        assert_eq!(state::with_runtime(|rt| rt.session.current_index()), Some(1));
        state::clear_runtime();
    }

    #[test]
    fn full_run_ends_in_summary_and_clears_storage() {
        state::clear_runtime();
        load("");
        for _ in 0..3 {
            answer_current_correctly();
            let html = handle_next_post("");
            if state::with_runtime(|rt| rt.session.is_complete()) == Some(true) {
                assert!(html.contains("Excellent! Quiz complete!"));
                assert!(html.contains("You got 3 of 3 questions right (100%)."));
                assert!(html.contains("localStorage.removeItem(\"quizState_lpic202\")"));
            }
        }
        assert_eq!(state::with_runtime(|rt| rt.session.is_complete()), Some(true));

        let html = handle_review_post("");
        assert!(html.contains("data-mode=\"review\""));
        assert!(!html.contains("localStorage"));
        state::clear_runtime();
    }

    #[test]
    fn next_saves_option_order_shown_for_new_question() {
        state::clear_runtime();
        let doc = r#"[
            {"id":1,"prompt":"First","options":{"A":"a","B":"b","C":"c"},"answer":"A"},
            {"id":2,"prompt":"Second","options":{"A":"a","B":"b","C":"c"},"answer":"B"}
        ]"#;
        handle_load_post(&format!("subject=order&status=200&data={}", enc(doc)));
        let first = current_id();
        let right = if first == "1" { "A" } else { "B" };
        handle_answer_post(&format!("choice={}", right));
        handle_next_post("");

        let (shown, stored) = state::with_runtime(|rt| {
            let shown = rt.session.questions()[1].progress.option_order.clone();
            let raw = rt.session.store().get("quizState_order").unwrap();
            let snap = crate::quiz::snapshot::Snapshot::from_json(&raw).unwrap();
            (shown, snap.questions[1].option_order.clone())
        })
        .unwrap();
        assert!(shown.is_some());
        assert_eq!(stored, shown);
        state::clear_runtime();
    }

    #[test]
    fn finished_quiz_stays_finished_after_jump() {
        state::clear_runtime();
        load("");
        while state::with_runtime(|rt| rt.session.is_complete()) == Some(false) {
            answer_current_correctly();
            handle_next_post("");
        }

        let html = handle_jump_post("index=0");
        assert!(html.contains("score-box"));
        assert!(!html.contains("nav-item"));
        let html = handle_next_post("");
        assert!(!html.contains("localStorage.setItem"));
        assert_eq!(state::with_runtime(|rt| rt.session.is_complete()), Some(true));
        state::clear_runtime();
    }

    #[test]
    fn review_is_refused_before_completion() {
        state::clear_runtime();
        load("");
        let html = handle_review_post("");
        assert!(html.contains("Finish the quiz"));
        assert_eq!(state::with_runtime(|rt| rt.session.mode()), Some(Mode::Normal));
        state::clear_runtime();
    }

    #[test]
    fn saved_progress_prompts_then_resumes() {
        state::clear_runtime();
        let saved = r#"{"currentIndex":1,"score":1,"questions":[
            {"id":2,"answered":false,"correct":null,"userAnswer":null,"optionOrder":null},
            {"id":1,"answered":true,"correct":true,"userAnswer":"A","optionOrder":["B","A"]},
            {"id":3,"answered":false}
        ]}"#;
        let html = load(saved);
        assert!(html.contains("resume-prompt"));

        let html = handle_start_post("resume=true");
        assert!(html.contains("Question 2/3"));
        assert_eq!(state::with_runtime(|rt| rt.session.score()), Some(1));
        assert_eq!(current_id(), "1");
        state::clear_runtime();
    }

    #[test]
    fn start_over_clears_saved_progress() {
        state::clear_runtime();
        let saved = r#"{"currentIndex":0,"score":0,"questions":[{"id":1},{"id":2},{"id":3}]}"#;
        load(saved);
        let html = handle_start_post("resume=false");
        assert!(html.contains("localStorage.removeItem(\"quizState_lpic202\")"));
        assert_eq!(state::with_runtime(|rt| rt.pending_resume.is_none()), Some(true));
        state::clear_runtime();
    }

    #[test]
    fn corrupt_saved_progress_starts_fresh_silently() {
        state::clear_runtime();
        let html = load("{not json");
        assert!(!html.contains("resume-prompt"));
        assert!(!html.contains("error-box"));
        assert!(html.contains("localStorage.removeItem(\"quizState_lpic202\")"));
        state::clear_runtime();
    }

    #[test]
    fn keyboard_enter_submits_multi_selection() {
        state::clear_runtime();
        load("");
        // Walk to the multi-select question.
        let pos = state::with_runtime(|rt| {
            rt.session.questions().iter().position(|q| q.kind == QuestionKind::MultiSelect)
        })
        .flatten()
        .unwrap();
        handle_jump_post(&format!("index={}", pos));
        handle_toggle_post("label=A");
        handle_toggle_post("label=C");
        handle_key_post("key=Enter");
        let correct = state::with_runtime(|rt| rt.session.current_question().unwrap().progress.correct);
        assert_eq!(correct, Some(Some(true)));
        state::clear_runtime();
    }

    #[test]
    fn jump_rejects_bad_index() {
        state::clear_runtime();
        load("");
        assert!(handle_jump_post("index=abc").contains("invalid index"));
        state::clear_runtime();
    }

    #[test]
    fn handlers_without_quiz() {
        state::clear_runtime();
        assert!(handle_next_post("").contains("No quiz is loaded."));
        assert!(handle_summary_get("").contains("No quiz is loaded."));
    }

    #[test]
    fn config_route_replaces_config() {
        let html = handle_config_post(r#"{"titles":{"lpic202":"LPIC-2 202"}}"#);
        assert!(html.contains("updated"));
        assert!(handle_boot_get("?subject=lpic202").contains("Quiz LPIC-2 202"));
        assert!(handle_config_post("{bad").contains("notice"));
        config::replace_config(QuizConfig::default());
    }
}
