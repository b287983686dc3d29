//! HTML fragments for the quiz page.
//!
//! Every interactive element posts back through HTMX into `#quiz`. The
//! navigator list is refreshed out-of-band (`hx-swap-oob`) alongside each
//! question so answer status icons stay current. Question data is trusted
//! markup and goes in verbatim; anything the user typed is escaped.

use serde_json::{Map, Value};

use crate::config::QuizConfig;
use crate::quiz::question::{Question, QuestionKind};
use crate::quiz::session::{Mode, QuizSession};
use crate::quiz::state::QuizRuntime;
use crate::quiz::store::{SnapshotStore, StoreOp};
use crate::quiz::summary::Summary;
use crate::routes::util::{escape_html, js_string, strip_tags};

const TARGET: &str = r##"hx-target="#quiz" hx-swap="innerHTML""##;

/// `hx-vals` attribute value: an escaped JSON object of string pairs.
fn hx_vals(pairs: &[(&str, &str)]) -> String {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    escape_html(&Value::Object(map).to_string())
}

// ── Startup ────────────────────────────────────────────────────────

/// Loading indicator plus the call that makes the bridge fetch the data file
/// and post it to `/api/quiz/load`.
pub fn render_loader(subject: &str, data_path: &str, storage_key: &str, title: &str) -> String {
    format!(
        r#"<div id="quiz-loading" class="loading" aria-busy="true">Loading quiz...</div>
<script>document.title = {title};quizBridge.load({subject}, {path}, {key});</script>"#,
        title = js_string(title),
        subject = js_string(subject),
        path = js_string(data_path),
        key = js_string(storage_key),
    )
}

/// Inline script replaying queued storage writes against `localStorage`.
/// Empty when there is nothing to write.
pub fn render_store_ops(ops: &[StoreOp]) -> String {
    if ops.is_empty() {
        return String::new();
    }
    let mut js = String::from("<script>(function(){try{");
    for op in ops {
        match op {
            StoreOp::Set { key, value } => js.push_str(&format!(
                "localStorage.setItem({},{});",
                js_string(key),
                js_string(value)
            )),
            StoreOp::Remove { key } => {
                js.push_str(&format!("localStorage.removeItem({});", js_string(key)))
            }
        }
    }
    js.push_str("}catch(e){console.error('[quiz] storage write failed',e);}})();</script>");
    js
}

/// Fatal error panel. Replaces the whole quiz UI; nothing else stays interactive.
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div id="error-box" class="error-box" role="alert"><p id="error-message">{}</p></div>"#,
        escape_html(message)
    )
}

/// Small inline notice for a rejected request (bad parameter, wrong answer type).
pub fn render_notice(message: &str) -> String {
    format!(
        r#"<span class="notice text-error">{}</span>"#,
        escape_html(message)
    )
}

pub fn render_resume_prompt(title: &str) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div id="resume-prompt" class="resume-prompt">"#);
    html.push_str(&format!(r#"<h2>{}</h2>"#, escape_html(title)));
    html.push_str(r#"<p>We found a quiz in progress. Continue where you left off?</p>"#);
    html.push_str(&format!(
        r#"<button class="action-btn" hx-post="/api/quiz/start" hx-vals="{}" {} autofocus>Continue</button>"#,
        hx_vals(&[("resume", "true")]),
        TARGET
    ));
    html.push_str(&format!(
        r#"<button class="action-btn secondary" hx-post="/api/quiz/start" hx-vals="{}" {}>Start over</button>"#,
        hx_vals(&[("resume", "false")]),
        TARGET
    ));
    html.push_str("</div>");
    html
}

// ── Question card ──────────────────────────────────────────────────

/// Current question plus the navigator (out-of-band). Falls back to the
/// summary once the session is past its last question.
pub fn render_view(rt: &mut QuizRuntime, config: &QuizConfig) -> String {
    let mut html = render_question(rt, config);
    html.push_str(&render_nav(&rt.session, config, true));
    html
}

pub fn render_question(rt: &mut QuizRuntime, config: &QuizConfig) -> String {
    let index = rt.session.current_index();
    let order = match rt.session.option_order_for(index) {
        Ok(order) => order.to_vec(),
        Err(_) => return render_summary(&rt.session.summary()),
    };
    let review = rt.session.mode() == Mode::Review;
    let total = rt.session.len();
    let question = match rt.session.current_question() {
        Ok(q) => q,
        Err(_) => return render_summary(&rt.session.summary()),
    };
    let number = index + 1;
    let locked = review || question.progress.answered;

    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        r#"<div id="quiz-card" class="quiz-card" data-kind="{}" data-mode="{}">"#,
        question.kind.as_str(),
        if review { "review" } else { "normal" }
    ));
    html.push_str(&format!(
        r#"<p id="progress" class="progress">Question {}/{}</p>"#,
        number, total
    ));
    html.push_str(&format!(
        r#"<h2 id="question-title">{}. {}</h2>"#,
        number, question.prompt
    ));

    if let Some(image) = &question.image {
        html.push_str(&format!(
            r#"<img class="question-image" src="{}/{}" alt="Visual context for the question">"#,
            escape_html(config.image_dir.trim_end_matches('/')),
            escape_html(image)
        ));
    }

    html.push_str(r#"<div id="answers" class="answers">"#);
    match question.kind {
        QuestionKind::Choice => render_choice_options(&mut html, question, &order, locked, config),
        QuestionKind::MultiSelect => {
            render_multi_options(&mut html, question, &order, &rt.selection, locked, config)
        }
        QuestionKind::FillIn => render_fill_input(&mut html, question, locked),
    }
    html.push_str("</div>");

    if question.progress.answered {
        html.push_str(&render_explanation(question));
    }

    if locked {
        let label = if review { "Next review" } else { "Next (Enter)" };
        html.push_str(&format!(
            r#"<button id="next-btn" class="action-btn" hx-post="/api/quiz/next" {} autofocus>{}</button>"#,
            TARGET, label
        ));
    }

    html.push_str("</div>");
    html
}

fn option_button(label_html: &str, text: &str, classes: &str, attrs: &str, disabled: bool) -> String {
    format!(
        r#"<button class="answer-btn{}" {}{}><span class="option-key">{}:</span> <span class="option-text">{}</span></button>"#,
        classes,
        attrs,
        if disabled { " disabled" } else { "" },
        label_html,
        text
    )
}

fn render_choice_options(
    html: &mut String,
    question: &Question,
    order: &[String],
    locked: bool,
    config: &QuizConfig,
) {
    let picked = question.progress.user_answer.as_ref();
    for (pos, label) in order.iter().enumerate() {
        let text = question.option_text(label).unwrap_or("");
        let mut classes = String::new();
        if question.progress.answered {
            let is_correct = question.is_correct_label(label);
            let is_picked = picked.is_some_and(|a| a.includes(label));
            if is_correct {
                classes.push_str(" correct");
            } else if is_picked {
                classes.push_str(" incorrect");
            }
        }
        let attrs = if locked {
            format!(r#"data-key="{}""#, escape_html(label))
        } else {
            format!(
                r#"data-key="{}" hx-post="/api/quiz/answer" hx-vals="{}" {}"#,
                escape_html(label),
                hx_vals(&[("choice", label)]),
                TARGET
            )
        };
        html.push_str(&option_button(
            &escape_html(&config.display_label(pos)),
            text,
            &classes,
            &attrs,
            locked,
        ));
    }
}

fn render_multi_options(
    html: &mut String,
    question: &Question,
    order: &[String],
    selection: &[String],
    locked: bool,
    config: &QuizConfig,
) {
    let picked = question.progress.user_answer.as_ref();
    for (pos, label) in order.iter().enumerate() {
        let text = question.option_text(label).unwrap_or("");
        let mut classes = String::new();
        if question.progress.answered {
            let is_correct = question.is_correct_label(label);
            let is_picked = picked.is_some_and(|a| a.includes(label));
            if is_picked {
                classes.push_str(if is_correct { " correct selected" } else { " incorrect selected" });
            } else if is_correct {
                classes.push_str(" missed");
            }
        } else if selection.iter().any(|s| s == label) {
            classes.push_str(" selected");
        }
        let attrs = if locked {
            format!(r#"data-key="{}""#, escape_html(label))
        } else {
            format!(
                r#"data-key="{}" aria-pressed="{}" hx-post="/api/quiz/toggle" hx-vals="{}" {}"#,
                escape_html(label),
                selection.iter().any(|s| s == label),
                hx_vals(&[("label", label)]),
                TARGET
            )
        };
        html.push_str(&option_button(
            &escape_html(&config.display_label(pos)),
            text,
            &classes,
            &attrs,
            locked,
        ));
    }
    html.push_str(&format!(
        r#"<button id="multi-submit-btn" class="action-btn submit-btn" hx-post="/api/quiz/answer" hx-vals="{}" {}{}>Check answers</button>"#,
        hx_vals(&[("multi", "submit")]),
        TARGET,
        if locked { " disabled" } else { "" }
    ));
}

fn render_fill_input(html: &mut String, question: &Question, locked: bool) {
    if locked {
        let value = question
            .progress
            .user_answer
            .as_ref()
            .and_then(|a| a.as_text())
            .unwrap_or("");
        let verdict = match question.progress.correct {
            Some(true) => " correct",
            Some(false) => " incorrect",
            None => "",
        };
        html.push_str(&format!(
            r#"<input type="text" id="fill-answer-input" class="answer-input{}" value="{}" disabled>"#,
            verdict,
            escape_html(value)
        ));
        html.push_str(r#"<button id="fill-submit-btn" class="action-btn submit-btn" disabled>Check</button>"#);
    } else {
        html.push_str(&format!(
            r#"<form id="fill-form" hx-post="/api/quiz/answer" {}>"#,
            TARGET
        ));
        html.push_str(
            r#"<input type="text" id="fill-answer-input" name="text" class="answer-input" placeholder="Type your answer here..." autocomplete="off" autofocus>"#,
        );
        html.push_str(r#"<button type="submit" id="fill-submit-btn" class="action-btn submit-btn">Check</button>"#);
        html.push_str("</form>");
    }
}

/// Explanation box. A wrong fill-in answer also shows the accepted answers.
pub fn render_explanation(question: &Question) -> String {
    let mut body = String::new();
    if question.kind == QuestionKind::FillIn
        && question.progress.answered
        && !question.progress.is_correct()
    {
        body.push_str(&format!(
            r#"<p class="correct-answer">Correct answer: <strong>{}</strong></p>"#,
            question.answer.values().join("</strong> or <strong>")
        ));
    }
    if let Some(explanation) = &question.explanation {
        body.push_str(&format!("<strong>Explanation:</strong> {}", explanation));
    }
    if body.is_empty() {
        return String::new();
    }
    format!(r#"<div id="explanation-box" class="explanation">{}</div>"#, body)
}

// ── Navigator ──────────────────────────────────────────────────────

/// Question navigator list. `oob` marks it for an out-of-band swap when it
/// rides along with another fragment. Empty once the session is finished.
pub fn render_nav<S: SnapshotStore>(session: &QuizSession<S>, config: &QuizConfig, oob: bool) -> String {
    let mut html = String::with_capacity(256 + session.len() * 200);
    html.push_str(&format!(
        r#"<ul id="question-list"{}>"#,
        if oob { r#" hx-swap-oob="true""# } else { "" }
    ));
    if session.is_complete() {
        html.push_str("</ul>");
        return html;
    }
    for (i, question) in session.questions().iter().enumerate() {
        let (status, icon) = match (question.progress.answered, question.progress.correct) {
            (true, Some(true)) => (" answered-correct", " \u{2714}"), // ✔
            (true, _) => (" answered-incorrect", " \u{2718}"),        // ✘
            _ => ("", ""),
        };
        let current = if i == session.current_index() { " current" } else { "" };
        let index = i.to_string();
        html.push_str(&format!(
            r##"<li><a href="#" class="nav-item{}{}" data-index="{}" hx-post="/api/quiz/jump" hx-vals="{}" {}>Question {}: {}...{}</a></li>"##,
            status,
            current,
            i,
            hx_vals(&[("index", &index)]),
            TARGET,
            i + 1,
            escape_html(&prompt_preview(&question.prompt, config.nav_preview_chars)),
            icon
        ));
    }
    html.push_str("</ul>");
    html
}

/// First `max_chars` characters of the prompt with markup removed.
pub fn prompt_preview(prompt: &str, max_chars: usize) -> String {
    strip_tags(prompt).chars().take(max_chars).collect()
}

// ── Summary ────────────────────────────────────────────────────────

pub fn render_summary(summary: &Summary) -> String {
    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div id="score-box" class="score-box">"#);
    html.push_str(&format!(
        r#"<h2 id="score-title">{}</h2>"#,
        summary.tier().title()
    ));
    html.push_str(&format!(
        r#"<p id="score-text">{}</p>"#,
        summary.message()
    ));
    html.push_str(&format!(
        r#"<button id="restart-btn" class="action-btn" hx-post="/api/quiz/restart" {}>Play again</button>"#,
        TARGET
    ));
    html.push_str(&format!(
        r#"<button id="review-btn" class="action-btn secondary" hx-post="/api/quiz/review" {}>Review</button>"#,
        TARGET
    ));
    html.push_str("</div>");
    html
}
