//! HTML rendering for the form page and recommendation cards.
//!
//! Model output is untrusted. Every piece of text is escaped; the only markup derived
//! from it is `<hr>` for lines that are a plain horizontal-rule marker.

use std::fmt::Write;

use crate::models::profile::{Maturity, OrganizationProfile, Sensitivity};
use crate::recommendation::segmenter::RecommendationBlock;

pub const PAGE_TITLE: &str = "ISO 27001:2022 Control Recommender";
pub const MISSING_KEY_NOTICE: &str = "GEMINI_API_KEY not found in environment variables.";

const STYLE: &str = "body{font-family:sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.8rem;font-weight:600}\
input,select,textarea{width:100%;box-sizing:border-box;padding:.4rem}\
button{margin-top:1rem;padding:.5rem 1.2rem}\
.notice{padding:.6rem;border-radius:4px;margin:1rem 0}\
.error{background:#fde8e8;color:#8a1c1c}.info{background:#e8f0fd;color:#1c3d8a}\
.card{border:1px solid #ccd;border-radius:6px;padding:.8rem 1rem;margin:1rem 0}\
.card h3{margin:0 0 .5rem}.card pre{white-space:pre-wrap;margin:0;font-family:inherit}";

/// What the page shows below the form.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// Nothing submitted yet, or the submit path is disabled.
    Idle,
    Failed(&'a str),
    Recommended {
        model: &'a str,
        blocks: &'a [RecommendationBlock],
    },
}

/// Everything needed to render one page. Built fresh per request.
#[derive(Debug)]
pub struct PageView<'a> {
    pub profile: &'a OrganizationProfile,
    pub completion_configured: bool,
    pub outcome: Outcome<'a>,
}

/// Renders the full page: header, form (echoing the submitted values), notices, cards.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>🔐 {title}</h1>\n\
         <p>Provide your organization context to receive tailored ISO control recommendations.</p>\n",
        title = PAGE_TITLE,
    );

    if !view.completion_configured {
        let _ = writeln!(html, "<div class=\"notice error\">{}</div>", escape_html(MISSING_KEY_NOTICE));
    }

    html.push_str(&render_form(view.profile, view.completion_configured));

    match &view.outcome {
        Outcome::Idle => {}
        Outcome::Failed(message) => {
            let _ = writeln!(html, "<div class=\"notice error\">{}</div>", escape_html(message));
        }
        Outcome::Recommended { model, blocks } => {
            let _ = writeln!(
                html,
                "<div class=\"notice info\">Generated recommendations with {}.</div>",
                escape_html(model)
            );
            html.push_str("<h2>📋 Recommended Controls</h2>\n");
            if blocks.is_empty() {
                html.push_str("<p>The model returned no recommendations.</p>\n");
            }
            html.push_str(&render_cards(blocks));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Renders one card per block: escaped title heading, body as preformatted text.
pub fn render_cards(blocks: &[RecommendationBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        let _ = write!(
            html,
            "<section class=\"card\">\n<h3>{}</h3>\n{}</section>\n",
            escape_html(&block.title),
            render_body(&block.body)
        );
    }
    html
}

/// Splits the body on rule-marker lines: text runs become `<pre>`, markers become `<hr>`.
fn render_body(body: &str) -> String {
    let mut html = String::new();
    let mut run: Vec<&str> = Vec::new();

    for line in body.lines() {
        if is_rule_line(line) {
            flush_run(&mut html, &mut run);
            html.push_str("<hr>\n");
        } else {
            run.push(line);
        }
    }
    flush_run(&mut html, &mut run);
    html
}

fn flush_run(html: &mut String, run: &mut Vec<&str>) {
    if run.iter().any(|line| !line.trim().is_empty()) {
        let _ = writeln!(html, "<pre>{}</pre>", escape_html(&run.join("\n")));
    }
    run.clear();
}

/// `---`, `***` or `___` (three or more of the same character) on a line of its own.
fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    let mut chars = line.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => line.len() >= 3 && chars.all(|c| c == first),
        _ => false,
    }
}

fn render_form(profile: &OrganizationProfile, enabled: bool) -> String {
    let mut html = String::from("<form method=\"post\" action=\"/\">\n");

    let _ = writeln!(
        html,
        "<label for=\"industry\">Industry</label>\n\
         <input id=\"industry\" name=\"industry\" type=\"text\" \
         placeholder=\"e.g., Fintech, Healthcare\" value=\"{}\">",
        escape_html(&profile.industry)
    );
    html.push_str(&render_select(
        "sensitivity",
        "Data Sensitivity",
        Sensitivity::ALL.iter().map(|s| s.as_str()),
        profile.sensitivity.as_str(),
    ));
    let _ = writeln!(
        html,
        "<label for=\"risks\">Key Risks (comma-separated)</label>\n\
         <textarea id=\"risks\" name=\"risks\" rows=\"3\" \
         placeholder=\"e.g., insider threat, phishing, cloud misconfig\">{}</textarea>",
        escape_html(&profile.risks)
    );
    let _ = writeln!(
        html,
        "<label for=\"gaps\">Known Gaps or Audit Findings</label>\n\
         <textarea id=\"gaps\" name=\"gaps\" rows=\"3\" \
         placeholder=\"e.g., no vendor risk management, no endpoint protection\">{}</textarea>",
        escape_html(&profile.gaps)
    );
    html.push_str(&render_select(
        "maturity",
        "Maturity Level",
        Maturity::ALL.iter().map(|m| m.as_str()),
        profile.maturity.as_str(),
    ));

    let disabled = if enabled { "" } else { " disabled" };
    let _ = writeln!(
        html,
        "<button type=\"submit\" name=\"submit\" value=\"1\"{disabled}>Get Recommendations</button>"
    );
    html.push_str("</form>\n");
    html
}

fn render_select<'a>(
    name: &str,
    label: &str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
) -> String {
    let mut html = format!("<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n");
    for option in options {
        let marker = if option == selected { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>\n");
    html
}

/// Escapes HTML special characters, including quotes for attribute values.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
