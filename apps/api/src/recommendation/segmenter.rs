//! Response segmentation — turns the model's free text into one block per control.
//!
//! Contract:
//! 1. Residual `<div>` tags are removed and `<hr>` tags become a `---` line.
//! 2. The text is split in front of every `"<int>. A."` occurrence; the delimiter
//!    stays with the block it opens.
//! 3. Blocks holding nothing but whitespace and emphasis markers are dropped.
//! 4. First line → title (cleaned), remainder → body (raw).
//!
//! Output that ignores the numbering convention is segmented as-is. No attempt is
//! made to repair it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Plain-text marker that replaces `<hr>` tags.
pub const RULE_MARKER: &str = "---";

/// Zero or more HTML attributes on one line: `name`, `name=value`, `name="value"`.
/// Keeps a tag match from running across prose up to some later `>`.
const TAG_ATTRS: &str =
    r#"(?:[ \t]+[a-z_:][-a-z0-9_:.]*(?:[ \t]*=[ \t]*(?:"[^"<>\n]*"|'[^'<>\n]*'|[^\s"'<>=`]+))?)*"#;

static DIV_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)</?div\b{TAG_ATTRS}[ \t]*/?>")).expect("valid div regex")
});

static HR_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)<hr\b{TAG_ATTRS}[ \t]*/?>")).expect("valid hr regex")
});

static CONTROL_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+\. A\.").expect("valid control-start regex"));

static LEADING_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^[0-9]+\. (A\..*)$").expect("valid ordinal regex"));

/// One recommended control as displayed on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBlock {
    pub title: String,
    pub body: String,
}

/// Segments a raw completion into ordered recommendation blocks.
pub fn segment(raw: &str) -> Vec<RecommendationBlock> {
    let normalized = normalize_markup(raw);
    split_controls(&normalized)
        .into_iter()
        .filter_map(to_block)
        .collect()
}

/// Strips `<div>` tags and turns `<hr>` tags into a [`RULE_MARKER`] line.
///
/// Runs to a fixed point, so removing one tag can never leave a new one behind
/// (e.g. `<di<div>v>`). Every pass removes at least one `<`, so this terminates.
pub fn normalize_markup(raw: &str) -> String {
    let rule_line = format!("\n{RULE_MARKER}\n");
    let mut text = raw.to_string();
    loop {
        let without_divs = DIV_TAG.replace_all(&text, "");
        let next = HR_TAG.replace_all(&without_divs, rule_line.as_str()).into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Splits in front of each control start, keeping the delimiter on the following chunk.
fn split_controls(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut from = 0;
    for m in CONTROL_START.find_iter(text) {
        chunks.push(&text[from..m.start()]);
        from = m.start();
    }
    chunks.push(&text[from..]);
    chunks
}

fn to_block(chunk: &str) -> Option<RecommendationBlock> {
    let chunk = chunk.trim_start();
    if is_marker_only(chunk) {
        return None;
    }

    let (first_line, rest) = chunk.split_once('\n').unwrap_or((chunk, ""));
    let body = drop_trailing_marker_lines(drop_leading_blank_lines(rest));

    Some(RecommendationBlock {
        title: clean_title(first_line),
        body: body.to_string(),
    })
}

fn is_emphasis(c: char) -> bool {
    matches!(c, '#' | '*' | '_' | '`')
}

/// True for text made only of whitespace and emphasis markers, e.g. the `**`
/// left in front of a bolded `**2. A.8 ...**` heading.
fn is_marker_only(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || is_emphasis(c))
}

fn drop_leading_blank_lines(mut text: &str) -> &str {
    while let Some((line, tail)) = text.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        text = tail;
    }
    text
}

fn drop_trailing_marker_lines(text: &str) -> &str {
    let mut text = text.trim_end();
    while let Some((head, last)) = text.rsplit_once('\n') {
        if !is_marker_only(last) {
            break;
        }
        text = head.trim_end();
    }
    if is_marker_only(text) {
        ""
    } else {
        text
    }
}

/// Removes markdown emphasis/heading characters (`#`, `*`, `_`, backtick) and
/// surrounding whitespace. A leading `"<int>. "` ordinal directly in front of the
/// `A.` control identifier is dropped too; everything else is kept.
///
/// Idempotent: `clean_title(&clean_title(s)) == clean_title(s)`.
pub fn clean_title(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !is_emphasis(*c))
        .collect();
    let stripped = stripped.trim();

    match LEADING_ORDINAL.captures(stripped) {
        Some(caps) => caps[1].to_string(),
        None => stripped.to_string(),
    }
}
