//! Display-field derivations for the HTML renderer.
//!
//! Each derivation returns `Option`: `None` means the heuristic declined and the caller keeps
//! the unmodified value via [`derive_or`]. None of these can fail a render.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::resume::{CompactedResume, Contact};

/// Markers suggesting a location field captured a whole header line.
const HEADER_MARKERS: &[&str] = &["@", "http", "|", "•"];

const NAME_SEPARATORS: &[char] = &['•', '|'];

const MIN_SUMMARY_CHARS: usize = 12;
const MIN_CONTENT_SCORE: usize = 60;
const BULLET_WEIGHT: usize = 12;
const TITLE_WEIGHT: usize = 6;

static CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z.'\-]+(?:\s+[A-Z][A-Za-z.'\-]+){0,2},\s*[A-Z]{2}\b")
        .expect("city/state regex is valid")
});

static LEADING_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s,;:\-–—•|]+").expect("separator regex is valid")
});

/// Applies `derive` to `original`, keeping `original` when the heuristic declines.
pub fn derive_or<T, F>(label: &str, original: &T, derive: F) -> T
where
    T: Clone + std::fmt::Debug,
    F: FnOnce(&T) -> Option<T>,
{
    match derive(original) {
        Some(value) => value,
        None => {
            debug!("{label} heuristic declined; keeping {original:?}");
            original.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

/// Builds a contact block with every key present. The nested `contact` object wins;
/// top-level fields fill the gaps.
pub fn normalize_contact(resume: &CompactedResume) -> Contact {
    let text = |key: &str| {
        contact_field(resume, key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let links = match contact_field(resume, "links") {
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).cloned().collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![Value::String(s.trim().to_string())],
        _ => Vec::new(),
    };

    Contact {
        email: text("email"),
        phone: text("phone"),
        location: text("location"),
        links,
    }
}

fn contact_field<'a>(resume: &'a CompactedResume, key: &str) -> Option<&'a Value> {
    resume
        .get("contact")
        .and_then(Value::as_object)
        .and_then(|c| c.get(key))
        .filter(|v| !v.is_null())
        .or_else(|| resume.get(key))
}

/// Repairs a location that swallowed a header line or starts with the person's name.
///
/// Header-like values yield a "City, ST" fragment or an empty string. Returns `None`
/// when the location needs no change.
pub fn sanitize_location(location: &str, name: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    let lowered = location.to_lowercase();
    if HEADER_MARKERS.iter().any(|m| lowered.contains(m)) {
        let fragment = CITY_STATE
            .find(location)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return Some(fragment);
    }

    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let rest = LEADING_SEPARATORS.replace(strip_name_prefix(location, name)?, "");
    Some(rest.trim().to_string())
}

/// Text after a case-insensitive `name` prefix. The prefix must end on a word boundary.
fn strip_name_prefix<'a>(location: &'a str, name: &str) -> Option<&'a str> {
    let head = location.get(..name.len())?;
    if !head.eq_ignore_ascii_case(name) {
        return None;
    }
    let rest = &location[name.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(rest),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Display name
// ────────────────────────────────────────────────────────────────────────────

/// First two whitespace tokens of the text before the first `•` or `|`.
pub fn display_name(name: &str) -> Option<String> {
    let head = name.split(NAME_SEPARATORS).next().unwrap_or_default();
    first_two_tokens(head)
}

/// Same rule applied to the first non-empty line of raw text, also cut at the first comma
/// (usually a location suffix).
pub fn display_name_from_raw(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let head = line.split(NAME_SEPARATORS).next().unwrap_or_default();
    let head = head.split(',').next().unwrap_or_default();
    first_two_tokens(head)
}

fn first_two_tokens(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text.split_whitespace().take(2).collect();
    (!tokens.is_empty()).then(|| tokens.join(" "))
}

/// Structured display name, replaced by the raw-text candidate when that one carries more
/// tokens (e.g. the structured name is empty or a single word).
pub fn resolve_display_name(name: &str, raw: Option<&str>) -> String {
    let structured = derive_or("display name", &name.trim().to_string(), |n| display_name(n));
    let Some(candidate) = raw.and_then(display_name_from_raw) else {
        return structured;
    };
    let token_count = |s: &str| s.split_whitespace().count();
    if token_count(&candidate) > token_count(&structured) {
        debug!("Display name taken from raw text: {candidate:?}");
        candidate
    } else {
        structured
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Content sufficiency
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of the content-sufficiency heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentAssessment {
    pub bullet_count: usize,
    pub title_count: usize,
    pub summary_chars: usize,
    /// `summary_chars + 12 × bullets + 6 × titles`
    pub score: usize,
    /// True when the structured resume is too sparse and raw text lines exist to show instead.
    pub use_fallback: bool,
}

/// Non-empty trimmed lines of the raw extracted text.
pub fn raw_lines(raw: Option<&str>) -> Vec<String> {
    raw.map(|r| {
        r.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub fn assess_content(resume: &CompactedResume, raw_lines: &[String]) -> ContentAssessment {
    let roles: &[Value] = resume
        .get("experience")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let bullet_count = roles
        .iter()
        .filter_map(|r| r.get("bullets").and_then(Value::as_array))
        .flatten()
        .filter(|b| b.as_str().is_some_and(|s| !s.trim().is_empty()))
        .count();

    let title_count = roles
        .iter()
        .filter(|r| {
            r.get("title")
                .and_then(Value::as_str)
                .is_some_and(|t| !t.trim().is_empty())
        })
        .count();

    let summary_chars = resume
        .get_str("summary")
        .map(|s| s.chars().count())
        .unwrap_or(0);

    let score = summary_chars + BULLET_WEIGHT * bullet_count + TITLE_WEIGHT * title_count;
    let sparse =
        bullet_count == 0 || summary_chars < MIN_SUMMARY_CHARS || score < MIN_CONTENT_SCORE;

    ContentAssessment {
        bullet_count,
        title_count,
        summary_chars,
        score,
        use_fallback: sparse && !raw_lines.is_empty(),
    }
}
