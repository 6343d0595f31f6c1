//! Banned-pattern set: known LLM and template leakage artifacts.
//!
//! Every pattern is compiled case-insensitive. Order matters only for readability:
//! `clean_text` re-applies the whole set until the text stops changing.
//! No pattern may match the empty string.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

const BANNED_PATTERNS: &[&str] = &[
    // Section headers the model copies out of its own prompt
    r"\bkey\s+qualifications\s*:",
    r"\boptimi[sz]ed\s+summary\s*:",
    r"\bprofessional\s+summary\s*:",
    r"\bcore\s+competencies\s*:",
    // Meta-commentary about the document itself
    r"\bthis\s+resume\s+(?:has\s+been|was|is)\s+(?:optimi[sz]ed|tailored|customi[sz]ed)[^.!?]*[.!?]?",
    r"\bas\s+an\s+ai(?:\s+language)?\s+model\b[^.!?]*[.!?]?",
    r"\bfor\s+this\s+position\b\s*:?",
    r"\bkeywords?\s+applied\s*:",
    r"\bats\s+(?:score|match)\s*:\s*\d+(?:\.\d+)?\s*%?",
    // Unfilled template placeholders
    r"\[(?:insert|add|your)\b[^\]]*\]",
    // Stray "relevant" marker: as a label, or as the whole value
    r"\brelevant\s*:",
    r"^\s*relevant\s*$",
];

/// Compiled banned patterns, built once on first use.
pub static BANNED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BANNED_PATTERNS
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("banned pattern is valid")
        })
        .collect()
});

/// Any run of whitespace, collapsed to a single space after removal.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
