//! Summary Deduplicator: merges redundant summary fields into one bounded paragraph.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::cleaning::sanitize::clean_text;

/// Default character budget for the merged summary.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 280;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word regex is valid"));

/// An unterminated first-person framing clause at the end of the text.
static FIRST_PERSON_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\b(?:i'm|i\s+am|i|seeking|looking)\b[^.!?]*$")
        .expect("first-person tail regex is valid")
});

/// Merges candidate summaries into a single deduplicated paragraph of at most `max_chars` chars.
///
/// Sentences are deduplicated by content (case and punctuation ignored), accepted until the
/// running length reaches the budget, then the result is hard-truncated. A trailing
/// first-person clause ("I am…", "seeking…", "looking…") without closing punctuation is
/// dropped along with everything after it.
pub fn dedupe_summary<S: AsRef<str>>(parts: &[S], max_chars: usize) -> String {
    let joined = parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        return String::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<String> = Vec::new();
    let mut total = 0usize;

    for sentence in split_sentences(&joined) {
        if total >= max_chars {
            break;
        }
        let cleaned = clean_text(sentence);
        if cleaned.is_empty() {
            continue;
        }
        let key = NON_WORD.replace_all(&cleaned.to_lowercase(), "").into_owned();
        if !seen.insert(key) {
            continue;
        }
        total += cleaned.chars().count();
        kept.push(cleaned);
    }

    let merged = truncate_chars(&kept.join(" "), max_chars);
    let merged = merged.trim_end();
    FIRST_PERSON_TAIL
        .replace(merged, "")
        .trim_end()
        .to_string()
}

/// Splits after `.`, `!` or `?` when followed by whitespace. The terminator stays with its
/// sentence; the separating whitespace is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next_c)) = chars.peek() else {
            break;
        };
        if !next_c.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..boundary]);
        start = boundary;
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            start = j + w.len_utf8();
            chars.next();
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty() {
        let parts: [&str; 0] = [];
        assert_eq!(dedupe_summary(&parts, 280), "");
        assert_eq!(dedupe_summary(&["", "   "], 280), "");
    }

    #[test]
    fn test_split_sentences_keeps_terminators() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
    }

    #[test]
    fn test_split_ignores_decimal_points() {
        assert_eq!(
            split_sentences("Cut costs 2.5x. Shipped."),
            vec!["Cut costs 2.5x.", "Shipped."]
        );
    }

    #[test]
    fn test_duplicate_sentence_across_fields_appears_once() {
        let out = dedupe_summary(
            &[
                "Optimized Summary: I am an engineer.",
                "I am an engineer. FOR THIS POSITION you need Python.",
            ],
            280,
        );
        assert!(!out.contains("Optimized Summary"));
        assert!(!out.contains("FOR THIS POSITION"));
        assert_eq!(out.matches("engineer").count(), 1);
        assert!(out.chars().count() <= 280);
    }

    #[test]
    fn test_dedup_ignores_case_and_punctuation() {
        let out = dedupe_summary(&["Builds data platforms.", "builds data-platforms!"], 280);
        assert_eq!(out, "Builds data platforms.");
    }

    #[test]
    fn test_output_never_exceeds_budget() {
        let long = "Designed resilient distributed systems for payments. ".repeat(20);
        let varied: Vec<String> = (0..30)
            .map(|i| format!("Delivered platform milestone number {i} on schedule."))
            .collect();
        for max in [0usize, 1, 40, 120, 280] {
            assert!(dedupe_summary(&[long.as_str()], max).chars().count() <= max);
            assert!(dedupe_summary(&varied, max).chars().count() <= max);
        }
    }

    #[test]
    fn test_stops_accepting_after_budget_reached() {
        let out = dedupe_summary(&["Aaaa bbbb. Cccc dddd. Eeee ffff."], 10);
        assert_eq!(out, "Aaaa bbbb.");
    }

    #[test]
    fn test_trailing_first_person_clause_is_stripped() {
        let out = dedupe_summary(
            &["Data engineer with 6 years in streaming. Seeking a senior role at a fintech"],
            280,
        );
        assert_eq!(out, "Data engineer with 6 years in streaming.");
    }

    #[test]
    fn test_terminated_first_person_sentence_is_kept() {
        let out = dedupe_summary(&["I am an engineer."], 280);
        assert_eq!(out, "I am an engineer.");
    }

    #[test]
    fn test_truncation_tail_is_cleaned_up() {
        // Truncation cuts mid-clause; the unterminated "looking" remainder goes with it.
        let out = dedupe_summary(&["Platform lead. Always looking for hard problems to solve."], 30);
        assert_eq!(out, "Platform lead. Always");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
