//! Bullet Truncator: cleans and caps a section's bullet list.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::cleaning::sanitize::clean_text;

pub const DEFAULT_EXPERIENCE_BULLETS: usize = 5;
pub const DEFAULT_PROJECT_BULLETS: usize = 3;

static LEADING_GLYPHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s•\-–—*·▪●◦]+").expect("leading glyph regex is valid")
});

/// Returns the first `limit` non-empty cleaned bullets, in their original order.
///
/// Stops reading input as soon as `limit` bullets have been collected.
pub fn truncate_bullets<'a, I>(bullets: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::with_capacity(limit);
    if limit == 0 {
        return out;
    }
    for bullet in bullets {
        let stripped = LEADING_GLYPHS.replace(bullet, "");
        let cleaned = clean_text(&stripped);
        if cleaned.is_empty() {
            continue;
        }
        out.push(cleaned);
        if out.len() == limit {
            break;
        }
    }
    out
}

/// Truncates the `bullets` array of a JSON entry in place. Non-array values are left alone
/// and non-string items are skipped.
pub fn truncate_entry_bullets(entry: &mut Value, limit: usize) {
    let Some(Value::Array(items)) = entry.get_mut("bullets") else {
        return;
    };
    let kept = truncate_bullets(items.iter().filter_map(Value::as_str), limit);
    *items = kept.into_iter().map(Value::String).collect();
}
