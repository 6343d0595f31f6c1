//! Text Sanitizer: strips banned artifacts from strings and JSON trees.

use serde_json::Value;

use crate::cleaning::patterns::{BANNED, WHITESPACE};

/// Removes every banned pattern, collapses whitespace, and trims.
///
/// Passes repeat until the output is stable, so `clean_text(clean_text(s)) == clean_text(s)`
/// even when removing one artifact joins the halves of another. A pass that changes the
/// text makes it strictly shorter, so the loop terminates.
pub fn clean_text(text: &str) -> String {
    let mut current = single_pass(text);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn single_pass(text: &str) -> String {
    let mut out = text.to_string();
    for re in BANNED.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    WHITESPACE.replace_all(&out, " ").trim().to_string()
}

/// Recursively cleans every string leaf of a JSON value.
///
/// Object keys, numbers, booleans and null pass through unchanged.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_text(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
