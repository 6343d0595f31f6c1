//! Skill Compactor: flattens any skills shape into a bounded, deduplicated list.
//!
//! Two passes: the first keeps short tokens (≤ 5 words) up to the upper bound; if that
//! leaves fewer than the lower bound, the second scavenges any remaining unseen tokens,
//! long ones included, until the lower bound is met.

use std::collections::HashSet;

use serde_json::Value;

use crate::cleaning::sanitize::clean_text;

pub const DEFAULT_SKILLS_LOW: usize = 8;
pub const DEFAULT_SKILLS_HIGH: usize = 16;

/// Tokens with more words than this are treated as misparsed phrases in the first pass.
const MAX_SKILL_WORDS: usize = 5;

const DELIMITERS: &[char] = &[',', '|', ';', '/', '•'];

/// The shapes a skills field arrives in, resolved once at the entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillsInput {
    Empty,
    /// A single delimited string, e.g. `"Rust, Go | SQL"`.
    Delimited(String),
    /// List items that were strings or objects with a string `name`.
    List(Vec<String>),
}

impl From<&Value> for SkillsInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => SkillsInput::Delimited(s.clone()),
            Value::Array(items) if !items.is_empty() => SkillsInput::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(obj) => obj
                            .get("name")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => SkillsInput::Empty,
        }
    }
}

impl SkillsInput {
    /// Splits every source string on the delimiter set and cleans each token.
    pub fn tokens(&self) -> Vec<String> {
        let sources: &[String] = match self {
            SkillsInput::Empty => &[],
            SkillsInput::Delimited(s) => std::slice::from_ref(s),
            SkillsInput::List(items) => items,
        };
        sources
            .iter()
            .flat_map(|s| s.split(DELIMITERS))
            .map(clean_text)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Compacts a skills value into at most `high` entries, aiming for at least `low`.
pub fn compact_skills(value: &Value, low: usize, high: usize) -> Vec<String> {
    let candidates = SkillsInput::from(value).tokens();

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();

    for token in &candidates {
        if out.len() >= high {
            break;
        }
        if token.split_whitespace().count() > MAX_SKILL_WORDS {
            continue;
        }
        if seen.insert(token.to_lowercase()) {
            out.push(token.clone());
        }
    }

    if out.len() < low {
        for token in &candidates {
            if out.len() >= low.min(high) {
                break;
            }
            if seen.insert(token.to_lowercase()) {
                out.push(token.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compact(value: Value) -> Vec<String> {
        compact_skills(&value, DEFAULT_SKILLS_LOW, DEFAULT_SKILLS_HIGH)
    }

    #[test]
    fn test_delimited_string_dedupes_case_insensitively() {
        assert_eq!(
            compact(json!("Python, SQL, AWS, Python")),
            vec!["Python", "SQL", "AWS"]
        );
        assert_eq!(compact(json!("rust | Rust ; RUST")), vec!["rust"]);
    }

    #[test]
    fn test_list_of_strings_and_named_objects() {
        let out = compact(json!([
            "Go / Kubernetes",
            {"name": "Terraform", "level": "expert"},
            {"level": "no name"},
            42,
            "go"
        ]));
        assert_eq!(out, vec!["Go", "Kubernetes", "Terraform"]);
    }

    #[test]
    fn test_unsupported_shapes_yield_empty() {
        assert!(compact(json!(null)).is_empty());
        assert!(compact(json!(false)).is_empty());
        assert!(compact(json!(17)).is_empty());
        assert!(compact(json!({"name": "Rust"})).is_empty());
        assert!(compact(json!("")).is_empty());
        assert!(compact(json!([])).is_empty());
    }

    #[test]
    fn test_input_shape_resolution() {
        assert_eq!(SkillsInput::from(&json!("a,b")), SkillsInput::Delimited("a,b".into()));
        assert_eq!(
            SkillsInput::from(&json!(["a", {"name": "b"}])),
            SkillsInput::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(SkillsInput::from(&json!(1.5)), SkillsInput::Empty);
    }

    #[test]
    fn test_capped_at_upper_bound() {
        let many: Vec<String> = (0..40).map(|i| format!("skill{i}")).collect();
        let out = compact(json!(many.join(", ")));
        assert_eq!(out.len(), DEFAULT_SKILLS_HIGH);
        assert_eq!(out[0], "skill0");
        assert_eq!(out[15], "skill15");
    }

    #[test]
    fn test_long_phrases_skipped_when_enough_short_tokens() {
        let mut tokens: Vec<String> = (0..10).map(|i| format!("tool{i}")).collect();
        tokens.insert(2, "worked closely with many cross functional teams".to_string());
        let out = compact(json!(tokens));
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|s| s.starts_with("tool")));
    }

    #[test]
    fn test_scavenging_pass_fills_to_lower_bound() {
        let out = compact(json!([
            "Rust",
            "designed and operated large scale event pipelines",
            "SQL",
            "mentored a team of seven backend engineers daily"
        ]));
        assert_eq!(
            out,
            vec![
                "Rust",
                "SQL",
                "designed and operated large scale event pipelines",
                "mentored a team of seven backend engineers daily",
            ]
        );
    }

    #[test]
    fn test_lower_bound_met_when_enough_distinct_tokens() {
        let mut tokens: Vec<String> = (0..4).map(|i| format!("lang{i}")).collect();
        tokens.extend((0..6).map(|i| format!("a very long phrase that is number {i}")));
        let out = compact(json!(tokens));
        assert_eq!(out.len(), DEFAULT_SKILLS_LOW);
        assert_eq!(&out[..4], &["lang0", "lang1", "lang2", "lang3"]);
    }

    #[test]
    fn test_tokens_are_cleaned() {
        let out = compact(json!("KEY QUALIFICATIONS: Rust • RELEVANT • Docker"));
        assert_eq!(out, vec!["Rust", "Docker"]);
    }
}
