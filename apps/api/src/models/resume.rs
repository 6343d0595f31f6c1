use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys a compacted resume may carry. Anything else is dropped during compaction.
pub const ALLOWED_KEYS: &[&str] = &[
    "name",
    "location",
    "email",
    "phone",
    "links",
    "summary",
    "skills",
    "experience",
    "projects",
    "education",
    "extras",
    "contact",
];

/// Legacy and leaked fields that never survive compaction, whatever their content.
pub const DROPPED_KEYS: &[&str] = &[
    "optimized_summary",
    "professional_summary",
    "key_qualifications",
    "keyword_applied",
    "ats_score_panel",
    "light_mode",
    "target_company_blob",
];

/// A schema-clean resume: only allow-listed keys, no empty values.
///
/// Built fresh per request by `cleaning::compact_resume`; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompactedResume(Map<String, Value>);

impl CompactedResume {
    /// Filters `fields` down to the allow-list, dropping empty values and pruning `contact`.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        let mut out = Map::new();
        for (key, value) in fields {
            if !ALLOWED_KEYS.contains(&key.as_str()) || is_empty_value(&value) {
                continue;
            }
            if key == "contact" {
                if let Value::Object(contact) = value {
                    let pruned = prune_empty(contact);
                    if !pruned.is_empty() {
                        out.insert(key, Value::Object(pruned));
                    }
                    continue;
                }
            }
            out.insert(key, value);
        }
        Self(out)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Null, empty/blank strings, and empty arrays or objects.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Recursively removes empty values; nested objects that end up empty are removed too.
fn prune_empty(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(k, v)| {
            let v = match v {
                Value::Object(inner) => Value::Object(prune_empty(inner)),
                other => other,
            };
            (!is_empty_value(&v)).then_some((k, v))
        })
        .collect()
}

/// Contact block as the templates see it: every key always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<Value>,
}
