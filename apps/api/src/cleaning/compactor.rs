//! Resume Compactor: the end-to-end transform from raw resume JSON to a `CompactedResume`.
//!
//! Flow: sanitize tree → merge summaries → drop leaked fields → compact skills →
//!       truncate experience bullets → cap projects → allow-list filter.
//!
//! The caller's value is only borrowed; all mutation happens on the sanitized copy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cleaning::bullets::{
    truncate_entry_bullets, DEFAULT_EXPERIENCE_BULLETS, DEFAULT_PROJECT_BULLETS,
};
use crate::cleaning::sanitize::sanitize;
use crate::cleaning::skills::{compact_skills, DEFAULT_SKILLS_HIGH, DEFAULT_SKILLS_LOW};
use crate::cleaning::summary::{dedupe_summary, DEFAULT_SUMMARY_MAX_CHARS};
use crate::models::resume::{CompactedResume, DROPPED_KEYS};

/// Summary candidates, in priority and concatenation order.
const SUMMARY_FIELDS: &[&str] = &["summary", "professional_summary", "optimized_summary"];

const DEFAULT_MAX_PROJECTS: usize = 2;

/// Bounds applied during compaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionLimits {
    pub summary_max_chars: usize,
    pub skills_low: usize,
    pub skills_high: usize,
    pub experience_bullets: usize,
    pub max_projects: usize,
    pub project_bullets: usize,
}

impl Default for CompactionLimits {
    fn default() -> Self {
        Self {
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            skills_low: DEFAULT_SKILLS_LOW,
            skills_high: DEFAULT_SKILLS_HIGH,
            experience_bullets: DEFAULT_EXPERIENCE_BULLETS,
            max_projects: DEFAULT_MAX_PROJECTS,
            project_bullets: DEFAULT_PROJECT_BULLETS,
        }
    }
}

/// Compacts a raw resume. Non-object input is treated as an empty resume.
pub fn compact_resume(raw: &Value, limits: &CompactionLimits) -> CompactedResume {
    let mut fields: Map<String, Value> = match sanitize(raw) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    // Summary from all candidate fields
    let candidates: Vec<&str> = SUMMARY_FIELDS
        .iter()
        .filter_map(|k| fields.get(*k).and_then(Value::as_str))
        .collect();
    let summary = dedupe_summary(&candidates, limits.summary_max_chars);
    fields.insert("summary".to_string(), Value::String(summary));

    for key in DROPPED_KEYS {
        fields.remove(*key);
    }

    if let Some(skills) = fields.get("skills") {
        let compacted = compact_skills(skills, limits.skills_low, limits.skills_high);
        fields.insert(
            "skills".to_string(),
            Value::Array(compacted.into_iter().map(Value::String).collect()),
        );
    }

    if let Some(Value::Array(roles)) = fields.get_mut("experience") {
        for role in roles.iter_mut().filter(|r| r.is_object()) {
            truncate_entry_bullets(role, limits.experience_bullets);
        }
    }

    if let Some(Value::Array(projects)) = fields.get_mut("projects") {
        projects.truncate(limits.max_projects);
        for project in projects.iter_mut().filter(|p| p.is_object()) {
            truncate_entry_bullets(project, limits.project_bullets);
        }
    }

    let compacted = CompactedResume::from_fields(fields);
    debug!(
        "Compacted resume keys: {:?}",
        compacted.keys().collect::<Vec<_>>()
    );
    compacted
}
