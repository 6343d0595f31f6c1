//! HTML Renderer: binds a compacted resume to a template bundle.
//!
//! Flow: validate bundle → inline stylesheet → normalize contact → repair location →
//!       resolve display name → assess content → render markup.
//!
//! Synchronous and filesystem-bound. Async callers run it via `tokio::task::spawn_blocking`.

use minijinja::{context, Environment, Value};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::resume::CompactedResume;
use crate::render::heuristics::{
    assess_content, derive_or, normalize_contact, raw_lines, resolve_display_name,
    sanitize_location, ContentAssessment,
};
use crate::render::registry::{
    RegistryError, TemplateRegistry, STYLESHEET_FILE, TEMPLATE_FILE,
};

/// Registered name for the bundle's markup. The `.html` suffix turns on HTML auto-escaping.
const TEMPLATE_NAME: &str = "resume.html";

const PRESENT: &str = "Present";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Final markup plus the derived signals that shaped it.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedHtml {
    pub html: String,
    pub display_name: String,
    pub assessment: ContentAssessment,
}

/// Renders `resume` through the bundle `template_id`.
///
/// Only bundle resolution and template evaluation can fail. Every display heuristic
/// falls back to the unmodified value.
pub fn render_html(
    registry: &TemplateRegistry,
    template_id: &str,
    resume: &CompactedResume,
    raw_text: Option<&str>,
) -> Result<RenderedHtml, RenderError> {
    registry.validate(template_id)?;
    let css = registry.read_artifact(template_id, STYLESHEET_FILE)?;
    let source = registry.read_artifact(template_id, TEMPLATE_FILE)?;

    let name = resume.get_str("name").unwrap_or_default().trim().to_string();

    let mut contact = normalize_contact(resume);
    contact.location = derive_or("location", &contact.location, |loc| {
        sanitize_location(loc, &name)
    });

    let display_name = resolve_display_name(&name, raw_text);
    let raw_lines = raw_lines(raw_text);
    let assessment = assess_content(resume, &raw_lines);
    debug!(
        "Rendering '{}': score={} use_fallback={}",
        template_id, assessment.score, assessment.use_fallback
    );

    let env = build_environment(&source)?;
    let html = env.get_template(TEMPLATE_NAME)?.render(context! {
        resume => resume,
        name => &name,
        display_name => &display_name,
        contact => &contact,
        css => &css,
        raw_lines => &raw_lines,
        use_fallback => assessment.use_fallback,
        content_score => assessment.score,
    })?;

    Ok(RenderedHtml {
        html,
        display_name,
        assessment,
    })
}

fn build_environment(source: &str) -> Result<Environment<'_>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_filter("present", present);
    env.add_filter("join_list", join_list);
    env.add_filter("date_range", date_range);
    env.add_template(TEMPLATE_NAME, source)?;
    Ok(env)
}

// ────────────────────────────────────────────────────────────────────────────
// Template filters
// ────────────────────────────────────────────────────────────────────────────

fn value_text(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    value.to_string().trim().to_string()
}

/// End date, or "Present" when blank or missing.
fn present(value: Option<Value>) -> String {
    let text = value.as_ref().map(value_text).unwrap_or_default();
    if text.is_empty() {
        PRESENT.to_string()
    } else {
        text
    }
}

/// Comma-joins the string items of a list. A bare string passes through.
fn join_list(value: Value) -> String {
    if let Some(s) = value.as_str() {
        return s.trim().to_string();
    }
    let Ok(items) = value.try_iter() else {
        return String::new();
    };
    items
        .filter_map(|item| item.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"{start} – {end or Present}"`.
fn date_range(start: Option<Value>, end: Option<Value>) -> String {
    let start = start.as_ref().map(value_text).unwrap_or_default();
    format!("{start} – {}", present(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::{compact_resume, CompactionLimits};
    use crate::render::registry::tests::write_bundle;
    use serde_json::json;
    use tempfile::TempDir;

    const TEMPLATE: &str = "\
<html><head><style>{{ css | safe }}</style></head><body>
<h1>{{ display_name }}</h1>
<p class=\"contact\">{{ contact.email }}|{{ contact.phone }}|{{ contact.location }}</p>
{% if use_fallback %}
{% for line in raw_lines %}
<pre>{{ line }}</pre>
{% endfor %}
{% else %}
<p class=\"summary\">{{ resume.summary }}</p>
<p class=\"skills\">{{ resume.skills | join_list }}</p>
{% for role in resume.experience %}
<h2>{{ role.title }} ({{ role.start | date_range(role.end) }})</h2>
{% for b in role.bullets %}
<li>{{ b }}</li>
{% endfor %}
{% endfor %}
{% endif %}
</body></html>
";

    fn registry_with(template: &str, css: &str) -> (TempDir, TemplateRegistry) {
        let tmp = TempDir::new().unwrap();
        write_bundle(tmp.path(), "test", template, css);
        let registry = TemplateRegistry::new(tmp.path());
        (tmp, registry)
    }

    fn rich_resume() -> CompactedResume {
        compact_resume(
            &json!({
                "name": "Ada Lovelace | Analyst",
                "summary": "Analytical engine programmer with a taste for poetry.",
                "skills": "Math, Poetry, Engines",
                "contact": {
                    "email": "ada@example.com",
                    "location": "Ada Lovelace • ada@example.com • London, UK"
                },
                "experience": [{
                    "title": "Programmer",
                    "start": "1842",
                    "bullets": ["• Wrote the first algorithm", "Annotated Menabrea", "Predicted music"]
                }]
            }),
            &CompactionLimits::default(),
        )
    }

    #[test]
    fn test_present_filter() {
        assert_eq!(present(None), "Present");
        assert_eq!(present(Some(Value::from(""))), "Present");
        assert_eq!(present(Some(Value::from(()))), "Present");
        assert_eq!(present(Some(Value::from("2021"))), "2021");
        assert_eq!(present(Some(Value::from(2021))), "2021");
    }

    #[test]
    fn test_join_list_filter() {
        assert_eq!(
            join_list(Value::from_serialize(json!(["Rust", 3, " Go ", ""]))),
            "Rust, Go"
        );
        assert_eq!(join_list(Value::from("already joined")), "already joined");
        assert_eq!(join_list(Value::from(5)), "");
    }

    #[test]
    fn test_date_range_filter() {
        assert_eq!(
            date_range(Some(Value::from("2019")), Some(Value::from("2021"))),
            "2019 – 2021"
        );
        assert_eq!(date_range(Some(Value::from("2019")), None), "2019 – Present");
    }

    #[test]
    fn test_renders_structured_resume_with_inline_css() {
        let (_tmp, registry) = registry_with(TEMPLATE, "@page { margin: 12mm; }");
        let out = render_html(&registry, "test", &rich_resume(), None).unwrap();

        assert!(out.html.contains("<style>@page { margin: 12mm; }</style>"));
        assert!(out.html.contains("<h1>Ada Lovelace</h1>"));
        assert!(out.html.contains("ada@example.com||London, UK"));
        assert!(out.html.contains("Math, Poetry, Engines"));
        assert!(out.html.contains("<h2>Programmer (1842 – Present)</h2>"));
        assert!(out.html.contains("<li>Wrote the first algorithm</li>"));
        assert!(!out.html.contains("<pre>"));
        assert!(!out.assessment.use_fallback);
    }

    #[test]
    fn test_block_tags_leave_no_blank_lines() {
        let (_tmp, registry) = registry_with(TEMPLATE, "");
        let out = render_html(&registry, "test", &rich_resume(), None).unwrap();
        assert!(!out.html.contains("\n\n"), "got:\n{}", out.html);
    }

    #[test]
    fn test_sparse_resume_renders_raw_fallback() {
        let (_tmp, registry) = registry_with(TEMPLATE, "");
        let sparse = compact_resume(&json!({"name": "Grace"}), &CompactionLimits::default());
        let raw = "Grace Hopper, Arlington VA\nInvented the compiler\n\n";
        let out = render_html(&registry, "test", &sparse, Some(raw)).unwrap();

        assert!(out.assessment.use_fallback);
        assert_eq!(out.display_name, "Grace Hopper");
        assert!(out.html.contains("<pre>Invented the compiler</pre>"));
        assert!(!out.html.contains("class=\"summary\""));
    }

    #[test]
    fn test_sparse_resume_without_raw_text_renders_structured() {
        let (_tmp, registry) = registry_with(TEMPLATE, "");
        let sparse = compact_resume(&json!({"name": "Grace"}), &CompactionLimits::default());
        let out = render_html(&registry, "test", &sparse, None).unwrap();
        assert!(!out.assessment.use_fallback);
        assert!(out.html.contains("class=\"summary\""));
    }

    #[test]
    fn test_values_are_html_escaped() {
        let (_tmp, registry) = registry_with(TEMPLATE, "");
        let r = compact_resume(
            &json!({"name": "<script>x</script>", "summary": "Tom & Jerry fan club leader."}),
            &CompactionLimits::default(),
        );
        let out = render_html(&registry, "test", &r, None).unwrap();
        assert!(!out.html.contains("<script>"));
        assert!(out.html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn test_missing_bundle_fails_fast() {
        let (_tmp, registry) = registry_with(TEMPLATE, "");
        let err = render_html(&registry, "ghost", &rich_resume(), None).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Registry(RegistryError::BundleNotFound { .. })
        ));
    }

    #[test]
    fn test_template_syntax_error_surfaces() {
        let (_tmp, registry) = registry_with("{% if %}", "");
        let err = render_html(&registry, "test", &rich_resume(), None).unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn test_bundled_templates_render() {
        let registry = TemplateRegistry::discover(None);
        for id in registry.list_ids() {
            let out = render_html(&registry, &id, &rich_resume(), Some("Ada Lovelace\nLine"))
                .unwrap_or_else(|e| panic!("bundle {id} failed: {e}"));
            assert!(out.html.contains("Ada Lovelace"), "bundle {id}");
            assert!(out.html.contains("<style>"), "bundle {id}");
        }
    }
}
