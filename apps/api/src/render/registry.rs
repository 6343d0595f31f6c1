//! Template Registry: resolves template ids to on-disk bundles.
//!
//! A bundle is a directory named by its id holding exactly three artifacts:
//! the markup template, the stylesheet, and the metadata document.
//!
//! The registry never caches. `list_ids` re-reads the root on every call so bundles
//! deployed while the service is running are picked up without a restart.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub const TEMPLATE_FILE: &str = "template.html.j2";
pub const STYLESHEET_FILE: &str = "style.css";
pub const META_FILE: &str = "meta.json";

/// Required artifacts, in the order `validate` checks them.
const REQUIRED_ARTIFACTS: &[&str] = &[TEMPLATE_FILE, STYLESHEET_FILE, META_FILE];

const TEMPLATES_DIR_NAME: &str = "templates";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Template '{id}' not found")]
    BundleNotFound { id: String },

    #[error("Template '{id}' is missing required file '{artifact}'")]
    MissingArtifact { id: String, artifact: &'static str },

    #[error("Template '{id}' has invalid metadata: {source}")]
    InvalidMeta {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading template '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Parsed `meta.json` for a bundle. Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_page_size() -> String {
    "A4".to_string()
}

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
}

impl TemplateRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the templates root.
    ///
    /// Order: explicit override, crate-relative `templates/`, working-directory-relative
    /// `templates/`. If none exists the crate-relative path is kept so that later lookups
    /// fail with a not-found error instead of silently rendering nothing.
    pub fn discover(override_dir: Option<&Path>) -> Self {
        let crate_relative = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATES_DIR_NAME);
        let cwd_relative = std::env::current_dir()
            .map(|d| d.join(TEMPLATES_DIR_NAME))
            .ok();

        let candidates = override_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain(std::iter::once(crate_relative.clone()))
            .chain(cwd_relative);

        for candidate in candidates {
            if candidate.is_dir() {
                debug!("Template root resolved to {}", candidate.display());
                return Self::new(candidate);
            }
        }

        warn!(
            "No templates directory found; falling back to {}",
            crate_relative.display()
        );
        Self::new(crate_relative)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted names of the immediate subdirectories of the root. Empty if the root is missing.
    pub fn list_ids(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        ids.sort();
        ids
    }

    /// Path of a bundle directory. Pure path composition; does not touch the filesystem.
    pub fn get_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Loads and parses the bundle's metadata document.
    pub fn get_meta(&self, id: &str) -> Result<TemplateMeta, RegistryError> {
        check_id(id)?;
        let dir = self.get_dir(id);
        if !dir.is_dir() {
            return Err(RegistryError::BundleNotFound { id: id.to_string() });
        }
        let path = dir.join(META_FILE);
        if !path.is_file() {
            return Err(RegistryError::MissingArtifact {
                id: id.to_string(),
                artifact: META_FILE,
            });
        }
        let raw = self.read_artifact(id, META_FILE)?;
        serde_json::from_str(&raw).map_err(|source| RegistryError::InvalidMeta {
            id: id.to_string(),
            source,
        })
    }

    /// Checks that the bundle directory and all three required artifacts exist.
    pub fn validate(&self, id: &str) -> Result<(), RegistryError> {
        check_id(id)?;
        let dir = self.get_dir(id);
        if !dir.is_dir() {
            return Err(RegistryError::BundleNotFound { id: id.to_string() });
        }
        for &artifact in REQUIRED_ARTIFACTS {
            if !dir.join(artifact).is_file() {
                return Err(RegistryError::MissingArtifact {
                    id: id.to_string(),
                    artifact,
                });
            }
        }
        Ok(())
    }

    /// Reads one artifact of a bundle as UTF-8 text.
    pub fn read_artifact(&self, id: &str, artifact: &str) -> Result<String, RegistryError> {
        std::fs::read_to_string(self.get_dir(id).join(artifact)).map_err(|source| {
            RegistryError::Io {
                id: id.to_string(),
                source,
            }
        })
    }
}

/// Ids are single path components. Anything that could escape the root is unknown.
fn check_id(id: &str) -> Result<(), RegistryError> {
    let escapes = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.contains('\0');
    if escapes {
        return Err(RegistryError::BundleNotFound { id: id.to_string() });
    }
    Ok(())
}
