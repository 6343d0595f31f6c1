// Template rendering
// Implements: bundle registry, display heuristics, HTML rendering, PDF renderer client.
// HTML rendering is synchronous; handlers move it onto the blocking pool.

pub mod handlers;
pub mod heuristics;
pub mod html;
pub mod pdf;
pub mod registry;

pub use html::{render_html, RenderError, RenderedHtml};
pub use registry::{RegistryError, TemplateRegistry};
