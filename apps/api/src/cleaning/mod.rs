// Resume cleaning pipeline
// Implements: banned-pattern sanitizing, summary dedup, skill and bullet compaction.
// Pure, synchronous functions over serde_json values. No I/O.

pub mod bullets;
pub mod compactor;
pub mod patterns;
pub mod sanitize;
pub mod skills;
pub mod summary;

pub use compactor::{compact_resume, CompactionLimits};
