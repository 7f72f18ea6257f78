//! docs-compat: a pre-compile markdown compatibility transform.
//!
//! Documentation pages written with component tags and JSX-style attributes
//! (`<CardGroup cols={2}>`, `<iframe ... />`, `allowFullScreen`) are rewritten
//! into the syntax a strict template compiler accepts. Fenced code blocks are
//! never touched.
//!
//! ```ignore
//! use docs_compat::{TransformOutcome, transform};
//!
//! match transform(source, "guide/index.md") {
//!     TransformOutcome::Changed(t) => compile(&t.text),
//!     TransformOutcome::Unchanged => compile(source),
//! }
//! ```

pub mod config;
pub mod elements;
pub mod error;
pub mod rule;
pub mod rules;
pub mod segment;
pub mod transform;
pub mod utils;

pub use config::CompatConfig;
pub use elements::CustomElements;
pub use error::{CompatError, Result};
pub use rule::{RewriteRule, RewriteStats, RuleOutput, RulePipeline, RuleRegistry};
pub use segment::{Segment, SegmentKind, Segments, segment};
pub use transform::{TransformOutcome, Transformed, Transformer, rewrite_document, transform};
