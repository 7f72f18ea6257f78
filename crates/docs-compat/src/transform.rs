/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-document compatibility transform.
 */

//! The per-document entry point called by the build pipeline.
//!
//! ```text
//! document ── segment ──> [Prose, Verbatim, Prose, ...]
//!                            │       │
//!                      rule pipeline │ (untouched)
//!                            │       │
//!                            └── rejoin in order ──> Changed(text) | Unchanged
//! ```
//!
//! The transform is total and pure: any string in, a string (or
//! [`TransformOutcome::Unchanged`]) out. It is safe to run on its own output;
//! a second pass reports `Unchanged`.

use std::borrow::Cow;

use crate::config::{CompatConfig, DEFAULT_MARKDOWN_SUFFIX};
use crate::error::Result;
use crate::rule::{RewriteStats, RuleRegistry, RulePipeline};
use crate::segment::segment;

/// A document the transform changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub stats: RewriteStats,
}

/// Outcome of [`Transformer::transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Ineligible document, or no rule matched. The caller can skip
    /// recompilation.
    Unchanged,
    Changed(Transformed),
}

impl TransformOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, TransformOutcome::Changed(_))
    }

    /// The resulting text: the rewritten text, or `source` when unchanged.
    pub fn into_text(self, source: &str) -> String {
        match self {
            TransformOutcome::Changed(t) => t.text,
            TransformOutcome::Unchanged => source.to_string(),
        }
    }
}

/// The markdown compatibility transform, configured once and reused for every
/// document of a build.
#[derive(Clone)]
pub struct Transformer {
    markdown_suffix: String,
    pipeline: RulePipeline,
}

impl Transformer {
    pub fn new(config: &CompatConfig) -> Result<Self> {
        let pipeline = RuleRegistry::new().pipeline(&config.rules)?;
        Ok(Self::with_pipeline(&config.markdown_suffix, pipeline))
    }

    pub fn with_pipeline(markdown_suffix: &str, pipeline: RulePipeline) -> Self {
        Self {
            markdown_suffix: markdown_suffix.to_string(),
            pipeline,
        }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.pipeline.rule_names()
    }

    /// Whether the document identified by `id` is transformed at all.
    ///
    /// Identifiers carrying a query string (`page.md?raw`) are not eligible.
    pub fn is_eligible(&self, id: &str) -> bool {
        id.ends_with(&self.markdown_suffix)
    }

    /// Transform one document.
    pub fn transform(&self, source: &str, id: &str) -> TransformOutcome {
        if !self.is_eligible(id) {
            return TransformOutcome::Unchanged;
        }

        let (text, stats) = self.rewrite(source);
        match text {
            Cow::Borrowed(_) => TransformOutcome::Unchanged,
            Cow::Owned(text) => {
                tracing::debug!(id, rewrites = stats.total(), "Transformed document");
                TransformOutcome::Changed(Transformed { text, stats })
            }
        }
    }

    /// Rewrite the prose of `source`, regardless of eligibility.
    ///
    /// Returns borrowed text when nothing changed.
    pub fn rewrite<'a>(&self, source: &'a str) -> (Cow<'a, str>, RewriteStats) {
        let mut stats = RewriteStats::default();
        let mut output: Option<String> = None;

        for seg in segment(source) {
            let rewritten = if seg.is_prose() {
                let out = self.pipeline.rewrite(seg.text);
                stats.merge(&out.stats);
                out.text
            } else {
                Cow::Borrowed(seg.text)
            };

            if let Some(buf) = output.as_mut() {
                buf.push_str(&rewritten);
            } else if let Cow::Owned(text) = rewritten {
                // First change: copy everything before this segment.
                let mut buf = String::with_capacity(source.len() + 64);
                buf.push_str(&source[..seg.offset]);
                buf.push_str(&text);
                output = Some(buf);
            }
        }

        match output {
            Some(text) => (Cow::Owned(text), stats),
            None => (Cow::Borrowed(source), stats),
        }
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::with_pipeline(DEFAULT_MARKDOWN_SUFFIX, RulePipeline::default())
    }
}

/// Transform one document with the default rules and suffix.
pub fn transform(source: &str, id: &str) -> TransformOutcome {
    Transformer::default().transform(source, id)
}

/// Rewrite the prose of `source` with the default rules, ignoring eligibility.
pub fn rewrite_document(source: &str) -> Cow<'_, str> {
    Transformer::default().rewrite(source).0
}
