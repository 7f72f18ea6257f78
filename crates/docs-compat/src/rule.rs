/*
 * rule.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rewrite rule trait, ordered pipeline and registry.
 */

//! Rewrite rule infrastructure.
//!
//! - [`RewriteRule`] - a total, pure text-to-text substitution
//! - [`RulePipeline`] - an ordered list of rules, each run on the output of
//!   the previous one
//! - [`RuleRegistry`] - every known rule by name, in canonical order

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{CompatError, Result};
use crate::rules;

/// Output of a single rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutput<'a> {
    pub text: Cow<'a, str>,
    /// Number of substitutions made. Zero means `text` is borrowed input.
    pub rewrites: usize,
}

impl<'a> RuleOutput<'a> {
    pub fn unchanged(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            rewrites: 0,
        }
    }
}

/// A syntactic substitution applied to prose text.
///
/// Rules never fail: text they do not recognise is returned as-is.
pub trait RewriteRule: Send + Sync {
    /// The name of this rule (e.g., "brace-attributes")
    fn name(&self) -> &str;

    /// A short description of what this rule rewrites
    fn description(&self) -> &str;

    /// Apply the rule to one prose segment.
    fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a>;
}

/// Per-rule substitution counts, keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub by_rule: BTreeMap<String, usize>,
}

impl RewriteStats {
    pub fn record(&mut self, rule: &str, rewrites: usize) {
        if rewrites > 0 {
            *self.by_rule.entry(rule.to_string()).or_insert(0) += rewrites;
        }
    }

    pub fn merge(&mut self, other: &RewriteStats) {
        for (rule, count) in &other.by_rule {
            self.record(rule, *count);
        }
    }

    pub fn total(&self) -> usize {
        self.by_rule.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rule.is_empty()
    }
}

/// Result of running a pipeline over one prose segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten<'a> {
    pub text: Cow<'a, str>,
    pub stats: RewriteStats,
}

/// Rules executed in insertion order.
#[derive(Clone)]
pub struct RulePipeline {
    rules: Vec<Arc<dyn RewriteRule>>,
}

impl RulePipeline {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule; rules run in the order they are added.
    pub fn push(&mut self, rule: Arc<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule over `text`, feeding each the previous rule's output.
    pub fn rewrite<'a>(&self, text: &'a str) -> Rewritten<'a> {
        let mut current: Cow<'a, str> = Cow::Borrowed(text);
        let mut stats = RewriteStats::default();

        for rule in &self.rules {
            let output = rule.apply(&current);
            tracing::debug!(
                rule = rule.name(),
                rewrites = output.rewrites,
                "Running rule"
            );
            if output.rewrites == 0 {
                continue;
            }
            stats.record(rule.name(), output.rewrites);
            let next = output.text.into_owned();
            current = Cow::Owned(next);
        }

        Rewritten {
            text: current,
            stats,
        }
    }
}

impl Default for RulePipeline {
    fn default() -> Self {
        RuleRegistry::new().all()
    }
}

/// Registry of all available rules, in canonical execution order.
pub struct RuleRegistry {
    rules: Vec<Arc<dyn RewriteRule>>,
}

impl RuleRegistry {
    /// Create a new registry and register all known rules
    pub fn new() -> Self {
        let mut registry = Self { rules: Vec::new() };

        // Attribute values are normalized before tags are restructured.
        registry.register(Arc::new(rules::brace_attributes::BraceAttributes));
        registry.register(Arc::new(rules::iframe::IframeSelfClosing));
        registry.register(Arc::new(rules::attribute_casing::AttributeCasing));
        registry.register(Arc::new(rules::callouts::Callouts));

        registry
    }

    fn register(&mut self, rule: Arc<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    /// Get a rule by name, or return an error if not found
    pub fn get(&self, name: &str) -> Result<Arc<dyn RewriteRule>> {
        self.rules
            .iter()
            .find(|r| r.name() == name)
            .cloned()
            .ok_or_else(|| CompatError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name() == name)
    }

    /// Pipeline of every registered rule.
    pub fn all(&self) -> RulePipeline {
        RulePipeline {
            rules: self.rules.clone(),
        }
    }

    /// Pipeline of the named rules.
    ///
    /// The canonical order is kept whatever order `names` lists them in;
    /// `"all"` selects every rule.
    pub fn pipeline<S: AsRef<str>>(&self, names: &[S]) -> Result<RulePipeline> {
        if names.iter().any(|n| n.as_ref() == "all") {
            return Ok(self.all());
        }
        if let Some(unknown) = names.iter().find(|n| !self.contains(n.as_ref())) {
            return Err(CompatError::UnknownRule(unknown.as_ref().to_string()));
        }

        let mut pipeline = RulePipeline::new();
        for rule in &self.rules {
            if names.iter().any(|n| n.as_ref() == rule.name()) {
                pipeline.push(rule.clone());
            }
        }
        Ok(pipeline)
    }

    /// Rule names and descriptions in canonical order.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.rules
            .iter()
            .map(|r| (r.name(), r.description()))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl RewriteRule for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "uppercase x"
        }

        fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
            let rewrites = text.matches('x').count();
            if rewrites == 0 {
                return RuleOutput::unchanged(text);
            }
            RuleOutput {
                text: Cow::Owned(text.replace('x', "X")),
                rewrites,
            }
        }
    }

    struct Double;

    impl RewriteRule for Double {
        fn name(&self) -> &str {
            "double"
        }

        fn description(&self) -> &str {
            "double X"
        }

        fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
            let rewrites = text.matches('X').count();
            if rewrites == 0 {
                return RuleOutput::unchanged(text);
            }
            RuleOutput {
                text: Cow::Owned(text.replace('X', "XX")),
                rewrites,
            }
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = RulePipeline::new();
        assert!(pipeline.is_empty());
        let out = pipeline.rewrite("abc");
        assert!(matches!(out.text, Cow::Borrowed("abc")));
        assert!(out.stats.is_empty());
    }

    #[test]
    fn test_rules_see_previous_output() {
        let mut pipeline = RulePipeline::new();
        pipeline.push(Arc::new(Upper));
        pipeline.push(Arc::new(Double));

        let out = pipeline.rewrite("axbx");
        assert_eq!(out.text, "aXXbXX");
        assert_eq!(out.stats.by_rule["upper"], 2);
        assert_eq!(out.stats.by_rule["double"], 2);
        assert_eq!(out.stats.total(), 4);
    }

    #[test]
    fn test_insertion_order() {
        let mut pipeline = RulePipeline::new();
        pipeline.push(Arc::new(Double));
        pipeline.push(Arc::new(Upper));

        // Double runs first and finds nothing.
        let out = pipeline.rewrite("x");
        assert_eq!(out.text, "X");
        assert_eq!(pipeline.rule_names(), vec!["double", "upper"]);
    }

    #[test]
    fn test_unchanged_text_stays_borrowed() {
        let mut pipeline = RulePipeline::new();
        pipeline.push(Arc::new(Upper));
        let out = pipeline.rewrite("nothing here");
        assert!(matches!(out.text, Cow::Borrowed(_)));
    }

    #[test]
    fn test_registry_canonical_order() {
        let registry = RuleRegistry::new();
        let names: Vec<_> = registry.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "brace-attributes",
                "iframe-self-closing",
                "attribute-casing",
                "callouts"
            ]
        );
    }

    #[test]
    fn test_registry_pipeline_keeps_canonical_order() {
        let registry = RuleRegistry::new();
        let pipeline = registry
            .pipeline(&["attribute-casing", "brace-attributes"])
            .unwrap();
        assert_eq!(
            pipeline.rule_names(),
            vec!["brace-attributes", "attribute-casing"]
        );
    }

    #[test]
    fn test_registry_unknown_rule() {
        let registry = RuleRegistry::new();
        let err = registry.get("no-such-rule").err().unwrap();
        assert!(err.to_string().contains("no-such-rule"));
        assert!(registry.pipeline(&["no-such-rule"]).is_err());
    }

    #[test]
    fn test_stats_merge() {
        let mut a = RewriteStats::default();
        a.record("x", 1);
        a.record("y", 0);
        let mut b = RewriteStats::default();
        b.record("x", 2);
        a.merge(&b);
        assert_eq!(a.by_rule.len(), 1);
        assert_eq!(a.by_rule["x"], 3);
    }
}
