/*
 * rules/brace_attributes.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * JSX-style brace attributes to template attributes.
 */

//! Brace attribute normalization.
//!
//! Component pages pass attribute values as JSX expressions. The template
//! compiler wants either a plain string attribute or a bound one:
//!
//! ```text
//! Before: <CardGroup cols={2} items={list}>
//! After:  <CardGroup cols="2" :items="list">
//! ```
//!
//! Digits-only values become literal strings; anything else becomes a bound
//! attribute with the expression kept exactly as written. Values with nested
//! braces, double quotes or nothing at all between the braces are left for
//! the compiler to report.

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{RewriteRule, RuleOutput};
use crate::rules::{replace_counted, rewrite_open_tags};

/// `name={value}` preceded by whitespace. Quoted strings are matched first so
/// that attribute-like text inside them is skipped.
static BRACE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""[^"]*"|'[^']*'|(?P<lead>\s)(?P<name>[A-Za-z_][\w-]*)=\{(?P<value>[^{}"]+)\}"#,
    )
    .expect("Invalid regex pattern for brace attributes")
});

pub struct BraceAttributes;

impl BraceAttributes {
    fn rewrite_attribute(caps: &regex::Captures) -> Option<String> {
        let lead = caps.name("lead")?.as_str();
        let name = &caps["name"];
        let value = &caps["value"];

        let trimmed = value.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Some(format!("{lead}{name}=\"{trimmed}\""))
        } else if trimmed.is_empty() {
            None
        } else {
            Some(format!("{lead}:{name}=\"{value}\""))
        }
    }
}

impl RewriteRule for BraceAttributes {
    fn name(&self) -> &str {
        "brace-attributes"
    }

    fn description(&self) -> &str {
        "Rewrite name={value} attributes to name=\"digits\" or :name=\"expression\""
    }

    fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
        rewrite_open_tags(text, |tag| {
            let out = replace_counted(&BRACE_ATTRIBUTE, tag, Self::rewrite_attribute);
            Some((out.text.into_owned(), out.rewrites))
        })
    }
}
