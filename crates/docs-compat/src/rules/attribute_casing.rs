/*
 * rules/attribute_casing.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * camelCase attribute names to their lowercase HTML spelling.
 */

//! Attribute-name casing normalization.
//!
//! The template compiler lowercases attribute names, so JSX spellings such as
//! `allowFullScreen` are dropped or warned about. Known names are lowercased
//! inside opening tags, in both plain and bound (`:name`) form:
//!
//! ```text
//! Before: <iframe frameBorder="0" allowFullScreen :marginHeight="h">
//! After:  <iframe frameborder="0" allowfullscreen :marginheight="h">
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{RewriteRule, RuleOutput};
use crate::rules::{replace_counted, rewrite_open_tags};

/// camelCase attribute names with a lowercase-only HTML equivalent.
pub const CAMEL_CASE_ATTRIBUTES: &[&str] = &[
    "allowFullScreen",
    "allowTransparency",
    "frameBorder",
    "marginHeight",
    "marginWidth",
    "referrerPolicy",
];

static CAMEL_CASE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    let names = CAMEL_CASE_ATTRIBUTES.join("|");
    Regex::new(&format!(
        r#""[^"]*"|'[^']*'|(?P<lead>\s:?)(?P<name>{names})\b"#
    ))
    .expect("Invalid regex pattern for camelCase attributes")
});

pub struct AttributeCasing;

impl RewriteRule for AttributeCasing {
    fn name(&self) -> &str {
        "attribute-casing"
    }

    fn description(&self) -> &str {
        "Lowercase camelCase attribute names such as allowFullScreen and frameBorder"
    }

    fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
        rewrite_open_tags(text, |tag| {
            let out = replace_counted(&CAMEL_CASE_ATTRIBUTE, tag, |caps| {
                let lead = caps.name("lead")?.as_str();
                // The name must end the attribute: `frameBorder-color` is
                // a different one.
                let end = caps.get(0)?.end();
                if !tag[end..]
                    .chars()
                    .next()
                    .is_none_or(|c| c.is_whitespace() || matches!(c, '=' | '/' | '>'))
                {
                    return None;
                }
                Some(format!("{lead}{}", caps["name"].to_ascii_lowercase()))
            });
            Some((out.text.into_owned(), out.rewrites))
        })
    }
}
