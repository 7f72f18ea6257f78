/*
 * rules/iframe.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Self-closing iframe expansion.
 */

//! The template compiler rejects `<iframe ... />`, so self-closing iframes
//! are expanded to an explicit open and close pair:
//!
//! ```text
//! Before: <iframe src="https://example.com/embed" />
//! After:  <iframe src="https://example.com/embed"></iframe>
//! ```
//!
//! Only `iframe` is rewritten. Other embeddable tags are left to the
//! compiler until it is confirmed they need the same treatment.

use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{RewriteRule, RuleOutput};
use crate::rules::replace_counted;

/// A self-closing iframe. Attributes may hold quoted values containing `>`;
/// whitespace before `/>` is not part of `attrs`.
static SELF_CLOSING_IFRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<iframe(?P<attrs>(?:\s(?:[^<>"']|"[^"]*"|'[^']*')*?)?)\s*/>"#)
        .expect("Invalid regex pattern for self-closing iframes")
});

pub struct IframeSelfClosing;

impl RewriteRule for IframeSelfClosing {
    fn name(&self) -> &str {
        "iframe-self-closing"
    }

    fn description(&self) -> &str {
        "Expand <iframe ... /> to <iframe ...></iframe>"
    }

    fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
        replace_counted(&SELF_CLOSING_IFRAME, text, |caps| {
            Some(format!("<iframe{}></iframe>", caps["attrs"].trim_end()))
        })
    }
}
