/*
 * rules/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The built-in rewrite rules.
 */

//! Built-in rewrite rules, listed in the order they run.
//!
//! 1. [`brace_attributes`] - `cols={2}` to `cols="2"`, `items={list}` to `:items="list"`
//! 2. [`iframe`] - `<iframe ... />` to `<iframe ...></iframe>`
//! 3. [`attribute_casing`] - `allowFullScreen` to `allowfullscreen`
//! 4. [`callouts`] - `<Note>...</Note>` to `<div class="callout callout-note">...</div>`

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::rule::RuleOutput;

pub mod attribute_casing;
pub mod brace_attributes;
pub mod callouts;
pub mod iframe;

/// An opening (or self-closing) tag.
///
/// Attribute values may be quoted strings or brace expressions nested one
/// level deep, both of which may contain `>`.
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<[A-Za-z][\w.:-]*(?:\s(?:[^<>{}"']|"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\})*)?/?>"#,
    )
    .expect("Invalid regex pattern for opening tags")
});

/// Rewrite the inside of every opening tag in `text`.
///
/// `rewrite_tag` receives the full tag text and returns the replacement plus
/// the number of substitutions it made, or `None` to keep the tag.
pub(crate) fn rewrite_open_tags<'a, F>(text: &'a str, mut rewrite_tag: F) -> RuleOutput<'a>
where
    F: FnMut(&str) -> Option<(String, usize)>,
{
    let mut result = String::new();
    let mut last = 0;
    let mut rewrites = 0;

    for tag in OPEN_TAG.find_iter(text) {
        let Some((replacement, count)) = rewrite_tag(tag.as_str()) else {
            continue;
        };
        if count == 0 {
            continue;
        }
        result.push_str(&text[last..tag.start()]);
        result.push_str(&replacement);
        last = tag.end();
        rewrites += count;
    }

    if rewrites == 0 {
        return RuleOutput::unchanged(text);
    }
    result.push_str(&text[last..]);
    RuleOutput {
        text: Cow::Owned(result),
        rewrites,
    }
}

/// Run `re` over `text`, letting `replace` decide per match.
///
/// Matches for which `replace` returns `None` are kept verbatim and not
/// counted.
pub(crate) fn replace_counted<'a, F>(re: &Regex, text: &'a str, mut replace: F) -> RuleOutput<'a>
where
    F: FnMut(&regex::Captures) -> Option<String>,
{
    let mut rewrites = 0;
    let replaced = re.replace_all(text, |caps: &regex::Captures| match replace(caps) {
        Some(replacement) => {
            rewrites += 1;
            replacement
        }
        None => caps[0].to_string(),
    });

    if rewrites == 0 {
        return RuleOutput::unchanged(text);
    }
    RuleOutput {
        text: Cow::Owned(replaced.into_owned()),
        rewrites,
    }
}

/// Byte ranges of the inline code spans in `text`, backticks included.
///
/// A span opened by a run of N backticks is closed by the next run of exactly
/// N backticks. A run with no matching close is literal text.
pub(crate) fn code_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let run_at = |i: usize| bytes[i..].iter().take_while(|b| **b == b'`').count();

    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = run_at(i);
        let mut j = i + run;
        let mut close = None;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let n = run_at(j);
                if n == run {
                    close = Some(j + n);
                    break;
                }
                j += n;
            } else {
                j += 1;
            }
        }
        match close {
            Some(end) => {
                spans.push(i..end);
                i = end;
            }
            None => i += run,
        }
    }
    spans
}

/// Apply `rewrite` to each stretch of `text` between inline code spans.
/// The spans themselves are passed through untouched.
pub(crate) fn rewrite_outside_code_spans<'a, F>(text: &'a str, mut rewrite: F) -> RuleOutput<'a>
where
    F: FnMut(&str) -> RuleOutput<'_>,
{
    let spans = code_spans(text);
    if spans.is_empty() {
        return rewrite(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    let mut rewrites = 0;
    for span in spans.into_iter().chain(std::iter::once(text.len()..text.len())) {
        let out = rewrite(&text[last..span.start]);
        rewrites += out.rewrites;
        result.push_str(&out.text);
        result.push_str(&text[span.clone()]);
        last = span.end;
    }

    if rewrites == 0 {
        return RuleOutput::unchanged(text);
    }
    RuleOutput {
        text: Cow::Owned(result),
        rewrites,
    }
}
