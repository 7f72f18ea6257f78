/*
 * rules/callouts.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Callout components to styled block containers.
 */

//! Callout components (`<Note>`, `<Tip>`, `<Info>`, `<Warning>`, `<Check>`)
//! become plain containers the site theme styles:
//!
//! ```text
//! Before: <Warning title="Careful">Text</Warning>
//! After:  <div class="callout callout-warning" title="Careful">Text</div>
//! ```
//!
//! An existing static `class` is merged into the generated one. A tag whose
//! class cannot be merged (`:class="..."`) is left alone, along with its
//! closing tag. Inline code spans that mention a callout are not touched.
//!
//! Cards, columns, steps, tabs and accordions are not rewritten; they reach
//! the compiler as-is and are accepted through the custom-element allow-list.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::rule::{RewriteRule, RuleOutput};
use crate::rules::{replace_counted, rewrite_outside_code_spans};

/// Callout component names, in their written (PascalCase) form.
pub const CALLOUT_KINDS: &[&str] = &["Note", "Tip", "Info", "Warning", "Check"];

static CALLOUT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let kinds = CALLOUT_KINDS.join("|");
    Regex::new(&format!(
        r#"<(?P<closing>/)?(?P<kind>{kinds})(?P<attrs>(?:\s(?:[^<>"']|"[^"]*"|'[^']*')*?)?)(?P<selfclose>\s*/)?>"#
    ))
    .expect("Invalid regex pattern for callout tags")
});

static CLASS_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""[^"]*"|'[^']*'|(?P<lead>\s)(?P<bound>:|v-bind:)?class(?P<value>\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|\{))?"#,
    )
    .expect("Invalid regex pattern for class attributes")
});

/// The `class` attribute of a callout's opening tag.
#[derive(Debug, PartialEq, Eq)]
enum ClassAttribute<'a> {
    Absent,
    /// A static class list and the byte range of the whole attribute.
    Static { range: Range<usize>, value: &'a str },
    /// Bound, expression-valued, repeated, or otherwise not mergeable.
    Unmergeable,
}

fn class_attribute(attrs: &str) -> ClassAttribute<'_> {
    let mut found = ClassAttribute::Absent;
    for caps in CLASS_ATTRIBUTE.captures_iter(attrs) {
        let Some(whole) = caps.get(0) else { continue };
        if caps.name("lead").is_none() {
            continue;
        }
        if caps.name("value").is_none() {
            // `classy`, `class-name`: a different attribute.
            let next = attrs[whole.end()..].chars().next();
            if next.is_some_and(|c| !c.is_whitespace() && c != '/') {
                continue;
            }
        }
        if found != ClassAttribute::Absent || caps.name("bound").is_some() {
            return ClassAttribute::Unmergeable;
        }
        let value = match (caps.name("value"), caps.name("dq"), caps.name("sq")) {
            (None, _, _) => "",
            (Some(_), Some(dq), _) => dq.as_str(),
            (Some(_), None, Some(sq)) if !sq.as_str().contains('"') => sq.as_str(),
            _ => return ClassAttribute::Unmergeable,
        };
        found = ClassAttribute::Static {
            range: whole.range(),
            value,
        };
    }
    found
}

pub struct Callouts;

impl Callouts {
    /// Rewrite one callout tag. `open` tracks, per unclosed opening tag,
    /// whether it was rewritten, so a kept opening tag keeps its closing tag.
    fn rewrite_tag(caps: &regex::Captures, open: &mut Vec<(String, bool)>) -> Option<String> {
        let kind = &caps["kind"];
        let attrs = caps["attrs"].trim_end();

        if caps.name("closing").is_some() {
            // A closing tag carries no attributes.
            if !attrs.is_empty() || caps.name("selfclose").is_some() {
                return None;
            }
            if let Some(pos) = open.iter().rposition(|(k, _)| k == kind) {
                let (_, rewritten) = open.remove(pos);
                if !rewritten {
                    return None;
                }
            }
            return Some("</div>".to_string());
        }

        let self_closing = caps.name("selfclose").is_some();
        let mut class = format!("callout callout-{}", kind.to_ascii_lowercase());
        let mut rest = attrs.to_string();
        match class_attribute(attrs) {
            ClassAttribute::Absent => {}
            ClassAttribute::Static { range, value } => {
                let value = value.trim();
                if !value.is_empty() {
                    class.push(' ');
                    class.push_str(value);
                }
                rest.replace_range(range, "");
            }
            ClassAttribute::Unmergeable => {
                if !self_closing {
                    open.push((kind.to_string(), false));
                }
                return None;
            }
        }

        let open_tag = format!("<div class=\"{class}\"{rest}>");
        if self_closing {
            Some(format!("{open_tag}</div>"))
        } else {
            open.push((kind.to_string(), true));
            Some(open_tag)
        }
    }
}

impl RewriteRule for Callouts {
    fn name(&self) -> &str {
        "callouts"
    }

    fn description(&self) -> &str {
        "Rewrite <Note>, <Tip>, <Info>, <Warning> and <Check> callouts to styled <div> containers"
    }

    fn apply<'a>(&self, text: &'a str) -> RuleOutput<'a> {
        let mut open = Vec::new();
        rewrite_outside_code_spans(text, |chunk| {
            replace_counted(&CALLOUT_TAG, chunk, |caps| Self::rewrite_tag(caps, &mut open))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(text: &str) -> String {
        Callouts.apply(text).text.into_owned()
    }

    #[test]
    fn test_simple_callout() {
        assert_eq!(
            apply("<Note>Remember this.</Note>"),
            "<div class=\"callout callout-note\">Remember this.</div>"
        );
    }

    #[test]
    fn test_block_callout_with_attributes() {
        assert_eq!(
            apply("<Warning title=\"Careful\">\n\nText\n\n</Warning>"),
            "<div class=\"callout callout-warning\" title=\"Careful\">\n\nText\n\n</div>"
        );
    }

    #[test]
    fn test_each_kind() {
        for kind in CALLOUT_KINDS {
            let out = apply(&format!("<{kind}>x</{kind}>"));
            assert_eq!(
                out,
                format!(
                    "<div class=\"callout callout-{}\">x</div>",
                    kind.to_lowercase()
                )
            );
        }
    }

    #[test]
    fn test_self_closing_callout() {
        assert_eq!(
            apply("<Tip />"),
            "<div class=\"callout callout-tip\"></div>"
        );
    }

    #[test]
    fn test_counts_open_and_close() {
        assert_eq!(Callouts.apply("<Info>a</Info>").rewrites, 2);
    }

    #[test]
    fn test_similar_names_untouched() {
        assert_eq!(Callouts.apply("<Notes>x</Notes>").rewrites, 0);
        assert_eq!(Callouts.apply("<Checkbox />").rewrites, 0);
        assert_eq!(Callouts.apply("<note>x</note>").rewrites, 0);
    }

    #[test]
    fn test_other_components_untouched() {
        assert_eq!(Callouts.apply("<Card title=\"x\">y</Card>").rewrites, 0);
    }

    #[test]
    fn test_idempotent() {
        let once = apply("<Note>a</Note>");
        assert_eq!(Callouts.apply(&once).rewrites, 0);
    }

    #[test]
    fn test_inline_code_mention_untouched() {
        let text = "Wrap tips in the `<Note>` component, or ``<Tip />``.";
        assert_eq!(Callouts.apply(text).rewrites, 0);
    }

    #[test]
    fn test_inline_code_beside_real_callout() {
        assert_eq!(
            apply("<Note>Use `<Note>` here.</Note>"),
            "<div class=\"callout callout-note\">Use `<Note>` here.</div>"
        );
    }

    #[test]
    fn test_existing_class_merged() {
        assert_eq!(
            apply("<Note class=\"wide\" title=\"t\">x</Note>"),
            "<div class=\"callout callout-note wide\" title=\"t\">x</div>"
        );
        assert_eq!(
            apply("<Tip id=\"a\" class='compact' />"),
            "<div class=\"callout callout-tip compact\" id=\"a\"></div>"
        );
    }

    #[test]
    fn test_bound_class_left_with_its_closing_tag() {
        let text = "<Warning :class=\"cls\">x</Warning>";
        assert_eq!(Callouts.apply(text).rewrites, 0);

        assert_eq!(
            apply("<Note>a <Note :class=\"c\">b</Note> c</Note>"),
            "<div class=\"callout callout-note\">a <Note :class=\"c\">b</Note> c</div>"
        );
    }

    #[test]
    fn test_repeated_class_left_alone() {
        let text = "<Info class=\"a\" class=\"b\">x</Info>";
        assert_eq!(Callouts.apply(text).rewrites, 0);
    }

    #[test]
    fn test_class_like_names_not_merged() {
        assert_eq!(
            apply("<Note classname=\"x\" title=\"class='y'\">z</Note>"),
            "<div class=\"callout callout-note\" classname=\"x\" title=\"class='y'\">z</div>"
        );
    }
}
