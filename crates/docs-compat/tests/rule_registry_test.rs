use docs_compat::{RewriteRule, RuleRegistry};
use docs_compat::utils::file_io::{read_document, replace_document};
use docs_compat::{TransformOutcome, Transformer};
use std::fs;

#[test]
fn test_every_rule_has_a_description() {
    let registry = RuleRegistry::new();
    for (name, description) in registry.list() {
        assert!(!description.is_empty(), "{name} has no description");
        assert_eq!(registry.get(name).unwrap().name(), name);
    }
}

#[test]
fn test_single_rule_from_registry() {
    let registry = RuleRegistry::new();
    let rule = registry.get("brace-attributes").unwrap();

    let out = rule.apply("<CardGroup cols={2}>");
    assert_eq!(out.rewrites, 1);
    assert_eq!(out.text, "<CardGroup cols=\"2\">");
}

#[test]
fn test_rules_leave_unrelated_markup_alone() {
    let registry = RuleRegistry::new();
    let text = "<a href=\"/x\">link</a> and <img src=\"y\" />";
    for (name, _) in registry.list() {
        let out = registry.get(name).unwrap().apply(text);
        assert_eq!(out.rewrites, 0, "{name} changed unrelated markup");
    }
}

#[test]
fn test_convert_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("index.md");
    fs::write(
        &page,
        "<Columns cols={3}>\n\n```mdx\n<Columns cols={3}>\n```\n\n</Columns>\n",
    )
    .unwrap();

    let transformer = Transformer::default();
    let source = read_document(&page).unwrap();
    let TransformOutcome::Changed(t) = transformer.transform(&source, &page.to_string_lossy())
    else {
        panic!("expected a change");
    };
    replace_document(&page, &t.text).unwrap();

    assert_eq!(
        read_document(&page).unwrap(),
        "<Columns cols=\"3\">\n\n```mdx\n<Columns cols={3}>\n```\n\n</Columns>\n"
    );

    // A second run over the converted file finds nothing to do.
    let again = read_document(&page).unwrap();
    assert_eq!(
        transformer.transform(&again, &page.to_string_lossy()),
        TransformOutcome::Unchanged
    );
}
