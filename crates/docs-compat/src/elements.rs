/*
 * elements.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Custom-element allow-list for the host template compiler.
 */

//! Custom-element allow-list.
//!
//! Components that are not rewritten textually (cards, columns, steps, tabs,
//! ...) reach the template compiler unchanged. The compiler must be told to
//! treat them as opaque custom elements, otherwise it warns or fails on
//! unknown tags. The list is data: it ships as `resources/custom-elements.yml`,
//! embedded at compile time, and can be extended from configuration.

use std::collections::BTreeSet;

use include_dir::{Dir, include_dir};
use serde::{Deserialize, Serialize};

use crate::error::{CompatError, Result};

static RESOURCES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources");

const ELEMENTS_RESOURCE: &str = "custom-elements.yml";

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ElementsFile {
    custom_elements: Vec<String>,
}

/// Set of tag names the host compiler treats as opaque.
///
/// Names are stored in kebab-case; lookups accept either kebab-case or
/// PascalCase spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CustomElements {
    names: BTreeSet<String>,
}

impl CustomElements {
    /// The built-in list shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let file = RESOURCES_DIR
            .get_file(ELEMENTS_RESOURCE)
            .ok_or_else(|| CompatError::Resource(ELEMENTS_RESOURCE.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| CompatError::Resource(ELEMENTS_RESOURCE.to_string()))?;
        let parsed: ElementsFile = serde_yaml::from_str(contents)?;
        Ok(Self::from_names(parsed.custom_elements))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut elements = Self::default();
        elements.extend(names);
        elements
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = kebab_case(name.as_ref().trim());
            if !name.is_empty() {
                self.names.insert(name);
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `tag` should be passed through by the compiler.
    pub fn is_custom_element(&self, tag: &str) -> bool {
        self.names.contains(&kebab_case(tag))
    }

    /// The allow-list as a JSON array, for host renderer configuration.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `CardGroup` to `card-group`. Already kebab-case names are unchanged.
pub fn kebab_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    let mut prev_lower = false;
    for ch in tag.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
