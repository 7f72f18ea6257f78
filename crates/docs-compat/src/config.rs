/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * docs-compat.yml configuration.
 */

//! Configuration.
//!
//! All keys are optional:
//!
//! ```yaml
//! markdown-suffix: .md
//! rules: [brace-attributes, iframe-self-closing, attribute-casing]
//! custom-elements: [param-field, response-field]
//! exclude: ["**/node_modules/**", "drafts/**"]
//! ```

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Deserialize;

use crate::elements::CustomElements;
use crate::error::{CompatError, Result};
use crate::rule::RuleRegistry;

/// File name looked up by [`CompatConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "docs-compat.yml";

pub const DEFAULT_MARKDOWN_SUFFIX: &str = ".md";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CompatConfig {
    /// Only documents whose identifier ends with this suffix are transformed.
    pub markdown_suffix: String,
    /// Rules to run. `all` (the default) selects every rule.
    pub rules: Vec<String>,
    /// Extra custom elements, added to the built-in allow-list.
    pub custom_elements: Vec<String>,
    /// Glob patterns of source paths to skip.
    pub exclude: Vec<String>,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            markdown_suffix: DEFAULT_MARKDOWN_SUFFIX.to_string(),
            rules: vec!["all".to_string()],
            custom_elements: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl CompatConfig {
    /// Parse and validate configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| CompatError::io(path, e))?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `docs-compat.yml` from `dir` or its nearest ancestor.
    ///
    /// Returns the defaults when no file is found.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find_file(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn find_file(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .map(|d| d.join(CONFIG_FILE_NAME))
            .find(|p| p.is_file())
    }

    fn validate(&self) -> Result<()> {
        let registry = RuleRegistry::new();
        for name in &self.rules {
            if name != "all" && !registry.contains(name) {
                return Err(CompatError::UnknownRule(name.clone()));
            }
        }
        self.exclude_patterns()?;
        Ok(())
    }

    fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| CompatError::InvalidGlob {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Whether `path` matches one of the `exclude` patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        // Patterns were checked in `validate`; a config built by hand with a
        // bad pattern simply never excludes anything through it.
        self.exclude
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .any(|p| p.matches_path(path))
    }

    /// The built-in allow-list extended with `custom-elements`.
    pub fn custom_elements(&self) -> Result<CustomElements> {
        let mut elements = CustomElements::builtin()?;
        elements.extend(&self.custom_elements);
        Ok(elements)
    }
}
