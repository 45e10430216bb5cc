//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/domtree/domtree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `DOMTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Tag vocabulary used by the editors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkupSettings {
    /// Elements searched by `bold_row`
    pub table_tag: String,
    /// Wrapper inserted into bolded cells
    pub bold_tag: String,
    /// Label given to list items when a list is removed
    pub paragraph_tag: String,
    /// Tags `remove` splices out unchanged
    pub inline_tags: Vec<String>,
    /// Tags `remove` turns into paragraphs
    pub list_tags: Vec<String>,
    /// Tags `tag_word` may wrap words in
    pub word_tags: Vec<String>,
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            table_tag: "table".into(),
            bold_tag: "b".into(),
            paragraph_tag: "p".into(),
            inline_tags: vec!["b".into(), "em".into(), "p".into()],
            list_tags: vec!["ol".into(), "ul".into()],
            word_tags: vec!["b".into(), "em".into()],
        }
    }
}

/// Raw markup config for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMarkupSettings {
    pub table_tag: Option<String>,
    pub bold_tag: Option<String>,
    pub paragraph_tag: Option<String>,
    pub inline_tags: Option<Vec<String>>,
    pub list_tags: Option<Vec<String>>,
    pub word_tags: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub markup: RawMarkupSettings,
}

impl MarkupSettings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["b", "em"], &["strong"]) // → ["b", "em", "strong"]
    /// merge_array(&["b", "em"], &["!b"])     // → ["em"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for tag in overlay {
            if let Some(negated) = tag.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(tag.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Arrays: union merge with negation support (if overlay specified)
    pub fn merge(&self, overlay: &RawMarkupSettings) -> Self {
        let merge = |base: &Vec<String>, over: &Option<Vec<String>>| {
            over.as_ref()
                .map(|o| Self::merge_array(base, o))
                .unwrap_or_else(|| base.clone())
        };
        Self {
            table_tag: overlay.table_tag.clone().unwrap_or_else(|| self.table_tag.clone()),
            bold_tag: overlay.bold_tag.clone().unwrap_or_else(|| self.bold_tag.clone()),
            paragraph_tag: overlay
                .paragraph_tag
                .clone()
                .unwrap_or_else(|| self.paragraph_tag.clone()),
            inline_tags: merge(&self.inline_tags, &overlay.inline_tags),
            list_tags: merge(&self.list_tags, &overlay.list_tags),
            word_tags: merge(&self.word_tags, &overlay.word_tags),
        }
    }

    /// Apply global config onto defaults.
    ///
    /// Unlike `merge()` which uses union semantics for arrays, this method
    /// uses REPLACE semantics: if global config specifies an array, it completely
    /// replaces the default array.
    pub fn apply_global(&self, global: &RawMarkupSettings) -> Self {
        Self {
            table_tag: global.table_tag.clone().unwrap_or_else(|| self.table_tag.clone()),
            bold_tag: global.bold_tag.clone().unwrap_or_else(|| self.bold_tag.clone()),
            paragraph_tag: global
                .paragraph_tag
                .clone()
                .unwrap_or_else(|| self.paragraph_tag.clone()),
            inline_tags: global
                .inline_tags
                .clone()
                .unwrap_or_else(|| self.inline_tags.clone()),
            list_tags: global
                .list_tags
                .clone()
                .unwrap_or_else(|| self.list_tags.clone()),
            word_tags: global
                .word_tags
                .clone()
                .unwrap_or_else(|| self.word_tags.clone()),
        }
    }
}

/// Unified configuration for domtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tag vocabulary for the editors
    pub markup: MarkupSettings,
}

/// Get the XDG config directory for domtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "domtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("domtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file given on the command line; it
    ///   must exist when given
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(local_path) = local_config {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            debug!("local config: {}", local_path.display());
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            markup: self.markup.merge(&overlay.markup),
        }
    }

    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            markup: self.markup.apply_global(&global.markup),
        }
    }

    /// Apply DOMTREE_* environment variables as explicit overrides.
    ///
    /// Env vars replace values (not merge) - they are explicit user overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("DOMTREE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("markup.inline_tags")
                .with_list_parse_key("markup.list_tags")
                .with_list_parse_key("markup.word_tags"),
        );

        let config = builder.build().map_err(config_err)?;
        let markup = &mut settings.markup;

        if let Ok(val) = config.get_string("markup.table_tag") {
            markup.table_tag = val;
        }
        if let Ok(val) = config.get_string("markup.bold_tag") {
            markup.bold_tag = val;
        }
        if let Ok(val) = config.get_string("markup.paragraph_tag") {
            markup.paragraph_tag = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("markup.inline_tags") {
            markup.inline_tags = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("markup.list_tags") {
            markup.list_tags = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("markup.word_tags") {
            markup.word_tags = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# domtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/domtree/domtree.toml  (defines your baseline)
#   Local:  file passed with --config        (per-invocation additions)
#   Env:    DOMTREE_MARKUP__* variables      (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!tag" in local config to REMOVE an inherited tag:
#     inline_tags = ["strong", "!p"]  # adds strong, removes p

[markup]
# Elements searched by bold-row
# table_tag = "table"

# Wrapper inserted into every cell of the bolded row
# bold_tag = "b"

# Label list items receive when their list is removed
# paragraph_tag = "p"

# Tags removed by splicing their children into place
# inline_tags = ["b", "em", "p"]

# Tags removed by turning their items into paragraphs
# list_tags = ["ol", "ul"]

# Tags tag-word may wrap around words
# word_tags = ["b", "em"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
