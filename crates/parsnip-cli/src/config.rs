//! `parsnip.toml` loading.

use parsnip_engine::{LexicalOptions, ParseOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub(crate) const CONFIG_FILE: &str = "parsnip.toml";

/// Settings loaded from `parsnip.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine switches.
    pub parse: ParseOptions,
    /// Comment syntax and extra punctuation of the parsed language.
    pub lexical: LexicalOptions,
}

impl Config {
    /// Loads `explicit`, or `parsnip.toml` next to `grammar` if it exists.
    ///
    /// A missing default file means defaults. An unreadable or invalid
    /// file is logged and also falls back to defaults.
    pub fn load(explicit: Option<&Path>, grammar: &Path) -> Self {
        let Some(path) = explicit.map(Path::to_path_buf).or_else(|| find_config_file(grammar)) else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            warn!("Failed to read parsnip config at {}", path.display());
            return Self::default();
        };
        Self::from_contents(Some(&path), &contents)
    }

    pub fn from_contents(path: Option<&Path>, contents: &str) -> Self {
        match toml::from_str(contents) {
            Ok(config) => config,
            Err(err) => {
                if let Some(path) = path {
                    warn!("Failed to parse parsnip config at {}: {err}", path.display());
                } else {
                    warn!("Failed to parse parsnip config: {err}");
                }
                Self::default()
            }
        }
    }
}

fn find_config_file(grammar: &Path) -> Option<PathBuf> {
    let dir = grammar.parent().unwrap_or_else(|| Path::new("."));
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}
