//! Engine options.

use serde::{Deserialize, Serialize};

use crate::ignorables::Ignorables;

/// Switches for one parse. Neither option changes what a parse produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Cache production results per offset.
    pub memoize: bool,
    /// Skip alternatives whose first characters cannot match.
    pub lookahead_pruning: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            lookahead_pruning: true,
        }
    }
}

/// Lexical conventions of the language a grammar describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalOptions {
    /// Punctuation tokens in addition to the grammar's own literals, used
    /// for merge hazard checks.
    pub punctuation: Vec<String>,
    /// Line comment introducer. Empty disables line comments.
    pub line_comment: Option<String>,
    /// Block comment delimiters. Empty strings disable block comments.
    pub block_comment: Option<(String, String)>,
}

impl Default for LexicalOptions {
    fn default() -> Self {
        Self {
            punctuation: Vec::new(),
            line_comment: Some("//".to_string()),
            block_comment: Some(("/*".to_string(), "*/".to_string())),
        }
    }
}

impl LexicalOptions {
    /// Returns the matching ignorable scanner.
    #[must_use]
    pub fn ignorables(&self) -> Ignorables {
        Ignorables::whitespace_only()
            .with_line_comment(self.line_comment.as_deref())
            .with_block_comment(
                self.block_comment
                    .as_ref()
                    .map(|(open, close)| (open.as_str(), close.as_str())),
            )
    }
}
