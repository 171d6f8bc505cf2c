//! Whitespace and comments skipped between tokens.

use smol_str::SmolStr;

/// Describes the text that may appear between any two tokens.
///
/// Whitespace is always ignorable. Line and block comments are recognized
/// when their delimiters are configured; block comments do not nest, and an
/// unterminated block comment is not ignorable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ignorables {
    line_comment: Option<SmolStr>,
    block_comment: Option<(SmolStr, SmolStr)>,
}

impl Ignorables {
    /// Only whitespace is ignorable.
    #[must_use]
    pub fn whitespace_only() -> Self {
        Self {
            line_comment: None,
            block_comment: None,
        }
    }

    /// Sets the line comment introducer.
    #[must_use]
    pub fn with_line_comment(mut self, start: Option<&str>) -> Self {
        self.line_comment = start.filter(|s| !s.is_empty()).map(SmolStr::new);
        self
    }

    /// Sets the block comment delimiters.
    #[must_use]
    pub fn with_block_comment(mut self, delimiters: Option<(&str, &str)>) -> Self {
        self.block_comment = delimiters
            .filter(|(open, close)| !open.is_empty() && !close.is_empty())
            .map(|(open, close)| (SmolStr::new(open), SmolStr::new(close)));
        self
    }

    /// Returns the offset of the first non-ignorable byte at or after `from`.
    #[must_use]
    pub fn scan_past(&self, content: &str, from: usize) -> usize {
        let mut pos = from;
        loop {
            let rest = &content[pos..];
            let trimmed = rest.trim_start();
            pos += rest.len() - trimmed.len();

            if let Some(start) = &self.line_comment {
                if trimmed.starts_with(start.as_str()) {
                    pos += trimmed.find('\n').map_or(trimmed.len(), |nl| nl + 1);
                    continue;
                }
            }
            if let Some((open, close)) = &self.block_comment {
                if trimmed.starts_with(open.as_str()) {
                    let body = &trimmed[open.len()..];
                    if let Some(end) = body.find(close.as_str()) {
                        pos += open.len() + end + close.len();
                        continue;
                    }
                }
            }
            return pos;
        }
    }
}

impl Default for Ignorables {
    /// Whitespace, `//` line comments and `/* */` block comments.
    fn default() -> Self {
        Self::whitespace_only()
            .with_line_comment(Some("//"))
            .with_block_comment(Some(("/*", "*/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_whitespace_and_comments() {
        let code = "\n  // line\n/* block */class";
        let ignorables = Ignorables::default();
        assert_eq!(ignorables.scan_past(code, 0), code.find("class").unwrap());
    }

    #[test]
    fn stops_at_token_text() {
        let ignorables = Ignorables::default();
        assert_eq!(ignorables.scan_past("a b", 0), 0);
        assert_eq!(ignorables.scan_past("a b", 1), 2);
        assert_eq!(ignorables.scan_past("extends/**/Bar", 7), 11);
    }

    #[test]
    fn unterminated_block_comment_is_not_ignorable() {
        let ignorables = Ignorables::default();
        assert_eq!(ignorables.scan_past("  /* open", 0), 2);
    }

    #[test]
    fn comments_are_plain_text_when_not_configured() {
        let ignorables = Ignorables::whitespace_only();
        assert_eq!(ignorables.scan_past(" // x", 0), 1);
    }
}
