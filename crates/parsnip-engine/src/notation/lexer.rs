//! Tokens of the grammar notation.

use logos::Logos;
use text_size::{TextRange, TextSize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    #[token(":=")]
    Define,

    #[token(":")]
    Colon,

    #[token("|")]
    Pipe,

    #[token(";")]
    Semicolon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("!")]
    Bang,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    /// `"text"`, guarded against merge hazards.
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    GuardedLiteral,

    /// `'text'`, never treated as a merge hazard.
    #[regex(r"'([^'\\\r\n]|\\.)*'")]
    UnguardedLiteral,

    #[regex(r"/([^/\\\r\n]|\\.)+/")]
    Pattern,

    #[default]
    Error,
}

impl TokenKind {
    pub(crate) fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Comment => "a comment",
            Self::Define => "`:=`",
            Self::Colon => "`:`",
            Self::Pipe => "`|`",
            Self::Semicolon => "`;`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::Bang => "`!`",
            Self::Ident => "a name",
            Self::GuardedLiteral | Self::UnguardedLiteral => "a literal",
            Self::Pattern => "a pattern",
            Self::Error => "an unrecognized character",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) range: TextRange,
}

/// Lexes `source`, dropping trivia.
pub(crate) fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(kind) = lexer.next() {
        let kind = kind.unwrap_or(TokenKind::Error);
        if kind.is_trivia() {
            continue;
        }
        let span = lexer.span();
        tokens.push(Token {
            kind,
            range: TextRange::new(offset(span.start), offset(span.end)),
        });
    }
    tokens
}

fn offset(index: usize) -> TextSize {
    TextSize::try_from(index).unwrap_or(TextSize::from(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn lexes_a_production() {
        assert_eq!(
            kinds(r#"Expr := Plus: Expr "+" /[0-9]+/ | 'x' ; # done"#),
            vec![
                TokenKind::Ident,
                TokenKind::Define,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::GuardedLiteral,
                TokenKind::Pattern,
                TokenKind::Pipe,
                TokenKind::UnguardedLiteral,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn escapes_stay_inside_literals() {
        let tokens = tokenize(r#""a\"b" /\//"#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(u32::from(tokens[0].range.len()), 6);
        assert_eq!(tokens[1].kind, TokenKind::Pattern);
    }

    #[test]
    fn unknown_characters_are_errors() {
        assert_eq!(kinds("A @"), vec![TokenKind::Ident, TokenKind::Error]);
    }
}
