//! A textual notation for grammars.
//!
//! ```text
//! # comments run to the end of the line
//! Expr := Plus: Expr "+" Term
//!       | Term: Term ;
//! Term := Num: /[0-9]+/
//!       | Neg: '-' Term
//!       | Paren: "(" Expr ")" ;
//! ```
//!
//! Each production lists labelled variants; unlabelled variants are named
//! `V0`, `V1`, ... by position. Terms are `"literal"` (checked for merge
//! hazards), `'literal'` (never checked), `/pattern/`, production names,
//! `( a | b )`, `[ optional ]`, `{ repeated }`, and `!term`.

mod lexer;

use smol_str::SmolStr;
use text_size::TextRange;
use thiserror::Error;

use crate::builder::{Kind, SourcePos};
use crate::combinator::Combinator;
use crate::config::LexicalOptions;
use crate::diagnostics::line_col;
use crate::error::GrammarError;
use crate::grammar::{Grammar, GrammarBuilder, ProductionId};

use lexer::{Token, TokenKind};

/// Errors in grammar notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// The text does not follow the notation.
    #[error("{line}:{column}: {message}")]
    Syntax {
        message: String,
        range: TextRange,
        line: u32,
        column: u32,
    },
    /// A term was rejected by the grammar builder.
    #[error("{line}:{column}: {error}")]
    Term {
        error: GrammarError,
        range: TextRange,
        line: u32,
        column: u32,
    },
    /// The finished grammar is invalid.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Compiles grammar notation with the default lexical options.
pub fn parse_grammar(source: &str) -> Result<Grammar, NotationError> {
    parse_grammar_with(source, &LexicalOptions::default())
}

/// Compiles grammar notation.
pub fn parse_grammar_with(source: &str, lexical: &LexicalOptions) -> Result<Grammar, NotationError> {
    let mut builder = GrammarBuilder::new();
    builder.lexical(lexical);
    let mut parser = Parser {
        source,
        tokens: lexer::tokenize(source),
        pos: 0,
        builder,
    };
    while !parser.at_end() {
        parser.production()?;
    }
    Ok(parser.builder.build()?)
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    builder: GrammarBuilder,
}

impl<'s> Parser<'s> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|token| token.kind)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.peek() == Some(kind);
        if found {
            self.pos += 1;
        }
        found
    }

    fn text(&self, token: Token) -> &'s str {
        &self.source[token.range]
    }

    fn pos_of(&self, range: TextRange) -> SourcePos {
        let (line, column) = line_col(self.source, range.start().into());
        SourcePos::new(line, column, range.start().into())
    }

    fn here(&self) -> TextRange {
        self.tokens.get(self.pos).map_or_else(
            || {
                let end = text_size::TextSize::of(self.source);
                TextRange::empty(end)
            },
            |token| token.range,
        )
    }

    fn error(&self, expected: &str) -> NotationError {
        let range = self.here();
        let found = self.peek().map_or("the end of the grammar", TokenKind::describe);
        let SourcePos { line, column, .. } = self.pos_of(range);
        NotationError::Syntax {
            message: format!("expected {expected}, found {found}"),
            range,
            line,
            column,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, NotationError> {
        if self.peek() == Some(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(kind.describe()))
        }
    }

    fn production(&mut self) -> Result<(), NotationError> {
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Define)?;
        let production = self.builder.production(self.text(name));
        let mut index = 0usize;
        loop {
            self.variant(production, index)?;
            index += 1;
            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn variant(&mut self, production: ProductionId, index: usize) -> Result<(), NotationError> {
        let label = if self.peek() == Some(TokenKind::Ident) && self.nth(1) == Some(TokenKind::Colon) {
            let label = self.bump();
            self.bump();
            SmolStr::new(self.text(label))
        } else {
            SmolStr::new(format!("V{index}"))
        };
        let body = self.sequence()?;
        self.builder.variant(production, &label, body);
        Ok(())
    }

    fn choice(&mut self) -> Result<Combinator, NotationError> {
        let mut arms = vec![self.sequence()?];
        while self.eat(TokenKind::Pipe) {
            arms.push(self.sequence()?);
        }
        Ok(self.builder.node(Kind::Alternation, arms)?)
    }

    fn sequence(&mut self) -> Result<Combinator, NotationError> {
        let mut terms = Vec::new();
        while matches!(
            self.peek(),
            Some(
                TokenKind::Bang
                    | TokenKind::Ident
                    | TokenKind::GuardedLiteral
                    | TokenKind::UnguardedLiteral
                    | TokenKind::Pattern
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
            )
        ) {
            terms.push(self.term()?);
        }
        Ok(self.builder.node(Kind::Sequence, terms)?)
    }

    fn term(&mut self) -> Result<Combinator, NotationError> {
        if self.eat(TokenKind::Bang) {
            let body = self.term()?;
            return Ok(self.builder.node(Kind::NegativeLookahead, vec![body])?);
        }
        let Some(kind) = self.peek() else {
            return Err(self.error("a term"));
        };
        match kind {
            TokenKind::Ident => {
                let token = self.bump();
                let pos = self.pos_of(token.range);
                self.leaf(Kind::Reference, self.text(token), token.range, pos)
            }
            TokenKind::GuardedLiteral => {
                let token = self.bump();
                let text = unescape(strip(self.text(token)));
                let pos = self.pos_of(token.range);
                self.leaf(Kind::Literal, &text, token.range, pos)
            }
            TokenKind::UnguardedLiteral => {
                let token = self.bump();
                let text = unescape(strip(self.text(token)));
                let pos = self.pos_of(token.range);
                Ok(self.builder.unguarded_literal(&text, pos))
            }
            TokenKind::Pattern => {
                let token = self.bump();
                let source = strip(self.text(token)).replace("\\/", "/");
                let pos = self.pos_of(token.range);
                self.leaf(Kind::Pattern, &source, token.range, pos)
            }
            TokenKind::LParen => self.group(TokenKind::RParen, None),
            TokenKind::LBracket => self.group(TokenKind::RBracket, Some(Kind::Optional)),
            TokenKind::LBrace => self.group(TokenKind::RBrace, Some(Kind::Repeated)),
            _ => Err(self.error("a term")),
        }
    }

    fn group(&mut self, close: TokenKind, kind: Option<Kind>) -> Result<Combinator, NotationError> {
        self.bump();
        let inner = self.choice()?;
        self.expect(close)?;
        match kind {
            Some(kind) => Ok(self.builder.node(kind, vec![inner])?),
            None => Ok(inner),
        }
    }

    fn leaf(
        &mut self,
        kind: Kind,
        text: &str,
        range: TextRange,
        pos: SourcePos,
    ) -> Result<Combinator, NotationError> {
        self.builder
            .leaf(kind, text, pos)
            .map_err(|error| NotationError::Term {
                error,
                range,
                line: pos.line,
                column: pos.column,
            })
    }
}

/// Drops the delimiters of a quoted literal or pattern.
fn strip(token: &str) -> &str {
    &token[1..token.len() - 1]
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_productions_and_labels() {
        let grammar = parse_grammar(
            r#"
            # sums
            Expr := Plus: Expr "+" Num | Num ;
            Num := /[0-9]+/ ;
            "#,
        )
        .unwrap();
        let expr = grammar.production(grammar.lookup("Expr").unwrap());
        let names: Vec<&str> = expr
            .variants()
            .iter()
            .map(|id| grammar.variant(*id).name())
            .collect();
        assert_eq!(names, vec!["Plus", "V1"]);
        assert!(expr.is_left_recursive());
        assert!(grammar.lookup_variant("Num.V0").is_some());
    }

    #[test]
    fn display_round_trips_through_the_notation() {
        let source = r#"Stmt := If: "if" Cond Block [Else] ;
Cond := !'-' ("(" Name ")" | Name) ;
Block := "{" {Stmt} "}" | Empty: ";" ;
Else := "else" Block | Nothing: () ;
Name := /[a-z]+\/?/ ;
"#;
        let grammar = parse_grammar(source).unwrap();
        let printed = grammar.to_string();
        let reparsed = parse_grammar(&printed).unwrap();
        assert_eq!(reparsed.to_string(), printed);
        expect_test::expect![[r#"
            Stmt := If: "if" Cond Block [Else] ;
            Cond := V0: !'-' ("(" Name ")" | Name) ;
            Block := V0: "{" {Stmt} "}"
                | Empty: ";" ;
            Else := V0: "else" Block
                | Nothing: () ;
            Name := V0: /[a-z]+\/?/ ;
        "#]]
        .assert_eq(&printed);
    }

    #[test]
    fn escapes_in_literals() {
        assert_eq!(unescape(r#"a\"b\\c\n"#), "a\"b\\c\n");
        let grammar = parse_grammar(r#"S := "\"" ;"#).unwrap();
        assert_eq!(grammar.punctuation(), ["\""]);
    }

    #[test]
    fn literal_positions_are_recorded() {
        let grammar = parse_grammar("S :=\n  \"x\" ;").unwrap();
        let id = grammar.lookup_variant("S.V0").unwrap();
        let Combinator::Literal(literal) = grammar.variant(id).body() else {
            panic!("expected a literal");
        };
        assert_eq!(literal.pos(), SourcePos::new(2, 3, 7));
    }

    #[test]
    fn reports_the_offending_token() {
        let err = parse_grammar("S := \"a\"\nT := \"b\" ;").unwrap_err();
        assert_eq!(err.to_string(), "2:3: expected `;`, found `:=`");
    }

    #[test]
    fn reports_bad_patterns_at_their_position() {
        let err = parse_grammar("S := /(/ ;").unwrap_err();
        assert!(matches!(err, NotationError::Term { line: 1, column: 6, .. }));
    }

    #[test]
    fn reports_undefined_productions() {
        let err = parse_grammar("S := T ;").unwrap_err();
        assert_eq!(err, NotationError::Grammar(GrammarError::EmptyProduction("T".into())));
    }
}
