//! `parsnip-engine` - one grammar, three directions.
//!
//! A grammar written once drives three operations over the same event
//! stream:
//!
//! - **Parse**: text to `Push`/`Pop`/`Token`/`Content` events
//! - **Unparse**: events back to text
//! - **Match**: check that events still have the shape the grammar allows
//!
//! The engine works on characters directly, with no separate lexer, and
//! accepts left-recursive productions: they are seeded and grown at the
//! offset where they start, and always parse as left-associated trees.
//!
//! # Example
//!
//! ```
//! use parsnip_engine::{event::render_compact, notation::parse_grammar};
//!
//! let grammar = parse_grammar(r#"
//!     Expr := Plus: Expr "+" Num | Num: Num ;
//!     Num := Lit: /[0-9]+/ ;
//! "#).unwrap();
//!
//! let entry = grammar.entry("Expr").unwrap().complete();
//! let parsed = entry.parse("1 + 2 + 3").unwrap();
//! assert_eq!(
//!     render_compact(&grammar, parsed.events()),
//!     r#"(Plus (Plus (Num (Lit "1")) "+" (Lit "2")) "+" (Lit "3"))"#,
//! );
//! assert_eq!(entry.unparse(parsed.events()).unwrap(), "1+2+3");
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

mod api;
pub mod builder;
pub mod chain;
pub mod combinator;
pub mod config;
mod context;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod grammar;
pub mod ignorables;
mod left_recursion;
pub mod lookahead;
pub mod merge_guard;
pub mod notation;
mod ratpack;
pub mod state;
pub mod syntax;

pub use api::{Entry, Parsed};
pub use builder::{Kind, SourcePos};
pub use chain::Chain;
pub use combinator::Combinator;
pub use config::{LexicalOptions, ParseOptions};
pub use context::{Profile, ProfileEntry};
pub use diagnostics::{ErrorReceiver, FurthestFailure, NullReceiver, Recorder};
pub use error::{GrammarError, InvariantViolation, MatchError, ParseError, SyntaxError, TreeError, UnparseError};
pub use event::Event;
pub use grammar::{Grammar, GrammarBuilder, Production, ProductionId, Variant, VariantId};
pub use left_recursion::Stage;
pub use ratpack::CacheStats;
pub use state::{MatchState, ParseState, SerialState};
