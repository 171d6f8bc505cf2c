//! Productions, variants, and the grammar that owns them.
//!
//! A production is a named ordered choice between labelled variants. Each
//! variant becomes a node kind of the parse tree: parsing a variant wraps
//! its events in `Push(variant)` and `Pop`.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::combinator::Combinator;
use crate::config::LexicalOptions;
use crate::error::GrammarError;
use crate::ignorables::Ignorables;
use crate::lookahead::{self, Analysis, CharSet};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw id.
            #[must_use]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Returns the id as a table index.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }
        }
    };
}

id_type!(
    /// Identifies a production within its grammar.
    ProductionId
);
id_type!(
    /// Identifies a variant within its grammar. Ids are dense across all
    /// productions, in declaration order.
    VariantId
);

/// One labelled alternative of a production.
#[derive(Debug, Clone)]
pub struct Variant {
    id: VariantId,
    name: SmolStr,
    production: ProductionId,
    body: Combinator,
    lookahead1: Option<CharSet>,
}

impl Variant {
    #[must_use]
    pub fn id(&self) -> VariantId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn production(&self) -> ProductionId {
        self.production
    }

    #[must_use]
    pub fn body(&self) -> &Combinator {
        &self.body
    }

    /// Characters a parse of this variant can start with, when they are
    /// known and the variant cannot match the empty string.
    #[must_use]
    pub fn lookahead1(&self) -> Option<&CharSet> {
        self.lookahead1.as_ref()
    }
}

/// A named ordered choice of variants.
#[derive(Debug, Clone)]
pub struct Production {
    id: ProductionId,
    name: SmolStr,
    variants: Vec<VariantId>,
    first: CharSet,
    nullable: bool,
    left_recursive: bool,
}

impl Production {
    #[must_use]
    pub fn id(&self) -> ProductionId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variants in the order they are tried.
    #[must_use]
    pub fn variants(&self) -> &[VariantId] {
        &self.variants
    }

    /// Returns the literal characters a parse can start with. Patterns
    /// contribute nothing here.
    #[must_use]
    pub fn first(&self) -> &CharSet {
        &self.first
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns `true` if the production can reach itself without consuming
    /// input.
    #[must_use]
    pub fn is_left_recursive(&self) -> bool {
        self.left_recursive
    }
}

/// A finished grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    variants: Vec<Variant>,
    names: IndexMap<SmolStr, ProductionId>,
    punctuation: Vec<SmolStr>,
    ignorables: Ignorables,
}

impl Grammar {
    /// Returns the production with the given id.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another grammar.
    #[must_use]
    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.index()]
    }

    /// Returns the variant with the given id.
    ///
    /// # Panics
    ///
    /// If `id` belongs to another grammar.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> &Variant {
        &self.variants[id.index()]
    }

    /// Iterates over productions in declaration order.
    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.productions.iter()
    }

    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Finds a production by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ProductionId> {
        self.names.get(name).copied()
    }

    /// Finds a variant by its `Production.Variant` path.
    #[must_use]
    pub fn lookup_variant(&self, path: &str) -> Option<VariantId> {
        let (production, variant) = path.split_once('.')?;
        let production = self.production(self.lookup(production)?);
        production
            .variants
            .iter()
            .copied()
            .find(|id| self.variant(*id).name() == variant)
    }

    /// Returns `Production.Variant` for `id`.
    #[must_use]
    pub fn variant_path(&self, id: VariantId) -> String {
        let variant = self.variant(id);
        format!("{}.{}", self.production(variant.production).name, variant.name)
    }

    /// Returns every punctuation token of the grammar, sorted.
    #[must_use]
    pub fn punctuation(&self) -> &[SmolStr] {
        &self.punctuation
    }

    /// Returns the rules for text skipped between tokens.
    #[must_use]
    pub fn ignorables(&self) -> &Ignorables {
        &self.ignorables
    }
}

impl fmt::Display for Grammar {
    /// Writes the grammar in its textual notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for production in &self.productions {
            write!(f, "{} :=", production.name)?;
            for (i, id) in production.variants.iter().enumerate() {
                let variant = self.variant(*id);
                let sep = if i == 0 { " " } else { "\n    | " };
                write!(f, "{sep}{}: {}", variant.name, variant.body.display(self))?;
            }
            f.write_str(" ;\n")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Draft {
    name: SmolStr,
    variants: Vec<(SmolStr, Combinator)>,
}

/// Collects productions and variants, then finishes them into a
/// [`Grammar`].
///
/// Productions may be referenced before they are defined; `build` checks
/// that each one ends up with at least one variant.
#[derive(Debug)]
pub struct GrammarBuilder {
    drafts: Vec<Draft>,
    names: IndexMap<SmolStr, ProductionId>,
    punctuation: Vec<SmolStr>,
    ignorables: Ignorables,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            drafts: Vec::new(),
            names: IndexMap::new(),
            punctuation: Vec::new(),
            ignorables: Ignorables::default(),
        }
    }

    /// Returns the id of the production called `name`, declaring it if
    /// needed.
    pub fn production(&mut self, name: &str) -> ProductionId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }
        let id = ProductionId::from_index(self.drafts.len());
        self.drafts.push(Draft {
            name: SmolStr::new(name),
            variants: Vec::new(),
        });
        self.names.insert(SmolStr::new(name), id);
        id
    }

    /// A reference to the production called `name`.
    pub fn reference(&mut self, name: &str) -> Combinator {
        Combinator::Reference(self.production(name))
    }

    /// Appends a variant to `production`.
    pub fn variant(&mut self, production: ProductionId, name: &str, body: Combinator) -> &mut Self {
        self.drafts[production.index()]
            .variants
            .push((SmolStr::new(name), body));
        self
    }

    /// Adds punctuation tokens the grammar does not spell out, so that
    /// literals are guarded against them.
    pub fn punctuation<I, S>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.punctuation
            .extend(tokens.into_iter().map(|token| SmolStr::new(token.as_ref())));
        self
    }

    /// Replaces the ignorable text rules.
    pub fn ignorables(&mut self, ignorables: Ignorables) -> &mut Self {
        self.ignorables = ignorables;
        self
    }

    /// Applies lexical options: extra punctuation and comment syntax.
    pub fn lexical(&mut self, options: &LexicalOptions) -> &mut Self {
        self.punctuation(&options.punctuation);
        self.ignorables(options.ignorables())
    }

    /// Checks the productions, attaches merge guards, and computes
    /// lookaheads.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let Self {
            drafts,
            names,
            mut punctuation,
            ignorables,
        } = self;

        for draft in &drafts {
            if draft.variants.is_empty() {
                return Err(GrammarError::EmptyProduction(draft.name.clone()));
            }
            for (i, (name, _)) in draft.variants.iter().enumerate() {
                if draft.variants[..i].iter().any(|(seen, _)| seen == name) {
                    return Err(GrammarError::DuplicateVariant {
                        production: draft.name.clone(),
                        variant: name.clone(),
                    });
                }
            }
        }

        for (_, body) in drafts.iter().flat_map(|draft| &draft.variants) {
            collect_punctuation(body, &mut punctuation);
        }
        punctuation.retain(|token| !token.is_empty());
        punctuation.sort();
        punctuation.dedup();

        let mut productions = Vec::with_capacity(drafts.len());
        let mut variants = Vec::new();
        for (index, draft) in drafts.into_iter().enumerate() {
            let production = ProductionId::from_index(index);
            let mut ids = Vec::with_capacity(draft.variants.len());
            for (name, mut body) in draft.variants {
                attach_guards(&mut body, &punctuation);
                let id = VariantId::from_index(variants.len());
                ids.push(id);
                variants.push(Variant {
                    id,
                    name,
                    production,
                    body,
                    lookahead1: None,
                });
            }
            productions.push(Production {
                id: production,
                name: draft.name,
                variants: ids,
                first: CharSet::empty(),
                nullable: false,
                left_recursive: false,
            });
        }

        let bodies: Vec<Vec<&Combinator>> = productions
            .iter()
            .map(|production| {
                production
                    .variants
                    .iter()
                    .map(|id| &variants[id.index()].body)
                    .collect()
            })
            .collect();
        let firsts = lookahead::production_firsts(&bodies);
        let left_recursive = lookahead::left_recursive(&bodies, &firsts);
        drop(bodies);

        for (production, first) in productions.iter_mut().zip(&firsts) {
            production.first = first.chars.clone();
            production.nullable = first.nullable;
            production.left_recursive = left_recursive.contains(&production.id);
        }
        let analysis = Analysis {
            firsts: &firsts,
            left_recursive: Some(&left_recursive),
        };
        for variant in &mut variants {
            variant.lookahead1 = lookahead::first_of(&variant.body, &analysis).lookahead1();
            annotate_arms(&mut variant.body, &analysis);
        }

        Ok(Grammar {
            productions,
            variants,
            names,
            punctuation,
            ignorables,
        })
    }
}

fn collect_punctuation(combinator: &Combinator, out: &mut Vec<SmolStr>) {
    match combinator {
        Combinator::Literal(literal) if literal.is_punctuation() => {
            out.push(SmolStr::new(literal.text()));
        }
        Combinator::Concatenation(children) => {
            children.iter().for_each(|child| collect_punctuation(child, out));
        }
        Combinator::Alternation(arms) => {
            arms.iter().for_each(|arm| collect_punctuation(&arm.body, out));
        }
        Combinator::Repetition(body) | Combinator::Lookahead(body) => collect_punctuation(body, out),
        _ => {}
    }
}

fn attach_guards(combinator: &mut Combinator, punctuation: &[SmolStr]) {
    match combinator {
        Combinator::Literal(literal) => literal.attach_guard(punctuation),
        Combinator::Concatenation(children) => {
            children
                .iter_mut()
                .for_each(|child| attach_guards(child, punctuation));
        }
        Combinator::Alternation(arms) => {
            arms.iter_mut()
                .for_each(|arm| attach_guards(&mut arm.body, punctuation));
        }
        Combinator::Repetition(body) | Combinator::Lookahead(body) => attach_guards(body, punctuation),
        _ => {}
    }
}

fn annotate_arms(combinator: &mut Combinator, analysis: &Analysis<'_>) {
    match combinator {
        Combinator::Concatenation(children) => {
            children
                .iter_mut()
                .for_each(|child| annotate_arms(child, analysis));
        }
        Combinator::Alternation(arms) => {
            for arm in arms {
                arm.lookahead1 = lookahead::first_of(&arm.body, analysis).lookahead1();
                annotate_arms(&mut arm.body, analysis);
            }
        }
        Combinator::Repetition(body) | Combinator::Lookahead(body) => annotate_arms(body, analysis),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_grammar() -> Grammar {
        let mut builder = GrammarBuilder::new();
        let stmt = builder.production("Stmt");
        let expr = builder.reference("Expr");
        builder
            .variant(
                stmt,
                "If",
                Combinator::concatenation(vec![Combinator::literal("if"), expr.clone()]),
            )
            .variant(
                stmt,
                "Dec",
                Combinator::concatenation(vec![Combinator::literal("--"), expr.clone()]),
            )
            .variant(stmt, "Expr", expr);
        let expr = builder.production("Expr");
        let inner = builder.reference("Expr");
        builder
            .variant(
                expr,
                "Neg",
                Combinator::concatenation(vec![Combinator::literal("-"), inner.clone()]),
            )
            .variant(
                expr,
                "Call",
                Combinator::concatenation(vec![inner, Combinator::literal("()")]),
            )
            .variant(expr, "Name", Combinator::literal("x"));
        builder.punctuation(["-="]);
        builder.build().unwrap()
    }

    #[test]
    fn punctuation_is_collected_from_literals() {
        let grammar = statement_grammar();
        let tokens: Vec<&str> = grammar.punctuation().iter().map(SmolStr::as_str).collect();
        assert_eq!(tokens, vec!["()", "-", "--", "-="]);
    }

    #[test]
    fn ids_and_paths() {
        let grammar = statement_grammar();
        let stmt = grammar.lookup("Stmt").unwrap();
        assert_eq!(stmt, ProductionId::from_raw(0));
        let dec = grammar.lookup_variant("Stmt.Dec").unwrap();
        assert_eq!(dec, VariantId::from_raw(1));
        assert_eq!(grammar.variant_path(dec), "Stmt.Dec");
        assert_eq!(grammar.variant(dec).production(), stmt);
        assert_eq!(grammar.lookup_variant("Expr.Neg"), Some(VariantId::from_raw(3)));
        assert_eq!(grammar.lookup_variant("Expr.Nope"), None);
        assert_eq!(grammar.variant_count(), 6);
    }

    #[test]
    fn left_recursion_and_lookahead() {
        let grammar = statement_grammar();
        let stmt = grammar.production(grammar.lookup("Stmt").unwrap());
        let expr = grammar.production(grammar.lookup("Expr").unwrap());
        assert!(expr.is_left_recursive());
        assert!(!stmt.is_left_recursive());
        assert_eq!(expr.first().to_string(), "`-`, `x`");

        let lookaheads: Vec<Option<String>> = stmt
            .variants()
            .iter()
            .map(|id| grammar.variant(*id).lookahead1().map(ToString::to_string))
            .collect();
        assert_eq!(
            lookaheads,
            vec![Some("`i`".to_string()), Some("`-`".to_string()), None]
        );

        let call = grammar.lookup_variant("Expr.Call").unwrap();
        assert_eq!(grammar.variant(call).lookahead1(), None);
    }

    #[test]
    fn merge_guards_see_every_punctuation_token() {
        let grammar = statement_grammar();
        let neg = grammar.lookup_variant("Expr.Neg").unwrap();
        let Combinator::Concatenation(children) = grammar.variant(neg).body() else {
            panic!("expected a sequence");
        };
        let Combinator::Literal(minus) = &children[0] else {
            panic!("expected a literal");
        };
        assert_eq!(
            minus.guard(),
            Some(&crate::merge_guard::MergeGuard::Punctuation {
                suffixes: vec!["-".into(), "=".into()],
            })
        );
    }

    #[test]
    fn undefined_productions_are_rejected() {
        let mut builder = GrammarBuilder::new();
        let start = builder.production("Start");
        let missing = builder.reference("Missing");
        builder.variant(start, "Only", missing);
        assert_eq!(
            builder.build().unwrap_err(),
            GrammarError::EmptyProduction("Missing".into())
        );
    }

    #[test]
    fn duplicate_variants_are_rejected() {
        let mut builder = GrammarBuilder::new();
        let start = builder.production("Start");
        builder
            .variant(start, "A", Combinator::literal("a"))
            .variant(start, "A", Combinator::literal("b"));
        assert!(matches!(
            builder.build(),
            Err(GrammarError::DuplicateVariant { .. })
        ));
    }

    #[test]
    fn display_writes_notation() {
        let grammar = statement_grammar();
        expect_test::expect![[r#"
            Stmt := If: "if" Expr
                | Dec: "--" Expr
                | Expr: Expr ;
            Expr := Neg: "-" Expr
                | Call: Expr "()"
                | Name: "x" ;
        "#]]
        .assert_eq(&grammar.to_string());
    }
}
