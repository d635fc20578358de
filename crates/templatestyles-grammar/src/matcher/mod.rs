//! Grammar matcher combinators.
//!
//! A [`Matcher`] is an immutable grammar node. Composite matchers are built
//! from simpler ones with the constructors on [`Matcher`]; the resulting tree
//! is shared through an `Arc` and can be matched from any number of threads.
//!
//! Matching works on a slice of [`ComponentValue`]s. A matcher invoked at a
//! start index returns every index at which a match could end. Indices always
//! point at the next non-whitespace value, so whitespace between components
//! never needs to be spelled out in a grammar. A list matches fully when one
//! of the candidates equals its length.
//!
//! ```ignore
//! use templatestyles_grammar::prelude::*;
//!
//! let length = Matcher::token_where(TokenKind::Dimension, |t| t.unit() == Some("px"));
//! let border = Matcher::unordered_some_of(vec![
//!     Matcher::keyword(["solid", "dashed"]),
//!     length,
//! ]);
//!
//! assert!(border.matches(&parse_component_values("1px solid")));
//! ```

mod cache;
mod engine;

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::value::{BlockKind, ComponentValue, Token, TokenKind};

pub use cache::MatcherCache;

/// Predicate applied to a single token by [`Matcher::token_where`].
pub type TokenPredicate = Arc<dyn Fn(&Token) -> bool + Send + Sync>;

/// Options for a matching run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Maximum nesting of matcher invocations. Deeper paths fail to match.
    pub max_depth: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Largest number of items in an unordered group.
pub const MAX_UNORDERED_ITEMS: usize = 64;

/// An immutable, cheaply cloneable grammar node.
#[derive(Clone)]
pub struct Matcher(Arc<Node>);

pub(crate) enum Node {
    Keyword(Vec<String>),
    Token {
        kind: TokenKind,
        predicate: Option<TokenPredicate>,
    },
    Delim(Vec<char>),
    Alternative(Vec<Matcher>),
    Juxtaposition {
        items: Vec<Matcher>,
        commas: bool,
    },
    Unordered {
        items: Vec<Matcher>,
        all: bool,
    },
    Quantifier {
        inner: Matcher,
        min: usize,
        max: usize,
        commas: bool,
    },
    Function {
        name: Option<String>,
        inner: Matcher,
    },
    Block {
        kind: BlockKind,
        inner: Matcher,
    },
    VarName,
    Anything {
        at_least_one: bool,
    },
    Nothing,
    NoWhitespace,
    Recursive(Matcher),
    SelfRef(Weak<Node>),
}

impl Matcher {
    fn from_node(node: Node) -> Self {
        Self(Arc::new(node))
    }

    /// Match an identifier from a fixed set, ignoring ASCII case.
    pub fn keyword<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_node(Node::Keyword(
            words.into_iter().map(|w| w.as_ref().to_ascii_lowercase()).collect(),
        ))
    }

    /// Match any single token of `kind`.
    pub fn token(kind: TokenKind) -> Self {
        Self::from_node(Node::Token {
            kind,
            predicate: None,
        })
    }

    /// Match a single token of `kind` satisfying `predicate`.
    pub fn token_where<F>(kind: TokenKind, predicate: F) -> Self
    where
        F: Fn(&Token) -> bool + Send + Sync + 'static,
    {
        Self::from_node(Node::Token {
            kind,
            predicate: Some(Arc::new(predicate)),
        })
    }

    /// Match a delimiter token holding one of `chars`.
    pub fn delim(chars: &[char]) -> Self {
        Self::from_node(Node::Delim(chars.to_vec()))
    }

    /// Ordered choice. Candidates of every alternative are kept for
    /// backtracking by enclosing sequences.
    pub fn alternative(options: Vec<Matcher>) -> Self {
        Self::from_node(Node::Alternative(options))
    }

    /// Ordered sequence.
    pub fn juxtaposition(items: Vec<Matcher>) -> Self {
        Self::from_node(Node::Juxtaposition {
            items,
            commas: false,
        })
    }

    /// Ordered sequence with a comma between consecutive items.
    pub fn comma_separated(items: Vec<Matcher>) -> Self {
        Self::from_node(Node::Juxtaposition { items, commas: true })
    }

    /// All items, each exactly once, in any order (`a && b`).
    pub fn unordered_all_of(items: Vec<Matcher>) -> Self {
        Self::unordered(items, true)
    }

    /// One or more items, each at most once, in any order (`a || b`).
    pub fn unordered_some_of(items: Vec<Matcher>) -> Self {
        Self::unordered(items, false)
    }

    /// # Panics
    ///
    /// Panics if `items` holds more than [`MAX_UNORDERED_ITEMS`] matchers.
    fn unordered(items: Vec<Matcher>, all: bool) -> Self {
        assert!(
            items.len() <= MAX_UNORDERED_ITEMS,
            "unordered groups are limited to {MAX_UNORDERED_ITEMS} items, got {}",
            items.len()
        );
        Self::from_node(Node::Unordered { items, all })
    }

    /// Repeat `inner` between `min` and `max` times.
    pub fn count(inner: Matcher, min: usize, max: usize) -> Self {
        Self::from_node(Node::Quantifier {
            inner,
            min,
            max,
            commas: false,
        })
    }

    /// Comma separated repetition (`inner#{min,max}`).
    pub fn hash(inner: Matcher, min: usize, max: usize) -> Self {
        Self::from_node(Node::Quantifier {
            inner,
            min,
            max,
            commas: true,
        })
    }

    /// `inner?`
    pub fn optional(inner: Matcher) -> Self {
        Self::count(inner, 0, 1)
    }

    /// `inner*`
    pub fn star(inner: Matcher) -> Self {
        Self::count(inner, 0, usize::MAX)
    }

    /// `inner+`
    pub fn plus(inner: Matcher) -> Self {
        Self::count(inner, 1, usize::MAX)
    }

    /// `inner#`
    pub fn hash_list(inner: Matcher) -> Self {
        Self::hash(inner, 1, usize::MAX)
    }

    /// A function call named `name` (ASCII case-insensitive) whose whole
    /// argument list matches `inner`.
    pub fn function(name: &str, inner: Matcher) -> Self {
        Self::from_node(Node::Function {
            name: Some(name.to_string()),
            inner,
        })
    }

    /// A function call with any name whose arguments match `inner`.
    pub fn any_function(inner: Matcher) -> Self {
        Self::from_node(Node::Function { name: None, inner })
    }

    /// A simple block of `kind` whose whole contents match `inner`.
    pub fn block(kind: BlockKind, inner: Matcher) -> Self {
        Self::from_node(Node::Block { kind, inner })
    }

    /// A custom property name: an identifier of the form `--name`, where the
    /// name consists of ASCII letters, digits, `_` and `-`.
    pub fn var_name() -> Self {
        Self::from_node(Node::VarName)
    }

    /// Zero or more arbitrary component values.
    pub fn anything() -> Self {
        Self::from_node(Node::Anything {
            at_least_one: false,
        })
    }

    /// One or more arbitrary component values.
    pub fn anything_plus() -> Self {
        Self::from_node(Node::Anything { at_least_one: true })
    }

    /// Never matches.
    pub fn nothing() -> Self {
        Self::from_node(Node::Nothing)
    }

    /// Matches the empty sequence when no whitespace precedes the current
    /// position.
    pub fn no_whitespace() -> Self {
        Self::from_node(Node::NoWhitespace)
    }

    /// Build a self-referential production.
    ///
    /// `build` receives a back-reference to the matcher being constructed
    /// and returns its definition. The back-reference is weak: it resolves
    /// for as long as the returned matcher (or a clone of it) is alive.
    pub fn recursive<F>(build: F) -> Self
    where
        F: FnOnce(Matcher) -> Matcher,
    {
        Self(Arc::new_cyclic(|weak| {
            let this = Matcher::from_node(Node::SelfRef(weak.clone()));
            Node::Recursive(build(this))
        }))
    }

    /// Whether the whole of `values` matches.
    pub fn matches(&self, values: &[ComponentValue]) -> bool {
        self.matches_with(values, &MatchOptions::default())
    }

    /// Whether the whole of `values` matches, using `options`.
    pub fn matches_with(&self, values: &[ComponentValue], options: &MatchOptions) -> bool {
        let start = engine::skip_whitespace(values, 0);
        self.candidates(values, start, options).contains(&values.len())
    }

    /// Every end position of a match starting at `start`.
    pub fn candidates(
        &self,
        values: &[ComponentValue],
        start: usize,
        options: &MatchOptions,
    ) -> Vec<usize> {
        self.candidates_counted(values, start, options).0
    }

    /// Like [`Matcher::candidates`], also returning how many matcher
    /// invocations the run took.
    pub(crate) fn candidates_counted(
        &self,
        values: &[ComponentValue],
        start: usize,
        options: &MatchOptions,
    ) -> (Vec<usize>, usize) {
        let steps = Cell::new(0);
        let ends = self.0.generate(values, start, engine::Context::new(options, &steps));
        (ends.into_iter().collect(), steps.get())
    }

    /// Whether two handles refer to the same grammar node.
    pub fn ptr_eq(a: &Matcher, b: &Matcher) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Node::Keyword(words) => f.debug_tuple("Keyword").field(words).finish(),
            Node::Token { kind, predicate } => f
                .debug_struct("Token")
                .field("kind", kind)
                .field("predicate", &predicate.is_some())
                .finish(),
            Node::Delim(chars) => f.debug_tuple("Delim").field(chars).finish(),
            Node::Alternative(options) => f.debug_tuple("Alternative").field(options).finish(),
            Node::Juxtaposition { items, commas } => f
                .debug_struct("Juxtaposition")
                .field("items", items)
                .field("commas", commas)
                .finish(),
            Node::Unordered { items, all } => f
                .debug_struct("UnorderedGroup")
                .field("items", items)
                .field("all", all)
                .finish(),
            Node::Quantifier {
                inner,
                min,
                max,
                commas,
            } => f
                .debug_struct("Quantifier")
                .field("inner", inner)
                .field("min", min)
                .field("max", max)
                .field("commas", commas)
                .finish(),
            Node::Function { name, inner } => f
                .debug_struct("Function")
                .field("name", name)
                .field("inner", inner)
                .finish(),
            Node::Block { kind, inner } => f
                .debug_struct("Block")
                .field("kind", kind)
                .field("inner", inner)
                .finish(),
            Node::VarName => f.write_str("VarName"),
            Node::Anything { at_least_one } => f
                .debug_struct("Anything")
                .field("at_least_one", at_least_one)
                .finish(),
            Node::Nothing => f.write_str("Nothing"),
            Node::NoWhitespace => f.write_str("NoWhitespace"),
            Node::Recursive(inner) => f.debug_tuple("Recursive").field(inner).finish(),
            // Printing the target would recurse forever.
            Node::SelfRef(_) => f.write_str("SelfRef"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse_component_values;

    fn px() -> Matcher {
        Matcher::token_where(TokenKind::Dimension, |t| t.unit() == Some("px"))
    }

    fn matches(matcher: &Matcher, css: &str) -> bool {
        matcher.matches(&parse_component_values(css))
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let m = Matcher::keyword(["solid", "dashed"]);
        assert!(matches(&m, "SOLID"));
        assert!(matches(&m, "  dashed "));
        assert!(!matches(&m, "dotted"));
        assert!(!matches(&m, "solid solid"));
    }

    #[test]
    fn alternative_backtracks_inside_sequence() {
        // The first alternative consumes too little for the sequence to be
        // completed; the second has to be found through backtracking.
        let ab = Matcher::alternative(vec![
            Matcher::keyword(["a"]),
            Matcher::juxtaposition(vec![Matcher::keyword(["a"]), Matcher::keyword(["b"])]),
        ]);
        let m = Matcher::juxtaposition(vec![ab, Matcher::keyword(["c"])]);

        assert!(matches(&m, "a c"));
        assert!(matches(&m, "a b c"));
        assert!(!matches(&m, "a b"));
    }

    #[test]
    fn quantifier_bounds() {
        let m = Matcher::count(px(), 2, 3);
        assert!(!matches(&m, "1px"));
        assert!(matches(&m, "1px 2px"));
        assert!(matches(&m, "1px 2px 3px"));
        assert!(!matches(&m, "1px 2px 3px 4px"));
    }

    #[test]
    fn hash_requires_commas() {
        let m = Matcher::hash(px(), 1, 3);
        assert!(matches(&m, "1px, 2px,3px"));
        assert!(!matches(&m, "1px 2px"));
        assert!(!matches(&m, "1px,"));
        assert!(!matches(&m, ", 1px"));
    }

    #[test]
    fn comma_separated_sequence() {
        let m = Matcher::comma_separated(vec![px(), Matcher::keyword(["a"])]);
        assert!(matches(&m, "1px, a"));
        assert!(!matches(&m, "1px a"));
    }

    #[test]
    fn unordered_groups() {
        let items = || vec![Matcher::keyword(["a"]), Matcher::keyword(["b"]), px()];
        let all = Matcher::unordered_all_of(items());
        let some = Matcher::unordered_some_of(items());

        assert!(matches(&all, "b 1px a"));
        assert!(!matches(&all, "b a"));
        assert!(!matches(&all, "a a 1px b"));
        assert!(matches(&some, "1px b"));
        assert!(!matches(&some, "b b"));
        assert!(!matches(&some, ""));
    }

    #[test]
    fn unordered_groups_use_the_full_mask() {
        let items: Vec<_> = (0..MAX_UNORDERED_ITEMS)
            .map(|i| Matcher::keyword([format!("k{i}")]))
            .collect();
        let all = Matcher::unordered_all_of(items.clone());
        let some = Matcher::unordered_some_of(items);

        let forward: Vec<_> = (0..MAX_UNORDERED_ITEMS).map(|i| format!("k{i}")).collect();
        assert!(matches(&some, "k63 k0"));
        assert!(matches(&all, &forward.join(" ")));
        assert!(!matches(&all, &forward[1..].join(" ")));
    }

    #[test]
    #[should_panic(expected = "unordered groups are limited")]
    fn oversized_unordered_group_is_rejected() {
        let items = (0..=MAX_UNORDERED_ITEMS).map(|_| px()).collect();
        let _ = Matcher::unordered_some_of(items);
    }

    #[test]
    fn unbounded_repetition_grows_linearly() {
        // Each repetition may span one to four values, like `<position>`.
        let m = Matcher::star(Matcher::count(px(), 1, 4));
        let steps = |n: usize| {
            let values = parse_component_values(&vec!["1px"; n].join(" "));
            let (ends, steps) = m.candidates_counted(&values, 0, &MatchOptions::default());
            assert_eq!(ends.last(), Some(&values.len()));
            steps
        };

        let small = steps(400);
        let large = steps(1600);
        assert!(large < small * 6, "{small} steps for 400 values, {large} for 1600");
    }

    #[test]
    fn function_and_block_match_whole_contents() {
        let f = Matcher::function("repeat", Matcher::hash(px(), 2, 2));
        assert!(matches(&f, "REPEAT(1px, 2px)"));
        assert!(!matches(&f, "repeat(1px)"));
        assert!(!matches(&f, "other(1px, 2px)"));

        let b = Matcher::block(BlockKind::SquareBracket, Matcher::star(Matcher::token(TokenKind::Ident)));
        assert!(matches(&b, "[a b c]"));
        assert!(matches(&b, "[]"));
        assert!(!matches(&b, "(a)"));
    }

    #[test]
    fn var_name_shape() {
        let m = Matcher::var_name();
        assert!(matches(&m, "--main-color"));
        assert!(matches(&m, "--x_1"));
        assert!(!matches(&m, "-x"));
        assert!(!matches(&m, "--"));
        assert!(!matches(&m, "main"));
    }

    #[test]
    fn nothing_and_anything() {
        assert!(!matches(&Matcher::nothing(), "a"));
        assert!(!matches(&Matcher::nothing(), ""));
        assert!(matches(&Matcher::anything(), ""));
        assert!(matches(&Matcher::anything(), "a (b) c(d)"));
        assert!(!matches(&Matcher::anything_plus(), ""));
        assert!(!matches(&Matcher::anything(), "a )"));
    }

    #[test]
    fn no_whitespace_detects_adjacency() {
        let m = Matcher::juxtaposition(vec![
            Matcher::delim(&['<']),
            Matcher::no_whitespace(),
            Matcher::delim(&['=']),
        ]);
        assert!(matches(&m, "<="));
        assert!(!matches(&m, "< ="));
    }

    #[test]
    fn recursive_production() {
        // nested := '[' nested? ']'
        let nested = Matcher::recursive(|this| {
            Matcher::block(BlockKind::SquareBracket, Matcher::optional(this))
        });
        assert!(matches(&nested, "[]"));
        assert!(matches(&nested, "[[[]]]"));
        assert!(!matches(&nested, "[[a]]"));
    }

    #[test]
    fn depth_budget_stops_deep_recursion() {
        let nested = Matcher::recursive(|this| {
            Matcher::block(BlockKind::Parenthesis, Matcher::optional(this))
        });
        let deep = format!("{}{}", "(".repeat(40), ")".repeat(40));
        let values = parse_component_values(&deep);

        assert!(nested.matches(&values));
        assert!(!nested.matches_with(&values, &MatchOptions { max_depth: 20 }));
    }

    #[test]
    fn clones_share_nodes() {
        let m = px();
        assert!(Matcher::ptr_eq(&m, &m.clone()));
        assert!(!Matcher::ptr_eq(&m, &px()));
    }

    #[test]
    fn matchers_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Matcher>();
    }
}
