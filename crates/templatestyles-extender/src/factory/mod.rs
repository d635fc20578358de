//! Named grammar productions.
//!
//! [`MatcherFactory`] builds every value grammar the sanitizers use. Each
//! production is built once per factory and memoized under its name, so
//! repeated calls return the same shared matcher.
//!
//! # Custom properties
//!
//! A factory created with `var()` support accepts `var(--name)` at the slots
//! that allow it (color channels, grid tracks, calc leaves). Without it,
//! [`MatcherFactory::var`] is a matcher that never matches, so grammars keep
//! their shape but reject every substitution.
//!
//! ```ignore
//! let factory = MatcherFactory::with_var_enabled(true);
//! let values = parse_component_values("rgb(var(--r), 0, 0)");
//! assert!(factory.color().matches(&values));
//! ```

mod color;
mod media;
mod var;

use templatestyles_grammar::matcher::{Matcher, MatcherCache};
use templatestyles_grammar::value::{BlockKind, Token, TokenKind};

use crate::targets;

/// Length units accepted by [`MatcherFactory::length`].
pub const LENGTH_UNITS: &[&str] = &[
    "px", "cm", "mm", "q", "in", "pt", "pc", "em", "rem", "ex", "rex", "cap", "rcap", "ch", "rch",
    "ic", "ric", "lh", "rlh", "vw", "svw", "lvw", "dvw", "vh", "svh", "lvh", "dvh", "vi", "svi",
    "lvi", "dvi", "vb", "svb", "lvb", "dvb", "vmin", "svmin", "lvmin", "dvmin", "vmax", "svmax",
    "lvmax", "dvmax", "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
];

const ANGLE_UNITS: &[&str] = &["deg", "grad", "rad", "turn"];
const TIME_UNITS: &[&str] = &["s", "ms"];
const FREQUENCY_UNITS: &[&str] = &["hz", "khz"];
const RESOLUTION_UNITS: &[&str] = &["dpi", "dpcm", "dppx", "x"];

/// Line styles shared by `border-style` and the `var()` catch-all.
pub const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

/// Builds and memoizes grammar productions.
#[derive(Debug)]
pub struct MatcherFactory {
    var_enabled: bool,
    cache: MatcherCache,
    /// A `var()`-free twin used for fallback values inside `var()`.
    fallback: Option<Box<MatcherFactory>>,
}

impl MatcherFactory {
    /// Create a factory without `var()` support.
    pub fn new() -> Self {
        Self::with_var_enabled(false)
    }

    /// Create a factory, optionally accepting `var()` substitutions.
    pub fn with_var_enabled(var_enabled: bool) -> Self {
        Self {
            var_enabled,
            cache: MatcherCache::new(),
            fallback: var_enabled.then(|| Box::new(Self::new())),
        }
    }

    /// Whether `var()` substitutions are accepted.
    pub fn var_enabled(&self) -> bool {
        self.var_enabled
    }

    /// Number of productions built so far.
    pub fn cached_productions(&self) -> usize {
        self.cache.len()
    }

    fn cached<F>(&self, key: &str, build: F) -> Matcher
    where
        F: FnOnce() -> Matcher,
    {
        self.cache.get_or_build(key, || {
            tracing::trace!(target: targets::FACTORY, production = key, var = self.var_enabled, "building production");
            build()
        })
    }

    /// `inner` or a `var()` reference.
    pub fn or_var(&self, inner: Matcher) -> Matcher {
        Matcher::alternative(vec![self.var(), inner])
    }

    // === Keywords and identifiers ===

    /// CSS-wide keywords.
    pub fn css_wide_keywords(&self) -> Matcher {
        self.cached("css-wide-keywords", || {
            Matcher::keyword(["initial", "inherit", "unset", "revert", "revert-layer"])
        })
    }

    pub fn ident(&self) -> Matcher {
        self.cached("ident", || Matcher::token(TokenKind::Ident))
    }

    /// A `<custom-ident>`: any identifier except CSS-wide keywords, `default`
    /// and `exclusions`.
    pub fn custom_ident(&self, exclusions: &[&str]) -> Matcher {
        let key = format!("custom-ident:{}", exclusions.join(","));
        self.cached(&key, || {
            let mut excluded: Vec<String> = ["initial", "inherit", "unset", "revert", "revert-layer", "default"]
                .iter()
                .chain(exclusions)
                .map(|s| s.to_ascii_lowercase())
                .collect();
            excluded.sort();
            Matcher::token_where(TokenKind::Ident, move |t| {
                excluded.binary_search(&t.value().to_ascii_lowercase()).is_err()
            })
        })
    }

    pub fn string(&self) -> Matcher {
        self.cached("string", || Matcher::token(TokenKind::String))
    }

    /// `url(...)`, quoted or not.
    pub fn url(&self) -> Matcher {
        self.cached("url", || {
            Matcher::alternative(vec![
                Matcher::token(TokenKind::Url),
                Matcher::function("url", self.string()),
            ])
        })
    }

    pub fn comma(&self) -> Matcher {
        self.cached("comma", || Matcher::token(TokenKind::Comma))
    }

    // === Numbers and dimensions ===

    pub fn number(&self) -> Matcher {
        self.cached("number", || {
            Matcher::alternative(vec![Matcher::token(TokenKind::Number), self.calc()])
        })
    }

    pub fn non_negative_number(&self) -> Matcher {
        self.cached("non-negative-number", || {
            Matcher::alternative(vec![
                Matcher::token_where(TokenKind::Number, |t| numeric_value(t) >= 0.0),
                self.calc(),
            ])
        })
    }

    pub fn integer(&self) -> Matcher {
        self.cached("integer", || {
            Matcher::alternative(vec![
                Matcher::token_where(TokenKind::Number, |t| int_value(t).is_some()),
                self.calc(),
            ])
        })
    }

    /// An integer of at least one, as required by `repeat()` counts.
    pub fn positive_integer(&self) -> Matcher {
        self.cached("positive-integer", || {
            Matcher::alternative(vec![
                Matcher::token_where(TokenKind::Number, |t| int_value(t).is_some_and(|i| i >= 1)),
                self.calc(),
            ])
        })
    }

    /// An integer written without a minus sign, as used in ratios.
    pub fn unsigned_integer(&self) -> Matcher {
        self.cached("unsigned-integer", || {
            Matcher::alternative(vec![
                Matcher::token_where(TokenKind::Number, |t| {
                    int_value(t).is_some() && !t.representation().starts_with('-')
                }),
                self.calc(),
            ])
        })
    }

    pub fn percentage(&self) -> Matcher {
        self.cached("percentage", || {
            Matcher::alternative(vec![Matcher::token(TokenKind::Percentage), self.calc()])
        })
    }

    /// `<number> | <percentage>`, the shape of an alpha channel.
    pub fn alpha_value(&self) -> Matcher {
        self.cached("alpha-value", || {
            Matcher::alternative(vec![self.number(), self.percentage()])
        })
    }

    /// Any dimension token, whatever its unit.
    pub fn dimension(&self) -> Matcher {
        self.cached("dimension", || Matcher::token(TokenKind::Dimension))
    }

    pub fn length(&self) -> Matcher {
        self.cached("length", || {
            Matcher::alternative(vec![
                unit_matcher(LENGTH_UNITS),
                Matcher::token_where(TokenKind::Number, |t| numeric_value(t) == 0.0),
                self.calc(),
            ])
        })
    }

    pub fn non_negative_length(&self) -> Matcher {
        self.cached("non-negative-length", || {
            Matcher::alternative(vec![
                Matcher::token_where(TokenKind::Dimension, |t| {
                    has_unit(t, LENGTH_UNITS) && numeric_value(t) >= 0.0
                }),
                Matcher::token_where(TokenKind::Number, |t| numeric_value(t) == 0.0),
                self.calc(),
            ])
        })
    }

    pub fn length_percentage(&self) -> Matcher {
        self.cached("length-percentage", || {
            Matcher::alternative(vec![self.length(), self.percentage()])
        })
    }

    pub fn non_negative_length_percentage(&self) -> Matcher {
        self.cached("non-negative-length-percentage", || {
            Matcher::alternative(vec![
                self.non_negative_length(),
                Matcher::token_where(TokenKind::Percentage, |t| numeric_value(t) >= 0.0),
            ])
        })
    }

    pub fn angle(&self) -> Matcher {
        self.cached("angle", || {
            Matcher::alternative(vec![unit_matcher(ANGLE_UNITS), self.calc()])
        })
    }

    pub fn angle_percentage(&self) -> Matcher {
        self.cached("angle-percentage", || {
            Matcher::alternative(vec![self.angle(), self.percentage()])
        })
    }

    /// `<hue>`: a number of degrees or an angle.
    pub fn hue(&self) -> Matcher {
        self.cached("hue", || Matcher::alternative(vec![self.number(), self.angle()]))
    }

    pub fn time(&self) -> Matcher {
        self.cached("time", || {
            Matcher::alternative(vec![unit_matcher(TIME_UNITS), self.calc()])
        })
    }

    pub fn frequency(&self) -> Matcher {
        self.cached("frequency", || {
            Matcher::alternative(vec![unit_matcher(FREQUENCY_UNITS), self.calc()])
        })
    }

    pub fn resolution(&self) -> Matcher {
        self.cached("resolution", || {
            Matcher::alternative(vec![unit_matcher(RESOLUTION_UNITS), self.calc()])
        })
    }

    /// `<flex>`: a non-negative `fr` dimension.
    pub fn flex(&self) -> Matcher {
        self.cached("flex", || {
            Matcher::token_where(TokenKind::Dimension, |t| {
                has_unit(t, &["fr"]) && numeric_value(t) >= 0.0
            })
        })
    }

    /// `<ratio>`: `<number> [ / <number> ]?`.
    pub fn ratio(&self) -> Matcher {
        self.cached("ratio", || {
            let n = self.non_negative_number();
            Matcher::juxtaposition(vec![
                n.clone(),
                Matcher::optional(Matcher::juxtaposition(vec![Matcher::delim(&['/']), n])),
            ])
        })
    }

    // === Math functions ===

    /// `calc()`, `min()`, `max()` and `clamp()` over numeric leaves.
    ///
    /// Units are not type-checked across the expression.
    pub fn calc(&self) -> Matcher {
        self.cached("calc", || self.calc_functions(None))
    }

    /// Math functions whose leaves may also be one of `keywords`, as in
    /// relative color channels (`calc(r * 0.5)`).
    pub fn calc_with_keywords(&self, keywords: &[&str]) -> Matcher {
        let key = format!("calc:{}", keywords.join(","));
        self.cached(&key, || self.calc_functions(Some(Matcher::keyword(keywords))))
    }

    fn calc_functions(&self, extra_leaf: Option<Matcher>) -> Matcher {
        let var = self.var();
        Matcher::recursive(move |functions| {
            let sum = Matcher::recursive(|sum| {
                let mut leaves = vec![
                    Matcher::token(TokenKind::Number),
                    Matcher::token(TokenKind::Dimension),
                    Matcher::token(TokenKind::Percentage),
                    Matcher::keyword(["e", "pi", "infinity", "-infinity", "nan"]),
                    var,
                    functions,
                    Matcher::block(BlockKind::Parenthesis, sum),
                ];
                leaves.extend(extra_leaf);
                let leaf = Matcher::alternative(leaves);
                let product = Matcher::juxtaposition(vec![
                    leaf.clone(),
                    Matcher::star(Matcher::juxtaposition(vec![Matcher::delim(&['*', '/']), leaf])),
                ]);
                Matcher::juxtaposition(vec![
                    product.clone(),
                    Matcher::star(Matcher::juxtaposition(vec![Matcher::delim(&['+', '-']), product])),
                ])
            });
            Matcher::alternative(vec![
                Matcher::function("calc", sum.clone()),
                Matcher::function("min", Matcher::hash_list(sum.clone())),
                Matcher::function("max", Matcher::hash_list(sum.clone())),
                Matcher::function("clamp", Matcher::hash(sum, 3, 3)),
            ])
        })
    }

    // === Composite values ===

    /// `<position>` in its one to four value forms.
    pub fn position(&self) -> Matcher {
        self.cached("position", || {
            Matcher::count(
                Matcher::alternative(vec![
                    Matcher::keyword(["left", "center", "right", "top", "bottom"]),
                    self.length_percentage(),
                ]),
                1,
                4,
            )
        })
    }

    /// `<easing-function>`.
    pub fn timing_function(&self) -> Matcher {
        self.cached("timing-function", || {
            Matcher::alternative(vec![
                Matcher::keyword([
                    "ease", "linear", "ease-in", "ease-out", "ease-in-out", "step-start", "step-end",
                ]),
                Matcher::function("cubic-bezier", Matcher::hash(self.number(), 4, 4)),
                Matcher::function(
                    "steps",
                    Matcher::juxtaposition(vec![
                        self.positive_integer(),
                        Matcher::optional(Matcher::juxtaposition(vec![
                            self.comma(),
                            Matcher::keyword([
                                "jump-start", "jump-end", "jump-none", "jump-both", "start", "end",
                            ]),
                        ])),
                    ]),
                ),
                Matcher::function(
                    "linear",
                    Matcher::hash_list(Matcher::juxtaposition(vec![
                        self.number(),
                        Matcher::count(self.percentage(), 0, 2),
                    ])),
                ),
            ])
        })
    }

    /// `<image>`: a url or a gradient.
    pub fn image(&self) -> Matcher {
        self.cached("image", || {
            let stop = Matcher::plus(Matcher::alternative(vec![
                self.color(),
                self.length_percentage(),
                self.angle(),
                Matcher::keyword([
                    "to", "at", "from", "in", "left", "right", "top", "bottom", "center", "circle",
                    "ellipse", "closest-side", "closest-corner", "farthest-side", "farthest-corner",
                    "srgb", "srgb-linear", "oklab", "oklch", "lab", "lch", "hsl", "hwb", "shorter",
                    "longer", "increasing", "decreasing", "hue",
                ]),
            ]));
            let gradient_args = Matcher::hash_list(stop);
            let mut options = vec![self.url()];
            for name in [
                "linear-gradient",
                "radial-gradient",
                "conic-gradient",
                "repeating-linear-gradient",
                "repeating-radial-gradient",
                "repeating-conic-gradient",
            ] {
                options.push(Matcher::function(name, gradient_args.clone()));
            }
            Matcher::alternative(options)
        })
    }

    /// One CSS filter function, as used by `filter` and `backdrop-filter`.
    pub fn filter_function(&self) -> Matcher {
        self.cached("filter-function", || {
            let amount = Matcher::optional(Matcher::alternative(vec![
                self.non_negative_number(),
                self.percentage(),
            ]));
            let mut options = vec![
                Matcher::function("blur", Matcher::optional(self.non_negative_length())),
                Matcher::function("hue-rotate", Matcher::optional(self.angle())),
                Matcher::function(
                    "drop-shadow",
                    Matcher::unordered_all_of(vec![
                        Matcher::optional(self.color()),
                        Matcher::count(self.length(), 2, 3),
                    ]),
                ),
            ];
            for name in [
                "brightness", "contrast", "grayscale", "invert", "opacity", "saturate", "sepia",
            ] {
                options.push(Matcher::function(name, amount.clone()));
            }
            Matcher::alternative(options)
        })
    }

    /// `none | [ <filter-function> | <url> ]+`.
    pub fn filter_list(&self) -> Matcher {
        self.cached("filter-list", || {
            Matcher::alternative(vec![
                Matcher::keyword(["none"]),
                Matcher::plus(Matcher::alternative(vec![self.filter_function(), self.url()])),
            ])
        })
    }
}

impl Default for MatcherFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_value(token: &Token) -> f32 {
    token.numeric().map_or(f32::NAN, |n| n.value)
}

fn int_value(token: &Token) -> Option<i32> {
    token.numeric().and_then(|n| n.int_value)
}

fn has_unit(token: &Token, units: &[&str]) -> bool {
    token
        .unit()
        .is_some_and(|unit| units.iter().any(|u| u.eq_ignore_ascii_case(unit)))
}

fn unit_matcher(units: &'static [&'static str]) -> Matcher {
    Matcher::token_where(TokenKind::Dimension, move |t| has_unit(t, units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn accepts(matcher: &Matcher, css: &str) -> bool {
        matcher.matches(&parse_component_values(css))
    }

    #[test]
    fn productions_are_memoized() {
        let factory = MatcherFactory::new();
        let first = factory.length_percentage();
        let built = factory.cached_productions();

        assert!(Matcher::ptr_eq(&first, &factory.length_percentage()));
        assert_eq!(factory.cached_productions(), built);
    }

    #[test]
    fn lengths() {
        let f = MatcherFactory::new();
        let length = f.length();
        assert!(accepts(&length, "10px"));
        assert!(accepts(&length, "1.5EM"));
        assert!(accepts(&length, "0"));
        assert!(!accepts(&length, "10"));
        assert!(!accepts(&length, "10deg"));
        assert!(!accepts(&length, "10%"));
        assert!(accepts(&f.length_percentage(), "10%"));
        assert!(!accepts(&f.non_negative_length(), "-1px"));
    }

    #[test]
    fn integers() {
        let f = MatcherFactory::new();
        assert!(accepts(&f.integer(), "-3"));
        assert!(!accepts(&f.integer(), "1.5"));
        assert!(accepts(&f.positive_integer(), "2"));
        assert!(!accepts(&f.positive_integer(), "0"));
        assert!(!accepts(&f.positive_integer(), "-2"));
    }

    #[test]
    fn flex_rejects_negative() {
        let f = MatcherFactory::new();
        assert!(accepts(&f.flex(), "1fr"));
        assert!(accepts(&f.flex(), "0.5FR"));
        assert!(!accepts(&f.flex(), "-1fr"));
        assert!(!accepts(&f.flex(), "1px"));
    }

    #[test]
    fn calc_expressions() {
        let f = MatcherFactory::new();
        let length = f.length();
        assert!(accepts(&length, "calc(100% - 2 * 1em)"));
        assert!(accepts(&length, "min(10px, 5vw)"));
        assert!(accepts(&length, "clamp(1rem, 2.5vw, 2rem)"));
        assert!(accepts(&length, "calc((1px + 2px) * 3)"));
        assert!(!accepts(&length, "calc(1px +)"));
        assert!(!accepts(&length, "clamp(1px, 2px)"));
        assert!(!accepts(&length, "calc(red)"));
    }

    #[test]
    fn calc_accepts_var_only_when_enabled() {
        let css = "calc(var(--gap) * 2)";
        assert!(!accepts(&MatcherFactory::new().length(), css));
        assert!(accepts(&MatcherFactory::with_var_enabled(true).length(), css));
    }

    #[test]
    fn custom_ident_exclusions() {
        let f = MatcherFactory::new();
        let ident = f.custom_ident(&["span"]);
        assert!(accepts(&ident, "header"));
        assert!(!accepts(&ident, "span"));
        assert!(!accepts(&ident, "inherit"));
    }

    #[test]
    fn timing_functions() {
        let f = MatcherFactory::new();
        let timing = f.timing_function();
        assert!(accepts(&timing, "ease-in-out"));
        assert!(accepts(&timing, "cubic-bezier(0.1, 0.7, 1.0, 0.1)"));
        assert!(accepts(&timing, "steps(4, jump-end)"));
        assert!(!accepts(&timing, "steps(0)"));
    }

    #[test]
    fn images() {
        let f = MatcherFactory::new();
        assert!(accepts(&f.image(), "url(foo.png)"));
        assert!(accepts(&f.image(), "url('foo.png')"));
        assert!(accepts(&f.image(), "linear-gradient(to right, red 0%, #00f 100%)"));
        assert!(!accepts(&f.image(), "linear-gradient(to right, javascript)"));
    }

    #[test]
    fn filters() {
        let f = MatcherFactory::new();
        let filters = f.filter_list();
        assert!(accepts(&filters, "blur(4px) brightness(60%)"));
        assert!(accepts(&filters, "drop-shadow(2px 2px 4px black)"));
        assert!(accepts(&filters, "none"));
        assert!(!accepts(&filters, "blur(red)"));
    }
}
