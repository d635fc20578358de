//! Custom property references.

use templatestyles_grammar::matcher::Matcher;

use super::{BORDER_STYLES, MatcherFactory};

impl MatcherFactory {
    /// `var( <custom-property-name> [, <fallback>]? )`.
    ///
    /// Without `var()` support this is [`Matcher::nothing`], so grammars that
    /// offer a `var()` alternative keep their shape but never take it.
    pub fn var(&self) -> Matcher {
        let Some(fallback) = self.fallback.as_deref() else {
            return self.cached("var", Matcher::nothing);
        };
        self.cached("var", || {
            let recognized = fallback.recognized_value();
            Matcher::recursive(|var| {
                Matcher::function(
                    "var",
                    Matcher::juxtaposition(vec![
                        Matcher::var_name(),
                        Matcher::optional(Matcher::juxtaposition(vec![
                            self.comma(),
                            Matcher::star(Matcher::alternative(vec![recognized, var])),
                        ])),
                    ]),
                )
            })
        })
    }

    /// Any single recognized value: the vocabulary that may surround a
    /// `var()` reference in an otherwise unparsed declaration.
    pub fn recognized_value(&self) -> Matcher {
        self.cached("recognized-value", || {
            Matcher::alternative(vec![
                self.color(),
                self.image(),
                self.length(),
                self.integer(),
                self.percentage(),
                self.number(),
                self.angle(),
                self.frequency(),
                self.resolution(),
                self.time(),
                self.position(),
                self.timing_function(),
                self.comma(),
                self.css_wide_keywords(),
                Matcher::keyword(BORDER_STYLES),
            ])
        })
    }

    /// Catch-all grammar for declarations whose value contains `var()`:
    /// recognized values with at least one `var()` among them, optionally
    /// followed by `!important`.
    pub fn var_catch_all(&self) -> Matcher {
        self.cached("var-catch-all", || {
            let recognized = self.recognized_value();
            Matcher::juxtaposition(vec![
                Matcher::star(recognized.clone()),
                Matcher::plus(Matcher::juxtaposition(vec![
                    self.var(),
                    Matcher::star(recognized),
                ])),
                Matcher::optional(Matcher::juxtaposition(vec![
                    Matcher::delim(&['!']),
                    Matcher::keyword(["important"]),
                ])),
            ])
        })
    }
}
