//! Media queries.

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::{BlockKind, TokenKind};

use super::MatcherFactory;

const MEDIA_TYPES: &[&str] = &[
    "all", "print", "screen", "speech",
    // deprecated
    "tty", "tv", "projection", "handheld", "braille", "embossed", "aural",
];

const RANGE_FEATURES: &[&str] = &[
    "width", "height", "aspect-ratio", "resolution", "color", "color-index", "monochrome",
    // deprecated
    "device-width", "device-height", "device-aspect-ratio",
];

const DISCRETE_FEATURES: &[&str] = &[
    "orientation", "scan", "grid", "update", "overflow-block", "overflow-inline", "color-gamut",
    "pointer", "hover", "any-pointer", "any-hover", "scripting", "prefers-color-scheme",
];

impl MatcherFactory {
    /// A single `<media-query>`.
    ///
    /// In strict mode only known media types and features are accepted. The
    /// lenient mode accepts any identifier there and also allows
    /// `<general-enclosed>` terms.
    pub fn css_media_query(&self, strict: bool) -> Matcher {
        let key = if strict { "media-query:strict" } else { "media-query:lenient" };
        self.cached(key, || self.build_media_query(strict))
    }

    /// `<media-query-list>`: comma separated media queries.
    pub fn css_media_query_list(&self, strict: bool) -> Matcher {
        let key = if strict { "media-query-list:strict" } else { "media-query-list:lenient" };
        self.cached(key, || Matcher::hash_list(self.css_media_query(strict)))
    }

    fn build_media_query(&self, strict: bool) -> Matcher {
        let (general_enclosed, media_type, feature_name) = if strict {
            let mut names: Vec<String> = vec![];
            for feature in RANGE_FEATURES {
                names.push((*feature).to_string());
                names.push(format!("min-{feature}"));
                names.push(format!("max-{feature}"));
            }
            names.extend(DISCRETE_FEATURES.iter().map(|f| (*f).to_string()));
            (Matcher::nothing(), Matcher::keyword(MEDIA_TYPES), Matcher::keyword(names))
        } else {
            let anything = Matcher::anything_plus();
            let general = Matcher::alternative(vec![
                Matcher::any_function(anything.clone()),
                Matcher::block(
                    BlockKind::Parenthesis,
                    Matcher::juxtaposition(vec![self.ident(), anything]),
                ),
            ]);
            (general, self.ident(), self.ident())
        };

        let feature = self.media_feature(feature_name);

        let media_in_parens = Matcher::recursive(|in_parens| {
            let condition = media_condition(&in_parens);
            Matcher::alternative(vec![
                Matcher::block(BlockKind::Parenthesis, condition),
                feature,
                general_enclosed,
            ])
        });

        let condition_without_or = Matcher::alternative(vec![
            Matcher::juxtaposition(vec![Matcher::keyword(["not"]), media_in_parens.clone()]),
            Matcher::juxtaposition(vec![
                media_in_parens.clone(),
                Matcher::star(Matcher::juxtaposition(vec![
                    Matcher::keyword(["and"]),
                    media_in_parens.clone(),
                ])),
            ]),
        ]);

        Matcher::alternative(vec![
            media_condition(&media_in_parens),
            Matcher::juxtaposition(vec![
                Matcher::optional(Matcher::keyword(["not", "only"])),
                media_type,
                Matcher::optional(Matcher::juxtaposition(vec![
                    Matcher::keyword(["and"]),
                    condition_without_or,
                ])),
            ]),
        ])
    }

    /// `( <mf-plain> | <mf-boolean> | <mf-range> )`
    fn media_feature(&self, name: Matcher) -> Matcher {
        let eq = Matcher::delim(&['=']);
        let or_eq = Matcher::optional(Matcher::juxtaposition(vec![Matcher::no_whitespace(), eq.clone()]));
        let comparison = Matcher::alternative(vec![
            eq,
            Matcher::juxtaposition(vec![Matcher::delim(&['<', '>']), or_eq.clone()]),
        ]);
        let less = Matcher::juxtaposition(vec![Matcher::delim(&['<']), or_eq.clone()]);
        let greater = Matcher::juxtaposition(vec![Matcher::delim(&['>']), or_eq]);

        let ratio_part = self.unsigned_integer();
        let value = Matcher::alternative(vec![
            self.number(),
            self.dimension(),
            self.ident(),
            Matcher::keyword(["light", "dark"]),
            Matcher::juxtaposition(vec![ratio_part.clone(), Matcher::delim(&['/']), ratio_part]),
        ]);

        let range = |op: Matcher| {
            Matcher::juxtaposition(vec![value.clone(), op.clone(), name.clone(), op, value.clone()])
        };

        Matcher::block(
            BlockKind::Parenthesis,
            Matcher::alternative(vec![
                Matcher::juxtaposition(vec![name.clone(), Matcher::token(TokenKind::Colon), value.clone()]),
                name.clone(),
                Matcher::juxtaposition(vec![name.clone(), comparison.clone(), value.clone()]),
                Matcher::juxtaposition(vec![value.clone(), comparison, name.clone()]),
                range(less),
                range(greater),
            ]),
        )
    }
}

/// `not <in-parens> | <in-parens> [ [and <in-parens>]* | [or <in-parens>]* ]`
fn media_condition(in_parens: &Matcher) -> Matcher {
    let chained = |keyword: &str| {
        Matcher::star(Matcher::juxtaposition(vec![Matcher::keyword([keyword]), in_parens.clone()]))
    };
    Matcher::alternative(vec![
        Matcher::juxtaposition(vec![Matcher::keyword(["not"]), in_parens.clone()]),
        Matcher::juxtaposition(vec![
            in_parens.clone(),
            Matcher::alternative(vec![chained("and"), chained("or")]),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn strict(css: &str) -> bool {
        MatcherFactory::new()
            .css_media_query(true)
            .matches(&parse_component_values(css))
    }

    #[test]
    fn and_conditions() {
        assert!(strict("(min-width: 500px) and (max-width: 900px)"));
        assert!(!strict("(min-width: 500px) and"));
        assert!(!strict("(min-width: 500px) and (max-width: 900px) or (color)"));
    }

    #[test]
    fn media_types() {
        assert!(strict("screen"));
        assert!(strict("only screen and (orientation: landscape)"));
        assert!(strict("not print"));
        assert!(!strict("hologram"));
        assert!(!strict("screen or (color)"));
    }

    #[test]
    fn nested_conditions() {
        assert!(strict("not (hover)"));
        assert!(strict("((min-width: 10em) or (pointer: coarse)) and (color)"));
        assert!(strict("(prefers-color-scheme: dark)"));
    }

    #[test]
    fn range_syntax() {
        assert!(strict("(width >= 600px)"));
        assert!(strict("(400px < width <= 700px)"));
        assert!(strict("(aspect-ratio: 16/9)"));
        assert!(!strict("(400px < width > 700px)"));
        assert!(!strict("(width 600px)"));
        assert!(!strict("(width > = 600px)"));
    }

    #[test]
    fn lenient_mode_accepts_unknown_features() {
        let factory = MatcherFactory::new();
        let lenient = factory.css_media_query(false);
        let values = parse_component_values("(future-feature: on) and custom(anything here)");
        assert!(lenient.matches(&values));
        assert!(!factory.css_media_query(true).matches(&values));
    }

    #[test]
    fn query_lists() {
        let factory = MatcherFactory::new();
        let list = factory.css_media_query_list(true);
        assert!(list.matches(&parse_component_values("screen, print and (color)")));
        assert!(!list.matches(&parse_component_values("screen,")));
    }
}
