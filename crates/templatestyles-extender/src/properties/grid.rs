//! Grid layout properties.

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::BlockKind;

use super::PropertyTableBuilder;
use crate::factory::MatcherFactory;

fn line_names(f: &MatcherFactory) -> Matcher {
    Matcher::block(BlockKind::SquareBracket, Matcher::star(f.custom_ident(&["span"])))
}

/// `<grid-line>`: `auto`, a line name, a line number or a span.
fn grid_line(f: &MatcherFactory) -> Matcher {
    let ident = f.custom_ident(&["span", "auto"]);
    Matcher::alternative(vec![
        Matcher::keyword(["auto"]),
        Matcher::unordered_all_of(vec![f.integer(), Matcher::optional(ident.clone())]),
        Matcher::unordered_all_of(vec![
            Matcher::keyword(["span"]),
            Matcher::unordered_some_of(vec![f.positive_integer(), ident.clone()]),
        ]),
        ident,
    ])
}

/// Grid properties of the base table. Track lists here take plain sizes
/// only; [`track_list`] replaces them with the full grammar.
pub(super) fn base_grid(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let breadth = Matcher::alternative(vec![
        f.length_percentage(),
        f.flex(),
        Matcher::keyword(["min-content", "max-content", "auto"]),
    ]);
    let simple_tracks = Matcher::alternative(vec![
        Matcher::keyword(["none"]),
        Matcher::plus(breadth.clone()),
    ]);
    b.set("grid-template-columns", simple_tracks.clone());
    b.set("grid-template-rows", simple_tracks);
    b.set(
        "grid-template-areas",
        Matcher::alternative(vec![Matcher::keyword(["none"]), Matcher::plus(f.string())]),
    );
    b.set("grid-auto-columns", Matcher::plus(breadth.clone()));
    b.set("grid-auto-rows", Matcher::plus(breadth));
    b.set(
        "grid-auto-flow",
        Matcher::unordered_some_of(vec![
            Matcher::keyword(["row", "column"]),
            Matcher::keyword(["dense"]),
        ]),
    );

    let line = grid_line(f);
    let slash = Matcher::delim(&['/']);
    for name in ["grid-row-start", "grid-row-end", "grid-column-start", "grid-column-end"] {
        b.set(name, line.clone());
    }
    let pair = Matcher::juxtaposition(vec![
        line.clone(),
        Matcher::optional(Matcher::juxtaposition(vec![slash.clone(), line.clone()])),
    ]);
    b.set("grid-row", pair.clone());
    b.set("grid-column", pair);
    b.set(
        "grid-area",
        Matcher::juxtaposition(vec![
            line.clone(),
            Matcher::count(Matcher::juxtaposition(vec![slash, line]), 0, 3),
        ]),
    );
}

/// The value grammar of `grid-template-columns` and `grid-template-rows`.
///
/// `none | <track-list> | <auto-track-list> | subgrid <line-name-list>? |
/// masonry`, with `var()` accepted at every track slot.
pub fn track_list(f: &MatcherFactory) -> Matcher {
    let var = f.var();
    let comma = f.comma();
    let names = Matcher::optional(line_names(f));
    let intrinsic = Matcher::keyword(["min-content", "max-content", "auto"]);

    let track_breadth = Matcher::alternative(vec![
        f.length_percentage(),
        f.flex(),
        intrinsic.clone(),
        var.clone(),
    ]);
    let inflexible_breadth = Matcher::alternative(vec![
        f.length_percentage(),
        intrinsic,
        var.clone(),
    ]);
    let fixed_breadth = f.length_percentage();

    let track_size = Matcher::alternative(vec![
        track_breadth.clone(),
        Matcher::function(
            "minmax",
            Matcher::comma_separated(vec![inflexible_breadth.clone(), track_breadth.clone()]),
        ),
        Matcher::function("fit-content", f.length_percentage()),
        var.clone(),
    ]);
    let fixed_size = Matcher::alternative(vec![
        fixed_breadth.clone(),
        Matcher::function(
            "minmax",
            Matcher::comma_separated(vec![fixed_breadth.clone(), track_breadth]),
        ),
        Matcher::function(
            "minmax",
            Matcher::comma_separated(vec![inflexible_breadth, fixed_breadth]),
        ),
        var.clone(),
    ]);

    let repeated = |count: Matcher, size: &Matcher| {
        Matcher::function(
            "repeat",
            Matcher::juxtaposition(vec![
                count,
                comma.clone(),
                Matcher::plus(Matcher::juxtaposition(vec![names.clone(), size.clone()])),
                names.clone(),
            ]),
        )
    };
    let track_repeat = repeated(
        Matcher::alternative(vec![f.positive_integer(), var.clone()]),
        &track_size,
    );
    let auto_repeat = repeated(
        Matcher::alternative(vec![Matcher::keyword(["auto-fill", "auto-fit"]), var.clone()]),
        &fixed_size,
    );
    let fixed_repeat = repeated(f.positive_integer(), &fixed_size);

    let tracks = Matcher::juxtaposition(vec![
        Matcher::plus(Matcher::juxtaposition(vec![
            names.clone(),
            Matcher::alternative(vec![track_size, track_repeat]),
        ])),
        names.clone(),
    ]);
    let fixed_tracks = Matcher::star(Matcher::juxtaposition(vec![
        names.clone(),
        Matcher::alternative(vec![fixed_size, fixed_repeat]),
    ]));
    let auto_tracks = Matcher::juxtaposition(vec![
        fixed_tracks.clone(),
        names.clone(),
        auto_repeat,
        fixed_tracks,
        names,
    ]);
    let subgrid = Matcher::juxtaposition(vec![
        Matcher::keyword(["subgrid"]),
        Matcher::star(Matcher::alternative(vec![
            line_names(f),
            Matcher::function(
                "repeat",
                Matcher::juxtaposition(vec![
                    Matcher::alternative(vec![f.positive_integer(), Matcher::keyword(["auto-fill"])]),
                    comma,
                    Matcher::plus(line_names(f)),
                ]),
            ),
        ])),
    ]);

    Matcher::alternative(vec![
        Matcher::keyword(["none", "masonry"]),
        tracks,
        auto_tracks,
        subgrid,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn tracks(css: &str) -> bool {
        track_list(&MatcherFactory::with_var_enabled(true)).matches(&parse_component_values(css))
    }

    #[test]
    fn explicit_tracks() {
        assert!(tracks("1fr 2fr"));
        assert!(tracks("[full-start] minmax(1em, 1fr) [main-start] 200px [main-end]"));
        assert!(tracks("repeat(3, 1fr)"));
        assert!(tracks("fit-content(40%) auto"));
        assert!(!tracks("-1fr"));
        assert!(!tracks("repeat(0, 1fr)"));
        assert!(!tracks("[span] 1fr"));
    }

    #[test]
    fn auto_repeat() {
        assert!(tracks("repeat(auto-fill, minmax(120px, 1fr))"));
        assert!(tracks("100px repeat(auto-fit, 200px) 100px"));
        assert!(!tracks("repeat(auto-fill, 1fr)"));
        assert!(!tracks("repeat(auto-fill, 10px) repeat(auto-fit, 10px)"));
    }

    #[test]
    fn var_tracks() {
        assert!(tracks("var(--sidebar) 1fr"));
        assert!(tracks("repeat(var(--columns), 1fr)"));
        assert!(tracks("minmax(var(--min), 1fr)"));
        assert!(!track_list(&MatcherFactory::new()).matches(&parse_component_values("var(--a) 1fr")));
    }

    #[test]
    fn subgrid_and_masonry() {
        assert!(tracks("subgrid"));
        assert!(tracks("subgrid [a] [b c]"));
        assert!(tracks("subgrid repeat(2, [a] [b])"));
        assert!(tracks("masonry"));
        assert!(!tracks("subgrid 1fr"));
    }

    #[test]
    fn base_grid_lines() {
        let factory = MatcherFactory::new();
        let mut builder = PropertyTableBuilder::new();
        base_grid(&mut builder, &factory);
        let area = builder.get("grid-area").unwrap().clone();
        let column = builder.get("grid-column").unwrap().clone();

        assert!(area.matches(&parse_component_values("1 / 2 / 3 / 4")));
        assert!(column.matches(&parse_component_values("span 2 / 5")));
        assert!(column.matches(&parse_component_values("main-start / main-end")));
        assert!(!column.matches(&parse_component_values("span 0")));
    }
}
