//! The base property table the extensions build on.

use templatestyles_grammar::matcher::Matcher;

use super::{PropertyTable, PropertyTableBuilder, grid};
use crate::factory::{BORDER_STYLES, MatcherFactory};

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Build the base table.
pub fn base_table(f: &MatcherFactory) -> PropertyTable {
    let mut b = PropertyTable::builder();
    box_model(&mut b, f);
    backgrounds_and_borders(&mut b, f);
    text(&mut b, f);
    fonts(&mut b, f);
    sizing(&mut b, f);
    layout(&mut b, f);
    flexbox(&mut b, f);
    grid::base_grid(&mut b, f);
    masking(&mut b, f);
    effects(&mut b, f);
    b.build()
}

fn keywords(words: &[&str]) -> Matcher {
    Matcher::keyword(words)
}

fn one_to_four(value: Matcher) -> Matcher {
    Matcher::count(value, 1, 4)
}

fn box_model(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let margin = Matcher::alternative(vec![f.length_percentage(), keywords(&["auto"])]);
    let padding = f.non_negative_length_percentage();

    b.set("margin", one_to_four(margin.clone()));
    b.set("padding", one_to_four(padding.clone()));
    for side in SIDES {
        b.set(&format!("margin-{side}"), margin.clone());
        b.set(&format!("padding-{side}"), padding.clone());
    }
}

fn backgrounds_and_borders(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let image_or_none = Matcher::alternative(vec![keywords(&["none"]), f.image()]);
    let repeat = Matcher::alternative(vec![
        keywords(&["repeat-x", "repeat-y"]),
        Matcher::count(keywords(&["repeat", "space", "round", "no-repeat"]), 1, 2),
    ]);
    let size = Matcher::alternative(vec![
        Matcher::count(
            Matcher::alternative(vec![f.non_negative_length_percentage(), keywords(&["auto"])]),
            1,
            2,
        ),
        keywords(&["cover", "contain"]),
    ]);
    let attachment = keywords(&["scroll", "fixed", "local"]);
    let box_keyword = keywords(&["border-box", "padding-box", "content-box"]);

    b.set("background-color", f.color());
    b.set("background-image", Matcher::hash_list(image_or_none.clone()));
    b.set("background-repeat", Matcher::hash_list(repeat.clone()));
    b.set("background-position", Matcher::hash_list(f.position()));
    b.set("background-size", Matcher::hash_list(size.clone()));
    b.set("background-attachment", Matcher::hash_list(attachment.clone()));
    b.set("background-clip", Matcher::hash_list(box_keyword.clone()));
    b.set("background-origin", Matcher::hash_list(box_keyword.clone()));
    b.set(
        "background",
        Matcher::hash_list(Matcher::unordered_some_of(vec![
            image_or_none,
            Matcher::juxtaposition(vec![
                f.position(),
                Matcher::optional(Matcher::juxtaposition(vec![Matcher::delim(&['/']), size])),
            ]),
            repeat,
            attachment,
            box_keyword,
            f.color(),
        ])),
    );

    let style = keywords(BORDER_STYLES);
    let width = Matcher::alternative(vec![
        keywords(&["thin", "medium", "thick"]),
        f.non_negative_length(),
    ]);
    let side = Matcher::unordered_some_of(vec![style.clone(), width.clone(), f.color()]);

    b.set("border-style", one_to_four(style.clone()));
    b.set("border-width", one_to_four(width.clone()));
    b.set("border-color", one_to_four(f.color()));
    b.set("border", side.clone());
    for name in SIDES {
        b.set(&format!("border-{name}"), side.clone());
        b.set(&format!("border-{name}-style"), style.clone());
        b.set(&format!("border-{name}-width"), width.clone());
        b.set(&format!("border-{name}-color"), f.color());
    }
    b.set("outline", Matcher::unordered_some_of(vec![style, width, f.color()]));
    b.set("outline-offset", f.length());

    let radius = f.non_negative_length_percentage();
    b.set(
        "border-radius",
        Matcher::juxtaposition(vec![
            one_to_four(radius.clone()),
            Matcher::optional(Matcher::juxtaposition(vec![
                Matcher::delim(&['/']),
                one_to_four(radius.clone()),
            ])),
        ]),
    );
    for corner in ["top-left", "top-right", "bottom-right", "bottom-left"] {
        b.set(&format!("border-{corner}-radius"), Matcher::count(radius.clone(), 1, 2));
    }
    b.set("border-collapse", keywords(&["collapse", "separate"]));
    b.set("border-spacing", Matcher::count(f.non_negative_length(), 1, 2));

    b.set(
        "box-shadow",
        Matcher::alternative(vec![
            keywords(&["none"]),
            Matcher::hash_list(shadow(f, true)),
        ]),
    );
}

/// One shadow of `box-shadow` or `text-shadow`.
pub(super) fn shadow(f: &MatcherFactory, inset: bool) -> Matcher {
    let mut parts = vec![];
    if inset {
        parts.push(Matcher::optional(keywords(&["inset"])));
    }
    parts.push(Matcher::count(f.length(), 2, if inset { 4 } else { 3 }));
    parts.push(Matcher::optional(f.color()));
    Matcher::unordered_all_of(parts)
}

fn text(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    b.set("color", f.color());
    b.set(
        "text-align",
        keywords(&["start", "end", "left", "right", "center", "justify", "match-parent"]),
    );
    let line = Matcher::alternative(vec![
        keywords(&["none"]),
        Matcher::unordered_some_of(vec![
            keywords(&["underline"]),
            keywords(&["overline"]),
            keywords(&["line-through"]),
        ]),
    ]);
    let decoration_style = keywords(&["solid", "double", "dotted", "dashed", "wavy"]);
    b.set("text-decoration-line", line.clone());
    b.set("text-decoration-style", decoration_style.clone());
    b.set("text-decoration-color", f.color());
    b.set(
        "text-decoration",
        Matcher::unordered_some_of(vec![line, decoration_style, f.color()]),
    );
    b.set(
        "text-transform",
        keywords(&["none", "capitalize", "uppercase", "lowercase", "full-width"]),
    );
    b.set("text-indent", f.length_percentage());
    b.set("text-overflow", keywords(&["clip", "ellipsis"]));
    b.set(
        "text-shadow",
        Matcher::alternative(vec![keywords(&["none"]), Matcher::hash_list(shadow(f, false))]),
    );
    let spacing = Matcher::alternative(vec![keywords(&["normal"]), f.length()]);
    b.set("letter-spacing", spacing.clone());
    b.set("word-spacing", spacing);
    b.set(
        "white-space",
        keywords(&["normal", "pre", "nowrap", "pre-wrap", "break-spaces", "pre-line"]),
    );
    b.set("word-break", keywords(&["normal", "keep-all", "break-all", "break-word"]));
    b.set("overflow-wrap", keywords(&["normal", "break-word"]));
    b.set("word-wrap", keywords(&["normal", "break-word"]));
    b.set("hyphens", keywords(&["none", "manual", "auto"]));
    b.set(
        "line-height",
        Matcher::alternative(vec![
            keywords(&["normal"]),
            f.non_negative_number(),
            f.non_negative_length_percentage(),
        ]),
    );
    b.set(
        "vertical-align",
        Matcher::alternative(vec![
            keywords(&[
                "baseline", "sub", "super", "text-top", "text-bottom", "middle", "top", "bottom",
            ]),
            f.length_percentage(),
        ]),
    );
    b.set("direction", keywords(&["ltr", "rtl"]));
    b.set(
        "writing-mode",
        keywords(&["horizontal-tb", "vertical-rl", "vertical-lr", "sideways-rl", "sideways-lr"]),
    );
}

fn fonts(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let family = Matcher::hash_list(Matcher::alternative(vec![
        f.string(),
        Matcher::plus(f.ident()),
    ]));
    let size = Matcher::alternative(vec![
        keywords(&[
            "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
            "larger", "smaller",
        ]),
        f.non_negative_length_percentage(),
    ]);
    let weight = Matcher::alternative(vec![
        keywords(&["normal", "bold", "bolder", "lighter"]),
        f.number(),
    ]);

    b.set("font-family", family);
    b.set("font-size", size);
    b.set("font-weight", weight);
    b.set(
        "font-style",
        Matcher::alternative(vec![
            keywords(&["normal", "italic"]),
            Matcher::juxtaposition(vec![keywords(&["oblique"]), Matcher::optional(f.angle())]),
        ]),
    );
    b.set("font-variant", keywords(&["normal", "small-caps", "none"]));
    b.set(
        "font-stretch",
        Matcher::alternative(vec![
            keywords(&[
                "normal", "ultra-condensed", "extra-condensed", "condensed", "semi-condensed",
                "semi-expanded", "expanded", "extra-expanded", "ultra-expanded",
            ]),
            f.percentage(),
        ]),
    );
}

/// Value grammar of the sizing properties: `keyword`, a length or
/// percentage, the intrinsic keywords, `fit-content()` and `additions`.
pub fn sizing_value(f: &MatcherFactory, keyword: &str, additions: &[Matcher]) -> Matcher {
    let mut options = vec![
        keywords(&[keyword]),
        f.non_negative_length_percentage(),
        keywords(&["min-content", "max-content"]),
        Matcher::function("fit-content", f.length_percentage()),
    ];
    options.extend(additions.iter().cloned());
    Matcher::alternative(options)
}

/// Sizing property names and the keyword each accepts besides lengths.
pub(super) const SIZING_PROPERTIES: &[(&str, &str)] = &[
    ("width", "auto"),
    ("height", "auto"),
    ("min-width", "auto"),
    ("min-height", "auto"),
    ("max-width", "none"),
    ("max-height", "none"),
    ("inline-size", "auto"),
    ("block-size", "auto"),
    ("min-inline-size", "auto"),
    ("min-block-size", "auto"),
    ("max-inline-size", "none"),
    ("max-block-size", "none"),
];

fn sizing(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    for (name, keyword) in SIZING_PROPERTIES {
        b.set(name, sizing_value(f, keyword, &[]));
    }
    b.set("box-sizing", keywords(&["content-box", "border-box"]));
}

fn layout(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    b.set(
        "display",
        keywords(&[
            "block", "inline", "inline-block", "flex", "inline-flex", "grid", "inline-grid",
            "flow-root", "list-item", "table", "inline-table", "table-row", "table-cell",
            "table-column", "table-caption", "table-row-group", "table-header-group",
            "table-footer-group", "table-column-group", "contents", "none", "ruby", "ruby-text",
        ]),
    );
    b.set("position", keywords(&["static", "relative", "absolute", "fixed", "sticky"]));
    let offset = Matcher::alternative(vec![keywords(&["auto"]), f.length_percentage()]);
    for side in SIDES {
        b.set(side, offset.clone());
    }
    b.set("z-index", Matcher::alternative(vec![keywords(&["auto"]), f.integer()]));
    b.set("float", keywords(&["left", "right", "none", "inline-start", "inline-end"]));
    b.set("clear", keywords(&["none", "left", "right", "both", "inline-start", "inline-end"]));

    let overflow = keywords(&["visible", "hidden", "clip", "scroll", "auto"]);
    b.set("overflow", Matcher::count(overflow.clone(), 1, 2));
    b.set("overflow-x", overflow.clone());
    b.set("overflow-y", overflow);
    b.set("visibility", keywords(&["visible", "hidden", "collapse"]));

    b.set(
        "list-style-type",
        Matcher::alternative(vec![
            keywords(&[
                "none", "disc", "circle", "square", "decimal", "decimal-leading-zero",
                "lower-roman", "upper-roman", "lower-alpha", "upper-alpha", "lower-latin",
                "upper-latin", "lower-greek",
            ]),
            f.string(),
        ]),
    );
    b.set("list-style-position", keywords(&["inside", "outside"]));
    b.set("list-style-image", Matcher::alternative(vec![keywords(&["none"]), f.image()]));
    b.set("table-layout", keywords(&["auto", "fixed"]));
    b.set("caption-side", keywords(&["top", "bottom"]));
    b.set("empty-cells", keywords(&["show", "hide"]));
}

fn flexbox(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let direction = keywords(&["row", "row-reverse", "column", "column-reverse"]);
    let wrap = keywords(&["nowrap", "wrap", "wrap-reverse"]);
    let basis = Matcher::alternative(vec![
        keywords(&["auto", "content"]),
        sizing_value(f, "auto", &[]),
    ]);

    b.set("flex-direction", direction.clone());
    b.set("flex-wrap", wrap.clone());
    b.set("flex-flow", Matcher::unordered_some_of(vec![direction, wrap]));
    b.set("flex-grow", f.non_negative_number());
    b.set("flex-shrink", f.non_negative_number());
    b.set("flex-basis", basis.clone());
    b.set(
        "flex",
        Matcher::alternative(vec![
            keywords(&["none"]),
            Matcher::unordered_some_of(vec![
                Matcher::juxtaposition(vec![
                    f.non_negative_number(),
                    Matcher::optional(f.non_negative_number()),
                ]),
                basis,
            ]),
        ]),
    );
    b.set("order", f.integer());

    let content_position = ["center", "start", "end", "flex-start", "flex-end", "left", "right"];
    let distribution = ["space-between", "space-around", "space-evenly", "stretch"];
    b.set(
        "justify-content",
        keywords(&[&["normal"][..], &content_position[..], &distribution[..]].concat()),
    );
    b.set(
        "align-content",
        keywords(&[&["normal", "baseline"][..], &content_position[..], &distribution[..]].concat()),
    );
    let item_alignment = [
        "normal", "stretch", "baseline", "center", "start", "end", "self-start", "self-end",
        "flex-start", "flex-end",
    ];
    b.set("align-items", keywords(&item_alignment));
    b.set("align-self", keywords(&[&["auto"][..], &item_alignment[..]].concat()));
    b.set("justify-items", keywords(&[&["legacy"][..], &item_alignment[..]].concat()));
    b.set("justify-self", keywords(&[&["auto"][..], &item_alignment[..]].concat()));

    let gap = Matcher::alternative(vec![keywords(&["normal"]), f.non_negative_length_percentage()]);
    b.set("row-gap", gap.clone());
    b.set("column-gap", gap.clone());
    b.set("gap", Matcher::count(gap, 1, 2));
}

fn masking(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    b.set(
        "mask-image",
        Matcher::hash_list(Matcher::alternative(vec![keywords(&["none"]), f.image()])),
    );
}

fn effects(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    b.set("opacity", f.alpha_value());
    b.set("filter", f.filter_list());
    b.set(
        "pointer-events",
        keywords(&[
            "auto", "none", "visiblepainted", "visiblefill", "visiblestroke", "visible",
            "painted", "fill", "stroke", "all",
        ]),
    );
    b.set(
        "cursor",
        keywords(&[
            "auto", "default", "none", "context-menu", "help", "pointer", "progress", "wait",
            "cell", "crosshair", "text", "vertical-text", "alias", "copy", "move", "no-drop",
            "not-allowed", "grab", "grabbing", "col-resize", "row-resize", "n-resize", "e-resize",
            "s-resize", "w-resize", "ne-resize", "nw-resize", "se-resize", "sw-resize",
            "ew-resize", "ns-resize", "nesw-resize", "nwse-resize", "zoom-in", "zoom-out",
        ]),
    );

    let lp = f.length_percentage();
    let number = f.number();
    let angle = f.angle();
    let transform_function = Matcher::alternative(vec![
        Matcher::function("translate", Matcher::hash(lp.clone(), 1, 2)),
        Matcher::function("translatex", lp.clone()),
        Matcher::function("translatey", lp),
        Matcher::function("scale", Matcher::hash(number.clone(), 1, 2)),
        Matcher::function("scalex", number.clone()),
        Matcher::function("scaley", number),
        Matcher::function("rotate", angle.clone()),
        Matcher::function("skew", Matcher::hash(angle.clone(), 1, 2)),
        Matcher::function("skewx", angle.clone()),
        Matcher::function("skewy", angle),
    ]);
    b.set(
        "transform",
        Matcher::alternative(vec![keywords(&["none"]), Matcher::plus(transform_function)]),
    );
    b.set(
        "transition",
        Matcher::hash_list(Matcher::unordered_some_of(vec![
            Matcher::alternative(vec![keywords(&["none", "all"]), f.custom_ident(&[])]),
            f.time(),
            f.timing_function(),
            f.time(),
        ])),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn accepts(table: &PropertyTable, name: &str, css: &str) -> bool {
        table
            .get(name)
            .is_some_and(|m| m.matches(&parse_component_values(css)))
    }

    #[test]
    fn box_model_values() {
        let factory = MatcherFactory::new();
        let table = base_table(&factory);
        assert!(accepts(&table, "margin", "0 auto"));
        assert!(accepts(&table, "padding", "1em 2em 3em 4em"));
        assert!(!accepts(&table, "padding", "-1px"));
        assert!(!accepts(&table, "margin", "1px 2px 3px 4px 5px"));
    }

    #[test]
    fn border_shorthand_order_is_free() {
        let table = base_table(&MatcherFactory::new());
        assert!(accepts(&table, "border", "1px solid red"));
        assert!(accepts(&table, "border", "red dashed"));
        assert!(!accepts(&table, "border", "solid solid"));
    }

    #[test]
    fn sizing_keywords() {
        let table = base_table(&MatcherFactory::new());
        assert!(accepts(&table, "width", "min-content"));
        assert!(accepts(&table, "max-width", "none"));
        assert!(!accepts(&table, "max-width", "auto"));
        assert!(!accepts(&table, "width", "fit-content"));
    }

    #[test]
    fn flex_shorthand() {
        let table = base_table(&MatcherFactory::new());
        assert!(accepts(&table, "flex", "1 1 auto"));
        assert!(accepts(&table, "flex", "none"));
        assert!(accepts(&table, "flex", "2"));
        assert!(accepts(&table, "justify-content", "space-between"));
    }

    #[test]
    fn shadows() {
        let table = base_table(&MatcherFactory::new());
        assert!(accepts(&table, "box-shadow", "inset 0 0 4px red, 1px 1px blue"));
        assert!(!accepts(&table, "text-shadow", "inset 1px 1px red"));
    }
}
