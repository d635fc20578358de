//! Property table extensions.
//!
//! Each [`Extension`] rewrites or adds entries of a [`PropertyTableBuilder`].
//! [`EXTENSIONS`] lists them in the order they are applied: later entries see
//! the effects of earlier ones.

use templatestyles_grammar::matcher::Matcher;

use super::base::{SIZING_PROPERTIES, sizing_value};
use super::{PropertyTableBuilder, grid};
use crate::factory::{BORDER_STYLES, MatcherFactory};

/// A named transformation of the property table.
#[derive(Clone, Copy)]
pub struct Extension {
    pub name: &'static str,
    pub apply: fn(&mut PropertyTableBuilder, &MatcherFactory),
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Extension").field(&self.name).finish()
    }
}

/// Extensions applied on top of the base table, in order.
pub const EXTENSIONS: &[Extension] = &[
    Extension { name: "css-text-3", apply: css_text_3 },
    Extension { name: "css-backgrounds-3", apply: css_backgrounds_3 },
    Extension { name: "css-sizing-3", apply: css_sizing_3 },
    Extension { name: "css-masking-1", apply: css_masking_1 },
    Extension { name: "css-grid-1", apply: css_grid_1 },
    Extension { name: "additional-properties", apply: additional_properties },
];

/// `overflow-wrap: anywhere` and `break-spaces`.
fn css_text_3(b: &mut PropertyTableBuilder, _: &MatcherFactory) {
    b.set(
        "overflow-wrap",
        Matcher::alternative(vec![
            Matcher::keyword(["normal"]),
            Matcher::unordered_some_of(vec![
                Matcher::keyword(["break-word"]),
                Matcher::keyword(["break-spaces"]),
                Matcher::keyword(["anywhere"]),
            ]),
        ]),
    );
}

/// Alpha hex colors and `var()` colors in `border` and `box-shadow`.
fn css_backgrounds_3(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let color = f.or_var(f.color());
    b.set(
        "border",
        Matcher::unordered_some_of(vec![
            Matcher::keyword(BORDER_STYLES),
            Matcher::alternative(vec![Matcher::keyword(["thin", "medium", "thick"]), f.length()]),
            color.clone(),
        ]),
    );
    b.set(
        "box-shadow",
        Matcher::alternative(vec![
            Matcher::keyword(["none"]),
            Matcher::hash_list(Matcher::unordered_all_of(vec![
                Matcher::optional(Matcher::keyword(["inset"])),
                Matcher::count(f.length(), 2, 4),
                Matcher::optional(color),
            ])),
        ]),
    );
}

/// `clamp()` in the sizing properties and `width: fit-content`.
fn css_sizing_3(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let clamp = Matcher::function(
        "clamp",
        Matcher::hash(
            Matcher::alternative(vec![
                f.length(),
                f.length_percentage(),
                f.frequency(),
                f.angle(),
                f.angle_percentage(),
                f.time(),
                f.number(),
                f.integer(),
            ]),
            3,
            3,
        ),
    );
    for (name, keyword) in SIZING_PROPERTIES {
        b.set(name, sizing_value(f, keyword, std::slice::from_ref(&clamp)));
    }
    if let Some(width) = b.get("width").cloned() {
        b.set(
            "width",
            Matcher::alternative(vec![width, Matcher::keyword(["fit-content"])]),
        );
    }
}

/// `-webkit-mask-image` as an alias of `mask-image`.
fn css_masking_1(b: &mut PropertyTableBuilder, _: &MatcherFactory) {
    if let Some(mask_image) = b.get("mask-image").cloned() {
        b.set("-webkit-mask-image", mask_image);
    }
}

/// Full track lists for the grid templates.
fn css_grid_1(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let tracks = grid::track_list(f);
    b.set("grid-template-columns", tracks.clone());
    b.set("grid-template-rows", tracks);
}

/// Insert-if-absent; the builder logs skipped names.
fn add(b: &mut PropertyTableBuilder, name: &str, matcher: Matcher) {
    b.insert(name, matcher);
}

/// Properties the base table does not know. Existing entries are kept.
fn additional_properties(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let auto = || Matcher::keyword(["auto"]);

    add(
        b,
        "aspect-ratio",
        Matcher::unordered_some_of(vec![auto(), f.ratio()]),
    );
    add(b, "backdrop-filter", f.filter_list());
    add(
        b,
        "contain",
        Matcher::alternative(vec![
            Matcher::keyword(["none", "strict", "content"]),
            Matcher::unordered_some_of(vec![
                Matcher::keyword(["size", "inline-size"]),
                Matcher::keyword(["layout"]),
                Matcher::keyword(["style"]),
                Matcher::keyword(["paint"]),
            ]),
        ]),
    );
    add(b, "content-visibility", Matcher::keyword(["visible", "auto", "hidden"]));
    add(b, "font-optical-sizing", Matcher::keyword(["auto", "none"]));
    add(
        b,
        "font-variation-settings",
        Matcher::alternative(vec![
            Matcher::keyword(["normal"]),
            Matcher::hash_list(Matcher::juxtaposition(vec![f.string(), f.number()])),
        ]),
    );

    let margin = Matcher::alternative(vec![f.length_percentage(), auto()]);
    let padding = f.non_negative_length_percentage();
    for axis in ["block", "inline"] {
        add(b, &format!("margin-{axis}"), Matcher::count(margin.clone(), 1, 2));
        add(b, &format!("padding-{axis}"), Matcher::count(padding.clone(), 1, 2));
        for edge in ["start", "end"] {
            add(b, &format!("margin-{axis}-{edge}"), margin.clone());
            add(b, &format!("padding-{axis}-{edge}"), padding.clone());
        }
    }

    let inset = Matcher::alternative(vec![auto(), f.length_percentage()]);
    add(b, "inset", Matcher::count(inset.clone(), 1, 4));
    for axis in ["block", "inline"] {
        add(b, &format!("inset-{axis}"), Matcher::count(inset.clone(), 1, 2));
        for edge in ["start", "end"] {
            add(b, &format!("inset-{axis}-{edge}"), inset.clone());
        }
    }

    add(
        b,
        "pointer-events",
        Matcher::keyword([
            "auto", "none", "visiblepainted", "visiblefill", "visiblestroke", "visible",
            "painted", "fill", "stroke", "all",
        ]),
    );
    add(
        b,
        "ruby-align",
        Matcher::keyword(["start", "center", "space-between", "space-around"]),
    );
    add(
        b,
        "ruby-position",
        Matcher::alternative(vec![
            Matcher::unordered_some_of(vec![
                Matcher::keyword(["alternate"]),
                Matcher::keyword(["over", "under"]),
            ]),
            Matcher::keyword(["inter-character"]),
        ]),
    );
    add(
        b,
        "image-rendering",
        Matcher::keyword(["auto", "crisp-edges", "pixelated", "smooth", "high-quality"]),
    );

    scroll_spacing(b, f);
    scroll_snap(b);
    contain_intrinsic_size(b, f);
}

/// `scroll-margin-*` and `scroll-padding-*`.
fn scroll_spacing(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let margin = f.length();
    let padding = Matcher::alternative(vec![Matcher::keyword(["auto"]), f.non_negative_length_percentage()]);

    for (prefix, value) in [("scroll-margin", margin), ("scroll-padding", padding)] {
        add(b, prefix, Matcher::count(value.clone(), 1, 4));
        for side in ["top", "right", "bottom", "left"] {
            add(b, &format!("{prefix}-{side}"), value.clone());
        }
        for axis in ["block", "inline"] {
            add(b, &format!("{prefix}-{axis}"), Matcher::count(value.clone(), 1, 2));
            for edge in ["start", "end"] {
                add(b, &format!("{prefix}-{axis}-{edge}"), value.clone());
            }
        }
    }
}

fn scroll_snap(b: &mut PropertyTableBuilder) {
    add(
        b,
        "scroll-snap-type",
        Matcher::alternative(vec![
            Matcher::keyword(["none"]),
            Matcher::juxtaposition(vec![
                Matcher::keyword(["x", "y", "block", "inline", "both"]),
                Matcher::optional(Matcher::keyword(["mandatory", "proximity"])),
            ]),
        ]),
    );
    add(
        b,
        "scroll-snap-align",
        Matcher::count(Matcher::keyword(["none", "start", "end", "center"]), 1, 2),
    );
    add(b, "scroll-snap-stop", Matcher::keyword(["normal", "always"]));
}

/// `contain-intrinsic-size` and its longhands.
fn contain_intrinsic_size(b: &mut PropertyTableBuilder, f: &MatcherFactory) {
    let value = Matcher::juxtaposition(vec![
        Matcher::optional(Matcher::keyword(["auto"])),
        Matcher::alternative(vec![Matcher::keyword(["none"]), f.non_negative_length()]),
    ]);
    add(b, "contain-intrinsic-size", Matcher::count(value.clone(), 1, 2));
    for name in ["width", "height", "block-size", "inline-size"] {
        add(b, &format!("contain-intrinsic-{name}"), value.clone());
    }
}
