//! `<color>` and the color functions.

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::TokenKind;

use super::MatcherFactory;

/// The CSS named colors.
pub const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgrey", "darkgreen", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise", "darkviolet", "deeppink",
    "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite", "forestgreen",
    "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "grey", "green",
    "greenyellow", "honeydew", "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender",
    "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgrey", "lightgreen", "lightpink", "lightsalmon",
    "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple", "rebeccapurple",
    "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell",
    "sienna", "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen",
    "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

const RGB_SPACES: &[&str] = &[
    "srgb", "srgb-linear", "display-p3", "a98-rgb", "prophoto-rgb", "rec2020",
];
const XYZ_SPACES: &[&str] = &["xyz", "xyz-d50", "xyz-d65"];

/// The value shape of one color channel.
#[derive(Clone, Copy)]
enum Channel {
    Hue,
    Value,
}

/// A space-syntax color function and the channel keywords usable in its
/// relative form.
struct ColorFunction {
    names: &'static [&'static str],
    channels: [Channel; 3],
    keywords: &'static [&'static str],
}

const COLOR_FUNCTIONS: &[ColorFunction] = &[
    ColorFunction {
        names: &["rgb", "rgba"],
        channels: [Channel::Value, Channel::Value, Channel::Value],
        keywords: &["r", "g", "b", "alpha"],
    },
    ColorFunction {
        names: &["hsl", "hsla"],
        channels: [Channel::Hue, Channel::Value, Channel::Value],
        keywords: &["h", "s", "l", "alpha"],
    },
    ColorFunction {
        names: &["hwb"],
        channels: [Channel::Hue, Channel::Value, Channel::Value],
        keywords: &["h", "w", "b", "alpha"],
    },
    ColorFunction {
        names: &["lab", "oklab"],
        channels: [Channel::Value, Channel::Value, Channel::Value],
        keywords: &["l", "a", "b", "alpha"],
    },
    ColorFunction {
        names: &["lch", "oklch"],
        channels: [Channel::Value, Channel::Value, Channel::Hue],
        keywords: &["l", "c", "h", "alpha"],
    },
];

impl MatcherFactory {
    /// `<color>`: named colors, hex colors and the color functions.
    pub fn color(&self) -> Matcher {
        self.cached("color", || {
            Matcher::recursive(|color| {
                let mut options = vec![
                    Matcher::keyword(NAMED_COLORS.iter().chain(&["transparent", "currentcolor"])),
                    self.hex_color(),
                ];
                for function in COLOR_FUNCTIONS {
                    let arguments = self.color_arguments(function, &color);
                    for name in function.names {
                        options.push(Matcher::function(name, arguments.clone()));
                    }
                }
                options.push(Matcher::function("color", self.color_space_arguments(&color)));
                Matcher::alternative(options)
            })
        })
    }

    /// A hash token of 3, 4, 6 or 8 hexadecimal digits.
    pub fn hex_color(&self) -> Matcher {
        self.cached("hex-color", || {
            Matcher::token_where(TokenKind::Hash, |t| {
                let digits = t.value();
                matches!(digits.len(), 3 | 4 | 6 | 8)
                    && digits.chars().all(|c| c.is_ascii_hexdigit())
            })
        })
    }

    fn color_arguments(&self, function: &ColorFunction, color: &Matcher) -> Matcher {
        let mut forms = vec![];
        match function.names[0] {
            "rgb" => forms.extend(self.legacy_rgb()),
            "hsl" => forms.extend(self.legacy_hsl()),
            _ => {}
        }
        forms.push(self.channels(function.channels, None));
        forms.push(Matcher::juxtaposition(vec![
            Matcher::keyword(["from"]),
            color.clone(),
            self.channels(function.channels, Some(function.keywords)),
        ]));
        // A single var() may stand for several channels.
        forms.push(Matcher::juxtaposition(vec![
            Matcher::count(self.var(), 1, 3),
            self.alpha_suffix(None),
        ]));
        Matcher::alternative(forms)
    }

    /// `color( [from <color>]? <space> <c1> <c2> <c3> [/ <alpha>]? )`
    fn color_space_arguments(&self, color: &Matcher) -> Matcher {
        let values = [Channel::Value; 3];
        let mut forms = vec![];
        for (spaces, keywords) in [
            (RGB_SPACES, &["r", "g", "b", "alpha"]),
            (XYZ_SPACES, &["x", "y", "z", "alpha"]),
        ] {
            forms.push(Matcher::juxtaposition(vec![
                Matcher::keyword(spaces),
                self.channels(values, None),
            ]));
            forms.push(Matcher::juxtaposition(vec![
                Matcher::keyword(["from"]),
                color.clone(),
                Matcher::keyword(spaces),
                self.channels(values, Some(&keywords[..])),
            ]));
        }
        Matcher::alternative(forms)
    }

    /// Comma syntax for `rgb()`/`rgba()`: three numbers or three
    /// percentages, never mixed, then an optional alpha.
    fn legacy_rgb(&self) -> Vec<Matcher> {
        let alpha = self.or_var(self.alpha_value());
        let mut forms = vec![];
        for channel in [self.or_var(self.number()), self.or_var(self.percentage())] {
            forms.push(Matcher::comma_separated(vec![
                channel.clone(),
                channel.clone(),
                channel.clone(),
            ]));
            forms.push(Matcher::comma_separated(vec![
                channel.clone(),
                channel.clone(),
                channel,
                alpha.clone(),
            ]));
        }
        forms.push(Matcher::hash(self.var(), 1, 4));
        forms.push(Matcher::comma_separated(vec![Matcher::hash(self.var(), 1, 3), alpha]));
        forms
    }

    /// Comma syntax for `hsl()`/`hsla()`.
    fn legacy_hsl(&self) -> Vec<Matcher> {
        let hue = self.or_var(self.hue());
        let percentage = self.or_var(self.percentage());
        let alpha = self.or_var(self.alpha_value());
        vec![
            Matcher::comma_separated(vec![hue.clone(), percentage.clone(), percentage.clone()]),
            Matcher::comma_separated(vec![hue, percentage.clone(), percentage, alpha]),
            Matcher::hash(self.var(), 1, 4),
        ]
    }

    /// Three space-separated channels and an optional `/ <alpha>`.
    fn channels(&self, channels: [Channel; 3], keywords: Option<&[&str]>) -> Matcher {
        let mut items: Vec<Matcher> = channels
            .into_iter()
            .map(|c| self.channel(c, keywords))
            .collect();
        items.push(self.alpha_suffix(keywords));
        Matcher::juxtaposition(items)
    }

    fn alpha_suffix(&self, keywords: Option<&[&str]>) -> Matcher {
        Matcher::optional(Matcher::juxtaposition(vec![
            Matcher::delim(&['/']),
            self.channel(Channel::Value, keywords),
        ]))
    }

    fn channel(&self, channel: Channel, keywords: Option<&[&str]>) -> Matcher {
        let mut options = vec![self.var(), Matcher::keyword(["none"])];
        match channel {
            Channel::Hue => options.push(self.hue()),
            Channel::Value => options.extend([self.number(), self.percentage()]),
        }
        if let Some(keywords) = keywords {
            options.push(Matcher::keyword(keywords));
            options.push(self.calc_with_keywords(keywords));
        }
        Matcher::alternative(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn color(css: &str) -> bool {
        MatcherFactory::new().color().matches(&parse_component_values(css))
    }

    fn color_with_var(css: &str) -> bool {
        MatcherFactory::with_var_enabled(true)
            .color()
            .matches(&parse_component_values(css))
    }

    #[test]
    fn named_colors() {
        assert_eq!(NAMED_COLORS.len(), 148);
        assert!(color("rebeccapurple"));
        assert!(color("CurrentColor"));
        assert!(color("transparent"));
        assert!(!color("notacolor"));
    }

    #[test]
    fn hex_lengths() {
        for ok in ["#abc", "#abcd", "#aabbcc", "#aabbccdd", "#123", "#A1B2C3"] {
            assert!(color(ok), "{ok} should be a color");
        }
        for bad in ["#a", "#ab", "#abcde", "#abcdeff", "#ggg", "#aabbccddee"] {
            assert!(!color(bad), "{bad} should not be a color");
        }
    }

    #[test]
    fn legacy_rgb() {
        assert!(color("rgb(1, 2, 3)"));
        assert!(color("rgba(1, 2, 3, 0.5)"));
        assert!(color("rgb(10%, 20%, 30%)"));
        assert!(color("rgba(10%, 20%, 30%, 50%)"));
        assert!(!color("rgb(1,50%,3)"));
        assert!(!color("rgb(1, 2)"));
        assert!(!color("rgb(1, 2, 3, 4, 5)"));
    }

    #[test]
    fn modern_rgb() {
        assert!(color("rgb(1 2 3)"));
        assert!(color("rgb(1 50% 3 / 0.5)"));
        assert!(color("rgb(none 2 3 / none)"));
        assert!(!color("rgb(1 2 3 /)"));
        assert!(!color("rgb(1 2, 3)"));
    }

    #[test]
    fn hue_functions() {
        assert!(color("hsl(120, 50%, 50%)"));
        assert!(color("hsla(120deg, 50%, 50%, .3)"));
        assert!(color("hsl(120 50% 50% / 30%)"));
        assert!(color("hwb(90 10% 10%)"));
        assert!(!color("hsl(120, 50, 50)"));
    }

    #[test]
    fn lab_family() {
        assert!(color("lab(50% 40 59.5)"));
        assert!(color("oklab(0.5 0.1 -0.1 / 0.5)"));
        assert!(color("lch(52.2% 72.2 50)"));
        assert!(color("oklch(60% 0.15 50deg)"));
        assert!(!color("lab(50%, 40, 59)"));
    }

    #[test]
    fn relative_colors() {
        assert!(color("rgb(from red r g b)"));
        assert!(color("rgb(from #0000ff r g b / alpha)"));
        assert!(color("hsl(from rgb(from red r g b) h s calc(l * 0.5))"));
        assert!(color("oklch(from blue l c calc(h + 90))"));
        assert!(!color("rgb(from red x y z)"));
        assert!(!color("rgb(from notacolor r g b)"));
    }

    #[test]
    fn color_function() {
        assert!(color("color(display-p3 1 0.5 0)"));
        assert!(color("color(xyz-d65 0.2 0.3 0.4 / 50%)"));
        assert!(color("color(from red srgb r g calc(b * 2))"));
        assert!(!color("color(display-p3 1 0.5)"));
        assert!(!color("color(unknown 1 0.5 0)"));
    }

    #[test]
    fn var_channels_require_var_support() {
        assert!(!color("rgb(var(--r), 0, 0)"));
        assert!(color_with_var("rgb(var(--r), 0, 0)"));
        assert!(color_with_var("rgba(var(--rgb), 0.5)"));
        assert!(color_with_var("rgb(var(--rgb))"));
        assert!(color_with_var("hsl(var(--h) 50% 50%)"));
        assert!(!color_with_var("rgb(var(--r), 0%, 0)"));
    }
}
