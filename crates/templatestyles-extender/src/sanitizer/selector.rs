//! Selector grammar and scoping.
//!
//! Selectors are validated with the same matcher combinators as property
//! values. Whitespace between components is skipped by the matcher, which is
//! exactly the descendant combinator; [`Matcher::no_whitespace`] keeps the
//! parts of a compound selector together.

use templatestyles_grammar::matcher::Matcher;
use templatestyles_grammar::value::{
    BlockKind, ComponentValue, TokenKind, serialize_values,
};

const NTH_PSEUDO_CLASSES: &[&str] = &["nth-child", "nth-last-child", "nth-of-type", "nth-last-of-type"];
const SELECTOR_PSEUDO_CLASSES: &[&str] = &["not", "is", "where", "has"];

/// Matcher for a comma separated list of complex selectors.
pub fn selector_list() -> Matcher {
    Matcher::recursive(|list| Matcher::hash_list(complex_selector(&list)))
}

fn complex_selector(list: &Matcher) -> Matcher {
    let compound = compound_selector(list);
    let combinator = Matcher::delim(&['>', '+', '~']);
    Matcher::juxtaposition(vec![
        compound.clone(),
        Matcher::star(Matcher::juxtaposition(vec![Matcher::optional(combinator), compound])),
    ])
}

fn compound_selector(list: &Matcher) -> Matcher {
    let subclass = subclass_selector(list);
    let rest = Matcher::star(Matcher::juxtaposition(vec![Matcher::no_whitespace(), subclass.clone()]));
    let type_selector = Matcher::alternative(vec![Matcher::token(TokenKind::Ident), Matcher::delim(&['*'])]);

    Matcher::alternative(vec![
        Matcher::juxtaposition(vec![type_selector, rest.clone()]),
        Matcher::juxtaposition(vec![subclass, rest]),
    ])
}

fn subclass_selector(list: &Matcher) -> Matcher {
    let ident = || Matcher::token(TokenKind::Ident);
    let glued = |items: Vec<Matcher>| {
        let mut sequence = vec![];
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                sequence.push(Matcher::no_whitespace());
            }
            sequence.push(item);
        }
        Matcher::juxtaposition(sequence)
    };
    let colon = || Matcher::token(TokenKind::Colon);

    let id = Matcher::token_where(TokenKind::Hash, |t| t.is_id_hash());
    let class = glued(vec![Matcher::delim(&['.']), ident()]);
    let attribute = Matcher::block(
        BlockKind::SquareBracket,
        Matcher::juxtaposition(vec![
            ident(),
            Matcher::optional(Matcher::juxtaposition(vec![
                Matcher::alternative(vec![Matcher::delim(&['=']), Matcher::token(TokenKind::AttributeMatch)]),
                Matcher::alternative(vec![ident(), Matcher::token(TokenKind::String)]),
                Matcher::optional(Matcher::keyword(["i", "s"])),
            ])),
        ]),
    );

    let mut functional: Vec<Matcher> = NTH_PSEUDO_CLASSES
        .iter()
        .map(|name| Matcher::function(name, Matcher::anything_plus()))
        .collect();
    functional.extend(
        SELECTOR_PSEUDO_CLASSES
            .iter()
            .map(|name| Matcher::function(name, list.clone())),
    );
    functional.push(Matcher::function("lang", Matcher::hash_list(Matcher::alternative(vec![ident(), Matcher::token(TokenKind::String)]))));
    functional.push(Matcher::function("dir", Matcher::keyword(["ltr", "rtl"])));

    let pseudo_class = glued(vec![
        colon(),
        Matcher::alternative(vec![ident(), Matcher::alternative(functional)]),
    ]);
    let pseudo_element = glued(vec![colon(), colon(), ident()]);

    Matcher::alternative(vec![id, class, attribute, pseudo_element, pseudo_class])
}

/// Split a selector list on its top-level commas and prefix each selector
/// with `.wrap_class `.
pub fn scope_selectors(selectors: &[ComponentValue], wrap_class: &str) -> String {
    selectors
        .split(|v| v.is_kind(TokenKind::Comma))
        .map(|selector| format!(".{wrap_class} {}", serialize_values(selector)))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use templatestyles_grammar::value::parse_component_values;

    fn valid(selector: &str) -> bool {
        selector_list().matches(&parse_component_values(selector))
    }

    #[test]
    fn compound_selectors() {
        assert!(valid("a"));
        assert!(valid("div.box#main"));
        assert!(valid("*"));
        assert!(valid("a:hover::before"));
        assert!(valid("input[type=\"text\" i]"));
        assert!(valid("a[href^='http']"));
    }

    #[test]
    fn combinators() {
        assert!(valid("ul > li + li ~ li a"));
        assert!(valid(".a .b"));
        assert!(!valid("a >"));
        assert!(!valid("> a"));
    }

    #[test]
    fn functional_pseudo_classes() {
        assert!(valid("li:nth-child(2n+1)"));
        assert!(valid("a:not(.external, [href])"));
        assert!(valid("p:lang(en)"));
        assert!(!valid("p:dir(up)"));
    }

    #[test]
    fn malformed_selectors() {
        assert!(!valid("a. b"));
        assert!(!valid("#123"));
        assert!(!valid("a,"));
        assert!(!valid("12px"));
    }

    #[test]
    fn scoping() {
        let selectors = parse_component_values("a:hover, .b > p ");
        assert_eq!(
            scope_selectors(&selectors, "mw-parser-output"),
            ".mw-parser-output a:hover,.mw-parser-output .b > p"
        );
    }
}
