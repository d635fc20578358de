//! Grammar composition tests against parsed CSS.

use templatestyles_grammar::prelude::*;

fn length() -> Matcher {
    Matcher::alternative(vec![
        Matcher::token_where(TokenKind::Dimension, |t| {
            t.unit().is_some_and(|u| ["px", "em", "rem"].iter().any(|l| u.eq_ignore_ascii_case(l)))
        }),
        Matcher::token_where(TokenKind::Number, |t| t.numeric().is_some_and(|n| n.value == 0.0)),
    ])
}

#[test]
fn test_border_like_grammar() {
    let border = Matcher::unordered_some_of(vec![
        Matcher::keyword(["none", "solid", "dashed"]),
        Matcher::alternative(vec![Matcher::keyword(["thin", "thick"]), length()]),
    ]);

    for ok in ["solid", "1px solid", "solid thin", "0"] {
        assert!(border.matches(&parse_component_values(ok)), "{ok} should match");
    }
    for bad in ["", "solid solid", "1px 2px", "red"] {
        assert!(!border.matches(&parse_component_values(bad)), "{bad} should not match");
    }
}

#[test]
fn test_shadow_list_grammar() {
    let shadow = Matcher::hash_list(Matcher::unordered_all_of(vec![
        Matcher::optional(Matcher::keyword(["inset"])),
        Matcher::count(length(), 2, 4),
    ]));

    assert!(shadow.matches(&parse_component_values("1px 2px, inset 0 0 3px")));
    assert!(shadow.matches(&parse_component_values("1px 2px inset")));
    assert!(!shadow.matches(&parse_component_values("1px")));
    assert!(!shadow.matches(&parse_component_values("1px 2px,")));
}

#[test]
fn test_matching_is_repeatable() {
    let m = Matcher::plus(length());
    let values = parse_component_values("1px 2em 0");

    let first = m.candidates(&values, 0, &MatchOptions::default());
    let second = m.candidates(&values, 0, &MatchOptions::default());
    assert_eq!(first, second);
    assert!(first.contains(&values.len()));
}

#[test]
fn test_matchers_shared_across_threads() {
    let m = Matcher::plus(length());
    let handles: Vec<_> = ["1px", "2em 3rem", "red"]
        .into_iter()
        .map(|css| {
            let m = m.clone();
            std::thread::spawn(move || m.matches(&parse_component_values(css)))
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, true, false]);
}
