//! Candidate generation for each matcher node.

use std::cell::Cell;
use std::collections::{BTreeSet, HashSet};

use super::{MatchOptions, Node};
use crate::targets;
use crate::value::{ComponentValue, TokenKind};

/// End positions of a match, ascending and free of duplicates.
pub(crate) type Positions = BTreeSet<usize>;

/// Per-path matching state. Copied along each path; only the step counter
/// is shared by a matching run.
#[derive(Clone, Copy)]
pub(crate) struct Context<'o> {
    options: &'o MatchOptions,
    depth: usize,
    steps: &'o Cell<usize>,
}

impl<'o> Context<'o> {
    pub(crate) fn new(options: &'o MatchOptions, steps: &'o Cell<usize>) -> Self {
        Self {
            options,
            depth: 0,
            steps,
        }
    }

    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

/// First index at or after `index` that is not whitespace.
pub(crate) fn skip_whitespace(values: &[ComponentValue], mut index: usize) -> usize {
    while index < values.len() && values[index].is_whitespace() {
        index += 1;
    }
    index
}

/// Position after consuming the single value at `index`.
fn advance(values: &[ComponentValue], index: usize) -> usize {
    skip_whitespace(values, index + 1)
}

/// Position after a comma at `index`, if there is one.
fn after_comma(values: &[ComponentValue], index: usize) -> Option<usize> {
    values
        .get(index)
        .is_some_and(|v| v.is_kind(TokenKind::Comma))
        .then(|| advance(values, index))
}

/// Whether `node` consumes `values` entirely.
fn matches_all(node: &Node, values: &[ComponentValue], cx: Context<'_>) -> bool {
    let start = skip_whitespace(values, 0);
    node.generate(values, start, cx).contains(&values.len())
}

impl Node {
    pub(crate) fn generate(
        &self,
        values: &[ComponentValue],
        start: usize,
        cx: Context<'_>,
    ) -> Positions {
        if cx.depth >= cx.options.max_depth {
            tracing::trace!(target: targets::MATCHER, depth = cx.depth, "match depth budget exhausted");
            return Positions::new();
        }
        cx.steps.set(cx.steps.get() + 1);
        let cx = cx.deeper();
        let current = values.get(start);

        match self {
            Node::Keyword(words) => match current.and_then(ComponentValue::as_token) {
                Some(token)
                    if token.kind() == TokenKind::Ident
                        && words.iter().any(|w| w.eq_ignore_ascii_case(token.value())) =>
                {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::Token { kind, predicate } => match current.and_then(ComponentValue::as_token) {
                Some(token)
                    if token.kind() == *kind && predicate.as_ref().is_none_or(|p| p(token)) =>
                {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::Delim(chars) => match current.and_then(ComponentValue::as_token) {
                Some(token) if token.delim().is_some_and(|c| chars.contains(&c)) => {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::Alternative(options) => options
                .iter()
                .flat_map(|option| option.0.generate(values, start, cx))
                .collect(),

            Node::Juxtaposition { items, commas } => {
                let mut positions = Positions::from([start]);
                for (i, item) in items.iter().enumerate() {
                    let mut next = Positions::new();
                    for &position in &positions {
                        let from = if *commas && i > 0 {
                            match after_comma(values, position) {
                                Some(from) => from,
                                None => continue,
                            }
                        } else {
                            position
                        };
                        next.extend(item.0.generate(values, from, cx));
                    }
                    if next.is_empty() {
                        return next;
                    }
                    positions = next;
                }
                positions
            }

            Node::Unordered { items, all } => {
                let full = u64::MAX
                    .checked_shr(u64::BITS - items.len() as u32)
                    .unwrap_or(0);
                let mut out = Positions::new();
                let mut seen = HashSet::new();
                let mut stack = vec![(start, 0u64)];

                while let Some((position, used)) = stack.pop() {
                    let complete = if *all { used == full } else { used != 0 };
                    if complete {
                        out.insert(position);
                    }
                    if used == full {
                        continue;
                    }
                    for (j, item) in items.iter().enumerate() {
                        let bit = 1u64 << j;
                        if used & bit != 0 {
                            continue;
                        }
                        for end in item.0.generate(values, position, cx) {
                            let state = (end, used | bit);
                            if seen.insert(state) {
                                stack.push(state);
                            }
                        }
                    }
                }
                out
            }

            Node::Quantifier {
                inner,
                min,
                max,
                commas,
            } => {
                let mut out = Positions::new();
                if *min == 0 {
                    out.insert(start);
                }
                // Positions already expanded after `min` repetitions. A later
                // arrival has no more repetitions left than the first one.
                let mut expanded = HashSet::new();
                let mut frontier = Positions::from([start]);
                let mut count = 0;

                while !frontier.is_empty() && count < *max {
                    let satisfied = count >= *min;
                    count += 1;
                    let mut next = Positions::new();
                    for &position in &frontier {
                        if satisfied && !expanded.insert(position) {
                            continue;
                        }
                        let from = if *commas && count > 1 {
                            match after_comma(values, position) {
                                Some(from) => from,
                                None => continue,
                            }
                        } else {
                            position
                        };
                        for end in inner.0.generate(values, from, cx) {
                            if end > position {
                                next.insert(end);
                            } else {
                                // An empty repetition can be repeated until
                                // the minimum is reached without consuming
                                // anything.
                                out.insert(position);
                            }
                        }
                    }
                    if count >= *min {
                        out.extend(next.iter().copied());
                    }
                    frontier = next;
                }
                out
            }

            Node::Function { name, inner } => match current {
                Some(ComponentValue::Function(function))
                    if name.as_ref().is_none_or(|n| n.eq_ignore_ascii_case(function.name()))
                        && matches_all(&inner.0, &function.arguments, cx) =>
                {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::Block { kind, inner } => match current {
                Some(ComponentValue::Block(block))
                    if block.kind == *kind && matches_all(&inner.0, &block.contents, cx) =>
                {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::VarName => match current.and_then(ComponentValue::as_token) {
                Some(token) if token.kind() == TokenKind::Ident && is_var_name(token.value()) => {
                    Positions::from([advance(values, start)])
                }
                _ => Positions::new(),
            },

            Node::Anything { at_least_one } => {
                let mut out = Positions::new();
                if !at_least_one {
                    out.insert(start);
                }
                let mut index = start;
                while let Some(value) = values.get(index) {
                    if value.as_token().is_some_and(|t| t.is_bad()) {
                        break;
                    }
                    index = advance(values, index);
                    out.insert(index);
                }
                out
            }

            Node::Nothing => Positions::new(),

            Node::NoWhitespace => {
                if start == 0 || !values[start - 1].is_whitespace() {
                    Positions::from([start])
                } else {
                    Positions::new()
                }
            }

            Node::Recursive(inner) => inner.0.generate(values, start, cx),

            Node::SelfRef(target) => match target.upgrade() {
                Some(node) => node.generate(values, start, cx),
                None => Positions::new(),
            },
        }
    }
}

fn is_var_name(name: &str) -> bool {
    name.strip_prefix("--").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_name_characters() {
        assert!(is_var_name("--a"));
        assert!(is_var_name("--brand-color_2"));
        assert!(!is_var_name("--"));
        assert!(!is_var_name("--a.b"));
        assert!(!is_var_name("-a"));
    }
}
