//! Snippet templates and tab-stop sessions.
//!
//! Templates use the editor-native placeholder syntax:
//! - `${1}` / `${1:default}` declare numbered fields (defaults may nest other fields)
//! - `${0}` is the final cursor position and is visited last
//! - `${1|a,b|}` inserts the first choice
//! - `${NAME}` / `${NAME:default}` variables expand to their default (or nothing)
//! - `\` escapes the next character
//!
//! Bare `$1` is also accepted. Inserting a template selects its first field; when more fields
//! remain, a [`SnippetSession`] is installed on the state so the host can move between them.

use crate::changes::{Assoc, ChangeSet, ChangeSpec};
use crate::state::{EditorState, Selection, StateEffect, Transaction, TransactionSpec};
use crate::view::EditorView;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

/// A parsed snippet template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    text: String,
    fields: Vec<SnippetField>,
}

/// A tab stop: every range that belongs to one field number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetField {
    /// The field number from the template.
    pub number: u32,
    /// Character ranges covered by the field, in document order.
    pub ranges: Vec<(usize, usize)>,
}

struct TemplateParser<'a> {
    chars: Peekable<Chars<'a>>,
    text: String,
    len: usize,
    marks: Vec<(u32, usize, usize)>,
}

impl<'a> TemplateParser<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            chars: template.chars().peekable(),
            text: String::with_capacity(template.len()),
            len: 0,
            marks: Vec::new(),
        }
    }

    fn push(&mut self, c: char) {
        self.text.push(c);
        self.len += 1;
    }

    fn take_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.chars.peek().copied() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.chars.next();
        }
        digits
    }

    /// Parse until the input ends, or until an unescaped `}` when `nested`.
    fn parse_sequence(&mut self, nested: bool) {
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = self.chars.next() {
                        self.push(next);
                    }
                }
                '}' if nested => return,
                '$' => match self.chars.peek().copied() {
                    Some('{') => {
                        self.chars.next();
                        self.parse_braced();
                    }
                    Some(d) if d.is_ascii_digit() => {
                        let digits = self.take_digits();
                        let number = digits.parse().unwrap_or(u32::MAX);
                        self.marks.push((number, self.len, self.len));
                    }
                    _ => self.push('$'),
                },
                other => self.push(other),
            }
        }
    }

    // After `${`.
    fn parse_braced(&mut self) {
        let digits = self.take_digits();

        if digits.is_empty() {
            while let Some(c) = self.chars.peek().copied() {
                if c != '_' && !c.is_ascii_alphanumeric() {
                    break;
                }
                self.chars.next();
            }
            if self.chars.next() == Some(':') {
                self.parse_sequence(true);
            }
            return;
        }

        let number = digits.parse().unwrap_or(u32::MAX);
        let start = self.len;
        match self.chars.next() {
            Some(':') => self.parse_sequence(true),
            Some('|') => self.parse_choice(),
            Some('}') | None => {}
            Some(_) => self.parse_sequence(true),
        }
        self.marks.push((number, start, self.len));
    }

    // After `${n|`: keep the first option, skip to `|}`.
    fn parse_choice(&mut self) {
        let mut first = true;
        while let Some(c) = self.chars.next() {
            match c {
                '|' if self.chars.peek() == Some(&'}') => {
                    self.chars.next();
                    return;
                }
                ',' => first = false,
                '\\' => {
                    if let Some(next) = self.chars.next()
                        && first
                    {
                        self.push(next);
                    }
                }
                other if first => self.push(other),
                _ => {}
            }
        }
    }
}

impl Snippet {
    /// Parse a template.
    pub fn parse(template: &str) -> Self {
        let mut parser = TemplateParser::new(template);
        parser.parse_sequence(false);

        let mut grouped: BTreeMap<u32, Vec<(usize, usize)>> = BTreeMap::new();
        for (number, from, to) in parser.marks {
            grouped.entry(number).or_default().push((from, to));
        }

        let final_stop = grouped.remove(&0);
        let mut fields = grouped
            .into_iter()
            .map(|(number, ranges)| SnippetField { number, ranges })
            .collect::<Vec<_>>();
        if let Some(ranges) = final_stop {
            fields.push(SnippetField { number: 0, ranges });
        }
        for field in &mut fields {
            field.ranges.sort_unstable();
        }

        Self {
            text: parser.text,
            fields,
        }
    }

    /// The text the template inserts.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fields in visiting order, with offsets relative to the insertion point.
    pub fn fields(&self) -> &[SnippetField] {
        &self.fields
    }

    /// Build a transaction spec that replaces `from..to` with the snippet and selects its first
    /// field.
    pub fn insert(&self, state: &EditorState, from: usize, to: usize) -> TransactionSpec {
        let len = state.len_chars();
        let (from, to) = (from.min(len), to.min(len));
        let (from, to) = (from.min(to), from.max(to));

        let fields = self
            .fields
            .iter()
            .map(|field| SnippetField {
                number: field.number,
                ranges: field
                    .ranges
                    .iter()
                    .map(|&(a, b)| (from + a, from + b))
                    .collect(),
            })
            .collect::<Vec<_>>();

        let selection = fields
            .first()
            .and_then(|field| field.ranges.first())
            .map(|&(a, b)| Selection::range(a, b))
            .unwrap_or_else(|| Selection::cursor(from + self.text.chars().count()));

        let has_session =
            fields.len() > 1 || fields.first().is_some_and(|field| field.number != 0);
        let effect = if has_session {
            StateEffect::StartSnippet(SnippetSession { fields, active: 0 })
        } else {
            StateEffect::ClearSnippet
        };

        TransactionSpec::new()
            .change(ChangeSpec::new(from, to, self.text.clone()))
            .selection(selection)
            .effect(effect)
    }

    /// Insert the snippet into `view`, replacing `from..to`.
    pub fn apply(&self, view: &EditorView, from: usize, to: usize) -> Transaction {
        let spec = self.insert(&view.state(), from, to);
        tracing::trace!(from, to, fields = self.fields.len(), "inserting snippet");
        view.dispatch(spec)
    }
}

/// Parse `template` into a [`Snippet`].
pub fn snippet(template: &str) -> Snippet {
    Snippet::parse(template)
}

/// The tab stops of an inserted snippet and the one currently selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSession {
    fields: Vec<SnippetField>,
    active: usize,
}

impl SnippetSession {
    /// Fields in visiting order, in document offsets.
    pub fn fields(&self) -> &[SnippetField] {
        &self.fields
    }

    /// Index of the selected field.
    pub fn active(&self) -> usize {
        self.active
    }

    pub(crate) fn map(&self, changes: &ChangeSet) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|field| SnippetField {
                number: field.number,
                ranges: field
                    .ranges
                    .iter()
                    .map(|&(a, b)| {
                        let a = changes.map_pos(a, Assoc::Before);
                        (a, changes.map_pos(b, Assoc::After).max(a))
                    })
                    .collect(),
            })
            .collect();
        Self {
            fields,
            active: self.active,
        }
    }

    fn select(&self, index: usize) -> TransactionSpec {
        let selection = self.fields[index]
            .ranges
            .first()
            .map(|&(a, b)| Selection::range(a, b))
            .unwrap_or_default();

        let effect = if index + 1 == self.fields.len() {
            StateEffect::ClearSnippet
        } else {
            StateEffect::StartSnippet(Self {
                fields: self.fields.clone(),
                active: index,
            })
        };

        TransactionSpec::new().selection(selection).effect(effect)
    }
}

/// Returns `true` if the active snippet has a field after the selected one.
pub fn has_next_snippet_field(state: &EditorState) -> bool {
    state
        .snippet_session()
        .is_some_and(|session| session.active + 1 < session.fields.len())
}

/// Returns `true` if the active snippet has a field before the selected one.
pub fn has_prev_snippet_field(state: &EditorState) -> bool {
    state
        .snippet_session()
        .is_some_and(|session| session.active > 0)
}

/// Select the next snippet field. Reaching the last field ends the session.
pub fn next_snippet_field(view: &EditorView) -> bool {
    let state = view.state();
    let Some(session) = state.snippet_session() else {
        return false;
    };
    if session.active + 1 >= session.fields.len() {
        return false;
    }
    view.dispatch(session.select(session.active + 1));
    true
}

/// Select the previous snippet field.
pub fn prev_snippet_field(view: &EditorView) -> bool {
    let state = view.state();
    let Some(session) = state.snippet_session() else {
        return false;
    };
    if session.active == 0 {
        return false;
    }
    view.dispatch(session.select(session.active - 1));
    true
}

/// End the active snippet session, if any.
pub fn clear_snippet(view: &EditorView) -> bool {
    if view.state().snippet_session().is_none() {
        return false;
    }
    view.dispatch(TransactionSpec::new().effect(StateEffect::ClearSnippet));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholders() {
        let parsed = Snippet::parse("fn ${1:name}(${2}) {\n\t$0\n}");
        assert_eq!(parsed.text(), "fn name() {\n\t\n}");
        assert_eq!(
            parsed.fields(),
            &[
                SnippetField {
                    number: 1,
                    ranges: vec![(3, 7)]
                },
                SnippetField {
                    number: 2,
                    ranges: vec![(8, 8)]
                },
                SnippetField {
                    number: 0,
                    ranges: vec![(13, 13)]
                },
            ]
        );
    }

    #[test]
    fn test_parse_nested_choice_variable_and_escape() {
        assert_eq!(Snippet::parse("${1:a${2:b}c}").text(), "abc");
        assert_eq!(Snippet::parse("${1|one,two|}").text(), "one");
        assert_eq!(Snippet::parse("${TM_FILENAME:x}y${HOME}").text(), "xy");
        assert_eq!(Snippet::parse("\\${1} \\}").text(), "${1} }");
        assert_eq!(Snippet::parse("cost $ 5").text(), "cost $ 5");
    }

    #[test]
    fn test_final_stop_visited_last() {
        let parsed = Snippet::parse("${0}a${2}b${1}");
        let order = parsed
            .fields()
            .iter()
            .map(|field| field.number)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
