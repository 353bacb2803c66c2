// Token substitution within string literals
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of uibinder.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Token substitution within string literals.
//!
//! Much of a template is rendered ahead of time into static HTML strings,
//!   but parts of that HTML can only be known at runtime
//!     (e.g. a unique DOM id generated for an element,
//!       or the obfuscated name of a CSS class).
//! A [`Tokenator`] allows a runtime expression to be embedded within such a
//!   string as an opaque token,
//!     which is replaced with the actual expression when the generated
//!     source is finally rendered
//!       (see [`Tokenator::detokenate`]).
//!
//! Tokens are chosen to survive both HTML and Java string escaping
//!   unchanged.
//! The value of a token is inserted verbatim;
//!   to splice an expression into a string literal,
//!     the value must close and reopen the literal itself
//!     (see [`Tokenator::next_expression_token`]).

use memchr::memmem;

const TOKEN_START: &str = "-%%%~";
const TOKEN_END: &str = "~%%%-";

/// A run of a string split by [`Tokenator::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'t> {
    Text(&'t str),
    /// The complete text of a token,
    ///   delimiters included.
    Token(&'t str),
}

/// Token allocator and substitution table.
///
/// Each compilation owns its own tokenator;
///   tokens from one tokenator have no meaning to another.
#[derive(Debug, Default)]
pub struct Tokenator {
    values: Vec<(String, Option<String>)>,
}

impl Tokenator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a token that will be replaced by `value`.
    pub fn next_token<S: Into<String>>(&mut self, value: S) -> String {
        self.push(value.into(), None)
    }

    /// Allocate a token that will be replaced by `value`,
    ///   associating it with additional information that can later be
    ///   retrieved with [`Tokenator::ordered_values`].
    pub fn next_token_with_info<S: Into<String>, I: Into<String>>(
        &mut self,
        value: S,
        info: I,
    ) -> String {
        self.push(value.into(), Some(info.into()))
    }

    /// Allocate a token that splices the Java expression `expr` into the
    ///   string literal in which the token appears.
    pub fn next_expression_token(&mut self, expr: &str) -> String {
        self.next_token(format!("\" + {expr} + \""))
    }

    fn push(&mut self, value: String, info: Option<String>) -> String {
        let token = format!("{TOKEN_START}{}{TOKEN_END}", self.values.len());
        self.values.push((value, info));
        token
    }

    /// Number of tokens allocated.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every token in `text` with its value.
    ///
    /// Token-like text that does not name a token of this tokenator is
    ///   left unchanged.
    pub fn detokenate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some((before, index, after)) = next_token_in(rest) {
            out.push_str(before);

            match self.values.get(index) {
                Some((value, _)) => out.push_str(value),
                None => {
                    let consumed = rest.len() - before.len() - after.len();
                    out.push_str(&rest[before.len()..][..consumed]);
                }
            }

            rest = after;
        }

        out.push_str(rest);
        out
    }

    /// Values and associated information of each token found in `text`,
    ///   in the order in which the tokens appear.
    pub fn ordered_values<'a>(
        &'a self,
        text: &str,
    ) -> Vec<(&'a str, Option<&'a str>)> {
        let mut found = Vec::new();
        let mut rest = text;

        while let Some((_, index, after)) = next_token_in(rest) {
            if let Some((value, info)) = self.values.get(index) {
                found.push((value.as_str(), info.as_deref()));
            }

            rest = after;
        }

        found
    }

    /// Split `text` into runs of plain text and tokens of this tokenator.
    ///
    /// Token-like text that does not name a token of this tokenator is
    ///   plain text,
    ///     and adjacent plain text is a single run.
    pub fn split<'t>(&self, text: &'t str) -> Vec<Piece<'t>> {
        let mut pieces = Vec::new();
        let mut text_from = 0;
        let mut offset = 0;

        while let Some((before, index, after)) = next_token_in(&text[offset..]) {
            let start = offset + before.len();
            let end = text.len() - after.len();

            if index < self.values.len() {
                if start > text_from {
                    pieces.push(Piece::Text(&text[text_from..start]));
                }
                pieces.push(Piece::Token(&text[start..end]));
                text_from = end;
            }

            offset = end;
        }

        if text_from < text.len() {
            pieces.push(Piece::Text(&text[text_from..]));
        }

        pieces
    }

    /// Whether `text` contains any tokens.
    pub fn has_token(text: &str) -> bool {
        next_token_in(text).is_some()
    }
}

/// Locate the first well-formed token in `text`,
///   returning the text before it,
///   its index,
///   and the text after it.
fn next_token_in(text: &str) -> Option<(&str, usize, &str)> {
    let bytes = text.as_bytes();
    let mut from = 0;

    while let Some(found) = memmem::find(&bytes[from..], TOKEN_START.as_bytes())
    {
        let start = from + found;
        let digits_at = start + TOKEN_START.len();
        let digits = bytes[digits_at..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let end_at = digits_at + digits;

        if digits > 0 && bytes[end_at..].starts_with(TOKEN_END.as_bytes()) {
            // All delimiters are ASCII,
            //   so these are character boundaries.
            if let Ok(index) = text[digits_at..end_at].parse::<usize>() {
                return Some((
                    &text[..start],
                    index,
                    &text[end_at + TOKEN_END.len()..],
                ));
            }
        }

        from = start + 1;
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detokenate_single() {
        let mut sut = Tokenator::new();
        let token = sut.next_token("VALUE");

        assert_eq!(
            "<div id='VALUE'>",
            sut.detokenate(&format!("<div id='{token}'>"))
        );
    }

    #[test]
    fn detokenate_many_in_any_order() {
        let mut sut = Tokenator::new();
        let a = sut.next_token("A");
        let b = sut.next_token("B");
        let c = sut.next_token("C");

        assert_eq!(
            "C-x-A B-A",
            sut.detokenate(&format!("{c}-x-{a} {b}-{a}"))
        );
        assert_eq!("ABC", sut.detokenate(&format!("{a}{b}{c}")));
    }

    #[test]
    fn leaves_unknown_and_malformed_tokens() {
        let mut sut = Tokenator::new();
        let a = sut.next_token("A");

        let text = format!("-%%%~9~%%%- -%%%~x~%%%- {a} -%%%~");

        assert_eq!("-%%%~9~%%%- -%%%~x~%%%- A -%%%~", sut.detokenate(&text));
    }

    #[test]
    fn oversized_index_does_not_hide_later_tokens() {
        let mut sut = Tokenator::new();
        let a = sut.next_token("A");

        let huge = format!("-%%%~{}~%%%-", "9".repeat(40));
        let text = format!("{huge} {a}");

        assert_eq!(format!("{huge} A"), sut.detokenate(&text));
        assert!(Tokenator::has_token(&text));
    }

    #[test]
    fn split_into_text_and_tokens() {
        let mut sut = Tokenator::new();
        let a = sut.next_token("A");
        let b = sut.next_token("B");
        let unknown = "-%%%~7~%%%-";
        let trailing = format!(" {unknown}!");

        assert_eq!(
            vec![
                Piece::Token(a.as_str()),
                Piece::Text(" and "),
                Piece::Token(b.as_str()),
                Piece::Text(&trailing),
            ],
            sut.split(&format!("{a} and {b} {unknown}!")),
        );

        assert_eq!(Vec::<Piece>::new(), sut.split(""));
        assert_eq!(vec![Piece::Text("plain")], sut.split("plain"));
    }

    #[test]
    fn expression_token_splices_into_literal() {
        let mut sut = Tokenator::new();
        let token = sut.next_expression_token("domId0");

        assert_eq!(
            "\"<span id='\" + domId0 + \"'>\"",
            sut.detokenate(&format!("\"<span id='{token}'>\""))
        );
    }

    #[test]
    fn ordered_values_with_info() {
        let mut sut = Tokenator::new();
        let a = sut.next_token_with_info("A", "first");
        let b = sut.next_token("B");

        assert_eq!(
            vec![("B", None), ("A", Some("first"))],
            sut.ordered_values(&format!("x{b}y{a}z"))
        );
        assert!(Tokenator::has_token(&a));
        assert!(!Tokenator::has_token("plain"));
        assert_eq!(2, sut.len());
    }
}
