//! Lexer for raw command strings.
//!
//! A command string is split into three kinds of [`Token`]:
//!
//! | Input        | Kind                     | Text        |
//! |--------------|--------------------------|-------------|
//! | `--name`     | [`TokenKind::LongName`]  | `name`      |
//! | `-n`         | [`TokenKind::ShortName`] | `n`         |
//! | `value`      | [`TokenKind::Value`]     | `value`     |
//! | `"a b"`      | [`TokenKind::Value`]     | `a b`       |
//! | `-` / `--`   | [`TokenKind::Value`]     | `-` / `--`  |
//!
//! A closing quote always ends its token, so `"a"b` is the two values `a`
//! and `b`.
//!
//! [`Tokenizer`] is a lazy, forward-only cursor. It never rewinds; callers
//! that need to try a match and back out clone the cursor first.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::{Tokenizer, TokenKind};
//!
//! let kinds: Vec<_> = Tokenizer::new("ban --reason \"too loud\" -q")
//!     .map(|t| (t.kind, t.text))
//!     .collect();
//!
//! assert_eq!(
//!     kinds,
//!     vec![
//!         (TokenKind::Value, "ban"),
//!         (TokenKind::LongName, "reason"),
//!         (TokenKind::Value, "too loud"),
//!         (TokenKind::ShortName, "q"),
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `--name`
    LongName,
    /// `-n`
    ShortName,
    /// Anything else, including quoted runs.
    Value,
}

/// One lexical unit of a command string, borrowing its text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Lexical class.
    pub kind: TokenKind,
    /// Token text with any dash prefix or surrounding quotes removed.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Creates a [`TokenKind::Value`] token.
    pub fn value(text: &'a str) -> Self {
        Self {
            kind: TokenKind::Value,
            text,
        }
    }
}

/// Forward-only token cursor over one input string.
///
/// Cloning a tokenizer takes an independent snapshot of its position; both
/// copies then advance separately.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a cursor positioned before the first token of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.input[self.pos..].trim_start().is_empty()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.input[self.pos..];
        let run = rest.trim_start();
        if run.is_empty() {
            self.pos = self.input.len();
            return None;
        }
        let start = self.input.len() - run.len();

        if let Some(quote) = run.chars().next().filter(|c| *c == '"' || *c == '\'') {
            let body = &run[quote.len_utf8()..];
            // An unterminated quote runs to end of input.
            return match body.find(quote) {
                Some(end) => {
                    self.pos = start + quote.len_utf8() + end + quote.len_utf8();
                    Some(Token::value(&body[..end]))
                }
                None => {
                    self.pos = self.input.len();
                    Some(Token::value(body))
                }
            };
        }

        let end = run.find(char::is_whitespace).unwrap_or(run.len());
        self.pos = start + end;
        Some(classify(&run[..end]))
    }
}

fn classify(run: &str) -> Token<'_> {
    if let Some(name) = run.strip_prefix("--") {
        if name.is_empty() {
            return Token::value(run);
        }
        return Token {
            kind: TokenKind::LongName,
            text: name,
        };
    }

    if let Some(name) = run.strip_prefix('-') {
        let mut chars = name.chars();
        if chars.next().is_some() && chars.next().is_none() {
            return Token {
                kind: TokenKind::ShortName,
                text: name,
            };
        }
    }

    Token::value(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(input).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(
            lex("  a\tb \n c  "),
            vec![
                (TokenKind::Value, "a"),
                (TokenKind::Value, "b"),
                (TokenKind::Value, "c"),
            ]
        );
    }

    #[test]
    fn test_names_strip_prefix() {
        assert_eq!(
            lex("--verbose -v"),
            vec![(TokenKind::LongName, "verbose"), (TokenKind::ShortName, "v")]
        );
    }

    #[test]
    fn test_bare_dashes_degrade_to_values() {
        assert_eq!(
            lex("- --"),
            vec![(TokenKind::Value, "-"), (TokenKind::Value, "--")]
        );
    }

    #[test]
    fn test_multi_char_single_dash_is_value() {
        assert_eq!(lex("-abc"), vec![(TokenKind::Value, "-abc")]);
    }

    #[test]
    fn test_short_name_is_one_char_not_one_byte() {
        assert_eq!(lex("-é"), vec![(TokenKind::ShortName, "é")]);
    }

    #[test]
    fn test_quoted_value_keeps_whitespace() {
        assert_eq!(
            lex("say \"hello  world\" 'it is' done"),
            vec![
                (TokenKind::Value, "say"),
                (TokenKind::Value, "hello  world"),
                (TokenKind::Value, "it is"),
                (TokenKind::Value, "done"),
            ]
        );
    }

    #[test]
    fn test_closing_quote_ends_the_token() {
        assert_eq!(
            lex("\"a\"b 'c'--d"),
            vec![
                (TokenKind::Value, "a"),
                (TokenKind::Value, "b"),
                (TokenKind::Value, "c"),
                (TokenKind::LongName, "d"),
            ]
        );
    }

    #[test]
    fn test_quoted_name_is_a_value() {
        assert_eq!(lex("\"--name\""), vec![(TokenKind::Value, "--name")]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(
            lex("echo \"open ended --x"),
            vec![
                (TokenKind::Value, "echo"),
                (TokenKind::Value, "open ended --x"),
            ]
        );
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
        assert!(Tokenizer::new(" ").is_exhausted());
    }

    #[test]
    fn test_clone_is_an_independent_snapshot() {
        let mut cursor = Tokenizer::new("a b c");
        cursor.next();
        let mut snapshot = cursor.clone();

        assert_eq!(cursor.next().map(|t| t.text), Some("b"));
        assert_eq!(cursor.next().map(|t| t.text), Some("c"));
        assert_eq!(snapshot.next().map(|t| t.text), Some("b"));
    }
}
