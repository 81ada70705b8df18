//! Parsing of the os-release file format.
//!
//! os-release files are a restricted subset of shell variable assignments, one per line:
//!
//! ```text
//! document   := line ('\n' line)* EOF
//! line       := ws* (variable | comment | '') ws*
//! comment    := '#' any-character* (to end of line)
//! variable   := identifier ws* '=' ws* value
//! identifier := [a-zA-Z_][a-zA-Z_0-9]*
//! value      := unquoted | quoted
//! unquoted   := [a-zA-Z_0-9.-]*
//! quoted     := '"' escaped-chars* '"' | "'" escaped-chars* "'"
//! ws         := ' ' | '\t'
//! ```
//!
//! Inside either kind of quotes exactly five escape sequences are recognised: `\$`, `\"`, `\'`,
//! `\\` and `` \` ``.  Any other backslash is kept as-is.  There is no variable expansion: a `$`
//! outside of quotes is a syntax error rather than something we silently pass through.
//!
//! The document either parses completely or not at all.  The [`Line`]s produced by
//! [`parse_lines()`] are folded into an ordered set of [`Assignments`] by [`parse()`].

use std::{iter::Peekable, str::Chars};

use thiserror::Error;

/// Characters which may follow a backslash in a quoted value to produce themselves.
const ESCAPABLE: &[char] = &['$', '"', '\'', '\\', '`'];

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_unquoted_char(c: char) -> bool {
    is_name_char(c) || c == '-' || c == '.'
}

/// The different ways an os-release document can fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A line started with something other than a variable name or a comment.
    #[error("unexpected {0:?}, expected a variable name or a comment")]
    InvalidName(char),

    /// The variable name wasn't followed by `=`.
    #[error("expected '=' after variable name")]
    ExpectedEquals,

    /// A character outside of the unquoted set appeared in an unquoted value.
    #[error("unexpected {0:?} in unquoted value")]
    InvalidUnquoted(char),

    /// A quoted value was still open at the end of the input.
    #[error("unterminated {0}-quoted value")]
    UnterminatedQuote(char),

    /// Something other than whitespace followed a complete value on the same line.
    #[error("expected end of line")]
    ExpectedEndOfLine,
}

/// A syntax error, along with the position where it was detected.
///
/// Lines and columns are 1-based and columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct SyntaxError {
    /// The line containing the error.
    pub line: usize,
    /// The column of the offending character.
    pub column: usize,
    /// What went wrong.
    pub kind: SyntaxErrorKind,
}

/// A single parsed line of an os-release document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// An empty line, or one with only whitespace.
    Blank,
    /// A comment.  The text follows the `#`.
    Comment(String),
    /// A variable assignment with its value fully unquoted and unescaped.
    Assignment {
        /// The variable name.
        key: String,
        /// The decoded value.
        value: String,
    },
}

/// The variable assignments of an os-release document, in order.
///
/// Assigning the same key twice keeps only the last value, and the key moves to the position of
/// its last assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignments {
    entries: Vec<(String, String)>,
}

impl Assignments {
    /// Creates an empty set of assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `key`, returning the value it replaced, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let previous = self.remove(&key);
        self.entries.push((key, value.into()));
        previous
    }

    /// Returns the value assigned to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no assignments at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Assignments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut assignments = Self::new();
        for (key, value) in iter {
            assignments.insert(key, value);
        }
        assignments
    }
}

impl IntoIterator for Assignments {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(c) = self.peek().filter(|c| pred(*c)) {
            result.push(c);
            self.bump();
        }
        result
    }

    fn skip_blanks(&mut self) {
        while self.peek().is_some_and(is_blank) {
            self.bump();
        }
    }

    /// An error at the position of the next unread character.
    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            line: self.line,
            column: self.column,
            kind,
        }
    }

    fn line(&mut self) -> Result<Line, SyntaxError> {
        self.skip_blanks();
        let line = match self.peek() {
            None | Some('\n') => Line::Blank,
            Some('#') => {
                self.bump();
                Line::Comment(self.take_while(|c| c != '\n'))
            }
            Some(c) if is_name_start(c) => self.assignment()?,
            Some(c) => return Err(self.error(SyntaxErrorKind::InvalidName(c))),
        };
        self.skip_blanks();
        Ok(line)
    }

    fn assignment(&mut self) -> Result<Line, SyntaxError> {
        let key = self.take_while(is_name_char);
        self.skip_blanks();
        if !self.eat('=') {
            return Err(self.error(SyntaxErrorKind::ExpectedEquals));
        }
        self.skip_blanks();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.quoted(quote)?,
            _ => self.unquoted()?,
        };

        Ok(Line::Assignment { key, value })
    }

    fn unquoted(&mut self) -> Result<String, SyntaxError> {
        let value = self.take_while(is_unquoted_char);
        match self.peek() {
            Some(c) if c != '\n' && !is_blank(c) => {
                Err(self.error(SyntaxErrorKind::InvalidUnquoted(c)))
            }
            _ => Ok(value),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SyntaxError> {
        // An unterminated quote is reported where it was opened
        let unterminated = self.error(SyntaxErrorKind::UnterminatedQuote(quote));
        self.bump();

        let mut result = String::new();
        loop {
            match self.bump().ok_or_else(|| unterminated.clone())? {
                '\\' => match self.peek() {
                    Some(c) if ESCAPABLE.contains(&c) => {
                        self.bump();
                        result.push(c);
                    }
                    _ => result.push('\\'),
                },
                c if c == quote => break,
                c => result.push(c),
            }
        }

        Ok(result)
    }

    /// Consumes the newline ending the current line.  Returns false at the end of the input.
    fn end_of_line(&mut self) -> Result<bool, SyntaxError> {
        match self.peek() {
            None => Ok(false),
            Some('\n') => {
                self.bump();
                Ok(true)
            }
            Some(_) => Err(self.error(SyntaxErrorKind::ExpectedEndOfLine)),
        }
    }
}

/// Parses an os-release document into its individual lines.
///
/// Every line of the input produces exactly one [`Line`], so a trailing newline results in a
/// final [`Line::Blank`].
pub fn parse_lines(text: &str) -> Result<Vec<Line>, SyntaxError> {
    let mut cursor = Cursor::new(text);
    let mut lines = vec![];

    loop {
        lines.push(cursor.line()?);
        if !cursor.end_of_line()? {
            break;
        }
    }

    Ok(lines)
}

/// Parses an os-release document into its variable assignments.
pub fn parse(text: &str) -> Result<Assignments, SyntaxError> {
    let assignments: Assignments = parse_lines(text)?
        .into_iter()
        .filter_map(|line| match line {
            Line::Assignment { key, value } => Some((key, value)),
            Line::Blank | Line::Comment(_) => None,
        })
        .collect();

    log::trace!("parsed {} os-release assignments", assignments.len());
    Ok(assignments)
}
