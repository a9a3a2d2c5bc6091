//! Splitting raw database names into words.

use std::iter::Peekable;
use std::str::CharIndices;

/// Iterator over the words of a raw name.
///
/// Boundaries are:
/// - any character outside `[A-Za-z0-9]` (the character itself is dropped,
///   which covers `_`, `-`, spaces and dots)
/// - lowercase or digit followed by uppercase (`businessEntity`)
/// - the last capital of an uppercase run when it starts a new word (`IDCard`)
///
/// Words borrow from the source, so cloning the iterator restarts nothing but
/// the cursor.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Words<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_separators(&mut self) -> Option<usize> {
        loop {
            let &(i, c) = self.chars.peek()?;
            if is_word_char(c) {
                return Some(i);
            }
            self.chars.next();
        }
    }

    fn char_after(&self, i: usize, c: char) -> Option<char> {
        self.source[i + c.len_utf8()..].chars().next()
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.skip_separators()?;
        let mut end = start;
        let mut prev: Option<char> = None;

        while let Some(&(i, c)) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            if let Some(p) = prev {
                if is_boundary(p, c, self.char_after(i, c)) {
                    break;
                }
            }
            self.chars.next();
            prev = Some(c);
            end = i + c.len_utf8();
        }

        Some(&self.source[start..end])
    }
}

/// Split a raw name into words.
pub fn words(name: &str) -> Words<'_> {
    Words::new(name)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_lower_or_digit(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn is_boundary(prev: char, current: char, next: Option<char>) -> bool {
    if !current.is_ascii_uppercase() {
        return false;
    }
    if is_lower_or_digit(prev) {
        return true;
    }
    // Acronym followed by a word: `ID` + `Card`
    prev.is_ascii_uppercase() && next.is_some_and(is_lower_or_digit)
}
