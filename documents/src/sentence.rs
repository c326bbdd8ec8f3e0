//! Lazy, deterministic sentence splitting.
//!
//! Boundary detection is heuristic. A sentence ends at a run of `.`, `?` or
//! `!` (optionally followed by closing quotes or brackets) when:
//!
//! 1. the run is followed by whitespace,
//! 2. the next non-whitespace character is not lowercase, and
//! 3. for a lone `.`, the word before it is neither a single letter (an
//!    initial such as `J.`) nor one of [`ABBREVIATIONS`].
//!
//! Decimal numbers never split because the `.` is not followed by
//! whitespace. Text after the last terminator is yielded as a final
//! sentence. The whitespace between sentences belongs to no sentence.

/// Words that end in a period without ending the sentence. Compared
/// case-insensitively against the word preceding a lone `.`.
pub const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "no", "fig", "u.s",
];

/// A single sentence borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Sentence text, without surrounding whitespace.
    pub text: &'a str,

    /// Char offset of the first character.
    pub start: usize,

    /// Char offset one past the last character.
    pub end: usize,

    pub(crate) byte_start: usize,
    pub(crate) byte_end: usize,
}

/// Iterator over the sentences of a text. Created by [`sentences`].
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

/// Split `text` into sentences lazily.
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences {
        text,
        byte_pos: 0,
        char_pos: 0,
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Sentence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.byte_pos..];
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        self.char_pos += rest[..skipped].chars().count();
        self.byte_pos += skipped;

        if trimmed.is_empty() {
            return None;
        }

        let consumed = find_boundary(trimmed).unwrap_or(trimmed.len());
        let text = trimmed[..consumed].trim_end();

        let start = self.char_pos;
        let byte_start = self.byte_pos;
        let sentence = Sentence {
            text,
            start,
            end: start + text.chars().count(),
            byte_start,
            byte_end: byte_start + text.len(),
        };

        self.char_pos += trimmed[..consumed].chars().count();
        self.byte_pos += consumed;

        Some(sentence)
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '?' | '!')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

/// Byte length of the first sentence in `text`, or `None` if the whole
/// remainder is a single sentence.
fn find_boundary(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        let mut terminators = 1;
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if is_terminator(next) {
                terminators += 1;
            } else if !is_closer(next) {
                break;
            }
            end = next_idx + next.len_utf8();
            chars.next();
        }

        let tail = &text[end..];
        if !tail.starts_with(char::is_whitespace) {
            continue;
        }
        match tail.trim_start().chars().next() {
            None => return None,
            Some(next) if next.is_lowercase() => continue,
            Some(_) => {}
        }
        if terminators == 1 && c == '.' && ends_with_abbreviation(&text[..idx]) {
            continue;
        }

        return Some(end);
    }

    None
}

fn ends_with_abbreviation(prefix: &str) -> bool {
    let word = prefix
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => first.is_alphabetic(),
        (Some(_), Some(_)) => ABBREVIATIONS.contains(&word.as_str()),
        _ => false,
    }
}
