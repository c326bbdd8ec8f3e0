//! Text normalization applied before chunking.
//!
//! Offsets recorded on chunks always refer to the *cleaned* text, so every
//! caller that wants traceable offsets has to run [`clean_text`] first.

/// Normalize raw extracted text.
///
/// Every run of whitespace (newlines and tabs included) collapses to a
/// single space, remaining control characters are dropped and the result is
/// trimmed. All other characters are kept as-is.
pub fn clean_text(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(c);
    }

    cleaned
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
