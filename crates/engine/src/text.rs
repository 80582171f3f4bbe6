//! Character-safe text helpers.

/// Return at most `max_chars` characters of `text`, never splitting a code point.
pub fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
