const MAX_ERROR_LENGTH: usize = 500;

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Like `truncate_chars`, with `...` appended when anything was cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let cut = truncate_chars(text, max);
    if cut.len() < text.len() {
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Shorten provider error bodies before they reach the log.
pub fn truncate_error(error: &str) -> String {
    truncate_with_ellipsis(error, MAX_ERROR_LENGTH)
}
