//! Char-safe truncation

/// Keep at most `max_chars` Unicode scalar values of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Wrap `body` as `{prefix}{body}{suffix}`, trimming `body` so the whole
/// string stays within `max_chars`
pub fn wrap_capped(prefix: &str, body: &str, suffix: &str, max_chars: usize) -> String {
    let frame = prefix.chars().count() + suffix.chars().count();
    let room = max_chars.saturating_sub(frame);
    format!("{}{}{}", prefix, truncate_chars(body, room), suffix)
}
