/// Cuts `text` to `max_chars` characters and appends `ellipsis` when it was
/// longer. Counts characters, not bytes.
pub fn truncate(text: &str, max_chars: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{ellipsis}", &text[..byte_idx]),
        None => text.to_string(),
    }
}
