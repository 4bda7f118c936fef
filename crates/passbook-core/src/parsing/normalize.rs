/// Collapse every run of whitespace to a single space and trim the ends.
pub fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when the text carries at least one letter.
pub fn has_alphabetic(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

/// Take up to `n` characters ending at byte offset `end`.
pub(crate) fn chars_before(s: &str, end: usize, n: usize) -> String {
    let mut window: Vec<char> = s[..end].chars().rev().take(n).collect();
    window.reverse();
    window.into_iter().collect()
}

/// Take up to `n` characters starting at byte offset `start`.
pub(crate) fn chars_after(s: &str, start: usize, n: usize) -> String {
    s[start..].chars().take(n).collect()
}
