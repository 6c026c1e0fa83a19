//! String utilities for the domain layer.

/// Normalize an identifier for comparison: trimmed and lower-cased
pub fn normalize_identifier(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries. Invoked names are untrusted, so anything
/// echoed back in a diagnostic message goes through this first.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
