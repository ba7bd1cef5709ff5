//! Table formatting utilities for CLI output.

/// Truncates a string to a maximum length, adding "..." if needed.
///
/// Counts characters, so voice names with accents are never split.
///
/// # Examples
///
/// ```rust
/// use narrate_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Samantha", 10), "Samantha");
/// assert_eq!(truncate_string("Microsoft Zira", 8), "Micro...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation_needed() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn test_truncate_string_exact_length() {
        assert_eq!(truncate_string("exactly10c", 10), "exactly10c");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("Amélie Québécoise", 9), "Amélie...");
    }
}
