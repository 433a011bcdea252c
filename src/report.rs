//! # Probe Report Formatting
//!
//! Stateless styling helpers for probe output. Each helper takes a semantic
//! label rather than a color, so callers never deal with escape codes.

use console::style;

/// Semantic label for a line of probe output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Header,
    Success,
    Error,
    Info,
}

/// Style `text` according to its semantic label.
pub fn styled(label: Label, text: &str) -> String {
    match label {
        Label::Header => style(text).yellow().to_string(),
        Label::Success => style(format!("✓ {}", text)).green().to_string(),
        Label::Error => style(format!("✗ {}", text)).red().to_string(),
        Label::Info => style(format!("ℹ {}", text)).blue().to_string(),
    }
}

/// Print a test section header framed by rules.
pub fn header(text: &str) {
    println!();
    println!("{}", styled(Label::Header, &"=".repeat(50)));
    println!("{}", styled(Label::Header, text));
    println!("{}", styled(Label::Header, &"=".repeat(50)));
}

pub fn success(text: &str) {
    println!("{}", styled(Label::Success, text));
}

pub fn error(text: &str) {
    println!("{}", styled(Label::Error, text));
}

pub fn info(text: &str) {
    println!("{}", styled(Label::Info, text));
}

/// Print an indented detail line under a result.
pub fn detail(text: &str) {
    println!("  {}", text);
}

/// Truncate `text` to at most `max` characters, appending an ellipsis
/// marker only when something was cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Mask a credential for display: first 10 characters plus an ellipsis.
pub fn mask_key(key: &str) -> String {
    let head: String = key.chars().take(10).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(250);
        let shown = truncate(&body, 100);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));
        assert_eq!(&shown[..100], "x".repeat(100).as_str());
    }

    #[test]
    fn test_truncate_short_body_unchanged() {
        let body = "y".repeat(50);
        assert_eq!(truncate(&body, 100), body);
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let body = "z".repeat(100);
        assert_eq!(truncate(&body, 100), body);
    }

    #[test]
    fn test_truncate_is_char_aware() {
        let body = "é".repeat(120);
        let shown = truncate(&body, 100);
        assert_eq!(shown.chars().count(), 103);
    }

    #[test]
    fn test_mask_key_prefix() {
        assert_eq!(mask_key("sk-1234567890abcdef"), "sk-1234567...");
    }

    #[test]
    fn test_styled_labels_carry_markers() {
        assert!(styled(Label::Success, "ok").contains("✓ ok"));
        assert!(styled(Label::Error, "bad").contains("✗ bad"));
        assert!(styled(Label::Info, "note").contains("ℹ note"));
    }
}
