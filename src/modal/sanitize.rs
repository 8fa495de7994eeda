//! Encoding of untrusted dialog text
//!
//! Messages frequently carry server-provided strings (`data.message` from the
//! REST API). Before they reach the terminal buffer every escape sequence and
//! control character is removed so the text cannot move the cursor, recolor
//! the screen or set the window title.

use regex::Regex;
use std::sync::OnceLock;

const TAB_WIDTH: usize = 4;

fn escape_sequences() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // OSC (terminated by BEL or ST), CSI, then any other two-byte ESC sequence.
        Regex::new(r"\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)?|\x1b\[[0-?]*[ -/]*[@-~]|\x1b[@-Z\\-_]?")
            .unwrap_or_else(|e| panic!("invalid escape pattern: {}", e))
    })
}

/// Make untrusted text safe to place in the terminal buffer.
///
/// Newlines survive, tabs become spaces, carriage returns and every other
/// control character are dropped.
pub fn encode_untrusted(text: &str) -> String {
    let stripped = escape_sequences().replace_all(text, "");
    let mut encoded = String::with_capacity(stripped.len());

    for c in stripped.chars() {
        match c {
            '\n' => encoded.push('\n'),
            '\t' => encoded.extend(std::iter::repeat(' ').take(TAB_WIDTH)),
            c if c.is_control() => {}
            c => encoded.push(c),
        }
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_untouched() {
        let text = "Are you sure you want to clear your cart? (RM 42.00)";
        assert_eq!(encode_untrusted(text), text);
        assert_eq!(encode_untrusted("✓ ünïcødé"), "✓ ünïcødé");
    }

    #[test]
    fn test_strips_csi_and_osc_sequences() {
        assert_eq!(encode_untrusted("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(encode_untrusted("\x1b[2J\x1b[Hwiped"), "wiped");
        assert_eq!(encode_untrusted("\x1b]0;pwned\x07title"), "title");
        assert_eq!(encode_untrusted("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(encode_untrusted("a\rb\x07c\x00d"), "abcd");
        assert_eq!(encode_untrusted("line1\nline2"), "line1\nline2");
        assert_eq!(encode_untrusted("a\tb"), "a    b");
        assert_eq!(encode_untrusted("lone\x1b"), "lone");
    }

    #[test]
    fn test_markup_is_kept_as_text() {
        let text = "<img src=x onerror=alert(1)>";
        assert_eq!(encode_untrusted(text), text);
    }
}
