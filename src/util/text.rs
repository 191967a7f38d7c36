//! Utility functions for text handling

/// Byte index of the `char_idx`-th character, or `s.len()` past the end
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Number of characters (not bytes) in `s`
#[inline]
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters of `s`
pub fn take_chars(s: &str, max: usize) -> &str {
    &s[..char_to_byte(s, max)]
}

/// Whitespace-separated tokens of the trimmed text
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Fold `\r\n` and lone `\r` into `\n`
pub fn normalize_newlines(s: &str) -> String {
    if !s.contains('\r') {
        return s.to_string();
    }
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Escape text content for HTML output
pub fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for HTML output (double-quoted)
pub fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_byte_multibyte() {
        let s = "añb";
        assert_eq!(char_to_byte(s, 0), 0);
        assert_eq!(char_to_byte(s, 1), 1);
        assert_eq!(char_to_byte(s, 2), 3);
        assert_eq!(char_to_byte(s, 3), 4);
        assert_eq!(char_to_byte(s, 10), 4);
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("abc", 0), "");
        assert_eq!(take_chars("abc", 5), "abc");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("  hello   world\n\tagain "), 3);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain"), "plain");
    }

    #[test]
    fn test_escape() {
        let mut out = String::new();
        escape_text("a < b & c", &mut out);
        assert_eq!(out, "a &lt; b &amp; c");

        let mut attr = String::new();
        escape_attr("say \"hi\"", &mut attr);
        assert_eq!(attr, "say &quot;hi&quot;");
    }
}
