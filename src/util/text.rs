use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Removes terminal control characters and ANSI escape sequences.
///
/// Feed titles and descriptions are attacker-controlled; the CLI runs them
/// through this before printing. Tab and newline survive; a carriage return does
/// not, since it can overwrite what was already printed on the line.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(needs_strip) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !needs_strip(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            // CSI: ESC [ params... final byte in @..~
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: ESC ] ... terminated by BEL or ESC \
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

fn needs_strip(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n'
}

/// Terminal columns `s` occupies. CJK and most emoji take two.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Cuts `s` so it renders in at most `max_cols` terminal columns, marking the
/// cut with `...`.
///
/// Widths of three columns or fewer leave no room for the marker; the result is
/// then just the leading characters that fit. A wide character is never split,
/// so the result can come out one column short.
pub fn truncate_to_width(s: &str, max_cols: usize) -> Cow<'_, str> {
    if display_width(s) <= max_cols {
        return Cow::Borrowed(s);
    }

    let budget = if max_cols > ELLIPSIS_WIDTH {
        max_cols - ELLIPSIS_WIDTH
    } else {
        max_cols
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    if max_cols > ELLIPSIS_WIDTH {
        Cow::Owned(format!("{}{ELLIPSIS}", &s[..cut]))
    } else {
        Cow::Owned(s[..cut].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_borrowed() {
        assert!(matches!(strip_control_chars("Plain title"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_csi_sequence_removed() {
        assert_eq!(strip_control_chars("Evil\x1b[31m Feed"), "Evil Feed");
    }

    #[test]
    fn test_osc_sequence_removed() {
        assert_eq!(
            strip_control_chars("a\x1b]0;title\x07b \x1b]8;;x\x1b\\c"),
            "ab c"
        );
    }

    #[test]
    fn test_bell_and_carriage_return_removed() {
        assert_eq!(strip_control_chars("About\x07 things\r"), "About things");
        assert_eq!(strip_control_chars("keep\ttab\nnewline"), "keep\ttab\nnewline");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("Sunset"), 6);
        assert_eq!(display_width("日本語"), 6);
        assert_eq!(display_width("Hi 🎉"), 5);
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert!(matches!(truncate_to_width("fits", 4), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_cjk_counts_columns() {
        let title = "日本語のタイトル".repeat(20);
        let cut = truncate_to_width(&title, 72);
        assert!(display_width(&cut) <= 72, "{} cols", display_width(&cut));
        assert!(cut.ends_with("..."));
        // 69 columns of budget fit 34 two-column chars.
        assert_eq!(cut.chars().count(), 34 + 3);
    }

    #[test]
    fn test_truncate_emoji() {
        let cut = truncate_to_width("🎉🎉🎉🎉🎉", 7);
        assert_eq!(cut, "🎉🎉...");
        assert_eq!(display_width(&cut), 7);
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Testing", 2), "Te");
        assert_eq!(truncate_to_width("日本", 1), "");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }
}
