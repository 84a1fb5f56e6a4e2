use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker appended to clamped text.
pub const ELLIPSIS: &str = "…";
const ELLIPSIS_WIDTH: usize = 1;

/// Width of `s` in terminal columns. CJK and emoji count as two.
///
/// ```
/// use deep_report::util::display_width;
///
/// assert_eq!(display_width("news"), 4);
/// assert_eq!(display_width("새 기사"), 7);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Byte index of the longest prefix of `s` fitting in `max_width` columns.
fn fit_prefix(s: &str, max_width: usize) -> usize {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if width + w > max_width {
            return idx;
        }
        width += w;
    }
    s.len()
}

/// Clip `s` to `max_width` columns, ending in `…` when anything was cut.
///
/// Borrows when the text already fits.
///
/// ```
/// use deep_report::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
/// assert_eq!(truncate_to_width("인공지능", 5), "인공…");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width < ELLIPSIS_WIDTH {
        return Cow::Borrowed("");
    }
    let cut = fit_prefix(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", s[..cut].trim_end(), ELLIPSIS))
}

/// Word-wrap `s` into lines no wider than `width` columns.
///
/// Existing newlines are kept as paragraph breaks. Words wider than the
/// line are split at character boundaries. A zero width yields no lines.
pub fn wrap_to_width(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in s.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let first = lines.len();
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word;
            let mut word_width = display_width(word);

            let needed = if line.is_empty() { word_width } else { word_width + 1 };
            if line_width + needed <= width {
                if !line.is_empty() {
                    line.push(' ');
                    line_width += 1;
                }
                line.push_str(word);
                line_width += word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }

            while word_width > width {
                let cut = fit_prefix(word, width).max(word.chars().next().map_or(0, char::len_utf8));
                lines.push(word[..cut].to_string());
                word = &word[cut..];
                word_width = display_width(word);
            }
            line.push_str(word);
            line_width = word_width;
        }

        if !line.is_empty() || lines.len() == first {
            lines.push(line);
        }
    }
    lines
}

/// Collapse all whitespace runs, newlines included, into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Everything received from the API passes through here before rendering.
/// Tabs, newlines and carriage returns survive. CSI sequences (`ESC [`) are
/// dropped through their final byte and OSC sequences (`ESC ]`) through BEL
/// or `ESC \`.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < bytes.len() {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < bytes.len() {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            },
            b if is_stripped_control(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != 0x1b && !is_stripped_control(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes end a run, so the slice is on char boundaries.
                out.push_str(&s[start..i]);
            }
        }
    }
    Cow::Owned(out)
}

/// Strip control sequences, then flatten to one line.
pub fn sanitize_inline(s: &str) -> String {
    single_line(&strip_control_chars(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_fits_borrows() {
        assert!(matches!(truncate_to_width("Short", 5), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello W…");
        // Trailing space before the ellipsis is dropped
        assert_eq!(truncate_to_width("Hello World", 7), "Hello…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("인공지능 뉴스", 6), "인공…");
        assert_eq!(truncate_to_width("인공지능", 4), "인…");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "…");
        assert_eq!(truncate_to_width("Test", 2), "T…");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap_to_width("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        assert_eq!(wrap_to_width("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_long_word_after_short_one() {
        assert_eq!(
            wrap_to_width("ab cdefghij k", 4),
            vec!["ab", "cdef", "ghij", "k"]
        );
    }

    #[test]
    fn test_wrap_wide_chars() {
        assert_eq!(wrap_to_width("가나다라마", 4), vec!["가나", "다라", "마"]);
    }

    #[test]
    fn test_wrap_zero_width() {
        assert!(wrap_to_width("anything", 0).is_empty());
    }

    #[test]
    fn test_wrap_width_one_with_wide_char_makes_progress() {
        // A 2-column char cannot fit in 1 column; it still gets its own line
        assert_eq!(wrap_to_width("가나", 1), vec!["가", "나"]);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  a\n b\t\tc  "), "a b c");
    }

    #[test]
    fn test_strip_clean_text_borrows() {
        let input = "line1\nline2\ttab";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_controls_and_del() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x7f!"), "hello!");
    }

    #[test]
    fn test_strip_csi_and_osc() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("새 \x1b[1m기사\x1b[0m"), "새 기사");
    }

    #[test]
    fn test_sanitize_inline() {
        assert_eq!(sanitize_inline("Breaking:\n\x1b[5mGPT\x1b[0m  news"), "Breaking: GPT news");
    }
}
