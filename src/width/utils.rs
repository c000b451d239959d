//! Terminal display width helpers.
//!
//! Provides ANSI-aware width calculation for rendered cell content so
//! column padding stays aligned even when labels carry color codes.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Truncate `text` to at most `max_width` display cells, ANSI-blind.
///
/// Plain text only: escape sequences count as zero width in measurement
/// but survive truncation intact, so callers strip styling first when a
/// hard cut matters.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        width += ch_width;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_counts_bytes() {
        assert_eq!(display_width("filler"), 6);
    }

    #[test]
    fn ansi_escapes_are_invisible() {
        assert_eq!(display_width("\x1b[1;32mok\x1b[0m"), 2);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncation_respects_cell_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }
}
