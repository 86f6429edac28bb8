//! Display-width aware text primitives.
//!
//! Every layout decision in the engine flows through this module so that a
//! single authority decides how many terminal columns a piece of text
//! occupies. Widths come from `unicode-width`: combining marks and control
//! characters count 0, East Asian wide glyphs count 2, everything else 1.

use std::borrow::Cow;
use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::{RenderError, Result};

/// Glyph appended by [`truncate`] when text is clipped.
pub const ELLIPSIS: char = '…';

/// Display width of a single character: 0, 1 or 2 columns.
#[must_use]
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Display width of a string in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Word-wrap `text` to `cols` columns, returning owned lines.
///
/// Hard line breaks (`\n`) are honored. Within a line, words are packed
/// greedily while the cumulative display width stays within `cols`; a single
/// word wider than `cols` is hard-split into width-aware pieces. Whitespace
/// at a soft wrap point is consumed.
#[must_use]
pub fn wrap(text: &str, cols: usize) -> Vec<String> {
    wrap_ranges(text, cols)
        .into_iter()
        .map(|r| text[r].to_string())
        .collect()
}

/// Like [`wrap`], but returns byte ranges into `text`.
///
/// The compositor needs stable source offsets to re-attach styled spans and
/// placeholder slots to wrapped lines, which owned strings cannot provide.
#[must_use]
pub fn wrap_ranges(text: &str, cols: usize) -> Vec<Range<usize>> {
    let cols = cols.max(1);
    let mut out = Vec::new();

    let mut line_start = 0;
    for segment in text.split('\n') {
        let line_end = line_start + segment.len();
        wrap_hard_line(text, line_start..line_end, cols, &mut out);
        line_start = line_end + 1;
    }

    if out.is_empty() {
        out.push(0..0);
    }
    out
}

/// Wrap one newline-delimited segment of `text` into `out`.
fn wrap_hard_line(text: &str, line: Range<usize>, cols: usize, out: &mut Vec<Range<usize>>) {
    let words = word_ranges(text, line.clone());
    if words.is_empty() {
        // Blank (or whitespace-only) line.
        out.push(line.start..line.start);
        return;
    }

    // (start, end, width) of the soft line being packed.
    let mut cur: Option<(usize, usize, usize)> = None;

    for word in words {
        let word_width = display_width(&text[word.clone()]);
        match cur {
            None => {
                if word_width <= cols {
                    cur = Some((word.start, word.end, word_width));
                } else {
                    cur = Some(hard_split(text, word, cols, out));
                }
            }
            Some((start, end, width)) => {
                let gap = display_width(&text[end..word.start]);
                if width + gap + word_width <= cols {
                    cur = Some((start, word.end, width + gap + word_width));
                } else {
                    out.push(start..end);
                    if word_width <= cols {
                        cur = Some((word.start, word.end, word_width));
                    } else {
                        cur = Some(hard_split(text, word, cols, out));
                    }
                }
            }
        }
    }

    if let Some((start, end, _)) = cur {
        out.push(start..end);
    }
}

/// Split an over-wide word into `<= cols` pieces, pushing all full pieces and
/// returning the trailing partial piece so following words can join it.
fn hard_split(
    text: &str,
    word: Range<usize>,
    cols: usize,
    out: &mut Vec<Range<usize>>,
) -> (usize, usize, usize) {
    let mut start = word.start;
    let mut end = word.start;
    let mut width = 0;

    for (idx, ch) in text[word.clone()].char_indices() {
        let cw = char_width(ch);
        if width + cw > cols && width > 0 {
            out.push(start..end);
            start = word.start + idx;
            width = 0;
        }
        width += cw;
        end = word.start + idx + ch.len_utf8();
    }

    (start, end, width)
}

/// Byte ranges of the whitespace-separated words in `line`.
///
/// Leading whitespace of the line is folded into the first word so that
/// indentation (pre-formatted blocks) survives wrapping.
fn word_ranges(text: &str, line: Range<usize>) -> Vec<Range<usize>> {
    let slice = &text[line.clone()];
    let mut words: Vec<Range<usize>> = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in slice.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                words.push(line.start + start..line.start + idx);
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        words.push(line.start + start..line.end);
    }

    if let Some(first) = words.first_mut()
        && first.start > line.start
    {
        first.start = line.start;
    }
    words
}

/// Clip `text` to at most `cols` columns, appending an ellipsis.
///
/// Text that already fits is returned borrowed and unchanged; callers rely on
/// `Cow::Borrowed` to detect the no-op. Requires `cols >= 1`.
pub fn truncate(text: &str, cols: usize) -> Result<Cow<'_, str>> {
    if cols == 0 {
        return Err(RenderError::InvalidColumns(cols));
    }
    if display_width(text) <= cols {
        return Ok(Cow::Borrowed(text));
    }

    let trimmed = text.trim_end();
    if display_width(trimmed) <= cols {
        return Ok(Cow::Owned(trimmed.to_string()));
    }

    // Longest prefix leaving room for the ellipsis.
    let mut end = 0;
    let mut width = 0;
    for (idx, ch) in trimmed.char_indices() {
        let cw = char_width(ch);
        if width + cw + 1 > cols {
            break;
        }
        width += cw;
        end = idx + ch.len_utf8();
    }

    let mut clipped = trimmed[..end].trim_end().to_string();
    clipped.push(ELLIPSIS);
    Ok(Cow::Owned(clipped))
}

/// Pad `text` with trailing spaces up to `cols` columns; no-op if already as
/// wide or wider.
#[must_use]
pub fn pad(text: &str, cols: usize) -> Cow<'_, str> {
    let width = display_width(text);
    if width >= cols {
        return Cow::Borrowed(text);
    }
    let mut padded = String::with_capacity(text.len() + cols - width);
    padded.push_str(text);
    for _ in 0..cols - width {
        padded.push(' ');
    }
    Cow::Owned(padded)
}

/// Force `text` to exactly `cols` columns: truncate if over, pad if under,
/// identity (borrowed) if already exact.
pub fn fit(text: &str, cols: usize) -> Result<Cow<'_, str>> {
    let width = display_width(text);
    if width == cols {
        return Ok(Cow::Borrowed(text));
    }
    if width < cols {
        return Ok(pad(text, cols));
    }
    let clipped = truncate(text, cols)?;
    // A dropped wide glyph or stripped whitespace can leave us short.
    Ok(Cow::Owned(pad(&clipped, cols).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('界'), 2);
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(char_width('\t'), 0);
    }

    #[test]
    fn test_wrap_scenario() {
        assert_eq!(
            wrap("The quick brown fox jumps", 10),
            vec!["The quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_never_exceeds_cols() {
        let text = "one twotwotwo three four五五五五 six";
        // cols >= 2: a lone wide glyph cannot fit a single column.
        for cols in 2..20 {
            for line in wrap(text, cols) {
                assert!(
                    display_width(&line) <= cols,
                    "line {line:?} wider than {cols}"
                );
            }
        }
    }

    #[test]
    fn test_wrap_hard_splits_long_word() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        // Wide glyphs split on even boundaries.
        assert_eq!(wrap("値値値", 4), vec!["値値", "値"]);
    }

    #[test]
    fn test_wrap_honors_newlines() {
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_preserves_indentation() {
        assert_eq!(wrap("    fn main()", 20), vec!["    fn main()"]);
    }

    #[test]
    fn test_wrap_ranges_cover_source() {
        let text = "alpha beta gamma";
        let ranges = wrap_ranges(text, 6);
        assert_eq!(
            ranges
                .iter()
                .map(|r| &text[r.clone()])
                .collect::<Vec<_>>(),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_truncate_scenario() {
        assert_eq!(truncate("Frank Zappa 🎸", 7).unwrap(), "Frank…");
    }

    #[test]
    fn test_truncate_identity_when_fitting() {
        let result = truncate("short", 10).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "short");
    }

    #[test]
    fn test_truncate_idempotent() {
        for cols in 1..12 {
            let once = truncate("a quick brown 狐 jumps", cols).unwrap().into_owned();
            let twice = truncate(&once, cols).unwrap().into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_truncate_zero_cols_is_an_error() {
        assert_eq!(
            truncate("anything", 0),
            Err(RenderError::InvalidColumns(0))
        );
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 5), "ab   ");
        assert!(matches!(pad("abcdef", 5), Cow::Borrowed(_)));
        assert!(matches!(pad("ab", 0), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fit_is_exact_or_identity() {
        for s in ["", "short", "a much longer string here", "界界界界界", "ab 界"] {
            for cols in 1..12 {
                let fitted = fit(s, cols).unwrap();
                if display_width(s) == cols {
                    assert!(matches!(fitted, Cow::Borrowed(_)));
                } else {
                    assert_eq!(display_width(&fitted), cols, "fit({s:?}, {cols})");
                }
            }
        }
    }
}
