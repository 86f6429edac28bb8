//! The canvas: a fixed-size grid of styled cell runs.
//!
//! A canvas is the output of one render call. Each row is a sequence of runs;
//! text runs carry display width, raw runs carry escape payloads (hyperlink
//! wrappers, image blobs) and occupy zero columns. The text runs of every row
//! always total exactly `cols`.
//!
//! Canvases are read-only: every composition operation returns a new canvas,
//! so an already-produced render can be sliced repeatedly (scrolling) without
//! recomputation.

use crate::style::Attr;
use crate::text::char_width;

/// Whether a run is visible text or an escape payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Printable text contributing display width.
    Text,
    /// Raw escape bytes, zero display width, passed through to the sink.
    Raw,
}

/// One styled run within a canvas row.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Style attribute, `None` for unstyled text.
    pub attr: Option<Attr>,
    /// Text or raw escape payload.
    pub kind: RunKind,
    /// The run's bytes.
    pub text: String,
    /// Display width in columns; always 0 for raw runs.
    pub width: usize,
}

impl Run {
    /// A visible text run.
    #[must_use]
    pub fn text(attr: Option<Attr>, text: impl Into<String>) -> Self {
        let text = text.into();
        let width = crate::text::display_width(&text);
        Self {
            attr,
            kind: RunKind::Text,
            text,
            width,
        }
    }

    /// A zero-width escape run.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            attr: None,
            kind: RunKind::Raw,
            text: text.into(),
            width: 0,
        }
    }

    /// An unstyled run of `width` spaces.
    #[must_use]
    pub fn blank(width: usize) -> Self {
        Self::text(None, " ".repeat(width))
    }
}

/// A rows×cols grid of styled runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    cols: usize,
    rows: Vec<Vec<Run>>,
}

impl Canvas {
    /// An empty canvas of the given width with no rows yet.
    #[must_use]
    pub const fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// A canvas filled with blank rows.
    #[must_use]
    pub fn blank(cols: usize, rows: usize) -> Self {
        let mut canvas = Self::new(cols);
        for _ in 0..rows {
            canvas.push_row(vec![Run::blank(cols)]);
        }
        canvas
    }

    /// Append a row. The row's text runs must total exactly `cols`.
    pub fn push_row(&mut self, runs: Vec<Run>) {
        let width: usize = runs.iter().map(|r| r.width).sum();
        assert_eq!(width, self.cols, "canvas row width {width} != {}", self.cols);
        self.rows.push(runs);
    }

    /// Canvas width in columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Canvas height in rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The runs of row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[Run] {
        &self.rows[index]
    }

    /// The visible text of row `index`, raw runs excluded.
    #[must_use]
    pub fn row_string(&self, index: usize) -> String {
        self.rows[index]
            .iter()
            .filter(|r| r.kind == RunKind::Text)
            .map(|r| r.text.as_str())
            .collect()
    }

    /// A rectangular sub-region of the canvas as rows of runs.
    ///
    /// Slices the stored render without recomputation; regions reaching past
    /// the canvas are filled with blanks.
    #[must_use]
    pub fn content(
        &self,
        trim_left: usize,
        trim_top: usize,
        cols: usize,
        rows: usize,
    ) -> Vec<Vec<Run>> {
        (trim_top..trim_top + rows)
            .map(|r| {
                self.rows.get(r).map_or_else(
                    || vec![Run::blank(cols)],
                    |row| slice_row(row, trim_left, cols),
                )
            })
            .collect()
    }

    /// A new canvas keeping `n` rows starting at `top`.
    #[must_use]
    pub fn trim(&self, top: usize, n: usize) -> Self {
        Self {
            cols: self.cols,
            rows: self.content(0, top, self.cols, n),
        }
    }

    /// A new canvas grown or shrunk to exactly `rows` rows (pad with blanks,
    /// trim from the bottom).
    #[must_use]
    pub fn pad_trim_rows(&self, rows: usize) -> Self {
        self.trim(0, rows)
    }

    /// Adjust the left and right edges: positive pads with blanks, negative
    /// trims columns.
    #[must_use]
    pub fn pad_trim_left_right(&self, left: isize, right: isize) -> Self {
        let trim_left = usize::try_from(-left.min(0)).unwrap_or(0);
        let trim_right = usize::try_from(-right.min(0)).unwrap_or(0);
        let pad_left = usize::try_from(left.max(0)).unwrap_or(0);
        let pad_right = usize::try_from(right.max(0)).unwrap_or(0);

        let kept = self.cols.saturating_sub(trim_left + trim_right);
        let mut canvas = Self::new(kept + pad_left + pad_right);
        for row in &self.rows {
            let mut runs = Vec::new();
            if pad_left > 0 {
                runs.push(Run::blank(pad_left));
            }
            runs.extend(slice_row(row, trim_left, kept));
            if pad_right > 0 {
                runs.push(Run::blank(pad_right));
            }
            canvas.push_row(runs);
        }
        canvas
    }

    /// Horizontal concatenation. All parts must have equal row counts.
    #[must_use]
    pub fn join(parts: &[&Self]) -> Self {
        assert!(!parts.is_empty(), "join of zero canvases");
        let rows = parts[0].rows();
        assert!(
            parts.iter().all(|c| c.rows() == rows),
            "join requires equal row counts"
        );

        let mut canvas = Self::new(parts.iter().map(|c| c.cols).sum());
        for r in 0..rows {
            let mut runs = Vec::new();
            for part in parts {
                runs.extend(part.rows[r].iter().cloned());
            }
            canvas.push_row(runs);
        }
        canvas
    }

    /// Vertical stacking. All parts must have equal widths.
    #[must_use]
    pub fn combine(parts: &[&Self]) -> Self {
        assert!(!parts.is_empty(), "combine of zero canvases");
        let cols = parts[0].cols;
        assert!(
            parts.iter().all(|c| c.cols == cols),
            "combine requires equal widths"
        );

        let mut canvas = Self::new(cols);
        for part in parts {
            for row in &part.rows {
                canvas.rows.push(row.clone());
            }
        }
        canvas
    }
}

impl Canvas {
    /// Convert the canvas into ratatui [`Text`] for host applications.
    ///
    /// Raw escape runs are dropped; ratatui buffers cannot carry them.
    #[must_use]
    pub fn to_text(&self, colors: &crate::theme::ThemeColors) -> ratatui::text::Text<'static> {
        let lines: Vec<ratatui::text::Line<'static>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|run| run.kind == RunKind::Text)
                    .map(|run| {
                        ratatui::text::Span::styled(
                            run.text.clone(),
                            colors.style_for_attr(run.attr),
                        )
                    })
                    .collect::<ratatui::text::Line>()
            })
            .collect();
        lines.into()
    }

    /// Serialize the canvas with raw SGR sequences for a plain terminal sink.
    ///
    /// Raw runs (hyperlink wrappers, image blobs) pass through verbatim.
    #[must_use]
    pub fn to_ansi(&self, colors: &crate::theme::ThemeColors) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for run in row {
                match run.kind {
                    RunKind::Raw => out.push_str(&run.text),
                    RunKind::Text => {
                        let codes = sgr_codes(&colors.style_for_attr(run.attr));
                        if codes.is_empty() {
                            out.push_str(&run.text);
                        } else {
                            out.push_str("\x1b[");
                            out.push_str(&codes);
                            out.push('m');
                            out.push_str(&run.text);
                            out.push_str("\x1b[0m");
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

/// SGR parameter string for a resolved style; empty for the default style.
fn sgr_codes(style: &ratatui::style::Style) -> String {
    use ratatui::style::Modifier;

    let mut codes: Vec<String> = Vec::new();
    if style.add_modifier.contains(Modifier::BOLD) {
        codes.push("1".into());
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        codes.push("3".into());
    }
    if style.add_modifier.contains(Modifier::UNDERLINED) {
        codes.push("4".into());
    }
    if let Some(fg) = style.fg
        && let Some(code) = color_code(fg, false)
    {
        codes.push(code);
    }
    if let Some(bg) = style.bg
        && let Some(code) = color_code(bg, true)
    {
        codes.push(code);
    }
    codes.join(";")
}

/// SGR color parameter, `None` for the terminal default.
fn color_code(color: ratatui::style::Color, background: bool) -> Option<String> {
    use ratatui::style::Color;

    let lead = if background { 48 } else { 38 };
    let indexed = |i: u8| Some(format!("{lead};5;{i}"));
    match color {
        Color::Reset => None,
        Color::Black => indexed(0),
        Color::Red => indexed(1),
        Color::Green => indexed(2),
        Color::Yellow => indexed(3),
        Color::Blue => indexed(4),
        Color::Magenta => indexed(5),
        Color::Cyan => indexed(6),
        Color::Gray => indexed(7),
        Color::DarkGray => indexed(8),
        Color::LightRed => indexed(9),
        Color::LightGreen => indexed(10),
        Color::LightYellow => indexed(11),
        Color::LightBlue => indexed(12),
        Color::LightMagenta => indexed(13),
        Color::LightCyan => indexed(14),
        Color::White => indexed(15),
        Color::Indexed(i) => indexed(i),
        Color::Rgb(r, g, b) => Some(format!("{lead};2;{r};{g};{b}")),
    }
}

/// Slice one row to the column window `[start, start + cols)`.
///
/// Raw runs anchored inside the window (boundaries included) are kept; a wide
/// glyph cut by either edge contributes a space for its visible half.
fn slice_row(row: &[Run], start: usize, cols: usize) -> Vec<Run> {
    let end = start + cols;
    let mut out: Vec<Run> = Vec::new();
    let mut col = 0;

    let mut push_text = |out: &mut Vec<Run>, attr: Option<Attr>, text: String| {
        if text.is_empty() {
            return;
        }
        match out.last_mut() {
            Some(last) if last.kind == RunKind::Text && last.attr == attr => {
                last.width += crate::text::display_width(&text);
                last.text.push_str(&text);
            }
            _ => out.push(Run::text(attr, text)),
        }
    };

    for run in row {
        if run.kind == RunKind::Raw {
            if col >= start && col <= end {
                out.push(run.clone());
            }
            continue;
        }

        let run_end = col + run.width;
        if run_end > start && col < end {
            let mut piece = String::new();
            let mut ccol = col;
            for ch in run.text.chars() {
                let cw = char_width(ch);
                let cend = ccol + cw;
                if cend <= start || ccol >= end {
                    // Entirely outside the window.
                } else if ccol >= start && cend <= end {
                    piece.push(ch);
                } else {
                    // A wide glyph straddling an edge: blank the visible part.
                    for _ in ccol.max(start)..cend.min(end) {
                        piece.push(' ');
                    }
                }
                ccol = cend;
            }
            push_text(&mut out, run.attr, piece);
        }
        col = run_end;
    }

    // Fill any shortfall (window reaching past the row).
    let have: usize = out.iter().map(|r| r.width).sum();
    if have < cols {
        push_text(&mut out, None, " ".repeat(cols - have));
    }
    if out.is_empty() {
        out.push(Run::blank(cols));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleTag;

    fn line(canvas: &Canvas, r: usize) -> String {
        canvas.row_string(r)
    }

    #[test]
    fn test_blank_dimensions() {
        let canvas = Canvas::blank(4, 3);
        assert_eq!(canvas.cols(), 4);
        assert_eq!(canvas.rows(), 3);
        assert_eq!(line(&canvas, 0), "    ");
    }

    #[test]
    #[should_panic(expected = "canvas row width")]
    fn test_push_row_checks_width() {
        let mut canvas = Canvas::new(5);
        canvas.push_row(vec![Run::text(None, "abc")]);
    }

    #[test]
    fn test_join_and_combine() {
        let mut a = Canvas::new(2);
        a.push_row(vec![Run::text(None, "ab")]);
        let mut b = Canvas::new(3);
        b.push_row(vec![Run::text(Some(StyleTag::Bold.into()), "cde")]);

        let joined = Canvas::join(&[&a, &b]);
        assert_eq!(joined.cols(), 5);
        assert_eq!(line(&joined, 0), "abcde");

        let mut c = Canvas::new(5);
        c.push_row(vec![Run::text(None, "fghij")]);
        let stacked = Canvas::combine(&[&joined, &c]);
        assert_eq!(stacked.rows(), 2);
        assert_eq!(line(&stacked, 1), "fghij");
    }

    #[test]
    fn test_content_slices_without_recompute() {
        let mut canvas = Canvas::new(6);
        canvas.push_row(vec![Run::text(None, "abcdef")]);
        canvas.push_row(vec![Run::text(None, "ghijkl")]);

        let region = canvas.content(2, 1, 3, 1);
        assert_eq!(region.len(), 1);
        let text: String = region[0].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(text, "ijk");
    }

    #[test]
    fn test_content_pads_past_the_edge() {
        let canvas = Canvas::blank(2, 1);
        let region = canvas.content(0, 0, 4, 2);
        assert_eq!(region.len(), 2);
        for row in &region {
            let width: usize = row.iter().map(|r| r.width).sum();
            assert_eq!(width, 4);
        }
    }

    #[test]
    fn test_slice_through_wide_glyph_blanks_the_cut() {
        let mut canvas = Canvas::new(4);
        canvas.push_row(vec![Run::text(None, "a界b")]);

        // Window [0,2): keeps "a" and the left half of the wide glyph.
        let left = canvas.content(0, 0, 2, 1);
        let text: String = left[0].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(text, "a ");

        // Window [2,4): right half of the glyph plus "b".
        let right = canvas.content(2, 0, 2, 1);
        let text: String = right[0].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(text, " b");
    }

    #[test]
    fn test_pad_trim_left_right() {
        let mut canvas = Canvas::new(4);
        canvas.push_row(vec![Run::text(None, "abcd")]);

        let padded = canvas.pad_trim_left_right(2, 1);
        assert_eq!(padded.cols(), 7);
        assert_eq!(line(&padded, 0), "  abcd ");

        let trimmed = canvas.pad_trim_left_right(-1, -1);
        assert_eq!(trimmed.cols(), 2);
        assert_eq!(line(&trimmed, 0), "bc");
    }

    #[test]
    fn test_trim_rows() {
        let mut canvas = Canvas::new(1);
        for s in ["a", "b", "c"] {
            canvas.push_row(vec![Run::text(None, s)]);
        }
        let middle = canvas.trim(1, 1);
        assert_eq!(middle.rows(), 1);
        assert_eq!(line(&middle, 0), "b");

        let grown = canvas.pad_trim_rows(5);
        assert_eq!(grown.rows(), 5);
        assert_eq!(line(&grown, 4), " ");
    }

    #[test]
    fn test_raw_runs_survive_slicing() {
        let mut canvas = Canvas::new(3);
        canvas.push_row(vec![
            Run::raw("\x1b]8;;x\x1b\\"),
            Run::text(None, "abc"),
            Run::raw("\x1b]8;;\x1b\\"),
        ]);
        let region = canvas.content(0, 0, 3, 1);
        assert_eq!(region[0].len(), 3);
        assert_eq!(region[0][0].kind, RunKind::Raw);
        assert_eq!(region[0][2].kind, RunKind::Raw);
    }
}
