//! The text-embedding compositor.
//!
//! Renders a markup tree into a canvas, inlining box widgets in flowing,
//! word-wrapped text. Each embedded widget is represented in the flattened
//! text by a placeholder: a head sentinel followed by width−1 tail sentinels.
//! The wrap engine lays the placeholder out like any other text; afterwards
//! each placeholder segment is replaced by a slice of its widget's canvas.
//!
//! When wrapping splits a placeholder mid-widget, the unconsumed remainder is
//! carried as a tail into the next row and consumed there first, so one
//! widget spans exactly as many rows and columns as wrapping dictates without
//! the compositor ever looking inside it.

use std::cell::RefCell;
use std::ops::Range;

use crate::canvas::{Canvas, Run};
use crate::error::{RenderError, Result};
use crate::markup::Markup;
use crate::style::{Attr, StyleTag};
use crate::text;
use crate::widget::{BoxedWidget, Size, Sizing, Widget};

/// Head sentinel: first cell of an embedded widget's placeholder.
pub const EMBED_HEAD: char = '\u{E000}';
/// Tail sentinel: each remaining cell of the placeholder.
pub const EMBED_TAIL: char = '\u{E001}';

/// One embedded widget and its declared width.
struct Slot {
    widget: BoxedWidget,
    width: usize,
}

/// Flowing text with embedded box widgets.
///
/// Construction validates every embed node: a zero width or a non-box widget
/// fails immediately, before any render is attempted.
pub struct Embedded {
    /// Flattened text, placeholders included.
    text: String,
    /// Styled spans covering `text`.
    spans: Vec<(Option<StyleTag>, Range<usize>)>,
    slots: Vec<Slot>,
    /// Per-slot (row, start column) of the most recent render, for
    /// hit-testing.
    positions: RefCell<Vec<Option<(usize, usize)>>>,
}

impl Embedded {
    /// Flatten `markup` into renderable form.
    pub fn new(markup: Markup) -> Result<Self> {
        let mut embedded = Self {
            text: String::new(),
            spans: Vec::new(),
            slots: Vec::new(),
            positions: RefCell::new(Vec::new()),
        };
        embedded.flatten(markup, None)?;
        embedded.positions = RefCell::new(vec![None; embedded.slots.len()]);
        Ok(embedded)
    }

    fn flatten(&mut self, markup: Markup, context: Option<StyleTag>) -> Result<()> {
        match markup {
            Markup::Text(raw) => {
                // Input must not be able to forge placeholders.
                let sanitized: String = raw
                    .chars()
                    .map(|ch| {
                        if ch == EMBED_HEAD || ch == EMBED_TAIL {
                            '\u{FFFD}'
                        } else {
                            ch
                        }
                    })
                    .collect();
                self.push_span(context, &sanitized);
            }
            Markup::Styled(tag, child) => {
                let effective = context.map_or(tag, |outer| StyleTag::combine(outer, tag));
                self.flatten(*child, Some(effective))?;
            }
            Markup::Group(children) => {
                for child in children {
                    self.flatten(child, context)?;
                }
            }
            Markup::Embed { width, widget } => {
                if width == 0 {
                    return Err(RenderError::InvalidEmbedWidth);
                }
                if widget.sizing() != Sizing::Box {
                    return Err(RenderError::NotBoxSized);
                }
                let mut placeholder = String::with_capacity(width * 3);
                placeholder.push(EMBED_HEAD);
                for _ in 1..width {
                    placeholder.push(EMBED_TAIL);
                }
                self.push_span(None, &placeholder);
                self.slots.push(Slot { widget, width });
            }
        }
        Ok(())
    }

    fn push_span(&mut self, attr: Option<StyleTag>, piece: &str) {
        if piece.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(piece);
        match self.spans.last_mut() {
            Some((last_attr, range)) if *last_attr == attr && range.end == start => {
                range.end = self.text.len();
            }
            _ => self.spans.push((attr, start..self.text.len())),
        }
    }

    /// The (row, start column) of each embedded widget in the most recent
    /// render, in markup order. `None` until rendered.
    #[must_use]
    pub fn positions(&self) -> Vec<Option<(usize, usize)>> {
        self.positions.borrow().clone()
    }

    /// Styled runs for the source range of one wrapped line, padded to
    /// `cols`, as a single-row canvas.
    fn plain_row(&self, range: &Range<usize>, cols: usize) -> Canvas {
        let mut runs: Vec<Run> = Vec::new();
        for (attr, span) in &self.spans {
            let start = span.start.max(range.start);
            let end = span.end.min(range.end);
            if start < end {
                runs.push(Run::text(attr.map(Attr::Named), &self.text[start..end]));
            }
        }
        let width: usize = runs.iter().map(|r| r.width).sum();
        if width < cols {
            runs.push(Run::blank(cols - width));
        }
        if runs.is_empty() {
            runs.push(Run::blank(cols));
        }

        let mut canvas = Canvas::new(cols);
        canvas.push_row(runs);
        canvas
    }

    fn render_flow(&self, cols: usize, focus: bool) -> Canvas {
        let cols = cols.max(1);
        let ranges = text::wrap_ranges(&self.text, cols);
        let widths: Vec<usize> = self.slots.iter().map(|s| s.width).collect();

        let mut positions: Vec<Option<(usize, usize)>> = vec![None; self.slots.len()];
        // Widget canvases rendered once per pass and sliced per segment.
        let mut rendered: Vec<Option<Canvas>> = (0..self.slots.len()).map(|_| None).collect();
        let mut next_slot = 0usize;
        // Unconsumed remainder of a widget split by the previous row.
        let mut carry: Option<(usize, usize)> = None;

        let mut out = Canvas::new(cols);
        for (row_idx, range) in ranges.iter().enumerate() {
            let line = &self.text[range.clone()];
            let plain = self.plain_row(range, cols);

            if !line.contains(EMBED_HEAD) && !line.contains(EMBED_TAIL) {
                out.push_row(plain.row(0).to_vec());
                carry = None;
                continue;
            }

            let (segments, line_carry) = scan_line(line, cols, &widths, &mut next_slot, carry);
            let mut runs: Vec<Run> = Vec::new();
            for segment in segments {
                match segment {
                    Segment::Text { start_col, cols: w } => {
                        runs.extend(plain.content(start_col, 0, w, 1).remove(0));
                    }
                    Segment::Piece {
                        slot,
                        start_col,
                        cols: w,
                        part_offset,
                    } => {
                        let canvas = rendered[slot].get_or_insert_with(|| {
                            self.slots[slot].widget.render(
                                Size::Box {
                                    cols: self.slots[slot].width,
                                    rows: 1,
                                },
                                focus,
                            )
                        });
                        runs.extend(canvas.content(part_offset, 0, w, 1).remove(0));
                        if part_offset == 0 {
                            positions[slot] = Some((row_idx, start_col));
                        }
                    }
                }
            }
            out.push_row(runs);
            carry = line_carry;
        }

        *self.positions.borrow_mut() = positions;
        out
    }
}

impl Widget for Embedded {
    fn sizing(&self) -> Sizing {
        Sizing::Flow
    }

    fn render(&self, size: Size, focus: bool) -> Canvas {
        match size {
            Size::Flow { cols } => self.render_flow(cols, focus),
            Size::Box { cols, rows } => self.render_flow(cols, focus).pad_trim_rows(rows),
        }
    }
}

/// One segment of a wrapped line: untouched text columns, or a slice of an
/// embedded widget.
#[derive(Debug)]
enum Segment {
    Text {
        start_col: usize,
        cols: usize,
    },
    Piece {
        slot: usize,
        start_col: usize,
        cols: usize,
        part_offset: usize,
    },
}

/// Split a line at placeholder-run boundaries.
///
/// `carry` identifies a widget split by the previous row; its leading tail
/// sentinels continue that widget. Returns the segments plus the carry for
/// the next row when this line ends mid-widget.
fn scan_line(
    line: &str,
    cols: usize,
    widths: &[usize],
    next_slot: &mut usize,
    mut carry: Option<(usize, usize)>,
) -> (Vec<Segment>, Option<(usize, usize)>) {
    let mut segments: Vec<Segment> = Vec::new();
    let mut col = 0usize;
    // (slot, start column, columns so far, columns consumed before this row).
    let mut widget: Option<(usize, usize, usize, usize)> = None;
    let mut text_start: Option<usize> = None;

    fn flush_text(segments: &mut Vec<Segment>, text_start: &mut Option<usize>, col: usize) {
        if let Some(start) = text_start.take()
            && col > start
        {
            segments.push(Segment::Text {
                start_col: start,
                cols: col - start,
            });
        }
    }

    fn flush_widget(
        segments: &mut Vec<Segment>,
        widget: &mut Option<(usize, usize, usize, usize)>,
    ) -> Option<(usize, usize)> {
        widget.take().map(|(slot, start_col, w, part_offset)| {
            segments.push(Segment::Piece {
                slot,
                start_col,
                cols: w,
                part_offset,
            });
            (slot, part_offset + w)
        })
    }

    for ch in line.chars() {
        if ch == EMBED_HEAD {
            flush_text(&mut segments, &mut text_start, col);
            flush_widget(&mut segments, &mut widget);
            carry = None;
            let slot = *next_slot;
            *next_slot += 1;
            widget = Some((slot, col, 1, 0));
            col += 1;
        } else if ch == EMBED_TAIL {
            if let Some((_, _, w, _)) = &mut widget {
                *w += 1;
            } else if let Some((slot, consumed)) = carry.take() {
                flush_text(&mut segments, &mut text_start, col);
                widget = Some((slot, col, 1, consumed));
            } else if text_start.is_none() {
                // Orphan tail; constructed placeholders make this
                // unreachable. Render it as text.
                text_start = Some(col);
            }
            col += 1;
        } else {
            if flush_widget(&mut segments, &mut widget).is_some() {
                carry = None;
            }
            if text_start.is_none() {
                text_start = Some(col);
            }
            col += text::char_width(ch);
        }
    }

    // A widget still open at line end is split by the wrap: carry the rest.
    let next_carry = flush_widget(&mut segments, &mut widget)
        .filter(|&(slot, consumed)| consumed < widths[slot]);
    flush_text(&mut segments, &mut text_start, col);
    // Padding past the line's own text is a text segment too.
    if col < cols {
        segments.push(Segment::Text {
            start_col: col,
            cols: cols - col,
        });
    }

    (segments, next_carry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{CanvasWidget, Spacer};

    /// A one-row box canvas of repeated `ch`, as an embeddable widget.
    fn solid(width: usize, ch: char) -> BoxedWidget {
        let mut canvas = Canvas::new(width);
        canvas.push_row(vec![Run::text(None, ch.to_string().repeat(width))]);
        Box::new(CanvasWidget::new(canvas))
    }

    #[test]
    fn test_rejects_zero_width() {
        let markup = Markup::embed(0, solid(1, 'x'));
        assert!(matches!(
            Embedded::new(markup),
            Err(RenderError::InvalidEmbedWidth)
        ));
    }

    #[test]
    fn test_rejects_flow_widgets() {
        let markup = Markup::embed(3, Box::new(Spacer::new(1)));
        assert!(matches!(
            Embedded::new(markup),
            Err(RenderError::NotBoxSized)
        ));
    }

    #[test]
    fn test_plain_text_wraps_like_the_width_engine() {
        let embedded = Embedded::new(Markup::text("The quick brown fox jumps")).unwrap();
        let canvas = embedded.render(Size::Flow { cols: 10 }, false);
        assert_eq!(canvas.rows(), 3);
        assert_eq!(canvas.row_string(0), "The quick ");
        assert_eq!(canvas.row_string(1), "brown fox ");
        assert_eq!(canvas.row_string(2), "jumps     ");
    }

    #[test]
    fn test_inline_widget_on_one_row() {
        let markup = Markup::group(vec![
            Markup::text("ab "),
            Markup::embed(4, solid(4, 'W')),
            Markup::text(" cd"),
        ]);
        let embedded = Embedded::new(markup).unwrap();
        let canvas = embedded.render(Size::Flow { cols: 12 }, false);
        assert_eq!(canvas.rows(), 1);
        assert_eq!(canvas.row_string(0), "ab WWWW cd  ");
        assert_eq!(embedded.positions(), vec![Some((0, 3))]);
    }

    #[test]
    fn test_wrapped_widget_carries_tail_to_column_zero() {
        // Widths 4 and 6 into 5 columns: the second widget cannot fit a row
        // and its tail resumes at column 0 of the following row.
        let markup = Markup::group(vec![
            Markup::text("ab "),
            Markup::embed(4, solid(4, 'A')),
            Markup::text(" "),
            Markup::embed(6, solid(6, 'B')),
        ]);
        let embedded = Embedded::new(markup).unwrap();
        let canvas = embedded.render(Size::Flow { cols: 5 }, false);

        assert_eq!(canvas.rows(), 4);
        assert_eq!(canvas.row_string(0), "ab   ");
        assert_eq!(canvas.row_string(1), "AAAA ");
        assert_eq!(canvas.row_string(2), "BBBBB");
        assert_eq!(canvas.row_string(3), "B    ");

        // Partial widths sum to the declared width.
        let b_cells: usize = (0..canvas.rows())
            .map(|r| canvas.row_string(r).matches('B').count())
            .sum();
        assert_eq!(b_cells, 6);

        assert_eq!(
            embedded.positions(),
            vec![Some((1, 0)), Some((2, 0))]
        );
    }

    #[test]
    fn test_widget_occupies_exactly_declared_width() {
        for cols in 3..12 {
            let markup = Markup::group(vec![
                Markup::text("xy "),
                Markup::embed(7, solid(7, 'Z')),
                Markup::text(" tail"),
            ]);
            let embedded = Embedded::new(markup).unwrap();
            let canvas = embedded.render(Size::Flow { cols }, false);
            let z_cells: usize = (0..canvas.rows())
                .map(|r| canvas.row_string(r).matches('Z').count())
                .sum();
            assert_eq!(z_cells, 7, "at {cols} columns");
        }
    }

    #[test]
    fn test_styled_spans_survive_wrapping() {
        let markup = Markup::group(vec![
            Markup::text("plain "),
            Markup::styled(StyleTag::Bold, Markup::text("bold")),
        ]);
        let embedded = Embedded::new(markup).unwrap();
        let canvas = embedded.render(Size::Flow { cols: 20 }, false);
        let bold_runs: Vec<_> = canvas
            .row(0)
            .iter()
            .filter(|r| r.attr == Some(Attr::Named(StyleTag::Bold)))
            .collect();
        assert_eq!(bold_runs.len(), 1);
        assert_eq!(bold_runs[0].text, "bold");
    }

    #[test]
    fn test_sentinels_in_input_are_escaped() {
        let markup = Markup::text(format!("a{EMBED_HEAD}b{EMBED_TAIL}c"));
        let embedded = Embedded::new(markup).unwrap();
        let canvas = embedded.render(Size::Flow { cols: 8 }, false);
        assert_eq!(canvas.row_string(0), "a\u{FFFD}b\u{FFFD}c   ");
    }

    #[test]
    fn test_box_render_pads_and_clips() {
        let embedded = Embedded::new(Markup::text("one two three")).unwrap();
        let clipped = embedded.render(Size::Box { cols: 5, rows: 2 }, false);
        assert_eq!(clipped.rows(), 2);
        let padded = embedded.render(Size::Box { cols: 5, rows: 6 }, false);
        assert_eq!(padded.rows(), 6);
        assert_eq!(padded.row_string(5), "     ");
    }
}
