//! The widget protocol: the contract every renderable thing implements.
//!
//! Widgets come in two sizings. A box widget needs both dimensions; a flow
//! widget is given a width and computes its own height. The distinction is an
//! explicit enum checked at construction time (the embedding compositor only
//! accepts box widgets), never discovered mid-render.

use crate::canvas::Canvas;

/// How a widget is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    /// Needs `(cols, rows)`.
    Box,
    /// Needs `(cols,)` and computes its own row count.
    Flow,
}

/// The size a widget is rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    /// Both dimensions fixed.
    Box {
        /// Width in columns.
        cols: usize,
        /// Height in rows.
        rows: usize,
    },
    /// Width fixed, height up to the widget.
    Flow {
        /// Width in columns.
        cols: usize,
    },
}

impl Size {
    /// The width of either size kind.
    #[must_use]
    pub const fn cols(self) -> usize {
        match self {
            Self::Box { cols, .. } | Self::Flow { cols } => cols,
        }
    }
}

/// A renderable element.
pub trait Widget {
    /// Which size kind [`Widget::render`] expects.
    fn sizing(&self) -> Sizing;

    /// Render into a canvas of exactly the requested size (flow widgets pick
    /// their own row count for a flow size, and pad or clip for a box size).
    fn render(&self, size: Size, focus: bool) -> Canvas;
}

/// Owned, dynamically typed widget.
pub type BoxedWidget = Box<dyn Widget>;

/// Render a widget at `size`, passing a flow widget its width and fixing up
/// the height afterwards.
#[must_use]
pub fn render_sized(widget: &dyn Widget, size: Size, focus: bool) -> Canvas {
    match (widget.sizing(), size) {
        (Sizing::Flow, Size::Box { cols, rows }) => widget
            .render(Size::Flow { cols }, focus)
            .pad_trim_rows(rows),
        _ => widget.render(size, focus),
    }
}

/// Adapts a flow widget to box sizing.
///
/// The inner widget renders at the box width and the result is padded or
/// clipped to the box height.
pub struct Filler {
    inner: BoxedWidget,
}

impl Filler {
    /// Wrap `inner`, which may be of either sizing.
    #[must_use]
    pub fn new(inner: BoxedWidget) -> Self {
        Self { inner }
    }
}

impl Widget for Filler {
    fn sizing(&self) -> Sizing {
        Sizing::Box
    }

    fn render(&self, size: Size, focus: bool) -> Canvas {
        let canvas = render_sized(self.inner.as_ref(), size, focus);
        match size {
            Size::Box { rows, .. } => canvas.pad_trim_rows(rows),
            Size::Flow { .. } => canvas,
        }
    }
}

/// A run of blank rows, used as the spacer between blocks.
pub struct Spacer {
    rows: usize,
}

impl Spacer {
    /// A spacer of `rows` blank rows.
    #[must_use]
    pub const fn new(rows: usize) -> Self {
        Self { rows }
    }
}

impl Widget for Spacer {
    fn sizing(&self) -> Sizing {
        Sizing::Flow
    }

    fn render(&self, size: Size, _focus: bool) -> Canvas {
        match size {
            Size::Flow { cols } => Canvas::blank(cols, self.rows),
            Size::Box { cols, rows } => Canvas::blank(cols, rows),
        }
    }
}

/// Vertical stack of flow widgets.
pub struct Pile {
    children: Vec<BoxedWidget>,
}

impl Pile {
    /// Stack `children` top to bottom.
    #[must_use]
    pub fn new(children: Vec<BoxedWidget>) -> Self {
        Self { children }
    }
}

impl Widget for Pile {
    fn sizing(&self) -> Sizing {
        Sizing::Flow
    }

    fn render(&self, size: Size, focus: bool) -> Canvas {
        let cols = size.cols();
        let parts: Vec<Canvas> = self
            .children
            .iter()
            .map(|child| render_sized(child.as_ref(), Size::Flow { cols }, focus))
            .collect();
        let stacked = if parts.is_empty() {
            Canvas::blank(cols, 0)
        } else {
            Canvas::combine(&parts.iter().collect::<Vec<_>>())
        };
        match size {
            Size::Flow { .. } => stacked,
            Size::Box { rows, .. } => stacked.pad_trim_rows(rows),
        }
    }
}

/// A fixed-width left column beside a flowing right column.
///
/// List items with nested block content use this for their (marker, content)
/// layout: the marker keeps its width on every row, the content flows beside
/// it.
pub struct Columns {
    left_cols: usize,
    left: BoxedWidget,
    right: BoxedWidget,
}

impl Columns {
    /// Lay out `left` at `left_cols` wide beside `right`.
    #[must_use]
    pub fn new(left_cols: usize, left: BoxedWidget, right: BoxedWidget) -> Self {
        Self {
            left_cols,
            left,
            right,
        }
    }
}

impl Widget for Columns {
    fn sizing(&self) -> Sizing {
        Sizing::Flow
    }

    fn render(&self, size: Size, focus: bool) -> Canvas {
        let cols = size.cols();
        let right_cols = cols.saturating_sub(self.left_cols).max(1);
        let right = render_sized(self.right.as_ref(), Size::Flow { cols: right_cols }, focus);
        let rows = right.rows().max(1);
        let right = right.pad_trim_rows(rows);
        let left = render_sized(
            self.left.as_ref(),
            Size::Box {
                cols: self.left_cols,
                rows,
            },
            focus,
        );
        let joined = Canvas::join(&[&left, &right]);
        match size {
            Size::Flow { .. } => joined,
            Size::Box { rows, .. } => joined.pad_trim_rows(rows),
        }
    }
}

/// A precomputed canvas exposed as a box widget.
///
/// Image adapters precompute their full output once; this widget serves any
/// requested region by slicing that canvas.
pub struct CanvasWidget {
    canvas: Canvas,
}

impl CanvasWidget {
    /// Serve regions of `canvas`.
    #[must_use]
    pub const fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// The full precomputed canvas.
    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Widget for CanvasWidget {
    fn sizing(&self) -> Sizing {
        Sizing::Box
    }

    fn render(&self, size: Size, _focus: bool) -> Canvas {
        let (cols, rows) = match size {
            Size::Box { cols, rows } => (cols, rows),
            Size::Flow { cols } => (cols, self.canvas.rows()),
        };
        let mut out = Canvas::new(cols);
        for row in self.canvas.content(0, 0, cols, rows) {
            out.push_row(row);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Run as CanvasRun;

    fn solid(cols: usize, rows: usize, ch: char) -> Canvas {
        let mut canvas = Canvas::new(cols);
        for _ in 0..rows {
            canvas.push_row(vec![CanvasRun::text(
                None,
                ch.to_string().repeat(cols),
            )]);
        }
        canvas
    }

    #[test]
    fn test_spacer_is_blank() {
        let canvas = Spacer::new(1).render(Size::Flow { cols: 3 }, false);
        assert_eq!(canvas.rows(), 1);
        assert_eq!(canvas.row_string(0), "   ");
    }

    #[test]
    fn test_filler_fixes_height() {
        let filler = Filler::new(Box::new(Spacer::new(1)));
        assert_eq!(filler.sizing(), Sizing::Box);
        let canvas = filler.render(Size::Box { cols: 2, rows: 3 }, false);
        assert_eq!(canvas.rows(), 3);
        assert_eq!(canvas.cols(), 2);
    }

    #[test]
    fn test_pile_stacks() {
        let pile = Pile::new(vec![
            Box::new(CanvasWidget::new(solid(4, 1, 'a'))),
            Box::new(CanvasWidget::new(solid(4, 2, 'b'))),
        ]);
        let canvas = pile.render(Size::Flow { cols: 4 }, false);
        assert_eq!(canvas.rows(), 3);
        assert_eq!(canvas.row_string(0), "aaaa");
        assert_eq!(canvas.row_string(2), "bbbb");
    }

    #[test]
    fn test_columns_markers_pad_to_content_height() {
        let columns = Columns::new(
            3,
            Box::new(CanvasWidget::new(solid(3, 1, '*'))),
            Box::new(CanvasWidget::new(solid(7, 2, 'x'))),
        );
        let canvas = columns.render(Size::Flow { cols: 10 }, false);
        assert_eq!(canvas.rows(), 2);
        assert_eq!(canvas.row_string(0), "***xxxxxxx");
        assert_eq!(canvas.row_string(1), "   xxxxxxx");
    }

    #[test]
    fn test_canvas_widget_slices_cached_render() {
        let widget = CanvasWidget::new(solid(6, 4, 'z'));
        let canvas = widget.render(Size::Box { cols: 3, rows: 2 }, false);
        assert_eq!(canvas.cols(), 3);
        assert_eq!(canvas.rows(), 2);
        assert_eq!(canvas.row_string(1), "zzz");
    }
}
