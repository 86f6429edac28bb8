//! OSC 8 hyperlink widget and its id arena.
//!
//! Terminals correlate the open and close halves of a hyperlink through an
//! `id=` parameter. Ids are small integers drawn from an arena owned by the
//! embedding application and threaded through a cloneable handle; disposing a
//! link returns its id for reuse, bounding terminal-protocol state in long
//! sessions with many short-lived links.

use std::cell::RefCell;
use std::rc::Rc;

use crate::canvas::{Canvas, Run};
use crate::error::{RenderError, Result};
use crate::style::{Attr, StyleTag};
use crate::text;
use crate::widget::{Size, Sizing, Widget};

/// Allocator for hyperlink ids: a monotonic counter backed by a free list.
#[derive(Clone, Default)]
pub struct LinkArena {
    inner: Rc<RefCell<ArenaInner>>,
}

#[derive(Default)]
struct ArenaInner {
    next: usize,
    free: Vec<usize>,
}

impl LinkArena {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an id, reusing a freed one before advancing the counter.
    #[must_use]
    pub fn allocate(&self) -> LinkId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.free.pop().unwrap_or_else(|| {
            let id = inner.next;
            inner.next += 1;
            id
        });
        LinkId {
            id,
            arena: Rc::clone(&self.inner),
        }
    }

    /// Number of ids currently live.
    #[must_use]
    pub fn live(&self) -> usize {
        let inner = self.inner.borrow();
        inner.next - inner.free.len()
    }
}

/// An allocated hyperlink id, returned to the arena on drop.
pub struct LinkId {
    id: usize,
    arena: Rc<RefCell<ArenaInner>>,
}

impl LinkId {
    /// The integer id carried in the escape sequence.
    #[must_use]
    pub const fn value(&self) -> usize {
        self.id
    }
}

impl Drop for LinkId {
    fn drop(&mut self) {
        self.arena.borrow_mut().free.push(self.id);
    }
}

/// Percent-encode `uri` into the printable ASCII range 0x20–0x7E.
#[must_use]
pub fn encode_uri(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len());
    for ch in uri.chars() {
        if ch.is_ascii() && (' '..='~').contains(&ch) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut [0u8; 4])));
        }
    }
    out
}

/// A single-line flow widget whose label is wrapped in OSC 8 escapes.
pub struct Hyperlink {
    id: LinkId,
    uri: String,
    attr: Option<StyleTag>,
    label: String,
}

impl Hyperlink {
    /// Validate and build a hyperlink, drawing an id from `arena`.
    ///
    /// The uri must be non-empty printable ASCII (see [`encode_uri`] for
    /// arbitrary input) and the label a non-empty single line.
    pub fn new(
        arena: &LinkArena,
        uri: impl Into<String>,
        attr: Option<StyleTag>,
        label: impl Into<String>,
    ) -> Result<Self> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(RenderError::EmptyUri);
        }
        if let Some(byte) = uri.bytes().find(|b| !(0x20..=0x7E).contains(b)) {
            return Err(RenderError::UriNotPrintable(byte));
        }

        let label = label.into();
        if label.is_empty() {
            return Err(RenderError::EmptyLabel);
        }
        if label.contains('\n') || label.contains('\r') {
            return Err(RenderError::MultilineLabel);
        }

        Ok(Self {
            id: arena.allocate(),
            uri,
            attr,
            label,
        })
    }

    /// The id carried in the escape sequence.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id.value()
    }

    /// The link target.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The visible label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    fn render_flow(&self, cols: usize) -> Canvas {
        let cols = cols.max(1);
        // cols >= 1, so truncation cannot fail.
        let visible = text::truncate(&self.label, cols)
            .unwrap_or(std::borrow::Cow::Borrowed(&self.label));
        let visible_width = text::display_width(&visible);

        let mut runs = vec![
            Run::raw(format!("\x1b]8;id={};{}\x1b\\", self.id.value(), self.uri)),
            Run::text(self.attr.map(Attr::Named), visible.into_owned()),
            Run::raw("\x1b]8;;\x1b\\"),
        ];
        if visible_width < cols {
            // Padding stays outside the escapes: the clickable region never
            // exceeds the visible label.
            runs.push(Run::blank(cols - visible_width));
        }

        let mut canvas = Canvas::new(cols);
        canvas.push_row(runs);
        canvas
    }
}

impl Widget for Hyperlink {
    fn sizing(&self) -> Sizing {
        Sizing::Flow
    }

    fn render(&self, size: Size, _focus: bool) -> Canvas {
        match size {
            Size::Flow { cols } => self.render_flow(cols),
            Size::Box { cols, rows } => self.render_flow(cols).pad_trim_rows(rows),
        }
    }
}
